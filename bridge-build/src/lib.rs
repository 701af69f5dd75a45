//! Ad hoc builds of single source files.
//!
//! A [`BuildUnit`] copies one source file into a private build directory and
//! appends a registration block for its exports. [`BuildUnitCache`] memoizes
//! units across requests, and [`build_context`] ties the two together,
//! deciding whether the caller has to (re)compile.
//!
//! Staleness is judged on modification times only.

mod cache;
mod context;
mod ids;
mod unit;

pub use cache::{BuildUnitCache, CacheKey};
pub use context::{BuildContext, BuildEnv, BuildRequest, build_context};
pub use ids::{ModuleIds, RandomIds, SequentialIds};
pub use unit::{BUILD_DIR_PREFIX, BuildUnit};
