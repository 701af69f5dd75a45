//! Report data structures for commands.
//!
//! Commands build reports, then render them to an Output target.

mod compile;
mod context;
mod output;

pub use compile::{ArtifactChange, CompileReport};
pub use context::ContextReport;
pub use output::{Report, TerminalOutput};
