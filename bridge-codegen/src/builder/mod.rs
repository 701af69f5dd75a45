//! Text building blocks shared by the generators.
//!
//! - [`CodeBuilder`] - Line-oriented buffer with indentation tracking
//! - [`Indent`] - Indentation configuration

mod code_builder;
mod indent;

pub use code_builder::CodeBuilder;
pub use indent::Indent;
