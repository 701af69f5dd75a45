//! Core operations.
//!
//! This module contains the business logic for bridge commands,
//! separated from CLI argument parsing and output rendering.

pub mod compile;
pub mod context;

pub use compile::{CompileOptions, compile};
pub use context::{ContextOptions, context};
