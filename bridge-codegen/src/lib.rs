//! Export artifact generation for exportbridge.
//!
//! # Module Organization
//!
//! - [`builder`] - Indented text building ([`CodeBuilder`](builder::CodeBuilder))
//! - [`ExportArtifact`] - Lifecycle of one generated file, including the
//!   provenance check that protects hand-written files
//! - [`generators`] - The manifest, forwarding header and wrapper script
//!   generators and their shared three-phase contract
//! - [`Generators`] - Drives a set of generators over a batch of files
//! - [`compile_exports`] - Synchronizes all artifacts of a package

mod artifact;
pub mod builder;
mod compile;
pub mod generators;
mod orchestrator;

pub use artifact::{CommitOutcome, ExportArtifact};
pub use compile::{CompileRequest, compile_exports};
pub use generators::{
    ExportGenerator, ForwardingHeaderGenerator, Generator, GeneratorKind, ManifestGenerator,
    WrapperScriptGenerator, registration_block,
};
pub use orchestrator::{CommitSummary, Generators};
