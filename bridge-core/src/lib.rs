//! Core utilities and types for exportbridge.
//!
//! This crate provides the error taxonomy, the filesystem primitives used to
//! detect existence and staleness, platform information and the optional
//! `bridge.toml` package configuration shared by the rest of the workspace.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod config;
mod error;
mod file;
mod platform;

pub use config::{CONFIG_FILE, LayoutConfig, PackageConfig, PackageSection};
pub use error::{Error, Result};
pub use file::{
    FileInfo, copy_with_suffix, create_dir_all, read_bytes, read_to_string, remove_file, write_file,
};
pub use platform::Platform;

/// Marker written into the header of every generated file.
///
/// Its presence is the only proof that a file on disk was produced by this
/// tool and may be overwritten. Changing it makes every previously generated
/// file look hand-authored, so treat it as part of the on-disk format.
pub const GENERATOR_TOKEN: &str = "6F1C2A7E-3B9D-4E55-A0C8-92D4B7E1F035";

/// Name of the tool as it appears in generated headers.
pub const GENERATOR_NAME: &str = "bridge compile";
