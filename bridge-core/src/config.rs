//! Optional `bridge.toml` package configuration.

use std::path::Path;

use serde::Deserialize;

use crate::{Error, FileInfo, Result, read_to_string};

/// File name looked up at the package root.
pub const CONFIG_FILE: &str = "bridge.toml";

/// Root of `bridge.toml`. Every field has a default, so an absent file is
/// equivalent to an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackageConfig {
    pub package: PackageSection,
    pub layout: LayoutConfig,
}

/// `[package]` table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackageSection {
    /// Package name; defaults to the package directory name.
    pub name: Option<String>,
    /// Lines emitted verbatim at the top of the manifest and header.
    pub includes: Vec<String>,
    /// Source file extensions scanned under `src/`.
    pub sources: Vec<String>,
}

impl Default for PackageSection {
    fn default() -> Self {
        Self {
            name: None,
            includes: Vec::new(),
            sources: vec!["cpp".to_string(), "cc".to_string(), "cxx".to_string()],
        }
    }
}

/// `[layout]` table: where generated artifacts land, relative to the package.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Stem of the manifest and wrapper script, also the registered module name.
    pub exports: String,
    pub native_ext: String,
    pub host_dir: String,
    pub host_ext: String,
    pub include_dir: String,
    pub header_ext: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            exports: "BridgeExports".to_string(),
            native_ext: "cpp".to_string(),
            host_dir: "R".to_string(),
            host_ext: "R".to_string(),
            include_dir: "inst/include".to_string(),
            header_ext: "hpp".to_string(),
        }
    }
}

impl PackageConfig {
    /// Load `bridge.toml` from a package directory, falling back to defaults
    /// when the file does not exist.
    pub fn open(package_dir: impl AsRef<Path>) -> Result<Self> {
        let path = package_dir.as_ref().join(CONFIG_FILE);
        if !FileInfo::stat(&path)?.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = read_to_string(&path)?;
        Self::from_str_with_filename(&content, &path.display().to_string())
    }

    /// Parse configuration text, reporting errors against `filename`.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(e, content, filename))
    }

    /// Resolve the package name: the configured one, else the directory name.
    pub fn package_name(&self, package_dir: &Path) -> Option<String> {
        self.package.name.clone().or_else(|| {
            package_dir
                .canonicalize()
                .ok()
                .as_deref()
                .unwrap_or(package_dir)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
    }
}
