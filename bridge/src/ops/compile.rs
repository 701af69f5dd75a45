//! Compile operation - export artifact synchronization for a package.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use exportbridge_attrs::CommentScanner;
use exportbridge_codegen::{CompileRequest, compile_exports};
use exportbridge_core::{Error, PackageConfig, Platform, Result};

use crate::reports::{ArtifactChange, CompileReport};

/// Options for the compile operation.
pub struct CompileOptions<'a> {
    /// Package root containing `src/`.
    pub package_dir: &'a Path,
    /// Package name; defaults to the configured or directory name.
    pub name: Option<&'a str>,
    pub verbose: bool,
    pub platform: Platform,
}

/// Execute the compile operation.
///
/// Scans every source under `src/` and regenerates the package's export
/// artifacts. Verbose progress goes to `echo`.
pub fn compile<W: Write>(
    config: &PackageConfig,
    opts: CompileOptions<'_>,
    echo: W,
) -> Result<CompileReport> {
    let package_name = match opts.name {
        Some(name) => name.to_string(),
        None => config
            .package_name(opts.package_dir)
            .ok_or_else(|| Error::package_name(opts.package_dir))?,
    };

    let sources = discover_sources(opts.package_dir, config)?;
    tracing::debug!(package = %package_name, sources = sources.len(), "compiling exports");

    let request = CompileRequest {
        package_dir: opts.package_dir,
        package_name: &package_name,
        source_files: &sources,
        include_lines: &config.package.includes,
        verbose: opts.verbose,
        platform: &opts.platform,
        layout: &config.layout,
    };
    let summary = compile_exports(&request, &CommentScanner::new(), echo)?;

    let artifacts = summary
        .artifacts
        .iter()
        .map(|(path, outcome)| ArtifactChange {
            path: path
                .strip_prefix(opts.package_dir)
                .unwrap_or(path)
                .to_path_buf(),
            outcome: *outcome,
        })
        .collect();

    Ok(CompileReport {
        package_name,
        source_count: sources.len(),
        changed: summary.changed(),
        artifacts,
    })
}

/// Sources under `<package>/src` with a configured extension, sorted, minus
/// the generated manifest itself.
pub fn discover_sources(package_dir: &Path, config: &PackageConfig) -> Result<Vec<PathBuf>> {
    let src_dir = package_dir.join("src");
    let manifest = format!("{}.{}", config.layout.exports, config.layout.native_ext);

    let entries = std::fs::read_dir(&src_dir).map_err(|e| Error::file_io(&src_dir, e))?;
    let mut sources = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::file_io(&src_dir, e))?.path();
        if !path.is_file() {
            continue;
        }
        let matches_ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| config.package.sources.iter().any(|s| s == ext));
        let is_manifest = path.file_name().is_some_and(|name| name == manifest.as_str());
        if matches_ext && !is_manifest {
            sources.push(path);
        }
    }
    sources.sort();
    Ok(sources)
}
