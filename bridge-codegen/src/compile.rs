//! Batch synchronization of a package's export artifacts.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use exportbridge_attrs::AttributeParser;
use exportbridge_core::{LayoutConfig, Platform, Result};

use crate::{
    CommitSummary, ForwardingHeaderGenerator, Generators, ManifestGenerator,
    WrapperScriptGenerator,
};

/// Inputs of one [`compile_exports`] run.
#[derive(Debug, Clone)]
pub struct CompileRequest<'a> {
    pub package_dir: &'a Path,
    pub package_name: &'a str,
    pub source_files: &'a [PathBuf],
    /// Lines placed verbatim at the top of the manifest and header.
    pub include_lines: &'a [String],
    pub verbose: bool,
    pub platform: &'a Platform,
    pub layout: &'a LayoutConfig,
}

/// Regenerate the manifest, wrapper script and forwarding header of a package
/// from its annotated sources.
///
/// Files without attributes are skipped. Returns what happened to each
/// artifact; [`CommitSummary::changed`] is true iff any artifact was written
/// or removed.
pub fn compile_exports<W: Write>(
    request: &CompileRequest<'_>,
    parser: &dyn AttributeParser,
    echo: W,
) -> Result<CommitSummary> {
    let CompileRequest {
        package_dir,
        package_name,
        platform,
        layout,
        ..
    } = *request;

    let mut generators = Generators::with_echo(echo);
    generators
        .add(ManifestGenerator::new(package_dir, platform, layout)?)
        .add(WrapperScriptGenerator::new(package_dir, platform, layout)?)
        .add(ForwardingHeaderGenerator::new(
            package_dir,
            package_name,
            platform,
            layout,
        )?);

    let mut prototypes = Vec::new();

    generators.write_begin();
    for source in request.source_files {
        let attributes = parser.parse(source)?;
        if attributes.is_empty() {
            tracing::debug!(file = %source.display(), "no attributes, skipping");
            continue;
        }
        prototypes.extend(attributes.prototypes().iter().cloned());
        generators.write_functions(&attributes, request.verbose);
    }
    generators.write_end();

    let summary = generators.commit(request.include_lines, &prototypes)?;

    if request.verbose {
        let message = if summary.changed() {
            "exports files updated"
        } else {
            "exports files already up to date"
        };
        if let Err(e) = writeln!(generators.echo_mut(), "{}", message) {
            tracing::warn!(error = %e, "failed to write progress output");
        }
    }

    Ok(summary)
}
