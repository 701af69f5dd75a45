use std::{
    io::Write,
    path::{Path, PathBuf},
};

use exportbridge_attrs::SourceFileAttributes;
use exportbridge_core::{LayoutConfig, Platform, Result};

use super::{ExportGenerator, echo_line};
use crate::{CommitOutcome, ExportArtifact, artifact::preamble, builder::CodeBuilder};

/// Generates the native registration manifest (`src/<exports>.<native_ext>`):
/// one `bridge::function` line per export inside a single module block.
#[derive(Debug)]
pub struct ManifestGenerator {
    artifact: ExportArtifact,
    module_name: String,
}

impl ManifestGenerator {
    pub const COMMENT_PREFIX: &'static str = "//";

    pub fn new(package_dir: &Path, platform: &Platform, layout: &LayoutConfig) -> Result<Self> {
        let file = format!("{}.{}", layout.exports, layout.native_ext);
        Self::at(platform.join(package_dir, ["src", file.as_str()]), &layout.exports)
    }

    /// Manifest at an explicit path registering under `module_name`.
    pub fn at(target: impl Into<PathBuf>, module_name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            artifact: ExportArtifact::open(target, Self::COMMENT_PREFIX, CodeBuilder::native())?,
            module_name: module_name.into(),
        })
    }
}

impl ExportGenerator for ManifestGenerator {
    fn target(&self) -> &Path {
        self.artifact.target()
    }

    fn write_begin(&mut self) {
        let line = module_open(&self.module_name);
        self.artifact.body().push_line(&line).push_indent();
    }

    fn write_functions(
        &mut self,
        attributes: &SourceFileAttributes,
        mut echo: Option<&mut dyn Write>,
    ) {
        echo_line(
            &mut echo,
            &format!("Exports from {}:", attributes.source_file().display()),
        );
        write_registrations(self.artifact.body(), attributes, &mut echo);
        echo_line(&mut echo, "");
    }

    fn write_end(&mut self) {
        self.artifact.body().push_dedent().push_line("}");
    }

    fn commit(&mut self, includes: &[String], prototypes: &[String]) -> Result<CommitOutcome> {
        let preamble = preamble(includes, prototypes, ";");
        self.artifact.commit(&preamble)
    }
}

/// Registration block appended to an ad hoc build unit's source copy.
pub fn registration_block(module_name: &str, attributes: &SourceFileAttributes) -> String {
    let mut body = CodeBuilder::native();
    body.push_line(&module_open(module_name)).push_indent();
    write_registrations(&mut body, attributes, &mut None);
    body.push_dedent().push_line("}");
    body.build()
}

fn module_open(module_name: &str) -> String {
    format!("BRIDGE_MODULE({}) {{", module_name)
}

fn write_registrations(
    body: &mut CodeBuilder,
    attributes: &SourceFileAttributes,
    echo: &mut Option<&mut dyn Write>,
) {
    for export in attributes.exports() {
        echo_line(echo, &format!("  {}", export.function));
        tracing::trace!(name = export.name, function = export.function.name(), "registering export");
        body.push_line(&format!(
            "bridge::function(\"{}\", &{});",
            export.name,
            export.function.name()
        ));
    }
}
