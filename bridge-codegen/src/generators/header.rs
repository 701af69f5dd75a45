use std::{
    io::Write,
    path::{Path, PathBuf},
};

use exportbridge_attrs::{Function, InterfaceTag, SourceFileAttributes};
use exportbridge_core::{LayoutConfig, Platform, Result, create_dir_all};

use super::ExportGenerator;
use crate::{CommitOutcome, ExportArtifact, artifact::preamble, builder::CodeBuilder};

/// Generates `<include_dir>/<package>.<header_ext>`: inline stubs that let
/// other native code call exports through the host's symbol registry.
///
/// Only files declaring the native interface contribute. If none does, the
/// header is deleted instead of being left empty.
#[derive(Debug)]
pub struct ForwardingHeaderGenerator {
    artifact: ExportArtifact,
    namespace: String,
    module_name: String,
    include_dir: PathBuf,
    has_native_interface: bool,
}

impl ForwardingHeaderGenerator {
    pub const COMMENT_PREFIX: &'static str = "//";

    pub fn new(
        package_dir: &Path,
        package_name: &str,
        platform: &Platform,
        layout: &LayoutConfig,
    ) -> Result<Self> {
        let include_dir = platform.join(package_dir, [layout.include_dir.as_str()]);
        let file = format!("{}.{}", package_name, layout.header_ext);
        let target = platform.join(&include_dir, [file.as_str()]);
        Ok(Self {
            artifact: ExportArtifact::open(target, Self::COMMENT_PREFIX, CodeBuilder::native())?,
            namespace: package_name.to_string(),
            module_name: layout.exports.clone(),
            include_dir,
            has_native_interface: false,
        })
    }

    fn write_stub(&mut self, function: &Function) {
        let name = function.name();
        let arg_types = function
            .arguments()
            .iter()
            .map(|a| a.ty())
            .collect::<Vec<_>>()
            .join(", ");
        let arg_names = function
            .arguments()
            .iter()
            .map(|a| a.name())
            .collect::<Vec<_>>()
            .join(", ");

        self.artifact
            .body()
            .push_line(&format!("inline {} {{", function))
            .push_indent()
            .push_line(&format!(
                "typedef {}(*Ptr_{})({});",
                function.return_type(),
                name,
                arg_types
            ))
            .push_line(&format!(
                "static Ptr_{name} p_{name} = (Ptr_{name})bridge::GetCallable(\"{}\", \"{name}\");",
                self.module_name
            ))
            .push_line(&format!("return p_{}({});", name, arg_names))
            .push_dedent()
            .push_line("}");
    }
}

impl ExportGenerator for ForwardingHeaderGenerator {
    fn target(&self) -> &Path {
        self.artifact.target()
    }

    fn write_begin(&mut self) {
        let line = format!("namespace {} {{", self.namespace);
        self.artifact.body().push_line(&line).push_indent();
    }

    fn write_functions(&mut self, attributes: &SourceFileAttributes, _echo: Option<&mut dyn Write>) {
        if !attributes.has_interface(InterfaceTag::Native) {
            return;
        }
        self.has_native_interface = true;

        for export in attributes.exports() {
            if export.is_hidden() {
                continue;
            }
            let function = export.function.renamed_to(export.name);
            self.write_stub(&function);
        }
    }

    fn write_end(&mut self) {
        self.artifact.body().push_dedent().push_line("}");
    }

    fn commit(&mut self, includes: &[String], _prototypes: &[String]) -> Result<CommitOutcome> {
        if !self.has_native_interface {
            return self.artifact.remove();
        }
        create_dir_all(&self.include_dir)?;
        let preamble = preamble(includes, &[], "");
        self.artifact.commit(&preamble)
    }
}
