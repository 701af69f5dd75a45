use std::{
    io::Write,
    path::{Path, PathBuf},
};

use exportbridge_attrs::{Export, InterfaceTag, SourceFileAttributes};
use exportbridge_core::{LayoutConfig, Platform, Result};

use super::ExportGenerator;
use crate::{CommitOutcome, ExportArtifact, builder::CodeBuilder};

/// Generates the host wrapper script (`<host_dir>/<exports>.<host_ext>`).
///
/// Documented exports get a placeholder definition so documentation tooling
/// has a symbol to attach to; the script ends with one `loadModule` call
/// naming every export of every host-facing file.
#[derive(Debug)]
pub struct WrapperScriptGenerator {
    artifact: ExportArtifact,
    module_name: String,
    exports: Vec<String>,
}

impl WrapperScriptGenerator {
    pub const COMMENT_PREFIX: &'static str = "#";

    pub fn new(package_dir: &Path, platform: &Platform, layout: &LayoutConfig) -> Result<Self> {
        let file = format!("{}.{}", layout.exports, layout.host_ext);
        Self::at(
            platform.join(package_dir, [layout.host_dir.as_str(), file.as_str()]),
            &layout.exports,
        )
    }

    pub fn at(target: impl Into<PathBuf>, module_name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            artifact: ExportArtifact::open(target, Self::COMMENT_PREFIX, CodeBuilder::host())?,
            module_name: module_name.into(),
            exports: Vec::new(),
        })
    }

    /// Export names recorded so far.
    pub fn exports(&self) -> &[String] {
        &self.exports
    }

    fn write_placeholder(&mut self, export: &Export<'_>) {
        let args = export
            .function
            .arguments()
            .iter()
            .map(|a| a.name())
            .collect::<Vec<_>>()
            .join(", ");
        let body = self.artifact.body();
        body.push_blank();
        for line in export.attribute.doc_lines() {
            body.push_line(&format!("{}'{}", Self::COMMENT_PREFIX, line));
        }
        body.push_line(&format!("{} <- function({}) {{}}", export.name, args))
            .push_blank();
    }
}

impl ExportGenerator for WrapperScriptGenerator {
    fn target(&self) -> &Path {
        self.artifact.target()
    }

    fn write_begin(&mut self) {}

    fn write_functions(&mut self, attributes: &SourceFileAttributes, _echo: Option<&mut dyn Write>) {
        if !attributes.has_interface(InterfaceTag::Host) {
            return;
        }

        for export in attributes.exports() {
            self.exports.push(export.name.to_string());
            if !export.attribute.doc_lines().is_empty() {
                self.write_placeholder(&export);
            }
        }
    }

    fn write_end(&mut self) {
        let call = load_module_call(&self.module_name, &self.exports);
        let body = self.artifact.body();
        for line in call.lines() {
            body.push_line(line);
        }
    }

    fn commit(&mut self, _includes: &[String], _prototypes: &[String]) -> Result<CommitOutcome> {
        self.artifact.commit("")
    }
}

/// `bridge::loadModule("<module>", what = c("a",\n    "b"))` with
/// continuation lines aligned under the first name.
fn load_module_call(module_name: &str, exports: &[String]) -> String {
    let head = format!("bridge::loadModule(\"{}\", what = ", module_name);
    if exports.is_empty() {
        return format!("{}character())", head);
    }

    let open = format!("{}c(", head);
    let align = " ".repeat(open.len());
    let names = exports
        .iter()
        .map(|name| format!("\"{}\"", name))
        .collect::<Vec<_>>()
        .join(&format!(",\n{}", align));
    format!("{}{}))", open, names)
}

#[cfg(test)]
mod tests {
    use exportbridge_attrs::{Argument, Attribute, EXPORT_ATTRIBUTE, Function, INTERFACES_ATTRIBUTE, Param};
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_load_module_empty() {
        assert_eq!(
            load_module_call("BridgeExports", &[]),
            "bridge::loadModule(\"BridgeExports\", what = character())"
        );
    }

    #[test]
    fn test_load_module_aligned() {
        let call = load_module_call("M", &["a".to_string(), "b".to_string()]);
        assert_eq!(
            call,
            format!(
                "bridge::loadModule(\"M\", what = c(\"a\",\n{}\"b\"))",
                " ".repeat(33)
            )
        );
        let lines: Vec<_> = call.lines().collect();
        assert_eq!(lines[1].find('"'), lines[0].find("\"a\""));
    }

    #[test]
    fn test_documented_export_gets_placeholder() {
        let temp = TempDir::new().unwrap();
        let mut generator = WrapperScriptGenerator::at(temp.path().join("x.R"), "BridgeExports").unwrap();
        let attrs = SourceFileAttributes::new(
            "src/a.cpp",
            vec![
                Attribute::new(EXPORT_ATTRIBUTE)
                    .with_function(Function::new(
                        "vecsum",
                        "double",
                        vec![Argument::new("v", "std::vector<double>")],
                    ))
                    .with_doc(" Sum of a vector")
                    .with_doc(" @param v values"),
                Attribute::new(EXPORT_ATTRIBUTE).with_function(Function::new("undocumented", "int", vec![])),
            ],
        );

        generator.write_begin();
        generator.write_functions(&attrs, None);
        generator.write_end();

        insta::assert_snapshot!(generator.artifact.body().as_str(), @r#"
        #' Sum of a vector
        #' @param v values
        vecsum <- function(v) {}

        bridge::loadModule("BridgeExports", what = c("vecsum",
                                                     "undocumented"))
        "#);
    }

    #[test]
    fn test_native_only_file_is_skipped() {
        let temp = TempDir::new().unwrap();
        let mut generator = WrapperScriptGenerator::at(temp.path().join("x.R"), "BridgeExports").unwrap();
        let attrs = SourceFileAttributes::new(
            "src/a.cpp",
            vec![
                Attribute::new(INTERFACES_ATTRIBUTE).with_param(Param::new("native")),
                Attribute::new(EXPORT_ATTRIBUTE).with_function(Function::new("f", "int", vec![])),
            ],
        );

        generator.write_begin();
        generator.write_functions(&attrs, None);
        generator.write_end();

        assert!(generator.exports().is_empty());
        assert_eq!(
            generator.artifact.body().as_str(),
            "bridge::loadModule(\"BridgeExports\", what = character())\n"
        );
    }
}
