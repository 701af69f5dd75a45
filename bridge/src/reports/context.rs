//! Context command report data structures.

use exportbridge_build::BuildContext;

use super::output::{Output, Report};

/// Report wrapping the build context of one unit.
#[derive(Debug)]
pub struct ContextReport {
    pub context: BuildContext,
}

impl Report for ContextReport {
    fn render(&self, out: &mut dyn Output) {
        let ctx = &self.context;
        out.section(&format!("Module {}", ctx.module_name));
        out.key_value("source", &ctx.source_path.display().to_string());
        out.key_value("build required", if ctx.build_required { "yes" } else { "no" });
        out.key_value("build directory", &ctx.build_directory.display().to_string());
        out.key_value("generated source", &ctx.generated_source_filename);
        out.key_value("artifact", &ctx.artifact_path.display().to_string());
        out.key_value("exports", &list(&ctx.exported_function_names));
        out.key_value("depends", &list(&ctx.dependency_names));

        if !ctx.generated_code.is_empty() {
            out.newline();
            out.preformatted(ctx.generated_code.trim_end());
        }
    }
}

fn list(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}
