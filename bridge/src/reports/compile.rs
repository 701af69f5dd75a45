//! Compile command report data structures.

use std::path::PathBuf;

use exportbridge_codegen::CommitOutcome;

use super::output::{Output, Report};

/// Report data from export synchronization.
#[derive(Debug)]
pub struct CompileReport {
    pub package_name: String,
    /// Number of sources scanned.
    pub source_count: usize,
    /// Whether any artifact was written or removed.
    pub changed: bool,
    /// Artifacts in generation order, relative to the package directory.
    pub artifacts: Vec<ArtifactChange>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactChange {
    pub path: PathBuf,
    pub outcome: CommitOutcome,
}

impl Report for CompileReport {
    fn render(&self, out: &mut dyn Output) {
        out.preformatted(&format!(
            "{} ({} source file{})",
            self.package_name,
            self.source_count,
            if self.source_count == 1 { "" } else { "s" }
        ));
        out.newline();

        out.section("Artifacts");
        for artifact in &self.artifacts {
            let path = artifact.path.display().to_string();
            match artifact.outcome {
                CommitOutcome::Written => out.added_item(&path),
                CommitOutcome::Removed => out.removed_item(&path),
                CommitOutcome::Unchanged => out.unchanged_item(&path),
            }
        }
        out.newline();

        if self.changed {
            out.preformatted("exports files updated");
        } else {
            out.preformatted("exports files already up to date");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::RecordingOutput;

    #[test]
    fn test_render() {
        let report = CompileReport {
            package_name: "fastmath".to_string(),
            source_count: 1,
            changed: true,
            artifacts: vec![
                ArtifactChange {
                    path: PathBuf::from("src/BridgeExports.cpp"),
                    outcome: CommitOutcome::Written,
                },
                ArtifactChange {
                    path: PathBuf::from("R/BridgeExports.R"),
                    outcome: CommitOutcome::Unchanged,
                },
                ArtifactChange {
                    path: PathBuf::from("inst/include/fastmath.hpp"),
                    outcome: CommitOutcome::Removed,
                },
            ],
        };

        let mut out = RecordingOutput::default();
        report.render(&mut out);

        assert_eq!(
            out.lines,
            [
                "fastmath (1 source file)",
                "",
                "Artifacts:",
                "+ src/BridgeExports.cpp",
                "  R/BridgeExports.R",
                "- inst/include/fastmath.hpp",
                "",
                "exports files updated",
            ]
        );
    }
}
