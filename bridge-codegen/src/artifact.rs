//! Lifecycle of one generated file.

use std::path::{Path, PathBuf};

use exportbridge_core::{
    Error, FileInfo, GENERATOR_NAME, GENERATOR_TOKEN, Result, read_bytes, remove_file, write_file,
};

use crate::builder::CodeBuilder;

/// What a commit did to its target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Content was already up to date, or there was nothing to write.
    Unchanged,
    /// The file was created or rewritten.
    Written,
    /// A previously generated file is no longer needed and was deleted.
    Removed,
}

impl CommitOutcome {
    pub fn changed(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// A generated file: its current content on disk plus the body being
/// accumulated for it.
///
/// Opening refuses targets that exist but do not carry [`GENERATOR_TOKEN`],
/// so hand-authored files are never overwritten.
#[derive(Debug)]
pub struct ExportArtifact {
    target: PathBuf,
    comment_prefix: &'static str,
    existing: Vec<u8>,
    body: CodeBuilder,
}

impl ExportArtifact {
    /// Read the current content of `target` (if any) and check that it is
    /// ours to overwrite.
    pub fn open(
        target: impl Into<PathBuf>,
        comment_prefix: &'static str,
        body: CodeBuilder,
    ) -> Result<Self> {
        let target = target.into();
        let existing = if FileInfo::stat(&target)?.exists() {
            read_bytes(&target)?
        } else {
            Vec::new()
        };

        if !existing.is_empty() && !carries_token(&existing) {
            return Err(Error::unsafe_overwrite(target));
        }

        Ok(Self {
            target,
            comment_prefix,
            existing,
            body,
        })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn comment_prefix(&self) -> &'static str {
        self.comment_prefix
    }

    /// Raw content of the target when it was opened (or last committed).
    pub fn existing(&self) -> &[u8] {
        &self.existing
    }

    /// Buffer the generators append to.
    pub fn body(&mut self) -> &mut CodeBuilder {
        &mut self.body
    }

    /// Provenance header written at the top of every generated file.
    pub fn header(&self) -> String {
        let mut header = CodeBuilder::native();
        header
            .push_comment(
                self.comment_prefix,
                &format!("This file was generated by {}", GENERATOR_NAME),
            )
            .push_comment(
                self.comment_prefix,
                &format!("Generator token: {}", GENERATOR_TOKEN),
            )
            .push_blank();
        header.build()
    }

    /// Full file content: header, preamble, body.
    pub fn render(&self, preamble: &str) -> String {
        let mut content = self.header();
        content.push_str(preamble);
        content.push_str(self.body.as_str());
        content
    }

    /// Write the rendered content if it differs from what is on disk.
    ///
    /// An empty body for a target that does not exist performs no I/O.
    pub fn commit(&mut self, preamble: &str) -> Result<CommitOutcome> {
        if self.body.is_empty() && !FileInfo::stat(&self.target)?.exists() {
            return Ok(CommitOutcome::Unchanged);
        }

        let content = self.render(preamble);
        if content.as_bytes() == self.existing.as_slice() {
            tracing::debug!(path = %self.target.display(), "artifact up to date");
            return Ok(CommitOutcome::Unchanged);
        }

        write_file(&self.target, &content)?;
        tracing::debug!(path = %self.target.display(), bytes = content.len(), "artifact written");
        self.existing = content.into_bytes();
        Ok(CommitOutcome::Written)
    }

    /// Delete the target if it exists.
    pub fn remove(&mut self) -> Result<CommitOutcome> {
        if remove_file(&self.target)? {
            self.existing.clear();
            Ok(CommitOutcome::Removed)
        } else {
            Ok(CommitOutcome::Unchanged)
        }
    }
}

/// Whether `content` holds the provenance token. Existing files may be in any
/// encoding, so the search is over bytes.
fn carries_token(content: &[u8]) -> bool {
    content
        .windows(GENERATOR_TOKEN.len())
        .any(|window| window == GENERATOR_TOKEN.as_bytes())
}

/// Preamble block: each group of lines followed by a blank line, groups that
/// are empty are omitted. `terminator` is appended to every line of the
/// second group.
pub(crate) fn preamble(includes: &[String], declarations: &[String], terminator: &str) -> String {
    let mut out = CodeBuilder::native();
    if !includes.is_empty() {
        out = out.each(includes, |b, line| b.line(line)).blank();
    }
    if !declarations.is_empty() {
        out = out
            .each(declarations, |b, line| b.line(&format!("{}{}", line, terminator)))
            .blank();
    }
    out.build()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn artifact(temp: &TempDir) -> ExportArtifact {
        ExportArtifact::open(temp.path().join("out.cpp"), "//", CodeBuilder::native()).unwrap()
    }

    #[test]
    fn test_header_carries_token() {
        let temp = TempDir::new().unwrap();
        let header = artifact(&temp).header();

        assert!(header.starts_with("// This file was generated by bridge compile\n"));
        assert!(header.contains(GENERATOR_TOKEN));
        assert!(header.ends_with("\n\n"));
    }

    #[test]
    fn test_empty_body_without_file_is_noop() {
        let temp = TempDir::new().unwrap();
        let mut artifact = artifact(&temp);

        assert_eq!(artifact.commit("").unwrap(), CommitOutcome::Unchanged);
        assert!(!temp.path().join("out.cpp").exists());
    }

    #[test]
    fn test_commit_writes_then_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let mut artifact = artifact(&temp);
        artifact.body().push_line("int x;");

        assert_eq!(artifact.commit("").unwrap(), CommitOutcome::Written);
        assert_eq!(artifact.commit("").unwrap(), CommitOutcome::Unchanged);

        let written = fs::read_to_string(temp.path().join("out.cpp")).unwrap();
        assert!(written.ends_with("\n\nint x;\n"));
    }

    #[test]
    fn test_open_refuses_foreign_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.cpp");
        fs::write(&path, "// written by hand\n").unwrap();

        let err = ExportArtifact::open(&path, "//", CodeBuilder::native()).unwrap_err();
        assert!(err.is_unsafe_overwrite());
        assert_eq!(fs::read_to_string(&path).unwrap(), "// written by hand\n");
    }

    #[test]
    fn test_open_refuses_non_utf8_foreign_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.cpp");
        fs::write(&path, b"# hand written caf\xe9\n").unwrap();

        let err = ExportArtifact::open(&path, "//", CodeBuilder::native()).unwrap_err();
        assert!(err.is_unsafe_overwrite());
        assert_eq!(fs::read(&path).unwrap(), b"# hand written caf\xe9\n");
    }

    #[test]
    fn test_open_accepts_non_utf8_generated_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.cpp");
        let mut content = format!("// Generator token: {}\n", GENERATOR_TOKEN).into_bytes();
        content.extend_from_slice(b"// caf\xe9\n");
        fs::write(&path, &content).unwrap();

        let mut artifact = ExportArtifact::open(&path, "//", CodeBuilder::native()).unwrap();
        assert_eq!(artifact.existing(), content.as_slice());

        artifact.body().push_line("int x;");
        assert_eq!(artifact.commit("").unwrap(), CommitOutcome::Written);
        assert!(fs::read_to_string(&path).unwrap().ends_with("int x;\n"));
    }

    #[test]
    fn test_open_accepts_empty_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.cpp");
        fs::write(&path, "").unwrap();

        assert!(ExportArtifact::open(&path, "//", CodeBuilder::native()).is_ok());
    }

    #[test]
    fn test_remove() {
        let temp = TempDir::new().unwrap();
        let mut artifact = artifact(&temp);
        assert_eq!(artifact.remove().unwrap(), CommitOutcome::Unchanged);

        artifact.body().push_line("x");
        artifact.commit("").unwrap();
        assert_eq!(artifact.remove().unwrap(), CommitOutcome::Removed);
        assert!(!temp.path().join("out.cpp").exists());
    }

    #[test]
    fn test_preamble_groups() {
        let includes = vec!["#include <bridge.h>".to_string()];
        let prototypes = vec!["int f()".to_string(), "int g(int x)".to_string()];

        assert_eq!(
            preamble(&includes, &prototypes, ";"),
            "#include <bridge.h>\n\nint f();\nint g(int x);\n\n"
        );
        assert_eq!(preamble(&[], &prototypes[..1], ";"), "int f();\n\n");
        assert_eq!(preamble(&[], &[], ";"), "");
    }
}
