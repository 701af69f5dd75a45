//! The export generators and the contract they share.
//!
//! Generation runs in three phases over a batch of parsed files:
//! [`write_begin`](ExportGenerator::write_begin) once,
//! [`write_functions`](ExportGenerator::write_functions) once per file, and
//! [`write_end`](ExportGenerator::write_end) once, followed by a single
//! [`commit`](ExportGenerator::commit).

mod header;
mod manifest;
mod wrapper;

use std::{io::Write, path::Path};

use exportbridge_attrs::SourceFileAttributes;
use exportbridge_core::Result;
pub use header::ForwardingHeaderGenerator;
pub use manifest::{ManifestGenerator, registration_block};
pub use wrapper::WrapperScriptGenerator;

use crate::CommitOutcome;

/// Contract implemented by every generated artifact.
pub trait ExportGenerator {
    /// The file this generator owns.
    fn target(&self) -> &Path;

    /// Emit artifact-wide opening boilerplate.
    fn write_begin(&mut self);

    /// Emit fragments for the exports of one file. When `echo` is given,
    /// progress is reported to it; generated content is unaffected.
    fn write_functions(&mut self, attributes: &SourceFileAttributes, echo: Option<&mut dyn Write>);

    /// Emit closing boilerplate and batch-wide trailers.
    fn write_end(&mut self);

    /// Write, skip or remove the artifact.
    fn commit(&mut self, includes: &[String], prototypes: &[String]) -> Result<CommitOutcome>;
}

/// Where a generator is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Constructed,
    BeginWritten,
    FunctionsWritten,
    EndWritten,
    Committed,
    Removed,
}

/// The closed set of artifacts.
#[derive(Debug)]
pub enum GeneratorKind {
    Manifest(ManifestGenerator),
    ForwardingHeader(ForwardingHeaderGenerator),
    WrapperScript(WrapperScriptGenerator),
}

impl GeneratorKind {
    fn as_dyn(&mut self) -> &mut dyn ExportGenerator {
        match self {
            Self::Manifest(g) => g,
            Self::ForwardingHeader(g) => g,
            Self::WrapperScript(g) => g,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Manifest(_) => "manifest",
            Self::ForwardingHeader(_) => "forwarding header",
            Self::WrapperScript(_) => "wrapper script",
        }
    }
}

/// A generator plus its phase, enforcing the begin/functions/end/commit order.
#[derive(Debug)]
pub struct Generator {
    phase: Phase,
    kind: GeneratorKind,
}

impl Generator {
    pub fn new(kind: GeneratorKind) -> Self {
        Self {
            phase: Phase::Constructed,
            kind,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
}

impl ExportGenerator for Generator {
    fn target(&self) -> &Path {
        match &self.kind {
            GeneratorKind::Manifest(g) => g.target(),
            GeneratorKind::ForwardingHeader(g) => g.target(),
            GeneratorKind::WrapperScript(g) => g.target(),
        }
    }

    fn write_begin(&mut self) {
        debug_assert_eq!(self.phase, Phase::Constructed);
        self.kind.as_dyn().write_begin();
        self.phase = Phase::BeginWritten;
    }

    fn write_functions(&mut self, attributes: &SourceFileAttributes, echo: Option<&mut dyn Write>) {
        debug_assert!(matches!(
            self.phase,
            Phase::BeginWritten | Phase::FunctionsWritten
        ));
        self.kind.as_dyn().write_functions(attributes, echo);
        self.phase = Phase::FunctionsWritten;
    }

    fn write_end(&mut self) {
        debug_assert!(matches!(
            self.phase,
            Phase::BeginWritten | Phase::FunctionsWritten
        ));
        self.kind.as_dyn().write_end();
        self.phase = Phase::EndWritten;
    }

    fn commit(&mut self, includes: &[String], prototypes: &[String]) -> Result<CommitOutcome> {
        debug_assert_eq!(self.phase, Phase::EndWritten);
        let outcome = self.kind.as_dyn().commit(includes, prototypes)?;
        self.phase = match outcome {
            CommitOutcome::Removed => Phase::Removed,
            _ => Phase::Committed,
        };
        tracing::debug!(
            generator = self.kind.label(),
            path = %self.target().display(),
            ?outcome,
            "committed"
        );
        Ok(outcome)
    }
}

impl From<ManifestGenerator> for Generator {
    fn from(g: ManifestGenerator) -> Self {
        Self::new(GeneratorKind::Manifest(g))
    }
}

impl From<ForwardingHeaderGenerator> for Generator {
    fn from(g: ForwardingHeaderGenerator) -> Self {
        Self::new(GeneratorKind::ForwardingHeader(g))
    }
}

impl From<WrapperScriptGenerator> for Generator {
    fn from(g: WrapperScriptGenerator) -> Self {
        Self::new(GeneratorKind::WrapperScript(g))
    }
}

/// Best-effort progress output; a failing echo sink never fails generation.
pub(crate) fn echo_line(echo: &mut Option<&mut dyn Write>, line: &str) {
    let Some(out) = echo.as_deref_mut() else {
        return;
    };
    if let Err(e) = writeln!(out, "{}", line) {
        tracing::warn!(error = %e, "failed to write progress output");
    }
}
