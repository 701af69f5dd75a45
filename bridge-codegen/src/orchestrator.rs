use std::{
    io::{self, Write},
    path::PathBuf,
};

use exportbridge_attrs::SourceFileAttributes;
use exportbridge_core::Result;

use crate::{
    CommitOutcome,
    generators::{ExportGenerator, Generator},
};

/// Per-artifact result of a batch commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub artifacts: Vec<(PathBuf, CommitOutcome)>,
}

impl CommitSummary {
    /// Whether any artifact was written or removed.
    pub fn changed(&self) -> bool {
        self.artifacts.iter().any(|(_, outcome)| outcome.changed())
    }

    pub fn outcome_of(&self, path: &std::path::Path) -> Option<CommitOutcome> {
        self.artifacts
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, outcome)| *outcome)
    }
}

/// Ordered set of generators driven in lockstep.
///
/// Every phase fans out to each generator in registration order. Progress
/// for verbose runs is written to `echo`.
pub struct Generators<W: Write = io::Stdout> {
    generators: Vec<Generator>,
    echo: W,
}

impl Generators<io::Stdout> {
    pub fn new() -> Self {
        Self::with_echo(io::stdout())
    }
}

impl Default for Generators<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Generators<W> {
    pub fn with_echo(echo: W) -> Self {
        Self {
            generators: Vec::new(),
            echo,
        }
    }

    pub fn add(&mut self, generator: impl Into<Generator>) -> &mut Self {
        self.generators.push(generator.into());
        self
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Generator> {
        self.generators.iter()
    }

    pub fn echo_mut(&mut self) -> &mut W {
        &mut self.echo
    }

    pub fn into_echo(self) -> W {
        self.echo
    }

    pub fn write_begin(&mut self) {
        for generator in &mut self.generators {
            generator.write_begin();
        }
    }

    pub fn write_functions(&mut self, attributes: &SourceFileAttributes, verbose: bool) {
        for generator in &mut self.generators {
            let echo: Option<&mut dyn Write> = if verbose { Some(&mut self.echo) } else { None };
            generator.write_functions(attributes, echo);
        }
    }

    pub fn write_end(&mut self) {
        for generator in &mut self.generators {
            generator.write_end();
        }
    }

    /// Commit every generator, even after one reports a change. The first
    /// error aborts; artifacts committed before it stay on disk.
    pub fn commit(&mut self, includes: &[String], prototypes: &[String]) -> Result<CommitSummary> {
        let mut summary = CommitSummary::default();
        for generator in &mut self.generators {
            let outcome = generator.commit(includes, prototypes)?;
            summary
                .artifacts
                .push((generator.target().to_path_buf(), outcome));
        }
        Ok(summary)
    }
}
