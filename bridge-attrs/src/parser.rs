use std::path::Path;

use exportbridge_core::Result;

use crate::SourceFileAttributes;

/// Turns a source file into its attribute sequence.
///
/// Implementations must report a missing file as
/// [`exportbridge_core::Error::SourceNotFound`]. A file without annotations
/// is not an error; it yields an empty [`SourceFileAttributes`].
pub trait AttributeParser {
    fn parse(&self, path: &Path) -> Result<SourceFileAttributes>;
}

impl<F> AttributeParser for F
where
    F: Fn(&Path) -> Result<SourceFileAttributes>,
{
    fn parse(&self, path: &Path) -> Result<SourceFileAttributes> {
        self(path)
    }
}

/// Parser that serves pre-built attributes by path, for driving generators
/// without real sources. Paths with no registered attributes parse empty.
#[derive(Debug, Default, Clone)]
pub struct StaticParser {
    files: Vec<SourceFileAttributes>,
}

impl StaticParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register attributes under their own source path, replacing any earlier
    /// registration for that path.
    pub fn with(mut self, attributes: SourceFileAttributes) -> Self {
        self.files.retain(|f| f.source_file() != attributes.source_file());
        self.files.push(attributes);
        self
    }
}

impl AttributeParser for StaticParser {
    fn parse(&self, path: &Path) -> Result<SourceFileAttributes> {
        Ok(self
            .files
            .iter()
            .find(|f| f.source_file() == path)
            .cloned()
            .unwrap_or_else(|| SourceFileAttributes::new(path, Vec::new())))
    }
}
