//! Line buffer for generated files.

use super::Indent;

/// Append-only text buffer that tracks an indentation level.
///
/// Supports both consuming methods (returning `Self`) for chaining and
/// mutable methods (returning `&mut Self`) for incremental generation.
///
/// # Example
///
/// ```
/// use exportbridge_codegen::builder::CodeBuilder;
///
/// let mut builder = CodeBuilder::native();
/// builder
///     .push_line("BRIDGE_MODULE(demo) {")
///     .push_indent()
///     .push_line("bridge::function(\"f\", &f);")
///     .push_dedent()
///     .push_line("}");
///
/// assert_eq!(
///     builder.build(),
///     "BRIDGE_MODULE(demo) {\n    bridge::function(\"f\", &f);\n}\n"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct CodeBuilder {
    indent_level: usize,
    indent: Indent,
    buffer: String,
}

impl CodeBuilder {
    /// Create a new CodeBuilder with the specified indentation.
    pub fn new(indent: Indent) -> Self {
        Self {
            indent_level: 0,
            indent,
            buffer: String::new(),
        }
    }

    /// 4-space indentation, for native sources and headers.
    pub fn native() -> Self {
        Self::new(Indent::NATIVE)
    }

    /// 2-space indentation, for host scripts.
    pub fn host() -> Self {
        Self::new(Indent::HOST)
    }

    // =========================================================================
    // Mutable API - methods prefixed with `push_`
    // =========================================================================

    /// Add a line of code with current indentation (mutable).
    pub fn push_line(&mut self, s: &str) -> &mut Self {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self
    }

    /// Add a blank line (mutable).
    pub fn push_blank(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }

    /// Increase indentation level (mutable).
    pub fn push_indent(&mut self) -> &mut Self {
        self.indent_level += 1;
        self
    }

    /// Decrease indentation level (mutable).
    pub fn push_dedent(&mut self) -> &mut Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self
    }

    /// Add a comment line, e.g. `// text` or `# text` (mutable).
    pub fn push_comment(&mut self, prefix: &str, text: &str) -> &mut Self {
        self.write_indent();
        self.buffer.push_str(prefix);
        self.buffer.push(' ');
        self.buffer.push_str(text);
        self.buffer.push('\n');
        self
    }

    // =========================================================================
    // Consuming API
    // =========================================================================

    /// Add a line of code with current indentation.
    pub fn line(mut self, s: &str) -> Self {
        self.push_line(s);
        self
    }

    /// Add a blank line (no indentation).
    pub fn blank(mut self) -> Self {
        self.push_blank();
        self
    }

    /// Apply `f` for each item.
    pub fn each<T, I, F>(mut self, items: I, mut f: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: FnMut(Self, T) -> Self,
    {
        for item in items {
            self = f(self, item);
        }
        self
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Consume the builder and return the generated code.
    pub fn build(self) -> String {
        self.buffer
    }

    /// Get a reference to the current buffer content.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    fn write_indent(&mut self) {
        self.indent.write_to(&mut self.buffer, self.indent_level);
    }
}

impl Default for CodeBuilder {
    fn default() -> Self {
        Self::native()
    }
}
