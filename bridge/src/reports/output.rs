//! Output trait for rendering reports.

/// Target output for reports.
///
/// Reports describe *what* to output; implementations decide *how*.
pub trait Output {
    /// Start a new section with a heading.
    fn section(&mut self, name: &str);

    /// Render an indented key-value pair.
    fn key_value(&mut self, key: &str, value: &str);

    /// Render an item that stayed the same.
    fn unchanged_item(&mut self, text: &str);

    /// Render an added or rewritten item.
    fn added_item(&mut self, text: &str);

    /// Render a removed item.
    fn removed_item(&mut self, text: &str);

    /// Render a block of preformatted text.
    fn preformatted(&mut self, text: &str);

    fn newline(&mut self);
}

/// A report that can render itself to an output.
pub trait Report {
    fn render(&self, out: &mut dyn Output);
}

/// Terminal output implementation.
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Output for TerminalOutput {
    fn section(&mut self, name: &str) {
        println!("{}:", name);
    }

    fn key_value(&mut self, key: &str, value: &str) {
        println!("  {:<20} {}", key, value);
    }

    fn unchanged_item(&mut self, text: &str) {
        println!("    {}", text);
    }

    fn added_item(&mut self, text: &str) {
        println!("  + {}", text);
    }

    fn removed_item(&mut self, text: &str) {
        println!("  - {}", text);
    }

    fn preformatted(&mut self, text: &str) {
        println!("{}", text);
    }

    fn newline(&mut self) {
        println!();
    }
}

/// Collects rendered lines, for asserting on report layout.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingOutput {
    pub lines: Vec<String>,
}

#[cfg(test)]
impl Output for RecordingOutput {
    fn section(&mut self, name: &str) {
        self.lines.push(format!("{}:", name));
    }

    fn key_value(&mut self, key: &str, value: &str) {
        self.lines.push(format!("{} = {}", key, value));
    }

    fn unchanged_item(&mut self, text: &str) {
        self.lines.push(format!("  {}", text));
    }

    fn added_item(&mut self, text: &str) {
        self.lines.push(format!("+ {}", text));
    }

    fn removed_item(&mut self, text: &str) {
        self.lines.push(format!("- {}", text));
    }

    fn preformatted(&mut self, text: &str) {
        self.lines.extend(text.lines().map(str::to_string));
    }

    fn newline(&mut self) {
        self.lines.push(String::new());
    }
}
