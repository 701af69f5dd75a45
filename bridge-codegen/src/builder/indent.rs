//! Indentation of generated text.

/// One indentation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    Spaces(u8),
    Tab,
}

impl Indent {
    /// Native sources and forwarding headers.
    pub const NATIVE: Self = Self::Spaces(4);

    /// Host wrapper scripts.
    pub const HOST: Self = Self::Spaces(2);

    /// Append `level` steps of indentation to `buf`.
    pub fn write_to(self, buf: &mut String, level: usize) {
        match self {
            Self::Spaces(width) => buf.extend(std::iter::repeat_n(' ', level * width as usize)),
            Self::Tab => buf.extend(std::iter::repeat_n('\t', level)),
        }
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::NATIVE
    }
}
