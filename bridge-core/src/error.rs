use std::path::{Path, PathBuf};

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for exportbridge operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("source file '{}' not found", path.display())]
    #[diagnostic(code(bridge::source_not_found))]
    SourceNotFound { path: PathBuf },

    #[error("i/o error on '{}'", path.display())]
    #[diagnostic(code(bridge::file_io))]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("refusing to overwrite '{}'", path.display())]
    #[diagnostic(
        code(bridge::unsafe_overwrite),
        help("the file exists but was not generated by bridge; move it aside or delete it")
    )]
    UnsafeOverwrite { path: PathBuf },

    #[error("cannot infer a package name for '{}'", path.display())]
    #[diagnostic(
        code(bridge::package_name),
        help("set `name` under [package] in bridge.toml or pass --name")
    )]
    PackageName { path: PathBuf },

    #[error("{message}")]
    #[diagnostic(code(bridge::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("failed to parse bridge.toml")]
    #[diagnostic(code(bridge::config_error))]
    Config {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },
}

impl Error {
    /// Create a source-not-found error
    pub fn source_not_found(path: impl Into<PathBuf>) -> Box<Self> {
        Box::new(Error::SourceNotFound { path: path.into() })
    }

    /// Create an i/o error for the given path
    pub fn file_io(path: impl AsRef<Path>, source: std::io::Error) -> Box<Self> {
        Box::new(Error::FileIo {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }

    /// Create an unsafe-overwrite error
    pub fn unsafe_overwrite(path: impl Into<PathBuf>) -> Box<Self> {
        Box::new(Error::UnsafeOverwrite { path: path.into() })
    }

    /// Create an error for a package directory with no usable name
    pub fn package_name(path: impl Into<PathBuf>) -> Box<Self> {
        Box::new(Error::PackageName { path: path.into() })
    }

    /// Create a parse error with source context
    pub fn parse(
        message: impl Into<String>,
        src: &str,
        filename: &str,
        span: Option<SourceSpan>,
    ) -> Box<Self> {
        Box::new(Error::Parse {
            src: NamedSource::new(filename, src.to_string()),
            span,
            message: message.into(),
        })
    }

    /// Create a config error from a toml error with source context
    pub fn config(source: toml::de::Error, src: &str, filename: &str) -> Box<Self> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Config {
            src: NamedSource::new(filename, src.to_string()),
            span,
            source,
        })
    }

    /// Whether this error is the unsafe-overwrite guard firing
    pub fn is_unsafe_overwrite(&self) -> bool {
        matches!(self, Error::UnsafeOverwrite { .. })
    }
}
