//! Attribute model for exportbridge.
//!
//! Source files are reduced to an ordered sequence of [`Attribute`]s by an
//! [`AttributeParser`]. The generators only ever see the resulting
//! [`SourceFileAttributes`]; how the annotations are spelled in source is the
//! parser's business. [`CommentScanner`] is a small line-oriented parser for
//! `// [[export]]` style annotations.

mod model;
mod parser;
mod scanner;

pub use model::{
    Argument, Attribute, DEPENDS_ATTRIBUTE, EXPORT_ATTRIBUTE, Export, Function,
    INTERFACES_ATTRIBUTE, InterfaceTag, Param, SourceFileAttributes,
};
pub use parser::{AttributeParser, StaticParser};
pub use scanner::CommentScanner;
