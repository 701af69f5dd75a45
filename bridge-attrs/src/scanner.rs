//! Line-oriented scanner for `// [[attribute]]` annotations.
//!
//! Recognized forms:
//!
//! ```text
//! //' Documentation attached to the next attribute
//! // [[export]]
//! // [[export(public_name)]]
//! // [[depends(linalg, fmt)]]
//! // [[interfaces(native, host)]]
//! ```
//!
//! An `export` attribute binds to the declaration that follows it, read up
//! to the first `{` or `;`.

use std::path::Path;

use exportbridge_core::{Error, FileInfo, Result, read_to_string};
use miette::SourceSpan;

use crate::{Argument, Attribute, AttributeParser, EXPORT_ATTRIBUTE, Function, Param, SourceFileAttributes};

const DOC_MARKER: &str = "//'";
const NAMESPACE_PREFIX: &str = "bridge::";

/// Reference [`AttributeParser`] reading annotations from comment lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommentScanner;

impl CommentScanner {
    pub fn new() -> Self {
        Self
    }

    /// Scan source text; `filename` is used for error reporting and as the
    /// resulting `source_file`.
    pub fn scan_str(&self, src: &str, filename: &str) -> Result<SourceFileAttributes> {
        let ctx = ScanContext { src, filename };
        let lines: Vec<(usize, &str)> = line_offsets(src).collect();

        let mut attributes = Vec::new();
        let mut docs: Vec<String> = Vec::new();

        let mut i = 0;
        while i < lines.len() {
            let (offset, line) = lines[i];
            let trimmed = line.trim();
            i += 1;

            if let Some(doc) = trimmed.strip_prefix(DOC_MARKER) {
                docs.push(doc.to_string());
                continue;
            }

            let Some(body) = attribute_body(trimmed) else {
                continue;
            };
            let span = SourceSpan::from((offset, line.len()));
            let mut attribute = ctx.parse_attribute(body, span)?;

            if attribute.name() == EXPORT_ATTRIBUTE {
                let (declaration, consumed) = declaration_after(&lines[i..])
                    .ok_or_else(|| ctx.error("export is not followed by a declaration", span))?;
                i += consumed;
                attribute = attribute.with_function(ctx.parse_signature(&declaration, span)?);
            }

            for doc in docs.drain(..) {
                attribute = attribute.with_doc(doc);
            }
            tracing::trace!(file = filename, attribute = attribute.name(), "scanned attribute");
            attributes.push(attribute);
        }

        Ok(SourceFileAttributes::new(filename, attributes))
    }
}

impl AttributeParser for CommentScanner {
    fn parse(&self, path: &Path) -> Result<SourceFileAttributes> {
        if !FileInfo::stat(path)?.exists() {
            return Err(Error::source_not_found(path));
        }
        let src = read_to_string(path)?;
        let mut attributes = self.scan_str(&src, &path.display().to_string())?;
        if attributes.source_file() != path {
            attributes = SourceFileAttributes::new(path, attributes.iter().cloned().collect());
        }
        Ok(attributes)
    }
}

struct ScanContext<'a> {
    src: &'a str,
    filename: &'a str,
}

impl ScanContext<'_> {
    fn error(&self, message: impl Into<String>, span: SourceSpan) -> Box<Error> {
        Error::parse(message, self.src, self.filename, Some(span))
    }

    fn parse_attribute(&self, body: &str, span: SourceSpan) -> Result<Attribute> {
        let (name, params) = match body.find('(') {
            Some(open) => {
                let inner = body[open + 1..]
                    .strip_suffix(')')
                    .ok_or_else(|| self.error("unclosed attribute parameter list", span))?;
                (&body[..open], Some(inner))
            }
            None => (body, None),
        };

        let name = name.trim();
        let name = name.strip_prefix(NAMESPACE_PREFIX).unwrap_or(name);
        if !is_identifier(name) {
            return Err(self.error(format!("invalid attribute name '{}'", name), span));
        }

        let mut attribute = Attribute::new(name);
        for raw in params.map(split_top_level).unwrap_or_default() {
            let param = match raw.split_once('=') {
                Some((key, value)) => Param::with_value(key.trim(), unquote(value.trim())),
                None => Param::new(unquote(raw)),
            };
            attribute = attribute.with_param(param);
        }
        Ok(attribute)
    }

    fn parse_signature(&self, declaration: &str, span: SourceSpan) -> Result<Function> {
        let open = declaration
            .find('(')
            .ok_or_else(|| self.error("exported declaration is not a function", span))?;
        let close = declaration
            .rfind(')')
            .filter(|&close| close > open)
            .ok_or_else(|| self.error("unbalanced parentheses in exported function", span))?;

        let (return_type, name) = split_trailing_identifier(&declaration[..open]);
        if name.is_empty() || return_type.is_empty() {
            return Err(self.error("exported function needs a return type and a name", span));
        }

        let mut arguments = Vec::new();
        for raw in split_top_level(&declaration[open + 1..close]) {
            let without_default = match top_level_find(raw, '=') {
                Some(eq) => raw[..eq].trim(),
                None => raw,
            };
            if without_default == "void" {
                continue;
            }
            let (ty, arg_name) = split_trailing_identifier(without_default);
            if ty.is_empty() || arg_name.is_empty() {
                return Err(self.error(format!("cannot parse argument '{}'", raw), span));
            }
            arguments.push(Argument::new(arg_name, ty));
        }

        Ok(Function::new(name, return_type, arguments))
    }
}

/// `// [[ body ]]` -> `body`
fn attribute_body(trimmed: &str) -> Option<&str> {
    let rest = trimmed.strip_prefix("//")?.trim_start();
    let body = rest.strip_prefix("[[")?.trim_end().strip_suffix("]]")?;
    Some(body.trim())
}

/// Collect the declaration following an export: skips blank lines, then joins
/// lines until a `{` or `;` terminates it. Returns the text and the number of
/// lines consumed.
fn declaration_after(lines: &[(usize, &str)]) -> Option<(String, usize)> {
    let mut text = String::new();
    for (consumed, (_, line)) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if text.is_empty() && trimmed.is_empty() {
            continue;
        }
        if let Some(end) = trimmed.find(['{', ';']) {
            text.push_str(&trimmed[..end]);
            return Some((text.trim().to_string(), consumed + 1));
        }
        text.push_str(trimmed);
        text.push(' ');
    }
    None
}

fn line_offsets(src: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    src.split_inclusive('\n').map(move |raw| {
        let start = offset;
        offset += raw.len();
        (start, raw.trim_end_matches(['\n', '\r']))
    })
}

/// Split on commas not nested inside brackets.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' | '<' | '[' | '{' => depth += 1,
            ')' | '>' | ']' | '}' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = s[start..].trim();
    if !last.is_empty() || !parts.is_empty() {
        parts.push(last);
    }
    parts
}

fn top_level_find(s: &str, needle: char) -> Option<usize> {
    let mut depth = 0i32;
    for (i, c) in s.char_indices() {
        match c {
            '(' | '<' | '[' | '{' => depth += 1,
            ')' | '>' | ']' | '}' => depth -= 1,
            c if c == needle && depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// `const std::string& name` -> (`const std::string&`, `name`)
fn split_trailing_identifier(s: &str) -> (&str, &str) {
    let s = s.trim();
    let start = s
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_alphanumeric() || *c == '_')
        .last()
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    (s[..start].trim(), &s[start..])
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InterfaceTag;

    fn scan(src: &str) -> SourceFileAttributes {
        CommentScanner::new().scan_str(src, "test.cpp").unwrap()
    }

    #[test]
    fn test_scans_export_with_signature() {
        let attrs = scan(
            r#"
#include <bridge.h>

// [[export]]
double add(double x, double y) {
    return x + y;
}
"#,
        );

        let exports: Vec<_> = attrs.exports().collect();
        assert_eq!(exports.len(), 1);
        assert_eq!(exports[0].name, "add");
        assert_eq!(
            exports[0].function.to_string(),
            "double add(double x, double y)"
        );
        assert_eq!(attrs.prototypes(), ["double add(double x, double y)"]);
    }

    #[test]
    fn test_export_rename_and_docs() {
        let attrs = scan(
            r#"
//' Sum a vector
//' @param v values
// [[bridge::export(vecsum)]]
double sum_impl(const std::vector<double>& v)
{
    return 0;
}
"#,
        );

        let export = attrs.exports().next().unwrap();
        assert_eq!(export.name, "vecsum");
        assert_eq!(export.function.name(), "sum_impl");
        assert_eq!(export.function.arguments()[0].ty(), "const std::vector<double>&");
        assert_eq!(export.attribute.doc_lines(), [" Sum a vector", " @param v values"]);
    }

    #[test]
    fn test_multiline_declaration_with_defaults() {
        let attrs = scan(
            "// [[export]]\nstd::map<int, int> build(int n = 3,\n    bool sorted = true);\n",
        );

        let function = attrs.exports().next().unwrap().function;
        assert_eq!(function.return_type(), "std::map<int, int>");
        assert_eq!(function.arguments().len(), 2);
        assert_eq!(function.arguments()[1].name(), "sorted");
        assert_eq!(function.arguments()[1].ty(), "bool");
    }

    #[test]
    fn test_interfaces_and_depends() {
        let attrs = scan(
            "// [[interfaces(native, host)]]\n// [[depends(linalg, \"fmt\")]]\nint x = 0;\n",
        );

        assert!(attrs.has_interface(InterfaceTag::Native));
        assert!(attrs.has_interface(InterfaceTag::Host));
        assert_eq!(attrs.dependencies().collect::<Vec<_>>(), ["linalg", "fmt"]);
    }

    #[test]
    fn test_void_argument_list() {
        let attrs = scan("// [[export]]\nint answer(void) { return 42; }\n");
        assert!(attrs.exports().next().unwrap().function.arguments().is_empty());
    }

    #[test]
    fn test_plain_comments_are_ignored() {
        let attrs = scan("// just a comment\nint f() { return 1; }\n");
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_dangling_export_is_an_error() {
        let err = CommentScanner::new()
            .scan_str("int f();\n// [[export]]\n", "test.cpp")
            .unwrap_err();
        assert!(matches!(*err, Error::Parse { span: Some(_), .. }));
    }

    #[test]
    fn test_export_on_variable_is_an_error() {
        let err = CommentScanner::new()
            .scan_str("// [[export]]\nint counter = 0;\n", "test.cpp")
            .unwrap_err();
        assert!(err.to_string().contains("not a function"));
    }

    #[test]
    fn test_parse_missing_file() {
        let err = CommentScanner::new()
            .parse(Path::new("/definitely/not/here.cpp"))
            .unwrap_err();
        assert!(matches!(*err, Error::SourceNotFound { .. }));
    }
}
