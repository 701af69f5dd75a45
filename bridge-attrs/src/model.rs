use std::{
    fmt,
    path::{Path, PathBuf},
};

use indexmap::IndexSet;

/// Marks a function for export across the native/host boundary.
pub const EXPORT_ATTRIBUTE: &str = "export";
/// Lists packages the source depends on (one per param).
pub const DEPENDS_ATTRIBUTE: &str = "depends";
/// Declares which interfaces (`native`, `host`) a file exposes.
pub const INTERFACES_ATTRIBUTE: &str = "interfaces";

/// A declared target surface controlling which generator acts on a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceTag {
    /// Native callers, served by the forwarding header.
    Native,
    /// The dynamic host runtime, served by the wrapper script.
    Host,
}

impl InterfaceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Host => "host",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "native" => Some(Self::Native),
            "host" => Some(Self::Host),
            _ => None,
        }
    }
}

impl fmt::Display for InterfaceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `name` or `name = value` attribute parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    name: String,
    value: Option<String>,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// A function argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    name: String,
    ty: String,
}

impl Argument {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &str {
        &self.ty
    }
}

/// A function signature attached to an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    name: String,
    return_type: String,
    arguments: Vec<Argument>,
}

impl Function {
    pub fn new(
        name: impl Into<String>,
        return_type: impl Into<String>,
        arguments: Vec<Argument>,
    ) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            arguments,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn return_type(&self) -> &str {
        &self.return_type
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Same signature under a different name.
    pub fn renamed_to(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: self.return_type.clone(),
            arguments: self.arguments.clone(),
        }
    }

    /// Declaration text, suitable as a forward-declaration prototype.
    pub fn signature(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.return_type, self.name)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", arg.ty, arg.name)?;
        }
        f.write_str(")")
    }
}

/// A parsed source annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    function: Option<Function>,
    params: Vec<Param>,
    doc_lines: Vec<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            function: None,
            params: Vec::new(),
            doc_lines: Vec::new(),
        }
    }

    pub fn with_function(mut self, function: Function) -> Self {
        self.function = Some(function);
        self
    }

    pub fn with_param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_doc(mut self, line: impl Into<String>) -> Self {
        self.doc_lines.push(line.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn function(&self) -> Option<&Function> {
        self.function.as_ref()
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn doc_lines(&self) -> &[String] {
        &self.doc_lines
    }

    /// An exported function is an `export` attribute that carries a signature.
    pub fn is_exported_function(&self) -> bool {
        self.name == EXPORT_ATTRIBUTE && self.function.is_some()
    }

    /// View this attribute as an export, if it is one.
    pub fn as_export(&self) -> Option<Export<'_>> {
        if !self.is_exported_function() {
            return None;
        }
        let function = self.function.as_ref()?;
        let name = self
            .params
            .first()
            .map(Param::name)
            .unwrap_or_else(|| function.name());
        Some(Export {
            name,
            function,
            attribute: self,
        })
    }
}

/// An exported function together with its resolved external name.
#[derive(Debug, Clone, Copy)]
pub struct Export<'a> {
    /// The first param's name if present, else the function's own name.
    pub name: &'a str,
    pub function: &'a Function,
    pub attribute: &'a Attribute,
}

impl Export<'_> {
    /// Names starting with `.` are host-only and never forwarded natively.
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// All attributes parsed from one source file, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFileAttributes {
    source_file: PathBuf,
    attributes: Vec<Attribute>,
    prototypes: Vec<String>,
    interfaces: IndexSet<InterfaceTag>,
    declares_interfaces: bool,
}

impl SourceFileAttributes {
    pub fn new(source_file: impl Into<PathBuf>, attributes: Vec<Attribute>) -> Self {
        let prototypes = attributes
            .iter()
            .filter_map(Attribute::as_export)
            .map(|export| export.function.signature())
            .collect();

        let mut interfaces = IndexSet::new();
        let mut declares_interfaces = false;
        for attribute in attributes.iter().filter(|a| a.name() == INTERFACES_ATTRIBUTE) {
            declares_interfaces = true;
            for param in attribute.params() {
                match InterfaceTag::from_name(param.name()) {
                    Some(tag) => {
                        interfaces.insert(tag);
                    }
                    None => tracing::warn!(tag = param.name(), "ignoring unknown interface"),
                }
            }
        }

        Self {
            source_file: source_file.into(),
            attributes,
            prototypes,
            interfaces,
            declares_interfaces,
        }
    }

    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.attributes.iter()
    }

    /// Exported functions in source order.
    pub fn exports(&self) -> impl Iterator<Item = Export<'_>> {
        self.attributes.iter().filter_map(Attribute::as_export)
    }

    /// Forward declarations for every exported function.
    pub fn prototypes(&self) -> &[String] {
        &self.prototypes
    }

    /// Interfaces declared through `interfaces` attributes.
    pub fn interfaces(&self) -> &IndexSet<InterfaceTag> {
        &self.interfaces
    }

    /// Whether the file exposes `tag`. A file that declares no interfaces
    /// at all exposes only the host interface.
    pub fn has_interface(&self, tag: InterfaceTag) -> bool {
        if self.declares_interfaces {
            self.interfaces.contains(&tag)
        } else {
            tag == InterfaceTag::Host
        }
    }

    /// Params of every `depends` attribute, in order.
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .iter()
            .filter(|a| a.name() == DEPENDS_ATTRIBUTE)
            .flat_map(|a| a.params().iter().map(Param::name))
    }
}

impl<'a> IntoIterator for &'a SourceFileAttributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add() -> Function {
        Function::new(
            "add",
            "double",
            vec![Argument::new("x", "double"), Argument::new("y", "double")],
        )
    }

    #[test]
    fn test_function_display() {
        assert_eq!(add().to_string(), "double add(double x, double y)");
        assert_eq!(Function::new("now", "int", vec![]).signature(), "int now()");
    }

    #[test]
    fn test_renamed_copy_leaves_original() {
        let original = add();
        let renamed = original.renamed_to("plus");

        assert_eq!(renamed.name(), "plus");
        assert_eq!(renamed.arguments(), original.arguments());
        assert_eq!(original.name(), "add");
    }

    #[test]
    fn test_export_requires_function() {
        let bare = Attribute::new(EXPORT_ATTRIBUTE);
        assert!(!bare.is_exported_function());
        assert!(bare.as_export().is_none());

        let other = Attribute::new(DEPENDS_ATTRIBUTE).with_function(add());
        assert!(!other.is_exported_function());
        assert!(other.as_export().is_none());

        let export = Attribute::new(EXPORT_ATTRIBUTE).with_function(add());
        assert!(export.is_exported_function());
        assert!(export.as_export().is_some());
    }

    #[test]
    fn test_export_name_prefers_first_param() {
        let plain = Attribute::new(EXPORT_ATTRIBUTE).with_function(add());
        assert_eq!(plain.as_export().unwrap().name, "add");

        let renamed = Attribute::new(EXPORT_ATTRIBUTE)
            .with_function(add())
            .with_param(Param::new(".add_impl"))
            .with_param(Param::new("ignored"));
        let export = renamed.as_export().unwrap();
        assert_eq!(export.name, ".add_impl");
        assert!(export.is_hidden());
    }

    #[test]
    fn test_host_interface_implied_without_declaration() {
        let attrs = SourceFileAttributes::new(
            "a.cpp",
            vec![Attribute::new(EXPORT_ATTRIBUTE).with_function(add())],
        );

        assert!(attrs.has_interface(InterfaceTag::Host));
        assert!(!attrs.has_interface(InterfaceTag::Native));
        assert!(attrs.interfaces().is_empty());
        assert_eq!(attrs.prototypes(), ["double add(double x, double y)"]);
    }

    #[test]
    fn test_declared_interfaces_are_aggregated() {
        let attrs = SourceFileAttributes::new(
            "a.cpp",
            vec![
                Attribute::new(INTERFACES_ATTRIBUTE).with_param(Param::new("native")),
                Attribute::new(INTERFACES_ATTRIBUTE)
                    .with_param(Param::new("native"))
                    .with_param(Param::new("bogus")),
            ],
        );

        assert!(attrs.has_interface(InterfaceTag::Native));
        assert!(!attrs.has_interface(InterfaceTag::Host));
        assert_eq!(attrs.interfaces().len(), 1);
    }

    #[test]
    fn test_dependencies_flatten_params() {
        let attrs = SourceFileAttributes::new(
            "a.cpp",
            vec![
                Attribute::new(DEPENDS_ATTRIBUTE)
                    .with_param(Param::new("linalg"))
                    .with_param(Param::new("fmt")),
                Attribute::new(DEPENDS_ATTRIBUTE).with_param(Param::new("zlib")),
            ],
        );

        assert_eq!(attrs.dependencies().collect::<Vec<_>>(), ["linalg", "fmt", "zlib"]);
    }
}
