//! Compile-time resolution of class names

use indexmap::IndexMap;

use crate::ast::{Name, NameKind, NamespaceBlock, UseKind};

/// Names that never refer to a class-like
const RESERVED: &[&str] = &[
    "array", "bool", "callable", "false", "float", "int", "iterable", "mixed", "never", "null",
    "object", "parent", "self", "static", "string", "true", "void",
];

/// Whether `name` is a scalar, pseudo-type or special class name
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

/// Namespace and class imports in effect for a declaration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameContext {
    /// Empty for the global namespace
    pub namespace: String,
    /// Alias as written to fully qualified name
    pub imports: IndexMap<String, String>,
}

impl NameContext {
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            imports: IndexMap::new(),
        }
    }

    /// Context of the declarations in `block`; function and const imports are ignored
    #[must_use]
    pub fn from_block(block: &NamespaceBlock) -> Self {
        let mut context = Self::new(block.name.clone().unwrap_or_default());
        for import in block.uses.iter().filter(|u| u.kind == UseKind::Class) {
            context.add_import(&import.alias, &import.name);
        }
        context
    }

    pub fn add_import(&mut self, alias: &str, name: &str) {
        let name = name.trim_start_matches('\\');
        self.imports.insert(alias.to_string(), name.to_string());
    }

    /// Fully qualified name imported under `alias`, case-insensitively
    #[must_use]
    pub fn import(&self, alias: &str) -> Option<&str> {
        self.imports
            .iter()
            .find(|(a, _)| a.eq_ignore_ascii_case(alias))
            .map(|(_, name)| name.as_str())
    }

    /// Prefix `name` with the current namespace
    #[must_use]
    pub fn qualify(&self, name: &str) -> String {
        if self.namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}\\{name}", self.namespace)
        }
    }

    /// Resolve a class name the way PHP does at compile time
    ///
    /// Reserved names such as `int` or `self` are returned unchanged.
    #[must_use]
    pub fn resolve_class(&self, name: &Name) -> String {
        match name.kind {
            NameKind::FullyQualified => name.text.clone(),
            NameKind::Qualified => self.resolve_qualified(&name.text),
            NameKind::Unqualified => {
                if is_reserved(&name.text) {
                    name.text.clone()
                } else if let Some(imported) = self.import(&name.text) {
                    imported.to_string()
                } else {
                    self.qualify(&name.text)
                }
            }
        }
    }

    /// Resolve a raw name as written in source, with or without a leading `\`
    #[must_use]
    pub fn resolve_str(&self, text: &str) -> String {
        self.resolve_class(&Name::new(text, crate::lexer::Span::default()))
    }

    fn resolve_qualified(&self, text: &str) -> String {
        let (first, rest) = text.split_once('\\').unwrap_or((text, ""));
        if first.eq_ignore_ascii_case("namespace") {
            return self.qualify(rest);
        }
        match self.import(first) {
            Some(imported) => format!("{imported}\\{rest}"),
            None => self.qualify(text),
        }
    }
}
