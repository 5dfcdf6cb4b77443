//! Facts recovered from the source around a declaration

use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::join_doc_comments;
use crate::reflect::{ClassEntry, ClassRegistry, ReflectedClass};

/// Imports, native interfaces and trait-use comments of one class-like
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileModel {
    pub namespace: String,
    /// Alias to fully qualified name, for imports naming a known class-like
    /// or namespace
    pub imports: IndexMap<String, String>,
    /// Natively declared interfaces, fully qualified
    pub implements: Vec<String>,
    /// Trait name to the doc comments preceding its `use` statement
    pub traits: IndexMap<String, String>,
}

impl FileModel {
    #[must_use]
    pub fn from_entry(entry: &Rc<ClassEntry>, registry: &ClassRegistry) -> Self {
        let imports = entry
            .context
            .imports
            .iter()
            .filter(|(_, name)| is_known(registry, name))
            .map(|(alias, name)| (alias.clone(), name.clone()))
            .collect();

        let mut traits: IndexMap<String, String> = IndexMap::new();
        for trait_use in &entry.decl.trait_uses {
            let comment = join_doc_comments(&trait_use.comments);
            for name in &trait_use.traits {
                let resolved = entry.context.resolve_class(name);
                traits.entry(resolved).or_insert_with(|| comment.clone());
            }
        }

        let reflected = ReflectedClass::new(registry, Rc::clone(entry));
        Self {
            namespace: entry.namespace.clone(),
            imports,
            implements: reflected.declared_interface_names(),
            traits,
        }
    }
}

/// A class-like of that name, or a namespace containing one
fn is_known(registry: &ClassRegistry, name: &str) -> bool {
    if registry.contains(name) {
        return true;
    }
    let prefix = format!("{}\\", name.to_ascii_lowercase());
    registry
        .iter()
        .any(|entry| entry.name.to_ascii_lowercase().starts_with(&prefix))
}
