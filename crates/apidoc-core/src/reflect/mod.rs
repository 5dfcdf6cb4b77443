//! Static reflection over parsed PHP sources
//!
//! The [`ClassRegistry`] indexes every class-like of a program by its fully
//! qualified name. [`ReflectedClass`] answers the questions PHP's runtime
//! reflection would: the parent, all implemented interfaces, and the full
//! member lists including inherited and trait-imported members.

mod class;
mod names;
mod stubs;

pub use class::{ReflectedClass, ReflectedConstant, ReflectedMethod, ReflectedProperty, TraitAlias};
pub use names::{is_reserved, NameContext};

use std::path::{Path, PathBuf};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::{ClassKind, ClassLike};
use crate::parser::{ParseError, Parser};

/// Where a declaration comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceOrigin {
    /// Part of the documented project
    Project,
    /// Resolved for linking, not documented
    Reference,
    /// Bundled declaration of a PHP built-in
    Builtin,
}

/// One registered class-like declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ClassEntry {
    /// Fully qualified name as declared, without leading `\`
    pub name: String,
    pub namespace: String,
    pub origin: SourceOrigin,
    pub path: PathBuf,
    pub decl: ClassLike,
    pub context: Rc<NameContext>,
}

impl ClassEntry {
    #[must_use]
    pub fn basename(&self) -> &str {
        &self.decl.name.name
    }

    #[must_use]
    pub fn kind(&self) -> ClassKind {
        self.decl.kind
    }
}

/// Index of class-likes by case-insensitive fully qualified name
#[derive(Debug, Default)]
pub struct ClassRegistry {
    entries: IndexMap<String, Rc<ClassEntry>>,
}

impl ClassRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the bundled built-in declarations
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        if let Err(errors) = registry.register_source(
            Path::new("<builtin>"),
            stubs::BUILTIN_STUBS,
            SourceOrigin::Builtin,
        ) {
            for error in errors {
                tracing::error!(%error, "invalid built-in declaration");
            }
        }
        registry
    }

    /// Parse `source` and register its class-likes
    ///
    /// The first declaration of a name wins; later ones are logged and
    /// dropped. Returns the names that were registered.
    pub fn register_source(
        &mut self,
        path: &Path,
        source: &str,
        origin: SourceOrigin,
    ) -> Result<Vec<String>, Vec<ParseError>> {
        let file = Parser::parse_file(source)?;
        let mut registered = Vec::new();
        for block in file.namespaces {
            let context = Rc::new(NameContext::from_block(&block));
            for decl in block.classes {
                let name = context.qualify(&decl.name.name);
                let key = name.to_ascii_lowercase();
                if let Some(existing) = self.entries.get(&key) {
                    tracing::warn!(
                        class = %name,
                        path = %path.display(),
                        first = %existing.path.display(),
                        "duplicate declaration ignored"
                    );
                    continue;
                }
                let entry = ClassEntry {
                    name: name.clone(),
                    namespace: context.namespace.clone(),
                    origin,
                    path: path.to_path_buf(),
                    decl,
                    context: Rc::clone(&context),
                };
                self.entries.insert(key, Rc::new(entry));
                registered.push(name);
            }
        }
        tracing::debug!(path = %path.display(), count = registered.len(), "registered source");
        Ok(registered)
    }

    /// Look up a class-like; a leading `\` is ignored
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rc<ClassEntry>> {
        let name = name.trim_start_matches('\\');
        self.entries.get(&name.to_ascii_lowercase())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[must_use]
    pub fn reflect(&self, name: &str) -> Option<ReflectedClass<'_>> {
        self.get(name)
            .map(|entry| ReflectedClass::new(self, Rc::clone(entry)))
    }

    /// Entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Rc<ClassEntry>> {
        self.entries.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
