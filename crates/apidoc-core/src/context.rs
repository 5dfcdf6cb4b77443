//! Run-scoped state shared by descriptors and resolvers

use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::Comment;
use crate::phpdoc::{CommentParser, PhpDoc};
use crate::reflect::{ClassEntry, ClassRegistry, SourceOrigin};
use crate::structure::{FileModel, StructureInfo};
use crate::symbols::{StructureId, SymbolTable};
use crate::types::VarType;
use crate::url::UrlResolver;

/// Everything one documentation run needs
///
/// Descriptors are created on first request and kept for the lifetime of
/// the context.
#[derive(Debug)]
pub struct DocContext {
    registry: ClassRegistry,
    symbols: RefCell<SymbolTable>,
    comments: CommentParser,
    files: RefCell<HashMap<String, Rc<FileModel>>>,
    urls: UrlResolver,
}

impl DocContext {
    #[must_use]
    pub fn new(registry: ClassRegistry, urls: UrlResolver) -> Self {
        Self {
            registry,
            symbols: RefCell::new(SymbolTable::new()),
            comments: CommentParser::new(),
            files: RefCell::new(HashMap::new()),
            urls,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    #[must_use]
    pub fn symbols(&self) -> Ref<'_, SymbolTable> {
        self.symbols.borrow()
    }

    #[must_use]
    pub fn comments(&self) -> &CommentParser {
        &self.comments
    }

    #[must_use]
    pub fn urls(&self) -> &UrlResolver {
        &self.urls
    }

    /// Descriptor of a registered class-like, created on first request
    #[must_use]
    pub fn structure(&self, name: &str) -> Option<Rc<StructureInfo>> {
        let entry = Rc::clone(self.registry.get(name)?);
        Some(self.structure_for(&entry))
    }

    /// Descriptor of `entry`, which must come from this context's registry
    #[must_use]
    pub fn structure_for(&self, entry: &Rc<ClassEntry>) -> Rc<StructureInfo> {
        self.symbols
            .borrow_mut()
            .insert_with(&entry.name, |id| StructureInfo::new(id, Rc::clone(entry)))
    }

    #[must_use]
    pub fn structure_by_id(&self, id: StructureId) -> Option<Rc<StructureInfo>> {
        self.symbols.borrow().get_by_id(id)
    }

    /// Descriptors of every documented class-like, ordered by name
    #[must_use]
    pub fn documented(&self) -> Vec<Rc<StructureInfo>> {
        let mut entries: Vec<&Rc<ClassEntry>> = self
            .registry
            .iter()
            .filter(|e| e.origin == SourceOrigin::Project)
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries.into_iter().map(|e| self.structure_for(e)).collect()
    }

    /// Source facts for `entry`, computed once
    #[must_use]
    pub fn file_model(&self, entry: &Rc<ClassEntry>) -> Rc<FileModel> {
        let key = entry.name.to_ascii_lowercase();
        if let Some(model) = self.files.borrow().get(&key) {
            return Rc::clone(model);
        }
        let model = Rc::new(FileModel::from_entry(entry, &self.registry));
        self.files.borrow_mut().insert(key, Rc::clone(&model));
        model
    }

    /// Parse a declaration's doc comment
    #[must_use]
    pub fn doc(&self, comment: Option<&Comment>) -> Rc<PhpDoc> {
        self.comments.parse(comment.map(|c| c.text.as_str()))
    }

    #[must_use]
    pub fn url_for(&self, structure: &StructureInfo) -> Option<String> {
        self.urls.resolve(
            structure.name(),
            structure.namespace(),
            structure.is_documented(),
        )
    }

    /// Link target of a type reference, if it points to a structure
    #[must_use]
    pub fn url_of(&self, ty: &VarType) -> Option<String> {
        let structure = self.structure_by_id(ty.structure_id()?)?;
        self.url_for(&structure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TestProject;

    #[test]
    fn test_structures_are_shared() {
        let ctx = TestProject::new()
            .file("src/Box.php", "<?php namespace App; class Box {}")
            .context();
        let a = ctx.structure("App\\Box").expect("box");
        let b = ctx.structure("\\app\\box").expect("box");
        assert!(Rc::ptr_eq(&a, &b));
        assert!(ctx.structure("App\\Missing").is_none());
        assert_eq!(ctx.symbols().len(), 1);
    }

    #[test]
    fn test_documented_excludes_builtins() {
        let ctx = TestProject::new()
            .file("src/b.php", "<?php class Zeta {} class Alpha {}")
            .context();
        let names: Vec<String> = ctx
            .documented()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn test_urls() {
        let ctx = TestProject::new()
            .file("src/Box.php", "<?php namespace App; class Box {}")
            .context();
        let local = ctx.structure("App\\Box").expect("box");
        assert_eq!(ctx.url_for(&local).as_deref(), Some("classes/app/box.html"));
        let builtin = ctx.structure("Countable").expect("countable");
        assert_eq!(
            ctx.url_for(&builtin).as_deref(),
            Some("https://www.php.net/manual/en/class.countable.php")
        );
    }
}
