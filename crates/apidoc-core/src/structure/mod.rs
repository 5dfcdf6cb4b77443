//! Structure descriptors
//!
//! A [`StructureInfo`] describes one class-like for documentation. Each
//! facet (parent, interfaces, members and so on) is computed on first
//! request and then kept, so every later request sees the same value.
//! Type references to other class-likes go through the symbol table;
//! descriptors never own each other.

mod file;
mod member;

use std::cell::OnceCell;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::warn;

pub use file::FileModel;
pub use member::{
    ConstantInfo, MethodInfo, ParameterInfo, PropertyInfo, PropertyVisibility, TemplateInfo,
};

use crate::ast::ClassKind;
use crate::context::DocContext;
use crate::phpdoc::PhpDoc;
use crate::reflect::{ClassEntry, ReflectedClass, SourceOrigin};
use crate::resolver::{ResolveResult, TypeResolver};
use crate::symbols::StructureId;
use crate::types::VarType;
use crate::url::output_path;
use crate::util::natural_cmp;

/// Lazily described class, interface, trait or enum
#[derive(Debug)]
pub struct StructureInfo {
    id: StructureId,
    entry: Rc<ClassEntry>,
    doc: OnceCell<Rc<PhpDoc>>,
    templates: OnceCell<Vec<TemplateInfo>>,
    parent: OnceCell<Option<VarType>>,
    interfaces: OnceCell<Vec<VarType>>,
    traits: OnceCell<Vec<VarType>>,
    constants: OnceCell<Vec<ConstantInfo>>,
    properties: OnceCell<Vec<PropertyInfo>>,
    methods: OnceCell<IndexMap<String, MethodInfo>>,
}

impl StructureInfo {
    #[must_use]
    pub fn new(id: StructureId, entry: Rc<ClassEntry>) -> Self {
        Self {
            id,
            entry,
            doc: OnceCell::new(),
            templates: OnceCell::new(),
            parent: OnceCell::new(),
            interfaces: OnceCell::new(),
            traits: OnceCell::new(),
            constants: OnceCell::new(),
            properties: OnceCell::new(),
            methods: OnceCell::new(),
        }
    }

    // ==================== Identity ====================

    #[must_use]
    pub fn id(&self) -> StructureId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: StructureId) {
        self.id = id;
    }

    #[must_use]
    pub fn entry(&self) -> &Rc<ClassEntry> {
        &self.entry
    }

    /// Fully qualified name without a leading `\`
    #[must_use]
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.entry.namespace
    }

    #[must_use]
    pub fn basename(&self) -> &str {
        self.entry.basename()
    }

    #[must_use]
    pub fn kind(&self) -> ClassKind {
        self.entry.kind()
    }

    #[must_use]
    pub fn is_final(&self) -> bool {
        self.entry.decl.modifiers.is_final
    }

    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.entry.decl.modifiers.is_abstract
    }

    #[must_use]
    pub fn is_readonly(&self) -> bool {
        self.entry.decl.modifiers.is_readonly
    }

    /// Whether the structure gets a page of its own
    #[must_use]
    pub fn is_documented(&self) -> bool {
        self.entry.origin == SourceOrigin::Project
    }

    #[must_use]
    pub fn output_path(&self) -> String {
        output_path(self.name())
    }

    #[must_use]
    pub fn url(&self, ctx: &DocContext) -> Option<String> {
        ctx.url_for(self)
    }

    pub(crate) fn reflect<'c>(&self, ctx: &'c DocContext) -> ReflectedClass<'c> {
        ReflectedClass::new(ctx.registry(), Rc::clone(&self.entry))
    }

    /// Resolver bound to this structure's file and templates
    #[must_use]
    pub fn resolver<'c>(&self, ctx: &'c DocContext) -> TypeResolver<'c> {
        TypeResolver::new(ctx, &self.entry, self.doc(ctx).template_names())
    }

    // ==================== Documentation ====================

    #[must_use]
    pub fn doc(&self, ctx: &DocContext) -> Rc<PhpDoc> {
        Rc::clone(
            self.doc
                .get_or_init(|| ctx.doc(self.entry.decl.doc_comment.as_ref())),
        )
    }

    #[must_use]
    pub fn description(&self, ctx: &DocContext) -> String {
        self.doc(ctx).description()
    }

    #[must_use]
    pub fn is_deprecated(&self, ctx: &DocContext) -> bool {
        self.doc(ctx).deprecated.is_some()
    }

    pub fn templates(&self, ctx: &DocContext) -> ResolveResult<&[TemplateInfo]> {
        memoize(&self.templates, || {
            let doc = self.doc(ctx);
            TemplateInfo::from_tags(&doc.templates, &self.resolver(ctx), None)
        })
        .map(Vec::as_slice)
    }

    // ==================== Hierarchy ====================

    /// `@extends` when given, else the native parent
    ///
    /// Only classes have a parent; `@extends` on an interface lands in
    /// [`StructureInfo::interfaces`].
    pub fn parent(&self, ctx: &DocContext) -> ResolveResult<Option<&VarType>> {
        memoize(&self.parent, || {
            if self.kind() != ClassKind::Class {
                return Ok(None);
            }
            let doc = self.doc(ctx);
            let resolver = self.resolver(ctx);
            if let Some(tag) = &doc.extends {
                return resolver.resolve_from_node(&tag.ty, None).map(Some);
            }
            Ok(self
                .reflect(ctx)
                .parent_name()
                .map(|name| resolver.reference(&name, Vec::new())))
        })
        .map(Option::as_ref)
    }

    /// Declared interfaces, annotated overrides first, in natural order
    pub fn interfaces(&self, ctx: &DocContext) -> ResolveResult<&[VarType]> {
        memoize(&self.interfaces, || {
            let doc = self.doc(ctx);
            let resolver = self.resolver(ctx);
            let mut interfaces = Vec::new();

            let overrides = doc.implements.iter().chain(
                doc.extends
                    .iter()
                    .filter(|_| self.kind() == ClassKind::Interface),
            );
            for tag in overrides {
                push_unique(&mut interfaces, resolver.resolve_from_node(&tag.ty, None)?);
            }
            for name in &ctx.file_model(&self.entry).implements {
                push_unique(&mut interfaces, resolver.reference(name, Vec::new()));
            }

            interfaces.sort_by(|a, b| natural_cmp(&sort_key(a), &sort_key(b)));
            Ok(interfaces)
        })
        .map(Vec::as_slice)
    }

    /// Used traits, `@use` annotations first
    pub fn traits(&self, ctx: &DocContext) -> ResolveResult<&[VarType]> {
        memoize(&self.traits, || {
            let file = ctx.file_model(&self.entry);
            let resolver = self.resolver(ctx);
            let mut traits = Vec::new();

            for comment in file.traits.values() {
                let doc = ctx.comments().parse(Some(comment.as_str()));
                let Some(tag) = &doc.uses else {
                    continue;
                };
                let ty = resolver.resolve_from_node(&tag.ty, None)?;
                if ty.structure_id().is_some() {
                    push_unique(&mut traits, ty);
                } else {
                    warn!(structure = self.name(), uses = %ty, "ignoring @use of an unknown trait");
                }
            }
            for name in file.traits.keys() {
                push_unique(&mut traits, resolver.reference(name, Vec::new()));
            }
            Ok(traits)
        })
        .map(Vec::as_slice)
    }

    // ==================== Members ====================

    /// Constants and enum cases, own declarations first
    pub fn constants(&self, ctx: &DocContext) -> ResolveResult<&[ConstantInfo]> {
        memoize(&self.constants, || {
            self.reflect(ctx)
                .constants()
                .iter()
                .map(|constant| ConstantInfo::build(ctx, constant))
                .collect()
        })
        .map(Vec::as_slice)
    }

    pub fn properties(&self, ctx: &DocContext) -> ResolveResult<&[PropertyInfo]> {
        memoize(&self.properties, || {
            self.reflect(ctx)
                .properties()
                .iter()
                .map(|property| PropertyInfo::build(ctx, property))
                .collect()
        })
        .map(Vec::as_slice)
    }

    /// Methods keyed by name, in natural order
    pub fn methods(&self, ctx: &DocContext) -> ResolveResult<&IndexMap<String, MethodInfo>> {
        memoize(&self.methods, || {
            let class = self.reflect(ctx);
            let mut methods = class
                .methods()
                .iter()
                .map(|method| MethodInfo::build(ctx, self, &class, method))
                .collect::<ResolveResult<Vec<_>>>()?;
            methods.sort_by(|a, b| natural_cmp(&a.name, &b.name));
            Ok(methods.into_iter().map(|m| (m.name.clone(), m)).collect())
        })
    }

    pub fn method(&self, ctx: &DocContext, name: &str) -> ResolveResult<Option<&MethodInfo>> {
        let methods = self.methods(ctx)?;
        Ok(methods
            .get(name)
            .or_else(|| methods.values().find(|m| m.name.eq_ignore_ascii_case(name))))
    }
}

/// Compute a facet once; a failed computation is retried on the next call
fn memoize<'a, T>(
    cell: &'a OnceCell<T>,
    init: impl FnOnce() -> ResolveResult<T>,
) -> ResolveResult<&'a T> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = init()?;
    Ok(cell.get_or_init(|| value))
}

fn push_unique(list: &mut Vec<VarType>, ty: VarType) {
    let key = sort_key(&ty).to_ascii_lowercase();
    if !list.iter().any(|t| sort_key(t).to_ascii_lowercase() == key) {
        list.push(ty);
    }
}

fn sort_key(ty: &VarType) -> String {
    ty.name().map_or_else(|| ty.to_string(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TestProject;

    fn names(types: &[VarType]) -> Vec<String> {
        types.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_identity() {
        let ctx = TestProject::new()
            .file("src/Box.php", "<?php namespace App\\Util; final readonly class HTTPBox {}")
            .context();
        let structure = ctx.structure("App\\Util\\HTTPBox").expect("box");
        assert_eq!(structure.basename(), "HTTPBox");
        assert_eq!(structure.namespace(), "App\\Util");
        assert!(structure.is_final());
        assert!(structure.is_readonly());
        assert!(!structure.is_abstract());
        assert!(structure.is_documented());
        assert_eq!(structure.output_path(), "classes/app/util/http-box.html");
    }

    #[test]
    fn test_parent_prefers_annotation() {
        let ctx = TestProject::new()
            .file(
                "src/Models.php",
                r"<?php
                namespace App;
                /** @template T */
                class Base {}
                /** @extends Base<User> */
                class Users extends Base {}
                class User extends Base {}
                class Orphan extends \Vendor\Missing {}",
            )
            .context();
        let users = ctx.structure("App\\Users").expect("users");
        let parent = users.parent(&ctx).expect("resolves").expect("has parent");
        assert_eq!(parent.to_string(), "App\\Base<App\\User>");
        assert!(parent.structure_id().is_some());

        let user = ctx.structure("App\\User").expect("user");
        let parent = user.parent(&ctx).expect("resolves").expect("has parent");
        assert_eq!(parent.to_string(), "App\\Base");

        let orphan = ctx.structure("App\\Orphan").expect("orphan");
        let parent = orphan.parent(&ctx).expect("resolves").expect("has parent");
        assert_eq!(parent, &VarType::named("Vendor\\Missing"));
    }

    #[test]
    fn test_interfaces_are_sorted_and_deduplicated() {
        let ctx = TestProject::new()
            .file(
                "src/Name.php",
                r"<?php
                namespace App;
                /** @template T */
                interface Comparable {}
                interface Item10 {}
                interface Item2 {}
                /** @implements Comparable<string> */
                class Name implements Item10, Comparable, Item2, \Countable {}",
            )
            .context();
        let name = ctx.structure("App\\Name").expect("name");
        let interfaces = name.interfaces(&ctx).expect("resolves");
        assert_eq!(
            names(interfaces),
            vec!["App\\Comparable<string>", "App\\Item2", "App\\Item10", "Countable"]
        );
    }

    #[test]
    fn test_interface_extends_annotation() {
        let ctx = TestProject::new()
            .file(
                "src/Bag.php",
                r"<?php
                namespace App;
                /**
                 * @template T
                 * @extends \IteratorAggregate<int, T>
                 */
                interface Bag extends \IteratorAggregate {}",
            )
            .context();
        let bag = ctx.structure("App\\Bag").expect("bag");
        assert_eq!(bag.parent(&ctx).expect("resolves"), None);
        assert_eq!(
            names(bag.interfaces(&ctx).expect("resolves")),
            vec!["IteratorAggregate<int, T>"]
        );
    }

    #[test]
    fn test_templates() {
        let ctx = TestProject::new()
            .file(
                "src/Map.php",
                r"<?php
                namespace App;
                /**
                 * @template TKey of array-key
                 * @template-covariant TValue of Map<TKey, mixed> = mixed
                 */
                class Map {}",
            )
            .context();
        let map = ctx.structure("App\\Map").expect("map");
        let templates = map.templates(&ctx).expect("resolves");
        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].name, "TKey");
        assert_eq!(templates[0].variance, crate::phpdoc::Variance::Invariant);
        assert_eq!(
            templates[1].bound.as_ref().map(ToString::to_string).as_deref(),
            Some("App\\Map<TKey, mixed>")
        );
        assert_eq!(templates[1].variance, crate::phpdoc::Variance::Covariant);
        assert_eq!(templates[1].default, Some(VarType::mixed()));
    }

    #[test]
    fn test_traits_with_use_annotation() {
        let ctx = TestProject::new()
            .file(
                "src/Repo.php",
                r"<?php
                namespace App;
                /** @template T */
                trait Finds { public function find(): void {} }
                trait Saves {}
                class Repo {
                    /** @use Finds<Repo> */
                    use Finds, Saves;
                    /** @use Missing<int> */
                    use Saves;
                }",
            )
            .context();
        let repo = ctx.structure("App\\Repo").expect("repo");
        let traits = repo.traits(&ctx).expect("resolves");
        assert_eq!(names(traits), vec!["App\\Finds<App\\Repo>", "App\\Saves"]);
    }

    #[test]
    fn test_methods_in_natural_order() {
        let ctx = TestProject::new()
            .file(
                "src/Steps.php",
                r"<?php
                class Steps {
                    public function step10() {}
                    public function step2() {}
                    public function Apply() {}
                }",
            )
            .context();
        let steps = ctx.structure("Steps").expect("steps");
        let methods = steps.methods(&ctx).expect("resolves");
        assert_eq!(
            methods.keys().collect::<Vec<_>>(),
            vec!["Apply", "step2", "step10"]
        );
        assert!(steps.method(&ctx, "apply").expect("resolves").is_some());
        assert!(std::ptr::eq(
            steps.methods(&ctx).expect("resolves"),
            steps.methods(&ctx).expect("resolves")
        ));
    }
}
