//! Type reference resolution
//!
//! [`TypeResolver`] turns docblock type nodes and native type declarations
//! into [`VarType`]s. Names are looked up in this order:
//!
//! 1. an existing class-like with exactly that name
//! 2. an import alias of the declaring file (also as the first segment of a
//!    qualified name)
//! 3. a class-like of the same name in the current namespace
//! 4. the name unchanged
//!
//! A name bound as a template parameter becomes [`VarType::Template`], a
//! known class-like becomes [`VarType::Structure`] and anything else stays
//! [`VarType::Named`].

mod error;

pub use error::{ResolveError, ResolveResult};

use std::rc::Rc;

use crate::ast::{TypeHint, TypeHintKind};
use crate::context::DocContext;
use crate::phpdoc::{ConditionalSubject, ConstExpr, PhpDoc, TypeNode};
use crate::reflect::ClassEntry;
use crate::structure::FileModel;
use crate::types::{ParameterVarType, VarType};

/// Resolves types in the scope of one declaring class-like
#[derive(Debug, Clone)]
pub struct TypeResolver<'c> {
    ctx: &'c DocContext,
    entry: Rc<ClassEntry>,
    file: Rc<FileModel>,
    templates: Vec<String>,
}

impl<'c> TypeResolver<'c> {
    /// A resolver for types written inside `entry`, with `templates` bound
    #[must_use]
    pub fn new(ctx: &'c DocContext, entry: &Rc<ClassEntry>, templates: Vec<String>) -> Self {
        Self {
            ctx,
            entry: Rc::clone(entry),
            file: ctx.file_model(entry),
            templates,
        }
    }

    /// The same scope with additional template parameters bound
    #[must_use]
    pub fn with_templates(&self, names: impl IntoIterator<Item = String>) -> Self {
        let mut resolver = self.clone();
        resolver.templates.extend(names);
        resolver
    }

    #[must_use]
    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    #[must_use]
    pub fn entry(&self) -> &Rc<ClassEntry> {
        &self.entry
    }

    /// Resolve a docblock type
    ///
    /// Templates declared by `doc`, typically a method docblock, are bound
    /// in addition to the resolver's own.
    pub fn resolve_from_node(&self, node: &TypeNode, doc: Option<&PhpDoc>) -> ResolveResult<VarType> {
        let ty = match node {
            TypeNode::Identifier(name) => self.resolve_name(name, Vec::new(), doc),
            TypeNode::Generic { base, args } => {
                let generics = self.resolve_all(args, doc)?;
                self.resolve_name(base, generics, doc)
            }
            TypeNode::Union(members) => VarType::Union(self.resolve_all(members, doc)?),
            TypeNode::Intersection(members) => {
                VarType::Intersection(self.resolve_all(members, doc)?)
            }
            TypeNode::Nullable(inner) => {
                VarType::Union(vec![self.resolve_from_node(inner, doc)?, VarType::null()])
            }
            TypeNode::Array(inner) => VarType::Named {
                name: "array".to_string(),
                generics: vec![self.resolve_from_node(inner, doc)?],
            },
            TypeNode::Const(ConstExpr::Integer(value) | ConstExpr::String(value)) => {
                self.resolve_name(value, Vec::new(), doc)
            }
            TypeNode::Const(ConstExpr::Float(_)) => {
                return Err(ResolveError::unreachable("float literal type", node.to_string()));
            }
            TypeNode::Const(ConstExpr::ClassConstant { .. }) => {
                return Err(ResolveError::unreachable("class constant type", node.to_string()));
            }
            TypeNode::ArrayShape(_) | TypeNode::ObjectShape(_) => VarType::named(node.to_string()),
            TypeNode::This => VarType::named("$this"),
            TypeNode::Conditional {
                subject,
                negated,
                target,
                if_true,
                if_false,
            } => {
                let variable = match subject {
                    ConditionalSubject::Parameter(name) => name.clone(),
                    ConditionalSubject::Type(ty) => ty.to_string(),
                };
                let match_type = self.resolve_from_node(target, doc)?;
                let mut true_type = self.resolve_from_node(if_true, doc)?;
                let mut false_type = self.resolve_from_node(if_false, doc)?;
                if *negated {
                    std::mem::swap(&mut true_type, &mut false_type);
                }
                VarType::Conditional {
                    variable,
                    match_type: Box::new(match_type),
                    true_type: Box::new(true_type),
                    false_type: Box::new(false_type),
                }
            }
            TypeNode::Callable {
                name,
                params,
                return_type,
            } => {
                let callable_name = if name.trim_start_matches('\\').eq_ignore_ascii_case("Closure") {
                    self.reference("Closure", Vec::new())
                } else {
                    VarType::named(name.clone())
                };
                let parameters = params
                    .iter()
                    .map(|param| {
                        Ok(ParameterVarType {
                            ty: self.resolve_from_node(&param.ty, doc)?,
                            by_reference: param.by_ref,
                            is_variadic: param.variadic,
                        })
                    })
                    .collect::<ResolveResult<Vec<_>>>()?;
                VarType::Callable {
                    name: Box::new(callable_name),
                    parameters,
                    return_type: Box::new(self.resolve_from_node(return_type, doc)?),
                }
            }
            TypeNode::OffsetAccess { .. } => {
                return Err(ResolveError::unreachable("offset access type", node.to_string()));
            }
        };
        Ok(ty)
    }

    fn resolve_all(&self, nodes: &[TypeNode], doc: Option<&PhpDoc>) -> ResolveResult<Vec<VarType>> {
        nodes
            .iter()
            .map(|node| self.resolve_from_node(node, doc))
            .collect()
    }

    /// Resolve a native type declaration; a missing one is `mixed`
    #[must_use]
    pub fn resolve_from_reflection(&self, hint: Option<&TypeHint>) -> VarType {
        let Some(hint) = hint else {
            return VarType::mixed();
        };
        match &hint.kind {
            TypeHintKind::Named(name) => {
                let resolved = self.entry.context.resolve_class(name);
                self.reference(&resolved, Vec::new())
            }
            TypeHintKind::Nullable(inner) => VarType::Union(vec![
                self.resolve_from_reflection(Some(inner)),
                VarType::null(),
            ]),
            TypeHintKind::Union(members) => VarType::Union(
                members
                    .iter()
                    .map(|m| self.resolve_from_reflection(Some(m)))
                    .collect(),
            ),
            TypeHintKind::Intersection(members) => VarType::Intersection(
                members
                    .iter()
                    .map(|m| self.resolve_from_reflection(Some(m)))
                    .collect(),
            ),
        }
    }

    /// Resolve a name written in a docblock
    #[must_use]
    pub fn resolve_name(&self, name: &str, generics: Vec<VarType>, doc: Option<&PhpDoc>) -> VarType {
        let raw = name.trim_start_matches('\\');
        let registry = self.ctx.registry();
        let resolved = if let Some(entry) = registry.get(raw) {
            entry.name.clone()
        } else if let Some(imported) = self.expand_import(raw) {
            imported
        } else if let Some(sibling) = self.sibling(raw) {
            sibling
        } else {
            raw.to_string()
        };

        if self.is_bound(raw, doc) || self.is_bound(&resolved, doc) {
            return VarType::Template(raw.to_string());
        }
        self.reference(&resolved, generics)
    }

    /// Reference to an already qualified name
    #[must_use]
    pub fn reference(&self, name: &str, generics: Vec<VarType>) -> VarType {
        match self.ctx.registry().get(name) {
            Some(entry) => {
                let structure = self.ctx.structure_for(entry);
                VarType::Structure {
                    id: structure.id(),
                    name: entry.name.clone(),
                    generics,
                }
            }
            None => VarType::Named {
                name: name.trim_start_matches('\\').to_string(),
                generics,
            },
        }
    }

    fn expand_import(&self, name: &str) -> Option<String> {
        let (first, rest) = match name.split_once('\\') {
            Some((first, rest)) => (first, Some(rest)),
            None => (name, None),
        };
        let imported = self
            .file
            .imports
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(first))
            .map(|(_, fqn)| fqn)?;
        Some(match rest {
            Some(rest) => format!("{imported}\\{rest}"),
            None => imported.clone(),
        })
    }

    fn sibling(&self, name: &str) -> Option<String> {
        if self.file.namespace.is_empty() {
            return None;
        }
        let qualified = format!("{}\\{name}", self.file.namespace);
        self.ctx.registry().get(&qualified).map(|e| e.name.clone())
    }

    fn is_bound(&self, name: &str, doc: Option<&PhpDoc>) -> bool {
        self.templates.iter().any(|t| t == name)
            || doc.is_some_and(|doc| doc.templates.iter().any(|t| t.name == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phpdoc::TypeParser;
    use crate::testutil::TestProject;

    const SOURCE: &str = r"<?php
        namespace App\Model;

        use App\Support\Collection as Items;
        use App\Support;

        class User {}
        class T {}
    ";

    const SUPPORT: &str = r"<?php
        namespace App\Support;

        class Collection {}
        class Arr {}
    ";

    fn project() -> DocContext {
        TestProject::new()
            .file("src/Model/User.php", SOURCE)
            .file("src/Support/Collection.php", SUPPORT)
            .context()
    }

    fn resolve(ctx: &DocContext, text: &str) -> ResolveResult<VarType> {
        let entry = Rc::clone(ctx.registry().get("App\\Model\\User").expect("user"));
        let resolver = TypeResolver::new(ctx, &entry, vec!["TModel".to_string()]);
        let node = TypeParser::parse_str(text).expect("valid type");
        resolver.resolve_from_node(&node, None)
    }

    fn name_of(ty: &VarType) -> &str {
        ty.name().expect("named type")
    }

    #[test]
    fn test_union_of_scalars() {
        let ctx = project();
        assert_eq!(
            resolve(&ctx, "int|string").expect("resolves"),
            VarType::Union(vec![VarType::named("int"), VarType::named("string")])
        );
    }

    #[test]
    fn test_intersection_of_interfaces() {
        let ctx = project();
        let VarType::Intersection(members) = resolve(&ctx, "Countable&ArrayAccess").expect("ok")
        else {
            panic!("expected intersection");
        };
        assert_eq!(members.len(), 2);
        let countable = ctx.structure("Countable").expect("countable");
        assert_eq!(members[0].structure_id(), Some(countable.id()));
        assert!(matches!(&members[1], VarType::Structure { name, .. } if name == "ArrayAccess"));
    }

    #[test]
    fn test_name_resolution_rules() {
        let ctx = project();
        assert_eq!(name_of(&resolve(&ctx, "\\App\\Model\\User").expect("ok")), "App\\Model\\User");
        assert_eq!(name_of(&resolve(&ctx, "Items").expect("ok")), "App\\Support\\Collection");
        assert_eq!(name_of(&resolve(&ctx, "Support\\Arr").expect("ok")), "App\\Support\\Arr");
        assert_eq!(name_of(&resolve(&ctx, "User").expect("ok")), "App\\Model\\User");
        assert_eq!(
            resolve(&ctx, "Unknown").expect("ok"),
            VarType::named("Unknown")
        );
        let generic = resolve(&ctx, "Items<int, User>").expect("ok");
        assert!(matches!(generic, VarType::Structure { .. }));
        assert_eq!(generic.generics().len(), 2);
        assert_eq!(generic.to_string(), "App\\Support\\Collection<int, App\\Model\\User>");
    }

    #[test]
    fn test_templates_shadow_classes() {
        let ctx = project();
        assert_eq!(
            resolve(&ctx, "TModel").expect("ok"),
            VarType::Template("TModel".into())
        );

        let entry = Rc::clone(ctx.registry().get("App\\Model\\User").expect("user"));
        let resolver = TypeResolver::new(&ctx, &entry, Vec::new());
        let doc = PhpDoc::parse("/** @template T */");
        let node = TypeParser::parse_str("list<T>").expect("valid");
        let ty = resolver.resolve_from_node(&node, Some(&doc)).expect("ok");
        assert_eq!(ty.generics(), &[VarType::Template("T".into())]);

        let without = resolver.resolve_from_node(&node, None).expect("ok");
        assert!(matches!(&without.generics()[0], VarType::Structure { name, .. } if name == "App\\Model\\T"));
    }

    #[test]
    fn test_literals() {
        let ctx = project();
        assert_eq!(resolve(&ctx, "42").expect("ok"), VarType::named("42"));
        assert_eq!(resolve(&ctx, "'draft'").expect("ok"), VarType::named("draft"));
        assert!(matches!(
            resolve(&ctx, "1.5"),
            Err(ResolveError::Unreachable { what: "float literal type", .. })
        ));
        assert!(matches!(
            resolve(&ctx, "User::STATUS_*"),
            Err(ResolveError::Unreachable { .. })
        ));
        assert!(matches!(
            resolve(&ctx, "TModel['key']"),
            Err(ResolveError::Unreachable { what: "offset access type", .. })
        ));
    }

    #[test]
    fn test_raw_fallbacks() {
        let ctx = project();
        assert_eq!(
            resolve(&ctx, "array{id: int, name?: string}").expect("ok"),
            VarType::named("array{id: int, name?: string}")
        );
        assert_eq!(resolve(&ctx, "$this").expect("ok"), VarType::named("$this"));
        assert_eq!(
            resolve(&ctx, "?int").expect("ok"),
            VarType::Union(vec![VarType::named("int"), VarType::null()])
        );
        assert_eq!(
            resolve(&ctx, "User[]").expect("ok").to_string(),
            "array<App\\Model\\User>"
        );
    }

    #[test]
    fn test_conditional_negation_swaps_branches() {
        let ctx = project();
        let ty = resolve(&ctx, "($flag is not true ? int : string)").expect("ok");
        let VarType::Conditional {
            variable,
            match_type,
            true_type,
            false_type,
        } = ty
        else {
            panic!("expected conditional");
        };
        assert_eq!(variable, "$flag");
        assert_eq!(*match_type, VarType::named("true"));
        assert_eq!(*true_type, VarType::named("string"));
        assert_eq!(*false_type, VarType::named("int"));
    }

    #[test]
    fn test_closure_becomes_structure() {
        let ctx = project();
        let ty = resolve(&ctx, "Closure(int, User ...$rest): void").expect("ok");
        let VarType::Callable {
            name,
            parameters,
            return_type,
        } = ty
        else {
            panic!("expected callable");
        };
        assert!(matches!(*name, VarType::Structure { ref name, .. } if name == "Closure"));
        assert_eq!(parameters.len(), 2);
        assert!(parameters[1].is_variadic);
        assert_eq!(*return_type, VarType::named("void"));

        let plain = resolve(&ctx, "callable(): int").expect("ok");
        assert!(matches!(plain, VarType::Callable { name, .. } if *name == VarType::named("callable")));
    }

    #[test]
    fn test_native_types() {
        let ctx = project();
        let entry = Rc::clone(ctx.registry().get("App\\Model\\User").expect("user"));
        let resolver = TypeResolver::new(&ctx, &entry, Vec::new());
        assert_eq!(resolver.resolve_from_reflection(None), VarType::mixed());

        let file = crate::parser::Parser::parse_file(
            "<?php class X { function f(?Items $a, int|Support\\Arr $b, \\Countable&\\Stringable $c) {} }",
        )
        .expect("parses");
        let params = &file.namespaces[0].classes[0].methods[0].params;
        assert_eq!(
            resolver.resolve_from_reflection(params[0].ty.as_ref()).to_string(),
            "App\\Support\\Collection|null"
        );
        assert_eq!(
            resolver.resolve_from_reflection(params[1].ty.as_ref()).to_string(),
            "int|App\\Support\\Arr"
        );
        let VarType::Intersection(members) = resolver.resolve_from_reflection(params[2].ty.as_ref())
        else {
            panic!("expected intersection");
        };
        assert!(members.iter().all(|m| m.structure_id().is_some()));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let ctx = project();
        let a = resolve(&ctx, "Items").expect("ok");
        let b = resolve(&ctx, "\\App\\Support\\Collection").expect("ok");
        assert_eq!(a, b);
        let id = a.structure_id().expect("structure");
        assert!(Rc::ptr_eq(
            &ctx.structure_by_id(id).expect("registered"),
            &ctx.structure("App\\Support\\Collection").expect("registered")
        ));
    }
}
