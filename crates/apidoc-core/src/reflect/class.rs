//! Flattened views of a class-like and its members

use std::collections::HashSet;
use std::rc::Rc;

use indexmap::IndexMap;

use super::{ClassEntry, ClassRegistry};
use crate::ast::{
    ClassKind, Comment, Constant, EnumCase, MemberModifiers, Method, Property, TraitAdaptation,
    TypeHint, Visibility,
};

/// A class-like seen through the registry
#[derive(Debug, Clone)]
pub struct ReflectedClass<'r> {
    registry: &'r ClassRegistry,
    entry: Rc<ClassEntry>,
}

/// A method as visible on a class
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectedMethod {
    /// Name under which the method is visible; differs from the declaration for aliases
    pub name: String,
    pub method: Method,
    pub visibility: Visibility,
    /// Declaring class in PHP's sense: trait methods belong to the using class
    pub declaring_class: String,
    /// Class-like whose source contains the method
    pub source: Rc<ClassEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReflectedProperty {
    pub property: Property,
    pub is_promoted: bool,
    pub declaring_class: String,
    pub source: Rc<ClassEntry>,
}

/// A class constant or enum case
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectedConstant {
    pub name: String,
    pub ty: Option<TypeHint>,
    /// Value source text; absent for pure enum cases
    pub value: Option<String>,
    pub modifiers: MemberModifiers,
    pub is_case: bool,
    pub doc_comment: Option<Comment>,
    pub declaring_class: String,
    pub source: Rc<ClassEntry>,
}

/// `Trait::method as alias`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitAlias {
    pub alias: String,
    /// Resolved trait name; absent when no used trait provides the method
    pub trait_name: Option<String>,
    pub method: String,
    pub visibility: Option<Visibility>,
}

/// Names of class-likes on the current inheritance path, lowercased
type Path = Vec<String>;

impl<'r> ReflectedClass<'r> {
    #[must_use]
    pub fn new(registry: &'r ClassRegistry, entry: Rc<ClassEntry>) -> Self {
        Self { registry, entry }
    }

    #[must_use]
    pub fn entry(&self) -> &Rc<ClassEntry> {
        &self.entry
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    #[must_use]
    pub fn kind(&self) -> ClassKind {
        self.entry.decl.kind
    }

    fn key(&self) -> String {
        self.entry.name.to_ascii_lowercase()
    }

    fn resolve(&self, name: &crate::ast::Name) -> String {
        self.entry.context.resolve_class(name)
    }

    // ==================== Hierarchy ====================

    /// Resolved name of the parent class
    #[must_use]
    pub fn parent_name(&self) -> Option<String> {
        if self.kind() != ClassKind::Class {
            return None;
        }
        self.entry.decl.extends.first().map(|name| self.resolve(name))
    }

    #[must_use]
    pub fn parent_class(&self) -> Option<ReflectedClass<'r>> {
        let parent = self.parent_name()?;
        let reflected = self.registry.reflect(&parent)?;
        (reflected.key() != self.key()).then_some(reflected)
    }

    /// Interfaces named in the declaration: `implements` for classes and
    /// enums, `extends` for interfaces
    #[must_use]
    pub fn declared_interface_names(&self) -> Vec<String> {
        let names = match self.kind() {
            ClassKind::Class | ClassKind::Enum => &self.entry.decl.implements,
            ClassKind::Interface => &self.entry.decl.extends,
            ClassKind::Trait => return Vec::new(),
        };
        names.iter().map(|name| self.resolve(name)).collect()
    }

    /// Every implemented interface, including inherited ones
    ///
    /// Enums implement `UnitEnum`, backed enums also `BackedEnum`.
    #[must_use]
    pub fn interface_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        self.collect_interfaces(&mut seen, &mut names);
        names
    }

    /// Declared interfaces plus the ones PHP adds to enums
    fn direct_interface_names(&self) -> Vec<String> {
        let mut names = self.declared_interface_names();
        if self.kind() == ClassKind::Enum {
            names.push("UnitEnum".to_string());
            if self.entry.decl.backing_type.is_some() {
                names.push("BackedEnum".to_string());
            }
        }
        names
    }

    fn collect_interfaces(&self, seen: &mut HashSet<String>, names: &mut Vec<String>) {
        for name in self.direct_interface_names() {
            if !seen.insert(name.to_ascii_lowercase()) {
                continue;
            }
            names.push(name.clone());
            if let Some(interface) = self.registry.reflect(&name) {
                interface.collect_interfaces(seen, names);
            }
        }
        let mut path = vec![self.key()];
        let mut parent = self.parent_class();
        while let Some(class) = parent {
            if path.contains(&class.key()) {
                break;
            }
            path.push(class.key());
            for name in class.declared_interface_names() {
                if seen.insert(name.to_ascii_lowercase()) {
                    names.push(name.clone());
                    if let Some(interface) = self.registry.reflect(&name) {
                        interface.collect_interfaces(seen, names);
                    }
                }
            }
            parent = class.parent_class();
        }
    }

    #[must_use]
    pub fn implements_interface(&self, name: &str) -> bool {
        self.interface_names()
            .iter()
            .any(|n| n.eq_ignore_ascii_case(name.trim_start_matches('\\')))
    }

    /// Directly used traits, resolved, in declaration order
    #[must_use]
    pub fn trait_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for trait_use in &self.entry.decl.trait_uses {
            for name in &trait_use.traits {
                let resolved = self.resolve(name);
                if !names.iter().any(|n| n.eq_ignore_ascii_case(&resolved)) {
                    names.push(resolved);
                }
            }
        }
        names
    }

    /// Directly used traits that are registered
    #[must_use]
    pub fn traits(&self) -> Vec<ReflectedClass<'r>> {
        self.trait_names()
            .iter()
            .filter_map(|name| self.registry.reflect(name))
            .filter(|t| t.kind() == ClassKind::Trait)
            .collect()
    }

    /// `as` adaptations of the trait-use statements
    #[must_use]
    pub fn trait_aliases(&self) -> Vec<TraitAlias> {
        let traits = self.traits();
        let mut aliases = Vec::new();
        for trait_use in &self.entry.decl.trait_uses {
            for adaptation in &trait_use.adaptations {
                let TraitAdaptation::Alias {
                    trait_name,
                    method,
                    visibility,
                    alias,
                } = adaptation
                else {
                    continue;
                };
                let trait_name = match trait_name {
                    Some(name) => Some(self.resolve(name)),
                    None => traits
                        .iter()
                        .find(|t| t.entry.decl.method(method).is_some())
                        .map(|t| t.name().to_string()),
                };
                aliases.push(TraitAlias {
                    alias: alias.clone().unwrap_or_else(|| method.clone()),
                    trait_name,
                    method: method.clone(),
                    visibility: *visibility,
                });
            }
        }
        aliases
    }

    /// Whether an `insteadof` rule excludes `method` of `trait_name`
    #[must_use]
    pub fn excludes_trait_method(&self, trait_name: &str, method: &str) -> bool {
        self.entry
            .decl
            .trait_uses
            .iter()
            .flat_map(|u| &u.adaptations)
            .any(|adaptation| match adaptation {
                TraitAdaptation::Precedence {
                    method: m,
                    instead_of,
                    ..
                } => {
                    m.eq_ignore_ascii_case(method)
                        && instead_of
                            .iter()
                            .any(|n| self.resolve(n).eq_ignore_ascii_case(trait_name))
                }
                TraitAdaptation::Alias { .. } => false,
            })
    }

    /// Whether the class-like itself declares or imports `method`
    #[must_use]
    pub fn has_method(&self, method: &str) -> bool {
        self.methods()
            .iter()
            .any(|m| m.name.eq_ignore_ascii_case(method))
    }

    // ==================== Members ====================

    /// All methods visible on the class
    ///
    /// Own methods come first, then trait-imported ones, then inherited
    /// non-private ones, then interface methods not implemented so far.
    #[must_use]
    pub fn methods(&self) -> Vec<ReflectedMethod> {
        self.collect_methods(&mut Vec::new())
    }

    fn collect_methods(&self, path: &mut Path) -> Vec<ReflectedMethod> {
        if path.contains(&self.key()) {
            return Vec::new();
        }
        path.push(self.key());

        let mut methods: IndexMap<String, ReflectedMethod> = IndexMap::new();
        for method in &self.entry.decl.methods {
            let visible = ReflectedMethod {
                name: method.name.name.clone(),
                method: method.clone(),
                visibility: method.modifiers.visibility(),
                declaring_class: self.entry.name.clone(),
                source: Rc::clone(&self.entry),
            };
            methods
                .entry(visible.name.to_ascii_lowercase())
                .or_insert(visible);
        }

        self.import_trait_methods(&mut methods, path);

        if let Some(parent) = self.parent_class() {
            for inherited in parent.collect_methods(path) {
                if inherited.visibility == Visibility::Private {
                    continue;
                }
                methods
                    .entry(inherited.name.to_ascii_lowercase())
                    .or_insert(inherited);
            }
        }

        for name in self.direct_interface_names() {
            let Some(interface) = self.registry.reflect(&name) else {
                continue;
            };
            for required in interface.collect_methods(path) {
                methods
                    .entry(required.name.to_ascii_lowercase())
                    .or_insert(required);
            }
        }

        path.pop();
        methods.into_values().collect()
    }

    fn import_trait_methods(&self, methods: &mut IndexMap<String, ReflectedMethod>, path: &mut Path) {
        let aliases = self.trait_aliases();
        for used in self.traits() {
            let provided = used.collect_methods(path);
            for method in &provided {
                if self.excludes_trait_method(used.name(), &method.name) {
                    continue;
                }
                let visibility = aliases
                    .iter()
                    .find(|a| {
                        a.alias.eq_ignore_ascii_case(&method.name)
                            && a.method.eq_ignore_ascii_case(&method.name)
                            && a.trait_name
                                .as_deref()
                                .is_some_and(|t| t.eq_ignore_ascii_case(used.name()))
                    })
                    .and_then(|a| a.visibility)
                    .unwrap_or(method.visibility);
                methods
                    .entry(method.name.to_ascii_lowercase())
                    .or_insert_with(|| ReflectedMethod {
                        visibility,
                        declaring_class: self.entry.name.clone(),
                        ..method.clone()
                    });
            }
            for alias in &aliases {
                let from_this_trait = alias
                    .trait_name
                    .as_deref()
                    .is_some_and(|t| t.eq_ignore_ascii_case(used.name()));
                if !from_this_trait || alias.alias.eq_ignore_ascii_case(&alias.method) {
                    continue;
                }
                let Some(original) = provided
                    .iter()
                    .find(|m| m.name.eq_ignore_ascii_case(&alias.method))
                else {
                    continue;
                };
                methods
                    .entry(alias.alias.to_ascii_lowercase())
                    .or_insert_with(|| ReflectedMethod {
                        name: alias.alias.clone(),
                        visibility: alias.visibility.unwrap_or(original.visibility),
                        declaring_class: self.entry.name.clone(),
                        ..original.clone()
                    });
            }
        }
    }

    /// All properties: own and promoted, then trait ones, then inherited non-private
    #[must_use]
    pub fn properties(&self) -> Vec<ReflectedProperty> {
        self.collect_properties(&mut Vec::new())
    }

    fn collect_properties(&self, path: &mut Path) -> Vec<ReflectedProperty> {
        if path.contains(&self.key()) {
            return Vec::new();
        }
        path.push(self.key());

        let mut properties: IndexMap<String, ReflectedProperty> = IndexMap::new();
        for property in &self.entry.decl.properties {
            properties
                .entry(property.name.name.clone())
                .or_insert_with(|| ReflectedProperty {
                    property: property.clone(),
                    is_promoted: false,
                    declaring_class: self.entry.name.clone(),
                    source: Rc::clone(&self.entry),
                });
        }
        if let Some(constructor) = self.entry.decl.methods.iter().find(|m| m.is_constructor()) {
            for param in &constructor.params {
                let Some(modifiers) = param.promoted else {
                    continue;
                };
                properties
                    .entry(param.name.name.clone())
                    .or_insert_with(|| ReflectedProperty {
                        property: Property {
                            name: param.name.clone(),
                            ty: param.ty.clone(),
                            default: None,
                            modifiers,
                            has_hooks: false,
                            doc_comment: param.doc_comment.clone(),
                            span: param.span,
                        },
                        is_promoted: true,
                        declaring_class: self.entry.name.clone(),
                        source: Rc::clone(&self.entry),
                    });
            }
        }

        for used in self.traits() {
            for property in used.collect_properties(path) {
                properties
                    .entry(property.property.name.name.clone())
                    .or_insert_with(|| ReflectedProperty {
                        declaring_class: self.entry.name.clone(),
                        ..property
                    });
            }
        }

        if let Some(parent) = self.parent_class() {
            for property in parent.collect_properties(path) {
                if property.property.modifiers.visibility() == Visibility::Private {
                    continue;
                }
                properties
                    .entry(property.property.name.name.clone())
                    .or_insert(property);
            }
        }

        path.pop();
        properties.into_values().collect()
    }

    /// All constants: own and enum cases, then trait ones, then inherited
    /// non-private, then interface constants
    #[must_use]
    pub fn constants(&self) -> Vec<ReflectedConstant> {
        self.collect_constants(&mut Vec::new())
    }

    fn collect_constants(&self, path: &mut Path) -> Vec<ReflectedConstant> {
        if path.contains(&self.key()) {
            return Vec::new();
        }
        path.push(self.key());

        let mut constants: IndexMap<String, ReflectedConstant> = IndexMap::new();
        for case in &self.entry.decl.cases {
            let constant = self.case_constant(case);
            constants.entry(constant.name.clone()).or_insert(constant);
        }
        for constant in &self.entry.decl.constants {
            let constant = self.own_constant(constant);
            constants.entry(constant.name.clone()).or_insert(constant);
        }

        for used in self.traits() {
            for constant in used.collect_constants(path) {
                constants
                    .entry(constant.name.clone())
                    .or_insert_with(|| ReflectedConstant {
                        declaring_class: self.entry.name.clone(),
                        ..constant
                    });
            }
        }

        if let Some(parent) = self.parent_class() {
            for constant in parent.collect_constants(path) {
                if constant.modifiers.visibility() == Visibility::Private {
                    continue;
                }
                constants.entry(constant.name.clone()).or_insert(constant);
            }
        }

        for name in self.direct_interface_names() {
            if let Some(interface) = self.registry.reflect(&name) {
                for constant in interface.collect_constants(path) {
                    constants.entry(constant.name.clone()).or_insert(constant);
                }
            }
        }

        path.pop();
        constants.into_values().collect()
    }

    fn own_constant(&self, constant: &Constant) -> ReflectedConstant {
        ReflectedConstant {
            name: constant.name.name.clone(),
            ty: constant.ty.clone(),
            value: Some(constant.value.clone()),
            modifiers: constant.modifiers,
            is_case: false,
            doc_comment: constant.doc_comment.clone(),
            declaring_class: self.entry.name.clone(),
            source: Rc::clone(&self.entry),
        }
    }

    fn case_constant(&self, case: &EnumCase) -> ReflectedConstant {
        ReflectedConstant {
            name: case.name.name.clone(),
            ty: None,
            value: case.value.clone(),
            modifiers: MemberModifiers {
                is_final: true,
                ..MemberModifiers::default()
            },
            is_case: true,
            doc_comment: case.doc_comment.clone(),
            declaring_class: self.entry.name.clone(),
            source: Rc::clone(&self.entry),
        }
    }
}
