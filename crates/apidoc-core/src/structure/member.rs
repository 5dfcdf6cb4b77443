//! Method, property, constant and parameter descriptors

use std::rc::Rc;

use crate::ast::{ClassKind, MemberModifiers, Param, Visibility};
use crate::context::DocContext;
use crate::phpdoc::{PhpDoc, TemplateTag, Variance};
use crate::reflect::{ClassEntry, ReflectedClass, ReflectedConstant, ReflectedMethod, ReflectedProperty};
use crate::resolver::{ResolveResult, TypeResolver};
use crate::types::VarType;
use crate::util::to_kebab_case;

use super::StructureInfo;

/// A template parameter declared with `@template`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInfo {
    pub name: String,
    pub bound: Option<VarType>,
    pub default: Option<VarType>,
    pub variance: Variance,
}

impl TemplateInfo {
    pub(crate) fn from_tags(
        tags: &[TemplateTag],
        resolver: &TypeResolver<'_>,
        doc: Option<&PhpDoc>,
    ) -> ResolveResult<Vec<Self>> {
        tags.iter()
            .map(|tag| {
                let bound = match &tag.bound {
                    Some(bound) => Some(resolver.resolve_from_node(bound, doc)?),
                    None => None,
                };
                let default = match &tag.default {
                    Some(default) => Some(resolver.resolve_from_node(default, doc)?),
                    None => None,
                };
                Ok(TemplateInfo {
                    name: tag.name.clone(),
                    bound,
                    default,
                    variance: tag.variance,
                })
            })
            .collect()
    }
}

/// Visibility of a property, including asymmetric write visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyVisibility {
    Public,
    Protected,
    Private,
    /// `public private(set)`
    PublicPrivateSet,
    /// `public protected(set)`
    PublicProtectedSet,
    /// `protected private(set)`
    ProtectedPrivateSet,
}

impl PropertyVisibility {
    #[must_use]
    pub fn from_modifiers(modifiers: &MemberModifiers) -> Self {
        match (modifiers.visibility(), modifiers.set_visibility) {
            (Visibility::Public, Some(Visibility::Private)) => PropertyVisibility::PublicPrivateSet,
            (Visibility::Public, Some(Visibility::Protected)) => {
                PropertyVisibility::PublicProtectedSet
            }
            (Visibility::Protected, Some(Visibility::Private)) => {
                PropertyVisibility::ProtectedPrivateSet
            }
            (Visibility::Public, _) => PropertyVisibility::Public,
            (Visibility::Protected, _) => PropertyVisibility::Protected,
            (Visibility::Private, _) => PropertyVisibility::Private,
        }
    }

    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            PropertyVisibility::Public => "public",
            PropertyVisibility::Protected => "protected",
            PropertyVisibility::Private => "private",
            PropertyVisibility::PublicPrivateSet => "public private(set)",
            PropertyVisibility::PublicProtectedSet => "public protected(set)",
            PropertyVisibility::ProtectedPrivateSet => "protected private(set)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    /// Name without the `$`
    pub name: String,
    pub position: usize,
    /// Native type, `mixed` when undeclared
    pub ty: VarType,
    /// `@param` type, else the native one
    pub doc_type: VarType,
    pub description: String,
    pub has_default: bool,
    pub default_value: Option<String>,
    pub is_passed_by_reference: bool,
    pub is_variadic: bool,
    pub is_promoted: bool,
}

impl ParameterInfo {
    fn build(
        position: usize,
        param: &Param,
        resolver: &TypeResolver<'_>,
        doc: &PhpDoc,
    ) -> ResolveResult<Self> {
        let ty = resolver.resolve_from_reflection(param.ty.as_ref());
        let tag = doc.param(&param.name.name);
        let doc_type = match tag.and_then(|t| t.ty.as_ref()) {
            Some(node) => resolver.resolve_from_node(node, Some(doc))?,
            None => ty.clone(),
        };
        Ok(ParameterInfo {
            name: param.name.name.clone(),
            position,
            ty,
            doc_type,
            description: tag.map(|t| t.description.clone()).unwrap_or_default(),
            has_default: param.default.is_some(),
            default_value: param.default.clone(),
            is_passed_by_reference: param.by_ref,
            is_variadic: param.variadic,
            is_promoted: param.promoted.is_some(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct MethodInfo {
    pub name: String,
    /// Raw doc comment
    pub comment: Option<String>,
    pub doc: Rc<PhpDoc>,
    pub visibility: Visibility,
    pub is_final: bool,
    pub is_abstract: bool,
    pub is_static: bool,
    pub returns_reference: bool,
    pub templates: Vec<TemplateInfo>,
    pub parameters: Vec<ParameterInfo>,
    /// Native return type, `mixed` when undeclared
    pub return_type: VarType,
    /// `@return` type, else the native one
    pub return_doc_type: VarType,
    pub throws: Vec<VarType>,
    /// Trait or ancestor that introduced the method
    pub declaring_origin: Option<VarType>,
    /// Interfaces declaring a method of the same name
    pub interface_origins: Vec<VarType>,
    pub declaring_class: String,
    /// HTML anchor
    pub id: String,
}

impl MethodInfo {
    pub(crate) fn build(
        ctx: &DocContext,
        structure: &StructureInfo,
        class: &ReflectedClass<'_>,
        method: &ReflectedMethod,
    ) -> ResolveResult<Self> {
        let decl = &method.method;
        let doc = ctx.doc(decl.doc_comment.as_ref());
        let resolver = member_resolver(ctx, &method.source);

        let templates = TemplateInfo::from_tags(&doc.templates, &resolver, Some(&doc))?;
        let parameters = decl
            .params
            .iter()
            .enumerate()
            .map(|(position, param)| ParameterInfo::build(position, param, &resolver, &doc))
            .collect::<ResolveResult<Vec<_>>>()?;
        let return_type = resolver.resolve_from_reflection(decl.return_type.as_ref());
        let return_doc_type = match &doc.returns {
            Some(tag) => resolver.resolve_from_node(&tag.ty, Some(&doc))?,
            None => return_type.clone(),
        };
        let throws = doc
            .throws
            .iter()
            .map(|tag| resolver.resolve_from_node(&tag.ty, Some(&doc)))
            .collect::<ResolveResult<Vec<_>>>()?;

        let declaring_origin = declaring_origin(ctx, structure, class, method)?;
        let structure_resolver = structure.resolver(ctx);
        let interface_origins = class
            .interface_names()
            .into_iter()
            .filter(|name| {
                ctx.registry()
                    .get(name)
                    .is_some_and(|entry| entry.decl.method(&method.name).is_some())
            })
            .map(|name| structure_resolver.reference(&name, Vec::new()))
            .collect();

        Ok(MethodInfo {
            id: format!("method-{}", to_kebab_case(&method.name)),
            name: method.name.clone(),
            comment: decl.doc_comment.as_ref().map(|c| c.text.clone()),
            doc,
            visibility: method.visibility,
            is_final: decl.modifiers.is_final,
            is_abstract: decl.modifiers.is_abstract || !decl.has_body,
            is_static: decl.modifiers.is_static,
            returns_reference: decl.returns_reference,
            templates,
            parameters,
            return_type,
            return_doc_type,
            throws,
            declaring_origin,
            interface_origins,
            declaring_class: method.declaring_class.clone(),
        })
    }

    #[must_use]
    pub fn description(&self) -> String {
        self.doc.description()
    }

    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        self.doc.deprecated.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct PropertyInfo {
    /// Name without the `$`
    pub name: String,
    pub comment: Option<String>,
    pub doc: Rc<PhpDoc>,
    pub visibility: PropertyVisibility,
    pub is_static: bool,
    pub is_readonly: bool,
    pub is_abstract: bool,
    pub is_final: bool,
    pub is_promoted: bool,
    pub default_value: Option<String>,
    /// `@var` type, else the native one, else `mixed`
    pub ty: VarType,
    pub native_type: Option<VarType>,
    pub declaring_class: String,
    pub id: String,
}

impl PropertyInfo {
    pub(crate) fn build(ctx: &DocContext, property: &ReflectedProperty) -> ResolveResult<Self> {
        let decl = &property.property;
        let source = &property.source;
        let doc = ctx.doc(decl.doc_comment.as_ref());
        let resolver = member_resolver(ctx, source);

        let native_type = decl
            .ty
            .as_ref()
            .map(|hint| resolver.resolve_from_reflection(Some(hint)));
        let ty = if let Some(var) = &doc.var {
            resolver.resolve_from_node(&var.ty, None)?
        } else if let Some(ty) = promoted_param_type(ctx, property, &resolver)? {
            ty
        } else {
            native_type.clone().unwrap_or_else(VarType::mixed)
        };

        Ok(PropertyInfo {
            id: format!("property-{}", to_kebab_case(&decl.name.name)),
            name: decl.name.name.clone(),
            comment: decl.doc_comment.as_ref().map(|c| c.text.clone()),
            doc,
            visibility: PropertyVisibility::from_modifiers(&decl.modifiers),
            is_static: decl.modifiers.is_static,
            is_readonly: decl.modifiers.is_readonly || source.decl.modifiers.is_readonly,
            is_abstract: decl.modifiers.is_abstract,
            is_final: decl.modifiers.is_final,
            is_promoted: property.is_promoted,
            default_value: decl.default.clone(),
            ty,
            native_type,
            declaring_class: property.declaring_class.clone(),
        })
    }

    #[must_use]
    pub fn description(&self) -> String {
        self.doc.description()
    }
}

/// `@param` type of a promoted property on its constructor
fn promoted_param_type(
    ctx: &DocContext,
    property: &ReflectedProperty,
    resolver: &TypeResolver<'_>,
) -> ResolveResult<Option<VarType>> {
    if !property.is_promoted {
        return Ok(None);
    }
    let Some(constructor) = property.source.decl.methods.iter().find(|m| m.is_constructor())
    else {
        return Ok(None);
    };
    let doc = ctx.doc(constructor.doc_comment.as_ref());
    match doc
        .param(&property.property.name.name)
        .and_then(|tag| tag.ty.as_ref())
    {
        Some(node) => Ok(Some(resolver.resolve_from_node(node, Some(&doc))?)),
        None => Ok(None),
    }
}

#[derive(Debug, Clone)]
pub struct ConstantInfo {
    pub name: String,
    pub comment: Option<String>,
    pub doc: Rc<PhpDoc>,
    pub visibility: Visibility,
    pub is_final: bool,
    /// An enum case rather than a `const`
    pub is_case: bool,
    /// Value source text
    pub value: Option<String>,
    /// Native type
    pub ty: Option<VarType>,
    /// `@var` type, else the native one
    pub doc_type: Option<VarType>,
    pub declaring_class: String,
    pub id: String,
}

impl ConstantInfo {
    pub(crate) fn build(ctx: &DocContext, constant: &ReflectedConstant) -> ResolveResult<Self> {
        let doc = ctx.doc(constant.doc_comment.as_ref());
        let resolver = member_resolver(ctx, &constant.source);
        let ty = constant
            .ty
            .as_ref()
            .map(|hint| resolver.resolve_from_reflection(Some(hint)));
        let doc_type = match &doc.var {
            Some(var) => Some(resolver.resolve_from_node(&var.ty, None)?),
            None => ty.clone(),
        };
        Ok(ConstantInfo {
            id: format!("constant-{}", to_kebab_case(&constant.name)),
            name: constant.name.clone(),
            comment: constant.doc_comment.as_ref().map(|c| c.text.clone()),
            doc,
            visibility: constant.modifiers.visibility(),
            is_final: constant.modifiers.is_final,
            is_case: constant.is_case,
            value: constant.value.clone(),
            ty,
            doc_type,
            declaring_class: constant.declaring_class.clone(),
        })
    }

    #[must_use]
    pub fn description(&self) -> String {
        self.doc.description()
    }
}

/// Resolver for members physically declared in `source`
fn member_resolver<'c>(ctx: &'c DocContext, source: &Rc<ClassEntry>) -> TypeResolver<'c> {
    let templates = ctx.doc(source.decl.doc_comment.as_ref()).template_names();
    TypeResolver::new(ctx, source, templates)
}

/// The trait or ancestor a method comes from, if not `structure` itself
fn declaring_origin(
    ctx: &DocContext,
    structure: &StructureInfo,
    class: &ReflectedClass<'_>,
    method: &ReflectedMethod,
) -> ResolveResult<Option<VarType>> {
    if method.source.name.eq_ignore_ascii_case(structure.name()) {
        return Ok(None);
    }
    let traits = structure.traits(ctx)?;
    let resolver = structure.resolver(ctx);
    let listed = |name: &str| {
        traits
            .iter()
            .find(|t| t.name().is_some_and(|n| n.eq_ignore_ascii_case(name)))
            .cloned()
            .unwrap_or_else(|| resolver.reference(name, Vec::new()))
    };

    for alias in class.trait_aliases() {
        if !alias.alias.eq_ignore_ascii_case(&method.name) {
            continue;
        }
        if let Some(trait_name) = &alias.trait_name {
            return Ok(Some(listed(trait_name)));
        }
    }

    for trait_ref in traits {
        let Some(name) = trait_ref.name() else {
            continue;
        };
        let provides = ctx
            .registry()
            .reflect(name)
            .is_some_and(|t| t.has_method(&method.name));
        if provides && !class.excludes_trait_method(name, &method.name) {
            return Ok(Some(trait_ref.clone()));
        }
    }

    if method.declaring_class.eq_ignore_ascii_case(structure.name()) {
        return Ok(None);
    }
    // Inherited from an ancestor that took it from a trait
    if method.source.kind() == ClassKind::Trait {
        if let Some(declaring) = ctx.structure(&method.declaring_class) {
            let used = declaring
                .traits(ctx)?
                .iter()
                .find(|t| {
                    t.name()
                        .is_some_and(|n| n.eq_ignore_ascii_case(&method.source.name))
                })
                .cloned();
            if let Some(origin) = used {
                return Ok(Some(origin));
            }
        }
        return Ok(Some(resolver.reference(&method.source.name, Vec::new())));
    }
    Ok(Some(resolver.reference(&method.declaring_class, Vec::new())))
}
