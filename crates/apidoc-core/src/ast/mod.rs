//! Declaration-level AST for PHP source files
//!
//! Only what documentation needs is modelled: namespaces, imports and
//! class-like declarations with their members. Function bodies, expressions
//! and top-level statements are skipped by the parser. Constant values and
//! parameter defaults are kept as source text.

mod comment;
mod types;

pub use comment::{join_doc_comments, Comment};
pub use types::{Name, NameKind, TypeHint, TypeHintKind};

use crate::lexer::Span;

/// A parsed PHP file
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub namespaces: Vec<NamespaceBlock>,
    pub span: Span,
}

/// Declarations sharing one namespace and import list
///
/// Files without a `namespace` statement have a single global block.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceBlock {
    /// `None` for the global namespace
    pub name: Option<String>,
    pub uses: Vec<UseImport>,
    pub classes: Vec<ClassLike>,
    pub span: Span,
}

impl NamespaceBlock {
    #[must_use]
    pub fn new(name: Option<String>, span: Span) -> Self {
        Self {
            name,
            uses: Vec::new(),
            classes: Vec::new(),
            span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseKind {
    Class,
    Function,
    Const,
}

/// One imported name: `use Foo\Bar as Baz;` yields `Foo\Bar` aliased `Baz`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseImport {
    pub kind: UseKind,
    /// Fully qualified name, without leading backslash
    pub name: String,
    pub alias: String,
    pub span: Span,
}

/// An identifier with its location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    #[must_use]
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Trait,
    Enum,
}

impl ClassKind {
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Trait => "trait",
            ClassKind::Enum => "enum",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassModifiers {
    pub is_abstract: bool,
    pub is_final: bool,
    pub is_readonly: bool,
}

/// A class, interface, trait or enum declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ClassLike {
    pub kind: ClassKind,
    pub name: Ident,
    pub modifiers: ClassModifiers,
    /// Parent class for classes; parent interfaces for interfaces
    pub extends: Vec<Name>,
    pub implements: Vec<Name>,
    /// Backing type of an enum
    pub backing_type: Option<TypeHint>,
    pub trait_uses: Vec<TraitUse>,
    pub constants: Vec<Constant>,
    pub cases: Vec<EnumCase>,
    pub properties: Vec<Property>,
    pub methods: Vec<Method>,
    pub doc_comment: Option<Comment>,
    pub span: Span,
}

impl ClassLike {
    #[must_use]
    pub fn new(kind: ClassKind, name: Ident, span: Span) -> Self {
        Self {
            kind,
            name,
            modifiers: ClassModifiers::default(),
            extends: Vec::new(),
            implements: Vec::new(),
            backing_type: None,
            trait_uses: Vec::new(),
            constants: Vec::new(),
            cases: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            doc_comment: None,
            span,
        }
    }

    /// Find a declared method, case-insensitively
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods
            .iter()
            .find(|m| m.name.name.eq_ignore_ascii_case(name))
    }
}

/// `use A, B { ... }` inside a class body
#[derive(Debug, Clone, PartialEq)]
pub struct TraitUse {
    pub traits: Vec<Name>,
    pub adaptations: Vec<TraitAdaptation>,
    /// Comments preceding the statement
    pub comments: Vec<Comment>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TraitAdaptation {
    /// `[T::]method as [visibility] [alias];`
    Alias {
        trait_name: Option<Name>,
        method: String,
        visibility: Option<Visibility>,
        alias: Option<String>,
    },
    /// `T::method insteadof A, B;`
    Precedence {
        trait_name: Name,
        method: String,
        instead_of: Vec<Name>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Visibility {
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}

/// Modifiers of a class member or promoted parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberModifiers {
    pub visibility: Option<Visibility>,
    /// Asymmetric write visibility: `private(set)`
    pub set_visibility: Option<Visibility>,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_final: bool,
    pub is_readonly: bool,
    /// Declared with `var`
    pub is_var: bool,
}

impl MemberModifiers {
    /// Effective read visibility; members default to public
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility.unwrap_or(Visibility::Public)
    }

    /// True when any modifier that promotes a constructor parameter is present
    #[must_use]
    pub fn promotes(&self) -> bool {
        self.visibility.is_some() || self.set_visibility.is_some() || self.is_readonly
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub name: Ident,
    pub ty: Option<TypeHint>,
    /// Value expression source
    pub value: String,
    pub modifiers: MemberModifiers,
    pub doc_comment: Option<Comment>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumCase {
    pub name: Ident,
    /// Backing value expression source
    pub value: Option<String>,
    pub doc_comment: Option<Comment>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Name without the `$`
    pub name: Ident,
    pub ty: Option<TypeHint>,
    pub default: Option<String>,
    pub modifiers: MemberModifiers,
    /// Declared with `{ get; set; }` hooks
    pub has_hooks: bool,
    pub doc_comment: Option<Comment>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: Ident,
    pub modifiers: MemberModifiers,
    pub params: Vec<Param>,
    pub return_type: Option<TypeHint>,
    pub returns_reference: bool,
    /// `false` for abstract and interface methods
    pub has_body: bool,
    pub doc_comment: Option<Comment>,
    pub span: Span,
}

impl Method {
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name.name.eq_ignore_ascii_case("__construct")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Name without the `$`
    pub name: Ident,
    pub ty: Option<TypeHint>,
    /// Default expression source
    pub default: Option<String>,
    pub by_ref: bool,
    pub variadic: bool,
    /// Present for promoted constructor parameters
    pub promoted: Option<MemberModifiers>,
    pub doc_comment: Option<Comment>,
    pub span: Span,
}
