//! Type expressions found in docblocks

use std::fmt::{self, Display, Formatter, Write as _};

/// A parsed docblock type, before name resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNode {
    /// `int`, `Foo\Bar`, `class-string`
    Identifier(String),
    /// `array<int, string>`
    Generic { base: String, args: Vec<TypeNode> },
    Union(Vec<TypeNode>),
    Intersection(Vec<TypeNode>),
    /// `?Foo`
    Nullable(Box<TypeNode>),
    /// `Foo[]`
    Array(Box<TypeNode>),
    /// `T[K]`
    OffsetAccess {
        ty: Box<TypeNode>,
        offset: Box<TypeNode>,
    },
    /// `array{a: int, b?: string}`, `list{int, int}`
    ArrayShape(Shape),
    /// `object{a: int}`
    ObjectShape(Vec<ShapeItem>),
    /// `42`, `'foo'`, `1.5`, `Foo::BAR`
    Const(ConstExpr),
    /// `$this`
    This,
    /// `$param is Foo ? A : B` or `T is Foo ? A : B`
    Conditional {
        subject: ConditionalSubject,
        negated: bool,
        target: Box<TypeNode>,
        if_true: Box<TypeNode>,
        if_false: Box<TypeNode>,
    },
    /// `callable(int, string): bool`, `Closure(): void`
    Callable {
        name: String,
        params: Vec<CallableParam>,
        return_type: Box<TypeNode>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionalSubject {
    /// `$param`, stored with its `$`
    Parameter(String),
    Type(Box<TypeNode>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstExpr {
    Integer(String),
    Float(String),
    /// Unquoted string value
    String(String),
    /// `Foo::BAR`, `Foo::BAR_*`
    ClassConstant { class: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    /// `array`, `list`, `non-empty-array`, ...
    pub kind: String,
    pub items: Vec<ShapeItem>,
    /// `false` when the shape ends with `...`
    pub sealed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeItem {
    pub key: Option<String>,
    pub optional: bool,
    pub value: TypeNode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallableParam {
    pub ty: TypeNode,
    pub by_ref: bool,
    pub variadic: bool,
    /// Parameter name with its `$`
    pub name: Option<String>,
    pub optional: bool,
}

impl TypeNode {
    #[must_use]
    pub fn identifier(name: impl Into<String>) -> Self {
        TypeNode::Identifier(name.into())
    }

    /// Base name of an identifier or generic type
    #[must_use]
    pub fn base_name(&self) -> Option<&str> {
        match self {
            TypeNode::Identifier(name) | TypeNode::Generic { base: name, .. } => Some(name),
            _ => None,
        }
    }

    fn needs_parens(&self) -> bool {
        matches!(
            self,
            TypeNode::Union(_) | TypeNode::Intersection(_) | TypeNode::Conditional { .. }
        )
    }
}

fn write_list<T: Display>(f: &mut Formatter<'_>, items: &[T], separator: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_member(f: &mut Formatter<'_>, member: &TypeNode) -> fmt::Result {
    if member.needs_parens() {
        write!(f, "({member})")
    } else {
        write!(f, "{member}")
    }
}

impl Display for TypeNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeNode::Identifier(name) => f.write_str(name),
            TypeNode::Generic { base, args } => {
                write!(f, "{base}<")?;
                write_list(f, args, ", ")?;
                f.write_char('>')
            }
            TypeNode::Union(members) | TypeNode::Intersection(members) => {
                let separator = if matches!(self, TypeNode::Union(_)) {
                    "|"
                } else {
                    "&"
                };
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(separator)?;
                    }
                    write_member(f, member)?;
                }
                Ok(())
            }
            TypeNode::Nullable(inner) => {
                f.write_char('?')?;
                write_member(f, inner)
            }
            TypeNode::Array(inner) => {
                write_member(f, inner)?;
                f.write_str("[]")
            }
            TypeNode::OffsetAccess { ty, offset } => {
                write_member(f, ty)?;
                write!(f, "[{offset}]")
            }
            TypeNode::ArrayShape(shape) => {
                write!(f, "{}{{", shape.kind)?;
                write_list(f, &shape.items, ", ")?;
                if !shape.sealed {
                    if !shape.items.is_empty() {
                        f.write_str(", ")?;
                    }
                    f.write_str("...")?;
                }
                f.write_char('}')
            }
            TypeNode::ObjectShape(items) => {
                f.write_str("object{")?;
                write_list(f, items, ", ")?;
                f.write_char('}')
            }
            TypeNode::Const(value) => write!(f, "{value}"),
            TypeNode::This => f.write_str("$this"),
            TypeNode::Conditional {
                subject,
                negated,
                target,
                if_true,
                if_false,
            } => {
                match subject {
                    ConditionalSubject::Parameter(name) => write!(f, "({name} is ")?,
                    ConditionalSubject::Type(ty) => write!(f, "({ty} is ")?,
                }
                if *negated {
                    f.write_str("not ")?;
                }
                write!(f, "{target} ? {if_true} : {if_false})")
            }
            TypeNode::Callable {
                name,
                params,
                return_type,
            } => {
                write!(f, "{name}(")?;
                write_list(f, params, ", ")?;
                f.write_str("): ")?;
                write_member(f, return_type)
            }
        }
    }
}

impl Display for ConstExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConstExpr::Integer(value) | ConstExpr::Float(value) => f.write_str(value),
            ConstExpr::String(value) => write!(f, "'{}'", value.replace('\'', "\\'")),
            ConstExpr::ClassConstant { class, name } => write!(f, "{class}::{name}"),
        }
    }
}

impl Display for ShapeItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(key) = &self.key {
            f.write_str(key)?;
            if self.optional {
                f.write_char('?')?;
            }
            f.write_str(": ")?;
        }
        write!(f, "{}", self.value)
    }
}

impl Display for CallableParam {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ty)?;
        if self.by_ref || self.variadic || self.name.is_some() {
            f.write_char(' ')?;
        }
        if self.by_ref {
            f.write_char('&')?;
        }
        if self.variadic {
            f.write_str("...")?;
        }
        if let Some(name) = &self.name {
            f.write_str(name)?;
        }
        if self.optional {
            f.write_char('=')?;
        }
        Ok(())
    }
}
