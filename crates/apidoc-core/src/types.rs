//! Resolved type references
//!
//! A [`VarType`] is what the resolver produces from a docblock type or a
//! native type declaration. References to known class-likes carry the
//! [`StructureId`] of their descriptor in the symbol table rather than the
//! descriptor itself, so the descriptor graph stays acyclic.

use std::fmt::{self, Display, Formatter};

use crate::symbols::StructureId;

/// A fully resolved type reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VarType {
    /// Scalar, pseudo-type or unknown name, possibly with generic arguments
    Named { name: String, generics: Vec<VarType> },
    /// Reference to a known class-like
    Structure {
        id: StructureId,
        name: String,
        generics: Vec<VarType>,
    },
    /// Template parameter bound on the enclosing structure or method
    Template(String),
    Union(Vec<VarType>),
    Intersection(Vec<VarType>),
    Callable {
        name: Box<VarType>,
        parameters: Vec<ParameterVarType>,
        return_type: Box<VarType>,
    },
    Conditional {
        variable: String,
        match_type: Box<VarType>,
        true_type: Box<VarType>,
        false_type: Box<VarType>,
    },
}

/// One parameter of a callable type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterVarType {
    pub ty: VarType,
    pub by_reference: bool,
    pub is_variadic: bool,
}

impl VarType {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        VarType::Named {
            name: name.into(),
            generics: Vec::new(),
        }
    }

    #[must_use]
    pub fn mixed() -> Self {
        Self::named("mixed")
    }

    #[must_use]
    pub fn null() -> Self {
        Self::named("null")
    }

    /// Name of a named, structure or template reference
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            VarType::Named { name, .. }
            | VarType::Structure { name, .. }
            | VarType::Template(name) => Some(name),
            _ => None,
        }
    }

    #[must_use]
    pub fn generics(&self) -> &[VarType] {
        match self {
            VarType::Named { generics, .. } | VarType::Structure { generics, .. } => generics,
            _ => &[],
        }
    }

    #[must_use]
    pub fn structure_id(&self) -> Option<StructureId> {
        match self {
            VarType::Structure { id, .. } => Some(*id),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_template(&self) -> bool {
        matches!(self, VarType::Template(_))
    }

    /// Visit this type and every type nested in it, depth first
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a VarType)) {
        visit(self);
        match self {
            VarType::Named { generics, .. } | VarType::Structure { generics, .. } => {
                for generic in generics {
                    generic.walk(visit);
                }
            }
            VarType::Template(_) => {}
            VarType::Union(members) | VarType::Intersection(members) => {
                for member in members {
                    member.walk(visit);
                }
            }
            VarType::Callable {
                name,
                parameters,
                return_type,
            } => {
                name.walk(visit);
                for parameter in parameters {
                    parameter.ty.walk(visit);
                }
                return_type.walk(visit);
            }
            VarType::Conditional {
                match_type,
                true_type,
                false_type,
                ..
            } => {
                match_type.walk(visit);
                true_type.walk(visit);
                false_type.walk(visit);
            }
        }
    }

    fn is_compound(&self) -> bool {
        matches!(
            self,
            VarType::Union(_) | VarType::Intersection(_) | VarType::Conditional { .. }
        )
    }
}

fn write_generics(f: &mut Formatter<'_>, generics: &[VarType]) -> fmt::Result {
    if generics.is_empty() {
        return Ok(());
    }
    f.write_str("<")?;
    for (i, generic) in generics.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{generic}")?;
    }
    f.write_str(">")
}

fn write_members(f: &mut Formatter<'_>, members: &[VarType], separator: &str) -> fmt::Result {
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        if member.is_compound() {
            write!(f, "({member})")?;
        } else {
            write!(f, "{member}")?;
        }
    }
    Ok(())
}

impl Display for VarType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            VarType::Named { name, generics } | VarType::Structure { name, generics, .. } => {
                f.write_str(name)?;
                write_generics(f, generics)
            }
            VarType::Template(name) => f.write_str(name),
            VarType::Union(members) => write_members(f, members, "|"),
            VarType::Intersection(members) => write_members(f, members, "&"),
            VarType::Callable {
                name,
                parameters,
                return_type,
            } => {
                write!(f, "{name}(")?;
                for (i, parameter) in parameters.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{parameter}")?;
                }
                write!(f, "): {return_type}")
            }
            VarType::Conditional {
                variable,
                match_type,
                true_type,
                false_type,
            } => write!(f, "({variable} is {match_type} ? {true_type} : {false_type})"),
        }
    }
}

impl Display for ParameterVarType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ty)?;
        if self.by_reference {
            f.write_str(" &")?;
        }
        if self.is_variadic {
            f.write_str(if self.by_reference { "..." } else { " ..." })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let union = VarType::Union(vec![
            VarType::named("int"),
            VarType::Intersection(vec![VarType::named("A"), VarType::named("B")]),
        ]);
        assert_eq!(union.to_string(), "int|(A&B)");

        let generic = VarType::Named {
            name: "array".into(),
            generics: vec![VarType::named("int"), VarType::Template("T".into())],
        };
        assert_eq!(generic.to_string(), "array<int, T>");

        let callable = VarType::Callable {
            name: Box::new(VarType::named("callable")),
            parameters: vec![ParameterVarType {
                ty: VarType::named("int"),
                by_reference: true,
                is_variadic: true,
            }],
            return_type: Box::new(VarType::named("void")),
        };
        assert_eq!(callable.to_string(), "callable(int &...): void");
    }

    #[test]
    fn test_walk_visits_nested_types() {
        let ty = VarType::Named {
            name: "array".into(),
            generics: vec![VarType::Union(vec![
                VarType::Template("T".into()),
                VarType::null(),
            ])],
        };
        let mut names = Vec::new();
        ty.walk(&mut |t| {
            if let Some(name) = t.name() {
                names.push(name);
            }
        });
        assert_eq!(names, vec!["array", "T", "null"]);
    }
}
