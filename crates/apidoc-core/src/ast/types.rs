//! Names and native type declarations

use crate::lexer::Span;

/// How a name was written in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    /// `Foo`
    Unqualified,
    /// `Foo\Bar`
    Qualified,
    /// `\Foo\Bar`
    FullyQualified,
}

/// A class name as written, before namespace resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    /// Text without a leading backslash
    pub text: String,
    pub kind: NameKind,
    pub span: Span,
}

impl Name {
    #[must_use]
    pub fn new(text: &str, span: Span) -> Self {
        let (text, kind) = if let Some(stripped) = text.strip_prefix('\\') {
            (stripped, NameKind::FullyQualified)
        } else if text.contains('\\') {
            (text, NameKind::Qualified)
        } else {
            (text, NameKind::Unqualified)
        };
        Self {
            text: text.to_string(),
            kind,
            span,
        }
    }

    /// The last segment of the name
    #[must_use]
    pub fn last_segment(&self) -> &str {
        self.text.rsplit('\\').next().unwrap_or(&self.text)
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.kind == NameKind::FullyQualified {
            f.write_str("\\")?;
        }
        f.write_str(&self.text)
    }
}

/// A native type declaration: `?Foo`, `int|string`, `(A&B)|null`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeHint {
    pub kind: TypeHintKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeHintKind {
    Named(Name),
    Nullable(Box<TypeHint>),
    Union(Vec<TypeHint>),
    Intersection(Vec<TypeHint>),
}

impl TypeHint {
    #[must_use]
    pub fn new(kind: TypeHintKind, span: Span) -> Self {
        Self { kind, span }
    }

    #[must_use]
    pub fn named(name: Name) -> Self {
        let span = name.span;
        Self::new(TypeHintKind::Named(name), span)
    }
}

impl std::fmt::Display for TypeHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            TypeHintKind::Named(name) => write!(f, "{name}"),
            TypeHintKind::Nullable(inner) => write!(f, "?{inner}"),
            TypeHintKind::Union(members) => write_joined(f, members, "|"),
            TypeHintKind::Intersection(members) => {
                write!(f, "(")?;
                write_joined(f, members, "&")?;
                write!(f, ")")
            }
        }
    }
}

fn write_joined(
    f: &mut std::fmt::Formatter<'_>,
    members: &[TypeHint],
    separator: &str,
) -> std::fmt::Result {
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{member}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_kinds() {
        assert_eq!(Name::new("Foo", Span::default()).kind, NameKind::Unqualified);
        assert_eq!(
            Name::new("Foo\\Bar", Span::default()).kind,
            NameKind::Qualified
        );
        let fq = Name::new("\\Foo\\Bar", Span::default());
        assert_eq!(fq.kind, NameKind::FullyQualified);
        assert_eq!(fq.text, "Foo\\Bar");
        assert_eq!(fq.last_segment(), "Bar");
        assert_eq!(fq.to_string(), "\\Foo\\Bar");
    }

    #[test]
    fn dnf_display() {
        let a = TypeHint::named(Name::new("A", Span::default()));
        let b = TypeHint::named(Name::new("B", Span::default()));
        let null = TypeHint::named(Name::new("null", Span::default()));
        let dnf = TypeHint::new(
            TypeHintKind::Union(vec![
                TypeHint::new(TypeHintKind::Intersection(vec![a, b]), Span::default()),
                null,
            ]),
            Span::default(),
        );
        assert_eq!(dnf.to_string(), "(A&B)|null");
    }
}
