//! Tag values and their parsers

use super::lexer::DocTokenKind;
use super::type_parser::{TypeParseError, TypeParseResult, TypeParser};
use super::types::TypeNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variance {
    Invariant,
    Covariant,
    Contravariant,
}

impl Variance {
    #[must_use]
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Variance::Invariant => None,
            Variance::Covariant => Some("covariant"),
            Variance::Contravariant => Some("contravariant"),
        }
    }
}

/// `@template T of Bound = Default`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateTag {
    pub name: String,
    pub bound: Option<TypeNode>,
    pub default: Option<TypeNode>,
    pub variance: Variance,
    pub description: String,
}

/// A tag holding one type: `@return`, `@throws`, `@extends`, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTag {
    pub ty: TypeNode,
    pub description: String,
}

/// `@param [Type] [&][...]$name description`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamTag {
    pub ty: Option<TypeNode>,
    /// Parameter name with its `$`
    pub name: String,
    pub by_ref: bool,
    pub variadic: bool,
    pub description: String,
}

/// `@param-out Type $name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamOutTag {
    pub ty: TypeNode,
    pub name: String,
    pub description: String,
}

/// `@var Type [$name] description`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarTag {
    pub ty: TypeNode,
    pub variable: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertKind {
    Always,
    IfTrue,
    IfFalse,
}

/// `@phpstan-assert[-if-true|-if-false] [!][=]Type $name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertTag {
    pub kind: AssertKind,
    pub ty: TypeNode,
    pub parameter: String,
    pub negated: bool,
    pub equality: bool,
    pub description: String,
}

/// Parsed value of a tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    Template(TemplateTag),
    Extends(TypeTag),
    Implements(TypeTag),
    Use(TypeTag),
    Param(ParamTag),
    ParamOut(ParamOutTag),
    Return(TypeTag),
    Var(VarTag),
    Throws(TypeTag),
    Deprecated(String),
    Assert(AssertTag),
    /// Any tag without a dedicated value type; holds the raw body
    Generic(String),
    /// A known tag whose body failed to parse
    Invalid { value: String, error: String },
}

/// One `@tag` of a docblock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTag {
    /// Tag name as written, without `@`
    pub name: String,
    pub value: TagValue,
}

impl DocTag {
    /// Parse the body of the tag `@name`
    #[must_use]
    pub fn parse(name: &str, body: &str) -> Self {
        let value = match parse_value(name, body) {
            Ok(value) => value,
            Err(error) => {
                tracing::debug!(tag = name, %error, "invalid tag value");
                TagValue::Invalid {
                    value: body.to_string(),
                    error: error.to_string(),
                }
            }
        };
        Self {
            name: name.to_string(),
            value,
        }
    }

    /// Whether the tag carries a `phpstan-` or `psalm-` prefix
    #[must_use]
    pub fn is_prefixed(&self) -> bool {
        strip_tool_prefix(&self.name).is_some()
    }
}

fn strip_tool_prefix(name: &str) -> Option<&str> {
    name.strip_prefix("phpstan-")
        .or_else(|| name.strip_prefix("psalm-"))
}

fn parse_value(name: &str, body: &str) -> TypeParseResult<TagValue> {
    let lower = name.to_ascii_lowercase();
    let base = strip_tool_prefix(&lower).unwrap_or(&lower);
    let mut parser = TypeParser::new(body);

    let value = match base {
        "template" => TagValue::Template(template(&mut parser, Variance::Invariant)?),
        "template-covariant" => TagValue::Template(template(&mut parser, Variance::Covariant)?),
        "template-contravariant" => {
            TagValue::Template(template(&mut parser, Variance::Contravariant)?)
        }
        "extends" | "template-extends" => TagValue::Extends(generic(&mut parser)?),
        "implements" | "template-implements" => TagValue::Implements(generic(&mut parser)?),
        "use" | "template-use" => TagValue::Use(generic(&mut parser)?),
        "param" => TagValue::Param(param(&mut parser)?),
        "param-out" => TagValue::ParamOut(param_out(&mut parser)?),
        "return" => TagValue::Return(typed(&mut parser)?),
        "var" => TagValue::Var(var(&mut parser)?),
        "throws" => TagValue::Throws(typed(&mut parser)?),
        "deprecated" => TagValue::Deprecated(body.trim().to_string()),
        "assert" => TagValue::Assert(assert(&mut parser, AssertKind::Always)?),
        "assert-if-true" => TagValue::Assert(assert(&mut parser, AssertKind::IfTrue)?),
        "assert-if-false" => TagValue::Assert(assert(&mut parser, AssertKind::IfFalse)?),
        _ => TagValue::Generic(body.trim().to_string()),
    };
    Ok(value)
}

fn template(parser: &mut TypeParser<'_>, variance: Variance) -> TypeParseResult<TemplateTag> {
    let name = parser
        .eat_identifier()
        .ok_or_else(|| missing("template name", parser))?;
    let bound = if parser.eat_word("of") || parser.eat_word("as") {
        Some(parser.parse()?)
    } else {
        None
    };
    let default = if parser.eat(DocTokenKind::Equal) {
        Some(parser.parse()?)
    } else {
        None
    };
    Ok(TemplateTag {
        name,
        bound,
        default,
        variance,
        description: parser.rest().to_string(),
    })
}

fn typed(parser: &mut TypeParser<'_>) -> TypeParseResult<TypeTag> {
    let ty = parser.parse()?;
    Ok(TypeTag {
        ty,
        description: parser.rest().to_string(),
    })
}

/// `@extends`, `@implements` and `@use` need generic arguments
fn generic(parser: &mut TypeParser<'_>) -> TypeParseResult<TypeTag> {
    let tag = typed(parser)?;
    if !matches!(tag.ty, TypeNode::Generic { .. }) {
        return Err(TypeParseError::Unexpected {
            expected: "generic type",
            found: tag.ty.to_string(),
        });
    }
    Ok(tag)
}

fn param(parser: &mut TypeParser<'_>) -> TypeParseResult<ParamTag> {
    let ty = if parser.at_parameter() {
        None
    } else {
        Some(parser.parse()?)
    };
    let by_ref = parser.eat(DocTokenKind::Ampersand);
    let variadic = parser.eat(DocTokenKind::Variadic);
    let name = parser
        .eat_variable()
        .ok_or_else(|| missing("parameter name", parser))?;
    Ok(ParamTag {
        ty,
        name,
        by_ref,
        variadic,
        description: parser.rest().to_string(),
    })
}

fn param_out(parser: &mut TypeParser<'_>) -> TypeParseResult<ParamOutTag> {
    let ty = parser.parse()?;
    parser.eat(DocTokenKind::Ampersand);
    let name = parser
        .eat_variable()
        .ok_or_else(|| missing("parameter name", parser))?;
    Ok(ParamOutTag {
        ty,
        name,
        description: parser.rest().to_string(),
    })
}

fn var(parser: &mut TypeParser<'_>) -> TypeParseResult<VarTag> {
    let ty = parser.parse()?;
    let variable = parser.eat_variable();
    Ok(VarTag {
        ty,
        variable,
        description: parser.rest().to_string(),
    })
}

fn assert(parser: &mut TypeParser<'_>, kind: AssertKind) -> TypeParseResult<AssertTag> {
    let negated = parser.eat(DocTokenKind::Negated);
    let equality = parser.eat(DocTokenKind::Equal);
    let ty = parser.parse()?;
    let parameter = parser
        .eat_variable()
        .ok_or_else(|| missing("parameter name", parser))?;
    Ok(AssertTag {
        kind,
        ty,
        parameter,
        negated,
        equality,
        description: parser.rest().to_string(),
    })
}

fn missing(expected: &'static str, parser: &TypeParser<'_>) -> TypeParseError {
    let found = parser.rest();
    if found.is_empty() {
        TypeParseError::UnexpectedEnd { expected }
    } else {
        TypeParseError::Unexpected {
            expected,
            found: found.split_whitespace().next().unwrap_or(found).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_forms() {
        let tag = DocTag::parse("template-covariant", "TValue of object = stdClass the value");
        let TagValue::Template(template) = tag.value else {
            panic!("expected template, got {:?}", tag.value);
        };
        assert_eq!(template.name, "TValue");
        assert_eq!(template.variance, Variance::Covariant);
        assert_eq!(template.bound, Some(TypeNode::identifier("object")));
        assert_eq!(template.default, Some(TypeNode::identifier("stdClass")));
        assert_eq!(template.description, "the value");

        let tag = DocTag::parse("psalm-template", "T as array-key");
        assert!(tag.is_prefixed());
        assert!(matches!(tag.value, TagValue::Template(TemplateTag { ref name, .. }) if name == "T"));
    }

    #[test]
    fn test_param_forms() {
        let TagValue::Param(param) = DocTag::parse("param", "int|null &...$values Values.").value else {
            panic!("expected param");
        };
        assert_eq!(param.name, "$values");
        assert!(param.by_ref && param.variadic);
        assert_eq!(param.description, "Values.");
        assert_eq!(param.ty.map(|t| t.to_string()).as_deref(), Some("int|null"));

        let TagValue::Param(untyped) = DocTag::parse("param", "$flag Whether.").value else {
            panic!("expected param");
        };
        assert!(untyped.ty.is_none());
        assert_eq!(untyped.name, "$flag");
    }

    #[test]
    fn test_extends_requires_generic() {
        assert!(matches!(
            DocTag::parse("extends", "Base<int>").value,
            TagValue::Extends(_)
        ));
        assert!(matches!(
            DocTag::parse("extends", "Base").value,
            TagValue::Invalid { .. }
        ));
        assert!(matches!(
            DocTag::parse("template-implements", "Comparable<string>").value,
            TagValue::Implements(_)
        ));
    }

    #[test]
    fn test_var_and_return() {
        let TagValue::Var(var) = DocTag::parse("var", "list<int> $ids The ids").value else {
            panic!("expected var");
        };
        assert_eq!(var.variable.as_deref(), Some("$ids"));
        assert_eq!(var.description, "The ids");

        let TagValue::Return(ret) = DocTag::parse("phpstan-return", "static").value else {
            panic!("expected return");
        };
        assert_eq!(ret.ty, TypeNode::identifier("static"));
        assert!(ret.description.is_empty());
    }

    #[test]
    fn test_assert() {
        let TagValue::Assert(assert) = DocTag::parse("phpstan-assert-if-true", "!null $value").value
        else {
            panic!("expected assert");
        };
        assert_eq!(assert.kind, AssertKind::IfTrue);
        assert!(assert.negated);
        assert_eq!(assert.parameter, "$value");
    }

    #[test]
    fn test_generic_and_invalid() {
        assert_eq!(
            DocTag::parse("see", " Foo::bar() ").value,
            TagValue::Generic("Foo::bar()".to_string())
        );
        let invalid = DocTag::parse("param", "int");
        assert!(matches!(invalid.value, TagValue::Invalid { ref value, .. } if value == "int"));
        assert_eq!(
            DocTag::parse("deprecated", "use other() instead").value,
            TagValue::Deprecated("use other() instead".to_string())
        );
    }
}
