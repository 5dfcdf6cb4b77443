//! Recursive-descent parser for docblock type expressions
//!
//! The grammar follows what PHPStan and Psalm accept in tags. Generic
//! arguments, shapes, callable parameter lists and `[]` suffixes must follow
//! their base without whitespace, so `@return array [optional]` stays a plain
//! `array` followed by description text.

use thiserror::Error;

use super::lexer::{tokenize, DocToken, DocTokenKind};
use super::types::{CallableParam, ConditionalSubject, ConstExpr, Shape, ShapeItem, TypeNode};

/// Error raised when a tag body does not contain a valid type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeParseError {
    #[error("expected {expected}, found `{found}`")]
    Unexpected {
        expected: &'static str,
        found: String,
    },
    #[error("expected {expected}, found end of tag")]
    UnexpectedEnd { expected: &'static str },
}

pub type TypeParseResult<T> = Result<T, TypeParseError>;

/// Cursor over the tokens of one tag body
pub struct TypeParser<'text> {
    text: &'text str,
    tokens: Vec<DocToken>,
    position: usize,
}

impl<'text> TypeParser<'text> {
    #[must_use]
    pub fn new(text: &'text str) -> Self {
        Self {
            text,
            tokens: tokenize(text),
            position: 0,
        }
    }

    /// Parse a complete type from `text`, ignoring whatever follows it
    pub fn parse_str(text: &str) -> TypeParseResult<TypeNode> {
        TypeParser::new(text).parse()
    }

    // ==================== Cursor ====================

    fn current(&self) -> Option<&DocToken> {
        self.tokens.get(self.position)
    }

    fn nth_kind(&self, n: usize) -> Option<DocTokenKind> {
        self.tokens.get(self.position + n).map(|t| t.kind)
    }

    #[must_use]
    pub fn check(&self, kind: DocTokenKind) -> bool {
        self.nth_kind(0) == Some(kind)
    }

    /// Same as [`check`](Self::check), but only without preceding whitespace
    fn check_adjacent(&self, kind: DocTokenKind) -> bool {
        self.current().is_some_and(|t| t.kind == kind && !t.spaced)
    }

    fn check_word(&self, word: &str) -> bool {
        self.current().is_some_and(|t| {
            t.kind == DocTokenKind::Identifier && self.slice(t).eq_ignore_ascii_case(word)
        })
    }

    fn advance(&mut self) -> Option<DocToken> {
        let token = self.current().copied();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    pub fn eat(&mut self, kind: DocTokenKind) -> bool {
        if self.check(kind) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: DocTokenKind, expected: &'static str) -> TypeParseResult<DocToken> {
        if self.check(kind) {
            if let Some(token) = self.advance() {
                return Ok(token);
            }
        }
        Err(self.error(expected))
    }

    fn error(&self, expected: &'static str) -> TypeParseError {
        match self.current() {
            Some(token) => TypeParseError::Unexpected {
                expected,
                found: self.slice(token).to_string(),
            },
            None => TypeParseError::UnexpectedEnd { expected },
        }
    }

    fn slice(&self, token: &DocToken) -> &'text str {
        &self.text[token.start..token.end]
    }

    /// Consume a `$variable`, returning it with its `$`
    pub fn eat_variable(&mut self) -> Option<String> {
        if self.check(DocTokenKind::Variable) || self.check(DocTokenKind::This) {
            let token = self.advance()?;
            return Some(self.slice(&token).to_string());
        }
        None
    }

    /// Consume an identifier, returning its text
    pub fn eat_identifier(&mut self) -> Option<String> {
        if self.check(DocTokenKind::Identifier) {
            let token = self.advance()?;
            return Some(self.slice(&token).to_string());
        }
        None
    }

    /// Consume the given keyword (`of`, `as`, ...)
    pub fn eat_word(&mut self, word: &str) -> bool {
        if self.check_word(word) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Unparsed remainder of the tag body, trimmed
    #[must_use]
    pub fn rest(&self) -> &'text str {
        match self.current() {
            Some(token) => self.text[token.start..].trim(),
            None => "",
        }
    }

    /// True when a variable is next, possibly behind `&` and `...`
    #[must_use]
    pub fn at_parameter(&self) -> bool {
        let mut n = 0;
        if self.nth_kind(n) == Some(DocTokenKind::Ampersand) {
            n += 1;
        }
        if self.nth_kind(n) == Some(DocTokenKind::Variadic) {
            n += 1;
        }
        matches!(
            self.nth_kind(n),
            Some(DocTokenKind::Variable | DocTokenKind::This)
        )
    }

    // ==================== Types ====================

    /// Parse a full type: unions, intersections and conditional types
    pub fn parse(&mut self) -> TypeParseResult<TypeNode> {
        if self.check(DocTokenKind::Variable)
            && self.tokens.get(self.position + 1).is_some_and(|t| {
                t.kind == DocTokenKind::Identifier && self.slice(t).eq_ignore_ascii_case("is")
            })
        {
            let subject = self.eat_variable().unwrap_or_default();
            return self.conditional(ConditionalSubject::Parameter(subject));
        }

        if self.eat(DocTokenKind::Nullable) {
            let inner = self.postfix_atomic()?;
            return Ok(TypeNode::Nullable(Box::new(inner)));
        }

        let first = self.postfix_atomic()?;

        if self.check_word("is") {
            let saved = self.position;
            match self.conditional(ConditionalSubject::Type(Box::new(first.clone()))) {
                Ok(conditional) => return Ok(conditional),
                Err(_) => self.position = saved,
            }
        }

        if self.check(DocTokenKind::Pipe) {
            let mut members = vec![first];
            while self.eat(DocTokenKind::Pipe) {
                members.push(self.postfix_atomic()?);
            }
            return Ok(TypeNode::Union(members));
        }

        if self.intersection_continues() {
            let mut members = vec![first];
            while self.intersection_continues() {
                self.advance();
                members.push(self.postfix_atomic()?);
            }
            return Ok(TypeNode::Intersection(members));
        }

        Ok(first)
    }

    /// `&` that joins types rather than marking a by-reference parameter
    fn intersection_continues(&self) -> bool {
        self.check(DocTokenKind::Ampersand)
            && !matches!(
                self.nth_kind(1),
                None | Some(DocTokenKind::Variable | DocTokenKind::Variadic | DocTokenKind::This)
            )
    }

    /// `is [not] Target ? IfTrue : IfFalse`
    fn conditional(&mut self, subject: ConditionalSubject) -> TypeParseResult<TypeNode> {
        if !self.eat_word("is") {
            return Err(self.error("`is`"));
        }
        let negated = self.eat_word("not");
        let target = self.parse()?;
        self.expect(DocTokenKind::Nullable, "`?`")?;
        let if_true = self.parse()?;
        self.expect(DocTokenKind::Colon, "`:`")?;
        let if_false = self.parse()?;
        Ok(TypeNode::Conditional {
            subject,
            negated,
            target: Box::new(target),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
        })
    }

    /// An atomic type followed by any number of `[]` or `[Offset]` suffixes
    fn postfix_atomic(&mut self) -> TypeParseResult<TypeNode> {
        let mut ty = self.atomic()?;
        while self.check_adjacent(DocTokenKind::OpenSquare) {
            self.advance();
            if self.eat(DocTokenKind::CloseSquare) {
                ty = TypeNode::Array(Box::new(ty));
            } else {
                let offset = self.parse()?;
                self.expect(DocTokenKind::CloseSquare, "`]`")?;
                ty = TypeNode::OffsetAccess {
                    ty: Box::new(ty),
                    offset: Box::new(offset),
                };
            }
        }
        Ok(ty)
    }

    fn atomic(&mut self) -> TypeParseResult<TypeNode> {
        let Some(token) = self.current().copied() else {
            return Err(self.error("type"));
        };
        match token.kind {
            DocTokenKind::OpenParen => {
                self.advance();
                let inner = self.parse()?;
                self.expect(DocTokenKind::CloseParen, "`)`")?;
                Ok(inner)
            }
            DocTokenKind::This => {
                self.advance();
                Ok(TypeNode::This)
            }
            DocTokenKind::Integer => {
                self.advance();
                Ok(TypeNode::Const(ConstExpr::Integer(
                    self.slice(&token).to_string(),
                )))
            }
            DocTokenKind::Float => {
                self.advance();
                Ok(TypeNode::Const(ConstExpr::Float(self.slice(&token).to_string())))
            }
            DocTokenKind::QuotedString => {
                self.advance();
                Ok(TypeNode::Const(ConstExpr::String(unquote(self.slice(&token)))))
            }
            DocTokenKind::Identifier => {
                self.advance();
                let name = self.slice(&token).to_string();
                self.after_identifier(name)
            }
            _ => Err(self.error("type")),
        }
    }

    fn after_identifier(&mut self, name: String) -> TypeParseResult<TypeNode> {
        if self.check_adjacent(DocTokenKind::DoubleColon) {
            self.advance();
            let constant = if self.eat(DocTokenKind::Wildcard) {
                "*".to_string()
            } else {
                let mut constant = self
                    .eat_identifier()
                    .ok_or_else(|| self.error("constant name"))?;
                if self.check_adjacent(DocTokenKind::Wildcard) {
                    self.advance();
                    constant.push('*');
                }
                constant
            };
            return Ok(TypeNode::Const(ConstExpr::ClassConstant {
                class: name,
                name: constant,
            }));
        }

        if self.check_adjacent(DocTokenKind::OpenAngle) {
            self.advance();
            let args = self.generic_args()?;
            return Ok(TypeNode::Generic { base: name, args });
        }

        let lower = name.to_ascii_lowercase();
        if self.check_adjacent(DocTokenKind::OpenCurly) {
            if lower == "object" {
                let (items, _) = self.shape_items()?;
                return Ok(TypeNode::ObjectShape(items));
            }
            if matches!(
                lower.as_str(),
                "array" | "list" | "non-empty-array" | "non-empty-list"
            ) {
                let (items, sealed) = self.shape_items()?;
                return Ok(TypeNode::ArrayShape(Shape {
                    kind: name,
                    items,
                    sealed,
                }));
            }
        }

        if self.check_adjacent(DocTokenKind::OpenParen)
            && matches!(
                lower.trim_start_matches('\\'),
                "callable" | "closure" | "pure-callable" | "pure-closure"
            )
        {
            return self.callable(name);
        }

        Ok(TypeNode::Identifier(name))
    }

    /// Arguments after `<`, up to and including `>`
    fn generic_args(&mut self) -> TypeParseResult<Vec<TypeNode>> {
        let mut args = Vec::new();
        loop {
            if self.eat(DocTokenKind::CloseAngle) {
                break;
            }
            if self.eat(DocTokenKind::Wildcard) {
                args.push(TypeNode::identifier("mixed"));
            } else {
                // Per-argument variance annotations carry no resolution meaning
                let is_variance = (self.check_word("covariant") || self.check_word("contravariant"))
                    && self.nth_kind(1).is_some_and(|k| {
                        !matches!(k, DocTokenKind::Comma | DocTokenKind::CloseAngle)
                    });
                if is_variance {
                    self.advance();
                }
                args.push(self.parse()?);
            }
            if !self.eat(DocTokenKind::Comma) {
                self.expect(DocTokenKind::CloseAngle, "`>`")?;
                break;
            }
        }
        if args.is_empty() {
            return Err(self.error("generic argument"));
        }
        Ok(args)
    }

    /// Items between `{` and `}`; the flag is `false` for unsealed shapes
    fn shape_items(&mut self) -> TypeParseResult<(Vec<ShapeItem>, bool)> {
        self.expect(DocTokenKind::OpenCurly, "`{`")?;
        let mut items = Vec::new();
        let mut sealed = true;
        loop {
            if self.eat(DocTokenKind::CloseCurly) {
                break;
            }
            if self.eat(DocTokenKind::Variadic) {
                sealed = false;
                if self.check_adjacent(DocTokenKind::OpenAngle) {
                    self.advance();
                    self.generic_args()?;
                }
                self.eat(DocTokenKind::Comma);
                self.expect(DocTokenKind::CloseCurly, "`}`")?;
                break;
            }

            let (key, optional) = self.shape_key()?;
            let value = self.parse()?;
            items.push(ShapeItem {
                key,
                optional,
                value,
            });
            if !self.eat(DocTokenKind::Comma) {
                self.expect(DocTokenKind::CloseCurly, "`}`")?;
                break;
            }
        }
        Ok((items, sealed))
    }

    fn shape_key(&mut self) -> TypeParseResult<(Option<String>, bool)> {
        let is_key_token = matches!(
            self.nth_kind(0),
            Some(DocTokenKind::Identifier | DocTokenKind::Integer | DocTokenKind::QuotedString)
        );
        let has_key = is_key_token
            && match self.nth_kind(1) {
                Some(DocTokenKind::Colon) => true,
                Some(DocTokenKind::Nullable) => self.nth_kind(2) == Some(DocTokenKind::Colon),
                _ => false,
            };
        if !has_key {
            return Ok((None, false));
        }
        let key = self
            .advance()
            .map(|t| self.slice(&t).to_string())
            .unwrap_or_default();
        let optional = self.eat(DocTokenKind::Nullable);
        self.expect(DocTokenKind::Colon, "`:`")?;
        Ok((Some(key), optional))
    }

    /// `callable(A, B &...$rest): R`
    fn callable(&mut self, name: String) -> TypeParseResult<TypeNode> {
        self.expect(DocTokenKind::OpenParen, "`(`")?;
        let mut params = Vec::new();
        while !self.check(DocTokenKind::CloseParen) {
            let ty = self.parse()?;
            let by_ref = self.eat(DocTokenKind::Ampersand);
            let variadic = self.eat(DocTokenKind::Variadic);
            let param_name = self.eat_variable();
            let optional = self.eat(DocTokenKind::Equal);
            params.push(CallableParam {
                ty,
                by_ref,
                variadic,
                name: param_name,
                optional,
            });
            if !self.eat(DocTokenKind::Comma) {
                break;
            }
        }
        self.expect(DocTokenKind::CloseParen, "`)`")?;

        let return_type = if self.eat(DocTokenKind::Colon) {
            if self.eat(DocTokenKind::Nullable) {
                TypeNode::Nullable(Box::new(self.postfix_atomic()?))
            } else {
                self.postfix_atomic()?
            }
        } else {
            TypeNode::identifier("mixed")
        };

        Ok(TypeNode::Callable {
            name,
            params,
            return_type: Box::new(return_type),
        })
    }
}

fn unquote(text: &str) -> String {
    let inner = if text.len() >= 2 {
        &text[1..text.len() - 1]
    } else {
        text
    };
    inner.replace("\\'", "'").replace("\\\"", "\"")
}
