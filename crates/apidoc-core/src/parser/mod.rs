//! Declaration parser for PHP source files
//!
//! A recursive-descent parser that extracts namespaces, imports and
//! class-like declarations from a token stream. Anything that is not a
//! declaration (function bodies, top-level statements, expressions) is
//! skipped by bracket matching; strings and heredocs are single tokens, so
//! braces inside them never confuse the matcher.
//!
//! # Example
//!
//! ```
//! use apidoc_core::parser::Parser;
//!
//! let source = "<?php namespace App; final class Box { public function get(): int {} }";
//! let file = Parser::parse_file(source).unwrap();
//! assert_eq!(file.namespaces[0].classes[0].name.name, "Box");
//! ```

mod error;

pub use error::{ExpectedToken, ParseError, ParseErrorKind};

use crate::ast::{
    ClassKind, ClassLike, Comment, Constant, EnumCase, Ident, MemberModifiers, Method, Name,
    NamespaceBlock, Param, Property, SourceFile, TraitAdaptation, TraitUse, TypeHint,
    TypeHintKind, UseImport, UseKind, Visibility,
};
use crate::lexer::{Lexer, Span, SpannedError, Token, TokenKind};

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// The PHP declaration parser
pub struct Parser<'source> {
    source: &'source str,
    tokens: Vec<Token>,
    position: usize,
    errors: Vec<ParseError>,
    lex_errors: Vec<SpannedError>,
    /// Comments between the previous significant token and the current one
    pending_comments: Vec<Comment>,
}

impl<'source> Parser<'source> {
    #[must_use]
    pub fn new(source: &'source str) -> Self {
        let (tokens, lex_errors) = Lexer::tokenize(source);
        let mut parser = Self {
            source,
            tokens,
            position: 0,
            errors: Vec::new(),
            lex_errors,
            pending_comments: Vec::new(),
        };
        parser.skip_trivia();
        parser
    }

    /// Parse a complete file
    pub fn parse_file(source: &str) -> Result<SourceFile, Vec<ParseError>> {
        let mut parser = Parser::new(source);
        let file = parser.source_file();
        if parser.errors.is_empty() {
            Ok(file)
        } else {
            Err(parser.errors)
        }
    }

    /// Lexer errors encountered while tokenizing
    #[must_use]
    pub fn lex_errors(&self) -> &[SpannedError] {
        &self.lex_errors
    }

    // ==================== Token Management ====================

    fn current(&self) -> &Token {
        // The lexer always ends the stream with Eof
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn current_kind(&self) -> TokenKind {
        self.current().kind.clone()
    }

    fn is_eof(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    /// Advance to the next significant token, collecting the comments in between
    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        self.pending_comments.clear();
        self.skip_trivia();
        token
    }

    fn skip_trivia(&mut self) {
        while self.position < self.tokens.len() && self.tokens[self.position].kind.is_trivia() {
            let token = &self.tokens[self.position];
            self.pending_comments
                .push(Comment::new(token.lexeme.clone(), token.span));
            self.position += 1;
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.check(kind.clone()) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(ExpectedToken::Token(kind)))
        }
    }

    fn unexpected(&self, expected: ExpectedToken) -> ParseError {
        if self.is_eof() {
            return ParseError::new(ParseErrorKind::UnexpectedEof, self.current().span);
        }
        ParseError::new(
            ParseErrorKind::UnexpectedToken {
                found: self.current_kind(),
                expected,
            },
            self.current().span,
        )
    }

    /// Next significant token after the current one
    fn peek(&self) -> Option<&Token> {
        self.peek_nth(1)
    }

    fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens[self.position..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(n)
    }

    fn error(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    /// The doc comment directly preceding the current token
    fn take_doc_comment(&mut self) -> Option<Comment> {
        self.pending_comments
            .iter()
            .rev()
            .find(|c| c.is_doc_comment())
            .cloned()
    }

    /// Class names, type names: `Foo`, `Foo\Bar`, `\Foo`
    fn expect_name(&mut self) -> ParseResult<Name> {
        let token = self.current().clone();
        if token.kind.is_name() {
            self.advance();
            Ok(Name::new(&token.lexeme, token.span))
        } else {
            Err(ParseError::new(ParseErrorKind::ExpectedIdentifier, token.span))
        }
    }

    fn expect_ident(&mut self) -> ParseResult<Ident> {
        let token = self.current().clone();
        if token.kind == TokenKind::Ident {
            self.advance();
            Ok(Ident::new(token.lexeme, token.span))
        } else {
            Err(ParseError::new(ParseErrorKind::ExpectedIdentifier, token.span))
        }
    }

    /// Member names may be reserved words: `function list()`, `const CLASS_NAME`
    fn expect_member_name(&mut self) -> ParseResult<Ident> {
        let token = self.current().clone();
        if token.kind == TokenKind::Ident || token.kind.is_keyword() {
            self.advance();
            Ok(Ident::new(token.lexeme, token.span))
        } else {
            Err(ParseError::new(ParseErrorKind::ExpectedIdentifier, token.span))
        }
    }

    fn expect_variable(&mut self) -> ParseResult<Ident> {
        let token = self.expect(TokenKind::Variable)?;
        let name = token.lexeme.trim_start_matches('$');
        Ok(Ident::new(name, token.span))
    }

    // ==================== Skipping ====================

    /// Skip a balanced `{ ... }` block, returning its span
    fn skip_block(&mut self) -> ParseResult<Span> {
        let open = self.expect(TokenKind::LBrace)?;
        let mut depth = 1usize;
        loop {
            match self.current_kind() {
                TokenKind::Eof => {
                    return Err(ParseError::new(ParseErrorKind::UnexpectedEof, open.span)
                        .with_hint("unclosed '{'"));
                }
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        let close = self.advance();
                        return Ok(open.span.merge(close.span));
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Skip `#[...]` attribute groups
    fn skip_attributes(&mut self) -> ParseResult<()> {
        while self.check(TokenKind::AttributeStart) {
            let open = self.advance();
            let mut depth = 1usize;
            while depth > 0 {
                match self.current_kind() {
                    TokenKind::Eof => {
                        return Err(ParseError::new(ParseErrorKind::UnexpectedEof, open.span)
                            .with_hint("unclosed attribute"));
                    }
                    TokenKind::AttributeStart | TokenKind::LBracket => depth += 1,
                    TokenKind::RBracket => depth -= 1,
                    _ => {}
                }
                self.advance();
            }
        }
        Ok(())
    }

    /// Source text of an expression, up to a terminator at bracket depth zero
    fn raw_expression(&mut self, terminators: &[TokenKind]) -> String {
        let start = self.current().span.start;
        let mut end = start;
        let mut depth = 0usize;
        loop {
            let kind = self.current_kind();
            if kind == TokenKind::Eof || (depth == 0 && terminators.contains(&kind)) {
                break;
            }
            match kind {
                TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBrace
                | TokenKind::AttributeStart => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            end = self.advance().span.end;
        }
        Span::new(start, end).slice(self.source).trim().to_string()
    }

    /// Skip to a likely member boundary after an error
    fn synchronize_member(&mut self) {
        if !self.check(TokenKind::RBrace) {
            self.advance();
        }
        while !self.is_eof() {
            match self.current_kind() {
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::RBrace => return,
                TokenKind::LBrace => {
                    let _ = self.skip_block();
                    return;
                }
                kind if kind.is_modifier()
                    || matches!(
                        kind,
                        TokenKind::Function | TokenKind::Const | TokenKind::Case | TokenKind::Use
                    ) =>
                {
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip to the next top-level statement after an error
    fn synchronize(&mut self) {
        self.advance();
        while !self.is_eof() {
            match self.current_kind() {
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::LBrace => {
                    if self.skip_block().is_err() {
                        return;
                    }
                }
                TokenKind::RBrace
                | TokenKind::Class
                | TokenKind::Interface
                | TokenKind::Trait
                | TokenKind::Namespace => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ==================== File Parsing ====================

    fn source_file(&mut self) -> SourceFile {
        let start = self.current().span.start;
        let mut blocks = vec![NamespaceBlock::new(None, self.current().span)];
        let mut in_braced_namespace = false;
        let mut at_statement_start = true;

        while !self.is_eof() {
            match self.current_kind() {
                TokenKind::OpenTag
                | TokenKind::CloseTag
                | TokenKind::InlineHtml
                | TokenKind::Semicolon => {
                    self.advance();
                    at_statement_start = true;
                }
                TokenKind::Namespace
                    if at_statement_start
                        && self.peek().is_some_and(|t| {
                            matches!(
                                t.kind,
                                TokenKind::Ident | TokenKind::QualifiedName | TokenKind::LBrace
                            )
                        }) =>
                {
                    match self.namespace_statement() {
                        Ok((block, braced)) => {
                            blocks.push(block);
                            in_braced_namespace = braced;
                        }
                        Err(e) => {
                            self.error(e);
                            self.synchronize();
                        }
                    }
                    at_statement_start = true;
                }
                TokenKind::Use if at_statement_start => {
                    match self.use_statement() {
                        Ok(imports) => {
                            if let Some(block) = blocks.last_mut() {
                                block.uses.extend(imports);
                            }
                        }
                        Err(e) => {
                            self.error(e);
                            self.synchronize();
                        }
                    }
                    at_statement_start = true;
                }
                _ if at_statement_start && self.class_declaration_ahead() => {
                    match self.class_like() {
                        Ok(class) => {
                            if let Some(block) = blocks.last_mut() {
                                block.classes.push(class);
                            }
                        }
                        Err(e) => {
                            self.error(e);
                            self.synchronize();
                        }
                    }
                    at_statement_start = true;
                }
                TokenKind::LBrace => {
                    if let Err(e) = self.skip_block() {
                        self.error(e);
                        break;
                    }
                    at_statement_start = true;
                }
                TokenKind::RBrace => {
                    self.advance();
                    if in_braced_namespace {
                        in_braced_namespace = false;
                        if let Some(block) = blocks.last_mut() {
                            block.span = block.span.merge(self.current().span);
                        }
                    }
                    at_statement_start = true;
                }
                _ => {
                    self.advance();
                    at_statement_start = false;
                }
            }
        }

        blocks.retain(|b| b.name.is_some() || !b.classes.is_empty() || !b.uses.is_empty());
        let end = self.current().span.end;
        SourceFile {
            namespaces: blocks,
            span: Span::new(start, end),
        }
    }

    /// Attributes and modifiers followed by `class Name`, `interface Name`, ...
    fn class_declaration_ahead(&self) -> bool {
        let mut tokens = self.tokens[self.position..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .peekable();
        let mut attribute_depth = 0usize;
        while let Some(token) = tokens.next() {
            if attribute_depth > 0 {
                match token.kind {
                    TokenKind::AttributeStart | TokenKind::LBracket => attribute_depth += 1,
                    TokenKind::RBracket => attribute_depth -= 1,
                    TokenKind::Eof => return false,
                    _ => {}
                }
                continue;
            }
            match token.kind {
                TokenKind::AttributeStart => attribute_depth = 1,
                TokenKind::Abstract | TokenKind::Final | TokenKind::Readonly => {}
                TokenKind::Class | TokenKind::Interface | TokenKind::Trait | TokenKind::Enum => {
                    return tokens
                        .peek()
                        .is_some_and(|next| next.kind == TokenKind::Ident);
                }
                _ => return false,
            }
        }
        false
    }

    /// `namespace Foo;` or `namespace Foo { ... }`; returns the new block and
    /// whether it is braced
    fn namespace_statement(&mut self) -> ParseResult<(NamespaceBlock, bool)> {
        let keyword = self.expect(TokenKind::Namespace)?;
        let name = if self.current().kind.is_name() {
            Some(self.expect_name()?.text)
        } else {
            None
        };
        if self.eat(TokenKind::LBrace).is_some() {
            return Ok((NamespaceBlock::new(name, keyword.span), true));
        }
        if self.eat(TokenKind::Semicolon).is_none() {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedAfter {
                    expected: ";",
                    context: "namespace name",
                },
                self.current().span,
            ));
        }
        Ok((NamespaceBlock::new(name, keyword.span), false))
    }

    /// `use`, `use function`, `use const`, with aliases and group syntax
    fn use_statement(&mut self) -> ParseResult<Vec<UseImport>> {
        self.expect(TokenKind::Use)?;
        let kind = self.use_kind().unwrap_or(UseKind::Class);
        let mut imports = Vec::new();

        loop {
            let name = self.expect_name()?;
            if self.eat(TokenKind::Backslash).is_some() {
                self.expect(TokenKind::LBrace)?;
                while !self.check(TokenKind::RBrace) {
                    let item_kind = self.use_kind().unwrap_or(kind);
                    let item = self.expect_name()?;
                    let full = format!("{}\\{}", name.text, item.text);
                    imports.push(self.use_item(item_kind, full, &item)?);
                    if self.eat(TokenKind::Comma).is_none() {
                        break;
                    }
                }
                self.expect(TokenKind::RBrace)?;
            } else {
                let full = name.text.clone();
                imports.push(self.use_item(kind, full, &name)?);
            }
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }

        self.expect(TokenKind::Semicolon)?;
        Ok(imports)
    }

    fn use_kind(&mut self) -> Option<UseKind> {
        if self.eat(TokenKind::Function).is_some() {
            Some(UseKind::Function)
        } else if self.eat(TokenKind::Const).is_some() {
            Some(UseKind::Const)
        } else {
            None
        }
    }

    fn use_item(&mut self, kind: UseKind, name: String, written: &Name) -> ParseResult<UseImport> {
        let alias = if self.eat(TokenKind::As).is_some() {
            self.expect_ident()?.name
        } else {
            written.last_segment().to_string()
        };
        Ok(UseImport {
            kind,
            name,
            alias,
            span: written.span,
        })
    }

    // ==================== Class-likes ====================

    fn class_like(&mut self) -> ParseResult<ClassLike> {
        let start = self.current().span;
        let mut doc_comment = self.take_doc_comment();
        self.skip_attributes()?;
        doc_comment = doc_comment.or_else(|| self.take_doc_comment());

        let mut modifiers = crate::ast::ClassModifiers::default();
        loop {
            match self.current_kind() {
                TokenKind::Abstract => modifiers.is_abstract = true,
                TokenKind::Final => modifiers.is_final = true,
                TokenKind::Readonly => modifiers.is_readonly = true,
                _ => break,
            }
            self.advance();
        }
        doc_comment = doc_comment.or_else(|| self.take_doc_comment());

        let kind = match self.current_kind() {
            TokenKind::Class => ClassKind::Class,
            TokenKind::Interface => ClassKind::Interface,
            TokenKind::Trait => ClassKind::Trait,
            TokenKind::Enum => ClassKind::Enum,
            _ => {
                return Err(self.unexpected(ExpectedToken::OneOf(vec![
                    TokenKind::Class,
                    TokenKind::Interface,
                    TokenKind::Trait,
                    TokenKind::Enum,
                ])))
            }
        };
        self.advance();
        let name = self.expect_ident()?;

        let mut class = ClassLike::new(kind, name, start);
        class.modifiers = modifiers;
        class.doc_comment = doc_comment;

        if kind == ClassKind::Enum && self.eat(TokenKind::Colon).is_some() {
            class.backing_type = Some(self.type_hint()?);
        }
        if self.eat(TokenKind::Extends).is_some() {
            class.extends = self.name_list()?;
        }
        if self.eat(TokenKind::Implements).is_some() {
            class.implements = self.name_list()?;
        }

        self.expect(TokenKind::LBrace)?;
        while !self.check(TokenKind::RBrace) && !self.is_eof() {
            if let Err(e) = self.member(&mut class) {
                self.error(e);
                self.synchronize_member();
            }
        }
        let close = self.expect(TokenKind::RBrace)?;
        class.span = start.merge(close.span);
        Ok(class)
    }

    fn name_list(&mut self) -> ParseResult<Vec<Name>> {
        let mut names = vec![self.expect_name()?];
        while self.eat(TokenKind::Comma).is_some() {
            names.push(self.expect_name()?);
        }
        Ok(names)
    }

    fn member(&mut self, class: &mut ClassLike) -> ParseResult<()> {
        if self.eat(TokenKind::Semicolon).is_some() {
            return Ok(());
        }
        let start = self.current().span;

        if self.check(TokenKind::Use) {
            let trait_use = self.trait_use()?;
            class.trait_uses.push(trait_use);
            return Ok(());
        }

        let mut doc_comment = self.take_doc_comment();
        self.skip_attributes()?;
        doc_comment = doc_comment.or_else(|| self.take_doc_comment());

        if self.check(TokenKind::Case) {
            let case = self.enum_case(doc_comment, start)?;
            class.cases.push(case);
            return Ok(());
        }

        let modifiers = self.member_modifiers()?;
        doc_comment = doc_comment.or_else(|| self.take_doc_comment());

        match self.current_kind() {
            TokenKind::Const => {
                let constants = self.constants(modifiers, doc_comment, start)?;
                class.constants.extend(constants);
            }
            TokenKind::Function => {
                let method = self.method(modifiers, doc_comment, start)?;
                class.methods.push(method);
            }
            _ => {
                let properties = self.properties(modifiers, doc_comment, start)?;
                class.properties.extend(properties);
            }
        }
        Ok(())
    }

    fn member_modifiers(&mut self) -> ParseResult<MemberModifiers> {
        let mut modifiers = MemberModifiers::default();
        loop {
            let visibility = match self.current_kind() {
                TokenKind::Public => Some(Visibility::Public),
                TokenKind::Protected => Some(Visibility::Protected),
                TokenKind::Private => Some(Visibility::Private),
                TokenKind::Static => {
                    modifiers.is_static = true;
                    None
                }
                TokenKind::Abstract => {
                    modifiers.is_abstract = true;
                    None
                }
                TokenKind::Final => {
                    modifiers.is_final = true;
                    None
                }
                TokenKind::Readonly => {
                    modifiers.is_readonly = true;
                    None
                }
                TokenKind::Var => {
                    modifiers.is_var = true;
                    None
                }
                _ => break,
            };
            self.advance();

            if let Some(visibility) = visibility {
                let is_set_visibility = self.check(TokenKind::LParen)
                    && self
                        .peek()
                        .is_some_and(|t| t.lexeme.eq_ignore_ascii_case("set"));
                if is_set_visibility {
                    self.advance();
                    self.advance();
                    self.expect(TokenKind::RParen)?;
                    modifiers.set_visibility = Some(visibility);
                } else {
                    modifiers.visibility = Some(visibility);
                }
            }
        }
        Ok(modifiers)
    }

    /// `use A, B;` or `use A, B { A::foo insteadof B; B::foo as bar; }`
    fn trait_use(&mut self) -> ParseResult<TraitUse> {
        let comments = std::mem::take(&mut self.pending_comments);
        let start = self.expect(TokenKind::Use)?.span;
        let traits = self.name_list()?;
        let mut adaptations = Vec::new();

        let end = if self.eat(TokenKind::LBrace).is_some() {
            while !self.check(TokenKind::RBrace) && !self.is_eof() {
                adaptations.push(self.trait_adaptation()?);
            }
            self.expect(TokenKind::RBrace)?.span
        } else {
            self.expect(TokenKind::Semicolon)?.span
        };

        Ok(TraitUse {
            traits,
            adaptations,
            comments,
            span: start.merge(end),
        })
    }

    fn trait_adaptation(&mut self) -> ParseResult<TraitAdaptation> {
        let trait_name = if self.current().kind.is_name()
            && self.peek().is_some_and(|t| t.kind == TokenKind::DoubleColon)
        {
            let name = self.expect_name()?;
            self.advance();
            Some(name)
        } else {
            None
        };
        let method = self.expect_member_name()?;

        let adaptation = if self.eat(TokenKind::Insteadof).is_some() {
            let Some(trait_name) = trait_name else {
                return Err(ParseError::new(
                    ParseErrorKind::PrecedenceWithoutTrait,
                    method.span,
                ));
            };
            TraitAdaptation::Precedence {
                trait_name,
                method: method.name,
                instead_of: self.name_list()?,
            }
        } else {
            self.expect(TokenKind::As)?;
            let visibility = match self.current_kind() {
                TokenKind::Public => Some(Visibility::Public),
                TokenKind::Protected => Some(Visibility::Protected),
                TokenKind::Private => Some(Visibility::Private),
                _ => None,
            };
            if visibility.is_some() {
                self.advance();
            }
            let alias = if self.check(TokenKind::Semicolon) {
                None
            } else {
                Some(self.expect_member_name()?.name)
            };
            TraitAdaptation::Alias {
                trait_name,
                method: method.name,
                visibility,
                alias,
            }
        };

        self.expect(TokenKind::Semicolon)?;
        Ok(adaptation)
    }

    fn enum_case(&mut self, doc_comment: Option<Comment>, start: Span) -> ParseResult<EnumCase> {
        self.expect(TokenKind::Case)?;
        let name = self.expect_member_name()?;
        let value = if self.eat(TokenKind::Eq).is_some() {
            Some(self.raw_expression(&[TokenKind::Semicolon]))
        } else {
            None
        };
        let end = self.expect(TokenKind::Semicolon)?.span;
        Ok(EnumCase {
            name,
            value,
            doc_comment,
            span: start.merge(end),
        })
    }

    /// `const [type] A = 1, B = 2;`
    fn constants(
        &mut self,
        modifiers: MemberModifiers,
        doc_comment: Option<Comment>,
        start: Span,
    ) -> ParseResult<Vec<Constant>> {
        self.expect(TokenKind::Const)?;
        let has_type = match self.current_kind() {
            TokenKind::Question | TokenKind::LParen => true,
            _ => self.peek().is_some_and(|t| t.kind != TokenKind::Eq),
        };
        let ty = if has_type {
            Some(self.type_hint()?)
        } else {
            None
        };

        let mut constants = Vec::new();
        loop {
            let name = self.expect_member_name()?;
            if self.eat(TokenKind::Eq).is_none() {
                return Err(ParseError::new(
                    ParseErrorKind::ExpectedAfter {
                        expected: "=",
                        context: "constant name",
                    },
                    self.current().span,
                ));
            }
            let value = self.raw_expression(&[TokenKind::Comma, TokenKind::Semicolon]);
            let span = start.merge(name.span);
            constants.push(Constant {
                name,
                ty: ty.clone(),
                value,
                modifiers,
                doc_comment: doc_comment.clone(),
                span,
            });
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::Semicolon)?;
        Ok(constants)
    }

    /// `[type] $a [= 1], $b [{ hooks }];`
    fn properties(
        &mut self,
        modifiers: MemberModifiers,
        doc_comment: Option<Comment>,
        start: Span,
    ) -> ParseResult<Vec<Property>> {
        let ty = if self.check(TokenKind::Variable) {
            None
        } else {
            Some(self.type_hint()?)
        };

        let mut properties = Vec::new();
        let mut has_hooks = false;
        loop {
            let name = self.expect_variable()?;
            let default = if self.eat(TokenKind::Eq).is_some() {
                Some(self.raw_expression(&[
                    TokenKind::Comma,
                    TokenKind::Semicolon,
                    TokenKind::LBrace,
                ]))
            } else {
                None
            };
            if self.check(TokenKind::LBrace) {
                self.skip_block()?;
                has_hooks = true;
            }
            let span = start.merge(name.span);
            properties.push(Property {
                name,
                ty: ty.clone(),
                default,
                modifiers,
                has_hooks,
                doc_comment: doc_comment.clone(),
                span,
            });
            if has_hooks || self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        if !has_hooks {
            self.expect(TokenKind::Semicolon)?;
        }
        Ok(properties)
    }

    fn method(
        &mut self,
        modifiers: MemberModifiers,
        doc_comment: Option<Comment>,
        start: Span,
    ) -> ParseResult<Method> {
        self.expect(TokenKind::Function)?;
        let returns_reference = self.eat(TokenKind::Ampersand).is_some();
        let name = self.expect_member_name()?;
        let params = self.params()?;
        let return_type = if self.eat(TokenKind::Colon).is_some() {
            Some(self.type_hint()?)
        } else {
            None
        };

        let (has_body, end) = if self.check(TokenKind::LBrace) {
            (true, self.skip_block()?)
        } else {
            let end = self.expect(TokenKind::Semicolon).map_err(|e| {
                e.with_hint("methods need a body or a terminating ';'")
            })?;
            (false, end.span)
        };

        Ok(Method {
            name,
            modifiers,
            params,
            return_type,
            returns_reference,
            has_body,
            doc_comment,
            span: start.merge(end),
        })
    }

    fn params(&mut self) -> ParseResult<Vec<Param>> {
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.check(TokenKind::RParen) {
            let start = self.current().span;
            let mut doc_comment = self.take_doc_comment();
            self.skip_attributes()?;
            doc_comment = doc_comment.or_else(|| self.take_doc_comment());

            let modifiers = self.member_modifiers()?;
            let ty = if matches!(
                self.current_kind(),
                TokenKind::Variable | TokenKind::Ampersand | TokenKind::Ellipsis
            ) {
                None
            } else {
                Some(self.type_hint()?)
            };
            let by_ref = self.eat(TokenKind::Ampersand).is_some();
            let variadic = self.eat(TokenKind::Ellipsis).is_some();
            let name = self.expect_variable()?;
            let default = if self.eat(TokenKind::Eq).is_some() {
                Some(self.raw_expression(&[TokenKind::Comma, TokenKind::RParen]))
            } else {
                None
            };
            if self.check(TokenKind::LBrace) {
                self.skip_block()?;
            }

            let span = start.merge(name.span);
            params.push(Param {
                name,
                ty,
                default,
                by_ref,
                variadic,
                promoted: modifiers.promotes().then_some(modifiers),
                doc_comment,
                span,
            });
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(params)
    }

    // ==================== Types ====================

    /// A native type: `Foo`, `?Foo`, `A|B`, `A&B`, `(A&B)|null`
    fn type_hint(&mut self) -> ParseResult<TypeHint> {
        let start = self.current().span;
        if self.eat(TokenKind::Question).is_some() {
            let inner = self.single_type()?;
            let span = start.merge(inner.span);
            return Ok(TypeHint::new(TypeHintKind::Nullable(Box::new(inner)), span));
        }

        let first = self.intersection_or_group()?;
        if !self.check(TokenKind::Pipe) {
            return Ok(first);
        }
        let mut members = vec![first];
        while self.eat(TokenKind::Pipe).is_some() {
            members.push(self.intersection_or_group()?);
        }
        let span = members
            .iter()
            .fold(start, |span, member| span.merge(member.span));
        Ok(TypeHint::new(TypeHintKind::Union(members), span))
    }

    fn intersection_or_group(&mut self) -> ParseResult<TypeHint> {
        if let Some(open) = self.eat(TokenKind::LParen) {
            let inner = self.intersection(open.span)?;
            let close = self.expect(TokenKind::RParen)?;
            return Ok(TypeHint::new(inner.kind, open.span.merge(close.span)));
        }
        let start = self.current().span;
        self.intersection(start)
    }

    fn intersection(&mut self, start: Span) -> ParseResult<TypeHint> {
        let first = self.single_type()?;
        if !self.intersection_continues() {
            return Ok(first);
        }
        let mut members = vec![first];
        while self.intersection_continues() {
            self.advance();
            members.push(self.single_type()?);
        }
        let span = members
            .iter()
            .fold(start, |span, member| span.merge(member.span));
        Ok(TypeHint::new(TypeHintKind::Intersection(members), span))
    }

    /// `&` followed by a type name, not by a by-reference parameter
    fn intersection_continues(&self) -> bool {
        self.check(TokenKind::Ampersand)
            && self
                .peek()
                .is_some_and(|t| t.kind.is_name() || t.kind == TokenKind::Static)
    }

    fn single_type(&mut self) -> ParseResult<TypeHint> {
        let token = self.current().clone();
        if token.kind.is_name() || token.kind == TokenKind::Static {
            self.advance();
            Ok(TypeHint::named(Name::new(&token.lexeme, token.span)))
        } else {
            Err(ParseError::new(ParseErrorKind::ExpectedType, token.span))
        }
    }
}
