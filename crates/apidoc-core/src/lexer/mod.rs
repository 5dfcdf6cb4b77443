//! Lexer for PHP source files
//!
//! The lexer converts a PHP file into a flat token stream, handling:
//! - Inline HTML outside of `<?php ... ?>` tags
//! - Keywords, names (plain, qualified, fully qualified) and variables
//! - String literals, heredocs and nowdocs as single opaque tokens
//! - Comments, kept as trivia so doc comments can be attached to declarations

#![allow(clippy::cast_possible_truncation)] // u32 offsets; sources over 4GB are unsupported

mod span;
mod token;

pub use span::{LineIndex, Span};
pub use token::TokenKind;

use logos::Logos;
use thiserror::Error;

/// A token with its kind, span and source text
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub lexeme: String,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, span: Span, lexeme: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            lexeme: lexeme.into(),
        }
    }

    /// True for a `/** ... */` comment (but not the empty `/**/`)
    #[must_use]
    pub fn is_doc_comment(&self) -> bool {
        self.kind == TokenKind::BlockComment
            && self.lexeme.starts_with("/**")
            && self.lexeme != "/**/"
    }
}

/// Lexer error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unexpected character")]
    UnexpectedChar,
    #[error("unterminated heredoc `{0}`")]
    UnterminatedHeredoc(String),
}

/// A lexer error with location information
#[derive(Debug, Clone)]
pub struct SpannedError {
    pub error: LexError,
    pub span: Span,
}

impl SpannedError {
    #[must_use]
    pub fn new(error: LexError, span: Span) -> Self {
        Self { error, span }
    }
}

impl std::fmt::Display for SpannedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.error, self.span)
    }
}

impl std::error::Error for SpannedError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexerMode {
    /// Outside of PHP tags
    Html,
    /// Inside `<?php ... ?>`
    Php,
}

/// The PHP lexer
pub struct Lexer<'source> {
    source: &'source str,
    position: usize,
    mode: LexerMode,
    errors: Vec<SpannedError>,
}

impl<'source> Lexer<'source> {
    #[must_use]
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            position: 0,
            mode: LexerMode::Html,
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source, returning all tokens and any errors
    #[must_use]
    pub fn tokenize(source: &str) -> (Vec<Token>, Vec<SpannedError>) {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.collect_all();
        (tokens, lexer.errors)
    }

    /// Collect all tokens up to and including `Eof`
    pub fn collect_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    pub fn next_token(&mut self) -> Token {
        if self.position >= self.source.len() {
            return self.eof();
        }
        match self.mode {
            LexerMode::Html => self.lex_html(),
            LexerMode::Php => self.lex_php(),
        }
    }

    fn eof(&self) -> Token {
        let end = self.source.len() as u32;
        Token::new(TokenKind::Eof, Span::new(end, end), "")
    }

    fn token(&self, kind: TokenKind, start: usize, end: usize) -> Token {
        Token::new(
            kind,
            Span::new(start as u32, end as u32),
            &self.source[start..end],
        )
    }

    /// Inline HTML up to the next open tag, or the open tag itself
    fn lex_html(&mut self) -> Token {
        let start = self.position;
        let remaining = &self.source[start..];

        if let Some(len) = open_tag_len(remaining) {
            self.position += len;
            self.mode = LexerMode::Php;
            return self.token(TokenKind::OpenTag, start, self.position);
        }

        let html_len = remaining.find("<?").unwrap_or(remaining.len());
        // A lone `<?` that is not an open tag (e.g. `<?xml`) stays HTML
        let html_len = if html_len == 0 { 2 } else { html_len };
        self.position += html_len.min(remaining.len());
        self.token(TokenKind::InlineHtml, start, self.position)
    }

    fn lex_php(&mut self) -> Token {
        let remaining = &self.source[self.position..];
        let mut logos_lexer = TokenKind::lexer(remaining);

        match logos_lexer.next() {
            Some(Ok(kind)) => {
                let range = logos_lexer.span();
                let start = self.position + range.start;
                let end = self.position + range.end;
                self.position = end;

                match kind {
                    TokenKind::CloseTag => {
                        self.mode = LexerMode::Html;
                        // The newline directly after `?>` belongs to the tag
                        if self.source[self.position..].starts_with('\n') {
                            self.position += 1;
                        }
                        self.token(TokenKind::CloseTag, start, end)
                    }
                    TokenKind::HeredocStart => self.lex_heredoc(start, end),
                    _ => self.token(kind, start, end),
                }
            }
            Some(Err(())) => {
                // Error recovery: skip the invalid character only
                let start = self.position + logos_lexer.span().start;
                let Some(invalid) = self.source[start..].chars().next() else {
                    return self.eof();
                };
                self.position = start + invalid.len_utf8();
                let span = Span::new(start as u32, self.position as u32);
                self.errors
                    .push(SpannedError::new(LexError::UnexpectedChar, span));
                self.token(TokenKind::Error, start, self.position)
            }
            None => {
                self.position = self.source.len();
                self.eof()
            }
        }
    }

    /// Scan a heredoc or nowdoc body up to its closing label
    fn lex_heredoc(&mut self, start: usize, label_end: usize) -> Token {
        let label: String = self.source[start + 3..label_end]
            .trim()
            .trim_matches(|c| c == '"' || c == '\'')
            .to_string();

        let body_start = label_end;
        let mut offset = body_start;
        let mut first = true;
        for line in self.source[body_start..].split_inclusive('\n') {
            let line_start = offset;
            offset += line.len();
            if first {
                // Remainder of the opening line
                first = false;
                continue;
            }
            let trimmed = line.trim_start();
            if let Some(rest) = trimmed.strip_prefix(label.as_str()) {
                let continues_name = rest
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_alphanumeric() || c == '_');
                if !continues_name {
                    let end = line_start + (line.len() - trimmed.len()) + label.len();
                    self.position = end;
                    return self.token(TokenKind::Heredoc, start, end);
                }
            }
        }

        self.errors.push(SpannedError::new(
            LexError::UnterminatedHeredoc(label),
            Span::new(start as u32, self.source.len() as u32),
        ));
        self.position = self.source.len();
        self.token(TokenKind::Heredoc, start, self.source.len())
    }
}

/// Length of a PHP open tag at the start of `text`
fn open_tag_len(text: &str) -> Option<usize> {
    if text.starts_with("<?=") {
        return Some(3);
    }
    let prefix = text.get(..5)?;
    if prefix.eq_ignore_ascii_case("<?php") {
        let after = text[5..].chars().next();
        return match after {
            None => Some(5),
            Some(c) if c.is_whitespace() => Some(5 + c.len_utf8()),
            Some(_) => None,
        };
    }
    None
}
