//! Tokens of docblock type expressions

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum DocTokenKind {
    #[token("$this")]
    This,

    #[regex(r"\$[a-zA-Z_\u{80}-\u{10FFFF}][a-zA-Z0-9_\u{80}-\u{10FFFF}]*")]
    Variable,

    /// Names may contain `\` separators and `-` (`class-string`, `non-empty-list`)
    #[regex(r"\\?[a-zA-Z_\u{80}-\u{10FFFF}][a-zA-Z0-9_\-\u{80}-\u{10FFFF}]*(\\[a-zA-Z_\u{80}-\u{10FFFF}][a-zA-Z0-9_\-\u{80}-\u{10FFFF}]*)*")]
    Identifier,

    #[regex(r"-?[0-9][0-9_]*")]
    #[regex(r"-?0[xX][0-9a-fA-F][0-9a-fA-F_]*")]
    #[regex(r"-?0[bB][01][01_]*")]
    Integer,

    #[regex(r"-?[0-9]*\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"-?[0-9][0-9_]*[eE][+-]?[0-9]+")]
    Float,

    #[regex(r"'([^'\\]|\\.)*'")]
    #[regex(r#""([^"\\]|\\.)*""#)]
    QuotedString,

    #[token("<")]
    OpenAngle,
    #[token(">")]
    CloseAngle,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("[")]
    OpenSquare,
    #[token("]")]
    CloseSquare,
    #[token("{")]
    OpenCurly,
    #[token("}")]
    CloseCurly,
    #[token(",")]
    Comma,
    #[token("|")]
    Pipe,
    #[token("&")]
    Ampersand,
    #[token("?")]
    Nullable,
    #[token("::")]
    DoubleColon,
    #[token(":")]
    Colon,
    #[token("=")]
    Equal,
    #[token("...")]
    Variadic,
    #[token("*")]
    Wildcard,
    #[token("!")]
    Negated,

    /// Any character outside of the type grammar, typically description text
    Other,
}

/// A docblock token with its byte range and leading-whitespace flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocToken {
    pub kind: DocTokenKind,
    pub start: usize,
    pub end: usize,
    /// Whitespace directly precedes this token
    pub spaced: bool,
}

/// Tokenize a tag body; unknown characters become [`DocTokenKind::Other`]
pub fn tokenize(text: &str) -> Vec<DocToken> {
    let mut tokens = Vec::new();
    let mut lexer = DocTokenKind::lexer(text);
    let mut previous_end = 0;
    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let kind = result.unwrap_or(DocTokenKind::Other);
        tokens.push(DocToken {
            kind,
            start: range.start,
            end: range.end,
            spaced: range.start > previous_end,
        });
        previous_end = range.end;
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<DocTokenKind> {
        tokenize(text).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn identifiers_with_dashes_and_namespaces() {
        let tokens = tokenize("non-empty-list<\\App\\Model> $items");
        assert_eq!(tokens[0].kind, DocTokenKind::Identifier);
        assert_eq!(tokens[0].end, "non-empty-list".len());
        assert_eq!(tokens[2].kind, DocTokenKind::Identifier);
        assert_eq!(tokens[4].kind, DocTokenKind::Variable);
        assert!(tokens[4].spaced);
        assert!(!tokens[1].spaced);
    }

    #[test]
    fn this_is_not_a_variable() {
        assert_eq!(
            kinds("$this $thisOne"),
            vec![DocTokenKind::This, DocTokenKind::Variable]
        );
    }

    #[test]
    fn numbers_and_strings() {
        assert_eq!(
            kinds("int<-1, 5> 1.5 'a' \"b\""),
            vec![
                DocTokenKind::Identifier,
                DocTokenKind::OpenAngle,
                DocTokenKind::Integer,
                DocTokenKind::Comma,
                DocTokenKind::Integer,
                DocTokenKind::CloseAngle,
                DocTokenKind::Float,
                DocTokenKind::QuotedString,
                DocTokenKind::QuotedString,
            ]
        );
    }

    #[test]
    fn description_characters_are_other() {
        assert_eq!(
            kinds("int a#b"),
            vec![
                DocTokenKind::Identifier,
                DocTokenKind::Identifier,
                DocTokenKind::Other,
                DocTokenKind::Identifier,
            ]
        );
    }
}
