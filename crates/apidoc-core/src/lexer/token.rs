//! Token types for the PHP lexer
//!
//! Only declarations are parsed, so expression-level operators collapse into
//! a single [`TokenKind::Operator`] kind. Keywords are case-insensitive, like
//! in PHP itself.

use logos::Logos;

/// The kind of token produced while in PHP mode
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    // ========== Keywords ==========
    #[token("abstract", ignore(ascii_case))]
    Abstract,
    #[token("as", ignore(ascii_case))]
    As,
    #[token("case", ignore(ascii_case))]
    Case,
    #[token("class", ignore(ascii_case))]
    Class,
    #[token("const", ignore(ascii_case))]
    Const,
    #[token("enum", ignore(ascii_case))]
    Enum,
    #[token("extends", ignore(ascii_case))]
    Extends,
    #[token("final", ignore(ascii_case))]
    Final,
    #[token("function", ignore(ascii_case))]
    Function,
    #[token("implements", ignore(ascii_case))]
    Implements,
    #[token("insteadof", ignore(ascii_case))]
    Insteadof,
    #[token("interface", ignore(ascii_case))]
    Interface,
    #[token("namespace", ignore(ascii_case))]
    Namespace,
    #[token("new", ignore(ascii_case))]
    New,
    #[token("private", ignore(ascii_case))]
    Private,
    #[token("protected", ignore(ascii_case))]
    Protected,
    #[token("public", ignore(ascii_case))]
    Public,
    #[token("readonly", ignore(ascii_case))]
    Readonly,
    #[token("static", ignore(ascii_case))]
    Static,
    #[token("trait", ignore(ascii_case))]
    Trait,
    #[token("use", ignore(ascii_case))]
    Use,
    #[token("var", ignore(ascii_case))]
    Var,

    // ========== Names ==========
    /// Unqualified name: `Foo`
    #[regex(r"[a-zA-Z_\u{80}-\u{10FFFF}][a-zA-Z0-9_\u{80}-\u{10FFFF}]*")]
    Ident,

    /// Qualified name: `Foo\Bar`
    #[regex(r"[a-zA-Z_\u{80}-\u{10FFFF}][a-zA-Z0-9_\u{80}-\u{10FFFF}]*(\\[a-zA-Z_\u{80}-\u{10FFFF}][a-zA-Z0-9_\u{80}-\u{10FFFF}]*)+")]
    QualifiedName,

    /// Fully qualified name: `\Foo\Bar`
    #[regex(r"(\\[a-zA-Z_\u{80}-\u{10FFFF}][a-zA-Z0-9_\u{80}-\u{10FFFF}]*)+")]
    FullyQualifiedName,

    /// `$name`
    #[regex(r"\$[a-zA-Z_\u{80}-\u{10FFFF}][a-zA-Z0-9_\u{80}-\u{10FFFF}]*")]
    Variable,

    // ========== Literals ==========
    #[regex(r"[0-9][0-9_]*")]
    #[regex(r"0[xX][0-9a-fA-F][0-9a-fA-F_]*")]
    #[regex(r"0[bB][01][01_]*")]
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+")]
    Number,

    #[regex(r"'([^'\\]|\\(.|\n))*'")]
    #[regex(r#""([^"\\]|\\(.|\n))*""#)]
    #[regex(r"`[^`]*`")]
    String,

    /// Opening of a heredoc or nowdoc; the body is scanned by the lexer driver
    #[regex(r#"<<<[ \t]*("[a-zA-Z_][a-zA-Z0-9_]*"|'[a-zA-Z_][a-zA-Z0-9_]*'|[a-zA-Z_][a-zA-Z0-9_]*)"#)]
    HeredocStart,

    /// A complete heredoc/nowdoc, produced by the driver from `HeredocStart`
    Heredoc,

    // ========== Punctuation ==========
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token("::")]
    DoubleColon,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,
    #[token("&")]
    Ampersand,
    #[token("|")]
    Pipe,
    #[token("=")]
    Eq,
    #[token("...")]
    Ellipsis,
    #[token(".")]
    Dot,
    #[token("->")]
    Arrow,
    #[token("?->")]
    NullsafeArrow,
    #[token("=>")]
    DoubleArrow,
    #[token("\\")]
    Backslash,
    #[token("$")]
    Dollar,
    #[token("#[")]
    AttributeStart,

    /// Any other operator sequence
    #[regex(r"[+\-*/%<>!~^=@|&?]+", priority = 1)]
    Operator,

    // ========== Tags ==========
    /// `?>`, switches back to inline HTML
    #[token("?>")]
    CloseTag,
    /// `<?php`, `<?=` or `<?`, produced by the driver
    OpenTag,
    /// Text outside of PHP tags, produced by the driver
    InlineHtml,

    // ========== Trivia ==========
    #[regex(r"//[^\n]*")]
    #[regex(r"#([^\[\n][^\n]*)?")]
    LineComment,

    /// `/* ... */` and `/** ... */`
    #[regex(r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
    BlockComment,

    // ========== Special ==========
    Eof,
    Error,
}

impl TokenKind {
    /// Comments are skipped by the parser but kept for doc comment attachment
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment)
    }

    /// Tokens that may start or continue a class name
    #[must_use]
    pub const fn is_name(&self) -> bool {
        matches!(
            self,
            Self::Ident | Self::QualifiedName | Self::FullyQualifiedName
        )
    }

    /// Keywords, which PHP accepts as member names
    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        matches!(
            self,
            Self::Abstract
                | Self::As
                | Self::Case
                | Self::Class
                | Self::Const
                | Self::Enum
                | Self::Extends
                | Self::Final
                | Self::Function
                | Self::Implements
                | Self::Insteadof
                | Self::Interface
                | Self::Namespace
                | Self::New
                | Self::Private
                | Self::Protected
                | Self::Public
                | Self::Readonly
                | Self::Static
                | Self::Trait
                | Self::Use
                | Self::Var
        )
    }

    /// Member modifiers
    #[must_use]
    pub const fn is_modifier(&self) -> bool {
        matches!(
            self,
            Self::Abstract
                | Self::Final
                | Self::Private
                | Self::Protected
                | Self::Public
                | Self::Readonly
                | Self::Static
                | Self::Var
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Abstract => "abstract",
            Self::As => "as",
            Self::Case => "case",
            Self::Class => "class",
            Self::Const => "const",
            Self::Enum => "enum",
            Self::Extends => "extends",
            Self::Final => "final",
            Self::Function => "function",
            Self::Implements => "implements",
            Self::Insteadof => "insteadof",
            Self::Interface => "interface",
            Self::Namespace => "namespace",
            Self::New => "new",
            Self::Private => "private",
            Self::Protected => "protected",
            Self::Public => "public",
            Self::Readonly => "readonly",
            Self::Static => "static",
            Self::Trait => "trait",
            Self::Use => "use",
            Self::Var => "var",
            Self::Ident => "identifier",
            Self::QualifiedName => "qualified name",
            Self::FullyQualifiedName => "fully qualified name",
            Self::Variable => "variable",
            Self::Number => "number",
            Self::String => "string",
            Self::HeredocStart | Self::Heredoc => "heredoc",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Semicolon => ";",
            Self::Comma => ",",
            Self::DoubleColon => "::",
            Self::Colon => ":",
            Self::Question => "?",
            Self::Ampersand => "&",
            Self::Pipe => "|",
            Self::Eq => "=",
            Self::Ellipsis => "...",
            Self::Dot => ".",
            Self::Arrow => "->",
            Self::NullsafeArrow => "?->",
            Self::DoubleArrow => "=>",
            Self::Backslash => "\\",
            Self::Dollar => "$",
            Self::AttributeStart => "#[",
            Self::Operator => "operator",
            Self::CloseTag => "?>",
            Self::OpenTag => "<?php",
            Self::InlineHtml => "inline HTML",
            Self::LineComment => "line comment",
            Self::BlockComment => "block comment",
            Self::Eof => "end of file",
            Self::Error => "error",
        };
        f.write_str(text)
    }
}
