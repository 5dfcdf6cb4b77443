//! Comments attached to declarations

use crate::lexer::Span;

/// A comment in the source code, delimiters included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub span: Span,
}

impl Comment {
    #[must_use]
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }

    /// Check if this is a `/** */` doc comment
    #[must_use]
    pub fn is_doc_comment(&self) -> bool {
        self.text.starts_with("/**") && self.text != "/**/"
    }
}

/// Join the doc comments among `comments`, dropping plain comments
#[must_use]
pub fn join_doc_comments(comments: &[Comment]) -> String {
    comments
        .iter()
        .filter(|c| c.is_doc_comment())
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_only_doc_comments() {
        let comments = vec![
            Comment::new("/** @use A<int> */", Span::default()),
            Comment::new("// trailing note", Span::default()),
            Comment::new("/** @use B<string> */", Span::default()),
        ];
        assert_eq!(
            join_doc_comments(&comments),
            "/** @use A<int> */\n/** @use B<string> */"
        );
    }
}
