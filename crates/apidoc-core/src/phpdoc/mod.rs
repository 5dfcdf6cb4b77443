//! Docblock parsing
//!
//! A docblock is split into free-text blocks and `@tag` blocks. Tag bodies
//! are parsed with [`TypeParser`]; the results are aggregated into a
//! [`PhpDoc`]:
//!
//! - `@extends`, `@return`, `@var` and `@use`: the first one wins, except that
//!   a `phpstan-`/`psalm-` prefixed tag overrides an unprefixed one
//! - `@param`: the same rule, applied per parameter name
//! - `@template*`, `@implements`, `@throws` and text blocks: all kept in order

mod lexer;
mod tags;
mod type_parser;
mod types;

pub use tags::{
    AssertKind, AssertTag, DocTag, ParamOutTag, ParamTag, TagValue, TemplateTag, TypeTag,
    VarTag, Variance,
};
pub use type_parser::{TypeParseError, TypeParser};
pub use types::{CallableParam, ConditionalSubject, ConstExpr, Shape, ShapeItem, TypeNode};

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

/// Structured content of one docblock
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhpDoc {
    pub templates: Vec<TemplateTag>,
    pub extends: Option<TypeTag>,
    pub implements: Vec<TypeTag>,
    pub var: Option<VarTag>,
    pub returns: Option<TypeTag>,
    /// Keyed by parameter name, including the `$`
    pub params: IndexMap<String, ParamTag>,
    pub param_outs: IndexMap<String, ParamOutTag>,
    pub throws: Vec<TypeTag>,
    pub uses: Option<TypeTag>,
    pub deprecated: Option<String>,
    pub asserts: Vec<AssertTag>,
    /// Free-text paragraphs in order
    pub texts: Vec<String>,
    /// Every tag in order of appearance
    pub tags: Vec<DocTag>,
}

impl PhpDoc {
    /// Parse a raw comment; delimiters and leading `*` are stripped
    #[must_use]
    pub fn parse(comment: &str) -> Self {
        let mut doc = PhpDoc::default();
        let mut prefixed = Prefixed::default();
        for block in split_blocks(comment) {
            match block {
                Block::Text(text) => doc.texts.push(text),
                Block::Tag { name, body } => {
                    let tag = DocTag::parse(&name, &body);
                    doc.absorb(&tag, &mut prefixed);
                    doc.tags.push(tag);
                }
            }
        }
        doc
    }

    /// Free text joined into paragraphs
    #[must_use]
    pub fn description(&self) -> String {
        self.texts.join("\n\n")
    }

    /// Summary: the first text block
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.texts.first().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty() && self.tags.is_empty()
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<&ParamTag> {
        if name.starts_with('$') {
            self.params.get(name)
        } else {
            self.params.get(&format!("${name}"))
        }
    }

    /// Names of declared templates, in order
    #[must_use]
    pub fn template_names(&self) -> Vec<String> {
        self.templates.iter().map(|t| t.name.clone()).collect()
    }

    /// Tags without a dedicated slot, e.g. `@see` or `@since`
    pub fn generic_tags(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().filter_map(|tag| match &tag.value {
            TagValue::Generic(body) => Some((tag.name.as_str(), body.as_str())),
            _ => None,
        })
    }

    fn absorb(&mut self, tag: &DocTag, prefixed: &mut Prefixed) {
        let is_prefixed = tag.is_prefixed();
        match &tag.value {
            TagValue::Template(template) => self.templates.push(template.clone()),
            TagValue::Implements(implements) => self.implements.push(implements.clone()),
            TagValue::Throws(throws) => self.throws.push(throws.clone()),
            TagValue::Assert(assert) => self.asserts.push(assert.clone()),
            TagValue::Extends(extends) => {
                if take_slot(self.extends.is_some(), &mut prefixed.extends, is_prefixed) {
                    self.extends = Some(extends.clone());
                }
            }
            TagValue::Return(returns) => {
                if take_slot(self.returns.is_some(), &mut prefixed.returns, is_prefixed) {
                    self.returns = Some(returns.clone());
                }
            }
            TagValue::Var(var) => {
                if take_slot(self.var.is_some(), &mut prefixed.var, is_prefixed) {
                    self.var = Some(var.clone());
                }
            }
            TagValue::Use(uses) => {
                if take_slot(self.uses.is_some(), &mut prefixed.uses, is_prefixed) {
                    self.uses = Some(uses.clone());
                }
            }
            TagValue::Param(param) => {
                let existing_prefixed = prefixed.params.get(&param.name).copied();
                let taken = match existing_prefixed {
                    None => true,
                    Some(false) => is_prefixed,
                    Some(true) => false,
                };
                if taken {
                    prefixed.params.insert(param.name.clone(), is_prefixed);
                    self.params.insert(param.name.clone(), param.clone());
                } else {
                    tracing::debug!(param = %param.name, "ignoring duplicate @param");
                }
            }
            TagValue::ParamOut(out) => {
                self.param_outs
                    .entry(out.name.clone())
                    .or_insert_with(|| out.clone());
            }
            TagValue::Deprecated(text) => {
                self.deprecated.get_or_insert_with(|| text.clone());
            }
            TagValue::Generic(_) | TagValue::Invalid { .. } => {}
        }
    }
}

/// Tracks whether a first-wins slot was filled by a prefixed tag
#[derive(Default)]
struct Prefixed {
    extends: bool,
    returns: bool,
    var: bool,
    uses: bool,
    params: HashMap<String, bool>,
}

/// Decide whether a tag takes a first-wins slot, updating the prefix flag
fn take_slot(filled: bool, slot_prefixed: &mut bool, is_prefixed: bool) -> bool {
    if !filled || (is_prefixed && !*slot_prefixed) {
        *slot_prefixed = is_prefixed;
        true
    } else {
        false
    }
}

enum Block {
    Text(String),
    Tag { name: String, body: String },
}

fn tag_line() -> &'static Regex {
    static TAG_LINE: OnceLock<Regex> = OnceLock::new();
    TAG_LINE.get_or_init(|| {
        Regex::new(r"^@([A-Za-z_][A-Za-z0-9_\-\\:]*)(.*)$").unwrap_or_else(|_| unreachable!())
    })
}

/// Strip comment delimiters from one line
fn clean_line(line: &str) -> &str {
    let line = line.trim();
    let line = line.strip_prefix("/**").unwrap_or(line);
    let line = line.strip_suffix("*/").unwrap_or(line);
    let line = line.trim_start();
    let line = line.strip_prefix('*').unwrap_or(line);
    line.trim()
}

/// Split a comment into text paragraphs and tags; tag bodies continue onto
/// following lines until a blank line or the next tag
fn split_blocks(comment: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut text: Vec<&str> = Vec::new();
    let mut tag: Option<(String, Vec<String>)> = None;

    let flush_text = |text: &mut Vec<&str>, blocks: &mut Vec<Block>| {
        if !text.is_empty() {
            blocks.push(Block::Text(text.join("\n")));
            text.clear();
        }
    };
    let flush_tag = |tag: &mut Option<(String, Vec<String>)>, blocks: &mut Vec<Block>| {
        if let Some((name, lines)) = tag.take() {
            blocks.push(Block::Tag {
                name,
                body: lines.join("\n"),
            });
        }
    };

    for raw in comment.lines() {
        let line = clean_line(raw);
        if line.is_empty() {
            flush_text(&mut text, &mut blocks);
            flush_tag(&mut tag, &mut blocks);
            continue;
        }
        if let Some(captures) = tag_line().captures(line) {
            flush_text(&mut text, &mut blocks);
            flush_tag(&mut tag, &mut blocks);
            let name = captures[1].to_string();
            let body = captures[2].trim().to_string();
            tag = Some((name, vec![body]));
            continue;
        }
        match &mut tag {
            Some((_, lines)) => lines.push(line.to_string()),
            None => text.push(line),
        }
    }
    flush_text(&mut text, &mut blocks);
    flush_tag(&mut tag, &mut blocks);
    blocks
}

/// Memoizing docblock parser, scoped to one generation run
#[derive(Debug, Default)]
pub struct CommentParser {
    cache: RefCell<HashMap<String, Rc<PhpDoc>>>,
    empty: Rc<PhpDoc>,
}

impl CommentParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comment; missing or empty comments give an empty document
    pub fn parse(&self, comment: Option<&str>) -> Rc<PhpDoc> {
        let comment = comment.map(str::trim).unwrap_or_default();
        if comment.is_empty() || comment == "/** */" || comment == "/***/" {
            return Rc::clone(&self.empty);
        }
        if let Some(doc) = self.cache.borrow().get(comment) {
            return Rc::clone(doc);
        }
        let doc = Rc::new(PhpDoc::parse(comment));
        self.cache
            .borrow_mut()
            .insert(comment.to_string(), Rc::clone(&doc));
        doc
    }

    /// Number of distinct comments parsed so far
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_tags() {
        let doc = PhpDoc::parse(
            "/**\n * Summary line.\n *\n * Longer description\n * over two lines.\n *\n * @param int $a First\n *   continued.\n * @return string\n * @since 1.2\n */",
        );
        assert_eq!(
            doc.texts,
            vec!["Summary line.", "Longer description\nover two lines."]
        );
        assert_eq!(doc.summary(), Some("Summary line."));
        let param = doc.param("a").expect("param a");
        assert_eq!(param.description, "First\ncontinued.");
        assert_eq!(
            doc.returns.as_ref().map(|r| r.ty.to_string()).as_deref(),
            Some("string")
        );
        assert_eq!(doc.generic_tags().collect::<Vec<_>>(), vec![("since", "1.2")]);
    }

    #[test]
    fn test_single_line_comment() {
        let doc = PhpDoc::parse("/** @var list<int> */");
        assert_eq!(
            doc.var.map(|v| v.ty.to_string()).as_deref(),
            Some("list<int>")
        );
        assert!(doc.texts.is_empty());
    }

    #[test]
    fn test_multiline_shape() {
        let doc = PhpDoc::parse(
            "/**\n * @return array{\n *   id: int,\n *   name: string,\n * }\n */",
        );
        assert_eq!(
            doc.returns.map(|r| r.ty.to_string()).as_deref(),
            Some("array{id: int, name: string}")
        );
    }

    #[test]
    fn test_duplicate_param_first_wins() {
        let doc = PhpDoc::parse("/**\n * @param int $x first\n * @param string $x second\n */");
        assert_eq!(doc.params.len(), 1);
        let x = doc.param("$x").expect("param");
        assert_eq!(x.description, "first");
        assert_eq!(x.ty.as_ref().map(ToString::to_string).as_deref(), Some("int"));
    }

    #[test]
    fn test_prefixed_tags_override() {
        let doc = PhpDoc::parse(
            "/**\n * @return array\n * @phpstan-return list<int>\n * @psalm-return list<string>\n * @param array $x\n * @phpstan-param list<int> $x\n */",
        );
        assert_eq!(
            doc.returns.map(|r| r.ty.to_string()).as_deref(),
            Some("list<int>")
        );
        assert_eq!(
            doc.params["$x"].ty.as_ref().map(ToString::to_string).as_deref(),
            Some("list<int>")
        );
    }

    #[test]
    fn test_first_wins_and_append() {
        let doc = PhpDoc::parse(
            "/**\n * @template T\n * @template-covariant U of object\n * @extends Base<T>\n * @extends Other<U>\n * @implements A<T>\n * @implements B<U>\n * @throws RuntimeException\n * @throws LogicException\n */",
        );
        assert_eq!(doc.template_names(), vec!["T", "U"]);
        assert_eq!(
            doc.extends.map(|e| e.ty.to_string()).as_deref(),
            Some("Base<T>")
        );
        assert_eq!(doc.implements.len(), 2);
        assert_eq!(doc.throws.len(), 2);
    }

    #[test]
    fn test_invalid_tags_are_kept_but_ignored() {
        let doc = PhpDoc::parse("/** @return array< */");
        assert!(doc.returns.is_none());
        assert!(matches!(doc.tags[0].value, TagValue::Invalid { .. }));
    }

    #[test]
    fn test_joined_comments() {
        let doc = PhpDoc::parse("/** @use Greets<string> */\n/** @deprecated */");
        assert!(doc.uses.is_some());
        assert_eq!(doc.deprecated.as_deref(), Some(""));
    }

    #[test]
    fn test_comment_parser_memoizes() {
        let parser = CommentParser::new();
        let a = parser.parse(Some("/** @return int */"));
        let b = parser.parse(Some("/** @return int */"));
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(parser.cached(), 1);

        assert!(parser.parse(None).is_empty());
        assert!(parser.parse(Some("")).is_empty());
        assert!(parser.parse(Some("/** */")).is_empty());
        assert_eq!(parser.cached(), 1);
    }

    #[test]
    fn test_plain_comments_have_no_tags() {
        let doc = PhpDoc::parse("// @return int");
        assert!(doc.returns.is_none());
    }
}
