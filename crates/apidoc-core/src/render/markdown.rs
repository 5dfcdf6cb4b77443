//! Docblock text as GitHub-flavored Markdown
//!
//! Raw HTML in comments is dropped and links with script-capable schemes
//! lose their target.

use pulldown_cmark::{html, CowStr, Event, Options, Parser as MarkdownParser, Tag};

/// Render a block of Markdown to HTML
#[must_use]
pub fn to_html(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let events = MarkdownParser::new_ext(text, options).filter_map(|event| match event {
        Event::Html(_) | Event::InlineHtml(_) => None,
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Some(Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        })),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Some(Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        })),
        other => Some(other),
    });

    let mut out = String::new();
    html::push_html(&mut out, events);
    out
}

/// Render a one-line description, without the enclosing paragraph
#[must_use]
pub fn to_inline_html(text: &str) -> String {
    let rendered = to_html(text);
    let trimmed = rendered.trim_end();
    match trimmed
        .strip_prefix("<p>")
        .and_then(|rest| rest.strip_suffix("</p>"))
    {
        Some(inner) if !inner.contains("<p>") => inner.to_string(),
        _ => rendered,
    }
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    if is_unsafe(&url) {
        CowStr::Borrowed("")
    } else {
        url
    }
}

fn is_unsafe(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    if lower.starts_with("data:") {
        return !["data:image/png", "data:image/gif", "data:image/jpeg", "data:image/webp"]
            .iter()
            .any(|allowed| lower.starts_with(allowed));
    }
    ["javascript:", "vbscript:", "file:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}
