//! Text helpers shared by descriptors and renderers

use std::cmp::Ordering;

/// Compare strings in natural order: digit runs compare by value
///
/// `item2` sorts before `item10`. Everything else compares by char, case
/// sensitively, so the order is total and stable across runs.
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();
    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_run = take_digits(&mut left);
                let r_run = take_digits(&mut right);
                let l_trimmed = l_run.trim_start_matches('0');
                let r_trimmed = r_run.trim_start_matches('0');
                let ordering = l_trimmed
                    .len()
                    .cmp(&r_trimmed.len())
                    .then_with(|| l_trimmed.cmp(r_trimmed));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(l), Some(r)) => {
                if l != r {
                    return l.cmp(&r);
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        digits.push(c);
        chars.next();
    }
    digits
}

/// `getIterator` → `get-iterator`, `HTTPClient` → `http-client`
#[must_use]
pub fn to_kebab_case(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == ' ' || c == '-' {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !out.ends_with('-') {
                out.push('-');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Escape text for HTML content and attribute values
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_order() {
        let mut names = vec!["item10", "item2", "Item1", "item1", "alpha", "item02"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(names, vec!["Item1", "alpha", "item1", "item02", "item2", "item10"]);
    }

    #[test]
    fn test_kebab_case() {
        assert_eq!(to_kebab_case("getIterator"), "get-iterator");
        assert_eq!(to_kebab_case("HTTPClient"), "http-client");
        assert_eq!(to_kebab_case("Box"), "box");
        assert_eq!(to_kebab_case("__construct"), "construct");
        assert_eq!(to_kebab_case("toUTF8"), "to-utf8");
        assert_eq!(to_kebab_case("snake_case_name"), "snake-case-name");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("array<int, \"a\"> & 'b'"),
            "array&lt;int, &quot;a&quot;&gt; &amp; &#39;b&#39;"
        );
    }
}
