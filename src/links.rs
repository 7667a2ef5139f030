//! Turns markdown-style links (`[label](url)`) embedded in résumé strings
//! into HTML anchors.
//!
//! This is a single substitution, not a markdown parser: each label ends at
//! the first `]` and each URL at the first `)`, and nothing is nested.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

/// Replaces every `[label](url)` in `text` with an anchor that opens `url` in
/// a new tab, e.g. `<a href="url" target="_blank" rel="noopener">label</a>`.
/// Text without links is returned as-is without allocating.
pub fn markdown_links(text: &str) -> Cow<'_, str> {
    LINK.replace_all(text, r#"<a href="$2" target="_blank" rel="noopener">$1</a>"#)
}
