//! Tag-scoped scanning of listing markup.
//!
//! This is a pattern match over flat `<Tag>text</Tag>` pairs, not an XML
//! parser: nested same-named tags, attributes and unclosed tags are not
//! handled. Matching is case-insensitive and does not cross line breaks.

use regex::Regex;
use tracing::warn;

fn tag_pattern(tag: &str) -> Option<Regex> {
    let tag = regex::escape(tag);
    match Regex::new(&format!("(?i)<{tag}>(.*?)</{tag}>")) {
        Ok(pattern) => Some(pattern),
        Err(e) => {
            warn!("Cannot build pattern for tag '{}': {}", tag, e);
            None
        }
    }
}

/// Inner text of every `<tag>...</tag>` in document order.
pub fn extract_all(tag: &str, doc: &str) -> Vec<String> {
    let Some(pattern) = tag_pattern(tag) else {
        return Vec::new();
    };

    pattern
        .captures_iter(doc)
        .filter_map(|caps| caps.get(1))
        .map(|inner| inner.as_str().to_string())
        .collect()
}

/// Inner text of the first `<tag>...</tag>`, or an empty string.
pub fn extract_first(tag: &str, doc: &str) -> String {
    tag_pattern(tag)
        .and_then(|pattern| {
            pattern
                .captures(doc)
                .and_then(|caps| caps.get(1))
                .map(|inner| inner.as_str().to_string())
        })
        .unwrap_or_default()
}
