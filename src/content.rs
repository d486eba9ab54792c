use once_cell::sync::Lazy;
use regex::Regex;

/// Any `[[...]]` marker; the target never spans a line.
static LINK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\[(.+?)\]\]").unwrap());

const CATEGORY_PREFIX: &str = "Category:";

/// Category names linked from `text`, in order of appearance.
///
/// Only markers whose target starts with the case-sensitive `Category:` prefix
/// count; a sort key after `|` is dropped.
pub fn extract_categories(text: &str) -> Vec<&str> {
    LINK_REGEX
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .filter_map(|target| target.as_str().strip_prefix(CATEGORY_PREFIX))
        .map(|rest| rest.split_once('|').map_or(rest, |(name, _)| name))
        .collect()
}

/// Returns at most `max_chars` leading characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
