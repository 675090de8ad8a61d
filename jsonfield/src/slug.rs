use std::sync::OnceLock;

use regex::Regex;

static SEPARATORS: OnceLock<Regex> = OnceLock::new();

fn separators() -> &'static Regex {
    SEPARATORS.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("separator pattern is valid"))
}

/// Derives a storage attribute from a human-readable label.
///
/// The label is lower-cased, every run of characters outside `a-z0-9` becomes a
/// single `_`, and leading/trailing underscores are trimmed, so the attribute is
/// always plain ASCII. An empty label gives an empty attribute (the anonymous
/// wrapper group).
///
/// Labels that differ only in case or punctuation collapse to the same attribute:
/// `"Street Name"` and `"street-name"` both become `street_name`.
pub fn attribute_slug(label: &str) -> String {
    let lowered = label.to_lowercase();
    separators().replace_all(&lowered, "_").trim_matches('_').to_string()
}
