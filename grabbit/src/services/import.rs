//! Plain-text list import
//!
//! Parses lists exported from note apps (one entry per line, optional
//! `*` bullets) and guesses a category for each entry.

use crate::store::Category;

/// Header line some exported grocery lists start with
const LIST_HEADER: &str = "grocery";

const HOUSEHOLD_KEYWORDS: &[&str] = &[
    "soap", "towel", "scrub", "floss", "batteries", "bags", "brush", "cleaner", "sponge",
];

/// Entries of a plain-text list, in order, without duplicates.
///
/// Blank lines, `_` dividers and the bare list header are skipped;
/// duplicates are detected case-insensitively and the first spelling wins.
pub fn parse_list(content: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut entries = Vec::new();

    for line in content.lines() {
        let entry = line.trim().trim_matches('*').trim();

        if entry.is_empty() || entry.eq_ignore_ascii_case(LIST_HEADER) || entry.starts_with('_') {
            continue;
        }

        let key = entry.to_lowercase();
        if seen.contains(&key) {
            continue;
        }

        seen.push(key);
        entries.push(entry.to_string());
    }

    entries
}

/// Household if the name mentions a household keyword, else groceries
pub fn categorize(entry: &str) -> Category {
    let lower = entry.to_lowercase();
    if HOUSEHOLD_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        Category::Household
    } else {
        Category::Groceries
    }
}
