//! Input normalization
//!
//! Static alias tables for stores and categories. Lookups are
//! case-insensitive and ignore surrounding whitespace. Unrecognized
//! categories and priorities fall back to a default instead of failing,
//! since callers are often language models passing loose input.

use super::models::{Category, Priority};

const CATEGORY_ALIASES: &[(&str, Category)] = &[
    ("groceries", Category::Groceries),
    ("grocery", Category::Groceries),
    ("food", Category::Groceries),
    ("household", Category::Household),
    ("home", Category::Household),
    ("house", Category::Household),
    ("clothing", Category::Clothing),
    ("clothes", Category::Clothing),
    ("apparel", Category::Clothing),
    ("electronics", Category::Electronics),
    ("tech", Category::Electronics),
    ("gadget", Category::Electronics),
    ("gifts", Category::Gifts),
    ("gift", Category::Gifts),
    ("present", Category::Gifts),
    ("other", Category::Other),
];

const STORE_ALIASES: &[(&str, &str)] = &[
    ("amazon", "Amazon"),
    ("costco", "Costco"),
    ("target", "Target"),
    ("walmart", "Walmart"),
    ("whole foods", "Whole Foods"),
    ("wholefoods", "Whole Foods"),
    ("trader joes", "Trader Joe's"),
    ("trader joe's", "Trader Joe's"),
    ("traderjoes", "Trader Joe's"),
    ("tj", "Trader Joe's"),
    ("safeway", "Safeway"),
    ("cvs", "CVS"),
    ("walgreens", "Walgreens"),
    ("home depot", "Home Depot"),
    ("homedepot", "Home Depot"),
    ("lowes", "Lowe's"),
    ("lowe's", "Lowe's"),
    ("ikea", "IKEA"),
    ("nordstrom", "Nordstrom"),
    ("rei", "REI"),
];

/// Strict category lookup
pub fn parse_category(value: &str) -> Option<Category> {
    let key = value.trim().to_lowercase();
    CATEGORY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, category)| *category)
}

/// Category lookup falling back to `Other`
pub fn normalize_category(value: &str) -> Category {
    parse_category(value).unwrap_or_else(|| {
        tracing::debug!("Unrecognized category {:?}, using other", value);
        Category::Other
    })
}

/// Map a known store alias to its canonical name.
/// Unknown stores are kept as given, trimmed.
pub fn normalize_store(value: &str) -> String {
    let trimmed = value.trim();
    let key = trimmed.to_lowercase();
    STORE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Optional store input; blank values mean "no store"
pub fn normalize_store_opt(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(normalize_store)
}

pub fn parse_priority(value: &str) -> Option<Priority> {
    match value.trim().to_lowercase().as_str() {
        "low" => Some(Priority::Low),
        "medium" | "normal" => Some(Priority::Medium),
        "high" => Some(Priority::High),
        "urgent" => Some(Priority::Urgent),
        _ => None,
    }
}

/// Priority lookup falling back to `Medium`
pub fn normalize_priority(value: &str) -> Priority {
    parse_priority(value).unwrap_or_else(|| {
        tracing::debug!("Unrecognized priority {:?}, using medium", value);
        Priority::Medium
    })
}

/// Trim free text, treating blank strings as absent
pub fn clean_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
