use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Comparison key for searches: lower-cased, decomposed, combining marks removed.
pub fn normalize(value: &str) -> String {
    value
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Absent text normalizes to the empty string.
pub fn normalize_optional(value: Option<&str>) -> String {
    value.map(normalize).unwrap_or_default()
}

/// Case- and accent-insensitive substring test; an empty needle matches everything.
pub fn contains_normalized(haystack: &str, needle: &str) -> bool {
    normalize(haystack).contains(&normalize(needle))
}
