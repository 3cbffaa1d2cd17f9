//! Small text transforms shared by the expander and the enricher.

/// Normalize a product handle: lowercase, with every character outside
/// `[a-z0-9]` replaced by a hyphen.
pub fn slugify(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '-' })
        .collect()
}

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize_first(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Capitalize each comma-separated segment independently and rejoin with
/// `", "`. Used for tag and type lists.
pub fn capitalize_list(raw: &str) -> String {
    raw.split(',')
        .map(|segment| capitalize_first(segment.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Strip leading currency symbols and surrounding whitespace from a price,
/// keeping a plain decimal string (`"£123.45"` -> `"123.45"`).
pub fn strip_currency(raw: &str) -> String {
    raw.trim()
        .trim_start_matches(|ch: char| !ch.is_ascii_digit() && ch != '.')
        .trim()
        .to_string()
}

/// Strip all characters outside `[0-9.]` and parse the longest valid decimal
/// prefix. Empty or non-numeric input yields `None` rather than a crash.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    // A second dot ends the numeric prefix ("12.34.5" parses as 12.34).
    let prefix = match cleaned.match_indices('.').nth(1) {
        Some((index, _)) => &cleaned[..index],
        None => cleaned.as_str(),
    };
    prefix.parse().ok()
}

/// Drop every non-ASCII character.
pub fn strip_non_ascii(raw: &str) -> String {
    raw.chars().filter(char::is_ascii).collect()
}

/// Remove one wrapping double quote from each end, if present.
pub fn strip_wrapping_quotes(raw: &str) -> &str {
    let raw = raw.strip_prefix('"').unwrap_or(raw);
    raw.strip_suffix('"').unwrap_or(raw)
}
