//! Size-code normalization for variant option values.

/// Supplier size codes and the option values the storefront expects.
const SIZE_NAMES: &[(&str, &str)] = &[
    ("S", "Small"),
    ("M", "Medium"),
    ("L", "Large"),
    ("XL", "XLarge"),
    ("XS", "XSmall"),
    ("2X", "2XLarge"),
    ("XXL", "2XLarge"),
    ("3XL", "3XLarge"),
    ("YXS", "Youth XSmall"),
    ("YS", "Youth Small"),
    ("YM", "Youth Medium"),
    ("YL", "Youth Large"),
    ("YXL", "Youth XLarge"),
    ("OS", "One Size"),
];

/// Expand a size code to its full name. Codes absent from the table pass
/// through unchanged, so free-form sizes ("10.5", "28W") survive.
pub fn normalize_size(code: &str) -> &str {
    SIZE_NAMES
        .iter()
        .find(|(short, _)| *short == code)
        .map(|(_, full)| *full)
        .unwrap_or(code)
}
