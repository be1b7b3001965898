// @module: Unicode and whitespace normalization helpers

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static MULTI_WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s{2,}").expect("Invalid whitespace regex")
});

static MULTI_SPACE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"  +").expect("Invalid space regex")
});

/// Canonical composition, so precomposed and combining accents compare equal
pub fn nfc(text: &str) -> String {
    text.nfc().collect::<String>()
}

/// Replace every run of two or more whitespace characters with one space
pub fn collapse_whitespace(text: &str) -> String {
    MULTI_WHITESPACE_REGEX.replace_all(text, " ").into_owned()
}

/// Replace runs of plain spaces with one space, leaving tabs and newlines alone
pub fn collapse_spaces(text: &str) -> String {
    MULTI_SPACE_REGEX.replace_all(text, " ").into_owned()
}

/// Character length, the unit every threshold in the pipeline is expressed in
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Prefix of at most `max` characters
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Express a 0..1 share as a percentage with one decimal place
pub fn percent1(share: f64) -> f64 {
    (share * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nfc_withCombiningAccent_shouldCompose() {
        let decomposed = "\u{03B1}\u{0301}";
        assert_eq!(nfc(decomposed), "\u{03AC}");
    }

    #[test]
    fn test_collapse_whitespace_withTabsAndSpaces_shouldUseSingleSpace() {
        assert_eq!(collapse_whitespace("a \t b   c d"), "a b c d");
        assert_eq!(collapse_spaces("a\t\tb   c"), "a\t\tb c");
    }

    #[test]
    fn test_percent1_shouldRoundToOneDecimal() {
        assert_eq!(percent1(0.78951), 79.0);
        assert_eq!(round1(15.04), 15.0);
    }
}
