// @module: Signatures of front matter, footers and notices leaking into chapter text

use once_cell::sync::Lazy;
use regex::Regex;

/// Strict signature set; each entry is (pattern, name reported in issues)
static CONTAMINATION_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)^Source:\s", "Source: prefix"),
        (r"விலை\s*ரூ\.\s*\d", "Price (விலை ரூ. N)"),
        (r"(?i)This webpage was last revised", "Web footer"),
        (r"(?i)This file was last revised", "Web footer"),
        (r"(?i)Copyright\s+\d{4}", "Copyright notice"),
        (r"(?i)All rights reserved", "Rights notice"),
        (r"(?i)Table of Contents", "Table of Contents"),
        (r"(?i)Tiruchirappalli-\d+", "Publisher address"),
        (r"(?i)Editorial Note", "Editorial Note"),
        (r"பிரபந்தத்திரட்டு", "Collection title"),
    ]
    .into_iter()
    .map(|(pattern, name)| (Regex::new(pattern).expect("Invalid contamination regex"), name))
    .collect()
});

/// Names of every signature found in `text`, in pattern order
pub fn find_contamination(text: &str) -> Vec<&'static str> {
    CONTAMINATION_PATTERNS
        .iter()
        .filter(|(re, _)| re.is_match(text))
        .map(|(_, name)| *name)
        .collect()
}
