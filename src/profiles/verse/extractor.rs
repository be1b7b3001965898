// @module: Verse line cleaning and stanza grouping

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{ClassifiedLine, Paragraph};
use crate::pipeline::grouping::{group_lines, number_paragraphs, GroupingRule};
use crate::text::normalize::{collapse_whitespace, nfc};

use super::classifier::VerseCategory;

static STRAY_PUNCT_START_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[.,;:!\-᾿ʼ"'`]+\s*"#).expect("Invalid stray punctuation regex")
});

static LEADING_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,5}\s+").expect("Invalid leading number regex")
});

// Breathing mark left alone between spaces
static ORPHANED_BREATHING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\s)[᾿ʼ'](?:\s|$)").expect("Invalid breathing mark regex")
});

/// Clean one verse line: editorial number, stray punctuation, NFC, spacing
pub fn clean_verse_line(text: &str) -> String {
    let cleaned = text.trim();
    let cleaned = STRAY_PUNCT_START_REGEX.replace(cleaned, "");
    let cleaned = LEADING_NUMBER_REGEX.replace(&cleaned, "");
    let cleaned = nfc(&cleaned);
    let cleaned = collapse_whitespace(&cleaned);
    let cleaned = STRAY_PUNCT_START_REGEX.replace(&cleaned, "");
    let cleaned = ORPHANED_BREATHING_REGEX.replace_all(&cleaned, " ");
    cleaned.trim().to_string()
}

/// Group verse lines into stanzas, one line per row of paragraph text
pub fn extract_verse(classified: &[ClassifiedLine<VerseCategory>], rule: GroupingRule) -> Vec<Paragraph> {
    let groups = group_lines(classified, rule, clean_verse_line);
    number_paragraphs(groups.into_iter().map(|lines| lines.join("\n")), 1)
}
