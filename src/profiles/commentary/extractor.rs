// @module: Commentary cleaning, hyphen repair and paragraph splitting

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{ClassifiedLine, Paragraph};
use crate::pipeline::grouping::{group_lines, number_paragraphs, GroupingRule};
use crate::text::normalize::{char_len, nfc};
use crate::text::script::greek_block_density;

use super::classifier::{
    strip_margin_annotations, CommentaryCategory, BARE_MARGIN_DIGIT_O_REGEX, INNER_SMALL_NUMBER_REGEX,
    VERSE_REFERENCE_REGEXES, GLUED_VERSE_REFERENCE_REGEX, UNCLOSED_VERSE_REFERENCE_REGEX,
};

/// Default paragraph length before a forced split
pub const MAX_PARAGRAPH_CHARS: usize = 800;

static MULTI_SPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").expect("Invalid whitespace regex"));

static PAGE_MARKER_ASTERISK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\*\s*").expect("Invalid asterisk regex")
});

static LEADING_QUOTE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^["'“]\s+"#).expect("Invalid quote regex")
});

static HYPHENATED_END_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[α-ωά-ώἀ-ῶa-zA-Z]-\s*$").expect("Invalid hyphenation regex")
});

static TRAILING_HYPHEN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"-\s*$").expect("Invalid hyphen regex"));

/// A surviving verse reference, used as a preferred split point
static VERSE_REF_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(\s*[VWνΝ][eοo][rvau][sσ][,.]\s*\d+[^)]*\)").expect("Invalid verse break regex")
});

static SENTENCE_END_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\s+").expect("Invalid sentence regex"));

/// Clean one commentary line
pub fn clean_commentary_line(text: &str) -> String {
    let cleaned = strip_margin_annotations(text);
    let cleaned = nfc(&cleaned);
    let cleaned = MULTI_SPACE_REGEX.replace_all(&cleaned, " ");
    let cleaned = PAGE_MARKER_ASTERISK_REGEX.replace(&cleaned, "");
    let cleaned = LEADING_QUOTE_REGEX.replace(&cleaned, "");
    cleaned.trim().to_string()
}

/// Join wrapped lines, repairing words hyphenated across a line break
pub fn join_lines(lines: &[String]) -> String {
    let mut result = String::new();
    for line in lines.iter().filter(|l| !l.is_empty()) {
        if result.is_empty() {
            result.push_str(line);
        } else if HYPHENATED_END_REGEX.is_match(&result) {
            result = TRAILING_HYPHEN_REGEX.replace(&result, "").into_owned();
            result.push_str(line);
        } else {
            result.push(' ');
            result.push_str(line);
        }
    }
    result
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices().nth(char_index).map(|(i, _)| i).unwrap_or(text.len())
}

/// Byte range of a character window, clamped to the text
fn char_window(text: &str, start: usize, end: usize) -> (usize, usize) {
    let len = char_len(text);
    let start = start.min(len);
    let end = end.min(len).max(start);
    (byte_offset(text, start), byte_offset(text, end))
}

/// Split an over-long block at a verse reference, then a sentence end, then hard
pub fn split_into_paragraphs(text: &str, max_chars: usize) -> Vec<String> {
    if char_len(text) <= max_chars {
        return vec![text.to_string()];
    }

    let mut paragraphs = Vec::new();
    let mut remaining = text.to_string();

    while char_len(&remaining) > max_chars {
        let (ref_start, ref_end) = char_window(&remaining, max_chars / 2, max_chars * 6 / 5);
        let (sentence_start, sentence_end) = char_window(&remaining, max_chars * 3 / 5, max_chars * 11 / 10);

        let split_at = if let Some(m) = VERSE_REF_BREAK_REGEX.find(&remaining[ref_start..ref_end]) {
            ref_start + m.start()
        } else if let Some(m) = SENTENCE_END_REGEX.find(&remaining[sentence_start..sentence_end]) {
            sentence_start + m.end()
        } else {
            byte_offset(&remaining, max_chars)
        };

        let head = remaining[..split_at].trim();
        if !head.is_empty() {
            paragraphs.push(head.to_string());
        }
        remaining = remaining[split_at..].trim().to_string();
    }

    if !remaining.is_empty() {
        paragraphs.push(remaining);
    }
    paragraphs
}

/// Strip references and margin digits that survived line cleaning by spanning a line break
pub fn post_clean_paragraph(text: &str) -> String {
    let mut cleaned = text.to_string();
    for re in VERSE_REFERENCE_REGEXES.iter() {
        cleaned = re.replace_all(&cleaned, " ").into_owned();
    }
    cleaned = UNCLOSED_VERSE_REFERENCE_REGEX.replace_all(&cleaned, " ").into_owned();
    cleaned = GLUED_VERSE_REFERENCE_REGEX.replace_all(&cleaned, "$1").into_owned();
    cleaned = BARE_MARGIN_DIGIT_O_REGEX.replace_all(&cleaned, " ").into_owned();
    cleaned = INNER_SMALL_NUMBER_REGEX.replace_all(&cleaned, " ").into_owned();
    cleaned = MULTI_SPACE_REGEX.replace_all(&cleaned, " ").into_owned();
    cleaned.trim().to_string()
}

/// Short paragraphs survive only when they are mostly Greek
fn is_substantial(text: &str) -> bool {
    let len = char_len(text);
    if len < 20 {
        return false;
    }
    len >= 50 || greek_block_density(text) > 0.4
}

/// Extract commentary paragraphs from a classified section
pub fn extract_commentary(classified: &[ClassifiedLine<CommentaryCategory>], max_chars: usize) -> Vec<Paragraph> {
    let blocks = group_lines(classified, GroupingRule::COMMENTARY, clean_commentary_line);

    let texts = blocks
        .iter()
        .map(|block| join_lines(block))
        .filter(|joined| !joined.is_empty())
        .flat_map(|joined| split_into_paragraphs(&joined, max_chars))
        .map(|paragraph| post_clean_paragraph(&paragraph))
        .filter(|paragraph| is_substantial(paragraph));

    number_paragraphs(texts, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawLine;
    use crate::profiles::commentary::classifier::classify_section;

    const GREEK: &str = "Ὅτι τὴν Ὀδύσσειαν ὁ ποιητὴς ἠθικώτερον συνέθετο καὶ ἁπλούστερον";

    #[test]
    fn test_join_lines_withHyphenatedWord_shouldRepairIt() {
        let lines = vec!["ὁ ποιη-".to_string(), "τὴς λέγει".to_string(), "τοῦτο".to_string()];
        assert_eq!(join_lines(&lines), "ὁ ποιητὴς λέγει τοῦτο");
    }

    #[test]
    fn test_split_into_paragraphs_withSentenceEnds_shouldSplitAfterPeriod() {
        let sentence = format!("{}. ", "α".repeat(99));
        let text = sentence.repeat(10);
        let paragraphs = split_into_paragraphs(text.trim(), 800);
        assert!(paragraphs.len() >= 2);
        assert!(paragraphs.iter().all(|p| char_len(p) <= 800));
        assert!(paragraphs[0].ends_with('.'));
    }

    #[test]
    fn test_split_into_paragraphs_withoutBreaks_shouldHardSplit() {
        let text = "α".repeat(1700);
        let paragraphs = split_into_paragraphs(&text, 800);
        assert_eq!(paragraphs.iter().map(|p| char_len(p)).collect::<Vec<_>>(), vec![800, 800, 100]);
    }

    #[test]
    fn test_split_into_paragraphs_withVerseReference_shouldSplitBeforeIt() {
        let text = format!("{} (Vers. 21.) {}", "α".repeat(500), "β".repeat(500));
        let paragraphs = split_into_paragraphs(&text, 800);
        assert_eq!(paragraphs.len(), 2);
        assert!(paragraphs[1].starts_with("(Vers. 21.)"));
    }

    #[test]
    fn test_post_clean_paragraph_shouldDropReferencesAndMargins() {
        assert_eq!(post_clean_paragraph("ὁ ποιητὴς (Vers. 21.) λέγει 20 τοῦτο"), "ὁ ποιητὴς λέγει τοῦτο");
    }

    #[test]
    fn test_extract_commentary_withGapOfThree_shouldProduceTwoParagraphs() {
        let mut text = vec![GREEK, GREEK, "", "1418", "", GREEK, "x"];
        text.push(GREEK);
        let lines = RawLine::from_document(&text.join("\n"));
        let paragraphs = extract_commentary(&classify_section(&lines, false), MAX_PARAGRAPH_CHARS);
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].index, 1);
        assert_eq!(paragraphs[0].text, format!("{} {}", GREEK, GREEK));
        assert_eq!(paragraphs[1].text, format!("{} {}", GREEK, GREEK));
    }

    #[test]
    fn test_extract_commentary_withShortLatinFragment_shouldDropIt() {
        let lines = RawLine::from_document("Lorem ipsum dolor sit amet consectetur adipiscing");
        assert!(extract_commentary(&classify_section(&lines, true), MAX_PARAGRAPH_CHARS).is_empty());
    }
}
