// @module: Diary text cleaning after tagging

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::model::ClassifiedLine;
use crate::text::normalize::char_len;

use super::classifier::DiaryCategory;

/// What cleaning removed or changed in one section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningStats {
    pub total_lines_read: usize,
    pub header_lines_removed: usize,
    pub footnote_lines_removed: usize,
    pub folio_refs_removed: usize,
    pub line_numbers_removed: usize,
    pub markers_removed: usize,
    pub hyphens_rejoined: usize,
    pub spaces_normalized: usize,
    pub blank_lines_collapsed: usize,
    pub output_lines: usize,
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Invalid diary cleanup regex")
}

static HYPHEN_END_REGEX: Lazy<Regex> = Lazy::new(|| re(r"\w-\s*$"));
static HYPHEN_STRIP_REGEX: Lazy<Regex> = Lazy::new(|| re(r"(\w)-\s*$"));
static LOWERCASE_START_REGEX: Lazy<Regex> = Lazy::new(|| re(r"^[a-zàáâãäåèéêëìíîïòóôõöùúûü]"));
static MULTI_SPACE_REGEX: Lazy<Regex> = Lazy::new(|| re(r"  +"));
static SPACE_BEFORE_PUNCT_REGEX: Lazy<Regex> = Lazy::new(|| re(r" ([,;.!?:])"));

/// Leading editorial line numbers, exact or garbled, with the text they precede
static LEADING_LINE_NUMBER_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^\s*(?:5|10|15|20|25|30)\s{2,}(.+)$",
        r"^\s*(?:IO|io|ìo|ro|ij|I5|\[5|\$5|2\(|2o|ao|a5|2\$|\^c|3o|50)\s{2,}(.+)$",
        r"^\s*(?:IO|ìo|\[5|2\(|\^c)\s+(.{20,})$",
        r"^\s*o\s+([A-Z].{20,})$",
        r"^\s*[f^;»3j\[$]\s+(.{25,})$",
        r"^\s*1-1\s+(.{20,})$",
    ]
    .iter()
    .map(|pattern| re(pattern))
    .collect()
});

static LEADING_PAGE_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| re(r"^\s*(\d{2})\*?\s+(.{20,})$"));

/// Inline markers in application order: footnote calls, folio references,
/// manuscript page breaks, merged page headers and trailing line numbers
static INLINE_MARKER_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    let rules: &[(&str, &str)] = &[
        // manuscript page breaks
        (r"\|\|", ""),
        (r"\s+\|\s+", " "),
        (r"\|\s+", " "),
        (r"\s+\|$", ""),
        (r"\s+jj\s+", " "),
        (r"\s+II\s+([a-z])", " $1"),
        // folio references
        (r"\b[ec]\.\s+\d+\s*[ABab]\b", ""),
        (r"\be\s+\d{1,3}\s*[ABab]\b", ""),
        (r"\be-\s+\d{1,3}\s*[ABab]\b", ""),
        (r"<\^-\s+\d+\s*[ABab]\b", ""),
        (r"\b[ec][.-]\s*\d{1,3}\s*[ABabe]\b", ""),
        // footnote calls in parentheses or angle brackets
        (r#"\s*[<(]\s*['^°=§*♦■•~+f#!?,;:s0-9»«"]{1,4}\s*[)>\\]\s*"#, " "),
        (r"\s*<['^*s]{1,4}[)>\\]\s*", " "),
        (r"\s*\(['^*s]{1,4}>\s*", " "),
        (r"\s*\([*^~']{1,4}\\\s*", " "),
        (r"\s*\(\^{1,4}\s*", " "),
        (r#"\s*'\^"?\^\s*"#, " "),
        (r"\s+\^{2,4}[\\)]?\s*", " "),
        (r"\s*\^[A-Za-z)\\]\s*", " "),
        (r"\s+\^\s+", " "),
        (r"\s*\^{1,4}\)\s*", " "),
        (r"\s*\^{1,4}([;,.])", "$1"),
        (r"(\S)\s*\([a-z]\)\s*", "$1 "),
        (r"\s*\([a-z]\)\s*([,;.])", "$1"),
        // W read for a footnote call
        (r"\s+W\s+([a-z,;])", " $1"),
        (r"(\w)W([;,.])", "$1$2"),
        (r"\s+W\s+([A-Z][a-z])", " $1"),
        (r"\s+W\s*([.,;:])", "$1"),
        (r"\s+W\s*$", ""),
        (r"(\w)\s+W\s+(\w)", "$1 $2"),
        (r"\s+W\s+", " "),
        // other garbled calls
        (r"\s*\(0[,;.]\s*", " "),
        (r#"\s*\(["“”«»]{1,3}[)>]?\s*"#, " "),
        (r"\s*\([JI]\)\s*", " "),
        (r"\s*\(\*{1,3}[•)\\]?\s*", " "),
        (r"\s*[<(]•+[)>]\s*", " "),
        (r"(\S)\s*\(\d{1,2}\)\s*", "$1 "),
        (r"\s*\[0\s*", " "),
        (r"\s*\(™+\)\s*", " "),
        (r"\.\^", "."),
        // page headers merged into text
        (r"\s*STEPHANI\s+INFESSURAE\s*", " "),
        (r"\s*\[\d{4}\]\s+DIARIA\s+RERUM\s+ROM\w*\.?\s+\d*\s*", " "),
        (r"\bc\.\s*\d{1,3}\s*[ABab]\b", ""),
        (r"\be\.\s*\d{1,3}\s*[ABab]\b", ""),
        (r"(\w)W(\s|[.,;:!?]|$)", "$1$2"),
        (r"\s*\([<>]\)\s*", " "),
        (r"\s*[<(]\^+[>)]\s*", " "),
        // trailing editorial line numbers
        (r"\s+(?:5|10|15|20|25|30|IO|ìo|ij|I5|2\(|2o|\^c|3o)\s*$", ""),
        (r"\s+[ìij]\s*$", ""),
        (r"-\s+io\s*$", "-"),
        (r"\s+1\s+5\s*$", ""),
        (r"\s+2\s+\(\s*$", ""),
        (r"\s+\^+\s*$", ""),
        (r"\s+H\s*$", ""),
    ];
    rules
        .iter()
        .map(|(pattern, replacement)| (re(pattern), *replacement))
        .collect()
});

/// Strip a leading editorial line number, exact or garbled
pub fn remove_leading_line_number(line: &str) -> String {
    for regex in LEADING_LINE_NUMBER_REGEXES.iter() {
        if let Some(caps) = regex.captures(line) {
            return caps[1].to_string();
        }
    }
    if let Some(caps) = LEADING_PAGE_NUMBER_REGEX.captures(line) {
        if caps[1].parse::<u32>().map(|n| n > 35).unwrap_or(false) {
            return caps[2].to_string();
        }
    }
    line.to_string()
}

/// Remove footnote calls, folio references and other inline apparatus
pub fn remove_inline_markers(line: &str) -> String {
    let mut result = line.to_string();
    for (regex, replacement) in INLINE_MARKER_RULES.iter() {
        result = regex.replace_all(&result, *replacement).into_owned();
    }
    let result = MULTI_SPACE_REGEX.replace_all(&result, " ");
    SPACE_BEFORE_PUNCT_REGEX.replace_all(&result, "$1").into_owned()
}

/// Join a line ending in `word-` with a following line that starts lowercase
pub fn rejoin_hyphenated_lines(lines: &[String]) -> Vec<String> {
    let mut result = Vec::with_capacity(lines.len());
    let mut i = 0;
    while i < lines.len() {
        let current = &lines[i];
        if let Some(next) = lines.get(i + 1) {
            let next = next.trim();
            if HYPHEN_END_REGEX.is_match(current) && LOWERCASE_START_REGEX.is_match(next) {
                let mut joined = HYPHEN_STRIP_REGEX.replace(current, "$1").into_owned();
                joined.push_str(next);
                result.push(joined);
                i += 2;
                continue;
            }
        }
        result.push(current.clone());
        i += 1;
    }
    result
}

/// Collapse runs of blank lines to one
pub fn collapse_blank_lines(lines: Vec<String>) -> Vec<String> {
    let mut result = Vec::with_capacity(lines.len());
    let mut previous_blank = false;
    for line in lines {
        let blank = line.trim().is_empty();
        if blank && previous_blank {
            continue;
        }
        previous_blank = blank;
        result.push(if blank { String::new() } else { line });
    }
    result
}

/// Whether the first text, footnote or header line in `indices` is text
fn nearest_is_text(tags: &[DiaryCategory], mut indices: impl Iterator<Item = usize>) -> bool {
    use DiaryCategory::*;
    indices
        .find(|&j| matches!(tags[j], Text | Footnote | Header))
        .is_some_and(|j| tags[j] == Text)
}

/// A blank line is a paragraph break only when text sits on both sides within three lines
fn is_paragraph_break(tags: &[DiaryCategory], i: usize) -> bool {
    nearest_is_text(tags, (i.saturating_sub(3)..i).rev()) && nearest_is_text(tags, i + 1..(i + 3).min(tags.len()))
}

/// Cleaned diary lines with the statistics of the cleaning
#[derive(Debug, Clone, Default)]
pub struct CleanedText {
    pub lines: Vec<String>,
    pub stats: CleaningStats,
}

/// Clean a tagged section into text lines with blank-line paragraph breaks
pub fn clean_section(classified: &[ClassifiedLine<DiaryCategory>]) -> CleanedText {
    use DiaryCategory::*;

    let tags: Vec<DiaryCategory> = classified.iter().map(|l| l.category).collect();
    let mut stats = CleaningStats {
        total_lines_read: classified.len(),
        ..Default::default()
    };
    for tag in &tags {
        match tag {
            Header => stats.header_lines_removed += 1,
            Footnote => stats.footnote_lines_removed += 1,
            Folio => stats.folio_refs_removed += 1,
            LineNumber => stats.line_numbers_removed += 1,
            Text | Blank => {}
        }
    }

    let kept: Vec<String> = classified
        .iter()
        .enumerate()
        .filter_map(|(i, line)| match line.category {
            Text => Some(line.text.clone()),
            Blank if is_paragraph_break(&tags, i) => Some(String::new()),
            _ => None,
        })
        .collect();

    let joined = rejoin_hyphenated_lines(&kept);
    stats.hyphens_rejoined = kept.len() - joined.len();

    let mut normalized = Vec::with_capacity(joined.len());
    for line in joined {
        let without_number = remove_leading_line_number(&line);
        if without_number != line {
            stats.line_numbers_removed += 1;
        }
        let without_markers = remove_inline_markers(&without_number);
        if without_markers != without_number {
            stats.markers_removed += 1;
        }
        let spaced = MULTI_SPACE_REGEX.replace_all(&without_markers, " ").trim().to_string();
        if spaced != without_markers.trim() {
            stats.spaces_normalized += 1;
        }
        normalized.push(spaced);
    }

    let before_collapse = normalized.len();
    let mut lines = collapse_blank_lines(normalized);
    stats.blank_lines_collapsed = before_collapse - lines.len();

    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    stats.output_lines = lines.len();

    debug!(
        "Cleaned {} lines: {} headers, {} footnotes, {} folio refs, {} line numbers, {} markers, {} hyphen joins",
        stats.total_lines_read,
        stats.header_lines_removed,
        stats.footnote_lines_removed,
        stats.folio_refs_removed,
        stats.line_numbers_removed,
        stats.markers_removed,
        stats.hyphens_rejoined
    );

    CleanedText { lines, stats }
}

/// Paragraphs of cleaned text: blank-line blocks with their lines joined by spaces
pub fn block_paragraphs(lines: &[String]) -> Vec<String> {
    lines
        .split(|line| line.trim().is_empty())
        .filter(|block| !block.is_empty())
        .map(|block| {
            let joined = block.iter().map(|l| l.trim()).collect::<Vec<_>>().join(" ");
            MULTI_SPACE_REGEX.replace_all(&joined, " ").trim().to_string()
        })
        .filter(|text| char_len(text) > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawLine;
    use crate::profiles::diary::classifier::classify_section;

    fn strings(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_remove_leading_line_number_withExactAndGarbled_shouldStrip() {
        assert_eq!(remove_leading_line_number("10  et fu fatto lo papa"), "et fu fatto lo papa");
        assert_eq!(remove_leading_line_number("IO  et fu fatto lo papa"), "et fu fatto lo papa");
        assert_eq!(remove_leading_line_number("et fu fatto lo papa"), "et fu fatto lo papa");
    }

    #[test]
    fn test_remove_inline_markers_withCallsAndFolio_shouldClean() {
        assert_eq!(remove_inline_markers("lo papa (a) andò || in Roma"), "lo papa andò in Roma");
        assert_eq!(remove_inline_markers("fu morto c. 37 A lo conte"), "fu morto lo conte");
        assert_eq!(remove_inline_markers("et fu grande festa (^) in Roma 15"), "et fu grande festa in Roma");
    }

    #[test]
    fn test_rejoin_hyphenated_lines_withLowercaseContinuation_shouldJoin() {
        let lines = strings(&["et fu gran-", "de festa", "Roma-", "Nova"]);
        assert_eq!(rejoin_hyphenated_lines(&lines), strings(&["et fu grande festa", "Roma-", "Nova"]));
    }

    #[test]
    fn test_collapse_blank_lines_shouldKeepOne() {
        let lines = strings(&["a", "", " ", "", "b"]);
        assert_eq!(collapse_blank_lines(lines), strings(&["a", "", "b"]));
    }

    #[test]
    fn test_clean_section_withFootnotes_shouldKeepDiaryParagraphs() {
        let text = [
            "et fu fatto lo papa in Roma con grande festa de tutto lo puopolo",
            "",
            "Dell'anno 1405 morse lo papa Innocenzo, et fu gran-",
            "de dolore in Roma.",
            "",
            "(1) Cf. MURATORI, R. I. S. III, 2",
            "della quale parla anche il cronista",
            "[1405]  DIARIA  RERUM  ROMANARUM.  29",
        ];
        let lines = RawLine::from_document(&text.join("\n"));
        let cleaned = clean_section(&classify_section(&lines));
        assert_eq!(
            cleaned.lines,
            strings(&[
                "et fu fatto lo papa in Roma con grande festa de tutto lo puopolo",
                "",
                "Dell'anno 1405 morse lo papa Innocenzo, et fu grande dolore in Roma.",
            ])
        );
        assert_eq!(cleaned.stats.footnote_lines_removed, 2);
        assert_eq!(cleaned.stats.header_lines_removed, 1);
        assert_eq!(cleaned.stats.hyphens_rejoined, 1);
        assert_eq!(block_paragraphs(&cleaned.lines).len(), 2);
    }
}
