/*!
 * Line classifier and margin cleaner for a prose commentary in Greek.
 *
 * The printed pages carry running headers (ΡΑΨΩΔΙΑ / ΟΔΥΣΣΕΙΑ plus the
 * book letter), margin line counters in steps of ten, page numbers and
 * interline OCR debris. Verse references to the commented text appear as
 * "(Vers. 19.)" in countless garbled forms.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{ClassifiedLine, LineCategory, RawLine};
use crate::text::script::{greek_block_shares, is_ascii_latin, is_greek_block};

/// Category of a line in a commentary section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentaryCategory {
    Commentary,
    PageHeader,
    MarginNumber,
    PageNumber,
    Empty,
    Noise,
}

impl LineCategory for CommentaryCategory {
    fn all() -> &'static [Self] {
        &[
            Self::Commentary,
            Self::PageHeader,
            Self::MarginNumber,
            Self::PageNumber,
            Self::Empty,
            Self::Noise,
        ]
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Commentary => "commentary",
            Self::PageHeader => "page_header",
            Self::MarginNumber => "margin_number",
            Self::PageNumber => "page_number",
            Self::Empty => "empty",
            Self::Noise => "noise",
        }
    }

    fn is_content(&self) -> bool {
        *self == Self::Commentary
    }

    fn is_empty(&self) -> bool {
        *self == Self::Empty
    }
}

/// Running header "ΡΑΨΩΔΙΑ", in the garbled forms the OCR produced
pub static RHAPSODIA_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[»Ῥ]*Ρ{0,2}ΑΨ[ΙΩΏΣΨ1-9\s.,]*[ΩΏΙΊ1ΣΤ][ΔΙ41][ΑΙ4.,\s\d]*").expect("Invalid rhapsodia regex")
});

/// Running header "ΟΔΥΣΣΕΙΑ", Greek or Latin look-alikes
pub static ODYSSEIA_HEADER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"O[A4][Y4][XZΣΞ][XZΣΞE]*EIA|ΟΔΥΣΣ[ΕΈ]").expect("Invalid odysseia regex")
});

static STANDALONE_MARGIN_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(10|20|30|40|50|60)\s*$").expect("Invalid margin number regex")
});

static PAGE_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{3,4})\s*[᾿'΄]?\s*$").expect("Invalid page number regex")
});

static MARGIN_ONLY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\d{1,3}\s*$").expect("Invalid margin regex")
});

static SHORT_MARGIN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,2}$").expect("Invalid margin regex")
});

static EDITION_HEADER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)CoMMEN|COMMEN|Opvss|Odyss.*Tox|COMMENT").expect("Invalid edition header regex")
});

static WORD_SPLIT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^a-zA-Zα-ωά-ώἀ-ῶΑ-ΩἈ-Ὧ]+").expect("Invalid word split regex")
});

/// Verse reference patterns, each replaced by a space
pub static VERSE_REFERENCE_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // (Vers. 19.)
        r"\(\s*[VWνΝ][eοo\s][rvau][sσ][,.\s]\s*\d+[^)]{0,20}\)",
        // (Vs. 19--22.  with a garbled closing bracket
        r"\(\s*[VW]\s*[eο]?[rv][sσ][.,]?\s*\d+[\s\d.—–\-]*[.)J}\]]",
        // (V ers. 19)
        r"\(\s*V\s+ers[.,]?\s*\d*[^)]{0,15}\)",
        r"\(\s*V\s*[eE]?[rvea]+[sσa]?[.,']?\s*[^)]{0,20}\)",
        // (Vers.)
        r"\(\s*[VW][eE]?r[sσva]+[.,]?\s*\)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid verse reference regex"))
    .collect()
});

/// "(Vers" glued to the following Greek word; the word is kept
pub static GLUED_VERSE_REFERENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(\s*[VW][eE]?r[sσva]+[.,]?\s*([Α-ΩἈ-Ὧα-ωά-ώἀ-ῶ᾿])").expect("Invalid verse reference regex")
});

/// "(Vers. 19" never closed
pub static UNCLOSED_VERSE_REFERENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(\s*[VWνΝ][eοo\s][rvau][sσ][,.\s]\s*\d+[\s\d.—–\-]*").expect("Invalid verse reference regex")
});

/// Margin digit read as "1o" or "20"
pub static BARE_MARGIN_DIGIT_O_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\s)\d[oO0](?:\s|$)").expect("Invalid margin digit regex")
});

pub static INNER_SMALL_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+\d{1,2}\s+").expect("Invalid small number regex")
});

/// Ordered replacements removing margin and header debris from one line
static MARGIN_CLEANUP: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    let rules: [(&str, &str); 19] = [
        // garbled running header inside a text line
        (r"[ΡῬP][αά4]?\s*Ψ\s*[ΩΏΙΜΤΊΥΝ][ΙΏΜΣΝΔ\s]{0,5}[^.]{0,30}", " "),
        (r"Ψ[ΙΩΏΜΤ][ΩΙΔΑ\s\d.,]{2,20}", " "),
        // margin debris before the first Greek word
        (r"^\s*\d+\s*[ΡῬP.]{0,3}[^α-ωά-ώἀ-ῶΑ-ΩἈ-Ὧ]*?([α-ωά-ώἀ-ῶΑ-ΩἈ-Ὧ]{2})", "$1"),
        (r"^\s*\d\s+[\.\s…]{2,}[^α-ωά-ώ]{0,15}", ""),
        (r"^\s*[A-Z][a-z]?\.\s*\d+\s*[,;.]\s*", ""),
        (r"\s*V[YA][&]\S*\s*", " "),
        // trailing digit clusters
        (r"[\s᾿'΄]*[᾿'()\[\]{}]*\d[\d'΄᾿()\-—–.\s&]{3,}$", ""),
        (r"\s+VA\s+", " "),
        (r"(?:^|\s)\d[oO0](?:\s|$)", " "),
        (r"\s+(10|20|30|40|50|60)\s*$", ""),
        (r"\s+\d{3,4}\s*$", ""),
        (r"^\d{3,4}[᾿'΄]?\s*([\s(])", "$1"),
        (r"^(10|20|30|40|50|60)\s+", ""),
        (r"\s+(10|20|30|40|50|60)\s+", " "),
        (r"\s+\d{1,2}\s+", " "),
        (r"(\s+\d{1,2}){2,}\s*$", ""),
        (r"\s*v[»>]\s*R[oe][wm]\.?\s*", " "),
        (r"\s*m\s*P\^?\*?\s*", " "),
        // leftover tokens mixing digits and symbols
        (r"(?:^|\s)([^α-ωά-ώἀ-ῶΑ-ΩἈ-Ὧ\s]{0,3}[\d][^\sα-ωά-ώἀ-ῶΑ-ΩἈ-Ὧ]{2,10})(?:\s|$)", " "),
    ];
    rules
        .iter()
        .map(|(pattern, replacement)| (Regex::new(pattern).expect("Invalid margin cleanup regex"), *replacement))
        .collect()
});

/// Remove every verse reference form from a text
pub fn strip_verse_references(text: &str) -> String {
    let mut cleaned = text.to_string();
    for re in VERSE_REFERENCE_REGEXES.iter() {
        cleaned = re.replace_all(&cleaned, " ").into_owned();
    }
    cleaned = GLUED_VERSE_REFERENCE_REGEX.replace_all(&cleaned, "$1").into_owned();
    UNCLOSED_VERSE_REFERENCE_REGEX.replace_all(&cleaned, " ").into_owned()
}

/// Strip verse references, margin numbers, page numbers and header debris
pub fn strip_margin_annotations(text: &str) -> String {
    let mut cleaned = strip_verse_references(text);
    for (re, replacement) in MARGIN_CLEANUP.iter() {
        cleaned = re.replace_all(&cleaned, *replacement).into_owned();
    }
    cleaned.trim().to_string()
}

/// Interline debris: punctuation-heavy lines made of one- and two-letter fragments
fn is_interline_noise(trimmed: &str, len: usize) -> bool {
    let mut alpha = 0usize;
    let mut spaces = 0usize;
    let mut other = 0usize;
    for c in trimmed.chars() {
        if c == ' ' {
            spaces += 1;
        } else if is_ascii_latin(c) || is_greek_block(c) {
            alpha += 1;
        } else {
            other += 1;
        }
    }
    if alpha == 0 || (other + spaces) as f64 / len as f64 <= 0.6 {
        return false;
    }

    let words: Vec<&str> = WORD_SPLIT_REGEX.split(trimmed).filter(|w| !w.is_empty()).collect();
    if words.len() < 3 {
        return false;
    }
    let avg = words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / words.len() as f64;
    avg <= 2.0
}

/// Classify one line; the preface accepts Latin prose as commentary
pub fn classify_line(text: &str, is_preface: bool) -> CommentaryCategory {
    use CommentaryCategory::*;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Empty;
    }

    let len = trimmed.chars().count();
    if len <= 3 {
        return if SHORT_MARGIN_REGEX.is_match(trimmed) { MarginNumber } else { Noise };
    }
    if STANDALONE_MARGIN_NUMBER_REGEX.is_match(trimmed) {
        return MarginNumber;
    }
    if PAGE_NUMBER_REGEX.is_match(trimmed) {
        return PageNumber;
    }
    if MARGIN_ONLY_REGEX.is_match(trimmed) {
        return MarginNumber;
    }
    if RHAPSODIA_REGEX.is_match(trimmed) || EDITION_HEADER_REGEX.is_match(trimmed) {
        return PageHeader;
    }

    let (greek, latin) = greek_block_shares(trimmed);

    if len < 10 && (greek < 0.3 || len < 5) {
        return Noise;
    }
    if len > 5 && len < 60 && is_interline_noise(trimmed, len) {
        return Noise;
    }
    if len > 5 && len < 30 && greek < 0.2 {
        return if is_preface && latin > 0.5 { Commentary } else { Noise };
    }
    if len >= 30 && (greek > 0.5 || (is_preface && latin > 0.5)) {
        return Commentary;
    }
    if (10..30).contains(&len) && (greek > 0.6 || (is_preface && latin > 0.5)) {
        return Commentary;
    }
    if len > 10 && greek < 0.3 && latin < 0.3 {
        return Noise;
    }
    if greek > 0.4 {
        return Commentary;
    }
    Noise
}

/// Classify every line of a section
pub fn classify_section(lines: &[RawLine], is_preface: bool) -> Vec<ClassifiedLine<CommentaryCategory>> {
    lines
        .iter()
        .map(|line| ClassifiedLine {
            line_number: line.number,
            text: line.text.clone(),
            category: classify_line(&line.text, is_preface),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use CommentaryCategory::*;

    #[test]
    fn test_classify_line_withNumbers_shouldSeparateMarginAndPage() {
        assert_eq!(classify_line("10", false), MarginNumber);
        assert_eq!(classify_line(" 30 ", false), MarginNumber);
        assert_eq!(classify_line("1418", false), PageNumber);
        assert_eq!(classify_line("127᾿", false), PageNumber);
        assert_eq!(classify_line("x.", false), Noise);
    }

    #[test]
    fn test_classify_line_withRunningHeader_shouldReturnPageHeader() {
        assert_eq!(classify_line("190 ΡΑΨΙΩΙΔ417.4 E Vs. αἰ--ὅο.", false), PageHeader);
        assert_eq!(classify_line("EUSTATHII COMMENTARII", false), PageHeader);
    }

    #[test]
    fn test_classify_line_withGreekProse_shouldReturnCommentary() {
        let line = "Ὅτι τὴν Ὀδύσσειαν ὁ ποιητὴς ἠθικώτερον συνέθετο";
        assert_eq!(classify_line(line, false), Commentary);
        assert_eq!(classify_line("ὁ ποιητὴς λέγει", false), Commentary);
    }

    #[test]
    fn test_classify_line_withLatinPreface_shouldDependOnSection() {
        let line = "Praefatio editoris de codicibus";
        assert_eq!(classify_line(line, true), Commentary);
        assert_eq!(classify_line(line, false), Noise);
    }

    #[test]
    fn test_classify_line_withInterlineDebris_shouldReturnNoise() {
        assert_eq!(classify_line("ἡ . , τ ; ο . ν ' α", false), Noise);
    }

    #[test]
    fn test_strip_margin_annotations_withVerseReference_shouldRemoveIt() {
        let cleaned = strip_margin_annotations("(Vers. 19.) Ὅτι ὁ ποιητὴς λέγει");
        assert_eq!(cleaned, "Ὅτι ὁ ποιητὴς λέγει");
    }

    #[test]
    fn test_strip_margin_annotations_withMarginNumbers_shouldRemoveThem() {
        assert_eq!(strip_margin_annotations("ὁ ποιητὴς 20 λέγει τοῦτο"), "ὁ ποιητὴς λέγει τοῦτο");
        assert_eq!(strip_margin_annotations("ὁ ποιητὴς λέγει τοῦτο 1418"), "ὁ ποιητὴς λέγει τοῦτο");
    }

    #[test]
    fn test_strip_margin_annotations_withGluedReference_shouldKeepWord() {
        assert_eq!(strip_margin_annotations("(Vers Ὅτι λέγει"), "Ὅτι λέγει");
    }

    #[test]
    fn test_classify_section_withMixedPage_shouldKeepOneLinePerInputInOrder() {
        let text = [
            "EUSTATHII COMMENTARII",
            "EUSTATHII COMMENTARII",
            "",
            "Ὅτι τὴν Ὀδύσσειαν ὁ ποιητὴς ἠθικώτερον συνέθετο",
            "10",
            "ἡ . , τ ; ο . ν ' α",
            "",
            "ὁ ποιητὴς λέγει",
            "1418",
            "x.",
        ];
        let document = RawLine::from_document(&text.join("\n"));
        let section = &document[1..];

        let classified = classify_section(section, false);

        assert_eq!(classified.len(), section.len());
        for (line, raw) in classified.iter().zip(section) {
            assert_eq!(line.line_number, raw.number);
            assert_eq!(line.text, raw.text);
        }
        let categories: Vec<_> = classified.iter().map(|l| l.category).collect();
        assert_eq!(
            categories,
            vec![PageHeader, Empty, Commentary, MarginNumber, Noise, Empty, Commentary, PageNumber, Noise]
        );
        assert_eq!(classified[0].line_number, 1);
    }
}
