/*!
 * Line tagging for a critical edition of a diary.
 *
 * Each printed page carries diary text, then apparatus criticus lines
 * `(a)`, `(b)`, then scholarly notes `(1)`, `(2)` (often in two columns),
 * then the next page header. Tagging runs in four passes:
 *
 * 1. obvious categories per line
 * 2. footnote state propagated forward until a page header or a strong
 *    diary indicator (year entry, dated entry, numbered section)
 * 3. orphaned footnote content adopted when the previous non-blank line
 *    within three lines is a footnote or header
 * 4. footnote blocks extended through consecutive footnote-like lines
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{ClassifiedLine, LineCategory, RawLine};
use crate::text::normalize::char_len;

/// Tag of a diary line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiaryCategory {
    Text,
    Blank,
    Header,
    Folio,
    LineNumber,
    Footnote,
}

impl LineCategory for DiaryCategory {
    fn all() -> &'static [Self] {
        &[
            Self::Text,
            Self::Blank,
            Self::Header,
            Self::Folio,
            Self::LineNumber,
            Self::Footnote,
        ]
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Blank => "blank",
            Self::Header => "header",
            Self::Folio => "folio",
            Self::LineNumber => "line_number",
            Self::Footnote => "footnote",
        }
    }

    fn is_content(&self) -> bool {
        *self == Self::Text
    }

    fn is_empty(&self) -> bool {
        *self == Self::Blank
    }
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Invalid diary regex")
}

// Page headers
static RUNNING_HEADER_REGEX: Lazy<Regex> = Lazy::new(|| re(r"(?i)^\[[\di][0-9ijo]{2,3}\]\s+DIARIA\s+RERUM\s+ROM"));
static AUTHOR_HEADER_REGEX: Lazy<Regex> = Lazy::new(|| re(r"(?i)^[a-z0-9]+\s+STEPHANI\s+INFESSURAE"));
static TITLE_HEADER_REGEX: Lazy<Regex> = Lazy::new(|| re(r"(?i)^DIARIA\s+RERUM\s+ROM"));
static PAGE_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| re(r"^\d{1,3}\s*$"));
static GARBLED_PAGE_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| re(r"^[\$\d][0-9I]{1,2}\s*$"));
static BRACKETED_YEAR_REGEX: Lazy<Regex> = Lazy::new(|| re(r"^\[[\di][0-9ijo]{2,3}\]\s*$"));
static PREFACE_HEADER_REGEX: Lazy<Regex> = Lazy::new(|| re(r"(?i)^PREFAZIONE\.\s+[IVXLCDM]+\s*$"));
static EDITOR_HEADER_REGEX: Lazy<Regex> = Lazy::new(|| re(r"(?i)^O\.\s*TOMMASINI"));
static NUMBERED_EDITOR_HEADER_REGEX: Lazy<Regex> = Lazy::new(|| re(r"(?i)^[A-Z]{1,4}\s+O\.\s*TOMMAS"));
static SHORT_AUTHOR_HEADER_REGEX: Lazy<Regex> = Lazy::new(|| re(r"(?i)^St\.\s+Infessura\.?\s*$"));
static ROMAN_PAGE_REGEX: Lazy<Regex> = Lazy::new(|| re(r"(?i)^[ivxlcdm]+\s*$"));
static OCR_PAGE_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| re(r"^[i1-9]\d{0,2}[»>)]*\s*$"));

// Folio references and editorial line numbers
static FOLIO_REGEX: Lazy<Regex> = Lazy::new(|| re(r"^[ec]\.\s+\d+\s*[ABab]\s*$"));
static LINE_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    re(r"^(?:5|10|15|20|25|30|IO|io|ìo|ro|ij|I5|\[5|\$5|2\(|2o|ao|a5|2\$|\^c|3o|50)\s*$")
});

// Apparatus criticus and scholarly notes
static APPARATUS_LETTER_REGEX: Lazy<Regex> = Lazy::new(|| re(r"^\([a-z]\.?\)\s+"));
static SIGLA_PAIR_START_REGEX: Lazy<Regex> = Lazy::new(|| re(r"^[CEMORSVP]['^]?\s+[CEMORSVP]['^]?\s"));
static INLINE_APPARATUS_REGEX: Lazy<Regex> = Lazy::new(|| re(r"\([a-z]\)\s+[CEMORSVP]['^]?\s"));
static SIGLUM_REGEX: Lazy<Regex> = Lazy::new(|| re(r"[CEMORSVP]['^]?\s"));
static SIGLUM_READING_REGEX: Lazy<Regex> = Lazy::new(|| {
    re(r"^[CEMORSVP]['^]?\s+(?i:de|di|e\s|et\s|in\s|manca|sopra|corregge|annota|legga|reca)")
});
static VARIANT_READING_REGEX: Lazy<Regex> = Lazy::new(|| re(r"^(?:Cosi|Così)\s+[CEMORSVP]"));
static MISSING_IN_REGEX: Lazy<Regex> = Lazy::new(|| re(r"^In\s+[CEMORSVP]['^]?\s+(?i:manca|è)"));
static SCHOLARLY_NOTE_REGEX: Lazy<Regex> = Lazy::new(|| re(r"^\(\d+\)\s+"));

// Footnote content
static SIGLA_START_REGEX: Lazy<Regex> = Lazy::new(|| re(r"^[A-Z]['^]?\s+[A-Z]['^]?\s"));
static QUOTE_START_REGEX: Lazy<Regex> = Lazy::new(|| re(r#"^(?:[«"K]\s|«)"#));
static TRAILING_QUOTE_REGEX: Lazy<Regex> = Lazy::new(|| re(r"«[^»]*»?\s*$"));
static NARRATIVE_START_REGEX: Lazy<Regex> = Lazy::new(|| {
    re(r"(?i)^(?:Dell'anno|Nell'anno|A\s+d[iì]|Die\s|et\s+li\s|lo\s+papa|li\s+Romani)")
});
static DATED_START_REGEX: Lazy<Regex> = Lazy::new(|| re(r"(?i)^(?:Dell'anno|Nell'anno|A\s+d[iì]|Die\s)"));
static NARRATIVE_SIGLA_EXCEPTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    re(r"(?i)^(?:Dell'anno|Nell'anno|A\s+d[iì]|Die\s|et\s+(?:li|lo)|lo\s+papa|li\s+Romani|Dopo|Poi)")
});
static COMMENTARY_EXCEPTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    re(r"(?i)^(?:Dell'anno|Nell'anno|A\s+d[iì]|lo\s+papa|li\s+Romani)")
});
static DOCUMENT_EXCEPTION_REGEX: Lazy<Regex> = Lazy::new(|| re(r"^(?:Dell'anno|Nell'anno|A\s+d[iì])"));
static TWO_COLUMN_EXCEPTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    re(r"(?i)^(?:Dell'anno|Nell'anno|et\s|A\s+d[iì]|Die\s)")
});
static SIGLUM_WORD_REGEX: Lazy<Regex> = Lazy::new(|| re(r"\b[CEMORSVPNULA]['^i\d]?\s"));
static VARIANT_VOCABULARY_REGEX: Lazy<Regex> = Lazy::new(|| {
    re(r"(?i)\b(?:prohibitum|ventum|manca|saria|così|cosi|corregge)\b")
});
static MANCA_REGEX: Lazy<Regex> = Lazy::new(|| re(r"\bmanca\b"));
static CORRECTION_REGEX: Lazy<Regex> = Lazy::new(|| re(r"\b(?:corregge|legga|reca|annota)\b"));
static SIGLUM_BOUNDARY_REGEX: Lazy<Regex> = Lazy::new(|| re(r"\b[CEMORSVP]['^]?\b"));
static EDITORIAL_OPINION_REGEX: Lazy<Regex> = Lazy::new(|| re(r"\b(?:interpretò|vuole dire|Erroneamente)\b"));
static SHORT_EDITOR_REGEX: Lazy<Regex> = Lazy::new(|| re(r"\bl'I\.\s*[;,]"));
static POPE_ABBREVIATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    re(r#"\b(?:Clem\w*|Bened\w*|Greg\w*|Inno\w*|Urban\w*)[.»"'^]*\s+[VIX\d]"#)
});
static PROPHECY_REGEX: Lazy<Regex> = Lazy::new(|| re(r"(?i)\bprofezi[ae]\b"));
static DOCUMENT_REFERENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    re(r"\b(?:Diario|Diar\.|Bull\.|Reg\.|Cod\.|Arch\.\s+Vat)")
});
static TWO_COLUMN_REGEX: Lazy<Regex> = Lazy::new(|| re(r"\S\s{3,}\S"));
static CHAPTER_REFERENCE_REGEX: Lazy<Regex> = Lazy::new(|| re(r"\bcap\.\s+[IVX\d]"));
static EDITORIAL_VOCABULARY_REGEX: Lazy<Regex> = Lazy::new(|| {
    re(r"(?i)\b(?:interpolazione|annotazione|postilla|variante|lezione|codice|codici)\b")
});

/// Always footnote material when present
static FOOTNOTE_MARKERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\bCf\.\s",
        r"(?i)loc\.\s*cit|op\.\s*cit",
        r"(?i)Arch\.\s+Soc\.",
        r"\bp+\.\s+\d",
        r"\bed\.\s+[A-Z]",
        r"\bmss?\.\s",
        r"(?i)\b(?:ce|fo|fol)\.\s+\d",
        r"\b(?:MURATORI|ECKHART|CONTELORI|THEINER|PASTOR|CREIGHTON|GREGOROVIUS|REUMONT|VILLANI|TUCCIA|MASTRO|PAPIEN|THAST|NARD)\b",
        r"(?i)\b(?:Muratori|Eckhart|Contelori|Theiner|Pastor|Creighton|Gregorovius|Villani|Tuccia|Pipini|Petrarcha|Bernard\s+Gui|Platina|Dante|Petrarch|Ptolemaei)\s*[,;.]",
        r"\b[A-Z]\.\s+Villani\b",
        r"\bcol\.\s+\d",
        r"\bvol\.\s+[IVX\d]",
        r"\b(?:Croniche|Annali|Cronicon)\b|\b(?:Hist|Chron)\.",
        r"^È\s+(?:evidente|noto|chiaro)\b",
        r"(?i)\b(?:nota\s+marginale|in\s+margine|frammento\s+de)\b",
    ]
    .iter()
    .map(|pattern| re(pattern))
    .collect()
});

// Strong diary indicators
static YEAR_ENTRY_REGEX: Lazy<Regex> = Lazy::new(|| re(r"(?i)^(?:Dell'anno|Nell'anno)\s"));
static YEAR_OR_DOMINI_REGEX: Lazy<Regex> = Lazy::new(|| re(r"(?i)^(?:Dell'anno|Nell'anno|Anno\s+Domini)"));
static LATIN_DATE_REGEX: Lazy<Regex> = Lazy::new(|| re(r"^Die\s+[\.\dIVXLC]"));
static LATIN_DATE_LOOSE_REGEX: Lazy<Regex> = Lazy::new(|| re(r"(?i)^Die\s+[\.\dIVXLC]"));
static ITALIAN_DATE_REGEX: Lazy<Regex> = Lazy::new(|| re(r"^A\s+d[iì]\s+\d"));
static ITALIAN_DATE_LOOSE_REGEX: Lazy<Regex> = Lazy::new(|| re(r"(?i)^A\s+d[iì]\s+\d"));
static SECTION_HEADER_REGEX: Lazy<Regex> = Lazy::new(|| re(r"^[IVX]+\.\s+[A-Z]"));
static CF_REGEX: Lazy<Regex> = Lazy::new(|| re(r"Cf\."));
static BIBLIOGRAPHY_REGEX: Lazy<Regex> = Lazy::new(|| {
    re(r"\b(?:Cf\.|loc\.\s*cit|op\.\s*cit|Arch\.\s+Soc|cod\.|mss?\.|ed\.)")
});
static CITED_AUTHOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    re(r"(?i)\b(?:Bernard|Villani|Muratori|Platina|Dante|Petrarch|Ptolemaei)\b")
});
static CITED_WORK_REGEX: Lazy<Regex> = Lazy::new(|| re(r"\b(?:Croniche|Annali)\b|\b(?:Hist|Chron)\."));
static SCHOLARLY_ABBREVIATION_REGEX: Lazy<Regex> = Lazy::new(|| re(r"\b(?:Cf\.|cod\.|mss?\.|ed\.)"));
static ARCHIVE_REGEX: Lazy<Regex> = Lazy::new(|| re(r"\b(?:Cf\.|loc\.\s*cit|Arch\.\s+Soc|Arch\.\s+Vat)"));
static CHURCH_VOCABULARY_REGEX: Lazy<Regex> = Lazy::new(|| {
    re(r"(?i)\b(?:papa|pontefice|cardinali|Romani|Roma|conclave|chiesa)\b")
});
static LATIN_NARRATIVE_REGEX: Lazy<Regex> = Lazy::new(|| {
    re(r"\b(?:fuit|sunt|erat|fecit|venit|mortuus|dictus|dominus)\b")
});
static CONJUNCTION_START_REGEX: Lazy<Regex> = Lazy::new(|| re(r"^(?:ET|et)\s+"));
static NARRATIVE_OPENING_REGEX: Lazy<Regex> = Lazy::new(|| {
    re(r"(?i)^(?:Dopo|Poi|Coaciosia|Cominciò|Questo|Quell'|Item|Novissime|Huic)\s")
});

/// Running headers, page numbers and editor headers
pub fn is_page_header(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }
    let len = char_len(trimmed);

    RUNNING_HEADER_REGEX.is_match(trimmed)
        || AUTHOR_HEADER_REGEX.is_match(trimmed)
        || (TITLE_HEADER_REGEX.is_match(trimmed) && len < 40)
        || (PAGE_NUMBER_REGEX.is_match(trimmed) && trimmed.parse::<u32>().map(|n| n > 35).unwrap_or(false))
        || (GARBLED_PAGE_NUMBER_REGEX.is_match(trimmed) && len <= 4)
        || BRACKETED_YEAR_REGEX.is_match(trimmed)
        || PREFACE_HEADER_REGEX.is_match(trimmed)
        || (EDITOR_HEADER_REGEX.is_match(trimmed) && len < 20)
        || NUMBERED_EDITOR_HEADER_REGEX.is_match(trimmed)
        || SHORT_AUTHOR_HEADER_REGEX.is_match(trimmed)
        || (ROMAN_PAGE_REGEX.is_match(trimmed) && len <= 6)
        || (OCR_PAGE_NUMBER_REGEX.is_match(trimmed) && len <= 5)
}

/// Standalone manuscript folio reference such as `c. 16 a`
pub fn is_folio_reference(line: &str) -> bool {
    FOLIO_REGEX.is_match(line.trim())
}

/// Standalone editorial line number (5 to 30), OCR variants included
pub fn is_editorial_line_number(line: &str) -> bool {
    LINE_NUMBER_REGEX.is_match(line.trim())
}

/// First line of an apparatus criticus note
pub fn is_apparatus_line(line: &str) -> bool {
    let trimmed = line.trim();
    APPARATUS_LETTER_REGEX.is_match(trimmed)
        || (SIGLA_PAIR_START_REGEX.is_match(trimmed) && char_len(trimmed) < 130)
        || (INLINE_APPARATUS_REGEX.is_match(trimmed) && SIGLUM_REGEX.find_iter(trimmed).count() >= 2)
        || SIGLUM_READING_REGEX.is_match(trimmed)
        || VARIANT_READING_REGEX.is_match(trimmed)
        || MISSING_IN_REGEX.is_match(trimmed)
}

/// First line of a numbered scholarly note
pub fn is_scholarly_note(line: &str) -> bool {
    SCHOLARLY_NOTE_REGEX.is_match(line.trim())
}

/// Whether a line reads like footnote material; `line` is the raw line so
/// two-column layouts remain visible
pub fn is_footnote_content(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }
    let len = char_len(trimmed);

    if SIGLA_START_REGEX.is_match(trimmed) && len < 120 {
        return true;
    }
    if FOOTNOTE_MARKERS.iter().any(|re| re.is_match(trimmed)) {
        return true;
    }
    if SIGLA_PAIR_START_REGEX.is_match(trimmed) && len < 100 {
        return true;
    }
    if QUOTE_START_REGEX.is_match(trimmed) {
        return true;
    }
    if TRAILING_QUOTE_REGEX.is_match(trimmed) && len < 100 && !NARRATIVE_START_REGEX.is_match(trimmed) {
        return true;
    }
    if trimmed.matches('«').count() >= 2 {
        return true;
    }

    let sigla = SIGLUM_WORD_REGEX.find_iter(trimmed).count();
    if sigla >= 3 && len < 150 && !NARRATIVE_SIGLA_EXCEPTION_REGEX.is_match(trimmed) {
        return true;
    }
    if sigla >= 2 && len < 150 && VARIANT_VOCABULARY_REGEX.is_match(trimmed) && !DATED_START_REGEX.is_match(trimmed) {
        return true;
    }
    if MANCA_REGEX.is_match(trimmed) && SIGLUM_REGEX.is_match(trimmed) {
        return true;
    }
    if CORRECTION_REGEX.is_match(trimmed) && SIGLUM_BOUNDARY_REGEX.is_match(trimmed) {
        return true;
    }
    if EDITORIAL_OPINION_REGEX.is_match(trimmed) && !COMMENTARY_EXCEPTION_REGEX.is_match(trimmed) {
        return true;
    }
    if SHORT_EDITOR_REGEX.is_match(trimmed) && len < 120 {
        return true;
    }
    if POPE_ABBREVIATION_REGEX.find_iter(trimmed).count() >= 2 {
        return true;
    }
    if PROPHECY_REGEX.is_match(trimmed) && len < 120 {
        return true;
    }
    if DOCUMENT_REFERENCE_REGEX.is_match(trimmed) && !DOCUMENT_EXCEPTION_REGEX.is_match(trimmed) {
        return true;
    }
    if TWO_COLUMN_REGEX.is_match(line) && len < 100 && !TWO_COLUMN_EXCEPTION_REGEX.is_match(trimmed) {
        return true;
    }
    if CHAPTER_REFERENCE_REGEX.is_match(trimmed) && len < 100 {
        return true;
    }
    EDITORIAL_VOCABULARY_REGEX.is_match(trimmed) && !DATED_START_REGEX.is_match(trimmed)
}

/// Strong positive evidence of diary narrative
pub fn is_clear_diary_text(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || is_footnote_content(line) {
        return false;
    }
    if ARCHIVE_REGEX.is_match(trimmed) || CHAPTER_REFERENCE_REGEX.is_match(trimmed) {
        return false;
    }
    let len = char_len(trimmed);

    if YEAR_OR_DOMINI_REGEX.is_match(trimmed) {
        return true;
    }
    if LATIN_DATE_LOOSE_REGEX.is_match(trimmed) && len > 20 {
        return true;
    }
    if ITALIAN_DATE_LOOSE_REGEX.is_match(trimmed) && len > 15 {
        return true;
    }
    if SECTION_HEADER_REGEX.is_match(trimmed) && !CF_REGEX.is_match(trimmed) {
        return true;
    }
    let scholarly = SCHOLARLY_ABBREVIATION_REGEX.is_match(trimmed);
    if len > 60 && !scholarly && (CHURCH_VOCABULARY_REGEX.is_match(trimmed) || LATIN_NARRATIVE_REGEX.is_match(trimmed)) {
        return true;
    }
    if CONJUNCTION_START_REGEX.is_match(trimmed) && len > 40 && !scholarly {
        return true;
    }
    NARRATIVE_OPENING_REGEX.is_match(trimmed) && len > 30
}

/// Structural markers that end footnote territory
fn breaks_footnote(trimmed: &str) -> bool {
    let len = char_len(trimmed);
    YEAR_ENTRY_REGEX.is_match(trimmed)
        || (LATIN_DATE_REGEX.is_match(trimmed) && len > 30 && !trimmed.starts_with('«') && !CF_REGEX.is_match(trimmed))
        || (ITALIAN_DATE_REGEX.is_match(trimmed) && len > 20)
        || (SECTION_HEADER_REGEX.is_match(trimmed) && !CF_REGEX.is_match(trimmed))
}

/// Long narrative line with no trace of scholarly apparatus
fn is_plain_narrative(line: &str, trimmed: &str) -> bool {
    char_len(trimmed) > 80
        && !is_footnote_content(line)
        && !BIBLIOGRAPHY_REGEX.is_match(trimmed)
        && !trimmed.contains('«')
        && !CITED_AUTHOR_REGEX.is_match(trimmed)
        && !CITED_WORK_REGEX.is_match(trimmed)
}

fn initial_tag(line: &str) -> DiaryCategory {
    use DiaryCategory::*;
    if line.trim().is_empty() {
        Blank
    } else if is_page_header(line) {
        Header
    } else if is_folio_reference(line) {
        Folio
    } else if is_editorial_line_number(line) {
        LineNumber
    } else if is_apparatus_line(line) || is_scholarly_note(line) {
        Footnote
    } else {
        Text
    }
}

/// Tag every line of a section
pub fn tag_lines(lines: &[RawLine]) -> Vec<DiaryCategory> {
    use DiaryCategory::*;

    let mut tags: Vec<DiaryCategory> = lines.iter().map(|l| initial_tag(&l.text)).collect();

    // Forward propagation of footnote state
    let mut in_footnote = false;
    for (i, line) in lines.iter().enumerate() {
        match tags[i] {
            Footnote => in_footnote = true,
            Header if in_footnote => in_footnote = false,
            Blank if in_footnote => tags[i] = Footnote,
            Text if in_footnote => {
                let trimmed = line.text.trim();
                if breaks_footnote(trimmed) || is_plain_narrative(&line.text, trimmed) {
                    in_footnote = false;
                } else {
                    tags[i] = Footnote;
                }
            }
            _ => {}
        }
    }

    // Orphaned footnote content after a footnote or header
    for i in 0..lines.len() {
        if tags[i] != Text || !is_footnote_content(&lines[i].text) {
            continue;
        }
        let previous = (i.saturating_sub(3)..i).rev().find(|&j| tags[j] != Blank);
        if matches!(previous.map(|j| tags[j]), Some(Footnote) | Some(Header)) {
            tags[i] = Footnote;
        }
    }

    // Footnote blocks through consecutive footnote-like lines
    let mut in_block = false;
    for i in 0..lines.len() {
        match tags[i] {
            Footnote => in_block = true,
            Header if in_block => in_block = false,
            Text if in_block => {
                let raw = &lines[i].text;
                let trimmed = raw.trim();
                if breaks_block(trimmed) {
                    in_block = false;
                } else if is_footnote_content(raw) {
                    tags[i] = Footnote;
                } else if char_len(trimmed) < 60 && !is_clear_diary_text(raw) && next_is_footnote(lines, &tags, i) {
                    tags[i] = Footnote;
                } else {
                    in_block = false;
                }
            }
            _ => {}
        }
    }

    tags
}

fn breaks_block(trimmed: &str) -> bool {
    let len = char_len(trimmed);
    YEAR_ENTRY_REGEX.is_match(trimmed)
        || (LATIN_DATE_REGEX.is_match(trimmed) && len > 30)
        || (ITALIAN_DATE_REGEX.is_match(trimmed) && len > 20)
        || SECTION_HEADER_REGEX.is_match(trimmed)
}

/// Whether the next non-blank line within two lines reads as footnote content
fn next_is_footnote(lines: &[RawLine], tags: &[DiaryCategory], i: usize) -> bool {
    let end = (i + 3).min(lines.len());
    (i + 1..end)
        .find(|&j| tags[j] != DiaryCategory::Blank && !lines[j].text.trim().is_empty())
        .map(|j| is_footnote_content(&lines[j].text))
        .unwrap_or(false)
}

/// Classify every line of a section
pub fn classify_section(lines: &[RawLine]) -> Vec<ClassifiedLine<DiaryCategory>> {
    tag_lines(lines)
        .into_iter()
        .zip(lines)
        .map(|(category, line)| ClassifiedLine {
            line_number: line.number,
            text: line.text.clone(),
            category,
        })
        .collect()
}
