// @module: Residual apparatus checks for cleaned diary chapters

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{ClassifiedLine, ProcessedChapter};
use crate::pipeline::quality::QualityReport;
use crate::text::normalize::{char_len, percent1};
use crate::text::Script;

use super::classifier::DiaryCategory;

pub const MAX_CARETS: usize = 10;
pub const MAX_PIPES: usize = 5;
pub const MAX_APPARATUS_HITS: usize = 5;

static YEAR_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Nell'anno\s+\d+|Dell'anno").expect("Invalid year marker regex")
});

/// Phrases of the editor's apparatus that should never reach the diary text
static APPARATUS_VOCABULARY: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)Gregorovius",
        r"(?i)Lo stesso testo",
        r"(?i)La stessa legione",
        r"(?i)è corretta a e\.",
        r"(?i)corretto poi a",
        r"(?i)inscribitur",
        r"(?i)postilla di mano",
        r"(?i)brano tra \*",
        r"(?i)traduce in italiano",
        r"(?i)Id\. in R",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid apparatus vocabulary regex"))
    .collect()
});

/// Check a cleaned diary chapter for leftover markers and apparatus
pub fn check_diary_quality(chapter: &ProcessedChapter, classified: &[ClassifiedLine<DiaryCategory>]) -> QualityReport {
    let mut report = QualityReport::new(chapter.chapter_number, chapter.title.clone());
    report.set_category_counts(classified);

    let texts: Vec<&str> = chapter.source_content.paragraphs.iter().map(|p| p.text.as_str()).collect();
    report.paragraph_count = texts.len();
    report.set_line_stats(&texts);
    report.total_characters = texts.iter().map(|t| char_len(t)).sum();

    let text = texts.join("\n\n");
    report.target_script_percent = percent1(Script::Latin.share(&text));

    let carets = text.matches('^').count();
    let pipes = text.matches('|').count();
    let headers = text.matches("DIARIA RERUM ROMANARUM").count();
    let apparatus: usize = APPARATUS_VOCABULARY.iter().map(|re| re.find_iter(&text).count()).sum();
    let year_markers = YEAR_MARKER_REGEX.find_iter(&text).count();

    report.set_metric("carets", carets as f64);
    report.set_metric("pipes", pipes as f64);
    report.set_metric("headers", headers as f64);
    report.set_metric("apparatusPatterns", apparatus as f64);
    report.set_metric("yearMarkers", year_markers as f64);

    if texts.is_empty() {
        report.error("No paragraphs extracted");
    }
    if carets > MAX_CARETS {
        report.warn(format!("High caret count: {} (should be < 10)", carets));
    }
    if pipes > MAX_PIPES {
        report.warn(format!("High pipe count: {} (should be < 5)", pipes));
    }
    if headers > 0 {
        report.warn(format!("Page headers remaining: {}", headers));
    }
    if apparatus > MAX_APPARATUS_HITS {
        report.warn(format!("Apparatus vocabulary remaining: {} instances", apparatus));
    }

    report.finalize()
}
