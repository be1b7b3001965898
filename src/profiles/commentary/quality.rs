// @module: Quality checks for extracted commentary

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{ClassifiedLine, ProcessedChapter};
use crate::pipeline::quality::QualityReport;
use crate::text::normalize::{char_len, percent1};
use crate::text::script::greek_block_shares;

use super::classifier::CommentaryCategory;

static LEADING_PAGE_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{3,4}\s").expect("Invalid page number regex")
});

static TRAILING_PAGE_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s\d{3,4}$").expect("Invalid page number regex")
});

static LEAKED_VERSE_REFERENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\([VWνΝ][eοo][rv]").expect("Invalid verse reference regex")
});

pub const MIN_PARAGRAPHS: usize = 3;
pub const MIN_TOTAL_CHARS: usize = 1000;
pub const MIN_GREEK_SHARE: f64 = 0.6;
pub const MAX_DIGITS: usize = 10;
pub const MIN_COMMENTARY_SHARE: f64 = 0.5;
pub const MAX_NOISE_SHARE: f64 = 0.3;

/// Check a commentary chapter; chapter 0 is the Latin preface
pub fn check_commentary_quality(
    chapter: &ProcessedChapter,
    classified: &[ClassifiedLine<CommentaryCategory>],
) -> QualityReport {
    let mut report = QualityReport::new(chapter.chapter_number, chapter.title.clone());
    report.set_category_counts(classified);
    let is_preface = chapter.chapter_number == 0;

    let texts: Vec<&str> = chapter.source_content.paragraphs.iter().map(|p| p.text.as_str()).collect();
    report.paragraph_count = texts.len();
    report.set_line_stats(&texts);
    let total_chars: usize = texts.iter().map(|t| char_len(t)).sum();
    report.total_characters = total_chars;

    let (greek, latin) = greek_block_shares(&texts.join(" "));
    report.target_script_percent = percent1(greek);

    let avg = if texts.is_empty() { 0.0 } else { total_chars as f64 / texts.len() as f64 };
    let digit_count = texts.iter().flat_map(|t| t.chars()).filter(|c| c.is_ascii_digit()).count();
    report.set_metric("totalRawLines", classified.len() as f64);
    report.set_metric("avgParagraphLength", avg.round());
    report.set_metric("digitCount", digit_count as f64);

    if texts.is_empty() {
        report.error("No paragraphs extracted");
    }
    if texts.len() < MIN_PARAGRAPHS && !is_preface {
        report.error(format!("Very few paragraphs: {}", texts.len()));
    }
    if total_chars < MIN_TOTAL_CHARS && !is_preface {
        report.warn(format!("Low total character count: {}", total_chars));
    }
    if !is_preface && greek < MIN_GREEK_SHARE {
        report.warn(format!("Low Greek character percentage: {:.1}%", greek * 100.0));
    }
    if is_preface && latin < 0.3 && greek < 0.5 {
        report.warn(format!(
            "Preface has low Latin/Greek content: Latin={:.1}%, Greek={:.1}%",
            latin * 100.0,
            greek * 100.0
        ));
    }

    let short = report.add_samples("shortParagraphs", texts.iter().copied().filter(|t| char_len(t) < 20));
    if short > 0 {
        report.warn(format!("{} paragraphs under 20 chars (possible noise)", short));
    }

    let numbered = report.add_samples(
        "pageNumbers",
        texts
            .iter()
            .copied()
            .filter(|t| LEADING_PAGE_NUMBER_REGEX.is_match(t) || TRAILING_PAGE_NUMBER_REGEX.is_match(t)),
    );
    if numbered > 0 {
        report.warn(format!("{} paragraphs still contain page numbers", numbered));
    }

    if digit_count > MAX_DIGITS {
        report.warn(format!("{} Arabic digit characters remain in output", digit_count));
    }

    let references = report.add_samples(
        "verseReferences",
        texts.iter().copied().filter(|t| LEAKED_VERSE_REFERENCE_REGEX.is_match(t)),
    );
    if references > 0 {
        report.warn(format!("{} paragraphs still contain verse references", references));
    }

    let commentary = report.category_count("commentary");
    let noise = report.category_count("noise");
    let non_empty = commentary
        + noise
        + report.category_count("page_header")
        + report.category_count("margin_number")
        + report.category_count("page_number");
    if non_empty > 0 {
        let commentary_share = commentary as f64 / non_empty as f64;
        if commentary_share < MIN_COMMENTARY_SHARE {
            report.warn(format!(
                "Low commentary percentage: {:.1}% of non-empty lines",
                commentary_share * 100.0
            ));
        }
        let noise_share = noise as f64 / non_empty as f64;
        if noise_share > MAX_NOISE_SHARE {
            report.warn(format!("High noise percentage: {:.1}%", noise_share * 100.0));
        }
    }

    report.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChapterContent, RawLine};
    use crate::pipeline::QualityStatus;
    use crate::profiles::commentary::classifier::classify_section;

    const GREEK: &str = "Ὅτι τὴν Ὀδύσσειαν ὁ ποιητὴς ἠθικώτερον συνέθετο καὶ ἁπλούστερον";

    fn chapter(number: u32, texts: Vec<String>) -> ProcessedChapter {
        ProcessedChapter {
            chapter_number: number,
            title: format!("Commentary on Odyssey Book {}", number),
            source_content: ChapterContent::from_texts(texts, 1),
        }
    }

    #[test]
    fn test_check_commentary_quality_withRichBook_shouldPass() {
        let paragraph = vec![GREEK; 6].join(" ");
        let texts = vec![paragraph.clone(), paragraph.clone(), paragraph];
        let lines = RawLine::from_document(&vec![GREEK; 18].join("\n"));
        let report = check_commentary_quality(&chapter(3, texts), &classify_section(&lines, false));
        assert_eq!(report.status, QualityStatus::Pass, "{:?}", report.warnings);
        assert_eq!(report.metrics["digitCount"], 0.0);
        assert_eq!(report.category_count("commentary"), 18);
    }

    #[test]
    fn test_check_commentary_quality_withFewParagraphs_shouldFailOutsidePreface() {
        let texts = vec![GREEK.to_string()];
        let book = check_commentary_quality(&chapter(4, texts.clone()), &[]);
        assert_eq!(book.status, QualityStatus::Fail);
        assert!(book.errors.contains(&"Very few paragraphs: 1".to_string()));
        assert!(book.warnings.contains(&format!("Low total character count: {}", char_len(GREEK))));

        let preface = check_commentary_quality(&chapter(0, texts), &[]);
        assert_eq!(preface.status, QualityStatus::Pass);
    }

    #[test]
    fn test_check_commentary_quality_withLeakedReference_shouldWarn() {
        let leaked = format!("{} (Vers. 12.) {}", GREEK, GREEK);
        let texts = vec![leaked; 3];
        let report = check_commentary_quality(&chapter(5, texts), &[]);
        assert!(report.warnings.contains(&"3 paragraphs still contain verse references".to_string()));
        assert!(!report.warnings.iter().any(|w| w.contains("Arabic digit")));
        assert_eq!(report.samples["verseReferences"].len(), 3);
    }
}
