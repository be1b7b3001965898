// @module: Quality checks for extracted verse

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{ClassifiedLine, ProcessedChapter};
use crate::pipeline::quality::QualityReport;
use crate::text::normalize::{char_len, percent1};
use crate::text::script::greek_letter_share;

use super::classifier::{VerseCategory, PRIMARY_SIGLA_REGEX};

static LEADING_NUMBER_CHECK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,4}\s+").expect("Invalid leading number regex")
});

pub const MIN_VERSE_LINES: usize = 10;
pub const LOW_VERSE_LINES: usize = 30;
pub const HIGH_VERSE_LINES: usize = 800;
pub const MIN_AVG_LINE_LENGTH: f64 = 20.0;
pub const SHORT_AVG_LINE_LENGTH: f64 = 30.0;
pub const MIN_GREEK_SHARE: f64 = 0.79;
pub const MAX_NOISE_SHARE: f64 = 0.7;

/// Check a verse chapter against its classified section
pub fn check_verse_quality(chapter: &ProcessedChapter, classified: &[ClassifiedLine<VerseCategory>]) -> QualityReport {
    let mut report = QualityReport::new(chapter.chapter_number, chapter.title.clone());
    report.set_category_counts(classified);
    report.paragraph_count = chapter.source_content.len();

    let verse_lines: Vec<&str> = chapter
        .source_content
        .paragraphs
        .iter()
        .flat_map(|p| p.text.split('\n'))
        .collect();
    report.set_line_stats(&verse_lines);
    report.total_characters = verse_lines.iter().map(|line| char_len(line)).sum();

    let line_count = verse_lines.len();
    let avg = if line_count == 0 {
        0.0
    } else {
        report.total_characters as f64 / line_count as f64
    };
    let greek = greek_letter_share(&verse_lines.join(" "));
    report.target_script_percent = percent1(greek);

    let sigla = report.add_samples(
        "sigla",
        verse_lines
            .iter()
            .copied()
            .filter(|line| PRIMARY_SIGLA_REGEX.is_match(&format!(" {} ", line))),
    );
    let leading = report.add_samples(
        "leadingNumbers",
        verse_lines
            .iter()
            .copied()
            .filter(|line| LEADING_NUMBER_CHECK_REGEX.is_match(line)),
    );

    if line_count < MIN_VERSE_LINES {
        report.error(format!("Verse count too low: {} (FAIL threshold: <10)", line_count));
    }
    if line_count < LOW_VERSE_LINES {
        report.warn(format!("Low verse count: {}", line_count));
    }
    if line_count > HIGH_VERSE_LINES {
        report.warn(format!("High verse count: {}", line_count));
    }
    if line_count > 0 && avg < MIN_AVG_LINE_LENGTH {
        report.error(format!(
            "Average line length too short: {:.1} chars (FAIL threshold: <20)",
            avg
        ));
    }
    if line_count > 0 && avg < SHORT_AVG_LINE_LENGTH {
        report.warn(format!("Short average line length: {:.1} chars", avg));
    }
    if sigla > 0 {
        report.warn(format!("Sigla contamination: {} lines with isolated Α/Β/Μ/Ρ/Δ", sigla));
    }
    if leading > 0 {
        report.warn(format!("{} lines still have leading numbers after extraction", leading));
    }
    if line_count > 0 && greek < MIN_GREEK_SHARE {
        report.warn(format!("Low Greek character percentage: {:.1}%", greek * 100.0));
    }
    if report.paragraph_count < 3 && line_count > 30 {
        report.warn(format!("Very few paragraphs: {}", report.paragraph_count));
    }

    let noise = report.category_count("noise") + report.category_count("apparatus");
    let non_empty = noise
        + report.category_count("verse")
        + report.category_count("verse_numbered")
        + report.category_count("introduction");
    if non_empty > 0 {
        let share = noise as f64 / non_empty as f64;
        if share > MAX_NOISE_SHARE {
            report.error(format!(">70% of content is noise+apparatus ({:.1}%)", share * 100.0));
        }
    }

    report.finalize()
}
