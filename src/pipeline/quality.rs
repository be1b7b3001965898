/*!
 * Quality report types shared by every profile.
 *
 * A report is derived data: statistics, named contamination samples and
 * free-text findings. Errors and warnings are collected independently and
 * the verdict follows from them.
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{ClassifiedLine, LineCategory};
use crate::text::normalize::{char_len, round1, truncate_chars};

/// Verdict of a quality check
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum QualityStatus {
    #[default]
    Pass,
    Warn,
    Fail,
}

impl std::fmt::Display for QualityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Pass => "PASS",
            Self::Warn => "WARN",
            Self::Fail => "FAIL",
        };
        write!(f, "{}", label)
    }
}

/// Maximum number of sample lines kept per contamination kind
pub const MAX_SAMPLES: usize = 10;

/// Sample lines are cut to this many characters
pub const SAMPLE_CHARS: usize = 80;

/// Statistics and findings for one processed chapter
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    pub chapter_number: u32,
    pub title: String,
    /// Line count per classifier category, zero counts included
    pub category_counts: BTreeMap<String, usize>,
    pub paragraph_count: usize,
    /// Lines of extracted output
    pub line_count: usize,
    pub avg_line_length: f64,
    pub min_line_length: usize,
    pub max_line_length: usize,
    pub total_characters: usize,
    /// Percentage of the expected script in the output
    pub target_script_percent: f64,
    /// Named lists of suspicious output lines
    pub samples: BTreeMap<String, Vec<String>>,
    /// Profile-specific counters
    pub metrics: BTreeMap<String, f64>,
    pub status: QualityStatus,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl QualityReport {
    pub fn new(chapter_number: u32, title: impl Into<String>) -> Self {
        Self {
            chapter_number,
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Record a sample list under `name`, capped and truncated
    pub fn add_samples<'a, I>(&mut self, name: &str, lines: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let all: Vec<&str> = lines.into_iter().collect();
        let count = all.len();
        if count > 0 {
            let kept = all
                .iter()
                .take(MAX_SAMPLES)
                .map(|line| truncate_chars(line, SAMPLE_CHARS))
                .collect();
            self.samples.insert(name.to_string(), kept);
        }
        count
    }

    pub fn set_metric(&mut self, name: &str, value: f64) {
        self.metrics.insert(name.to_string(), value);
    }

    /// Fill line statistics from the output lines
    pub fn set_line_stats(&mut self, lines: &[&str]) {
        let lengths: Vec<usize> = lines.iter().map(|line| char_len(line)).collect();
        self.line_count = lengths.len();
        self.min_line_length = lengths.iter().copied().min().unwrap_or(0);
        self.max_line_length = lengths.iter().copied().max().unwrap_or(0);
        self.avg_line_length = if lengths.is_empty() {
            0.0
        } else {
            round1(lengths.iter().sum::<usize>() as f64 / lengths.len() as f64)
        };
    }

    /// Count classifier categories
    pub fn set_category_counts<C: LineCategory>(&mut self, classified: &[ClassifiedLine<C>]) {
        self.category_counts = category_counts(classified);
    }

    pub fn category_count(&self, label: &str) -> usize {
        self.category_counts.get(label).copied().unwrap_or(0)
    }

    /// Derive the verdict; call after every finding has been added
    pub fn finalize(mut self) -> Self {
        self.status = if !self.errors.is_empty() {
            QualityStatus::Fail
        } else if !self.warnings.is_empty() {
            QualityStatus::Warn
        } else {
            QualityStatus::Pass
        };
        self
    }
}

/// Line count per category, every category present
pub fn category_counts<C: LineCategory>(classified: &[ClassifiedLine<C>]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = C::all()
        .iter()
        .map(|category| (category.label().to_string(), 0))
        .collect();
    for line in classified {
        *counts.entry(line.category.label().to_string()).or_insert(0) += 1;
    }
    counts
}

/// Summary across the chapters of one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualitySummary {
    pub passed: usize,
    pub warned: usize,
    pub failed: usize,
    pub total_paragraphs: usize,
}

impl QualitySummary {
    pub fn from_reports<'a, I>(reports: I) -> Self
    where
        I: IntoIterator<Item = &'a QualityReport>,
    {
        let mut summary = Self::default();
        for report in reports {
            match report.status {
                QualityStatus::Pass => summary.passed += 1,
                QualityStatus::Warn => summary.warned += 1,
                QualityStatus::Fail => summary.failed += 1,
            }
            summary.total_paragraphs += report.paragraph_count;
        }
        summary
    }

    /// Worst verdict seen
    pub fn overall(&self) -> QualityStatus {
        if self.failed > 0 {
            QualityStatus::Fail
        } else if self.warned > 0 {
            QualityStatus::Warn
        } else {
            QualityStatus::Pass
        }
    }
}

/// Render reports as the human-readable block printed by `check`
pub fn render_reports(slug: &str, reports: &[QualityReport]) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== QUALITY REPORT: {} ===\n", slug));
    for report in reports {
        out.push_str(&format!(
            "\n[{}] Chapter {}: {}\n",
            report.status, report.chapter_number, report.title
        ));
        out.push_str(&format!(
            "  paragraphs: {}, lines: {}, avg line: {:.1}, chars: {}, script: {:.1}%\n",
            report.paragraph_count,
            report.line_count,
            report.avg_line_length,
            report.total_characters,
            report.target_script_percent
        ));
        for error in &report.errors {
            out.push_str(&format!("  ERROR: {}\n", error));
        }
        for warning in &report.warnings {
            out.push_str(&format!("  WARN: {}\n", warning));
        }
        for (name, samples) in &report.samples {
            out.push_str(&format!("  {} samples:\n", name));
            for sample in samples {
                out.push_str(&format!("    {}\n", sample));
            }
        }
    }
    let summary = QualitySummary::from_reports(reports);
    out.push_str(&format!(
        "\nSummary: {} chapters, {} PASS, {} WARN, {} FAIL, {} paragraphs\n",
        reports.len(),
        summary.passed,
        summary.warned,
        summary.failed,
        summary.total_paragraphs
    ));
    out
}
