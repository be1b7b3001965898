/*!
 * Prose profile for texts that arrive as one file per chapter.
 *
 * Plain text chapters use blank-line paragraphs and may carry a title line;
 * ctext.org chapters are raw API responses whose `fulltext` entries become
 * paragraphs and whose `title` becomes the chapter title.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::app_config::{CtextConfig, ProseConfig};
use crate::errors::PipelineError;
use crate::model::{ChapterContent, ClassifiedLine, LineCategory, ProcessedChapter, RawLine, SectionBoundary};
use crate::pipeline::grouping::{group_lines, number_paragraphs, GroupingRule};
use crate::pipeline::{ChapterHint, DocumentInput, PipelineProfile, QualityReport, SectionPlan};
use crate::text::normalize::{char_len, percent1};

/// Paragraphs longer than this are reported
pub const LONG_PARAGRAPH_CHARS: usize = 5000;

static NUMBER_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)_").expect("Invalid chapter prefix regex")
});

static CHAPTER_FILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"chapter-(\d+)").expect("Invalid chapter file regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProseCategory {
    Text,
    Blank,
}

impl LineCategory for ProseCategory {
    fn all() -> &'static [Self] {
        &[Self::Text, Self::Blank]
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Blank => "blank",
        }
    }

    fn is_content(&self) -> bool {
        matches!(self, Self::Text)
    }

    fn is_empty(&self) -> bool {
        matches!(self, Self::Blank)
    }
}

/// Chapter number from a `NNN_...` or `chapter-NNN...` file name; 0 is not a chapter
pub fn chapter_number_from_file_name(name: &str) -> Option<u32> {
    NUMBER_PREFIX_REGEX
        .captures(name)
        .or_else(|| CHAPTER_FILE_REGEX.captures(name))
        .and_then(|caps| caps[1].parse().ok())
        .filter(|n| *n > 0)
}

/// Raw ctext.org gettext response
#[derive(Debug, Deserialize)]
struct CtextChapter {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    fulltext: Vec<String>,
}

/// Turn a raw ctext.org response into a document; each `fulltext` entry
/// becomes a blank-line separated block
pub fn ctext_input(content: &str, number: u32) -> Result<DocumentInput, PipelineError> {
    let raw: CtextChapter =
        serde_json::from_str(content).map_err(|e| PipelineError::InvalidInput(format!("ctext JSON: {}", e)))?;

    let text = raw
        .fulltext
        .iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    let title = raw.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
    Ok(DocumentInput::from_text(&text).with_hint(ChapterHint { number, title }))
}

pub struct ProseProfile {
    name: &'static str,
    config: ProseConfig,
    title_regex: Option<Regex>,
}

impl ProseProfile {
    pub fn new(config: ProseConfig) -> Result<Self, PipelineError> {
        let title_regex = config
            .title_pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| PipelineError::InvalidInput(format!("title pattern: {}", e)))?;
        Ok(Self {
            name: "prose",
            config,
            title_regex,
        })
    }

    pub fn ctext(config: &CtextConfig) -> Self {
        Self {
            name: "ctext",
            config: config.as_prose(),
            title_regex: None,
        }
    }

    fn is_title_line(&self, line: &str) -> bool {
        self.title_regex.as_ref().is_some_and(|re| re.is_match(line.trim()))
    }

    fn title_for(&self, hint: &ChapterHint, lines: &[RawLine]) -> String {
        if let Some(title) = &hint.title {
            return title.clone();
        }
        lines
            .iter()
            .find(|l| self.is_title_line(&l.text))
            .map(|l| format!("{} (Chapter {})", l.text.trim(), hint.number))
            .unwrap_or_else(|| format!("Chapter {}", hint.number))
    }
}

impl PipelineProfile for ProseProfile {
    type Category = ProseCategory;

    fn name(&self) -> &'static str {
        self.name
    }

    fn identify_sections(&self, input: &DocumentInput) -> Result<SectionPlan, PipelineError> {
        let hint = input
            .hint
            .as_ref()
            .ok_or_else(|| PipelineError::InvalidInput("chapter number unknown for prose document".to_string()))?;

        let title = self.title_for(hint, &input.lines);
        let end_line = input.lines.len().saturating_sub(1);
        Ok(SectionPlan::new(vec![SectionBoundary::new(hint.number, title, 0, end_line)]))
    }

    fn classify(&self, _section: &SectionBoundary, lines: &[RawLine]) -> Vec<ClassifiedLine<ProseCategory>> {
        lines
            .iter()
            .map(|line| ClassifiedLine {
                line_number: line.number,
                text: line.text.clone(),
                category: if line.text.trim().is_empty() {
                    ProseCategory::Blank
                } else {
                    ProseCategory::Text
                },
            })
            .collect()
    }

    fn extract(&self, section: &SectionBoundary, classified: &[ClassifiedLine<ProseCategory>]) -> Vec<ProcessedChapter> {
        // The title line is consumed by the chapter title
        let groups = group_lines(classified, GroupingRule::PROSE, |line| {
            if self.is_title_line(line) {
                String::new()
            } else {
                line.trim().to_string()
            }
        });
        let paragraphs = number_paragraphs(groups.into_iter().map(|g| g.join("\n")), self.config.index_base);

        vec![ProcessedChapter {
            chapter_number: section.number,
            title: section.title.clone(),
            source_content: ChapterContent { paragraphs },
        }]
    }

    fn check_quality(&self, chapter: &ProcessedChapter, classified: &[ClassifiedLine<ProseCategory>]) -> QualityReport {
        let mut report = QualityReport::new(chapter.chapter_number, chapter.title.clone());
        report.set_category_counts(classified);

        let texts: Vec<&str> = chapter.source_content.paragraphs.iter().map(|p| p.text.as_str()).collect();
        report.paragraph_count = texts.len();
        report.set_line_stats(&texts);
        report.total_characters = texts.iter().map(|t| char_len(t)).sum();

        if texts.is_empty() {
            report.error("No paragraphs extracted");
            return report.finalize();
        }

        let share = self.config.script.share(&texts.join("\n"));
        report.target_script_percent = percent1(share);
        if share < self.config.min_script_share {
            report.warn(format!(
                "Low {} script share: {}% (expected at least {}%)",
                self.config.script,
                percent1(share),
                percent1(self.config.min_script_share)
            ));
        }

        let long = report.add_samples(
            "longParagraphs",
            texts.iter().copied().filter(|t| char_len(t) > LONG_PARAGRAPH_CHARS),
        );
        if long > 0 {
            report.warn(format!("{} very long paragraphs (> {} chars)", long, LONG_PARAGRAPH_CHARS));
        }

        report.finalize()
    }
}
