/*!
 * Verse anthology profile.
 *
 * Sections come from a static title table (or from ALL-CAPS title detection),
 * lines are classified into verse, apparatus, introduction and noise, and
 * verse lines are grouped into stanzas of at most fifteen lines.
 */

pub mod classifier;
pub mod extractor;
pub mod quality;
pub mod titles;

use crate::app_config::VerseConfig;
use crate::errors::PipelineError;
use crate::model::{ChapterContent, ClassifiedLine, ProcessedChapter, RawLine, SectionBoundary};
use crate::pipeline::boundary::overlap_warnings;
use crate::pipeline::{DocumentInput, GroupingRule, PipelineProfile, QualityReport, SectionPlan};

use classifier::VerseCategory;
use titles::{detect_titles_heuristic, titles_from_detected, validate_titles, TitleEntry};

/// Sections shorter than this many lines are reported
const MIN_SECTION_LINES: usize = 20;

pub struct VerseProfile {
    config: VerseConfig,
}

impl VerseProfile {
    pub fn new(config: VerseConfig) -> Self {
        Self { config }
    }

    fn grouping_rule(&self) -> GroupingRule {
        GroupingRule {
            min_gap: self.config.min_gap,
            max_lines: Some(self.config.lines_per_paragraph),
        }
    }

    fn title_table(&self, lines: &[RawLine]) -> Vec<TitleEntry> {
        if self.config.detect_titles {
            let detected = detect_titles_heuristic(lines, self.config.content_start_line, self.config.content_end_line);
            titles_from_detected(&detected)
        } else {
            self.config.titles.clone()
        }
    }
}

/// Content between one title and the next
pub fn split_sections(line_count: usize, titles: &[TitleEntry], content_end_line: usize) -> Vec<SectionBoundary> {
    let mut sorted: Vec<&TitleEntry> = titles.iter().collect();
    sorted.sort_by_key(|t| t.start_line);

    sorted
        .iter()
        .enumerate()
        .map(|(i, title)| {
            let start = title.end_line + 1;
            let end = match sorted.get(i + 1) {
                Some(next) => next.start_line.saturating_sub(1),
                None => line_count.saturating_sub(1).min(content_end_line),
            };
            SectionBoundary::new(title.chapter_number, title.display_title(), start, end)
        })
        .collect()
}

impl PipelineProfile for VerseProfile {
    type Category = VerseCategory;

    fn name(&self) -> &'static str {
        "verse"
    }

    fn identify_sections(&self, input: &DocumentInput) -> Result<SectionPlan, PipelineError> {
        let titles = self.title_table(&input.lines);
        if titles.is_empty() {
            return Err(PipelineError::MissingAnchor {
                anchor: "verse title lines".to_string(),
            });
        }

        let mut plan = SectionPlan::new(split_sections(input.lines.len(), &titles, self.config.content_end_line));
        for warning in validate_titles(&input.lines, &titles) {
            plan.warn(warning);
        }

        let short: Vec<String> = plan
            .sections
            .iter()
            .zip(sorted_titles(&titles))
            .filter(|(section, _)| section.line_count() < MIN_SECTION_LINES)
            .map(|(section, title)| {
                format!(
                    "Chapter {} (\"{}\"): only {} lines, very short",
                    section.number,
                    title.english_title,
                    section.line_count()
                )
            })
            .collect();
        for warning in short.into_iter().chain(overlap_warnings(&plan.sections)) {
            plan.warn(warning);
        }
        let expected = if self.config.detect_titles { self.config.titles.len() } else { titles.len() };
        plan.expect_count(expected);

        Ok(plan)
    }

    fn classify(&self, _section: &SectionBoundary, lines: &[RawLine]) -> Vec<ClassifiedLine<VerseCategory>> {
        classifier::classify_section(lines)
    }

    fn extract(&self, section: &SectionBoundary, classified: &[ClassifiedLine<VerseCategory>]) -> Vec<ProcessedChapter> {
        let paragraphs = extractor::extract_verse(classified, self.grouping_rule());
        vec![ProcessedChapter {
            chapter_number: section.number,
            title: section.title.clone(),
            source_content: ChapterContent { paragraphs },
        }]
    }

    fn check_quality(&self, chapter: &ProcessedChapter, classified: &[ClassifiedLine<VerseCategory>]) -> QualityReport {
        quality::check_verse_quality(chapter, classified)
    }
}

fn sorted_titles(titles: &[TitleEntry]) -> Vec<&TitleEntry> {
    let mut sorted: Vec<&TitleEntry> = titles.iter().collect();
    sorted.sort_by_key(|t| t.start_line);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::run_document;

    fn entry(chapter_number: u32, start_line: usize, end_line: usize) -> TitleEntry {
        TitleEntry {
            chapter_number,
            start_line,
            end_line,
            title: format!("Τίτλος {}", chapter_number),
            english_title: format!("Title {}", chapter_number),
        }
    }

    #[test]
    fn test_split_sections_withUnsortedTitles_shouldSpanToNextTitle() {
        let titles = vec![entry(2, 50, 51), entry(1, 10, 10)];
        let sections = split_sections(100, &titles, 80);
        assert_eq!(sections[0], SectionBoundary::new(1, "Τίτλος 1 (Title 1)", 11, 49));
        assert_eq!(sections[1].start_line, 52);
        assert_eq!(sections[1].end_line, 80);
    }

    #[test]
    fn test_run_document_withSmallAnthology_shouldProduceChapterPerTitle() {
        let verse = "Ἄκουσε, τέκνον μου, καλὰ τὰ λόγια τοῦ πατρός σου";
        let mut lines = vec!["ΠΡΟΛΟΓΟΣ ΤΟΥ ΕΚΔΟΤΟΥ".to_string(), String::new()];
        for n in 1..=12 {
            lines.push(format!("{} {}", n, verse));
        }
        lines.push("ΘΡΗΝΟΣ ΠΕΡΙ ΤΑΜΥΡΛΑΓΓΟΥ".to_string());
        for _ in 0..12 {
            lines.push(verse.to_string());
        }
        let input = DocumentInput::from_text(&lines.join("\n"));
        let config = VerseConfig {
            titles: vec![entry(1, 0, 0), entry(2, 14, 14)],
            content_start_line: 0,
            ..VerseConfig::default()
        };

        let outcome = run_document(&VerseProfile::new(config), &input).unwrap();
        assert_eq!(outcome.chapters.len(), 2);
        let first = &outcome.chapters[0].chapter;
        assert_eq!(first.source_content.paragraphs[0].text.lines().next(), Some(verse));
        assert_eq!(first.source_content.len(), 1);
        assert!(outcome.warnings.iter().any(|w| w.contains("very short")));
    }
}
