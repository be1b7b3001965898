/*!
 * Diary profile for a critical edition with heavy editorial apparatus.
 *
 * The edition is split at its structural anchors into the editor's preface
 * (chapter 0), the diary proper and an optional alternative beginning. The
 * diary is cut at year headers and regrouped into one chapter per
 * configured period; the alternative beginning follows the last period.
 */

pub mod classifier;
pub mod cleaner;
pub mod quality;
pub mod sections;
pub mod years;

use log::info;

use crate::app_config::DiaryConfig;
use crate::errors::PipelineError;
use crate::model::{ChapterContent, ClassifiedLine, ProcessedChapter, RawLine, SectionBoundary};
use crate::pipeline::{DocumentInput, PipelineProfile, QualityReport, SectionPlan};

use classifier::DiaryCategory;
use cleaner::{block_paragraphs, clean_section};
use years::{group_by_period, split_by_year};

pub const PREFACE_TITLE: &str = "Prefazione (Preface)";
pub const ALTERNATIVE_TITLE: &str = "Altro principio (Alternative Beginning)";
const DIARY_SECTION_TITLE: &str = "Diario (Diary)";

pub struct DiaryProfile {
    config: DiaryConfig,
}

impl DiaryProfile {
    pub fn new(config: DiaryConfig) -> Self {
        Self { config }
    }

    /// Section and chapter number of the alternative beginning
    fn alternative_number(&self) -> u32 {
        self.config.periods.len() as u32 + 1
    }

    fn single_chapter(section: &SectionBoundary, lines: &[String]) -> Vec<ProcessedChapter> {
        let paragraphs = block_paragraphs(lines);
        vec![ProcessedChapter {
            chapter_number: section.number,
            title: section.title.clone(),
            source_content: ChapterContent::from_texts(paragraphs, 1),
        }]
    }

    /// One chapter per period holding text; empty periods leave a gap in the numbering
    fn period_chapters(&self, lines: &[String]) -> Vec<ProcessedChapter> {
        let entries = split_by_year(lines, self.config.first_year, self.config.last_year);
        let groups = group_by_period(&entries, &self.config.periods);

        self.config
            .periods
            .iter()
            .zip(groups)
            .zip(1u32..)
            .filter(|((_, group), _)| !group.is_empty())
            .map(|((period, group), number)| {
                let text = group.iter().map(|e| e.text.as_str()).collect::<Vec<_>>().join("\n\n");
                let period_lines: Vec<String> = text.lines().map(str::to_string).collect();
                let label = period.label();
                info!("[diary] period {}: {} year entries", label, group.len());
                ProcessedChapter {
                    chapter_number: number,
                    title: format!("Diario {} (Diary entries, {})", label, label),
                    source_content: ChapterContent::from_texts(block_paragraphs(&period_lines), 1),
                }
            })
            .collect()
    }
}

impl PipelineProfile for DiaryProfile {
    type Category = DiaryCategory;

    fn name(&self) -> &'static str {
        "diary"
    }

    fn identify_sections(&self, input: &DocumentInput) -> Result<SectionPlan, PipelineError> {
        let anchors = sections::find_anchors(&input.lines)?;
        let (preface, diary, alternative) = anchors.ranges();

        let mut boundaries = vec![
            SectionBoundary::new(0, PREFACE_TITLE, *preface.start(), *preface.end()),
            SectionBoundary::new(1, DIARY_SECTION_TITLE, *diary.start(), *diary.end()),
        ];
        if let Some(range) = alternative {
            boundaries.push(SectionBoundary::new(
                self.alternative_number(),
                ALTERNATIVE_TITLE,
                *range.start(),
                *range.end(),
            ));
        }

        let mut plan = SectionPlan::new(boundaries);
        for warning in anchors.warnings {
            plan.warn(warning);
        }
        Ok(plan)
    }

    fn classify(&self, _section: &SectionBoundary, lines: &[RawLine]) -> Vec<ClassifiedLine<DiaryCategory>> {
        classifier::classify_section(lines)
    }

    fn extract(&self, section: &SectionBoundary, classified: &[ClassifiedLine<DiaryCategory>]) -> Vec<ProcessedChapter> {
        let cleaned = clean_section(classified);
        info!(
            "[diary] {}: {} lines read, {} lines kept",
            section.title, cleaned.stats.total_lines_read, cleaned.stats.output_lines
        );

        if section.number == 1 {
            self.period_chapters(&cleaned.lines)
        } else {
            Self::single_chapter(section, &cleaned.lines)
        }
    }

    fn check_quality(&self, chapter: &ProcessedChapter, classified: &[ClassifiedLine<DiaryCategory>]) -> QualityReport {
        quality::check_diary_quality(chapter, classified)
    }
}
