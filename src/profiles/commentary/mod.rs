/*!
 * Prose commentary profile, one document per printed volume.
 *
 * Books come from a static line table per volume. Volume 1 opens with a
 * Latin preface (chapter 0) that the classifier treats leniently.
 */

pub mod books;
pub mod classifier;
pub mod extractor;
pub mod quality;

use crate::app_config::CommentaryConfig;
use crate::errors::PipelineError;
use crate::model::{ChapterContent, ClassifiedLine, ProcessedChapter, RawLine, SectionBoundary};
use crate::pipeline::boundary::overlap_warnings;
use crate::pipeline::{DocumentInput, PipelineProfile, QualityReport, SectionPlan};

use books::{book_boundaries, split_books, validate_boundaries, BookEntry};
use classifier::CommentaryCategory;

pub struct CommentaryProfile {
    config: CommentaryConfig,
    books: Vec<BookEntry>,
}

impl CommentaryProfile {
    pub fn new(config: CommentaryConfig) -> Self {
        let books = book_boundaries(config.volume);
        Self { config, books }
    }

    /// Use a custom book table instead of the printed one
    pub fn with_books(config: CommentaryConfig, books: Vec<BookEntry>) -> Self {
        Self { config, books }
    }
}

impl PipelineProfile for CommentaryProfile {
    type Category = CommentaryCategory;

    fn name(&self) -> &'static str {
        "commentary"
    }

    fn identify_sections(&self, input: &DocumentInput) -> Result<SectionPlan, PipelineError> {
        if self.books.is_empty() {
            return Err(PipelineError::MissingAnchor {
                anchor: format!("book table for volume {}", self.config.volume),
            });
        }

        let mut plan = SectionPlan::new(split_books(input.lines.len(), &self.books));
        let mut warnings = validate_boundaries(&input.lines, &self.books, self.config.volume);
        warnings.extend(overlap_warnings(&plan.sections));
        for warning in warnings {
            plan.warn(warning);
        }
        plan.expect_count(self.books.len());
        Ok(plan)
    }

    fn classify(&self, section: &SectionBoundary, lines: &[RawLine]) -> Vec<ClassifiedLine<CommentaryCategory>> {
        classifier::classify_section(lines, section.number == 0)
    }

    fn extract(
        &self,
        section: &SectionBoundary,
        classified: &[ClassifiedLine<CommentaryCategory>],
    ) -> Vec<ProcessedChapter> {
        let paragraphs = extractor::extract_commentary(classified, self.config.max_paragraph_chars);
        vec![ProcessedChapter {
            chapter_number: section.number,
            title: section.title.clone(),
            source_content: ChapterContent { paragraphs },
        }]
    }

    fn check_quality(
        &self,
        chapter: &ProcessedChapter,
        classified: &[ClassifiedLine<CommentaryCategory>],
    ) -> QualityReport {
        quality::check_commentary_quality(chapter, classified)
    }
}
