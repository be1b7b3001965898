/*!
 * The four-stage cleaning engine.
 *
 * A `PipelineProfile` supplies section identification, line classification,
 * extraction and quality checking for one kind of document. `run_document`
 * drives any profile through the same sequence:
 *
 * 1. identify and order sections (a missing anchor aborts the document)
 * 2. classify every line of each section
 * 3. extract paragraphs into one or more chapters per section
 * 4. check the quality of each chapter
 */

pub mod boundary;
pub mod grouping;
pub mod quality;

use log::{debug, warn};

use crate::errors::PipelineError;
use crate::model::{ClassifiedLine, LineCategory, ProcessedChapter, RawLine, SectionBoundary};

pub use boundary::{SectionPlan, order_sections};
pub use grouping::{GroupingRule, group_lines, number_paragraphs};
pub use quality::{QualityReport, QualityStatus, QualitySummary};

/// Chapter-level facts known before the text is read, for one-file-per-chapter documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterHint {
    pub number: u32,
    pub title: Option<String>,
}

/// A document ready for processing
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub lines: Vec<RawLine>,
    pub hint: Option<ChapterHint>,
}

impl DocumentInput {
    pub fn from_text(content: &str) -> Self {
        Self {
            lines: RawLine::from_document(content),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: ChapterHint) -> Self {
        self.hint = Some(hint);
        self
    }
}

/// One kind of document and its four stages
pub trait PipelineProfile {
    /// Closed category set the classifier assigns
    type Category: LineCategory;

    /// Short profile name for logs
    fn name(&self) -> &'static str;

    /// Partition the document into sections
    fn identify_sections(&self, input: &DocumentInput) -> Result<SectionPlan, PipelineError>;

    /// Assign a category to every line of a section, in order
    fn classify(&self, section: &SectionBoundary, lines: &[RawLine]) -> Vec<ClassifiedLine<Self::Category>>;

    /// Turn the classified lines of a section into chapters
    fn extract(&self, section: &SectionBoundary, classified: &[ClassifiedLine<Self::Category>]) -> Vec<ProcessedChapter>;

    /// Check one extracted chapter
    fn check_quality(&self, chapter: &ProcessedChapter, classified: &[ClassifiedLine<Self::Category>]) -> QualityReport;
}

/// A chapter together with its quality report
#[derive(Debug, Clone)]
pub struct ChapterOutcome {
    pub chapter: ProcessedChapter,
    pub report: QualityReport,
}

/// Result of running a profile over one document
#[derive(Debug, Clone)]
pub struct DocumentOutcome {
    pub profile: &'static str,
    pub chapters: Vec<ChapterOutcome>,
    /// Non-fatal boundary findings
    pub warnings: Vec<String>,
}

impl DocumentOutcome {
    pub fn reports(&self) -> Vec<QualityReport> {
        self.chapters.iter().map(|c| c.report.clone()).collect()
    }
}

/// Run every stage of `profile` over `input`
pub fn run_document<P>(profile: &P, input: &DocumentInput) -> Result<DocumentOutcome, PipelineError>
where
    P: PipelineProfile + ?Sized,
{
    let plan = profile.identify_sections(input)?;
    for warning in &plan.warnings {
        warn!("[{}] {}", profile.name(), warning);
    }
    let sections = order_sections(plan.sections)?;

    let mut chapters = Vec::new();
    for section in &sections {
        let lines = section.slice(&input.lines);
        let classified = profile.classify(section, lines);
        debug!(
            "[{}] section {} ({}): {} lines classified",
            profile.name(),
            section.number,
            section.title,
            classified.len()
        );

        for chapter in profile.extract(section, &classified) {
            let report = profile.check_quality(&chapter, &classified);
            chapters.push(ChapterOutcome { chapter, report });
        }
    }

    Ok(DocumentOutcome {
        profile: profile.name(),
        chapters,
        warnings: plan.warnings,
    })
}
