// @module: Section plan normalization

use crate::errors::PipelineError;
use crate::model::SectionBoundary;

/// Sections found in a document plus non-fatal findings about them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionPlan {
    pub sections: Vec<SectionBoundary>,
    pub warnings: Vec<String>,
}

impl SectionPlan {
    pub fn new(sections: Vec<SectionBoundary>) -> Self {
        Self {
            sections,
            warnings: Vec::new(),
        }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Warn when the section count differs from the expected one
    pub fn expect_count(&mut self, expected: usize) {
        if self.sections.len() != expected {
            let message = format!("Expected {} sections, got {}", expected, self.sections.len());
            self.warn(message);
        }
    }
}

/// Sort sections by start line and reject any overlap
pub fn order_sections(mut sections: Vec<SectionBoundary>) -> Result<Vec<SectionBoundary>, PipelineError> {
    sections.sort_by_key(|s| (s.start_line, s.number));

    for pair in sections.windows(2) {
        let (first, second) = (&pair[0], &pair[1]);
        if first.end_line >= second.start_line {
            return Err(PipelineError::OverlappingSections {
                first: first.title.clone(),
                first_end: first.end_line,
                second: second.title.clone(),
                second_start: second.start_line,
            });
        }
    }

    Ok(sections)
}

/// Overlap findings without failing, for validation reports
pub fn overlap_warnings(sections: &[SectionBoundary]) -> Vec<String> {
    let mut sorted: Vec<&SectionBoundary> = sections.iter().collect();
    sorted.sort_by_key(|s| s.start_line);
    sorted
        .windows(2)
        .filter(|pair| pair[0].end_line >= pair[1].start_line)
        .map(|pair| {
            format!(
                "Chapter {} overlaps with chapter {}: {} >= {}",
                pair[0].number, pair[1].number, pair[0].end_line, pair[1].start_line
            )
        })
        .collect()
}
