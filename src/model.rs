/*!
 * Core data model shared by every pipeline stage.
 *
 * Raw lines flow into section boundaries, classified lines and finally
 * paragraphs. Everything here is a plain value type: stages build new
 * vectors instead of mutating their inputs.
 */

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// One line of a raw input document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// 0-indexed position in the document
    pub number: usize,
    /// Line text without the trailing newline
    pub text: String,
}

impl RawLine {
    /// Split a whole document into numbered lines
    pub fn from_document(content: &str) -> Vec<RawLine> {
        content
            .split('\n')
            .enumerate()
            .map(|(number, text)| RawLine {
                number,
                text: text.strip_suffix('\r').unwrap_or(text).to_string(),
            })
            .collect()
    }
}

/// A named, contiguous range of lines; `end_line` is inclusive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionBoundary {
    /// Chapter number the section becomes
    pub number: u32,
    /// Display title of the section
    pub title: String,
    pub start_line: usize,
    pub end_line: usize,
}

impl SectionBoundary {
    pub fn new(number: u32, title: impl Into<String>, start_line: usize, end_line: usize) -> Self {
        Self {
            number,
            title: title.into(),
            start_line,
            end_line,
        }
    }

    /// Number of lines covered by the section
    pub fn line_count(&self) -> usize {
        (self.end_line + 1).saturating_sub(self.start_line)
    }

    /// Slice the section out of a document, clamped to its length
    pub fn slice<'a>(&self, lines: &'a [RawLine]) -> &'a [RawLine] {
        let start = self.start_line.min(lines.len());
        let end = (self.end_line + 1).min(lines.len()).max(start);
        &lines[start..end]
    }
}

/// Closed set of line categories a profile classifies into
pub trait LineCategory: Copy + Eq + Debug + Send + Sync + 'static {
    /// Every variant, in reporting order
    fn all() -> &'static [Self];

    /// Stable lowercase name used in reports
    fn label(&self) -> &'static str;

    /// Whether lines of this category carry text worth extracting
    fn is_content(&self) -> bool;

    /// Whether the line is blank
    fn is_empty(&self) -> bool;
}

/// A raw line paired with its category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine<C: LineCategory> {
    pub line_number: usize,
    pub text: String,
    pub category: C,
}

/// One paragraph of chapter content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub index: u32,
    pub text: String,
}

/// Paragraph list of a chapter, as stored for source and translation alike
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ChapterContent {
    pub paragraphs: Vec<Paragraph>,
}

impl ChapterContent {
    /// Build content from texts, numbering from `base`
    pub fn from_texts<I, S>(texts: I, base: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let paragraphs = texts
            .into_iter()
            .zip(base..)
            .map(|(text, index)| Paragraph {
                index,
                text: text.into(),
            })
            .collect();
        Self { paragraphs }
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Index of the first paragraph, if any
    pub fn base_index(&self) -> Option<u32> {
        self.paragraphs.first().map(|p| p.index)
    }
}

/// Final output of the pipeline for one chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedChapter {
    pub chapter_number: u32,
    pub title: String,
    pub source_content: ChapterContent,
}

impl ProcessedChapter {
    /// Output file name, e.g. `chapter-007.json`
    pub fn file_name(&self) -> String {
        chapter_file_name(self.chapter_number)
    }
}

/// Output file name for a chapter number
pub fn chapter_file_name(chapter_number: u32) -> String {
    format!("chapter-{:03}.json", chapter_number)
}
