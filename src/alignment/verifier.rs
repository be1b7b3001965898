/*!
 * Paragraph-count alignment and contamination checks over stored chapters.
 *
 * Read-only: issues are reported, never fixed here.
 */

use serde::{Serialize, Serializer};
use std::fmt;

use super::contamination::find_contamination;
use crate::errors::StoreError;
use crate::model::ChapterContent;
use crate::store::{ChapterRecord, ChapterStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Alignment,
    Contamination,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::Alignment => write!(f, "alignment"),
            IssueKind::Contamination => write!(f, "contamination"),
        }
    }
}

/// One finding for one chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignmentIssue {
    #[serde(rename = "textSlug")]
    pub text: String,
    #[serde(rename = "chapterSlug", serialize_with = "serialize_chapter_slug")]
    pub chapter: u32,
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub details: String,
}

impl AlignmentIssue {
    pub fn chapter_slug(&self) -> String {
        chapter_slug(self.chapter)
    }
}

fn chapter_slug(chapter: u32) -> String {
    format!("chapter-{:03}", chapter)
}

fn serialize_chapter_slug<S: Serializer>(chapter: &u32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&chapter_slug(*chapter))
}

impl fmt::Display for AlignmentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} [{}]: {}", self.text, self.chapter_slug(), self.kind, self.details)
    }
}

/// Per-text tally
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextSummary {
    pub slug: String,
    pub chapters: usize,
    pub aligned: usize,
    pub issues: usize,
}

impl fmt::Display for TextSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.issues == 0 { "✅" } else { "⚠️" };
        write!(
            f,
            "{} {}: {} chapters, {} aligned, {} issues",
            status, self.slug, self.chapters, self.aligned, self.issues
        )
    }
}

/// First and last paragraph positions; a single paragraph is checked once
fn edge_positions(content: &ChapterContent) -> Vec<usize> {
    match content.len() {
        0 => vec![],
        1 => vec![0],
        n => vec![0, n - 1],
    }
}

fn scan_edges(text: &str, chapter: u32, side: &str, content: &ChapterContent, issues: &mut Vec<AlignmentIssue>) {
    for position in edge_positions(content) {
        for name in find_contamination(&content.paragraphs[position].text) {
            issues.push(AlignmentIssue {
                text: text.to_string(),
                chapter,
                kind: IssueKind::Contamination,
                details: format!("{}[{}]: {}", side, position, name),
            });
        }
    }
}

/// Check one chapter's source against its translation
pub fn verify_chapter(text: &str, chapter: u32, source: &ChapterContent, translation: Option<&ChapterContent>) -> Vec<AlignmentIssue> {
    let mut issues = Vec::new();

    if let Some(translation) = translation.filter(|t| !t.is_empty()) {
        if translation.len() != source.len() {
            issues.push(AlignmentIssue {
                text: text.to_string(),
                chapter,
                kind: IssueKind::Alignment,
                details: format!("Source: {}, Translation: {}", source.len(), translation.len()),
            });
        }
    }

    scan_edges(text, chapter, "source", source, &mut issues);
    if let Some(translation) = translation {
        scan_edges(text, chapter, "translation", translation, &mut issues);
    }

    issues
}

/// Verify a text's chapters and tally them
pub fn verify_records(slug: &str, records: &[ChapterRecord]) -> (TextSummary, Vec<AlignmentIssue>) {
    let mut summary = TextSummary {
        slug: slug.to_string(),
        ..Default::default()
    };
    let mut issues = Vec::new();

    for record in records {
        summary.chapters += 1;
        let found = verify_chapter(slug, record.chapter_number, &record.source, record.translation.as_ref());
        let misaligned = found.iter().any(|i| i.kind == IssueKind::Alignment);
        if record.translation.as_ref().is_some_and(|t| !t.is_empty()) && !misaligned {
            summary.aligned += 1;
        }
        summary.issues += found.len();
        issues.extend(found);
    }

    (summary, issues)
}

/// Verify every text in the store, ordered by slug
pub fn verify_store(store: &ChapterStore) -> Result<(Vec<TextSummary>, Vec<AlignmentIssue>), StoreError> {
    let mut summaries = Vec::new();
    let mut issues = Vec::new();
    for text in store.list_texts()? {
        let records = store.chapters(&text.slug)?;
        let (summary, found) = verify_records(&text.slug, &records);
        summaries.push(summary);
        issues.extend(found);
    }
    Ok((summaries, issues))
}
