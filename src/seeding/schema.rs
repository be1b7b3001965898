/*!
 * Chapter document schema.
 *
 * Every chapter that enters the store passes through here exactly once:
 * the paragraph list must be non-empty, indices unique, and every text
 * trimmed and non-empty.
 */

use serde::Deserialize;
use std::collections::HashSet;

use crate::errors::SchemaError;
use crate::model::{ChapterContent, ProcessedChapter};

/// Wire shape of a chapter file; unknown fields are rejected
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ChapterDocument {
    chapter_number: u32,
    title: String,
    source_content: ChapterContent,
}

/// Check a paragraph list
pub fn validate_content(chapter: u32, content: &ChapterContent) -> Result<(), SchemaError> {
    if content.paragraphs.is_empty() {
        return Err(SchemaError::NoParagraphs { chapter });
    }

    let mut seen = HashSet::with_capacity(content.paragraphs.len());
    for paragraph in &content.paragraphs {
        if !seen.insert(paragraph.index) {
            return Err(SchemaError::DuplicateIndex {
                chapter,
                index: paragraph.index,
            });
        }
        if paragraph.text.is_empty() || paragraph.text.trim() != paragraph.text {
            return Err(SchemaError::UntrimmedText {
                chapter,
                index: paragraph.index,
            });
        }
    }
    Ok(())
}

/// Parse and validate a chapter file
pub fn parse_chapter(json: &str) -> Result<ProcessedChapter, SchemaError> {
    let document: ChapterDocument =
        serde_json::from_str(json).map_err(|e| SchemaError::Malformed(e.to_string()))?;
    validate_content(document.chapter_number, &document.source_content)?;

    Ok(ProcessedChapter {
        chapter_number: document.chapter_number,
        title: document.title,
        source_content: document.source_content,
    })
}

/// Parse stored paragraph JSON and validate it
pub fn parse_content(chapter: u32, json: &str) -> Result<ChapterContent, SchemaError> {
    let content: ChapterContent = serde_json::from_str(json).map_err(|e| SchemaError::Malformed(e.to_string()))?;
    validate_content(chapter, &content)?;
    Ok(content)
}
