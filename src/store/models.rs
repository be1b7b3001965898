/*!
 * Store records.
 */

use serde::Serialize;
use std::fmt;

use crate::model::ChapterContent;

/// One text in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextRecord {
    pub id: i64,
    pub slug: String,
    pub title: String,
}

/// One chapter with its source and optional translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRecord {
    pub chapter_number: u32,
    pub title: String,
    pub source: ChapterContent,
    /// Hex SHA-256 of the stored source JSON
    pub source_hash: String,
    pub translation: Option<ChapterContent>,
}

impl ChapterRecord {
    /// Whether a non-empty translation has the same paragraph count as the source
    pub fn is_aligned(&self) -> bool {
        self.translation
            .as_ref()
            .is_some_and(|t| !t.is_empty() && t.len() == self.source.len())
    }
}

/// What an upsert did to the chapter row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    /// Same source digest and title; nothing written
    Unchanged,
}

impl fmt::Display for UpsertOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpsertOutcome::Inserted => write!(f, "inserted"),
            UpsertOutcome::Updated => write!(f, "updated"),
            UpsertOutcome::Unchanged => write!(f, "unchanged"),
        }
    }
}
