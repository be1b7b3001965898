/*!
 * Repository layer for the chapter store.
 *
 * All content is validated before it is written and again when it is read
 * back, so callers only ever see well-formed paragraph lists.
 */

use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};

use super::connection::StoreConnection;
use super::models::{ChapterRecord, TextRecord, UpsertOutcome};
use crate::errors::{RepairError, SchemaError, StoreError};
use crate::model::{ChapterContent, ProcessedChapter};
use crate::seeding::schema::{parse_content, validate_content};

/// Raw chapter row before its JSON columns are parsed
struct ChapterRow {
    chapter_number: u32,
    title: String,
    source_content: String,
    source_hash: String,
    translation_content: Option<String>,
}

impl ChapterRow {
    fn into_record(self) -> Result<ChapterRecord, StoreError> {
        let source = parse_content(self.chapter_number, &self.source_content)?;
        let translation = self
            .translation_content
            .map(|json| parse_content(self.chapter_number, &json))
            .transpose()?;
        Ok(ChapterRecord {
            chapter_number: self.chapter_number,
            title: self.title,
            source,
            source_hash: self.source_hash,
            translation,
        })
    }
}

const CHAPTER_COLUMNS: &str = "chapter_number, title, source_content, source_hash, translation_content";

fn map_chapter_row(row: &rusqlite::Row) -> rusqlite::Result<ChapterRow> {
    Ok(ChapterRow {
        chapter_number: row.get(0)?,
        title: row.get(1)?,
        source_content: row.get(2)?,
        source_hash: row.get(3)?,
        translation_content: row.get(4)?,
    })
}

fn to_json(content: &ChapterContent) -> Result<String, StoreError> {
    serde_json::to_string(content).map_err(|e| StoreError::InvalidContent(SchemaError::Malformed(e.to_string())))
}

/// Repository for chapter store operations
#[derive(Clone)]
pub struct ChapterStore {
    db: StoreConnection,
}

impl ChapterStore {
    pub fn new(db: StoreConnection) -> Self {
        Self { db }
    }

    /// Create a store backed by an in-memory database (for testing)
    pub fn open_in_memory() -> anyhow::Result<Self> {
        Ok(Self::new(StoreConnection::open_in_memory()?))
    }

    /// Hex SHA-256 of a string
    pub fn hash_content(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    // =========================================================================
    // Texts
    // =========================================================================

    /// Create the text or update its title; returns its id
    pub fn upsert_text(&self, slug: &str, title: &str) -> Result<i64, StoreError> {
        self.db.execute(|conn| {
            conn.execute(
                r#"
                INSERT INTO texts (slug, title, created_at, updated_at)
                VALUES (?1, ?2, datetime('now'), datetime('now'))
                ON CONFLICT(slug) DO UPDATE SET title = excluded.title, updated_at = datetime('now')
                "#,
                params![slug, title],
            )?;
            Ok(conn.query_row("SELECT id FROM texts WHERE slug = ?1", [slug], |row| row.get(0))?)
        })
    }

    pub fn text_id(&self, slug: &str) -> Result<i64, StoreError> {
        self.db.execute(|conn| Self::text_id_sync(conn, slug))
    }

    fn text_id_sync(conn: &Connection, slug: &str) -> Result<i64, StoreError> {
        conn.query_row("SELECT id FROM texts WHERE slug = ?1", [slug], |row| row.get(0))
            .optional()?
            .ok_or_else(|| StoreError::UnknownText(slug.to_string()))
    }

    /// Every text, ordered by slug
    pub fn list_texts(&self) -> Result<Vec<TextRecord>, StoreError> {
        self.db.execute(|conn| {
            let mut stmt = conn.prepare("SELECT id, slug, title FROM texts ORDER BY slug")?;
            let texts = stmt
                .query_map([], |row| {
                    Ok(TextRecord {
                        id: row.get(0)?,
                        slug: row.get(1)?,
                        title: row.get(2)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(texts)
        })
    }

    // =========================================================================
    // Chapters
    // =========================================================================

    /// Insert or update a chapter keyed by `(text_id, chapter_number)`.
    ///
    /// An existing translation is kept. Rows whose source digest and title
    /// already match are left untouched.
    pub fn upsert_chapter(&self, text_id: i64, chapter: &ProcessedChapter) -> Result<UpsertOutcome, StoreError> {
        validate_content(chapter.chapter_number, &chapter.source_content)?;
        let source_json = to_json(&chapter.source_content)?;
        let source_hash = Self::hash_content(&source_json);

        self.db.transaction(|tx| {
            let existing: Option<(String, String)> = tx
                .query_row(
                    "SELECT source_hash, title FROM chapters WHERE text_id = ?1 AND chapter_number = ?2",
                    params![text_id, chapter.chapter_number],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            let outcome = match existing {
                Some((hash, title)) if hash == source_hash && title == chapter.title => return Ok(UpsertOutcome::Unchanged),
                Some(_) => UpsertOutcome::Updated,
                None => UpsertOutcome::Inserted,
            };

            tx.execute(
                r#"
                INSERT INTO chapters (text_id, chapter_number, title, source_content, source_hash, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, datetime('now'), datetime('now'))
                ON CONFLICT(text_id, chapter_number) DO UPDATE SET
                    title = excluded.title,
                    source_content = excluded.source_content,
                    source_hash = excluded.source_hash,
                    updated_at = datetime('now')
                "#,
                params![text_id, chapter.chapter_number, chapter.title, source_json, source_hash],
            )?;

            debug!("Chapter {} of text {} {}", chapter.chapter_number, text_id, outcome);
            Ok(outcome)
        })
    }

    /// Store a translation for an existing chapter
    pub fn set_translation(&self, slug: &str, chapter_number: u32, translation: &ChapterContent) -> Result<(), StoreError> {
        validate_content(chapter_number, translation)?;
        let json = to_json(translation)?;

        self.db.execute(|conn| {
            let text_id = Self::text_id_sync(conn, slug)?;
            let updated = conn.execute(
                "UPDATE chapters SET translation_content = ?1, updated_at = datetime('now') WHERE text_id = ?2 AND chapter_number = ?3",
                params![json, text_id, chapter_number],
            )?;
            if updated == 0 {
                return Err(StoreError::UnknownChapter {
                    text: slug.to_string(),
                    chapter: chapter_number,
                });
            }
            Ok(())
        })
    }

    /// Every chapter of a text in chapter order
    pub fn chapters(&self, slug: &str) -> Result<Vec<ChapterRecord>, StoreError> {
        self.db.execute(|conn| {
            let text_id = Self::text_id_sync(conn, slug)?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM chapters WHERE text_id = ?1 ORDER BY chapter_number",
                CHAPTER_COLUMNS
            ))?;
            let rows = stmt
                .query_map([text_id], map_chapter_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows.into_iter().map(ChapterRow::into_record).collect()
        })
    }

    pub fn chapter(&self, slug: &str, chapter_number: u32) -> Result<ChapterRecord, StoreError> {
        self.db.execute(|conn| Self::chapter_sync(conn, slug, chapter_number))
    }

    fn chapter_sync(conn: &Connection, slug: &str, chapter_number: u32) -> Result<ChapterRecord, StoreError> {
        let text_id = Self::text_id_sync(conn, slug)?;
        conn.query_row(
            &format!(
                "SELECT {} FROM chapters WHERE text_id = ?1 AND chapter_number = ?2",
                CHAPTER_COLUMNS
            ),
            params![text_id, chapter_number],
            map_chapter_row,
        )
        .optional()?
        .ok_or_else(|| StoreError::UnknownChapter {
            text: slug.to_string(),
            chapter: chapter_number,
        })?
        .into_record()
    }

    /// Replace a chapter's translation with one derived from the current row.
    ///
    /// Read, derive and write happen in one transaction; the write only
    /// happens when the new paragraph count equals the source count.
    pub fn update_translation<F>(&self, slug: &str, chapter_number: u32, derive: F) -> Result<ChapterContent, StoreError>
    where
        F: FnOnce(&ChapterRecord) -> Result<ChapterContent, RepairError>,
    {
        self.db.transaction(|tx| {
            let record = Self::chapter_sync(tx, slug, chapter_number)?;
            let translation = derive(&record)?;

            if translation.len() != record.source.len() {
                return Err(RepairError::CountMismatch {
                    source_count: record.source.len(),
                    translation: translation.len(),
                }
                .into());
            }
            validate_content(chapter_number, &translation)?;

            let text_id = Self::text_id_sync(tx, slug)?;
            tx.execute(
                "UPDATE chapters SET translation_content = ?1, updated_at = datetime('now') WHERE text_id = ?2 AND chapter_number = ?3",
                params![to_json(&translation)?, text_id, chapter_number],
            )?;
            Ok(translation)
        })
    }
}
