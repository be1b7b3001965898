/*!
 * Seeding and translation import.
 *
 * Reads every `chapter-*.json` in a directory, validates it against the
 * chapter schema and writes it to the store. Files that fail validation are
 * logged, skipped and tallied; the batch continues.
 */

pub mod schema;

use anyhow::{Context, Result};
use log::{error, info, warn};
use std::path::{Path, PathBuf};

use crate::errors::{SchemaError, StoreError};
use crate::file_utils::FileManager;
use crate::model::ProcessedChapter;
use crate::store::{ChapterStore, UpsertOutcome};

/// Tally of one seeding or import run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Files rejected by schema validation or the store
    pub rejected: usize,
    /// Translations stored with a paragraph count that differs from the source
    pub misaligned: usize,
    /// Texts whose whole directory could not be seeded
    pub failed_texts: usize,
}

impl SeedSummary {
    pub fn processed(&self) -> usize {
        self.inserted + self.updated + self.unchanged
    }
}

impl std::ops::AddAssign for SeedSummary {
    fn add_assign(&mut self, other: Self) {
        self.inserted += other.inserted;
        self.updated += other.updated;
        self.unchanged += other.unchanged;
        self.rejected += other.rejected;
        self.misaligned += other.misaligned;
        self.failed_texts += other.failed_texts;
    }
}

/// Parse every chapter file in `dir`; each file yields its own result
pub fn load_chapter_files(dir: &Path) -> Result<Vec<(PathBuf, Result<ProcessedChapter, SchemaError>)>> {
    if !FileManager::dir_exists(dir) {
        return Err(anyhow::anyhow!("Chapter directory does not exist: {:?}", dir));
    }

    let files = FileManager::find_chapter_files(dir)?
        .into_iter()
        .map(|path| {
            let parsed = FileManager::read_to_string(&path)
                .map_err(|e| SchemaError::Unreadable(format!("{:#}", e)))
                .and_then(|content| schema::parse_chapter(&content));
            (path, parsed)
        })
        .collect();
    Ok(files)
}

/// Seed a text from its processed directory
pub fn seed_text(store: &ChapterStore, slug: &str, title: &str, dir: &Path) -> Result<SeedSummary> {
    let files = load_chapter_files(dir)?;
    let text_id = store
        .upsert_text(slug, title)
        .with_context(|| format!("Failed to register text {}", slug))?;

    let mut summary = SeedSummary::default();
    for (path, parsed) in files {
        let chapter = match parsed {
            Ok(chapter) => chapter,
            Err(e) => {
                warn!("[{}] Rejected {:?}: {}", slug, path, e);
                summary.rejected += 1;
                continue;
            }
        };

        match store.upsert_chapter(text_id, &chapter) {
            Ok(UpsertOutcome::Inserted) => summary.inserted += 1,
            Ok(UpsertOutcome::Updated) => summary.updated += 1,
            Ok(UpsertOutcome::Unchanged) => summary.unchanged += 1,
            Err(e) => {
                error!("[{}] chapter {}: {}", slug, chapter.chapter_number, e);
                summary.rejected += 1;
            }
        }
    }

    info!(
        "[{}] Seeded: {} inserted, {} updated, {} unchanged, {} rejected",
        slug, summary.inserted, summary.updated, summary.unchanged, summary.rejected
    );
    Ok(summary)
}

/// Import translation files (same shape as chapter files) into an already seeded text
pub fn import_translations(store: &ChapterStore, slug: &str, dir: &Path) -> Result<SeedSummary> {
    let files = load_chapter_files(dir)?;
    let chapters = store.chapters(slug).with_context(|| format!("Text {} is not seeded", slug))?;

    let mut summary = SeedSummary::default();
    for (path, parsed) in files {
        let translation = match parsed {
            Ok(chapter) => chapter,
            Err(e) => {
                warn!("[{}] Rejected translation {:?}: {}", slug, path, e);
                summary.rejected += 1;
                continue;
            }
        };
        let number = translation.chapter_number;

        let Some(source) = chapters.iter().find(|c| c.chapter_number == number) else {
            error!("{}", StoreError::UnknownChapter { text: slug.to_string(), chapter: number });
            summary.rejected += 1;
            continue;
        };

        if source.source.len() != translation.source_content.len() {
            warn!(
                "[{}] chapter {}: Source: {}, Translation: {}",
                slug,
                number,
                source.source.len(),
                translation.source_content.len()
            );
            summary.misaligned += 1;
        }

        match store.set_translation(slug, number, &translation.source_content) {
            Ok(()) if source.translation.is_some() => summary.updated += 1,
            Ok(()) => summary.inserted += 1,
            Err(e) => {
                error!("[{}] chapter {}: {}", slug, number, e);
                summary.rejected += 1;
            }
        }
    }

    info!(
        "[{}] Translations: {} new, {} replaced, {} rejected, {} misaligned",
        slug, summary.inserted, summary.updated, summary.rejected, summary.misaligned
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChapterContent;
    use std::fs;
    use tempfile::TempDir;

    fn write_chapter(dir: &Path, number: u32, texts: &[&str]) {
        let chapter = ProcessedChapter {
            chapter_number: number,
            title: format!("Chapter {}", number),
            source_content: ChapterContent::from_texts(texts.iter().copied(), 1),
        };
        FileManager::write_json(dir.join(chapter.file_name()), &chapter).unwrap();
    }

    #[test]
    fn test_seed_text_withOneBadFile_shouldTallyAndContinue() {
        let dir = TempDir::new().unwrap();
        write_chapter(dir.path(), 1, &["a", "b"]);
        write_chapter(dir.path(), 2, &["c"]);
        fs::write(dir.path().join("chapter-003.json"), "{\"chapterNumber\": 3}").unwrap();

        let store = ChapterStore::open_in_memory().unwrap();
        let summary = seed_text(&store, "demo", "Demo", dir.path()).unwrap();

        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.rejected, 1);
        assert_eq!(store.chapters("demo").unwrap().len(), 2);

        let again = seed_text(&store, "demo", "Demo", dir.path()).unwrap();
        assert_eq!(again.unchanged, 2);
    }

    #[test]
    fn test_import_translations_withShortTranslation_shouldStoreAndCountMisaligned() {
        let source = TempDir::new().unwrap();
        write_chapter(source.path(), 1, &["a", "b"]);
        let store = ChapterStore::open_in_memory().unwrap();
        seed_text(&store, "demo", "Demo", source.path()).unwrap();

        let translations = TempDir::new().unwrap();
        write_chapter(translations.path(), 1, &["A"]);
        write_chapter(translations.path(), 5, &["E"]);

        let summary = import_translations(&store, "demo", translations.path()).unwrap();
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.misaligned, 1);
        assert_eq!(summary.rejected, 1);
    }

    #[test]
    fn test_seed_text_withInvalidUtf8File_shouldRejectItAndSeedTheRest() {
        let dir = TempDir::new().unwrap();
        write_chapter(dir.path(), 1, &["a", "b"]);
        fs::write(dir.path().join("chapter-002.json"), [0xff, 0xfe, 0x7b]).unwrap();

        let store = ChapterStore::open_in_memory().unwrap();
        let summary = seed_text(&store, "demo", "Demo", dir.path()).unwrap();

        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.rejected, 1);
        let chapters = store.chapters("demo").unwrap();
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].chapter_number, 1);
    }

    #[test]
    fn test_load_chapter_files_withInvalidUtf8File_shouldYieldUnreadable() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("chapter-001.json"), [0xff, 0xfe]).unwrap();

        let files = load_chapter_files(dir.path()).unwrap();

        assert_eq!(files.len(), 1);
        assert!(matches!(files[0].1, Err(SchemaError::Unreadable(_))));
    }

    #[test]
    fn test_load_chapter_files_withMissingDirectory_shouldFail() {
        assert!(load_chapter_files(Path::new("/nonexistent/textalign")).is_err());
    }
}
