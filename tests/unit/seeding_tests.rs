/*!
 * Tests for the chapter schema, seeding and the store
 */

use anyhow::Result;

use textalign::errors::SchemaError;
use textalign::file_utils::FileManager;
use textalign::model::ChapterContent;
use textalign::seeding::schema::parse_chapter;
use textalign::seeding::seed_text;
use textalign::store::{ChapterStore, StoreConnection, UpsertOutcome};

use crate::common;

#[test]
fn test_parse_chapter_withWrittenChapterFile_shouldRoundTripShape() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let chapter = common::chapter(7, "卷七", &["第一段", "第二段"]);
    let path = temp_dir.path().join(chapter.file_name());
    FileManager::write_json(&path, &chapter)?;

    let json = FileManager::read_to_string(&path)?;
    assert!(json.ends_with("}\n"));
    assert!(json.contains("\"chapterNumber\": 7"));
    assert!(json.contains("\"sourceContent\""));
    assert_eq!(parse_chapter(&json)?, chapter);
    Ok(())
}

#[test]
fn test_parse_chapter_withExtraField_shouldReject() {
    let json = r#"{"chapterNumber": 1, "title": "One", "author": "x", "sourceContent": {"paragraphs": [{"index": 1, "text": "a"}]}}"#;
    assert!(matches!(parse_chapter(json), Err(SchemaError::Malformed(_))));
}

#[test]
fn test_parse_chapter_withUntrimmedText_shouldReject() {
    let json = r#"{"chapterNumber": 2, "title": "Two", "sourceContent": {"paragraphs": [{"index": 1, "text": " a "}]}}"#;
    assert_eq!(parse_chapter(json), Err(SchemaError::UntrimmedText { chapter: 2, index: 1 }));
}

#[test]
fn test_seed_text_withChangedSource_shouldUpdateAndKeepTranslation() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let store = ChapterStore::new(StoreConnection::open(temp_dir.path().join("store.db"))?);

    let chapters_dir = temp_dir.path().join("processed");
    common::write_chapter(&chapters_dir, &common::chapter(1, "One", &["a", "b"]))?;
    let first = seed_text(&store, "demo", "Demo", &chapters_dir)?;
    assert_eq!(first.inserted, 1);

    let translation = ChapterContent::from_texts(["A", "B"], 1);
    store.set_translation("demo", 1, &translation)?;

    common::write_chapter(&chapters_dir, &common::chapter(1, "One", &["a", "b revised"]))?;
    let second = seed_text(&store, "demo", "Demo", &chapters_dir)?;
    assert_eq!(second.updated, 1);

    let record = store.chapter("demo", 1)?;
    assert_eq!(record.source.paragraphs[1].text, "b revised");
    assert_eq!(record.translation, Some(translation));
    assert_eq!(record.source_hash.len(), 64);
    Ok(())
}

#[test]
fn test_store_withReopenedFile_shouldPersistChapters() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested").join("store.db");

    {
        let store = ChapterStore::new(StoreConnection::open(&path)?);
        let text_id = store.upsert_text("demo", "Demo")?;
        let outcome = store.upsert_chapter(text_id, &common::chapter(3, "Three", &["x"]))?;
        assert_eq!(outcome, UpsertOutcome::Inserted);
    }

    let store = ChapterStore::new(StoreConnection::open(&path)?);
    let texts = store.list_texts()?;
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].title, "Demo");
    assert_eq!(store.chapters("demo")?[0].chapter_number, 3);
    Ok(())
}
