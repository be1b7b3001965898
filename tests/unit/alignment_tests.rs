/*!
 * Tests for alignment verification and translation repair over a store
 */

use anyhow::Result;

use textalign::alignment::{render_verification, repair_translation, verify_store, IssueKind};
use textalign::errors::{RepairError, StoreError};
use textalign::model::ChapterContent;
use textalign::store::ChapterStore;

use crate::common;

fn numbered(count: usize) -> Vec<String> {
    (1..=count).map(|n| format!("paragraph {}", n)).collect()
}

fn seeded_store(source_count: usize, translation_count: usize) -> Result<ChapterStore> {
    let store = ChapterStore::open_in_memory()?;
    let text_id = store.upsert_text("demo", "Demo")?;
    let source = numbered(source_count);
    let source: Vec<&str> = source.iter().map(String::as_str).collect();
    store.upsert_chapter(text_id, &common::chapter(1, "One", &source))?;
    store.set_translation("demo", 1, &ChapterContent::from_texts(numbered(translation_count), 1))?;
    Ok(store)
}

#[test]
fn test_verify_store_withTwelveAgainstEleven_shouldReportAlignmentIssue() -> Result<()> {
    let store = seeded_store(12, 11)?;

    let (summaries, issues) = verify_store(&store)?;

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].chapters, 1);
    assert_eq!(summaries[0].aligned, 0);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::Alignment);
    assert_eq!(issues[0].details, "Source: 12, Translation: 11");

    let report = render_verification(&summaries, &issues);
    assert!(report.contains("⚠️ demo: 1 chapters, 0 aligned, 1 issues"));
    assert!(report.contains("demo/chapter-001 [alignment]: Source: 12, Translation: 11"));
    Ok(())
}

#[test]
fn test_verify_store_withContaminatedTranslation_shouldReportEdgeParagraph() -> Result<()> {
    let store = seeded_store(3, 3)?;
    let mut translation = ChapterContent::from_texts(numbered(3), 1);
    translation.paragraphs[2].text = "This webpage was last revised on 2 May 2004".to_string();
    store.set_translation("demo", 1, &translation)?;

    let (summaries, issues) = verify_store(&store)?;

    assert_eq!(summaries[0].aligned, 1);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::Contamination);
    assert_eq!(issues[0].details, "translation[2]: Web footer");
    Ok(())
}

#[test]
fn test_repair_translation_withMergedParagraph_shouldRestoreAlignment() -> Result<()> {
    let store = seeded_store(4, 3)?;

    let repaired = repair_translation(&store, "demo", 1, 2, "paragraph 2a\n\nparagraph 2b")?;

    assert_eq!(repaired.len(), 4);
    assert_eq!(repaired.paragraphs[2].text, "paragraph 2b");
    assert_eq!(repaired.paragraphs[3].index, 4);
    let (_, issues) = verify_store(&store)?;
    assert!(issues.is_empty());
    Ok(())
}

#[test]
fn test_repair_translation_withWrongCount_shouldWriteNothing() -> Result<()> {
    let store = seeded_store(4, 3)?;
    let before = store.chapter("demo", 1)?.translation;

    let result = repair_translation(&store, "demo", 1, 2, "only one");

    assert!(matches!(
        result,
        Err(StoreError::Repair(RepairError::CountMismatch {
            source_count: 4,
            translation: 3
        }))
    ));
    assert_eq!(store.chapter("demo", 1)?.translation, before);
    Ok(())
}

#[test]
fn test_repair_translation_withUnknownChapter_shouldFail() -> Result<()> {
    let store = seeded_store(2, 2)?;
    let result = repair_translation(&store, "demo", 9, 1, "x");
    assert!(matches!(result, Err(StoreError::UnknownChapter { chapter: 9, .. })));
    Ok(())
}
