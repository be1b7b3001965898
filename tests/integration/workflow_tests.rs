/*!
 * Integration tests for the process, seed, import, verify and repair workflow
 */

use anyhow::Result;

use textalign::app_controller::Controller;
use textalign::file_utils::FileManager;
use textalign::seeding::schema::parse_chapter;

use crate::common;

fn novel_translation(root: &std::path::Path) -> Result<std::path::PathBuf> {
    let dir = root.join("translations").join("novel");
    common::write_chapter(&dir, &common::chapter(1, "Chapter 1", &["Zhou dynasty. Since King Wu."]))?;
    common::write_chapter(&dir, &common::chapter(2, "Chapter 2", &["King Xuan."]))?;
    Ok(dir)
}

/// Test processing a prose and a ctext document end to end
#[test]
fn test_process_withProseAndCtextDocuments_shouldWriteChapterFiles() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let config = common::test_config(temp_dir.path());
    common::create_novel(&config.paths.raw_dir)?;
    common::create_ctext_chapter(&config.paths.raw_dir, 1, &["理氣上", "問：太極不是未有天地之先有箇渾成之物"])?;
    common::create_ctext_chapter(&config.paths.raw_dir, 2, &["  "])?;

    let controller = Controller::with_config(config.clone())?;
    let summary = controller.process(None, true)?;

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.errors, 1);
    assert_eq!(summary.to_string(), "Done: 3 processed, 1 skipped, 1 errors");

    let novel_dir = config.processed_dir_for("novel");
    let first = parse_chapter(&FileManager::read_to_string(novel_dir.join("chapter-001.json"))?)?;
    assert_eq!(first.title, "第一回 周宣王聞謠輕殺 (Chapter 1)");
    assert_eq!(first.source_content.len(), 2);
    assert_eq!(first.source_content.paragraphs[1].text, "宣王即位。");
    assert!(novel_dir.join("quality-report.txt").exists());
    assert!(novel_dir.join("quality-report.json").exists());

    let classic_dir = config.processed_dir_for("classic");
    let classic = parse_chapter(&FileManager::read_to_string(classic_dir.join("chapter-001.json"))?)?;
    assert_eq!(classic.title, "卷1");
    assert_eq!(classic.source_content.base_index(), Some(0));
    assert!(!classic_dir.join("chapter-002.json").exists());

    let issues_log = FileManager::read_to_string(config.paths.processed_dir.join("textalign.issues.log"))?;
    assert!(issues_log.contains("no paragraphs extracted"));
    Ok(())
}

/// Test that a second run produces byte-identical output
#[test]
fn test_process_runTwice_shouldProduceIdenticalFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::test_config(temp_dir.path());
    common::create_novel(&config.paths.raw_dir)?;
    let controller = Controller::with_config(config.clone())?;

    controller.process(Some("novel"), false)?;
    let path = config.processed_dir_for("novel").join("chapter-002.json");
    let first = FileManager::read_to_string(&path)?;
    controller.process(Some("novel"), false)?;
    assert_eq!(FileManager::read_to_string(&path)?, first);
    Ok(())
}

/// Test check mode reports without writing anything
#[test]
fn test_check_withNovel_shouldRenderReportsWithoutWriting() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::test_config(temp_dir.path());
    common::create_novel(&config.paths.raw_dir)?;
    let controller = Controller::with_config(config.clone())?;

    let outcome = controller.check(Some("novel"))?;

    assert!(outcome.report.contains("=== QUALITY REPORT: novel ==="));
    assert_eq!(outcome.quality.failed, 0);
    assert_eq!(outcome.summary.processed, 2);
    assert!(!config.paths.processed_dir.exists());
    Ok(())
}

#[test]
fn test_process_withUnknownSlug_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(common::test_config(temp_dir.path()))?;
    assert!(controller.process(Some("missing"), false).is_err());
    Ok(())
}

/// Test the store round trip: seed, import a misaligned translation, verify, repair
#[test]
fn test_seed_import_verify_repair_shouldRestoreAlignment() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let config = common::test_config(temp_dir.path());
    common::create_novel(&config.paths.raw_dir)?;
    let controller = Controller::with_config(config)?;
    controller.process(Some("novel"), false)?;

    let seeded = controller.seed(None)?;
    assert_eq!(seeded.inserted, 2);
    assert_eq!(seeded.rejected, 0);

    let imported = controller.import_translation("novel", &novel_translation(temp_dir.path())?)?;
    assert_eq!(imported.inserted, 2);
    assert_eq!(imported.misaligned, 1);

    let verified = controller.verify()?;
    assert_eq!(verified.issues, 1);
    assert!(verified
        .report
        .contains("novel/chapter-001 [alignment]: Source: 2, Translation: 1"));

    let repaired = controller.repair("novel", 1, 1, "Zhou dynasty.\n\nSince King Wu.")?;
    assert_eq!(repaired.len(), 2);

    let verified = controller.verify()?;
    assert_eq!(verified.issues, 0);
    assert!(verified.report.contains("NO ISSUES FOUND"));
    Ok(())
}

/// Test that one unreadable chapter file neither blocks its text nor later texts
#[test]
fn test_seed_withInvalidUtf8Chapter_shouldRejectFileAndContinue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::test_config(temp_dir.path());
    common::create_novel(&config.paths.raw_dir)?;
    let controller = Controller::with_config(config.clone())?;
    controller.process(Some("novel"), false)?;
    std::fs::write(config.processed_dir_for("novel").join("chapter-003.json"), [0xff, 0xfe, 0x7b])?;

    let seeded = controller.seed(None)?;
    assert_eq!(seeded.inserted, 2);
    assert_eq!(seeded.rejected, 1);
    assert_eq!(seeded.failed_texts, 0);

    let missing = controller.seed(Some("classic"))?;
    assert_eq!(missing.processed(), 0);
    assert_eq!(missing.failed_texts, 1);
    Ok(())
}

/// Test that a rerun drops chapter files the current run no longer produces
#[test]
fn test_process_rerun_shouldRemoveStaleChapterFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::test_config(temp_dir.path());
    common::create_novel(&config.paths.raw_dir)?;
    let controller = Controller::with_config(config.clone())?;
    let novel_dir = config.processed_dir_for("novel");
    common::write_chapter(&novel_dir, &common::chapter(9, "Old", &["stale"]))?;

    controller.process(Some("novel"), true)?;

    let files = FileManager::find_chapter_files(&novel_dir)?;
    assert_eq!(files, vec![novel_dir.join("chapter-001.json"), novel_dir.join("chapter-002.json")]);
    assert!(novel_dir.join("quality-report.json").exists());

    controller.check(Some("novel"))?;
    assert_eq!(FileManager::find_chapter_files(&novel_dir)?.len(), 2);
    Ok(())
}
