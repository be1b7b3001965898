/*!
 * Common test utilities for the textalign test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use textalign::app_config::{Config, CtextConfig, DocumentConfig, PathsConfig, ProfileConfig, ProseConfig, StoreConfig};
use textalign::model::{ChapterContent, ProcessedChapter};

/// Routes library logs to the test output; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content, creating parent directories
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A chapter document with the given paragraph texts, indexed from 1
pub fn chapter(number: u32, title: &str, texts: &[&str]) -> ProcessedChapter {
    ProcessedChapter {
        chapter_number: number,
        title: title.to_string(),
        source_content: ChapterContent::from_texts(texts.iter().copied(), 1),
    }
}

/// Writes a chapter document as `chapter-NNN.json` in `dir`
pub fn write_chapter(dir: &Path, chapter: &ProcessedChapter) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(chapter)?;
    create_test_file(dir, &chapter.file_name(), &json)
}

/// Two prose chapters of a novel under `raw/novel`
pub fn create_novel(raw_dir: &Path) -> Result<()> {
    create_test_file(
        raw_dir,
        "novel/001_first.txt",
        "第一回 周宣王聞謠輕殺\n\n話說周朝。\n自武王伐紂。\n\n宣王即位。\n",
    )?;
    create_test_file(raw_dir, "novel/002_second.txt", "第二回 褒人贖罪獻美\n\n話說宣王。\n")?;
    create_test_file(raw_dir, "novel/notes.txt", "no chapter number here\n")?;
    Ok(())
}

/// One raw ctext.org chapter under `raw/classic`
pub fn create_ctext_chapter(raw_dir: &Path, number: u32, fulltext: &[&str]) -> Result<PathBuf> {
    let json = serde_json::json!({ "title": format!("卷{}", number), "fulltext": fulltext });
    create_test_file(raw_dir, &format!("classic/chapter-{:03}.json", number), &json.to_string())
}

/// Configuration rooted in a temp directory with a prose and a ctext document
pub fn test_config(root: &Path) -> Config {
    Config {
        paths: PathsConfig {
            raw_dir: root.join("raw"),
            processed_dir: root.join("processed"),
        },
        store: StoreConfig {
            path: Some(root.join("store").join("textalign.db")),
        },
        documents: vec![
            DocumentConfig {
                slug: "novel".to_string(),
                title: "東周列國志".to_string(),
                input: PathBuf::from("novel"),
                profile: ProfileConfig::Prose(ProseConfig {
                    title_pattern: Some(r"^第[一-龥]+回[　\s]".to_string()),
                    ..ProseConfig::default()
                }),
            },
            DocumentConfig {
                slug: "classic".to_string(),
                title: "朱子語類".to_string(),
                input: PathBuf::from("classic"),
                profile: ProfileConfig::Ctext(CtextConfig::default()),
            },
        ],
        ..Config::default()
    }
}
