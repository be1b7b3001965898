use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path).with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Find files with a specific extension in a directory, sorted by path
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let extension = extension.trim_start_matches('.');
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            let matches = path
                .extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension));
            if path.is_file() && matches {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Chapter documents (`chapter-*.json`) directly inside a directory, sorted
    pub fn find_chapter_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1) {
            let entry = entry.context("Failed to read directory entry")?;
            let name = entry.file_name().to_string_lossy();
            if entry.file_type().is_file() && name.starts_with("chapter-") && name.ends_with(".json") {
                result.push(entry.path().to_path_buf());
            }
        }
        result.sort();
        Ok(result)
    }

    /// Delete every chapter document directly inside a directory; a missing directory holds none
    pub fn remove_chapter_files<P: AsRef<Path>>(dir: P) -> Result<usize> {
        if !Self::dir_exists(&dir) {
            return Ok(0);
        }
        let files = Self::find_chapter_files(&dir)?;
        for path in &files {
            fs::remove_file(path).with_context(|| format!("Failed to remove stale chapter file: {:?}", path))?;
        }
        Ok(files.len())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path).with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a file through a temp file in the same directory and an atomic rename
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Self::ensure_dir(parent)?;

        let mut temp = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temp file in: {:?}", parent))?;
        temp.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write temp file for: {:?}", path))?;
        temp.persist(path)
            .with_context(|| format!("Failed to move temp file into place: {:?}", path))?;
        Ok(())
    }

    /// Serialize fully, then write pretty JSON with a trailing newline atomically
    pub fn write_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
        let mut json = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
        json.push('\n');
        Self::write_atomic(path, &json)
    }

    /// Append content to a log file with timestamp
    pub fn append_to_log_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {:?}", path.as_ref()))?;

        writeln!(file, "[{}] {}", timestamp, content)
            .with_context(|| format!("Failed to write to log file: {:?}", path.as_ref()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_json_shouldEndWithNewlineAndLeaveNoTempFiles() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("chapter-001.json");

        FileManager::write_json(&path, &serde_json::json!({"a": 1})).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\n  \"a\": 1\n}\n");
        assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn test_find_chapter_files_shouldIgnoreOtherFilesAndSort() {
        let dir = TempDir::new().unwrap();
        for name in ["chapter-002.json", "chapter-001.json", "report.json", "chapter-003.txt"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }

        let files = FileManager::find_chapter_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["chapter-001.json", "chapter-002.json"]);
    }

    #[test]
    fn test_find_files_withDottedExtension_shouldMatch() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("001_a.TXT"), "x").unwrap();
        fs::write(dir.path().join("002_b.json"), "x").unwrap();
        assert_eq!(FileManager::find_files(dir.path(), ".txt").unwrap().len(), 1);
    }

    #[test]
    fn test_remove_chapter_files_shouldKeepOtherFiles() {
        let dir = TempDir::new().unwrap();
        for name in ["chapter-001.json", "chapter-007.json", "quality-report.json"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }

        assert_eq!(FileManager::remove_chapter_files(dir.path()).unwrap(), 2);
        assert!(FileManager::find_chapter_files(dir.path()).unwrap().is_empty());
        assert!(dir.path().join("quality-report.json").exists());
        assert_eq!(FileManager::remove_chapter_files(dir.path().join("missing")).unwrap(), 0);
    }
}
