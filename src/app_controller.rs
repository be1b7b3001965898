use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::acquire::{run_acquisition, AcquireOptions, AcquireSummary, CtextSource};
use crate::alignment::{render_verification, repair_translation, verify_store};
use crate::app_config::{Config, DocumentConfig, ProfileConfig};
use crate::file_utils::FileManager;
use crate::model::ChapterContent;
use crate::pipeline::quality::render_reports;
use crate::pipeline::{ChapterHint, DocumentInput, QualityReport, QualitySummary};
use crate::profiles::prose::{chapter_number_from_file_name, ctext_input};
use crate::profiles::Profile;
use crate::seeding::{import_translations, seed_text, SeedSummary};
use crate::store::{ChapterStore, StoreConnection};

// @module: Application controller for document processing, seeding and verification

/// File collecting per-item failures of a run, under the processed directory
const ISSUES_LOG_FILE: &str = "textalign.issues.log";

/// Tally of one processing or check run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.errors == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Done: {} processed, {} skipped, {} errors", self.processed, self.skipped, self.errors)
    }
}

/// Result of `check`: the tally, the quality verdicts and the printable report
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub summary: RunSummary,
    pub quality: QualitySummary,
    pub report: String,
}

/// Result of `verify`
#[derive(Debug, Clone)]
pub struct VerifyOutcome {
    pub issues: usize,
    pub report: String,
}

/// How a work item's file is turned into a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputFormat {
    // @format: Whole document in one text file
    Document,
    // @format: One plain text file per chapter
    TextChapter(u32),
    // @format: One raw ctext.org JSON file per chapter
    CtextChapter(u32),
}

/// One file to run through a document's profile
struct WorkItem<'a> {
    document: &'a DocumentConfig,
    profile: &'a Profile,
    path: PathBuf,
    format: InputFormat,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the pipeline over the selected documents and write chapter files.
    /// With `write_report` the quality reports land next to the chapters.
    pub fn process(&self, slug: Option<&str>, write_report: bool) -> Result<RunSummary> {
        let start_time = std::time::Instant::now();
        let (summary, reports) = self.run_pipeline(slug, true)?;

        if write_report {
            for (slug, reports) in &reports {
                let dir = self.config.processed_dir_for(slug);
                FileManager::write_atomic(dir.join("quality-report.txt"), &render_reports(slug, reports))?;
                FileManager::write_json(dir.join("quality-report.json"), reports)?;
                info!("[{}] Quality report written to {:?}", slug, dir);
            }
        }

        info!("Processing finished in {}", Self::format_duration(start_time.elapsed()));
        info!("{}", summary);
        Ok(summary)
    }

    /// Run the pipeline without writing anything and render the quality reports
    pub fn check(&self, slug: Option<&str>) -> Result<CheckOutcome> {
        let (summary, reports) = self.run_pipeline(slug, false)?;

        let mut report = String::new();
        for (slug, slug_reports) in &reports {
            report.push_str(&render_reports(slug, slug_reports));
            report.push('\n');
        }
        let quality = QualitySummary::from_reports(reports.iter().flat_map(|(_, r)| r.iter()));

        info!("{}", summary);
        Ok(CheckOutcome { summary, quality, report })
    }

    fn selected_documents(&self, slug: Option<&str>) -> Result<Vec<&DocumentConfig>> {
        match slug {
            Some(slug) => {
                let documents = self.config.documents_for(slug);
                if documents.is_empty() {
                    return Err(anyhow!("No document configured for slug: {}", slug));
                }
                Ok(documents)
            }
            None => Ok(self.config.documents.iter().collect()),
        }
    }

    /// Distinct slugs of the selected documents, in configuration order
    fn selected_slugs(&self, slug: Option<&str>) -> Result<Vec<&DocumentConfig>> {
        let mut seen: Vec<&DocumentConfig> = Vec::new();
        for document in self.selected_documents(slug)? {
            if !seen.iter().any(|d| d.slug == document.slug) {
                seen.push(document);
            }
        }
        Ok(seen)
    }

    /// Expand documents into work items; directory profiles give one item per chapter file
    fn work_items(
        &self,
        documents: &[(&DocumentConfig, Profile)],
        summary: &mut RunSummary,
    ) -> Vec<(usize, PathBuf, InputFormat)> {
        let mut items = Vec::new();
        for (position, (document, _)) in documents.iter().enumerate() {
            let input = document.input_path(&self.config.paths.raw_dir);
            let files = match &document.profile {
                ProfileConfig::Prose(_) => FileManager::find_files(&input, "txt"),
                ProfileConfig::Ctext(_) => FileManager::find_chapter_files(&input),
                _ => {
                    items.push((position, input, InputFormat::Document));
                    continue;
                }
            };

            let files = match files {
                Ok(files) if !files.is_empty() => files,
                Ok(_) => {
                    warn!("[{}] No chapter files found in {:?}", document.slug, input);
                    summary.skipped += 1;
                    continue;
                }
                Err(e) => {
                    error!("[{}] {:#}", document.slug, e);
                    summary.errors += 1;
                    continue;
                }
            };

            for path in files {
                let number = path
                    .file_name()
                    .and_then(|name| chapter_number_from_file_name(&name.to_string_lossy()));
                let Some(number) = number else {
                    warn!("[{}] Skipping {:?}: no chapter number in file name", document.slug, path);
                    summary.skipped += 1;
                    continue;
                };
                let format = match &document.profile {
                    ProfileConfig::Ctext(_) => InputFormat::CtextChapter(number),
                    _ => InputFormat::TextChapter(number),
                };
                items.push((position, path, format));
            }
        }
        items
    }

    fn load_input(item: &WorkItem<'_>) -> Result<DocumentInput> {
        let content = FileManager::read_to_string(&item.path)?;
        Ok(match item.format {
            InputFormat::Document => DocumentInput::from_text(&content),
            InputFormat::TextChapter(number) => {
                DocumentInput::from_text(&content).with_hint(ChapterHint { number, title: None })
            }
            InputFormat::CtextChapter(number) => ctext_input(&content, number)?,
        })
    }

    /// Shared body of `process` and `check`; reports are grouped by slug
    fn run_pipeline(&self, slug: Option<&str>, write: bool) -> Result<(RunSummary, Vec<(String, Vec<QualityReport>)>)> {
        let mut summary = RunSummary::default();
        let mut issues: Vec<String> = Vec::new();

        let mut documents = Vec::new();
        for document in self.selected_documents(slug)? {
            match Profile::from_config(&document.profile) {
                Ok(profile) => documents.push((document, profile)),
                Err(e) => {
                    error!("[{}] {}", document.slug, e);
                    issues.push(format!("[{}] {}", document.slug, e));
                    summary.errors += 1;
                }
            }
        }

        // Chapter numbering can have gaps, so files from an earlier run may have no successor
        if write {
            let mut cleared: Vec<&str> = Vec::new();
            for (document, _) in &documents {
                if cleared.contains(&document.slug.as_str()) {
                    continue;
                }
                let removed = FileManager::remove_chapter_files(self.config.processed_dir_for(&document.slug))?;
                if removed > 0 {
                    debug!("[{}] Removed {} chapter files from the previous run", document.slug, removed);
                }
                cleared.push(&document.slug);
            }
        }

        let items = self.work_items(&documents, &mut summary);
        let progress_bar = Self::progress_bar(items.len() as u64, "files");
        let mut reports: Vec<(String, Vec<QualityReport>)> = Vec::new();

        for (position, path, format) in items {
            let (document, profile) = &documents[position];
            let item = WorkItem {
                document: *document,
                profile,
                path,
                format,
            };
            progress_bar.set_message(document.slug.clone());

            let outcome = Self::load_input(&item).and_then(|input| item.profile.run(&input).map_err(Into::into));
            let outcome = match outcome {
                Ok(outcome) => outcome,
                Err(e) => {
                    let message = format!("[{}] {:?}: {:#}", item.document.slug, item.path, e);
                    progress_bar.suspend(|| error!("{}", message));
                    issues.push(message);
                    summary.errors += 1;
                    progress_bar.inc(1);
                    continue;
                }
            };

            let out_dir = self.config.processed_dir_for(&item.document.slug);
            let slot = match reports.iter().position(|(s, _)| *s == item.document.slug) {
                Some(index) => index,
                None => {
                    reports.push((item.document.slug.clone(), Vec::new()));
                    reports.len() - 1
                }
            };

            for chapter_outcome in outcome.chapters {
                let chapter = &chapter_outcome.chapter;
                if chapter.source_content.is_empty() {
                    let message = format!(
                        "[{}] chapter {} ({}): no paragraphs extracted, not written",
                        item.document.slug, chapter.chapter_number, chapter.title
                    );
                    progress_bar.suspend(|| error!("{}", message));
                    issues.push(message);
                    summary.errors += 1;
                } else if write {
                    match FileManager::write_json(out_dir.join(chapter.file_name()), chapter) {
                        Ok(()) => summary.processed += 1,
                        Err(e) => {
                            let message = format!("[{}] chapter {}: {:#}", item.document.slug, chapter.chapter_number, e);
                            progress_bar.suspend(|| error!("{}", message));
                            issues.push(message);
                            summary.errors += 1;
                        }
                    }
                } else {
                    summary.processed += 1;
                }
                reports[slot].1.push(chapter_outcome.report);
            }

            progress_bar.inc(1);
        }
        progress_bar.finish_and_clear();

        if write && !issues.is_empty() {
            self.write_issues(&issues);
        }

        Ok((summary, reports))
    }

    fn write_issues(&self, issues: &[String]) {
        let log_path = self.config.paths.processed_dir.join(ISSUES_LOG_FILE);
        let content = format!("{} issue(s)\n{}", issues.len(), issues.join("\n"));
        match FileManager::append_to_log_file(&log_path, &content) {
            Ok(()) => info!("Issues written to {:?}", log_path),
            Err(e) => warn!("Failed to write issues log: {}", e),
        }
    }

    fn open_store(&self) -> Result<ChapterStore> {
        let db = StoreConnection::open_or_default(self.config.store.path.as_deref())?;
        Ok(ChapterStore::new(db))
    }

    /// Seed processed chapters of one text, or of every configured text
    pub fn seed(&self, slug: Option<&str>) -> Result<SeedSummary> {
        let store = self.open_store()?;
        let mut total = SeedSummary::default();

        for document in self.selected_slugs(slug)? {
            let dir = self.config.processed_dir_for(&document.slug);
            if slug.is_none() && !FileManager::dir_exists(&dir) {
                warn!("[{}] Not processed yet, skipping", document.slug);
                continue;
            }
            match seed_text(&store, &document.slug, document.display_title(), &dir) {
                Ok(summary) => total += summary,
                Err(e) => {
                    error!("[{}] Seeding failed: {:#}", document.slug, e);
                    total.failed_texts += 1;
                }
            }
        }

        info!(
            "Done: {} processed, {} rejected, {} texts failed",
            total.processed(),
            total.rejected,
            total.failed_texts
        );
        Ok(total)
    }

    /// Import translation chapter files for an already seeded text
    pub fn import_translation(&self, slug: &str, dir: &Path) -> Result<SeedSummary> {
        let store = self.open_store()?;
        import_translations(&store, slug, dir)
    }

    /// Check alignment and contamination across the whole store
    pub fn verify(&self) -> Result<VerifyOutcome> {
        let store = self.open_store()?;
        let (summaries, issues) = verify_store(&store)?;
        Ok(VerifyOutcome {
            issues: issues.len(),
            report: render_verification(&summaries, &issues),
        })
    }

    /// Override one translation paragraph; nothing is written unless counts match afterwards
    pub fn repair(&self, slug: &str, chapter: u32, index: u32, replacement: &str) -> Result<ChapterContent> {
        let store = self.open_store()?;
        Ok(repair_translation(&store, slug, chapter, index, replacement)?)
    }

    /// Fetch raw ctext.org chapters into `raw_dir/<acquire slug>`
    pub async fn acquire(&self, start: Option<u32>, end: Option<u32>, delay_ms: Option<u64>) -> Result<AcquireSummary> {
        let acquire = &self.config.acquire;
        let mut options = AcquireOptions::from_config(acquire);
        if let Some(start) = start {
            options.start = start;
        }
        if let Some(end) = end {
            options.end = end;
        }
        if let Some(delay_ms) = delay_ms {
            options.delay = std::time::Duration::from_millis(delay_ms);
        }
        if options.start == 0 || options.start > options.end {
            return Err(anyhow!("Invalid chapter range: {}-{}", options.start, options.end));
        }

        let source = CtextSource::new(acquire)?;
        let out_dir = self.config.paths.raw_dir.join(&acquire.slug);
        run_acquisition(&source, &out_dir, &options).await
    }

    fn progress_bar(len: u64, unit: &str) -> ProgressBar {
        let progress_bar = ProgressBar::new(len);
        let template = format!(
            "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}}",
            unit
        );
        let style = ProgressStyle::default_bar()
            .template(&template)
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
