use anyhow::{anyhow, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::default::Default;
use std::path::{Path, PathBuf};

use crate::profiles::verse::titles::{carmina_graeca_titles, TitleEntry};
use crate::text::Script;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Input and output directories
    #[serde(default)]
    pub paths: PathsConfig,

    /// Chapter store
    #[serde(default)]
    pub store: StoreConfig,

    /// Raw chapter acquisition
    #[serde(default)]
    pub acquire: AcquireConfig,

    /// Documents and the profile each one is processed with
    #[serde(default = "default_documents")]
    pub documents: Vec<DocumentConfig>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Directory layout
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PathsConfig {
    // @field: Raw input root, one subdirectory per text
    #[serde(default = "default_raw_dir")]
    pub raw_dir: PathBuf,

    // @field: Processed output root, one subdirectory per text
    #[serde(default = "default_processed_dir")]
    pub processed_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_dir: default_raw_dir(),
            processed_dir: default_processed_dir(),
        }
    }
}

/// Chapter store settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct StoreConfig {
    // @field: SQLite file; the user data directory is used when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// ctext.org acquisition settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AcquireConfig {
    // @field: gettext endpoint
    #[serde(default = "default_api_base")]
    pub api_base: String,

    // @field: Work URN, chapters are addressed as `{urn}/{n}`
    #[serde(default = "default_urn")]
    pub urn: String,

    // @field: Text slug the raw chapters are stored under
    #[serde(default = "default_acquire_slug")]
    pub slug: String,

    // @field: Last chapter of the work
    #[serde(default = "default_total_chapters")]
    pub total_chapters: u32,

    // @field: Pause between requests
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    // @field: Pause before the single retry of a rate-limited request
    #[serde(default = "default_rate_limit_wait_secs")]
    pub rate_limit_wait_secs: u64,

    // @field: Environment variable holding the optional API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    // @field: Request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            urn: default_urn(),
            slug: default_acquire_slug(),
            total_chapters: default_total_chapters(),
            delay_ms: default_delay_ms(),
            rate_limit_wait_secs: default_rate_limit_wait_secs(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AcquireConfig {
    /// API key from the configured environment variable, if set and non-empty
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok().filter(|key| !key.is_empty())
    }
}

/// One document to process
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DocumentConfig {
    // @field: Text slug; output goes to `processed_dir/<slug>`
    pub slug: String,

    // @field: Display title of the text
    #[serde(default)]
    pub title: String,

    // @field: File or directory, relative to `raw_dir`
    pub input: PathBuf,

    // @field: Pipeline profile and its settings
    pub profile: ProfileConfig,
}

impl DocumentConfig {
    /// Input path resolved against the raw directory
    pub fn input_path(&self, raw_dir: &Path) -> PathBuf {
        if self.input.is_absolute() {
            self.input.clone()
        } else {
            raw_dir.join(&self.input)
        }
    }

    /// Display title, falling back to the slug
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() { &self.slug } else { &self.title }
    }
}

/// Pipeline profile selection
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProfileConfig {
    // @profile: Verse anthology with a static title table
    Verse(VerseConfig),
    // @profile: Commentary volume with a static book table
    Commentary(CommentaryConfig),
    // @profile: Diary with unique structural anchors
    Diary(DiaryConfig),
    // @profile: One plain text file per chapter
    Prose(ProseConfig),
    // @profile: One ctext.org JSON file per chapter
    Ctext(CtextConfig),
}

impl ProfileConfig {
    // @returns: Lowercase profile identifier
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Verse(_) => "verse",
            Self::Commentary(_) => "commentary",
            Self::Diary(_) => "diary",
            Self::Prose(_) => "prose",
            Self::Ctext(_) => "ctext",
        }
    }
}

/// Verse profile settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VerseConfig {
    // @field: Title lines of every poem, in any order
    #[serde(default = "carmina_graeca_titles")]
    pub titles: Vec<TitleEntry>,

    // @field: Derive titles from ALL-CAPS lines instead of the table
    #[serde(default)]
    pub detect_titles: bool,

    // @field: First line after the front matter
    #[serde(default = "default_verse_content_start")]
    pub content_start_line: usize,

    // @field: Last line before the back matter
    #[serde(default = "default_verse_content_end")]
    pub content_end_line: usize,

    // @field: Paragraph cap in verse lines
    #[serde(default = "default_lines_per_paragraph")]
    pub lines_per_paragraph: usize,

    // @field: Non-verse lines that end a stanza
    #[serde(default = "default_verse_min_gap")]
    pub min_gap: usize,
}

impl Default for VerseConfig {
    fn default() -> Self {
        Self {
            titles: carmina_graeca_titles(),
            detect_titles: false,
            content_start_line: default_verse_content_start(),
            content_end_line: default_verse_content_end(),
            lines_per_paragraph: default_lines_per_paragraph(),
            min_gap: default_verse_min_gap(),
        }
    }
}

/// Commentary profile settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CommentaryConfig {
    // @field: Printed volume, 1 or 2
    pub volume: u8,

    // @field: Paragraph split threshold in characters
    #[serde(default = "default_max_paragraph_chars")]
    pub max_paragraph_chars: usize,
}

impl CommentaryConfig {
    pub fn volume(volume: u8) -> Self {
        Self {
            volume,
            max_paragraph_chars: default_max_paragraph_chars(),
        }
    }
}

/// Diary profile settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DiaryConfig {
    // @field: Year ranges that become chapters
    #[serde(default = "default_periods")]
    pub periods: Vec<PeriodConfig>,

    // @field: Year assumed for text before the first year header
    #[serde(default = "default_first_year")]
    pub first_year: u32,

    // @field: Year assumed when the last entry has no parsable year
    #[serde(default = "default_last_year")]
    pub last_year: u32,
}

impl Default for DiaryConfig {
    fn default() -> Self {
        Self {
            periods: default_periods(),
            first_year: default_first_year(),
            last_year: default_last_year(),
        }
    }
}

/// Inclusive year range
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PeriodConfig {
    pub start_year: u32,
    pub end_year: u32,
}

impl PeriodConfig {
    pub fn label(&self) -> String {
        format!("{}-{}", self.start_year, self.end_year)
    }

    pub fn contains(&self, year: u32) -> bool {
        (self.start_year..=self.end_year).contains(&year)
    }
}

/// Prose profile settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProseConfig {
    // @field: Index of the first paragraph
    #[serde(default = "default_prose_index_base")]
    pub index_base: u32,

    // @field: Regex matching the chapter title line
    #[serde(default)]
    pub title_pattern: Option<String>,

    // @field: Expected script of the text
    #[serde(default)]
    pub script: Script,

    // @field: Warn below this share of the expected script (0..1)
    #[serde(default = "default_min_script_share")]
    pub min_script_share: f64,
}

impl Default for ProseConfig {
    fn default() -> Self {
        Self {
            index_base: default_prose_index_base(),
            title_pattern: None,
            script: Script::default(),
            min_script_share: default_min_script_share(),
        }
    }
}

/// ctext profile settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CtextConfig {
    // @field: Index of the first paragraph
    #[serde(default = "default_ctext_index_base")]
    pub index_base: u32,

    // @field: Expected script of the text
    #[serde(default)]
    pub script: Script,

    // @field: Warn below this share of the expected script (0..1)
    #[serde(default = "default_min_script_share")]
    pub min_script_share: f64,
}

impl Default for CtextConfig {
    fn default() -> Self {
        Self {
            index_base: default_ctext_index_base(),
            script: Script::default(),
            min_script_share: default_min_script_share(),
        }
    }
}

impl CtextConfig {
    /// Equivalent prose settings; ctext chapters carry their title in the JSON
    pub fn as_prose(&self) -> ProseConfig {
        ProseConfig {
            index_base: self.index_base,
            title_pattern: None,
            script: self.script,
            min_script_share: self.min_script_share,
        }
    }
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

// Implement FromStr trait for LogLevel
impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(anyhow!("Invalid log level: {}", s)),
        }
    }
}

fn default_raw_dir() -> PathBuf {
    PathBuf::from("data/raw")
}

fn default_processed_dir() -> PathBuf {
    PathBuf::from("data/processed")
}

fn default_api_base() -> String {
    "https://api.ctext.org/gettext".to_string()
}

fn default_urn() -> String {
    "ctp:zhuzi-yulei".to_string()
}

fn default_acquire_slug() -> String {
    "zhuzi-yulei".to_string()
}

fn default_total_chapters() -> u32 {
    140
}

fn default_delay_ms() -> u64 {
    2000
}

fn default_rate_limit_wait_secs() -> u64 {
    30
}

fn default_api_key_env() -> String {
    "CTEXT_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_verse_content_start() -> usize {
    1110
}

fn default_verse_content_end() -> usize {
    22885
}

fn default_lines_per_paragraph() -> usize {
    15
}

fn default_verse_min_gap() -> usize {
    2
}

fn default_max_paragraph_chars() -> usize {
    800
}

fn default_first_year() -> u32 {
    1294
}

fn default_last_year() -> u32 {
    1494
}

fn default_periods() -> Vec<PeriodConfig> {
    [(1294, 1377), (1378, 1417), (1418, 1447), (1448, 1464), (1465, 1484), (1485, 1494)]
        .into_iter()
        .map(|(start_year, end_year)| PeriodConfig { start_year, end_year })
        .collect()
}

fn default_prose_index_base() -> u32 {
    1
}

fn default_ctext_index_base() -> u32 {
    0
}

fn default_min_script_share() -> f64 {
    0.8
}

fn default_documents() -> Vec<DocumentConfig> {
    vec![
        DocumentConfig {
            slug: "carmina-graeca".to_string(),
            title: "Carmina Graeca Medii Aevi".to_string(),
            input: PathBuf::from("carmina-graeca/carmina-graeca.txt"),
            profile: ProfileConfig::Verse(VerseConfig::default()),
        },
        DocumentConfig {
            slug: "eustathius-odyssey".to_string(),
            title: "Eustathius, Commentary on the Odyssey".to_string(),
            input: PathBuf::from("eustathius/vol1.txt"),
            profile: ProfileConfig::Commentary(CommentaryConfig::volume(1)),
        },
        DocumentConfig {
            slug: "eustathius-odyssey".to_string(),
            title: "Eustathius, Commentary on the Odyssey".to_string(),
            input: PathBuf::from("eustathius/vol2.txt"),
            profile: ProfileConfig::Commentary(CommentaryConfig::volume(2)),
        },
        DocumentConfig {
            slug: "diarium-urbis-romae".to_string(),
            title: "Stefano Infessura, Diario della città di Roma".to_string(),
            input: PathBuf::from("diarium/infessura.txt"),
            profile: ProfileConfig::Diary(DiaryConfig::default()),
        },
        DocumentConfig {
            slug: "dongzhou-lieguo-zhi".to_string(),
            title: "東周列國志".to_string(),
            input: PathBuf::from("dongzhou-lieguo-zhi"),
            profile: ProfileConfig::Prose(ProseConfig {
                title_pattern: Some(r"^第[一-龥]+回[　\s]".to_string()),
                ..ProseConfig::default()
            }),
        },
        DocumentConfig {
            slug: "zhuzi-yulei".to_string(),
            title: "朱子語類".to_string(),
            input: PathBuf::from("zhuzi-yulei"),
            profile: ProfileConfig::Ctext(CtextConfig::default()),
        },
    ]
}

impl Config {

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for document in &self.documents {
            if document.slug.trim().is_empty() {
                return Err(anyhow!("Document slug must not be empty"));
            }
            if !seen.insert((document.slug.clone(), document.input.clone())) {
                return Err(anyhow!(
                    "Duplicate document: {} ({})",
                    document.slug,
                    document.input.display()
                ));
            }

            match &document.profile {
                ProfileConfig::Verse(verse) => {
                    if verse.lines_per_paragraph == 0 {
                        return Err(anyhow!("{}: lines_per_paragraph must be greater than 0", document.slug));
                    }
                    if verse.min_gap == 0 {
                        return Err(anyhow!("{}: min_gap must be greater than 0", document.slug));
                    }
                    if verse.titles.is_empty() && !verse.detect_titles {
                        return Err(anyhow!("{}: a title table is required unless detect_titles is set", document.slug));
                    }
                    if let Some(bad) = verse.titles.iter().find(|t| t.end_line < t.start_line) {
                        return Err(anyhow!("{}: title of chapter {} ends before it starts", document.slug, bad.chapter_number));
                    }
                }
                ProfileConfig::Commentary(commentary) => {
                    if !matches!(commentary.volume, 1 | 2) {
                        return Err(anyhow!("{}: volume must be 1 or 2, got {}", document.slug, commentary.volume));
                    }
                    if commentary.max_paragraph_chars < 100 {
                        return Err(anyhow!("{}: max_paragraph_chars must be at least 100", document.slug));
                    }
                }
                ProfileConfig::Diary(diary) => {
                    if diary.periods.is_empty() {
                        return Err(anyhow!("{}: at least one period is required", document.slug));
                    }
                    if let Some(bad) = diary.periods.iter().find(|p| p.start_year > p.end_year) {
                        return Err(anyhow!("{}: invalid period {}", document.slug, bad.label()));
                    }
                }
                ProfileConfig::Prose(prose) => {
                    if let Some(pattern) = &prose.title_pattern {
                        Regex::new(pattern)
                            .map_err(|e| anyhow!("{}: invalid title_pattern: {}", document.slug, e))?;
                    }
                    validate_share(&document.slug, prose.min_script_share)?;
                }
                ProfileConfig::Ctext(ctext) => {
                    validate_share(&document.slug, ctext.min_script_share)?;
                }
            }
        }

        if self.acquire.total_chapters == 0 {
            return Err(anyhow!("acquire.total_chapters must be greater than 0"));
        }

        Ok(())
    }

    /// Documents registered under a slug
    pub fn documents_for(&self, slug: &str) -> Vec<&DocumentConfig> {
        self.documents.iter().filter(|d| d.slug == slug).collect()
    }

    /// Output directory of a text
    pub fn processed_dir_for(&self, slug: &str) -> PathBuf {
        self.paths.processed_dir.join(slug)
    }
}

fn validate_share(slug: &str, share: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&share) {
        return Err(anyhow!("{}: min_script_share must be between 0 and 1, got {}", slug, share));
    }
    Ok(())
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            paths: PathsConfig::default(),
            store: StoreConfig::default(),
            acquire: AcquireConfig::default(),
            documents: default_documents(),
            log_level: LogLevel::default(),
        }
    }
}
