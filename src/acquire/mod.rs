/*!
 * Raw chapter acquisition from the ctext.org API.
 *
 * Chapters are fetched one at a time with a fixed delay between requests.
 * Chapters already on disk are skipped, so an interrupted run resumes where
 * it stopped. A rate-limited request is retried exactly once after a fixed
 * wait; if it is still refused the batch stops with a resume hint.
 */

use anyhow::Result;
use async_trait::async_trait;
use log::{error, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

use crate::app_config::AcquireConfig;
use crate::errors::AcquireError;
use crate::file_utils::FileManager;
use crate::model::chapter_file_name;

/// Error code the API returns when the request budget is exhausted
const RATE_LIMIT_CODE: &str = "ERR_REQUEST_LIMIT";

/// A raw chapter as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawChapter {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fulltext: Vec<String>,
}

/// gettext response: either a chapter or an error code
#[derive(Debug, Deserialize)]
struct CtextResponse {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    fulltext: Option<Vec<String>>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error: Option<CtextErrorBody>,
}

#[derive(Debug, Deserialize)]
struct CtextErrorBody {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

impl CtextResponse {
    fn into_chapter(self) -> Result<RawChapter, AcquireError> {
        let failure = match (self.error, self.code) {
            (Some(body), _) => Some((body.code, body.description)),
            (None, Some(code)) => Some((code, self.description)),
            (None, None) => None,
        };
        if let Some((code, description)) = failure {
            if code == RATE_LIMIT_CODE {
                return Err(AcquireError::RateLimited);
            }
            return Err(AcquireError::Api {
                code,
                message: description.unwrap_or_default(),
            });
        }

        let fulltext = self.fulltext.unwrap_or_default();
        if fulltext.is_empty() {
            return Err(AcquireError::EmptyText);
        }
        Ok(RawChapter {
            title: self.title.unwrap_or_default(),
            fulltext,
        })
    }
}

/// Where raw chapters come from
#[async_trait]
pub trait ChapterSource: Send + Sync {
    async fn fetch(&self, chapter: u32) -> Result<RawChapter, AcquireError>;
}

/// ctext.org gettext client
pub struct CtextSource {
    client: Client,
    api_base: Url,
    urn: String,
    api_key: Option<String>,
}

impl CtextSource {
    pub fn new(config: &AcquireConfig) -> Result<Self> {
        let api_base = Url::parse(&config.api_base)
            .map_err(|e| anyhow::anyhow!("Invalid api_base {}: {}", config.api_base, e))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let api_key = config.api_key();
        if api_key.is_none() {
            info!("No {} set, using unauthenticated access (may hit rate limits sooner)", config.api_key_env);
        }
        Ok(Self {
            client,
            api_base,
            urn: config.urn.clone(),
            api_key,
        })
    }

    /// Request URL for one chapter
    pub fn chapter_url(&self, chapter: u32) -> Url {
        let mut url = self.api_base.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("urn", &format!("{}/{}", self.urn, chapter));
            if let Some(key) = &self.api_key {
                query.append_pair("apikey", key);
            }
        }
        url
    }
}

#[async_trait]
impl ChapterSource for CtextSource {
    async fn fetch(&self, chapter: u32) -> Result<RawChapter, AcquireError> {
        let response = self
            .client
            .get(self.chapter_url(chapter))
            .send()
            .await
            .map_err(|e| AcquireError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AcquireError::Request(format!("HTTP {} for chapter {}", status, chapter)));
        }

        let body: CtextResponse = response
            .json()
            .await
            .map_err(|e| AcquireError::Request(e.to_string()))?;
        body.into_chapter()
    }
}

/// Scripted source for tests; unscripted chapters return a one-paragraph chapter
#[derive(Default)]
pub struct MockSource {
    scripted: Mutex<HashMap<u32, VecDeque<Result<RawChapter, AcquireError>>>>,
    calls: AtomicUsize,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `chapter`; queued responses are used in order
    pub fn script(self, chapter: u32, response: Result<RawChapter, AcquireError>) -> Self {
        if let Ok(mut scripted) = self.scripted.lock() {
            scripted.entry(chapter).or_default().push_back(response);
        }
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChapterSource for MockSource {
    async fn fetch(&self, chapter: u32) -> Result<RawChapter, AcquireError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let queued = self
            .scripted
            .lock()
            .map_err(|e| AcquireError::Request(e.to_string()))?
            .get_mut(&chapter)
            .and_then(|queue| queue.pop_front());

        queued.unwrap_or_else(|| {
            Ok(RawChapter {
                title: format!("卷{}", chapter),
                fulltext: vec![format!("第{}章", chapter)],
            })
        })
    }
}

/// Range and pacing of one acquisition run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquireOptions {
    pub start: u32,
    pub end: u32,
    pub delay: Duration,
    pub rate_limit_wait: Duration,
}

impl AcquireOptions {
    pub fn from_config(config: &AcquireConfig) -> Self {
        Self {
            start: 1,
            end: config.total_chapters,
            delay: Duration::from_millis(config.delay_ms),
            rate_limit_wait: Duration::from_secs(config.rate_limit_wait_secs),
        }
    }
}

/// Tally of one acquisition run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcquireSummary {
    pub fetched: usize,
    pub skipped: usize,
    pub errors: usize,
    /// Chapter the run stopped at because the rate limit persisted
    pub stopped_at: Option<u32>,
}

impl std::fmt::Display for AcquireSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Done: {} fetched, {} skipped, {} errors", self.fetched, self.skipped, self.errors)
    }
}

/// Whether a usable raw chapter is already on disk
fn already_fetched(path: &Path) -> bool {
    FileManager::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str::<RawChapter>(&content).ok())
        .is_some_and(|raw| !raw.fulltext.is_empty())
}

/// Fetch chapters `start..=end` into `out_dir` as `chapter-NNN.json`
pub async fn run_acquisition(source: &dyn ChapterSource, out_dir: &Path, options: &AcquireOptions) -> Result<AcquireSummary> {
    FileManager::ensure_dir(out_dir)?;
    info!(
        "Fetching chapters {}-{} into {:?} (delay {}ms)",
        options.start,
        options.end,
        out_dir,
        options.delay.as_millis()
    );

    let mut summary = AcquireSummary::default();
    for chapter in options.start..=options.end {
        let path = out_dir.join(chapter_file_name(chapter));
        if already_fetched(&path) {
            info!("[{}/{}] Skipped (already exists)", chapter, options.end);
            summary.skipped += 1;
            continue;
        }

        let result = match source.fetch(chapter).await {
            Err(AcquireError::RateLimited) => {
                warn!("Rate limited at chapter {}. Waiting {}s...", chapter, options.rate_limit_wait.as_secs());
                tokio::time::sleep(options.rate_limit_wait).await;
                match source.fetch(chapter).await {
                    Err(AcquireError::RateLimited | AcquireError::Api { .. }) => {
                        error!("Still rate limited. Stopping at chapter {}.", chapter);
                        info!("Resume with: textalign acquire --start {}", chapter);
                        summary.stopped_at = Some(chapter);
                        break;
                    }
                    other => other,
                }
            }
            other => other,
        };

        match result {
            Ok(raw) => match FileManager::write_json(&path, &raw) {
                Ok(()) => {
                    info!("[{}/{}] {}: {} paragraphs", chapter, options.end, raw.title, raw.fulltext.len());
                    summary.fetched += 1;
                }
                Err(e) => {
                    error!("Chapter {}: {:#}", chapter, e);
                    summary.errors += 1;
                }
            },
            Err(e) => {
                error!("Chapter {}: {}", chapter, e);
                summary.errors += 1;
            }
        }

        if chapter < options.end {
            tokio::time::sleep(options.delay).await;
        }
    }

    info!("{}", summary);
    Ok(summary)
}
