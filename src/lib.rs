/*!
 * # textalign - text cleaning and paragraph alignment
 *
 * A Rust library that turns raw digitized texts into clean, paragraph-numbered
 * chapter documents ready for side-by-side translation.
 *
 * ## Features
 *
 * - Four-stage cleaning pipeline (sections, classification, extraction, quality)
 * - Profiles for verse anthologies, commentaries, diaries and prose chapters
 * - Quality reports with PASS/WARN/FAIL verdicts
 * - SQLite chapter store with schema validation at ingestion
 * - Alignment verification and single-paragraph translation repair
 * - Raw chapter acquisition from ctext.org
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `model`: Lines, sections, paragraphs and chapter documents
 * - `text`: Script detection, normalization and shared cleaning helpers
 * - `pipeline`: The profile-generic engine:
 *   - `pipeline::boundary`: Section ordering and overlap checks
 *   - `pipeline::grouping`: Paragraph grouping rules
 *   - `pipeline::quality`: Quality reports and summaries
 * - `profiles`: One `PipelineProfile` per kind of document
 * - `seeding`: Chapter file validation and store ingestion
 * - `store`: SQLite persistence for texts, chapters and translations
 * - `alignment`: Verification and repair of translations
 * - `acquire`: ctext.org chapter fetching
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod acquire;
pub mod alignment;
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod model;
pub mod pipeline;
pub mod profiles;
pub mod seeding;
pub mod store;
pub mod text;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunSummary};
pub use errors::{AcquireError, AppError, PipelineError, RepairError, SchemaError, StoreError};
pub use model::{ChapterContent, Paragraph, ProcessedChapter};
pub use pipeline::{run_document, DocumentInput, PipelineProfile, QualityReport, QualityStatus};
pub use profiles::Profile;
pub use store::ChapterStore;
