/*!
 * Error types for the textalign application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised by the four-stage cleaning pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// A unique structural marker the document requires was not found
    #[error("Missing required anchor: {anchor}")]
    MissingAnchor {
        /// Human-readable name of the anchor, e.g. "STEPHANI INFESSURAE title"
        anchor: String,
    },

    /// Two section boundaries share lines
    #[error("Overlapping sections: {first} ends at line {first_end}, {second} starts at line {second_start}")]
    OverlappingSections {
        /// Title of the earlier section
        first: String,
        /// Inclusive end line of the earlier section
        first_end: usize,
        /// Title of the later section
        second: String,
        /// Start line of the later section
        second_start: usize,
    },

    /// The input could not be interpreted for the selected profile
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Errors raised when a chapter document does not satisfy the storage schema
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// The file could not be read, e.g. it is not valid UTF-8
    #[error("Unreadable chapter file: {0}")]
    Unreadable(String),

    /// The document could not be parsed at all
    #[error("Malformed chapter document: {0}")]
    Malformed(String),

    /// The paragraphs array is empty
    #[error("Chapter {chapter}: paragraphs array is empty")]
    NoParagraphs {
        /// Chapter number of the rejected document
        chapter: u32,
    },

    /// Two paragraphs share an index
    #[error("Chapter {chapter}: duplicate paragraph index {index}")]
    DuplicateIndex {
        /// Chapter number of the rejected document
        chapter: u32,
        /// The repeated index
        index: u32,
    },

    /// A paragraph is empty or carries surrounding whitespace
    #[error("Chapter {chapter}: paragraph {index} is empty or not trimmed")]
    UntrimmedText {
        /// Chapter number of the rejected document
        chapter: u32,
        /// Index of the offending paragraph
        index: u32,
    },
}

/// Errors raised by the chapter store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The requested text does not exist
    #[error("Unknown text: {0}")]
    UnknownText(String),

    /// The requested chapter does not exist
    #[error("Unknown chapter {chapter} in text {text}")]
    UnknownChapter {
        /// Slug of the text
        text: String,
        /// Chapter number that was looked up
        chapter: u32,
    },

    /// Stored JSON content failed validation on the way out
    #[error("Stored content is invalid: {0}")]
    InvalidContent(#[from] SchemaError),

    /// A repair was rejected; nothing was written
    #[error("Repair rejected: {0}")]
    Repair(#[from] RepairError),

    /// The connection mutex was poisoned
    #[error("Failed to acquire store lock: {0}")]
    Lock(String),

    /// Error from SQLite
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Errors raised when overriding a translation paragraph
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepairError {
    /// The chapter has no translation to repair
    #[error("Chapter has no translation content")]
    NoTranslation,

    /// No paragraph carries the requested index
    #[error("No translation paragraph with index {0}")]
    ParagraphNotFound(u32),

    /// The replacement text has no non-empty paragraph
    #[error("Replacement text is empty")]
    EmptyReplacement,

    /// Applying the repair would break source/translation alignment
    #[error("Repair aborted: translation would have {translation} paragraphs, source has {source_count}")]
    CountMismatch {
        /// Number of source paragraphs
        source_count: usize,
        /// Number of translation paragraphs after the repair
        translation: usize,
    },
}

/// Errors raised while fetching raw chapters
#[derive(Error, Debug)]
pub enum AcquireError {
    /// The remote service refused the request because of its rate limit
    #[error("Rate limit exceeded")]
    RateLimited,

    /// The remote service answered with an error code
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code returned by the service
        code: String,
        /// Error description returned by the service
        message: String,
    },

    /// The response carried no text
    #[error("Empty fulltext")]
    EmptyText,

    /// Transport or decoding failure
    #[error("Request failed: {0}")]
    Request(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the pipeline
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Error from schema validation
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Error from the store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Error from a repair
    #[error("Repair error: {0}")]
    Repair(#[from] RepairError),

    /// Error from acquisition
    #[error("Acquisition error: {0}")]
    Acquire(#[from] AcquireError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
