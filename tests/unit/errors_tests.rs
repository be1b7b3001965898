/*!
 * Tests for error types and conversions
 */

use textalign::errors::{AcquireError, AppError, PipelineError, RepairError, SchemaError, StoreError};

#[test]
fn test_pipelineError_missingAnchor_shouldNameTheAnchor() {
    let error = PipelineError::MissingAnchor {
        anchor: "STEPHANI INFESSURAE".to_string(),
    };
    assert_eq!(error.to_string(), "Missing required anchor: STEPHANI INFESSURAE");
}

#[test]
fn test_pipelineError_overlappingSections_shouldDisplayBothSections() {
    let error = PipelineError::OverlappingSections {
        first: "Book 1".to_string(),
        first_end: 120,
        second: "Book 2".to_string(),
        second_start: 100,
    };
    let display = error.to_string();
    assert!(display.contains("Book 1 ends at line 120"));
    assert!(display.contains("Book 2 starts at line 100"));
}

#[test]
fn test_schemaError_duplicateIndex_shouldDisplayChapterAndIndex() {
    let error = SchemaError::DuplicateIndex { chapter: 3, index: 7 };
    assert_eq!(error.to_string(), "Chapter 3: duplicate paragraph index 7");
}

#[test]
fn test_storeError_fromSchemaError_shouldWrapCorrectly() {
    let error: StoreError = SchemaError::NoParagraphs { chapter: 2 }.into();
    assert!(matches!(error, StoreError::InvalidContent(SchemaError::NoParagraphs { chapter: 2 })));
    assert!(error.to_string().contains("paragraphs array is empty"));
}

#[test]
fn test_repairError_countMismatch_shouldDisplayBothCounts() {
    let error = RepairError::CountMismatch {
        source_count: 12,
        translation: 13,
    };
    let display = error.to_string();
    assert!(display.contains("13"));
    assert!(display.contains("12"));
}

#[test]
fn test_acquireError_api_shouldDisplayCodeAndMessage() {
    let error = AcquireError::Api {
        code: "ERR_INVALID_URN".to_string(),
        message: "Unknown text".to_string(),
    };
    assert_eq!(error.to_string(), "API error: ERR_INVALID_URN - Unknown text");
}

#[test]
fn test_appError_fromLibraryErrors_shouldWrapCorrectly() {
    let pipeline: AppError = PipelineError::InvalidInput("bad".to_string()).into();
    assert!(matches!(pipeline, AppError::Pipeline(_)));

    let repair: AppError = RepairError::EmptyReplacement.into();
    assert!(repair.to_string().starts_with("Repair error:"));

    let acquire: AppError = AcquireError::RateLimited.into();
    assert_eq!(acquire.to_string(), "Acquisition error: Rate limit exceeded");
}

#[test]
fn test_appError_fromIoAndAnyhow_shouldConvert() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.txt");
    let error: AppError = io.into();
    assert!(matches!(error, AppError::File(message) if message.contains("missing.txt")));

    let error: AppError = anyhow::anyhow!("something odd").into();
    assert_eq!(error.to_string(), "Unknown error: something odd");
}
