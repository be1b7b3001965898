/*!
 * Integration tests for raw chapter acquisition
 */

use anyhow::Result;
use std::time::Duration;

use textalign::acquire::{run_acquisition, AcquireOptions, MockSource, RawChapter};
use textalign::app_controller::Controller;
use textalign::errors::AcquireError;
use textalign::file_utils::FileManager;

use crate::common;

fn options(start: u32, end: u32) -> AcquireOptions {
    AcquireOptions {
        start,
        end,
        delay: Duration::ZERO,
        rate_limit_wait: Duration::ZERO,
    }
}

/// Test that acquired chapters feed the ctext profile
#[tokio::test]
async fn test_acquire_thenProcess_shouldProduceChapters() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::test_config(temp_dir.path());
    let raw_dir = config.paths.raw_dir.join("classic");

    let source = MockSource::new().script(
        2,
        Ok(RawChapter {
            title: "卷二".to_string(),
            fulltext: vec!["理氣下".to_string(), "天地之間".to_string()],
        }),
    );
    let summary = run_acquisition(&source, &raw_dir, &options(1, 3)).await?;
    assert_eq!(summary.fetched, 3);
    assert_eq!(summary.to_string(), "Done: 3 fetched, 0 skipped, 0 errors");

    let controller = Controller::with_config(config.clone())?;
    let processed = controller.process(Some("classic"), false)?;
    assert_eq!(processed.processed, 3);

    let second = FileManager::read_to_string(config.processed_dir_for("classic").join("chapter-002.json"))?;
    assert!(second.contains("\"title\": \"卷二\""));
    assert!(second.contains("天地之間"));
    Ok(())
}

/// Test resuming after a persistent rate limit
#[tokio::test]
async fn test_acquire_afterRateLimitStop_shouldResumeFromStoppedChapter() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let raw_dir = temp_dir.path().join("raw");

    let limited = MockSource::new()
        .script(3, Err(AcquireError::RateLimited))
        .script(3, Err(AcquireError::RateLimited));
    let first = run_acquisition(&limited, &raw_dir, &options(1, 5)).await?;
    assert_eq!(first.fetched, 2);
    assert_eq!(first.stopped_at, Some(3));

    let resumed_source = MockSource::new();
    let resumed = run_acquisition(&resumed_source, &raw_dir, &options(1, 5)).await?;
    assert_eq!(resumed.skipped, 2);
    assert_eq!(resumed.fetched, 3);
    assert_eq!(resumed_source.calls(), 3);
    assert_eq!(FileManager::find_chapter_files(&raw_dir)?.len(), 5);
    Ok(())
}

#[test]
fn test_controller_acquire_withInvertedRange_shouldFailBeforeFetching() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(common::test_config(temp_dir.path()))?;

    let result = tokio_test::block_on(controller.acquire(Some(5), Some(2), Some(0)));

    let message = format!("{:#}", result.err().ok_or_else(|| anyhow::anyhow!("expected an error"))?);
    assert_eq!(message, "Invalid chapter range: 5-2");
    assert!(!temp_dir.path().join("raw").exists());
    Ok(())
}
