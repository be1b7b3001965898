/*!
 * Tests for application configuration functionality
 */

use std::path::{Path, PathBuf};
use std::str::FromStr;

use textalign::app_config::{Config, DiaryConfig, DocumentConfig, LogLevel, PeriodConfig, ProfileConfig, ProseConfig};

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.paths.raw_dir, PathBuf::from("data/raw"));
    assert_eq!(config.paths.processed_dir, PathBuf::from("data/processed"));
    assert_eq!(config.store.path, None);
    assert_eq!(config.acquire.total_chapters, 140);
    assert_eq!(config.acquire.delay_ms, 2000);
    assert_eq!(config.acquire.rate_limit_wait_secs, 30);
    assert_eq!(config.log_level, LogLevel::Info);

    let kinds: Vec<&str> = config.documents.iter().map(|d| d.profile.kind()).collect();
    assert_eq!(kinds, vec!["verse", "commentary", "commentary", "diary", "prose", "ctext"]);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_serialization_shouldRoundTripThroughJson() {
    let config = Config::default();
    let json = serde_json::to_string_pretty(&config).unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.documents, config.documents);
    assert_eq!(parsed.acquire, config.acquire);
}

#[test]
fn test_config_deserialization_withMinimalJson_shouldFillDefaults() {
    let json = r#"{
        "log_level": "debug",
        "documents": [
            { "slug": "novel", "input": "novel", "profile": { "kind": "prose", "index_base": 1 } }
        ]
    }"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.documents.len(), 1);
    assert_eq!(config.documents[0].display_title(), "novel");
    assert!(matches!(&config.documents[0].profile, ProfileConfig::Prose(p) if p.min_script_share == 0.8));
    assert_eq!(config.acquire.urn, "ctp:zhuzi-yulei");
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    let duplicate = config.documents[0].clone();
    config.documents.push(duplicate);
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.documents[0].slug = "  ".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.documents.push(DocumentConfig {
        slug: "broken".to_string(),
        title: String::new(),
        input: PathBuf::from("broken"),
        profile: ProfileConfig::Prose(ProseConfig {
            title_pattern: Some("(".to_string()),
            ..ProseConfig::default()
        }),
    });
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.documents.push(DocumentConfig {
        slug: "diary".to_string(),
        title: String::new(),
        input: PathBuf::from("diary.txt"),
        profile: ProfileConfig::Diary(DiaryConfig {
            periods: vec![PeriodConfig {
                start_year: 1400,
                end_year: 1300,
            }],
            ..DiaryConfig::default()
        }),
    });
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.acquire.total_chapters = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_document_paths_shouldResolveAgainstRawDir() {
    let config = Config::default();
    let diary = &config.documents_for("diarium-urbis-romae")[0];
    assert_eq!(
        diary.input_path(Path::new("/data/raw")),
        PathBuf::from("/data/raw/diarium/infessura.txt")
    );
    assert_eq!(config.documents_for("eustathius-odyssey").len(), 2);
    assert_eq!(
        config.processed_dir_for("zhuzi-yulei"),
        PathBuf::from("data/processed/zhuzi-yulei")
    );
}

#[test]
fn test_log_level_fromStr_shouldParseCaseInsensitively() {
    assert_eq!(LogLevel::from_str("WARN").unwrap(), LogLevel::Warn);
    assert_eq!(LogLevel::from_str("trace").unwrap().to_level_filter(), log::LevelFilter::Trace);
    assert!(LogLevel::from_str("verbose").is_err());
}
