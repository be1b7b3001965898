/*!
 * Tests for the four-stage pipeline through the public profile API
 */

use textalign::app_config::{DiaryConfig, ProfileConfig, VerseConfig};
use textalign::errors::PipelineError;
use textalign::model::{ChapterContent, ProcessedChapter, RawLine};
use textalign::pipeline::{run_document, DocumentInput, GroupingRule, QualityStatus};
use textalign::profiles::diary::DiaryProfile;
use textalign::profiles::verse::classifier::classify_section;
use textalign::profiles::verse::extractor::{clean_verse_line, extract_verse};
use textalign::profiles::verse::quality::check_verse_quality;
use textalign::profiles::verse::titles::TitleEntry;
use textalign::profiles::Profile;

const VERSE: &str = "Ἄκουσε, τέκνον μου, καλὰ τὰ λόγια τοῦ πατρός σου";

fn edition(with_title: bool) -> String {
    let mut lines = vec!["PREFAZIONE", "", "Some preface text.", ""];
    if with_title {
        lines.push("STEPHANI  INFESSURAE");
    }
    lines.extend(["", "Manca lo principio.", "text..."]);
    lines.join("\n")
}

#[test]
fn test_diary_withMinimalEdition_shouldSplitPrefaceFromDiary() {
    let profile = DiaryProfile::new(DiaryConfig::default());
    let outcome = run_document(&profile, &DocumentInput::from_text(&edition(true))).unwrap();

    assert_eq!(outcome.profile, "diary");
    let preface = &outcome.chapters[0].chapter;
    assert_eq!(preface.chapter_number, 0);
    assert!(!preface.source_content.paragraphs.iter().any(|p| p.text.contains("Manca")));
    assert!(outcome.chapters[1].chapter.chapter_number > 0);
}

#[test]
fn test_diary_withoutTitleLine_shouldFailWithMissingAnchor() {
    let profile = DiaryProfile::new(DiaryConfig::default());
    let result = run_document(&profile, &DocumentInput::from_text(&edition(false)));
    assert_eq!(
        result.err(),
        Some(PipelineError::MissingAnchor {
            anchor: "STEPHANI INFESSURAE".to_string()
        })
    );
}

#[test]
fn test_clean_verse_line_withEditorialNumber_shouldStripNumber() {
    assert_eq!(clean_verse_line("140 πολλά καλά"), "πολλά καλά");
}

#[test]
fn test_extract_verse_withTwoBlocksAndThreeBlanks_shouldYieldTwoParagraphs() {
    let mut text = vec![VERSE; 5];
    text.extend(["", "", ""]);
    text.extend(vec![VERSE; 5]);
    let lines = RawLine::from_document(&text.join("\n"));

    let paragraphs = extract_verse(&classify_section(&lines), GroupingRule::VERSE);

    assert_eq!(paragraphs.len(), 2);
    assert_eq!(paragraphs.iter().map(|p| p.index).collect::<Vec<_>>(), vec![1, 2]);
    assert!(paragraphs.iter().all(|p| p.text.lines().count() == 5));
}

#[test]
fn test_classify_section_shouldLabelEveryLine() {
    let text = format!("{}\n\n12\nΑ Β 3 4 apparatus\n{}", VERSE, VERSE);
    let lines = RawLine::from_document(&text);
    assert_eq!(classify_section(&lines).len(), lines.len());
}

#[test]
fn test_check_verse_quality_withShortLines_shouldFailOnAverageLength() {
    let lines = ["πολλὰ καλὰ ἔργα", "καὶ λόγια πολλά", "τέκνον ἀκούσε", "πατρός τοῦ σου", "καλὰ τὰ πάντα"];
    let chapter = ProcessedChapter {
        chapter_number: 1,
        title: "Short".to_string(),
        source_content: ChapterContent::from_texts([lines.join("\n")], 1),
    };

    let report = check_verse_quality(&chapter, &[]);

    assert_eq!(report.status, QualityStatus::Fail);
    assert!(report.errors.iter().any(|e| e.starts_with("Average line length too short")));
}

#[test]
fn test_profile_run_shouldBeIdempotentAndKeepIndicesContiguous() {
    let mut lines = vec!["ΠΡΟΛΟΓΟΣ".to_string()];
    for n in 1..=40 {
        lines.push(format!("{} {}", n, VERSE));
        if n % 10 == 0 {
            lines.extend([String::new(), String::new(), String::new()]);
        }
    }
    let config = ProfileConfig::Verse(VerseConfig {
        titles: vec![TitleEntry {
            chapter_number: 1,
            start_line: 0,
            end_line: 0,
            title: "Πρόλογος".to_string(),
            english_title: "Prologue".to_string(),
        }],
        content_start_line: 0,
        ..VerseConfig::default()
    });
    let profile = Profile::from_config(&config).unwrap();
    let input = DocumentInput::from_text(&lines.join("\n"));

    let first = profile.run(&input).unwrap();
    let second = profile.run(&input).unwrap();
    let first_chapters: Vec<_> = first.chapters.iter().map(|c| c.chapter.clone()).collect();
    let second_chapters: Vec<_> = second.chapters.iter().map(|c| c.chapter.clone()).collect();
    assert_eq!(first_chapters, second_chapters);

    let content = &first_chapters[0].source_content;
    assert_eq!(content.len(), 4);
    for (position, paragraph) in content.paragraphs.iter().enumerate() {
        assert_eq!(paragraph.index, position as u32 + 1);
        assert_eq!(paragraph.text, paragraph.text.trim());
        assert!(!paragraph.text.is_empty());
    }
}
