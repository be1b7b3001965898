/*!
 * Anchor search for the diary edition.
 *
 * The edition is laid out as: editor's preface (`PREFAZIONE`), the diary
 * title (`STEPHANI INFESSURAE`), the diary proper (opening with
 * "Manca lo principio"), an alternative beginning ("Altro principio del
 * Diario") and the index (`INDICE`). The first three anchors are required.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::PipelineError;
use crate::model::RawLine;

static DIARY_TITLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^STEPHANI\s+INFESSURAE\s*$").expect("Invalid diary title regex")
});

static DIARY_OPENING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Manca\s+lo\s+principio").expect("Invalid diary opening regex")
});

static ALTERNATIVE_BEGINNING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Altro\s+principio\s+del\s+Diario").expect("Invalid alternative beginning regex")
});

pub const PREFACE_ANCHOR: &str = "PREFAZIONE";
pub const TITLE_ANCHOR: &str = "STEPHANI INFESSURAE";
pub const OPENING_ANCHOR: &str = "Manca lo principio";
const INDEX_ANCHOR: &str = "INDICE";

/// The opening line must follow the title within this many lines
const OPENING_WINDOW: usize = 20;

/// Line positions of the structural anchors; ends are exclusive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiaryAnchors {
    pub preface_start: usize,
    pub preface_end: usize,
    pub diary_start: usize,
    pub diary_end: usize,
    pub alternative_start: Option<usize>,
    pub alternative_end: usize,
    pub warnings: Vec<String>,
}

impl DiaryAnchors {
    /// Line ranges of (preface, diary, alternative beginning), inclusive ends
    pub fn ranges(&self) -> (std::ops::RangeInclusive<usize>, std::ops::RangeInclusive<usize>, Option<std::ops::RangeInclusive<usize>>) {
        let preface = self.preface_start..=self.preface_end.saturating_sub(1).max(self.preface_start);
        let diary = self.diary_start..=self.diary_end.saturating_sub(1).max(self.diary_start);
        let alternative = self
            .alternative_start
            .map(|start| start..=self.alternative_end.saturating_sub(1).max(start));
        (preface, diary, alternative)
    }
}

fn missing(anchor: &str) -> PipelineError {
    PipelineError::MissingAnchor {
        anchor: anchor.to_string(),
    }
}

/// Locate every anchor in order; each search starts after the previous anchor
pub fn find_anchors(lines: &[RawLine]) -> Result<DiaryAnchors, PipelineError> {
    let preface_start = lines
        .iter()
        .position(|l| l.text.trim() == PREFACE_ANCHOR)
        .ok_or_else(|| missing(PREFACE_ANCHOR))?;

    let title = lines[preface_start + 1..]
        .iter()
        .position(|l| DIARY_TITLE_REGEX.is_match(l.text.trim()))
        .map(|offset| preface_start + 1 + offset)
        .ok_or_else(|| missing(TITLE_ANCHOR))?;

    let window_end = (title + OPENING_WINDOW).min(lines.len());
    let diary_start = lines[title..window_end]
        .iter()
        .position(|l| DIARY_OPENING_REGEX.is_match(&l.text))
        .map(|offset| title + offset)
        .ok_or_else(|| missing(OPENING_ANCHOR))?;

    let mut warnings = Vec::new();
    let alternative_start = lines[diary_start + 1..]
        .iter()
        .position(|l| ALTERNATIVE_BEGINNING_REGEX.is_match(l.text.trim()))
        .map(|offset| diary_start + 1 + offset);

    let (diary_end, alternative_end) = match alternative_start {
        Some(start) => {
            let index = lines[start + 1..]
                .iter()
                .position(|l| l.text.trim() == INDEX_ANCHOR)
                .map(|offset| start + 1 + offset);
            if index.is_none() {
                warnings.push("No INDICE found; alternative beginning runs to the end of the document".to_string());
            }
            (start, index.unwrap_or(lines.len()))
        }
        None => {
            warnings.push("No 'Altro principio del Diario' found; diary runs to the end of the document".to_string());
            (lines.len(), lines.len())
        }
    };

    Ok(DiaryAnchors {
        preface_start,
        preface_end: title,
        diary_start,
        diary_end,
        alternative_start,
        alternative_end,
        warnings,
    })
}
