// @module: Single-paragraph translation override with a count precondition

use log::info;

use crate::errors::{RepairError, StoreError};
use crate::model::ChapterContent;
use crate::pipeline::grouping::{number_paragraphs, split_blank_line_paragraphs};
use crate::store::ChapterStore;

/// Replace the paragraph with `index` by the blank-line separated paragraphs
/// of `replacement`, renumbering from the translation's base index.
///
/// The result is only returned when its count equals `source_count`.
pub fn apply_repair(
    source_count: usize,
    translation: &ChapterContent,
    index: u32,
    replacement: &str,
) -> Result<ChapterContent, RepairError> {
    let base = translation.base_index().ok_or(RepairError::NoTranslation)?;
    let position = translation
        .paragraphs
        .iter()
        .position(|p| p.index == index)
        .ok_or(RepairError::ParagraphNotFound(index))?;

    let new_paragraphs = split_blank_line_paragraphs(replacement);
    if new_paragraphs.is_empty() {
        return Err(RepairError::EmptyReplacement);
    }

    let texts: Vec<String> = translation.paragraphs[..position]
        .iter()
        .map(|p| p.text.clone())
        .chain(new_paragraphs)
        .chain(translation.paragraphs[position + 1..].iter().map(|p| p.text.clone()))
        .collect();

    let paragraphs = number_paragraphs(texts, base);
    if paragraphs.len() != source_count {
        return Err(RepairError::CountMismatch {
            source_count,
            translation: paragraphs.len(),
        });
    }
    Ok(ChapterContent { paragraphs })
}

/// Apply a repair to a stored chapter in one transaction
pub fn repair_translation(
    store: &ChapterStore,
    slug: &str,
    chapter: u32,
    index: u32,
    replacement: &str,
) -> Result<ChapterContent, StoreError> {
    let repaired = store.update_translation(slug, chapter, |record| {
        let translation = record.translation.as_ref().ok_or(RepairError::NoTranslation)?;
        apply_repair(record.source.len(), translation, index, replacement)
    })?;
    info!(
        "[{}] chapter {}: paragraph {} replaced, {} paragraphs aligned",
        slug,
        chapter,
        index,
        repaired.len()
    );
    Ok(repaired)
}
