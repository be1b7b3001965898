/*!
 * Pipeline profiles, one per kind of document.
 *
 * Each profile implements `PipelineProfile` with its own category set, so
 * the engine is generic over them; `Profile` selects one from configuration
 * and dispatches to it.
 */

pub mod commentary;
pub mod diary;
pub mod prose;
pub mod verse;

use crate::app_config::ProfileConfig;
use crate::errors::PipelineError;
use crate::pipeline::{run_document, DocumentInput, DocumentOutcome};

use commentary::CommentaryProfile;
use diary::DiaryProfile;
use prose::ProseProfile;
use verse::VerseProfile;

/// A configured profile ready to run
pub enum Profile {
    Verse(VerseProfile),
    Commentary(CommentaryProfile),
    Diary(DiaryProfile),
    Prose(ProseProfile),
}

impl Profile {
    pub fn from_config(config: &ProfileConfig) -> Result<Self, PipelineError> {
        Ok(match config {
            ProfileConfig::Verse(verse) => Self::Verse(VerseProfile::new(verse.clone())),
            ProfileConfig::Commentary(commentary) => Self::Commentary(CommentaryProfile::new(commentary.clone())),
            ProfileConfig::Diary(diary) => Self::Diary(DiaryProfile::new(diary.clone())),
            ProfileConfig::Prose(prose) => Self::Prose(ProseProfile::new(prose.clone())?),
            ProfileConfig::Ctext(ctext) => Self::Prose(ProseProfile::ctext(ctext)),
        })
    }

    /// Run every stage over one document
    pub fn run(&self, input: &DocumentInput) -> Result<DocumentOutcome, PipelineError> {
        match self {
            Self::Verse(profile) => run_document(profile, input),
            Self::Commentary(profile) => run_document(profile, input),
            Self::Diary(profile) => run_document(profile, input),
            Self::Prose(profile) => run_document(profile, input),
        }
    }
}
