/*!
 * Line classifier for critical editions of medieval Greek verse.
 *
 * Medieval Greek verse never contains Arabic numerals. The only numerals in
 * such an edition are editorial line numbers (leading position) and
 * apparatus references, so any embedded digit marks apparatus. Latin
 * editorial notes were frequently OCR'd into Greek letters, which is why the
 * Latin share alone cannot find them; sigla, codex abbreviations, brackets
 * and known garbled abbreviations do.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{ClassifiedLine, LineCategory, RawLine};
use crate::text::script::{greek_letter_share, latin_share_of_visible};

/// Category of a line in a verse section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerseCategory {
    /// Clean verse line
    Verse,
    /// Verse preceded by an editorial line number
    VerseNumbered,
    /// Critical apparatus: variant readings with manuscript sigla
    Apparatus,
    /// Scholarly prose, mixed Greek and Latin
    Introduction,
    Empty,
    Noise,
}

impl VerseCategory {
    pub fn is_verse(&self) -> bool {
        matches!(self, Self::Verse | Self::VerseNumbered)
    }
}

impl LineCategory for VerseCategory {
    fn all() -> &'static [Self] {
        &[
            Self::Verse,
            Self::VerseNumbered,
            Self::Apparatus,
            Self::Introduction,
            Self::Empty,
            Self::Noise,
        ]
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Verse => "verse",
            Self::VerseNumbered => "verse_numbered",
            Self::Apparatus => "apparatus",
            Self::Introduction => "introduction",
            Self::Empty => "empty",
            Self::Noise => "noise",
        }
    }

    fn is_content(&self) -> bool {
        self.is_verse()
    }

    fn is_empty(&self) -> bool {
        *self == Self::Empty
    }
}

/// Manuscript sigla counted on a line, primary then secondary
const SIGLA: [char; 9] = ['Α', 'Β', 'Μ', 'Ρ', 'Δ', 'Κ', 'Υ', 'Ν', 'Τ'];

static SIGLA_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    SIGLA
        .iter()
        .map(|sigla| {
            Regex::new(&format!(r"(?:^|[\s.,;:᾿'()]){}(?:[\s.,;:᾿'()]|$)", sigla))
                .expect("Invalid sigla regex")
        })
        .collect()
});

/// Primary sigla only, used to audit extracted verse
pub static PRIMARY_SIGLA_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[\s.,;:᾿'()])([ΑΒΜΡΔ])(?:[\s.,;:᾿'()]|$)").expect("Invalid sigla regex")
});

// "Ὅυς. Ρ. 486"
static ABBREVIATED_REF_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[α-ωά-ώἀ-ῶΑ-Ω]{2,}\.\s*[ΡΑΒ]\.?\s*\d+").expect("Invalid abbreviated reference regex")
});

static MULTIPLE_NUMBERS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+\D+\d+\D+\d+").expect("Invalid multiple numbers regex")
});

static TWO_NUMBERS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+\D+\d+").expect("Invalid two numbers regex")
});

static LEADING_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,5})\s+(.+)$").expect("Invalid leading number regex")
});

static STRIP_LEADING_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,5}\s+").expect("Invalid leading number regex")
});

static BARE_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\d{1,5}\s*$").expect("Invalid bare number regex")
});

static MARGIN_DOT_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\.\s+\d+").expect("Invalid margin number regex")
});

static EDITORIAL_BRACKETS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\[\]{}]").expect("Invalid bracket regex")
});

// "οοα" is "cod." rendered in Greek letters
static CODEX_ABBREV_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"οο[αά][.,\s:;]").expect("Invalid codex regex")
});

static LATIN_IN_GREEK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"ργο[θσ][οε][άα]οβ|Βατγβίαπ|ΒΙοο\]|ΒΌΡ\s|ΡΟΥ\s\d|ἰογίαββ|οομίϊ|Βαγβί|ΡῬ[͵,]\s*\d|αυοᾶ|ΒΙ66\]")
        .expect("Invalid Latin-in-Greek regex")
});

// "ν. 123"
static VERSE_REF_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[\s(])ν\.\s*\d").expect("Invalid verse reference regex")
});

static GARBLED_CHAR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[{}\[\]|!@#$%^&*~`<>]").expect("Invalid garbled character regex")
});

fn has_digit(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

/// Isolated sigla occurrences, all nine letters
pub fn count_sigla(text: &str) -> usize {
    let padded = format!(" {} ", text);
    SIGLA_REGEXES
        .iter()
        .map(|re| re.find_iter(&padded).count())
        .sum()
}

/// Digits left once a leading editorial number is removed
fn has_embedded_numbers(text: &str) -> bool {
    has_digit(&STRIP_LEADING_NUMBER_REGEX.replace(text, ""))
}

/// Whether the text after a leading number reads like apparatus
fn is_apparatus_content(text: &str) -> bool {
    count_sigla(text) >= 1
        || ABBREVIATED_REF_REGEX.is_match(text)
        || TWO_NUMBERS_REGEX.is_match(text)
        || has_digit(text)
        || EDITORIAL_BRACKETS_REGEX.is_match(text)
        || CODEX_ABBREV_REGEX.is_match(text)
        || LATIN_IN_GREEK_REGEX.is_match(text)
        || VERSE_REF_REGEX.is_match(text)
        || GARBLED_CHAR_REGEX.find_iter(text).count() > 1
}

/// Classify one line in isolation
pub fn classify_line(text: &str) -> VerseCategory {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return VerseCategory::Empty;
    }

    let len = trimmed.chars().count();
    if len < 5 || BARE_NUMBER_REGEX.is_match(trimmed) {
        return VerseCategory::Noise;
    }
    if MARGIN_DOT_NUMBER_REGEX.is_match(trimmed) {
        return VerseCategory::Apparatus;
    }

    let sigla = count_sigla(trimmed);
    let apparatus = sigla >= 2
        || (sigla >= 1 && MULTIPLE_NUMBERS_REGEX.is_match(trimmed))
        || ABBREVIATED_REF_REGEX.is_match(trimmed)
        || (sigla >= 1 && has_digit(trimmed))
        || MULTIPLE_NUMBERS_REGEX.is_match(trimmed)
        || EDITORIAL_BRACKETS_REGEX.is_match(trimmed)
        || CODEX_ABBREV_REGEX.is_match(trimmed)
        || LATIN_IN_GREEK_REGEX.is_match(trimmed)
        || VERSE_REF_REGEX.is_match(trimmed)
        || has_embedded_numbers(trimmed);
    if apparatus {
        return VerseCategory::Apparatus;
    }

    if latin_share_of_visible(trimmed) > 0.2 && len > 15 {
        return VerseCategory::Introduction;
    }

    if let Some(caps) = LEADING_NUMBER_REGEX.captures(trimmed) {
        let after = caps.get(2).map_or("", |m| m.as_str());
        return classify_numbered(trimmed, after, sigla);
    }

    let greek = greek_letter_share(trimmed);

    if (40..=120).contains(&len) && greek > 0.79 {
        // One sigla in a long line is usually a proper name such as Μανολῆς
        if sigla == 0 || (sigla == 1 && len > 60) {
            return VerseCategory::Verse;
        }
        return VerseCategory::Apparatus;
    }
    if (25..40).contains(&len) && greek > 0.79 && sigla == 0 {
        return VerseCategory::Verse;
    }
    if len > 120 && greek > 0.79 && sigla == 0 {
        return VerseCategory::Verse;
    }

    if len > 20 && greek < 0.6 && greek > 0.2 {
        return VerseCategory::Introduction;
    }
    if len < 15 {
        return VerseCategory::Noise;
    }
    if greek > 0.6 && len >= 20 && sigla == 0 {
        return VerseCategory::Verse;
    }
    VerseCategory::Noise
}

fn classify_numbered(trimmed: &str, after: &str, sigla: usize) -> VerseCategory {
    if is_apparatus_content(after) {
        return VerseCategory::Apparatus;
    }

    let after_len = after.chars().count();
    let greek = greek_letter_share(after);
    if greek > 0.75 && after_len >= 20 {
        return VerseCategory::VerseNumbered;
    }
    if greek > 0.6 && after_len >= 30 && sigla == 0 {
        return VerseCategory::VerseNumbered;
    }
    if after_len < 20 && sigla == 0 && greek > 0.5 {
        return VerseCategory::VerseNumbered;
    }
    if MULTIPLE_NUMBERS_REGEX.is_match(trimmed) || sigla >= 1 {
        return VerseCategory::Apparatus;
    }
    if after_len < 15 {
        return VerseCategory::Noise;
    }
    VerseCategory::VerseNumbered
}

fn count_nearby(lines: &[ClassifiedLine<VerseCategory>], index: usize, range: usize, wanted: &[VerseCategory]) -> usize {
    let start = index.saturating_sub(range);
    let end = (index + range).min(lines.len().saturating_sub(1));
    (start..=end)
        .filter(|&i| i != index && wanted.contains(&lines[i].category))
        .count()
}

/// Nearest non-empty neighbour within `range` must be verse; any other category stops the search
fn verse_neighbour<I>(lines: &[ClassifiedLine<VerseCategory>], indices: I) -> bool
where
    I: Iterator<Item = usize>,
{
    for i in indices {
        let category = lines[i].category;
        if category == VerseCategory::Empty {
            continue;
        }
        return category.is_verse();
    }
    false
}

/// Contextual corrections over a classified section.
///
/// Lines are revisited in order and each correction is visible to the
/// following lines. Rules test the category a line had before this pass.
pub fn smooth(classified: &[ClassifiedLine<VerseCategory>]) -> Vec<ClassifiedLine<VerseCategory>> {
    let mut result = classified.to_vec();

    for i in 0..result.len() {
        let original = result[i].category;
        if original == VerseCategory::Empty {
            continue;
        }

        // Verse inside an apparatus block
        if original.is_verse() {
            let apparatus = count_nearby(&result, i, 3, &[VerseCategory::Apparatus]);
            let verse = count_nearby(&result, i, 3, &[VerseCategory::Verse, VerseCategory::VerseNumbered]);
            if apparatus >= 4 && verse <= 1 {
                result[i].category = VerseCategory::Apparatus;
            }
        }

        // Damaged verse between verse lines
        if original == VerseCategory::Noise {
            let text = result[i].text.trim();
            let clean = text.chars().count() >= 15
                && !has_digit(text)
                && !EDITORIAL_BRACKETS_REGEX.is_match(text)
                && !CODEX_ABBREV_REGEX.is_match(text);
            if clean {
                let before = verse_neighbour(&result, (i.saturating_sub(3)..i).rev());
                let after_end = (i + 3).min(result.len().saturating_sub(1));
                let after = verse_neighbour(&result, (i + 1)..=after_end);
                if before && after && greek_letter_share(&result[i].text) > 0.6 {
                    result[i].category = VerseCategory::Verse;
                }
            }
        }

        // Stray line inside an apparatus block
        if matches!(original, VerseCategory::Noise | VerseCategory::Introduction)
            && count_nearby(&result, i, 2, &[VerseCategory::Apparatus]) >= 3
        {
            result[i].category = VerseCategory::Apparatus;
        }
    }

    result
}

/// Classify and smooth every line of a section
pub fn classify_section(lines: &[RawLine]) -> Vec<ClassifiedLine<VerseCategory>> {
    let classified: Vec<ClassifiedLine<VerseCategory>> = lines
        .iter()
        .map(|line| ClassifiedLine {
            line_number: line.number,
            text: line.text.clone(),
            category: classify_line(&line.text),
        })
        .collect();
    smooth(&classified)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERSE: &str = "Ἄκουσε, τέκνον μου, καλὰ τὰ λόγια τοῦ πατρός σου";

    fn classified(categories: &[VerseCategory]) -> Vec<ClassifiedLine<VerseCategory>> {
        categories
            .iter()
            .enumerate()
            .map(|(i, category)| ClassifiedLine {
                line_number: i,
                text: if *category == VerseCategory::Empty { String::new() } else { VERSE.to_string() },
                category: *category,
            })
            .collect()
    }

    #[test]
    fn test_classify_line_withCleanVerse_shouldReturnVerse() {
        assert_eq!(classify_line(VERSE), VerseCategory::Verse);
    }

    #[test]
    fn test_classify_line_withLeadingNumber_shouldReturnVerseNumbered() {
        let line = format!("140 {}", VERSE);
        assert_eq!(classify_line(&line), VerseCategory::VerseNumbered);
    }

    #[test]
    fn test_classify_line_withEmbeddedNumbers_shouldReturnApparatus() {
        assert_eq!(classify_line("τοῦ πατρός σου 12 καὶ 15 λόγια"), VerseCategory::Apparatus);
        assert_eq!(classify_line("λόγια Α. σου Β. καλὰ τὰ"), VerseCategory::Apparatus);
        assert_eq!(classify_line("καλὰ οοα. τὰ λόγια τοῦ πατρός"), VerseCategory::Apparatus);
        assert_eq!(classify_line("καλὰ [τὰ] λόγια τοῦ πατρός σου"), VerseCategory::Apparatus);
    }

    #[test]
    fn test_classify_line_withShortOrEmpty_shouldReturnNoiseOrEmpty() {
        assert_eq!(classify_line("   "), VerseCategory::Empty);
        assert_eq!(classify_line("καλ"), VerseCategory::Noise);
        assert_eq!(classify_line("  12345 "), VerseCategory::Noise);
    }

    #[test]
    fn test_classify_line_withLatinProse_shouldReturnIntroduction() {
        assert_eq!(
            classify_line("Hoc carmen edidit Wagner ex codice Vindobonensi"),
            VerseCategory::Introduction
        );
    }

    #[test]
    fn test_count_sigla_withRepeatedLetters_shouldCountEach() {
        assert_eq!(count_sigla("Α Β καλὰ Μ"), 3);
        assert_eq!(count_sigla("Ἀλεξίου"), 0);
    }

    #[test]
    fn test_smooth_withVerseInsideApparatus_shouldReclassify() {
        use VerseCategory::*;
        let lines = classified(&[Apparatus, Apparatus, Apparatus, Verse, Apparatus, Apparatus, Empty]);
        let smoothed = smooth(&lines);
        assert_eq!(smoothed[3].category, Apparatus);
    }

    #[test]
    fn test_smooth_withNoiseBetweenVerse_shouldPromoteToVerse() {
        use VerseCategory::*;
        let lines = classified(&[Verse, Empty, Noise, Verse]);
        let smoothed = smooth(&lines);
        assert_eq!(smoothed[2].category, Verse);
    }

    #[test]
    fn test_smooth_withNoiseNextToIntroduction_shouldStayNoise() {
        use VerseCategory::*;
        let lines = classified(&[Introduction, Noise, Verse]);
        let smoothed = smooth(&lines);
        assert_eq!(smoothed[1].category, Noise);
    }

    #[test]
    fn test_classify_section_shouldBeTotal() {
        let lines = RawLine::from_document("ΤΙΤΛΟΣ\n\n12\nκαλὰ\n");
        assert_eq!(classify_section(&lines).len(), lines.len());
    }
}
