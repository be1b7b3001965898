/*!
 * Character-level script detection.
 *
 * Polytonic Greek spans two Unicode blocks with holes in both, so the
 * precise letter tests enumerate the assigned ranges instead of relying on
 * `char::is_alphabetic`.
 */

use serde::{Deserialize, Serialize};

/// Uppercase Greek letters, basic and extended blocks
pub fn is_greek_uppercase(c: char) -> bool {
    matches!(c,
        '\u{0391}'..='\u{03A9}'
        | '\u{0386}'
        | '\u{0388}'..='\u{038A}'
        | '\u{038C}'
        | '\u{038E}'..='\u{038F}'
        | '\u{1F08}'..='\u{1F0F}'
        | '\u{1F18}'..='\u{1F1D}'
        | '\u{1F28}'..='\u{1F2F}'
        | '\u{1F38}'..='\u{1F3F}'
        | '\u{1F48}'..='\u{1F4D}'
        | '\u{1F59}'..='\u{1F5F}'
        | '\u{1F68}'..='\u{1F6F}'
        | '\u{1F88}'..='\u{1F8F}'
        | '\u{1F98}'..='\u{1F9F}'
        | '\u{1FA8}'..='\u{1FAF}'
        | '\u{1FB8}'..='\u{1FBC}'
        | '\u{1FC8}'..='\u{1FCC}'
        | '\u{1FD8}'..='\u{1FDB}'
        | '\u{1FE8}'..='\u{1FEC}'
        | '\u{1FF8}'..='\u{1FFC}')
}

/// Lowercase Greek letters, basic and extended blocks
pub fn is_greek_lowercase(c: char) -> bool {
    matches!(c,
        '\u{03B1}'..='\u{03C9}'
        | '\u{03AC}'..='\u{03AF}'
        | '\u{03CC}'..='\u{03CE}'
        | '\u{0390}'
        | '\u{03B0}'
        | '\u{1F00}'..='\u{1F07}'
        | '\u{1F10}'..='\u{1F15}'
        | '\u{1F20}'..='\u{1F27}'
        | '\u{1F30}'..='\u{1F37}'
        | '\u{1F40}'..='\u{1F45}'
        | '\u{1F50}'..='\u{1F57}'
        | '\u{1F60}'..='\u{1F67}'
        | '\u{1F70}'..='\u{1F7D}'
        | '\u{1F80}'..='\u{1F87}'
        | '\u{1F90}'..='\u{1F97}'
        | '\u{1FA0}'..='\u{1FA7}'
        | '\u{1FB0}'..='\u{1FB4}'
        | '\u{1FB6}'..='\u{1FB7}'
        | '\u{1FC2}'..='\u{1FC4}'
        | '\u{1FC6}'..='\u{1FC7}'
        | '\u{1FD0}'..='\u{1FD3}'
        | '\u{1FD6}'..='\u{1FD7}'
        | '\u{1FE0}'..='\u{1FE7}'
        | '\u{1FF2}'..='\u{1FF4}'
        | '\u{1FF6}'..='\u{1FF7}')
}

pub fn is_greek_letter(c: char) -> bool {
    is_greek_uppercase(c) || is_greek_lowercase(c)
}

/// Anything in the Greek and Coptic or Greek Extended blocks, marks included
pub fn is_greek_block(c: char) -> bool {
    matches!(c, '\u{0370}'..='\u{03FF}' | '\u{1F00}'..='\u{1FFF}')
}

pub fn is_ascii_latin(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 { 0.0 } else { part as f64 / whole as f64 }
}

/// Share of Greek letters among Greek and ASCII Latin letters
pub fn greek_letter_share(text: &str) -> f64 {
    let (greek, latin) = text.chars().fold((0, 0), |(g, l), c| {
        if is_greek_letter(c) {
            (g + 1, l)
        } else if is_ascii_latin(c) {
            (g, l + 1)
        } else {
            (g, l)
        }
    });
    ratio(greek, greek + latin)
}

/// Share of ASCII Latin letters among non-whitespace characters
pub fn latin_share_of_visible(text: &str) -> f64 {
    let visible = text.chars().filter(|c| !c.is_whitespace()).count();
    let latin = text.chars().filter(|c| is_ascii_latin(*c)).count();
    ratio(latin, visible)
}

/// Greek-block and Latin shares, both over Greek-block plus ASCII Latin characters
pub fn greek_block_shares(text: &str) -> (f64, f64) {
    let (greek, latin) = text.chars().fold((0, 0), |(g, l), c| {
        if is_greek_block(c) {
            (g + 1, l)
        } else if is_ascii_latin(c) {
            (g, l + 1)
        } else {
            (g, l)
        }
    });
    (ratio(greek, greek + latin), ratio(latin, greek + latin))
}

/// Share of Greek-block characters among all characters
pub fn greek_block_density(text: &str) -> f64 {
    let total = text.chars().count();
    ratio(text.chars().filter(|c| is_greek_block(*c)).count(), total)
}

/// Heading test for Carmina-style titles printed in capitals
pub fn is_all_caps_greek(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.chars().count() <= 5 {
        return false;
    }
    let (upper, lower) = trimmed.chars().fold((0, 0), |(u, l), c| {
        if is_greek_uppercase(c) {
            (u + 1, l)
        } else if is_greek_lowercase(c) {
            (u, l + 1)
        } else {
            (u, l)
        }
    });
    let total = upper + lower;
    total >= 3 && ratio(upper, total) > 0.5
}

/// Writing system a prose text is expected to be in
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    // @script: CJK unified ideographs
    #[default]
    Han,
    // @script: Greek, both blocks
    Greek,
    // @script: Latin letters including accented ones
    Latin,
    // @script: Tamil block
    Tamil,
}

impl Script {
    /// Whether a character belongs to the script
    pub fn contains(&self, c: char) -> bool {
        match self {
            Self::Han => matches!(c,
                '\u{4E00}'..='\u{9FFF}'
                | '\u{3400}'..='\u{4DBF}'
                | '\u{F900}'..='\u{FAFF}'
                | '\u{20000}'..='\u{2A6DF}'),
            Self::Greek => is_greek_block(c),
            Self::Latin => c.is_ascii_alphabetic() || matches!(c, '\u{00C0}'..='\u{024F}'),
            Self::Tamil => matches!(c, '\u{0B80}'..='\u{0BFF}'),
        }
    }

    /// Share of the script among alphabetic characters
    pub fn share(&self, text: &str) -> f64 {
        let alphabetic = text.chars().filter(|c| c.is_alphabetic()).count();
        let matching = text
            .chars()
            .filter(|c| c.is_alphabetic() && self.contains(*c))
            .count();
        ratio(matching, alphabetic)
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Han => "han",
            Self::Greek => "greek",
            Self::Latin => "latin",
            Self::Tamil => "tamil",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greek_letter_share_withMixedText_shouldIgnorePunctuation() {
        assert!((greek_letter_share("πολλά ab, cd") - 5.0 / 9.0).abs() < 1e-9);
        assert_eq!(greek_letter_share("123 ..."), 0.0);
    }

    #[test]
    fn test_is_all_caps_greek_withTitleLine_shouldDetectCapitals() {
        assert!(is_all_caps_greek("ΘΡΗΝΟΣ ΠΕΡΙ ΤΑΜΥΡΛΑΓΓΟΥ"));
        assert!(!is_all_caps_greek("Θρῆνος περὶ Ταμυρλάγγου"));
        assert!(!is_all_caps_greek("ΑΒΓ"));
    }

    #[test]
    fn test_script_share_withHanText_shouldCountIdeographs() {
        assert_eq!(Script::Han.share("第一回 周宣王"), 1.0);
        assert!(Script::Han.share("abc 周") < 0.5);
    }
}
