/*!
 * Title table and title-line validation for verse anthologies.
 *
 * The Carmina Graeca edition prints every poem title in capitals on one to
 * six lines. Positions are fixed for the digitized edition; validation only
 * reports drift, it never moves a title.
 */

use serde::{Deserialize, Serialize};

use crate::model::RawLine;
use crate::text::normalize::truncate_chars;
use crate::text::script::is_all_caps_greek;

/// Title lines of one poem; line numbers are 0-indexed and inclusive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleEntry {
    pub chapter_number: u32,
    pub start_line: usize,
    pub end_line: usize,
    /// Greek title
    pub title: String,
    pub english_title: String,
}

impl TitleEntry {
    fn new(chapter_number: u32, start_line: usize, end_line: usize, title: &str, english_title: &str) -> Self {
        Self {
            chapter_number,
            start_line,
            end_line,
            title: title.to_string(),
            english_title: english_title.to_string(),
        }
    }

    /// Chapter title as displayed: `Greek (English)`
    pub fn display_title(&self) -> String {
        format!("{} ({})", self.title, self.english_title)
    }
}

/// The 21 poems of Carmina Graeca Medii Aevi
pub fn carmina_graeca_titles() -> Vec<TitleEntry> {
    vec![
        TitleEntry::new(1, 1110, 1110, "Ἀλεξίου Κομνηνοῦ ποίημα παραινετικόν", "Admonitory Poem of Alexios Komnenos"),
        TitleEntry::new(2, 2662, 2662, "Θρῆνος περὶ Ταμυρλάγγου", "Lament about Tamerlane"),
        TitleEntry::new(3, 2863, 2864, "Ἐμμανουὴλ Γεωργιλλᾶ — Θανατικὸν τῆς Ρόδου", "Georgillas' Plague of Rhodes"),
        TitleEntry::new(4, 4037, 4039, "Μανολῆ Σκλάβου — Ἡ Συμφορὰ τῆς Κρήτης", "Sklabos' Misfortune of Crete"),
        TitleEntry::new(5, 4711, 4714, "Γραφαὶ καὶ στίχοι Στεφάνου τοῦ Σαχλήκη", "Writings of Sachlikis"),
        TitleEntry::new(6, 5634, 5639, "Γραφαὶ καὶ στίχοι Στεφάνου τοῦ Σαχλήκη (Β´)", "More Writings of Sachlikis"),
        TitleEntry::new(7, 7241, 7241, "Περὶ γέροντος νὰ μὴν πάρῃ κορίτσι", "About an Old Man Not Marrying a Girl"),
        TitleEntry::new(8, 7602, 7602, "Συναξάριον τοῦ τιμημένου γαδάρου", "Synaxarion of the Honored Donkey"),
        TitleEntry::new(9, 8352, 8352, "Γαδάρου, λύκου κι ἀλουποῦς διήγησις ὡραία", "Tale of Donkey, Wolf, and Fox"),
        TitleEntry::new(10, 9314, 9314, "Διήγησις παιδιόφραστος τῶν τετραπόδων ζώων", "Childish Tale of Four-legged Animals"),
        TitleEntry::new(11, 11388, 11388, "Πουλολόγος", "Poulologos (Tale of the Birds)"),
        TitleEntry::new(12, 12470, 12470, "Διήγησις τοῦ Τωρικολόγου", "Tale of the Tricologos"),
        TitleEntry::new(13, 12668, 12668, "Περὶ τῆς ξενιτείας", "On Living Abroad"),
        TitleEntry::new(14, 13622, 13622, "Εἰς Βενετίαν", "To Venice"),
        TitleEntry::new(15, 13776, 13781, "Ῥίμα θρηνητικὴ εἰς τὸν πικρὸν καὶ ἀκόρεστον Ἅδην — Ἰωάννου Πικατόρου", "Pikatorios' Lament on Hades"),
        TitleEntry::new(16, 14834, 14835, "Ἀλφάβητος κατανυκτικὸς καὶ ψυχωφελὴς περὶ τοῦ ματαίου κόσμου", "Penitential Alphabet"),
        TitleEntry::new(17, 15128, 15129, "Διήγησις πολυπαθοῦς Ἀπολλωνίου τοῦ Τύρου", "Tale of Apollonius of Tyre"),
        TitleEntry::new(18, 16638, 16639, "Βίος καὶ πολιτεία τινὸς δοκιμωτάτου καὶ σοφωτάτου γέροντος", "Life of a Wise Elder"),
        TitleEntry::new(19, 18463, 18464, "Διήγησις ὡραιοτάτη τοῦ θαυμαστοῦ ἀνδρὸς τοῦ λεγομένου Βελισαρίου", "Tale of Belisarius"),
        TitleEntry::new(20, 19501, 19502, "Ἐμμανουὴλ Γεωργιλλᾶ — Ἱστορικὴ ἐξήγησις περὶ Βελισαρίου", "Georgillas' History of Belisarius"),
        TitleEntry::new(21, 21072, 21072, "Ῥιμάδα περὶ Βελισαρίου", "Rhyme on Belisarius"),
    ]
}

/// Check that every title line still looks like a title
pub fn validate_titles(lines: &[RawLine], titles: &[TitleEntry]) -> Vec<String> {
    let mut warnings = Vec::new();

    for entry in titles {
        for i in entry.start_line..=entry.end_line {
            let Some(line) = lines.get(i) else {
                warnings.push(format!(
                    "Chapter {}: line {} is beyond file length ({})",
                    entry.chapter_number,
                    i,
                    lines.len()
                ));
                continue;
            };
            let trimmed = line.text.trim();
            if !is_all_caps_greek(&line.text) && trimmed.chars().count() > 5 {
                warnings.push(format!(
                    "Chapter {}: line {} doesn't look ALL-CAPS: \"{}\"",
                    entry.chapter_number,
                    i,
                    truncate_chars(trimmed, 60)
                ));
            }
        }

        // Titles are followed by blank lines; a capital line after them means the title runs on
        let after = entry.end_line + 3;
        if let Some(line) = lines.get(after) {
            let next = line.text.trim();
            if is_all_caps_greek(next) && next.chars().count() > 20 {
                warnings.push(format!(
                    "Chapter {}: line {} after title also looks ALL-CAPS; title may extend further",
                    entry.chapter_number, after
                ));
            }
        }
    }

    warnings
}

/// A title line found by scanning for capitals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedTitle {
    pub line: usize,
    pub text: String,
}

/// All-caps Greek lines longer than 10 characters inside the content window
pub fn detect_titles_heuristic(lines: &[RawLine], content_start: usize, content_end: usize) -> Vec<DetectedTitle> {
    let end = lines.len().min(content_end);
    if content_start >= end {
        return Vec::new();
    }
    lines[content_start..end]
        .iter()
        .filter(|line| is_all_caps_greek(&line.text) && line.text.trim().chars().count() > 10)
        .map(|line| DetectedTitle {
            line: line.number,
            text: line.text.trim().to_string(),
        })
        .collect()
}

/// Build a title table from detected lines; lines at most two apart form one title
pub fn titles_from_detected(detected: &[DetectedTitle]) -> Vec<TitleEntry> {
    let mut titles: Vec<TitleEntry> = Vec::new();

    for hit in detected {
        match titles.last_mut() {
            Some(last) if hit.line <= last.end_line + 2 => {
                last.end_line = hit.line;
                last.title.push(' ');
                last.title.push_str(&hit.text);
            }
            _ => {
                let number = titles.len() as u32 + 1;
                titles.push(TitleEntry {
                    chapter_number: number,
                    start_line: hit.line,
                    end_line: hit.line,
                    title: hit.text.clone(),
                    english_title: format!("Text {}", number),
                });
            }
        }
    }

    titles
}
