/*!
 * Book boundaries of the two-volume Eustathius commentary on the Odyssey.
 *
 * Line numbers are 0-indexed; `end_line` is exclusive here and becomes
 * inclusive once clamped to the document.
 */

use crate::model::{RawLine, SectionBoundary};
use crate::text::script::greek_block_density;

use super::classifier::{ODYSSEIA_HEADER_REGEX, RHAPSODIA_REGEX};

/// One book of the commentary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookEntry {
    pub chapter_number: u32,
    /// Greek book letter, or a name for front matter
    pub letter: String,
    pub title: String,
    pub start_line: usize,
    /// Exclusive
    pub end_line: usize,
}

impl BookEntry {
    fn book(chapter_number: u32, letter: &str, start_line: usize, end_line: usize) -> Self {
        Self {
            chapter_number,
            letter: letter.to_string(),
            title: format!("Commentary on Odyssey Book {}", chapter_number),
            start_line,
            end_line,
        }
    }
}

/// Books printed in a volume
pub fn book_boundaries(volume: u8) -> Vec<BookEntry> {
    if volume == 2 {
        return vec![
            BookEntry::book(12, "Μ", 126, 2344),
            BookEntry::book(13, "Ν", 2344, 3680),
            BookEntry::book(14, "Ξ", 3680, 5670),
            BookEntry::book(15, "Ο", 5670, 6988),
            BookEntry::book(16, "Π", 6988, 8260),
            BookEntry::book(17, "Ρ", 8260, 9775),
            BookEntry::book(18, "Σ", 9775, 11188),
            BookEntry::book(19, "Τ", 11188, 13168),
            BookEntry::book(20, "Υ", 13168, 14350),
            BookEntry::book(21, "Φ", 14350, 15748),
            BookEntry::book(22, "Χ", 15748, 17110),
            BookEntry::book(23, "Ψ", 17110, 18230),
            BookEntry::book(24, "Ω", 18230, 19518),
        ];
    }

    vec![
        BookEntry {
            chapter_number: 0,
            letter: "Prooemium".to_string(),
            title: "Preface and Prooemium".to_string(),
            start_line: 102,
            end_line: 283,
        },
        BookEntry::book(1, "Α", 283, 5029),
        BookEntry::book(2, "Β", 5029, 6973),
        BookEntry::book(3, "Γ", 6973, 8900),
        BookEntry::book(4, "Δ", 8900, 11931),
        BookEntry::book(5, "Ε", 11931, 14523),
        BookEntry::book(6, "Ζ", 14523, 16131),
        BookEntry::book(7, "Η", 16131, 16981),
        BookEntry::book(8, "Θ", 16981, 18943),
        BookEntry::book(9, "Ι", 18943, 22577),
        BookEntry::book(10, "Κ", 22577, 24456),
        BookEntry::book(11, "Λ", 24456, 25833),
    ]
}

/// Section boundaries clamped to the document; books starting past its end are dropped
pub fn split_books(line_count: usize, books: &[BookEntry]) -> Vec<SectionBoundary> {
    books
        .iter()
        .filter(|book| book.start_line < line_count)
        .map(|book| {
            let end = book.end_line.min(line_count);
            SectionBoundary::new(book.chapter_number, book.title.clone(), book.start_line, end.saturating_sub(1))
        })
        .collect()
}

fn is_book_header(text: &str) -> bool {
    RHAPSODIA_REGEX.is_match(text) || ODYSSEIA_HEADER_REGEX.is_match(text)
}

/// Check that every book starts near a running header
pub fn validate_boundaries(lines: &[RawLine], books: &[BookEntry], volume: u8) -> Vec<String> {
    let mut warnings = Vec::new();
    let last = lines.len().saturating_sub(1);

    for book in books.iter().filter(|b| b.chapter_number != 0) {
        let window_start = book.start_line.saturating_sub(5);
        let window_end = (book.start_line + 5).min(last);
        let found = !lines.is_empty()
            && window_start <= window_end
            && lines[window_start..=window_end].iter().any(|l| is_book_header(&l.text));

        if !found {
            if volume == 2 {
                // Volume 2 books often open with the argument instead of a header
                let greek_end = (book.start_line + 15).min(last);
                let has_greek = book.start_line <= greek_end
                    && !lines.is_empty()
                    && lines[book.start_line..=greek_end]
                        .iter()
                        .any(|l| l.text.chars().count() > 50 && greek_block_density(&l.text) > 0.4);
                if !has_greek {
                    warnings.push(format!(
                        "Book {} ({}): no header or Greek content found near line {}",
                        book.chapter_number, book.letter, book.start_line
                    ));
                }
            } else {
                warnings.push(format!(
                    "Book {} ({}): no ΡΑΨΩΔΙΑ header found near line {}",
                    book.chapter_number, book.letter, book.start_line
                ));
            }
        }

        let length = book.end_line.saturating_sub(book.start_line);
        if length < 100 {
            warnings.push(format!(
                "Book {} ({}): very short section ({} lines)",
                book.chapter_number, book.letter, length
            ));
        }
    }

    warnings
}

/// Every running header in a document, for boundary review
pub fn detect_book_headers(lines: &[RawLine]) -> Vec<(usize, String)> {
    lines
        .iter()
        .filter(|l| is_book_header(&l.text))
        .map(|l| (l.number, l.text.trim().to_string()))
        .collect()
}
