// @module: Year headers, Roman numerals and period grouping for diary text

use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::PeriodConfig;

static ARABIC_YEAR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(1[2-5]\d{2})\b").expect("Invalid year regex")
});

static ROMAN_YEAR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.([MCDXLVI]+)\.").expect("Invalid roman year regex")
});

static YEAR_HEADER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:(?:Dell'anno|Nell'anno)\s|Anno\s+Domini\s)").expect("Invalid year header regex")
});

/// Plausible range for a year written in Roman numerals
const ROMAN_YEAR_RANGE: std::ops::RangeInclusive<u32> = 1200..=1500;

/// Diary text under one year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearEntry {
    pub year: u32,
    pub text: String,
}

/// Value of a Roman numeral, subtractive pairs included; unknown letters count zero
pub fn roman_to_arabic(roman: &str) -> u32 {
    let values: Vec<i64> = roman
        .chars()
        .map(|c| match c.to_ascii_uppercase() {
            'M' => 1000,
            'D' => 500,
            'C' => 100,
            'L' => 50,
            'X' => 10,
            'V' => 5,
            'I' => 1,
            _ => 0,
        })
        .collect();

    let total: i64 = values
        .iter()
        .enumerate()
        .map(|(i, &current)| match values.get(i + 1) {
            Some(&next) if current < next => -current,
            _ => current,
        })
        .sum();
    total.max(0) as u32
}

/// Year named in a header line: Arabic first, then a dotted Roman numeral
pub fn parse_year(line: &str) -> Option<u32> {
    if let Some(caps) = ARABIC_YEAR_REGEX.captures(line) {
        return caps[1].parse().ok();
    }
    ROMAN_YEAR_REGEX
        .captures(line)
        .map(|caps| roman_to_arabic(&caps[1]))
        .filter(|year| ROMAN_YEAR_RANGE.contains(year))
}

pub fn is_year_header(line: &str) -> bool {
    YEAR_HEADER_REGEX.is_match(line.trim())
}

/// Split cleaned lines at year headers naming a new year.
///
/// Text before the first header is dated `first_year`, or `last_year` when
/// there is no header at all; a header whose year
/// cannot be parsed (or repeats the current one) stays in the running entry.
pub fn split_by_year(lines: &[String], first_year: u32, last_year: u32) -> Vec<YearEntry> {
    let mut entries = Vec::new();
    let mut current_year: Option<u32> = None;
    let mut current: Vec<&str> = Vec::new();

    for line in lines {
        if is_year_header(line) {
            if let Some(year) = parse_year(line).filter(|y| Some(*y) != current_year) {
                if !current.is_empty() {
                    entries.push(YearEntry {
                        year: current_year.unwrap_or(first_year),
                        text: current.join("\n"),
                    });
                }
                current_year = Some(year);
                current = vec![line.as_str()];
                continue;
            }
        }
        current.push(line.as_str());
    }

    if !current.is_empty() {
        entries.push(YearEntry {
            year: current_year.unwrap_or(last_year),
            text: current.join("\n"),
        });
    }

    entries
}

/// Entries of each period, in period order; entries outside every period are dropped
pub fn group_by_period<'a>(entries: &'a [YearEntry], periods: &[PeriodConfig]) -> Vec<Vec<&'a YearEntry>> {
    let mut groups: Vec<Vec<&YearEntry>> = vec![Vec::new(); periods.len()];
    for entry in entries {
        if let Some(index) = periods.iter().position(|p| p.contains(entry.year)) {
            groups[index].push(entry);
        }
    }
    groups
}
