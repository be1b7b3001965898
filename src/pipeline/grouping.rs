/*!
 * Paragraph grouping.
 *
 * Content lines are buffered into groups. A run of `min_gap` or more
 * non-content lines closes the current group (the natural break), and a
 * group reaching `max_lines` closes as well (the cap). The natural break is
 * always checked before the cap, so a line that follows a gap never lands in
 * a group that was about to be capped.
 */

use crate::model::{ClassifiedLine, LineCategory, Paragraph};

/// When to close a paragraph group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupingRule {
    /// Consecutive non-content lines that end a group
    pub min_gap: usize,
    /// Upper bound on lines per group, if any
    pub max_lines: Option<usize>,
}

impl GroupingRule {
    /// Verse stanzas: two blank or noise lines break, fifteen lines cap
    pub const VERSE: GroupingRule = GroupingRule { min_gap: 2, max_lines: Some(15) };

    /// Commentary blocks: three non-commentary lines break, no cap
    pub const COMMENTARY: GroupingRule = GroupingRule { min_gap: 3, max_lines: None };

    /// Prose: any blank line breaks
    pub const PROSE: GroupingRule = GroupingRule { min_gap: 1, max_lines: None };
}

/// Group cleaned content lines.
///
/// `clean` is applied to every content line; lines that clean to nothing are
/// skipped without touching the gap counter. Non-content lines never enter a
/// group.
pub fn group_lines<C, F>(classified: &[ClassifiedLine<C>], rule: GroupingRule, clean: F) -> Vec<Vec<String>>
where
    C: LineCategory,
    F: Fn(&str) -> String,
{
    let mut groups = Vec::new();
    let mut buffer: Vec<String> = Vec::new();
    let mut gap = 0usize;

    for line in classified {
        if !line.category.is_content() {
            gap += 1;
            continue;
        }

        let cleaned = clean(&line.text);
        if cleaned.is_empty() {
            continue;
        }

        if gap >= rule.min_gap && !buffer.is_empty() {
            groups.push(std::mem::take(&mut buffer));
        }
        gap = 0;
        buffer.push(cleaned);

        if let Some(max) = rule.max_lines {
            if buffer.len() >= max {
                groups.push(std::mem::take(&mut buffer));
            }
        }
    }

    if !buffer.is_empty() {
        groups.push(buffer);
    }

    groups
}

/// Number paragraphs contiguously from `base`, trimming each text and
/// dropping any that end up empty
pub fn number_paragraphs<I>(texts: I, base: u32) -> Vec<Paragraph>
where
    I: IntoIterator<Item = String>,
{
    texts
        .into_iter()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .zip(base..)
        .map(|(text, index)| Paragraph { index, text })
        .collect()
}

/// Split prose on blank lines; each block is trimmed and empty blocks vanish
pub fn split_blank_line_paragraphs(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }

    blocks
        .into_iter()
        .map(|block| block.trim().to_string())
        .filter(|block| !block.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        Text,
        Blank,
    }

    impl LineCategory for Kind {
        fn all() -> &'static [Self] {
            &[Kind::Text, Kind::Blank]
        }
        fn label(&self) -> &'static str {
            match self {
                Kind::Text => "text",
                Kind::Blank => "blank",
            }
        }
        fn is_content(&self) -> bool {
            *self == Kind::Text
        }
        fn is_empty(&self) -> bool {
            *self == Kind::Blank
        }
    }

    fn lines(rows: &[&str]) -> Vec<ClassifiedLine<Kind>> {
        rows.iter()
            .enumerate()
            .map(|(i, text)| ClassifiedLine {
                line_number: i,
                text: text.to_string(),
                category: if text.is_empty() { Kind::Blank } else { Kind::Text },
            })
            .collect()
    }

    #[test]
    fn test_group_lines_withTwoBlocksAndThreeBlanks_shouldProduceTwoGroups() {
        let input = lines(&["a", "b", "c", "d", "e", "", "", "", "f", "g", "h", "i", "j"]);
        let groups = group_lines(&input, GroupingRule::VERSE, |s| s.to_string());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 5);
        assert_eq!(groups[1].len(), 5);
    }

    #[test]
    fn test_group_lines_withSingleBlank_shouldNotBreakVerse() {
        let input = lines(&["a", "", "b"]);
        let groups = group_lines(&input, GroupingRule::VERSE, |s| s.to_string());
        assert_eq!(groups, vec![vec!["a".to_string(), "b".to_string()]]);
    }

    #[test]
    fn test_group_lines_withLongRun_shouldCapAtMaxLines() {
        let texts: Vec<String> = (0..32).map(|i| format!("line {}", i)).collect();
        let refs: Vec<&str> = texts.iter().map(|s| s.as_str()).collect();
        let groups = group_lines(&lines(&refs), GroupingRule::VERSE, |s| s.to_string());
        let sizes: Vec<usize> = groups.iter().map(|g| g.len()).collect();
        assert_eq!(sizes, vec![15, 15, 2]);
    }

    #[test]
    fn test_group_lines_withLinesCleaningToEmpty_shouldKeepGapCounting() {
        let input = lines(&["a", "", "x", "", "b"]);
        let groups = group_lines(&input, GroupingRule::VERSE, |s| {
            if s == "x" { String::new() } else { s.to_string() }
        });
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_number_paragraphs_shouldDropEmptyAndKeepIndicesContiguous() {
        let paragraphs = number_paragraphs(vec![" a ".to_string(), "  ".to_string(), "b".to_string()], 1);
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].text, "a");
        assert_eq!(paragraphs[1].index, 2);
    }

    #[test]
    fn test_split_blank_line_paragraphs_withWhitespaceLines_shouldSplit() {
        let blocks = split_blank_line_paragraphs("one\ntwo\n   \nthree\n\n\n");
        assert_eq!(blocks, vec!["one\ntwo".to_string(), "three".to_string()]);
    }
}
