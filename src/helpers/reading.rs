//! Reading time estimation

use crate::content::Section;

/// Fixed reading speed
pub const WORDS_PER_MINUTE: usize = 200;

/// Count whitespace-delimited words; runs of whitespace count as one separator
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Total words across every section heading and paragraph
pub fn content_word_count(content: &[Section]) -> usize {
    content
        .iter()
        .map(|section| {
            count_words(&section.heading)
                + section
                    .body
                    .iter()
                    .map(|paragraph| count_words(&paragraph.text))
                    .sum::<usize>()
        })
        .sum()
}

/// Estimated reading time in minutes, rounded up
pub fn estimate_reading_minutes(content: &[Section]) -> u32 {
    let minutes = content_word_count(content).div_ceil(WORDS_PER_MINUTE);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["lorem"; n].join(" ")
    }

    #[test]
    fn test_count_words_collapses_whitespace() {
        assert_eq!(count_words("a  b   c"), 3);
        assert_eq!(count_words("  leading and trailing \n"), 3);
        assert_eq!(count_words("tab\tseparated\n\nlines"), 3);
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   "), 0);
    }

    #[test]
    fn test_empty_content() {
        assert_eq!(estimate_reading_minutes(&[]), 0);
        assert_eq!(estimate_reading_minutes(&[Section::new("", &[])]), 0);
    }

    #[test]
    fn test_rounds_up() {
        let exact = words(200);
        assert_eq!(estimate_reading_minutes(&[Section::new("", &[exact.as_str()])]), 1);

        let over = words(201);
        assert_eq!(estimate_reading_minutes(&[Section::new("", &[over.as_str()])]), 2);

        assert_eq!(estimate_reading_minutes(&[Section::new("one", &[])]), 1);
    }

    #[test]
    fn test_headings_and_paragraphs_are_counted() {
        let hundred = words(100);
        let content = vec![
            Section::new("Getting started", &[hundred.as_str(), "a  b   c"]),
            Section::new("Next steps", &[hundred.as_str()]),
        ];
        // 2 + 100 + 3 + 2 + 100
        assert_eq!(content_word_count(&content), 207);
        assert_eq!(estimate_reading_minutes(&content), 2);
    }
}
