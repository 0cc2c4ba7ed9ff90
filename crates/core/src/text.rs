//! Text analysis fallback rules.
//!
//! The content analyzer's primary path is an external generative service
//! (see the `metamind-ai` crate). These functions are the deterministic
//! floor it degrades to: they cannot fail, and the word-count rule here is
//! also the one the draft store applies when a caller omits `word_count`,
//! keeping the two subsystems consistent.

use serde::{Deserialize, Serialize};

/// Average reading speed used for the reading-time estimate.
pub const READING_WORDS_PER_MINUTE: u32 = 200;

/// Chapter headings produced by the fallback structure.
pub const FALLBACK_CHAPTERS: &[&str] = &["Introduction", "Main Content", "Conclusion"];

/// Three-part breakdown of a draft's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentStructure {
    pub introduction: String,
    pub body: String,
    pub conclusion: String,
}

/// Structured result of analyzing raw draft text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentAnalysis {
    /// Ordered section titles.
    pub chapters: Vec<String>,
    pub structure: ContentStructure,
    pub word_count: u32,
    pub estimated_reading_minutes: u32,
}

/// Count maximal non-whitespace substrings.
pub fn word_count(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

/// Estimated reading time in minutes, rounded up.
pub fn estimated_reading_minutes(words: u32) -> u32 {
    words.div_ceil(READING_WORDS_PER_MINUTE)
}

/// Deterministic analysis used when the generative service is unavailable.
///
/// The whole text lands in the body; introduction and conclusion are empty.
pub fn fallback_analysis(raw: &str) -> ContentAnalysis {
    let words = word_count(raw);
    ContentAnalysis {
        chapters: FALLBACK_CHAPTERS.iter().map(|c| c.to_string()).collect(),
        structure: ContentStructure {
            introduction: String::new(),
            body: raw.to_string(),
            conclusion: String::new(),
        },
        word_count: words,
        estimated_reading_minutes: estimated_reading_minutes(words),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_count_splits_on_any_whitespace() {
        assert_eq!(word_count("a  b\tc\n"), 3);
    }

    #[test]
    fn word_count_empty_text() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   \n\t  "), 0);
    }

    #[test]
    fn reading_minutes_rounds_up() {
        assert_eq!(estimated_reading_minutes(0), 0);
        assert_eq!(estimated_reading_minutes(1), 1);
        assert_eq!(estimated_reading_minutes(200), 1);
        assert_eq!(estimated_reading_minutes(201), 2);
        assert_eq!(estimated_reading_minutes(1000), 5);
    }

    #[test]
    fn fallback_puts_whole_text_in_body() {
        let analysis = fallback_analysis("one two three");

        assert_eq!(
            analysis.chapters,
            vec!["Introduction", "Main Content", "Conclusion"]
        );
        assert_eq!(analysis.structure.introduction, "");
        assert_eq!(analysis.structure.body, "one two three");
        assert_eq!(analysis.structure.conclusion, "");
        assert_eq!(analysis.word_count, 3);
        assert_eq!(analysis.estimated_reading_minutes, 1);
    }

    #[test]
    fn fallback_never_fails_on_empty_input() {
        let analysis = fallback_analysis("");
        assert_eq!(analysis.word_count, 0);
        assert_eq!(analysis.estimated_reading_minutes, 0);
        assert_eq!(analysis.structure.body, "");
    }
}
