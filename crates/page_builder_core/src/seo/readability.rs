//! crates/page_builder_core/src/seo/readability.rs
//!
//! A simplified reading-ease score built from average sentence length and the
//! share of long words.

use super::text::{page_text, TextMode};
use crate::domain::SectionWithComponents;
use regex::Regex;
use std::sync::OnceLock;

/// Returned when there is nothing to measure.
pub const NEUTRAL_READABILITY: u8 = 50;

const TARGET_WORDS_PER_SENTENCE: f64 = 10.0;
const SENTENCE_LENGTH_PENALTY: f64 = 5.0;
const LONG_WORD_LEN: usize = 6;
const LONG_WORD_PENALTY: f64 = 2.0;

fn sentence_boundary() -> &'static Regex {
    static BOUNDARY: OnceLock<Regex> = OnceLock::new();
    BOUNDARY.get_or_init(|| Regex::new(r"[.!?]+").expect("sentence pattern is valid"))
}

pub fn calculate_readability_score(sections: &[SectionWithComponents]) -> u8 {
    let text = page_text(sections, TextMode::Sentences);

    let total_sentences = sentence_boundary()
        .split(&text)
        .filter(|s| !s.trim().is_empty())
        .count();
    let words: Vec<&str> = text.split_whitespace().collect();
    let total_words = words.len();

    if total_words == 0 || total_sentences == 0 {
        return NEUTRAL_READABILITY;
    }

    let long_words = words
        .iter()
        .filter(|w| w.chars().count() > LONG_WORD_LEN)
        .count();

    let avg_words_per_sentence = total_words as f64 / total_sentences as f64;
    let long_word_percentage = long_words as f64 / total_words as f64 * 100.0;

    let sentence_score =
        (100.0 - (avg_words_per_sentence - TARGET_WORDS_PER_SENTENCE) * SENTENCE_LENGTH_PENALTY)
            .max(0.0);
    let word_score = (100.0 - long_word_percentage * LONG_WORD_PENALTY).max(0.0);

    ((sentence_score + word_score) / 2.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seo::test_support::{component, section};
    use serde_json::json;

    fn paragraph(text: &str) -> Vec<SectionWithComponents> {
        vec![section(vec![component("paragraph", json!({ "text": text }))])]
    }

    #[test]
    fn no_sections_is_neutral() {
        assert_eq!(calculate_readability_score(&[]), 50);
    }

    #[test]
    fn punctuation_only_is_neutral() {
        assert_eq!(calculate_readability_score(&paragraph("... !!! ???")), 50);
    }

    #[test]
    fn short_sentences_of_short_words_score_high() {
        // 5 words, 2 sentences, no long words: (137.5 + 100) / 2 → clamped to 100.
        assert_eq!(calculate_readability_score(&paragraph("The cat sat. It ran.")), 100);
    }

    #[test]
    fn long_sentences_and_long_words_are_penalized() {
        // 20 words in one sentence, 10 of them longer than six characters:
        // sentence score 100 - 10*5 = 50, word score 100 - 50*2 = 0 → 25.
        let text = "extraordinary a ".repeat(10);
        assert_eq!(calculate_readability_score(&paragraph(text.trim())), 25);
    }

    #[test]
    fn list_items_count_as_sentences() {
        // Items joined with ". " form two sentences of five words each:
        // sentence score 125, word score 100 → 112.5 → 100 after clamping.
        let sections = vec![section(vec![component(
            "list",
            json!({ "items": ["one two three four five", "six seven eight nine ten"] }),
        )])];
        assert_eq!(calculate_readability_score(&sections), 100);
    }

    #[test]
    fn mixed_text_averages_both_scores() {
        // 12 words, 1 sentence → sentence score 90.
        // 3 long words of 12 → 25% → word score 50. (90 + 50) / 2 = 70.
        let text = "We provide wonderful accounting work for small firms in our big town";
        assert_eq!(calculate_readability_score(&paragraph(text)), 70);
    }
}
