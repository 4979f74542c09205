//! crates/page_builder_core/src/seo/density.rs
//!
//! Keyword density: the share of a page's qualifying words taken by each of its
//! most frequent words.

use super::text::{page_text, TextMode};
use crate::domain::{KeywordDensity, SectionWithComponents};
use std::collections::HashMap;

/// Words of this many characters or fewer are skipped as stop words.
const SHORT_WORD_LEN: usize = 3;
const MAX_KEYWORDS: usize = 10;

/// Top ten words by frequency with their density in percent (two decimals).
///
/// The denominator counts only words longer than three characters, unlike the
/// readability word count.
pub fn calculate_keyword_density(sections: &[SectionWithComponents]) -> KeywordDensity {
    let text = page_text(sections, TextMode::Words).to_lowercase();

    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut total_words = 0usize;

    for word in text
        .split_whitespace()
        .filter(|w| w.chars().count() > SHORT_WORD_LEN)
    {
        total_words += 1;
        match positions.get(word) {
            Some(&index) => counts[index].1 += 1,
            None => {
                positions.insert(word.to_string(), counts.len());
                counts.push((word.to_string(), 1));
            }
        }
    }

    if total_words == 0 {
        return KeywordDensity::default();
    }

    // Stable: equal counts keep first-encounter order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(MAX_KEYWORDS);

    let entries = counts
        .into_iter()
        .map(|(word, count)| {
            let density = count as f64 / total_words as f64 * 100.0;
            (word, round_to_hundredths(density))
        })
        .collect();
    KeywordDensity::new(entries)
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seo::test_support::{component, section};
    use serde_json::json;

    fn paragraph(text: &str) -> SectionWithComponents {
        section(vec![component("paragraph", json!({ "text": text }))])
    }

    #[test]
    fn empty_page_has_no_density() {
        assert!(calculate_keyword_density(&[]).is_empty());
        assert!(calculate_keyword_density(&[paragraph("a an the of")]).is_empty());
    }

    #[test]
    fn short_words_are_excluded_from_the_denominator() {
        // Four qualifying words; "the" and "is" do not count.
        let density = calculate_keyword_density(&[paragraph("The garden garden is green grass")]);
        assert_eq!(density.get("garden"), Some(50.0));
        assert_eq!(density.get("green"), Some(25.0));
        assert_eq!(density.get("grass"), Some(25.0));
        assert_eq!(density.get("the"), None);
    }

    #[test]
    fn ranking_is_by_frequency_then_first_encounter() {
        let density =
            calculate_keyword_density(&[paragraph("beta alpha gamma alpha gamma delta")]);
        assert_eq!(
            density.words().collect::<Vec<_>>(),
            vec!["alpha", "gamma", "beta", "delta"]
        );
    }

    #[test]
    fn at_most_ten_entries_are_kept() {
        let words: Vec<String> = (0..15).map(|i| format!("word{:02}", i)).collect();
        let density = calculate_keyword_density(&[paragraph(&words.join(" "))]);
        assert_eq!(density.len(), 10);
        assert_eq!(density.words().next(), Some("word00"));
        assert!(density.iter().all(|(_, d)| (d - 6.67).abs() < f64::EPSILON));

        let sum: f64 = density.iter().map(|(_, d)| d).sum();
        assert!(sum <= 100.0);
    }

    #[test]
    fn text_is_gathered_across_sections_and_lowercased() {
        let sections = vec![
            section(vec![component("heading", json!({ "text": "Planning" }))]),
            section(vec![component("list", json!({ "items": ["planning", "Taxes"] }))]),
        ];
        let density = calculate_keyword_density(&sections);
        assert_eq!(density.get("planning"), Some(66.67));
        assert_eq!(density.get("taxes"), Some(33.33));
    }
}
