//! crates/page_builder_core/src/seo/score.rs
//!
//! The 0-100 SEO score: metadata checks plus structural checks over the tree.

use super::{char_len, contains_ignore_case, DESCRIPTION_BOUNDS, TITLE_BOUNDS};
use crate::domain::{SectionWithComponents, SeoSettings};

const BASE_SCORE: u32 = 40;
const INITIAL_BASE_SCORE: u32 = 50;

const IN_RANGE_BONUS: u32 = 10;
const PRESENT_BONUS: u32 = 5;
const PER_KEYWORD: u32 = 2;
const KEYWORD_CAP: u32 = 10;
const KEYWORD_PLACEMENT_BONUS: u32 = 5;
const PER_SECTION: u32 = 2;
const SECTION_CAP: u32 = 10;
const HEADING_BONUS: u32 = 5;
const IMAGE_ALT_BONUS: u32 = 5;

/// Strictly inside `(min, max)`.
fn in_range(text: &str, (min, max): (usize, usize)) -> bool {
    let len = char_len(text);
    len > min && len < max
}

/// +10 inside the bounds, +5 for anything non-empty outside them.
fn length_points(text: &str, bounds: (usize, usize)) -> u32 {
    if in_range(text, bounds) {
        IN_RANGE_BONUS
    } else if !text.is_empty() {
        PRESENT_BONUS
    } else {
        0
    }
}

fn clamp_score(sum: u32) -> u8 {
    sum.min(100) as u8
}

pub fn calculate_seo_score(seo: &SeoSettings, sections: &[SectionWithComponents]) -> u8 {
    let mut score = BASE_SCORE;

    score += length_points(&seo.title, TITLE_BOUNDS);
    score += length_points(&seo.description, DESCRIPTION_BOUNDS);

    let keywords = seo.distinct_keywords().len() as u32;
    score += (keywords * PER_KEYWORD).min(KEYWORD_CAP);

    if let Some(primary) = seo.primary_keyword() {
        if contains_ignore_case(&seo.title, primary) {
            score += KEYWORD_PLACEMENT_BONUS;
        }
        if contains_ignore_case(&seo.description, primary) {
            score += KEYWORD_PLACEMENT_BONUS;
        }
    }

    score += (sections.len() as u32 * PER_SECTION).min(SECTION_CAP);

    let mut components = sections.iter().flat_map(|s| s.components.iter());
    if components.clone().any(|c| c.kind() == "heading") {
        score += HEADING_BONUS;
    }
    if components.any(|c| c.kind() == "image" && c.has_alt_text()) {
        score += IMAGE_ALT_BONUS;
    }

    clamp_score(score)
}

/// Score for a brand-new page that has no content yet.
pub fn calculate_initial_seo_score(seo: &SeoSettings) -> u8 {
    let mut score = INITIAL_BASE_SCORE;

    if in_range(&seo.title, TITLE_BOUNDS) {
        score += IN_RANGE_BONUS;
    }
    if in_range(&seo.description, DESCRIPTION_BOUNDS) {
        score += IN_RANGE_BONUS;
    }
    if !seo.distinct_keywords().is_empty() {
        score += PRESENT_BONUS;
    }
    if seo
        .primary_keyword()
        .is_some_and(|primary| contains_ignore_case(&seo.title, primary))
    {
        score += KEYWORD_PLACEMENT_BONUS;
    }

    clamp_score(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seo::test_support::{component, section};
    use serde_json::json;

    fn seo_with_title(title: &str) -> SeoSettings {
        SeoSettings {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_page_scores_the_base() {
        assert_eq!(calculate_seo_score(&SeoSettings::default(), &[]), 40);
    }

    #[test]
    fn title_upper_bound_is_exclusive() {
        let at = |n: usize| calculate_seo_score(&seo_with_title(&"t".repeat(n)), &[]);
        assert_eq!(at(59), 50);
        assert_eq!(at(60), 45);
        assert_eq!(at(61), 45);
        assert_eq!(at(11), 50);
        assert_eq!(at(10), 45);
        assert_eq!(at(1), 45);
    }

    #[test]
    fn description_bounds_are_exclusive() {
        let at = |n: usize| {
            let seo = SeoSettings {
                description: "d".repeat(n),
                ..Default::default()
            };
            calculate_seo_score(&seo, &[])
        };
        assert_eq!(at(50), 45);
        assert_eq!(at(51), 50);
        assert_eq!(at(159), 50);
        assert_eq!(at(160), 45);
    }

    #[test]
    fn keywords_are_capped_and_deduplicated() {
        let with = |keywords: &[&str]| {
            let seo = SeoSettings {
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
                ..Default::default()
            };
            calculate_seo_score(&seo, &[])
        };
        assert_eq!(with(&["a", "b"]), 44);
        assert_eq!(with(&["a", "A", "a "]), 42);
        assert_eq!(with(&["a", "b", "c", "d", "e", "f", "g"]), 50);
    }

    #[test]
    fn primary_keyword_placement_is_case_insensitive() {
        let seo = SeoSettings {
            title: "Best Tax Planning Services".into(),
            description: "We help with TAX PLANNING for families".into(),
            primary_keyword: Some("tax planning".into()),
            ..Default::default()
        };
        // 40 + 10 (title) + 5 (short description) + 5 + 5
        assert_eq!(calculate_seo_score(&seo, &[]), 65);
    }

    #[test]
    fn structure_bonuses() {
        let mut image = component("image", json!({ "src": "a.png" }));
        let tree = vec![section(vec![image.clone()])];
        assert_eq!(calculate_seo_score(&SeoSettings::default(), &tree), 42);

        image.metadata.alt = Some("Team photo".into());
        let tree = vec![section(vec![
            image,
            component("heading", json!({ "text": "Hi" })),
        ])];
        assert_eq!(calculate_seo_score(&SeoSettings::default(), &tree), 52);

        let many: Vec<_> = (0..7).map(|_| section(vec![])).collect();
        assert_eq!(calculate_seo_score(&SeoSettings::default(), &many), 50);
    }

    #[test]
    fn alt_text_on_content_does_not_count() {
        let image = component("image", json!({ "src": "a.png", "alt": "in content" }));
        assert_eq!(
            calculate_seo_score(&SeoSettings::default(), &[section(vec![image])]),
            42
        );
    }

    #[test]
    fn fully_optimized_page_is_clamped() {
        let seo = SeoSettings {
            title: "Tax Planning for Small Business".into(),
            description: "Expert tax planning for small businesses, freelancers and families across the region. Book a consult.".into(),
            keywords: (0..6).map(|i| format!("k{}", i)).collect(),
            primary_keyword: Some("tax planning".into()),
            ..Default::default()
        };
        let mut image = component("image", json!({}));
        image.metadata.alt = Some("Advisor".into());
        let mut tree: Vec<_> = (0..5).map(|_| section(vec![])).collect();
        tree.push(section(vec![component("heading", json!({ "text": "x" })), image]));
        // 40 + 10 + 10 + 10 + 5 + 5 + 10 + 5 + 5 = 100
        assert_eq!(calculate_seo_score(&seo, &tree), 100);
    }

    #[test]
    fn initial_score_variant() {
        assert_eq!(calculate_initial_seo_score(&SeoSettings::default()), 50);

        let seo = SeoSettings {
            title: "Tax Planning Services".into(),
            description: "x".repeat(80),
            keywords: vec!["tax".into(), "tax".into()],
            primary_keyword: Some("planning".into()),
            ..Default::default()
        };
        assert_eq!(calculate_initial_seo_score(&seo), 80);

        // Out-of-range lengths earn nothing in the initial variant.
        assert_eq!(calculate_initial_seo_score(&seo_with_title("SEO")), 50);
    }
}
