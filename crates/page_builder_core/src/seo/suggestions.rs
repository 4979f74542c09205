//! crates/page_builder_core/src/seo/suggestions.rs
//!
//! Plain-text SEO advice. Rules are independent and always appended in the
//! same order; an empty list means nothing left to fix by this rubric.

use super::{char_len, contains_ignore_case, DESCRIPTION_BOUNDS, TITLE_BOUNDS};
use crate::domain::SeoSettings;

pub const ADD_TITLE: &str = "Add a title to your page so search engines know what it is about.";
pub const LONGER_TITLE: &str = "Make your title longer; aim for at least 10 characters.";
pub const SHORTER_TITLE: &str = "Make your title shorter; keep it to 60 characters or fewer.";
pub const ADD_DESCRIPTION: &str = "Add a meta description to summarize the page in search results.";
pub const LONGER_DESCRIPTION: &str = "Make your meta description longer; aim for at least 50 characters.";
pub const SHORTER_DESCRIPTION: &str =
    "Make your meta description shorter; keep it to 160 characters or fewer.";
pub const ADD_KEYWORDS: &str = "Add keywords that describe what this page offers.";
pub const SET_PRIMARY_KEYWORD: &str = "Set a primary keyword to focus the page on one search term.";
pub const PRIMARY_KEYWORD_IN_TITLE: &str = "Include your primary keyword in the page title.";
pub const PRIMARY_KEYWORD_IN_DESCRIPTION: &str =
    "Include your primary keyword in the meta description.";

fn length_suggestion(
    text: &str,
    (min, max): (usize, usize),
    missing: &'static str,
    longer: &'static str,
    shorter: &'static str,
) -> Option<&'static str> {
    let len = char_len(text);
    if len == 0 {
        Some(missing)
    } else if len < min {
        Some(longer)
    } else if len > max {
        Some(shorter)
    } else {
        None
    }
}

pub fn generate_seo_suggestions(seo: &SeoSettings) -> Vec<String> {
    let mut suggestions = Vec::new();

    suggestions.extend(length_suggestion(
        &seo.title,
        TITLE_BOUNDS,
        ADD_TITLE,
        LONGER_TITLE,
        SHORTER_TITLE,
    ));
    suggestions.extend(length_suggestion(
        &seo.description,
        DESCRIPTION_BOUNDS,
        ADD_DESCRIPTION,
        LONGER_DESCRIPTION,
        SHORTER_DESCRIPTION,
    ));

    if seo.distinct_keywords().is_empty() {
        suggestions.push(ADD_KEYWORDS);
    }

    match seo.primary_keyword() {
        None => suggestions.push(SET_PRIMARY_KEYWORD),
        Some(primary) => {
            if !contains_ignore_case(&seo.title, primary) {
                suggestions.push(PRIMARY_KEYWORD_IN_TITLE);
            }
            if !contains_ignore_case(&seo.description, primary) {
                suggestions.push(PRIMARY_KEYWORD_IN_DESCRIPTION);
            }
        }
    }

    suggestions.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_settings_get_every_missing_suggestion() {
        assert_eq!(
            generate_seo_suggestions(&SeoSettings::default()),
            vec![ADD_TITLE, ADD_DESCRIPTION, ADD_KEYWORDS, SET_PRIMARY_KEYWORD]
        );
    }

    #[test]
    fn short_title_asks_for_longer_and_empty_description_asks_to_add() {
        let seo = SeoSettings {
            title: "SEO".into(),
            ..Default::default()
        };
        let suggestions = generate_seo_suggestions(&seo);
        assert!(suggestions.contains(&LONGER_TITLE.to_string()));
        assert!(!suggestions.contains(&ADD_TITLE.to_string()));
        assert!(suggestions.contains(&ADD_DESCRIPTION.to_string()));
    }

    #[test]
    fn overlong_fields_ask_for_shorter() {
        let seo = SeoSettings {
            title: "t".repeat(61),
            description: "d".repeat(161),
            ..Default::default()
        };
        let suggestions = generate_seo_suggestions(&seo);
        assert_eq!(&suggestions[..2], &[SHORTER_TITLE, SHORTER_DESCRIPTION]);
    }

    #[test]
    fn boundary_lengths_need_no_length_advice() {
        let seo = SeoSettings {
            title: "t".repeat(60),
            description: "d".repeat(50),
            ..Default::default()
        };
        assert_eq!(
            generate_seo_suggestions(&seo),
            vec![ADD_KEYWORDS, SET_PRIMARY_KEYWORD]
        );
    }

    #[test]
    fn primary_keyword_checks_fire_independently() {
        let seo = SeoSettings {
            title: "Best Tax Planning Services".into(),
            description: "Friendly accountants helping families and small businesses all year.".into(),
            keywords: vec!["tax planning".into()],
            primary_keyword: Some("tax planning".into()),
            ..Default::default()
        };
        let suggestions = generate_seo_suggestions(&seo);
        assert_eq!(suggestions, vec![PRIMARY_KEYWORD_IN_DESCRIPTION]);
        assert!(!suggestions.contains(&PRIMARY_KEYWORD_IN_TITLE.to_string()));
    }

    #[test]
    fn optimized_settings_have_no_suggestions() {
        let seo = SeoSettings {
            title: "Tax Planning for Families".into(),
            description: "Year-round tax planning for families and small businesses in the valley.".into(),
            keywords: vec!["tax planning".into(), "accountant".into()],
            primary_keyword: Some("Tax Planning".into()),
            ..Default::default()
        };
        assert!(generate_seo_suggestions(&seo).is_empty());
    }
}
