//! crates/page_builder_core/src/seo/mod.rs
//!
//! The SEO engine. Every function in here is pure: it reads a page's SEO
//! settings and content tree and returns scores, metrics or advice without
//! touching storage.

mod density;
mod mobile;
mod readability;
mod recommendations;
mod score;
mod suggestions;
mod text;

pub use density::calculate_keyword_density;
pub use mobile::{check_mobile_optimization, find_mobile_violation, MobileViolation};
pub use readability::{calculate_readability_score, NEUTRAL_READABILITY};
pub use recommendations::generate_page_recommendations;
pub use score::{calculate_initial_seo_score, calculate_seo_score};
pub use suggestions::*;
pub use text::{extract_text, page_text, strip_markup, TextMode};

use crate::domain::{KeywordDensity, SectionWithComponents, SeoPerformance, SeoSettings};
use tracing::debug;

/// Title length bounds, in characters.
pub(crate) const TITLE_BOUNDS: (usize, usize) = (10, 60);
/// Meta description length bounds, in characters.
pub(crate) const DESCRIPTION_BOUNDS: (usize, usize) = (50, 160);

/// Length in characters, not bytes.
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Recomputes the full performance block for a page's current content.
pub fn analyze(seo: &SeoSettings, sections: &[SectionWithComponents]) -> SeoPerformance {
    let mobile_violation = find_mobile_violation(sections);
    if let Some(violation) = &mobile_violation {
        debug!(?violation, "Page is not mobile optimized");
    }

    let performance = SeoPerformance {
        score: calculate_seo_score(seo, sections),
        suggestions: generate_seo_suggestions(seo),
        keyword_density: calculate_keyword_density(sections),
        readability_score: calculate_readability_score(sections),
        mobile_optimized: mobile_violation.is_none(),
    };
    debug!(
        score = performance.score,
        readability = performance.readability_score,
        suggestions = performance.suggestions.len(),
        "Analyzed page content"
    );
    performance
}

/// Performance for a page that has just been created and has no content.
pub fn initial_performance(seo: &SeoSettings) -> SeoPerformance {
    SeoPerformance {
        score: calculate_initial_seo_score(seo),
        suggestions: generate_seo_suggestions(seo),
        keyword_density: KeywordDensity::default(),
        readability_score: NEUTRAL_READABILITY,
        mobile_optimized: true,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::{
        Component, ComponentContent, Page, PageMetadata, Section, SectionSettings,
        SectionWithComponents, SeoSettings,
    };
    use chrono::Utc;
    use serde_json::Value;
    use uuid::Uuid;

    pub fn component(kind: &str, content: Value) -> Component {
        Component {
            id: Uuid::new_v4(),
            section_id: Uuid::nil(),
            order: 0,
            content: ComponentContent::from_parts(kind, content),
            settings: Default::default(),
            metadata: Default::default(),
        }
    }

    pub fn section(components: Vec<Component>) -> SectionWithComponents {
        section_with(SectionSettings::default(), components)
    }

    pub fn section_with(
        settings: SectionSettings,
        components: Vec<Component>,
    ) -> SectionWithComponents {
        SectionWithComponents {
            section: Section {
                id: Uuid::new_v4(),
                page_id: Uuid::nil(),
                name: "Section".into(),
                order: 0,
                settings,
            },
            components,
        }
    }

    /// A page titled "Home" with empty SEO settings and no goal.
    pub fn page() -> Page {
        let now = Utc::now();
        Page {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            path: "/".into(),
            title: "Home".into(),
            description: None,
            page_type: "landing".into(),
            metadata: PageMetadata::default(),
            seo: SeoSettings::default(),
            is_published: false,
            published_at: None,
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{component, section};
    use super::*;
    use serde_json::json;

    #[test]
    fn analyze_short_title_page() {
        let seo = SeoSettings {
            title: "SEO".into(),
            ..Default::default()
        };
        let tree = vec![section(vec![
            component("heading", json!({ "text": "Hello", "level": "h1" })),
            component("paragraph", json!({ "text": "World" })),
        ])];

        let performance = analyze(&seo, &tree);
        // 40 + 5 (title present) + 2 (one section) + 5 (heading)
        assert_eq!(performance.score, 52);
        assert!(performance.suggestions.contains(&LONGER_TITLE.to_string()));
        assert!(performance.suggestions.contains(&ADD_DESCRIPTION.to_string()));
        assert!(performance.mobile_optimized);
        assert!(performance.keyword_density.get("hello").is_some());
    }

    #[test]
    fn initial_performance_is_neutral() {
        let performance = initial_performance(&SeoSettings::default());
        assert_eq!(performance.score, 50);
        assert_eq!(performance.readability_score, 50);
        assert!(performance.keyword_density.is_empty());
        assert!(performance.mobile_optimized);
        assert_eq!(performance.suggestions.len(), 4);
    }

    #[test]
    fn lengths_count_characters() {
        assert_eq!(char_len("café"), 4);
        assert!(contains_ignore_case("Best TAX Planning", "tax planning"));
    }
}
