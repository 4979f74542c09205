//! crates/page_builder_core/src/seo/recommendations.rs
//!
//! Structured, severity-tagged findings for a page, including the rules that
//! depend on the page's declared SEO goal.

use super::{char_len, DESCRIPTION_BOUNDS, TITLE_BOUNDS};
use crate::domain::{
    AutoFix, Component, Page, Recommendation, RecommendationKind, Section, SeoGoal, Severity,
};

/// Findings for one page. `components` are the components of `sections`.
///
/// Callers store the result in place of any earlier set.
pub fn generate_page_recommendations(
    page: &Page,
    sections: &[Section],
    components: &[Component],
) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    recs.extend(title_recommendation(page));
    recs.extend(description_recommendation(page));

    if sections.is_empty() {
        recs.push(
            Recommendation::new(
                RecommendationKind::Content,
                Severity::Critical,
                "Add content to your page",
            )
            .details("The page has no sections yet, so there is nothing for visitors or search engines to read.")
            .improvement("Add a hero section with a heading and a short introduction."),
        );
    } else if components.is_empty() {
        recs.push(
            Recommendation::new(
                RecommendationKind::Content,
                Severity::Critical,
                "Your sections are empty",
            )
            .details(format!(
                "The page has {} section(s) but none of them contain components.",
                sections.len()
            ))
            .improvement("Add headings, text and images to your sections."),
        );
    }

    if !components.iter().any(|c| c.kind() == "heading") {
        recs.push(
            Recommendation::new(
                RecommendationKind::Structure,
                Severity::Recommendation,
                "Add a heading to your page",
            )
            .details("Headings give the page a structure that search engines use to understand it.")
            .improvement("Start the page with a single H1 heading that contains your primary keyword."),
        );
    }

    let images: Vec<&Component> = components.iter().filter(|c| c.kind() == "image").collect();
    if images.is_empty() {
        recs.push(
            Recommendation::new(
                RecommendationKind::Content,
                Severity::Suggestion,
                "Add images to your page",
            )
            .details("Pages with relevant images keep visitors engaged longer.")
            .improvement("Add at least one image that illustrates your offer, with descriptive alt text."),
        );
    } else {
        let missing_alt: Vec<_> = images
            .iter()
            .filter(|c| !c.has_alt_text())
            .map(|c| c.id)
            .collect();
        if !missing_alt.is_empty() {
            recs.push(
                Recommendation::new(
                    RecommendationKind::Seo,
                    Severity::Recommendation,
                    format!("{} image(s) are missing alt text", missing_alt.len()),
                )
                .details("Alt text describes images to screen readers and search engines.")
                .improvement("Describe what each image shows in a short phrase.")
                .affecting(missing_alt),
            );
        }
    }

    recs.extend(goal_recommendation(page, components));
    recs
}

fn title_recommendation(page: &Page) -> Option<Recommendation> {
    let title = &page.seo.title;
    let (min, _) = TITLE_BOUNDS;
    if title.is_empty() {
        let rec = Recommendation::new(
            RecommendationKind::Seo,
            Severity::Recommendation,
            "Add an SEO title",
        )
        .details("The page has no SEO title, so search results fall back to whatever they can find.")
        .improvement("Write a 10-60 character title that leads with your primary keyword.");
        let page_title = page.title.trim();
        return Some(if page_title.is_empty() {
            rec
        } else {
            rec.with_fix(AutoFix::SeoTitle(page_title.to_string()))
        });
    }
    let len = char_len(title);
    (len < min).then(|| {
        Recommendation::new(
            RecommendationKind::Seo,
            Severity::Recommendation,
            "Your SEO title is too short",
        )
        .details(format!(
            "The title is {} characters long; aim for 10-60 characters.",
            len
        ))
        .improvement("Expand the title with your primary keyword and what makes you different.")
    })
}

fn description_recommendation(page: &Page) -> Option<Recommendation> {
    let description = &page.seo.description;
    let (min, _) = DESCRIPTION_BOUNDS;
    if description.is_empty() {
        let rec = Recommendation::new(
            RecommendationKind::Seo,
            Severity::Recommendation,
            "Add a meta description",
        )
        .details("Search engines show the meta description under the title in results.")
        .improvement("Write a 50-160 character summary that ends with a call to action.");
        let fallback = page.description.as_deref().map(str::trim).unwrap_or("");
        return Some(if fallback.is_empty() {
            rec
        } else {
            rec.with_fix(AutoFix::SeoDescription(fallback.to_string()))
        });
    }
    let len = char_len(description);
    (len < min).then(|| {
        Recommendation::new(
            RecommendationKind::Seo,
            Severity::Recommendation,
            "Your meta description is too short",
        )
        .details(format!(
            "The description is {} characters long; aim for 50-160 characters.",
            len
        ))
        .improvement("Summarize the page's offer and include your primary keyword.")
    })
}

fn goal_recommendation(page: &Page, components: &[Component]) -> Option<Recommendation> {
    let industry = page.metadata.industry.as_deref().filter(|i| !i.is_empty());
    match page.seo.seo_goal? {
        SeoGoal::Local => Some(
            Recommendation::new(
                RecommendationKind::Seo,
                Severity::Suggestion,
                "Target local search terms",
            )
            .details("Local searches usually include a place name.")
            .improvement(match page.seo.primary_keyword() {
                Some(primary) => format!(
                    "Add keywords such as \"{} in <your city>\" and mention your service area in the content.",
                    primary
                ),
                None => "Add keywords that pair your services with your city or region.".to_string(),
            }),
        ),
        SeoGoal::Industry => Some(
            Recommendation::new(
                RecommendationKind::Content,
                Severity::Suggestion,
                "Publish authoritative industry content",
            )
            .details(match industry {
                Some(industry) => format!(
                    "Pages that demonstrate expertise in {} earn more trust from readers and search engines.",
                    industry
                ),
                None => "Pages that demonstrate expertise earn more trust from readers and search engines.".to_string(),
            })
            .improvement("Add in-depth sections such as guides, FAQs or case studies."),
        ),
        SeoGoal::Conversion => {
            let has_call_to_action = components
                .iter()
                .any(|c| matches!(c.kind(), "cta" | "button"));
            (!has_call_to_action).then(|| {
                Recommendation::new(
                    RecommendationKind::Structure,
                    Severity::Recommendation,
                    "Add a call to action",
                )
                .details("This page is meant to convert visitors but has no button or call-to-action block.")
                .improvement("Add a CTA section with a clear next step, such as booking a consultation.")
            })
        }
        SeoGoal::Technical => None,
    }
}
