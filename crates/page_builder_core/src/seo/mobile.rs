//! crates/page_builder_core/src/seo/mobile.rs
//!
//! Mobile-layout heuristic. This is a gate over three known-bad patterns, not a
//! layout audit: anything outside those patterns passes.

use crate::domain::SectionWithComponents;
use uuid::Uuid;

const MIN_SIDE_PADDING: f64 = 16.0;
const MAX_COLUMNS: u32 = 2;
const MAX_FIXED_IMAGE_WIDTH: f64 = 600.0;

/// The first layout pattern found that breaks on small screens.
#[derive(Debug, Clone, PartialEq)]
pub enum MobileViolation {
    /// A boxed section with missing or narrow side padding.
    NarrowSectionPadding { section_id: Uuid },
    TooManyColumns { component_id: Uuid, columns: u32 },
    WideFixedImage { component_id: Uuid, width: f64 },
}

pub fn check_mobile_optimization(sections: &[SectionWithComponents]) -> bool {
    find_mobile_violation(sections).is_none()
}

/// Scans sections in order, each followed by its components, and stops at the
/// first violation.
pub fn find_mobile_violation(sections: &[SectionWithComponents]) -> Option<MobileViolation> {
    for tree in sections {
        let settings = &tree.section.settings;
        if settings.full_width == Some(false) {
            let narrow = match &settings.padding {
                None => true,
                Some(padding) => {
                    padding.left.is_some_and(|l| l < MIN_SIDE_PADDING)
                        || padding.right.is_some_and(|r| r < MIN_SIDE_PADDING)
                }
            };
            if narrow {
                return Some(MobileViolation::NarrowSectionPadding {
                    section_id: tree.section.id,
                });
            }
        }

        for component in &tree.components {
            match component.kind() {
                "columns" => {
                    if let Some(columns) = component.settings.columns.filter(|&c| c > MAX_COLUMNS) {
                        return Some(MobileViolation::TooManyColumns {
                            component_id: component.id,
                            columns,
                        });
                    }
                }
                "image" => {
                    let fixed = component.settings.width.as_deref() == Some("fixed");
                    if let Some(width) = component
                        .settings
                        .fixed_width
                        .filter(|&w| fixed && w > MAX_FIXED_IMAGE_WIDTH)
                    {
                        return Some(MobileViolation::WideFixedImage {
                            component_id: component.id,
                            width,
                        });
                    }
                }
                _ => {}
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Insets, SectionSettings};
    use crate::seo::test_support::{component, section, section_with};
    use serde_json::json;

    fn boxed(padding: Option<Insets>) -> SectionSettings {
        SectionSettings {
            full_width: Some(false),
            padding,
            ..Default::default()
        }
    }

    #[test]
    fn empty_page_is_mobile_optimized() {
        assert!(check_mobile_optimization(&[]));
    }

    #[test]
    fn boxed_section_with_narrow_left_padding_fails() {
        let settings = boxed(Some(Insets {
            left: Some(10.0),
            right: Some(20.0),
            ..Default::default()
        }));
        let sections = vec![section_with(settings, vec![])];
        assert!(!check_mobile_optimization(&sections));
        assert!(matches!(
            find_mobile_violation(&sections),
            Some(MobileViolation::NarrowSectionPadding { .. })
        ));
    }

    #[test]
    fn boxed_section_without_padding_fails() {
        assert!(!check_mobile_optimization(&[section_with(boxed(None), vec![])]));
    }

    #[test]
    fn full_width_or_unset_sections_pass_regardless_of_padding() {
        let full = SectionSettings {
            full_width: Some(true),
            ..Default::default()
        };
        assert!(check_mobile_optimization(&[
            section_with(full, vec![]),
            section(vec![]),
        ]));
    }

    #[test]
    fn boxed_section_with_comfortable_padding_passes() {
        let settings = boxed(Some(Insets {
            left: Some(16.0),
            right: Some(24.0),
            ..Default::default()
        }));
        assert!(check_mobile_optimization(&[section_with(settings, vec![])]));
    }

    #[test]
    fn more_than_two_columns_fails() {
        let mut columns = component("columns", json!({}));
        columns.settings.columns = Some(3);
        assert!(!check_mobile_optimization(&[section(vec![columns.clone()])]));

        columns.settings.columns = Some(2);
        assert!(check_mobile_optimization(&[section(vec![columns])]));
    }

    #[test]
    fn wide_fixed_image_fails_only_when_fixed() {
        let mut image = component("image", json!({ "src": "hero.png" }));
        image.settings.fixed_width = Some(800.0);
        assert!(check_mobile_optimization(&[section(vec![image.clone()])]));

        image.settings.width = Some("fixed".to_string());
        let violation = find_mobile_violation(&[section(vec![image.clone()])]);
        assert_eq!(
            violation,
            Some(MobileViolation::WideFixedImage {
                component_id: image.id,
                width: 800.0
            })
        );

        image.settings.fixed_width = Some(600.0);
        assert!(check_mobile_optimization(&[section(vec![image])]));
    }
}
