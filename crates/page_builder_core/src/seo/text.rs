//! crates/page_builder_core/src/seo/text.rs
//!
//! Flattens component content into plain text for the metric calculators.

use crate::domain::{Component, ComponentContent, SectionWithComponents};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// How list items are joined. Readability needs sentence boundaries between
/// items; word counting does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    Words,
    Sentences,
}

impl TextMode {
    fn list_separator(self) -> &'static str {
        match self {
            Self::Words => " ",
            Self::Sentences => ". ",
        }
    }
}

fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

/// Deletes every `<...>` tag, collapses whitespace runs and trims.
pub fn strip_markup(markup: &str) -> String {
    let without_tags = tag_pattern().replace_all(markup, "");
    without_tags.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The plain-text contribution of a single component.
pub fn extract_text(component: &Component, mode: TextMode) -> String {
    match &component.content {
        ComponentContent::Heading(heading) => heading.text.clone(),
        ComponentContent::Paragraph(rich) | ComponentContent::RichText(rich) => {
            strip_markup(rich.markup())
        }
        ComponentContent::List(list) => list
            .items
            .iter()
            .map(|item| item.text())
            .collect::<Vec<_>>()
            .join(mode.list_separator()),
        ComponentContent::Other { kind, raw } => untyped_text(kind, raw, mode),
        ComponentContent::Image(_)
        | ComponentContent::Button(_)
        | ComponentContent::Cta(_)
        | ComponentContent::Video(_)
        | ComponentContent::Columns(_)
        | ComponentContent::Card(_)
        | ComponentContent::Feature(_) => String::new(),
    }
}

/// Text of a text-bearing component whose payload did not parse as a whole,
/// e.g. a heading with an unknown `level` or a list with a numeric item. Only
/// string fields are read; anything else contributes nothing.
fn untyped_text(kind: &str, raw: &Value, mode: TextMode) -> String {
    let field = |name: &str| raw.get(name).and_then(Value::as_str).unwrap_or("");
    match kind {
        "heading" => field("text").to_string(),
        "paragraph" | "text" | "rich-text" | "richtext" => match raw {
            Value::String(markup) => strip_markup(markup),
            _ if !field("html").is_empty() => strip_markup(field("html")),
            _ => strip_markup(field("text")),
        },
        "list" => raw
            .get("items")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(text) => Some(text.as_str()),
                        other => other.get("text").and_then(Value::as_str),
                    })
                    .collect::<Vec<_>>()
                    .join(mode.list_separator())
            })
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// All text of a page in section/component order, one space between components.
pub fn page_text(sections: &[SectionWithComponents], mode: TextMode) -> String {
    sections
        .iter()
        .flat_map(|s| s.components.iter())
        .map(|c| extract_text(c, mode))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
