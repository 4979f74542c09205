//! crates/page_builder_core/src/domain.rs
//!
//! Defines the core data structures of the page builder: pages, their sections
//! and components, the SEO settings attached to a page and the performance
//! block derived from the content tree.

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

//=========================================================================================
// Request Context
//=========================================================================================

/// Identifies the tenant a request is scoped to and the user acting for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantContext {
    pub tenant_id: Uuid,
    pub user_id: Uuid,
}

//=========================================================================================
// Pages
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub path: String,
    pub title: String,
    pub description: Option<String>,
    pub page_type: String,
    pub metadata: PageMetadata,
    pub seo: SeoSettings,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Business context a tenant attaches to a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageMetadata {
    pub industry: Option<String>,
    pub purpose: Option<String>,
    pub target_audience: Vec<String>,
    pub conversion_goals: Vec<String>,
}

/// The intent a tenant declares for a page; steers goal-specific recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeoGoal {
    Local,
    Industry,
    Conversion,
    Technical,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoSettings {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub primary_keyword: Option<String>,
    pub seo_goal: Option<SeoGoal>,
    pub canonical: Option<String>,
    pub og_image: Option<String>,
    pub performance: SeoPerformance,
}

impl SeoSettings {
    /// The primary keyword, if one is set to a non-empty value.
    pub fn primary_keyword(&self) -> Option<&str> {
        self.primary_keyword.as_deref().filter(|k| !k.is_empty())
    }

    /// Keywords with blanks removed and case-insensitive duplicates collapsed,
    /// in first-seen order.
    pub fn distinct_keywords(&self) -> Vec<&str> {
        let mut seen: Vec<String> = Vec::new();
        let mut distinct = Vec::new();
        for keyword in &self.keywords {
            let normalized = keyword.trim().to_lowercase();
            if normalized.is_empty() || seen.contains(&normalized) {
                continue;
            }
            seen.push(normalized);
            distinct.push(keyword.as_str());
        }
        distinct
    }
}

/// Metrics derived from a page's content tree. Always recomputed, never patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoPerformance {
    pub score: u8,
    pub suggestions: Vec<String>,
    pub keyword_density: KeywordDensity,
    pub readability_score: u8,
    pub mobile_optimized: bool,
}

/// Word → density percentage, kept in descending-frequency order.
///
/// Serialized as a JSON object whose key order is the ranking order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordDensity(Vec<(String, f64)>);

impl KeywordDensity {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self(entries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<f64> {
        self.0.iter().find(|(w, _)| w == word).map(|(_, d)| *d)
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(w, _)| w.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(w, d)| (w.as_str(), *d))
    }
}

impl Serialize for KeywordDensity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (word, density) in &self.0 {
            map.serialize_entry(word, density)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for KeywordDensity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DensityVisitor;

        impl<'de> Visitor<'de> for DensityVisitor {
            type Value = KeywordDensity;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of word to density percentage")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((word, density)) = access.next_entry::<String, f64>()? {
                    entries.push((word, density));
                }
                Ok(KeywordDensity(entries))
            }
        }

        deserializer.deserialize_map(DensityVisitor)
    }
}

//=========================================================================================
// Sections
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: Uuid,
    pub page_id: Uuid,
    pub name: String,
    pub order: i32,
    #[serde(default)]
    pub settings: SectionSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionSettings {
    pub padding: Option<Insets>,
    pub full_width: Option<bool>,
    pub background: Option<Background>,
    pub min_height: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Insets {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Background {
    pub color: Option<String>,
    pub image: Option<String>,
    pub overlay: Option<String>,
}

//=========================================================================================
// Components
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: Uuid,
    pub section_id: Uuid,
    pub order: i32,
    #[serde(flatten)]
    pub content: ComponentContent,
    #[serde(default)]
    pub settings: ComponentSettings,
    #[serde(default)]
    pub metadata: ComponentMetadata,
}

impl Component {
    pub fn kind(&self) -> &str {
        self.content.kind()
    }

    pub fn has_alt_text(&self) -> bool {
        self.metadata.alt.as_deref().is_some_and(|alt| !alt.is_empty())
    }
}

/// The type-dependent payload of a component, keyed by the wire `type` tag.
///
/// Unknown types, and known types whose payload does not match the expected
/// shape, are kept verbatim in `Other` so nothing a client stored is lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawContent", into = "RawContent")]
pub enum ComponentContent {
    Heading(HeadingContent),
    Paragraph(RichText),
    RichText(RichText),
    List(ListContent),
    Image(ImageContent),
    Button(ButtonContent),
    Cta(CtaContent),
    Video(VideoContent),
    Columns(ColumnsContent),
    Card(CardContent),
    Feature(FeatureContent),
    Other { kind: String, raw: Value },
}

/// Wire form of a component payload: `{"type": ..., "content": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Value,
}

impl ComponentContent {
    pub fn kind(&self) -> &str {
        match self {
            Self::Heading(_) => "heading",
            Self::Paragraph(_) => "paragraph",
            Self::RichText(_) => "rich-text",
            Self::List(_) => "list",
            Self::Image(_) => "image",
            Self::Button(_) => "button",
            Self::Cta(_) => "cta",
            Self::Video(_) => "video",
            Self::Columns(_) => "columns",
            Self::Card(_) => "card",
            Self::Feature(_) => "feature",
            Self::Other { kind, .. } => kind,
        }
    }

    /// Resolves a stored `(type, content)` pair. Never fails.
    pub fn from_parts(kind: &str, raw: Value) -> Self {
        fn parse<T: serde::de::DeserializeOwned + Default>(raw: &Value) -> Option<T> {
            match raw {
                Value::Null => Some(T::default()),
                other => serde_json::from_value(other.clone()).ok(),
            }
        }

        let parsed = match kind {
            "heading" => parse(&raw).map(Self::Heading),
            "paragraph" | "text" => parse(&raw).map(Self::Paragraph),
            "rich-text" | "richtext" => parse(&raw).map(Self::RichText),
            "list" => parse(&raw).map(Self::List),
            "image" => parse(&raw).map(Self::Image),
            "button" => parse(&raw).map(Self::Button),
            "cta" => parse(&raw).map(Self::Cta),
            "video" => parse(&raw).map(Self::Video),
            "columns" => parse(&raw).map(Self::Columns),
            "card" => parse(&raw).map(Self::Card),
            "feature" => parse(&raw).map(Self::Feature),
            _ => None,
        };

        parsed.unwrap_or(Self::Other {
            kind: kind.to_string(),
            raw,
        })
    }

    /// Splits the payload back into its stored `(type, content)` pair.
    pub fn into_parts(self) -> (String, Value) {
        let kind = self.kind().to_string();
        let raw = match self {
            Self::Heading(c) => serde_json::to_value(c),
            Self::Paragraph(c) | Self::RichText(c) => serde_json::to_value(c),
            Self::List(c) => serde_json::to_value(c),
            Self::Image(c) => serde_json::to_value(c),
            Self::Button(c) => serde_json::to_value(c),
            Self::Cta(c) => serde_json::to_value(c),
            Self::Video(c) => serde_json::to_value(c),
            Self::Columns(c) => serde_json::to_value(c),
            Self::Card(c) => serde_json::to_value(c),
            Self::Feature(c) => serde_json::to_value(c),
            Self::Other { raw, .. } => Ok(raw),
        };
        // Plain data structs with string keys always serialize.
        (kind, raw.unwrap_or(Value::Null))
    }
}

impl From<RawContent> for ComponentContent {
    fn from(raw: RawContent) -> Self {
        Self::from_parts(&raw.kind, raw.content)
    }
}

impl From<ComponentContent> for RawContent {
    fn from(content: ComponentContent) -> Self {
        let (kind, content) = content.into_parts();
        RawContent { kind, content }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadingContent {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub level: HeadingLevel,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `h1`..`h6`; accepts either `"h2"` or `2` on the wire, writes `"h2"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub fn new(level: u8) -> Option<Self> {
        (1..=6).contains(&level).then_some(Self(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for HeadingLevel {
    fn default() -> Self {
        Self(2)
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

impl FromStr for HeadingLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches(['h', 'H']);
        digits
            .parse::<u8>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| format!("invalid heading level: {}", s))
    }
}

impl Serialize for HeadingLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HeadingLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => s.parse().map_err(serde::de::Error::custom),
            Value::Number(n) => n
                .as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .and_then(Self::new)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid heading level: {}", n))),
            Value::Null => Ok(Self::default()),
            other => Err(serde::de::Error::custom(format!(
                "invalid heading level: {}",
                other
            ))),
        }
    }
}

/// Markup for paragraphs and rich-text blocks: either a raw string or an
/// object carrying `html` and/or `text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RichText {
    Markup(String),
    Fields {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        html: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl Default for RichText {
    fn default() -> Self {
        Self::Fields {
            html: None,
            text: None,
            extra: Map::new(),
        }
    }
}

impl RichText {
    /// The markup to extract text from: `html` wins over `text`.
    pub fn markup(&self) -> &str {
        match self {
            Self::Markup(s) => s,
            Self::Fields {
                html: Some(html), ..
            } if !html.is_empty() => html,
            Self::Fields { text, .. } => text.as_deref().unwrap_or(""),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListContent {
    #[serde(default)]
    pub items: Vec<ListItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListItem {
    Text(String),
    Entry {
        #[serde(default)]
        text: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl ListItem {
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Entry { text, .. } => text,
        }
    }
}

/// Width or height as either a pixel count or a CSS length such as `"100%"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    Pixels(f64),
    Css(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    #[serde(default)]
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ButtonContent {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnsContent {
    #[serde(default)]
    pub columns: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Presentation settings of a component. Only the fields the mobile check reads
/// are typed; everything else rides along in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_width: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

//=========================================================================================
// Assembled Trees
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionWithComponents {
    #[serde(flatten)]
    pub section: Section,
    pub components: Vec<Component>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTree {
    #[serde(flatten)]
    pub page: Page,
    pub sections: Vec<SectionWithComponents>,
}

/// Groups flat section and component rows into an ordered tree. Components
/// whose section is not in `sections` are dropped.
pub fn assemble_tree(
    mut sections: Vec<Section>,
    mut components: Vec<Component>,
) -> Vec<SectionWithComponents> {
    sections.sort_by_key(|s| s.order);
    components.sort_by_key(|c| c.order);

    sections
        .into_iter()
        .map(|section| {
            let (own, rest): (Vec<_>, Vec<_>) = components
                .drain(..)
                .partition(|c| c.section_id == section.id);
            components = rest;
            SectionWithComponents {
                section,
                components: own,
            }
        })
        .collect()
}

//=========================================================================================
// Recommendations
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Seo,
    Content,
    Structure,
    Performance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Recommendation,
    Suggestion,
}

impl RecommendationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seo => "seo",
            Self::Content => "content",
            Self::Structure => "structure",
            Self::Performance => "performance",
        }
    }
}

impl FromStr for RecommendationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seo" => Ok(Self::Seo),
            "content" => Ok(Self::Content),
            "structure" => Ok(Self::Structure),
            "performance" => Ok(Self::Performance),
            _ => Err(format!("invalid recommendation type: {}", s)),
        }
    }
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Recommendation => "recommendation",
            Self::Suggestion => "suggestion",
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Self::Critical),
            "recommendation" => Ok(Self::Recommendation),
            "suggestion" => Ok(Self::Suggestion),
            _ => Err(format!("invalid severity: {}", s)),
        }
    }
}

/// A change the service can apply on the tenant's behalf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum AutoFix {
    SeoTitle(String),
    SeoDescription(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub severity: Severity,
    pub message: String,
    pub details: Option<String>,
    pub improvement: Option<String>,
    pub auto_fix_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_fix: Option<AutoFix>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affected_components: Vec<Uuid>,
}

impl Recommendation {
    pub fn new(kind: RecommendationKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            details: None,
            improvement: None,
            auto_fix_available: false,
            auto_fix: None,
            affected_components: Vec::new(),
        }
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn improvement(mut self, improvement: impl Into<String>) -> Self {
        self.improvement = Some(improvement.into());
        self
    }

    pub fn with_fix(mut self, fix: AutoFix) -> Self {
        self.auto_fix = Some(fix);
        self.auto_fix_available = true;
        self
    }

    pub fn affecting(mut self, components: Vec<Uuid>) -> Self {
        self.affected_components = components;
        self
    }
}

/// A recommendation as persisted against a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecommendation {
    pub id: Uuid,
    pub page_id: Uuid,
    #[serde(flatten)]
    pub recommendation: Recommendation,
    pub dismissed: bool,
    pub applied: bool,
    pub created_at: DateTime<Utc>,
}
