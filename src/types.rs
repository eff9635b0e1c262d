use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Placeholder token substituted for every extracted image payload.
pub const IMAGE_PLACEHOLDER: &str = "IMAGE_PLACEHOLDER";
/// Placeholder token substituted for every extracted video payload.
pub const VIDEO_PLACEHOLDER: &str = "VIDEO_PLACEHOLDER";

/// A node in the source document's block tree, as produced by the
/// collaborative editor. The pipeline only ever traverses blocks; it
/// never mutates them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "type", default)]
    pub kind: BlockKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<InlineContent>,
    #[serde(default, skip_serializing_if = "BlockProps::is_empty")]
    pub props: BlockProps,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Block>,
}

impl Block {
    /// Concatenated plain text of the block's inline content.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .map(InlineContent::plain_text)
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }
}

/// The enumerated block tags the pipeline recognizes. Anything else
/// deserializes to `Unknown` and degrades to best-effort text
/// extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    #[default]
    Paragraph,
    Heading,
    BulletListItem,
    NumberedListItem,
    Quote,
    Code,
    Image,
    Video,
    #[serde(other)]
    Unknown,
}

/// An inline span inside a block. The editor emits either bare strings
/// or styled text objects; both are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InlineContent {
    Text(String),
    Span(InlineSpan),
}

impl InlineContent {
    #[must_use]
    pub fn plain_text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Span(span) => span.text.as_deref().unwrap_or_default(),
        }
    }
}

/// A styled text span (`{ type: "text", text, styles }`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InlineSpan {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<HashMap<String, Value>>,
}

impl InlineSpan {
    #[must_use]
    pub fn has_style(&self, name: &str) -> bool {
        self.styles
            .as_ref()
            .and_then(|styles| styles.get(name))
            .is_some_and(|value| value.as_bool().unwrap_or(true))
    }
}

/// Type-specific block attributes. Unrecognized properties are kept in
/// `extra` so round-tripping the tree stays lossless.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl BlockProps {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.level.is_none()
            && self.url.is_none()
            && self.caption.is_none()
            && self.index.is_none()
            && self.extra.is_empty()
    }
}

/// A point-in-time snapshot of a document, supplied by the caller from
/// the live collaborative state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentData {
    pub title: String,
    #[serde(default)]
    pub content: Vec<Block>,
}

impl DocumentData {
    /// The display title, defaulting when the document is unnamed.
    #[must_use]
    pub fn effective_title(&self) -> &str {
        let title = self.title.trim();
        if title.is_empty() {
            "Untitled Document"
        } else {
            title
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// The placeholder token that stands in for payloads of this kind.
    #[must_use]
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Image => IMAGE_PLACEHOLDER,
            Self::Video => VIDEO_PLACEHOLDER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaEncoding {
    DataUri,
    ExternalUrl,
}

/// An embedded resource stripped out of the document during
/// normalization. Held only for the duration of one generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub kind: MediaKind,
    pub encoding: MediaEncoding,
    /// The raw data-URI string or external URL.
    pub payload: String,
    /// Position in document traversal order.
    pub original_index: usize,
}

impl MediaItem {
    #[must_use]
    pub fn new(kind: MediaKind, payload: impl Into<String>, original_index: usize) -> Self {
        let payload = payload.into();
        let encoding = if payload.starts_with("data:") {
            MediaEncoding::DataUri
        } else {
            MediaEncoding::ExternalUrl
        };
        Self {
            kind,
            encoding,
            payload,
            original_index,
        }
    }
}

/// The bounded textual representation of a document passed to the
/// model, plus the media stripped from it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedContent {
    pub text: String,
    /// Extracted media in first-seen document order.
    pub media_manifest: Vec<MediaItem>,
    /// Number of placeholder tokens the model is expected to echo.
    pub placeholder_count: usize,
}

impl NormalizedContent {
    #[must_use]
    pub fn has_media(&self) -> bool {
        !self.media_manifest.is_empty()
    }
}

/// Visual style the user picked for the generated site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebsiteStyle {
    #[default]
    Modern,
    Minimal,
    Professional,
    Creative,
    Blog,
}

impl WebsiteStyle {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::Minimal => "minimal",
            Self::Professional => "professional",
            Self::Creative => "creative",
            Self::Blog => "blog",
        }
    }

    /// Map a free-text model suggestion onto a supported style.
    /// Unrecognized suggestions fall back to the default.
    #[must_use]
    pub fn from_suggestion(suggestion: &str) -> Self {
        match suggestion.trim().to_ascii_lowercase().as_str() {
            "minimal" => Self::Minimal,
            "professional" | "corporate" => Self::Professional,
            "creative" | "artistic" => Self::Creative,
            "blog" | "editorial" => Self::Blog,
            _ => Self::Modern,
        }
    }
}

/// Palette key for both the generated site and the fallback renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Blue,
    Purple,
    Green,
    Orange,
    Dark,
    Monochrome,
    Sunset,
    Ocean,
    Forest,
}

impl ColorScheme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Dark => "dark",
            Self::Monochrome => "monochrome",
            Self::Sunset => "sunset",
            Self::Ocean => "ocean",
            Self::Forest => "forest",
        }
    }

    /// Map a free-text model suggestion onto a supported palette. The
    /// analyzer is allowed to answer with palettes the generator does
    /// not carry (teal, rose, amber, slate); those land on the nearest
    /// supported scheme.
    #[must_use]
    pub fn from_suggestion(suggestion: &str) -> Self {
        match suggestion.trim().to_ascii_lowercase().as_str() {
            "purple" | "violet" => Self::Purple,
            "green" => Self::Green,
            "orange" => Self::Orange,
            "dark" => Self::Dark,
            "monochrome" | "slate" | "gray" | "grey" => Self::Monochrome,
            "sunset" | "amber" | "rose" => Self::Sunset,
            "ocean" | "teal" | "cyan" => Self::Ocean,
            "forest" => Self::Forest,
            _ => Self::Blue,
        }
    }
}

/// User-chosen configuration for one generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    #[serde(default)]
    pub style: WebsiteStyle,
    #[serde(default)]
    pub color_scheme: ColorScheme,
    #[serde(default)]
    pub include_navigation: bool,
    /// Ordered navigation labels, used only when `include_navigation`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub navigation_items: Vec<String>,
    #[serde(default)]
    pub include_toc: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,
}

/// Advisory classification of a document produced by the analyzer.
/// Never required for correctness of the main pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAnalysis {
    pub suggested_style: WebsiteStyle,
    pub suggested_color_scheme: ColorScheme,
    /// 2-3 sentence rationale for the suggestions.
    pub content_analysis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_themes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggested_sections: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub call_to_actions: Vec<String>,
}

impl Default for ContentAnalysis {
    /// The neutral default returned whenever analysis fails.
    fn default() -> Self {
        Self {
            suggested_style: WebsiteStyle::Modern,
            suggested_color_scheme: ColorScheme::Blue,
            content_analysis: "Content analysis unavailable - using default recommendations."
                .to_string(),
            content_type: None,
            target_audience: None,
            key_themes: Vec::new(),
            suggested_sections: Vec::new(),
            call_to_actions: Vec::new(),
        }
    }
}

/// The published output of one generation run. One artifact per
/// document, last-write-wins, no versioning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedArtifact {
    /// Complete self-contained HTML document.
    pub html: String,
    pub settings: GenerationSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub is_published: bool,
}

impl GeneratedArtifact {
    /// A freshly published artifact stamped with the current time.
    #[must_use]
    pub fn published(html: String, settings: GenerationSettings) -> Self {
        Self {
            html,
            settings,
            published_at: Some(Utc::now()),
            is_published: true,
        }
    }

    /// Unpublish clears the published flag and timestamp but keeps the
    /// generated HTML and settings so republishing is cheap.
    pub fn unpublish(&mut self) {
        self.is_published = false;
        self.published_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn block_tree_deserializes_from_editor_json() {
        let value = json!([
            {
                "type": "heading",
                "props": { "level": 2 },
                "content": [{ "type": "text", "text": "Welcome", "styles": { "bold": true } }]
            },
            {
                "type": "image",
                "props": { "url": "data:image/png;base64,AAAA", "caption": "Logo" }
            },
            {
                "type": "toggleListItem",
                "content": ["plain string content"]
            }
        ]);

        let blocks: Vec<Block> = serde_json::from_value(value).unwrap();
        assert_eq!(blocks[0].kind, BlockKind::Heading);
        assert_eq!(blocks[0].props.level, Some(2));
        assert_eq!(blocks[0].plain_text(), "Welcome");
        assert_eq!(blocks[1].kind, BlockKind::Image);
        assert!(blocks[1].props.url.as_deref().unwrap().starts_with("data:"));
        assert_eq!(blocks[2].kind, BlockKind::Unknown);
        assert_eq!(blocks[2].plain_text(), "plain string content");
    }

    #[test]
    fn media_item_detects_encoding() {
        let inline = MediaItem::new(MediaKind::Image, "data:image/png;base64,AAAA", 0);
        assert_eq!(inline.encoding, MediaEncoding::DataUri);

        let external = MediaItem::new(MediaKind::Video, "https://example.com/clip.mp4", 1);
        assert_eq!(external.encoding, MediaEncoding::ExternalUrl);
    }

    #[test]
    fn color_scheme_maps_analyzer_palettes() {
        assert_eq!(ColorScheme::from_suggestion("teal"), ColorScheme::Ocean);
        assert_eq!(ColorScheme::from_suggestion("rose"), ColorScheme::Sunset);
        assert_eq!(ColorScheme::from_suggestion("Amber"), ColorScheme::Sunset);
        assert_eq!(ColorScheme::from_suggestion("slate"), ColorScheme::Monochrome);
        assert_eq!(ColorScheme::from_suggestion("nonsense"), ColorScheme::Blue);
    }

    #[test]
    fn unpublish_keeps_html() {
        let mut artifact =
            GeneratedArtifact::published("<!DOCTYPE html>".into(), GenerationSettings::default());
        assert!(artifact.is_published);
        artifact.unpublish();
        assert!(!artifact.is_published);
        assert!(artifact.published_at.is_none());
        assert!(!artifact.html.is_empty());
    }

    #[test]
    fn untitled_document_gets_default_title() {
        let document = DocumentData {
            title: "   ".into(),
            content: Vec::new(),
        };
        assert_eq!(document.effective_title(), "Untitled Document");
    }
}
