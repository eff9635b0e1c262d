use crate::types::{Block, BlockKind, MediaItem, MediaKind, NormalizedContent};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Hard cap on the normalized text handed to the prompt composer.
pub const MAX_CONTENT_LENGTH: usize = 2000;

/// String literals longer than this are stripped as anonymous large
/// data, a catch-all for payloads the data-URI pass did not recognize.
const LARGE_LITERAL_THRESHOLD: usize = 5000;

/// Data URIs longer than this that survived media extraction (unknown
/// MIME types, fonts, etc.) are stripped as generic data URLs.
const LARGE_DATA_URI_THRESHOLD: usize = 1000;

/// Text substituted for a document with no content blocks.
pub(crate) const EMPTY_DOCUMENT_TEXT: &str =
    "This document appears to be empty. Please add some content and try again.";

static INLINE_MEDIA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:(image|video)/[^;]+;base64,").expect("inline media pattern")
});

static LARGE_DATA_URI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r#""data:[^"]{{{LARGE_DATA_URI_THRESHOLD},}}""#))
        .expect("large data uri pattern")
});

static LARGE_LITERAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r#""[^"]{{{LARGE_LITERAL_THRESHOLD},}}""#))
        .expect("large literal pattern")
});

/// Reduce an unbounded block tree to a bounded textual representation
/// plus an ordered manifest of the media stripped from it.
///
/// The stages run in strict order, each applied only while the text is
/// still over budget: media extraction, large-literal stripping, a
/// simplified line-oriented rebuild, and a final hard truncation. The
/// function never fails; malformed or unknown blocks degrade to
/// best-effort text extraction.
#[must_use]
pub fn normalize(blocks: &[Block]) -> NormalizedContent {
    if blocks.is_empty() {
        return NormalizedContent {
            text: EMPTY_DOCUMENT_TEXT.to_string(),
            media_manifest: Vec::new(),
            placeholder_count: 0,
        };
    }

    let mut manifest = Vec::new();

    // Structure-preserving serialization of a redacted copy. One walk
    // in document order harvests media-block URLs and stray inline data
    // URIs interleaved, so the manifest matches first-seen positions.
    let mut tree = serde_json::to_value(blocks).unwrap_or(Value::Null);
    extract_media(&mut tree, &mut manifest);
    let mut text = serde_json::to_string_pretty(&tree).unwrap_or_default();
    if manifest.is_empty() {
        tracing::debug!(len = text.len(), "serialized document content, no media found");
    } else {
        tracing::debug!(
            len = text.len(),
            count = manifest.len(),
            "serialized document content, extracted media payloads"
        );
    }

    // Catch-alls for large payloads the media pass did not recognize.
    if char_len(&text) > MAX_CONTENT_LENGTH {
        text = LARGE_DATA_URI_RE
            .replace_all(&text, "\"DATA_URL_PLACEHOLDER\"")
            .into_owned();
        text = LARGE_LITERAL_RE
            .replace_all(&text, "\"LARGE_DATA_PLACEHOLDER\"")
            .into_owned();
        tracing::debug!(len = text.len(), "stripped large literals");
    }

    // Still over budget: give up on the JSON shape and rebuild a
    // simplified line-oriented representation.
    if char_len(&text) > MAX_CONTENT_LENGTH {
        text = simplify(blocks);
        tracing::debug!(len = text.len(), "rebuilt simplified representation");
    }

    if char_len(&text) > MAX_CONTENT_LENGTH {
        text = truncate_with_ellipsis(&text, MAX_CONTENT_LENGTH);
        tracing::debug!(len = text.len(), "truncated to hard cap");
    }

    let placeholder_count = manifest.len();
    NormalizedContent {
        text,
        media_manifest: manifest,
        placeholder_count,
    }
}

/// Walk the serialized tree and swap every media payload for its
/// placeholder token, recording each payload in the manifest.
///
/// A single walk covers both recognized media blocks (whatever their
/// URL form) and stray inline data URIs (inline spans, unknown block
/// props), so manifest order matches first-seen document order across
/// both sources. Within one block the visit order is content, props,
/// children.
fn extract_media(value: &mut Value, manifest: &mut Vec<MediaItem>) {
    match value {
        Value::Array(items) => {
            for item in items {
                extract_media(item, manifest);
            }
        }
        Value::String(text) => {
            if let Some(kind) = inline_media_kind(text) {
                manifest.push(MediaItem::new(kind, text.as_str(), manifest.len()));
                *value = Value::String(kind.placeholder().to_string());
            }
        }
        Value::Object(object) => {
            let kind = match object.get("type").and_then(Value::as_str) {
                Some("image") => Some(MediaKind::Image),
                Some("video") => Some(MediaKind::Video),
                _ => None,
            };
            if let Some(kind) = kind {
                if let Some(url) = object
                    .get_mut("props")
                    .and_then(|props| props.get_mut("url"))
                {
                    if let Some(payload) = url.as_str().filter(|s| !s.is_empty()) {
                        manifest.push(MediaItem::new(kind, payload, manifest.len()));
                        *url = Value::String(kind.placeholder().to_string());
                    }
                }
            }
            for key in ["content", "props", "children"] {
                if let Some(child) = object.get_mut(key) {
                    extract_media(child, manifest);
                }
            }
            for (key, child) in object.iter_mut() {
                if !matches!(key.as_str(), "content" | "props" | "children") {
                    extract_media(child, manifest);
                }
            }
        }
        _ => {}
    }
}

/// Classify a string value that is itself an embedded data URI.
fn inline_media_kind(text: &str) -> Option<MediaKind> {
    let caps = INLINE_MEDIA_RE.captures(text)?;
    if &caps[1] == "video" {
        Some(MediaKind::Video)
    } else {
        Some(MediaKind::Image)
    }
}

/// One line per block: headings prefixed `#`, bullets `•`, numbered
/// items by index, quotes `>`, media as bracketed markers. Blank
/// blocks are dropped.
fn simplify(blocks: &[Block]) -> String {
    let mut lines = Vec::new();
    let mut numbered_index = 0;
    simplify_into(blocks, &mut lines, &mut numbered_index);
    lines.join("\n\n")
}

fn simplify_into(blocks: &[Block], lines: &mut Vec<String>, numbered_index: &mut usize) {
    for block in blocks {
        if block.kind != BlockKind::NumberedListItem {
            *numbered_index = 0;
        }
        let text = block.plain_text();
        let line = match block.kind {
            BlockKind::Heading => format!("# {text}"),
            BlockKind::BulletListItem => format!("\u{2022} {text}"),
            BlockKind::NumberedListItem => {
                *numbered_index += 1;
                let index = block.props.index.unwrap_or(*numbered_index);
                format!("{index}. {text}")
            }
            BlockKind::Quote => format!("> {text}"),
            BlockKind::Image => format!(
                "[IMAGE: {}]",
                block.props.caption.as_deref().map_or_else(
                    || if text.is_empty() { "Image".to_string() } else { text.clone() },
                    ToString::to_string
                )
            ),
            BlockKind::Video => format!(
                "[VIDEO: {}]",
                block.props.caption.as_deref().map_or_else(
                    || if text.is_empty() { "Video".to_string() } else { text.clone() },
                    ToString::to_string
                )
            ),
            BlockKind::Paragraph | BlockKind::Code | BlockKind::Unknown => text,
        };
        if !line.trim().is_empty() {
            lines.push(line);
        }
        simplify_into(&block.children, lines, numbered_index);
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Truncate so the result, ellipsis included, stays within `max` chars.
fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    let keep = max.saturating_sub(3);
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlockProps, InlineContent, MediaEncoding};

    fn paragraph(text: &str) -> Block {
        Block {
            kind: BlockKind::Paragraph,
            content: vec![InlineContent::Text(text.to_string())],
            ..Block::default()
        }
    }

    fn image_block(url: &str, caption: Option<&str>) -> Block {
        Block {
            kind: BlockKind::Image,
            props: BlockProps {
                url: Some(url.to_string()),
                caption: caption.map(ToString::to_string),
                ..BlockProps::default()
            },
            ..Block::default()
        }
    }

    fn data_uri(kind: &str, payload_len: usize) -> String {
        format!("data:{kind};base64,{}", "A".repeat(payload_len))
    }

    #[test]
    fn empty_document_yields_placeholder_sentence() {
        let normalized = normalize(&[]);
        assert_eq!(normalized.text, EMPTY_DOCUMENT_TEXT);
        assert!(normalized.media_manifest.is_empty());
        assert_eq!(normalized.placeholder_count, 0);
    }

    #[test]
    fn text_is_bounded_for_megabyte_scale_input() {
        let blocks = vec![
            paragraph("intro"),
            image_block(&data_uri("image/png", 5_000_000), Some("big")),
        ];
        let normalized = normalize(&blocks);
        assert!(normalized.text.chars().count() <= MAX_CONTENT_LENGTH);
        assert_eq!(normalized.media_manifest.len(), 1);
        assert_eq!(normalized.media_manifest[0].kind, MediaKind::Image);
        assert_eq!(
            normalized.media_manifest[0].encoding,
            MediaEncoding::DataUri
        );
        assert!(normalized.media_manifest[0].payload.len() > 5_000_000);
        assert!(!normalized.text.contains("base64,AAAA"));
    }

    #[test]
    fn manifest_preserves_first_seen_order() {
        let blocks = vec![
            image_block(&data_uri("image/png", 64), None),
            Block {
                kind: BlockKind::Video,
                props: BlockProps {
                    url: Some(data_uri("video/mp4", 64)),
                    ..BlockProps::default()
                },
                ..Block::default()
            },
            image_block("https://example.com/second.png", None),
        ];
        let normalized = normalize(&blocks);
        let kinds: Vec<_> = normalized
            .media_manifest
            .iter()
            .map(|item| item.kind)
            .collect();
        assert_eq!(kinds, vec![MediaKind::Image, MediaKind::Video, MediaKind::Image]);
        assert_eq!(normalized.media_manifest[2].encoding, MediaEncoding::ExternalUrl);
        let indices: Vec<_> = normalized
            .media_manifest
            .iter()
            .map(|item| item.original_index)
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn inline_and_block_media_share_one_document_order() {
        let mut props = BlockProps::default();
        props.extra.insert(
            "background".to_string(),
            serde_json::Value::String(format!("data:image/png;base64,{}", "A".repeat(64))),
        );
        let blocks = vec![
            Block {
                kind: BlockKind::Paragraph,
                props,
                ..Block::default()
            },
            image_block(&format!("data:image/png;base64,{}", "B".repeat(64)), None),
        ];
        let normalized = normalize(&blocks);
        assert_eq!(normalized.media_manifest.len(), 2);
        assert!(normalized.media_manifest[0].payload.contains("AAAA"));
        assert!(normalized.media_manifest[1].payload.contains("BBBB"));
    }

    #[test]
    fn inline_data_uri_outside_media_block_is_still_extracted() {
        let mut props = BlockProps::default();
        props.extra.insert(
            "background".to_string(),
            serde_json::Value::String(data_uri("image/jpeg", 3000)),
        );
        let blocks = vec![Block {
            kind: BlockKind::Paragraph,
            props,
            ..Block::default()
        }];
        let normalized = normalize(&blocks);
        assert_eq!(normalized.media_manifest.len(), 1);
        assert!(!normalized.text.contains("base64"));
    }

    #[test]
    fn no_media_payload_bytes_reach_the_text() {
        let blocks = vec![
            image_block(&data_uri("image/png", 10_000), Some("photo")),
            paragraph(&"lorem ipsum ".repeat(400)),
        ];
        let normalized = normalize(&blocks);
        assert!(!normalized.text.contains("base64,"));
        assert!(normalized.text.chars().count() <= MAX_CONTENT_LENGTH);
    }

    #[test]
    fn oversized_documents_fall_back_to_simplified_lines() {
        let mut blocks = vec![Block {
            kind: BlockKind::Heading,
            content: vec![InlineContent::Text("Overview".to_string())],
            props: BlockProps {
                level: Some(1),
                ..BlockProps::default()
            },
            ..Block::default()
        }];
        for i in 0..200 {
            blocks.push(Block {
                kind: BlockKind::BulletListItem,
                content: vec![InlineContent::Text(format!("point number {i}"))],
                ..Block::default()
            });
        }
        let normalized = normalize(&blocks);
        assert!(normalized.text.starts_with("# Overview"));
        assert!(normalized.text.contains("\u{2022} point number 0"));
        assert!(normalized.text.chars().count() <= MAX_CONTENT_LENGTH);
    }

    #[test]
    fn simplified_mode_renders_quote_numbered_and_media_markers() {
        let mut blocks = vec![
            Block {
                kind: BlockKind::Quote,
                content: vec![InlineContent::Text("wise words".to_string())],
                ..Block::default()
            },
            Block {
                kind: BlockKind::NumberedListItem,
                content: vec![InlineContent::Text("first".to_string())],
                ..Block::default()
            },
            Block {
                kind: BlockKind::NumberedListItem,
                content: vec![InlineContent::Text("second".to_string())],
                ..Block::default()
            },
            image_block("https://example.com/a.png", Some("A caption")),
        ];
        // Pad so the JSON form exceeds the budget and simplification
        // actually runs.
        for _ in 0..60 {
            blocks.push(paragraph(&"x".repeat(40)));
        }
        let normalized = normalize(&blocks);
        assert!(normalized.text.contains("> wise words"));
        assert!(normalized.text.contains("1. first"));
        assert!(normalized.text.contains("2. second"));
        assert!(normalized.text.contains("[IMAGE: A caption]"));
    }

    #[test]
    fn truncation_appends_ellipsis_within_cap() {
        // Long enough to overflow the cap, short enough to dodge the
        // large-literal strip.
        let blocks = vec![paragraph(&"word ".repeat(900))];
        let normalized = normalize(&blocks);
        assert!(normalized.text.ends_with("..."));
        assert!(normalized.text.chars().count() <= MAX_CONTENT_LENGTH);
    }

    #[test]
    fn unknown_blocks_degrade_to_plain_text() {
        let blocks = vec![Block {
            kind: BlockKind::Unknown,
            content: vec![InlineContent::Text("mystery content".to_string())],
            ..Block::default()
        }];
        let normalized = normalize(&blocks);
        assert!(normalized.text.contains("mystery content"));
    }
}
