use crate::types::{MediaItem, MediaKind, IMAGE_PLACEHOLDER, VIDEO_PLACEHOLDER};
use regex::Regex;
use std::sync::LazyLock;

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[a-zA-Z]*\r?\n?").expect("fence pattern"));

static IMG_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<img[^>]*>").expect("img tag pattern"));

static VIDEO_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<video[^>]*>.*?</video>").expect("video block pattern"));

static VIDEO_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<video[^>]*>").expect("video open pattern"));

static IMAGE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(IMAGE_PLACEHOLDER).expect("image token pattern"));

static VIDEO_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(VIDEO_PLACEHOLDER).expect("video token pattern"));

/// Clean raw model output into a complete, self-contained HTML document
/// with the extracted media re-inserted.
///
/// This stage cannot fail: malformed output degrades to best-effort
/// wrapping. The returned string is always non-empty, always a loadable
/// document, and never contains a literal placeholder token.
#[must_use]
pub fn post_process(raw: &str, manifest: &[MediaItem]) -> String {
    let mut html = raw.trim().to_string();

    // The prompt forbids markdown fences; the model ignores that often
    // enough that stripping them here is mandatory.
    if html.starts_with("```") {
        html = FENCE_RE.replace_all(&html, "").trim().to_string();
    }

    // Normalize any model-emitted media tags back into placeholder
    // tokens. The model sometimes invents plausible-looking but broken
    // URLs instead of echoing the tokens; collapsing everything to
    // tokens keeps a single source of truth for re-injection.
    html = VIDEO_BLOCK_RE
        .replace_all(&html, VIDEO_PLACEHOLDER)
        .into_owned();
    html = VIDEO_OPEN_RE
        .replace_all(&html, VIDEO_PLACEHOLDER)
        .into_owned();
    html = IMG_TAG_RE
        .replace_all(&html, IMAGE_PLACEHOLDER)
        .into_owned();

    let found_placeholders =
        html.contains(IMAGE_PLACEHOLDER) || html.contains(VIDEO_PLACEHOLDER);

    // Consume the manifest in order, one item per token of the matching
    // kind. Exhausted manifests leave neutral gradient blocks, never
    // the literal token.
    let mut images = manifest.iter().filter(|item| item.kind == MediaKind::Image);
    let mut videos = manifest.iter().filter(|item| item.kind == MediaKind::Video);
    html = IMAGE_TOKEN_RE
        .replace_all(&html, |_: &regex::Captures<'_>| {
            images.next().map_or_else(image_fallback_block, render_image)
        })
        .into_owned();
    html = VIDEO_TOKEN_RE
        .replace_all(&html, |_: &regex::Captures<'_>| {
            videos.next().map_or_else(video_fallback_block, render_video)
        })
        .into_owned();

    // The model ignored media entirely: attach each item at the best
    // available anchor instead of silently losing the user's uploads.
    if !found_placeholders && !manifest.is_empty() {
        tracing::warn!(
            count = manifest.len(),
            "model output contained no media placeholders; inserting strategically"
        );
        html = insert_strategically(html, manifest);
    }

    ensure_document(&html)
}

fn render_image(item: &MediaItem) -> String {
    format!(
        "<img src=\"{}\" alt=\"Document image\" \
         style=\"max-width: 100%; height: auto; border-radius: 12px; \
         box-shadow: 0 8px 32px rgba(0,0,0,0.12); margin: 1.5rem 0; display: block; \
         object-fit: cover;\" onerror=\"this.style.display='none'\" />",
        item.payload
    )
}

fn render_video(item: &MediaItem) -> String {
    format!(
        "<video controls style=\"max-width: 100%; height: auto; border-radius: 12px; \
         box-shadow: 0 8px 32px rgba(0,0,0,0.12); margin: 1.5rem 0; display: block;\" \
         onerror=\"this.style.display='none'\">\
         <source src=\"{}\" type=\"video/mp4\">\
         Your browser does not support the video tag.</video>",
        item.payload
    )
}

fn image_fallback_block() -> String {
    neutral_block("\u{1f4f8} Image")
}

fn video_fallback_block() -> String {
    neutral_block("\u{1f3a5} Video")
}

fn neutral_block(label: &str) -> String {
    format!(
        "<div style=\"width: 100%; height: 200px; \
         background: linear-gradient(135deg, #667eea, #764ba2); border-radius: 12px; \
         display: flex; align-items: center; justify-content: center; color: white; \
         font-size: 1rem; font-weight: 500; margin: 1.5rem 0;\">{label}</div>"
    )
}

/// Attach each manifest item at the first anchor that accepts it: the
/// first h1 (hero position), then successive h2s, then successive
/// paragraphs, then immediately before the closing body tag. Items with
/// no usable anchor are dropped.
fn insert_strategically(mut html: String, manifest: &[MediaItem]) -> String {
    let mut hero_taken = false;
    let mut h2_used = 0;
    let mut p_used = 0;

    for item in manifest {
        let rendered = format!("\n{}", render_media(item));
        if !hero_taken && insert_after_nth(&mut html, "</h1>", 0, &rendered) {
            hero_taken = true;
        } else if insert_after_nth(&mut html, "</h2>", h2_used, &rendered) {
            h2_used += 1;
        } else if insert_after_nth(&mut html, "</p>", p_used, &rendered) {
            p_used += 1;
        } else if !insert_before_first(&mut html, "</body>", &rendered) {
            tracing::warn!(index = item.original_index, "no anchor found; media item dropped");
        }
    }

    html
}

fn render_media(item: &MediaItem) -> String {
    match item.kind {
        MediaKind::Image => render_image(item),
        MediaKind::Video => render_video(item),
    }
}

/// Insert `insertion` directly after the nth occurrence of `tag`
/// (case-insensitive). Returns false when there is no such occurrence.
fn insert_after_nth(html: &mut String, tag: &str, n: usize, insertion: &str) -> bool {
    match find_nth_ignore_case(html, tag, n) {
        Some(position) => {
            html.insert_str(position + tag.len(), insertion);
            true
        }
        None => false,
    }
}

fn insert_before_first(html: &mut String, tag: &str, insertion: &str) -> bool {
    match find_nth_ignore_case(html, tag, 0) {
        Some(position) => {
            html.insert_str(position, insertion);
            true
        }
        None => false,
    }
}

fn find_nth_ignore_case(haystack: &str, needle: &str, n: usize) -> Option<usize> {
    // ASCII lowering keeps byte offsets aligned with the original.
    let lowered = haystack.to_ascii_lowercase();
    let needle = needle.to_ascii_lowercase();
    let mut from = 0;
    let mut remaining = n;
    loop {
        let position = lowered[from..].find(&needle)? + from;
        if remaining == 0 {
            return Some(position);
        }
        remaining -= 1;
        from = position + needle.len();
    }
}

/// Wrap a fragment in a minimal valid shell when the model output does
/// not already begin with a doctype. Applying this twice never nests
/// shells.
fn ensure_document(html: &str) -> String {
    let trimmed = html.trim();
    let has_doctype = trimmed
        .get(..9)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("<!doctype"));
    if has_doctype {
        return trimmed.to_string();
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
         <meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>Generated Website</title>\n\
         <style>\n\
         * {{ margin: 0; padding: 0; box-sizing: border-box; }}\n\
         body {{ font-family: 'Inter', -apple-system, BlinkMacSystemFont, sans-serif; \
         line-height: 1.6; background: linear-gradient(135deg, #f5f7fa 0%, #c3cfe2 100%); \
         min-height: 100vh; }}\n\
         .container {{ max-width: 1200px; margin: 0 auto; padding: 2rem; }}\n\
         .content {{ background: white; padding: 2rem; border-radius: 16px; \
         box-shadow: 0 8px 32px rgba(0,0,0,0.1); line-height: 1.7; }}\n\
         h1, h2, h3 {{ margin-bottom: 1rem; }}\n\
         p {{ margin-bottom: 1rem; }}\n\
         img {{ max-width: 100%; height: auto; border-radius: 12px; margin: 1.5rem 0; }}\n\
         </style>\n</head>\n<body>\n<div class=\"container\">\n<div class=\"content\">\n\
         {trimmed}\n</div>\n</div>\n</body>\n</html>"
    )
}
