use crate::types::{Block, BlockKind, InlineContent};
use serde::{Deserialize, Serialize};

/// Settings for the deterministic template publisher. This is the
/// second, simpler publication mode, independent of AI generation; the
/// two artifacts may coexist on one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteSettings {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<String>,
    #[serde(default)]
    pub show_author: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    /// Resolved to the light palette; browsers without scripting cannot
    /// switch palettes in a static artifact.
    Auto,
}

/// Render a block tree straight to a themed, self-contained HTML page.
/// No model involvement, fully deterministic.
#[must_use]
pub fn render_website(blocks: &[Block], settings: &WebsiteSettings) -> String {
    let title = escape_html(&settings.title);
    let css = generate_css(settings.theme, settings.custom_css.as_deref());
    let content = render_blocks(blocks);
    let meta = meta_tags(settings);

    let author = if settings.show_author {
        settings.author_name.as_deref().map_or_else(String::new, |name| {
            format!(
                "<p class=\"website-author\">By {}</p>\n",
                escape_html(name)
            )
        })
    } else {
        String::new()
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
<meta charset=\"UTF-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
<title>{title}</title>\n\
{meta}\
<style>\n{css}</style>\n</head>\n<body>\n\
<div class=\"website-container\">\n\
<header class=\"website-header\">\n<h1 class=\"website-title\">{title}</h1>\n{author}</header>\n\
<main class=\"website-content\">\n{content}\n</main>\n\
<footer class=\"website-footer\">\n\
<p>Generated with <a href=\"https://worknest.app\" target=\"_blank\" rel=\"noopener\">WorkNest</a> \
- Collaborative Document Editor</p>\n\
</footer>\n\
</div>\n</body>\n</html>"
    )
}

/// Convert a block sequence, grouping consecutive list items into a
/// single list element.
fn render_blocks(blocks: &[Block]) -> String {
    let mut html = Vec::new();
    let mut index = 0;
    while index < blocks.len() {
        let block = &blocks[index];
        match block.kind {
            BlockKind::BulletListItem | BlockKind::NumberedListItem => {
                let kind = block.kind;
                let tag = if kind == BlockKind::BulletListItem {
                    "ul"
                } else {
                    "ol"
                };
                let mut items = Vec::new();
                while index < blocks.len() && blocks[index].kind == kind {
                    items.push(format!("<li>{}</li>", render_inline(&blocks[index].content)));
                    index += 1;
                }
                html.push(format!("<{tag}>{}</{tag}>", items.join("")));
            }
            _ => {
                html.push(render_block(block));
                index += 1;
            }
        }
    }
    html.join("\n")
}

fn render_block(block: &Block) -> String {
    let inline = render_inline(&block.content);
    match block.kind {
        BlockKind::Heading => {
            let level = block.props.level.unwrap_or(1).clamp(1, 6);
            format!("<h{level}>{inline}</h{level}>")
        }
        BlockKind::Quote => format!("<blockquote>{inline}</blockquote>"),
        BlockKind::Code => format!("<pre><code>{inline}</code></pre>"),
        BlockKind::Image => {
            let url = block.props.url.as_deref().unwrap_or_default();
            let caption = block.props.caption.as_deref().unwrap_or_default();
            format!(
                "<img src=\"{}\" alt=\"{}\" />",
                escape_attribute(url),
                escape_html(caption)
            )
        }
        BlockKind::Video => {
            let url = block.props.url.as_deref().unwrap_or_default();
            format!(
                "<video controls><source src=\"{}\">Your browser does not support the video \
                 tag.</video>",
                escape_attribute(url)
            )
        }
        // List items reaching here were not grouped; render them bare.
        BlockKind::BulletListItem | BlockKind::NumberedListItem => format!("<li>{inline}</li>"),
        BlockKind::Paragraph | BlockKind::Unknown => format!("<p>{inline}</p>"),
    }
}

fn render_inline(content: &[InlineContent]) -> String {
    content
        .iter()
        .map(|item| match item {
            InlineContent::Text(text) => escape_html(text),
            InlineContent::Span(span) => {
                let mut html = escape_html(span.text.as_deref().unwrap_or_default());
                if span.has_style("code") {
                    html = format!("<code>{html}</code>");
                }
                if span.has_style("strike") {
                    html = format!("<del>{html}</del>");
                }
                if span.has_style("underline") {
                    html = format!("<u>{html}</u>");
                }
                if span.has_style("italic") {
                    html = format!("<em>{html}</em>");
                }
                if span.has_style("bold") {
                    html = format!("<strong>{html}</strong>");
                }
                html
            }
        })
        .collect()
}

fn meta_tags(settings: &WebsiteSettings) -> String {
    let title = escape_attribute(&settings.title);
    let description = escape_attribute(
        settings
            .description
            .as_deref()
            .unwrap_or(settings.title.as_str()),
    );
    format!(
        "<meta name=\"description\" content=\"{description}\">\n\
         <meta property=\"og:title\" content=\"{title}\">\n\
         <meta property=\"og:description\" content=\"{description}\">\n\
         <meta property=\"og:type\" content=\"website\">\n\
         <meta name=\"twitter:card\" content=\"summary\">\n\
         <meta name=\"twitter:title\" content=\"{title}\">\n\
         <meta name=\"twitter:description\" content=\"{description}\">\n"
    )
}

fn generate_css(theme: Theme, custom_css: Option<&str>) -> String {
    let is_dark = theme == Theme::Dark;
    let primary = if is_dark { "#6366f1" } else { "#4f46e5" };
    let background = if is_dark { "#0f0f23" } else { "#ffffff" };
    let text = if is_dark { "#e2e8f0" } else { "#1e293b" };
    let border = if is_dark { "#1e293b" } else { "#e2e8f0" };
    let code_background = if is_dark { "#1e1b4b" } else { "#f8fafc" };
    let muted = if is_dark { "#94a3b8" } else { "#64748b" };

    let mut css = format!(
        "* {{ margin: 0; padding: 0; box-sizing: border-box; }}\n\
body {{\n\
  font-family: 'Inter', -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;\n\
  line-height: 1.7; color: {text}; background: {background};\n\
}}\n\
.website-container {{ max-width: 900px; margin: 0 auto; padding: 3rem 2rem; min-height: 100vh; \
display: flex; flex-direction: column; }}\n\
.website-header {{ text-align: center; margin-bottom: 4rem; padding: 3rem 0; \
border-radius: 24px; border: 1px solid {border}; }}\n\
.website-title {{ font-size: 3.5rem; font-weight: 800; margin-bottom: 1rem; \
background: linear-gradient(135deg, {primary}, #a855f7); -webkit-background-clip: text; \
-webkit-text-fill-color: transparent; background-clip: text; line-height: 1.1; }}\n\
.website-author {{ font-size: 1.2rem; color: {muted}; font-weight: 500; }}\n\
.website-content {{ flex: 1; font-size: 1.125rem; border-radius: 20px; padding: 3rem; \
border: 1px solid {border}; }}\n\
.website-content h1 {{ font-size: 2.5rem; font-weight: 700; margin: 3rem 0 1.5rem 0; }}\n\
.website-content h2 {{ font-size: 2rem; font-weight: 600; margin: 2.5rem 0 1rem 0; }}\n\
.website-content h3 {{ font-size: 1.5rem; font-weight: 600; margin: 2rem 0 0.75rem 0; }}\n\
.website-content p {{ margin-bottom: 1.5rem; line-height: 1.8; }}\n\
.website-content ul, .website-content ol {{ margin: 1.5rem 0; padding-left: 2.5rem; }}\n\
.website-content li {{ margin-bottom: 0.75rem; }}\n\
.website-content ul li::marker {{ color: {primary}; }}\n\
.website-content blockquote {{ border-left: 4px solid {primary}; padding: 1.5rem 2rem; \
margin: 2rem 0; font-style: italic; color: {muted}; border-radius: 0 12px 12px 0; }}\n\
.website-content code {{ background: {code_background}; padding: 0.25rem 0.5rem; \
border-radius: 6px; font-family: 'JetBrains Mono', Menlo, monospace; font-size: 0.875rem; \
border: 1px solid {border}; }}\n\
.website-content pre {{ background: {code_background}; padding: 1.5rem; border-radius: 12px; \
overflow-x: auto; margin: 2rem 0; border: 1px solid {border}; }}\n\
.website-content pre code {{ background: none; padding: 0; border: none; }}\n\
.website-content img {{ max-width: 100%; height: auto; border-radius: 16px; margin: 2rem 0; }}\n\
.website-footer {{ text-align: center; margin-top: 4rem; padding: 2rem 0; color: {muted}; \
font-size: 0.875rem; border-top: 1px solid {border}; }}\n\
.website-footer a {{ color: {primary}; text-decoration: none; font-weight: 500; }}\n\
html {{ scroll-behavior: smooth; }}\n\
@media (max-width: 768px) {{\n\
  .website-container {{ padding: 1.5rem 1rem; }}\n\
  .website-title {{ font-size: 2.5rem; }}\n\
  .website-content {{ font-size: 1rem; padding: 2rem 1.5rem; }}\n\
}}\n"
    );

    if let Some(custom) = custom_css {
        css.push_str(custom);
        css.push('\n');
    }
    css
}

/// Minimal HTML text escaping shared by the deterministic renderers.
#[must_use]
pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn escape_attribute(text: &str) -> String {
    escape_html(text).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlockProps, InlineSpan};
    use serde_json::Value;
    use std::collections::HashMap;

    fn settings() -> WebsiteSettings {
        WebsiteSettings {
            title: "My Site".into(),
            description: None,
            theme: Theme::Light,
            custom_css: None,
            show_author: false,
            author_name: None,
        }
    }

    fn text_block(kind: BlockKind, text: &str) -> Block {
        Block {
            kind,
            content: vec![InlineContent::Text(text.to_string())],
            ..Block::default()
        }
    }

    fn styled_span(text: &str, styles: &[&str]) -> InlineContent {
        let mut map = HashMap::new();
        for style in styles {
            map.insert((*style).to_string(), Value::Bool(true));
        }
        InlineContent::Span(InlineSpan {
            kind: Some("text".into()),
            text: Some(text.into()),
            styles: Some(map),
        })
    }

    #[test]
    fn consecutive_list_items_are_grouped() {
        let blocks = vec![
            text_block(BlockKind::BulletListItem, "one"),
            text_block(BlockKind::BulletListItem, "two"),
            text_block(BlockKind::NumberedListItem, "three"),
            text_block(BlockKind::Paragraph, "tail"),
        ];
        let html = render_website(&blocks, &settings());
        assert!(html.contains("<ul><li>one</li><li>two</li></ul>"));
        assert!(html.contains("<ol><li>three</li></ol>"));
        assert!(html.contains("<p>tail</p>"));
    }

    #[test]
    fn heading_level_is_clamped() {
        let mut block = text_block(BlockKind::Heading, "Deep");
        block.props = BlockProps {
            level: Some(9),
            ..BlockProps::default()
        };
        let html = render_website(&[block], &settings());
        assert!(html.contains("<h6>Deep</h6>"));
    }

    #[test]
    fn inline_styles_nest_strongest_outermost() {
        let block = Block {
            kind: BlockKind::Paragraph,
            content: vec![styled_span("hi", &["bold", "italic"])],
            ..Block::default()
        };
        let html = render_website(&[block], &settings());
        assert!(html.contains("<strong><em>hi</em></strong>"));
    }

    #[test]
    fn image_attributes_are_escaped() {
        let block = Block {
            kind: BlockKind::Image,
            props: BlockProps {
                url: Some("https://example.com/a.png?x=\"y\"".into()),
                caption: Some("a <caption>".into()),
                ..BlockProps::default()
            },
            ..Block::default()
        };
        let html = render_website(&[block], &settings());
        assert!(html.contains("&quot;y&quot;"));
        assert!(html.contains("a &lt;caption&gt;"));
    }

    #[test]
    fn dark_theme_switches_palette() {
        let mut dark = settings();
        dark.theme = Theme::Dark;
        let html = render_website(&[], &dark);
        assert!(html.contains("background: #0f0f23"));
        let light = render_website(&[], &settings());
        assert!(light.contains("background: #ffffff"));
    }

    #[test]
    fn custom_css_is_appended() {
        let mut with_css = settings();
        with_css.custom_css = Some(".brand { color: red; }".into());
        let html = render_website(&[], &with_css);
        assert!(html.contains(".brand { color: red; }"));
    }

    #[test]
    fn meta_tags_fall_back_to_title() {
        let html = render_website(&[], &settings());
        assert!(html.contains("<meta property=\"og:title\" content=\"My Site\">"));
        assert!(html.contains("<meta name=\"description\" content=\"My Site\">"));
    }

    #[test]
    fn author_shown_only_when_requested() {
        let mut with_author = settings();
        with_author.show_author = true;
        with_author.author_name = Some("Ada".into());
        let html = render_website(&[], &with_author);
        assert!(html.contains("By Ada"));

        let without = render_website(&[], &settings());
        assert!(!without.contains("website-author\">By"));
    }
}
