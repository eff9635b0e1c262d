use crate::template::escape_html;
use crate::types::{ColorScheme, GenerationSettings};

/// Fixed palette backing the fallback page, keyed by `ColorScheme`.
struct Palette {
    primary: &'static str,
    secondary: &'static str,
    accent: &'static str,
    light: &'static str,
    text: &'static str,
}

fn palette(scheme: ColorScheme) -> Palette {
    match scheme {
        ColorScheme::Blue => Palette {
            primary: "#2563eb",
            secondary: "#3b82f6",
            accent: "#1d4ed8",
            light: "#eff6ff",
            text: "#1e293b",
        },
        ColorScheme::Purple => Palette {
            primary: "#7c3aed",
            secondary: "#8b5cf6",
            accent: "#6d28d9",
            light: "#f3e8ff",
            text: "#1e293b",
        },
        ColorScheme::Green => Palette {
            primary: "#059669",
            secondary: "#10b981",
            accent: "#047857",
            light: "#ecfdf5",
            text: "#1e293b",
        },
        ColorScheme::Orange => Palette {
            primary: "#ea580c",
            secondary: "#f97316",
            accent: "#c2410c",
            light: "#fff7ed",
            text: "#1e293b",
        },
        ColorScheme::Dark => Palette {
            primary: "#374151",
            secondary: "#4b5563",
            accent: "#6366f1",
            light: "#f9fafb",
            text: "#111827",
        },
        ColorScheme::Monochrome => Palette {
            primary: "#111827",
            secondary: "#374151",
            accent: "#6b7280",
            light: "#f9fafb",
            text: "#0f172a",
        },
        ColorScheme::Sunset => Palette {
            primary: "#f59e0b",
            secondary: "#f97316",
            accent: "#dc2626",
            light: "#fffbeb",
            text: "#1e293b",
        },
        ColorScheme::Ocean => Palette {
            primary: "#0891b2",
            secondary: "#06b6d4",
            accent: "#0e7490",
            light: "#f0fdff",
            text: "#1e293b",
        },
        ColorScheme::Forest => Palette {
            primary: "#16a34a",
            secondary: "#22c55e",
            accent: "#15803d",
            light: "#f0fdf4",
            text: "#1e293b",
        },
    }
}

/// Deterministic terminal path of the pipeline: a fixed-structure page
/// (hero banner, content card with the normalized text, three-feature
/// grid, footer) that guarantees some valid HTML is always produced.
///
/// Pure function, no I/O, cannot fail.
#[must_use]
pub fn render_fallback(title: &str, normalized_text: &str, settings: &GenerationSettings) -> String {
    let colors = palette(settings.color_scheme);
    let title = escape_html(title);
    let content = if normalized_text.trim().len() > 100 {
        escape_html(normalized_text)
    } else {
        "This website was generated from your document content. Add more content to the \
         document and regenerate to see it reflected here."
            .to_string()
    };

    let navigation = if settings.include_navigation && !settings.navigation_items.is_empty() {
        let links: String = settings
            .navigation_items
            .iter()
            .map(|item| {
                let label = escape_html(item);
                let anchor = item.to_lowercase().replace(char::is_whitespace, "-");
                format!("<li><a href=\"#{anchor}\">{label}</a></li>")
            })
            .collect();
        format!(
            "<header class=\"header\">\n<nav class=\"nav container\">\n\
             <a href=\"#\" class=\"logo\">{title}</a>\n<ul class=\"nav-links\">{links}</ul>\n\
             </nav>\n</header>\n"
        )
    } else {
        String::new()
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
<meta charset=\"UTF-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
<meta name=\"description\" content=\"{title}\">\n\
<title>{title}</title>\n\
<style>\n\
* {{ margin: 0; padding: 0; box-sizing: border-box; }}\n\
:root {{\n\
  --primary: {primary};\n\
  --secondary: {secondary};\n\
  --accent: {accent};\n\
  --light: {light};\n\
  --text: {text};\n\
}}\n\
html {{ scroll-behavior: smooth; }}\n\
body {{\n\
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;\n\
  line-height: 1.6; color: var(--text);\n\
  background: linear-gradient(135deg, var(--light) 0%, #ffffff 100%);\n\
  min-height: 100vh;\n\
}}\n\
.container {{ max-width: 1200px; margin: 0 auto; padding: 0 2rem; }}\n\
.header {{ background: #ffffff; border-bottom: 1px solid rgba(0,0,0,0.1); position: sticky; top: 0; z-index: 100; }}\n\
.nav {{ display: flex; justify-content: space-between; align-items: center; padding: 1rem 0; }}\n\
.logo {{ font-size: 1.5rem; font-weight: 700; color: var(--primary); text-decoration: none; }}\n\
.nav-links {{ display: flex; gap: 2rem; list-style: none; }}\n\
.nav-links a {{ color: var(--text); text-decoration: none; font-weight: 500; }}\n\
.nav-links a:hover {{ color: var(--primary); }}\n\
.hero {{ background: linear-gradient(135deg, var(--primary), var(--secondary)); color: #ffffff; padding: 6rem 0; text-align: center; }}\n\
.hero h1 {{ font-size: clamp(2.5rem, 5vw, 4rem); font-weight: 800; margin-bottom: 1.5rem; letter-spacing: -0.02em; }}\n\
.hero p {{ font-size: 1.25rem; margin-bottom: 2rem; opacity: 0.9; max-width: 600px; margin-left: auto; margin-right: auto; }}\n\
.cta-button {{ display: inline-block; background: #ffffff; color: var(--primary); padding: 1rem 2rem; border-radius: 50px; text-decoration: none; font-weight: 600; box-shadow: 0 10px 30px rgba(0,0,0,0.2); }}\n\
.main {{ padding: 4rem 0; }}\n\
.content-section {{ background: #ffffff; border-radius: 20px; padding: 3rem; margin-bottom: 2rem; box-shadow: 0 10px 40px rgba(0,0,0,0.08); }}\n\
.content-section h2 {{ color: var(--primary); font-size: 2.5rem; font-weight: 700; margin-bottom: 1.5rem; }}\n\
.content-grid {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(300px, 1fr)); gap: 2rem; margin: 3rem 0; }}\n\
.card {{ background: var(--light); padding: 2rem; border-radius: 16px; }}\n\
.card h3 {{ color: var(--accent); font-size: 1.25rem; margin-bottom: 0.75rem; }}\n\
.document-text {{ white-space: pre-wrap; font-family: Georgia, serif; line-height: 1.8; font-size: 1.1rem; color: var(--text); }}\n\
.footer {{ background: var(--text); color: #ffffff; text-align: center; padding: 3rem 0; margin-top: 4rem; }}\n\
.footer p {{ opacity: 0.8; }}\n\
@media (max-width: 768px) {{\n\
  .container {{ padding: 0 1rem; }}\n\
  .hero {{ padding: 4rem 0; }}\n\
  .content-section {{ padding: 2rem; }}\n\
  .content-grid {{ grid-template-columns: 1fr; }}\n\
}}\n\
</style>\n</head>\n<body>\n\
{navigation}\
<section class=\"hero\">\n<div class=\"container\">\n\
<h1>{title}</h1>\n\
<p>A website generated from your WorkNest document.</p>\n\
<a href=\"#content\" class=\"cta-button\">Explore</a>\n\
</div>\n</section>\n\
<main class=\"main container\" id=\"content\">\n\
<div class=\"content-section\">\n\
<h2>Welcome to {title}</h2>\n\
<div class=\"content-grid\">\n\
<div class=\"card\"><h3>Modern Design</h3><p>Built with current design principles for an \
exceptional reading experience.</p></div>\n\
<div class=\"card\"><h3>Fully Responsive</h3><p>Optimized for all devices, from phones to \
desktop displays.</p></div>\n\
<div class=\"card\"><h3>Always Available</h3><p>Published as a single self-contained page \
with no external dependencies.</p></div>\n\
</div>\n\
<div class=\"document-text\">{content}</div>\n\
</div>\n</main>\n\
<footer class=\"footer\">\n<div class=\"container\">\n\
<p>&copy; {title}. Published with WorkNest.</p>\n\
</div>\n</footer>\n\
</body>\n</html>",
        primary = colors.primary,
        secondary = colors.secondary,
        accent = colors.accent,
        light = colors.light,
        text = colors.text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WebsiteStyle;

    fn settings(scheme: ColorScheme) -> GenerationSettings {
        GenerationSettings {
            style: WebsiteStyle::Modern,
            color_scheme: scheme,
            ..GenerationSettings::default()
        }
    }

    #[test]
    fn renders_title_and_content() {
        let text = "x".repeat(150);
        let html = render_fallback("Launch Plan", &text, &settings(ColorScheme::Blue));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Launch Plan</h1>"));
        assert!(html.contains(&text));
    }

    #[test]
    fn short_content_gets_a_default_blurb() {
        let html = render_fallback("Doc", "short", &settings(ColorScheme::Blue));
        assert!(html.contains("generated from your document content"));
    }

    #[test]
    fn palette_follows_color_scheme() {
        let green = render_fallback("Doc", "", &settings(ColorScheme::Green));
        assert!(green.contains("--primary: #059669"));
        let ocean = render_fallback("Doc", "", &settings(ColorScheme::Ocean));
        assert!(ocean.contains("--primary: #0891b2"));
    }

    #[test]
    fn navigation_renders_requested_items() {
        let with_nav = GenerationSettings {
            include_navigation: true,
            navigation_items: vec!["Home".into(), "Our Team".into()],
            ..GenerationSettings::default()
        };
        let html = render_fallback("Doc", "", &with_nav);
        assert!(html.contains("<a href=\"#our-team\">Our Team</a>"));
    }

    #[test]
    fn html_in_title_is_escaped() {
        let html = render_fallback("<script>alert(1)</script>", "", &settings(ColorScheme::Blue));
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn output_is_deterministic() {
        let a = render_fallback("Doc", "content text", &settings(ColorScheme::Sunset));
        let b = render_fallback("Doc", "content text", &settings(ColorScheme::Sunset));
        assert_eq!(a, b);
    }
}
