use crate::types::{
    ColorScheme, ContentAnalysis, GenerationSettings, NormalizedContent, WebsiteStyle,
    IMAGE_PLACEHOLDER, VIDEO_PLACEHOLDER,
};

/// Hard cap on the composed prompt. Truncation is applied to the task
/// instruction only, never to the standards instruction.
pub const MAX_PROMPT_LENGTH: usize = 15_000;

/// A composed model prompt: a fixed role/standards instruction and a
/// per-request task instruction.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub system: String,
    pub task: String,
}

impl Prompt {
    /// The full prompt text sent to the model as a single user message.
    #[must_use]
    pub fn text(&self) -> String {
        format!("{}\n\n{}", self.system, self.task)
    }

    #[must_use]
    pub fn char_len(&self) -> usize {
        self.system.chars().count() + 2 + self.task.chars().count()
    }
}

/// Fixed role and output-format instruction. The "HTML only, no
/// markdown fences" constraint here is load-bearing: the post-processor
/// relies on it even though it also strips fences defensively.
const STANDARDS_INSTRUCTION: &str = "\
You are an elite full-stack developer and UX designer with 15+ years of experience creating award-winning websites. You specialize in translating any content into stunning, modern websites.

CORE EXPERTISE:
- Modern web design principles and latest UI/UX trends
- Advanced CSS techniques (Grid, Flexbox, animations, micro-interactions)
- Accessibility (WCAG 2.1 AA compliance)
- Performance optimization and mobile-first design
- Brand-aligned color psychology and typography

OUTPUT REQUIREMENTS:
- Generate ONLY a complete, production-ready HTML document with embedded CSS
- NO explanations, markdown formatting, or code fences
- A single self-contained file that works immediately when opened
- Include proper meta tags, responsive design, and accessibility features

TECHNICAL STANDARDS:
- Semantic HTML5 structure
- Modern CSS with custom properties (CSS variables)
- Responsive design that works on all devices (320px to 2560px)
- Smooth animations and micro-interactions
- Proper focus states for accessibility
- Cross-browser compatibility

VISUAL DESIGN:
- Professional typography hierarchy with consistent spacing
- Sophisticated color schemes with proper contrast ratios
- Modern layout patterns (cards, grids, hero sections)
- Subtle shadows, gradients, and visual depth
- White space as a design element";

/// Build the bounded instruction payload for one generation request.
///
/// The analyzer's output, when present, biases the section structure
/// and visual choices; it is advisory and may be omitted.
#[must_use]
pub fn compose(
    content: &NormalizedContent,
    settings: &GenerationSettings,
    analysis: Option<&ContentAnalysis>,
) -> Prompt {
    let mut task = format!(
        "Transform this content into a {} website with a {} color scheme:\n\n\
         CONTENT TO TRANSFORM:\n{}\n\n\
         STYLE REQUIREMENTS:\n\
         - Style: {}{}\n\
         - Color Scheme: {}{}\n\
         - Include Navigation: {}\n\
         - Include Table of Contents: {}\n",
        settings.style.as_str(),
        settings.color_scheme.as_str(),
        content.text,
        settings.style.as_str(),
        style_definition(settings.style),
        settings.color_scheme.as_str(),
        color_definition(settings.color_scheme),
        settings.include_navigation,
        settings.include_toc,
    );

    if settings.include_navigation && !settings.navigation_items.is_empty() {
        task.push_str(&format!(
            "- Navigation Items (use these exact labels, in this exact order): {}\n",
            settings.navigation_items.join(", ")
        ));
    }
    if let Some(instructions) = settings
        .custom_instructions
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        task.push_str(&format!("- Special Instructions: {instructions}\n"));
    }

    if let Some(analysis) = analysis {
        task.push('\n');
        task.push_str("CONTENT INSIGHTS (from prior analysis):\n");
        task.push_str(&format!("- Analysis: {}\n", analysis.content_analysis));
        if let Some(content_type) = &analysis.content_type {
            task.push_str(&format!("- Content Type: {content_type}\n"));
        }
        if let Some(audience) = &analysis.target_audience {
            task.push_str(&format!("- Target Audience: {audience}\n"));
        }
        if !analysis.key_themes.is_empty() {
            task.push_str(&format!(
                "- Key Themes: {}\n",
                analysis.key_themes.join(", ")
            ));
        }
        if !analysis.suggested_sections.is_empty() {
            task.push_str(&format!(
                "- Suggested Sections: {}\n",
                analysis.suggested_sections.join(", ")
            ));
        }
        if !analysis.call_to_actions.is_empty() {
            task.push_str(&format!(
                "- Calls To Action: {}\n",
                analysis.call_to_actions.join(", ")
            ));
        }
    }

    task.push('\n');
    task.push_str(&media_instruction(content));

    let mut prompt = Prompt {
        system: STANDARDS_INSTRUCTION.to_string(),
        task,
    };

    if prompt.char_len() > MAX_PROMPT_LENGTH {
        let budget = MAX_PROMPT_LENGTH
            .saturating_sub(prompt.system.chars().count() + 2)
            .saturating_sub(3);
        let mut truncated: String = prompt.task.chars().take(budget).collect();
        truncated.push_str("...");
        prompt.task = truncated;
        tracing::debug!(len = prompt.char_len(), "truncated task instruction");
    }

    prompt
}

/// The placeholder mandate the post-processor depends on. When the
/// manifest is empty the mandate is replaced with an explicit
/// prohibition on invented image URLs; without that branch the model
/// tends to hallucinate broken external links.
fn media_instruction(content: &NormalizedContent) -> String {
    if content.has_media() {
        let images = content
            .media_manifest
            .iter()
            .filter(|item| item.kind == crate::types::MediaKind::Image)
            .count();
        let videos = content.media_manifest.len() - images;
        format!(
            "MEDIA PLACEMENT:\n\
             The document contains {images} image(s) and {videos} video(s). For every image, \
             emit an <img> tag whose src attribute is exactly the literal string {IMAGE_PLACEHOLDER}. \
             For every video, emit a <video> tag whose <source> src is exactly the literal string \
             {VIDEO_PLACEHOLDER}. Emit each placeholder exactly as written, once per media item, \
             placed where the media best supports the content. Do NOT use any other image or video \
             URLs.\n"
        )
    } else {
        "MEDIA PLACEMENT:\n\
         The document contains no embedded media. Do not reference external image or video URLs; \
         either omit imagery entirely or use CSS-only decorative elements (gradients, shapes, \
         iconography via Unicode).\n"
            .to_string()
    }
}

/// Style definitions embedded into the task instruction.
fn style_definition(style: WebsiteStyle) -> &'static str {
    match style {
        WebsiteStyle::Modern => {
            "\n  \u{2022} Clean, contemporary design with subtle animations\
             \n  \u{2022} Glassmorphism effects and gradient backgrounds\
             \n  \u{2022} Rounded corners (8px-16px), soft shadows\
             \n  \u{2022} Card-based layouts with ample whitespace"
        }
        WebsiteStyle::Minimal => {
            "\n  \u{2022} Extreme simplicity with maximum impact\
             \n  \u{2022} Monochromatic or limited color palette\
             \n  \u{2022} Abundant whitespace and clean typography\
             \n  \u{2022} Focus on content hierarchy and readability"
        }
        WebsiteStyle::Professional => {
            "\n  \u{2022} Corporate and trustworthy appearance\
             \n  \u{2022} Conservative color palette (blues, grays, whites)\
             \n  \u{2022} Structured layouts with clear sections\
             \n  \u{2022} Traditional typography and formal styling"
        }
        WebsiteStyle::Creative => {
            "\n  \u{2022} Bold, artistic, and expressive design\
             \n  \u{2022} Vibrant colors and unique compositions\
             \n  \u{2022} Asymmetrical layouts and creative typography\
             \n  \u{2022} Artistic freedom while maintaining usability"
        }
        WebsiteStyle::Blog => {
            "\n  \u{2022} Content-first design optimized for reading\
             \n  \u{2022} Typography-focused with excellent readability\
             \n  \u{2022} Article-style layouts with proper spacing\
             \n  \u{2022} Reading-friendly color schemes and fonts"
        }
    }
}

/// Palette definitions embedded into the task instruction.
fn color_definition(scheme: ColorScheme) -> &'static str {
    match scheme {
        ColorScheme::Blue => {
            "\n  \u{2022} Primary: #2563eb, #3b82f6; Secondary: #dbeafe, #bfdbfe\
             \n  \u{2022} Accent: #1d4ed8, #1e40af; Background: #ffffff, #f8fafc"
        }
        ColorScheme::Purple => {
            "\n  \u{2022} Primary: #7c3aed, #8b5cf6; Secondary: #ede9fe, #ddd6fe\
             \n  \u{2022} Accent: #6d28d9, #5b21b6; Background: #ffffff, #faf5ff"
        }
        ColorScheme::Green => {
            "\n  \u{2022} Primary: #059669, #10b981; Secondary: #d1fae5, #a7f3d0\
             \n  \u{2022} Accent: #047857, #065f46; Background: #ffffff, #f0fdf4"
        }
        ColorScheme::Orange => {
            "\n  \u{2022} Primary: #ea580c, #f97316; Secondary: #fed7aa, #fdba74\
             \n  \u{2022} Accent: #c2410c, #9a3412; Background: #ffffff, #fff7ed"
        }
        ColorScheme::Dark => {
            "\n  \u{2022} Primary: #374151, #4b5563; Secondary: #1f2937, #111827\
             \n  \u{2022} Accent: #6366f1, #8b5cf6; Background: #111827, #1f2937"
        }
        ColorScheme::Monochrome => {
            "\n  \u{2022} Primary: #000000, #ffffff; Secondary: #f3f4f6, #e5e7eb\
             \n  \u{2022} Accent: #6b7280, #374151; Background: #ffffff, #f9fafb"
        }
        ColorScheme::Sunset => {
            "\n  \u{2022} Primary: #f59e0b, #f97316; Secondary: #fef3c7, #fed7aa\
             \n  \u{2022} Accent: #dc2626, #be185d; Background: #ffffff, #fffbeb"
        }
        ColorScheme::Ocean => {
            "\n  \u{2022} Primary: #0891b2, #06b6d4; Secondary: #cffafe, #a5f3fc\
             \n  \u{2022} Accent: #0e7490, #155e75; Background: #ffffff, #f0fdff"
        }
        ColorScheme::Forest => {
            "\n  \u{2022} Primary: #16a34a, #22c55e; Secondary: #dcfce7, #bbf7d0\
             \n  \u{2022} Accent: #15803d, #166534; Background: #ffffff, #f0fdf4"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MediaItem, MediaKind};

    fn content_with_media(count: usize) -> NormalizedContent {
        NormalizedContent {
            text: "# Hello\n\nSome content".to_string(),
            media_manifest: (0..count)
                .map(|i| MediaItem::new(MediaKind::Image, format!("data:image/png;base64,{i}"), i))
                .collect(),
            placeholder_count: count,
        }
    }

    #[test]
    fn placeholder_mandate_present_when_manifest_nonempty() {
        let prompt = compose(
            &content_with_media(2),
            &GenerationSettings::default(),
            None,
        );
        assert!(prompt.task.contains(IMAGE_PLACEHOLDER));
        assert!(prompt.task.contains("2 image(s)"));
    }

    #[test]
    fn empty_manifest_prohibits_invented_urls() {
        let prompt = compose(
            &content_with_media(0),
            &GenerationSettings::default(),
            None,
        );
        assert!(!prompt.task.contains(IMAGE_PLACEHOLDER));
        assert!(prompt.task.contains("no embedded media"));
    }

    #[test]
    fn navigation_items_appear_verbatim_in_order() {
        let settings = GenerationSettings {
            include_navigation: true,
            navigation_items: vec!["Home".into(), "About Us".into(), "Contact".into()],
            ..GenerationSettings::default()
        };
        let prompt = compose(&content_with_media(0), &settings, None);
        assert!(prompt.task.contains("Home, About Us, Contact"));
    }

    #[test]
    fn navigation_items_omitted_when_navigation_disabled() {
        let settings = GenerationSettings {
            include_navigation: false,
            navigation_items: vec!["Home".into()],
            ..GenerationSettings::default()
        };
        let prompt = compose(&content_with_media(0), &settings, None);
        assert!(!prompt.task.contains("Navigation Items"));
    }

    #[test]
    fn analysis_biases_the_task_instruction() {
        let analysis = ContentAnalysis {
            target_audience: Some("early-stage founders".to_string()),
            key_themes: vec!["fundraising".to_string(), "growth".to_string()],
            ..ContentAnalysis::default()
        };
        let prompt = compose(
            &content_with_media(0),
            &GenerationSettings::default(),
            Some(&analysis),
        );
        assert!(prompt.task.contains("early-stage founders"));
        assert!(prompt.task.contains("fundraising, growth"));
    }

    #[test]
    fn prompt_is_capped_and_standards_survive_truncation() {
        let mut content = content_with_media(0);
        content.text = "x".repeat(40_000);
        let settings = GenerationSettings {
            custom_instructions: Some("y".repeat(10_000)),
            ..GenerationSettings::default()
        };
        let prompt = compose(&content, &settings, None);
        assert!(prompt.char_len() <= MAX_PROMPT_LENGTH);
        assert_eq!(prompt.system, STANDARDS_INSTRUCTION);
        assert!(prompt.task.ends_with("..."));
    }
}
