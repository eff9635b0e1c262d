use crate::{
    model::{GenerateRequest, GenerativeModel},
    types::{ColorScheme, ContentAnalysis, NormalizedContent, WebsiteStyle},
};
use serde::Deserialize;

/// Analysis runs cool and short; it only has to emit a small JSON
/// object.
pub const ANALYSIS_TEMPERATURE: f32 = 0.2;
pub const ANALYSIS_MAX_TOKENS: u32 = 1000;

/// Loose shape of the model's JSON answer. Everything is optional so a
/// partially-conforming answer still contributes what it can.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisResponse {
    suggested_style: Option<String>,
    suggested_color_scheme: Option<String>,
    content_analysis: Option<String>,
    content_type: Option<String>,
    target_audience: Option<String>,
    #[serde(default)]
    key_themes: Vec<String>,
    #[serde(default)]
    suggested_sections: Vec<String>,
    #[serde(default)]
    call_to_actions: Vec<String>,
}

/// Classify a document to steer the prompt composer and surface
/// user-facing suggestions.
///
/// Non-fatal by contract: any model or parse failure yields the neutral
/// default instead of an error. The result is advisory only.
pub async fn analyze(model: &dyn GenerativeModel, content: &NormalizedContent) -> ContentAnalysis {
    let request = GenerateRequest {
        prompt: analysis_prompt(content),
        temperature: ANALYSIS_TEMPERATURE,
        max_tokens: ANALYSIS_MAX_TOKENS,
    };

    let raw = match model.generate_text(request).await {
        Ok(raw) => raw,
        Err(error) => {
            tracing::warn!(kind = error.kind(), error = %error, "content analysis failed");
            return ContentAnalysis::default();
        }
    };

    parse_analysis(&raw).unwrap_or_else(|| {
        tracing::warn!("content analysis returned unparseable JSON");
        ContentAnalysis::default()
    })
}

fn parse_analysis(raw: &str) -> Option<ContentAnalysis> {
    // The prompt asks for bare JSON but the model may still wrap it in
    // fences.
    let cleaned = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let response: AnalysisResponse = serde_json::from_str(cleaned).ok()?;
    Some(ContentAnalysis {
        suggested_style: response
            .suggested_style
            .as_deref()
            .map_or(WebsiteStyle::Modern, WebsiteStyle::from_suggestion),
        suggested_color_scheme: response
            .suggested_color_scheme
            .as_deref()
            .map_or(ColorScheme::Blue, ColorScheme::from_suggestion),
        content_analysis: response
            .content_analysis
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| "Content analysis unavailable".to_string()),
        content_type: response.content_type,
        target_audience: response.target_audience,
        key_themes: response.key_themes,
        suggested_sections: response.suggested_sections,
        call_to_actions: response.call_to_actions,
    })
}

fn analysis_prompt(content: &NormalizedContent) -> String {
    format!(
        "You are an expert UX strategist and brand consultant. Analyze this document content \
         and provide intelligent recommendations for website design.\n\n\
         ANALYSIS FRAMEWORK:\n\
         1. Content Purpose: What is the main goal/objective?\n\
         2. Target Audience: Who is this content meant for?\n\
         3. Brand Personality: What tone and feeling should the design convey?\n\
         4. Content Type: Is this business, creative, technical, personal, etc.?\n\
         5. Key Messages: What are the most important points to highlight?\n\n\
         DOCUMENT CONTENT:\n{}\n\n\
         STYLE RECOMMENDATION (pick one): 'modern' for clean contemporary content, 'minimal' \
         for content that needs focus, 'professional' for corporate or formal content, \
         'creative' for artistic content, 'blog' for reading-focused material.\n\n\
         COLOR SCHEME RECOMMENDATION (pick one): 'blue' for trust and technology, 'green' for \
         growth and sustainability, 'purple' for creativity and luxury, 'orange' for energy \
         and warmth, 'ocean' for balance and modern tech, 'sunset' for warmth and optimism, \
         'forest' for nature, 'dark' for bold contrast, 'monochrome' for restraint.\n\n\
         Return ONLY a JSON object with this exact structure:\n\
         {{\n\
           \"suggestedStyle\": \"style_name\",\n\
           \"suggestedColorScheme\": \"color_name\",\n\
           \"contentAnalysis\": \"A 2-3 sentence analysis explaining why these choices work \
         best for this content, including insights about the target audience and purpose.\",\n\
           \"contentType\": \"short label\",\n\
           \"targetAudience\": \"short description\",\n\
           \"keyThemes\": [\"theme\"],\n\
           \"suggestedSections\": [\"section\"],\n\
           \"callToActions\": [\"cta\"]\n\
         }}",
        content.text
    )
}
