use crate::{
    analyze::analyze,
    fallback::render_fallback,
    model::{GenerateRequest, GenerativeModel},
    normalize::normalize,
    postprocess::post_process,
    prompt::compose,
    types::{ContentAnalysis, DocumentData, GeneratedArtifact, GenerationSettings},
};

/// Low for consistent, professional output across runs.
pub const GENERATION_TEMPERATURE: f32 = 0.3;
/// Generous budget; complete pages with embedded CSS run long.
pub const GENERATION_MAX_TOKENS: u32 = 8000;

/// End-to-end website generation: normalize, compose, one model call,
/// post-process. The pipeline is total: every valid document yields a
/// published artifact, degrading to the deterministic fallback page
/// when generation fails rather than surfacing an error.
///
/// Each invocation operates on its own snapshot; no shared state is
/// touched, so concurrent runs for different documents are safe.
pub struct WebsiteGenerator<M> {
    model: M,
}

impl<M: GenerativeModel> WebsiteGenerator<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Generate and publish a website for a document snapshot.
    ///
    /// `analysis` is the advisory output of a prior
    /// [`analyze_document`](Self::analyze_document) run; pass `None` to
    /// generate without it.
    pub async fn generate_website(
        &self,
        document: &DocumentData,
        settings: &GenerationSettings,
        analysis: Option<&ContentAnalysis>,
    ) -> GeneratedArtifact {
        let title = document.effective_title();
        let normalized = normalize(&document.content);
        let prompt = compose(&normalized, settings, analysis);
        tracing::debug!(
            title,
            content_len = normalized.text.len(),
            prompt_len = prompt.char_len(),
            media = normalized.media_manifest.len(),
            "composed generation prompt"
        );

        let request = GenerateRequest {
            prompt: prompt.text(),
            temperature: GENERATION_TEMPERATURE,
            max_tokens: GENERATION_MAX_TOKENS,
        };

        let html = match self.model.generate_text(request).await {
            Ok(raw) => post_process(&raw, &normalized.media_manifest),
            Err(error) => {
                // Availability over fidelity: the caller still gets a
                // valid page, just a simpler one. The kind is logged
                // for operational visibility.
                tracing::error!(
                    kind = error.kind(),
                    error = %error,
                    "website generation failed; rendering fallback page"
                );
                render_fallback(title, &normalized.text, settings)
            }
        };

        GeneratedArtifact::published(html, settings.clone())
    }

    /// Run the advisory content analysis for a document snapshot.
    /// Never fails; analysis errors collapse into the neutral default.
    pub async fn analyze_document(&self, document: &DocumentData) -> ContentAnalysis {
        let normalized = normalize(&document.content);
        analyze(&self.model, &normalized).await
    }
}
