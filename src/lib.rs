mod analyze;
mod client_utils;
mod errors;
mod fallback;
mod model;
mod normalize;
mod pipeline;
mod postprocess;
mod prompt;
mod template;
mod types;

pub mod anthropic;
pub mod testing;

pub use analyze::{analyze, ANALYSIS_MAX_TOKENS, ANALYSIS_TEMPERATURE};
pub use errors::*;
pub use fallback::render_fallback;
pub use model::{GenerateRequest, GenerativeModel};
pub use normalize::{normalize, MAX_CONTENT_LENGTH};
pub use pipeline::{WebsiteGenerator, GENERATION_MAX_TOKENS, GENERATION_TEMPERATURE};
pub use postprocess::post_process;
pub use prompt::{compose, Prompt, MAX_PROMPT_LENGTH};
pub use template::{render_website, Theme, WebsiteSettings};
pub use types::*;
