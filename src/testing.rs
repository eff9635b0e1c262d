use std::{collections::VecDeque, sync::Mutex};

use crate::{
    errors::{GenerationError, GenerationResult},
    model::{GenerateRequest, GenerativeModel},
};

/// Result for a mocked `generate_text` call: either text to return or
/// an error to raise.
pub enum MockGenerateResult {
    Text(String),
    Error(GenerationError),
}

impl From<&str> for MockGenerateResult {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for MockGenerateResult {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<GenerationError> for MockGenerateResult {
    fn from(error: GenerationError) -> Self {
        Self::Error(error)
    }
}

#[derive(Default)]
struct MockState {
    mocked_results: VecDeque<MockGenerateResult>,
    tracked_requests: Vec<GenerateRequest>,
}

/// A mock generative model for tests: tracks requests and yields
/// predefined outputs in order.
#[derive(Default)]
pub struct MockGenerativeModel {
    state: Mutex<MockState>,
}

impl MockGenerativeModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a mocked text result.
    pub fn enqueue_generate<R>(&self, result: R) -> &Self
    where
        R: Into<MockGenerateResult>,
    {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.mocked_results.push_back(result.into());
        drop(state);
        self
    }

    /// Enqueue a mocked error result.
    pub fn enqueue_generate_error(&self, error: GenerationError) -> &Self {
        self.enqueue_generate(MockGenerateResult::Error(error))
    }

    /// The requests the mock has received so far.
    pub fn tracked_requests(&self) -> Vec<GenerateRequest> {
        let state = self.state.lock().expect("mock state poisoned");
        state.tracked_requests.clone()
    }
}

#[async_trait::async_trait]
impl GenerativeModel for MockGenerativeModel {
    fn provider(&self) -> &'static str {
        "mock"
    }

    fn model_id(&self) -> String {
        "mock-model".to_string()
    }

    async fn generate_text(&self, request: GenerateRequest) -> GenerationResult<String> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.tracked_requests.push(request);

        let result = state.mocked_results.pop_front().ok_or_else(|| {
            GenerationError::InvalidResponse("mock", "no mocked generate results available".into())
        })?;

        match result {
            MockGenerateResult::Text(text) => Ok(text),
            MockGenerateResult::Error(error) => Err(error),
        }
    }
}
