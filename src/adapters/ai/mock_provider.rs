//! Mock AI Provider for testing and offline runs.
//!
//! Provides a configurable mock implementation of the AIProvider port,
//! allowing tests (and `ai.provider = "mock"` deployments) to run without
//! calling real AI APIs.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in order
//! - Per-purpose fallbacks once the queue is exhausted
//! - Simulated delays for timeout testing
//! - Error injection for resilience testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_response(r#"[{"name":"Price","min":1,"max":3,"default":2,"step":0.5}]"#)
//!     .with_delay(Duration::from_millis(100));
//!
//! let response = provider.complete(request).await?;
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AIError, AIProvider, CompletionPurpose, CompletionRequest, CompletionResponse, FinishReason,
    ProviderInfo, TokenUsage,
};

/// Canned variable batch returned by [`MockAIProvider::demo`].
const DEMO_VARIABLES: &str = r#"[
    {"name": "Feedstock Cost ($/tonne)", "min": 20, "max": 80, "default": 45, "step": 5},
    {"name": "Plant Capacity (tonnes/day)", "min": 100, "max": 1000, "default": 500, "step": 50},
    {"name": "Product Price ($/kg)", "min": 1.5, "max": 4.5, "default": 2.8, "step": 0.1},
    {"name": "Capital Cost ($M)", "min": 50, "max": 250, "default": 120, "step": 10},
    {"name": "Discount Rate (%)", "min": 5, "max": 15, "default": 8, "step": 0.5}
]"#;

/// Canned report returned by [`MockAIProvider::demo`].
const DEMO_REPORT: &str = "Title Page\n\nTechno-Economic Analysis (demo output).\n\n\
Executive Summary\n\nThis report was produced by the offline mock provider.";

/// Mock AI provider for testing.
///
/// Configurable to return specific responses, simulate delays, or inject errors.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Content returned per purpose once the queue is empty.
    fallbacks: HashMap<CompletionPurpose, String>,
    /// Provider info to return.
    info: ProviderInfo,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a successful completion.
    Success {
        content: String,
        usage: TokenUsage,
        finish_reason: FinishReason,
    },
    /// Return an error.
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    /// Simulate rate limiting.
    RateLimited { retry_after_secs: u32 },
    /// Simulate context too long.
    ContextTooLong { message: String },
    /// Simulate content filtering.
    ContentFiltered { reason: String },
    /// Simulate provider unavailable.
    Unavailable { message: String },
    /// Simulate authentication failure.
    AuthenticationFailed,
    /// Simulate network error.
    Network { message: String },
    /// Simulate timeout.
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::ContextTooLong { message } => AIError::context_too_long(message),
            MockError::ContentFiltered { reason } => AIError::content_filtered(reason),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAIProvider {
    /// Creates a new mock provider with default settings.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            fallbacks: HashMap::new(),
            info: ProviderInfo::new("mock", "mock-model-1", 128_000),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Mock that always answers with a plausible variable batch and report.
    pub fn demo() -> Self {
        Self::new()
            .with_fallback(CompletionPurpose::VariableGeneration, DEMO_VARIABLES)
            .with_fallback(CompletionPurpose::ReportGeneration, DEMO_REPORT)
    }

    /// Adds a successful response to the queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.with_response_full(content, TokenUsage::new(10, 20, 1), FinishReason::Stop)
    }

    /// Adds a successful response with full configuration.
    pub fn with_response_full(
        self,
        content: impl Into<String>,
        usage: TokenUsage,
        finish_reason: FinishReason,
    ) -> Self {
        self.responses.lock().unwrap().push_back(MockResponse::Success {
            content: content.into(),
            usage,
            finish_reason,
        });
        self
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: MockError) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockResponse::Error(error));
        self
    }

    /// Sets the content returned for `purpose` once the queue is empty.
    pub fn with_fallback(mut self, purpose: CompletionPurpose, content: impl Into<String>) -> Self {
        self.fallbacks.insert(purpose, content.into());
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the provider info.
    pub fn with_provider_info(mut self, info: ProviderInfo) -> Self {
        self.info = info;
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Clears the call history.
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Gets the next queued response, then the purpose fallback, then a default.
    fn next_response(&self, purpose: CompletionPurpose) -> MockResponse {
        if let Some(queued) = self.responses.lock().unwrap().pop_front() {
            return queued;
        }

        let content = self
            .fallbacks
            .get(&purpose)
            .cloned()
            .unwrap_or_else(|| "Mock response".to_string());

        MockResponse::Success {
            content,
            usage: TokenUsage::new(5, 10, 1),
            finish_reason: FinishReason::Stop,
        }
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let purpose = request.metadata.purpose;
        let model = request.model.clone().unwrap_or_else(|| self.info.model.clone());

        self.calls.lock().unwrap().push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response(purpose) {
            MockResponse::Success {
                content,
                usage,
                finish_reason,
            } => Ok(CompletionResponse {
                content,
                usage,
                model,
                finish_reason,
            }),
            MockResponse::Error(err) => Err(err.into()),
        }
    }

    fn estimate_tokens(&self, text: &str) -> u32 {
        // Rough approximation: ~4 characters per token
        (text.len() / 4).max(1) as u32
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}
