// 🌐 Summarization Service Client
// The only network edge in the engine. Strictly advisory: every caller has
// a deterministic fallback and never propagates these errors.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-call timeout. A slow summarizer must never block form
/// generation beyond this bound.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

// ============================================================================
// REQUEST / RESPONSE TYPES
// ============================================================================

/// One summarization request: an instruction, the source text, and the
/// length bound the caller will enforce regardless.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub instruction: String,
    pub source_text: String,
    pub max_length: usize,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    text: String,
}

/// Wire-shape categorization answer: a category keyword and, when the
/// service picked "other", the text to write on the override line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryAnswer {
    pub category: String,
    #[serde(default)]
    pub other_specify: Option<String>,
}

// ============================================================================
// ERRORS
// ============================================================================

/// Failures talking to the summarization service. Callers collapse all of
/// these to the deterministic fallback.
#[derive(Debug, thiserror::Error)]
pub enum SummarizerError {
    /// Transport failure (includes timeouts).
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Service answered with a non-2xx status.
    #[error("summarizer {endpoint} returned {status}: {body}")]
    ApiStatus {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response body did not match the expected shape.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// No service is configured; offline operation.
    #[error("summarizer unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// TRAIT + IMPLEMENTATIONS
// ============================================================================

/// Advisory text service. Implementations must be side-effect-free from the
/// engine's point of view; the engine treats any error as "use the fallback".
pub trait Summarizer {
    fn summarize(
        &self,
        req: SummaryRequest,
    ) -> impl std::future::Future<Output = Result<String, SummarizerError>> + Send;

    fn categorize(
        &self,
        source_text: &str,
    ) -> impl std::future::Future<Output = Result<CategoryAnswer, SummarizerError>> + Send;
}

/// HTTP-backed summarizer with a bounded per-call timeout.
#[derive(Debug, Clone)]
pub struct HttpSummarizer {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSummarizer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        HttpSummarizer {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, SummarizerError>
    where
        B: Serialize,
        T: serde::de::DeserializeOwned,
    {
        let endpoint = format!("{}{}", self.base_url, path);

        let resp = self
            .client
            .post(&endpoint)
            .json(body)
            .send()
            .await
            .map_err(|source| SummarizerError::Http {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SummarizerError::ApiStatus {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<T>()
            .await
            .map_err(|source| SummarizerError::Deserialization { endpoint, source })
    }
}

impl Summarizer for HttpSummarizer {
    async fn summarize(&self, req: SummaryRequest) -> Result<String, SummarizerError> {
        let resp: SummaryResponse = self.post_json("/summarize", &req).await?;
        Ok(resp.text)
    }

    async fn categorize(&self, source_text: &str) -> Result<CategoryAnswer, SummarizerError> {
        #[derive(Serialize)]
        struct CategorizeRequest<'a> {
            source_text: &'a str,
        }
        self.post_json("/categorize", &CategorizeRequest { source_text })
            .await
    }
}

/// Offline summarizer: always errors, so every derivation takes its
/// deterministic fallback path.
#[derive(Debug, Clone, Default)]
pub struct NoopSummarizer;

impl Summarizer for NoopSummarizer {
    async fn summarize(&self, _req: SummaryRequest) -> Result<String, SummarizerError> {
        Err(SummarizerError::Unavailable("no summarizer configured".to_string()))
    }

    async fn categorize(&self, _source_text: &str) -> Result<CategoryAnswer, SummarizerError> {
        Err(SummarizerError::Unavailable("no summarizer configured".to_string()))
    }
}

/// Fixed-answer summarizer for deterministic tests of code above the
/// pipeline (e.g. form-assembly idempotence).
#[derive(Debug, Clone)]
pub struct StubSummarizer {
    pub short_reason: String,
    pub category: CategoryAnswer,
    pub principal_activity: String,
}

impl Summarizer for StubSummarizer {
    async fn summarize(&self, req: SummaryRequest) -> Result<String, SummarizerError> {
        // Requests are distinguished by their length bound.
        if req.max_length <= 35 {
            Ok(self.short_reason.clone())
        } else {
            Ok(self.principal_activity.clone())
        }
    }

    async fn categorize(&self, _source_text: &str) -> Result<CategoryAnswer, SummarizerError> {
        Ok(self.category.clone())
    }
}

// ============================================================================
// TESTS
// ============================================================================
