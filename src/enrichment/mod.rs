//! Enrichment
//!
//! Optional generative analysis that may replace a heuristic result wholesale. The backend is
//! asked for a `ValidationResult`; an answer is either accepted as-is or ignored, never merged.

pub mod openai;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::validation::ValidationResult;

pub use openai::OpenAiBackend;

/// Reasons an enrichment attempt produced no override
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("backend returned status {0}")]
    Status(u16),

    #[error("backend returned no content")]
    EmptyResponse,

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("response is not a validation result: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("response contradicts itself: {0}")]
    Inconsistent(&'static str),
}

/// What the backend is asked to analyze
#[derive(Debug, Clone, Copy)]
pub struct AnalysisRequest<'a> {
    pub language: &'a str,
    pub code: &'a str,
}

/// External generative backend, returning the raw text of its answer
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn analyze(&self, request: AnalysisRequest<'_>) -> Result<String, EnrichmentError>;
}

/// Time-bounded, single-attempt enrichment with all-or-nothing acceptance
#[derive(Clone)]
pub struct EnrichmentAdapter {
    backend: Arc<dyn AnalysisBackend>,
    timeout: Duration,
    min_code_chars: usize,
}

impl std::fmt::Debug for EnrichmentAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichmentAdapter")
            .field("timeout", &self.timeout)
            .field("min_code_chars", &self.min_code_chars)
            .finish_non_exhaustive()
    }
}

impl EnrichmentAdapter {
    pub fn new(backend: Arc<dyn AnalysisBackend>, timeout: Duration, min_code_chars: usize) -> Self {
        Self {
            backend,
            timeout,
            min_code_chars,
        }
    }

    /// Only snippets longer than the minimum (after trimming) are sent out.
    pub fn is_eligible(&self, code: &str) -> bool {
        code.trim().chars().count() > self.min_code_chars
    }

    /// Ask the backend for a replacement result. `None` means the heuristic result stands.
    pub async fn enrich(&self, language: &str, code: &str) -> Option<ValidationResult> {
        if !self.is_eligible(code) {
            return None;
        }

        match self.try_enrich(AnalysisRequest { language, code }).await {
            Ok(result) => {
                log::debug!(
                    "Enrichment accepted for {} ({} diagnostics)",
                    language,
                    result.errors.len()
                );
                Some(result)
            }
            Err(e @ (EnrichmentError::Transport(_) | EnrichmentError::Status(_))) => {
                log::warn!("Enrichment backend unavailable: {}", e);
                None
            }
            Err(e) => {
                log::debug!("Enrichment rejected: {}", e);
                None
            }
        }
    }

    async fn try_enrich(
        &self,
        request: AnalysisRequest<'_>,
    ) -> Result<ValidationResult, EnrichmentError> {
        let raw = tokio::time::timeout(self.timeout, self.backend.analyze(request))
            .await
            .map_err(|_| EnrichmentError::Timeout(self.timeout))??;
        accept(&raw)
    }
}

/// Decide whether a raw backend answer may replace the heuristic result.
///
/// The answer must parse into the full result shape and satisfy its counting invariants.
pub fn accept(raw: &str) -> Result<ValidationResult, EnrichmentError> {
    let result: ValidationResult = serde_json::from_str(strip_code_fence(raw))?;

    if result.errors.iter().any(|d| d.line == 0) {
        return Err(EnrichmentError::Inconsistent("line numbers start at 1"));
    }
    if !result.is_consistent() {
        return Err(EnrichmentError::Inconsistent(
            "counts do not match the reported errors",
        ));
    }
    Ok(result)
}

/// Chat models like to wrap JSON in a Markdown fence; peel one off if present.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = inner.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening line
    match inner.split_once('\n') {
        Some((_, body)) => body.trim(),
        None => inner.trim(),
    }
}
