//! Validate Boundary
//!
//! Single entry point: resolve the profile, run the heuristic analysis, then let enrichment
//! replace the result if it is configured and produces an acceptable answer.

use std::sync::Arc;

use anyhow::Result;
use thiserror::Error;

use crate::config::Config;
use crate::enrichment::{EnrichmentAdapter, OpenAiBackend};
use crate::profile::ProfileRegistry;
use crate::validation::{self, ValidationResult};

/// Internal failures while producing a result
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("rule evaluation failed: {0}")]
    RuleEvaluation(#[from] tokio::task::JoinError),
}

/// Request/response validator shared by every transport
#[derive(Debug, Clone)]
pub struct Validator {
    registry: Arc<ProfileRegistry>,
    enrichment: Option<EnrichmentAdapter>,
}

impl Validator {
    pub fn new(registry: Arc<ProfileRegistry>, enrichment: Option<EnrichmentAdapter>) -> Self {
        Self {
            registry,
            enrichment,
        }
    }

    /// Built-in profiles plus the enrichment backend described by `config`, if any
    pub fn from_config(config: &Config) -> Result<Self> {
        let registry = Arc::new(ProfileRegistry::builtin()?);

        let enrichment = match &config.enrichment {
            Some(settings) => {
                let backend = OpenAiBackend::new(
                    settings.base_url.clone(),
                    settings.api_key.clone(),
                    settings.model.clone(),
                    settings.timeout,
                )?;
                log::info!(
                    "Enrichment enabled: model '{}' at {}",
                    settings.model,
                    settings.base_url
                );
                Some(EnrichmentAdapter::new(
                    Arc::new(backend),
                    settings.timeout,
                    settings.min_code_chars,
                ))
            }
            None => {
                log::info!("Enrichment disabled, serving heuristic results only");
                None
            }
        };

        Ok(Self::new(registry, enrichment))
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    /// Validate a snippet. Never fails: internal errors become the degraded result.
    pub async fn validate(&self, code: &str, language: &str) -> ValidationResult {
        settle(self.try_validate(code, language).await)
    }

    /// Validate a snippet, reporting internal failures to the caller
    pub async fn try_validate(
        &self,
        code: &str,
        language: &str,
    ) -> Result<ValidationResult, ValidateError> {
        // Rule evaluation runs on the blocking pool so a panicking rule surfaces as an error
        let registry = Arc::clone(&self.registry);
        let owned_code = code.to_string();
        let owned_language = language.to_string();
        let heuristic = tokio::task::spawn_blocking(move || {
            let profile = registry.get_profile(&owned_language);
            validation::analyze(&owned_code, profile)
        })
        .await?;

        if !self.registry.contains(language) {
            log::debug!("Unknown language '{}', using the default profile", language);
        }
        log::debug!(
            "Heuristic analysis ({}): {} error(s), {} warning(s)",
            self.registry.get_profile(language).id,
            heuristic.error_count,
            heuristic.warning_count
        );

        let Some(enrichment) = &self.enrichment else {
            return Ok(heuristic);
        };
        Ok(enrichment
            .enrich(language, code)
            .await
            .unwrap_or(heuristic))
    }
}

/// Collapse an outcome into the result callers see; failures become the degraded result.
pub fn settle(outcome: Result<ValidationResult, ValidateError>) -> ValidationResult {
    outcome.unwrap_or_else(|e| {
        log::warn!("Returning degraded result: {}", e);
        ValidationResult::degraded()
    })
}
