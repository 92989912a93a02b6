// ABOUTME: Sequential fallback across candidate models for one generation call
// ABOUTME: First successful candidate wins; failures are recorded and classified
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::catalog::{ModelCandidate, ModelId};
use crate::constants::diagnostics::ERROR_LOG_PREVIEW_CHARS;
use crate::errors::{CandidateFailure, ClassifiedError, ServiceError};
use crate::llm::{GenerationRequest, TextGenerationService};

/// Result of one orchestration call
#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    /// A candidate produced text
    Success {
        /// Raw service output
        raw_text: String,
        /// Candidate that produced it
        model_used: ModelId,
    },
    /// Every candidate failed; always [`ClassifiedError::ModelsExhausted`]
    Failure(ClassifiedError),
}

impl GenerationOutcome {
    /// Whether a candidate succeeded
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Tries candidates strictly in order, one call at a time
#[derive(Clone)]
pub struct GenerationOrchestrator {
    service: Arc<dyn TextGenerationService>,
}

impl GenerationOrchestrator {
    /// Create an orchestrator over `service`
    #[must_use]
    pub fn new(service: Arc<dyn TextGenerationService>) -> Self {
        Self { service }
    }

    /// Underlying service
    #[must_use]
    pub fn service(&self) -> &dyn TextGenerationService {
        self.service.as_ref()
    }

    /// Issue `request` to each candidate in order until one succeeds.
    ///
    /// Later candidates are never called once one succeeds.
    #[instrument(skip_all, fields(service = self.service.name(), candidates = candidates.len()))]
    pub async fn attempt(
        &self,
        candidates: &[ModelCandidate],
        request: &GenerationRequest,
    ) -> GenerationOutcome {
        let mut failures = Vec::with_capacity(candidates.len());
        let mut last_error = ServiceError::other("no candidate models to try");

        for candidate in candidates {
            info!(model = %candidate.id, rank = candidate.rank, "Trying model");

            match self.service.generate(candidate.id.as_str(), request).await {
                Ok(raw_text) => {
                    info!(model = %candidate.id, "Model succeeded");
                    return GenerationOutcome::Success {
                        raw_text,
                        model_used: candidate.id.clone(),
                    };
                }
                Err(e) => {
                    warn!(
                        model = %candidate.id,
                        kind = %e.kind,
                        model_unavailable = e.is_model_unavailable(),
                        error = %preview(&e.message, ERROR_LOG_PREVIEW_CHARS),
                        "Model failed"
                    );
                    failures.push(CandidateFailure::new(candidate.id.as_str(), &e));
                    last_error = e;
                }
            }
        }

        GenerationOutcome::Failure(ClassifiedError::models_exhausted(failures, last_error))
    }
}

/// First `max_chars` characters of `text`
pub(crate) fn preview(text: &str, max_chars: usize) -> &str {
    text.char_indices()
        .nth(max_chars)
        .map_or(text, |(index, _)| &text[..index])
}
