// ABOUTME: Candidate model discovery and ordering for generation fallback
// ABOUTME: Lists generation-capable models, prefers the flash tier, and falls back to a static list
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Model Catalog
//!
//! Model identifiers are server-provided and open-ended, so they are opaque
//! [`ModelId`] values rather than an enumeration. Discovery failures never
//! surface as errors: a transport failure, an error status, or an empty
//! filtered listing all yield the static fallback list.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::constants::models::{
    FALLBACK_MOTIVATION_MODELS, FALLBACK_PLAN_MODELS, PREFERRED_TIER_MARKER,
};
use crate::llm::TextGenerationService;

/// Opaque model identifier without namespace prefix
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    /// Create an identifier, stripping any namespace prefix (`models/`)
    #[must_use]
    pub fn new(identifier: &str) -> Self {
        let bare = identifier
            .rsplit_once('/')
            .map_or(identifier, |(_, name)| name);
        Self(bare.to_owned())
    }

    /// Identifier text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this identifier belongs to the preferred low-latency tier
    #[must_use]
    pub fn is_preferred_tier(&self) -> bool {
        self.0.contains(PREFERRED_TIER_MARKER)
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One candidate model with its position in the try order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCandidate {
    /// Model identifier
    pub id: ModelId,
    /// Zero-based try order
    pub rank: usize,
}

/// Outcome of one discovery pass, for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogReport {
    /// Models returned by the listing endpoint, before filtering
    pub listed_total: usize,
    /// Identifiers that advertise content generation
    pub generation_capable: Vec<ModelId>,
    /// Whether the static fallback list was used
    pub used_fallback: bool,
    /// Listing failure, when discovery failed
    pub discovery_error: Option<String>,
    /// Final candidates in try order
    pub candidates: Vec<ModelCandidate>,
}

/// Discovers and orders candidate models
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    fallback: Vec<ModelId>,
}

impl ModelCatalog {
    /// Catalog with a custom fallback list
    #[must_use]
    pub fn new<I, S>(fallback: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            fallback: fallback
                .into_iter()
                .map(|id| ModelId::new(id.as_ref()))
                .collect(),
        }
    }

    /// Catalog used for plan generation
    #[must_use]
    pub fn for_plans() -> Self {
        Self::new(FALLBACK_PLAN_MODELS)
    }

    /// Catalog used for motivational quotes
    #[must_use]
    pub fn for_motivation() -> Self {
        Self::new(FALLBACK_MOTIVATION_MODELS)
    }

    /// Fallback list, in configured order
    #[must_use]
    pub fn fallback(&self) -> &[ModelId] {
        &self.fallback
    }

    /// Candidate models in try order. Never fails.
    pub async fn list_candidates(&self, service: &dyn TextGenerationService) -> Vec<ModelCandidate> {
        self.report(service).await.candidates
    }

    /// Run discovery and describe what happened
    pub async fn report(&self, service: &dyn TextGenerationService) -> CatalogReport {
        let (listed_total, generation_capable, discovery_error) = match service.list_models().await
        {
            Ok(models) => {
                let total = models.len();
                let capable: Vec<ModelId> = models
                    .iter()
                    .filter(|model| model.supports_generation)
                    .map(|model| ModelId::new(&model.identifier))
                    .collect();
                debug!(total, capable = capable.len(), "Model listing received");
                (total, capable, None)
            }
            Err(e) => {
                warn!(service = service.name(), error = %e, "Model listing failed, using fallback models");
                (0, Vec::new(), Some(e.to_string()))
            }
        };

        let used_fallback = generation_capable.is_empty();
        let ordered = if used_fallback {
            if discovery_error.is_none() {
                warn!("No generation-capable models listed, using fallback models");
            }
            preferred_tier_first(self.fallback.clone())
        } else {
            preferred_tier_first(generation_capable.clone())
        };

        let candidates: Vec<ModelCandidate> = ordered
            .into_iter()
            .enumerate()
            .map(|(rank, id)| ModelCandidate { id, rank })
            .collect();

        info!(
            count = candidates.len(),
            used_fallback,
            first = candidates.first().map(|c| c.id.as_str()).unwrap_or_default(),
            "Candidate models ready"
        );

        CatalogReport {
            listed_total,
            generation_capable,
            used_fallback,
            discovery_error,
            candidates,
        }
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::for_plans()
    }
}

/// Stable partition: preferred-tier identifiers first, relative order kept
fn preferred_tier_first(ids: Vec<ModelId>) -> Vec<ModelId> {
    let (mut preferred, rest): (Vec<_>, Vec<_>) =
        ids.into_iter().partition(ModelId::is_preferred_tier);
    preferred.extend(rest);
    preferred
}
