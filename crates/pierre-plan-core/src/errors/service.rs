// ABOUTME: Error taxonomy for the external text generation service
// ABOUTME: Classifies upstream failures into auth, quota, availability, and other kinds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Classification of a failed call to the text generation service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceErrorKind {
    /// Credential rejected (401/403)
    Unauthorized,
    /// Quota or rate limit exhausted (429)
    QuotaExceeded,
    /// The requested model identifier does not exist for this credential
    ModelNotFound,
    /// Transport failure or any other upstream error
    Other,
}

impl ServiceErrorKind {
    /// Whether this kind means the model cannot serve us right now,
    /// as opposed to a transient or unknown failure
    #[must_use]
    pub const fn is_model_unavailable(self) -> bool {
        matches!(
            self,
            Self::ModelNotFound | Self::QuotaExceeded | Self::Unauthorized
        )
    }
}

impl fmt::Display for ServiceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::QuotaExceeded => write!(f, "quota exceeded"),
            Self::ModelNotFound => write!(f, "model not found"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// A failed call to the text generation service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    /// Failure classification
    pub kind: ServiceErrorKind,
    /// Upstream message
    pub message: String,
    /// HTTP status, when the failure came from a response
    pub status: Option<u16>,
}

impl ServiceError {
    /// Create an error of the given kind
    #[must_use]
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    /// Attach the HTTP status that produced this error
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Credential rejected
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Unauthorized, message)
    }

    /// Quota exhausted
    #[must_use]
    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::QuotaExceeded, message)
    }

    /// Unknown model identifier
    #[must_use]
    pub fn model_not_found(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::ModelNotFound, message)
    }

    /// Transport or unclassified failure
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Other, message)
    }

    /// See [`ServiceErrorKind::is_model_unavailable`]
    #[must_use]
    pub const fn is_model_unavailable(&self) -> bool {
        self.kind.is_model_unavailable()
    }
}

/// One candidate model that failed during a fallback sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFailure {
    /// Model identifier that was tried
    pub model: String,
    /// Upstream failure message
    pub message: String,
    /// Failure classification
    pub kind: ServiceErrorKind,
    /// Whether the failure classifies as "model unavailable"
    pub model_unavailable: bool,
}

impl CandidateFailure {
    /// Record a failed call against `model`
    #[must_use]
    pub fn new(model: impl Into<String>, error: &ServiceError) -> Self {
        Self {
            model: model.into(),
            message: error.message.clone(),
            kind: error.kind,
            model_unavailable: error.is_model_unavailable(),
        }
    }
}
