// ABOUTME: Classified errors surfaced by the plan generation pipeline
// ABOUTME: Drives retry/escalation decisions and user-facing error reporting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::service::{CandidateFailure, ServiceError, ServiceErrorKind};
use super::ErrorCode;

/// Rough classification of a structured-text parse failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The parser stopped inside an array, expecting another element or its closer
    IncompleteArrayElement,
    /// The text ends inside a string literal
    UnterminatedString,
    /// Anything else
    Other,
}

/// Why a direct parse of sanitized output failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseDiagnostic {
    /// Parser message
    pub message: String,
    /// Byte offset into the parsed text where the parser gave up
    pub offset: Option<usize>,
    /// Classification used to pick repair strategies
    pub kind: DiagnosticKind,
}

impl ParseDiagnostic {
    /// Create a diagnostic
    #[must_use]
    pub fn new(message: impl Into<String>, offset: Option<usize>, kind: DiagnosticKind) -> Self {
        Self {
            message: message.into(),
            offset,
            kind,
        }
    }
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "{} (at offset {offset})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Terminal failure of one plan generation call
#[derive(Debug, Clone, Error)]
pub enum ClassifiedError {
    /// Every candidate model failed
    #[error("all {} candidate models failed; last error: {last_error}", .tried.len())]
    ModelsExhausted {
        /// Identifiers tried, in order
        tried: Vec<String>,
        /// One record per failed candidate
        failures: Vec<CandidateFailure>,
        /// Error from the last candidate tried
        last_error: ServiceError,
    },
    /// Sanitization and every repair strategy failed on the final attempt
    #[error("response could not be parsed after {attempts} attempts: {diagnostic}")]
    ParseFailure {
        /// Diagnostic from the direct parse on the final attempt
        diagnostic: ParseDiagnostic,
        /// Bounded preview of the failing text
        preview: String,
        /// Generation+parse cycles performed
        attempts: u32,
    },
    /// Credential missing or rejected
    #[error("unauthorized: {message}")]
    Unauthorized {
        /// Detail message
        message: String,
    },
    /// Service quota exhausted
    #[error("quota exceeded: {message}")]
    QuotaExceeded {
        /// Detail message
        message: String,
    },
    /// The end-to-end deadline elapsed
    #[error("deadline of {after_secs}s exceeded")]
    DeadlineExceeded {
        /// Configured deadline
        after_secs: u64,
    },
    /// Catch-all
    #[error("{message}")]
    Unknown {
        /// Raw message
        message: String,
    },
}

impl ClassifiedError {
    /// Every candidate of one fallback sweep failed
    #[must_use]
    pub fn models_exhausted(failures: Vec<CandidateFailure>, last_error: ServiceError) -> Self {
        Self::ModelsExhausted {
            tried: failures.iter().map(|failure| failure.model.clone()).collect(),
            failures,
            last_error,
        }
    }

    /// Surface a uniform upstream cause directly.
    ///
    /// When every candidate of an exhausted sweep failed with the same credential
    /// or quota problem, that problem is returned as `Unauthorized` or
    /// `QuotaExceeded`. Any other error is returned unchanged.
    #[must_use]
    pub fn propagate_uniform_cause(self) -> Self {
        match self {
            Self::ModelsExhausted {
                tried,
                failures,
                last_error,
            } => {
                let uniform = |kind: ServiceErrorKind| {
                    !failures.is_empty() && failures.iter().all(|failure| failure.kind == kind)
                };

                if uniform(ServiceErrorKind::Unauthorized) {
                    Self::Unauthorized {
                        message: last_error.message,
                    }
                } else if uniform(ServiceErrorKind::QuotaExceeded) {
                    Self::QuotaExceeded {
                        message: last_error.message,
                    }
                } else {
                    Self::ModelsExhausted {
                        tried,
                        failures,
                        last_error,
                    }
                }
            }
            other => other,
        }
    }

    /// Error code used when converting to `AppError`
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::ModelsExhausted { last_error, .. } => {
                if last_error.is_model_unavailable() {
                    ErrorCode::ExternalServiceUnavailable
                } else {
                    ErrorCode::ExternalServiceError
                }
            }
            Self::ParseFailure { .. } => ErrorCode::SerializationError,
            Self::Unauthorized { .. } => ErrorCode::ExternalAuthFailed,
            Self::QuotaExceeded { .. } => ErrorCode::ExternalRateLimited,
            Self::DeadlineExceeded { .. } => ErrorCode::ExternalTimeout,
            Self::Unknown { .. } => ErrorCode::InternalError,
        }
    }

    /// HTTP status the request-handling layer should answer with
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.error_code().http_status()
    }

    /// Whether the failure means no model could serve the request
    #[must_use]
    pub const fn is_models_exhausted(&self) -> bool {
        matches!(self, Self::ModelsExhausted { .. })
    }

    /// Message suitable for showing to the end user
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ModelsExhausted { last_error, .. } if last_error.is_model_unavailable() => {
                "None of the Gemini models are available with your API key. \
                 Please verify your API key and try again."
                    .to_owned()
            }
            Self::ModelsExhausted { last_error, .. } => {
                format!(
                    "Unable to generate plan: {}. Please try again.",
                    last_error.message
                )
            }
            Self::ParseFailure { attempts, .. } => format!(
                "The AI response could not be parsed as valid JSON after {attempts} attempts.\n\n\
                 Please try again. If the issue persists, try simplifying your requirements \
                 (e.g., provide less detailed medical history or preferences)."
            ),
            Self::Unauthorized { .. } => {
                "Invalid Gemini API key. Please check your configuration.".to_owned()
            }
            Self::QuotaExceeded { message } => {
                format!("You've exceeded your Gemini API quota. {message}")
            }
            Self::DeadlineExceeded { after_secs } => {
                format!("Plan generation did not finish within {after_secs} seconds. Please try again.")
            }
            Self::Unknown { message } => {
                format!("Unable to generate plan: {message}. Please try again.")
            }
        }
    }
}
