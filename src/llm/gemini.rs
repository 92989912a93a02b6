// ABOUTME: Google Gemini text generation client over the Generative Language REST API
// ABOUTME: Lists models and issues one-shot generateContent calls with classified failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Gemini Client
//!
//! Implementation of [`TextGenerationService`] for Google's Gemini models.
//!
//! ## Configuration
//!
//! Set the `GEMINI_API_KEY` environment variable with your API key from
//! Google AI Studio: <https://makersuite.google.com/app/apikey>
//!
//! The key travels in the `x-goog-api-key` header, never in the query string.
//!
//! ## Error Mapping
//!
//! | Upstream                                   | [`ServiceErrorKind`]  |
//! |--------------------------------------------|-----------------------|
//! | 401, 403, or "API key not valid"           | `Unauthorized`        |
//! | 429                                        | `QuotaExceeded`       |
//! | 404, or a message containing "not found"   | `ModelNotFound`       |
//! | anything else, including transport errors  | `Other`               |
//!
//! [`ServiceErrorKind`]: crate::errors::ServiceErrorKind

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use super::{GenerationRequest, ModelDescriptor, TextGenerationService};
use crate::config::PlanForgeConfig;
use crate::constants::api::{GEMINI_API_BASE_URL, GEMINI_API_KEY_ENV, GENERATE_CONTENT_METHOD};
use crate::errors::{AppError, ServiceError};

/// Credential header; keeps the key out of request URLs
const API_KEY_HEADER: &str = "x-goog-api-key";

// ============================================================================
// API Request/Response Types
// ============================================================================

/// `generateContent` request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: [GeminiContent<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Generation configuration
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
}

/// `generateContent` response body
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiError>,
}

/// Response candidate
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// `models` listing response body
#[derive(Debug, Deserialize)]
struct ModelListResponse {
    #[serde(default)]
    models: Vec<ListedModel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListedModel {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

/// Error envelope returned on non-success statuses
#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: Option<GeminiError>,
}

/// API error detail
#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

// ============================================================================
// Client Implementation
// ============================================================================

/// Google Gemini text generation client
pub struct GeminiClient {
    api_key: String,
    client: Client,
    base_url: String,
}

impl GeminiClient {
    /// Create a client against the public endpoint
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, GEMINI_API_BASE_URL)
    }

    /// Create a client against a custom endpoint
    #[must_use]
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::with_http_client(api_key, base_url, Client::new())
    }

    fn with_http_client(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        client: Client,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    /// Create a client from loaded configuration
    ///
    /// A missing key produces an unconfigured client; the plan pipeline
    /// reports it as unauthorized before any call is made.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &PlanForgeConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")).with_source(e))?;

        Ok(Self::with_http_client(
            config.api_key.clone().unwrap_or_default(),
            config.api_base_url.clone(),
            client,
        ))
    }

    /// Create a client from the `GEMINI_API_KEY` environment variable
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env() -> Result<Self, AppError> {
        let api_key = env::var(GEMINI_API_KEY_ENV)
            .map_err(|_| AppError::config_missing(GEMINI_API_KEY_ENV))?;
        Ok(Self::new(api_key))
    }

    /// Build the API URL for a model and method
    fn build_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{model}:{method}", self.base_url)
    }

    fn build_gemini_request<'a>(request: &'a GenerationRequest) -> GeminiRequest<'a> {
        GeminiRequest {
            contents: [GeminiContent {
                parts: [RequestPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.budget.temperature,
                max_output_tokens: request.budget.max_output_tokens,
                top_p: request.budget.top_p,
                top_k: request.budget.top_k,
            },
        }
    }

    /// Concatenate the text parts of the first candidate
    ///
    /// A reply without candidates or text is still a completed call; the
    /// empty text goes on to parsing like any other malformed output.
    fn extract_content(response: GeminiResponse) -> String {
        let Some(candidate) = response
            .candidates
            .and_then(|candidates| candidates.into_iter().next())
        else {
            warn!("No candidates in Gemini response");
            return String::new();
        };

        if candidate.finish_reason.as_deref() == Some("MAX_TOKENS") {
            warn!("Gemini stopped at the output token limit; response is likely truncated");
        }

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            warn!(
                finish_reason = candidate.finish_reason.as_deref().unwrap_or("unknown"),
                "No content in Gemini response"
            );
        }

        text
    }

    /// Map a non-success status and body to a classified service error
    fn map_api_error(status: u16, response_text: &str) -> ServiceError {
        let message = serde_json::from_str::<GeminiErrorEnvelope>(response_text)
            .ok()
            .and_then(|envelope| envelope.error)
            .map_or_else(|| response_text.to_owned(), |e| e.message);

        let error = match status {
            401 | 403 => ServiceError::unauthorized(message),
            429 => ServiceError::quota_exceeded(Self::extract_quota_message(&message)),
            404 => ServiceError::model_not_found(message),
            _ if message.contains("API key not valid") => ServiceError::unauthorized(message),
            _ if message.to_lowercase().contains("not found") => {
                ServiceError::model_not_found(message)
            }
            _ => ServiceError::other(format!("Gemini API error ({status}): {message}")),
        };

        error.with_status(status)
    }

    /// Extract a user-friendly quota/rate limit message from Gemini error
    fn extract_quota_message(message: &str) -> String {
        // "Please retry in 6.406453963s."
        const RETRY_PREFIX: &str = "Please retry in ";

        if let Some(retry_pos) = message.find(RETRY_PREFIX) {
            let after_prefix = &message[retry_pos + RETRY_PREFIX.len()..];
            if let Some(s_pos) = after_prefix.find('s') {
                if let Ok(seconds) = after_prefix[..s_pos].parse::<f64>() {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let seconds_int = seconds.ceil() as u64;
                    return format!(
                        "AI service quota exceeded. Please try again in {seconds_int} seconds."
                    );
                }
            }
        }
        "AI service quota exceeded. Please wait a moment and try again.".to_owned()
    }

    /// Transport failure, rendered without the request URL
    fn transport_error(e: reqwest::Error) -> ServiceError {
        let e = e.without_url();
        if e.is_timeout() {
            ServiceError::other(format!("Gemini request timed out: {e}"))
        } else {
            ServiceError::other(format!("HTTP request failed: {e}"))
        }
    }

    /// Send a prepared request and return the body of a successful response
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, ServiceError> {
        let response = request
            .header(API_KEY_HEADER, self.api_key.as_str())
            .send()
            .await
            .map_err(Self::transport_error)?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| {
                ServiceError::other(format!("Failed to read response: {}", e.without_url()))
            })?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(Self::map_api_error(status.as_u16(), &response_text));
        }

        Ok(response_text)
    }
}

#[async_trait]
impl TextGenerationService for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    #[instrument(skip(self))]
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, ServiceError> {
        let url = format!("{}/models", self.base_url);
        let response_text = self.send(self.client.get(&url)).await?;

        let listing: ModelListResponse = serde_json::from_str(&response_text).map_err(|e| {
            error!(error = %e, "Failed to parse model listing");
            ServiceError::other(format!("Failed to parse Gemini model listing: {e}"))
        })?;

        debug!(count = listing.models.len(), "Listed Gemini models");

        Ok(listing
            .models
            .into_iter()
            .map(|model| {
                let supports_generation = model
                    .supported_generation_methods
                    .iter()
                    .any(|method| method == GENERATE_CONTENT_METHOD);
                ModelDescriptor::new(model.name, supports_generation)
            })
            .collect())
    }

    #[instrument(skip(self, request), fields(model = %model))]
    async fn generate(
        &self,
        model: &str,
        request: &GenerationRequest,
    ) -> Result<String, ServiceError> {
        let url = self.build_url(model, GENERATE_CONTENT_METHOD);
        let body = Self::build_gemini_request(request);

        debug!("Sending request to Gemini API");

        let response_text = self.send(self.client.post(&url).json(&body)).await?;

        let gemini_response: GeminiResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                error!(error = %e, "Failed to parse response");
                ServiceError::other(format!("Failed to parse Gemini response: {e}"))
            })?;

        if let Some(error) = gemini_response.error {
            return Err(ServiceError::other(format!(
                "Gemini API error: {}",
                error.message
            )));
        }

        let content = Self::extract_content(gemini_response);
        debug!(chars = content.len(), "Received Gemini response");
        Ok(content)
    }
}

impl Debug for GeminiClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
