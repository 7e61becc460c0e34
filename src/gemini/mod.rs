//! Gemini REST client: embeddings and text generation.
//!
//! Thin reqwest wrapper over the `generativelanguage` API. The rest of the
//! crate consumes it through the [`Embedder`](crate::embedding::Embedder)
//! and [`Generator`](crate::rerank::Generator) capability traits, so tests
//! and alternative providers swap in without touching the pipeline.

pub mod error;

pub use error::GeminiError;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::constants::EMBED_RETRY_ATTEMPTS;

#[derive(Clone)]
/// HTTP client for the Gemini embedding and generation endpoints.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    embed_model: String,
    generation_model: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("embed_model", &self.embed_model)
            .field("generation_model", &self.generation_model)
            .finish()
    }
}

impl GeminiClient {
    /// Creates a client from runtime configuration.
    pub fn from_config(config: &Config) -> Result<Self, GeminiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| GeminiError::Transport {
                model: config.embed_model.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            api_key: config.gemini_api_key.clone(),
            embed_model: config.embed_model.clone(),
            generation_model: config.rerank_model.clone(),
        })
    }

    /// Embeds one text, retrying transient failures with exponential backoff.
    pub async fn embed_text(&self, text: &str) -> Result<Vec<f32>, GeminiError> {
        let mut last_error = None;
        for attempt in 0..EMBED_RETRY_ATTEMPTS {
            if attempt > 0 {
                let backoff = Duration::from_secs(1 << attempt);
                debug!(attempt, backoff_secs = backoff.as_secs(), "retrying embedding call");
                tokio::time::sleep(backoff).await;
            }
            match self.embed_once(text).await {
                Ok(vector) => return Ok(vector),
                Err(e) if e.is_retryable() => {
                    warn!(attempt, error = %e, "transient embedding failure");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_error.unwrap_or(GeminiError::EmptyResponse {
            model: self.embed_model.clone(),
        }))
    }

    async fn embed_once(&self, text: &str) -> Result<Vec<f32>, GeminiError> {
        let url = format!(
            "{}/v1beta/models/{}:embedContent?key={}",
            self.base_url, self.embed_model, self.api_key
        );
        let body = EmbedRequest {
            content: Content {
                parts: vec![Part {
                    text: text.to_string(),
                }],
            },
        };

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify_transport(&self.embed_model, e))?;

        let response = self.check_status(&self.embed_model, response).await?;
        let decoded: EmbedResponse =
            response.json().await.map_err(|e| GeminiError::Decode {
                model: self.embed_model.clone(),
                message: e.to_string(),
            })?;

        if decoded.embedding.values.is_empty() {
            return Err(GeminiError::EmptyResponse {
                model: self.embed_model.clone(),
            });
        }
        Ok(decoded.embedding.values)
    }

    /// Generates free-form text for `prompt` at the given temperature.
    ///
    /// No retries here: the rerank stage treats rate limits and timeouts as
    /// per-candidate degradation, not as something to wait out.
    pub async fn generate_text(
        &self,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, GeminiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.generation_model, self.api_key
        );
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig { temperature },
        };

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify_transport(&self.generation_model, e))?;

        let response = self.check_status(&self.generation_model, response).await?;
        let decoded: GenerateResponse =
            response.json().await.map_err(|e| GeminiError::Decode {
                model: self.generation_model.clone(),
                message: e.to_string(),
            })?;

        let text = decoded
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GeminiError::EmptyResponse {
                model: self.generation_model.clone(),
            });
        }
        Ok(text)
    }

    fn classify_transport(&self, model: &str, error: reqwest::Error) -> GeminiError {
        if error.is_timeout() {
            GeminiError::Timeout {
                model: model.to_string(),
                message: error.to_string(),
            }
        } else {
            GeminiError::Transport {
                model: model.to_string(),
                message: error.to_string(),
            }
        }
    }

    async fn check_status(
        &self,
        model: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GeminiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        let message = excerpt(&message);

        if status.as_u16() == 429 {
            return Err(GeminiError::RateLimited {
                model: model.to_string(),
                message,
            });
        }
        // Gateway timeout from the API side is a deadline, not a server bug.
        if status.as_u16() == 504 {
            return Err(GeminiError::Timeout {
                model: model.to_string(),
                message,
            });
        }
        Err(GeminiError::Api {
            model: model.to_string(),
            status: status.as_u16(),
            message,
        })
    }
}

fn excerpt(text: &str) -> String {
    const LIMIT: usize = 300;
    match text.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[derive(Debug, Serialize)]
struct EmbedRequest {
    content: Content,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}
