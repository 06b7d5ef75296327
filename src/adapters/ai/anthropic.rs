//! Anthropic adapter - implementation of PairingProvider over the Messages
//! API.
//!
//! Builds a multimodal user turn: each captured page is preceded by its
//! page label, images are referenced by URL, and the final text block
//! carries the JSON instruction. The raw response text is returned to the
//! validator untouched.
//!
//! Makes exactly one call per operation: transport failures are not
//! retried here, they propagate to the caller.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::domain::ImageDocument;
use crate::ports::{ImageSet, PairingProvider, PairingRequest, ProviderError, RefinementRequest};

use super::prompt;

/// Anthropic API version header value.
const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Token budget for a pairing response. Three recommendations with 2-3
/// sentences of reasoning each fit comfortably.
const MAX_TOKENS: u32 = 2000;

/// Configuration for the Anthropic provider.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use.
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl AnthropicConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "claude-sonnet-4-20250514".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Anthropic Messages API provider.
pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicProvider {
    /// Creates a new Anthropic provider with the given configuration.
    pub fn new(config: AnthropicConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::InvalidRequest(format!("HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url)
    }

    /// Interleaves page labels and image references for both documents,
    /// then appends the final instruction text.
    fn build_content(images: &ImageSet, instruction: String) -> Vec<ContentBlock> {
        let mut content = Vec::new();

        for (document, urls) in [
            (ImageDocument::Menu, &images.menu_urls),
            (ImageDocument::WineList, &images.wine_list_urls),
        ] {
            for (i, url) in urls.iter().enumerate() {
                content.push(ContentBlock::Text {
                    text: prompt::page_label(document, i + 1, urls.len()),
                });
                content.push(ContentBlock::Image {
                    source: ImageSource {
                        source_type: "url".to_string(),
                        url: url.clone(),
                    },
                });
            }
        }

        content.push(ContentBlock::Text { text: instruction });
        content
    }

    async fn send(
        &self,
        system: String,
        content: Vec<ContentBlock>,
    ) -> Result<String, ProviderError> {
        let request = MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![UserMessage {
                role: "user".to_string(),
                content,
            }],
        };

        debug!(model = %self.config.model, "sending pairing request to Anthropic");

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", self.config.api_key())
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    ProviderError::Network(format!("connection failed: {e}"))
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let response = self.check_status(response).await?;

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Envelope(format!("failed to parse response: {e}")))?;

        let text = body
            .content
            .into_iter()
            .filter_map(|block| {
                if block.block_type == "text" {
                    block.text
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(ProviderError::Envelope(
                "response contained no text block".to_string(),
            ));
        }

        Ok(text)
    }

    async fn check_status(&self, response: Response) -> Result<Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 => Err(ProviderError::AuthenticationFailed),
            429 => Err(ProviderError::RateLimited {
                retry_after_secs: parse_retry_after(&error_body),
            }),
            400 => Err(ProviderError::InvalidRequest(error_body)),
            500..=599 => Err(ProviderError::Unavailable(format!(
                "server error {status}: {error_body}"
            ))),
            _ => Err(ProviderError::Network(format!(
                "unexpected status {status}: {error_body}"
            ))),
        }
    }
}

/// Parses retry-after seconds from an Anthropic error body, defaulting to
/// 60 when no hint is present.
fn parse_retry_after(error_body: &str) -> u32 {
    if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(error_body) {
        if let Some(s) = parsed
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            if let Some(idx) = s.find("try again in ") {
                let rest = &s[idx + 13..];
                if let Some(num_end) = rest.find(|c: char| !c.is_ascii_digit()) {
                    if let Ok(secs) = rest[..num_end].parse::<u32>() {
                        return secs;
                    }
                }
            }
        }
    }
    60
}

#[async_trait]
impl PairingProvider for AnthropicProvider {
    async fn generate(&self, request: &PairingRequest) -> Result<String, ProviderError> {
        let system = prompt::system_prompt(&request.preferences);
        let content = Self::build_content(
            &request.images,
            prompt::user_instruction(request.occasion.as_deref()),
        );
        self.send(system, content).await
    }

    async fn refine(&self, request: &RefinementRequest) -> Result<String, ProviderError> {
        let system = prompt::refinement_system_prompt(
            &request.preferences,
            &request.previous_recommendations,
        );
        let content = Self::build_content(
            &request.images,
            prompt::refinement_instruction(&request.refinement),
        );
        self.send(system, content).await
    }
}

// ----- Anthropic API types -----

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<UserMessage>,
}

#[derive(Debug, Serialize)]
struct UserMessage {
    role: String,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock {
    Text { text: String },
    Image { source: ImageSource },
}

#[derive(Debug, Serialize)]
struct ImageSource {
    #[serde(rename = "type")]
    source_type: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}
