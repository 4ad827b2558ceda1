pub mod config;
pub mod convert;
pub mod types;

use async_trait::async_trait;
use futures::{StreamExt, future};
use tokio_util::sync::CancellationToken;

use crate::core::error::{ChatError, Result};
use crate::core::llm::ChatModel;
use crate::core::types::{FragmentStream, PromptMessage};
use crate::providers::error::ProviderError;
use crate::providers::http::{HttpClient, HttpConfig, SseParser};
use crate::providers::types::{BaseUrl, ModelId};

pub use config::OpenAICompatConfig;

/// Streaming client for `/v1/chat/completions` servers (Mistral, Ollama and
/// anything else speaking the same protocol).
#[derive(Clone)]
pub struct OpenAICompatProvider {
    http: HttpClient,
    config: OpenAICompatConfig,
    model: ModelId,
}

impl std::fmt::Debug for OpenAICompatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAICompatProvider")
            .field("provider", &self.config.provider_name)
            .field("model", &self.model)
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenAICompatProvider {
    pub fn new(config: OpenAICompatConfig) -> std::result::Result<Self, ProviderError> {
        Self::with_http_config(config, HttpConfig::default())
    }

    pub fn with_http_config(
        config: OpenAICompatConfig,
        http_config: HttpConfig,
    ) -> std::result::Result<Self, ProviderError> {
        let model = config.default_model.clone();
        Ok(Self {
            http: HttpClient::with_config(http_config)?,
            config,
            model,
        })
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<ModelId>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<BaseUrl>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    #[must_use]
    pub const fn config(&self) -> &OpenAICompatConfig {
        &self.config
    }
}

#[async_trait]
impl ChatModel for OpenAICompatProvider {
    fn name(&self) -> &str {
        &self.config.provider_name
    }

    fn model(&self) -> &str {
        self.model.as_str()
    }

    async fn stream(
        &self,
        messages: Vec<PromptMessage>,
        cancel: CancellationToken,
    ) -> Result<FragmentStream> {
        if self.model.is_empty() {
            return Err(ProviderError::Configuration("no model selected".to_string()).into());
        }

        let request = convert::to_api_request(self.model.as_str(), &messages);
        let url = self.config.endpoint();

        tracing::debug!(
            provider = %self.config.provider_name,
            model = %self.model,
            turns = messages.len(),
            "opening completion stream"
        );

        let response = self
            .http
            .post(&url, &self.config.auth)
            .json(&request)
            .send()
            .await
            .map_err(ProviderError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err =
                ProviderError::from_status(status.as_u16(), &body, &self.config.api_key_env_var);
            tracing::warn!(status = status.as_u16(), error = %err, "completion request rejected");
            return Err(err.into());
        }

        let fragments = SseParser::parse_stream(response.bytes_stream())
            .take_while(|event| future::ready(!matches!(event, Ok(e) if e.is_done())))
            .filter_map(|event| {
                future::ready(match event {
                    Ok(event) => convert::parse_chunk(&event.data).transpose(),
                    Err(e) => Some(Err(e)),
                })
            })
            .map(|item| item.map_err(ChatError::from))
            .take_until(cancel.cancelled_owned());

        Ok(Box::pin(fragments))
    }
}
