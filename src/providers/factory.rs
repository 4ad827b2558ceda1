use std::sync::Arc;

use crate::config::{AppConfig, ProviderKind};
use crate::core::error::{ChatError, Result};
use crate::core::llm::ChatModel;

use super::http::AuthStrategy;
use super::openai_compat::config::MISTRAL_API_KEY_ENV;
use super::openai_compat::{OpenAICompatConfig, OpenAICompatProvider};
use super::simulated::SimulatedModel;
use super::types::ApiKey;

pub fn create_provider(config: &AppConfig) -> Result<Arc<dyn ChatModel>> {
    let provider: Arc<dyn ChatModel> = match config.provider() {
        ProviderKind::Simulated => Arc::new(SimulatedModel::new(config.simulated_delay())),
        ProviderKind::Mistral => {
            let api_key = resolve_api_key(config, MISTRAL_API_KEY_ENV)?;
            openai_compat(OpenAICompatConfig::mistral(api_key), config)?
        }
        ProviderKind::Ollama => {
            let auth = AuthStrategy::bearer_or_none(config.api_key().map(configured_key));
            openai_compat(OpenAICompatConfig::ollama().with_auth(auth), config)?
        }
        ProviderKind::OpenaiCompat => {
            let base_url = config.base_url.clone().ok_or_else(|| {
                ChatError::Config("provider openai_compat requires base_url".to_string())
            })?;
            if config.model.is_none() {
                return Err(ChatError::Config(
                    "provider openai_compat requires model".to_string(),
                ));
            }
            let auth = AuthStrategy::bearer_or_none(config.api_key().map(configured_key));
            openai_compat(
                OpenAICompatConfig::custom("openai_compat", base_url).with_auth(auth),
                config,
            )?
        }
    };

    tracing::debug!(provider = provider.name(), model = provider.model(), "provider ready");
    Ok(provider)
}

fn openai_compat(
    preset: OpenAICompatConfig,
    config: &AppConfig,
) -> Result<Arc<dyn ChatModel>> {
    let mut provider = OpenAICompatProvider::new(preset)?;

    if let Some(model) = &config.model {
        provider = provider.with_model(model.clone());
    }
    if let Some(base_url) = &config.base_url {
        provider = provider.with_base_url(base_url.clone());
    }

    Ok(Arc::new(provider))
}

fn configured_key(key: &str) -> ApiKey {
    ApiKey::from(key.to_string())
}

fn resolve_api_key(config: &AppConfig, env_var: &str) -> Result<ApiKey> {
    if let Some(key) = config.api_key() {
        return Ok(configured_key(key));
    }

    ApiKey::from_env(env_var).map_err(|_| {
        ChatError::Config(format!(
            "No API key found. Set {env_var} or ANCORA_API_KEY, or run with --simulated."
        ))
    })
}
