use crate::providers::http::AuthStrategy;
use crate::providers::types::{ApiKey, BaseUrl, ModelId};

pub const MISTRAL_BASE_URL: &str = "https://api.mistral.ai";
pub const MISTRAL_DEFAULT_MODEL: &str = "open-mistral-7b";
pub const MISTRAL_API_KEY_ENV: &str = "MISTRAL_API_KEY";

pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const OLLAMA_DEFAULT_MODEL: &str = "mistral";

#[derive(Clone, Debug)]
pub struct OpenAICompatConfig {
    pub provider_name: String,
    pub base_url: BaseUrl,
    pub auth: AuthStrategy,
    pub default_model: ModelId,
    /// Named in authentication hints. Empty when the server needs no key.
    pub api_key_env_var: String,
}

impl OpenAICompatConfig {
    #[must_use]
    pub fn custom(provider_name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            provider_name: provider_name.into(),
            base_url: BaseUrl::from(base_url.into()),
            auth: AuthStrategy::None,
            default_model: ModelId::from(String::new()),
            api_key_env_var: String::new(),
        }
    }

    #[must_use]
    pub fn with_auth(mut self, auth: AuthStrategy) -> Self {
        self.auth = auth;
        self
    }

    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = ModelId::from(model.into());
        self
    }

    #[must_use]
    pub fn with_api_key_env_var(mut self, var: impl Into<String>) -> Self {
        self.api_key_env_var = var.into();
        self
    }

    #[must_use]
    pub fn mistral(api_key: ApiKey) -> Self {
        Self::custom("mistral", MISTRAL_BASE_URL)
            .with_auth(AuthStrategy::Bearer(api_key))
            .with_default_model(MISTRAL_DEFAULT_MODEL)
            .with_api_key_env_var(MISTRAL_API_KEY_ENV)
    }

    #[must_use]
    pub fn ollama() -> Self {
        Self::custom("ollama", OLLAMA_BASE_URL).with_default_model(OLLAMA_DEFAULT_MODEL)
    }

    #[must_use]
    pub fn endpoint(&self) -> String {
        self.base_url.join("/v1/chat/completions")
    }
}
