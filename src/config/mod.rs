pub mod error;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::transcript::DEFAULT_GREETING;
use crate::providers::simulated::DEFAULT_WORD_DELAY;

pub use error::{ConfigError, ConfigResult};

const APP_DIR: &str = "ancora";
const ENV_PREFIX: &str = "ANCORA";

/// Lines from the bottom of the transcript pane still treated as "at the
/// bottom". Terminal rows are far coarser than pixels.
pub const DEFAULT_SCROLL_THRESHOLD_LINES: u32 = 3;

pub fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .map(|h| h.join("Library/Application Support").join(APP_DIR))
    }

    #[cfg(target_os = "linux")]
    {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
            .map(|c| c.join(APP_DIR))
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA")
            .map(PathBuf::from)
            .map(|a| a.join(APP_DIR))
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .map(|h| h.join(".config").join(APP_DIR))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Mistral,
    Ollama,
    #[value(name = "openai_compat")]
    OpenaiCompat,
    Simulated,
}

impl ProviderKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mistral => "mistral",
            Self::Ollama => "ollama",
            Self::OpenaiCompat => "openai_compat",
            Self::Simulated => "simulated",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub provider: Option<ProviderKind>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub greeting: Option<String>,
    pub scroll_threshold: Option<u32>,
    pub simulated_delay_ms: Option<u64>,
}

impl AppConfig {
    /// File settings overlaid with `ANCORA_*` environment variables. A broken
    /// config file is reported and ignored.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from(Self::get_config_path().as_deref()).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config: {e}");
            Self::default()
        })
    }

    pub fn load_from(path: Option<&Path>) -> ConfigResult<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let loaded = builder.build()?.try_deserialize::<Self>()?;
        tracing::debug!(provider = ?loaded.provider, model = ?loaded.model, "configuration loaded");
        Ok(loaded)
    }

    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        get_config_dir().map(|dir| dir.join("config.toml"))
    }

    pub fn init_default() -> ConfigResult<PathBuf> {
        let path = Self::get_config_path().ok_or(ConfigError::NoConfigDir)?;
        Self::write_template(&path)?;
        Ok(path)
    }

    /// Writes the starter config. Never overwrites an existing file.
    pub fn write_template(path: &Path) -> ConfigResult<()> {
        if path.exists() {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let body = toml::to_string_pretty(&Self::template())?;
        fs::write(
            path,
            format!(
                "# ancora configuration. Every key can also be set as ANCORA_<KEY>.\n\
                 # api_key falls back to MISTRAL_API_KEY.\n\n{body}"
            ),
        )?;
        Ok(())
    }

    fn template() -> Self {
        Self {
            provider: Some(ProviderKind::Mistral),
            model: Some(crate::providers::openai_compat::config::MISTRAL_DEFAULT_MODEL.to_string()),
            api_key: None,
            base_url: None,
            greeting: Some(DEFAULT_GREETING.to_string()),
            scroll_threshold: Some(DEFAULT_SCROLL_THRESHOLD_LINES),
            simulated_delay_ms: Some(60),
        }
    }

    /// Command-line flags win over file and environment settings.
    pub fn apply_overrides(
        &mut self,
        provider: Option<ProviderKind>,
        model: Option<String>,
        simulated: bool,
    ) {
        if simulated {
            self.provider = Some(ProviderKind::Simulated);
        } else if provider.is_some() {
            self.provider = provider;
        }
        if model.is_some() {
            self.model = model;
        }
    }

    #[must_use]
    pub fn provider(&self) -> ProviderKind {
        self.provider.unwrap_or_default()
    }

    #[must_use]
    pub fn greeting(&self) -> &str {
        self.greeting.as_deref().unwrap_or(DEFAULT_GREETING)
    }

    #[must_use]
    pub fn scroll_threshold(&self) -> u32 {
        self.scroll_threshold
            .unwrap_or(DEFAULT_SCROLL_THRESHOLD_LINES)
    }

    #[must_use]
    pub fn simulated_delay(&self) -> Duration {
        self.simulated_delay_ms
            .map_or(DEFAULT_WORD_DELAY, Duration::from_millis)
    }

    /// Configured key, ignoring blank values.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}
