//! Application configuration and provider factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use buzzdeck_core::engine::{EngineConfig, GradingStrategy, TimeBudget};
use buzzdeck_core::traits::{QuestionGenerator, SimilarityJudge};

use crate::mock::MockProvider;
use crate::ollama::OllamaProvider;
use crate::openai::OpenAiProvider;

/// Configuration for a single LLM provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
    },
    Mock,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::OpenAI { api_key: _, base_url } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Ollama { base_url } => f
                .debug_struct("Ollama")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Mock => f.debug_struct("Mock").finish(),
        }
    }
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

/// Top-level buzzdeck configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuzzdeckConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Default provider to use.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Default model for generation and judging.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Sampling temperature for question generation.
    #[serde(default = "default_generation_temperature")]
    pub generation_temperature: f64,
    /// Directory holding the persisted study sets, history, and profile.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Milliseconds between token reveals during play (clamped 100-500).
    #[serde(default = "default_reveal_interval_ms")]
    pub reveal_interval_ms: u64,
    /// How answers are graded: "semantic" (LLM) or "local" (fuzzy match).
    #[serde(default)]
    pub grading: GradingStrategy,
    /// Fixed per-question budget in seconds; unset means length-derived.
    #[serde(default)]
    pub flat_budget_secs: Option<u32>,
}

fn default_provider() -> String {
    "openai".to_string()
}
fn default_model() -> String {
    "llama3-70b-8192".to_string()
}
fn default_generation_temperature() -> f64 {
    0.7
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("./buzzdeck-data")
}
fn default_reveal_interval_ms() -> u64 {
    300
}

impl Default for BuzzdeckConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            generation_temperature: default_generation_temperature(),
            data_dir: default_data_dir(),
            reveal_interval_ms: default_reveal_interval_ms(),
            grading: GradingStrategy::default(),
            flat_budget_secs: None,
        }
    }
}

impl BuzzdeckConfig {
    /// Engine configuration derived from the user settings, with the
    /// reveal interval clamped to its supported range.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            reveal_interval_ms: self.reveal_interval_ms.clamp(100, 500),
            time_budget: match self.flat_budget_secs {
                Some(secs) => TimeBudget::Flat(secs),
                None => TimeBudget::LengthDerived,
            },
            grading: self.grading,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::OpenAI { api_key, base_url } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        ProviderConfig::Ollama { base_url } => ProviderConfig::Ollama {
            base_url: resolve_env_vars(base_url),
        },
        ProviderConfig::Mock => ProviderConfig::Mock,
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `buzzdeck.toml` in the current directory
/// 2. `~/.config/buzzdeck/config.toml`
///
/// Environment variable override: `BUZZDECK_OPENAI_KEY`.
pub fn load_config() -> Result<BuzzdeckConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<BuzzdeckConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("buzzdeck.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<BuzzdeckConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => BuzzdeckConfig::default(),
    };

    // Apply env var overrides
    if let Ok(key) = std::env::var("BUZZDECK_OPENAI_KEY") {
        config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
            });
        if let Some(ProviderConfig::OpenAI { api_key, .. }) = config.providers.get_mut("openai") {
            *api_key = key;
        }
    }

    // Resolve env vars in all provider configs
    let resolved: HashMap<String, ProviderConfig> = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();
    config.providers = resolved;

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("buzzdeck"))
}

/// A provider viewed through both of its roles. Built from one concrete
/// instance so generation and judging share configuration and state.
#[derive(Clone)]
pub struct ProviderHandle {
    pub generator: Arc<dyn QuestionGenerator>,
    pub judge: Arc<dyn SimilarityJudge>,
}

impl std::fmt::Debug for ProviderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderHandle").finish_non_exhaustive()
    }
}

/// Create a provider instance from its configuration.
pub fn create_provider(config: &ProviderConfig, model: &str) -> Result<ProviderHandle> {
    match config {
        ProviderConfig::OpenAI { api_key, base_url } => {
            let provider = Arc::new(OpenAiProvider::new(api_key, base_url.clone(), model));
            Ok(ProviderHandle {
                generator: provider.clone(),
                judge: provider,
            })
        }
        ProviderConfig::Ollama { base_url } => {
            let provider = Arc::new(OllamaProvider::new(base_url, model));
            Ok(ProviderHandle {
                generator: provider.clone(),
                judge: provider,
            })
        }
        ProviderConfig::Mock => {
            let provider = Arc::new(MockProvider::default());
            Ok(ProviderHandle {
                generator: provider.clone(),
                judge: provider,
            })
        }
    }
}

/// Create the configured default provider.
pub fn create_default_provider(config: &BuzzdeckConfig) -> Result<ProviderHandle> {
    let provider_config = config
        .providers
        .get(&config.default_provider)
        .with_context(|| {
            format!(
                "provider '{}' is not configured; add it to buzzdeck.toml or set BUZZDECK_OPENAI_KEY",
                config.default_provider
            )
        })?;
    create_provider(provider_config, &config.default_model)
}
