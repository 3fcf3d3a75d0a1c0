//! Configuration loading, validation, and management for MarketScout.
//!
//! Loads configuration from `~/.marketscout/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.marketscout/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the completion provider (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per LLM response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Directory holding the prompt templates
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,

    /// Turn budgets and respond-tool settings
    #[serde(default)]
    pub agents: AgentsConfig,

    /// Web search / extraction service
    #[serde(default)]
    pub search: SearchConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4o".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    4096
}
fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("templates_dir", &self.templates_dir)
            .field("agents", &self.agents)
            .field("search", &self.search)
            .field("providers", &self.providers)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Agent wiring: turn budgets and the respond tool's response types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentsConfig {
    /// Max turns for the user-facing agent
    #[serde(default = "default_main_turns")]
    pub main_turns: u32,

    /// Max turns for the research sub-agent
    #[serde(default = "default_research_turns")]
    pub research_turns: u32,

    /// Values the respond tool accepts for `response_type`
    #[serde(default = "default_response_types")]
    pub response_types: Vec<String>,
}

fn default_main_turns() -> u32 {
    3
}
fn default_research_turns() -> u32 {
    15
}
fn default_response_types() -> Vec<String> {
    vec!["respond".into(), "clarification".into()]
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            main_turns: default_main_turns(),
            research_turns: default_research_turns(),
            response_types: default_response_types(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_search_url")]
    pub api_url: String,
}

fn default_search_url() -> String {
    "https://api.tavily.com".into()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_search_url(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.marketscout/config.toml).
    ///
    /// A `.env` file in the working directory is read first. Environment
    /// variables then override the file:
    /// - `MARKETSCOUT_API_KEY`, `OPENAI_API_KEY`, `OPENROUTER_API_KEY` (in that order)
    /// - `TAVILY_API_KEY`
    /// - `MARKETSCOUT_PROVIDER`, `MARKETSCOUT_MODEL`, `MARKETSCOUT_TEMPLATES_DIR`
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup` (injectable for tests).
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = lookup("MARKETSCOUT_API_KEY")
                .or_else(|| lookup("OPENAI_API_KEY"))
                .or_else(|| lookup("OPENROUTER_API_KEY"));
        }

        if self.search.api_key.is_none() {
            self.search.api_key = lookup("TAVILY_API_KEY");
        }

        if let Some(provider) = lookup("MARKETSCOUT_PROVIDER") {
            self.default_provider = provider;
        }

        if let Some(model) = lookup("MARKETSCOUT_MODEL") {
            self.default_model = model;
        }

        if let Some(dir) = lookup("MARKETSCOUT_TEMPLATES_DIR") {
            self.templates_dir = PathBuf::from(dir);
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".marketscout")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.agents.main_turns == 0 || self.agents.research_turns == 0 {
            return Err(ConfigError::ValidationError(
                "agent turn budgets must be at least 1".into(),
            ));
        }

        if self.agents.response_types.iter().all(|t| t.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "agents.response_types must name at least one response type".into(),
            ));
        }

        // The main agent's fallback calls `respond` with no type.
        if !self.agents.response_types.iter().any(|t| t == "respond") {
            return Err(ConfigError::ValidationError(
                "agents.response_types must include \"respond\"".into(),
            ));
        }

        Ok(())
    }

    /// Check if a completion API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
            || self
                .providers
                .get(&self.default_provider)
                .is_some_and(|p| p.api_key.is_some())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            templates_dir: default_templates_dir(),
            agents: AgentsConfig::default(),
            search: SearchConfig::default(),
            providers: HashMap::new(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.default_provider, "openai");
        assert_eq!(config.default_model, "gpt-4o");
        assert_eq!(config.agents.main_turns, 3);
        assert_eq!(config.agents.research_turns, 15);
        assert_eq!(config.agents.response_types, vec!["respond", "clarification"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.default_provider, config.default_provider);
        assert_eq!(parsed.agents.research_turns, config.agents.research_turns);
        assert_eq!(parsed.search.api_url, config.search.api_url);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            default_temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_turn_budget_rejected() {
        let mut config = AppConfig::default();
        config.agents.research_turns = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn empty_response_types_rejected() {
        let mut config = AppConfig::default();
        config.agents.response_types = vec![];
        assert!(config.validate().is_err());
    }

    #[test]
    fn response_types_must_include_respond() {
        let mut config = AppConfig::default();
        config.agents.response_types = vec!["clarification".into()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("respond"));

        config.agents.response_types = vec!["summary".into(), "respond".into()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        let config = result.unwrap();
        assert_eq!(config.default_provider, "openai");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_model = "gpt-4o-mini"

[agents]
main_turns = 5

[search]
api_key = "tvly-test"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.default_model, "gpt-4o-mini");
        assert_eq!(config.agents.main_turns, 5);
        assert_eq!(config.agents.research_turns, 15);
        assert_eq!(config.search.api_key.as_deref(), Some("tvly-test"));
        assert_eq!(config.search.api_url, "https://api.tavily.com");
    }

    #[test]
    fn unparseable_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_model = [").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn env_overrides_apply_in_priority_order() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(env(&[
            ("OPENAI_API_KEY", "sk-openai"),
            ("OPENROUTER_API_KEY", "sk-or"),
            ("TAVILY_API_KEY", "tvly-123"),
            ("MARKETSCOUT_MODEL", "gpt-4.1"),
            ("MARKETSCOUT_TEMPLATES_DIR", "/opt/prompts"),
        ]));

        assert_eq!(config.api_key.as_deref(), Some("sk-openai"));
        assert_eq!(config.search.api_key.as_deref(), Some("tvly-123"));
        assert_eq!(config.default_model, "gpt-4.1");
        assert_eq!(config.templates_dir, PathBuf::from("/opt/prompts"));
    }

    #[test]
    fn file_api_key_wins_over_env() {
        let mut config = AppConfig {
            api_key: Some("from-file".into()),
            ..AppConfig::default()
        };
        config.apply_env_overrides(env(&[("MARKETSCOUT_API_KEY", "from-env")]));
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn debug_redacts_secrets() {
        let mut config = AppConfig {
            api_key: Some("sk-secret".into()),
            ..AppConfig::default()
        };
        config.search.api_key = Some("tvly-secret".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(!debug.contains("tvly-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn provider_specific_key_counts_as_api_key() {
        let mut config = AppConfig::default();
        assert!(!config.has_api_key());

        config.providers.insert(
            "openai".into(),
            ProviderConfig {
                api_key: Some("sk-provider".into()),
                api_url: None,
            },
        );
        assert!(config.has_api_key());

        config.default_provider = "ollama".into();
        assert!(!config.has_api_key());
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("gpt-4o"));
        assert!(toml_str.contains("research_turns"));
    }
}
