//! Configuration management for mockforge
//!
//! Settings are loaded from environment variables with defaults. Provider
//! credentials are never read here directly; they stay in the variables the
//! `genai` crate already uses.
//!
//! # Environment Variables
//!
//! ## Mockforge Configuration
//! - `MOCKFORGE_PROVIDER`: Provider selection (ollama|openai|claude|gemini|grok|groq) - default: "ollama"
//! - `MOCKFORGE_MODEL`: Model name - default depends on the provider
//! - `MOCKFORGE_REQUEST_TIMEOUT`: Timeout in seconds for one generation request - default: "120"
//! - `MOCKFORGE_TEMPERATURE`: Sampling temperature - default: "0.2"
//! - `MOCKFORGE_MAX_TOKENS`: Reply token budget - default: "8192"
//! - `MOCKFORGE_LOG_LEVEL`: Logging level - default: "info"
//! - `MOCKFORGE_LOG_JSON`: Emit JSON log lines (true|false) - default: "false"
//! - `MOCKFORGE_TRACE_FILE`: Append JSONL pipeline traces to this file - default: unset
//! - `MOCKFORGE_API_BASE_URL`: Custom endpoint for the provider - default: unset
//! - `MOCKFORGE_LOCAL_ONLY`: Never call a service, always use local templates - default: "false"
//!
//! ## Provider Credentials
//! Read by the genai library:
//! - **Ollama**: `OLLAMA_HOST` (default: http://localhost:11434)
//! - **OpenAI**: `OPENAI_API_KEY`
//! - **Claude**: `ANTHROPIC_API_KEY`
//! - **Gemini**: `GEMINI_API_KEY`
//! - **Grok**: `XAI_API_KEY`
//! - **Groq**: `GROQ_API_KEY`
//!
//! # Example
//!
//! ```no_run
//! use mockforge::MockforgeConfig;
//!
//! let config = MockforgeConfig::default();
//! config.validate().expect("Invalid configuration");
//! println!("{}", config);
//! ```

use crate::llm::provider_has_credentials;
use genai::adapter::AdapterKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_OLLAMA_MODEL: &str = "qwen2.5-coder:7b";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
const DEFAULT_TEMPERATURE: f32 = 0.2;
const DEFAULT_MAX_TOKENS: u32 = 8192;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid provider: {0}. Valid options: ollama, openai, claude, gemini, grok, groq")]
    InvalidProvider(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

/// Whether a generation request may call the generative service at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Call the service and fall back to local templates on failure
    Service,
    /// Produce projects from local templates only
    LocalOnly,
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationMode::Service => write!(f, "service"),
            GenerationMode::LocalOnly => write!(f, "local-only"),
        }
    }
}

/// Parses a provider name as accepted by `MOCKFORGE_PROVIDER`
pub fn parse_provider(name: &str) -> Result<AdapterKind, ConfigError> {
    match name.trim().to_lowercase().as_str() {
        "ollama" => Ok(AdapterKind::Ollama),
        "openai" => Ok(AdapterKind::OpenAI),
        "claude" | "anthropic" => Ok(AdapterKind::Anthropic),
        "gemini" => Ok(AdapterKind::Gemini),
        "grok" | "xai" => Ok(AdapterKind::Xai),
        "groq" => Ok(AdapterKind::Groq),
        other => Err(ConfigError::InvalidProvider(other.to_string())),
    }
}

/// Model used when `MOCKFORGE_MODEL` is unset
pub fn default_model(provider: AdapterKind) -> &'static str {
    match provider {
        AdapterKind::Ollama => DEFAULT_OLLAMA_MODEL,
        AdapterKind::OpenAI => "gpt-4o-mini",
        AdapterKind::Anthropic => "claude-3-5-sonnet-latest",
        AdapterKind::Gemini => "gemini-1.5-flash",
        AdapterKind::Xai => "grok-beta",
        AdapterKind::Groq => "llama-3.3-70b-versatile",
        _ => DEFAULT_OLLAMA_MODEL,
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

#[derive(Debug, Clone)]
pub struct MockforgeConfig {
    pub provider: AdapterKind,

    /// Model name (provider-specific)
    pub model: String,

    pub request_timeout_secs: u64,

    pub temperature: f32,

    pub max_tokens: u32,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    pub log_json: bool,

    /// JSONL trace destination, disabled when `None`
    pub trace_file: Option<PathBuf>,

    pub api_base_url: Option<String>,

    pub mode: GenerationMode,
}

impl Default for MockforgeConfig {
    /// Loads from `MOCKFORGE_*` environment variables, falling back to defaults
    ///
    /// The generation mode is `Service` when the provider needs no key or its key
    /// variable is set, unless `MOCKFORGE_LOCAL_ONLY` forces local templates.
    fn default() -> Self {
        let provider = env::var("MOCKFORGE_PROVIDER")
            .ok()
            .and_then(|s| parse_provider(&s).ok())
            .unwrap_or(AdapterKind::Ollama);

        let model = env::var("MOCKFORGE_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| default_model(provider).to_string());

        let request_timeout_secs = env::var("MOCKFORGE_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let temperature = env::var("MOCKFORGE_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse::<f32>().ok())
            .unwrap_or(DEFAULT_TEMPERATURE);

        let max_tokens = env::var("MOCKFORGE_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_TOKENS);

        let log_level = env::var("MOCKFORGE_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let log_json = env_flag("MOCKFORGE_LOG_JSON");

        let trace_file = env::var("MOCKFORGE_TRACE_FILE")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let api_base_url = env::var("MOCKFORGE_API_BASE_URL")
            .ok()
            .filter(|u| !u.trim().is_empty());

        let mode = if env_flag("MOCKFORGE_LOCAL_ONLY") || !provider_has_credentials(provider) {
            GenerationMode::LocalOnly
        } else {
            GenerationMode::Service
        };

        Self {
            provider,
            model,
            request_timeout_secs,
            temperature,
            max_tokens,
            log_level,
            log_json,
            trace_file,
            api_base_url,
            mode,
        }
    }
}

impl MockforgeConfig {
    /// Checks numeric ranges and the log level
    ///
    /// Provider credentials are not validated here; a missing key only switches
    /// the mode to [`GenerationMode::LocalOnly`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > 600 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationFailed(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationFailed(
                "Max tokens must be at least 1".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        if let Some(ref url) = self.api_base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::ParseError {
                    field: "MOCKFORGE_API_BASE_URL".to_string(),
                    error: format!("expected an http(s) URL, got {}", url),
                });
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Forces local template generation
    pub fn local_only(mut self) -> Self {
        self.mode = GenerationMode::LocalOnly;
        self
    }

    /// Switches provider, resetting the model to the provider's default unless
    /// one is given, and re-deriving the mode from the new provider's credentials
    pub fn with_provider(mut self, provider: AdapterKind, model: Option<String>) -> Self {
        self.provider = provider;
        self.model = model.unwrap_or_else(|| default_model(provider).to_string());
        self.mode = if env_flag("MOCKFORGE_LOCAL_ONLY") || !provider_has_credentials(provider) {
            GenerationMode::LocalOnly
        } else {
            GenerationMode::Service
        };
        self
    }

    pub fn to_display_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();

        map.insert("provider".to_string(), self.provider.as_str().to_string());
        map.insert("model".to_string(), self.model.clone());
        map.insert(
            "request_timeout_secs".to_string(),
            self.request_timeout_secs.to_string(),
        );
        map.insert("temperature".to_string(), self.temperature.to_string());
        map.insert("max_tokens".to_string(), self.max_tokens.to_string());
        map.insert("log_level".to_string(), self.log_level.clone());
        map.insert("log_json".to_string(), self.log_json.to_string());
        if let Some(ref path) = self.trace_file {
            map.insert("trace_file".to_string(), path.display().to_string());
        }
        if let Some(ref url) = self.api_base_url {
            map.insert("api_base_url".to_string(), url.clone());
        }
        map.insert("mode".to_string(), self.mode.to_string());

        map
    }
}

impl fmt::Display for MockforgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mockforge Configuration:")?;
        writeln!(f, "  Provider: {}", self.provider.as_str())?;
        writeln!(f, "  Model: {}", self.model)?;
        writeln!(f, "  Mode: {}", self.mode)?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  Temperature: {}", self.temperature)?;
        writeln!(f, "  Max Tokens: {}", self.max_tokens)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        if let Some(ref path) = self.trace_file {
            writeln!(f, "  Trace File: {}", path.display())?;
        }
        if let Some(ref url) = self.api_base_url {
            writeln!(f, "  API Base URL: {}", url)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Sets an environment variable for the lifetime of the guard
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    fn base_config() -> MockforgeConfig {
        MockforgeConfig {
            provider: AdapterKind::Ollama,
            model: "qwen:7b".to_string(),
            request_timeout_secs: 30,
            temperature: 0.2,
            max_tokens: 4096,
            log_level: "info".to_string(),
            log_json: false,
            trace_file: None,
            api_base_url: None,
            mode: GenerationMode::Service,
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = vec![
            EnvGuard::set("MOCKFORGE_PROVIDER", "ollama"),
            EnvGuard::unset("MOCKFORGE_MODEL"),
            EnvGuard::unset("MOCKFORGE_REQUEST_TIMEOUT"),
            EnvGuard::unset("MOCKFORGE_TEMPERATURE"),
            EnvGuard::unset("MOCKFORGE_MAX_TOKENS"),
            EnvGuard::unset("MOCKFORGE_LOCAL_ONLY"),
            EnvGuard::set("MOCKFORGE_LOG_LEVEL", DEFAULT_LOG_LEVEL),
        ];

        let config = MockforgeConfig::default();

        assert_eq!(config.provider, AdapterKind::Ollama);
        assert_eq!(config.model, DEFAULT_OLLAMA_MODEL);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        // Ollama needs no key
        assert_eq!(config.mode, GenerationMode::Service);
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guards = vec![
            EnvGuard::set("MOCKFORGE_PROVIDER", "claude"),
            EnvGuard::set("MOCKFORGE_MODEL", "custom-model"),
            EnvGuard::set("MOCKFORGE_LOG_LEVEL", "DEBUG"),
            EnvGuard::set("MOCKFORGE_REQUEST_TIMEOUT", "60"),
            EnvGuard::set("MOCKFORGE_TEMPERATURE", "0.7"),
            EnvGuard::set("MOCKFORGE_MAX_TOKENS", "2048"),
            EnvGuard::set("MOCKFORGE_TRACE_FILE", "/tmp/mockforge.jsonl"),
        ];

        let config = MockforgeConfig::default();

        assert_eq!(config.provider, AdapterKind::Anthropic);
        assert_eq!(config.model, "custom-model");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.trace_file, Some(PathBuf::from("/tmp/mockforge.jsonl")));
    }

    #[test]
    #[serial]
    fn test_missing_key_selects_local_mode() {
        let _guards = vec![
            EnvGuard::set("MOCKFORGE_PROVIDER", "openai"),
            EnvGuard::unset("OPENAI_API_KEY"),
            EnvGuard::unset("MOCKFORGE_LOCAL_ONLY"),
        ];

        let config = MockforgeConfig::default();
        assert_eq!(config.mode, GenerationMode::LocalOnly);
    }

    #[test]
    #[serial]
    fn test_key_present_selects_service_mode() {
        let _guards = vec![
            EnvGuard::set("MOCKFORGE_PROVIDER", "openai"),
            EnvGuard::set("OPENAI_API_KEY", "sk-test"),
            EnvGuard::unset("MOCKFORGE_LOCAL_ONLY"),
        ];

        let config = MockforgeConfig::default();
        assert_eq!(config.mode, GenerationMode::Service);
        assert_eq!(config.model, "gpt-4o-mini");
    }

    #[test]
    #[serial]
    fn test_with_provider_rederives_mode() {
        let _guards = vec![
            EnvGuard::unset("OPENAI_API_KEY"),
            EnvGuard::unset("MOCKFORGE_LOCAL_ONLY"),
        ];

        let config = base_config().with_provider(AdapterKind::OpenAI, None);
        assert_eq!(config.provider, AdapterKind::OpenAI);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.mode, GenerationMode::LocalOnly);

        let config = config.with_provider(AdapterKind::Ollama, Some("llama3".to_string()));
        assert_eq!(config.model, "llama3");
        assert_eq!(config.mode, GenerationMode::Service);
    }

    #[test]
    #[serial]
    fn test_local_only_flag() {
        let _guards = vec![
            EnvGuard::set("MOCKFORGE_PROVIDER", "ollama"),
            EnvGuard::set("MOCKFORGE_LOCAL_ONLY", "true"),
        ];

        assert_eq!(MockforgeConfig::default().mode, GenerationMode::LocalOnly);
    }

    #[test]
    fn test_parse_provider() {
        assert_eq!(parse_provider("Claude").unwrap(), AdapterKind::Anthropic);
        assert_eq!(parse_provider("grok").unwrap(), AdapterKind::Xai);
        assert_eq!(parse_provider("groq").unwrap(), AdapterKind::Groq);
        assert!(matches!(
            parse_provider("watson"),
            Err(ConfigError::InvalidProvider(_))
        ));
    }

    #[test]
    fn test_configuration_validation_valid() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_configuration_validation_invalid_timeout() {
        let mut config = base_config();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 601;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_configuration_validation_invalid_temperature() {
        let mut config = base_config();
        config.temperature = 2.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_configuration_validation_invalid_log_level() {
        let mut config = base_config();
        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_configuration_validation_invalid_base_url() {
        let mut config = base_config();
        config.api_base_url = Some("localhost:8080".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_local_only_builder() {
        assert_eq!(base_config().local_only().mode, GenerationMode::LocalOnly);
    }

    #[test]
    fn test_display_map() {
        let map = base_config().to_display_map();
        assert_eq!(map.get("provider").map(String::as_str), Some("Ollama"));
        assert_eq!(map.get("mode").map(String::as_str), Some("service"));
        assert!(!map.contains_key("trace_file"));
    }

    #[test]
    fn test_config_display() {
        let display = format!("{}", base_config());
        assert!(display.contains("Mockforge Configuration:"));
        assert!(display.contains("Provider: Ollama"));
        assert!(display.contains("Mode: service"));
    }
}
