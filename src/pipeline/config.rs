use crate::config::{GenerationMode, MockforgeConfig};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub mode: GenerationMode,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upper bound on one service call, enforced by the pipeline
    pub request_timeout: Duration,
    /// Render local templates when the service fails instead of returning an error
    pub allow_fallback: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: GenerationMode::Service,
            temperature: 0.2,
            max_tokens: 8192,
            request_timeout: Duration::from_secs(120),
            allow_fallback: true,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &MockforgeConfig) -> Self {
        Self {
            mode: config.mode,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            request_timeout: config.request_timeout(),
            allow_fallback: true,
        }
    }

    pub fn with_mode(mut self, mode: GenerationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_fallback(mut self, allow_fallback: bool) -> Self {
        self.allow_fallback = allow_fallback;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.mode, GenerationMode::Service);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.max_tokens, 8192);
        assert!(config.allow_fallback);
    }

    #[test]
    fn test_builder_pattern() {
        let config = PipelineConfig::new()
            .with_mode(GenerationMode::LocalOnly)
            .with_request_timeout(Duration::from_millis(50))
            .with_fallback(false);

        assert_eq!(config.mode, GenerationMode::LocalOnly);
        assert_eq!(config.request_timeout, Duration::from_millis(50));
        assert!(!config.allow_fallback);
    }
}
