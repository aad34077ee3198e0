//! mockforge - turns UI mockups into Flutter and Angular projects
//!
//! Diagram markup of a mockup is scanned for device frames, screens, fields,
//! buttons and radio groups. The structured result drives a prompt to a
//! generative service, and the service's free-form reply is recovered into a
//! path-to-content file map and repaired file by file. When no service is
//! available, or its reply is unusable, the project is rendered from local
//! templates instead.
//!
//! # Example Usage
//!
//! ```no_run
//! use mockforge::{GenerationPipeline, GenerationRequest, PipelineConfig};
//!
//! # async fn run(markup: String) -> Result<(), mockforge::GenerationError> {
//! let pipeline = GenerationPipeline::new(None, PipelineConfig::default());
//! let project = pipeline.generate(GenerationRequest::from_markup(markup)).await?;
//! for path in project.paths() {
//!     println!("{}", path);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`mockup`]: screen detection over diagram markup
//! - [`extraction`]: file recovery from free-form replies
//! - [`repair`]: idempotent fix rules for generated Flutter code
//! - [`pipeline`]: request orchestration with template fallback
//! - [`templates`]: deterministic Flutter and Angular projects

pub mod cli;
pub mod config;
pub mod extraction;
pub mod llm;
pub mod mockup;
pub mod pipeline;
pub mod progress;
pub mod project;
pub mod prompt;
pub mod repair;
pub mod templates;
pub mod trace;
pub mod util;

pub use config::{ConfigError, GenerationMode, MockforgeConfig};
pub use extraction::{extract_files, CodeExtractor, ExtractionOutcome};
pub use llm::{BackendError, ErrorClass, GenAIClient, LLMClient, MockLLMClient};
pub use mockup::{detect_screens, RadioGroup, RadioOption, ScreenDetectionResult, ScreenSection};
pub use pipeline::{
    GeneratedProject, GenerationError, GenerationPipeline, GenerationRequest, PipelineConfig,
    ProjectSource, TargetPlatform,
};
pub use project::{write_project, ProjectWriteError};
pub use repair::{repair, RepairEngine};
pub use util::{init_from_config, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_mockforge() {
        assert_eq!(NAME, "mockforge");
    }
}
