pub mod config;
pub mod error;
pub mod orchestrator;
pub mod request;

pub use config::PipelineConfig;
pub use error::GenerationError;
pub use orchestrator::GenerationPipeline;
pub use request::{GeneratedProject, GenerationRequest, ProjectSource, TargetPlatform};
