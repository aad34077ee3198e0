use super::config::PipelineConfig;
use super::error::GenerationError;
use super::request::{GeneratedProject, GenerationRequest, ProjectSource, TargetPlatform};
use crate::config::GenerationMode;
use crate::extraction::{CodeExtractor, FENCE};
use crate::llm::{BackendError, LLMClient, LLMRequest};
use crate::mockup::{detect_screens, ScreenDetectionResult};
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use crate::prompt;
use crate::templates::{self, Blueprint};
use crate::trace::TraceLogger;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Replies shorter than this cannot hold a project
const MIN_REPLY_LEN: usize = 50;

/// Turns a [`GenerationRequest`] into a [`GeneratedProject`]
///
/// Detection, prompting, extraction and repair run in sequence; the service call
/// is the only await point. With fallback enabled (the default) every request
/// that carries markup or a prompt yields a non-empty project.
pub struct GenerationPipeline {
    client: Option<Arc<dyn LLMClient>>,
    config: PipelineConfig,
    progress: Arc<dyn ProgressHandler>,
    trace: TraceLogger,
    extractor: CodeExtractor,
}

impl GenerationPipeline {
    pub fn new(client: Option<Arc<dyn LLMClient>>, config: PipelineConfig) -> Self {
        Self {
            client,
            config,
            progress: Arc::new(NoOpHandler),
            trace: TraceLogger::disabled(),
            extractor: CodeExtractor::new(),
        }
    }

    pub fn with_progress(mut self, handler: Arc<dyn ProgressHandler>) -> Self {
        self.progress = handler;
        self
    }

    pub fn with_trace(mut self, trace: TraceLogger) -> Self {
        self.trace = trace;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GeneratedProject, GenerationError> {
        let start = Instant::now();

        if request.is_empty() {
            let err = GenerationError::EmptyRequest;
            self.emit(ProgressEvent::Failed {
                error: err.to_string(),
            });
            return Err(err);
        }

        info!(
            "Starting generation for {} (markup: {}, prompt: {})",
            request.platform,
            request.markup().is_some(),
            request.prompt().is_some()
        );
        self.emit(ProgressEvent::Started {
            platform: request.platform.to_string(),
            has_markup: request.markup().is_some(),
        });

        let detection = request.markup().map(|markup| self.detect(markup));
        let blueprint = Blueprint::new(detection.as_ref(), request.prompt());

        if self.config.mode == GenerationMode::LocalOnly {
            info!("Local-only mode, rendering templates");
            return Ok(self.local_project(request.platform, &blueprint, detection, None, start));
        }

        let Some(client) = &self.client else {
            if !self.config.allow_fallback {
                let err = GenerationError::NoService;
                self.emit(ProgressEvent::Failed {
                    error: err.to_string(),
                });
                return Err(err);
            }
            let reason = GenerationError::NoService.to_string();
            return Ok(self.local_project(
                request.platform,
                &blueprint,
                detection,
                Some(reason),
                start,
            ));
        };

        let outcome = self
            .from_service(client.as_ref(), &request, detection.as_ref())
            .await;

        match outcome {
            Ok(mut files) => {
                let added = templates::complete_scaffold(request.platform, &mut files, &blueprint);
                if !added.is_empty() {
                    info!("Completed scaffold with {} template file(s)", added.len());
                    self.trace
                        .log_stage("scaffold", &json!({ "files": files.len() }), &added, 0);
                    self.emit(ProgressEvent::ScaffoldCompleted { added });
                }

                let project = GeneratedProject {
                    files,
                    source: ProjectSource::Service,
                    detection,
                    fallback_reason: None,
                };
                self.complete(&project, start);
                Ok(project)
            }
            Err(err) if self.config.allow_fallback => Ok(self.local_project(
                request.platform,
                &blueprint,
                detection,
                Some(err.to_string()),
                start,
            )),
            Err(err) => {
                self.emit(ProgressEvent::Failed {
                    error: err.to_string(),
                });
                Err(err)
            }
        }
    }

    fn detect(&self, markup: &str) -> ScreenDetectionResult {
        let started = Instant::now();
        let detection = detect_screens(markup);
        let duration = started.elapsed();

        debug!(
            "Detected {} screen(s) across {} device frame(s)",
            detection.screen_sections.len(),
            detection.phone_count
        );
        self.trace.log_stage(
            "detect",
            &json!({ "markup_len": markup.len() }),
            &json!({
                "phone_count": detection.phone_count,
                "screens": detection.detected_screens,
                "drawer": detection.should_create_drawer,
            }),
            duration.as_millis() as u64,
        );
        self.emit(ProgressEvent::DetectionComplete {
            phone_count: detection.phone_count,
            screens: detection.screen_sections.len(),
            duration,
        });
        detection
    }

    async fn from_service(
        &self,
        client: &dyn LLMClient,
        request: &GenerationRequest,
        detection: Option<&ScreenDetectionResult>,
    ) -> Result<BTreeMap<String, String>, GenerationError> {
        let llm_request = LLMRequest::new(prompt::compose(request, detection))
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.max_tokens);
        let prompt_len = llm_request.prompt_len();

        info!("Requesting project from {}", client.name());
        self.emit(ProgressEvent::ServiceRequestStarted {
            service: client.name().to_string(),
            prompt_len,
        });

        let started = Instant::now();
        let response = match tokio::time::timeout(
            self.config.request_timeout,
            client.chat(llm_request),
        )
        .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(self.service_failed(e)),
            Err(_) => {
                return Err(self.service_failed(BackendError::TimeoutError {
                    seconds: self.config.request_timeout.as_secs(),
                }))
            }
        };
        let latency = started.elapsed();

        let reply = response.content;
        self.trace.log_stage(
            "service",
            &json!({ "service": client.name(), "prompt_len": prompt_len }),
            &json!({ "reply_len": reply.len() }),
            latency.as_millis() as u64,
        );
        self.emit(ProgressEvent::ServiceResponseReceived {
            reply_len: reply.len(),
            response_time: latency,
        });

        if let Some(reason) = sanity_check(&reply) {
            warn!("Rejecting service reply: {}", reason);
            return Err(GenerationError::UnusableReply { reason });
        }

        let started = Instant::now();
        let outcome = self.extractor.extract(&reply);
        self.trace.log_stage(
            "extract",
            &json!({ "reply_len": reply.len() }),
            &json!({
                "strategy": outcome.strategy,
                "files": outcome.files.keys().collect::<Vec<_>>(),
            }),
            started.elapsed().as_millis() as u64,
        );
        self.emit(ProgressEvent::ExtractionComplete {
            strategy: outcome.strategy,
            files: outcome.files.len(),
        });

        if outcome.is_empty() {
            return Err(GenerationError::UnusableReply {
                reason: "no files could be extracted".to_string(),
            });
        }
        Ok(outcome.files)
    }

    fn service_failed(&self, error: BackendError) -> GenerationError {
        let class = error.class();
        self.emit(ProgressEvent::ServiceFailed {
            class,
            error: error.to_string(),
        });
        GenerationError::ServiceUnavailable {
            class,
            source: error,
        }
    }

    fn local_project(
        &self,
        platform: TargetPlatform,
        blueprint: &Blueprint,
        detection: Option<ScreenDetectionResult>,
        fallback_reason: Option<String>,
        start: Instant,
    ) -> GeneratedProject {
        if let Some(reason) = &fallback_reason {
            self.emit(ProgressEvent::FallbackUsed {
                reason: reason.clone(),
            });
        }

        let started = Instant::now();
        let files = templates::generate_project(platform, blueprint);
        self.trace.log_stage(
            "local_template",
            &json!({ "platform": platform, "screens": blueprint.screens.len() }),
            &json!({ "files": files.keys().collect::<Vec<_>>() }),
            started.elapsed().as_millis() as u64,
        );

        let project = GeneratedProject {
            files,
            source: ProjectSource::LocalTemplate,
            detection,
            fallback_reason,
        };
        self.complete(&project, start);
        project
    }

    fn complete(&self, project: &GeneratedProject, start: Instant) {
        info!(
            "Generation complete: {} file(s) from {}",
            project.files.len(),
            project.source
        );
        self.emit(ProgressEvent::Completed {
            files: project.files.len(),
            source: project.source.to_string(),
            total_time: start.elapsed(),
        });
    }

    fn emit(&self, event: ProgressEvent) {
        self.progress.on_progress(&event);
    }
}

/// Why a reply cannot contain a project, if it cannot
fn sanity_check(reply: &str) -> Option<String> {
    let len = reply.trim().len();
    if len < MIN_REPLY_LEN {
        return Some(format!(
            "reply too short ({} chars, need at least {})",
            len, MIN_REPLY_LEN
        ));
    }
    if !reply.contains(FENCE) {
        return Some("reply contains no code block".to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MockLLMClient, MockResponse};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingHandler {
        events: Mutex<Vec<ProgressEvent>>,
    }

    impl ProgressHandler for RecordingHandler {
        fn on_progress(&self, event: &ProgressEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    const REPLY: &str = "[FILE: lib/main.dart]\n```dart\nimport 'package:flutter/material.dart';\n\nvoid main() => runApp(const MaterialApp(home: Text('hi')));\n```\n";

    #[test]
    fn test_sanity_check() {
        assert!(sanity_check("too short").unwrap().contains("too short"));
        assert!(sanity_check(&"x".repeat(80)).unwrap().contains("no code block"));
        assert!(sanity_check(REPLY).is_none());
    }

    #[tokio::test]
    async fn test_pipeline_creation() {
        let pipeline = GenerationPipeline::new(None, PipelineConfig::default());
        assert!(pipeline.client.is_none());
        assert!(!pipeline.trace.is_enabled());
        assert!(pipeline.config().allow_fallback);
    }

    #[tokio::test]
    async fn test_empty_request_rejected() {
        let pipeline = GenerationPipeline::new(None, PipelineConfig::default());
        let err = pipeline
            .generate(GenerationRequest::from_prompt("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::EmptyRequest));
    }

    #[tokio::test]
    async fn test_service_reply_is_extracted_and_completed() {
        let client = Arc::new(MockLLMClient::new());
        client.add_response(MockResponse::text(REPLY));
        let handler = Arc::new(RecordingHandler::default());

        let pipeline = GenerationPipeline::new(Some(client.clone()), PipelineConfig::default())
            .with_progress(handler.clone());
        let project = pipeline
            .generate(GenerationRequest::from_prompt("A greeting app"))
            .await
            .unwrap();

        assert_eq!(project.source, ProjectSource::Service);
        assert!(project.file("lib/main.dart").unwrap().contains("Text('hi')"));
        assert!(project.file("pubspec.yaml").is_some());
        assert_eq!(client.received_requests().len(), 1);

        let events = handler.events.lock().unwrap();
        assert!(events
            .iter()
            .any(|e| matches!(e, ProgressEvent::ScaffoldCompleted { .. })));
        assert!(matches!(events.last(), Some(ProgressEvent::Completed { .. })));
    }

    #[tokio::test]
    async fn test_local_only_skips_client() {
        let client = Arc::new(MockLLMClient::new());
        let config = PipelineConfig::default().with_mode(GenerationMode::LocalOnly);
        let pipeline = GenerationPipeline::new(Some(client.clone()), config);

        let project = pipeline
            .generate(GenerationRequest::from_prompt("notes"))
            .await
            .unwrap();

        assert_eq!(project.source, ProjectSource::LocalTemplate);
        assert!(project.fallback_reason.is_none());
        assert!(client.received_requests().is_empty());
    }

    #[tokio::test]
    async fn test_no_client_falls_back() {
        let pipeline = GenerationPipeline::new(None, PipelineConfig::default());
        let project = pipeline
            .generate(GenerationRequest::from_prompt("notes"))
            .await
            .unwrap();
        assert_eq!(project.source, ProjectSource::LocalTemplate);
        assert!(project.fallback_reason.is_some());
    }

    #[tokio::test]
    async fn test_no_client_without_fallback_errors() {
        let config = PipelineConfig::default().with_fallback(false);
        let pipeline = GenerationPipeline::new(None, config);
        let err = pipeline
            .generate(GenerationRequest::from_prompt("notes"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::NoService));
    }
}
