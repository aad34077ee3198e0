//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use crate::llm::ErrorClass;
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started {
                platform,
                has_markup,
            } => {
                info!(platform = %platform, has_markup, "Starting generation");
            }
            ProgressEvent::DetectionComplete {
                phone_count,
                screens,
                duration,
            } => {
                info!(
                    phones = phone_count,
                    screens,
                    duration_ms = duration.as_millis(),
                    "Screen detection complete"
                );
            }
            ProgressEvent::ServiceRequestStarted {
                service,
                prompt_len,
            } => {
                debug!(service = %service, prompt_len, "Sending generation request");
            }
            ProgressEvent::ServiceResponseReceived {
                reply_len,
                response_time,
            } => {
                debug!(
                    reply_len,
                    response_time_ms = response_time.as_millis(),
                    "Received generation reply"
                );
            }
            ProgressEvent::ServiceFailed { class, error } => match class {
                ErrorClass::RateLimited => {
                    warn!(class = %class, error = %error, "Service rate limited the request")
                }
                ErrorClass::Unauthenticated => {
                    warn!(class = %class, error = %error, "Service rejected the credentials")
                }
                ErrorClass::MalformedRequest => {
                    warn!(class = %class, error = %error, "Service rejected the request")
                }
                ErrorClass::Other => {
                    warn!(class = %class, error = %error, "Service request failed")
                }
            },
            ProgressEvent::ExtractionComplete { strategy, files } => {
                debug!(strategy = ?strategy, files, "Extraction complete");
            }
            ProgressEvent::ScaffoldCompleted { added } => {
                info!(added = ?added, "Filled missing scaffold files from templates");
            }
            ProgressEvent::FallbackUsed { reason } => {
                warn!(reason = %reason, "Using local templates");
            }
            ProgressEvent::Completed {
                files,
                source,
                total_time,
            } => {
                info!(
                    files,
                    source = %source,
                    total_time_ms = total_time.as_millis(),
                    "Generation complete"
                );
            }
            ProgressEvent::Failed { error } => {
                warn!(error = %error, "Generation failed");
            }
        }
    }
}
