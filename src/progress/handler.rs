//! Progress handler trait and events

use crate::llm::ErrorClass;
use std::time::Duration;

/// Events emitted while a generation request runs
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Started { platform: String, has_markup: bool },

    DetectionComplete {
        phone_count: usize,
        screens: usize,
        duration: Duration,
    },

    ServiceRequestStarted { service: String, prompt_len: usize },

    ServiceResponseReceived {
        reply_len: usize,
        response_time: Duration,
    },

    /// The service call failed; the class picks the log line
    ServiceFailed { class: ErrorClass, error: String },

    ExtractionComplete {
        strategy: Option<&'static str>,
        files: usize,
    },

    /// Files missing from the reply were filled in from templates
    ScaffoldCompleted { added: Vec<String> },

    FallbackUsed { reason: String },

    Completed {
        files: usize,
        source: String,
        total_time: Duration,
    },

    Failed { error: String },
}

pub trait ProgressHandler: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

/// Handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingHandler {
        count: Arc<AtomicUsize>,
    }

    impl ProgressHandler for CountingHandler {
        fn on_progress(&self, _event: &ProgressEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_noop_handler() {
        NoOpHandler.on_progress(&ProgressEvent::Started {
            platform: "flutter".to_string(),
            has_markup: true,
        });
    }

    #[test]
    fn test_progress_events() {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = CountingHandler {
            count: count.clone(),
        };

        handler.on_progress(&ProgressEvent::Started {
            platform: "flutter".to_string(),
            has_markup: false,
        });
        handler.on_progress(&ProgressEvent::FallbackUsed {
            reason: "no service configured".to_string(),
        });
        handler.on_progress(&ProgressEvent::Completed {
            files: 6,
            source: "local_template".to_string(),
            total_time: Duration::from_millis(3),
        });

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_event_debug() {
        let event = ProgressEvent::ServiceFailed {
            class: ErrorClass::RateLimited,
            error: "429".to_string(),
        };
        let debug_str = format!("{:?}", event);
        assert!(debug_str.contains("ServiceFailed"));
        assert!(debug_str.contains("RateLimited"));
    }
}
