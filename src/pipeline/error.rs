use crate::llm::{BackendError, ErrorClass};
use thiserror::Error;

/// Why a generation run produced no project
///
/// Service-side problems only surface here when fallback to local templates is
/// disabled; otherwise they are recorded as the project's fallback reason.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Request has neither markup nor a prompt")]
    EmptyRequest,

    #[error("No generation service is configured")]
    NoService,

    #[error("Generation service failed ({class}): {source}")]
    ServiceUnavailable {
        class: ErrorClass,
        #[source]
        source: BackendError,
    },

    #[error("Service reply was unusable: {reason}")]
    UnusableReply { reason: String },
}

impl GenerationError {
    pub fn class(&self) -> Option<ErrorClass> {
        match self {
            GenerationError::ServiceUnavailable { class, .. } => Some(*class),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_display_includes_class() {
        let err = GenerationError::ServiceUnavailable {
            class: ErrorClass::RateLimited,
            source: BackendError::RateLimitError { retry_after: None },
        };
        let message = err.to_string();
        assert!(message.contains("rate_limited"), "{}", message);
        assert_eq!(err.class(), Some(ErrorClass::RateLimited));
    }

    #[test]
    fn test_other_errors_have_no_class() {
        assert_eq!(GenerationError::EmptyRequest.class(), None);
        assert_eq!(
            GenerationError::UnusableReply {
                reason: "empty".to_string()
            }
            .class(),
            None
        );
    }
}
