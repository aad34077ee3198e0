//! Generative service errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors that can occur while talking to a generative service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BackendError {
    /// API request failed with the given message
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// Authentication failed or credentials are invalid
    AuthenticationError { message: String },

    /// Request timed out after the specified duration (in seconds)
    TimeoutError { seconds: u64 },

    /// Rate limit exceeded, retry after the specified duration (in seconds)
    RateLimitError { retry_after: Option<u64> },

    /// The service rejected the request as malformed (oversized prompt, bad parameters)
    InvalidRequest { message: String },

    /// Invalid or malformed response from the service
    InvalidResponse {
        message: String,
        raw_response: Option<String>,
    },

    /// Configuration error (missing API keys, invalid settings, etc.)
    ConfigurationError { message: String },

    /// Network-related error
    NetworkError { message: String },

    /// Generic error for other cases
    Other { message: String },
}

/// Coarse failure classes, used to pick the log line for a fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    RateLimited,
    MalformedRequest,
    Unauthenticated,
    Other,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::RateLimited => "rate_limited",
            ErrorClass::MalformedRequest => "malformed_request",
            ErrorClass::Unauthenticated => "unauthenticated",
            ErrorClass::Other => "other",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BackendError {
    pub fn class(&self) -> ErrorClass {
        match self {
            BackendError::RateLimitError { .. } => ErrorClass::RateLimited,
            BackendError::AuthenticationError { .. } => ErrorClass::Unauthenticated,
            BackendError::InvalidRequest { .. } => ErrorClass::MalformedRequest,
            BackendError::ApiError {
                status_code: Some(code),
                ..
            } => match code {
                429 => ErrorClass::RateLimited,
                401 | 403 => ErrorClass::Unauthenticated,
                400 | 413 | 422 => ErrorClass::MalformedRequest,
                _ => ErrorClass::Other,
            },
            // Provider SDK errors only carry the status inside their message
            BackendError::ApiError {
                message,
                status_code: None,
            } => classify_message(message),
            _ => ErrorClass::Other,
        }
    }
}

fn classify_message(message: &str) -> ErrorClass {
    let lower = message.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if has(&["429", "rate limit", "rate_limit", "too many requests", "quota"]) {
        ErrorClass::RateLimited
    } else if has(&["401", "403", "unauthorized", "forbidden", "api key", "api_key"]) {
        ErrorClass::Unauthenticated
    } else if has(&["400", "bad request", "invalid_request", "invalid request"]) {
        ErrorClass::MalformedRequest
    } else {
        ErrorClass::Other
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::ApiError {
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "API error ({}): {}", code, message)
                } else {
                    write!(f, "API error: {}", message)
                }
            }
            BackendError::AuthenticationError { message } => {
                write!(f, "Authentication failed: {}", message)
            }
            BackendError::TimeoutError { seconds } => {
                write!(f, "Request timed out after {} seconds", seconds)
            }
            BackendError::RateLimitError { retry_after } => {
                if let Some(seconds) = retry_after {
                    write!(f, "Rate limit exceeded, retry after {} seconds", seconds)
                } else {
                    write!(f, "Rate limit exceeded")
                }
            }
            BackendError::InvalidRequest { message } => {
                write!(f, "Request rejected: {}", message)
            }
            BackendError::InvalidResponse { message, .. } => {
                write!(f, "Invalid response from service: {}", message)
            }
            BackendError::ConfigurationError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            BackendError::NetworkError { message } => {
                write!(f, "Network error: {}", message)
            }
            BackendError::Other { message } => {
                write!(f, "Error: {}", message)
            }
        }
    }
}

impl std::error::Error for BackendError {}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        rate_limit = { BackendError::RateLimitError { retry_after: Some(5) }, ErrorClass::RateLimited },
        auth = { BackendError::AuthenticationError { message: "bad key".into() }, ErrorClass::Unauthenticated },
        invalid_request = { BackendError::InvalidRequest { message: "too long".into() }, ErrorClass::MalformedRequest },
        status_429 = { BackendError::ApiError { message: "slow down".into(), status_code: Some(429) }, ErrorClass::RateLimited },
        status_403 = { BackendError::ApiError { message: "nope".into(), status_code: Some(403) }, ErrorClass::Unauthenticated },
        status_400 = { BackendError::ApiError { message: "bad".into(), status_code: Some(400) }, ErrorClass::MalformedRequest },
        status_500 = { BackendError::ApiError { message: "boom".into(), status_code: Some(500) }, ErrorClass::Other },
        sdk_message = { BackendError::ApiError { message: "Anthropic request failed: 429 Too Many Requests".into(), status_code: None }, ErrorClass::RateLimited },
        timeout = { BackendError::TimeoutError { seconds: 30 }, ErrorClass::Other },
        network = { BackendError::NetworkError { message: "refused".into() }, ErrorClass::Other },
    )]
    fn test_error_class(error: BackendError, expected: ErrorClass) {
        assert_eq!(error.class(), expected);
    }

    #[test]
    fn test_display() {
        let err = BackendError::ApiError {
            message: "boom".to_string(),
            status_code: Some(500),
        };
        assert_eq!(err.to_string(), "API error (500): boom");
        assert_eq!(
            BackendError::TimeoutError { seconds: 3 }.to_string(),
            "Request timed out after 3 seconds"
        );
    }
}
