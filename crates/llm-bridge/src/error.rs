//! Unified error type for all LLM operations.
//!
//! Every vendor adapter maps its native failures into [`LlmError`], giving
//! callers a single type to match against. Only two failure families
//! terminate a call: vendor-request errors (after any configured retries)
//! and the tool-loop iteration budget. Everything else — a failed memory
//! read, a malformed tool-call argument, a tool that blows up at runtime —
//! is absorbed with degraded behavior and never surfaces here.
//!
//! # Retryability
//!
//! Variants carry a `retryable` flag set by the adapter from the upstream
//! response (HTTP 429/5xx, connection failures). The
//! [`RetryExecutor`](crate::retry::RetryExecutor) consults
//! [`is_retryable`](LlmError::is_retryable) to decide whether another
//! attempt is worthwhile.

/// The unified error type returned by all vendor operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LlmError {
    /// An HTTP-level failure (transport error, unexpected status code).
    ///
    /// `status` is `None` when the request never received a response.
    #[error("HTTP error (status={status:?}): {message}")]
    Http {
        /// The HTTP status code, if one was received.
        status: Option<http::StatusCode>,
        /// Human-readable description of the failure.
        message: String,
        /// Whether another attempt may succeed.
        retryable: bool,
    },

    /// The API key or token was rejected.
    #[error("authentication error: {0}")]
    Auth(String),

    /// The request was malformed (missing fields, invalid parameters).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The response body could not be parsed.
    #[error("response format error: {message}")]
    ResponseFormat {
        /// What went wrong during parsing.
        message: String,
        /// The raw response body, for diagnostics.
        raw: String,
    },

    /// The vendor returned zero choices/candidates.
    #[error("no response from provider")]
    NoResponse,

    /// A retry policy exhausted its budget without a successful response.
    #[error("retry exhausted after {attempts} attempts: {last_error}")]
    RetryExhausted {
        /// How many attempts were made.
        attempts: u32,
        /// The error from the final attempt.
        #[source]
        last_error: Box<LlmError>,
    },

    /// The tool loop hit its round budget without a tool-call-free reply.
    #[error("max iterations ({limit}) reached without a final answer")]
    IterationBudget {
        /// The configured maximum number of rounds.
        limit: u32,
    },
}

impl LlmError {
    /// Returns `true` if the error is transient and the request may succeed
    /// on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { retryable, .. } => *retryable,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        Self::ResponseFormat {
            message: err.to_string(),
            raw: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_http() {
        let err = LlmError::Http {
            status: Some(http::StatusCode::TOO_MANY_REQUESTS),
            message: "rate limited".into(),
            retryable: true,
        };
        let display = format!("{err}");
        assert!(display.contains("429"));
        assert!(display.contains("rate limited"));
    }

    #[test]
    fn test_display_iteration_budget() {
        let err = LlmError::IterationBudget { limit: 10 };
        assert!(format!("{err}").contains("10"));
    }

    #[test]
    fn test_retryable_http_only() {
        let retryable = LlmError::Http {
            status: Some(http::StatusCode::SERVICE_UNAVAILABLE),
            message: "busy".into(),
            retryable: true,
        };
        assert!(retryable.is_retryable());
        assert!(!LlmError::Auth("bad key".into()).is_retryable());
        assert!(!LlmError::NoResponse.is_retryable());
        assert!(!LlmError::IterationBudget { limit: 3 }.is_retryable());
    }

    #[test]
    fn test_retry_exhausted_source_chain() {
        use std::error::Error;
        let err = LlmError::RetryExhausted {
            attempts: 3,
            last_error: Box::new(LlmError::Auth("expired".into())),
        };
        let source = err.source().expect("should have a source");
        assert!(format!("{source}").contains("expired"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: LlmError = json_err.into();
        assert!(matches!(err, LlmError::ResponseFormat { .. }));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LlmError>();
    }
}
