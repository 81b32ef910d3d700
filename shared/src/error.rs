//! The kernel's single error type.
//!
//! Every fallible operation in every crate returns `Result<T, KernelError>`
//! so a caller can match on `kind` instead of parsing a message string.

use thiserror::Error;

/// The closed taxonomy a caller is expected to match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    Unauthorized,
    NoMfa,
    InvalidTransition,
    AlreadyRegistered,
    QuorumFailed,
    BreakerOpen,
    RateLimited,
    OutOfRange,
    StaleTerm,
    Conflict,
    Cancelled,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::NoMfa => "no_mfa",
            ErrorKind::InvalidTransition => "invalid_transition",
            ErrorKind::AlreadyRegistered => "already_registered",
            ErrorKind::QuorumFailed => "quorum_failed",
            ErrorKind::BreakerOpen => "breaker_open",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::OutOfRange => "out_of_range",
            ErrorKind::StaleTerm => "stale_term",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone)]
#[error("{kind}: {message}")]
pub struct KernelError {
    pub kind: ErrorKind,
    pub message: String,
    /// Populated by the orchestrator when `kind == BreakerOpen`, carrying a
    /// concrete backoff computed from the breaker's own retry schedule.
    pub retry_after_ms: Option<u64>,
}

impl KernelError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retry_after_ms: None,
        }
    }

    pub fn with_retry_after(mut self, retry_after_ms: u64) -> Self {
        self.retry_after_ms = Some(retry_after_ms);
        self
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::OutOfRange, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "operation cancelled")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// True for errors a caller may retry, optionally after `retry_after_ms`.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, ErrorKind::BreakerOpen | ErrorKind::RateLimited)
    }
}
