//! Raised failures and their kinds

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Shared, thread-safe reference to an originating error
pub type SharedError = Arc<dyn StdError + Send + Sync + 'static>;

/// What went wrong, independent of the message text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A result was unwrapped in the error state
    Result,
    /// An option was unwrapped in the `None` state
    OptionNone,
    /// An argument was rejected, such as a void value where one is required
    InvalidArgument,
    /// An accessor was used in the opposite state
    InvalidOperation,
    /// Work was cancelled before or while running
    Cancelled,
    /// A panic with no structured payload
    Panic,
    /// An error raised by code outside this crate
    External,
}

impl FailureKind {
    /// Stable snake_case name, suitable for metadata and log fields
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::Result => "result",
            FailureKind::OptionNone => "option_none",
            FailureKind::InvalidArgument => "invalid_argument",
            FailureKind::InvalidOperation => "invalid_operation",
            FailureKind::Cancelled => "cancelled",
            FailureKind::Panic => "panic",
            FailureKind::External => "external",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure raised at a fail-fast boundary.
///
/// `Failure` is the payload unwound by [`crate::fail_fast::raise`]. It keeps
/// the error it was derived from as its `source()`, so a top-level handler
/// can print the whole chain without a debugger.
#[derive(Clone, thiserror::Error)]
#[error("{message}")]
pub struct Failure {
    kind: FailureKind,
    message: String,
    #[source]
    cause: Option<SharedError>,
}

impl Failure {
    /// Create a failure of the given kind
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    /// A result was unwrapped while holding an error
    #[must_use]
    pub fn result(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Result, message)
    }

    /// An option was unwrapped while `None`
    #[must_use]
    pub fn option_none(message: impl Into<String>) -> Self {
        Self::new(FailureKind::OptionNone, message)
    }

    /// An argument was rejected
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(FailureKind::InvalidArgument, message)
    }

    /// An accessor was called in the wrong state
    #[must_use]
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::new(FailureKind::InvalidOperation, message)
    }

    /// The operation was cancelled
    #[must_use]
    pub fn cancelled() -> Self {
        Self::new(FailureKind::Cancelled, "the operation was cancelled.")
    }

    /// Chain an error as the cause of this failure
    #[must_use]
    pub fn caused_by<E>(self, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.with_shared_cause(Arc::new(cause))
    }

    /// Chain an already shared error as the cause of this failure
    #[must_use]
    pub fn with_shared_cause(mut self, cause: SharedError) -> Self {
        self.cause = Some(cause);
        self
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&SharedError> {
        self.cause.as_ref()
    }

    /// Render the message followed by every cause in the chain
    #[must_use]
    pub fn report(&self) -> String {
        let mut report = self.message.clone();
        let mut next = StdError::source(self);
        while let Some(cause) = next {
            let text = cause.to_string();
            if !text.is_empty() && !report.ends_with(&text) {
                report.push_str("\n  caused by: ");
                report.push_str(&text);
            }
            next = cause.source();
        }
        report
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failure")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("cause", &self.cause.as_ref().map(|c| c.to_string()))
            .finish()
    }
}

impl PartialEq for Failure {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.message == other.message
    }
}

impl Eq for Failure {}
