//! Builder methods and accessors for errors

use super::exception::ExceptionError;
use super::failure::{Failure, FailureKind};
use super::types::{Error, Metadata};
use std::error::Error as StdError;

impl Error {
    /// Create a message error
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Error::Message {
            message: message.into(),
            metadata: Metadata::new(),
        }
    }

    /// Create a message error with structured metadata
    #[must_use]
    pub fn with_metadata(message: impl Into<String>, metadata: Metadata) -> Self {
        Error::Message {
            message: message.into(),
            metadata,
        }
    }

    /// Add one metadata entry. Exception errors carry no metadata and are
    /// returned unchanged.
    #[must_use]
    pub fn entry(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        if let Error::Message { metadata, .. } = &mut self {
            metadata.insert(key.into(), value.into());
        }
        self
    }

    /// Wrap any error value as an exception error
    #[must_use]
    pub fn exception<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Error::Exception(ExceptionError::new(error))
    }

    /// Wrap a boxed error as an exception error
    #[must_use]
    pub fn from_boxed(error: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        match error.downcast::<Error>() {
            Ok(error) => *error,
            Err(error) => Error::Exception(ExceptionError::from_boxed(error)),
        }
    }

    /// An argument was rejected, named in the message
    #[must_use]
    pub fn invalid_argument(name: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        Error::from(Failure::invalid_argument(format!("{name}: {message}")))
    }

    /// An operation was attempted in the wrong state
    #[must_use]
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Error::from(Failure::invalid_operation(message))
    }

    /// The operation was cancelled
    #[must_use]
    pub fn cancelled() -> Self {
        Error::from(Failure::cancelled())
    }

    /// The error's text without any cause chain
    pub fn text(&self) -> &str {
        match self {
            Error::Message { message, .. } => message,
            Error::Exception(exception) => exception.message(),
        }
    }

    /// Metadata of a message error
    pub fn metadata(&self) -> Option<&Metadata> {
        match self {
            Error::Message { metadata, .. } => Some(metadata),
            Error::Exception(_) => None,
        }
    }

    /// Kind of failure this error raises as
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Message { .. } => FailureKind::Result,
            Error::Exception(exception) => exception.kind(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind() == FailureKind::Cancelled
    }

    pub fn as_exception(&self) -> Option<&ExceptionError> {
        match self {
            Error::Exception(exception) => Some(exception),
            Error::Message { .. } => None,
        }
    }

    /// Build the failure this error raises as.
    ///
    /// Message errors raise with their text; exception errors are rebuilt
    /// with their original message and cause.
    #[must_use]
    pub fn to_failure(&self) -> Failure {
        match self {
            Error::Message { message, .. } => Failure::result(message.clone()),
            Error::Exception(exception) => exception.to_exception(),
        }
    }
}
