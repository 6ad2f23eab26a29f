//! Error values that wrap a captured failure

use super::failure::{Failure, FailureKind, SharedError};
use crate::config;
use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

const PANIC_TYPE: &str = "panic";
const BOXED_TYPE: &str = "Box<dyn std::error::Error>";

/// An error that preserves a captured failure.
///
/// The originating error is kept behind an `Arc` so the wrapper stays
/// `Clone` while still handing out the original through
/// [`ExceptionError::origin`] and `source()`. Use
/// [`ExceptionError::to_exception`] to raise it again at a boundary that
/// still unwinds.
#[derive(Clone, thiserror::Error)]
#[error("{message}")]
pub struct ExceptionError {
    message: String,
    kind: FailureKind,
    type_name: String,
    #[source]
    origin: Option<SharedError>,
    backtrace: Option<Arc<Backtrace>>,
}

impl ExceptionError {
    /// Wrap an error value, recording its concrete type name
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let any: &dyn Any = &error;
        if let Some(failure) = any.downcast_ref::<Failure>() {
            return Self::from_failure(failure.clone());
        }

        Self {
            message: error.to_string(),
            kind: FailureKind::External,
            type_name: std::any::type_name::<E>().to_string(),
            origin: Some(Arc::new(error)),
            backtrace: capture_backtrace(),
        }
    }

    /// Wrap a boxed error. Boxed failures keep their kind.
    pub fn from_boxed(error: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        match error.downcast::<Failure>() {
            Ok(failure) => Self::from_failure(*failure),
            Err(error) => Self {
                message: error.to_string(),
                kind: FailureKind::External,
                type_name: BOXED_TYPE.to_string(),
                origin: Some(Arc::from(error)),
                backtrace: capture_backtrace(),
            },
        }
    }

    /// Wrap a raised failure, keeping its kind and message
    pub fn from_failure(failure: Failure) -> Self {
        Self {
            message: failure.message().to_string(),
            kind: failure.kind(),
            type_name: std::any::type_name::<Failure>().to_string(),
            origin: Some(Arc::new(failure)),
            backtrace: capture_backtrace(),
        }
    }

    /// Wrap a panic that carried only text
    pub fn from_panic(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            message: if message.is_empty() {
                super::UNKNOWN_FAILURE.to_string()
            } else {
                message
            },
            kind: FailureKind::Panic,
            type_name: PANIC_TYPE.to_string(),
            origin: None,
            backtrace: capture_backtrace(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Type name of the originating failure
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The originating error, when one was captured
    pub fn origin(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.origin.as_deref()
    }

    pub fn backtrace(&self) -> Option<&Backtrace> {
        self.backtrace.as_deref()
    }

    /// Rebuild a raisable failure with the original message.
    ///
    /// A wrapped `Failure` comes back as itself; anything else becomes a
    /// failure of the recorded kind with the origin chained as its cause.
    #[must_use]
    pub fn to_exception(&self) -> Failure {
        if let Some(failure) = self
            .origin
            .as_deref()
            .and_then(|origin| origin.downcast_ref::<Failure>())
        {
            return failure.clone();
        }

        let failure = Failure::new(self.kind, self.message.clone());
        match &self.origin {
            Some(origin) => failure.with_shared_cause(Arc::clone(origin)),
            None => failure,
        }
    }
}

fn capture_backtrace() -> Option<Arc<Backtrace>> {
    let backtrace = if config::global().capture_backtrace {
        Backtrace::force_capture()
    } else {
        Backtrace::capture()
    };

    match backtrace.status() {
        BacktraceStatus::Captured => Some(Arc::new(backtrace)),
        _ => None,
    }
}

impl fmt::Debug for ExceptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionError")
            .field("message", &self.message)
            .field("kind", &self.kind)
            .field("type_name", &self.type_name)
            .field("has_backtrace", &self.backtrace.is_some())
            .finish()
    }
}

impl PartialEq for ExceptionError {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.type_name == other.type_name
            && self.message == other.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_to_exception_round_trips_message() {
        let io = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error = ExceptionError::new(io);

        assert_eq!(error.kind(), FailureKind::External);
        assert!(error.type_name().contains("io"));

        let failure = error.to_exception();
        assert_eq!(failure.message(), "access denied");
        let cause = failure.cause().expect("origin should be chained");
        assert!(cause.downcast_ref::<io::Error>().is_some());
    }

    #[test]
    fn test_wrapped_failure_is_returned_as_is() {
        let original = Failure::invalid_argument("value must not be void.");
        let error = ExceptionError::new(original.clone());

        assert_eq!(error.kind(), FailureKind::InvalidArgument);
        assert_eq!(error.to_exception(), original);
    }

    #[test]
    fn test_boxed_error_keeps_origin() {
        let boxed: Box<dyn StdError + Send + Sync> = "plain boxed text".into();
        let error = ExceptionError::from_boxed(boxed);

        assert_eq!(error.message(), "plain boxed text");
        assert!(error.origin().is_some());
    }

    #[test]
    fn test_empty_panic_message_is_still_well_formed() {
        let error = ExceptionError::from_panic("");
        assert_eq!(error.message(), "unknown failure");
        assert_eq!(error.kind(), FailureKind::Panic);
        assert!(error.to_exception().cause().is_none());
    }
}
