//! Constructors and extensions for `Result`
//!
//! Mapping, sequencing and fallbacks are the standard library's own
//! (`map`, `map_err`, `and`, `and_then`, `unwrap_or`, `unwrap_or_else`,
//! `ok`, `err`). `ResultExt` adds what std lacks: unwrapping that raises a
//! structured [`Failure`] derived from the error, error-side accessors,
//! and single-read deconstruction.

use crate::errors::{Error, Failure, Result};
use crate::fail_fast::{failure_from, raise};
use crate::void::Void;
use std::fmt::Debug;

/// A result that carries no payload on success
pub type VoidResult<E = Error> = std::result::Result<Void, E>;

/// A successful result
pub fn ok<T, E>(value: T) -> std::result::Result<T, E> {
    Ok(value)
}

/// The payload-less success
pub fn ok_void<E>() -> VoidResult<E> {
    Ok(Void)
}

/// A failed result
pub fn err<T, E>(error: E) -> std::result::Result<T, E> {
    Err(error)
}

/// A failed result with the error converted into [`Error`]
pub fn err_from<T>(error: impl Into<Error>) -> Result<T> {
    Err(error.into())
}

/// Unwrapping, accessors and context for `Result`
pub trait ResultExt<T, E> {
    /// Return the payload, or raise the failure derived from the error.
    ///
    /// Exception errors are re-raised with their original message and
    /// cause, message errors and strings with their text, and any other
    /// error type with its debug rendering.
    fn unwrap_or_raise(self) -> T
    where
        E: Debug + Send + 'static;

    /// Return the payload, or raise a result failure with `message`,
    /// chaining the derived failure as its cause
    fn expect_or_raise(self, message: &str) -> T
    where
        E: Debug + Send + 'static;

    /// Return the payload, or raise the caller-built `failure`
    fn expect_or_raise_with(self, failure: Failure) -> T;

    /// Return the error.
    ///
    /// Calling this on `Ok` is a programming error and raises an
    /// invalid-operation failure.
    fn unwrap_error_or_raise(self) -> E
    where
        T: Debug;

    /// Return the error, or raise an invalid-operation failure with `message`
    fn expect_error_or_raise(self, message: &str) -> E;

    /// Return the error, or `default` when `Ok`
    fn unwrap_error_or(self, default: E) -> E;

    /// Return the error, or compute one lazily when `Ok`
    fn unwrap_error_or_else<F>(self, f: F) -> E
    where
        F: FnOnce() -> E;

    /// Read the state, payload and error in one go.
    ///
    /// The slot of the inactive arm holds `Default::default()`. Its value
    /// is unspecified and must not be relied on.
    fn deconstruct(self) -> (bool, T, E)
    where
        T: Default,
        E: Default;

    /// Pass `Ok` through, raise on `Err`
    fn raise_if_error(self) -> Self
    where
        E: Debug + Send + 'static;

    /// Log the error at warn level and pass the result through
    fn log_error(self, context: &str) -> Self
    where
        E: std::fmt::Display;

    /// Add context to the error, keeping it reachable through `source()`
    fn context(self, message: impl Into<String>) -> Result<T>
    where
        E: Into<Error>;

    /// Add context with a lazy message
    fn with_context<F>(self, f: F) -> Result<T>
    where
        E: Into<Error>,
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E> {
    #[track_caller]
    fn unwrap_or_raise(self) -> T
    where
        E: Debug + Send + 'static,
    {
        match self {
            Ok(value) => value,
            Err(error) => raise(failure_from(error)),
        }
    }

    #[track_caller]
    fn expect_or_raise(self, message: &str) -> T
    where
        E: Debug + Send + 'static,
    {
        match self {
            Ok(value) => value,
            Err(error) => raise(Failure::result(message).caused_by(failure_from(error))),
        }
    }

    #[track_caller]
    fn expect_or_raise_with(self, failure: Failure) -> T {
        match self {
            Ok(value) => value,
            Err(_) => raise(failure),
        }
    }

    #[track_caller]
    fn unwrap_error_or_raise(self) -> E
    where
        T: Debug,
    {
        match self {
            Ok(value) => raise(Failure::invalid_operation(format!(
                "unwrap_error is invalid when result has value: {value:?}."
            ))),
            Err(error) => error,
        }
    }

    #[track_caller]
    fn expect_error_or_raise(self, message: &str) -> E {
        match self {
            Ok(_) => raise(Failure::invalid_operation(message)),
            Err(error) => error,
        }
    }

    fn unwrap_error_or(self, default: E) -> E {
        match self {
            Ok(_) => default,
            Err(error) => error,
        }
    }

    fn unwrap_error_or_else<F>(self, f: F) -> E
    where
        F: FnOnce() -> E,
    {
        match self {
            Ok(_) => f(),
            Err(error) => error,
        }
    }

    fn deconstruct(self) -> (bool, T, E)
    where
        T: Default,
        E: Default,
    {
        match self {
            Ok(value) => (true, value, E::default()),
            Err(error) => (false, T::default(), error),
        }
    }

    #[track_caller]
    fn raise_if_error(self) -> Self
    where
        E: Debug + Send + 'static,
    {
        match self {
            Ok(value) => Ok(value),
            Err(error) => raise(failure_from(error)),
        }
    }

    fn log_error(self, context: &str) -> Self
    where
        E: std::fmt::Display,
    {
        if let Err(error) = &self {
            tracing::warn!(context, %error, "operation returned an error");
        }
        self
    }

    fn context(self, message: impl Into<String>) -> Result<T>
    where
        E: Into<Error>,
    {
        self.map_err(|e| wrap_with_context(message.into(), e.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        E: Into<Error>,
        F: FnOnce() -> String,
    {
        self.map_err(|e| wrap_with_context(f(), e.into()))
    }
}

fn wrap_with_context(message: String, base: Error) -> Error {
    let failure = Failure::new(base.kind(), format!("{message}: {base}")).caused_by(base);
    Error::from(failure)
}
