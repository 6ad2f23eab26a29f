//! Error model: message errors, exception errors and raised failures

mod builders;
mod conversions;
mod exception;
mod failure;
mod types;

pub use exception::ExceptionError;
pub use failure::{Failure, FailureKind, SharedError};
pub use types::{Error, Metadata, Result};

/// Message used when a failure carried no usable text
pub(crate) const UNKNOWN_FAILURE: &str = "unknown failure";
