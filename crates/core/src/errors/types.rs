//! Core error type definitions

use super::exception::ExceptionError;
use std::collections::BTreeMap;

/// Result type alias with [`Error`] as the default error channel
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Structured key/value context attached to a message error
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Default error representation for gnomestack results
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A human readable message with optional structured metadata
    #[error("{message}")]
    Message { message: String, metadata: Metadata },

    /// A captured failure, kept so it can be raised again later
    #[error(transparent)]
    Exception(ExceptionError),
}
