//! Typed error handling for gnomestack.
//!
//! This crate is the algebraic error layer every other gnomestack crate
//! builds on. Failures travel as values through `Option` and `Result`
//! chains, and only turn into a raised failure at an explicit unwrap or
//! at a boundary that still unwinds.
//!
//! ## Key Components
//!
//! - **`void`**: the `Void` marker for payload-less successes and the
//!   `IsVoid` absence check.
//! - **`option`** / **`result`**: constructors plus the `OptionExt` and
//!   `ResultExt` extension traits over std's `Option` and `Result`.
//! - **`errors`**: the default error channel (`Error`: message or
//!   exception), `ExceptionError` and the raised `Failure`.
//! - **`bridge`**: `Attempt`, which runs panicking or fallible code (sync
//!   or async, optionally cancellable) and always returns a `Result`.
//! - **`fail_fast`**: the only place that raises, for call sites that
//!   want to stop on a known failure.

pub mod bridge;
pub mod cancellation;
pub mod config;
pub mod errors;
pub mod fail_fast;
pub mod logging;
pub mod option;
pub mod page;
pub mod result;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod void;

pub use self::{
    bridge::{Attempt, BoxError},
    cancellation::CancellationToken,
    config::CoreConfig,
    errors::{Error, ExceptionError, Failure, FailureKind, Metadata, Result},
    fail_fast::{raise, raise_if_error, raise_if_error_with, raise_if_none},
    option::OptionExt,
    page::Page,
    result::{ResultExt, VoidResult},
    void::{IsVoid, Void},
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bridge::Attempt;
    pub use crate::errors::{Error, Failure, FailureKind, Result};
    pub use crate::option::OptionExt;
    pub use crate::result::{err, err_from, ok, ok_void, ResultExt, VoidResult};
    pub use crate::void::{IsVoid, Void};
}
