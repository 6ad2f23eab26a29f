//! Environment variables for gnomestack
//!
//! Reads and writes go through a [`VarSource`]: the locked process
//! environment or an in-memory [`MapEnv`]. Template expansion supports
//! POSIX shell parameter forms plus Windows `%NAME%`, and its failures
//! convert into the core [`gnomestack_core::Error`].

mod env;
pub mod error;
pub mod expand;
pub mod source;

pub use env::Env;
pub use error::ExpandError;
pub use expand::{expand, expand_with, ExpandOptions};
pub use source::{MapEnv, ProcessEnv, VarSource};
