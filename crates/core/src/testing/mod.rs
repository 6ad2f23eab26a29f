//! Property-based testing utilities for the error core
//!
//! Generators here produce errors and results so downstream crates can
//! check their own combinator chains. The properties at the bottom pin
//! down the laws every `Option`/`Result` consumer relies on.

use crate::errors::{Error, Failure, FailureKind, Metadata};
use proptest::prelude::*;

/// Property-based test generators
pub mod generators {
    use super::*;
    use proptest::collection::btree_map;
    use proptest::string::string_regex;

    /// Generate human readable error messages
    pub fn message() -> impl Strategy<Value = String> {
        string_regex("[a-zA-Z0-9 _.:-]{1,48}").unwrap()
    }

    /// Generate metadata maps with string and integer values
    pub fn metadata() -> impl Strategy<Value = Metadata> {
        btree_map(
            string_regex("[a-z_]{1,12}").unwrap(),
            prop_oneof![
                any::<i64>().prop_map(serde_json::Value::from),
                message().prop_map(serde_json::Value::from),
            ],
            0..4,
        )
    }

    /// Generate failure kinds
    pub fn failure_kind() -> impl Strategy<Value = FailureKind> {
        prop_oneof![
            Just(FailureKind::Result),
            Just(FailureKind::OptionNone),
            Just(FailureKind::InvalidArgument),
            Just(FailureKind::InvalidOperation),
            Just(FailureKind::Cancelled),
            Just(FailureKind::Panic),
            Just(FailureKind::External),
        ]
    }

    /// Generate both error representations
    pub fn error() -> impl Strategy<Value = Error> {
        prop_oneof![
            (message(), metadata()).prop_map(|(m, md)| Error::with_metadata(m, md)),
            (failure_kind(), message()).prop_map(|(k, m)| Error::from(Failure::new(k, m))),
        ]
    }

    /// Generate results over `value` with the default error channel
    pub fn result<T: std::fmt::Debug + Clone + 'static>(
        value: impl Strategy<Value = T>,
    ) -> impl Strategy<Value = crate::Result<T>> {
        prop_oneof![value.prop_map(Ok), error().prop_map(Err)]
    }
}
