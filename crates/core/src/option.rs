//! Constructors and extensions for `Option`
//!
//! `Option` is the presence/absence container. The standard library
//! already provides `is_some`, `is_none`, `map`, `unwrap_or` and the lazy
//! `unwrap_or_else`; this module adds constructors that understand void
//! values and the conversions into `Result`, which are assertion points:
//! converting a `None` raises immediately instead of inventing a default.

use crate::errors::{Error, Failure, Result};
use crate::fail_fast::raise;
use crate::void::IsVoid;
use std::any::type_name;
use std::future::Future;

/// A present option
pub fn some<T>(value: T) -> Option<T> {
    Some(value)
}

/// A present option, rejecting void values.
///
/// Fails with an invalid-argument error when `value` is void (a null
/// pointer, JSON `null`, a `None`, ...).
pub fn try_some<T: IsVoid>(value: T) -> Result<Option<T>> {
    if value.is_void() {
        return Err(Error::invalid_argument(
            "value",
            format!("a present {} must not be void.", type_name::<T>()),
        ));
    }
    Ok(Some(value))
}

/// The absent option for `T`
pub fn none<T>() -> Option<T> {
    None
}

/// `Some(value)` unless `value` is void
pub fn from_value<T: IsVoid>(value: T) -> Option<T> {
    if value.is_void() {
        None
    } else {
        Some(value)
    }
}

/// Flatten a nullable value whose payload may itself be void
pub fn from_nullable<T: IsVoid>(value: Option<T>) -> Option<T> {
    value.and_then(from_value)
}

/// Await `future` and wrap its output, treating a void output as `None`
pub async fn from_future<F>(future: F) -> Option<F::Output>
where
    F: Future,
    F::Output: IsVoid,
{
    from_value(future.await)
}

/// Await a future producing a nullable value
pub async fn from_nullable_future<F, T>(future: F) -> Option<T>
where
    F: Future<Output = Option<T>>,
    T: IsVoid,
{
    from_nullable(future.await)
}

/// Returns `true` for `None` and for a `Some` holding a void payload
pub fn is_void_or_none<T: IsVoid>(value: &Option<T>) -> bool {
    value.as_ref().map_or(true, IsVoid::is_void)
}

/// Fail-fast and conversion helpers for `Option`
pub trait OptionExt<T> {
    /// Return the payload, or raise an option-none failure naming `T`
    fn unwrap_or_raise(self) -> T;

    /// Return the payload, or raise an option-none failure with `message`
    fn expect_or_raise(self, message: &str) -> T;

    /// Convert to `Ok`.
    ///
    /// A `None` raises an option-none failure right here; this is an
    /// assertion that the value is present, not a fallible conversion.
    fn into_ok<E>(self) -> std::result::Result<T, E>;

    /// Convert to `Err`, raising immediately when `None`
    fn into_err<V>(self) -> std::result::Result<V, T>;

    /// Apply `f` if present, otherwise call `default`
    fn map_or_else_with<U, F, D>(self, default: D, f: F) -> U
    where
        F: FnOnce(T) -> U,
        D: FnOnce() -> U;

    /// Observe the payload without consuming it
    fn tap_some<F>(self, f: F) -> Self
    where
        F: FnOnce(&T);

    /// Run a side effect when absent
    fn tap_none<F>(self, f: F) -> Self
    where
        F: FnOnce();
}

impl<T> OptionExt<T> for Option<T> {
    #[track_caller]
    fn unwrap_or_raise(self) -> T {
        match self {
            Some(value) => value,
            None => raise(Failure::option_none(format!(
                "Option<{}> is None.",
                type_name::<T>()
            ))),
        }
    }

    #[track_caller]
    fn expect_or_raise(self, message: &str) -> T {
        match self {
            Some(value) => value,
            None => raise(Failure::option_none(message)),
        }
    }

    #[track_caller]
    fn into_ok<E>(self) -> std::result::Result<T, E> {
        let message = || {
            format!(
                "conversion from Option<{value}> to Result<{value}, {error}> failed because the option was None.",
                value = type_name::<T>(),
                error = type_name::<E>(),
            )
        };
        match self {
            Some(value) => Ok(value),
            None => raise(Failure::option_none(message())),
        }
    }

    #[track_caller]
    fn into_err<V>(self) -> std::result::Result<V, T> {
        let message = || {
            format!(
                "conversion from Option<{error}> to Result<{value}, {error}> failed because the option was None.",
                value = type_name::<V>(),
                error = type_name::<T>(),
            )
        };
        match self {
            Some(error) => Err(error),
            None => raise(Failure::option_none(message())),
        }
    }

    fn map_or_else_with<U, F, D>(self, default: D, f: F) -> U
    where
        F: FnOnce(T) -> U,
        D: FnOnce() -> U,
    {
        match self {
            Some(value) => f(value),
            None => default(),
        }
    }

    fn tap_some<F>(self, f: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Some(ref value) = self {
            f(value);
        }
        self
    }

    fn tap_none<F>(self, f: F) -> Self
    where
        F: FnOnce(),
    {
        if self.is_none() {
            f();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FailureKind;
    use crate::fail_fast::CaptureGuard;
    use std::cell::Cell;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn raised<R>(f: impl FnOnce() -> R) -> Failure {
        let _guard = CaptureGuard::enter();
        let payload = catch_unwind(AssertUnwindSafe(f)).err().expect("should have raised");
        *payload.downcast::<Failure>().expect("payload should be a Failure")
    }

    #[test]
    fn test_some_and_none() {
        let present = some(5);
        assert!(present.is_some());
        assert!(!present.is_none());
        assert_eq!(present.unwrap_or_raise(), 5);
        assert!(none::<i32>().is_none());
    }

    #[test]
    fn test_try_some_rejects_void() {
        let null: *const u8 = std::ptr::null();
        let error = try_some(null).unwrap_err();
        assert_eq!(error.kind(), FailureKind::InvalidArgument);

        let error = try_some(serde_json::Value::Null).unwrap_err();
        assert!(error.text().starts_with("value: "));

        assert_eq!(try_some(3_u8).unwrap(), Some(3));
    }

    #[test]
    fn test_from_value_and_nullable() {
        assert_eq!(from_value(serde_json::Value::Null), None);
        assert_eq!(from_value(7_i64), Some(7));
        assert_eq!(from_nullable(Some(serde_json::Value::Null)), None);
        assert_eq!(from_nullable::<i32>(None), None);
        assert!(is_void_or_none(&Some(())));
        assert!(!is_void_or_none(&Some(1)));
    }

    #[tokio::test]
    async fn test_from_future_treats_void_output_as_none() {
        assert_eq!(from_future(async { 9_u32 }).await, Some(9));
        assert_eq!(from_future(async { serde_json::Value::Null }).await, None);
        assert_eq!(from_nullable_future(async { None::<String> }).await, None);
        assert_eq!(
            from_nullable_future(async { Some("ready".to_string()) }).await,
            Some("ready".to_string())
        );
    }

    #[test]
    fn test_unwrap_or_supplier_is_lazy_when_present() {
        let calls = Cell::new(0);
        let value = Some(1).unwrap_or_else(|| {
            calls.set(calls.get() + 1);
            0
        });
        assert_eq!(value, 1);
        assert_eq!(calls.get(), 0);
        assert_eq!(None.unwrap_or(4), 4);
    }

    #[test]
    fn test_map_skips_function_on_none() {
        let calls = Cell::new(0);
        let mapped = none::<i32>().map(|x| {
            calls.set(calls.get() + 1);
            x * 2
        });
        assert_eq!(mapped, None);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_unwrap_or_raise_names_type() {
        let failure = raised(|| none::<String>().unwrap_or_raise());
        assert_eq!(failure.kind(), FailureKind::OptionNone);
        assert!(failure.message().contains("String"));

        let failure = raised(|| none::<u8>().expect_or_raise("port is required"));
        assert_eq!(failure.message(), "port is required");
    }

    #[test]
    fn test_into_ok_asserts_immediately() {
        let ok: std::result::Result<i32, Error> = Some(3).into_ok();
        assert_eq!(ok, Ok(3));

        let failure = raised(|| none::<i32>().into_ok::<Error>());
        assert!(failure.message().ends_with("failed because the option was None."));

        let err: std::result::Result<i32, &str> = Some("bad").into_err();
        assert_eq!(err, Err("bad"));
    }

    #[test]
    fn test_taps_and_map_or_else_with() {
        let seen = Cell::new(0);
        let value = Some(21).tap_some(|v| seen.set(*v)).tap_none(|| seen.set(-1));
        assert_eq!(seen.get(), 21);
        assert_eq!(value.map_or_else_with(|| 0, |x| x * 2), 42);
        assert_eq!(None::<i32>.map_or_else_with(|| 0, |x| x * 2), 0);
    }
}
