//! Fail-fast helpers for boundaries that still unwind.
//!
//! Everything else in this crate returns errors as values. The functions
//! here are the only ones that raise: they take a result or option already
//! known to be in its failure state and unwind with a [`Failure`] payload.
//! A try-bridge further up the stack turns that payload back into the same
//! typed error.

use crate::config;
use crate::errors::{Error, ExceptionError, Failure};
use std::any::Any;
use std::cell::Cell;
use std::error::Error as StdError;
use std::fmt::Debug;
use std::sync::{Arc, Once};

static HOOK: Once = Once::new();

thread_local! {
    static CAPTURE_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Marks the current thread as running inside a try-bridge
pub(crate) struct CaptureGuard;

impl CaptureGuard {
    pub(crate) fn enter() -> Self {
        CAPTURE_DEPTH.with(|depth| depth.set(depth.get() + 1));
        CaptureGuard
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        CAPTURE_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

fn is_capturing() -> bool {
    CAPTURE_DEPTH.with(|depth| depth.get() > 0)
}

/// Install a panic hook that renders `Failure` payloads.
///
/// Failure panics print their message and full cause chain instead of the
/// opaque `Box<dyn Any>` the default hook shows. Panics captured by a
/// try-bridge go to `tracing` at debug level when
/// `quiet_captured_panics` is set. Other panics are handed to the hook that
/// was installed before. Calling this more than once has no effect.
pub fn install_panic_hook() {
    HOOK.call_once(|| {
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let location = panic_info
                .location()
                .map(ToString::to_string)
                .unwrap_or_else(|| "<unknown>".to_string());

            if is_capturing() && config::global().quiet_captured_panics {
                tracing::debug!(%location, "panic captured by try-bridge");
                return;
            }

            if let Some(failure) = panic_info.payload().downcast_ref::<Failure>() {
                let thread = std::thread::current();
                let name = thread.name().unwrap_or("<unnamed>");
                eprintln!(
                    "thread '{name}' raised a {} failure at {location}:\n{}",
                    failure.kind(),
                    failure.report()
                );
                return;
            }

            original_hook(panic_info);
        }));
    });
}

pub(crate) fn ensure_hook() {
    if config::global().panic_hook {
        install_panic_hook();
    }
}

/// Whether `raise` reports the failure itself.
///
/// A captured failure is not an error yet, and the installed hook already
/// prints the report for an uncaptured one.
fn raise_reports() -> bool {
    !is_capturing() && !HOOK.is_completed()
}

/// Unwind with `failure` as the panic payload
#[track_caller]
pub fn raise(failure: Failure) -> ! {
    ensure_hook();
    if raise_reports() {
        tracing::error!(kind = %failure.kind(), "{}", failure.report());
    } else {
        tracing::debug!(kind = %failure.kind(), message = failure.message(), "raising failure");
    }
    std::panic::panic_any(failure)
}

fn is_known_payload(any: &dyn Any) -> bool {
    any.is::<Failure>()
        || any.is::<Error>()
        || any.is::<ExceptionError>()
        || any.is::<String>()
        || any.is::<&'static str>()
        || any.is::<std::io::Error>()
        || any.is::<Box<dyn StdError + Send + Sync>>()
        || any.is::<anyhow::Error>()
}

/// Derive the failure an error raises as.
///
/// Failures pass through, exception errors are rebuilt with their original
/// message and cause, message errors and strings raise with their text,
/// and any other type raises with its debug rendering.
pub fn failure_from<E>(error: E) -> Failure
where
    E: Debug + Send + 'static,
{
    if !is_known_payload(&error) {
        return Failure::result(format!("result failed with error {error:?}."));
    }

    let payload: Box<dyn Any + Send> = Box::new(error);
    let payload = match payload.downcast::<Failure>() {
        Ok(failure) => return *failure,
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<Error>() {
        Ok(error) => return error.to_failure(),
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<ExceptionError>() {
        Ok(exception) => return exception.to_exception(),
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<String>() {
        Ok(message) => return Failure::result(*message),
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<&'static str>() {
        Ok(message) => return Failure::result(*message),
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<std::io::Error>() {
        Ok(error) => return Failure::result(error.to_string()).caused_by(*error),
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<Box<dyn StdError + Send + Sync>>() {
        Ok(error) => {
            let error: Arc<dyn StdError + Send + Sync> = Arc::from(*error);
            return Failure::result(error.to_string()).with_shared_cause(error);
        }
        Err(payload) => payload,
    };
    match payload.downcast::<anyhow::Error>() {
        Ok(error) => {
            let error: Box<dyn StdError + Send + Sync> = (*error).into();
            Failure::result(error.to_string()).with_shared_cause(Arc::from(error))
        }
        Err(_) => Failure::result("result failed with an error."),
    }
}

/// Return the value of `result`, or raise the failure its error derives
#[track_caller]
pub fn raise_if_error<T, E>(result: Result<T, E>) -> T
where
    E: Debug + Send + 'static,
{
    match result {
        Ok(value) => value,
        Err(error) => raise(failure_from(error)),
    }
}

/// Like [`raise_if_error`], prefixing the raised message with `message`
#[track_caller]
pub fn raise_if_error_with<T, E>(result: Result<T, E>, message: &str) -> T
where
    E: Debug + Send + 'static,
{
    match result {
        Ok(value) => value,
        Err(error) => {
            let derived = failure_from(error);
            let text = format!("{message}: {}", derived.message());
            raise(Failure::new(derived.kind(), text).caused_by(derived))
        }
    }
}

/// Return the payload of `option`, or raise an option-none failure
#[track_caller]
pub fn raise_if_none<T>(option: Option<T>) -> T {
    match option {
        Some(value) => value,
        None => raise(Failure::option_none(format!(
            "Option<{}> is None.",
            std::any::type_name::<T>()
        ))),
    }
}
