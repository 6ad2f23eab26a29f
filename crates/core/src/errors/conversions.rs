//! Conversions into the error model

use super::exception::ExceptionError;
use super::failure::Failure;
use super::types::Error;
use super::UNKNOWN_FAILURE;
use std::any::Any;
use std::error::Error as StdError;

impl Error {
    /// Map any captured failure payload to an error.
    ///
    /// This is what every try-bridge calls with the payload of a caught
    /// panic. It is total: structured payloads keep their identity, text
    /// payloads become panic errors, and anything else still yields a
    /// well-formed error.
    pub fn convert(payload: Box<dyn Any + Send + 'static>) -> Error {
        let payload = match payload.downcast::<Failure>() {
            Ok(failure) => return Error::from(*failure),
            Err(payload) => payload,
        };
        let payload = match payload.downcast::<Error>() {
            Ok(error) => return *error,
            Err(payload) => payload,
        };
        let payload = match payload.downcast::<ExceptionError>() {
            Ok(exception) => return Error::Exception(*exception),
            Err(payload) => payload,
        };
        let payload = match payload.downcast::<String>() {
            Ok(message) => return Error::Exception(ExceptionError::from_panic(*message)),
            Err(payload) => payload,
        };
        let payload = match payload.downcast::<&'static str>() {
            Ok(message) => return Error::Exception(ExceptionError::from_panic(*message)),
            Err(payload) => payload,
        };
        let payload = match payload.downcast::<Box<dyn StdError + Send + Sync>>() {
            Ok(error) => return Error::from_boxed(*error),
            Err(payload) => payload,
        };
        match payload.downcast::<anyhow::Error>() {
            Ok(error) => Error::from(*error),
            Err(_) => {
                tracing::debug!("captured a panic payload of unknown type");
                Error::Exception(ExceptionError::from_panic(UNKNOWN_FAILURE))
            }
        }
    }
}

impl From<Failure> for Error {
    fn from(failure: Failure) -> Self {
        Error::Exception(ExceptionError::from_failure(failure))
    }
}

impl From<ExceptionError> for Error {
    fn from(exception: ExceptionError) -> Self {
        Error::Exception(exception)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::exception(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::exception(error)
    }
}

impl From<anyhow::Error> for Error {
    fn from(error: anyhow::Error) -> Self {
        let error = match error.downcast::<Error>() {
            Ok(error) => return error,
            Err(error) => error,
        };
        Error::from_boxed(error.into())
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::message(message)
    }
}

impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Error::message(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FailureKind;
    use std::io;

    #[test]
    fn test_convert_text_panics() {
        let error = Error::convert(Box::new("static text"));
        assert_eq!(error.text(), "static text");
        assert_eq!(error.kind(), FailureKind::Panic);

        let error = Error::convert(Box::new(String::from("owned text")));
        assert_eq!(error.text(), "owned text");
    }

    #[test]
    fn test_convert_structured_payloads() {
        let error = Error::convert(Box::new(Failure::cancelled()));
        assert!(error.is_cancelled());

        let error = Error::convert(Box::new(Error::message("typed")));
        assert_eq!(error, Error::message("typed"));

        let boxed: Box<dyn StdError + Send + Sync> = Box::new(io::Error::other("disk gone"));
        let error = Error::convert(Box::new(boxed));
        assert_eq!(error.text(), "disk gone");
    }

    #[test]
    fn test_convert_is_total() {
        let error = Error::convert(Box::new(42_u64));
        assert_eq!(error.text(), "unknown failure");

        let error = Error::convert(Box::new(String::new()));
        assert_eq!(error.text(), "unknown failure");
    }

    #[test]
    fn test_anyhow_round_trips_typed_errors() {
        let typed = Error::message("typed inside anyhow");
        let error = Error::from(anyhow::Error::new(typed.clone()));
        assert_eq!(error, typed);

        let error = Error::from(anyhow::anyhow!("ad hoc"));
        assert_eq!(error.text(), "ad hoc");
        assert_eq!(error.kind(), FailureKind::External);
    }
}
