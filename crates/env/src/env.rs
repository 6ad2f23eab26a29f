use crate::error::ExpandError;
use crate::expand::{expand_with, ExpandOptions};
use crate::source::{ProcessEnv, VarSource};
use gnomestack_core::{Error, Result, ResultExt, Void, VoidResult};

/// Process environment access and expansion
pub struct Env;

impl Env {
    /// Expand `template` against the process environment, raising on failure.
    ///
    /// Use [`Env::try_expand_vars`] when the failure should stay a value.
    #[track_caller]
    pub fn expand_vars(template: &str) -> String {
        Self::try_expand_vars(template).unwrap_or_raise()
    }

    /// Expand `template` against the process environment
    pub fn try_expand_vars(template: &str) -> Result<String> {
        Self::try_expand_vars_with(template, &ExpandOptions::default())
    }

    pub fn try_expand_vars_with(template: &str, options: &ExpandOptions) -> Result<String> {
        expand_with(template, &mut ProcessEnv, options).map_err(Error::from)
    }

    pub fn var(name: &str) -> Option<String> {
        ProcessEnv.get(name)
    }

    pub fn has_var(name: &str) -> bool {
        ProcessEnv.contains(name)
    }

    /// Set a process variable.
    ///
    /// Names and values the platform cannot store are rejected with an
    /// invalid-argument error instead of aborting the process.
    pub fn set_var(name: &str, value: &str) -> VoidResult {
        ProcessEnv.set(name, value).map_err(rejected)?;
        Ok(Void)
    }

    pub fn remove_var(name: &str) -> VoidResult {
        ProcessEnv.remove(name).map_err(rejected)?;
        Ok(Void)
    }
}

fn rejected(error: ExpandError) -> Error {
    Error::invalid_argument("variable", error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gnomestack_core::FailureKind;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_var_lifecycle() {
        Env::set_var("GNOMESTACK_ENV_TEST", "value").unwrap();
        assert!(Env::has_var("GNOMESTACK_ENV_TEST"));
        assert_eq!(Env::var("GNOMESTACK_ENV_TEST").as_deref(), Some("value"));

        Env::remove_var("GNOMESTACK_ENV_TEST").unwrap();
        assert!(!Env::has_var("GNOMESTACK_ENV_TEST"));
    }

    #[test]
    fn test_rejects_bad_names() {
        let error = Env::set_var("A=B", "x").unwrap_err();
        assert_eq!(error.kind(), FailureKind::InvalidArgument);
        assert!(Env::remove_var("").is_err());
        assert!(Env::set_var("GNOMESTACK_ENV_NUL", "a\0b").is_err());
    }

    #[test]
    #[serial]
    fn test_assignment_of_unstorable_value_is_an_error_value() {
        Env::remove_var("GNOMESTACK_ASSIGN_NUL").unwrap();
        let error = Env::try_expand_vars("${GNOMESTACK_ASSIGN_NUL:=a\0b}").unwrap_err();
        let origin = error
            .as_exception()
            .and_then(|e| e.origin())
            .and_then(|o| o.downcast_ref::<ExpandError>());
        assert!(matches!(
            origin,
            Some(ExpandError::Rejected { name, .. }) if name == "GNOMESTACK_ASSIGN_NUL"
        ));
        assert!(!Env::has_var("GNOMESTACK_ASSIGN_NUL"));
    }

    #[test]
    #[serial]
    fn test_try_expand_vars_surfaces_typed_error() {
        Env::remove_var("GNOMESTACK_UNSET_TEST").unwrap();
        let error = Env::try_expand_vars("${GNOMESTACK_UNSET_TEST}").unwrap_err();
        let origin = error
            .as_exception()
            .and_then(|e| e.origin())
            .and_then(|o| o.downcast_ref::<ExpandError>());
        assert!(matches!(origin, Some(ExpandError::Unset { name }) if name == "GNOMESTACK_UNSET_TEST"));
    }
}
