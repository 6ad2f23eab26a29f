//! Where variable values come from
//!
//! Expansion reads and assigns through a [`VarSource`], so the same
//! engine runs against the real process environment or an in-memory map.

use crate::error::ExpandError;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::env;

/// Readers outnumber writers, so the process environment sits behind an RwLock
static ENV_LOCK: Lazy<RwLock<()>> = Lazy::new(|| RwLock::new(()));

/// A store of named string variables
pub trait VarSource {
    fn get(&self, name: &str) -> Option<String>;

    fn set(&mut self, name: &str, value: &str) -> Result<(), ExpandError>;

    fn remove(&mut self, name: &str) -> Result<(), ExpandError>;

    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// The current process environment.
///
/// Every access takes the crate-wide environment lock. Values that are not
/// valid unicode read as unset. Names and values the platform cannot store
/// are rejected before they reach `std::env`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ProcessEnv {
    /// Snapshot of every variable, sorted by name
    pub fn vars(&self) -> BTreeMap<String, String> {
        let _guard = ENV_LOCK.read();
        env::vars().collect()
    }
}

impl VarSource for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        if name.is_empty() {
            return None;
        }
        let _guard = ENV_LOCK.read();
        env::var(name).ok()
    }

    fn set(&mut self, name: &str, value: &str) -> Result<(), ExpandError> {
        check_name(name)?;
        if value.contains('\0') {
            return Err(ExpandError::rejected(name, "value contains a NUL byte"));
        }
        let _guard = ENV_LOCK.write();
        tracing::trace!(name, "setting environment variable");
        env::set_var(name, value);
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<(), ExpandError> {
        check_name(name)?;
        let _guard = ENV_LOCK.write();
        tracing::trace!(name, "removing environment variable");
        env::remove_var(name);
        Ok(())
    }
}

/// `std::env` panics on these instead of returning an error
fn check_name(name: &str) -> Result<(), ExpandError> {
    if name.is_empty() {
        return Err(ExpandError::rejected(name, "name is empty"));
    }
    if name.contains(['=', '\0']) {
        return Err(ExpandError::rejected(name, "name contains '=' or a NUL byte"));
    }
    Ok(())
}

/// An in-memory variable store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl VarSource for MapEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: &str) -> Result<(), ExpandError> {
        self.vars.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<(), ExpandError> {
        self.vars.remove(name);
        Ok(())
    }
}
