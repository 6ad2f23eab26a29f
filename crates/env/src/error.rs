use gnomestack_core::Error;
use thiserror::Error as ThisError;

/// Why a template could not be expanded
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ExpandError {
    /// `$NAME`, `${NAME}` or `%NAME%` referenced a variable that is not set
    #[error("Bad substitution, variable {name} is not set.")]
    Unset { name: String },

    /// `${NAME:?message}` found the variable unset or empty
    #[error("{message}")]
    Required { name: String, message: String },

    /// A `${` or `%` token had no closing delimiter
    #[error("Unclosed token '{token}' at position {position}")]
    Unclosed { token: String, position: usize },

    /// `${...}` did not start with a valid variable name
    #[error("Invalid variable name at position {position}")]
    InvalidName { position: usize },

    /// The store refused to set or remove a variable
    #[error("Cannot assign variable '{name}': {reason}")]
    Rejected { name: String, reason: String },
}

impl ExpandError {
    #[must_use]
    pub fn unset(name: impl Into<String>) -> Self {
        Self::Unset { name: name.into() }
    }

    #[must_use]
    pub fn required(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Required {
            name: name.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unclosed(token: impl Into<String>, position: usize) -> Self {
        Self::Unclosed {
            token: token.into(),
            position,
        }
    }

    #[must_use]
    pub fn rejected(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// The variable the failure is about, when there is one
    pub fn variable(&self) -> Option<&str> {
        match self {
            Self::Unset { name } | Self::Required { name, .. } | Self::Rejected { name, .. } => {
                Some(name)
            }
            Self::Unclosed { .. } | Self::InvalidName { .. } => None,
        }
    }
}

/// Expansion failures keep their typed origin inside the exception error,
/// so callers can still downcast to `ExpandError`.
impl From<ExpandError> for Error {
    fn from(error: ExpandError) -> Self {
        Error::exception(error)
    }
}
