//! Error types for the configured builder.
//!

use crate::state_machine::BuildState;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuilderError {
    /// A registry mutation was attempted after the lifecycle moved past initialization
    #[error("Cannot {operation} while builder is {state}: object is already configured")]
    IllegalState {
        operation: String,
        state: BuildState,
    },

    #[error("This object has already been built")]
    AlreadyBuilt,

    #[error("This object has not been built")]
    NotBuilt,

    #[error("Invalid argument '{argument}': {reason}")]
    InvalidArgument { argument: String, reason: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failure raised by a configurer or lifecycle hook, surfaced unchanged
    #[error(transparent)]
    Callback(#[from] anyhow::Error),
}

impl From<::config::ConfigError> for BuilderError {
    fn from(err: ::config::ConfigError) -> Self {
        BuilderError::Configuration(err.to_string())
    }
}

pub type BuilderResult<T> = std::result::Result<T, BuilderError>;

/// Helper function to create illegal state errors
pub fn illegal_state(operation: impl Into<String>, state: BuildState) -> BuilderError {
    BuilderError::IllegalState {
        operation: operation.into(),
        state,
    }
}

/// Helper function to create invalid argument errors
pub fn invalid_argument(argument: impl Into<String>, reason: impl Into<String>) -> BuilderError {
    BuilderError::InvalidArgument {
        argument: argument.into(),
        reason: reason.into(),
    }
}

impl BuilderError {
    pub fn is_illegal_state(&self) -> bool {
        matches!(self, Self::IllegalState { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}
