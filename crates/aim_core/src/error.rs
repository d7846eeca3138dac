use thiserror::Error;

#[derive(Error, Debug)]
pub enum AimError {
    #[error("Invalid rotations config: {0}")]
    InvalidConfig(#[from] validator::ValidationErrors),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Invalid smoothing parameter `{field}`: {reason}")]
    InvalidSmoothing { field: &'static str, reason: String },

    #[error("Hook `{hook}` failed: {source}")]
    Hook {
        hook: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl AimError {
    pub(crate) fn smoothing(field: &'static str, reason: impl Into<String>) -> Self {
        AimError::InvalidSmoothing { field, reason: reason.into() }
    }

    /// Configuration problems must be fixed by the caller; hook failures are transient.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AimError::InvalidConfig(_) => false,
            AimError::ConfigParse(_) => false,
            AimError::InvalidSmoothing { .. } => false,
            AimError::Hook { .. } => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, AimError>;
