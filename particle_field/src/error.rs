//! Errors raised while building a field.  Stepping a built field never fails.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FieldError {
    /// The config file could not be read.
    #[error("cannot read field config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`FieldConfig`](crate::FieldConfig).
    #[error("invalid field config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A parameter parsed but is out of range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Parallel per-particle arrays disagree in length.
    #[error("particle arrays differ in length: {positions} positions, {directions} directions")]
    LengthMismatch { positions: usize, directions: usize },
}

impl FieldError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        FieldError::InvalidParameter { name, reason: reason.into() }
    }
}
