//! Application-level errors.  The frame loop itself never fails once the
//! window is open; everything here happens at startup.

use particle_field::FieldError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("cannot open window: {0}")]
    Window(#[from] minifb::Error),

    #[error(transparent)]
    Field(#[from] FieldError),

    /// The requested back-end was not compiled in.
    #[error("hand source `{0}` is not available in this build")]
    SourceUnavailable(&'static str),

    #[error("unknown hand source `{0}` (expected sim, orbit or leap)")]
    UnknownSource(String),

    #[error("{flag}: {reason}")]
    Argument { flag: &'static str, reason: String },
}

impl AppError {
    pub(crate) fn argument(flag: &'static str, reason: impl Into<String>) -> Self {
        AppError::Argument { flag, reason: reason.into() }
    }
}
