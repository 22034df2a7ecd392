use thiserror::Error;

/// Failures raised by the measurement core.
///
/// None of these is fatal to the host. Resolution failures skip the current
/// frame, lookup and write failures are logged and ignored, a missing asset
/// leaves the measurement without adjustable parameters, and an invalid
/// context cancels the active session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasureError {
    #[error("pointer could not be resolved to a world position: {0}")]
    Resolution(&'static str),

    #[error("no input matching '{keyword}' on the measurement graph")]
    Lookup { keyword: String },

    #[error("measurement graph '{0}' not found in any asset library")]
    AssetMissing(String),

    #[error("invalid context: {0}")]
    InvalidContext(&'static str),

    #[error("write to '{name}' rejected: {reason}")]
    WriteRejected { name: String, reason: String },

    #[error("measurement has no graph wrapper attached")]
    NoWrapper,
}

pub type MeasureResult<T> = Result<T, MeasureError>;
