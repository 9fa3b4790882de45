use std::path::PathBuf;
use thiserror::Error;

/// Reasons an analysis produces no result.
///
/// Every variant is terminal: the analyzer never hands back a partial
/// waveform alongside an error.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Failed to open audio file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("No audio source available: {0}")]
    SourceUnavailable(String),
    #[error("Failed to decode audio: {0}")]
    DecodeFailure(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
