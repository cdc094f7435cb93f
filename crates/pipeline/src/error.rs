//! Error types for the pipeline crate.

use data_loader::DataLoadError;
use thiserror::Error;

/// Errors raised while building the report
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The dataset could not be loaded
    #[error(transparent)]
    Load(#[from] DataLoadError),

    /// A whole-dataset metric has too little data to be defined
    #[error("Insufficient data for {metric}: {reason}")]
    InsufficientData {
        metric: &'static str,
        reason: String,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, PipelineError>;
