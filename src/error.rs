use thiserror::Error;

/// Errors from the surfaces around the engine (config, batch input, output).
///
/// Prediction itself never fails.
#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv line {line}: {reason}")]
    Csv { line: usize, reason: &'static str },
    #[error("invalid engine config: {0}")]
    InvalidConfig(&'static str),
}
