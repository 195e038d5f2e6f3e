use thiserror::Error;

pub type WaResult<T> = Result<T, WaError>;

#[derive(Debug, Error)]
pub enum WaError {
    #[error("json failure: {0}")]
    Json(#[from] serde_json::Error),

    #[error("audio decode failed for `{file_name}`: {reason}")]
    DecodeFailure { file_name: String, reason: String },

    #[error("unknown segment reference: `{0}`")]
    UnknownSegment(String),

    #[error("degenerate interval: start {start_sec}s does not precede end {end_sec}s")]
    DegenerateInterval { start_sec: f64, end_sec: f64 },

    #[error("negative time offset: {value_sec}s")]
    NegativeTime { value_sec: f64 },

    #[error("mirror desync: {0}")]
    MirrorDesync(String),
}

impl WaError {
    /// Stable, unique, machine-readable error code for every variant.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Json(_) => "WA-JSON",
            Self::DecodeFailure { .. } => "WA-DECODE",
            Self::UnknownSegment(_) => "WA-UNKNOWN-SEGMENT",
            Self::DegenerateInterval { .. } => "WA-DEGENERATE-INTERVAL",
            Self::NegativeTime { .. } => "WA-NEGATIVE-TIME",
            Self::MirrorDesync(_) => "WA-MIRROR-DESYNC",
        }
    }
}
