use thiserror::Error;

/// Failures raised by the detection pipeline.
///
/// Every variant is terminal for the request that produced it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectionError {
    /// The input header matches no supported container.
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),
    /// The header was recognised but the payload could not be parsed.
    #[error("corrupt audio input: {0}")]
    CorruptInput(String),
    /// The audio sample rate can not be converted by this build.
    #[error("unsupported sample rate {found}hz, expected {expected}hz")]
    UnsupportedSampleRate { found: u32, expected: u32 },
    /// The audio buffer does not match the feature extractor configuration.
    #[error("incompatible audio format: {0}")]
    IncompatibleAudioFormat(String),
    #[error("empty audio input")]
    EmptyInput,
    #[error("feature vector has {found} values but the model expects {expected}")]
    DimensionMismatch { expected: usize, found: usize },
    /// No model is installed, or loading it failed.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DetectionError {
    pub fn is_model_unavailable(&self) -> bool {
        matches!(self, DetectionError::ModelUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, DetectionError>;
