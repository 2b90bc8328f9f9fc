//! Error handling for Wavelay
//!
//! Every failure in the core is a permanent input error: nothing is retried,
//! and the error reaches the caller unchanged.

use thiserror::Error;

/// Result type alias for Wavelay operations
pub type Result<T> = std::result::Result<T, WavelayError>;

/// Main error type for Wavelay operations
#[derive(Error, Debug)]
pub enum WavelayError {
    // Overlay Errors
    #[error("Incompatible channel counts: {channels1} and {channels2}")]
    IncompatibleChannels { channels1: usize, channels2: usize },

    #[error("Mix ratio must be within [0.0, 1.0], got {mix_ratio}")]
    InvalidMixRatio { mix_ratio: f32 },

    #[error("Unknown blend mode: '{value}' (expected add, average or mix)")]
    UnknownBlendMode { value: String },

    #[error("Unknown target rate policy: '{value}' (expected auto, audio1, audio2, higher or lower)")]
    UnknownRatePolicy { value: String },

    // Waveform Validation Errors
    #[error("Invalid sample rate: {sample_rate}Hz (must be greater than zero)")]
    InvalidSampleRate { sample_rate: u32 },

    #[error("Invalid waveform shape: {reason}")]
    InvalidShape { reason: String },

    #[error("Waveform contains non-finite samples (NaN/Inf)")]
    NonFiniteSamples,

    // File Errors (host binary)
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl WavelayError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            WavelayError::IncompatibleChannels { .. } => "INCOMPATIBLE_CHANNELS",
            WavelayError::InvalidMixRatio { .. } => "INVALID_MIX_RATIO",
            WavelayError::UnknownBlendMode { .. } => "UNKNOWN_BLEND_MODE",
            WavelayError::UnknownRatePolicy { .. } => "UNKNOWN_RATE_POLICY",
            WavelayError::InvalidSampleRate { .. } => "INVALID_SAMPLE_RATE",
            WavelayError::InvalidShape { .. } => "INVALID_SHAPE",
            WavelayError::NonFiniteSamples => "NON_FINITE_SAMPLES",
            WavelayError::FileNotFound { .. } => "FILE_NOT_FOUND",
            WavelayError::InvalidAudio { .. } => "INVALID_AUDIO",
            WavelayError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            WavelayError::Io(_) => "IO_ERROR",
            WavelayError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if retrying the same call could succeed.
    ///
    /// Core computations are deterministic, so only environmental
    /// failures in the host layer qualify.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, WavelayError::Io(_))
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            WavelayError::IncompatibleChannels { .. } => vec![
                "Only mono and stereo inputs can be reconciled automatically",
                "Downmix or split the multichannel input before overlaying",
            ],
            WavelayError::InvalidMixRatio { .. } => vec![
                "Use a mix ratio between 0.0 (only audio2) and 1.0 (only audio1)",
            ],
            WavelayError::UnknownBlendMode { .. } => vec!["Valid blend modes: add, average, mix"],
            WavelayError::UnknownRatePolicy { .. } => {
                vec!["Valid target rate policies: auto, audio1, audio2, higher, lower"]
            }
            WavelayError::InvalidShape { .. } => vec![
                "Waveforms must be samples, channels x samples, or 1 x channels x samples",
                "Every channel must hold the same number of samples",
            ],
            WavelayError::FileNotFound { .. } => vec![
                "Check the file path is correct",
                "Verify the file hasn't been moved or deleted",
            ],
            WavelayError::InvalidAudio { .. } => vec![
                "Try converting the file to WAV format first",
                "The file may be corrupted - try re-exporting from source",
            ],
            WavelayError::UnsupportedFormat { .. } => vec![
                "Convert to 16-, 24- or 32-bit PCM or 32-bit float WAV",
            ],
            _ => vec![],
        }
    }
}
