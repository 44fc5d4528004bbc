//! Error types for mood detection

use thiserror::Error;

/// Failures the detection engine can run into. None of them end a session:
/// each one is recovered where it happens.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoodError {
    #[error("expression models are not loaded yet")]
    ModelsNotReady,

    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),

    #[error("no face detected")]
    NoFaceDetected,

    #[error("expression classifier failed: {0}")]
    ClassifierFailure(String),
}
