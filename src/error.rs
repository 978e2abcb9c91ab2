//! Error types for the emotion recognition library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// `OpenCV` operation failed
    #[cfg(feature = "opencv")]
    #[error("OpenCV error: {0}")]
    OpenCV(#[from] opencv::Error),

    /// `ONNX` Runtime inference failed
    #[cfg(feature = "onnx")]
    #[error("ONNX Runtime error: {0}")]
    OnnxRuntime(#[from] ort::OrtError),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image processing operation failed
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// HTTP request to a speech service failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model loading or inference error
    #[error("Model error: {0}")]
    ModelError(String),

    /// Model output could not be turned into a classification
    #[error("Classification error: {0}")]
    Classification(String),

    /// Capture device failed to open, read or close
    #[error("Capture error: {0}")]
    Capture(String),

    /// Capture device has no more frames
    #[error("End of stream")]
    EndOfStream,

    /// Robot motion command failed
    #[error("Robot motion error: {0}")]
    Robot(String),

    /// Facial expression output failed
    #[error("Expression output error: {0}")]
    Expression(String),

    /// Speech synthesis or playback failed
    #[error("Speech error: {0}")]
    Speech(String),

    /// Display window operation failed
    #[error("Display error: {0}")]
    Display(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
