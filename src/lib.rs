//! Emotion recognition library for a social robot's camera loop.
//!
//! Every camera frame goes through the same cycle:
//! 1. Face location, keeping the best candidate
//! 2. Classification of the face by a categorical model (eight emotions) and
//!    a dimensional model (arousal and valence)
//! 3. Selection of one label per frame with fixed priority rules
//! 4. Stabilization of the label across frames
//! 5. Reactions: head tracking, lost-face recovery, expression mirroring and
//!    spoken comments on sustained emotions
//!
//! The camera, face locator, models, robot and display are collaborators
//! behind traits in [`collaborators`]. `OpenCV` and `ONNX` Runtime
//! implementations live behind the `opencv` and `onnx` cargo features.
//!
//! # Examples
//!
//! ```no_run
//! # #[cfg(all(feature = "opencv", feature = "onnx"))]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use emotion_recognition::{
//!     app::{Collaborators, EmotionRecognition, StartOptions},
//!     classification::EmotionClassifiers,
//!     config::Config,
//!     onnx::OnnxClassifier,
//!     policy::ReactionPolicy,
//!     random::ThreadRandom,
//!     vision::{HaarFaceLocator, OpenCvCapture, VideoSource},
//! };
//!
//! let config = Config::default();
//! let models = &config.models;
//! let size = config.pipeline.face_size;
//!
//! let classifiers = EmotionClassifiers::new(
//!     Box::new(
//!         OnnxClassifier::new(&models.categorical_model, models.categorical_classes.clone(), size)?
//!             .with_output_scale(models.categorical_output_scale),
//!     ),
//!     Box::new(OnnxClassifier::new(&models.dimensional_model, models.dimensional_classes.clone(), size)?),
//! );
//! let collaborators = Collaborators::new(
//!     Box::new(OpenCvCapture::new(VideoSource::Camera(0), (640, 480))),
//!     Box::new(HaarFaceLocator::new(&models.face_cascade)?),
//!     classifiers,
//! );
//! let policy = ReactionPolicy::new(&config, Box::new(ThreadRandom));
//!
//! let mut recognition = EmotionRecognition::new(&config, collaborators, policy);
//! recognition.start(StartOptions::default())?;
//! for _ in 0..100 {
//!     recognition.step()?;
//!     if let Some(emotion) = recognition.highest_matching_emotion() {
//!         println!("{emotion}");
//!     }
//! }
//! recognition.stop();
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "opencv", feature = "onnx")))]
//! # fn main() {}
//! ```

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

/// Emotion classes, classifier results and label selection
pub mod emotion;

/// Frames, face regions and classifier input
pub mod frame;

/// Collaborator traits
pub mod collaborators;

/// Running both classifiers on a face
pub mod classification;

/// Frame-to-frame label stabilization
pub mod stabilizer;

/// Head tracking, recovery, mirroring and speech decisions
pub mod policy;

/// Phrase tables and speech backends
pub mod speech;

/// Random choices
pub mod random;

/// Display canvas and score overlay
pub mod overlay;

/// Logged stand-ins for the robot head and face
pub mod console;

/// Main application module
pub mod app;

/// `OpenCV` capture, face location and display
#[cfg(feature = "opencv")]
pub mod vision;

/// `ONNX` Runtime classifiers
#[cfg(feature = "onnx")]
pub mod onnx;

pub use error::{Error, Result};
