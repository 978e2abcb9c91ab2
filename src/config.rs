//! Configuration management for the emotion recognition application

use crate::{
    constants::{
        DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_CATEGORICAL_OFFSET, DEFAULT_FACE_DETECTION_DELTA,
        DEFAULT_FACE_SIZE, DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH, DEFAULT_HORIZONTAL_FOV,
        DEFAULT_LOST_FACE_THRESHOLD, DEFAULT_RECOVERY_PAN_JITTER, DEFAULT_RECOVERY_SPEED,
        DEFAULT_RECOVERY_TILT_BIAS, DEFAULT_RECOVERY_TILT_JITTER, DEFAULT_SETTLE_TIME_MS, DEFAULT_TRACKING_SPEED,
        DEFAULT_VERTICAL_FOV,
    },
    speech::Language,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model configuration
    pub models: ModelConfig,

    /// Camera configuration
    pub capture: CaptureConfig,

    /// Per-frame pipeline parameters
    pub pipeline: PipelineConfig,

    /// Head tracking and recovery configuration
    pub tracking: TrackingConfig,

    /// Speech configuration
    pub speech: SpeechConfig,

    /// Display configuration
    pub display: DisplayConfig,
}

/// Model files and their class orders
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Haar cascade used by the face locator
    pub face_cascade: PathBuf,

    /// Categorical emotion ONNX model
    pub categorical_model: PathBuf,

    /// Dimensional (arousal/valence) ONNX model
    pub dimensional_model: PathBuf,

    /// Class labels of the categorical model, in output order
    pub categorical_classes: Vec<String>,

    /// Class labels of the dimensional model, in output order
    pub dimensional_classes: Vec<String>,

    /// Factor turning categorical model outputs into percentages
    pub categorical_output_scale: f32,
}

/// Camera parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Camera index
    pub device: i32,

    /// Frame width in pixels
    pub frame_width: u32,

    /// Frame height in pixels
    pub frame_height: u32,
}

/// Per-frame pipeline parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Face frames between head tracking evaluations
    pub face_detection_delta: u32,

    /// Classifier input edge length
    pub face_size: u32,
}

/// Head tracking and lost-face recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Horizontal camera field of view in degrees
    pub horizontal_fov: f64,

    /// Vertical camera field of view in degrees
    pub vertical_fov: f64,

    /// Joint speed for tracking moves
    pub tracking_speed: f64,

    /// Time tracking updates are ignored after a move, in milliseconds
    pub settle_time_ms: u64,

    /// Consecutive empty frames tolerated before recentering
    pub lost_face_threshold: u32,

    /// Joint speed for the recovery pose
    pub recovery_speed: f64,

    /// Maximum pan jitter of the recovery pose in degrees
    pub recovery_pan_jitter: i32,

    /// Tilt of the recovery pose in degrees
    pub recovery_tilt_bias: i32,

    /// Maximum tilt jitter of the recovery pose in degrees
    pub recovery_tilt_jitter: i32,
}

/// Speech output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Comment on sustained emotions
    pub enabled: bool,

    /// Phrase language
    pub language: Language,

    /// Directory of cached synthesized phrases
    pub cache_dir: PathBuf,

    /// Online synthesis endpoint
    pub tts_url: String,

    /// Timeout of a synthesis request in milliseconds
    pub request_timeout_ms: u64,

    /// Audio player command; the file path is appended
    pub player: Vec<String>,

    /// Offline engine command; voice and text are appended
    pub fallback: Vec<String>,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Window title
    pub window_title: String,

    /// Canvas width; the frame sits in the top-left corner
    pub canvas_width: u32,

    /// Canvas height
    pub canvas_height: u32,

    /// Vertical position of the first categorical score bar
    pub categorical_offset: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            face_cascade: PathBuf::from("assets/haarcascade_frontalface_default.xml"),
            categorical_model: PathBuf::from("assets/categorical.onnx"),
            dimensional_model: PathBuf::from("assets/dimensional.onnx"),
            categorical_classes: ["Neutral", "Happiness", "Surprise", "Sadness", "Anger", "Disgust", "Fear", "Contempt"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            dimensional_classes: vec!["arousal".to_string(), "valence".to_string()],
            categorical_output_scale: 100.0,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device: 0,
            frame_width: DEFAULT_FRAME_WIDTH,
            frame_height: DEFAULT_FRAME_HEIGHT,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            face_detection_delta: DEFAULT_FACE_DETECTION_DELTA,
            face_size: DEFAULT_FACE_SIZE,
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            horizontal_fov: DEFAULT_HORIZONTAL_FOV,
            vertical_fov: DEFAULT_VERTICAL_FOV,
            tracking_speed: DEFAULT_TRACKING_SPEED,
            settle_time_ms: DEFAULT_SETTLE_TIME_MS,
            lost_face_threshold: DEFAULT_LOST_FACE_THRESHOLD,
            recovery_speed: DEFAULT_RECOVERY_SPEED,
            recovery_pan_jitter: DEFAULT_RECOVERY_PAN_JITTER,
            recovery_tilt_bias: DEFAULT_RECOVERY_TILT_BIAS,
            recovery_tilt_jitter: DEFAULT_RECOVERY_TILT_JITTER,
        }
    }
}

impl TrackingConfig {
    /// Settle time as a duration
    #[must_use]
    pub const fn settle_time(&self) -> Duration {
        Duration::from_millis(self.settle_time_ms)
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            language: Language::English,
            cache_dir: PathBuf::from("wav_cache"),
            tts_url: "https://translate.google.com/translate_tts".to_string(),
            request_timeout_ms: 1000,
            player: vec!["mpg123".to_string(), "-q".to_string()],
            fallback: vec!["espeak-ng".to_string()],
        }
    }
}

impl SpeechConfig {
    /// Synthesis request timeout as a duration
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            window_title: "Visual Emotion Recognition".to_string(),
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            categorical_offset: DEFAULT_CATEGORICAL_OFFSET,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing the file fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate numeric parameters
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] naming the first out-of-range value
    pub fn validate(&self) -> Result<()> {
        // Pipeline
        if self.pipeline.face_detection_delta == 0 {
            return Err(Error::ConfigError(
                "Face detection delta must be greater than 0".to_string(),
            ));
        }
        if self.pipeline.face_size == 0 {
            return Err(Error::ConfigError("Face size must be greater than 0".to_string()));
        }

        // Capture
        if self.capture.frame_width == 0 || self.capture.frame_height == 0 {
            return Err(Error::ConfigError("Frame dimensions must be greater than 0".to_string()));
        }

        // Tracking
        if !(self.tracking.horizontal_fov > 0.0 && self.tracking.horizontal_fov <= 180.0) {
            return Err(Error::ConfigError(
                "Horizontal field of view must be between 0 and 180 degrees".to_string(),
            ));
        }
        if !(self.tracking.vertical_fov > 0.0 && self.tracking.vertical_fov <= 180.0) {
            return Err(Error::ConfigError(
                "Vertical field of view must be between 0 and 180 degrees".to_string(),
            ));
        }
        if !(self.tracking.tracking_speed > 0.0 && self.tracking.tracking_speed <= 1.0) {
            return Err(Error::ConfigError("Tracking speed must be in (0, 1]".to_string()));
        }
        if !(self.tracking.recovery_speed > 0.0 && self.tracking.recovery_speed <= 1.0) {
            return Err(Error::ConfigError("Recovery speed must be in (0, 1]".to_string()));
        }
        if self.tracking.recovery_pan_jitter < 0 || self.tracking.recovery_tilt_jitter < 0 {
            return Err(Error::ConfigError("Recovery jitter must not be negative".to_string()));
        }

        // Models
        if self.models.categorical_classes.is_empty() || self.models.dimensional_classes.is_empty() {
            return Err(Error::ConfigError("Model class lists must not be empty".to_string()));
        }
        if !(self.models.categorical_output_scale > 0.0) {
            return Err(Error::ConfigError("Categorical output scale must be positive".to_string()));
        }

        // Speech
        if self.speech.enabled && (self.speech.player.is_empty() || self.speech.fallback.is_empty()) {
            return Err(Error::ConfigError(
                "Speech player and fallback commands are required when speech is enabled".to_string(),
            ));
        }

        // Display
        if self.display.canvas_width < self.capture.frame_width || self.display.canvas_height < self.capture.frame_height {
            return Err(Error::ConfigError(format!(
                "Canvas {}x{} is smaller than the {}x{} frame",
                self.display.canvas_width,
                self.display.canvas_height,
                self.capture.frame_width,
                self.capture.frame_height
            )));
        }
        if self.display.categorical_offset >= self.display.canvas_height {
            return Err(Error::ConfigError(
                "Categorical offset must lie inside the canvas".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate that model files exist
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] for the first missing model file
    pub fn validate_model_paths(&self) -> Result<()> {
        for (name, path) in [
            ("Face cascade", &self.models.face_cascade),
            ("Categorical model", &self.models.categorical_model),
            ("Dimensional model", &self.models.dimensional_model),
        ] {
            if !path.exists() {
                return Err(Error::ConfigError(format!("{name} not found: {}", path.display())));
            }
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Emotion Recognition Configuration

# Model paths and class orders
models:
  face_cascade: "assets/haarcascade_frontalface_default.xml"
  categorical_model: "assets/categorical.onnx"
  dimensional_model: "assets/dimensional.onnx"
  categorical_classes: ["Neutral", "Happiness", "Surprise", "Sadness", "Anger", "Disgust", "Fear", "Contempt"]
  dimensional_classes: ["arousal", "valence"]
  categorical_output_scale: 100.0

# Camera
capture:
  device: 0
  frame_width: 640
  frame_height: 480

# Per-frame pipeline
pipeline:
  face_detection_delta: 10
  face_size: 64

# Head tracking
tracking:
  horizontal_fov: 60.0
  vertical_fov: 50.0
  tracking_speed: 0.03
  settle_time_ms: 800
  lost_face_threshold: 50
  recovery_speed: 0.01
  recovery_pan_jitter: 15
  recovery_tilt_bias: -30
  recovery_tilt_jitter: 10

# Speech
speech:
  enabled: false
  language: english
  cache_dir: "wav_cache"
  tts_url: "https://translate.google.com/translate_tts"
  request_timeout_ms: 1000
  player: ["mpg123", "-q"]
  fallback: ["espeak-ng"]

# Display
display:
  window_title: "Visual Emotion Recognition"
  canvas_width: 1024
  canvas_height: 768
  categorical_offset: 260
"#;
