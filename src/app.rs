//! The frame orchestrator: owns the collaborators and runs the per-frame cycle.

use crate::{
    classification::{Classification, EmotionClassifiers},
    collaborators::{CaptureDevice, FaceLocator, FrameDisplay, OverlayRenderer},
    config::{Config, DisplayConfig},
    constants::QUIT_KEY,
    emotion::{CategoricalResult, DimensionalResult, Emotion},
    frame::{FaceDetection, Frame},
    overlay::compose_canvas,
    policy::{ReactionPolicy, TrackingState},
    Error, Result,
};
use log::{debug, error, info, warn};
use std::time::{Duration, Instant};

/// Per-run switches passed to [`EmotionRecognition::start`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartOptions {
    /// Render the canvas and listen for the quit key
    pub show_display: bool,
    /// Follow the face with the robot head
    pub face_tracking: bool,
    /// Mirror the expressed emotion and comment on it
    pub mirror_emotion: bool,
}

/// Frame source, face locator, classifiers and the optional display
pub struct Collaborators {
    capture: Box<dyn CaptureDevice>,
    locator: Box<dyn FaceLocator>,
    classifiers: EmotionClassifiers,
    display: Option<Box<dyn FrameDisplay>>,
    overlay: Option<Box<dyn OverlayRenderer>>,
}

impl Collaborators {
    #[must_use]
    pub fn new(
        capture: Box<dyn CaptureDevice>,
        locator: Box<dyn FaceLocator>,
        classifiers: EmotionClassifiers,
    ) -> Self {
        Self {
            capture,
            locator,
            classifiers,
            display: None,
            overlay: None,
        }
    }

    #[must_use]
    pub fn with_display(mut self, display: Box<dyn FrameDisplay>) -> Self {
        self.display = Some(display);
        self
    }

    #[must_use]
    pub fn with_overlay(mut self, overlay: Box<dyn OverlayRenderer>) -> Self {
        self.overlay = Some(overlay);
        self
    }
}

/// What one cycle did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Faces the locator found
    pub faces: usize,
    /// Label chosen for the first face
    pub emotion: Option<Emotion>,
    /// Head turned towards the face
    pub head_moved: bool,
    /// Head sent to the recovery pose
    pub head_recovered: bool,
    /// Phrase spoken this frame
    pub spoken: Option<&'static str>,
    /// Quit key pressed
    pub quit_requested: bool,
}

/// Emotion recognition pipeline
pub struct EmotionRecognition {
    collaborators: Collaborators,
    policy: ReactionPolicy,
    state: TrackingState,
    options: StartOptions,
    running: bool,
    face_size: u32,
    display_config: DisplayConfig,
    frame_count: u64,
    started_at: Option<Instant>,
}

impl EmotionRecognition {
    /// Create an idle pipeline
    #[must_use]
    pub fn new(config: &Config, collaborators: Collaborators, policy: ReactionPolicy) -> Self {
        Self {
            collaborators,
            policy,
            state: TrackingState::new(),
            options: StartOptions::default(),
            running: false,
            face_size: config.pipeline.face_size,
            display_config: config.display.clone(),
            frame_count: 0,
            started_at: None,
        }
    }

    /// Open the capture device and begin accepting frames.
    ///
    /// Starting a running pipeline only logs a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the capture device cannot be opened; the pipeline
    /// stays idle
    pub fn start(&mut self, options: StartOptions) -> Result<()> {
        if self.running {
            warn!("Emotion recognition is already running");
            return Ok(());
        }

        info!(
            "Starting emotion recognition (display: {}, tracking: {}, mirroring: {})",
            options.show_display, options.face_tracking, options.mirror_emotion
        );
        if options.face_tracking && !self.policy.has_robot() {
            warn!("Face tracking requested but no robot is configured");
        }
        if options.mirror_emotion && !self.policy.has_expression() {
            warn!("Emotion mirroring requested but no expression output is configured");
        }
        if options.show_display && self.collaborators.display.is_none() {
            warn!("Display requested but no display is configured");
        }

        self.state = TrackingState::new();
        self.collaborators.capture.open()?;

        self.options = options;
        self.frame_count = 0;
        self.started_at = Some(Instant::now());
        self.running = true;
        Ok(())
    }

    /// Release the capture device and the display and forget all state
    pub fn stop(&mut self) {
        if !self.running {
            warn!("Emotion recognition is not running");
            return;
        }

        if let Err(e) = self.collaborators.capture.close() {
            warn!("Failed to close capture device: {}", e);
        }
        if let Some(display) = self.collaborators.display.as_mut() {
            if let Err(e) = display.close() {
                warn!("Failed to close display: {}", e);
            }
        }

        if let Some(started_at) = self.started_at.take() {
            let elapsed = started_at.elapsed().as_secs_f64();
            #[allow(clippy::cast_precision_loss)]
            let fps = if elapsed > 0.0 { self.frame_count as f64 / elapsed } else { 0.0 };
            info!("Processed {} frames ({:.1} FPS)", self.frame_count, fps);
        }

        self.state = TrackingState::new();
        self.running = false;
        info!("Emotion recognition stopped");
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Per-run counters and the cached classification
    #[must_use]
    pub const fn tracking_state(&self) -> &TrackingState {
        &self.state
    }

    /// Frame callback. Returns `None` when the frame was ignored because the
    /// pipeline is idle or the frame is invalid.
    pub fn on_frame(&mut self, valid: bool, frame: Option<&Frame>) -> Option<FrameReport> {
        let frame = match frame {
            Some(frame) if valid => frame,
            _ => {
                debug!("Skipping invalid frame");
                return None;
            }
        };

        self.process_frame_at(frame, Instant::now())
    }

    /// Run one cycle on `frame` as if it arrived at `now`. Returns `None`
    /// while idle.
    pub fn process_frame_at(&mut self, frame: &Frame, now: Instant) -> Option<FrameReport> {
        if !self.running {
            debug!("Ignoring frame while idle");
            return None;
        }
        let mut report = FrameReport::default();
        self.frame_count += 1;

        let detections = match self.analyze(frame, now, &mut report) {
            Ok(detections) => detections,
            Err(e) => {
                error!("Frame {} failed: {}", self.frame_count, e);
                self.state.clear_classification();
                Vec::new()
            }
        };

        if self.options.show_display {
            match self.present(frame, &detections) {
                Ok(quit) => report.quit_requested = quit,
                Err(e) => warn!("Failed to display frame: {}", e),
            }
        }

        if report.quit_requested {
            info!("Exit requested by user");
            self.stop();
        }

        Some(report)
    }

    fn analyze(&mut self, frame: &Frame, now: Instant, report: &mut FrameReport) -> Result<Vec<FaceDetection>> {
        let detections = self.collaborators.locator.detect_faces(frame)?;
        report.faces = detections.len();

        let Some(face) = detections.first() else {
            debug!("No face found");
            self.state.clear_classification();
            if self.options.face_tracking {
                report.head_recovered = self.policy.face_lost(&mut self.state);
            }
            return Ok(detections);
        };

        self.state.face_found();
        if self.options.face_tracking {
            report.head_moved = self.policy.track_face(&mut self.state, face.region.center(), now);
        }

        let normalized = self.collaborators.locator.pre_process(&face.crop, self.face_size)?;
        let classification = self.collaborators.classifiers.classify(&normalized)?;
        report.emotion = Some(classification.emotion);
        debug!("Frame {}: {}", self.frame_count, classification.emotion);

        let stabilized = self.state.record_classification(classification);
        if self.options.mirror_emotion {
            if let Some(stabilized) = stabilized {
                report.spoken = self.policy.react(&stabilized);
            }
        }

        Ok(detections)
    }

    /// Compose, draw and show the canvas; returns whether quit was pressed
    fn present(&mut self, frame: &Frame, detections: &[FaceDetection]) -> Result<bool> {
        let Some(display) = self.collaborators.display.as_mut() else {
            return Ok(false);
        };

        let mut canvas = compose_canvas(frame, self.display_config.canvas_width, self.display_config.canvas_height);
        if let (Some(overlay), Some(latest)) = (self.collaborators.overlay.as_mut(), self.state.latest()) {
            overlay.render(&mut canvas, detections, &latest.categorical, &latest.dimensional)?;
        }

        display.show(&canvas)?;
        Ok(display.poll_key()? == Some(QUIT_KEY))
    }

    /// Read one frame from the capture device and process it
    ///
    /// # Errors
    ///
    /// Returns the capture error, including [`Error::EndOfStream`]
    pub fn step(&mut self) -> Result<Option<FrameReport>> {
        if !self.running {
            return Ok(None);
        }
        let frame = self.collaborators.capture.read()?;
        Ok(self.on_frame(frame.is_some(), frame.as_ref()))
    }

    /// Process frames until stopped, quit or the end of the stream
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline is not running
    pub fn run(&mut self) -> Result<()> {
        if !self.running {
            return Err(Error::Capture("Emotion recognition is not running".to_string()));
        }
        info!("Entering main loop");

        while self.running {
            match self.step() {
                Ok(_) => {}
                Err(Error::EndOfStream) => {
                    info!("End of stream reached");
                    self.stop();
                }
                Err(e) => {
                    warn!("Failed to read frame: {}, retrying...", e);
                    std::thread::sleep(Duration::from_millis(10));
                }
            }
        }

        Ok(())
    }

    fn latest_classification(&self, what: &str) -> Option<&Classification> {
        if !self.running {
            warn!("Emotion recognition is not running - no {} data", what);
            return None;
        }
        let latest = self.state.latest();
        if latest.is_none() {
            info!("No face in the last frame - no {} data", what);
        }
        latest
    }

    /// Categorical scores of the last frame with a face
    #[must_use]
    pub fn categorical_data(&self) -> Option<&CategoricalResult> {
        self.latest_classification("categorical").map(|c| &c.categorical)
    }

    /// Arousal and valence of the last frame with a face
    #[must_use]
    pub fn dimensional_data(&self) -> Option<&DimensionalResult> {
        self.latest_classification("dimensional").map(|c| &c.dimensional)
    }

    /// Label of the last frame with a face
    #[must_use]
    pub fn highest_matching_emotion(&self) -> Option<Emotion> {
        self.latest_classification("emotion").map(|c| c.emotion)
    }
}
