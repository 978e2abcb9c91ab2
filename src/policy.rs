//! Turns per-frame observations into rate-limited robot reactions.
//!
//! The policy owns the optional output collaborators; all mutable per-run
//! counters live in [`TrackingState`], which the orchestrator owns and resets
//! on every start and stop.

use crate::{
    classification::Classification,
    collaborators::{ExpressionOutput, RobotMotion},
    config::{Config, TrackingConfig},
    constants::{HEAD_PAN_JOINT, HEAD_TILT_JOINT, SPEECH_REPEAT_TRIGGER},
    emotion::Emotion,
    random::RandomSource,
    speech::{phrases, Language, SpeechBackend},
    stabilizer::{EmotionStabilizer, Stabilized},
    Result,
};
use log::{debug, info, warn};
use std::time::Instant;

/// Per-run state of the frame loop
#[derive(Debug, Clone, Default)]
pub struct TrackingState {
    stabilizer: EmotionStabilizer,
    tracking_counter: u32,
    not_found_counter: u32,
    settle_until: Option<Instant>,
    latest: Option<Classification>,
}

impl TrackingState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store this frame's classification and stabilize its label
    pub fn record_classification(&mut self, classification: Classification) -> Option<Stabilized> {
        let stabilized = self.stabilizer.observe(Some(classification.emotion));
        self.latest = Some(classification);
        stabilized
    }

    /// Forget the cached classification; the episode itself continues
    pub fn clear_classification(&mut self) {
        self.latest = None;
    }

    /// Classification of the most recent frame with a face
    #[must_use]
    pub const fn latest(&self) -> Option<&Classification> {
        self.latest.as_ref()
    }

    /// Label of the current episode
    #[must_use]
    pub const fn last_emotion(&self) -> Option<Emotion> {
        self.stabilizer.last_emotion()
    }

    #[must_use]
    pub const fn repeat_count(&self) -> u32 {
        self.stabilizer.repeat_count()
    }

    #[must_use]
    pub const fn tracking_counter(&self) -> u32 {
        self.tracking_counter
    }

    #[must_use]
    pub const fn not_found_counter(&self) -> u32 {
        self.not_found_counter
    }

    /// Until when tracking updates are ignored
    #[must_use]
    pub const fn settle_until(&self) -> Option<Instant> {
        self.settle_until
    }

    /// A face is visible again
    pub fn face_found(&mut self) {
        self.not_found_counter = 0;
    }
}

/// Decides and issues head, expression and speech reactions
pub struct ReactionPolicy {
    tracking: TrackingConfig,
    frame_size: (u32, u32),
    face_detection_delta: u32,
    voice_enabled: bool,
    language: Language,
    robot: Option<Box<dyn RobotMotion>>,
    expression: Option<Box<dyn ExpressionOutput>>,
    speech: Option<Box<dyn SpeechBackend>>,
    random: Box<dyn RandomSource>,
}

impl ReactionPolicy {
    /// Create a policy without output collaborators
    #[must_use]
    pub fn new(config: &Config, random: Box<dyn RandomSource>) -> Self {
        Self {
            tracking: config.tracking.clone(),
            frame_size: (config.capture.frame_width, config.capture.frame_height),
            face_detection_delta: config.pipeline.face_detection_delta,
            voice_enabled: config.speech.enabled,
            language: config.speech.language,
            robot: None,
            expression: None,
            speech: None,
            random,
        }
    }

    #[must_use]
    pub fn with_robot(mut self, robot: Box<dyn RobotMotion>) -> Self {
        self.robot = Some(robot);
        self
    }

    #[must_use]
    pub fn with_expression(mut self, expression: Box<dyn ExpressionOutput>) -> Self {
        self.expression = Some(expression);
        self
    }

    #[must_use]
    pub fn with_speech(mut self, speech: Box<dyn SpeechBackend>) -> Self {
        self.speech = Some(speech);
        self
    }

    #[must_use]
    pub fn has_robot(&self) -> bool {
        self.robot.is_some()
    }

    #[must_use]
    pub fn has_expression(&self) -> bool {
        self.expression.is_some()
    }

    #[must_use]
    pub const fn voice_enabled(&self) -> bool {
        self.voice_enabled
    }

    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Pan and tilt change that points the head at `center`.
    ///
    /// `(W - x) / W * FOV - FOV / 2` per axis; the tilt is negated because
    /// the tilt joint turns down for positive angles.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn head_angles(&self, center: (f64, f64)) -> (f64, f64) {
        let width = f64::from(self.frame_size.0);
        let height = f64::from(self.frame_size.1);
        let (hfov, vfov) = (self.tracking.horizontal_fov, self.tracking.vertical_fov);

        let pan = (width - center.0) / width * hfov - hfov / 2.0;
        let tilt = (height - center.1) / height * vfov - vfov / 2.0;
        (pan, -tilt)
    }

    /// Head tracking for a frame with a face. Evaluated when the frame-delay
    /// counter is at zero and the head has settled; returns whether the head
    /// was moved.
    pub fn track_face(&mut self, state: &mut TrackingState, center: (f64, f64), now: Instant) -> bool {
        let mut moved = false;

        if state.tracking_counter == 0 {
            let (pan, tilt) = self.head_angles(center);
            let speed = self.tracking.tracking_speed;

            if state.settle_until.is_some_and(|deadline| now < deadline) {
                debug!("Head still settling, skipping tracking update");
            } else if let Some(robot) = self.robot.as_mut() {
                match move_head(robot.as_mut(), pan, tilt, speed, Movement::Relative) {
                    Ok(()) => {
                        debug!("Tracking face: pan {:.1}, tilt {:.1}", pan, tilt);
                        state.settle_until = Some(now + self.tracking.settle_time());
                        moved = true;
                    }
                    Err(e) => warn!("Failed to move head towards face: {}", e),
                }
            } else {
                warn!("No robot configured - skipping face tracking");
            }
        }

        if state.tracking_counter >= self.face_detection_delta {
            state.tracking_counter = 0;
        } else {
            state.tracking_counter += 1;
        }

        moved
    }

    /// Lost-face handling for a frame without a face. Returns whether the
    /// head was sent to the recovery pose.
    pub fn face_lost(&mut self, state: &mut TrackingState) -> bool {
        state.not_found_counter += 1;
        debug!("No face for {} frames", state.not_found_counter);

        if state.not_found_counter <= self.tracking.lost_face_threshold {
            return false;
        }
        state.not_found_counter = 0;

        let Some(robot) = self.robot.as_mut() else {
            warn!("No robot configured - skipping face tracking");
            return false;
        };

        let pan_jitter = self.tracking.recovery_pan_jitter;
        let tilt_jitter = self.tracking.recovery_tilt_jitter;
        let pan = self.random.range_inclusive(-pan_jitter, pan_jitter);
        let tilt = self.tracking.recovery_tilt_bias + self.random.range_inclusive(-tilt_jitter, tilt_jitter);

        info!("Face lost, returning head to pan {}, tilt {}", pan, tilt);
        match move_head(
            robot.as_mut(),
            f64::from(pan),
            f64::from(tilt),
            self.tracking.recovery_speed,
            Movement::Absolute,
        ) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to move head to recovery pose: {}", e);
                false
            }
        }
    }

    /// Mirror the stabilized emotion and comment on sustained ones. Returns
    /// the phrase spoken, if any.
    pub fn react(&mut self, stabilized: &Stabilized) -> Option<&'static str> {
        let expression = self.expression.as_mut()?;

        if stabilized.is_new {
            debug!("Mirroring {}", stabilized.emotion);
            if let Err(e) = expression.send_face_expression(stabilized.emotion) {
                warn!("Failed to send face expression: {}", e);
            }
            return None;
        }

        if self.voice_enabled && stabilized.repeat_count == SPEECH_REPEAT_TRIGGER {
            return self.speak(stabilized.emotion);
        }

        None
    }

    /// Say a random phrase for `emotion`
    pub fn speak(&mut self, emotion: Emotion) -> Option<&'static str> {
        let options = phrases(emotion, self.language);
        if options.is_empty() {
            return None;
        }
        let phrase = *options.get(self.random.choose_index(options.len()))?;

        match self.speech.as_mut() {
            Some(speech) => {
                info!("Saying \"{}\"", phrase);
                if let Err(e) = speech.say(phrase, self.language) {
                    warn!("Speech failed: {}", e);
                }
            }
            None => warn!("Voice enabled but no speech backend configured"),
        }

        Some(phrase)
    }
}

#[derive(Clone, Copy)]
enum Movement {
    Relative,
    Absolute,
}

fn move_head(robot: &mut dyn RobotMotion, pan: f64, tilt: f64, speed: f64, movement: Movement) -> Result<()> {
    match movement {
        Movement::Relative => {
            robot.change_angle(HEAD_PAN_JOINT, pan, speed)?;
            robot.change_angle(HEAD_TILT_JOINT, tilt, speed)
        }
        Movement::Absolute => {
            robot.set_angle(HEAD_PAN_JOINT, pan, speed)?;
            robot.set_angle(HEAD_TILT_JOINT, tilt, speed)
        }
    }
}
