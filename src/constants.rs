//! Constants used throughout the application

/// Categorical slot checked first: fear
pub const FEAR_INDEX: usize = 6;

/// Categorical slot checked second: anger
pub const ANGER_INDEX: usize = 4;

/// Categorical slot shared by the sadness and happiness checks
pub const SADNESS_HAPPINESS_INDEX: usize = 3;

/// Fear score above which the label is fear
pub const FEAR_THRESHOLD: f32 = 15.0;

/// Anger score above which the label is anger
pub const ANGER_THRESHOLD: f32 = 20.0;

/// Slot-3 score above which the label is sadness
pub const SADNESS_THRESHOLD: f32 = 15.0;

/// Slot-3 score above which the label is happiness
pub const HAPPINESS_THRESHOLD: f32 = 20.0;

/// Repeat count at which a sustained emotion is commented on
pub const SPEECH_REPEAT_TRIGGER: u32 = 3;

/// Dimensional classifier outputs are fractions, exposed as percentages
pub const DIMENSIONAL_SCALE: f32 = 100.0;

/// Robot joint for horizontal head rotation
pub const HEAD_PAN_JOINT: &str = "head_z";

/// Robot joint for vertical head rotation
pub const HEAD_TILT_JOINT: &str = "head_y";

/// Default frames between head tracking evaluations
pub const DEFAULT_FACE_DETECTION_DELTA: u32 = 10;

/// Default classifier input edge length in pixels
pub const DEFAULT_FACE_SIZE: u32 = 64;

/// Default camera frame size
pub const DEFAULT_FRAME_WIDTH: u32 = 640;
pub const DEFAULT_FRAME_HEIGHT: u32 = 480;

/// Default camera field of view in degrees
pub const DEFAULT_HORIZONTAL_FOV: f64 = 60.0;
pub const DEFAULT_VERTICAL_FOV: f64 = 50.0;

/// Default head speeds (fraction of maximum joint speed)
pub const DEFAULT_TRACKING_SPEED: f64 = 0.03;
pub const DEFAULT_RECOVERY_SPEED: f64 = 0.01;

/// Default time the head is left alone after a tracking move
pub const DEFAULT_SETTLE_TIME_MS: u64 = 800;

/// Default number of consecutive empty frames before the head is recentered
pub const DEFAULT_LOST_FACE_THRESHOLD: u32 = 50;

/// Default recovery pose: pan jitter, tilt bias and tilt jitter in degrees
pub const DEFAULT_RECOVERY_PAN_JITTER: i32 = 15;
pub const DEFAULT_RECOVERY_TILT_BIAS: i32 = -30;
pub const DEFAULT_RECOVERY_TILT_JITTER: i32 = 10;

/// Default display canvas
pub const DEFAULT_CANVAS_WIDTH: u32 = 1024;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 768;

/// Default vertical position of the first categorical score bar
pub const DEFAULT_CATEGORICAL_OFFSET: u32 = 260;

/// Key that requests the display loop to quit
pub const QUIT_KEY: char = 'q';

/// How long a speech player is watched for an early failure. Players still
/// running after this are left to finish in the background.
pub const PLAYER_STARTUP_WAIT_MS: u64 = 500;
