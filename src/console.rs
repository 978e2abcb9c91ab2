//! Console stand-ins for the robot.
//!
//! [`ConsoleHead`] keeps the commanded head pose and logs every move;
//! [`ConsoleExpression`] logs the mirrored emotions. They let the binary run
//! tracking, mirroring and speech without robot hardware attached.

use crate::{
    collaborators::{ExpressionOutput, RobotMotion},
    constants::{HEAD_PAN_JOINT, HEAD_TILT_JOINT},
    emotion::Emotion,
    Error, Result,
};
use log::info;

/// Head with pan and tilt joints that only exists in the log
#[derive(Debug, Default)]
pub struct ConsoleHead {
    pan: f64,
    tilt: f64,
}

impl ConsoleHead {
    #[must_use]
    pub fn new() -> Self {
        info!("Using console head: moves are logged only");
        Self::default()
    }

    /// Current pan and tilt in degrees
    #[must_use]
    pub const fn pose(&self) -> (f64, f64) {
        (self.pan, self.tilt)
    }

    fn joint_mut(&mut self, joint: &str) -> Result<&mut f64> {
        match joint {
            HEAD_PAN_JOINT => Ok(&mut self.pan),
            HEAD_TILT_JOINT => Ok(&mut self.tilt),
            other => Err(Error::Robot(format!("Unknown joint: {other}"))),
        }
    }
}

impl RobotMotion for ConsoleHead {
    fn change_angle(&mut self, joint: &str, degrees: f64, speed: f64) -> Result<()> {
        let angle = self.joint_mut(joint)?;
        *angle += degrees;
        info!("Head {} {:+.1} -> {:.1} deg (speed {})", joint, degrees, *angle, speed);
        Ok(())
    }

    fn set_angle(&mut self, joint: &str, degrees: f64, speed: f64) -> Result<()> {
        let angle = self.joint_mut(joint)?;
        *angle = degrees;
        info!("Head {} set to {:.1} deg (speed {})", joint, degrees, speed);
        Ok(())
    }
}

/// Facial expression output that logs the expression
#[derive(Debug, Default)]
pub struct ConsoleExpression;

impl ExpressionOutput for ConsoleExpression {
    fn send_face_expression(&mut self, emotion: Emotion) -> Result<()> {
        info!("Face expression: {}", emotion);
        Ok(())
    }
}
