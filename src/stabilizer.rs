//! Frame-to-frame continuity of the expressed emotion.
//!
//! Per-frame labels flicker; the stabilizer tells the reaction policy whether
//! a label starts a new episode or continues the current one, and how many
//! consecutive frames the current one has repeated.

use crate::emotion::Emotion;

/// Outcome of feeding one frame's label to the stabilizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stabilized {
    pub emotion: Emotion,
    /// The label differs from the previous face frame's label
    pub is_new: bool,
    /// Consecutive repeats since the label last changed
    pub repeat_count: u32,
}

/// Tracks the last expressed emotion and its repeat count
#[derive(Debug, Clone, Default)]
pub struct EmotionStabilizer {
    last: Option<Emotion>,
    repeat_count: u32,
}

impl EmotionStabilizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the label of a processed frame; `None` means no face was found
    /// and leaves the state untouched.
    pub fn observe(&mut self, emotion: Option<Emotion>) -> Option<Stabilized> {
        let emotion = emotion?;

        let is_new = self.last != Some(emotion);
        if is_new {
            self.last = Some(emotion);
            self.repeat_count = 0;
        } else {
            self.repeat_count = self.repeat_count.saturating_add(1);
        }

        Some(Stabilized {
            emotion,
            is_new,
            repeat_count: self.repeat_count,
        })
    }

    /// Last label that started an episode
    #[must_use]
    pub const fn last_emotion(&self) -> Option<Emotion> {
        self.last
    }

    #[must_use]
    pub const fn repeat_count(&self) -> u32 {
        self.repeat_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_label_is_new() {
        let mut stabilizer = EmotionStabilizer::new();
        let result = stabilizer.observe(Some(Emotion::Happiness)).unwrap();
        assert!(result.is_new);
        assert_eq!(result.repeat_count, 0);
    }

    #[test]
    fn test_repeats_count_up_and_reset_on_change() {
        let mut stabilizer = EmotionStabilizer::new();
        stabilizer.observe(Some(Emotion::Anger));
        assert_eq!(stabilizer.observe(Some(Emotion::Anger)).unwrap().repeat_count, 1);
        assert_eq!(stabilizer.observe(Some(Emotion::Anger)).unwrap().repeat_count, 2);

        let changed = stabilizer.observe(Some(Emotion::Fear)).unwrap();
        assert!(changed.is_new);
        assert_eq!(changed.repeat_count, 0);
        assert_eq!(stabilizer.last_emotion(), Some(Emotion::Fear));
    }

    #[test]
    fn test_no_face_leaves_state_untouched() {
        let mut stabilizer = EmotionStabilizer::new();
        stabilizer.observe(Some(Emotion::Surprise));
        stabilizer.observe(Some(Emotion::Surprise));

        assert_eq!(stabilizer.observe(None), None);
        assert_eq!(stabilizer.repeat_count(), 1);

        let next = stabilizer.observe(Some(Emotion::Surprise)).unwrap();
        assert!(!next.is_new);
        assert_eq!(next.repeat_count, 2);
    }

    #[test]
    fn test_long_streak_saturates() {
        let mut stabilizer = EmotionStabilizer {
            last: Some(Emotion::Neutral),
            repeat_count: u32::MAX - 1,
        };
        assert_eq!(stabilizer.observe(Some(Emotion::Neutral)).unwrap().repeat_count, u32::MAX);
        assert_eq!(stabilizer.observe(Some(Emotion::Neutral)).unwrap().repeat_count, u32::MAX);
        assert!(stabilizer.observe(Some(Emotion::Sadness)).unwrap().is_new);
    }
}
