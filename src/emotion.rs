//! Emotion label sets, per-frame classifier results and label selection.

use crate::{
    constants::{
        ANGER_INDEX, ANGER_THRESHOLD, DIMENSIONAL_SCALE, FEAR_INDEX, FEAR_THRESHOLD, HAPPINESS_THRESHOLD,
        SADNESS_HAPPINESS_INDEX, SADNESS_THRESHOLD,
    },
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Categorical emotion classes, in the categorical model's output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Neutral,
    Happiness,
    Surprise,
    Sadness,
    Anger,
    Disgust,
    Fear,
    Contempt,
}

impl Emotion {
    /// All classes in model output order
    pub const ALL: [Self; 8] = [
        Self::Neutral,
        Self::Happiness,
        Self::Surprise,
        Self::Sadness,
        Self::Anger,
        Self::Disgust,
        Self::Fear,
        Self::Contempt,
    ];

    /// Lowercase label used for expression output and speech lookup
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Happiness => "happiness",
            Self::Surprise => "surprise",
            Self::Sadness => "sadness",
            Self::Anger => "anger",
            Self::Disgust => "disgust",
            Self::Fear => "fear",
            Self::Contempt => "contempt",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|emotion| emotion.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Classification(format!("Unknown emotion class: {s}")))
    }
}

/// Dimensional affect axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Arousal,
    Valence,
}

impl Dimension {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arousal => "arousal",
            Self::Valence => "valence",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arousal" => Ok(Self::Arousal),
            "valence" => Ok(Self::Valence),
            _ => Err(Error::Classification(format!("Unknown dimension: {s}"))),
        }
    }
}

/// Categorical scores (0-100) keyed by class, in classifier order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalResult {
    scores: Vec<(Emotion, f32)>,
}

impl CategoricalResult {
    /// Pair a raw score vector with the classifier's class labels
    ///
    /// # Errors
    ///
    /// Returns an error if the lengths differ or a label is not a known emotion
    pub fn new(classes: &[String], scores: &[f32]) -> Result<Self> {
        if classes.len() != scores.len() {
            return Err(Error::Classification(format!(
                "Categorical classifier returned {} scores for {} classes",
                scores.len(),
                classes.len()
            )));
        }

        let scores = classes
            .iter()
            .zip(scores)
            .map(|(class, &score)| Ok((class.parse::<Emotion>()?, score)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { scores })
    }

    /// Build from scores in [`Emotion::ALL`] order
    #[must_use]
    pub fn from_scores(scores: [f32; 8]) -> Self {
        Self {
            scores: Emotion::ALL.iter().copied().zip(scores).collect(),
        }
    }

    /// Ordered `(class, score)` pairs
    #[must_use]
    pub fn scores(&self) -> &[(Emotion, f32)] {
        &self.scores
    }

    /// Score of a class, if the classifier reports it
    #[must_use]
    pub fn score(&self, emotion: Emotion) -> Option<f32> {
        self.scores.iter().find(|(e, _)| *e == emotion).map(|(_, s)| *s)
    }

    /// The label this frame expresses, see [`select_emotion`]
    #[must_use]
    pub fn highest_matching(&self) -> Option<Emotion> {
        select_emotion(&self.scores)
    }
}

/// Dimensional scores as percentages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionalResult {
    scores: Vec<(Dimension, f32)>,
}

impl DimensionalResult {
    /// Pair raw dimensional outputs with their labels, scaling them to percent
    ///
    /// # Errors
    ///
    /// Returns an error if the lengths differ or a label is not a known dimension
    pub fn new(classes: &[String], raw: &[f32]) -> Result<Self> {
        if classes.len() != raw.len() {
            return Err(Error::Classification(format!(
                "Dimensional classifier returned {} values for {} classes",
                raw.len(),
                classes.len()
            )));
        }

        let scores = classes
            .iter()
            .zip(raw)
            .map(|(class, &value)| Ok((class.parse::<Dimension>()?, value * DIMENSIONAL_SCALE)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { scores })
    }

    /// Ordered `(dimension, percent)` pairs
    #[must_use]
    pub fn scores(&self) -> &[(Dimension, f32)] {
        &self.scores
    }

    #[must_use]
    pub fn arousal(&self) -> Option<f32> {
        self.get(Dimension::Arousal)
    }

    #[must_use]
    pub fn valence(&self) -> Option<f32> {
        self.get(Dimension::Valence)
    }

    fn get(&self, dimension: Dimension) -> Option<f32> {
        self.scores.iter().find(|(d, _)| *d == dimension).map(|(_, s)| *s)
    }
}

/// Pick the label a frame expresses.
///
/// Thresholds are checked positionally in priority order (fear slot, anger
/// slot, then slot 3 for sadness and happiness) before falling back to the
/// arg-max class. Slots absent from a short vector skip their rule.
#[must_use]
pub fn select_emotion(scores: &[(Emotion, f32)]) -> Option<Emotion> {
    let above = |index: usize, threshold: f32| scores.get(index).is_some_and(|(_, s)| *s > threshold);

    if above(FEAR_INDEX, FEAR_THRESHOLD) {
        return Some(Emotion::Fear);
    }
    if above(ANGER_INDEX, ANGER_THRESHOLD) {
        return Some(Emotion::Anger);
    }
    // Both checks read slot 3 and the sadness threshold is lower, so the
    // happiness branch never fires.
    if above(SADNESS_HAPPINESS_INDEX, SADNESS_THRESHOLD) {
        return Some(Emotion::Sadness);
    }
    if above(SADNESS_HAPPINESS_INDEX, HAPPINESS_THRESHOLD) {
        return Some(Emotion::Happiness);
    }

    // First maximum wins on ties
    let mut best: Option<(Emotion, f32)> = None;
    for &(emotion, score) in scores {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((emotion, score)),
        }
    }
    best.map(|(emotion, _)| emotion)
}
