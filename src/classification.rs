//! Runs the categorical and dimensional models on a face as one unit.

use crate::{
    collaborators::Classifier,
    emotion::{CategoricalResult, DimensionalResult, Emotion},
    frame::NormalizedImage,
    Error, Result,
};

/// Both model outputs for one face plus the label chosen from them
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub categorical: CategoricalResult,
    pub dimensional: DimensionalResult,
    /// Single authoritative label for the frame
    pub emotion: Emotion,
}

/// The categorical and dimensional classifier pair
pub struct EmotionClassifiers {
    categorical: Box<dyn Classifier>,
    dimensional: Box<dyn Classifier>,
}

impl EmotionClassifiers {
    #[must_use]
    pub fn new(categorical: Box<dyn Classifier>, dimensional: Box<dyn Classifier>) -> Self {
        Self {
            categorical,
            dimensional,
        }
    }

    /// Classify a face with both models.
    ///
    /// The models are borrowed for exactly these two calls, so either both
    /// results come back or neither does.
    ///
    /// # Errors
    ///
    /// Returns an error if either model fails or its output does not match
    /// its class labels
    pub fn classify(&mut self, face: &NormalizedImage) -> Result<Classification> {
        let categorical_scores = self.categorical.classify(face)?;
        let dimensional_scores = self.dimensional.classify(face)?;

        let categorical = CategoricalResult::new(self.categorical.classes_order(), &categorical_scores)?;
        let dimensional = DimensionalResult::new(self.dimensional.classes_order(), &dimensional_scores)?;

        let emotion = categorical
            .highest_matching()
            .ok_or_else(|| Error::Classification("Categorical classifier returned no scores".to_string()))?;

        Ok(Classification {
            categorical,
            dimensional,
            emotion,
        })
    }
}
