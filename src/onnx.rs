//! `ONNX` Runtime classifiers for the categorical and dimensional models.

use crate::{collaborators::Classifier, frame::NormalizedImage, Error, Result};
use ndarray::{Array4, CowArray};
use ort::{Environment, GraphOptimizationLevel, LoggingLevel, Session, SessionBuilder, Value};
use std::path::Path;
use std::sync::Arc;

/// Emotion model taking a `[1, size, size, 1]` grayscale tensor and
/// returning one score per class
pub struct OnnxClassifier {
    session: Session,
    classes: Vec<String>,
    input_size: u32,
    output_scale: f32,
}

impl OnnxClassifier {
    /// Load a model
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The ONNX runtime environment cannot be created
    /// - The model file cannot be loaded
    /// - `classes` is empty
    pub fn new<P: AsRef<Path>>(model_path: P, classes: Vec<String>, input_size: u32) -> Result<Self> {
        log::info!("Loading emotion model: {}", model_path.as_ref().display());
        if classes.is_empty() {
            return Err(Error::ModelError("Model needs at least one class".to_string()));
        }

        let environment = Arc::new(
            Environment::builder()
                .with_name("emotion_recognition")
                .with_log_level(LoggingLevel::Warning)
                .build()?,
        );

        let session = SessionBuilder::new(&environment)?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        if session.inputs.is_empty() || session.outputs.is_empty() {
            return Err(Error::ModelError("Model has no inputs or outputs".to_string()));
        }

        Ok(Self {
            session,
            classes,
            input_size,
            output_scale: 1.0,
        })
    }

    /// Multiply every score by `scale`, e.g. 100 for a softmax model whose
    /// scores are read as percentages
    #[must_use]
    pub fn with_output_scale(mut self, scale: f32) -> Self {
        self.output_scale = scale;
        self
    }
}

impl Classifier for OnnxClassifier {
    fn classes_order(&self) -> &[String] {
        &self.classes
    }

    fn classify(&mut self, face: &NormalizedImage) -> Result<Vec<f32>> {
        if face.size() != self.input_size {
            return Err(Error::InvalidInput(format!(
                "Model expects {0}x{0} input, got {1}x{1}",
                self.input_size,
                face.size()
            )));
        }

        let size = self.input_size as usize;
        let input = Array4::from_shape_vec((1, size, size, 1), face.pixels().to_vec())
            .map_err(|e| Error::ModelError(format!("Failed to create input tensor: {e}")))?;
        let cow_array = CowArray::from(input.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;

        let outputs = self.session.run(vec![input_tensor])?;
        let scores = outputs
            .into_iter()
            .next()
            .ok_or_else(|| Error::ModelError("No output from model".to_string()))?;

        let tensor = scores.try_extract::<f32>()?;
        let view = tensor.view();
        let scores: Vec<f32> = view.iter().map(|score| score * self.output_scale).collect();

        if scores.len() != self.classes.len() {
            return Err(Error::Classification(format!(
                "Model returned {} scores for {} classes",
                scores.len(),
                self.classes.len()
            )));
        }

        Ok(scores)
    }
}
