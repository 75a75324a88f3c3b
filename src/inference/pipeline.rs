use std::time::Instant;

use tracing::debug;

use crate::error::{LoadError, PipelineError};
use crate::inference::classifier::Classifier;
use crate::inference::prediction::Prediction;
use crate::preprocess::{PreprocessedImage, Preprocessor};

/// Successful pass through the pipeline.
#[derive(Debug, Clone)]
pub struct Classification {
    pub image: PreprocessedImage,
    pub prediction: Prediction,
}

/// Upload bytes → preprocess → infer → arg-max, with the model handle it owns.
#[derive(Debug, Clone)]
pub struct Pipeline {
    preprocessor: Preprocessor,
    classifier: Classifier,
}

impl Pipeline {
    pub fn new(preprocessor: Preprocessor, classifier: Classifier) -> Result<Pipeline, LoadError> {
        if preprocessor.output_shape() != classifier.input_shape() {
            return Err(LoadError::InputSize {
                expected: classifier.input_shape().iter().product(),
                actual: preprocessor.input_len(),
            });
        }
        Ok(Pipeline { preprocessor, classifier })
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    pub fn classify(&self, bytes: &[u8]) -> Result<Classification, PipelineError> {
        let started = Instant::now();
        let image = self.preprocessor.run(bytes)?;
        let preprocessed_at = Instant::now();
        let prediction = self.classifier.predict(&image.tensor)?;
        debug!(
            preprocess_ms = (preprocessed_at - started).as_millis() as u64,
            infer_ms = preprocessed_at.elapsed().as_millis() as u64,
            label = %prediction.label,
            "classified upload"
        );
        Ok(Classification { image, prediction })
    }
}
