use crate::error::{LoadError, PipelineError};
use crate::inference::labels::LabelSet;
use crate::inference::prediction::{argmax, Prediction};
use crate::network::{InputType, Network};
use crate::preprocess::ImageTensor;

/// Read-only model handle: a validated network plus its verified label order.
///
/// Built once at startup and shared by reference (or `Arc`) for the rest of
/// the process. Nothing on it takes `&mut self`.
#[derive(Debug, Clone)]
pub struct Classifier {
    network: Network,
    labels: LabelSet,
    input_shape: [usize; 4],
}

impl Classifier {
    /// Verifies `network` against the `(1, height, width, 1)` tensors it will
    /// receive and resolves its labels (see `LabelSet::resolve`).
    pub fn new(
        network: Network,
        expected_labels: Option<&[String]>,
        width: u32,
        height: u32,
    ) -> Result<Classifier, LoadError> {
        network.validate()?;

        let metadata = network.metadata.as_ref();
        if let Some(InputType::ImageGrayscale { width: w, height: h }) =
            metadata.and_then(|m| m.input_type.as_ref())
        {
            if (*w, *h) != (width, height) {
                return Err(LoadError::InvalidModel(format!(
                    "model was trained on {}x{} images, preprocessor is set to {}x{}",
                    w, h, width, height
                )));
            }
        }

        let input_len = width as usize * height as usize;
        if network.input_size() != input_len {
            return Err(LoadError::InputSize { expected: network.input_size(), actual: input_len });
        }

        let declared = metadata.and_then(|m| m.output_labels.as_deref());
        let labels = LabelSet::resolve(declared, expected_labels, network.output_size())?;

        Ok(Classifier {
            network,
            labels,
            input_shape: [1, height as usize, width as usize, 1],
        })
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn input_shape(&self) -> [usize; 4] {
        self.input_shape
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Runs one forward pass and picks the arg-max class.
    pub fn predict(&self, tensor: &ImageTensor) -> Result<Prediction, PipelineError> {
        if tensor.shape() != self.input_shape {
            return Err(PipelineError::ShapeMismatch {
                expected: self.input_shape,
                actual: tensor.shape(),
            });
        }

        let output = self.network.forward(tensor.as_slice())
            .ok_or_else(|| PipelineError::Inference("input does not fit the first layer".into()))?;
        if output.len() != self.labels.len() {
            return Err(PipelineError::Inference(format!(
                "model produced {} outputs for {} labels", output.len(), self.labels.len()
            )));
        }
        if let Some(bad) = output.iter().position(|v| !v.is_finite()) {
            return Err(PipelineError::Inference(format!("output {} is not a finite number", bad)));
        }

        let index = argmax(&output)
            .ok_or_else(|| PipelineError::Inference("model produced no outputs".into()))?;
        let label = self.labels.get(index)
            .ok_or_else(|| PipelineError::Inference(format!("no label for output {}", index)))?
            .to_owned();
        let confidence = output[index] * 100.0;

        Ok(Prediction { probabilities: output, index, label, confidence })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::layers::dense::Layer;
    use crate::math::matrix::Matrix;
    use crate::network::ModelMetadata;

    /// 2x2 image -> 4 classes. Output `i` fires on pixel `i`.
    fn pixel_picker() -> Network {
        let weights: Vec<Vec<f64>> = (0..4)
            .map(|r| (0..4).map(|c| if r == c { 10.0 } else { 0.0 }).collect())
            .collect();
        Network {
            layers: vec![Layer {
                size: 4,
                weights: Matrix::from_data(weights).unwrap(),
                biases: Matrix::zeros(1, 4),
                activator: ActivationFunction::Softmax,
            }],
            metadata: None,
        }
    }

    fn tensor(pixels: [u8; 4]) -> ImageTensor {
        ImageTensor::from_gray_pixels(2, 2, &pixels).unwrap()
    }

    #[test]
    fn brightest_pixel_selects_label() {
        let clf = Classifier::new(pixel_picker(), None, 2, 2).unwrap();
        let p = clf.predict(&tensor([0, 0, 255, 0])).unwrap();
        assert_eq!(p.index, 2);
        assert_eq!(p.label, "Non Demented");
        let max = p.probabilities.iter().cloned().fold(f64::MIN, f64::max);
        assert_eq!(p.confidence, max * 100.0);
    }

    #[test]
    fn uniform_output_picks_first_label() {
        let clf = Classifier::new(pixel_picker(), None, 2, 2).unwrap();
        let p = clf.predict(&tensor([0, 0, 0, 0])).unwrap();
        assert_eq!(p.index, 0);
        assert_eq!(p.confidence_display(), "25.00%");
    }

    #[test]
    fn wrong_tensor_shape_is_rejected() {
        let clf = Classifier::new(pixel_picker(), None, 2, 2).unwrap();
        let t = ImageTensor::from_gray_pixels(4, 1, &[0, 0, 0, 0]).unwrap();
        let err = clf.predict(&t).unwrap_err();
        assert!(matches!(err, PipelineError::ShapeMismatch { expected: [1, 2, 2, 1], actual: [1, 1, 4, 1] }));
    }

    #[test]
    fn input_size_must_match_preprocessor() {
        let err = Classifier::new(pixel_picker(), None, 3, 3).unwrap_err();
        assert!(matches!(err, LoadError::InputSize { expected: 4, actual: 9 }));
    }

    #[test]
    fn declared_input_dimensions_are_checked() {
        let net = pixel_picker().with_metadata(ModelMetadata {
            input_type: Some(InputType::ImageGrayscale { width: 4, height: 1 }),
            ..Default::default()
        });
        assert!(matches!(Classifier::new(net, None, 2, 2), Err(LoadError::InvalidModel(_))));
    }

    #[test]
    fn non_finite_outputs_are_inference_errors() {
        let mut net = pixel_picker();
        net.layers[0].activator = ActivationFunction::Identity;
        net.layers[0].biases = Matrix::from_data(vec![vec![f64::NAN, 0.0, 0.0, 0.0]]).unwrap();
        let clf = Classifier::new(net, None, 2, 2).unwrap();
        assert!(matches!(clf.predict(&tensor([1, 2, 3, 4])), Err(PipelineError::Inference(_))));
    }

    #[test]
    fn bad_weight_under_black_pixel_is_still_reported() {
        let mut net = pixel_picker();
        net.layers[0].weights.data[0][1] = f64::NAN;
        let clf = Classifier::new(net, None, 2, 2).unwrap();
        assert!(matches!(clf.predict(&tensor([0, 0, 0, 0])), Err(PipelineError::Inference(_))));
    }
}
