use rand::{rngs::StdRng, SeedableRng};

use crate::activation::activation::ActivationFunction;
use crate::inference::LabelSet;
use crate::network::{InputType, ModelMetadata, Network};

/// Builds an untrained `input → hidden (ReLU) → labels (Softmax)` network
/// with correct metadata for a `width × height` grayscale input.
///
/// Weights are He-initialized from `seed`, so the same arguments always give
/// the same artifact. Predictions from it are meaningless; it exists so a
/// deployment can be exercised end to end before trained weights are in place.
pub fn scaffold_network(width: u32, height: u32, hidden: usize, labels: &LabelSet, seed: u64) -> Network {
    let mut rng = StdRng::seed_from_u64(seed);
    let inputs = width as usize * height as usize;
    let hidden = hidden.max(1);
    Network::new(
        vec![
            (hidden, inputs, ActivationFunction::ReLU),
            (labels.len(), hidden, ActivationFunction::Softmax),
        ],
        &mut rng,
    )
    .with_metadata(ModelMetadata {
        description: Some(format!("untrained scaffold (seed {})", seed)),
        input_type: Some(InputType::ImageGrayscale { width, height }),
        output_labels: Some(labels.as_slice().to_vec()),
    })
}
