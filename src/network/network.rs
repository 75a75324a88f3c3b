use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::{activation::activation::ActivationFunction, layers::dense::Layer};
use crate::error::LoadError;
use crate::network::metadata::ModelMetadata;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub metadata: Option<ModelMetadata>,
}

impl Network {
    /// Builds a freshly initialized network from (size, input_size, activation) tuples.
    pub fn new<R: Rng + ?Sized>(
        layer_specs: Vec<(usize, usize, ActivationFunction)>,
        rng: &mut R,
    ) -> Network {
        let layers = layer_specs.into_iter()
            .map(|(size, input_size, activation)| Layer::new(size, input_size, activation, rng))
            .collect();
        Network { layers, metadata: None }
    }

    pub fn with_metadata(mut self, metadata: ModelMetadata) -> Network {
        self.metadata = Some(metadata);
        self
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map(|l| l.input_size()).unwrap_or(0)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map(|l| l.size).unwrap_or(0)
    }

    /// Forward pass. Read-only; `None` if `input` does not fit the first layer.
    pub fn forward(&self, input: &[f64]) -> Option<Vec<f64>> {
        let mut current = input.to_vec();
        for layer in &self.layers {
            current = layer.feed_from(&current)?;
        }
        Some(current)
    }

    /// Checks per-layer shapes and that consecutive layers chain together.
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.layers.is_empty() {
            return Err(LoadError::InvalidModel("model has no layers".into()));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            layer.check_shapes()
                .map_err(|e| LoadError::InvalidModel(format!("layer {}: {}", i, e)))?;
        }
        for (i, pair) in self.layers.windows(2).enumerate() {
            if pair[1].input_size() != pair[0].size {
                return Err(LoadError::InvalidModel(format!(
                    "layer {} expects {} inputs but layer {} has {} neurons",
                    i + 1, pair[1].input_size(), i, pair[0].size
                )));
            }
        }
        Ok(())
    }

    /// Serializes the network to a JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Network, LoadError> {
        Network::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Network, LoadError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn small() -> Network {
        Network::new(
            vec![(3, 4, ActivationFunction::ReLU), (2, 3, ActivationFunction::Softmax)],
            &mut StdRng::seed_from_u64(1),
        )
    }

    #[test]
    fn sizes_follow_first_and_last_layer() {
        let net = small();
        assert_eq!(net.input_size(), 4);
        assert_eq!(net.output_size(), 2);
        assert!(net.validate().is_ok());
    }

    #[test]
    fn forward_produces_distribution() {
        let out = small().forward(&[0.1, 0.2, 0.3, 0.4]).unwrap();
        assert_eq!(out.len(), 2);
        assert!((out.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn broken_chain_fails_validation() {
        let mut net = small();
        net.layers[1] = Layer::new(2, 5, ActivationFunction::Softmax, &mut StdRng::seed_from_u64(2));
        assert!(matches!(net.validate(), Err(LoadError::InvalidModel(_))));
    }

    #[test]
    fn empty_network_is_invalid() {
        let net = Network { layers: vec![], metadata: None };
        assert!(net.validate().is_err());
        assert_eq!(net.input_size(), 0);
    }

    #[test]
    fn json_without_metadata_still_loads() {
        let mut json = serde_json::to_value(small()).unwrap();
        json.as_object_mut().unwrap().remove("metadata");
        let bytes = serde_json::to_vec(&json).unwrap();
        let net = Network::from_reader(bytes.as_slice()).unwrap();
        assert!(net.metadata.is_none());
        assert_eq!(net.layers.len(), 2);
        assert_eq!(net.input_size(), 4);
        assert_eq!(net.layers[1].activator, ActivationFunction::Softmax);
    }
}
