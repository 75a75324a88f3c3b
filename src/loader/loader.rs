use std::time::{Duration, Instant};

use tracing::info;

use crate::config::AppConfig;
use crate::error::LoadError;
use crate::inference::{Classifier, Pipeline};
use crate::loader::artifact::{ensure_artifact, ArtifactSource, HttpSource};
use crate::network::Network;

/// Builds the process-wide `Pipeline` from configuration.
///
/// Call once at startup and share the result; every error here is meant to
/// abort the process.
pub struct ModelLoader<'a> {
    config: &'a AppConfig,
    source: Box<dyn ArtifactSource + 'a>,
}

impl<'a> ModelLoader<'a> {
    /// Loader that downloads over HTTP when the artifact is missing.
    pub fn new(config: &'a AppConfig) -> ModelLoader<'a> {
        let timeout = Duration::from_secs(config.model.download_timeout_secs);
        ModelLoader { config, source: Box::new(HttpSource::new(timeout)) }
    }

    /// Loader with a custom transport.
    pub fn with_source(config: &'a AppConfig, source: impl ArtifactSource + 'a) -> ModelLoader<'a> {
        ModelLoader { config, source: Box::new(source) }
    }

    /// Makes sure the artifact exists locally, downloading it if needed.
    pub fn fetch(&self) -> Result<std::path::PathBuf, LoadError> {
        ensure_artifact(
            &self.config.model.path,
            self.config.model.url.as_deref(),
            self.source.as_ref(),
        )
    }

    /// Fetch, parse and verify the model, then pair it with the configured
    /// preprocessor.
    pub fn load(&self) -> Result<Pipeline, LoadError> {
        let path = self.fetch()?;
        let started = Instant::now();
        let network = Network::load_json(&path)?;

        let preprocessor = self.config.preprocessor();
        let (width, height) = preprocessor.dimensions();
        let classifier = Classifier::new(network, self.config.model.labels.as_deref(), width, height)?;

        info!(
            path = %path.display(),
            layers = classifier.network().layers.len(),
            inputs = classifier.network().input_size(),
            labels = ?classifier.labels().as_slice(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "model loaded"
        );
        Pipeline::new(preprocessor, classifier)
    }
}
