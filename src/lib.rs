pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod preprocess;
pub mod inference;
pub mod loader;
pub mod config;
pub mod error;
pub mod stages;
pub mod scaffold;
pub mod logging;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::{InputType, ModelMetadata, Network};
pub use preprocess::{ImageTensor, PreprocessedImage, Preprocessor, ResizeFilter};
pub use inference::{Classification, Classifier, LabelSet, Pipeline, Prediction, DEFAULT_LABELS};
pub use loader::{ArtifactSource, HttpSource, ModelLoader};
pub use config::{AppConfig, ConfigArgs};
pub use error::{ConfigError, LoadError, PipelineError};
pub use scaffold::scaffold_network;
