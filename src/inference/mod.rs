pub mod classifier;
pub mod labels;
pub mod pipeline;
pub mod prediction;

pub use classifier::Classifier;
pub use labels::{LabelSet, DEFAULT_LABELS};
pub use pipeline::{Classification, Pipeline};
pub use prediction::{argmax, Prediction};
