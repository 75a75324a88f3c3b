pub mod artifact;
pub mod loader;

pub use artifact::{ensure_artifact, ArtifactSource, HttpSource};
pub use loader::ModelLoader;
