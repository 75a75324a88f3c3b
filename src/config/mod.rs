pub mod app_config;

pub use app_config::{AppConfig, ConfigArgs, ModelConfig, PreprocessConfig, ServerConfig};
