use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::preprocess::{Preprocessor, ResizeFilter};

/// Top-level configuration, read from an optional JSON file.
/// Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub preprocess: PreprocessConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address for the web UI.
    pub addr: String,
    /// Uploads larger than this are rejected without being fully read.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            addr: "127.0.0.1:8501".into(),
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    /// Local artifact location.
    pub path: PathBuf,
    /// Where to fetch the artifact from when `path` does not exist.
    pub url: Option<String>,
    /// Expected label order. Checked against the artifact's own labels.
    pub labels: Option<Vec<String>>,
    pub download_timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            path: PathBuf::from("models/alzheimer_mri.json"),
            url: None,
            labels: None,
            download_timeout_secs: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreprocessConfig {
    pub width: u32,
    pub height: u32,
    pub filter: ResizeFilter,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        PreprocessConfig { width: 176, height: 176, filter: ResizeFilter::default() }
    }
}

impl AppConfig {
    /// Reads `path` if given, otherwise returns the defaults. The result is
    /// validated either way.
    pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let config = match path {
            Some(p) => AppConfig::from_json_str(&std::fs::read_to_string(p)?)?,
            None => AppConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<AppConfig, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.preprocess.width == 0 || self.preprocess.height == 0 {
            return Err(ConfigError::Invalid("preprocess width and height must be non-zero".into()));
        }
        if self.server.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid("server.max_upload_bytes must be non-zero".into()));
        }
        if let Some(labels) = &self.model.labels {
            if labels.is_empty() {
                return Err(ConfigError::Invalid("model.labels must not be empty".into()));
            }
        }
        if let Some(url) = &self.model.url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!("model.url must be http(s): {}", url)));
            }
        }
        Ok(())
    }

    pub fn preprocessor(&self) -> Preprocessor {
        Preprocessor::new(self.preprocess.width, self.preprocess.height, self.preprocess.filter)
    }
}

/// Config flags shared by both binaries. Flags override file values.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// JSON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Local model artifact path
    #[arg(long)]
    pub model_path: Option<PathBuf>,

    /// URL to download the model artifact from when it is missing
    #[arg(long)]
    pub model_url: Option<String>,

    /// Resampling filter for the resize step
    #[arg(long, value_enum)]
    pub filter: Option<ResizeFilter>,
}

impl ConfigArgs {
    pub fn resolve(&self) -> Result<AppConfig, ConfigError> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        if let Some(path) = &self.model_path {
            config.model.path = path.clone();
        }
        if let Some(url) = &self.model_url {
            config.model.url = Some(url.clone());
        }
        if let Some(filter) = self.filter {
            config.preprocess.filter = filter;
        }
        config.validate()?;
        Ok(config)
    }
}
