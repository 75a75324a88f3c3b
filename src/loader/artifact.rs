use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use crate::error::LoadError;

/// Something that can stream a remote artifact into a writer.
pub trait ArtifactSource {
    /// Writes the resource at `url` to `dest`, returning the byte count.
    fn fetch(&self, url: &str, dest: &mut dyn Write) -> Result<u64, LoadError>;
}

/// Plain HTTP(S) GET.
pub struct HttpSource {
    timeout: Duration,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> HttpSource {
        HttpSource { timeout }
    }
}

impl ArtifactSource for HttpSource {
    fn fetch(&self, url: &str, dest: &mut dyn Write) -> Result<u64, LoadError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| LoadError::Download(e.to_string()))?;

        let mut response = client
            .get(url)
            .send()
            .map_err(|e| LoadError::Download(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LoadError::Download(format!(
                "HTTP {}: {}",
                response.status(),
                response.status().canonical_reason().unwrap_or("")
            )));
        }

        response.copy_to(dest).map_err(|e| LoadError::Download(e.to_string()))
    }
}

/// Returns `path` if it already exists. Otherwise downloads `url` into a
/// sibling `.part` file and renames it into place once complete.
pub fn ensure_artifact(
    path: &Path,
    url: Option<&str>,
    source: &dyn ArtifactSource,
) -> Result<PathBuf, LoadError> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    let url = url.ok_or_else(|| LoadError::ArtifactMissing(path.to_path_buf()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let partial = partial_path(path);
    info!(url, dest = %path.display(), "downloading model artifact");

    match download_to(&partial, url, source) {
        Ok(bytes) => {
            fs::rename(&partial, path)?;
            info!(bytes, dest = %path.display(), "model artifact downloaded");
            Ok(path.to_path_buf())
        }
        Err(e) => {
            let _ = fs::remove_file(&partial);
            Err(e)
        }
    }
}

fn download_to(partial: &Path, url: &str, source: &dyn ArtifactSource) -> Result<u64, LoadError> {
    let mut writer = BufWriter::new(File::create(partial)?);
    let bytes = source.fetch(url, &mut writer)?;
    writer.flush()?;
    Ok(bytes)
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct StaticSource {
        body: Vec<u8>,
        calls: Cell<usize>,
    }

    impl ArtifactSource for StaticSource {
        fn fetch(&self, _url: &str, dest: &mut dyn Write) -> Result<u64, LoadError> {
            self.calls.set(self.calls.get() + 1);
            dest.write_all(&self.body)?;
            Ok(self.body.len() as u64)
        }
    }

    struct FailingSource;

    impl ArtifactSource for FailingSource {
        fn fetch(&self, _url: &str, dest: &mut dyn Write) -> Result<u64, LoadError> {
            dest.write_all(b"half")?;
            Err(LoadError::Download("connection reset".into()))
        }
    }

    #[test]
    fn existing_artifact_is_not_downloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, b"{}").unwrap();
        let source = StaticSource { body: b"other".to_vec(), calls: Cell::new(0) };
        ensure_artifact(&path, Some("https://example.org/m"), &source).unwrap();
        assert_eq!(source.calls.get(), 0);
        assert_eq!(fs::read(&path).unwrap(), b"{}");
    }

    #[test]
    fn missing_artifact_is_fetched_into_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models").join("model.json");
        let source = StaticSource { body: b"payload".to_vec(), calls: Cell::new(0) };
        ensure_artifact(&path, Some("https://example.org/m"), &source).unwrap();
        assert_eq!(source.calls.get(), 1);
        assert_eq!(fs::read(&path).unwrap(), b"payload");
        assert!(!partial_path(&path).exists());
    }

    #[test]
    fn missing_artifact_without_url_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let err = ensure_artifact(&path, None, &FailingSource).unwrap_err();
        assert!(matches!(err, LoadError::ArtifactMissing(p) if p == path));
    }

    #[test]
    fn failed_download_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let err = ensure_artifact(&path, Some("https://example.org/m"), &FailingSource).unwrap_err();
        assert!(matches!(err, LoadError::Download(_)));
        assert!(!path.exists());
        assert!(!partial_path(&path).exists());
    }
}
