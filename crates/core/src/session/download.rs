use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::data_url::DataUrlError;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("annotated image is not valid base64: {0}")]
    Decode(#[from] DataUrlError),
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine a downloads directory")]
    NoDownloadDir,
}

/// Where a client-side save ends up.
pub trait DownloadSink {
    /// Saves `bytes` under `suggested_name` and returns the final path.
    fn save(&self, suggested_name: &str, bytes: &[u8]) -> Result<PathBuf, DownloadError>;
}

/// Saves into a directory under the suggested name, like a browser download.
pub struct DirectoryDownloadSink {
    dir: PathBuf,
}

impl DirectoryDownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The user's downloads folder, falling back to the home directory.
    pub fn user_downloads() -> Result<Self, DownloadError> {
        dirs::download_dir()
            .or_else(dirs::home_dir)
            .map(Self::new)
            .ok_or(DownloadError::NoDownloadDir)
    }
}

impl DownloadSink for DirectoryDownloadSink {
    fn save(&self, suggested_name: &str, bytes: &[u8]) -> Result<PathBuf, DownloadError> {
        fs::create_dir_all(&self.dir).map_err(|e| DownloadError::Write {
            path: self.dir.clone(),
            source: e,
        })?;
        write_file(&self.dir.join(suggested_name), bytes)
    }
}

/// Saves to an exact path chosen by the user, ignoring the suggested name.
pub struct FileDownloadSink {
    path: PathBuf,
}

impl FileDownloadSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DownloadSink for FileDownloadSink {
    fn save(&self, _suggested_name: &str, bytes: &[u8]) -> Result<PathBuf, DownloadError> {
        write_file(&self.path, bytes)
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<PathBuf, DownloadError> {
    fs::write(path, bytes).map_err(|e| DownloadError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_sink_uses_suggested_name() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectoryDownloadSink::new(tmp.path().join("downloads"));
        let path = sink.save("result.jpg", b"jpeg").unwrap();
        assert_eq!(path, tmp.path().join("downloads").join("result.jpg"));
        assert_eq!(fs::read(&path).unwrap(), b"jpeg");
    }

    #[test]
    fn test_file_sink_uses_exact_path() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("chosen.jpg");
        let path = FileDownloadSink::new(&target).save("ignored.jpg", b"x").unwrap();
        assert_eq!(path, target);
        assert!(!tmp.path().join("ignored.jpg").exists());
    }

    #[test]
    fn test_write_to_missing_directory_errors() {
        let sink = FileDownloadSink::new("/nonexistent/dir/out.jpg");
        assert!(matches!(
            sink.save("out.jpg", b"x"),
            Err(DownloadError::Write { .. })
        ));
    }
}
