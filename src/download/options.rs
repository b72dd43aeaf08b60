use std::path::{Path, PathBuf};
use std::time::Duration;

/// Maximum allowed download size (1GB)
pub const MAX_DOWNLOAD_SIZE: u64 = 1_073_741_824;

/// Options for configuring download behavior
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Expected SHA-1 of the downloaded file (lowercase hex)
    pub checksum: Option<String>,

    /// Deadline for the whole transfer; `None` lets a slow download run to
    /// completion as long as data keeps arriving
    pub timeout: Option<Duration>,

    /// Maximum allowed file size
    pub max_size: u64,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            checksum: None,
            timeout: None,
            max_size: MAX_DOWNLOAD_SIZE,
        }
    }
}

/// A downloaded archive inside a private temporary directory.
pub struct DownloadResult {
    /// Path to the downloaded file
    pub path: PathBuf,

    /// Temporary directory containing the file (will be cleaned up when dropped)
    pub(crate) _temp_dir: tempfile::TempDir,
}

impl DownloadResult {
    /// Get the path to the downloaded file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn new(path: PathBuf, temp_dir: tempfile::TempDir) -> Self {
        Self {
            path,
            _temp_dir: temp_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_options_default() {
        let options = DownloadOptions::default();
        assert_eq!(options.checksum, None);
        assert_eq!(options.timeout, None);
        assert_eq!(options.max_size, MAX_DOWNLOAD_SIZE);
    }

    #[test]
    fn test_download_result_removes_directory_on_drop() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir_path = temp_dir.path().to_path_buf();
        let file_path = dir_path.join("archive.zip");
        std::fs::write(&file_path, b"zip").unwrap();

        let result = DownloadResult::new(file_path.clone(), temp_dir);
        assert_eq!(result.path(), file_path);
        drop(result);

        assert!(!dir_path.exists());
    }
}
