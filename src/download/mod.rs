/// Download management for Keycloak distributions
///
/// This module provides functionality for downloading release archives with:
/// - Progress reporting
/// - Checksum verification against published `.sha1` files
/// - Stall timeouts, an optional overall deadline and size limits
mod checksum;
mod client;
mod http_file_downloader;
mod options;
mod progress;

// Re-export public types and traits
pub use checksum::{calculate_sha1, parse_checksum_file, verify_checksum};
pub use client::{
    AttohttpcClient, DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT, HttpClient, HttpResponse,
};
pub use http_file_downloader::{HttpFileDownloader, ProgressReporter};
pub use options::{DownloadOptions, DownloadResult, MAX_DOWNLOAD_SIZE};
pub use progress::DownloadProgressAdapter;

use crate::error::Result;
use std::path::Path;

/// Download a release archive into a fresh temporary directory under `temp_root`.
///
/// # Arguments
/// * `downloader` - Configured downloader (client, progress reporter)
/// * `url` - Archive URL
/// * `temp_root` - Directory that will hold the private temporary directory
/// * `options` - Size limit, timeout and optional expected checksum
///
/// # Returns
/// A `DownloadResult` whose temporary directory is removed on drop
pub fn download_archive(
    downloader: &mut HttpFileDownloader,
    url: &str,
    temp_root: &Path,
    options: &DownloadOptions,
) -> Result<DownloadResult> {
    let temp_dir = tempfile::Builder::new()
        .prefix("download-")
        .tempdir_in(temp_root)?;
    let file_name = url
        .split('/')
        .next_back()
        .filter(|name| !name.is_empty())
        .unwrap_or("distribution.zip");
    let download_path = temp_dir.path().join(file_name);

    let result_path = downloader.download(url, &download_path, options)?;

    Ok(DownloadResult::new(result_path, temp_dir))
}
