use crate::download::checksum::verify_checksum;
use crate::download::client::{AttohttpcClient, HttpClient, HttpResponse};
use crate::download::options::DownloadOptions;
use crate::error::{KeycloakError, Result};
use std::fs;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const DOWNLOAD_CHUNK_SIZE: usize = 8192;

pub trait ProgressReporter: Send + Sync {
    fn on_start(&mut self, total_bytes: u64);

    fn on_progress(&mut self, bytes_downloaded: u64);

    fn on_complete(&mut self);
}

pub struct HttpFileDownloader {
    pub(crate) http_client: Box<dyn HttpClient>,
    progress_reporter: Option<Box<dyn ProgressReporter>>,
}

impl Default for HttpFileDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFileDownloader {
    pub fn new() -> Self {
        Self::with_client(Box::new(AttohttpcClient::new()))
    }

    pub fn with_client(http_client: Box<dyn HttpClient>) -> Self {
        Self {
            http_client,
            progress_reporter: None,
        }
    }

    pub fn with_progress_reporter(mut self, reporter: Box<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Stream `url` into `destination`.
    ///
    /// The body is written to a temporary sibling first and renamed into
    /// place only after the size and checksum checks pass, so `destination`
    /// never holds a partial download.
    pub fn download(
        &mut self,
        url: &str,
        destination: &Path,
        options: &DownloadOptions,
    ) -> Result<PathBuf> {
        let parent = destination.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;

        self.http_client.set_timeout(options.timeout);
        let response = self.http_client.get(url)?;

        self.validate_response(url, response.as_ref(), options.max_size)?;
        let total_size = self.get_total_size(response.as_ref());

        if let Some(reporter) = &mut self.progress_reporter {
            reporter.on_start(total_size);
        }

        let temp_file = NamedTempFile::new_in(parent)?;
        self.download_to_file(response, temp_file.as_file(), options.max_size)?;

        if let Some(expected_checksum) = &options.checksum {
            verify_checksum(temp_file.path(), expected_checksum)?;
        }

        temp_file
            .persist(destination)
            .map_err(|e| KeycloakError::Io(e.error))?;

        if let Some(reporter) = &mut self.progress_reporter {
            reporter.on_complete();
        }

        Ok(destination.to_path_buf())
    }

    /// Fetch a small text resource such as a published checksum.
    pub fn fetch_text(&self, url: &str) -> Result<String> {
        let mut response = self.http_client.get(url)?;
        self.validate_response(url, response.as_ref(), DOWNLOAD_CHUNK_SIZE as u64)?;

        let mut body = String::new();
        response
            .by_ref()
            .take(DOWNLOAD_CHUNK_SIZE as u64)
            .read_to_string(&mut body)?;
        Ok(body)
    }

    fn validate_response(&self, url: &str, response: &dyn HttpResponse, max_size: u64) -> Result<()> {
        let status = response.status();

        if !(200..300).contains(&status) {
            return Err(KeycloakError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        if let Some(length) = content_length(response)
            && length > max_size
        {
            return Err(KeycloakError::ValidationError(format!(
                "Download size {length} exceeds maximum allowed size {max_size}"
            )));
        }

        Ok(())
    }

    fn get_total_size(&self, response: &dyn HttpResponse) -> u64 {
        // If we can't determine size, return 0 (unknown)
        content_length(response).unwrap_or(0)
    }

    fn download_to_file(
        &mut self,
        mut response: Box<dyn HttpResponse>,
        file: &fs::File,
        max_size: u64,
    ) -> Result<()> {
        let mut writer = BufWriter::new(file);
        let mut downloaded = 0u64;
        let mut buffer = vec![0; DOWNLOAD_CHUNK_SIZE];

        loop {
            match response.read(&mut buffer) {
                Ok(0) => break, // EOF
                Ok(n) => {
                    downloaded += n as u64;
                    if downloaded > max_size {
                        return Err(KeycloakError::ValidationError(format!(
                            "Download exceeded maximum allowed size {max_size}"
                        )));
                    }
                    writer.write_all(&buffer[..n])?;

                    if let Some(reporter) = &mut self.progress_reporter {
                        reporter.on_progress(downloaded);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        writer.flush()?;
        Ok(())
    }
}

fn content_length(response: &dyn HttpResponse) -> Option<u64> {
    response
        .header("Content-Length")
        .and_then(|value| value.trim().parse::<u64>().ok())
}

#[cfg(test)]
#[path = "http_file_downloader_tests.rs"]
mod http_file_downloader_tests;
