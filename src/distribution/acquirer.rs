// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::archive;
use crate::config::KeycloakLocalConfig;
use crate::distribution::staging::{DistributionStager, FinalizeOutcome};
use crate::distribution::{Distribution, is_complete, require_utf8};
use crate::download::{
    self, AttohttpcClient, DownloadOptions, DownloadProgressAdapter, HttpClient,
    HttpFileDownloader, parse_checksum_file,
};
use crate::error::{KeycloakError, Result};
use crate::paths::{cache, shared};
use log::{debug, info};
use std::path::Path;

/// Downloads and extracts release archives into the distribution cache.
pub struct DistributionAcquirer {
    downloader: HttpFileDownloader,
    base_url: String,
    distribution_name: String,
    verify_checksum: bool,
    options: DownloadOptions,
}

impl DistributionAcquirer {
    pub fn new(config: &KeycloakLocalConfig) -> Self {
        let progress = DownloadProgressAdapter::new(
            config.download.no_progress,
            "Keycloak distribution".to_string(),
        );
        let downloader = HttpFileDownloader::with_client(Box::new(AttohttpcClient::new()))
            .with_progress_reporter(Box::new(progress));
        Self::with_downloader(config, downloader)
    }

    pub fn with_client(config: &KeycloakLocalConfig, client: Box<dyn HttpClient>) -> Self {
        Self::with_downloader(config, HttpFileDownloader::with_client(client))
    }

    pub fn with_downloader(config: &KeycloakLocalConfig, downloader: HttpFileDownloader) -> Self {
        Self {
            downloader,
            base_url: config.download.base_url.trim_end_matches('/').to_string(),
            distribution_name: config.download.distribution_name.clone(),
            verify_checksum: config.download.verify_checksum,
            options: DownloadOptions {
                timeout: config.download.timeout(),
                ..DownloadOptions::default()
            },
        }
    }

    /// `<base>/<version>/<name>-<version>.zip`
    pub fn archive_url(&self, version: &str) -> String {
        format!(
            "{}/{version}/{}-{version}.zip",
            self.base_url, self.distribution_name
        )
    }

    /// Guarantee a complete distribution for `version` under `cache_root`.
    ///
    /// A cache hit performs no network access. Every failure is reported as
    /// [`KeycloakError::Acquisition`] and never leaves a partial tree at the
    /// destination.
    pub fn acquire(&mut self, version: &str, cache_root: &Path) -> Result<Distribution> {
        self.acquire_inner(version, cache_root)
            .map_err(|e| KeycloakError::acquisition(version, e))
    }

    fn acquire_inner(&mut self, version: &str, cache_root: &Path) -> Result<Distribution> {
        if !shared::is_safe_segment(version) {
            return Err(KeycloakError::ValidationError(format!(
                "'{version}' is not a valid release version"
            )));
        }

        let destination = cache::distribution_dir(cache_root, version);
        require_utf8(&destination)?;

        if let Some(distribution) = Distribution::locate(cache_root, version) {
            debug!(
                "Keycloak {version} already present at {}",
                distribution.root().display()
            );
            return Ok(distribution);
        }

        let staging_root = cache::ensure_staging_root(cache_root)?;
        let url = self.archive_url(version);

        let mut options = self.options.clone();
        if self.verify_checksum {
            options.checksum = Some(self.fetch_checksum(&url)?);
        }

        info!("Downloading Keycloak {version} from {url}");
        let archive_file =
            download::download_archive(&mut self.downloader, &url, &staging_root, &options)?;
        info!("Downloaded Keycloak {version}");

        let context = DistributionStager::prepare(cache_root, &destination)?;
        match archive::extract_archive(archive_file.path(), &context.temp_path) {
            Ok(info) => debug!(
                "Unpacked {} files ({} bytes) into {}",
                info.file_count,
                info.uncompressed_size,
                context.temp_path.display()
            ),
            Err(e) => {
                let _ = DistributionStager::cleanup_failed(&context);
                return Err(e);
            }
        }
        drop(archive_file);

        match DistributionStager::finalize(context)? {
            FinalizeOutcome::Installed => {
                info!("Extracted Keycloak {version} to {}", destination.display())
            }
            FinalizeOutcome::AlreadyPresent => {
                info!("Keycloak {version} was installed concurrently, reusing it")
            }
        }

        debug_assert!(is_complete(&destination));
        Distribution::open(version, destination)
    }

    fn fetch_checksum(&self, archive_url: &str) -> Result<String> {
        let checksum_url = format!("{archive_url}.sha1");
        debug!("Fetching checksum from {checksum_url}");
        let body = self.downloader.fetch_text(&checksum_url)?;
        parse_checksum_file(&body)
    }
}
