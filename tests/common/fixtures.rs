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

/// Shared test fixtures for release archives and launch specs
use keycloak_local::distribution::MARKER_FILES;
use keycloak_local::launch::LaunchSpec;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;

/// Builds a release zip with every marker file under `keycloak-<version>/`.
#[allow(dead_code)]
pub fn distribution_zip(version: &str) -> Vec<u8> {
    let mut files: Vec<&str> = MARKER_FILES.to_vec();
    files.push("conf/keycloak.conf");
    zip_with_files(&format!("keycloak-{version}"), &files)
}

/// Builds a zip whose entries all live under `top/`.
#[allow(dead_code)]
pub fn zip_with_files(top: &str, files: &[&str]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    zip.add_directory(
        format!("{top}/"),
        SimpleFileOptions::default().unix_permissions(0o755),
    )
    .unwrap();

    for file in files {
        let mode = if file.ends_with(".sh") { 0o755 } else { 0o644 };
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored)
            .unix_permissions(mode);
        zip.start_file(format!("{top}/{file}"), options).unwrap();
        zip.write_all(format!("fake {file}\n").as_bytes()).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

/// A launch spec that runs `script` with `sh -c` in `dir`.
#[allow(dead_code)]
pub fn shell_spec(dir: &Path, script: &str) -> LaunchSpec {
    LaunchSpec {
        executable: "sh".to_string(),
        arguments: vec!["-c".to_string(), script.to_string()],
        working_directory: dir.to_path_buf(),
    }
}
