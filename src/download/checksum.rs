use crate::error::{KeycloakError, Result};
use sha1::{Digest, Sha1};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const CHECKSUM_CHUNK_SIZE: usize = 8192;
const SHA1_HEX_LEN: usize = 40;

pub fn verify_checksum(file_path: &Path, expected: &str) -> Result<()> {
    let calculated = calculate_sha1(file_path)?;
    let expected = expected.trim().to_ascii_lowercase();

    if calculated != expected {
        return Err(KeycloakError::ChecksumMismatch {
            expected,
            actual: calculated,
        });
    }

    Ok(())
}

pub fn calculate_sha1(file_path: &Path) -> Result<String> {
    let mut file = File::open(file_path)?;
    let mut hasher = Sha1::new();
    let mut buffer = vec![0u8; CHECKSUM_CHUNK_SIZE];

    loop {
        match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => hasher.update(&buffer[..n]),
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Extract the digest from a published `.sha1` file.
///
/// Both the bare form (`<hex>`) and the `sha1sum` form (`<hex>  <file>`) are
/// accepted.
pub fn parse_checksum_file(contents: &str) -> Result<String> {
    let digest = contents.split_whitespace().next().unwrap_or_default();

    if digest.len() != SHA1_HEX_LEN || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(KeycloakError::ValidationError(format!(
            "Invalid SHA-1 checksum file content: '{}'",
            contents.trim()
        )));
    }

    Ok(digest.to_ascii_lowercase())
}
