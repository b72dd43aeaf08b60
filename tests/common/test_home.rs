use std::fs;
use std::path::{Path, PathBuf};

/// Creates a test home directory under target/home with a random name.
/// The directory is removed again when the guard is dropped.
pub struct TestHomeGuard {
    path: PathBuf,
}

#[allow(dead_code)]
impl TestHomeGuard {
    pub fn new() -> Self {
        let random_name = uuid::Uuid::new_v4().simple().to_string()[..8].to_string();

        let path = std::env::current_dir()
            .expect("Failed to read current directory")
            .join("target/home")
            .join(random_name);
        fs::create_dir_all(&path).expect("Failed to create test home directory");

        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn keycloak_home(&self) -> PathBuf {
        self.path.join(".keycloak-local")
    }

    pub fn cache_root(&self) -> PathBuf {
        self.keycloak_home().join("cache")
    }
}

impl Drop for TestHomeGuard {
    fn drop(&mut self) {
        if self.path.exists() {
            fs::remove_dir_all(&self.path).unwrap_or_else(|e| {
                eprintln!(
                    "Failed to cleanup test directory {}: {e}",
                    self.path.display()
                );
            });
        }
    }
}
