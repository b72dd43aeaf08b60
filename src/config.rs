use crate::error::{KeycloakError, Result};
use crate::paths::home;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PREFIX: &str = "KEYCLOAK_LOCAL";

pub const DEFAULT_BASE_URL: &str = "https://github.com/keycloak/keycloak/releases/download";
pub const DEFAULT_DISTRIBUTION_NAME: &str = "keycloak";

pub const DEFAULT_READINESS_URL: &str = "http://localhost:8080/";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;
pub const DEFAULT_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_ATTEMPT_TIMEOUT_MS: u64 = 2_000;

pub const DEFAULT_GRACE_PERIOD_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeycloakLocalConfig {
    #[serde(skip)]
    home: PathBuf,

    /// Overrides `<home>/cache` as the distribution cache.
    #[serde(default)]
    pub cache_root: Option<PathBuf>,

    /// JDK used to launch Keycloak; `JAVA_HOME` and `PATH` are consulted when unset.
    #[serde(default)]
    pub java_home: Option<PathBuf>,

    #[serde(default)]
    pub download: DownloadConfig,

    #[serde(default)]
    pub readiness: ReadinessConfig,

    #[serde(default)]
    pub shutdown: ShutdownConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_distribution_name")]
    pub distribution_name: String,

    /// Overall deadline for the archive transfer. Unset by default: release
    /// archives are large and only stalled connections are cut off.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub verify_checksum: bool,

    #[serde(default)]
    pub no_progress: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            distribution_name: default_distribution_name(),
            timeout_secs: None,
            verify_checksum: false,
            no_progress: false,
        }
    }
}

impl DownloadConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessConfig {
    #[serde(default = "default_readiness_url")]
    pub url: String,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default = "default_attempt_timeout_ms")]
    pub attempt_timeout_ms: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            url: default_readiness_url(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval_ms: DEFAULT_INTERVAL_MS,
            attempt_timeout_ms: DEFAULT_ATTEMPT_TIMEOUT_MS,
        }
    }
}

impl ReadinessConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShutdownConfig {
    #[serde(default = "default_grace_period_secs")]
    pub grace_period_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            grace_period_secs: DEFAULT_GRACE_PERIOD_SECS,
        }
    }
}

impl ShutdownConfig {
    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_secs)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_distribution_name() -> String {
    DEFAULT_DISTRIBUTION_NAME.to_string()
}

fn default_readiness_url() -> String {
    DEFAULT_READINESS_URL.to_string()
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

fn default_attempt_timeout_ms() -> u64 {
    DEFAULT_ATTEMPT_TIMEOUT_MS
}

fn default_grace_period_secs() -> u64 {
    DEFAULT_GRACE_PERIOD_SECS
}

/// Load the configuration for the home resolved from the environment.
pub fn new_keycloak_config() -> Result<KeycloakLocalConfig> {
    let home = home::resolve_home()?;
    KeycloakLocalConfig::load(&home)
}

impl KeycloakLocalConfig {
    /// Defaults only, rooted at `home`. No file or environment is consulted.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            cache_root: None,
            java_home: None,
            download: DownloadConfig::default(),
            readiness: ReadinessConfig::default(),
            shutdown: ShutdownConfig::default(),
        }
    }

    /// Layer `<home>/config.toml` (optional) and `KEYCLOAK_LOCAL_*` variables
    /// over the defaults.
    pub fn load(home: &Path) -> Result<Self> {
        let config_path = home::config_file(home);
        if config_path.exists() {
            log::debug!("Loading config from {config_path:?}");
        } else {
            log::debug!("Config file not found at {config_path:?}, using defaults");
        }

        let settings = Config::builder()
            .add_source(File::from(config_path.as_path()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| KeycloakError::ConfigError(format!("Failed to load config: {e}")))?;

        let mut config: KeycloakLocalConfig = settings
            .try_deserialize()
            .map_err(|e| KeycloakError::ConfigError(format!("Invalid config: {e}")))?;
        config.home = home.to_path_buf();
        config.validate()?;

        Ok(config)
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn cache_root(&self) -> PathBuf {
        self.cache_root
            .clone()
            .unwrap_or_else(|| home::cache_dir(&self.home))
    }

    pub fn validate(&self) -> Result<()> {
        if self.readiness.max_attempts == 0 {
            return Err(KeycloakError::ConfigError(
                "readiness.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.download.base_url.trim().is_empty() {
            return Err(KeycloakError::ConfigError(
                "download.base_url must not be empty".to_string(),
            ));
        }
        if self.download.distribution_name.trim().is_empty() {
            return Err(KeycloakError::ConfigError(
                "download.distribution_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| KeycloakError::ConfigError(format!("Failed to serialize config: {e}")))
    }
}
