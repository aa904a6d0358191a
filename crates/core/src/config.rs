// Configuration
//
// One explicit value, validated before any component is built. Loaded from an
// optional TOML file layered under MAILROOM_* environment variables.

use crate::error::{Result, StoreError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PREFIX: &str = "MAILROOM";
pub const DEFAULT_DB_PATH: &str = "mailer.db";
pub const DEFAULT_READ_POOL_SIZE: u32 = 120;
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// AES-128 key length in bytes
pub const ENCRYPTION_KEY_LEN: usize = 16;

/// Connection settings for the two database handles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    /// Maximum connections of the read handle (the write handle always has one)
    pub read_pool_size: u32,
    pub write_idle_timeout: Duration,
    pub read_idle_timeout: Duration,
    pub busy_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            read_pool_size: DEFAULT_READ_POOL_SIZE,
            write_idle_timeout: Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
            read_idle_timeout: Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.db_path.as_os_str().is_empty() {
            return Err(StoreError::InvalidConfig("db_path must not be empty".into()));
        }
        if self.read_pool_size == 0 {
            return Err(StoreError::InvalidConfig(
                "read_pool_size must be at least 1".into(),
            ));
        }
        if self.write_idle_timeout.is_zero() || self.read_idle_timeout.is_zero() {
            return Err(StoreError::InvalidConfig(
                "idle timeouts must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Top-level configuration
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct MailerConfig {
    pub db_path: PathBuf,
    pub read_pool_size: u32,
    pub write_idle_timeout_secs: u64,
    pub read_idle_timeout_secs: u64,
    pub busy_timeout_ms: u64,
    /// 32 hex characters (16 bytes)
    pub encryption_key: String,
    /// "pretty" or "json"
    pub log_format: String,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            read_pool_size: DEFAULT_READ_POOL_SIZE,
            write_idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
            read_idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            encryption_key: String::new(),
            log_format: "pretty".to_string(),
        }
    }
}

impl std::fmt::Debug for MailerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailerConfig")
            .field("db_path", &self.db_path)
            .field("read_pool_size", &self.read_pool_size)
            .field("write_idle_timeout_secs", &self.write_idle_timeout_secs)
            .field("read_idle_timeout_secs", &self.read_idle_timeout_secs)
            .field("busy_timeout_ms", &self.busy_timeout_ms)
            .field("encryption_key", &"[REDACTED]")
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl MailerConfig {
    /// Load from an optional file, then MAILROOM_* environment variables
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX));
        Self::build(builder)
    }

    /// Load from TOML text (no environment layering)
    pub fn from_toml(text: &str) -> Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml));
        Self::build(builder)
    }

    fn build(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let parsed: MailerConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| StoreError::InvalidConfig(e.to_string()))?;
        parsed.validate()?;
        Ok(parsed)
    }

    pub fn validate(&self) -> Result<()> {
        self.store_config().validate()?;
        self.encryption_key_bytes()?;
        match self.log_format.as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(StoreError::InvalidConfig(format!(
                "log_format must be \"pretty\" or \"json\", got {other:?}"
            ))),
        }
    }

    /// Decode the hex key, enforcing the 16-byte length
    pub fn encryption_key_bytes(&self) -> Result<Vec<u8>> {
        let key = hex::decode(self.encryption_key.trim()).map_err(|_| {
            StoreError::EncryptionConfigInvalid(
                "encryption key must be hex encoded [0-9a-f]".into(),
            )
        })?;
        if key.len() != ENCRYPTION_KEY_LEN {
            return Err(StoreError::EncryptionConfigInvalid(format!(
                "encryption key must be {} bytes ({} hex characters), got {} bytes",
                ENCRYPTION_KEY_LEN,
                ENCRYPTION_KEY_LEN * 2,
                key.len()
            )));
        }
        Ok(key)
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            db_path: self.db_path.clone(),
            read_pool_size: self.read_pool_size,
            write_idle_timeout: Duration::from_secs(self.write_idle_timeout_secs),
            read_idle_timeout: Duration::from_secs(self.read_idle_timeout_secs),
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
        }
    }
}
