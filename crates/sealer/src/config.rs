//! Configuration loading and validation for the sealer service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::crypto::SecretKey;
use crate::server::middleware::DEFAULT_REQUEST_TIMEOUT;

/// Validated sealer service configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Hex-encoded 32-byte AES-256 key (`ENCRYPTION_KEY`). **Required.**
    ///
    /// Held as a [`SecretString`] so it is redacted from `Debug` output.
    pub encryption_key: SecretString,

    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed,
    /// or if `ENCRYPTION_KEY` is not a hex-encoded 32-byte key.
    pub fn from_env() -> Result<Self> {
        Self::from_builder(config::Config::builder().add_source(config::Environment::default()))
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        let cfg = builder
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Decode the provisioned key.
    ///
    /// # Errors
    ///
    /// Returns an error if `ENCRYPTION_KEY` is blank, not hex, or not 32 bytes.
    pub fn secret_key(&self) -> Result<SecretKey> {
        SecretKey::from_hex(self.encryption_key.expose_secret())
            .context("ENCRYPTION_KEY must be a hex-encoded 32-byte key")
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(self.encryption_key.expose_secret(), "ENCRYPTION_KEY")?;
        ensure_non_empty(&self.log_level, "LOG_LEVEL")?;

        // A bad key must stop start-up.
        self.secret_key()?;

        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be > 0");
        }
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
