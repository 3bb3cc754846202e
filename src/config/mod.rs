//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for the SQLite store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL (e.g., "sqlite://registry.db", "sqlite::memory:")
    #[serde(default = "default_url")]
    pub url: String,

    /// Create the database file when it does not exist
    #[serde(default = "default_true")]
    pub create_if_missing: bool,

    /// Enforce the seller → department foreign key
    #[serde(default = "default_true")]
    pub foreign_keys: bool,

    /// How long a statement waits on a locked database
    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,

    /// Create the department and seller tables on connect
    #[serde(default = "default_true")]
    pub ensure_schema: bool,
}

fn default_url() -> String {
    "sqlite::memory:".to_string()
}

fn default_true() -> bool {
    true
}

fn default_busy_timeout_secs() -> u64 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            create_if_missing: true,
            foreign_keys: true,
            busy_timeout_secs: default_busy_timeout_secs(),
            ensure_schema: true,
        }
    }
}

impl DatabaseConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read database config '{}'", path))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse database config '{}'", path))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration for a private in-memory database
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Configuration for a database file at `path`
    pub fn file(path: impl AsRef<std::path::Path>) -> Self {
        Self {
            url: format!("sqlite://{}", path.as_ref().display()),
            ..Self::default()
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_secs(self.busy_timeout_secs)
    }

    /// Check that the settings can be used to open a connection
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            anyhow::bail!("Database url must not be empty");
        }
        if !self.url.starts_with("sqlite:") {
            anyhow::bail!(
                "Unsupported database url '{}': expected a sqlite: url",
                self.url
            );
        }
        Ok(())
    }
}
