//! Typed settings extracted from the merged configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Default directory holding `types/` and `enums/` descriptor files.
pub const DEFAULT_CONTENT_TYPES_DIR: &str = "content-types";

/// Default display format for datetime fields without their own format.
pub const DEFAULT_DATETIME_FORMAT: &str = "YYYY-MM-DD HH:mm:ss";

/// Top-level ContentKit settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory the content type loader reads from
    pub content_types_dir: PathBuf,
    pub schema: SchemaSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            content_types_dir: PathBuf::from(DEFAULT_CONTENT_TYPES_DIR),
            schema: SchemaSettings::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.content_types_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "content_types_dir must not be empty".into(),
            });
        }
        self.schema.validate()
    }
}

/// Schema generation and caching settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaSettings {
    /// Idle time after which a cached schema is regenerated
    pub sliding_ttl_secs: u64,
    /// Maximum age of a cached schema regardless of use
    pub absolute_ttl_secs: u64,
    pub datetime_format: String,
}

impl Default for SchemaSettings {
    fn default() -> Self {
        Self {
            sliding_ttl_secs: 20 * 60,
            absolute_ttl_secs: 60 * 60,
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
        }
    }
}

impl SchemaSettings {
    pub fn sliding_ttl(&self) -> Duration {
        Duration::from_secs(self.sliding_ttl_secs)
    }

    pub fn absolute_ttl(&self) -> Duration {
        Duration::from_secs(self.absolute_ttl_secs)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.sliding_ttl_secs > self.absolute_ttl_secs {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "schema.sliding_ttl_secs ({}) exceeds schema.absolute_ttl_secs ({})",
                    self.sliding_ttl_secs, self.absolute_ttl_secs
                ),
            });
        }
        if self.datetime_format.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "schema.datetime_format must not be empty".into(),
            });
        }
        Ok(())
    }
}
