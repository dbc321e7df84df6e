//! ContentKit configuration management using Figment
//!
//! Settings are merged from built-in defaults, an optional
//! `contentkit.{toml,yaml,yml,json}` file and `CONTENTKIT_` environment
//! variables, then extracted into the typed [`Settings`] struct.
//!
//! # Example TOML Configuration
//!
//! ```toml
//! content_types_dir = "content-types"
//!
//! [schema]
//! sliding_ttl_secs = 1200
//! absolute_ttl_secs = 3600
//! datetime_format = "YYYY-MM-DD HH:mm:ss"
//! ```

pub mod discovery;
pub mod error;
pub mod provider;
pub mod settings;

pub use discovery::{ConfigFile, ConfigFormat};
pub use error::{ConfigError, ConfigResult};
pub use provider::ConfigProvider;
pub use settings::{SchemaSettings, Settings, DEFAULT_CONTENT_TYPES_DIR, DEFAULT_DATETIME_FORMAT};

/// Load settings from the working directory and environment.
pub fn load_settings() -> ConfigResult<Settings> {
    ConfigProvider::new().load()
}
