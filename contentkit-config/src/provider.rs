//! Configuration provider using Figment for ContentKit

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use tracing::{debug, trace};

use crate::discovery::{discover, ConfigFile, ConfigFormat};
use crate::error::ConfigResult;
use crate::settings::Settings;

/// Prefix of environment variables read into the configuration.
pub const ENV_PREFIX: &str = "CONTENTKIT_";

/// Configuration provider using figment
///
/// Sources are merged in precedence order (later sources override earlier ones):
/// 1. Default values
/// 2. `contentkit.{toml,yaml,yml,json}` in the search directory, or one explicit file
/// 3. `CONTENTKIT_` environment variables, with `__` separating nested keys
///    (`CONTENTKIT_SCHEMA__SLIDING_TTL_SECS=60`)
#[derive(Debug, Clone, Default)]
pub struct ConfigProvider {
    dir: Option<PathBuf>,
    file: Option<PathBuf>,
}

impl ConfigProvider {
    /// A provider searching the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Search `dir` instead of the working directory.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Read exactly this file instead of searching.
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Load and validate settings from all sources.
    pub fn load(&self) -> ConfigResult<Settings> {
        let settings: Settings = self.figment()?.extract()?;
        settings.validate()?;
        debug!(
            content_types_dir = %settings.content_types_dir.display(),
            sliding_ttl_secs = settings.schema.sliding_ttl_secs,
            absolute_ttl_secs = settings.schema.absolute_ttl_secs,
            "configuration loaded"
        );
        Ok(settings)
    }

    /// Build the figment with all sources in precedence order.
    pub fn figment(&self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        for file in self.config_files()? {
            trace!(path = %file.path.display(), format = ?file.format, "merging config file");
            figment = match file.format {
                ConfigFormat::Toml => figment.merge(Toml::file(&file.path)),
                ConfigFormat::Yaml => figment.merge(Yaml::file(&file.path)),
                ConfigFormat::Json => figment.merge(Json::file(&file.path)),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    fn config_files(&self) -> ConfigResult<Vec<ConfigFile>> {
        if let Some(file) = &self.file {
            return Ok(vec![ConfigFile::explicit(file)?]);
        }
        let dir = match &self.dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };
        Ok(discover(&dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn defaults_without_files() {
        let temp = TempDir::new().unwrap();
        let settings = ConfigProvider::new().with_dir(temp.path()).load().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    #[serial]
    fn toml_file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("contentkit.toml"),
            r#"
content_types_dir = "site/types"

[schema]
sliding_ttl_secs = 60
"#,
        )
        .unwrap();

        let settings = ConfigProvider::new().with_dir(temp.path()).load().unwrap();
        assert_eq!(settings.content_types_dir, PathBuf::from("site/types"));
        assert_eq!(settings.schema.sliding_ttl_secs, 60);
        assert_eq!(settings.schema.absolute_ttl_secs, 3600);
    }

    #[test]
    #[serial]
    fn later_files_override_earlier_ones() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("contentkit.toml"),
            "[schema]\ndatetime_format = \"YYYY-MM-DD\"\n",
        )
        .unwrap();
        fs::write(
            temp.path().join("contentkit.json"),
            r#"{"schema": {"datetime_format": "DD/MM/YYYY HH:mm"}}"#,
        )
        .unwrap();

        let settings = ConfigProvider::new().with_dir(temp.path()).load().unwrap();
        assert_eq!(settings.schema.datetime_format, "DD/MM/YYYY HH:mm");
    }

    #[test]
    #[serial]
    fn environment_overrides_files() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("contentkit.yaml"),
            "schema:\n  sliding_ttl_secs: 60\n",
        )
        .unwrap();

        std::env::set_var("CONTENTKIT_SCHEMA__SLIDING_TTL_SECS", "5");
        std::env::set_var("CONTENTKIT_CONTENT_TYPES_DIR", "/srv/types");
        let result = ConfigProvider::new().with_dir(temp.path()).load();
        std::env::remove_var("CONTENTKIT_SCHEMA__SLIDING_TTL_SECS");
        std::env::remove_var("CONTENTKIT_CONTENT_TYPES_DIR");

        let settings = result.unwrap();
        assert_eq!(settings.schema.sliding_ttl_secs, 5);
        assert_eq!(settings.content_types_dir, PathBuf::from("/srv/types"));
    }

    #[test]
    #[serial]
    fn explicit_file_skips_discovery() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("contentkit.toml"), "content_types_dir = \"found\"\n").unwrap();
        let explicit = temp.path().join("custom.json");
        fs::write(&explicit, r#"{"content_types_dir": "explicit"}"#).unwrap();

        let settings = ConfigProvider::new()
            .with_dir(temp.path())
            .with_file(&explicit)
            .load()
            .unwrap();
        assert_eq!(settings.content_types_dir, PathBuf::from("explicit"));
    }

    #[test]
    #[serial]
    fn invalid_values_are_reported() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("contentkit.toml"),
            "[schema]\nsliding_ttl_secs = \"soon\"\n",
        )
        .unwrap();
        let err = ConfigProvider::new().with_dir(temp.path()).load().unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));

        fs::write(
            temp.path().join("contentkit.toml"),
            "[schema]\nsliding_ttl_secs = 7200\n",
        )
        .unwrap();
        let err = ConfigProvider::new().with_dir(temp.path()).load().unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }
}
