//! Configuration file discovery.
//!
//! ContentKit looks for `contentkit.{toml,yaml,yml,json}` in one directory,
//! normally the working directory. Every file found is merged, in that order.

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::{ConfigError, ConfigResult};

/// Base name of configuration files.
pub const CONFIG_FILE_STEM: &str = "contentkit";

/// Configuration file format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    /// `.yaml` or `.yml`
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// A configuration file and its format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub format: ConfigFormat,
}

impl ConfigFile {
    /// An explicitly named file, which must exist and have a known extension.
    pub fn explicit(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(ConfigError::FileNotFound { path });
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_string();
        let format = ConfigFormat::from_extension(&ext)
            .ok_or(ConfigError::UnsupportedFormat { format: ext })?;
        Ok(Self { path, format })
    }
}

/// Configuration files present in `dir`, in merge order.
pub fn discover(dir: &Path) -> Vec<ConfigFile> {
    ["toml", "yaml", "yml", "json"]
        .into_iter()
        .filter_map(|ext| {
            let path = dir.join(format!("{CONFIG_FILE_STEM}.{ext}"));
            if !path.is_file() {
                return None;
            }
            trace!(path = %path.display(), "found config file");
            ConfigFormat::from_extension(ext).map(|format| ConfigFile { path, format })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn format_from_extension() {
        assert_eq!(ConfigFormat::from_extension("TOML"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("yml"), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_extension("json"), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_extension("ini"), None);
    }

    #[test]
    fn discover_lists_present_files_in_merge_order() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("contentkit.json"), "{}").unwrap();
        fs::write(temp.path().join("contentkit.toml"), "").unwrap();
        fs::write(temp.path().join("other.yaml"), "").unwrap();

        let found = discover(temp.path());
        let formats: Vec<_> = found.iter().map(|f| f.format).collect();
        assert_eq!(formats, vec![ConfigFormat::Toml, ConfigFormat::Json]);
    }

    #[test]
    fn explicit_file_must_exist_with_known_format() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            ConfigFile::explicit(temp.path().join("missing.toml")),
            Err(ConfigError::FileNotFound { .. })
        ));

        let ini = temp.path().join("settings.ini");
        fs::write(&ini, "").unwrap();
        assert!(matches!(
            ConfigFile::explicit(&ini),
            Err(ConfigError::UnsupportedFormat { .. })
        ));

        let yaml = temp.path().join("custom.yml");
        fs::write(&yaml, "").unwrap();
        assert_eq!(ConfigFile::explicit(&yaml).unwrap().format, ConfigFormat::Yaml);
    }
}
