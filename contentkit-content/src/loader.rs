//! ContentTypeLoader — reads content type and enumeration descriptors from YAML.
//!
//! Expected layout:
//! ```text
//! content-types/
//!   types/    ← one .yaml per content type
//!   enums/    ← one .yaml per enumeration
//! ```
//! Either subdirectory may be absent. Files that fail to parse or validate are
//! skipped with a warning so one bad descriptor does not hide the rest.

use std::path::{Path, PathBuf};

use contentkit_fields::{EnumDef, FieldTypeRegistry};
use serde::de::DeserializeOwned;
use tokio::fs;
use tracing::{debug, warn};

use crate::catalog::ContentTypeProvider;
use crate::descriptor::ContentTypeDef;
use crate::error::{ContentError, Result};

/// Builder for [`LoadedContentTypes`]. Created by [`ContentTypeLoader::open`].
#[derive(Debug, Clone)]
pub struct ContentTypeLoader {
    root: PathBuf,
}

impl ContentTypeLoader {
    /// Point the loader at a descriptor directory.
    ///
    /// ```rust,ignore
    /// let loaded = ContentTypeLoader::open("content-types").load().await?;
    /// loaded.register_enums(&mut registry)?;
    /// let catalog = ContentTypeCatalog::new(Arc::new(loaded));
    /// ```
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Read every descriptor under the root.
    pub async fn load(self) -> Result<LoadedContentTypes> {
        if !fs::try_exists(&self.root).await.unwrap_or(false) {
            return Err(ContentError::NotInitialized { path: self.root });
        }

        let enums: Vec<EnumDef> = load_dir(&self.root.join("enums"), "enumeration", |def: &EnumDef| {
            def.validate().map_err(|e| e.to_string())
        })
        .await?;
        let types: Vec<ContentTypeDef> = load_dir(&self.root.join("types"), "content type", |def: &ContentTypeDef| {
            def.validate().map_err(|e| e.to_string())
        })
        .await?;

        debug!(
            root = %self.root.display(),
            types = types.len(),
            enums = enums.len(),
            "content type descriptors loaded"
        );

        Ok(LoadedContentTypes {
            root: self.root,
            types,
            enums,
        })
    }
}

/// Descriptors read from disk.
#[derive(Debug, Clone)]
pub struct LoadedContentTypes {
    root: PathBuf,
    types: Vec<ContentTypeDef>,
    enums: Vec<EnumDef>,
}

impl LoadedContentTypes {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn types(&self) -> &[ContentTypeDef] {
        &self.types
    }

    pub fn enums(&self) -> &[EnumDef] {
        &self.enums
    }

    /// Register every loaded enumeration so `options<..>` fields resolve.
    pub fn register_enums(&self, registry: &mut FieldTypeRegistry) -> Result<()> {
        for def in &self.enums {
            registry.register_enum(def.clone())?;
        }
        Ok(())
    }
}

impl ContentTypeProvider for LoadedContentTypes {
    fn content_types(&self) -> Vec<ContentTypeDef> {
        self.types.clone()
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Parse every YAML file in `dir`, in file name order.
async fn load_dir<T, F>(dir: &Path, kind: &str, check: F) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    F: Fn(&T) -> std::result::Result<(), String>,
{
    let mut loaded = Vec::new();
    if !fs::try_exists(dir).await.unwrap_or(false) {
        return Ok(loaded);
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if is_yaml(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    for path in paths {
        let content = fs::read_to_string(&path).await?;
        match serde_yaml::from_str::<T>(&content) {
            Ok(def) => match check(&def) {
                Ok(()) => loaded.push(def),
                Err(reason) => warn!(?path, %reason, "skipping invalid {kind}"),
            },
            Err(e) => {
                warn!(?path, %e, "skipping unparsable {kind}");
            }
        }
    }
    Ok(loaded)
}
