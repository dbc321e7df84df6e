//! Command implementations. Output goes to the given writer so the commands
//! can be exercised without a terminal.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use contentkit_config::Settings;
use contentkit_content::{
    validate_field_values, ContentFieldValue, ContentSerializer, ContentTypeCatalog,
    ContentTypeLoader,
};
use contentkit_fields::FieldTypeRegistry;
use contentkit_schema::{SchemaGenerator, SchemaOptions};
use tracing::{debug, warn};

use crate::exit_codes::{EXIT_SUCCESS, EXIT_WARNING};

/// Everything the commands share, built once from the settings.
#[derive(Debug)]
pub struct CommandContext {
    pub catalog: ContentTypeCatalog,
    pub serializer: ContentSerializer,
    pub generator: SchemaGenerator,
}

impl CommandContext {
    /// Load descriptors from `settings.content_types_dir` and wire up the
    /// catalog, serializer and schema generator.
    pub async fn load(settings: &Settings) -> Result<Self> {
        let loaded = ContentTypeLoader::open(&settings.content_types_dir)
            .load()
            .await
            .with_context(|| {
                format!(
                    "could not load content types from {}",
                    settings.content_types_dir.display()
                )
            })?;

        let mut registry = FieldTypeRegistry::new();
        loaded.register_enums(&mut registry)?;
        let registry = Arc::new(registry);
        debug!(field_types = ?registry.system_names(), "field types available");

        Ok(Self {
            catalog: ContentTypeCatalog::new(Arc::new(loaded)),
            serializer: ContentSerializer::new(registry.clone()),
            generator: SchemaGenerator::with_memory_cache(
                registry,
                SchemaOptions::from(&settings.schema),
            ),
        })
    }
}

pub fn list(ctx: &CommandContext, json: bool, out: &mut impl Write) -> Result<i32> {
    let summaries = ctx.catalog.list();
    if json {
        serde_json::to_writer_pretty(&mut *out, summaries.as_ref())?;
        writeln!(out)?;
        return Ok(EXIT_SUCCESS);
    }

    if summaries.is_empty() {
        writeln!(out, "No content types found")?;
        return Ok(EXIT_SUCCESS);
    }
    let width = summaries
        .iter()
        .map(|s| s.system_type_id.len())
        .max()
        .unwrap_or(0);
    for summary in summaries.iter() {
        write!(out, "{:<width$}  {}", summary.system_type_id, summary.display_name)?;
        if let Some(description) = &summary.description {
            write!(out, " - {description}")?;
        }
        writeln!(out)?;
    }
    Ok(EXIT_SUCCESS)
}

pub fn schema(ctx: &CommandContext, id: &str, compact: bool, out: &mut impl Write) -> Result<i32> {
    let schema = ctx.generator.generate_for(&ctx.catalog, id)?;
    if compact {
        serde_json::to_writer(&mut *out, schema.as_ref())?;
    } else {
        serde_json::to_writer_pretty(&mut *out, schema.as_ref())?;
    }
    writeln!(out)?;
    Ok(EXIT_SUCCESS)
}

/// Validate the stored content in `file` as written. Returns [`EXIT_WARNING`]
/// when any field value is malformed or fails its rules.
pub async fn check(ctx: &CommandContext, id: &str, file: &Path, out: &mut impl Write) -> Result<i32> {
    let Some(content_type) = ctx.catalog.get(id) else {
        bail!("unknown content type: {id}");
    };
    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("could not read {}", file.display()))?;

    // The serializer tolerates malformed text; report it here instead.
    let values: Vec<ContentFieldValue> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not stored content", file.display()))?;
    for value in &values {
        if content_type.field_decl(&value.field_name).is_none() {
            warn!(field = %value.field_name, "stored field is not declared by {id}");
        }
    }

    let issues = validate_field_values(content_type, &values, &ctx.serializer);
    if issues.is_empty() {
        writeln!(out, "ok")?;
        return Ok(EXIT_SUCCESS);
    }
    for issue in &issues {
        writeln!(out, "{issue}")?;
    }
    Ok(EXIT_WARNING)
}
