//! ContentSerializer — converts content instances to and from their flat
//! `[{fieldName, value}]` storage form.
//!
//! Fields are enumerated from the content type descriptor, so no reflection
//! happens per call. Field types are resolved through the shared
//! [`FieldTypeRegistry`] and memoized per system name.

use std::sync::Arc;

use contentkit_fields::{Field, FieldType, FieldTypeRegistry};
use dashmap::DashMap;
use tracing::{debug, trace, warn};

use crate::access::{DynamicContent, FieldAccess};
use crate::descriptor::ContentTypeDef;
use crate::error::Result;
use crate::field_value::ContentFieldValue;

/// Serializer shared by every request that reads or writes content.
#[derive(Debug)]
pub struct ContentSerializer {
    registry: Arc<FieldTypeRegistry>,
    resolved: DashMap<String, Option<FieldType>>,
}

impl ContentSerializer {
    pub fn new(registry: Arc<FieldTypeRegistry>) -> Self {
        Self {
            registry,
            resolved: DashMap::new(),
        }
    }

    pub fn registry(&self) -> &Arc<FieldTypeRegistry> {
        &self.registry
    }

    /// Field type for a system name, memoized.
    ///
    /// Concurrent first lookups may both resolve and insert; the entries are
    /// identical so the last write wins.
    pub fn resolve(&self, system_name: &str) -> Option<FieldType> {
        if let Some(entry) = self.resolved.get(system_name) {
            return entry.value().clone();
        }
        let field_type = self.registry.field_type(system_name);
        self.resolved
            .insert(system_name.to_string(), field_type.clone());
        field_type
    }

    /// Flat field values in declaration order.
    ///
    /// Members whose field type does not resolve are left out. A member with
    /// no field set encodes as the empty string.
    pub fn to_field_values<T: FieldAccess + ?Sized>(&self, instance: &T) -> Vec<ContentFieldValue> {
        let content_type = instance.content_type();
        let mut values = Vec::with_capacity(content_type.fields.len());
        for decl in &content_type.fields {
            let Some(field_type) = self.resolve(&decl.field_type) else {
                trace!(field = %decl.name, field_type = %decl.field_type, "skipping non-field member");
                continue;
            };
            let value = instance
                .field(&decl.name)
                .map(|field| field_type.convert_to_string(field.value()))
                .unwrap_or_default();
            values.push(ContentFieldValue::new(decl.name.clone(), value));
        }
        values
    }

    /// Serialize an instance to compact JSON text.
    pub fn serialize<T: FieldAccess + ?Sized>(&self, instance: &T) -> Result<String> {
        Ok(serde_json::to_string(&self.to_field_values(instance))?)
    }

    /// Serialize an instance to indented JSON text. The layout is cosmetic.
    pub fn serialize_pretty<T: FieldAccess + ?Sized>(&self, instance: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_field_values(instance))?)
    }

    /// Reconstruct an instance of `T` from stored text.
    ///
    /// Never fails: unparsable text yields `T::default()`.
    pub fn deserialize<T: FieldAccess + Default>(&self, text: &str) -> T {
        let mut instance = T::default();
        self.deserialize_into(&mut instance, text);
        instance
    }

    /// Reconstruct a runtime-described instance from stored text.
    pub fn deserialize_dynamic(&self, content_type: Arc<ContentTypeDef>, text: &str) -> DynamicContent {
        let mut instance = DynamicContent::with_empty_fields(content_type, &self.registry);
        self.deserialize_into(&mut instance, text);
        instance
    }

    /// Populate `instance` from stored text, leaving members without an entry untouched.
    pub fn deserialize_into<T: FieldAccess + ?Sized>(&self, instance: &mut T, text: &str) {
        if text.trim().is_empty() {
            debug!(content_type = %instance.content_type().id, "empty stored content");
            return;
        }
        match serde_json::from_str::<Vec<ContentFieldValue>>(text) {
            Ok(values) => self.from_field_values(instance, &values),
            Err(e) => {
                warn!(
                    content_type = %instance.content_type().id,
                    %e,
                    "unparsable stored content, returning empty instance"
                );
            }
        }
    }

    /// Assign decoded fields onto `instance` from a field value list.
    ///
    /// The first entry for a field name wins. Entries naming no declared
    /// member are ignored.
    pub fn from_field_values<T: FieldAccess + ?Sized>(&self, instance: &mut T, values: &[ContentFieldValue]) {
        let content_type = instance.content_type();
        let decls: Vec<(String, String)> = content_type
            .fields
            .iter()
            .map(|decl| (decl.name.clone(), decl.field_type.clone()))
            .collect();
        let type_id = content_type.id.clone();

        for (name, system_name) in decls {
            let Some(entry) = values.iter().find(|v| v.field_name == name) else {
                continue;
            };
            let Some(field_type) = self.resolve(&system_name) else {
                debug!(
                    content_type = %type_id,
                    field = %name,
                    field_type = %system_name,
                    "unknown field type in stored content, skipping"
                );
                continue;
            };
            let mut field = Field::new(field_type);
            if !field.set_value_string(&entry.value) {
                debug!(content_type = %type_id, field = %name, "stored value did not decode");
            }
            instance.set_field(&name, field);
        }
    }
}
