//! FieldTypeRegistry — resolves system names and declared shapes to field types.
//!
//! Built-in variants are always present. Enumerations (the parameters of
//! `options<T>` and `options-multi<T>`) and custom codecs are registered
//! during startup through `&mut self`; afterwards the registry is shared
//! read-only, typically as `Arc<FieldTypeRegistry>`.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{FieldsError, Result};
use crate::field::Field;
use crate::field_type::{system_names, FieldCodec, FieldType};
use crate::types::{EnumDef, FieldShape, ItemType};

/// Catalog of field types.
#[derive(Debug, Clone, Default)]
pub struct FieldTypeRegistry {
    enums: IndexMap<String, Arc<EnumDef>>,
    custom: IndexMap<String, Arc<dyn FieldCodec>>,
}

impl FieldTypeRegistry {
    /// A registry holding only the built-in variants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an enumeration so `options<name>` and `options-multi<name>` resolve.
    pub fn register_enum(&mut self, def: EnumDef) -> Result<()> {
        def.validate()?;
        if self.enums.contains_key(&def.name) {
            return Err(FieldsError::DuplicateEnum { name: def.name });
        }
        debug!(name = %def.name, members = def.members.len(), "registered enumeration");
        self.enums.insert(def.name.clone(), Arc::new(def));
        Ok(())
    }

    /// Builder-style [`register_enum`](Self::register_enum).
    pub fn with_enum(mut self, def: EnumDef) -> Result<Self> {
        self.register_enum(def)?;
        Ok(self)
    }

    /// Register a custom field type under its system name.
    pub fn register(&mut self, codec: Arc<dyn FieldCodec>) -> Result<()> {
        let system_name = codec.system_name().to_string();
        match system_name.parse::<FieldShape>() {
            Ok(FieldShape::Plain(_)) => {}
            _ => return Err(FieldsError::InvalidShape { shape: system_name }),
        }
        if FieldType::builtin(&system_name).is_some() || self.custom.contains_key(&system_name) {
            return Err(FieldsError::DuplicateFieldType { system_name });
        }
        debug!(system_name = %system_name, "registered custom field type");
        self.custom.insert(system_name, codec);
        Ok(())
    }

    pub fn enum_def(&self, name: &str) -> Option<&Arc<EnumDef>> {
        self.enums.get(name)
    }

    /// Registered enumerations in registration order.
    pub fn enums(&self) -> impl Iterator<Item = &Arc<EnumDef>> {
        self.enums.values()
    }

    /// Field type for a system name, or `None` when it does not resolve.
    pub fn field_type(&self, system_name: &str) -> Option<FieldType> {
        let shape = system_name.parse::<FieldShape>().ok()?;
        self.field_type_for_shape(&shape)
    }

    pub fn field_type_for_shape(&self, shape: &FieldShape) -> Option<FieldType> {
        match shape {
            FieldShape::Plain(name) => FieldType::builtin(name)
                .or_else(|| self.custom.get(name).cloned().map(FieldType::Custom)),
            FieldShape::Array(item) => Some(FieldType::Array(*item)),
            FieldShape::Options(name) => self.enums.get(name).cloned().map(FieldType::Options),
            FieldShape::OptionsMulti(name) => {
                self.enums.get(name).cloned().map(FieldType::OptionsMulti)
            }
        }
    }

    /// A fresh field for a system name. Collections start with an empty value.
    pub fn resolve_by_name(&self, system_name: &str) -> Option<Field> {
        match self.field_type(system_name) {
            Some(field_type) => Some(Field::new(field_type)),
            None => {
                trace!(system_name, "field type did not resolve");
                None
            }
        }
    }

    /// System name for a declared shape, when that shape resolves.
    pub fn system_name_for(&self, shape: &FieldShape) -> Option<String> {
        self.field_type_for_shape(shape)
            .map(|ft| ft.system_name().into_owned())
    }

    /// Every resolvable system name: built-ins, `array<T>` for each item type,
    /// both option variants per enumeration, then custom types.
    pub fn system_names(&self) -> Vec<String> {
        let mut names: Vec<String> = system_names::ALL.iter().map(|s| s.to_string()).collect();
        names.extend(ItemType::ALL.iter().map(|item| FieldShape::Array(*item).to_string()));
        for name in self.enums.keys() {
            names.push(FieldShape::Options(name.clone()).to_string());
            names.push(FieldShape::OptionsMulti(name.clone()).to_string());
        }
        names.extend(self.custom.keys().cloned());
        names
    }
}
