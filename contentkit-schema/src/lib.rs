//! Form schema generation for content types
//!
//! The [`SchemaGenerator`] walks a [`ContentTypeDef`](contentkit_content::ContentTypeDef)
//! and derives a [`ContentSchema`]: one [`SchemaNode`] per resolvable field with
//! its widget, constraints and default, plus the ordered list of required
//! fields. The result is what a generic form renderer consumes.
//!
//! # Usage
//!
//! ```rust,ignore
//! let generator = SchemaGenerator::with_memory_cache(registry, SchemaOptions::default());
//! let schema = generator.generate_schema(&content_type)?;
//! let json = generator.generate_schema_json(&content_type)?;
//! ```

pub mod cache;
pub mod defaults;
pub mod error;
pub mod generator;
pub mod node;
pub mod widget;

pub use cache::{CacheTtl, MemorySchemaCache, SchemaCache};
pub use defaults::convert_default;
pub use error::{Result, SchemaError};
pub use generator::{SchemaGenerator, SchemaOptions};
pub use node::{ContentSchema, OptionItem, SchemaNode, SchemaType, ValidatorKind, ValidatorRule};
pub use widget::Widget;
