//! Content types, the content serializer and content type discovery
//!
//! A content type is described once by a [`ContentTypeDef`]: an ordered list of
//! named fields, each naming a field type by system name and carrying its
//! display and validation metadata. Instances expose their fields through
//! [`FieldAccess`]; the [`ContentSerializer`] turns an instance into the flat
//! `[{"fieldName": .., "value": ..}]` text stored on a [`ContentRow`] and back.
//!
//! # Usage
//!
//! ```rust,ignore
//! let registry = Arc::new(FieldTypeRegistry::new());
//! let serializer = ContentSerializer::new(registry.clone());
//!
//! let page = Arc::new(
//!     ContentTypeDef::new("site.page", "Page")
//!         .field(FieldDecl::new("Title", "text"))
//!         .field(FieldDecl::new("Tags", "array<string>")),
//! );
//! let mut content = DynamicContent::with_empty_fields(page.clone(), &registry);
//! content.set_value_string(&registry, "Title", "Hello");
//! let json = serializer.serialize(&content)?;
//! let back = serializer.deserialize_dynamic(page, &json);
//! ```

pub mod access;
pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod field_value;
pub mod loader;
pub mod repository;
pub mod row;
pub mod serializer;
pub mod store;
pub mod validate;

pub use access::{DynamicContent, FieldAccess};
pub use catalog::{ContentTypeCatalog, ContentTypeProvider, StaticContentTypes};
pub use descriptor::{Compare, CompareOp, ContentTypeDef, ContentTypeSummary, FieldDecl};
pub use error::{ContentError, FieldIssue, Result};
pub use field_value::ContentFieldValue;
pub use loader::{ContentTypeLoader, LoadedContentTypes};
pub use repository::ContentRepository;
pub use row::{slugify, ContentRow, ContentStatus};
pub use serializer::ContentSerializer;
pub use store::{ContentStore, MemoryContentStore, Page};
pub use validate::{validate_content, validate_field_values};
