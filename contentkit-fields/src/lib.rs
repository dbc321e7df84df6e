//! Field type registry and value codecs
//!
//! `contentkit-fields` is the leaf crate of ContentKit. It knows how a single
//! field value is represented as a string, how that string is decoded back into
//! a typed [`FieldValue`], and how a raw string is validated. It knows nothing
//! about content types, storage or forms.
//!
//! # Architecture
//!
//! - **Closed set of built-ins**: [`FieldType`] is a tagged union of the built-in
//!   variants, dispatched by system name rather than runtime type checks
//! - **Parameterized variants**: `array<T>`, `options<T>` and `options-multi<T>`
//!   carry their parameter in the variant and in the system name
//! - **Open for extension**: custom variants implement [`FieldCodec`] and are
//!   registered on the [`FieldTypeRegistry`]
//! - **No panics on bad input**: malformed strings decode to `None`; the reason is
//!   available separately through [`FieldType::check`]

pub mod error;
pub mod field;
pub mod field_type;
pub mod registry;
pub mod types;
pub mod validation;

pub use error::{FieldsError, Result};
pub use field::Field;
pub use field_type::{system_names, FieldCodec, FieldType};
pub use registry::FieldTypeRegistry;
pub use types::{EnumDef, EnumMember, FieldShape, FieldValue, ItemType, ValueType};
pub use validation::{ValidationIssue, ValidationRules};
