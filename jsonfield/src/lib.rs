//! jsonfield core library.
//!
//! Presents one structured (JSON-cast) attribute of a host entity as a nested
//! group of form fields. Fields resolve their display values from the nested
//! map by `->` delimited paths and write submitted values back into it.
//!
//! ```
//! use jsonfield::{CastKind, LeafField, PathFieldGroup, Record, SubmittedForm};
//! use serde_json::json;
//!
//! let group = PathFieldGroup::new("Address").field(LeafField::new("Street")).bound();
//! let mut user = Record::new()
//!     .with_cast("address", CastKind::Array)
//!     .with_attribute("address", json!({"street": ""}));
//!
//! let form = SubmittedForm::new().with("address->street", "test street");
//! group.fill_all(&form, &mut user).unwrap();
//! assert_eq!(user.get("address"), Some(&json!({"street": "test street"})));
//! ```

extern crate self as jsonfield;

pub mod errors;
pub mod field;
pub mod host;
pub mod path;
pub mod rules;
pub mod schema;
pub mod slug;
pub mod tree;
pub mod validators;

pub use errors::*;
pub use field::{Field, LeafField, PathFieldGroup};
pub use host::{CastKind, FormRequest, HostEntity, Record, SubmittedForm};
pub use jsonfield_macros::HostEntity;
pub use path::{AttributePath, DELIMITER};
pub use rules::ValidationRule;
pub use schema::FormSchema;
pub use slug::attribute_slug;

// Re-exported for code generated by `#[derive(HostEntity)]`.
#[doc(hidden)]
pub use serde_json as __serde_json;
