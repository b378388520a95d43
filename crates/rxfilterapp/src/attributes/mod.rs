//! # Attribute System
//!
//! Filterable record data is exposed through two small registries instead of being
//! hard-coded into the filter and facet code:
//!
//! - **Attributes** ([`ATTRIBUTES`]): named categorical or list fields read via
//!   [`Prescription::get_attr`](crate::model::Prescription::get_attr). Facet
//!   extraction and the categorical predicates iterate this table.
//! - **Flags** ([`FLAGS`]): named derived booleans ("has medications", "has vision
//!   data") backing the tristate filter dimension. Each entry is a pure function of a
//!   record.
//!
//! ## Attribute Kinds
//!
//! | Kind | Examples | Description |
//! |------|----------|-------------|
//! | `Text` | `doctor`, `patient`, `diagnosis` | Single optional string |
//! | `List` | `tags` | Zero or more strings |
//!
//! ## Adding a Facet
//!
//! Add an entry to [`ATTRIBUTES`] and an arm to `Prescription::get_attr`. Criteria,
//! facets, and the CLI pick it up by name.

mod flags;
mod spec;
mod value;

pub use flags::{derive_flag, get_flag, FlagSpec, FLAGS};
pub use spec::{facet_attrs, get_spec, AttributeKind, AttributeSpec, ATTRIBUTES};
pub use value::AttrValue;
