//! # CLI Behavior
//!
//! This is **one possible host** for rxfilterapp, not the application itself.
//!
//! ## Commands
//!
//! - `rxfilter list --records FILE [filters]`: filtered, sorted table with the number
//!   of active filters in the footer.
//! - `rxfilter facets --records FILE`: option lists derived from the whole file.
//! - `rxfilter export --records FILE [filters]`: same selection and order as `list`,
//!   written as JSON or CSV.
//! - `rxfilter sort [FILE]`: sorts a JSON array of numbers or strings (stdin when no
//!   file is given).
//! - `rxfilter config`: effective configuration.
//!
//! ## Criteria Layering
//!
//! The starting criteria come from `--criteria FILE` when given, otherwise from the
//! configured default sort. Explicit filter flags are then applied on top: list flags
//! add to what the file selected, scalar flags replace it.

mod commands;
mod render;
mod setup;

pub use commands::run;
