//! # rxfilter Architecture
//!
//! rxfilter is a **UI-agnostic record filter and sort engine** for prescription
//! records. It is a library that happens to have a CLI client: the `rxfilter` binary
//! is one host among many (a web backend or a desktop view could drive the same core).
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Host (the rxfilter CLI, or any UI)                         │
//! │  - Loads records, edits criteria, renders and exports       │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Session (session.rs)                                       │
//! │  - Owns records, criteria and facet options                 │
//! │  - Notifies subscribers when criteria change                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Pipeline (facets.rs, filter.rs, sort.rs, pipeline.rs)      │
//! │  - Pure functions over (records, criteria)                  │
//! │  - No state, no I/O, safe to call from anywhere             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Pipeline
//!
//! 1. [`facets::extract_facets`] derives the option lists for every facet attribute
//!    from the **unfiltered** collection.
//! 2. [`filter::RecordFilter`] keeps a record when every active dimension passes.
//! 3. [`sort::compare`] orders survivors; the sort is stable.
//! 4. [`pipeline::apply_filters`] glues 2 and 3 and never touches its input.
//!
//! Attribute and flag registries live in [`attributes`], so adding a facet or a
//! tristate flag is a table entry, not a new code path.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! Apart from [`config`] (which reads TOML files) and [`export`] (which writes to a
//! caller-supplied `Write`), nothing here touches the filesystem, the terminal or the
//! process. Errors are returned as [`error::RxError`], never printed.
//!
//! ## Testing Strategy
//!
//! - Unit tests next to each module, built on the fixtures in `test_utils`.
//! - Property tests for the pipeline and the quicksort under `tests/`.
//! - The CLI crate has its own end-to-end tests.

pub mod attributes;
pub mod config;
pub mod criteria;
pub mod error;
pub mod export;
pub mod facets;
pub mod filter;
pub mod model;
pub mod pipeline;
pub mod quicksort;
pub mod session;
pub mod sort;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
