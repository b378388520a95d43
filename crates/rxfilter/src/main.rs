//! # rxfilter CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this file only
//! invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/rxfilterapp/`: UI-agnostic library: model, facets, filtering, sorting,
//!   session state, export, configuration.
//! - `crates/rxfilter/`: this CLI, a host that loads records from JSON, builds
//!   criteria from flags and renders or exports the result.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/rxfilter/src/cli/)                       │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - context wiring + dispatch (commands.rs)                  │
//! │  - terminal rendering (render.rs)                           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  rxfilterapp                                                │
//! │  - pure pipeline over (records, criteria)                   │
//! │  - no knowledge of stdout/stderr or process exits           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stdout carries only command output (tables, exports, sorted JSON). Logs and errors
//! go to stderr.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
