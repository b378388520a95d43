//! # Configuration
//!
//! rxfilter configuration is managed by [`confique`], which handles layered loading
//! from TOML files and environment variables.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `RXFILTER_DEFAULT_SORT`, `RXFILTER_DEFAULT_DIRECTION`,
//!    `RXFILTER_EXPORT_FORMAT`, `RXFILTER_LOG`.
//! 2. **Explicit file**: passed with `--config FILE`.
//! 3. **Project Config**: `.rxfilter/rxfilter.toml` in the working directory.
//! 4. **Global Config**: OS-appropriate config directory (via `directories` crate).
//! 5. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! Missing files are skipped.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `default_sort` | `date` | Sort key when none is given (`date`, `patient`, `doctor`, `status`, `priority`) |
//! | `default_direction` | `desc` | `asc` or `desc` |
//! | `export_format` | `json` | Export format when the output name does not decide it |
//! | `log_filter` | `warn` | `tracing` filter directive used when `RUST_LOG` is unset |

use std::path::{Path, PathBuf};

use confique::Config;
use directories::ProjectDirs;
use serde::Serialize;
use tracing::debug;

use crate::criteria::{FilterCriteria, SortDirection, SortKey};
use crate::error::{Result, RxError};
use crate::export::ExportFormat;

pub const CONFIG_FILENAME: &str = "rxfilter.toml";
pub const PROJECT_CONFIG_DIR: &str = ".rxfilter";

/// Configuration for rxfilter, stored in `rxfilter.toml`.
#[derive(Config, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RxFilterConfig {
    /// Sort key applied when criteria do not name one.
    #[config(default = "date", env = "RXFILTER_DEFAULT_SORT")]
    pub default_sort: String,

    /// Sort direction applied when criteria do not name one.
    #[config(default = "desc", env = "RXFILTER_DEFAULT_DIRECTION")]
    pub default_direction: String,

    /// Export format used when the output file extension is not `.csv`.
    #[config(default = "json", env = "RXFILTER_EXPORT_FORMAT")]
    pub export_format: String,

    /// Default log filter directive.
    #[config(default = "warn", env = "RXFILTER_LOG")]
    pub log_filter: String,
}

impl Default for RxFilterConfig {
    fn default() -> Self {
        Self {
            default_sort: "date".to_string(),
            default_direction: "desc".to_string(),
            export_format: "json".to_string(),
            log_filter: "warn".to_string(),
        }
    }
}

impl RxFilterConfig {
    /// Loads the full hierarchy: environment, `explicit`, the project file under
    /// `cwd`, then the global file.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        let mut files: Vec<PathBuf> = explicit.map(Path::to_path_buf).into_iter().collect();
        files.push(project_config_path(cwd));
        files.extend(global_config_path());
        Self::load_layered(&files, true)
    }

    /// Loads from `files` (highest priority first), optionally consulting the
    /// environment before any file.
    pub fn load_layered(files: &[PathBuf], use_env: bool) -> Result<Self> {
        let mut builder = Self::builder();
        if use_env {
            builder = builder.env();
        }
        for file in files {
            debug!(path = %file.display(), exists = file.exists(), "config source");
            builder = builder.file(file);
        }
        Ok(builder.load()?)
    }

    pub fn sort_key(&self) -> Result<SortKey> {
        match SortKey::from_label(&self.default_sort) {
            SortKey::Unspecified => Err(RxError::InvalidSetting {
                key: "default_sort",
                value: self.default_sort.clone(),
            }),
            key => Ok(key),
        }
    }

    pub fn sort_direction(&self) -> Result<SortDirection> {
        self.default_direction
            .parse()
            .map_err(|_| RxError::InvalidSetting {
                key: "default_direction",
                value: self.default_direction.clone(),
            })
    }

    pub fn export_format(&self) -> Result<ExportFormat> {
        self.export_format
            .parse()
            .map_err(|_| RxError::InvalidSetting {
                key: "export_format",
                value: self.export_format.clone(),
            })
    }

    /// The identity criteria with the configured default sort.
    pub fn default_criteria(&self) -> Result<FilterCriteria> {
        Ok(FilterCriteria::new().sorted_by(self.sort_key()?, self.sort_direction()?))
    }
}

pub fn project_config_path(cwd: &Path) -> PathBuf {
    cwd.join(PROJECT_CONFIG_DIR).join(CONFIG_FILENAME)
}

pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "rxfilter", "rxfilter").map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}
