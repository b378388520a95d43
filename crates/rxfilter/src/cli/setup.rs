use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rxfilterapp::criteria::{parse_day, SortKey};
use rxfilterapp::export::ExportFormat;
use rxfilterapp::model::{PrescriptionStatus, Priority};

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.0" for releases, "0.3.0@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "rxfilter", bin_name = "rxfilter", version = get_version())]
#[command(about = "Filter, sort and export prescription records", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file, layered above the project and global files
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List matching records
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Show the filter options available in a record file
    Facets {
        /// JSON file holding an array of records ("-" for stdin)
        #[arg(long, short = 'r', value_name = "FILE")]
        records: PathBuf,
    },

    /// Export matching records as JSON or CSV
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output format (defaults to the output extension, then to configuration)
        #[arg(long, value_parser = parse_format)]
        format: Option<ExportFormat>,

        /// Write to FILE instead of stdout
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Sort a JSON array of numbers or strings
    Sort {
        /// JSON file (reads stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config,
}

#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// JSON file holding an array of records ("-" for stdin)
    #[arg(long, short = 'r', value_name = "FILE")]
    pub records: PathBuf,

    /// Saved criteria (JSON); flags below are applied on top
    #[arg(long, value_name = "FILE")]
    pub criteria: Option<PathBuf>,

    /// Case-insensitive text search over names, diagnosis, notes and medications
    #[arg(long, short = 's', value_name = "TERM")]
    pub search: Option<String>,

    /// Keep records with this status (repeatable)
    #[arg(long)]
    pub status: Vec<PrescriptionStatus>,

    /// Earliest record day (YYYY-MM-DD, inclusive)
    #[arg(long, value_parser = parse_cli_day, value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Latest record day (YYYY-MM-DD, inclusive; defaults to today when --from is set)
    #[arg(long, value_parser = parse_cli_day, value_name = "DATE")]
    pub to: Option<NaiveDate>,

    /// Keep records from this doctor (repeatable)
    #[arg(long)]
    pub doctor: Vec<String>,

    /// Keep records for this patient (repeatable)
    #[arg(long)]
    pub patient: Vec<String>,

    /// Keep records with this diagnosis (repeatable)
    #[arg(long)]
    pub diagnosis: Vec<String>,

    /// Keep records with this priority (repeatable)
    #[arg(long)]
    pub priority: Vec<Priority>,

    /// Keep records carrying this tag (repeatable, any tag matches)
    #[arg(long, short = 't')]
    pub tag: Vec<String>,

    /// Require records with (true) or without (false) medications
    #[arg(long, value_name = "BOOL")]
    pub has_medications: Option<bool>,

    /// Require records with (true) or without (false) vision measurements
    #[arg(long, value_name = "BOOL")]
    pub has_vision: Option<bool>,

    /// Sort key: date, patient, doctor, status or priority
    #[arg(long, value_parser = parse_sort_key, value_name = "KEY")]
    pub sort: Option<SortKey>,

    /// Sort ascending
    #[arg(long, conflicts_with = "desc")]
    pub asc: bool,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,
}

fn parse_cli_day(raw: &str) -> Result<NaiveDate, String> {
    parse_day(raw).map_err(|e| e.to_string())
}

fn parse_sort_key(raw: &str) -> Result<SortKey, String> {
    match SortKey::from_label(raw) {
        SortKey::Unspecified => Err(format!(
            "unknown sort key '{}' (expected date, patient, doctor, status or priority)",
            raw
        )),
        key => Ok(key),
    }
}

fn parse_format(raw: &str) -> Result<ExportFormat, String> {
    raw.parse().map_err(|e: rxfilterapp::error::RxError| e.to_string())
}
