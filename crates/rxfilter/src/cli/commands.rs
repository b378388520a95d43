//! Context wiring and dispatch.
//!
//! `run()` parses arguments, loads configuration, installs the log subscriber and then
//! hands off to one `handle_*` function per command. Handlers load their input, call
//! into rxfilterapp and pass the result to `render`.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use rxfilterapp::config::RxFilterConfig;
use rxfilterapp::criteria::{FilterCriteria, SortDirection};
use rxfilterapp::error::Result;
use rxfilterapp::export::{write_records, ExportFormat};
use rxfilterapp::facets::extract_facets;
use rxfilterapp::model::Prescription;
use rxfilterapp::pipeline;
use rxfilterapp::quicksort::sort_json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use super::render::{print_config, print_export_done, print_facets, print_records};
use super::setup::{Cli, Commands, FilterArgs};

struct AppContext {
    config: RxFilterConfig,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let ctx = init_context(&cli)?;

    match cli.command {
        Commands::List { filters } => handle_list(&ctx, &filters),
        Commands::Facets { records } => handle_facets(&records),
        Commands::Export {
            filters,
            format,
            output,
        } => handle_export(&ctx, &filters, format, output),
        Commands::Sort { file } => handle_sort(file),
        Commands::Config => {
            print_config(&ctx.config);
            Ok(())
        }
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = RxFilterConfig::load(cli.config.as_deref(), &cwd)?;
    init_logging(&config, cli.verbose);
    debug!(?config, "configuration loaded");
    Ok(AppContext { config })
}

/// `RUST_LOG` wins; otherwise the configured filter, or `debug` with `-v`.
fn init_logging(config: &RxFilterConfig, verbose: bool) {
    let fallback = if verbose { "debug" } else { config.log_filter.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_list(ctx: &AppContext, filters: &FilterArgs) -> Result<()> {
    let records = load_records(&filters.records)?;
    let criteria = build_criteria(ctx, filters)?;
    let outcome = pipeline::run(&records, &criteria);
    print_records(&outcome);
    Ok(())
}

fn handle_facets(path: &Path) -> Result<()> {
    let records = load_records(path)?;
    print_facets(&extract_facets(&records), &records);
    Ok(())
}

fn handle_export(
    ctx: &AppContext,
    filters: &FilterArgs,
    format: Option<ExportFormat>,
    output: Option<PathBuf>,
) -> Result<()> {
    let records = load_records(&filters.records)?;
    let criteria = build_criteria(ctx, filters)?;
    let outcome = pipeline::run(&records, &criteria);
    let format = resolve_format(ctx, format, output.as_deref())?;

    match output {
        Some(path) => {
            let mut file = io::BufWriter::new(fs::File::create(&path)?);
            write_records(&mut file, &outcome.records, format)?;
            file.flush()?;
            print_export_done(outcome.len(), format, &path);
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write_records(&mut lock, &outcome.records, format)?;
        }
    }
    Ok(())
}

fn handle_sort(file: Option<PathBuf>) -> Result<()> {
    let raw = read_input(file.as_deref())?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    let sorted = sort_json(&value)?;
    println!("{}", serde_json::to_string(&sorted)?);
    Ok(())
}

/// Explicit `--format`, then a `.csv` output name, then configuration.
fn resolve_format(
    ctx: &AppContext,
    explicit: Option<ExportFormat>,
    output: Option<&Path>,
) -> Result<ExportFormat> {
    if let Some(format) = explicit {
        return Ok(format);
    }
    let by_name = output
        .and_then(|p| p.file_name())
        .map(|name| ExportFormat::from_filename(&name.to_string_lossy()));
    match by_name {
        Some(ExportFormat::Csv) => Ok(ExportFormat::Csv),
        _ => ctx.config.export_format(),
    }
}

fn build_criteria(ctx: &AppContext, args: &FilterArgs) -> Result<FilterCriteria> {
    let mut criteria = match &args.criteria {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => ctx.config.default_criteria()?,
    };
    apply_flags(&mut criteria, args);
    debug!(active = criteria.active_filter_count(), "criteria built");
    Ok(criteria)
}

fn apply_flags(criteria: &mut FilterCriteria, args: &FilterArgs) {
    if let Some(term) = &args.search {
        criteria.search_term = term.clone();
    }
    criteria.statuses.extend(args.status.iter().copied());
    criteria.priorities.extend(args.priority.iter().copied());
    criteria.tags.extend(args.tag.iter().cloned());

    if args.from.is_some() || args.to.is_some() {
        let range = criteria.date_range.get_or_insert_with(Default::default);
        if args.from.is_some() {
            range.from = args.from;
        }
        if args.to.is_some() {
            range.to = args.to;
        }
    }

    for (attr, values) in [
        ("doctor", &args.doctor),
        ("patient", &args.patient),
        ("diagnosis", &args.diagnosis),
    ] {
        if !values.is_empty() {
            criteria
                .categories
                .entry(attr.to_string())
                .or_default()
                .extend(values.iter().cloned());
        }
    }

    for (flag, setting) in [
        ("has_medications", args.has_medications),
        ("has_vision", args.has_vision),
    ] {
        if setting.is_some() {
            criteria.flags.insert(flag.to_string(), setting);
        }
    }

    if let Some(key) = args.sort {
        criteria.sort_key = key;
    }
    if args.asc {
        criteria.sort_direction = SortDirection::Ascending;
    } else if args.desc {
        criteria.sort_direction = SortDirection::Descending;
    }
}

fn load_records(path: &Path) -> Result<Vec<Prescription>> {
    let raw = read_input(Some(path))?;
    let records: Vec<Prescription> = serde_json::from_str(&raw)?;
    debug!(path = %path.display(), records = records.len(), "records loaded");
    Ok(records)
}

/// Reads a file, or stdin for `None` and `-`.
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => Ok(fs::read_to_string(p)?),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rxfilterapp::criteria::SortKey;
    use rxfilterapp::model::{PrescriptionStatus, Priority};

    fn args() -> FilterArgs {
        FilterArgs {
            records: PathBuf::from("rx.json"),
            ..Default::default()
        }
    }

    fn ctx() -> AppContext {
        AppContext {
            config: RxFilterConfig::default(),
        }
    }

    #[test]
    fn test_no_flags_keep_default_criteria() {
        let criteria = build_criteria(&ctx(), &args()).unwrap();
        assert_eq!(criteria, FilterCriteria::default());
    }

    #[test]
    fn test_flags_map_to_dimensions() {
        let mut a = args();
        a.search = Some("ana".into());
        a.status = vec![PrescriptionStatus::Active];
        a.priority = vec![Priority::High, Priority::Urgent];
        a.doctor = vec!["Dr. Reis".into()];
        a.tag = vec!["kids".into()];
        a.from = NaiveDate::from_ymd_opt(2024, 1, 1);
        a.has_vision = Some(true);
        a.sort = Some(SortKey::Patient);
        a.asc = true;

        let criteria = build_criteria(&ctx(), &a).unwrap();

        assert_eq!(criteria.active_filter_count(), 7);
        assert_eq!(criteria.categories["doctor"].len(), 1);
        assert_eq!(criteria.date_range.unwrap().to, None);
        assert_eq!(criteria.flags.get("has_vision"), Some(&Some(true)));
        assert_eq!(criteria.sort_key, SortKey::Patient);
        assert_eq!(criteria.sort_direction, SortDirection::Ascending);
    }

    #[test]
    fn test_flags_layer_over_saved_criteria() {
        let mut criteria = FilterCriteria::new()
            .with_tag("myopia")
            .with_date_range(NaiveDate::from_ymd_opt(2023, 1, 1), NaiveDate::from_ymd_opt(2023, 12, 31));
        let mut a = args();
        a.tag = vec!["kids".into()];
        a.to = NaiveDate::from_ymd_opt(2024, 6, 30);

        apply_flags(&mut criteria, &a);

        assert_eq!(criteria.tags.len(), 2);
        let range = criteria.date_range.unwrap();
        assert_eq!(range.from, NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(range.to, NaiveDate::from_ymd_opt(2024, 6, 30));
    }

    #[test]
    fn test_format_resolution_order() {
        let ctx = ctx();
        let csv = Path::new("out.csv");
        let json = Path::new("out.json");

        assert_eq!(
            resolve_format(&ctx, Some(ExportFormat::Json), Some(csv)).unwrap(),
            ExportFormat::Json
        );
        assert_eq!(resolve_format(&ctx, None, Some(csv)).unwrap(), ExportFormat::Csv);
        assert_eq!(resolve_format(&ctx, None, Some(json)).unwrap(), ExportFormat::Json);

        let csv_default = AppContext {
            config: RxFilterConfig {
                export_format: "csv".into(),
                ..Default::default()
            },
        };
        assert_eq!(resolve_format(&csv_default, None, None).unwrap(), ExportFormat::Csv);
    }
}
