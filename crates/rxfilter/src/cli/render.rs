use std::path::Path;

use chrono::{Local, NaiveDateTime};
use colored::{ColoredString, Colorize};
use rxfilterapp::attributes::{facet_attrs, FLAGS};
use rxfilterapp::config::RxFilterConfig;
use rxfilterapp::export::ExportFormat;
use rxfilterapp::facets::FacetOptions;
use rxfilterapp::model::{Prescription, PrescriptionStatus, Priority};
use rxfilterapp::pipeline::FilterOutcome;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const ID_WIDTH: usize = 8;
const DATE_WIDTH: usize = 10;
const STATUS_WIDTH: usize = 9;
const PRIORITY_WIDTH: usize = 6;
const NAME_WIDTH: usize = 18;
const TIME_WIDTH: usize = 14;

pub(super) fn print_records(outcome: &FilterOutcome<'_>) {
    if outcome.is_empty() {
        println!("{}", "No records found.".dimmed());
    } else {
        for rx in &outcome.records {
            println!("{}", format_row(rx));
        }
    }
    println!();
    println!("{}", format_summary(outcome).dimmed());
}

pub(super) fn print_facets(facets: &FacetOptions, records: &[Prescription]) {
    println!("{}", format!("{} {}", records.len(), plural(records.len(), "record")).dimmed());
    for spec in facet_attrs() {
        let values = facets.get(spec.name);
        println!();
        println!("{} {}", spec.label.bold(), format!("({})", values.len()).dimmed());
        if values.is_empty() {
            println!("  {}", "none".dimmed());
        }
        for value in values {
            println!("  {}", value);
        }
    }

    println!();
    println!("{}", "Flags".bold());
    for flag in FLAGS {
        let count = records.iter().filter(|rx| (flag.derive)(rx)).count();
        println!("  {} {}", flag.label, format!("({})", count).dimmed());
    }
}

pub(super) fn print_export_done(count: usize, format: ExportFormat, path: &Path) {
    println!(
        "{}",
        format!(
            "Exported {} {} as {} to {}",
            count,
            plural(count, "record"),
            format,
            path.display()
        )
        .green()
    );
}

pub(super) fn print_config(config: &RxFilterConfig) {
    for (key, value) in [
        ("default_sort", &config.default_sort),
        ("default_direction", &config.default_direction),
        ("export_format", &config.export_format),
        ("log_filter", &config.log_filter),
    ] {
        println!("{} = {}", key.bold(), value);
    }
}

fn format_row(rx: &Prescription) -> String {
    let id = pad_to_width(&truncate_to_width(&rx.id, ID_WIDTH), ID_WIDTH);
    let date = pad_to_width(
        &rx.parsed_date()
            .map(|ts| ts.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string()),
        DATE_WIDTH,
    );
    let status_label = rx.status.map(|s| s.label()).unwrap_or("-");
    let status = status_colored(rx.status, &pad_to_width(status_label, STATUS_WIDTH));
    let priority_label = rx.priority.map(|p| p.label()).unwrap_or("-");
    let priority = priority_colored(rx.priority, &pad_to_width(priority_label, PRIORITY_WIDTH));
    let patient = pad_to_width(
        &truncate_to_width(rx.patient_name.as_deref().unwrap_or("-"), NAME_WIDTH),
        NAME_WIDTH,
    );

    let fixed = ID_WIDTH + DATE_WIDTH + STATUS_WIDTH + PRIORITY_WIDTH + NAME_WIDTH + TIME_WIDTH + 6;
    let available = LINE_WIDTH.saturating_sub(fixed);
    let detail = [rx.doctor_name.as_deref(), rx.diagnosis.as_deref()]
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" · ");
    let detail = pad_to_width(&truncate_to_width(&detail, available), available);

    let time_ago = rx
        .parsed_date()
        .map(format_time_ago)
        .unwrap_or_else(|| format!("{:>width$}", "", width = TIME_WIDTH));

    format!(
        "{} {} {} {} {} {} {}",
        id.yellow(),
        date,
        status,
        priority,
        patient,
        detail,
        time_ago.dimmed()
    )
}

fn format_summary(outcome: &FilterOutcome<'_>) -> String {
    let shown = format!(
        "{} of {} {}",
        outcome.len(),
        outcome.total,
        plural(outcome.total, "record")
    );
    match outcome.active_filters {
        0 => shown,
        n => format!("{} · {} active {}", shown, n, plural(n, "filter")),
    }
}

fn status_colored(status: Option<PrescriptionStatus>, text: &str) -> ColoredString {
    match status {
        Some(PrescriptionStatus::Active) => text.green(),
        Some(PrescriptionStatus::Completed) => text.blue(),
        Some(PrescriptionStatus::Expired) => text.yellow(),
        Some(PrescriptionStatus::Cancelled) => text.red(),
        None => text.dimmed(),
    }
}

fn priority_colored(priority: Option<Priority>, text: &str) -> ColoredString {
    match priority {
        Some(Priority::Urgent) => text.red().bold(),
        Some(Priority::High) => text.red(),
        Some(Priority::Medium) => text.yellow(),
        Some(Priority::Low) => text.normal(),
        None => text.dimmed(),
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: NaiveDateTime) -> String {
    let now = Local::now().naive_local();
    let time_str = match now.signed_duration_since(timestamp).to_std() {
        Ok(elapsed) => Formatter::new().convert(elapsed),
        Err(_) => "upcoming".to_string(),
    };
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
