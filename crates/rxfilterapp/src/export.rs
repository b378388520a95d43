//! Export of the visible record set.
//!
//! Export receives the pipeline output as-is: the same records, in the same order,
//! as the listing. Nothing here filters or reorders.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use tracing::debug;

use crate::error::{Result, RxError};
use crate::model::Prescription;

const CSV_HEADER: [&str; 9] = [
    "id",
    "patient",
    "doctor",
    "diagnosis",
    "status",
    "priority",
    "date",
    "tags",
    "medications",
];

/// Output format, usually determined by the target file's extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    /// Detect format from filename extension.
    pub fn from_filename(filename: &str) -> Self {
        if filename.to_lowercase().ends_with(".csv") {
            ExportFormat::Csv
        } else {
            ExportFormat::Json
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExportFormat {
    type Err = RxError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(RxError::Export(format!(
                "unknown export format '{}' (expected json or csv)",
                other
            ))),
        }
    }
}

/// Writes `records` to `out` in the given format.
pub fn write_records<W: Write>(out: &mut W, records: &[&Prescription], format: ExportFormat) -> Result<()> {
    debug!(records = records.len(), %format, "exporting");
    match format {
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, records)?;
            writeln!(out)?;
        }
        ExportFormat::Csv => write_csv(out, records)?,
    }
    Ok(())
}

/// Renders `records` into a string in the given format.
pub fn export_to_string(records: &[&Prescription], format: ExportFormat) -> Result<String> {
    let mut buf = Vec::new();
    write_records(&mut buf, records, format)?;
    String::from_utf8(buf).map_err(|e| RxError::Export(e.to_string()))
}

fn write_csv<W: Write>(out: &mut W, records: &[&Prescription]) -> Result<()> {
    writeln!(out, "{}", CSV_HEADER.join(","))?;
    for rx in records {
        let medications: Vec<&str> = rx.medications.iter().map(|m| m.name.as_str()).collect();
        let row = [
            rx.id.clone(),
            rx.patient_name.clone().unwrap_or_default(),
            rx.doctor_name.clone().unwrap_or_default(),
            rx.diagnosis.clone().unwrap_or_default(),
            rx.status.map(|s| s.label().to_string()).unwrap_or_default(),
            rx.priority.map(|p| p.label().to_string()).unwrap_or_default(),
            rx.date.clone().unwrap_or_default(),
            rx.tags.join(";"),
            medications.join(";"),
        ];
        let fields: Vec<String> = row.iter().map(|field| csv_field(field)).collect();
        writeln!(out, "{}", fields.join(","))?;
    }
    Ok(())
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
