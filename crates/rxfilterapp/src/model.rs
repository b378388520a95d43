//! # Domain Model: Prescription Records
//!
//! This module defines the record type the engine filters and sorts: [`Prescription`],
//! together with its enumerations ([`PrescriptionStatus`], [`Priority`]) and nested
//! sub-structures ([`Medication`], [`VisionPrescription`]).
//!
//! ## Immutability
//!
//! From the engine's point of view a record is read-only. Facet extraction, predicate
//! evaluation and sorting all take `&Prescription` and never write back. Records come
//! from an outside collaborator (a network query, a JSON file) and are handed in as a
//! slice.
//!
//! ## Stored Dates
//!
//! `date` keeps the stored representation as-is (a string). It is parsed lazily by
//! [`parse_record_date`] whenever a predicate or the comparator needs it, so a single
//! malformed value only affects the record that carries it:
//!
//! | Stored form | Example | Interpretation |
//! |-------------|---------|----------------|
//! | Calendar date | `2024-03-01` | midnight of that day |
//! | Local timestamp | `2024-03-01T14:30:00` | as written |
//! | RFC 3339 | `2024-03-01T14:30:00+02:00` | wall-clock time in its own offset |
//!
//! Anything else yields `None`.
//!
//! ## Input Compatibility
//!
//! Records are usually produced by a web frontend, so deserialization accepts the
//! camelCase spellings (`patientName`, `doctorName`) and numeric ids (`"id": 1`).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::attributes::AttrValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrescriptionStatus {
    Active,
    Completed,
    Expired,
    Cancelled,
}

impl PrescriptionStatus {
    pub const ALL: [PrescriptionStatus; 4] = [
        PrescriptionStatus::Active,
        PrescriptionStatus::Completed,
        PrescriptionStatus::Expired,
        PrescriptionStatus::Cancelled,
    ];

    /// The label used for display and for status ordering.
    pub fn label(&self) -> &'static str {
        match self {
            PrescriptionStatus::Active => "active",
            PrescriptionStatus::Completed => "completed",
            PrescriptionStatus::Expired => "expired",
            PrescriptionStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for PrescriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PrescriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.label() == lower)
            .ok_or_else(|| format!("unknown status '{}'", s))
    }
}

/// Urgency of a prescription.
///
/// Ordering is by clinical rank, never alphabetical: see [`Priority::rank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    /// Fixed rank table used by the priority sort.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
            Priority::Urgent => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|priority| priority.label() == lower)
            .ok_or_else(|| format!("unknown priority '{}'", s))
    }
}

/// One line entry of a prescription.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl Medication {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_dosage(mut self, dosage: impl Into<String>) -> Self {
        self.dosage = Some(dosage.into());
        self
    }
}

/// Refraction values for a single eye.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EyeMeasurement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sphere: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cylinder: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add: Option<f32>,
}

impl EyeMeasurement {
    pub fn is_populated(&self) -> bool {
        self.sphere.is_some() || self.cylinder.is_some() || self.axis.is_some() || self.add.is_some()
    }
}

/// Optical data attached to a prescription.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisionPrescription {
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "rightEye")]
    pub right_eye: Option<EyeMeasurement>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "leftEye")]
    pub left_eye: Option<EyeMeasurement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl VisionPrescription {
    pub fn is_populated(&self) -> bool {
        [&self.right_eye, &self.left_eye]
            .into_iter()
            .flatten()
            .any(EyeMeasurement::is_populated)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "patientName")]
    pub patient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "doctorName")]
    pub doctor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Absent when the source record carries no status; such records never
    /// pass a status filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PrescriptionStatus>,
    /// Stored representation; see [`parse_record_date`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub medications: Vec<Medication>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision: Option<VisionPrescription>,
}

impl Prescription {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Get a categorical or list attribute by its registry name.
    ///
    /// Returns `None` for unknown names and for absent or blank values, so an
    /// absent field can never accidentally equal a selected filter value.
    ///
    /// | Name | Kind | Field |
    /// |------|------|-------|
    /// | `"patient"` | `Text` | `patient_name` |
    /// | `"doctor"` | `Text` | `doctor_name` |
    /// | `"diagnosis"` | `Text` | `diagnosis` |
    /// | `"tags"` | `List` | `tags` |
    pub fn get_attr(&self, name: &str) -> Option<AttrValue<'_>> {
        match name {
            "patient" => text_attr(&self.patient_name),
            "doctor" => text_attr(&self.doctor_name),
            "diagnosis" => text_attr(&self.diagnosis),
            "tags" => Some(AttrValue::List(&self.tags)),
            _ => None,
        }
    }

    /// Concatenation of every searchable field, joined by a single space.
    ///
    /// Covers id, patient, doctor, diagnosis, notes, and each medication's name
    /// and dosage.
    pub fn search_text(&self) -> String {
        let mut parts: Vec<&str> = vec![self.id.as_str()];
        parts.extend(
            [
                &self.patient_name,
                &self.doctor_name,
                &self.diagnosis,
                &self.notes,
            ]
            .into_iter()
            .filter_map(|field| field.as_deref()),
        );
        for med in &self.medications {
            parts.push(&med.name);
            if let Some(dosage) = med.dosage.as_deref() {
                parts.push(dosage);
            }
        }
        parts.join(" ")
    }

    /// The record date, or `None` when absent or malformed.
    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(parse_record_date)
    }
}

/// Parses a stored record date. See the module docs for accepted forms.
pub fn parse_record_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return day.and_hms_opt(0, 0, 0);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

fn text_attr(field: &Option<String>) -> Option<AttrValue<'_>> {
    field
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .map(AttrValue::Text)
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Float(n) => n.to_string(),
    })
}
