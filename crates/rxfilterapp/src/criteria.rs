//! # Filter Criteria
//!
//! [`FilterCriteria`] describes the desired view over a record collection: one named
//! field per filter dimension, plus open-ended maps for the categorical attributes and
//! the tristate flags so that new facets are added by inserting a map entry.
//!
//! ## Dimensions
//!
//! | # | Dimension | Field | Unconstrained when |
//! |---|-----------|-------|--------------------|
//! | 1 | Text search | `search_term` | blank |
//! | 2 | Status | `statuses` | empty |
//! | 3 | Date range | `date_range` | `None` or both bounds absent |
//! | 4 | Categorical | `categories` | every set empty |
//! | 5 | Priority | `priorities` | empty |
//! | 6 | Tristate flags | `flags` | every setting `None` |
//! | 7 | Tags | `tags` | empty |
//!
//! Sorting (`sort_key`, `sort_direction`) is part of the criteria but is not a filter
//! dimension. The default criteria select everything, newest first.
//!
//! ## Serialization
//!
//! Criteria round-trip through JSON so hosts can persist saved views. Every field has
//! a default, so `{}` is the identity view.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RxError};
use crate::model::{Priority, PrescriptionStatus};

/// Field used to order the result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Date,
    /// Primary name: the patient.
    Patient,
    /// Secondary name: the prescribing doctor.
    Doctor,
    Status,
    Priority,
    /// Unrecognized key; keeps input order.
    Unspecified,
}

// Sort keys come from UI state; unknown labels degrade to a pass-through sort.
impl<'de> Deserialize<'de> for SortKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(SortKey::from_label(&label))
    }
}

impl SortKey {
    /// Lenient parse used for values coming from a UI layer.
    ///
    /// Unknown keys map to [`SortKey::Unspecified`] instead of failing.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "date" => SortKey::Date,
            "patient" | "primaryname" | "patientname" | "primary" => SortKey::Patient,
            "doctor" | "secondaryname" | "doctorname" | "secondary" => SortKey::Doctor,
            "status" => SortKey::Status,
            "priority" => SortKey::Priority,
            _ => SortKey::Unspecified,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::Patient => "patient",
            SortKey::Doctor => "doctor",
            SortKey::Status => "status",
            SortKey::Priority => "priority",
            SortKey::Unspecified => "unspecified",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc", alias = "ascending")]
    Ascending,
    #[default]
    #[serde(rename = "desc", alias = "descending")]
    Descending,
}

impl SortDirection {
    pub fn label(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(format!("unknown sort direction '{}'", s)),
        }
    }
}

/// Inclusive calendar-day bounds on the record date. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

/// Parses a `YYYY-MM-DD` bound as typed into a date picker or on the command line.
pub fn parse_day(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| RxError::InvalidDate(raw.to_string()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub search_term: String,
    pub statuses: BTreeSet<PrescriptionStatus>,
    pub date_range: Option<DateRange>,
    /// Attribute name (see [`crate::attributes::ATTRIBUTES`]) to selected values.
    pub categories: BTreeMap<String, BTreeSet<String>>,
    pub priorities: BTreeSet<Priority>,
    /// Flag name (see [`crate::attributes::FLAGS`]) to required value.
    pub flags: BTreeMap<String, Option<bool>>,
    pub tags: BTreeSet<String>,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_status(mut self, status: PrescriptionStatus) -> Self {
        self.statuses.insert(status);
        self
    }

    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_range = Some(DateRange::new(from, to));
        self
    }

    pub fn with_category(mut self, attr: impl Into<String>, value: impl Into<String>) -> Self {
        self.categories
            .entry(attr.into())
            .or_default()
            .insert(value.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priorities.insert(priority);
        self
    }

    pub fn with_flag(mut self, flag: impl Into<String>, value: Option<bool>) -> Self {
        self.flags.insert(flag.into(), value);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn sorted_by(mut self, key: SortKey, direction: SortDirection) -> Self {
        self.sort_key = key;
        self.sort_direction = direction;
        self
    }

    /// The normalized search term, or `None` when blank.
    pub fn search_query(&self) -> Option<String> {
        let trimmed = self.search_term.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
    }

    pub fn has_date_bounds(&self) -> bool {
        self.date_range.is_some_and(|r| !r.is_unbounded())
    }

    pub fn has_categories(&self) -> bool {
        self.categories.values().any(|set| !set.is_empty())
    }

    pub fn has_flags(&self) -> bool {
        self.flags.values().any(Option::is_some)
    }

    /// Number of filter dimensions currently constraining the result.
    ///
    /// Each of the seven dimensions counts at most once, however many values are
    /// selected within it. Sorting never counts.
    pub fn active_filter_count(&self) -> usize {
        [
            self.search_query().is_some(),
            !self.statuses.is_empty(),
            self.has_date_bounds(),
            self.has_categories(),
            !self.priorities.is_empty(),
            self.has_flags(),
            !self.tags.is_empty(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn is_unfiltered(&self) -> bool {
        self.active_filter_count() == 0
    }

    /// Drops every filter but keeps the current sort order.
    pub fn clear_filters(&mut self) {
        *self = Self {
            sort_key: self.sort_key,
            sort_direction: self.sort_direction,
            ..Self::default()
        };
    }
}
