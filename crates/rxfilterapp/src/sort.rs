//! Record comparator.
//!
//! [`compare`] orders two records by a [`SortKey`] and [`SortDirection`]. Callers sort
//! with a stable algorithm ([`sort_records`] uses `slice::sort_by`), so records that
//! compare equal keep their input order in both directions.
//!
//! | Key | Order |
//! |-----|-------|
//! | `Date` | chronological; records without a usable date first |
//! | `Patient`, `Doctor` | case-insensitive, then ordinal; absent names first |
//! | `Status` | ordinal on the status label |
//! | `Priority` | rank table (low < medium < high < urgent); absent first |
//! | `Unspecified` | all equal (input order kept) |
//!
//! `Descending` reverses the result of the ascending comparison; ties stay ties.

use std::cmp::Ordering;

use crate::criteria::{SortDirection, SortKey};
use crate::model::Prescription;

pub fn compare(a: &Prescription, b: &Prescription, key: SortKey, direction: SortDirection) -> Ordering {
    let ascending = match key {
        SortKey::Date => a.parsed_date().cmp(&b.parsed_date()),
        SortKey::Patient => compare_names(a.patient_name.as_deref(), b.patient_name.as_deref()),
        SortKey::Doctor => compare_names(a.doctor_name.as_deref(), b.doctor_name.as_deref()),
        SortKey::Status => status_label(a).cmp(&status_label(b)),
        SortKey::Priority => priority_rank(a).cmp(&priority_rank(b)),
        SortKey::Unspecified => Ordering::Equal,
    };
    match direction {
        SortDirection::Ascending => ascending,
        SortDirection::Descending => ascending.reverse(),
    }
}

/// Stable in-place sort of a borrowed result set.
pub fn sort_records(records: &mut [&Prescription], key: SortKey, direction: SortDirection) {
    if key == SortKey::Unspecified {
        return;
    }
    records.sort_by(|a, b| compare(a, b, key, direction));
}

fn status_label(rx: &Prescription) -> Option<&'static str> {
    rx.status.map(|s| s.label())
}

fn priority_rank(rx: &Prescription) -> u8 {
    rx.priority.map(|p| p.rank()).unwrap_or(0)
}

fn compare_names(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a
            .chars()
            .flat_map(char::to_lowercase)
            .cmp(b.chars().flat_map(char::to_lowercase))
            .then_with(|| a.cmp(b)),
        (a, b) => a.is_some().cmp(&b.is_some()),
    }
}
