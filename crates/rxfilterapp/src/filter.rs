//! Record predicate evaluation.
//!
//! A record passes when **every** active dimension passes (AND across dimensions).
//! Within a multi-value dimension it is enough for **one** of the record's values to be
//! selected (OR within a dimension). Empty sets and `None` flag settings impose no
//! constraint.
//!
//! [`RecordFilter`] prepares a [`FilterCriteria`] once (lower-cased search term,
//! resolved date bounds) so evaluating a large collection does not redo that work per
//! record. Cheap set-membership checks run before the date parse and the substring
//! search.
//!
//! ## Missing Data
//!
//! A record that lacks the field a dimension looks at can only pass that dimension
//! when it is unconstrained. In particular a missing or malformed date fails any
//! active date range instead of aborting the evaluation.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Local, NaiveDate};
use tracing::trace;

use crate::attributes::derive_flag;
use crate::criteria::{DateRange, FilterCriteria};
use crate::model::{Prescription, PrescriptionStatus, Priority};

/// Inclusive calendar-day window resolved from a [`DateRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl DayWindow {
    /// Resolves open bounds: no `from` means the earliest representable day, no `to`
    /// means `today`. Returns `None` when neither bound is set.
    pub fn resolve(range: &DateRange, today: NaiveDate) -> Option<Self> {
        if range.is_unbounded() {
            return None;
        }
        Some(Self {
            first: range.from.unwrap_or(NaiveDate::MIN),
            last: range.to.unwrap_or(today),
        })
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.first <= day && day <= self.last
    }
}

/// A [`FilterCriteria`] prepared for repeated evaluation.
#[derive(Debug, Clone)]
pub struct RecordFilter<'c> {
    criteria: &'c FilterCriteria,
    query: Option<String>,
    window: Option<DayWindow>,
}

impl<'c> RecordFilter<'c> {
    /// Prepares `criteria` with an explicit "today".
    pub fn as_of(criteria: &'c FilterCriteria, today: NaiveDate) -> Self {
        Self {
            criteria,
            query: criteria.search_query(),
            window: criteria
                .date_range
                .as_ref()
                .and_then(|range| DayWindow::resolve(range, today)),
        }
    }

    pub fn matches(&self, rx: &Prescription) -> bool {
        let c = self.criteria;
        matches_status(rx, &c.statuses)
            && matches_priority(rx, &c.priorities)
            && matches_tags(rx, &c.tags)
            && matches_categories(rx, &c.categories)
            && matches_flags(rx, &c.flags)
            && self.matches_date(rx)
            && self.matches_search(rx)
    }

    fn matches_date(&self, rx: &Prescription) -> bool {
        let Some(window) = self.window else {
            return true;
        };
        match rx.parsed_date() {
            Some(ts) => window.contains(ts.date()),
            None => {
                trace!(id = %rx.id, date = ?rx.date, "no usable date, excluded by date range");
                false
            }
        }
    }

    fn matches_search(&self, rx: &Prescription) -> bool {
        match &self.query {
            Some(query) => rx.search_text().to_lowercase().contains(query.as_str()),
            None => true,
        }
    }
}

/// Evaluates `criteria` against a single record.
///
/// Prefer [`RecordFilter`] when testing many records against the same criteria.
pub fn matches(rx: &Prescription, criteria: &FilterCriteria) -> bool {
    matches_as_of(rx, criteria, Local::now().date_naive())
}

/// [`matches`] with an explicit "today".
pub fn matches_as_of(rx: &Prescription, criteria: &FilterCriteria, today: NaiveDate) -> bool {
    RecordFilter::as_of(criteria, today).matches(rx)
}

pub fn matches_status(rx: &Prescription, statuses: &BTreeSet<PrescriptionStatus>) -> bool {
    statuses.is_empty() || rx.status.is_some_and(|s| statuses.contains(&s))
}

pub fn matches_priority(rx: &Prescription, priorities: &BTreeSet<Priority>) -> bool {
    priorities.is_empty() || rx.priority.is_some_and(|p| priorities.contains(&p))
}

pub fn matches_tags(rx: &Prescription, tags: &BTreeSet<String>) -> bool {
    tags.is_empty() || rx.tags.iter().any(|tag| tags.contains(tag))
}

pub fn matches_categories(rx: &Prescription, categories: &BTreeMap<String, BTreeSet<String>>) -> bool {
    categories
        .iter()
        .filter(|(_, selected)| !selected.is_empty())
        .all(|(attr, selected)| {
            rx.get_attr(attr)
                .is_some_and(|value| value.values().any(|v| selected.contains(v)))
        })
}

pub fn matches_flags(rx: &Prescription, flags: &BTreeMap<String, Option<bool>>) -> bool {
    flags
        .iter()
        .filter_map(|(name, setting)| setting.map(|want| (name, want)))
        .all(|(name, want)| derive_flag(rx, name) == Some(want))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RxBuilder;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn check(rx: &Prescription, criteria: &FilterCriteria) -> bool {
        matches_as_of(rx, criteria, day(2024, 6, 15))
    }

    #[test]
    fn test_single_record_helpers_agree_with_prepared_filter() {
        let rx = RxBuilder::new("1")
            .status(PrescriptionStatus::Active)
            .date("2000-01-01")
            .build();
        let criteria = FilterCriteria::new()
            .with_status(PrescriptionStatus::Active)
            .with_date_range(Some(day(1999, 1, 1)), None);

        assert!(matches(&rx, &criteria));
        assert_eq!(
            matches_as_of(&rx, &criteria, day(1999, 6, 1)),
            RecordFilter::as_of(&criteria, day(1999, 6, 1)).matches(&rx)
        );
        assert!(!matches_as_of(&rx, &criteria, day(1999, 6, 1)));
    }

    #[test]
    fn test_default_criteria_match_everything() {
        let criteria = FilterCriteria::default();
        assert!(check(&RxBuilder::new("1").build(), &criteria));
        assert!(check(&RxBuilder::new("2").date("garbage").build(), &criteria));
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let rx = RxBuilder::new("RX-1")
            .patient("Joana Prado")
            .notes("Use drops nightly")
            .build();

        assert!(check(&rx, &FilterCriteria::new().with_search("prado")));
        assert!(check(&rx, &FilterCriteria::new().with_search("DROPS")));
        assert!(check(&rx, &FilterCriteria::new().with_search("rx-1")));
        assert!(!check(&rx, &FilterCriteria::new().with_search("insulin")));
    }

    #[test]
    fn test_search_covers_medications() {
        let rx = RxBuilder::new("1").medication("Timolol", "0.5%").build();
        assert!(check(&rx, &FilterCriteria::new().with_search("timolol 0.5")));
        assert!(check(&rx, &FilterCriteria::new().with_search("0.5%")));
    }

    #[test]
    fn test_status_inclusion() {
        let rx = RxBuilder::new("1").status(PrescriptionStatus::Expired).build();
        assert!(check(&rx, &FilterCriteria::new().with_status(PrescriptionStatus::Expired)));
        assert!(check(
            &rx,
            &FilterCriteria::new()
                .with_status(PrescriptionStatus::Active)
                .with_status(PrescriptionStatus::Expired)
        ));
        assert!(!check(&rx, &FilterCriteria::new().with_status(PrescriptionStatus::Active)));
    }

    #[test]
    fn test_absent_status_fails_any_status_filter() {
        let rx = Prescription::new("1");
        assert!(check(&rx, &FilterCriteria::new()));
        for status in PrescriptionStatus::ALL {
            assert!(!check(&rx, &FilterCriteria::new().with_status(status)));
        }
    }

    #[test]
    fn test_priority_inclusion_and_missing_priority() {
        let high = RxBuilder::new("1").priority(Priority::High).build();
        let none = RxBuilder::new("2").build();
        let criteria = FilterCriteria::new().with_priority(Priority::High);

        assert!(check(&high, &criteria));
        assert!(!check(&none, &criteria));
        assert!(check(&none, &FilterCriteria::new()));
    }

    #[test]
    fn test_tag_or_semantics() {
        let rx = RxBuilder::new("1").tags(&["x", "y"]).build();
        assert!(check(&rx, &FilterCriteria::new().with_tag("y").with_tag("z")));
        assert!(!check(&rx, &FilterCriteria::new().with_tag("z")));
    }

    #[test]
    fn test_categories_and_across_or_within() {
        let rx = RxBuilder::new("1").doctor("Dr. Reis").patient("Ana").build();

        let same_doctor_any_of = FilterCriteria::new()
            .with_category("doctor", "Dr. Reis")
            .with_category("doctor", "Dr. Lopes");
        assert!(check(&rx, &same_doctor_any_of));

        let doctor_and_wrong_patient = FilterCriteria::new()
            .with_category("doctor", "Dr. Reis")
            .with_category("patient", "Bruno");
        assert!(!check(&rx, &doctor_and_wrong_patient));
    }

    #[test]
    fn test_missing_categorical_value_never_matches() {
        let rx = RxBuilder::new("1").build();
        assert!(!check(&rx, &FilterCriteria::new().with_category("diagnosis", "")));
        assert!(!check(&rx, &FilterCriteria::new().with_category("diagnosis", "Glaucoma")));
    }

    #[test]
    fn test_empty_category_set_is_unconstrained() {
        let rx = RxBuilder::new("1").build();
        let mut criteria = FilterCriteria::new();
        criteria.categories.insert("doctor".into(), BTreeSet::new());
        assert!(check(&rx, &criteria));
    }

    #[test]
    fn test_tristate_flags() {
        let with_meds = RxBuilder::new("1").medication("Atropine", "1%").build();
        let with_vision = RxBuilder::new("2").right_sphere(-1.5).build();

        let require_meds = FilterCriteria::new().with_flag("has_medications", Some(true));
        assert!(check(&with_meds, &require_meds));
        assert!(!check(&with_vision, &require_meds));

        let forbid_vision = FilterCriteria::new().with_flag("has_vision", Some(false));
        assert!(check(&with_meds, &forbid_vision));
        assert!(!check(&with_vision, &forbid_vision));

        let unconstrained = FilterCriteria::new().with_flag("has_vision", None);
        assert!(check(&with_meds, &unconstrained));
        assert!(check(&with_vision, &unconstrained));
    }

    #[test]
    fn test_unknown_flag_fails_closed() {
        let rx = RxBuilder::new("1").build();
        assert!(!check(&rx, &FilterCriteria::new().with_flag("has_allergies", Some(false))));
    }

    #[test]
    fn test_date_range_inclusive_whole_days() {
        let morning = RxBuilder::new("1").date("2024-03-01T08:00:00").build();
        let evening = RxBuilder::new("2").date("2024-03-31T23:30:00").build();
        let april = RxBuilder::new("3").date("2024-04-01").build();
        let march = FilterCriteria::new().with_date_range(Some(day(2024, 3, 1)), Some(day(2024, 3, 31)));

        assert!(check(&morning, &march));
        assert!(check(&evening, &march));
        assert!(!check(&april, &march));
    }

    #[test]
    fn test_single_day_selection() {
        let rx = RxBuilder::new("1").date("2024-03-10T17:45:00").build();
        let criteria = FilterCriteria::new().with_date_range(Some(day(2024, 3, 10)), Some(day(2024, 3, 10)));
        assert!(check(&rx, &criteria));
    }

    #[test]
    fn test_only_to_bound_has_no_lower_limit() {
        let ancient = RxBuilder::new("1").date("1901-01-01").build();
        let criteria = FilterCriteria::new().with_date_range(None, Some(day(2024, 1, 1)));
        assert!(check(&ancient, &criteria));
    }

    // Regression: an open upper bound means "today", so future-dated records are
    // excluded from a from-only range.
    #[test]
    fn test_only_from_bound_stops_at_today() {
        let criteria = FilterCriteria::new().with_date_range(Some(day(2024, 1, 1)), None);

        let today = RxBuilder::new("1").date("2024-06-15T23:59:00").build();
        let tomorrow = RxBuilder::new("2").date("2024-06-16").build();

        assert!(check(&today, &criteria));
        assert!(!check(&tomorrow, &criteria));
    }

    #[test]
    fn test_bad_or_missing_date_fails_closed_when_range_active() {
        let criteria = FilterCriteria::new().with_date_range(Some(day(2000, 1, 1)), None);
        assert!(!check(&RxBuilder::new("1").date("31/12/2023").build(), &criteria));
        assert!(!check(&RxBuilder::new("2").build(), &criteria));
    }

    #[test]
    fn test_unbounded_range_is_inactive() {
        let rx = RxBuilder::new("1").build();
        let criteria = FilterCriteria::new().with_date_range(None, None);
        assert!(check(&rx, &criteria));
    }

    #[test]
    fn test_day_window_resolve() {
        let today = day(2024, 6, 15);
        assert_eq!(DayWindow::resolve(&DateRange::default(), today), None);

        let window = DayWindow::resolve(&DateRange::new(Some(day(2024, 1, 1)), None), today).unwrap();
        assert_eq!(window.last, today);

        let window = DayWindow::resolve(&DateRange::new(None, Some(day(2024, 1, 1))), today).unwrap();
        assert_eq!(window.first, NaiveDate::MIN);
    }
}
