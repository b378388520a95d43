//! Filter-then-sort pipeline.
//!
//! [`apply_filters`] is a pure function of `(records, criteria)`: it keeps the records
//! that pass every active dimension and returns them in criteria order. The input is
//! never reordered or mutated; results borrow from it.
//!
//! Running the pipeline twice with the same criteria yields the same sequence, and
//! adding a constraint can only shrink the result.

use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::criteria::FilterCriteria;
use crate::filter::RecordFilter;
use crate::model::Prescription;
use crate::sort::sort_records;

/// Filtered and ordered view of a record collection.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome<'a> {
    pub records: Vec<&'a Prescription>,
    /// Number of active filter dimensions in the criteria that produced this view.
    pub active_filters: usize,
    /// Size of the unfiltered collection.
    pub total: usize,
}

impl<'a> FilterOutcome<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn hidden(&self) -> usize {
        self.total.saturating_sub(self.records.len())
    }
}

/// Filters and sorts `records`, resolving open date bounds against the local date.
pub fn apply_filters<'a>(records: &'a [Prescription], criteria: &FilterCriteria) -> Vec<&'a Prescription> {
    apply_filters_as_of(records, criteria, Local::now().date_naive())
}

/// [`apply_filters`] with an explicit "today".
pub fn apply_filters_as_of<'a>(
    records: &'a [Prescription],
    criteria: &FilterCriteria,
    today: NaiveDate,
) -> Vec<&'a Prescription> {
    let filter = RecordFilter::as_of(criteria, today);
    let mut visible: Vec<&Prescription> = if criteria.is_unfiltered() {
        records.iter().collect()
    } else {
        records.iter().filter(|rx| filter.matches(rx)).collect()
    };
    sort_records(&mut visible, criteria.sort_key, criteria.sort_direction);

    debug!(
        total = records.len(),
        visible = visible.len(),
        active = criteria.active_filter_count(),
        sort = %criteria.sort_key,
        direction = criteria.sort_direction.label(),
        "applied filters"
    );
    visible
}

/// Runs the pipeline and reports the active filter count alongside the result.
pub fn run<'a>(records: &'a [Prescription], criteria: &FilterCriteria) -> FilterOutcome<'a> {
    run_as_of(records, criteria, Local::now().date_naive())
}

pub fn run_as_of<'a>(records: &'a [Prescription], criteria: &FilterCriteria, today: NaiveDate) -> FilterOutcome<'a> {
    FilterOutcome {
        records: apply_filters_as_of(records, criteria, today),
        active_filters: criteria.active_filter_count(),
        total: records.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{SortDirection, SortKey};
    use crate::model::{PrescriptionStatus, Priority};
    use crate::test_utils::{ids, RxBuilder};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_hidden_counts_filtered_out_records() {
        let records = vec![
            RxBuilder::new("1").status(PrescriptionStatus::Active).build(),
            RxBuilder::new("2").status(PrescriptionStatus::Expired).build(),
        ];
        let criteria = FilterCriteria::new().with_status(PrescriptionStatus::Active);
        assert_eq!(run_as_of(&records, &criteria, today()).hidden(), 1);

        let rx = RxBuilder::new("x").build();
        let detached = FilterOutcome {
            records: vec![&rx, &rx],
            active_filters: 0,
            total: 1,
        };
        assert_eq!(detached.hidden(), 0);
    }

    #[test]
    fn test_status_and_priority_sorted_by_priority() {
        let records = vec![
            RxBuilder::new("1").status(PrescriptionStatus::Active).priority(Priority::Low).build(),
            RxBuilder::new("2").status(PrescriptionStatus::Active).priority(Priority::Urgent).build(),
            RxBuilder::new("3").status(PrescriptionStatus::Expired).priority(Priority::Urgent).build(),
            RxBuilder::new("4").status(PrescriptionStatus::Active).priority(Priority::High).build(),
        ];
        let criteria = FilterCriteria::new()
            .with_status(PrescriptionStatus::Active)
            .with_priority(Priority::High)
            .with_priority(Priority::Urgent)
            .sorted_by(SortKey::Priority, SortDirection::Descending);

        let outcome = run_as_of(&records, &criteria, today());

        assert_eq!(ids(&outcome.records), vec!["2", "4"]);
        assert_eq!(outcome.active_filters, 2);
        assert_eq!(outcome.hidden(), 2);
    }

    #[test]
    fn test_empty_criteria_only_reorders() {
        let records = vec![
            RxBuilder::new("old").date("2024-01-01").build(),
            RxBuilder::new("new").date("2024-05-01").build(),
            RxBuilder::new("mid").date("2024-03-01").build(),
        ];

        let visible = apply_filters_as_of(&records, &FilterCriteria::new(), today());

        assert_eq!(ids(&visible), vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_search_and_tag_combination() {
        let records = vec![
            RxBuilder::new("1").patient("Ana Lima").tags(&["myopia"]).build(),
            RxBuilder::new("2").patient("Ana Souza").tags(&["glaucoma"]).build(),
            RxBuilder::new("3").patient("Bruno").tags(&["myopia"]).build(),
        ];
        let criteria = FilterCriteria::new().with_search("ana").with_tag("myopia");

        let visible = apply_filters_as_of(&records, &criteria, today());

        assert_eq!(ids(&visible), vec!["1"]);
    }

    #[test]
    fn test_date_range_and_flag() {
        let records = vec![
            RxBuilder::new("in-with-med").date("2024-02-10").medication("Timolol", "0.5%").build(),
            RxBuilder::new("in-no-med").date("2024-02-11").build(),
            RxBuilder::new("out").date("2023-12-31").medication("Latanoprost", "").build(),
        ];
        let criteria = FilterCriteria::new()
            .with_date_range(day(2024, 1, 1), day(2024, 3, 1))
            .with_flag("has_medications", Some(true));

        let outcome = run_as_of(&records, &criteria, today());

        assert_eq!(ids(&outcome.records), vec!["in-with-med"]);
        assert_eq!(outcome.active_filters, 2);
    }

    #[test]
    fn test_idempotent() {
        let records = vec![
            RxBuilder::new("a").doctor("Dr. B").build(),
            RxBuilder::new("b").doctor("Dr. A").build(),
            RxBuilder::new("c").doctor("Dr. B").build(),
        ];
        let criteria = FilterCriteria::new()
            .with_category("doctor", "Dr. B")
            .sorted_by(SortKey::Doctor, SortDirection::Ascending);

        let first = apply_filters_as_of(&records, &criteria, today());
        let second = apply_filters_as_of(&records, &criteria, today());

        assert_eq!(first, second);
        assert_eq!(ids(&first), vec!["a", "c"]);
    }

    #[test]
    fn test_input_order_untouched() {
        let records = vec![
            RxBuilder::new("b").date("2024-01-02").build(),
            RxBuilder::new("a").date("2024-01-01").build(),
        ];
        let before = records.clone();

        let _ = apply_filters_as_of(&records, &FilterCriteria::new(), today());

        assert_eq!(records, before);
    }

    #[test]
    fn test_empty_collection() {
        let criteria = FilterCriteria::new().with_search("x");
        let outcome = run_as_of(&[], &criteria, today());
        assert!(outcome.is_empty());
        assert_eq!(outcome.total, 0);
        assert_eq!(outcome.active_filters, 1);
    }
}
