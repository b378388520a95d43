//! # Filter Session
//!
//! [`FilterSession`] is the state holder a host UI drives: it owns the record
//! collection, the current [`FilterCriteria`], and the facet options derived from the
//! full collection.
//!
//! Every mutator changes a single dimension and then notifies subscribers, but only
//! when the criteria actually changed. Toggling a value twice therefore notifies
//! twice and leaves the criteria as they started. The result set is not cached;
//! [`FilterSession::visible`] reruns the pipeline on demand.

use std::fmt;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::attributes::get_spec;
use crate::criteria::{DateRange, FilterCriteria, SortDirection, SortKey};
use crate::facets::{extract_facets, FacetOptions};
use crate::model::{Prescription, PrescriptionStatus, Priority};
use crate::pipeline::{self, FilterOutcome};

type Listener = Box<dyn FnMut(&FilterCriteria)>;

pub struct FilterSession {
    records: Vec<Prescription>,
    facets: FacetOptions,
    criteria: FilterCriteria,
    listeners: Vec<Listener>,
}

impl fmt::Debug for FilterSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSession")
            .field("records", &self.records.len())
            .field("criteria", &self.criteria)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl FilterSession {
    pub fn new(records: Vec<Prescription>) -> Self {
        Self::with_criteria(records, FilterCriteria::default())
    }

    pub fn with_criteria(records: Vec<Prescription>, criteria: FilterCriteria) -> Self {
        let facets = extract_facets(&records);
        Self {
            records,
            facets,
            criteria,
            listeners: Vec::new(),
        }
    }

    pub fn records(&self) -> &[Prescription] {
        &self.records
    }

    pub fn facets(&self) -> &FacetOptions {
        &self.facets
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Replaces the collection and recomputes facets. Criteria are kept.
    pub fn set_records(&mut self, records: Vec<Prescription>) {
        self.facets = extract_facets(&records);
        self.records = records;
    }

    /// Registers a callback invoked with the new criteria after every change.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&FilterCriteria) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        self.update(|c| c.search_term = term);
    }

    pub fn toggle_status(&mut self, status: PrescriptionStatus) {
        self.update(|c| {
            if !c.statuses.remove(&status) {
                c.statuses.insert(status);
            }
        });
    }

    /// Sets both bounds at once. Two open bounds clear the dimension.
    pub fn set_date_range(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        let range = DateRange::new(from, to);
        self.update(|c| c.date_range = (!range.is_unbounded()).then_some(range));
    }

    pub fn toggle_category(&mut self, attr: &str, value: &str) {
        if get_spec(attr).is_none() {
            warn!(attr, "unknown category attribute, no record can match it");
        }
        self.update(|c| {
            let selected = c.categories.entry(attr.to_string()).or_default();
            if !selected.remove(value) {
                selected.insert(value.to_string());
            }
            if selected.is_empty() {
                c.categories.remove(attr);
            }
        });
    }

    pub fn toggle_priority(&mut self, priority: Priority) {
        self.update(|c| {
            if !c.priorities.remove(&priority) {
                c.priorities.insert(priority);
            }
        });
    }

    /// `None` puts the flag back to "no constraint".
    pub fn set_flag(&mut self, flag: &str, setting: Option<bool>) {
        self.update(|c| match setting {
            Some(_) => {
                c.flags.insert(flag.to_string(), setting);
            }
            None => {
                c.flags.remove(flag);
            }
        });
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        self.update(|c| {
            if !c.tags.remove(tag) {
                c.tags.insert(tag.to_string());
            }
        });
    }

    pub fn set_sort(&mut self, key: SortKey, direction: SortDirection) {
        self.update(|c| {
            c.sort_key = key;
            c.sort_direction = direction;
        });
    }

    /// Resets criteria to the defaults, including the sort order.
    pub fn clear_all(&mut self) {
        self.update(|c| *c = FilterCriteria::default());
    }

    /// Applies an arbitrary edit and notifies if it changed anything.
    pub fn update<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut FilterCriteria),
    {
        let before = self.criteria.clone();
        edit(&mut self.criteria);
        if self.criteria == before {
            return;
        }
        debug!(
            active = self.criteria.active_filter_count(),
            listeners = self.listeners.len(),
            "criteria changed"
        );
        for listener in &mut self.listeners {
            listener(&self.criteria);
        }
    }

    pub fn active_filter_count(&self) -> usize {
        self.criteria.active_filter_count()
    }

    /// The filtered, sorted view of the current collection.
    pub fn visible(&self) -> FilterOutcome<'_> {
        pipeline::run(&self.records, &self.criteria)
    }

    pub fn visible_as_of(&self, today: NaiveDate) -> FilterOutcome<'_> {
        pipeline::run_as_of(&self.records, &self.criteria, today)
    }
}
