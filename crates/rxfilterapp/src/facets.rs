//! Facet extraction.
//!
//! Facets are always computed from the unfiltered collection, so selecting one value
//! never hides the other options of the same facet. Values are deduplicated and
//! returned in ordinal (byte-wise) order, which is stable and locale-independent.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use crate::attributes::{facet_attrs, AttributeSpec};
use crate::model::Prescription;

/// Distinct values per facet attribute, derived from a record collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FacetOptions {
    values: BTreeMap<&'static str, Vec<String>>,
}

impl FacetOptions {
    /// Options for `attr`, empty for unknown attributes.
    pub fn get(&self, attr: &str) -> &[String] {
        self.values.get(attr).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn tags(&self) -> &[String] {
        self.get("tags")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        self.values.iter().map(|(name, values)| (*name, values.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(Vec::is_empty)
    }
}

/// Collects the sorted distinct values of every facet attribute.
pub fn extract_facets(records: &[Prescription]) -> FacetOptions {
    let values = facet_attrs()
        .map(|spec| (spec.name, distinct_values(records, spec)))
        .collect();
    let facets = FacetOptions { values };
    debug!(
        records = records.len(),
        tags = facets.tags().len(),
        "extracted facets"
    );
    facets
}

fn distinct_values(records: &[Prescription], spec: &AttributeSpec) -> Vec<String> {
    let distinct: BTreeSet<&str> = records
        .iter()
        .filter_map(|rx| rx.get_attr(spec.name))
        .flat_map(|value| value.values())
        .collect();
    distinct.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RxBuilder;

    #[test]
    fn test_distinct_sorted_values() {
        let records = vec![
            RxBuilder::new("1").doctor("A").build(),
            RxBuilder::new("2").doctor("B").build(),
            RxBuilder::new("3").doctor("A").build(),
            RxBuilder::new("4").doctor("C").build(),
        ];

        let facets = extract_facets(&records);

        assert_eq!(facets.get("doctor"), ["A", "B", "C"]);
    }

    #[test]
    fn test_tags_are_flattened() {
        let records = vec![
            RxBuilder::new("1").tags(&["myopia", "kids"]).build(),
            RxBuilder::new("2").tags(&["kids", "contact-lens"]).build(),
            RxBuilder::new("3").build(),
        ];

        let facets = extract_facets(&records);

        assert_eq!(facets.tags(), ["contact-lens", "kids", "myopia"]);
    }

    #[test]
    fn test_absent_and_blank_values_are_excluded() {
        let records = vec![
            RxBuilder::new("1").patient("Zoe").build(),
            RxBuilder::new("2").patient("").build(),
            RxBuilder::new("3").build(),
            RxBuilder::new("4").tags(&["", "x"]).build(),
        ];

        let facets = extract_facets(&records);

        assert_eq!(facets.get("patient"), ["Zoe"]);
        assert_eq!(facets.tags(), ["x"]);
        assert!(facets.get("diagnosis").is_empty());
    }

    #[test]
    fn test_ordinal_ordering_is_case_sensitive() {
        let records = vec![
            RxBuilder::new("1").diagnosis("cataract").build(),
            RxBuilder::new("2").diagnosis("Astigmatism").build(),
            RxBuilder::new("3").diagnosis("Cataract").build(),
        ];

        let facets = extract_facets(&records);

        assert_eq!(facets.get("diagnosis"), ["Astigmatism", "Cataract", "cataract"]);
    }

    #[test]
    fn test_empty_collection() {
        let facets = extract_facets(&[]);
        assert!(facets.is_empty());
        assert!(facets.get("unknown").is_empty());
        // every facet attribute still has an (empty) entry
        assert_eq!(facets.iter().count(), facet_attrs().count());
    }
}
