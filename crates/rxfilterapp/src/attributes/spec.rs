//! Attribute specifications and registry.

/// The kind of value an attribute holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Single optional string (e.g., `doctor`)
    Text,

    /// List of strings (e.g., `tags`)
    List,
}

/// Specification for a single attribute.
#[derive(Debug, Clone)]
pub struct AttributeSpec {
    /// The attribute name used in criteria and facets (e.g., "doctor", "tags")
    pub name: &'static str,

    /// The kind of value this attribute holds
    pub kind: AttributeKind,

    /// Whether distinct values are offered as filter options
    pub facet: bool,

    /// Human readable label for filter controls
    pub label: &'static str,
}

impl AttributeSpec {
    const fn new(name: &'static str, kind: AttributeKind, label: &'static str) -> Self {
        Self {
            name,
            kind,
            facet: false,
            label,
        }
    }

    const fn facet(mut self) -> Self {
        self.facet = true;
        self
    }
}

/// Registry of all filterable record attributes.
///
/// Adding a new categorical facet means adding an entry here.
pub const ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::new("doctor", AttributeKind::Text, "Doctor").facet(),
    AttributeSpec::new("patient", AttributeKind::Text, "Patient").facet(),
    AttributeSpec::new("diagnosis", AttributeKind::Text, "Diagnosis").facet(),
    AttributeSpec::new("tags", AttributeKind::List, "Tags").facet(),
];

/// Look up an attribute spec by name.
pub fn get_spec(name: &str) -> Option<&'static AttributeSpec> {
    ATTRIBUTES.iter().find(|spec| spec.name == name)
}

/// Names of every attribute exposed as a facet.
pub fn facet_attrs() -> impl Iterator<Item = &'static AttributeSpec> {
    ATTRIBUTES.iter().filter(|spec| spec.facet)
}
