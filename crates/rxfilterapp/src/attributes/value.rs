//! Borrowed attribute values.

/// Runtime view of an attribute value, borrowed from the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrValue<'a> {
    /// Single string value (e.g., `doctor`)
    Text(&'a str),

    /// List of strings (e.g., `tags`)
    List(&'a [String]),
}

impl<'a> AttrValue<'a> {
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&'a [String]> {
        match self {
            AttrValue::List(v) => Some(v),
            _ => None,
        }
    }

    /// Every individual value, flattening lists. Blank entries are skipped.
    pub fn values(&self) -> impl Iterator<Item = &'a str> {
        let items: Vec<&'a str> = match *self {
            AttrValue::Text(s) => vec![s],
            AttrValue::List(v) => v.iter().map(String::as_str).collect(),
        };
        items.into_iter().filter(|v| !v.trim().is_empty())
    }
}
