//! Generic partition-exchange sort.
//!
//! A standalone comparison sort for totally ordered scalar data, unrelated to the
//! record comparator. Lomuto partitioning with the last element of the active range as
//! pivot: elements `<=` pivot end up before it, the rest after it.
//!
//! Average cost is O(n log n). Already-ordered or all-equal input degrades to O(n²)
//! with this pivot choice. The recursion always descends into the smaller partition
//! and loops over the larger one, so stack depth stays O(log n) even then.
//!
//! Not stable. Do not use it where equal elements must keep their order.

use std::cmp::Ordering;

use serde_json::Value;

use crate::error::{Result, RxError};

/// Returns a sorted copy, leaving `items` untouched.
pub fn sorted<T: PartialOrd + Clone>(items: &[T]) -> Vec<T> {
    let mut copy = items.to_vec();
    sort_in_place(&mut copy);
    copy
}

/// Sorts `items` in place and hands back the same slice.
pub fn sort_in_place<T: PartialOrd>(items: &mut [T]) -> &mut [T] {
    quicksort(items);
    items
}

fn quicksort<T: PartialOrd>(mut range: &mut [T]) {
    while range.len() > 1 {
        let pivot = partition(range);
        let (left, rest) = std::mem::take(&mut range).split_at_mut(pivot);
        let right = &mut rest[1..];
        if left.len() < right.len() {
            quicksort(left);
            range = right;
        } else {
            quicksort(right);
            range = left;
        }
    }
}

/// Lomuto partition around the last element. Returns the pivot's final index.
fn partition<T: PartialOrd>(range: &mut [T]) -> usize {
    let last = range.len() - 1;
    let mut store = 0;
    for i in 0..last {
        if range[i] <= range[last] {
            range.swap(store, i);
            store += 1;
        }
    }
    range.swap(store, last);
    store
}

/// Sorts a JSON array of numbers, or of strings.
///
/// Anything other than an array is rejected with [`RxError::NotASequence`]. Arrays
/// mixing numbers and strings, or holding other JSON types, are rejected with
/// [`RxError::UnorderableElement`] pointing at the first offending element.
pub fn sort_json(input: &Value) -> Result<Value> {
    let Value::Array(items) = input else {
        return Err(RxError::NotASequence {
            found: json_type(input),
        });
    };
    if items.len() <= 1 {
        return Ok(input.clone());
    }

    let mut scalars = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let scalar = Scalar::from_value(item).ok_or_else(|| RxError::UnorderableElement {
            index,
            found: json_type(item),
        })?;
        if let Some(first) = scalars.first() {
            if !Scalar::same_kind(first, &scalar) {
                return Err(RxError::UnorderableElement {
                    index,
                    found: json_type(item),
                });
            }
        }
        scalars.push(scalar);
    }

    sort_in_place(&mut scalars);
    Ok(Value::Array(scalars.into_iter().map(|s| s.value.clone()).collect()))
}

/// A JSON number or string with the ordering of its kind.
#[derive(Debug)]
struct Scalar<'a> {
    key: ScalarKey<'a>,
    value: &'a Value,
}

#[derive(Debug)]
enum ScalarKey<'a> {
    /// Any JSON integer. `i128` holds the whole `i64` and `u64` ranges exactly.
    Int(i128),
    Float(f64),
    Text(&'a str),
}

impl<'a> Scalar<'a> {
    fn from_value(value: &'a Value) -> Option<Self> {
        let key = match value {
            Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => ScalarKey::Int(i128::from(i)),
                (None, Some(u)) => ScalarKey::Int(i128::from(u)),
                (None, None) => ScalarKey::Float(n.as_f64()?),
            },
            Value::String(s) => ScalarKey::Text(s),
            _ => return None,
        };
        Some(Self { key, value })
    }

    fn same_kind(a: &Self, b: &Self) -> bool {
        a.key.is_number() == b.key.is_number()
    }
}

impl ScalarKey<'_> {
    fn is_number(&self) -> bool {
        !matches!(self, ScalarKey::Text(_))
    }
}

impl PartialEq for ScalarKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for ScalarKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (ScalarKey::Int(a), ScalarKey::Int(b)) => Some(a.cmp(b)),
            (ScalarKey::Float(a), ScalarKey::Float(b)) => a.partial_cmp(b),
            (ScalarKey::Int(a), ScalarKey::Float(b)) => cmp_int_float(*a, *b),
            (ScalarKey::Float(a), ScalarKey::Int(b)) => cmp_int_float(*b, *a).map(Ordering::reverse),
            (ScalarKey::Text(a), ScalarKey::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Exact comparison of an integer with a float, without rounding the integer.
fn cmp_int_float(int: i128, float: f64) -> Option<Ordering> {
    // 2^127, exactly representable.
    const BOUND: f64 = i128::MAX as f64;
    if float.is_nan() {
        return None;
    }
    if float >= BOUND {
        return Some(Ordering::Less);
    }
    if float < -BOUND {
        return Some(Ordering::Greater);
    }
    let whole = float.trunc();
    let by_whole = int.cmp(&(whole as i128));
    if by_whole != Ordering::Equal {
        return Some(by_whole);
    }
    0.0_f64.partial_cmp(&(float - whole))
}

impl PartialEq for Scalar<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl PartialOrd for Scalar<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.key.partial_cmp(&other.key)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
