//! Ordering primitives for result sorting.
//!
//! [`compare_to`] is the base three-way comparison every sort is built on.
//! [`Dir`] and [`SortEntry`] describe one key of a composite sort and
//! [`compare_by_sort`] folds a whole sort spec into a single ordering.

use std::cmp::Ordering;

use deunicode::deunicode;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Applies this direction to an ordering.
    ///
    /// For `Asc`, returns the ordering unchanged.
    /// For `Desc`, reverses the ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// The opposite direction.
    pub fn flip(self) -> Dir {
        match self {
            Dir::Asc => Dir::Desc,
            Dir::Desc => Dir::Asc,
        }
    }

    /// Returns the wire name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single key of a sort spec: a field path and a direction.
///
/// Serializes as `{"field": "name", "sort": "asc"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortEntry {
    /// Dotted path of the field to sort by.
    pub field: String,
    /// The sort direction.
    pub sort: Dir,
}

impl SortEntry {
    /// Creates a new sort key with the given direction.
    pub fn new(field: impl Into<String>, sort: Dir) -> Self {
        SortEntry {
            field: field.into(),
            sort,
        }
    }

    /// Creates a new ascending sort key.
    pub fn asc(field: impl Into<String>) -> Self {
        SortEntry::new(field, Dir::Asc)
    }

    /// Creates a new descending sort key.
    pub fn desc(field: impl Into<String>) -> Self {
        SortEntry::new(field, Dir::Desc)
    }

    /// Compares two field values according to this key.
    pub fn compare(&self, a: &Value<'_>, b: &Value<'_>) -> Ordering {
        self.sort.apply(compare_to(a, b))
    }
}

/// Total three-way comparison of two field values.
///
/// - Equal values (including two `None`s) are `Equal`.
/// - `None` sorts before any defined value.
/// - If either side is a string, both are coerced to strings and [`collate`]d.
/// - Otherwise the numeric views are compared; NaN compares `Equal`.
///
/// ```
/// use std::cmp::Ordering;
/// use rathena_search::{compare_to, Number, Value};
///
/// assert_eq!(compare_to(&Value::None, &Value::String("a")), Ordering::Less);
/// assert_eq!(
///     compare_to(&Value::Number(Number::I64(10)), &Value::Number(Number::I64(9))),
///     Ordering::Greater,
/// );
/// // "10" < "9" once a string is involved
/// assert_eq!(
///     compare_to(&Value::Number(Number::I64(10)), &Value::String("9")),
///     Ordering::Less,
/// );
/// ```
pub fn compare_to(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    match (a, b) {
        (Value::None, _) => return Ordering::Less,
        (_, Value::None) => return Ordering::Greater,
        _ => {}
    }
    if a.is_string() || b.is_string() {
        return match (a.to_display_string(), b.to_display_string()) {
            (Some(a), Some(b)) => collate(&a, &b),
            _ => Ordering::Equal,
        };
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) if a > b => Ordering::Greater,
        (Some(a), Some(b)) if a < b => Ordering::Less,
        _ => Ordering::Equal,
    }
}

/// Locale-aware string comparison.
///
/// Primary strength ignores case and accents (text is transliterated first),
/// and orders character classes whitespace < punctuation < digits < letters.
/// Ties fall back to accents, then lowercase before uppercase, then code
/// points, so distinct strings never compare `Equal`.
pub fn collate(a: &str, b: &str) -> Ordering {
    let (base_a, base_b) = (deunicode(a), deunicode(b));
    base_a
        .chars()
        .map(primary_weight)
        .cmp(base_b.chars().map(primary_weight))
        .then_with(|| {
            a.chars()
                .flat_map(char::to_lowercase)
                .cmp(b.chars().flat_map(char::to_lowercase))
        })
        .then_with(|| a.chars().map(char::is_uppercase).cmp(b.chars().map(char::is_uppercase)))
        .then_with(|| a.cmp(b))
}

fn primary_weight(c: char) -> (u8, char) {
    let class = if c.is_whitespace() {
        0
    } else if c.is_ascii_punctuation() {
        1
    } else if c.is_numeric() {
        2
    } else if c.is_alphabetic() {
        3
    } else {
        4
    };
    (class, c.to_ascii_lowercase())
}

/// Compares two items using a list of sort keys.
///
/// The first key is the primary sort key, each following key breaks the
/// remaining ties. If all keys compare equal, returns `Equal`.
pub fn compare_by_sort<T, F>(a: &T, b: &T, sort: &[SortEntry], accessor: &F) -> Ordering
where
    for<'a> F: Fn(&'a T, &str) -> Value<'a>,
{
    for entry in sort {
        let ordering = entry.compare(&accessor(a, &entry.field), &accessor(b, &entry.field));
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
