//! Filter predicate composition.
//!
//! [`ClauseFilter`] is a generic, wire-friendly filter over any [`Seekable`]
//! entity. [`TextMatch`] and [`Range`] are the building blocks typed,
//! entity-specific filters are composed from.

use serde::{Deserialize, Serialize};

use crate::accessor::Seekable;
use crate::clause::{Clause, ClauseValue};
use crate::error::Result;
use crate::op::Op;
use crate::value::Value;

/// A filter made of three clause groups.
///
/// ```text
/// match = (all AND clauses match)
///       ∧ (at least one OR clause matches, OR no OR clauses exist)
///       ∧ (no NOT clause matches)
/// ```
///
/// Serializes as `{"and": [...], "or": [...], "not": [...]}`; every group
/// is optional on the wire.
///
/// ```
/// use rathena_search::{ClauseFilter, Number, Value};
///
/// fn accessor<'a>(level: &'a i64, _field: &str) -> Value<'a> {
///     Value::Number(Number::I64(*level))
/// }
///
/// let filter = ClauseFilter::new().and_gte("level", 10i64).not_eq("level", 50i64);
/// assert!(filter.matches_with(&20, accessor));
/// assert!(!filter.matches_with(&50, accessor));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClauseFilter {
    and: Vec<Clause>,
    or: Vec<Clause>,
    not: Vec<Clause>,
}

impl ClauseFilter {
    /// Creates a new empty filter; it matches everything.
    pub fn new() -> Self {
        ClauseFilter::default()
    }

    /// Adds an AND clause.
    pub fn and(mut self, field: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.and.push(Clause::new(field, op, value));
        self
    }

    /// Adds an OR clause.
    pub fn or(mut self, field: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.or.push(Clause::new(field, op, value));
        self
    }

    /// Adds a NOT clause.
    pub fn not(mut self, field: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.not.push(Clause::new(field, op, value));
        self
    }

    /// Adds an AND equality clause.
    pub fn and_eq(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Eq, value)
    }

    /// Adds an AND greater-than-or-equal clause.
    pub fn and_gte(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Gte, value)
    }

    /// Adds an AND less-than-or-equal clause.
    pub fn and_lte(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Lte, value)
    }

    /// Adds an AND case-insensitive substring clause.
    pub fn and_icontains(self, field: &str, value: &str) -> Self {
        self.and(field, Op::IContains, value)
    }

    /// Adds an AND regex clause.
    ///
    /// Returns an error if the pattern is invalid.
    pub fn and_regex(self, field: &str, pattern: &str) -> Result<Self> {
        let regex = regex::Regex::new(pattern)?;
        Ok(self.and(field, Op::Regex, ClauseValue::Regex(regex)))
    }

    /// Adds an AND in-set clause for enum values.
    pub fn and_in<I>(self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        let set: Vec<u32> = values.into_iter().collect();
        self.and(field, Op::In, ClauseValue::EnumSet(set))
    }

    /// Adds an OR case-insensitive substring clause.
    pub fn or_icontains(self, field: &str, value: &str) -> Self {
        self.or(field, Op::IContains, value)
    }

    /// Adds a NOT equality clause.
    pub fn not_eq(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.not(field, Op::Eq, value)
    }

    /// Returns the AND clauses.
    pub fn and_clauses(&self) -> &[Clause] {
        &self.and
    }

    /// Returns the OR clauses.
    pub fn or_clauses(&self) -> &[Clause] {
        &self.or
    }

    /// Returns the NOT clauses.
    pub fn not_clauses(&self) -> &[Clause] {
        &self.not
    }

    /// Returns `true` if this filter has no clauses (matches everything).
    pub fn is_empty(&self) -> bool {
        self.and.is_empty() && self.or.is_empty() && self.not.is_empty()
    }

    /// Every clause, regardless of group.
    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.and.iter().chain(&self.or).chain(&self.not)
    }

    /// Tests an item using an explicit accessor.
    pub fn matches_with<T, F>(&self, item: &T, accessor: F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        let hit = |clause: &Clause| clause.matches(&accessor(item, &clause.field));

        self.and.iter().all(hit)
            && (self.or.is_empty() || self.or.iter().any(hit))
            && !self.not.iter().any(hit)
    }

    /// Tests a [`Seekable`] entity.
    ///
    /// This is the matcher to hand to a
    /// [`SearchController`](crate::SearchController) when the filter type is
    /// `ClauseFilter`.
    pub fn is_match<T: Seekable>(item: &T, filter: &ClauseFilter) -> bool {
        filter.matches_with(item, T::accessor)
    }
}

/// Case-insensitive text predicate.
///
/// Serializes externally tagged: `{"contains": "potion"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextMatch {
    /// Text contains the needle.
    Contains(String),
    /// Text equals the needle.
    Equals(String),
    /// Text starts with the needle.
    StartsWith(String),
    /// Text ends with the needle.
    EndsWith(String),
}

impl TextMatch {
    /// Tests `text`, ignoring case. An empty needle matches everything.
    pub fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        match self {
            TextMatch::Contains(needle) => text.contains(&needle.to_lowercase()),
            TextMatch::Equals(needle) => text == needle.to_lowercase(),
            TextMatch::StartsWith(needle) => text.starts_with(&needle.to_lowercase()),
            TextMatch::EndsWith(needle) => text.ends_with(&needle.to_lowercase()),
        }
    }
}

/// Inclusive range with optional bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Range<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T: PartialOrd> Range<T> {
    /// Creates a range with both bounds.
    pub fn between(min: T, max: T) -> Self {
        Range {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Returns `true` if `value` lies within the bounds that are set.
    pub fn contains(&self, value: &T) -> bool {
        self.min.as_ref().map_or(true, |min| value >= min)
            && self.max.as_ref().map_or(true, |max| value <= max)
    }
}

/// `None` filters match everything.
pub fn optional_match<P: ?Sized>(predicate: Option<&P>, test: impl FnOnce(&P) -> bool) -> bool {
    predicate.map_or(true, test)
}
