//! Search request and response shapes.
//!
//! A [`SearchQuery`] is what callers send; a [`SearchResult`] is what the
//! controller answers. Both are parametrized by the entity or filter type
//! so each entity kind gets its own typed contract from the same code.

use std::{fmt, ops};

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::compare::{Dir, SortEntry};

/// Ordered list of sort keys. The first entry is the primary key.
///
/// Order is significant and duplicates are kept; a repeated field never
/// changes the outcome because the earlier entry already decided the tie.
pub type SortSpec = Vec<SortEntry>;

/// A search request.
///
/// Every field is optional: no filter matches everything, no sort keeps
/// collection order, no offset starts at zero and no limit means "as many
/// as the cap allows".
///
/// ```
/// use rathena_search::{Dir, SearchQuery};
///
/// let query: SearchQuery<()> = SearchQuery::new()
///     .sort_by("name", Dir::Desc)
///     .offset(20)
///     .limit(20);
///
/// assert_eq!(
///     serde_json::to_value(&query).unwrap(),
///     serde_json::json!({
///         "sort": [{"field": "name", "sort": "desc"}],
///         "offset": 20,
///         "limit": 20,
///     })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SearchQuery<F> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<F>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_window_bound"
    )]
    pub offset: Option<i64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_window_bound"
    )]
    pub limit: Option<i64>,
}

impl<F> Default for SearchQuery<F> {
    fn default() -> Self {
        SearchQuery {
            filter: None,
            sort: None,
            offset: None,
            limit: None,
        }
    }
}

impl<F> SearchQuery<F> {
    /// Creates an empty query.
    pub fn new() -> Self {
        SearchQuery::default()
    }

    /// Sets the filter.
    pub fn with_filter(mut self, filter: F) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Appends a sort key.
    pub fn sort_by(mut self, field: impl Into<String>, dir: Dir) -> Self {
        self.sort
            .get_or_insert_with(Vec::new)
            .push(SortEntry::new(field, dir));
        self
    }

    /// Sets the offset. Out-of-range values are clamped at search time.
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the limit. Out-of-range values are clamped at search time.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sort keys, empty when none were given.
    pub fn sort_entries(&self) -> &[SortEntry] {
        self.sort.as_deref().unwrap_or_default()
    }
}

/// A page of matching entities plus the total number of matches.
///
/// `total` counts every entity that passed the filter, before pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchResult<E> {
    pub total: usize,
    pub entities: Vec<E>,
}

impl<E> SearchResult<E> {
    /// Creates a result.
    pub fn new(total: usize, entities: Vec<E>) -> Self {
        SearchResult { total, entities }
    }

    /// Returns `true` if this page holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of entities on this page.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Transforms every entity, keeping `total`.
    pub fn map<U>(self, f: impl FnMut(E) -> U) -> SearchResult<U> {
        SearchResult {
            total: self.total,
            entities: self.entities.into_iter().map(f).collect(),
        }
    }
}

/// A clamped window into the sorted matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Page {
    /// Clamps a requested window against `len` matches and the limit cap.
    ///
    /// - `limit` is clamped to `[0, cap]`; absent means `cap`.
    /// - `offset` is clamped to `[0, len]`; absent means `0`.
    ///
    /// ```
    /// use rathena_search::Page;
    ///
    /// assert_eq!(Page::clamp(Some(-5), Some(1000), 60, 50), Page { offset: 0, limit: 50 });
    /// assert_eq!(Page::clamp(Some(160), None, 60, 50), Page { offset: 60, limit: 50 });
    /// ```
    pub fn clamp(offset: Option<i64>, limit: Option<i64>, len: usize, cap: usize) -> Page {
        let limit = limit.map_or(cap, |limit| to_usize(limit).min(cap));
        let offset = offset.map_or(0, |offset| to_usize(offset).min(len));
        Page { offset, limit }
    }

    /// Index range of this page within `len` matches.
    pub fn range(&self, len: usize) -> ops::Range<usize> {
        let start = self.offset.min(len);
        let end = start.saturating_add(self.limit).min(len);
        start..end
    }
}

fn to_usize(value: i64) -> usize {
    usize::try_from(value.max(0)).unwrap_or(usize::MAX)
}

/// Reads an offset or limit from any JSON number.
///
/// Fractions are truncated toward zero and magnitudes beyond `i64` saturate,
/// so every number reaches [`Page::clamp`]. Non-numbers are still rejected.
fn deserialize_window_bound<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct WindowBound;

    impl<'de> Visitor<'de> for WindowBound {
        type Value = Option<i64>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(value))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Some(i64::try_from(value).unwrap_or(i64::MAX)))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            // `as` saturates and maps NaN to 0
            Ok(Some(value.trunc() as i64))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_any(self)
        }
    }

    deserializer.deserialize_option(WindowBound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_is_a_valid_query() {
        let query: SearchQuery<serde_json::Value> = serde_json::from_value(json!({})).unwrap();
        assert_eq!(query, SearchQuery::new());
        assert!(query.sort_entries().is_empty());
    }

    #[test]
    fn deserializes_camel_case_wire_form() {
        let query: SearchQuery<serde_json::Value> = serde_json::from_value(json!({
            "filter": {"name": {"contains": "potion"}},
            "sort": [{"field": "id", "sort": "asc"}, {"field": "name", "sort": "desc"}],
            "offset": 40,
            "limit": 20,
        }))
        .unwrap();

        assert_eq!(query.filter, Some(json!({"name": {"contains": "potion"}})));
        assert_eq!(
            query.sort_entries(),
            &[SortEntry::asc("id"), SortEntry::desc("name")]
        );
        assert_eq!(query.offset, Some(40));
        assert_eq!(query.limit, Some(20));
    }

    #[test]
    fn any_json_number_is_a_window_bound() {
        let parse = |text: &str| serde_json::from_str::<SearchQuery<()>>(text).unwrap();

        assert_eq!(parse(r#"{"limit": 10.0}"#).limit, Some(10));
        assert_eq!(parse(r#"{"offset": 1e3}"#).offset, Some(1000));
        assert_eq!(parse(r#"{"limit": 1.5, "offset": -0.5}"#).limit, Some(1));
        assert_eq!(parse(r#"{"offset": -0.5}"#).offset, Some(0));
        assert_eq!(parse(r#"{"limit": 1e20}"#).limit, Some(i64::MAX));
        assert_eq!(parse(r#"{"limit": 99999999999999999999}"#).limit, Some(i64::MAX));
        assert_eq!(parse(r#"{"offset": -1e20}"#).offset, Some(i64::MIN));
        assert_eq!(parse(r#"{"offset": null}"#).offset, None);
        assert_eq!(
            Page::clamp(Some(i64::MIN), Some(i64::MAX), 60, 50),
            Page { offset: 0, limit: 50 }
        );
    }

    #[test]
    fn rejects_unknown_keys_and_non_numbers() {
        let unknown = serde_json::from_value::<SearchQuery<()>>(json!({"page": 2}));
        assert!(unknown.is_err());

        let text = serde_json::from_value::<SearchQuery<()>>(json!({"limit": "20"}));
        assert!(text.is_err());

        let bad_dir = serde_json::from_value::<SearchQuery<()>>(
            json!({"sort": [{"field": "id", "sort": "up"}]}),
        );
        assert!(bad_dir.is_err());
    }

    #[test]
    fn builder_keeps_duplicate_sort_keys() {
        let query: SearchQuery<()> = SearchQuery::new()
            .sort_by("name", Dir::Asc)
            .sort_by("name", Dir::Desc);
        assert_eq!(query.sort_entries().len(), 2);
    }

    #[test]
    fn result_map_keeps_total() {
        let result = SearchResult::new(7, vec![1, 2, 3]).map(|n| n * 10);
        assert_eq!(result.total, 7);
        assert_eq!(result.entities, vec![10, 20, 30]);
        assert_eq!(result.len(), 3);
        assert!(!result.is_empty());
    }

    #[test]
    fn page_clamping() {
        assert_eq!(Page::clamp(None, None, 60, 50), Page { offset: 0, limit: 50 });
        assert_eq!(Page::clamp(Some(50), None, 60, 50), Page { offset: 50, limit: 50 });
        assert_eq!(Page::clamp(None, Some(-1), 60, 50), Page { offset: 0, limit: 0 });
        assert_eq!(
            Page::clamp(Some(i64::MAX), Some(i64::MAX), 3, 50),
            Page { offset: 3, limit: 50 }
        );
    }

    #[test]
    fn page_range_never_exceeds_len() {
        assert_eq!(Page { offset: 50, limit: 50 }.range(60), 50..60);
        assert_eq!(Page { offset: 0, limit: 20 }.range(60), 0..20);
        assert_eq!(Page { offset: 60, limit: 50 }.range(60), 60..60);
        assert_eq!(Page { offset: usize::MAX, limit: usize::MAX }.range(5), 5..5);
    }
}
