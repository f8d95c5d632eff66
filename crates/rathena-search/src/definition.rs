//! Typed search contracts and their validation at the wire boundary.
//!
//! A [`SearchDefinition`] pairs an entity type with a filter type and turns
//! untrusted JSON into a [`SearchQuery`] the controller can run. Everything a
//! caller can get wrong is rejected here: malformed JSON, unknown keys, a
//! filter of the wrong shape, non-numeric offsets, and sort entries naming
//! paths the entity does not have. Numeric offsets and limits are never
//! rejected; the controller clamps them.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value as Json};

use crate::accessor::Seekable;
use crate::error::ValidationError;
use crate::filter::ClauseFilter;
use crate::query::{SearchQuery, SearchResult};

type FilterCheck<F> = Box<dyn Fn(&F) -> Result<(), String> + Send + Sync>;

/// The search contract of one entity kind.
///
/// Sort fields default to every path in [`Seekable::field_paths`].
///
/// ```
/// use rathena_search::{Number, SearchDefinition, Seekable, ValidationError, Value};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Serialize, Deserialize)]
/// struct MapInfo {
///     id: String,
///     width: u16,
/// }
///
/// impl Seekable for MapInfo {
///     fn seeker_field_value(&self, path: &str) -> Value<'_> {
///         match path {
///             "id" => Value::String(&self.id),
///             "width" => Value::Number(Number::from(self.width)),
///             _ => Value::None,
///         }
///     }
///
///     fn field_paths() -> Vec<String> {
///         vec!["id".into(), "width".into()]
///     }
/// }
///
/// let maps = SearchDefinition::<MapInfo, serde_json::Value>::new("map");
///
/// let query = maps.parse_query(r#"{"sort": [{"field": "width", "sort": "desc"}]}"#).unwrap();
/// assert_eq!(query.sort_entries()[0].field, "width");
///
/// let err = maps.parse_query(r#"{"sort": [{"field": "height", "sort": "asc"}]}"#).unwrap_err();
/// assert!(matches!(err, ValidationError::UnknownSortField { .. }));
/// ```
pub struct SearchDefinition<E, F> {
    entity: String,
    sort_fields: Vec<String>,
    filter_check: Option<FilterCheck<F>>,
    _marker: PhantomData<fn() -> E>,
}

impl<E, F> fmt::Debug for SearchDefinition<E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchDefinition")
            .field("entity", &self.entity)
            .field("sort_fields", &self.sort_fields)
            .field("filter_check", &self.filter_check.is_some())
            .finish()
    }
}

impl<E, F> SearchDefinition<E, F>
where
    E: Seekable + Serialize + DeserializeOwned,
    F: DeserializeOwned,
{
    /// Creates the contract for entity kind `entity`.
    pub fn new(entity: impl Into<String>) -> Self {
        SearchDefinition {
            entity: entity.into(),
            sort_fields: E::field_paths(),
            filter_check: None,
            _marker: PhantomData,
        }
    }

    /// Restricts sorting to `fields`.
    pub fn with_sort_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a semantic check run on every parsed filter.
    ///
    /// The check returns the reason a filter is rejected.
    pub fn with_filter_check<C>(mut self, check: C) -> Self
    where
        C: Fn(&F) -> Result<(), String> + Send + Sync + 'static,
    {
        self.filter_check = Some(Box::new(check));
        self
    }

    /// Entity kind this contract describes.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Paths a sort entry may name.
    pub fn sort_fields(&self) -> &[String] {
        &self.sort_fields
    }

    /// Parses and validates a raw request body.
    pub fn parse_query(&self, body: &str) -> Result<SearchQuery<F>, ValidationError> {
        let json: Json = serde_json::from_str(body).map_err(ValidationError::MalformedJson)?;
        self.validate_query(json)
    }

    /// Validates an already-decoded request.
    pub fn validate_query(&self, json: Json) -> Result<SearchQuery<F>, ValidationError> {
        if !json.is_object() {
            return Err(ValidationError::NotAnObject);
        }
        let query: SearchQuery<F> = serde_json::from_value(json).map_err(ValidationError::Query)?;
        self.check_query(&query)?;
        Ok(query)
    }

    /// Runs the checks serde cannot express: sort paths and the filter check.
    pub fn check_query(&self, query: &SearchQuery<F>) -> Result<(), ValidationError> {
        if let Some(entry) = query
            .sort_entries()
            .iter()
            .find(|entry| !self.sort_fields.contains(&entry.field))
        {
            return Err(ValidationError::UnknownSortField {
                entity: self.entity.clone(),
                field: entry.field.clone(),
            });
        }

        if let (Some(check), Some(filter)) = (&self.filter_check, &query.filter) {
            check(filter).map_err(|reason| ValidationError::Filter {
                entity: self.entity.clone(),
                reason,
            })?;
        }

        Ok(())
    }

    /// Serializes a result and checks it against the result shape.
    pub fn validate_result(&self, result: &SearchResult<E>) -> Result<Json, ValidationError> {
        let json = serde_json::to_value(result).map_err(ValidationError::Serialize)?;
        serde_json::from_value::<SearchResult<E>>(json.clone()).map_err(ValidationError::Result)?;
        Ok(json)
    }

    /// Decodes a result received from elsewhere.
    pub fn parse_result(&self, json: Json) -> Result<SearchResult<E>, ValidationError> {
        serde_json::from_value(json).map_err(ValidationError::Result)
    }

    /// JSON Schema describing accepted queries.
    pub fn query_schema(&self) -> Json {
        json!({
            "title": format!("{} search query", self.entity),
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "filter": {"type": "object"},
                "sort": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "additionalProperties": false,
                        "required": ["field", "sort"],
                        "properties": {
                            "field": {"enum": self.sort_fields},
                            "sort": {"enum": ["asc", "desc"]},
                        },
                    },
                },
                "offset": {"type": "number"},
                "limit": {"type": "number"},
            },
        })
    }

    /// JSON Schema describing results.
    pub fn result_schema(&self) -> Json {
        json!({
            "title": format!("{} search result", self.entity),
            "type": "object",
            "additionalProperties": false,
            "required": ["total", "entities"],
            "properties": {
                "total": {"type": "integer", "minimum": 0},
                "entities": {"type": "array", "items": {"type": "object"}},
            },
        })
    }
}

impl<E> SearchDefinition<E, ClauseFilter>
where
    E: Seekable + Serialize + DeserializeOwned,
{
    /// Contract whose filter is a [`ClauseFilter`] over the entity's own paths.
    ///
    /// Clauses naming unknown paths are rejected.
    pub fn clause_search(entity: impl Into<String>) -> Self {
        let known = E::field_paths();
        SearchDefinition::new(entity).with_filter_check(move |filter: &ClauseFilter| {
            match filter.clauses().find(|clause| !known.contains(&clause.field)) {
                Some(clause) => Err(format!("unknown field '{}'", clause.field)),
                None => Ok(()),
            }
        })
    }
}
