//! Path-based field access.
//!
//! Entities expose their searchable fields through the [`Seekable`] trait,
//! usually generated by `#[derive(Seekable)]` from `rathena-search-macros`.
//! Fields are addressed by dotted paths (`"stats.level"`); resolving a path
//! whose intermediate segment is absent yields [`Value::None`], never a panic.

use crate::value::{Number, Timestamp, Value};

/// Trait for entities that can be filtered and sorted by field path.
///
/// # Derive Usage
///
/// ```ignore
/// use rathena_search_macros::Seekable;
///
/// #[derive(Seekable)]
/// struct Monster {
///     #[seek(String)]
///     name: String,
///     #[seek(nested)]
///     stats: Stats,
///     #[seek(Number, optional)]
///     respawn_ms: Option<u64>,
/// }
///
/// assert_eq!(Monster::NAME, "name");
/// assert_eq!(Monster::STATS, "stats");
/// ```
///
/// # Manual Implementation
///
/// ```
/// use rathena_search::{Seekable, Value, Number};
///
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
/// ```
pub trait Seekable {
    /// Returns the value at `path`, or [`Value::None`] if any segment is
    /// absent or the path is unknown.
    fn seeker_field_value(&self, path: &str) -> Value<'_>;

    /// Every path [`seeker_field_value`](Seekable::seeker_field_value)
    /// resolves, nested paths included.
    fn field_paths() -> Vec<String>
    where
        Self: Sized;

    /// Static accessor function suitable for the sort and filter helpers.
    fn accessor<'a>(item: &'a Self, path: &str) -> Value<'a>
    where
        Self: Sized,
    {
        item.seeker_field_value(path)
    }
}

impl<T: Seekable> Seekable for Box<T> {
    fn seeker_field_value(&self, path: &str) -> Value<'_> {
        (**self).seeker_field_value(path)
    }

    fn field_paths() -> Vec<String> {
        T::field_paths()
    }
}

/// Resolves a dotted path on an entity.
pub fn resolve_path<'a, T: Seekable + ?Sized>(entity: &'a T, path: &str) -> Value<'a> {
    entity.seeker_field_value(path)
}

/// Splits a dotted path into its first segment and the remainder.
///
/// ```
/// use rathena_search::split_path;
///
/// assert_eq!(split_path("stats.level"), ("stats", Some("level")));
/// assert_eq!(split_path("name"), ("name", None));
/// ```
pub fn split_path(path: &str) -> (&str, Option<&str>) {
    match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    }
}

/// Prefixes every nested path with `prefix.`.
pub fn prefixed_paths(prefix: &str, paths: Vec<String>) -> impl Iterator<Item = String> + '_ {
    paths.into_iter().map(move |path| format!("{prefix}.{path}"))
}

/// Accessor for shape-less JSON entities.
///
/// Objects are traversed by key and arrays by numeric segment. Objects,
/// arrays and `null` at the end of the path resolve to [`Value::None`].
///
/// ```
/// use rathena_search::{json_field_value, Number, Value};
///
/// let monster = serde_json::json!({"name": "Poring", "stats": {"level": 1}});
/// assert_eq!(json_field_value(&monster, "stats.level"), Value::Number(Number::I64(1)));
/// assert_eq!(json_field_value(&monster, "stats.missing.deeper"), Value::None);
/// ```
pub fn json_field_value<'a>(json: &'a serde_json::Value, path: &str) -> Value<'a> {
    use serde_json::Value as Json;

    let mut current = json;
    for segment in path.split('.') {
        let next = match current {
            Json::Object(map) => map.get(segment),
            Json::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => return Value::None,
        }
    }

    match current {
        Json::String(s) => Value::String(s),
        Json::Number(n) => Number::from_json(n).map_or(Value::None, Value::Number),
        Json::Bool(b) => Value::Bool(*b),
        Json::Null | Json::Object(_) | Json::Array(_) => Value::None,
    }
}

/// Helper trait for converting enum types to their discriminant values.
///
/// Used by `#[derive(Seekable)]` for fields marked `#[seek(Enum)]`.
///
/// ```
/// use rathena_search::SeekerEnum;
///
/// #[derive(Clone, Copy)]
/// enum Element {
///     Neutral,
///     Water,
/// }
///
/// impl SeekerEnum for Element {
///     fn seeker_discriminant(&self) -> u32 {
///         match self {
///             Element::Neutral => 0,
///             Element::Water => 1,
///         }
///     }
/// }
/// ```
pub trait SeekerEnum {
    /// Stable discriminant identifying the variant.
    fn seeker_discriminant(&self) -> u32;
}

/// Helper trait for converting types to timestamps.
///
/// Used by `#[derive(Seekable)]` for fields marked `#[seek(Timestamp)]`.
pub trait SeekerTimestamp {
    /// Converts this value to a [`Timestamp`] for comparison.
    fn seeker_timestamp(&self) -> Timestamp;
}

impl SeekerTimestamp for i64 {
    fn seeker_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(*self)
    }
}

impl SeekerTimestamp for u64 {
    fn seeker_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(i64::try_from(*self).unwrap_or(i64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Stats {
        level: u32,
    }

    impl Seekable for Stats {
        fn seeker_field_value(&self, path: &str) -> Value<'_> {
            match path {
                "level" => Value::Number(Number::from(self.level)),
                _ => Value::None,
            }
        }

        fn field_paths() -> Vec<String> {
            vec!["level".into()]
        }
    }

    struct Monster {
        name: String,
        stats: Option<Stats>,
    }

    impl Seekable for Monster {
        fn seeker_field_value(&self, path: &str) -> Value<'_> {
            match split_path(path) {
                ("name", None) => Value::String(&self.name),
                ("stats", Some(rest)) => match &self.stats {
                    Some(stats) => stats.seeker_field_value(rest),
                    None => Value::None,
                },
                _ => Value::None,
            }
        }

        fn field_paths() -> Vec<String> {
            let mut paths = vec!["name".to_string()];
            paths.extend(prefixed_paths("stats", Stats::field_paths()));
            paths
        }
    }

    #[test]
    fn resolves_nested_paths() {
        let poring = Monster {
            name: "Poring".into(),
            stats: Some(Stats { level: 1 }),
        };

        assert_eq!(resolve_path(&poring, "name"), Value::String("Poring"));
        assert_eq!(
            resolve_path(&poring, "stats.level"),
            Value::Number(Number::U64(1))
        );
        assert_eq!(Monster::accessor(&poring, "stats.level").as_f64(), Some(1.0));
    }

    #[test]
    fn missing_intermediate_segment_is_none() {
        let ghost = Monster {
            name: "Ghost".into(),
            stats: None,
        };

        assert_eq!(resolve_path(&ghost, "stats.level"), Value::None);
        assert_eq!(resolve_path(&ghost, "stats"), Value::None);
        assert_eq!(resolve_path(&ghost, "name.length"), Value::None);
        assert_eq!(resolve_path(&ghost, ""), Value::None);
    }

    #[test]
    fn field_paths_include_nested() {
        assert_eq!(Monster::field_paths(), vec!["name", "stats.level"]);
        assert_eq!(<Box<Monster>>::field_paths(), Monster::field_paths());
    }

    #[test]
    fn json_accessor_walks_objects_and_arrays() {
        let item = json!({
            "name": "Red Potion",
            "sell": 25,
            "jobs": ["Novice", "Swordman"],
            "meta": {"tradable": true, "note": null},
        });

        assert_eq!(json_field_value(&item, "name"), Value::String("Red Potion"));
        assert_eq!(json_field_value(&item, "sell"), Value::Number(Number::I64(25)));
        assert_eq!(json_field_value(&item, "jobs.1"), Value::String("Swordman"));
        assert_eq!(json_field_value(&item, "jobs.9"), Value::None);
        assert_eq!(json_field_value(&item, "meta.tradable"), Value::Bool(true));
        assert_eq!(json_field_value(&item, "meta.note"), Value::None);
        assert_eq!(json_field_value(&item, "meta"), Value::None);
        assert_eq!(json_field_value(&item, "name.first"), Value::None);
    }

    #[test]
    fn timestamp_helpers() {
        assert_eq!(1000i64.seeker_timestamp(), Timestamp(1000));
        assert_eq!(u64::MAX.seeker_timestamp(), Timestamp(i64::MAX));
    }
}
