//! Generic search, sort and paginate engine for in-memory entity collections.
//!
//! Every list page of the admin tool (items, monsters, maps, drops, vendors,
//! skills) speaks the same contract: a [`SearchQuery`] with an optional
//! filter, a sort list, an offset and a limit, answered by a
//! [`SearchResult`] holding one page of entities and the total match count.
//!
//! - [`compare_to`] is the total order sorting is built on.
//! - [`Seekable`] resolves dotted field paths (`"stats.level"`) on an entity.
//! - [`SearchController`] runs filter, stable sort and clamped pagination.
//! - [`SearchDefinition`] validates untrusted JSON into typed queries.
//! - [`ClauseFilter`], [`TextMatch`] and [`Range`] build filters.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use rathena_search::{ClauseFilter, Number, SearchController, SearchQuery, Seekable, Value};
//!
//! #[derive(Clone)]
//! struct Item {
//!     name: String,
//!     weight: u32,
//! }
//!
//! impl Seekable for Item {
//!     fn seeker_field_value(&self, path: &str) -> Value<'_> {
//!         match path {
//!             "name" => Value::String(&self.name),
//!             "weight" => Value::Number(Number::from(self.weight)),
//!             _ => Value::None,
//!         }
//!     }
//!
//!     fn field_paths() -> Vec<String> {
//!         vec!["name".into(), "weight".into()]
//!     }
//! }
//!
//! let items: Arc<[Item]> = Arc::from(vec![
//!     Item { name: "Red Potion".into(), weight: 7 },
//!     Item { name: "Sword".into(), weight: 500 },
//! ]);
//!
//! let controller = SearchController::new(items, ClauseFilter::is_match::<Item>);
//! let query = SearchQuery::new().with_filter(ClauseFilter::new().and_icontains("name", "potion"));
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let result = controller.search(&query).await.unwrap();
//! assert_eq!(result.total, 1);
//! assert_eq!(result.entities[0].name, "Red Potion");
//! # });
//! ```
//!
//! # Ordering
//!
//! | Left | Right | Order |
//! |------|-------|-------|
//! | absent | absent | equal |
//! | absent | defined | absent first |
//! | string | anything | both rendered as text, collated |
//! | number-like | number-like | numeric |
//!
//! Sorting is stable: entities whose keys compare equal keep their
//! collection order.

mod accessor;
mod clause;
mod compare;
mod config;
mod controller;
mod definition;
mod error;
mod filter;
mod op;
mod query;
mod value;

pub use accessor::{
    json_field_value, prefixed_paths, resolve_path, split_path, Seekable, SeekerEnum,
    SeekerTimestamp,
};
pub use clause::{Clause, ClauseValue};
pub use compare::{collate, compare_by_sort, compare_to, Dir, SortEntry};
pub use config::{SearchConfig, DEFAULT_LIMIT_CAP};
pub use controller::{execute, source_fn, EntitySource, FnSource, SearchController};
pub use definition::SearchDefinition;
pub use error::{Result, SeekerError, ValidationError};
pub use filter::{optional_match, ClauseFilter, Range, TextMatch};
pub use op::{Op, OperandFamily, UnknownOp};
pub use query::{Page, SearchQuery, SearchResult, SortSpec};
pub use value::{Number, Timestamp, Value};
