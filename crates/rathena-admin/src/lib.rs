//! # rathena-admin - searching rAthena databases
//!
//! The admin tool lists items, monsters, maps, drops, monster spawns, MVPs,
//! warps, shop items and skills from a database snapshot. Every list goes
//! through the same search engine from `rathena-search`:
//!
//! - [`entity`]: the searchable records and their filter forms.
//! - [`repository`]: loads a JSON snapshot once and derives the tables.
//! - [`service`]: one validated search endpoint per [`EntityKind`].
//! - [`grid`]: the list page model, driven by the search page contract of
//!   `rathena-search-test` in this crate's tests.
//!
//! ```no_run
//! use std::sync::Arc;
//! use rathena_admin::{EntityKind, SearchService, SnapshotRepository};
//! use rathena_search::SearchConfig;
//!
//! # async fn run() -> Result<(), rathena_admin::ServiceError> {
//! let repository = Arc::new(SnapshotRepository::open("snapshot.json", 2.0));
//! let service = SearchService::new(repository, &SearchConfig::default());
//!
//! let result = service
//!     .search_json(EntityKind::Item, r#"{"filter": {"name": {"contains": "potion"}}}"#)
//!     .await?;
//! println!("{} potions", result["total"]);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod entity;
pub mod grid;
pub mod logging;
pub mod repository;
pub mod service;

pub use config::{AdminConfig, ConfigError};
pub use grid::{GridError, GridLayout, GridPage};
pub use repository::{RepositoryError, Snapshot, SnapshotRepository, Tables};
pub use service::{EntityKind, SearchService, ServiceError};
