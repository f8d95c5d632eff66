//! The search endpoints of the admin tool.
//!
//! Every entity kind gets a [`SearchDefinition`] guarding the wire format and
//! a [`SearchController`] running the query over the kind's snapshot table.
//! Requests travel as JSON text: [`SearchService::search_json`] parses and
//! validates the query, runs it, then validates the result before handing it
//! back.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use clap::ValueEnum;
use rathena_search::{SearchConfig, SearchController, SearchDefinition, Seekable, ValidationError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use thiserror::Error;
use tracing::{debug, warn};

use crate::entity::{
    is_match, DropFilter, EntityFilter, Item, ItemDrop, ItemFilter, MapFilter, MapInfo, Monster,
    MonsterFilter, MonsterSpawn, Mvp, MvpFilter, Skill, SkillFilter, SpawnFilter, VendorFilter,
    VendorItem, Warp, WarpFilter,
};
use crate::repository::{RepositoryError, SnapshotRepository, TableSource, Tables};

/// The searchable entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Item,
    Monster,
    Map,
    Drop,
    Spawn,
    Mvp,
    Warp,
    Vendor,
    Skill,
}

impl EntityKind {
    pub const ALL: [EntityKind; 9] = [
        EntityKind::Item,
        EntityKind::Monster,
        EntityKind::Map,
        EntityKind::Drop,
        EntityKind::Spawn,
        EntityKind::Mvp,
        EntityKind::Warp,
        EntityKind::Vendor,
        EntityKind::Skill,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Item => "item",
            EntityKind::Monster => "monster",
            EntityKind::Map => "map",
            EntityKind::Drop => "drop",
            EntityKind::Spawn => "spawn",
            EntityKind::Mvp => "mvp",
            EntityKind::Warp => "warp",
            EntityKind::Vendor => "vendor",
            EntityKind::Skill => "skill",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected or failed search call.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request did not satisfy the query contract.
    #[error("invalid {kind} search: {source}")]
    Argument {
        kind: EntityKind,
        #[source]
        source: ValidationError,
    },

    /// The entities could not be loaded.
    #[error("{kind} search failed: {source}")]
    Repository {
        kind: EntityKind,
        #[source]
        source: RepositoryError,
    },

    /// The response did not satisfy the result contract.
    #[error("invalid {kind} search result: {source}")]
    Result {
        kind: EntityKind,
        #[source]
        source: ValidationError,
    },
}

impl ServiceError {
    /// HTTP-style status: 400 for rejected requests, 500 otherwise.
    pub fn status(&self) -> u16 {
        match self {
            ServiceError::Argument { .. } => 400,
            ServiceError::Repository { .. } | ServiceError::Result { .. } => 500,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            ServiceError::Argument { kind, .. }
            | ServiceError::Repository { kind, .. }
            | ServiceError::Result { kind, .. } => *kind,
        }
    }
}

type Matcher<E, F> = fn(&E, &F) -> bool;

#[async_trait]
trait SearchEndpoint: Send + Sync {
    async fn call(&self, body: &str) -> Result<Json, ServiceError>;

    fn sort_fields(&self) -> &[String];

    fn query_schema(&self) -> Json;

    fn result_schema(&self) -> Json;
}

struct Endpoint<E, F> {
    kind: EntityKind,
    definition: SearchDefinition<E, F>,
    controller: SearchController<E, F, TableSource<E>, Matcher<E, F>>,
}

impl<E, F> Endpoint<E, F>
where
    E: Seekable + Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
    F: EntityFilter<E>,
{
    fn new(
        kind: EntityKind,
        repository: &Arc<SnapshotRepository>,
        select: fn(&Tables) -> Arc<[E]>,
        config: &SearchConfig,
    ) -> Self {
        let source = TableSource::new(Arc::clone(repository), select);
        Endpoint {
            kind,
            definition: SearchDefinition::new(kind.as_str()),
            controller: SearchController::with_config(
                source,
                is_match::<E, F> as Matcher<E, F>,
                config,
            ),
        }
    }
}

#[async_trait]
impl<E, F> SearchEndpoint for Endpoint<E, F>
where
    E: Seekable + Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
    F: EntityFilter<E>,
{
    async fn call(&self, body: &str) -> Result<Json, ServiceError> {
        let kind = self.kind;
        let query = self.definition.parse_query(body).map_err(|source| {
            warn!(%kind, error = %source, "rejected search query");
            ServiceError::Argument { kind, source }
        })?;

        let result = self.controller.search(&query).await.map_err(|source| {
            warn!(%kind, error = %source, "search source failed");
            ServiceError::Repository { kind, source }
        })?;
        debug!(%kind, total = result.total, returned = result.len(), "search completed");

        self.definition.validate_result(&result).map_err(|source| {
            warn!(%kind, error = %source, "rejected search result");
            ServiceError::Result { kind, source }
        })
    }

    fn sort_fields(&self) -> &[String] {
        self.definition.sort_fields()
    }

    fn query_schema(&self) -> Json {
        self.definition.query_schema()
    }

    fn result_schema(&self) -> Json {
        self.definition.result_schema()
    }
}

/// Search endpoints for every [`EntityKind`] over one snapshot.
pub struct SearchService {
    repository: Arc<SnapshotRepository>,
    items: Endpoint<Item, ItemFilter>,
    monsters: Endpoint<Monster, MonsterFilter>,
    maps: Endpoint<MapInfo, MapFilter>,
    drops: Endpoint<ItemDrop, DropFilter>,
    spawns: Endpoint<MonsterSpawn, SpawnFilter>,
    mvps: Endpoint<Mvp, MvpFilter>,
    warps: Endpoint<Warp, WarpFilter>,
    vendors: Endpoint<VendorItem, VendorFilter>,
    skills: Endpoint<Skill, SkillFilter>,
}

impl SearchService {
    pub fn new(repository: Arc<SnapshotRepository>, config: &SearchConfig) -> Self {
        SearchService {
            items: Endpoint::new(EntityKind::Item, &repository, |t| Arc::clone(&t.items), config),
            monsters: Endpoint::new(
                EntityKind::Monster,
                &repository,
                |t| Arc::clone(&t.monsters),
                config,
            ),
            maps: Endpoint::new(EntityKind::Map, &repository, |t| Arc::clone(&t.maps), config),
            drops: Endpoint::new(EntityKind::Drop, &repository, |t| Arc::clone(&t.drops), config),
            spawns: Endpoint::new(
                EntityKind::Spawn,
                &repository,
                |t| Arc::clone(&t.spawns),
                config,
            ),
            mvps: Endpoint::new(EntityKind::Mvp, &repository, |t| Arc::clone(&t.mvps), config),
            warps: Endpoint::new(EntityKind::Warp, &repository, |t| Arc::clone(&t.warps), config),
            vendors: Endpoint::new(
                EntityKind::Vendor,
                &repository,
                |t| Arc::clone(&t.vendors),
                config,
            ),
            skills: Endpoint::new(
                EntityKind::Skill,
                &repository,
                |t| Arc::clone(&t.skills),
                config,
            ),
            repository,
        }
    }

    pub fn repository(&self) -> &Arc<SnapshotRepository> {
        &self.repository
    }

    fn endpoint(&self, kind: EntityKind) -> &dyn SearchEndpoint {
        match kind {
            EntityKind::Item => &self.items,
            EntityKind::Monster => &self.monsters,
            EntityKind::Map => &self.maps,
            EntityKind::Drop => &self.drops,
            EntityKind::Spawn => &self.spawns,
            EntityKind::Mvp => &self.mvps,
            EntityKind::Warp => &self.warps,
            EntityKind::Vendor => &self.vendors,
            EntityKind::Skill => &self.skills,
        }
    }

    /// Runs a JSON search request and returns the JSON result.
    pub async fn search_json(&self, kind: EntityKind, body: &str) -> Result<Json, ServiceError> {
        self.endpoint(kind).call(body).await
    }

    /// Paths the kind can be sorted by.
    pub fn sort_fields(&self, kind: EntityKind) -> &[String] {
        self.endpoint(kind).sort_fields()
    }

    pub fn query_schema(&self, kind: EntityKind) -> Json {
        self.endpoint(kind).query_schema()
    }

    pub fn result_schema(&self, kind: EntityKind) -> Json {
        self.endpoint(kind).result_schema()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Snapshot;
    use serde_json::json;

    fn service() -> SearchService {
        let snapshot: Snapshot = serde_json::from_value(json!({
            "items": [
                {"id": 501, "aegisName": "Red_Potion", "name": "Red Potion", "type": "Healing", "buy": 50, "weight": 7},
                {"id": 502, "aegisName": "Orange_Potion", "name": "Orange Potion", "type": "Healing", "buy": 200, "weight": 10},
                {"id": 1201, "aegisName": "Knife", "name": "Knife", "type": "Weapon", "buy": 50, "weight": 400, "slots": 3},
            ],
            "maps": [
                {"id": "prontera", "name": "prontera"},
                {"id": "prt_fild01", "name": "prt_fild01"},
            ],
        }))
        .unwrap();
        let repository = Arc::new(SnapshotRepository::from_snapshot(snapshot, 2.0));
        SearchService::new(repository, &SearchConfig::default())
    }

    #[tokio::test]
    async fn searches_filter_sort_and_page() {
        let service = service();
        let body = json!({
            "filter": {"name": {"contains": "potion"}},
            "sort": [{"field": "weight", "sort": "desc"}],
            "limit": 1,
        });

        let result = service
            .search_json(EntityKind::Item, &body.to_string())
            .await
            .unwrap();

        assert_eq!(result["total"], 2);
        assert_eq!(result["entities"][0]["name"], "Orange Potion");
        assert_eq!(result["entities"][0]["sell"], 100.0);
        assert_eq!(result["entities"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn empty_body_object_lists_everything() {
        let result = service().search_json(EntityKind::Map, "{}").await.unwrap();
        assert_eq!(result["total"], 2);
    }

    #[tokio::test]
    async fn bad_requests_are_argument_errors() {
        let service = service();

        for body in [
            "not json",
            "[]",
            r#"{"sort": [{"field": "colour", "sort": "asc"}]}"#,
            r#"{"filter": {"colour": "red"}}"#,
            r#"{"offset": "1"}"#,
            r#"{"page": 2}"#,
        ] {
            let err = service.search_json(EntityKind::Item, body).await.unwrap_err();
            assert_eq!(err.status(), 400, "{body}");
            assert_eq!(err.kind(), EntityKind::Item);
        }
    }

    #[tokio::test]
    async fn any_numeric_pagination_is_clamped() {
        let service = service();

        for (body, returned) in [
            (r#"{"limit": 10.0}"#, 2),
            (r#"{"limit": 1.5}"#, 1),
            (r#"{"offset": 1e3}"#, 0),
            (r#"{"limit": 1e20}"#, 2),
            (r#"{"limit": 99999999999999999999}"#, 2),
        ] {
            let result = service.search_json(EntityKind::Map, body).await.unwrap();
            assert_eq!(result["total"], 2, "{body}");
            assert_eq!(result["entities"].as_array().map(Vec::len), Some(returned), "{body}");
        }
    }

    #[tokio::test]
    async fn repository_failures_are_server_errors() {
        let repository = Arc::new(SnapshotRepository::open("/nonexistent/snapshot.json", 2.0));
        let service = SearchService::new(repository, &SearchConfig::default());

        let err = service.search_json(EntityKind::Skill, "{}").await.unwrap_err();
        assert_eq!(err.status(), 500);
        assert!(matches!(err, ServiceError::Repository { .. }));
    }

    #[test]
    fn sort_fields_come_from_entity_paths() {
        let service = service();

        assert!(service.sort_fields(EntityKind::Monster).contains(&"stats.level".to_string()));
        assert_eq!(service.sort_fields(EntityKind::Map), MapInfo::field_paths().as_slice());
        assert_eq!(service.query_schema(EntityKind::Drop)["title"], "drop search query");
    }
}
