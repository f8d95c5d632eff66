//! Entity tables loaded from a database snapshot.
//!
//! A snapshot is one JSON document holding every table the admin tool
//! searches. It is read once, on first use, and the derived tables are shared
//! by every search afterwards.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use rathena_search::EntitySource;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::entity::{
    Item, ItemDrop, MapInfo, Monster, MonsterSpawn, Mvp, Skill, VendorItem, Warp,
};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot {path} is not valid: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The raw snapshot document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Snapshot {
    pub items: Vec<Item>,
    pub monsters: Vec<Monster>,
    pub maps: Vec<MapInfo>,
    pub spawns: Vec<MonsterSpawn>,
    pub warps: Vec<Warp>,
    pub vendors: Vec<VendorItem>,
    pub skills: Vec<Skill>,
}

/// Searchable tables built from a [`Snapshot`].
#[derive(Debug, Clone)]
pub struct Tables {
    pub items: Arc<[Item]>,
    pub monsters: Arc<[Monster]>,
    pub maps: Arc<[MapInfo]>,
    pub drops: Arc<[ItemDrop]>,
    pub spawns: Arc<[MonsterSpawn]>,
    pub mvps: Arc<[Mvp]>,
    pub warps: Arc<[Warp]>,
    pub vendors: Arc<[VendorItem]>,
    pub skills: Arc<[Skill]>,
}

impl Tables {
    /// Resolves item prices, numbers spawns and warps, and derives the drop
    /// and MVP tables.
    pub fn build(snapshot: Snapshot, trade_scale: f64) -> Self {
        let mut items = snapshot.items;
        for item in &mut items {
            item.resolve_trade_prices(trade_scale);
        }
        let drops = ItemDrop::derive(&snapshot.monsters, &items);

        let mut spawns = snapshot.spawns;
        MonsterSpawn::assign_ids(&mut spawns);
        let mvps = Mvp::derive(&snapshot.monsters, &spawns);
        let mut warps = snapshot.warps;
        Warp::assign_ids(&mut warps);

        Tables {
            items: items.into(),
            monsters: snapshot.monsters.into(),
            maps: snapshot.maps.into(),
            drops: drops.into(),
            spawns: spawns.into(),
            mvps: mvps.into(),
            warps: warps.into(),
            vendors: snapshot.vendors.into(),
            skills: snapshot.skills.into(),
        }
    }
}

/// Lazily loads and memoizes the tables of one snapshot file.
#[derive(Debug)]
pub struct SnapshotRepository {
    path: PathBuf,
    trade_scale: f64,
    tables: OnceCell<Arc<Tables>>,
}

impl SnapshotRepository {
    /// Repository reading `path` on first use.
    pub fn open(path: impl Into<PathBuf>, trade_scale: f64) -> Self {
        SnapshotRepository {
            path: path.into(),
            trade_scale,
            tables: OnceCell::new(),
        }
    }

    /// Repository over an in-memory snapshot.
    pub fn from_snapshot(snapshot: Snapshot, trade_scale: f64) -> Self {
        let tables = Arc::new(Tables::build(snapshot, trade_scale));
        SnapshotRepository {
            path: PathBuf::new(),
            trade_scale,
            tables: OnceCell::new_with(Some(tables)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The tables, loading the snapshot if this is the first call.
    ///
    /// A failed load is not cached; the next call tries again.
    pub async fn tables(&self) -> Result<Arc<Tables>, RepositoryError> {
        self.tables
            .get_or_try_init(|| self.load())
            .await
            .map(Arc::clone)
    }

    async fn load(&self) -> Result<Arc<Tables>, RepositoryError> {
        debug!(path = %self.path.display(), "loading snapshot");
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| RepositoryError::Io {
                path: self.path.clone(),
                source,
            })?;
        let snapshot: Snapshot =
            serde_json::from_str(&text).map_err(|source| RepositoryError::Parse {
                path: self.path.clone(),
                source,
            })?;

        let tables = Tables::build(snapshot, self.trade_scale);
        info!(
            path = %self.path.display(),
            items = tables.items.len(),
            monsters = tables.monsters.len(),
            maps = tables.maps.len(),
            drops = tables.drops.len(),
            spawns = tables.spawns.len(),
            mvps = tables.mvps.len(),
            warps = tables.warps.len(),
            vendors = tables.vendors.len(),
            skills = tables.skills.len(),
            "snapshot loaded"
        );
        Ok(Arc::new(tables))
    }
}

/// One table of a [`SnapshotRepository`] as a search source.
pub struct TableSource<E> {
    repository: Arc<SnapshotRepository>,
    select: fn(&Tables) -> Arc<[E]>,
}

impl<E> TableSource<E> {
    pub fn new(repository: Arc<SnapshotRepository>, select: fn(&Tables) -> Arc<[E]>) -> Self {
        TableSource { repository, select }
    }
}

#[async_trait]
impl<E> EntitySource<E> for TableSource<E>
where
    E: Send + Sync + 'static,
{
    type Error = RepositoryError;

    async fn entities(&self) -> Result<Arc<[E]>, RepositoryError> {
        let tables = self.repository.tables().await?;
        Ok((self.select)(&tables))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot() -> serde_json::Value {
        json!({
            "items": [
                {"id": 909, "aegisName": "Jellopy", "name": "Jellopy", "type": "Etc", "buy": 6},
                {"id": 984, "aegisName": "Oridecon", "name": "Oridecon", "type": "Etc", "sell": 12500},
            ],
            "monsters": [{
                "id": 1002, "aegisName": "PORING", "name": "Poring",
                "race": "Plant", "element": "Water", "size": "Medium",
                "drops": [{"item": "Jellopy", "rate": 7000}],
            }, {
                "id": 1039, "aegisName": "BAPHOMET", "name": "Baphomet",
                "race": "Demon", "element": "Shadow", "size": "Large", "mvp": true,
            }],
            "maps": [{"id": "prontera", "name": "prontera"}],
            "spawns": [
                {"map": "prt_fild08", "name": "Poring", "monsterId": 1002, "amount": 60},
                {"map": "prt_maze03", "name": "Baphomet", "monsterId": 1039, "amount": 1,
                 "spawnDelay": 7200000},
            ],
            "warps": [{"fromMap": "prontera", "toMap": "prt_fild08"}],
        })
    }

    fn write_snapshot(dir: &tempfile::TempDir, value: &serde_json::Value) -> PathBuf {
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, value.to_string()).unwrap();
        path
    }

    #[test]
    fn build_resolves_prices_and_drops() {
        let snapshot: Snapshot = serde_json::from_value(snapshot()).unwrap();
        let tables = Tables::build(snapshot, 2.0);

        assert_eq!(tables.items[0].sell, Some(3.0));
        assert_eq!(tables.items[1].buy, Some(25_000.0));
        assert_eq!(tables.drops.len(), 1);
        assert_eq!(tables.drops[0].item_id, 909);
        assert!(tables.vendors.is_empty());
    }

    #[test]
    fn build_numbers_spawns_and_derives_mvps() {
        let snapshot: Snapshot = serde_json::from_value(snapshot()).unwrap();
        let tables = Tables::build(snapshot, 2.0);

        assert_eq!(tables.spawns[1].id, 1);
        assert_eq!(tables.warps[0].to_map, "prt_fild08");
        assert_eq!(tables.mvps.len(), 1);
        assert_eq!(tables.mvps[0].id, "1039_prt_maze03");
        assert_eq!(tables.mvps[0].spawn_delay, 7_200_000);
    }

    #[tokio::test]
    async fn loads_once_and_shares_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_snapshot(&dir, &snapshot());
        let repository = SnapshotRepository::open(&path, 2.0);

        let first = repository.tables().await.unwrap();
        std::fs::remove_file(&path).unwrap();
        let second = repository.tables().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.maps[0].id, "prontera");
    }

    #[tokio::test]
    async fn failed_loads_are_retried() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let repository = SnapshotRepository::open(&path, 2.0);

        let err = repository.tables().await.unwrap_err();
        assert!(matches!(err, RepositoryError::Io { .. }));

        std::fs::write(&path, "{\"items\": 3}").unwrap();
        let err = repository.tables().await.unwrap_err();
        assert!(matches!(err, RepositoryError::Parse { .. }));

        write_snapshot(&dir, &snapshot());
        assert_eq!(repository.tables().await.unwrap().items.len(), 2);
    }

    #[tokio::test]
    async fn table_sources_select_one_table() {
        let snapshot: Snapshot = serde_json::from_value(snapshot()).unwrap();
        let repository = Arc::new(SnapshotRepository::from_snapshot(snapshot, 2.0));
        let monsters = TableSource::new(repository, |tables| Arc::clone(&tables.monsters));

        let rows = monsters.entities().await.unwrap();
        assert_eq!(rows[0].name, "Poring");
    }
}
