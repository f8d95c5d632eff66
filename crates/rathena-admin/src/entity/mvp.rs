use std::collections::{HashMap, HashSet};

use rathena_search::{optional_match, TextMatch};
use rathena_search_macros::Seekable;
use serde::{Deserialize, Serialize};

use super::{EntityFilter, Monster, MonsterSpawn};

/// A boss monster and a map it spawns on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Seekable)]
#[serde(rename_all = "camelCase")]
pub struct Mvp {
    /// Monster id and map, `"1039_prt_maze03"`.
    #[seek(String)]
    pub id: String,
    #[seek(Number, rename = "monsterId")]
    pub monster_id: u32,
    #[seek(String)]
    pub name: String,
    #[seek(String, rename = "mapId")]
    pub map_id: String,
    #[seek(String, rename = "mapName")]
    pub map_name: String,
    #[seek(Number, rename = "spawnDelay")]
    pub spawn_delay: u32,
    #[seek(Number, rename = "spawnWindow")]
    pub spawn_window: u32,
}

impl Mvp {
    pub fn id_of(monster: &Monster, spawn: &MonsterSpawn) -> String {
        format!("{}_{}", monster.id, spawn.map)
    }

    /// One entry per MVP monster and map, taken from its first spawn there.
    ///
    /// Spawns of monsters that are unknown or not MVPs are skipped. Entries
    /// keep the order of the spawns that created them.
    pub fn derive(monsters: &[Monster], spawns: &[MonsterSpawn]) -> Vec<Mvp> {
        let by_id: HashMap<u32, &Monster> = monsters.iter().map(|m| (m.id, m)).collect();

        let mut seen = HashSet::new();
        let mut mvps = Vec::new();
        for spawn in spawns {
            let Some(monster) = by_id.get(&spawn.monster_id).filter(|m| m.mvp) else {
                continue;
            };
            let id = Mvp::id_of(monster, spawn);
            if !seen.insert(id.clone()) {
                continue;
            }
            mvps.push(Mvp {
                id,
                monster_id: monster.id,
                name: monster.name.clone(),
                map_id: spawn.map.clone(),
                map_name: spawn.map.clone(),
                spawn_delay: spawn.spawn_delay,
                spawn_window: spawn.spawn_window,
            });
        }
        mvps
    }
}

/// The MVP search form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct MvpFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monster_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<TextMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_id: Option<TextMatch>,
}

impl EntityFilter<Mvp> for MvpFilter {
    fn matches(&self, mvp: &Mvp) -> bool {
        optional_match(self.monster_id.as_ref(), |id| mvp.monster_id == *id)
            && optional_match(self.name.as_ref(), |name| name.matches(&mvp.name))
            && optional_match(self.map_id.as_ref(), |map| map.matches(&mvp.map_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn monsters() -> Vec<Monster> {
        serde_json::from_value(json!([
            {"id": 1002, "aegisName": "PORING", "name": "Poring",
             "race": "Plant", "element": "Water", "size": "Medium"},
            {"id": 1039, "aegisName": "BAPHOMET", "name": "Baphomet",
             "race": "Demon", "element": "Shadow", "size": "Large", "mvp": true},
        ]))
        .unwrap()
    }

    fn spawns() -> Vec<MonsterSpawn> {
        let mut spawns: Vec<MonsterSpawn> = serde_json::from_value(json!([
            {"map": "prt_maze03", "name": "Poring", "monsterId": 1002, "amount": 5},
            {"map": "prt_maze03", "name": "Baphomet", "monsterId": 1039, "amount": 1,
             "spawnDelay": 7200000, "spawnWindow": 600000},
            {"map": "gef_dun02", "name": "Baphomet", "monsterId": 1039, "amount": 1,
             "spawnDelay": 3600000},
            {"map": "prt_maze03", "name": "Baphomet", "monsterId": 1039, "amount": 1,
             "spawnDelay": 60000},
            {"map": "prt_maze03", "name": "Ghost", "monsterId": 4242, "amount": 1},
        ]))
        .unwrap();
        MonsterSpawn::assign_ids(&mut spawns);
        spawns
    }

    #[test]
    fn one_entry_per_boss_and_map() {
        let mvps = Mvp::derive(&monsters(), &spawns());

        let summary: Vec<_> = mvps
            .iter()
            .map(|m| (m.id.as_str(), m.map_id.as_str(), m.spawn_delay))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("1039_prt_maze03", "prt_maze03", 7_200_000),
                ("1039_gef_dun02", "gef_dun02", 3_600_000),
            ]
        );
        assert_eq!(mvps[0].spawn_window, 600_000);
        assert_eq!(mvps[0].name, "Baphomet");
        assert_eq!(mvps[1].map_name, "gef_dun02");
    }

    #[test]
    fn filter_by_map() {
        let mvps = Mvp::derive(&monsters(), &spawns());
        let filter = MvpFilter {
            map_id: Some(TextMatch::StartsWith("gef_".into())),
            ..MvpFilter::default()
        };

        let hits: Vec<&str> = mvps
            .iter()
            .filter(|m| filter.matches(m))
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(hits, ["1039_gef_dun02"]);
    }
}
