use rathena_search::{optional_match, TextMatch};
use rathena_search_macros::Seekable;
use serde::{Deserialize, Serialize};

use super::{sequence_id, EntityFilter};

/// A permanent monster spawn of a map script.
///
/// `name` is the name the script gives the spawn, which can differ from the
/// monster's database name (`"Lunatic Ringleader"` spawning a Lunatic).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Seekable)]
#[serde(rename_all = "camelCase")]
pub struct MonsterSpawn {
    #[seek(Number)]
    #[serde(skip_deserializing)]
    pub id: u32,
    #[seek(String)]
    pub map: String,
    #[seek(Number)]
    #[serde(default)]
    pub x: u16,
    #[seek(Number)]
    #[serde(default)]
    pub y: u16,
    #[seek(String)]
    pub name: String,
    #[seek(Number, rename = "monsterId")]
    pub monster_id: u32,
    #[seek(Number)]
    pub amount: u32,
    /// Milliseconds before a killed monster respawns.
    #[seek(Number, rename = "spawnDelay")]
    #[serde(default)]
    pub spawn_delay: u32,
    /// Random milliseconds added to `spawn_delay`.
    #[seek(Number, rename = "spawnWindow")]
    #[serde(default)]
    pub spawn_window: u32,
}

impl MonsterSpawn {
    /// Numbers spawns by position.
    pub fn assign_ids(spawns: &mut [MonsterSpawn]) {
        for (index, spawn) in spawns.iter_mut().enumerate() {
            spawn.id = sequence_id(index);
        }
    }
}

/// The spawn search form, also behind the monster tab of a map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SpawnFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<TextMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monster_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<TextMatch>,
}

impl EntityFilter<MonsterSpawn> for SpawnFilter {
    fn matches(&self, spawn: &MonsterSpawn) -> bool {
        optional_match(self.map.as_ref(), |map| map.matches(&spawn.map))
            && optional_match(self.monster_id.as_ref(), |id| spawn.monster_id == *id)
            && optional_match(self.name.as_ref(), |name| name.matches(&spawn.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spawns() -> Vec<MonsterSpawn> {
        let mut spawns: Vec<MonsterSpawn> = serde_json::from_value(json!([
            {"map": "prt_fild01", "name": "Poring", "monsterId": 1002, "amount": 50},
            {"id": 99, "map": "prt_fild01", "name": "Lunatic Ringleader", "monsterId": 1063,
             "amount": 1, "spawnDelay": 1800000, "spawnWindow": 600000},
            {"map": "prt_fild010", "x": 120, "y": 80, "name": "Fabre", "monsterId": 1007, "amount": 10},
        ]))
        .unwrap();
        MonsterSpawn::assign_ids(&mut spawns);
        spawns
    }

    #[test]
    fn ids_follow_script_order() {
        let spawns = spawns();

        let ids: Vec<u32> = spawns.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(spawns[1].spawn_delay, 1_800_000);
        assert_eq!((spawns[0].x, spawns[2].x), (0, 120));
    }

    #[test]
    fn filter_by_exact_map() {
        let spawns = spawns();
        let on_map = SpawnFilter {
            map: Some(TextMatch::Equals("PRT_FILD01".into())),
            ..SpawnFilter::default()
        };

        let names: Vec<&str> = spawns
            .iter()
            .filter(|s| on_map.matches(s))
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, ["Poring", "Lunatic Ringleader"]);

        let lunatics = SpawnFilter {
            monster_id: Some(1063),
            ..SpawnFilter::default()
        };
        assert_eq!(spawns.iter().filter(|s| lunatics.matches(s)).count(), 1);
    }
}
