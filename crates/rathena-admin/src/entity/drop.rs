use std::collections::HashMap;

use rathena_search::{optional_match, Range, TextMatch};
use rathena_search_macros::Seekable;
use serde::{Deserialize, Serialize};

use super::{sequence_id, EntityFilter, Item, Monster};

/// One item dropped by one monster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Seekable)]
#[serde(rename_all = "camelCase")]
pub struct ItemDrop {
    #[seek(Number)]
    pub id: u32,
    #[seek(Number, rename = "itemId")]
    pub item_id: u32,
    #[seek(String, rename = "itemName")]
    pub item_name: String,
    #[seek(Number, rename = "monsterId")]
    pub monster_id: u32,
    #[seek(String, rename = "monsterName")]
    pub monster_name: String,
    /// Chance in hundredths of a percent.
    #[seek(Number)]
    pub rate: u32,
    #[seek(Bool)]
    pub mvp: bool,
    #[seek(Bool, rename = "stealProtected")]
    pub steal_protected: bool,
    #[seek(Number)]
    pub slots: u8,
}

impl ItemDrop {
    /// Pairs every drop of every monster with the items of that aegis name.
    ///
    /// Monsters are walked in order, normal drops before MVP drops. Ids are
    /// assigned sequentially from zero. Drops naming an unknown item are
    /// skipped.
    pub fn derive(monsters: &[Monster], items: &[Item]) -> Vec<ItemDrop> {
        let mut by_aegis_name: HashMap<&str, Vec<&Item>> = HashMap::new();
        for item in items {
            by_aegis_name.entry(item.aegis_name.as_str()).or_default().push(item);
        }

        let mut drops = Vec::new();
        for monster in monsters {
            let entries = monster
                .drops
                .iter()
                .map(|entry| (entry, false))
                .chain(monster.mvp_drops.iter().map(|entry| (entry, true)));

            for (entry, mvp) in entries {
                let Some(matching) = by_aegis_name.get(entry.item.as_str()) else {
                    continue;
                };
                for item in matching {
                    drops.push(ItemDrop {
                        id: sequence_id(drops.len()),
                        item_id: item.id,
                        item_name: item.name.clone(),
                        monster_id: monster.id,
                        monster_name: monster.name.clone(),
                        rate: entry.rate,
                        mvp,
                        steal_protected: entry.steal_protected,
                        slots: item.slots,
                    });
                }
            }
        }
        drops
    }
}

/// The drop search form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DropFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monster_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_name: Option<TextMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monster_name: Option<TextMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<Range<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mvp: Option<bool>,
}

impl EntityFilter<ItemDrop> for DropFilter {
    fn matches(&self, drop: &ItemDrop) -> bool {
        optional_match(self.item_id.as_ref(), |id| drop.item_id == *id)
            && optional_match(self.monster_id.as_ref(), |id| drop.monster_id == *id)
            && optional_match(self.item_name.as_ref(), |name| name.matches(&drop.item_name))
            && optional_match(self.monster_name.as_ref(), |name| {
                name.matches(&drop.monster_name)
            })
            && optional_match(self.rate.as_ref(), |rate| rate.contains(&drop.rate))
            && optional_match(self.mvp.as_ref(), |mvp| drop.mvp == *mvp)
    }
}
