use rathena_search::{optional_match, Range, TextMatch};
use rathena_search_macros::Seekable;
use serde::{Deserialize, Serialize};

use super::{selected, EntityFilter};

/// Combat stats of a monster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Seekable)]
#[serde(default, rename_all = "camelCase")]
pub struct Stats {
    #[seek(Number)]
    pub level: u16,
    #[seek(Number)]
    pub hp: u32,
    #[seek(Number)]
    pub attack: u32,
    #[seek(Number)]
    pub defense: u32,
    #[seek(Number, rename = "baseExp")]
    pub base_exp: u32,
    #[seek(Number, rename = "jobExp")]
    pub job_exp: u32,
}

/// An item a monster drops, referenced by aegis name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropEntry {
    pub item: String,
    /// Chance in hundredths of a percent.
    pub rate: u32,
    #[serde(default)]
    pub steal_protected: bool,
}

/// An entry of the monster database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Seekable)]
#[serde(rename_all = "camelCase")]
pub struct Monster {
    #[seek(Number)]
    pub id: u32,
    #[seek(String, rename = "aegisName")]
    pub aegis_name: String,
    #[seek(String)]
    pub name: String,
    #[seek(nested)]
    #[serde(default)]
    pub stats: Stats,
    #[seek(String)]
    pub race: String,
    #[seek(String)]
    pub element: String,
    #[seek(String)]
    pub size: String,
    #[seek(Bool)]
    #[serde(default)]
    pub mvp: bool,
    #[serde(default)]
    pub drops: Vec<DropEntry>,
    #[serde(default)]
    pub mvp_drops: Vec<DropEntry>,
}

/// The monster search form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct MonsterFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<TextMatch>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub races: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sizes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Range<u16>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mvp: Option<bool>,
}

impl EntityFilter<Monster> for MonsterFilter {
    fn matches(&self, monster: &Monster) -> bool {
        optional_match(self.id.as_ref(), |id| monster.id == *id)
            && optional_match(self.name.as_ref(), |name| {
                name.matches(&monster.name) || name.matches(&monster.aegis_name)
            })
            && selected(&self.races, &monster.race)
            && selected(&self.elements, &monster.element)
            && selected(&self.sizes, &monster.size)
            && optional_match(self.level.as_ref(), |level| level.contains(&monster.stats.level))
            && optional_match(self.mvp.as_ref(), |mvp| monster.mvp == *mvp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rathena_search::{Number, Seekable, Value};
    use serde_json::json;

    fn baphomet() -> Monster {
        serde_json::from_value(json!({
            "id": 1039,
            "aegisName": "BAPHOMET",
            "name": "Baphomet",
            "stats": {"level": 81, "hp": 668000, "baseExp": 1000000},
            "race": "Demon",
            "element": "Dark",
            "size": "Large",
            "mvp": true,
            "mvpDrops": [{"item": "Yggdrasilberry", "rate": 2000}],
        }))
        .unwrap()
    }

    #[test]
    fn nested_stats_are_searchable() {
        let baphomet = baphomet();

        assert_eq!(
            baphomet.seeker_field_value("stats.baseExp"),
            Value::Number(Number::U64(1_000_000))
        );
        assert_eq!(baphomet.seeker_field_value("stats.jobExp"), Value::Number(Number::U64(0)));
        assert!(Monster::field_paths().contains(&"stats.level".to_string()));
        assert_eq!(baphomet.mvp_drops[0].item, "Yggdrasilberry");
        assert!(baphomet.drops.is_empty());
    }

    #[test]
    fn filter_matches_name_or_aegis_name() {
        let baphomet = baphomet();
        let by_name = |needle: &str| MonsterFilter {
            name: Some(TextMatch::Contains(needle.into())),
            ..MonsterFilter::default()
        };

        assert!(by_name("bapho").matches(&baphomet));
        assert!(!by_name("poring").matches(&baphomet));
    }

    #[test]
    fn filter_on_stats_and_flags() {
        let baphomet = baphomet();

        let filter = MonsterFilter {
            level: Some(Range::between(80, 99)),
            races: vec!["demon".into()],
            mvp: Some(true),
            ..MonsterFilter::default()
        };
        assert!(filter.matches(&baphomet));

        let normal = MonsterFilter {
            mvp: Some(false),
            ..MonsterFilter::default()
        };
        assert!(!normal.matches(&baphomet));
    }
}
