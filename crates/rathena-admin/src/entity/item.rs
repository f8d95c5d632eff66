use rathena_search::{optional_match, Range, TextMatch};
use rathena_search_macros::Seekable;
use serde::{Deserialize, Serialize};

use super::{any_selected, contains_ignore_case, selected, EntityFilter};

/// Buy price over sell price when an item only declares one of them.
pub const DEFAULT_TRADE_SCALE: f64 = 2.0;

/// An entry of the item database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Seekable)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[seek(Number)]
    pub id: u32,
    #[seek(String, rename = "aegisName")]
    pub aegis_name: String,
    #[seek(String)]
    pub name: String,
    #[seek(String, rename = "type")]
    #[serde(rename = "type")]
    pub item_type: String,
    #[seek(String, optional, rename = "subType")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    #[seek(Number, optional)]
    #[serde(default)]
    pub buy: Option<f64>,
    #[seek(Number, optional)]
    #[serde(default)]
    pub sell: Option<f64>,
    #[seek(Number)]
    #[serde(default)]
    pub weight: u32,
    #[seek(Number, optional)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack: Option<u32>,
    #[seek(Number, optional, rename = "magicAttack")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magic_attack: Option<u32>,
    #[seek(Number, optional)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defense: Option<u32>,
    #[seek(Number)]
    #[serde(default)]
    pub slots: u8,
    #[seek(Number, optional, rename = "equipLevelMin")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equip_level_min: Option<u16>,
    #[seek(Number, optional, rename = "equipLevelMax")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equip_level_max: Option<u16>,
    #[serde(default)]
    pub jobs: Vec<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub elements: Vec<String>,
    #[serde(default)]
    pub statuses: Vec<String>,
    #[serde(default)]
    pub races: Vec<String>,
    #[seek(String, optional)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[seek(String, optional)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
}

impl Item {
    /// Fills in whichever of buy and sell is missing.
    ///
    /// A missing buy price is `sell * trade_scale`, a missing sell price is
    /// `buy / trade_scale`. An item declaring neither trades at zero.
    pub fn resolve_trade_prices(&mut self, trade_scale: f64) {
        let buy = self
            .buy
            .unwrap_or_else(|| self.sell.unwrap_or(0.0) * trade_scale);
        let sell = self.sell.unwrap_or(buy / trade_scale);
        self.buy = Some(buy);
        self.sell = Some(sell);
    }
}

/// The item search form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ItemFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<TextMatch>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_types: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub jobs: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub races: Vec<String>,
    /// Text the description must contain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Text the script must contain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slots: Option<Range<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sell: Option<Range<f64>>,
}

impl EntityFilter<Item> for ItemFilter {
    fn matches(&self, item: &Item) -> bool {
        optional_match(self.id.as_ref(), |id| item.id == *id)
            && optional_match(self.name.as_ref(), |name| name.matches(&item.name))
            && selected(&self.types, &item.item_type)
            && (self.sub_types.is_empty()
                || item
                    .sub_type
                    .as_deref()
                    .is_some_and(|sub_type| selected(&self.sub_types, sub_type)))
            && any_selected(&self.classes, &item.classes)
            && any_selected(&self.jobs, &item.jobs)
            && any_selected(&self.elements, &item.elements)
            && any_selected(&self.statuses, &item.statuses)
            && any_selected(&self.races, &item.races)
            && optional_match(self.description.as_deref(), |needle| {
                item.description
                    .as_deref()
                    .is_some_and(|text| contains_ignore_case(text, needle))
            })
            && optional_match(self.script.as_deref(), |needle| {
                item.script
                    .as_deref()
                    .is_some_and(|text| contains_ignore_case(text, needle))
            })
            && optional_match(self.slots.as_ref(), |slots| slots.contains(&item.slots))
            && optional_match(self.sell.as_ref(), |sell| {
                item.sell.is_some_and(|value| sell.contains(&value))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rathena_search::{Number, Seekable, Value};
    use serde_json::json;

    fn item(value: serde_json::Value) -> Item {
        serde_json::from_value(value).unwrap()
    }

    fn jur() -> Item {
        item(json!({
            "id": 1250,
            "aegisName": "Jur",
            "name": "Jur",
            "type": "Weapon",
            "subType": "Katar",
            "buy": 19500,
            "weight": 1000,
            "attack": 125,
            "slots": 3,
            "equipLevelMin": 18,
            "jobs": ["Assassin"],
        }))
    }

    #[test]
    fn trade_prices_fill_the_missing_side() {
        let mut jur = jur();
        jur.resolve_trade_prices(DEFAULT_TRADE_SCALE);
        assert_eq!((jur.buy, jur.sell), (Some(19500.0), Some(9750.0)));

        let mut oridecon = item(json!({
            "id": 984, "aegisName": "Oridecon", "name": "Oridecon", "type": "Etc", "sell": 12500,
        }));
        oridecon.resolve_trade_prices(DEFAULT_TRADE_SCALE);
        assert_eq!((oridecon.buy, oridecon.sell), (Some(25000.0), Some(12500.0)));

        let mut free = item(json!({"id": 1, "aegisName": "X", "name": "X", "type": "Etc"}));
        free.resolve_trade_prices(3.0);
        assert_eq!((free.buy, free.sell), (Some(0.0), Some(0.0)));
    }

    #[test]
    fn paths_match_serialized_keys() {
        let jur = jur();
        let json = serde_json::to_value(&jur).unwrap();

        assert_eq!(json["subType"], "Katar");
        assert_eq!(jur.seeker_field_value(Item::SUB_TYPE), Value::String("Katar"));
        assert_eq!(jur.seeker_field_value(Item::TYPE), Value::String("Weapon"));
        assert_eq!(
            jur.seeker_field_value(Item::EQUIP_LEVEL_MIN),
            Value::Number(Number::U64(18))
        );
        assert_eq!(jur.seeker_field_value(Item::MAGIC_ATTACK), Value::None);
        assert!(!Item::field_paths().contains(&"jobs".to_string()));
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(ItemFilter::default().matches(&jur()));
    }

    #[test]
    fn filter_fields_combine() {
        let jur = jur();
        let filter: ItemFilter = serde_json::from_value(json!({
            "types": ["weapon"],
            "subTypes": ["Katar"],
            "slots": {"min": 2, "max": 3},
        }))
        .unwrap();
        assert!(filter.matches(&jur));

        let by_job = ItemFilter {
            jobs: vec!["Summoner".into()],
            ..ItemFilter::default()
        };
        assert!(!by_job.matches(&jur));

        let by_name = ItemFilter {
            name: Some(TextMatch::Contains("JU".into())),
            id: Some(1250),
            ..ItemFilter::default()
        };
        assert!(by_name.matches(&jur));
    }

    #[test]
    fn text_and_price_filters_need_a_value() {
        let mut jur = jur();
        let by_script = ItemFilter {
            script: Some("getrefine()".into()),
            ..ItemFilter::default()
        };
        assert!(!by_script.matches(&jur));

        jur.script = Some("bonus bAtk,GetRefine()*10;".into());
        assert!(by_script.matches(&jur));

        let by_sell = ItemFilter {
            sell: Some(Range::between(10_000.0, 20_000.0)),
            ..ItemFilter::default()
        };
        assert!(!by_sell.matches(&jur));
        jur.sell = Some(15_000.0);
        assert!(by_sell.matches(&jur));
    }

    #[test]
    fn unknown_filter_keys_are_rejected() {
        let err = serde_json::from_value::<ItemFilter>(json!({"colour": "red"})).unwrap_err();
        assert!(err.to_string().contains("colour"));
    }
}
