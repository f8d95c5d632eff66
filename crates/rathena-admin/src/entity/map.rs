use rathena_search::{optional_match, TextMatch};
use rathena_search_macros::Seekable;
use serde::{Deserialize, Serialize};

use super::EntityFilter;

/// A map of the game world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Seekable)]
#[serde(rename_all = "camelCase")]
pub struct MapInfo {
    #[seek(String)]
    pub id: String,
    #[seek(String)]
    pub name: String,
    #[seek(Number, optional)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u16>,
    #[seek(Number, optional)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u16>,
}

/// The map search form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<TextMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<TextMatch>,
}

impl EntityFilter<MapInfo> for MapFilter {
    fn matches(&self, map: &MapInfo) -> bool {
        optional_match(self.id.as_ref(), |id| id.matches(&map.id))
            && optional_match(self.name.as_ref(), |name| name.matches(&map.name))
    }
}
