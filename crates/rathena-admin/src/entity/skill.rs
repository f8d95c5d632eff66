use rathena_search::{optional_match, TextMatch};
use rathena_search_macros::Seekable;
use serde::{Deserialize, Serialize};

use super::EntityFilter;

/// An entry of the skill database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Seekable)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    #[seek(Number)]
    pub id: u32,
    #[seek(String, rename = "aegisName")]
    pub aegis_name: String,
    #[seek(String)]
    pub name: String,
    #[seek(Number, rename = "maxLevel")]
    pub max_level: u8,
}

/// The skill search form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SkillFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    /// Matched against both the display name and the aegis name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<TextMatch>,
}

impl EntityFilter<Skill> for SkillFilter {
    fn matches(&self, skill: &Skill) -> bool {
        optional_match(self.id.as_ref(), |id| skill.id == *id)
            && optional_match(self.name.as_ref(), |name| {
                name.matches(&skill.name) || name.matches(&skill.aegis_name)
            })
    }
}
