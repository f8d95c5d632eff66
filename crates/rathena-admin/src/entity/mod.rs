//! Searchable rAthena entities and their filters.
//!
//! Each entity serializes with the same camelCase names its `#[seek]` paths
//! use, so a path valid for sorting is also a key of the entity's JSON.

mod drop;
mod item;
mod map;
mod monster;
mod mvp;
mod skill;
mod spawn;
mod vendor;
mod warp;

pub use drop::{DropFilter, ItemDrop};
pub use item::{Item, ItemFilter, DEFAULT_TRADE_SCALE};
pub use map::{MapFilter, MapInfo};
pub use monster::{DropEntry, Monster, MonsterFilter, Stats};
pub use mvp::{Mvp, MvpFilter};
pub use skill::{Skill, SkillFilter};
pub use spawn::{MonsterSpawn, SpawnFilter};
pub use vendor::{VendorFilter, VendorItem};
pub use warp::{Warp, WarpFilter};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A filter form for entity `E`.
///
/// The default value is the empty form, which matches everything.
pub trait EntityFilter<E>: Default + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Returns `true` if `entity` satisfies every field set in the form.
    fn matches(&self, entity: &E) -> bool;
}

/// Adapts [`EntityFilter::matches`] to the controller's matcher shape.
pub fn is_match<E, F: EntityFilter<E>>(entity: &E, filter: &F) -> bool {
    filter.matches(entity)
}

/// An empty selection accepts anything; otherwise `value` must be selected.
fn selected(selection: &[String], value: &str) -> bool {
    selection.is_empty() || selection.iter().any(|s| s.eq_ignore_ascii_case(value))
}

/// An empty selection accepts anything; otherwise one of `values` must be
/// selected.
fn any_selected(selection: &[String], values: &[String]) -> bool {
    selection.is_empty() || values.iter().any(|value| selected(selection, value))
}

/// Id of the row at `index` of a derived table. Ids past `u32::MAX`
/// saturate.
pub(crate) fn sequence_id(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
