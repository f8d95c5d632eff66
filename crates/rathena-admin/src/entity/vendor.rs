use rathena_search::{optional_match, Range, TextMatch};
use rathena_search_macros::Seekable;
use serde::{Deserialize, Serialize};

use super::EntityFilter;

/// An item offered by an NPC shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Seekable)]
#[serde(rename_all = "camelCase")]
pub struct VendorItem {
    /// Shop name and item id, `"para_ptn10:505"`.
    #[seek(String)]
    pub id: String,
    #[seek(String)]
    pub vendor: String,
    #[seek(String)]
    pub map: String,
    #[seek(Number, rename = "itemId")]
    pub item_id: u32,
    #[seek(String)]
    pub name: String,
    #[seek(Number)]
    pub price: u32,
    #[seek(Number, optional)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u32>,
}

/// The shop search form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct VendorFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<TextMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<TextMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<TextMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Range<u32>>,
}

impl EntityFilter<VendorItem> for VendorFilter {
    fn matches(&self, item: &VendorItem) -> bool {
        optional_match(self.item_id.as_ref(), |id| item.item_id == *id)
            && optional_match(self.vendor.as_ref(), |vendor| vendor.matches(&item.vendor))
            && optional_match(self.map.as_ref(), |map| map.matches(&item.map))
            && optional_match(self.name.as_ref(), |name| name.matches(&item.name))
            && optional_match(self.price.as_ref(), |price| price.contains(&item.price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_by_item_and_price() {
        let blue_potion = VendorItem {
            id: "para_ptn10:505".into(),
            vendor: "para_ptn10".into(),
            map: "paramk".into(),
            item_id: 505,
            name: "Blue Potion".into(),
            price: 5000,
            amount: Some(100),
        };

        let filter = VendorFilter {
            item_id: Some(505),
            price: Some(Range { min: Some(1000), max: None }),
            ..VendorFilter::default()
        };
        assert!(filter.matches(&blue_potion));

        let elsewhere = VendorFilter {
            map: Some(TextMatch::Equals("prontera".into())),
            ..VendorFilter::default()
        };
        assert!(!elsewhere.matches(&blue_potion));
    }
}
