use rathena_search::{optional_match, TextMatch};
use rathena_search_macros::Seekable;
use serde::{Deserialize, Serialize};

use super::{sequence_id, EntityFilter};

/// A warp portal from one map cell to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Seekable)]
#[serde(rename_all = "camelCase")]
pub struct Warp {
    #[seek(Number)]
    #[serde(skip_deserializing)]
    pub id: u32,
    #[seek(String, rename = "fromMap")]
    pub from_map: String,
    #[seek(Number, rename = "fromX")]
    #[serde(default)]
    pub from_x: u16,
    #[seek(Number, rename = "fromY")]
    #[serde(default)]
    pub from_y: u16,
    #[seek(String, rename = "toMap")]
    pub to_map: String,
    #[seek(Number, rename = "toX")]
    #[serde(default)]
    pub to_x: u16,
    #[seek(Number, rename = "toY")]
    #[serde(default)]
    pub to_y: u16,
}

impl Warp {
    /// Numbers warps by position.
    pub fn assign_ids(warps: &mut [Warp]) {
        for (index, warp) in warps.iter_mut().enumerate() {
            warp.id = sequence_id(index);
        }
    }
}

/// The warp search form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct WarpFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_map: Option<TextMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_map: Option<TextMatch>,
}

impl EntityFilter<Warp> for WarpFilter {
    fn matches(&self, warp: &Warp) -> bool {
        optional_match(self.from_map.as_ref(), |map| map.matches(&warp.from_map))
            && optional_match(self.to_map.as_ref(), |map| map.matches(&warp.to_map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_by_source_and_destination() {
        let mut warps: Vec<Warp> = serde_json::from_str(
            r#"[
                {"fromMap": "prt_fild01", "fromX": 136, "fromY": 361, "toMap": "prt_maze01", "toX": 100, "toY": 69},
                {"fromMap": "prt_fild01", "toMap": "mjolnir_10"},
                {"fromMap": "prt_maze01", "toMap": "prt_fild01"}
            ]"#,
        )
        .unwrap();
        Warp::assign_ids(&mut warps);

        let leaving = WarpFilter {
            from_map: Some(TextMatch::Equals("prt_fild01".into())),
            ..WarpFilter::default()
        };
        let ids: Vec<u32> = warps.iter().filter(|w| leaving.matches(w)).map(|w| w.id).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(warps[0].to_y, 69);

        let arriving = WarpFilter {
            to_map: Some(TextMatch::Equals("prt_fild01".into())),
            ..WarpFilter::default()
        };
        assert!(arriving.matches(&warps[2]));
        assert!(!arriving.matches(&warps[0]));
    }
}
