//! Search engine configuration.

use serde::{Deserialize, Serialize};

/// Largest page a controller returns unless configured otherwise.
pub const DEFAULT_LIMIT_CAP: usize = 50;

/// Settings shared by every search controller.
///
/// Deserializes from any serde format; missing keys take their defaults.
///
/// ```
/// use rathena_search::SearchConfig;
///
/// let config: SearchConfig = serde_json::from_str("{}").unwrap();
/// assert_eq!(config.limit_cap, 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SearchConfig {
    /// Maximum number of entities returned by one search.
    pub limit_cap: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            limit_cap: DEFAULT_LIMIT_CAP,
        }
    }
}

impl SearchConfig {
    /// Config with a custom limit cap.
    pub fn with_limit_cap(limit_cap: usize) -> Self {
        SearchConfig { limit_cap }
    }
}
