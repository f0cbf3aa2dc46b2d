use serde::Deserialize;

use crate::domain::DateRange;
use crate::error::Result;
use crate::preference::SELECTED_WEBSITE_KEY;
use crate::selector::SelectorStyle;

/// Number of rows requested for every ranking table.
pub const DEFAULT_RANKING_LIMIT: usize = 10;

/// Page-level settings. Every field has a default so a partial (or absent)
/// configuration document is valid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardConfig {
    /// Prefix of the stats API, empty for same origin.
    pub api_base: String,
    pub ranking_limit: usize,
    pub preference_key: String,
    pub selector_style: SelectorStyle,
    pub default_range: DateRange,
    pub debug: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            ranking_limit: DEFAULT_RANKING_LIMIT,
            preference_key: SELECTED_WEBSITE_KEY.to_string(),
            selector_style: SelectorStyle::Tabs,
            default_range: DateRange::Today,
            debug: false,
        }
    }
}

impl DashboardConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        Ok(config.normalized())
    }

    fn normalized(mut self) -> Self {
        if self.ranking_limit == 0 {
            self.ranking_limit = DEFAULT_RANKING_LIMIT;
        }
        if self.preference_key.trim().is_empty() {
            self.preference_key = SELECTED_WEBSITE_KEY.to_string();
        }
        self
    }
}
