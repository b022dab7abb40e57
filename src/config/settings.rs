//! User settings for tally-chart
//!
//! Manages chart preferences (axis levels, page sizes, earliest selectable
//! year) plus the user whose transactions are charted.

use serde::{Deserialize, Serialize};

use super::paths::TallyPaths;
use crate::error::TallyError;
use crate::models::UserId;

/// Chart layout preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSettings {
    /// Number of labels on the value axis
    #[serde(default = "default_axis_levels")]
    pub axis_levels: usize,

    /// Days shown per page in day granularity
    #[serde(default = "default_day_page_size")]
    pub day_page_size: usize,

    /// Upper bound for category page sizes
    #[serde(default = "default_max_category_page_size")]
    pub max_category_page_size: usize,

    /// Lower bound for category page sizes
    #[serde(default = "default_min_category_page_size")]
    pub min_category_page_size: usize,

    /// Upper bound for year page sizes
    #[serde(default = "default_max_year_page_size")]
    pub max_year_page_size: usize,

    /// Earliest year that can be selected
    #[serde(default = "default_first_year")]
    pub first_year: i32,
}

fn default_axis_levels() -> usize {
    5
}

fn default_day_page_size() -> usize {
    11
}

fn default_max_category_page_size() -> usize {
    10
}

fn default_min_category_page_size() -> usize {
    5
}

fn default_max_year_page_size() -> usize {
    5
}

fn default_first_year() -> i32 {
    2019
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            axis_levels: default_axis_levels(),
            day_page_size: default_day_page_size(),
            max_category_page_size: default_max_category_page_size(),
            min_category_page_size: default_min_category_page_size(),
            max_year_page_size: default_max_year_page_size(),
            first_year: default_first_year(),
        }
    }
}

impl ChartSettings {
    /// Reject values the chart cannot work with
    pub fn validate(&self) -> Result<(), TallyError> {
        if self.axis_levels == 0 {
            return Err(TallyError::Config("axis_levels must be at least 1".into()));
        }
        if self.day_page_size == 0 || self.max_year_page_size == 0 {
            return Err(TallyError::Config("page sizes must be at least 1".into()));
        }
        if self.min_category_page_size == 0
            || self.min_category_page_size > self.max_category_page_size
        {
            return Err(TallyError::Config(format!(
                "invalid category page size bounds {}..={}",
                self.min_category_page_size, self.max_category_page_size
            )));
        }
        Ok(())
    }
}

/// User settings for tally-chart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// User whose transactions are charted; records without an owner belong
    /// to the default user
    #[serde(default = "default_user_id")]
    pub user_id: UserId,

    /// Currency symbol used when printing totals
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Chart layout preferences
    #[serde(default)]
    pub chart: ChartSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_user_id() -> UserId {
    UserId::default()
}

fn default_currency() -> String {
    "$".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            user_id: default_user_id(),
            currency_symbol: default_currency(),
            chart: ChartSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &TallyPaths) -> Result<Self, TallyError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| TallyError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| TallyError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.chart.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TallyPaths) -> Result<(), TallyError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| TallyError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| TallyError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
