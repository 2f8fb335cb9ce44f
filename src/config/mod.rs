use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::domain::Language;
use crate::engine::utils::{app_data_dir, config_dir_in, config_file_in, ensure_dir};
use crate::errors::{FarmError, Result};

const TMP_SUFFIX: &str = "tmp";

pub const DEFAULT_DELIVERY_LOOKAHEAD_DAYS: u32 = 90;
pub const DEFAULT_OVERDUE_GRACE_DAYS: u32 = 7;
pub const DEFAULT_INCOME_TREND_DAYS: u32 = 7;
pub const DEFAULT_COMPARISON_MONTHS: u32 = 6;
pub const MAX_INCOME_TREND_DAYS: u32 = 366;
pub const MAX_COMPARISON_MONTHS: u32 = 120;

/// User preferences and the reporting windows used by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub language: Language,
    pub currency: String,
    pub delivery_lookahead_days: u32,
    pub overdue_grace_days: u32,
    pub income_trend_days: u32,
    pub comparison_months: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Language::En,
            currency: "PKR".into(),
            delivery_lookahead_days: DEFAULT_DELIVERY_LOOKAHEAD_DAYS,
            overdue_grace_days: DEFAULT_OVERDUE_GRACE_DAYS,
            income_trend_days: DEFAULT_INCOME_TREND_DAYS,
            comparison_months: DEFAULT_COMPARISON_MONTHS,
        }
    }
}

impl Config {
    fn validate(&self) -> Result<()> {
        if self.currency.trim().is_empty() {
            return Err(FarmError::ConfigError("currency code is empty".into()));
        }
        if self.income_trend_days > MAX_INCOME_TREND_DAYS {
            return Err(FarmError::ConfigError(format!(
                "income trend window of {} days exceeds {MAX_INCOME_TREND_DAYS}",
                self.income_trend_days
            )));
        }
        if self.comparison_months > MAX_COMPARISON_MONTHS {
            return Err(FarmError::ConfigError(format!(
                "comparison window of {} months exceeds {MAX_COMPARISON_MONTHS}",
                self.comparison_months
            )));
        }
        Ok(())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Manager rooted at the application data directory.
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        ensure_dir(&config_dir_in(&base))?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    /// Reads the saved config, or the defaults when nothing has been saved.
    /// Fields missing from an older file take their default values.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        config.validate()?;
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::info!(path = %self.path.display(), "Config saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tmp_path_appends_suffix() {
        let path = Path::new("/data/config/config.json");
        assert_eq!(tmp_path(path), PathBuf::from("/data/config/config.json.tmp"));
    }

    #[test]
    fn partial_document_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"language":"ur"}"#).unwrap();
        assert_eq!(config.language, Language::Ur);
        assert_eq!(config.delivery_lookahead_days, 90);
        assert_eq!(config.comparison_months, 6);
        assert_eq!(config.currency, "PKR");
    }

    #[test]
    fn empty_currency_is_rejected() {
        let config = Config {
            currency: " ".into(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(FarmError::ConfigError(_))));
    }

    #[test]
    fn oversized_windows_are_rejected() {
        let months = Config {
            comparison_months: u32::MAX,
            ..Config::default()
        };
        assert!(matches!(months.validate(), Err(FarmError::ConfigError(_))));
        let days = Config {
            income_trend_days: MAX_INCOME_TREND_DAYS + 1,
            ..Config::default()
        };
        assert!(matches!(days.validate(), Err(FarmError::ConfigError(_))));
        let widest = Config {
            income_trend_days: MAX_INCOME_TREND_DAYS,
            comparison_months: MAX_COMPARISON_MONTHS,
            ..Config::default()
        };
        assert!(widest.validate().is_ok());
    }
}
