use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_CONFIG_PATH: &str = "BUZZ_PIE_CONFIG";
pub const ENV_TOPIC: &str = "BUZZ_TOPIC";
pub const ENV_GROUP_ID: &str = "BUZZ_CONSUMER_GROUP_ID";
pub const ENV_CATEGORY_FIELD: &str = "PROJECT_CATEGORY_FIELD";
pub const ENV_BROKERS: &str = "KAFKA_BROKER_ADDRESS";
pub const ENV_AUTO_OFFSET_RESET: &str = "KAFKA_AUTO_OFFSET_RESET";
pub const ENV_MIN_SHARE: &str = "BUZZ_MIN_SHARE";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KafkaConfig {
    #[serde(default = "default_brokers")]
    pub brokers: String,
    #[serde(default = "default_topic")]
    pub topic: String,
    #[serde(default = "default_group_id")]
    pub group_id: String,
    #[serde(default = "default_auto_offset_reset")]
    pub auto_offset_reset: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64, // how often the consumer re-checks the stop flag
}

fn default_brokers() -> String {
    "localhost:9092".into()
}
fn default_topic() -> String {
    "unknown_topic".into()
}
fn default_group_id() -> String {
    "json_consumer_schroder".into()
}
fn default_auto_offset_reset() -> String {
    "earliest".into()
}
fn default_poll_interval_ms() -> u64 {
    100
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            brokers: default_brokers(),
            topic: default_topic(),
            group_id: default_group_id(),
            auto_offset_reset: default_auto_offset_reset(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_category_field")]
    pub category_field: String,
    #[serde(default = "default_min_share")]
    pub min_share: f64,
    #[serde(default = "default_start_angle")]
    pub start_angle_deg: f64,
}

fn default_category_field() -> String {
    "category".into()
}
fn default_min_share() -> f64 {
    0.05
}
fn default_start_angle() -> f64 {
    90.0 // 12 o'clock
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            category_field: default_category_field(),
            min_share: default_min_share(),
            start_angle_deg: default_start_angle(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_theme() -> String {
    "dark".into()
}
fn default_tick_ms() -> u64 {
    66 // 15Hz
}
fn default_channel_capacity() -> usize {
    256
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            tick_ms: default_tick_ms(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub log_file: Option<String>, // falls back to <cache_dir>/buzz-pie/buzz-pie.log
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            filter: default_filter(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub kafka: KafkaConfig,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("buzz-pie")
            .join("config.toml")
    }

    pub fn default_log_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("buzz-pie")
            .join("buzz-pie.log")
    }

    /// File (if any) plus environment overrides, validated.
    pub fn load() -> crate::Result<Self> {
        let path = if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
            PathBuf::from(env_path)
        } else {
            Self::config_path()
        };
        let mut cfg = Self::from_file(&path)?;
        cfg.apply_env(|key| std::env::var(key).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::BuzzPieError::Config(e.to_string()))
    }

    /// Apply the consumer's environment variables on top of the file values.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_TOPIC) {
            self.kafka.topic = v;
        }
        if let Some(v) = lookup(ENV_GROUP_ID) {
            self.kafka.group_id = v;
        }
        if let Some(v) = lookup(ENV_BROKERS) {
            self.kafka.brokers = v;
        }
        if let Some(v) = lookup(ENV_AUTO_OFFSET_RESET) {
            self.kafka.auto_offset_reset = v;
        }
        if let Some(v) = lookup(ENV_CATEGORY_FIELD) {
            self.chart.category_field = v;
        }
        // unparseable share keeps the previous value
        if let Some(v) = lookup(ENV_MIN_SHARE).and_then(|s| s.trim().parse::<f64>().ok()) {
            self.chart.min_share = v;
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        if !(0.0..=1.0).contains(&self.chart.min_share) {
            return Err(crate::BuzzPieError::Config(format!(
                "chart.min_share must be within [0, 1], got {}",
                self.chart.min_share
            )));
        }
        if self.chart.category_field.trim().is_empty() {
            return Err(crate::BuzzPieError::Config(
                "chart.category_field must not be empty".into(),
            ));
        }
        if self.display.channel_capacity == 0 {
            return Err(crate::BuzzPieError::Config(
                "display.channel_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn log_path(&self) -> PathBuf {
        self.logging
            .log_file
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_log_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_match_consumer() {
        let c = Config::default();
        assert_eq!(c.kafka.topic, "unknown_topic");
        assert_eq!(c.kafka.group_id, "json_consumer_schroder");
        assert_eq!(c.chart.category_field, "category");
        assert_eq!(c.chart.min_share, 0.05);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut c = Config::default();
        c.apply_env(env(&[
            (ENV_TOPIC, "buzz_live"),
            (ENV_GROUP_ID, "g1"),
            (ENV_CATEGORY_FIELD, "keyword_mentioned"),
            (ENV_MIN_SHARE, "0.1"),
        ]));
        assert_eq!(c.kafka.topic, "buzz_live");
        assert_eq!(c.kafka.group_id, "g1");
        assert_eq!(c.chart.category_field, "keyword_mentioned");
        assert_eq!(c.chart.min_share, 0.1);
    }

    #[test]
    fn bad_share_env_is_ignored() {
        let mut c = Config::default();
        c.apply_env(env(&[(ENV_MIN_SHARE, "lots")]));
        assert_eq!(c.chart.min_share, 0.05);
    }

    #[test]
    fn validate_rejects_out_of_range_share() {
        let mut c = Config::default();
        c.chart.min_share = 1.5;
        assert!(c.validate().is_err());
        c.chart.min_share = 0.0;
        assert!(c.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_field_and_zero_capacity() {
        let mut c = Config::default();
        c.chart.category_field = "  ".into();
        assert!(c.validate().is_err());
        let mut c = Config::default();
        c.display.channel_capacity = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn from_file_partial_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[chart]\ncategory_field = \"author\"\n[kafka]\ntopic = \"t\"\n").unwrap();
        let c = Config::from_file(&path).unwrap();
        assert_eq!(c.chart.category_field, "author");
        assert_eq!(c.chart.min_share, 0.05);
        assert_eq!(c.kafka.topic, "t");
        assert_eq!(c.kafka.brokers, "localhost:9092");
    }

    #[test]
    fn from_file_missing_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let c = Config::from_file(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(c.display.tick_ms, 66);
    }

    #[test]
    fn from_file_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[chart\n").unwrap();
        assert!(matches!(Config::from_file(&path), Err(crate::BuzzPieError::Config(_))));
    }
}
