pub mod config;
pub use config::{ChartConfig, Config, DisplayConfig, KafkaConfig, LoggingConfig};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuzzPieError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Queue error: {0}")]
    Queue(String),
}

pub type Result<T> = std::result::Result<T, BuzzPieError>;

/// Label used when the grouping field is missing, null or blank.
pub const UNKNOWN_CATEGORY: &str = "unknown";
/// Placeholder slice shown before the first event arrives.
pub const WAITING_LABEL: &str = "waiting";
/// Aggregate slice for categories below the share threshold.
pub const OTHER_LABEL: &str = "other";

#[cfg(test)]
mod tests {
    use super::*;

    fn read(path: &str) -> Result<String> {
        Ok(std::fs::read_to_string(path)?)
    }

    #[test]
    fn io_errors_convert() {
        assert!(matches!(read("/no/such/buzz-pie/file"), Err(BuzzPieError::Io(_))));
    }

    #[test]
    fn display_names_the_kind() {
        assert_eq!(BuzzPieError::Queue("broker down".into()).to_string(), "Queue error: broker down");
        assert_eq!(BuzzPieError::Config("bad".into()).to_string(), "Config error: bad");
    }
}
