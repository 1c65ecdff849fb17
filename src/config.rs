use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::effect::CommonConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Suite configuration, loaded from JSON
///
/// Every field is optional; missing fields take the values below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    pub session: i32,
    pub io_handle: i32,
    pub input_sample_rate: u32,
    pub output_sample_rate: u32,
    pub input_frame_count: u64,
    pub output_frame_count: u64,
    /// Strength values tested in addition to the fixed boundary set
    pub extra_strength_values: Vec<i32>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            session: 0,
            io_handle: 1,
            input_sample_rate: 44100,
            output_sample_rate: 44100,
            input_frame_count: 0x100,
            output_frame_count: 0x100,
            extra_strength_values: Vec::new(),
        }
    }
}

impl SuiteConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: SuiteConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.common()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Processing context every case opens its effect with
    pub fn common(&self) -> CommonConfig {
        CommonConfig {
            session: self.session,
            io_handle: self.io_handle,
            input_sample_rate: self.input_sample_rate,
            output_sample_rate: self.output_sample_rate,
            input_frame_count: self.input_frame_count,
            output_frame_count: self.output_frame_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        assert_eq!(SuiteConfig::from_json("{}").unwrap(), SuiteConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = SuiteConfig::from_json(r#"{"input_sample_rate": 48000, "extra_strength_values": [250]}"#).unwrap();
        assert_eq!(config.input_sample_rate, 48000);
        assert_eq!(config.output_sample_rate, 44100);
        assert_eq!(config.extra_strength_values, vec![250]);
    }

    #[test]
    fn test_zero_frame_count_rejected() {
        let result = SuiteConfig::from_json(r#"{"output_frame_count": 0}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_oversized_frame_count_rejected() {
        let result = SuiteConfig::from_json(r#"{"input_frame_count": 18446744073709551615}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(SuiteConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }
}
