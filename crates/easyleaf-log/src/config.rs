use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Default distance, in characters, searched past a `!` line for its `l.<n>`
/// marker.
///
/// TeX prints at most a handful of context lines (each wrapped at 79 columns)
/// between the two, so 500 characters covers them without letting one error borrow
/// the line marker of an unrelated error much further down.
pub const DEFAULT_LOOKAHEAD_WINDOW: usize = 500;

/// Default number of message characters that take part in the dedup key.
pub const DEFAULT_DEDUP_PREFIX_LEN: usize = 50;

pub const MAX_LOOKAHEAD_WINDOW: usize = 65_536;

/// Tunables for [`LogParser`](crate::LogParser).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Bound, in characters, for the multi-line rules (`!` to `l.<n>`, runaway
    /// argument to `!`).
    pub lookahead_window: usize,
    pub dedup_prefix_len: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            lookahead_window: DEFAULT_LOOKAHEAD_WINDOW,
            dedup_prefix_len: DEFAULT_DEDUP_PREFIX_LEN,
        }
    }
}

impl ParserConfig {
    /// Parses a JSON object; missing fields take their defaults.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookahead_window == 0 || self.lookahead_window > MAX_LOOKAHEAD_WINDOW {
            return Err(ConfigError::OutOfRange {
                field: "lookahead_window",
                value: self.lookahead_window,
                min: 1,
                max: MAX_LOOKAHEAD_WINDOW,
            });
        }
        if self.dedup_prefix_len == 0 {
            return Err(ConfigError::OutOfRange {
                field: "dedup_prefix_len",
                value: self.dedup_prefix_len,
                min: 1,
                max: usize::MAX,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ParserConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ParserConfig::from_json(r#"{ "lookahead_window": 800 }"#).unwrap();
        assert_eq!(config.lookahead_window, 800);
        assert_eq!(config.dedup_prefix_len, DEFAULT_DEDUP_PREFIX_LEN);
    }

    #[test]
    fn test_zero_window_rejected() {
        let err = ParserConfig::from_json(r#"{ "lookahead_window": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "lookahead_window",
                ..
            }
        ));
    }

    #[test]
    fn test_window_above_max_rejected() {
        let err = ParserConfig::from_json(r#"{"lookahead_window":65537}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "lookahead_window",
                value: 65_537,
                max: MAX_LOOKAHEAD_WINDOW,
                ..
            }
        ));
        assert!(ParserConfig::from_json(r#"{"lookahead_window":65536}"#).is_ok());
    }

    #[test]
    fn test_zero_prefix_rejected() {
        let err = ParserConfig::from_json(r#"{ "dedup_prefix_len": 0 }"#).unwrap_err();
        assert!(err.to_string().contains("dedup_prefix_len"));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            ParserConfig::from_json("{ lookahead"),
            Err(ConfigError::Json(_))
        ));
    }
}
