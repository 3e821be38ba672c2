//! Codec configuration.
//!
//! Limits applied when parsing untrusted streams, plus encoder options.
//! Configurations can be built directly, read from `HUFFCODE_*` environment
//! variables, or loaded from JSON:
//!
//! ```rust
//! use huffcode::CodecConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CodecConfig {
//!     verify_round_trip: true,
//!     ..CodecConfig::default()
//! };
//! config.validate()?;
//! # Ok(())
//! # }
//! ```

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default environment variable prefix.
pub const ENV_PREFIX: &str = "HUFFCODE_";

/// Encoder and decoder settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Largest distinct-symbol count a header may declare.
    pub max_symbols: usize,
    /// Largest total frequency (decoded length) a header may declare.
    pub max_output_symbols: u64,
    /// Decode every encoded stream and compare before returning it.
    pub verify_round_trip: bool,
    /// Fixed-width bits per symbol for savings reports; `None` uses `Symbol::BITS`.
    pub baseline_bits: Option<u32>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_symbols: 1 << 20,
            max_output_symbols: 1 << 32,
            verify_round_trip: false,
            baseline_bits: None,
        }
    }
}

impl CodecConfig {
    /// Tight limits for byte streams from untrusted sources, with verification on.
    pub fn strict_preset() -> Self {
        Self {
            max_symbols: 256,
            max_output_symbols: 1 << 28,
            verify_round_trip: true,
            baseline_bits: None,
        }
    }

    /// Check the settings for consistency.
    pub fn validate(&self) -> Result<()> {
        if self.max_symbols == 0 {
            return Err(Error::Configuration(
                "max_symbols must be at least 1".to_string(),
            ));
        }
        if self.max_symbols > u32::MAX as usize {
            return Err(Error::Configuration(format!(
                "max_symbols {} exceeds the u32 header count",
                self.max_symbols
            )));
        }
        if self.max_output_symbols == 0 {
            return Err(Error::Configuration(
                "max_output_symbols must be at least 1".to_string(),
            ));
        }
        if let Some(bits) = self.baseline_bits {
            if bits == 0 || bits > 64 {
                return Err(Error::Configuration(format!(
                    "baseline_bits {bits} must be between 1 and 64"
                )));
            }
        }
        Ok(())
    }

    /// Read settings from `HUFFCODE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Read settings from environment variables with a custom prefix.
    ///
    /// Unset or unparsable variables keep their default.
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            max_symbols: parse_env_var(&format!("{prefix}MAX_SYMBOLS"), defaults.max_symbols),
            max_output_symbols: parse_env_var(
                &format!("{prefix}MAX_OUTPUT_SYMBOLS"),
                defaults.max_output_symbols,
            ),
            verify_round_trip: parse_env_bool(
                &format!("{prefix}VERIFY_ROUND_TRIP"),
                defaults.verify_round_trip,
            ),
            baseline_bits: env::var(format!("{prefix}BASELINE_BITS"))
                .ok()
                .and_then(|s| s.parse().ok()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Save as pretty-printed JSON.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Configuration(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, serialized)
            .map_err(|e| Error::Configuration(format!("failed to write config file: {e}")))?;
        Ok(())
    }

    /// Load and validate a JSON configuration file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Configuration(format!("failed to read config file: {e}")))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| Error::Configuration(format!("failed to parse config file: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

fn parse_env_var<T: std::str::FromStr>(var_name: &str, default: T) -> T {
    env::var(var_name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn parse_env_bool(var_name: &str, default: bool) -> bool {
    env::var(var_name)
        .ok()
        .map(|s| matches!(s.to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        CodecConfig::default().validate().unwrap();
        CodecConfig::strict_preset().validate().unwrap();
    }

    #[test]
    fn test_rejects_invalid() {
        let zero = CodecConfig {
            max_symbols: 0,
            ..CodecConfig::default()
        };
        assert!(matches!(zero.validate(), Err(Error::Configuration(_))));

        let wide = CodecConfig {
            baseline_bits: Some(65),
            ..CodecConfig::default()
        };
        assert!(matches!(wide.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_from_env_with_prefix() {
        // Unique prefix so parallel tests don't observe these variables.
        env::set_var("HUFFCODE_TEST_ENV_MAX_SYMBOLS", "300");
        env::set_var("HUFFCODE_TEST_ENV_VERIFY_ROUND_TRIP", "yes");
        env::set_var("HUFFCODE_TEST_ENV_BASELINE_BITS", "7");
        env::set_var("HUFFCODE_TEST_ENV_MAX_OUTPUT_SYMBOLS", "not a number");
        let config = CodecConfig::from_env_with_prefix("HUFFCODE_TEST_ENV_").unwrap();
        assert_eq!(config.max_symbols, 300);
        assert!(config.verify_round_trip);
        assert_eq!(config.baseline_bits, Some(7));
        assert_eq!(
            config.max_output_symbols,
            CodecConfig::default().max_output_symbols
        );
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codec.json");
        let config = CodecConfig {
            baseline_bits: Some(16),
            ..CodecConfig::strict_preset()
        };
        config.save_to_file(&path).unwrap();
        assert_eq!(CodecConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(&path, r#"{ "verify_round_trip": true }"#).unwrap();
        let config = CodecConfig::load_from_file(&path).unwrap();
        assert!(config.verify_round_trip);
        assert_eq!(config.max_symbols, CodecConfig::default().max_symbols);
    }
}
