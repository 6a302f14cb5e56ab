use crate::error::{GeoextError, Result};
use crate::formats::polyline::DEFAULT_LEVEL;
use crate::models::SridCopyPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for geoext
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub srid_copy_policy: ConfigValue<SridCopyPolicy>,
    pub polyline_level: ConfigValue<u32>,
    pub default_srid: ConfigValue<i32>,
    pub wkt_precision: ConfigValue<Option<usize>>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            srid_copy_policy: ConfigValue::new(SridCopyPolicy::default(), ConfigSource::Default),
            polyline_level: ConfigValue::new(DEFAULT_LEVEL, ConfigSource::Default),
            default_srid: ConfigValue::new(0, ConfigSource::Default),
            wkt_precision: ConfigValue::new(None, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| GeoextError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GeoextError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(policy) = file_config.srid_copy_policy {
            self.srid_copy_policy.update(parse_srid_copy_policy(&policy)?, ConfigSource::File);
        }

        if let Some(level) = file_config.polyline_level {
            self.polyline_level.update(level, ConfigSource::File);
        }

        if let Some(srid) = file_config.default_srid {
            self.default_srid.update(srid, ConfigSource::File);
        }

        if let Some(precision) = file_config.wkt_precision {
            self.wkt_precision.update(Some(precision), ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // GEOEXT_SRID_COPY_POLICY
        if let Ok(policy_str) = env::var("GEOEXT_SRID_COPY_POLICY") {
            match parse_srid_copy_policy(&policy_str) {
                Ok(policy) => self.srid_copy_policy.update(policy, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOEXT_SRID_COPY_POLICY value '{}': expected zero, lenient, or strict",
                    policy_str
                ),
            }
        }

        // GEOEXT_POLYLINE_LEVEL
        if let Ok(level_str) = env::var("GEOEXT_POLYLINE_LEVEL") {
            match level_str.parse::<u32>() {
                Ok(level) => self.polyline_level.update(level, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOEXT_POLYLINE_LEVEL value '{}': expected a non-negative integer",
                    level_str
                ),
            }
        }

        // GEOEXT_DEFAULT_SRID
        if let Ok(srid_str) = env::var("GEOEXT_DEFAULT_SRID") {
            match srid_str.parse::<i32>() {
                Ok(srid) => self.default_srid.update(srid, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOEXT_DEFAULT_SRID value '{}': expected integer SRID",
                    srid_str
                ),
            }
        }

        // GEOEXT_WKT_PRECISION
        if let Ok(precision_str) = env::var("GEOEXT_WKT_PRECISION") {
            match precision_str.parse::<usize>() {
                Ok(precision) => self.wkt_precision.update(Some(precision), ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOEXT_WKT_PRECISION value '{}': expected number of decimals",
                    precision_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(policy) = overrides.srid_copy_policy {
            self.srid_copy_policy.update(policy, ConfigSource::Cli);
        }

        if let Some(level) = overrides.polyline_level {
            self.polyline_level.update(level, ConfigSource::Cli);
        }

        if let Some(srid) = overrides.default_srid {
            self.default_srid.update(srid, ConfigSource::Cli);
        }

        if let Some(precision) = overrides.wkt_precision {
            self.wkt_precision.update(Some(precision), ConfigSource::Cli);
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "srid_copy_policy".to_string(),
            (format!("{:?}", self.srid_copy_policy.value), self.srid_copy_policy.source),
        );

        map.insert(
            "polyline_level".to_string(),
            (self.polyline_level.value.to_string(), self.polyline_level.source),
        );

        map.insert(
            "default_srid".to_string(),
            (self.default_srid.value.to_string(), self.default_srid.source),
        );

        let precision = match self.wkt_precision.value {
            Some(precision) => precision.to_string(),
            None => "full".to_string(),
        };
        map.insert("wkt_precision".to_string(), (precision, self.wkt_precision.source));

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    srid_copy_policy: Option<String>,
    polyline_level: Option<u32>,
    default_srid: Option<i32>,
    wkt_precision: Option<usize>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub srid_copy_policy: Option<SridCopyPolicy>,
    pub polyline_level: Option<u32>,
    pub default_srid: Option<i32>,
    pub wkt_precision: Option<usize>,
}

/// Parse SRID copy policy from string
pub fn parse_srid_copy_policy(s: &str) -> Result<SridCopyPolicy> {
    match s.to_lowercase().as_str() {
        "zero" => Ok(SridCopyPolicy::Zero),
        "lenient" => Ok(SridCopyPolicy::Lenient),
        "strict" => Ok(SridCopyPolicy::Strict),
        _ => Err(GeoextError::ConfigInvalid {
            key: "srid_copy_policy".to_string(),
            reason: format!("Invalid SRID copy policy: {}. Use zero, lenient, or strict", s),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.srid_copy_policy.value, SridCopyPolicy::Lenient);
        assert_eq!(config.srid_copy_policy.source, ConfigSource::Default);
        assert_eq!(config.polyline_level.value, 3);
        assert_eq!(config.default_srid.value, 0);
        assert_eq!(config.wkt_precision.value, None);
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        // File should override default
        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        // Environment should override file
        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);

        // CLI should override environment
        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
srid_copy_policy = "strict"
polyline_level = 5
default_srid = 4326
wkt_precision = 2
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.srid_copy_policy.value, SridCopyPolicy::Strict);
        assert_eq!(config.srid_copy_policy.source, ConfigSource::File);
        assert_eq!(config.polyline_level.value, 5);
        assert_eq!(config.default_srid.value, 4326);
        assert_eq!(config.wkt_precision.value, Some(2));
    }

    #[test]
    fn test_load_from_file_bad_policy() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"srid_copy_policy = "sometimes""#).unwrap();

        let result = LayeredConfig::with_defaults().load_from_file(file.path());
        assert!(matches!(result, Err(GeoextError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        let overrides = CliConfigOverrides {
            srid_copy_policy: Some(SridCopyPolicy::Zero),
            polyline_level: None,
            default_srid: Some(900913),
            wkt_precision: None,
        };

        config.update_from_cli(overrides);

        assert_eq!(config.srid_copy_policy.value, SridCopyPolicy::Zero);
        assert_eq!(config.srid_copy_policy.source, ConfigSource::Cli);
        assert_eq!(config.default_srid.value, 900913);
        // These should still be defaults
        assert_eq!(config.polyline_level.source, ConfigSource::Default);
        assert_eq!(config.wkt_precision.source, ConfigSource::Default);
    }

    #[test]
    fn test_parse_srid_copy_policy() {
        assert_eq!(parse_srid_copy_policy("zero").unwrap(), SridCopyPolicy::Zero);
        assert_eq!(parse_srid_copy_policy("LENIENT").unwrap(), SridCopyPolicy::Lenient);
        assert_eq!(parse_srid_copy_policy("Strict").unwrap(), SridCopyPolicy::Strict);
        assert!(parse_srid_copy_policy("invalid").is_err());
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        assert!(map.contains_key("srid_copy_policy"));
        assert!(map.contains_key("polyline_level"));
        assert!(map.contains_key("default_srid"));

        let (precision, source) = &map["wkt_precision"];
        assert_eq!(precision, "full");
        assert_eq!(*source, ConfigSource::Default);
    }
}
