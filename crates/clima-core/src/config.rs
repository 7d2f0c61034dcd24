use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::ConfigError;

/// Environment variable that overrides `weather.api_key`.
pub const API_KEY_ENV: &str = "CLIMA_WEATHERBIT_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Weather provider settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Refresh behaviour of the screen
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Device location source
    #[serde(default)]
    pub location: LocationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Weatherbit API base URL
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,

    /// Weatherbit access key (overridden by `CLIMA_WEATHERBIT_KEY`)
    #[serde(default)]
    pub api_key: String,

    /// Unit system: M (metric), S (scientific), I (imperial)
    #[serde(default = "default_units")]
    pub units: String,

    /// Language of the condition description
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Request timeout. Unset means the transport default (none).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_weather_base_url() -> String {
    "https://api.weatherbit.io/v2.0".to_string()
}

fn default_units() -> String {
    "M".to_string()
}

fn default_lang() -> String {
    "es".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            api_key: String::new(),
            units: default_units(),
            lang: default_lang(),
            timeout_secs: None,
        }
    }
}

impl WeatherConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Whether the screen starts with auto-refresh on
    #[serde(default = "default_auto_refresh")]
    pub auto_refresh: bool,

    /// Auto-refresh interval in seconds
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Region used at startup and whenever location is unavailable
    #[serde(default = "default_region")]
    pub default_region: String,
}

fn default_auto_refresh() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    30
}

fn default_region() -> String {
    "San Salvador".to_string()
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            auto_refresh: default_auto_refresh(),
            interval_secs: default_interval_secs(),
            default_region: default_region(),
        }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// How the device position is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LocationMode {
    /// Approximate position from IP geolocation
    #[default]
    Ip,
    /// Configured coordinate snapshot
    Fixed,
    /// Permission is never granted
    Disabled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default)]
    pub mode: LocationMode,

    /// ip-api.com compatible endpoint
    #[serde(default = "default_ip_api_url")]
    pub ip_api_url: String,

    /// Latitude for `fixed` mode
    #[serde(default)]
    pub latitude: Option<f64>,

    /// Longitude for `fixed` mode
    #[serde(default)]
    pub longitude: Option<f64>,
}

fn default_ip_api_url() -> String {
    "http://ip-api.com".to_string()
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            mode: LocationMode::default(),
            ip_api_url: default_ip_api_url(),
            latitude: None,
            longitude: None,
        }
    }
}

impl Config {
    /// Load configuration from the user config directory, falling back to
    /// defaults when no file exists, then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            tracing::info!("Using Weatherbit key from {}", API_KEY_ENV);
            config.weather.api_key = key;
        }
        Ok(config)
    }

    /// Load configuration from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load configuration and validate it
    ///
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult), ConfigError> {
        let config = Self::load()?;
        let validation = config.check()?;
        Ok((config, validation))
    }

    /// Validate and fail on critical errors, logging any warnings.
    pub fn check(&self) -> Result<ValidationResult, ConfigError> {
        let validation = self.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(validation)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        validate_url(&self.weather.base_url, "weather.base_url", &mut result);

        if self.weather.api_key.trim().is_empty() {
            result.add_warning(
                "weather.api_key",
                format!("No Weatherbit key (set {API_KEY_ENV}); readings will use the fallback"),
            );
        }

        if self.refresh.interval_secs == 0 {
            result.add_error("refresh.interval_secs", "Interval must be greater than 0");
        } else if self.refresh.interval_secs > 86_400 {
            result.add_warning(
                "refresh.interval_secs",
                "Auto-refresh interval is more than 24 hours",
            );
        }

        if self.refresh.default_region.trim().is_empty() {
            result.add_error("refresh.default_region", "Default region must not be empty");
        }

        match self.location.mode {
            LocationMode::Ip => {
                validate_url(&self.location.ip_api_url, "location.ip_api_url", &mut result);
            }
            LocationMode::Fixed => match (self.location.latitude, self.location.longitude) {
                (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {}
                (Some(_), Some(_)) => {
                    result.add_error("location", "Fixed coordinates must be finite numbers");
                }
                _ => {
                    result.add_error(
                        "location",
                        "Fixed mode requires both latitude and longitude",
                    );
                }
            },
            LocationMode::Disabled => {
                result.add_warning(
                    "location.mode",
                    "Location disabled - the default region will always be used",
                );
            }
        }

        result
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("clima");

        Ok(config_dir.join("config.toml"))
    }
}

/// Validate a URL field
fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }

            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_defaults_match_screen() {
        let config = Config::default();
        assert_eq!(config.refresh.interval(), Duration::from_secs(30));
        assert!(config.refresh.auto_refresh);
        assert_eq!(config.refresh.default_region, "San Salvador");
        assert_eq!(config.weather.units, "M");
        assert_eq!(config.weather.lang, "es");
        assert!(config.weather.timeout().is_none());
    }

    #[test]
    fn test_missing_api_key_is_warning() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "weather.api_key"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.weather.base_url = "ftp://api.weatherbit.io".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_interval() {
        let mut config = Config::default();
        config.refresh.interval_secs = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "refresh.interval_secs"));
    }

    #[test]
    fn test_fixed_mode_requires_coordinates() {
        let mut config = Config::default();
        config.location.mode = LocationMode::Fixed;
        config.location.latitude = Some(13.7);
        assert!(!config.validate().is_valid());

        config.location.longitude = Some(-89.2);
        assert!(config.validate().is_valid());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.refresh.interval_secs, 30);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[weather]
api_key = "abc123"
timeout_secs = 5

[refresh]
auto_refresh = false

[location]
mode = "fixed"
latitude = 13.48
longitude = -88.18
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.weather.api_key, "abc123");
        assert_eq!(config.weather.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.weather.base_url, "https://api.weatherbit.io/v2.0");
        assert!(!config.refresh.auto_refresh);
        assert_eq!(config.refresh.interval_secs, 30);
        assert_eq!(config.location.mode, LocationMode::Fixed);
        assert_eq!(config.location.latitude, Some(13.48));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[refresh\ninterval_secs = ").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_wrong_type_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[refresh]\ninterval_secs = \"thirty\"\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_check_rejects_zero_interval() {
        let mut config = Config::default();
        config.refresh.interval_secs = 0;
        match config.check() {
            Err(ConfigError::Invalid(summary)) => {
                assert!(summary.contains("refresh.interval_secs"));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_check_passes_with_warnings() {
        let validation = Config::default().check().unwrap();
        assert!(!validation.warnings.is_empty());
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
