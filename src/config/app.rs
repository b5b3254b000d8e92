use serde::Deserialize;
use std::path::Path;

use crate::geo::{DistanceUnit, Position};
use crate::search::DEFAULT_API_URL;

/// Environment variable that overrides `course_api_key`.
pub const API_KEY_ENV: &str = "GOLFTRACKER_API_KEY";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
    #[serde(default = "default_course_api_url")]
    pub course_api_url: String,
    #[serde(default)]
    pub course_api_key: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_distance_unit")]
    pub distance_unit: String,
    #[serde(default = "default_center_lat")]
    pub default_center_lat: f64,
    #[serde(default = "default_center_lon")]
    pub default_center_lon: f64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_storage_path() -> String {
    "./golftracker_rounds.json".to_string()
}
fn default_course_api_url() -> String {
    DEFAULT_API_URL.to_string()
}
fn default_request_timeout_secs() -> u64 {
    10
}
fn default_search_debounce_ms() -> u64 {
    500
}
fn default_distance_unit() -> String {
    "metric".to_string()
}
fn default_center_lat() -> f64 {
    43.45
}
fn default_center_lon() -> f64 {
    -80.49
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            storage_path: default_storage_path(),
            course_api_url: default_course_api_url(),
            course_api_key: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
            search_debounce_ms: default_search_debounce_ms(),
            distance_unit: default_distance_unit(),
            default_center_lat: default_center_lat(),
            default_center_lon: default_center_lon(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        Self::from_toml_str(&content, path)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn from_file_or_default(path: &Path) -> Result<Self, String> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str, source_path: &Path) -> Result<Self, String> {
        let config: AppConfig =
            toml::from_str(content).map_err(|e| format!("{}: {}", source_path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Take the API key from the environment when it is set there.
    pub fn with_env_overrides(mut self) -> Self {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => self.course_api_key = key,
            _ => {}
        }
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        let mut errors = Vec::new();

        if self.storage_path.trim().is_empty() {
            errors.push(
                "storage_path must not be empty. Example: storage_path = \"./golftracker_rounds.json\""
                    .to_string(),
            );
        }

        if !(self.course_api_url.starts_with("http://")
            || self.course_api_url.starts_with("https://"))
        {
            errors.push(format!(
                "course_api_url must start with http:// or https://, got '{}'. Example: course_api_url = \"{}\"",
                self.course_api_url, DEFAULT_API_URL
            ));
        }

        if self.request_timeout_secs == 0 {
            errors.push(format!(
                "request_timeout_secs must be > 0, got {}. Example: request_timeout_secs = 10",
                self.request_timeout_secs
            ));
        }

        if let Err(e) = self.distance_unit.parse::<DistanceUnit>() {
            errors.push(format!("{}. Example: distance_unit = \"metric\"", e));
        }

        if !(-90.0..=90.0).contains(&self.default_center_lat) {
            errors.push(format!(
                "default_center_lat must be -90 to 90, got {}. Example: default_center_lat = 43.45",
                self.default_center_lat
            ));
        }

        if !(-180.0..=180.0).contains(&self.default_center_lon) {
            errors.push(format!(
                "default_center_lon must be -180 to 180, got {}. Example: default_center_lon = -80.49",
                self.default_center_lon
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            errors.push(format!(
                "log_level must be one of {:?}, got '{}'. Example: log_level = \"info\"",
                valid_levels, self.log_level
            ));
        }

        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.log_format.as_str()) {
            errors.push(format!(
                "log_format must be one of {:?}, got '{}'. Example: log_format = \"pretty\"",
                valid_formats, self.log_format
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("\n"))
        }
    }

    pub fn distance_unit(&self) -> DistanceUnit {
        self.distance_unit.parse().unwrap_or_default()
    }

    pub fn default_center(&self) -> Position {
        Position::new(self.default_center_lat, self.default_center_lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn test_path() -> PathBuf {
        PathBuf::from("test-config.toml")
    }

    #[test]
    fn valid_config_loads_all_fields() {
        let toml = r#"
            storage_path = "./data/rounds.json"
            course_api_url = "http://localhost:9000/v1"
            course_api_key = "abc123"
            request_timeout_secs = 3
            search_debounce_ms = 250
            distance_unit = "imperial"
            default_center_lat = 36.57
            default_center_lon = -121.95
            log_level = "debug"
            log_format = "json"
        "#;
        let config = AppConfig::from_toml_str(toml, &test_path()).unwrap();
        assert_eq!(config.storage_path, "./data/rounds.json");
        assert_eq!(config.course_api_url, "http://localhost:9000/v1");
        assert_eq!(config.course_api_key, "abc123");
        assert_eq!(config.request_timeout_secs, 3);
        assert_eq!(config.search_debounce_ms, 250);
        assert_eq!(config.distance_unit(), DistanceUnit::Imperial);
        assert_eq!(config.default_center(), Position::new(36.57, -121.95));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, "json");
    }

    #[test]
    fn defaults_applied_for_empty_config() {
        let config = AppConfig::from_toml_str("", &test_path()).unwrap();
        assert_eq!(config.storage_path, "./golftracker_rounds.json");
        assert_eq!(config.course_api_url, DEFAULT_API_URL);
        assert!(config.course_api_key.is_empty());
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.search_debounce_ms, 500);
        assert_eq!(config.distance_unit(), DistanceUnit::Metric);
        assert_eq!(config.default_center(), Position::new(43.45, -80.49));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, "pretty");
    }

    #[test]
    fn default_impl_matches_empty_file() {
        let from_toml = AppConfig::from_toml_str("", &test_path()).unwrap();
        let default = AppConfig::default();
        assert_eq!(from_toml.storage_path, default.storage_path);
        assert_eq!(from_toml.course_api_url, default.course_api_url);
        assert_eq!(from_toml.search_debounce_ms, default.search_debounce_ms);
        assert!(default.validate().is_ok());
    }

    #[test]
    fn invalid_distance_unit_rejected() {
        let err =
            AppConfig::from_toml_str(r#"distance_unit = "furlongs""#, &test_path()).unwrap_err();
        assert!(err.contains("distance unit"));
    }

    #[test]
    fn invalid_api_url_rejected() {
        let err = AppConfig::from_toml_str(r#"course_api_url = "ftp://x""#, &test_path())
            .unwrap_err();
        assert!(err.contains("course_api_url"));
    }

    #[test]
    fn out_of_range_center_rejected() {
        let err = AppConfig::from_toml_str("default_center_lat = 91.0", &test_path()).unwrap_err();
        assert!(err.contains("default_center_lat"));
        let err =
            AppConfig::from_toml_str("default_center_lon = -200.0", &test_path()).unwrap_err();
        assert!(err.contains("default_center_lon"));
    }

    #[test]
    fn invalid_log_level_rejected() {
        let err =
            AppConfig::from_toml_str(r#"log_level = "verbose""#, &test_path()).unwrap_err();
        assert!(err.contains("log_level"));
    }

    #[test]
    fn multiple_errors_reported_together() {
        let toml = "request_timeout_secs = 0\nstorage_path = \"\"\nlog_format = \"xml\"";
        let err = AppConfig::from_toml_str(toml, &test_path()).unwrap_err();
        assert!(err.contains("request_timeout_secs"));
        assert!(err.contains("storage_path"));
        assert!(err.contains("log_format"));
    }

    #[test]
    fn malformed_toml_includes_source_path() {
        let err = AppConfig::from_toml_str("log_level = [invalid", &test_path()).unwrap_err();
        assert!(err.contains("test-config.toml"));
    }

    #[test]
    fn from_file_loads_valid_config() {
        let mut tmp = NamedTempFile::new().unwrap();
        use std::io::Write;
        writeln!(tmp, "search_debounce_ms = 100").unwrap();
        let config = AppConfig::from_file(tmp.path()).unwrap();
        assert_eq!(config.search_debounce_ms, 100);
    }

    #[test]
    fn from_file_missing_file_error() {
        let err = AppConfig::from_file(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(err.contains("Cannot read"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config =
            AppConfig::from_file_or_default(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.storage_path, "./golftracker_rounds.json");
    }
}
