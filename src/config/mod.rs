//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/geofix/config.toml

pub mod defaults;

use crate::constants::api::NOMINATIM_URL;
use crate::error::{Error, Result};
use crate::fix::filter::FixFilter;
use crate::fix::policy::StopPolicy;
use chrono::Duration;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default values for CLI commands
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Acquisition tuning
    #[serde(default)]
    pub acquisition: AcquisitionConfig,

    /// Geocoder settings
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Simulated source settings
    #[serde(default)]
    pub sim: SimConfig,
}

/// Default values for CLI commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default location source
    #[serde(default = "default_source")]
    pub source: String,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,
}

/// Acquisition tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    /// Accuracy (meters) at which the goal is met
    #[serde(default = "default_desired_accuracy")]
    pub desired_accuracy_meters: f64,

    /// Fixes older than this many seconds are rejected as cached
    #[serde(default = "default_max_fix_age")]
    pub max_fix_age_secs: u64,

    /// Movement below this distance (meters) counts as no progress
    #[serde(default = "default_min_progress")]
    pub min_progress_meters: f64,

    /// Seconds of no progress tolerated while a lookup is in flight
    #[serde(default = "default_progress_timeout")]
    pub progress_timeout_secs: u64,
}

impl AcquisitionConfig {
    /// Build the fix filter for this tuning
    pub fn filter(&self) -> FixFilter {
        FixFilter::new(Duration::seconds(self.max_fix_age_secs as i64))
    }

    /// Build the stop policy for this tuning
    pub fn policy(&self) -> StopPolicy {
        StopPolicy::new(
            self.desired_accuracy_meters,
            self.min_progress_meters,
            Duration::seconds(self.progress_timeout_secs as i64),
        )
    }
}

/// Geocoder settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Nominatim endpoint (self-hosted instances welcome)
    #[serde(default = "default_geocoder_endpoint")]
    pub endpoint: String,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Simulated source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Center latitude
    #[serde(default = "default_sim_lat")]
    pub lat: f64,

    /// Center longitude
    #[serde(default = "default_sim_lng")]
    pub lng: f64,

    /// Accuracy of the first emitted fix
    #[serde(default = "default_sim_initial_accuracy")]
    pub initial_accuracy_meters: f64,

    /// Best accuracy the simulation reaches
    #[serde(default = "default_sim_floor_accuracy")]
    pub floor_accuracy_meters: f64,

    /// Per-tick accuracy multiplier
    #[serde(default = "default_sim_convergence")]
    pub convergence_factor: f64,

    /// Milliseconds between emitted events
    #[serde(default = "default_sim_interval")]
    pub interval_ms: u64,

    /// RNG seed for reproducible runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Probability per tick of a transient error instead of a fix
    #[serde(default)]
    pub transient_error_rate: f64,
}

// Default value functions for serde
fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}
fn default_desired_accuracy() -> f64 {
    DEFAULT_DESIRED_ACCURACY_METERS
}
fn default_max_fix_age() -> u64 {
    DEFAULT_MAX_FIX_AGE_SECS
}
fn default_min_progress() -> f64 {
    DEFAULT_MIN_PROGRESS_METERS
}
fn default_progress_timeout() -> u64 {
    DEFAULT_PROGRESS_TIMEOUT_SECS
}
fn default_geocoder_endpoint() -> String {
    NOMINATIM_URL.to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_sim_lat() -> f64 {
    DEFAULT_SIM_LAT
}
fn default_sim_lng() -> f64 {
    DEFAULT_SIM_LNG
}
fn default_sim_initial_accuracy() -> f64 {
    DEFAULT_SIM_INITIAL_ACCURACY_METERS
}
fn default_sim_floor_accuracy() -> f64 {
    DEFAULT_SIM_FLOOR_ACCURACY_METERS
}
fn default_sim_convergence() -> f64 {
    DEFAULT_SIM_CONVERGENCE_FACTOR
}
fn default_sim_interval() -> u64 {
    DEFAULT_SIM_INTERVAL_MS
}

// Implement Default traits
impl Default for Config {
    fn default() -> Self {
        Self {
            defaults: DefaultsConfig::default(),
            acquisition: AcquisitionConfig::default(),
            geocoder: GeocoderConfig::default(),
            server: ServerConfig::default(),
            sim: SimConfig::default(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            format: default_format(),
        }
    }
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            desired_accuracy_meters: default_desired_accuracy(),
            max_fix_age_secs: default_max_fix_age(),
            min_progress_meters: default_min_progress(),
            progress_timeout_secs: default_progress_timeout(),
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_geocoder_endpoint(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            lat: default_sim_lat(),
            lng: default_sim_lng(),
            initial_accuracy_meters: default_sim_initial_accuracy(),
            floor_accuracy_meters: default_sim_floor_accuracy(),
            convergence_factor: default_sim_convergence(),
            interval_ms: default_sim_interval(),
            seed: None,
            transient_error_rate: 0.0,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            Self::load_from(path)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["defaults", "source"] => Some(self.defaults.source.clone()),
            ["defaults", "format"] => Some(self.defaults.format.clone()),

            ["acquisition", "desired_accuracy_meters"] => {
                Some(self.acquisition.desired_accuracy_meters.to_string())
            }
            ["acquisition", "max_fix_age_secs"] => {
                Some(self.acquisition.max_fix_age_secs.to_string())
            }
            ["acquisition", "min_progress_meters"] => {
                Some(self.acquisition.min_progress_meters.to_string())
            }
            ["acquisition", "progress_timeout_secs"] => {
                Some(self.acquisition.progress_timeout_secs.to_string())
            }

            ["geocoder", "endpoint"] => Some(self.geocoder.endpoint.clone()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["sim", "lat"] => Some(self.sim.lat.to_string()),
            ["sim", "lng"] => Some(self.sim.lng.to_string()),
            ["sim", "interval_ms"] => Some(self.sim.interval_ms.to_string()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["defaults", "source"] => {
                self.defaults.source = value.to_string();
            }
            ["defaults", "format"] => {
                self.defaults.format = value.to_string();
            }

            ["acquisition", "desired_accuracy_meters"] => {
                self.acquisition.desired_accuracy_meters = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid accuracy value: {}", value)))?;
            }
            ["acquisition", "max_fix_age_secs"] => {
                self.acquisition.max_fix_age_secs = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid age value: {}", value)))?;
            }
            ["acquisition", "min_progress_meters"] => {
                self.acquisition.min_progress_meters = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid distance value: {}", value)))?;
            }
            ["acquisition", "progress_timeout_secs"] => {
                self.acquisition.progress_timeout_secs = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid timeout value: {}", value)))?;
            }

            ["geocoder", "endpoint"] => {
                self.geocoder.endpoint = value.to_string();
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid port value: {}", value)))?;
            }

            ["sim", "lat"] => {
                self.sim.lat = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid latitude value: {}", value)))?;
            }
            ["sim", "lng"] => {
                self.sim.lng = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid longitude value: {}", value)))?;
            }
            ["sim", "interval_ms"] => {
                self.sim.interval_ms = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid interval value: {}", value)))?;
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "defaults.source",
            "defaults.format",
            "acquisition.desired_accuracy_meters",
            "acquisition.max_fix_age_secs",
            "acquisition.min_progress_meters",
            "acquisition.progress_timeout_secs",
            "geocoder.endpoint",
            "server.host",
            "server.port",
            "sim.lat",
            "sim.lng",
            "sim.interval_ms",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.defaults.source, "sim");
        assert_eq!(config.acquisition.desired_accuracy_meters, 10.0);
        assert_eq!(config.acquisition.max_fix_age_secs, 5);
        assert_eq!(config.acquisition.min_progress_meters, 1.0);
        assert_eq!(config.acquisition.progress_timeout_secs, 10);
        assert!(config.geocoder.endpoint.contains("nominatim"));
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.acquisition.desired_accuracy_meters = 25.0;
        config.sim.seed = Some(42);

        let content = toml::to_string_pretty(&config).unwrap();
        std::fs::write(&path, content).unwrap();

        let loaded = Config::load_from(path).unwrap();
        assert_eq!(loaded.acquisition.desired_accuracy_meters, 25.0);
        assert_eq!(loaded.sim.seed, Some(42));
        // Untouched sections keep their defaults
        assert_eq!(loaded.server.port, DEFAULT_PORT);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[acquisition]\ndesired_accuracy_meters = 50.0\n").unwrap();

        let loaded = Config::load_from(path).unwrap();
        assert_eq!(loaded.acquisition.desired_accuracy_meters, 50.0);
        assert_eq!(loaded.acquisition.max_fix_age_secs, DEFAULT_MAX_FIX_AGE_SECS);
        assert_eq!(loaded.defaults.format, DEFAULT_FORMAT);
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        config.set("acquisition.desired_accuracy_meters", "15").unwrap();
        assert_eq!(
            config.get("acquisition.desired_accuracy_meters"),
            Some("15".to_string())
        );

        config.set("server.port", "8080").unwrap();
        assert_eq!(config.server.port, 8080);

        assert!(config.set("server.port", "not-a-port").is_err());
        assert!(config.set("bogus.key", "1").is_err());
        assert_eq!(config.get("bogus.key"), None);
    }

    #[test]
    fn test_available_keys_resolve() {
        let config = Config::default();
        for key in Config::available_keys() {
            assert!(config.get(key).is_some(), "key {} should resolve", key);
        }
    }

    #[test]
    fn test_acquisition_tuning_builders() {
        let config = AcquisitionConfig::default();
        let policy = config.policy();
        let filter = config.filter();

        // Smoke-check the built decision functions against known values
        use crate::coord::Coordinates;
        use crate::fix::policy::StopDecision;
        use crate::fix::Fix;
        use chrono::Utc;

        let now = Utc::now();
        let fix = Fix::new(Coordinates::new(0.0, 0.0), 8.0, now);
        assert!(filter.accept(None, &fix, now));
        assert_eq!(policy.evaluate(None, &fix, false), StopDecision::GoalMet);
    }
}
