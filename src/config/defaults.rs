//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Accuracy (meters) at which acquisition considers the goal met
pub const DEFAULT_DESIRED_ACCURACY_METERS: f64 = 10.0;

/// Fixes older than this are treated as cached readings and rejected
pub const DEFAULT_MAX_FIX_AGE_SECS: u64 = 5;

/// Movement below this distance counts as no progress
pub const DEFAULT_MIN_PROGRESS_METERS: f64 = 1.0;

/// How long no-progress is tolerated while a lookup is in flight
pub const DEFAULT_PROGRESS_TIMEOUT_SECS: u64 = 10;

/// Default location source
pub const DEFAULT_SOURCE: &str = "sim";

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7878;

/// Simulated source: default center latitude (Times Square)
pub const DEFAULT_SIM_LAT: f64 = 40.758;

/// Simulated source: default center longitude
pub const DEFAULT_SIM_LNG: f64 = -73.9855;

/// Simulated source: accuracy of the first emitted fix
pub const DEFAULT_SIM_INITIAL_ACCURACY_METERS: f64 = 165.0;

/// Simulated source: best accuracy the simulation reaches
pub const DEFAULT_SIM_FLOOR_ACCURACY_METERS: f64 = 5.0;

/// Simulated source: per-tick accuracy multiplier
pub const DEFAULT_SIM_CONVERGENCE_FACTOR: f64 = 0.55;

/// Simulated source: milliseconds between emitted events
pub const DEFAULT_SIM_INTERVAL_MS: u64 = 1000;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "geofix";
