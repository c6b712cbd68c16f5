//! Climate API Core Library
//!
//! Shared pieces for the climate API server:
//! - Configuration file discovery and loading (XDG-compliant)
//! - Filesystem checks for the read-only dataset
//! - Application defaults

mod config;
pub mod fs;

pub use config::{find_config_file, load_config, ConfigSource};
pub use fs::require_file;

/// Application name used for XDG paths
pub const APP_NAME: &str = "climate-api";

/// Config file name searched for in the standard locations
pub const CONFIG_FILE_NAME: &str = "climate-api.toml";

/// Environment variable holding an explicit config file path
pub const CONFIG_ENV_VAR: &str = "CLIMATE_API_CONFIG";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5000;

/// Default location of the pre-populated observation dataset
pub const DEFAULT_DATABASE_PATH: &str = "./Resources/hawaii.sqlite";

/// Station whose temperature readings `/api/v1.0/tobs` reports (the most active one)
pub const DEFAULT_TOBS_STATION: &str = "USC00519281";

/// Length of the trailing window used by the last-12-months routes
pub const DEFAULT_WINDOW_DAYS: i64 = 365;

/// Default size of the SQLite connection pool
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
