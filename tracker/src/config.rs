//! Configuration for the engagement tracker.
//!
//! This module handles parsing configuration from environment variables.
//!
//! # Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `ENGAGE_DATA_DIR` | No | `~/.engage` | Directory holding the record file |
//! | `ENGAGE_RECENT_CAP` | No | 50 | Recent-events history cap (1-100) |
//! | `ENGAGE_SNAPSHOT_EVENTS` | No | 10 | Events included in a snapshot (1-10) |
//!
//! # Example
//!
//! ```no_run
//! use engage_tracker::config::Config;
//!
//! let config = Config::from_env().expect("Failed to load configuration");
//! println!("Data directory: {}", config.data_dir.display());
//! ```

use std::env;
use std::path::PathBuf;

use directories::BaseDirs;
use thiserror::Error;

/// Default data directory name relative to home.
const DEFAULT_DATA_DIR: &str = ".engage";

/// Default cap on the recent-events history.
const DEFAULT_RECENT_CAP: usize = 50;

/// Minimum allowed recent-events cap.
const MIN_RECENT_CAP: usize = 1;

/// Maximum allowed recent-events cap.
const MAX_RECENT_CAP: usize = 100;

/// Default number of events included in a snapshot.
const DEFAULT_SNAPSHOT_EVENTS: usize = 10;

/// Maximum number of events included in a snapshot.
const MAX_SNAPSHOT_EVENTS: usize = 10;

/// Errors that can occur during configuration parsing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has an invalid value.
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to determine home directory.
    #[error("failed to determine home directory")]
    NoHomeDirectory,
}

/// Configuration for the engagement tracker.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the persisted record file.
    pub data_dir: PathBuf,

    /// Strict cap on the recent-events history (oldest evicted first).
    pub recent_cap: usize,

    /// Number of most-recent events included in a query snapshot.
    pub snapshot_events: usize,
}

impl Default for Config {
    /// Default configuration with an in-repo-friendly fallback data
    /// directory (`./.engage`) for hosts that skip [`Config::from_env`].
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            recent_cap: DEFAULT_RECENT_CAP,
            snapshot_events: DEFAULT_SNAPSHOT_EVENTS,
        }
    }
}

impl Config {
    /// Creates a new `Config` by parsing environment variables.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if:
    /// - `ENGAGE_RECENT_CAP` is set but is not an integer in 1-100
    /// - `ENGAGE_SNAPSHOT_EVENTS` is set but is not an integer in 1-10
    /// - The home directory cannot be determined (needed for the default
    ///   data directory)
    pub fn from_env() -> Result<Self, ConfigError> {
        // Optional: ENGAGE_DATA_DIR (default: ~/.engage)
        let data_dir = match env::var("ENGAGE_DATA_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => {
                let base_dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDirectory)?;
                base_dirs.home_dir().join(DEFAULT_DATA_DIR)
            }
        };

        // Optional: ENGAGE_RECENT_CAP (default: 50, must be 1-100)
        let recent_cap = match env::var("ENGAGE_RECENT_CAP") {
            Ok(val) => {
                let cap = val.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                    key: "ENGAGE_RECENT_CAP".to_string(),
                    message: format!("expected integer 1-100, got '{val}'"),
                })?;
                if !(MIN_RECENT_CAP..=MAX_RECENT_CAP).contains(&cap) {
                    return Err(ConfigError::InvalidValue {
                        key: "ENGAGE_RECENT_CAP".to_string(),
                        message: format!(
                            "cap must be between {MIN_RECENT_CAP} and {MAX_RECENT_CAP}, got {cap}"
                        ),
                    });
                }
                cap
            }
            Err(_) => DEFAULT_RECENT_CAP,
        };

        // Optional: ENGAGE_SNAPSHOT_EVENTS (default: 10, must be 1-10)
        let snapshot_events = match env::var("ENGAGE_SNAPSHOT_EVENTS") {
            Ok(val) => {
                let count = val.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                    key: "ENGAGE_SNAPSHOT_EVENTS".to_string(),
                    message: format!("expected integer 1-10, got '{val}'"),
                })?;
                if !(1..=MAX_SNAPSHOT_EVENTS).contains(&count) {
                    return Err(ConfigError::InvalidValue {
                        key: "ENGAGE_SNAPSHOT_EVENTS".to_string(),
                        message: format!(
                            "snapshot size must be between 1 and {MAX_SNAPSHOT_EVENTS}, got {count}"
                        ),
                    });
                }
                count
            }
            Err(_) => DEFAULT_SNAPSHOT_EVENTS,
        };

        Ok(Self {
            data_dir,
            recent_cap,
            snapshot_events,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    /// Helper to run tests with isolated environment variables.
    /// Clears all ENGAGE_* vars before the test and restores them after.
    fn with_clean_env<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let saved_vars: Vec<(String, String)> = env::vars()
            .filter(|(k, _)| k.starts_with("ENGAGE_"))
            .collect();

        for (key, _) in &saved_vars {
            env::remove_var(key);
        }

        let result = f();

        for (key, value) in saved_vars {
            env::set_var(key, value);
        }

        result
    }

    #[test]
    #[serial]
    fn minimal_config_uses_defaults() {
        with_clean_env(|| {
            let config = Config::from_env().expect("should parse minimal config");

            assert!(config.data_dir.ends_with(DEFAULT_DATA_DIR));
            assert_eq!(config.recent_cap, DEFAULT_RECENT_CAP);
            assert_eq!(config.snapshot_events, DEFAULT_SNAPSHOT_EVENTS);
        });
    }

    #[test]
    #[serial]
    fn full_config_from_env() {
        with_clean_env(|| {
            env::set_var("ENGAGE_DATA_DIR", "/custom/data");
            env::set_var("ENGAGE_RECENT_CAP", "75");
            env::set_var("ENGAGE_SNAPSHOT_EVENTS", "5");

            let config = Config::from_env().expect("should parse full config");

            assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
            assert_eq!(config.recent_cap, 75);
            assert_eq!(config.snapshot_events, 5);
        });
    }

    #[test]
    #[serial]
    fn invalid_recent_cap_rejected() {
        with_clean_env(|| {
            env::set_var("ENGAGE_RECENT_CAP", "not-a-number");

            let result = Config::from_env();
            assert!(result.is_err());

            let err = result.unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidValue { ref key, .. } if key == "ENGAGE_RECENT_CAP"
            ));
        });
    }

    #[test]
    #[serial]
    fn zero_recent_cap_rejected() {
        with_clean_env(|| {
            env::set_var("ENGAGE_RECENT_CAP", "0");

            let result = Config::from_env();
            assert!(result.is_err());

            let err = result.unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidValue { ref key, ref message }
                    if key == "ENGAGE_RECENT_CAP" && message.contains("between 1 and 100")
            ));
        });
    }

    #[test]
    #[serial]
    fn oversized_recent_cap_rejected() {
        with_clean_env(|| {
            env::set_var("ENGAGE_RECENT_CAP", "101");

            let result = Config::from_env();
            assert!(result.is_err());
        });
    }

    #[test]
    #[serial]
    fn boundary_recent_caps_accepted() {
        with_clean_env(|| {
            env::set_var("ENGAGE_RECENT_CAP", "1");
            assert_eq!(Config::from_env().unwrap().recent_cap, 1);

            env::set_var("ENGAGE_RECENT_CAP", "100");
            assert_eq!(Config::from_env().unwrap().recent_cap, 100);
        });
    }

    #[test]
    #[serial]
    fn oversized_snapshot_events_rejected() {
        with_clean_env(|| {
            env::set_var("ENGAGE_SNAPSHOT_EVENTS", "11");

            let result = Config::from_env();
            assert!(result.is_err());

            let err = result.unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidValue { ref key, ref message }
                    if key == "ENGAGE_SNAPSHOT_EVENTS" && message.contains("between 1 and 10")
            ));
        });
    }

    #[test]
    #[serial]
    fn zero_snapshot_events_rejected() {
        with_clean_env(|| {
            env::set_var("ENGAGE_SNAPSHOT_EVENTS", "0");

            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn default_config_is_bounded() {
        let config = Config::default();

        assert!((MIN_RECENT_CAP..=MAX_RECENT_CAP).contains(&config.recent_cap));
        assert!(config.snapshot_events <= MAX_SNAPSHOT_EVENTS);
    }
}
