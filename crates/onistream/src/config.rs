// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use std::{env, time::Duration};

/// Environment variable enabling [`Config::tolerate_missing_sensors`].
pub const ENV_TOLERATE_MISSING_SENSORS: &str = "ONISTREAM_TOLERATE_MISSING_SENSORS";

/// Environment variable setting [`Config::acquire_timeout`] in milliseconds.
pub const ENV_ACQUIRE_TIMEOUT_MS: &str = "ONISTREAM_ACQUIRE_TIMEOUT_MS";

/// Session options.
///
/// The defaults reproduce the classic behavior: every stream is started even
/// when its sensor is absent (so a missing sensor fails initialization), and
/// frame reads block until the sensor delivers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// skip streams whose sensor the device does not report
    tolerate_missing_sensors: bool,

    /// wait at most this long for a frame, `None` blocks forever
    acquire_timeout: Option<Duration>,
}

impl Config {
    pub fn with_missing_sensors_tolerated(self, tolerate: bool) -> Config {
        Config {
            tolerate_missing_sensors: tolerate,
            acquire_timeout: self.acquire_timeout,
        }
    }

    pub fn with_acquire_timeout(self, timeout: Option<Duration>) -> Config {
        Config {
            tolerate_missing_sensors: self.tolerate_missing_sensors,
            acquire_timeout: timeout,
        }
    }

    /// Default configuration overridden by `ONISTREAM_*` environment
    /// variables. Unparsable values are logged and ignored.
    pub fn from_env() -> Config {
        let mut config = Config::default();

        if let Ok(value) = env::var(ENV_TOLERATE_MISSING_SENSORS) {
            match parse_flag(&value) {
                Some(flag) => config.tolerate_missing_sensors = flag,
                None => log::warn!(
                    "Ignoring {}={:?}: expected 0/1/true/false",
                    ENV_TOLERATE_MISSING_SENSORS,
                    value
                ),
            }
        }

        if let Ok(value) = env::var(ENV_ACQUIRE_TIMEOUT_MS) {
            match value.trim().parse::<u64>() {
                Ok(0) => config.acquire_timeout = None,
                Ok(ms) => config.acquire_timeout = Some(Duration::from_millis(ms)),
                Err(_) => log::warn!(
                    "Ignoring {}={:?}: expected milliseconds",
                    ENV_ACQUIRE_TIMEOUT_MS,
                    value
                ),
            }
        }

        config
    }

    pub fn tolerate_missing_sensors(&self) -> bool {
        self.tolerate_missing_sensors
    }

    pub fn acquire_timeout(&self) -> Option<Duration> {
        self.acquire_timeout
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults_match_classic_behavior() {
        let config = Config::default();
        assert!(!config.tolerate_missing_sensors());
        assert_eq!(config.acquire_timeout(), None);
    }

    #[test]
    fn test_builder() {
        let config = Config::default()
            .with_missing_sensors_tolerated(true)
            .with_acquire_timeout(Some(Duration::from_millis(250)));
        assert!(config.tolerate_missing_sensors());
        assert_eq!(config.acquire_timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    #[serial]
    fn test_from_env() {
        env::set_var(ENV_TOLERATE_MISSING_SENSORS, "yes");
        env::set_var(ENV_ACQUIRE_TIMEOUT_MS, "1500");
        let config = Config::from_env();
        assert!(config.tolerate_missing_sensors());
        assert_eq!(config.acquire_timeout(), Some(Duration::from_millis(1500)));

        env::set_var(ENV_ACQUIRE_TIMEOUT_MS, "soon");
        env::set_var(ENV_TOLERATE_MISSING_SENSORS, "perhaps");
        let config = Config::from_env();
        assert_eq!(config, Config::default());

        env::remove_var(ENV_TOLERATE_MISSING_SENSORS);
        env::remove_var(ENV_ACQUIRE_TIMEOUT_MS);
    }
}
