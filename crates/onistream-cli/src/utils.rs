// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::error::CliError;
use clap::ValueEnum;
use onistream::host::{Array, Data};
use onistream::lifecycle::Session;
use onistream::openni::OpenNi;
use onistream::{Config, SensorType};
use signal_hook::consts::SIGINT;
use signal_hook::flag;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// Global options shared by every subcommand
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    pub json: bool,
    pub timeout_ms: Option<u64>,
    pub tolerate_missing_sensors: bool,
}

impl Options {
    /// Session configuration from `ONISTREAM_*` variables, overridden by flags
    pub fn config(&self) -> Config {
        let mut config = Config::from_env();
        if self.tolerate_missing_sensors {
            config = config.with_missing_sensors_tolerated(true);
        }
        match self.timeout_ms {
            Some(0) => config.with_acquire_timeout(None),
            Some(ms) => config.with_acquire_timeout(Some(Duration::from_millis(ms))),
            None => config,
        }
    }
}

/// Stream selector accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamArg {
    Depth,
    Color,
    #[value(alias = "infrared")]
    Ir,
}

impl From<StreamArg> for SensorType {
    fn from(arg: StreamArg) -> Self {
        match arg {
            StreamArg::Depth => SensorType::Depth,
            StreamArg::Color => SensorType::Color,
            StreamArg::Ir => SensorType::Infrared,
        }
    }
}

/// Load the OpenNI 2 runtime and wrap it in an uninitialized session
pub fn open_session(options: &Options) -> Result<Session<OpenNi>, CliError> {
    let sdk = OpenNi::new()?;
    let config = options.config();
    log::debug!("Session config: {:?}", config);
    Ok(Session::new(sdk, config))
}

/// Raw native-endian bytes of an array's column-major payload
pub fn array_bytes(array: Array) -> Vec<u8> {
    match array.into_data() {
        Data::UInt8(v) => v,
        Data::UInt16(v) => v.iter().flat_map(|x| x.to_ne_bytes()).collect(),
        Data::UInt64(v) => v.iter().flat_map(|x| x.to_ne_bytes()).collect(),
        Data::Double(v) => v.iter().flat_map(|x| x.to_ne_bytes()).collect(),
    }
}

/// Install signal handler for graceful shutdown
///
/// Returns an `Arc<AtomicBool>` that will be set to true when SIGINT is received
pub fn install_signal_handler() -> Result<Arc<AtomicBool>, CliError> {
    let term = Arc::new(AtomicBool::new(false));
    flag::register(SIGINT, Arc::clone(&term))
        .map_err(|e| CliError::General(format!("Failed to install signal handler: {}", e)))?;
    Ok(term)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_arg_mapping() {
        assert_eq!(SensorType::from(StreamArg::Depth), SensorType::Depth);
        assert_eq!(SensorType::from(StreamArg::Color), SensorType::Color);
        assert_eq!(SensorType::from(StreamArg::Ir), SensorType::Infrared);
        assert_eq!(
            StreamArg::from_str("infrared", true).unwrap(),
            StreamArg::Ir
        );
    }

    #[test]
    fn test_timeout_flag_overrides() {
        let options = Options {
            timeout_ms: Some(250),
            ..Default::default()
        };
        assert_eq!(
            options.config().acquire_timeout(),
            Some(Duration::from_millis(250))
        );

        let options = Options {
            timeout_ms: Some(0),
            ..Default::default()
        };
        assert_eq!(options.config().acquire_timeout(), None);
    }

    #[test]
    fn test_tolerate_flag() {
        let options = Options {
            tolerate_missing_sensors: true,
            ..Default::default()
        };
        assert!(options.config().tolerate_missing_sensors());
    }

    #[test]
    fn test_array_bytes() {
        let array = Array::new(vec![1, 2], Data::UInt16(vec![0x0102, 0x0304])).unwrap();
        let bytes = array_bytes(array);
        assert_eq!(bytes.len(), 4);
        assert_eq!(u16::from_ne_bytes([bytes[0], bytes[1]]), 0x0102);
        assert_eq!(u16::from_ne_bytes([bytes[2], bytes[3]]), 0x0304);

        assert_eq!(array_bytes(Array::uint64(7)).len(), 8);

        let planes = Array::new(vec![1, 1, 3], Data::UInt8(vec![10, 20, 30])).unwrap();
        assert_eq!(array_bytes(planes), vec![10, 20, 30]);
    }
}
