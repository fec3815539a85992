// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Device and stream lifecycle
//!
//! A [`Session`] is the single owner of the SDK runtime, the open device and
//! the depth, color and infrared streams. It is the only place that creates,
//! starts, stops or destroys them:
//!
//! ```text
//!  initialize(): runtime start -> device open -> for depth, color, ir:
//!                [create if the sensor exists] -> start
//!  shutdown():   stop + destroy each stream -> close device -> runtime stop
//! ```
//!
//! A failure at any step of `initialize` tears down everything acquired so
//! far, so the session is exactly as it was before the call. Dropping the
//! session shuts it down.

use std::fmt;

use crate::{
    config::Config,
    sdk::{Sdk, SdkError, Status},
    sensor::{DeviceInfo, RegistrationMode, SensorType, StreamInfo, VideoMode},
    Error,
};

/// Initialization step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    RuntimeStart,
    DeviceOpen,
    CreateStream(SensorType),
    StartStream(SensorType),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Step::RuntimeStart => write!(f, "OpenNI initialize"),
            Step::DeviceOpen => write!(f, "device open"),
            Step::CreateStream(sensor) => write!(f, "create {} stream", sensor),
            Step::StartStream(sensor) => write!(f, "start {} stream", sensor),
        }
    }
}

/// Result of a successful [`Session::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Initialized,
    AlreadyInitialized,
}

pub struct Session<S: Sdk> {
    sdk: S,
    config: Config,
    runtime: bool,
    device: Option<S::Device>,
    streams: [Option<S::Stream>; 3],
    started: [bool; 3],
    initialized: bool,
}

impl<S: Sdk> fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("initialized", &self.initialized)
            .field("runtime", &self.runtime)
            .field("device_open", &self.device.is_some())
            .field("started", &self.started)
            .field("config", &self.config)
            .finish()
    }
}

impl<S: Sdk> Session<S> {
    /// Wrap an SDK backend. Nothing is touched until [`Session::initialize`].
    pub fn new(sdk: S, config: Config) -> Self {
        Session {
            sdk,
            config,
            runtime: false,
            device: None,
            streams: [None, None, None],
            started: [false; 3],
            initialized: false,
        }
    }

    /// Bring up runtime, device and streams. A no-op when already
    /// initialized.
    pub fn initialize(&mut self) -> Result<InitOutcome, Error> {
        if self.initialized {
            log::debug!("Already initialized");
            return Ok(InitOutcome::AlreadyInitialized);
        }

        match self.bring_up() {
            Ok(()) => {
                self.initialized = true;
                log::debug!("Session initialized");
                Ok(InitOutcome::Initialized)
            }
            Err(err) => {
                log::warn!("Initialization failed, rolling back: {}", err);
                self.teardown();
                Err(err)
            }
        }
    }

    fn bring_up(&mut self) -> Result<(), Error> {
        self.sdk.initialize().map_err(|source| Error::Lifecycle {
            step: Step::RuntimeStart,
            source,
        })?;
        self.runtime = true;
        log::debug!("OpenNI runtime started");

        let opened = self.sdk.open_device().map_err(|source| Error::Lifecycle {
            step: Step::DeviceOpen,
            source,
        })?;
        let device = self.device.insert(opened);
        log::debug!("Device opened");

        for sensor in SensorType::ALL {
            let slot = sensor.index();

            if self.sdk.has_sensor(device, sensor) {
                let stream = self
                    .sdk
                    .create_stream(device, sensor)
                    .map_err(|source| Error::Lifecycle {
                        step: Step::CreateStream(sensor),
                        source,
                    })?;
                self.streams[slot] = Some(stream);
                log::debug!("Created {} stream", sensor);
            } else if self.config.tolerate_missing_sensors() {
                log::warn!("Device has no {} sensor, skipping stream", sensor);
                continue;
            } else {
                log::warn!("Device has no {} sensor", sensor);
            }

            // A stream that was never created still gets started, which
            // fails the way the SDK fails for an invalid stream.
            match &self.streams[slot] {
                Some(stream) => {
                    self.sdk
                        .start_stream(stream)
                        .map_err(|source| Error::Lifecycle {
                            step: Step::StartStream(sensor),
                            source,
                        })?
                }
                None => {
                    return Err(Error::Lifecycle {
                        step: Step::StartStream(sensor),
                        source: SdkError::new(Status::Error, "stream is not valid"),
                    })
                }
            }
            self.started[slot] = true;
            log::debug!("Started {} stream", sensor);
        }

        Ok(())
    }

    /// Stop and destroy all streams, close the device and stop the runtime.
    /// Safe to call at any time, any number of times.
    pub fn shutdown(&mut self) {
        log::debug!("Shutting down session");
        self.teardown();
    }

    fn teardown(&mut self) {
        for sensor in SensorType::ALL {
            let slot = sensor.index();
            if let Some(stream) = self.streams[slot].take() {
                self.sdk.stop_stream(&stream);
                self.sdk.destroy_stream(stream);
                log::debug!("Destroyed {} stream", sensor);
            }
            self.started[slot] = false;
        }

        if let Some(device) = self.device.take() {
            self.sdk.close_device(device);
            log::debug!("Device closed");
        }

        if self.runtime {
            self.sdk.shutdown();
            self.runtime = false;
            log::debug!("OpenNI runtime stopped");
        }

        self.initialized = false;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sdk(&self) -> &S {
        &self.sdk
    }

    pub fn sdk_mut(&mut self) -> &mut S {
        &mut self.sdk
    }

    pub fn device(&self) -> Option<&S::Device> {
        self.device.as_ref()
    }

    pub fn stream(&self, sensor: SensorType) -> Option<&S::Stream> {
        self.streams[sensor.index()].as_ref()
    }

    pub fn is_created(&self, sensor: SensorType) -> bool {
        self.streams[sensor.index()].is_some()
    }

    pub fn is_started(&self, sensor: SensorType) -> bool {
        self.started[sensor.index()]
    }

    /// Backend and handle of a started stream, for frame capture.
    pub fn capture_stream(&mut self, sensor: SensorType) -> Result<(&mut S, &S::Stream), Error> {
        let slot = sensor.index();
        match &self.streams[slot] {
            Some(stream) if self.started[slot] => Ok((&mut self.sdk, stream)),
            _ => Err(Error::StreamUnavailable(sensor)),
        }
    }

    fn open_device(&self) -> Result<&S::Device, Error> {
        self.device.as_ref().ok_or(Error::NotInitialized)
    }

    fn created_stream(&self, sensor: SensorType) -> Result<&S::Stream, Error> {
        self.streams[sensor.index()]
            .as_ref()
            .ok_or(Error::StreamUnavailable(sensor))
    }

    /// Turn depth-to-color registration on or off.
    pub fn set_registration(&mut self, enabled: bool) -> Result<(), Error> {
        let mode = RegistrationMode::from(enabled);
        let device = self.device.as_ref().ok_or(Error::NotInitialized)?;
        self.sdk
            .set_registration_mode(device, mode)
            .map_err(|source| Error::Reconfiguration {
                sensor: None,
                source,
            })?;
        log::info!("Image registration mode: {}", mode);
        Ok(())
    }

    pub fn registration_mode(&self) -> Result<RegistrationMode, Error> {
        let device = self.open_device()?;
        self.sdk
            .registration_mode(device)
            .map_err(|source| Error::Query {
                what: "image registration mode",
                source,
            })
    }

    /// Whether the device can register depth to color. `false` when no
    /// device is open.
    pub fn registration_supported(&self) -> bool {
        self.device.as_ref().is_some_and(|device| {
            self.sdk
                .is_registration_supported(device, RegistrationMode::DepthToColor)
        })
    }

    pub fn device_info(&self) -> Result<DeviceInfo, Error> {
        let device = self.open_device()?;
        self.sdk
            .device_info(device)
            .map_err(|source| Error::Query {
                what: "device info",
                source,
            })
    }

    /// Supported video modes of a created stream, in SDK order.
    pub fn video_modes(&self, sensor: SensorType) -> Result<Vec<VideoMode>, Error> {
        let stream = self.created_stream(sensor)?;
        self.sdk
            .supported_video_modes(stream)
            .map_err(|source| Error::Query {
                what: "supported video modes",
                source,
            })
    }

    pub fn video_mode(&self, sensor: SensorType) -> Result<VideoMode, Error> {
        let stream = self.created_stream(sensor)?;
        self.sdk.video_mode(stream).map_err(|source| Error::Query {
            what: "video mode",
            source,
        })
    }

    pub fn stream_info(&self, sensor: SensorType) -> Result<StreamInfo, Error> {
        let stream = self.created_stream(sensor)?;
        self.sdk.stream_info(stream).map_err(|source| Error::Query {
            what: "stream info",
            source,
        })
    }

    /// Switch a stream to entry `index` of its supported-mode sequence.
    ///
    /// An index outside `[0, modes)` is rejected before the stream is
    /// touched. Otherwise the stream is stopped, the mode applied, and the
    /// stream restarted whether or not the apply succeeded; a failed apply
    /// leaves the previous mode streaming and is reported as a
    /// reconfiguration error.
    pub fn set_video_mode(&mut self, sensor: SensorType, index: i64) -> Result<VideoMode, Error> {
        let slot = sensor.index();
        let stream = self.streams[slot]
            .as_ref()
            .ok_or(Error::StreamUnavailable(sensor))?;

        let modes = self
            .sdk
            .supported_video_modes(stream)
            .map_err(|source| Error::Query {
                what: "supported video modes",
                source,
            })?;

        let mode = usize::try_from(index)
            .ok()
            .and_then(|i| modes.get(i))
            .copied()
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "invalid videoModeId {} for {} stream (valid: 0..{})",
                    index,
                    sensor,
                    modes.len()
                ))
            })?;

        log::debug!("Switching {} stream to mode {}: {}", sensor, index, mode);

        self.sdk.stop_stream(stream);
        self.started[slot] = false;

        let applied = self.sdk.set_video_mode(stream, &mode);
        let restarted = self.sdk.start_stream(stream);
        self.started[slot] = restarted.is_ok();

        applied.map_err(|source| Error::Reconfiguration {
            sensor: Some(sensor),
            source,
        })?;
        restarted.map_err(|source| Error::Lifecycle {
            step: Step::StartStream(sensor),
            source,
        })?;

        log::info!("{} video mode set to {}", sensor, mode);
        Ok(mode)
    }
}

impl<S: Sdk> Drop for Session<S> {
    fn drop(&mut self) {
        if self.runtime || self.device.is_some() {
            log::debug!("Session dropped while open, shutting down");
            self.shutdown();
        }
    }
}
