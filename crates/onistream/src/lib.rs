// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! OniStream Library for Rust
//!
//! Safe access to OpenNI 2 RGB-D sensors (depth, color and infrared streams),
//! built around two pieces:
//!
//! - [`lifecycle::Session`] owns the device and its three streams and
//!   sequences runtime start, device open, stream create/start, video-mode
//!   changes and teardown. Any failure while initializing rolls everything
//!   back, and dropping the session shuts the sensor down.
//! - [`marshal`] reads one frame from a started stream and copies its
//!   row-major, channel-interleaved buffer into a column-major,
//!   channel-planar array without touching sample values.
//!
//! [`switchyard::Switchyard`] exposes both through the integer-coded
//! operation surface used by array-oriented host environments.
//!
//! # Quick Start
//!
//! ```no_run
//! use onistream::lifecycle::Session;
//! use onistream::marshal::{self, FrameRequest};
//! use onistream::openni::OpenNi;
//! use onistream::{Config, SensorType};
//!
//! let mut session = Session::new(OpenNi::new()?, Config::default());
//! session.initialize()?;
//! let frame = marshal::acquire(&mut session, SensorType::Depth, FrameRequest::all())?;
//! if let Some(data) = frame.data {
//!     println!("depth frame {:?}", data.dims());
//! }
//! # Ok::<(), onistream::Error>(())
//! ```
//!
//! # Testing without hardware
//!
//! Every component is generic over the [`sdk::Sdk`] capability trait, and
//! [`mock::MockSdk`] implements it in memory with fault injection.

use std::{error, fmt, io, time::Duration};

/// The config module provides session options and their environment overrides.
pub mod config;

/// The sensor module provides the sensor data model (stream types, pixel
/// formats, video modes).
pub mod sensor;

/// The sdk module defines the capability contract of the vendor sensor SDK.
pub mod sdk;

/// The openni module provides the OpenNI 2 backend of the sdk contract.
pub mod openni;

/// The mock module provides an in-memory backend of the sdk contract.
pub mod mock;

/// The lifecycle module provides device and stream lifecycle management.
pub mod lifecycle;

/// The marshal module provides frame acquisition and layout conversion.
pub mod marshal;

/// The host module provides the caller-facing array vocabulary.
pub mod host;

/// The report module formats the diagnostic text listings.
pub mod report;

/// The switchyard module provides the integer-coded operation dispatcher.
pub mod switchyard;

pub use config::Config;
pub use lifecycle::Step;
pub use sdk::SdkError;
pub use sensor::{PixelFormat, RegistrationMode, SensorType, VideoMode};

/// Error type for OniStream library operations
#[derive(Debug)]
pub enum Error {
    /// The OpenNI 2 library (libOpenNI2.so) could not be loaded at runtime
    LibraryNotLoaded(openni2_sys::libloading::Error),

    /// Another OpenNI 2 backend is alive in this process
    Busy,

    /// I/O error while writing diagnostic output
    Io(io::Error),

    /// Malformed or out-of-range caller argument, reported before any device
    /// interaction
    InvalidArgument(String),

    /// Runtime start, device open, or stream create/start failed
    Lifecycle { step: Step, source: SdkError },

    /// No device is open; the session was never initialized or was shut down
    NotInitialized,

    /// The stream was never created (sensor absent or session not initialized)
    StreamUnavailable(SensorType),

    /// A read-only query (modes, device info, stream properties) failed
    Query {
        what: &'static str,
        source: SdkError,
    },

    /// Reading a frame from a started stream failed
    Acquisition { sensor: SensorType, source: SdkError },

    /// The frame buffer is smaller than its declared geometry
    ShortFrame { expected: usize, actual: usize },

    /// No frame arrived within the acquisition timeout
    Timeout { sensor: SensorType, timeout: Duration },

    /// The frame's pixel format has no transform family
    UnsupportedFormat(PixelFormat),

    /// Applying a new video mode or registration mode failed
    Reconfiguration {
        sensor: Option<SensorType>,
        source: SdkError,
    },
}

/// Failure classes of [`Error`], matching how callers are expected to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad caller input; nothing was touched.
    Argument,
    /// Sensor bring-up failed; all partial state was torn down.
    Lifecycle,
    /// Frame read failed; stream and device state are unchanged.
    Acquisition,
    /// Frame read but not convertible; the frame was released.
    UnsupportedFormat,
    /// Mode change failed.
    Reconfiguration,
    /// Read-only query failed; nothing changed.
    Query,
    /// Vendor runtime unavailable.
    Library,
    /// Diagnostic output failed.
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::LibraryNotLoaded(_) | Error::Busy => ErrorKind::Library,
            Error::Io(_) => ErrorKind::Io,
            Error::InvalidArgument(_) => ErrorKind::Argument,
            Error::Lifecycle { .. } | Error::NotInitialized | Error::StreamUnavailable(_) => {
                ErrorKind::Lifecycle
            }
            Error::Query { .. } => ErrorKind::Query,
            Error::Acquisition { .. } | Error::ShortFrame { .. } | Error::Timeout { .. } => {
                ErrorKind::Acquisition
            }
            Error::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            Error::Reconfiguration { .. } => ErrorKind::Reconfiguration,
        }
    }

    /// Message identifier reported to host environments alongside the text.
    pub fn id(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Argument => "onistream:arg",
            ErrorKind::Lifecycle => "onistream:init",
            ErrorKind::Acquisition => "onistream:frame",
            ErrorKind::UnsupportedFormat => "onistream:format",
            ErrorKind::Reconfiguration => "onistream:config",
            ErrorKind::Query => "onistream:query",
            ErrorKind::Library => "onistream:library",
            ErrorKind::Io => "onistream:io",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::LibraryNotLoaded(err) => {
                write!(f, "OpenNI 2 library could not be loaded: {}", err)
            }
            Error::Busy => write!(f, "OpenNI 2 runtime is already owned by another session"),
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::InvalidArgument(msg) => write!(f, "{}", msg),
            Error::Lifecycle { step, source } => write!(f, "{} failed: {}", step, source),
            Error::NotInitialized => write!(f, "device is not initialized"),
            Error::StreamUnavailable(sensor) => write!(f, "{} stream is not available", sensor),
            Error::Query { what, source } => write!(f, "couldn't read {}: {}", what, source),
            Error::Acquisition { sensor, source } => {
                write!(f, "problems reading a {} frame: {}", sensor, source)
            }
            Error::ShortFrame { expected, actual } => write!(
                f,
                "frame buffer holds {} bytes, geometry needs {}",
                actual, expected
            ),
            Error::Timeout { sensor, timeout } => {
                write!(f, "no {} frame within {:?}", sensor, timeout)
            }
            Error::UnsupportedFormat(format) => {
                write!(f, "don't know what to do with pixel format {}", format)
            }
            Error::Reconfiguration {
                sensor: Some(sensor),
                source,
            } => write!(f, "couldn't reset {} video mode: {}", sensor, source),
            Error::Reconfiguration {
                sensor: None,
                source,
            } => write!(f, "couldn't set image registration mode: {}", source),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::LibraryNotLoaded(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Lifecycle { source, .. }
            | Error::Acquisition { source, .. }
            | Error::Query { source, .. }
            | Error::Reconfiguration { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<openni2_sys::libloading::Error> for Error {
    fn from(err: openni2_sys::libloading::Error) -> Self {
        Error::LibraryNotLoaded(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

/// Get the OpenNI 2 API version this crate was written against, as
/// `major.minor`.
pub fn api_version() -> String {
    format!(
        "{}.{}",
        openni2_sys::ONI_VERSION_MAJOR,
        openni2_sys::ONI_VERSION_MINOR
    )
}
