// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Capability contract of the vendor sensor SDK
//!
//! The lifecycle manager and the frame marshaler only talk to the sensor
//! through [`Sdk`]. The associated handle types are owned by whoever created
//! them: the SDK never keeps a handle alive behind the owner's back, and
//! dropping a [`Sdk::Frame`] releases its native buffer.

use std::{error, fmt, time::Duration};

use openni2_sys as ffi;

use crate::sensor::{DeviceInfo, PixelFormat, RegistrationMode, SensorType, StreamInfo, VideoMode};

/// Status code reported by the SDK for a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Error,
    NotImplemented,
    NotSupported,
    BadParameter,
    OutOfFlow,
    NoDevice,
    TimeOut,
    Other(i32),
}

impl Status {
    /// Convert a raw `OniStatus`, returning `None` for `ONI_STATUS_OK`.
    pub fn from_raw(raw: ffi::OniStatus) -> Option<Self> {
        match raw {
            ffi::OniStatus_ONI_STATUS_OK => None,
            ffi::OniStatus_ONI_STATUS_ERROR => Some(Status::Error),
            ffi::OniStatus_ONI_STATUS_NOT_IMPLEMENTED => Some(Status::NotImplemented),
            ffi::OniStatus_ONI_STATUS_NOT_SUPPORTED => Some(Status::NotSupported),
            ffi::OniStatus_ONI_STATUS_BAD_PARAMETER => Some(Status::BadParameter),
            ffi::OniStatus_ONI_STATUS_OUT_OF_FLOW => Some(Status::OutOfFlow),
            ffi::OniStatus_ONI_STATUS_NO_DEVICE => Some(Status::NoDevice),
            ffi::OniStatus_ONI_STATUS_TIME_OUT => Some(Status::TimeOut),
            other => Some(Status::Other(other)),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Status::Error => f.write_str("STATUS_ERROR"),
            Status::NotImplemented => f.write_str("STATUS_NOT_IMPLEMENTED"),
            Status::NotSupported => f.write_str("STATUS_NOT_SUPPORTED"),
            Status::BadParameter => f.write_str("STATUS_BAD_PARAMETER"),
            Status::OutOfFlow => f.write_str("STATUS_OUT_OF_FLOW"),
            Status::NoDevice => f.write_str("STATUS_NO_DEVICE"),
            Status::TimeOut => f.write_str("STATUS_TIME_OUT"),
            Status::Other(raw) => write!(f, "STATUS_{}", raw),
        }
    }
}

/// A failed SDK call: its status plus the SDK's extended error text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkError {
    pub status: Status,
    pub detail: String,
}

impl SdkError {
    pub fn new(status: Status, detail: impl Into<String>) -> Self {
        SdkError {
            status,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for SdkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{}", self.status)
        } else {
            write!(f, "{} ({})", self.detail.trim_end(), self.status)
        }
    }
}

impl error::Error for SdkError {}

/// A captured frame borrowed from the SDK.
///
/// The buffer is row-major: row `r` starts at byte `r * stride()` and holds
/// `width()` pixels of the format's sample size.
pub trait RawFrame {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Pixel format of the stream's video mode when the frame was captured.
    fn pixel_format(&self) -> PixelFormat;
    /// Bytes between the starts of consecutive rows.
    fn stride(&self) -> usize;
    fn frame_index(&self) -> u64;
    fn timestamp(&self) -> u64;
    fn data(&self) -> &[u8];
}

/// Operations the sensor SDK must provide.
///
/// None of these calls are expected to be reentrant; callers hold `&mut`
/// access for anything that changes device or stream state.
pub trait Sdk {
    type Device;
    type Stream;
    type Frame: RawFrame;

    /// Start the SDK runtime.
    fn initialize(&mut self) -> Result<(), SdkError>;

    /// Stop the SDK runtime. Safe to call when it was never started.
    fn shutdown(&mut self);

    /// Open the first available device.
    fn open_device(&mut self) -> Result<Self::Device, SdkError>;

    fn close_device(&mut self, device: Self::Device);

    fn device_info(&self, device: &Self::Device) -> Result<DeviceInfo, SdkError>;

    /// Whether the device reports a sensor of this type.
    fn has_sensor(&self, device: &Self::Device, sensor: SensorType) -> bool;

    fn registration_mode(&self, device: &Self::Device) -> Result<RegistrationMode, SdkError>;

    fn set_registration_mode(
        &mut self,
        device: &Self::Device,
        mode: RegistrationMode,
    ) -> Result<(), SdkError>;

    fn is_registration_supported(&self, device: &Self::Device, mode: RegistrationMode) -> bool;

    fn create_stream(
        &mut self,
        device: &Self::Device,
        sensor: SensorType,
    ) -> Result<Self::Stream, SdkError>;

    fn destroy_stream(&mut self, stream: Self::Stream);

    fn start_stream(&mut self, stream: &Self::Stream) -> Result<(), SdkError>;

    /// Stop a stream. Stopping a stream that is not started does nothing.
    fn stop_stream(&mut self, stream: &Self::Stream);

    /// Supported modes in SDK order. The sequence is fixed while the device
    /// stays open.
    fn supported_video_modes(&self, stream: &Self::Stream) -> Result<Vec<VideoMode>, SdkError>;

    fn video_mode(&self, stream: &Self::Stream) -> Result<VideoMode, SdkError>;

    fn set_video_mode(&mut self, stream: &Self::Stream, mode: &VideoMode) -> Result<(), SdkError>;

    fn stream_info(&self, stream: &Self::Stream) -> Result<StreamInfo, SdkError>;

    /// Wait until a frame is ready, returning `false` when the timeout
    /// expires first.
    fn wait_for_frame(&mut self, stream: &Self::Stream, timeout: Duration)
        -> Result<bool, SdkError>;

    /// Block until the stream delivers its next frame.
    fn read_frame(&mut self, stream: &Self::Stream) -> Result<Self::Frame, SdkError>;
}
