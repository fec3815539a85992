// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Sensor data model
//!
//! - [`SensorType`] - The three stream kinds a device can expose
//! - [`PixelFormat`] - Sample encoding of a stream's frames
//! - [`Layout`] - The transform family a pixel format is marshaled with
//! - [`VideoMode`] - Resolution, frame rate and pixel format of a stream
//! - [`RegistrationMode`] - Depth-to-color image registration
//! - [`DeviceInfo`] / [`StreamInfo`] - Read-only descriptors for diagnostics

use std::fmt;

use openni2_sys as ffi;

/// Logical data channel of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SensorType {
    Depth,
    Color,
    Infrared,
}

impl SensorType {
    /// Streams in the order they are created and started.
    pub const ALL: [SensorType; 3] = [SensorType::Depth, SensorType::Color, SensorType::Infrared];

    /// Slot of this sensor in per-stream tables, following [`SensorType::ALL`].
    pub fn index(self) -> usize {
        match self {
            SensorType::Depth => 0,
            SensorType::Color => 1,
            SensorType::Infrared => 2,
        }
    }

    /// Convert from raw `OniSensorType` value
    pub fn from_raw(raw: ffi::OniSensorType) -> Option<Self> {
        match raw {
            ffi::OniSensorType_ONI_SENSOR_DEPTH => Some(SensorType::Depth),
            ffi::OniSensorType_ONI_SENSOR_COLOR => Some(SensorType::Color),
            ffi::OniSensorType_ONI_SENSOR_IR => Some(SensorType::Infrared),
            _ => None,
        }
    }

    pub fn to_raw(self) -> ffi::OniSensorType {
        match self {
            SensorType::Depth => ffi::OniSensorType_ONI_SENSOR_DEPTH,
            SensorType::Color => ffi::OniSensorType_ONI_SENSOR_COLOR,
            SensorType::Infrared => ffi::OniSensorType_ONI_SENSOR_IR,
        }
    }

    /// Get human-readable name for this sensor
    pub fn as_str(self) -> &'static str {
        match self {
            SensorType::Depth => "depth",
            SensorType::Color => "color",
            SensorType::Infrared => "ir",
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sample encoding of a frame buffer.
///
/// Values outside the OpenNI 2.2 set are kept as [`PixelFormat::Unknown`] so
/// they can be reported rather than silently coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 16-bit depth in millimetres
    Depth1Mm,
    /// 16-bit depth in 100 micrometre units
    Depth100Um,
    /// Packed 9.2 disparity shift values
    Shift92,
    /// Packed 9.3 disparity shift values
    Shift93,
    /// 8-bit red, green, blue interleaved
    Rgb888,
    /// 4:2:2 packed YUV (UYVY byte order)
    Yuv422,
    /// 8-bit grayscale
    Gray8,
    /// 16-bit grayscale
    Gray16,
    /// Compressed JPEG
    Jpeg,
    /// 4:2:2 packed YUV (YUYV byte order)
    Yuyv,
    Unknown(i32),
}

/// Transform family used to marshal a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// One 16-bit sample per pixel, transposed.
    Mono16,
    /// One 8-bit sample per pixel, transposed.
    Mono8,
    /// Three interleaved 8-bit samples per pixel, transposed and split into
    /// planes.
    Rgb888,
}

impl Layout {
    /// Bytes one destination pixel occupies in the source buffer.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Layout::Mono16 => 2,
            Layout::Mono8 => 1,
            Layout::Rgb888 => 3,
        }
    }

    pub fn channels(self) -> usize {
        match self {
            Layout::Mono16 | Layout::Mono8 => 1,
            Layout::Rgb888 => 3,
        }
    }
}

impl PixelFormat {
    pub fn from_raw(raw: ffi::OniPixelFormat) -> Self {
        match raw {
            ffi::OniPixelFormat_ONI_PIXEL_FORMAT_DEPTH_1_MM => PixelFormat::Depth1Mm,
            ffi::OniPixelFormat_ONI_PIXEL_FORMAT_DEPTH_100_UM => PixelFormat::Depth100Um,
            ffi::OniPixelFormat_ONI_PIXEL_FORMAT_SHIFT_9_2 => PixelFormat::Shift92,
            ffi::OniPixelFormat_ONI_PIXEL_FORMAT_SHIFT_9_3 => PixelFormat::Shift93,
            ffi::OniPixelFormat_ONI_PIXEL_FORMAT_RGB888 => PixelFormat::Rgb888,
            ffi::OniPixelFormat_ONI_PIXEL_FORMAT_YUV422 => PixelFormat::Yuv422,
            ffi::OniPixelFormat_ONI_PIXEL_FORMAT_GRAY8 => PixelFormat::Gray8,
            ffi::OniPixelFormat_ONI_PIXEL_FORMAT_GRAY16 => PixelFormat::Gray16,
            ffi::OniPixelFormat_ONI_PIXEL_FORMAT_JPEG => PixelFormat::Jpeg,
            ffi::OniPixelFormat_ONI_PIXEL_FORMAT_YUYV => PixelFormat::Yuyv,
            other => PixelFormat::Unknown(other),
        }
    }

    pub fn to_raw(self) -> ffi::OniPixelFormat {
        match self {
            PixelFormat::Depth1Mm => ffi::OniPixelFormat_ONI_PIXEL_FORMAT_DEPTH_1_MM,
            PixelFormat::Depth100Um => ffi::OniPixelFormat_ONI_PIXEL_FORMAT_DEPTH_100_UM,
            PixelFormat::Shift92 => ffi::OniPixelFormat_ONI_PIXEL_FORMAT_SHIFT_9_2,
            PixelFormat::Shift93 => ffi::OniPixelFormat_ONI_PIXEL_FORMAT_SHIFT_9_3,
            PixelFormat::Rgb888 => ffi::OniPixelFormat_ONI_PIXEL_FORMAT_RGB888,
            PixelFormat::Yuv422 => ffi::OniPixelFormat_ONI_PIXEL_FORMAT_YUV422,
            PixelFormat::Gray8 => ffi::OniPixelFormat_ONI_PIXEL_FORMAT_GRAY8,
            PixelFormat::Gray16 => ffi::OniPixelFormat_ONI_PIXEL_FORMAT_GRAY16,
            PixelFormat::Jpeg => ffi::OniPixelFormat_ONI_PIXEL_FORMAT_JPEG,
            PixelFormat::Yuyv => ffi::OniPixelFormat_ONI_PIXEL_FORMAT_YUYV,
            PixelFormat::Unknown(raw) => raw,
        }
    }

    /// Transform family for this format, or `None` when frames of this format
    /// cannot be marshaled.
    ///
    /// YUV422 is copied one byte per pixel like GRAY8; only the leading
    /// `width` bytes of each row reach the destination.
    pub fn layout(self) -> Option<Layout> {
        match self {
            PixelFormat::Depth1Mm | PixelFormat::Depth100Um | PixelFormat::Gray16 => {
                Some(Layout::Mono16)
            }
            PixelFormat::Yuv422 | PixelFormat::Gray8 => Some(Layout::Mono8),
            PixelFormat::Rgb888 => Some(Layout::Rgb888),
            _ => None,
        }
    }

    /// SDK constant name, as printed in the diagnostic listings.
    pub fn name(self) -> &'static str {
        match self {
            PixelFormat::Depth1Mm => "PIXEL_FORMAT_DEPTH_1_MM",
            PixelFormat::Depth100Um => "PIXEL_FORMAT_DEPTH_100_UM",
            PixelFormat::Shift92 => "PIXEL_FORMAT_SHIFT_9_2",
            PixelFormat::Shift93 => "PIXEL_FORMAT_SHIFT_9_3",
            PixelFormat::Rgb888 => "PIXEL_FORMAT_RGB888",
            PixelFormat::Yuv422 => "PIXEL_FORMAT_YUV422",
            PixelFormat::Gray8 => "PIXEL_FORMAT_GRAY8",
            PixelFormat::Gray16 => "PIXEL_FORMAT_GRAY16",
            PixelFormat::Jpeg => "PIXEL_FORMAT_JPEG",
            PixelFormat::Yuyv => "PIXEL_FORMAT_YUYV",
            PixelFormat::Unknown(_) => "PIXEL_FORMAT_UNKNOWN",
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PixelFormat::Unknown(raw) => write!(f, "PIXEL_FORMAT_UNKNOWN({})", raw),
            other => f.write_str(other.name()),
        }
    }
}

/// One entry of a stream's supported-mode sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VideoMode {
    pub fps: i32,
    pub pixel_format: PixelFormat,
    pub resolution_x: i32,
    pub resolution_y: i32,
}

impl VideoMode {
    pub fn new(resolution_x: i32, resolution_y: i32, fps: i32, pixel_format: PixelFormat) -> Self {
        VideoMode {
            fps,
            pixel_format,
            resolution_x,
            resolution_y,
        }
    }
}

impl fmt::Display for VideoMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}x{}@{} {}",
            self.resolution_x, self.resolution_y, self.fps, self.pixel_format
        )
    }
}

impl From<ffi::OniVideoMode> for VideoMode {
    fn from(mode: ffi::OniVideoMode) -> Self {
        VideoMode {
            fps: mode.fps,
            pixel_format: PixelFormat::from_raw(mode.pixelFormat),
            resolution_x: mode.resolutionX,
            resolution_y: mode.resolutionY,
        }
    }
}

impl From<VideoMode> for ffi::OniVideoMode {
    fn from(mode: VideoMode) -> Self {
        ffi::OniVideoMode {
            pixelFormat: mode.pixel_format.to_raw(),
            resolutionX: mode.resolution_x,
            resolutionY: mode.resolution_y,
            fps: mode.fps,
        }
    }
}

/// Whether depth pixels are remapped into the color camera's frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RegistrationMode {
    #[default]
    Off,
    DepthToColor,
}

impl RegistrationMode {
    pub fn from_raw(raw: ffi::OniImageRegistrationMode) -> Self {
        match raw {
            ffi::OniImageRegistrationMode_ONI_IMAGE_REGISTRATION_DEPTH_TO_COLOR => {
                RegistrationMode::DepthToColor
            }
            _ => RegistrationMode::Off,
        }
    }

    pub fn to_raw(self) -> ffi::OniImageRegistrationMode {
        match self {
            RegistrationMode::Off => ffi::OniImageRegistrationMode_ONI_IMAGE_REGISTRATION_OFF,
            RegistrationMode::DepthToColor => {
                ffi::OniImageRegistrationMode_ONI_IMAGE_REGISTRATION_DEPTH_TO_COLOR
            }
        }
    }
}

impl From<bool> for RegistrationMode {
    fn from(enabled: bool) -> Self {
        if enabled {
            RegistrationMode::DepthToColor
        } else {
            RegistrationMode::Off
        }
    }
}

impl fmt::Display for RegistrationMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RegistrationMode::Off => f.write_str("OFF"),
            RegistrationMode::DepthToColor => f.write_str("DEPTH TO COLOR"),
        }
    }
}

/// Identification strings of the open device.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceInfo {
    pub uri: String,
    pub vendor: String,
    pub name: String,
    pub usb_vendor_id: u16,
    pub usb_product_id: u16,
}

/// Optical and value-range properties of a created stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamInfo {
    /// Horizontal field of view in radians
    pub horizontal_fov: f32,
    /// Vertical field of view in radians
    pub vertical_fov: f32,
    pub max_pixel_value: i32,
    pub min_pixel_value: i32,
    pub video_mode: VideoMode,
}
