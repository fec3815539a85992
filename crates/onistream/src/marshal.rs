// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Frame acquisition and layout conversion
//!
//! Sensor frames arrive row-major with interleaved channels. Callers receive
//! column-major arrays with one plane per channel:
//!
//! | Family | Formats | Output |
//! |---|---|---|
//! | [`Layout::Mono16`] | DEPTH_1_MM, DEPTH_100_UM, GRAY16 | `u16`, `height x width` |
//! | [`Layout::Mono8`] | GRAY8, YUV422 | `u8`, `height x width` |
//! | [`Layout::Rgb888`] | RGB888 | `u8`, `height x width x 3` |
//!
//! Source pixel `(row, col, channel)` lands at
//! `channel * height * width + col * height + row`. Sample values are copied
//! bit for bit; 16-bit samples keep the host byte order they arrived in.
//!
//! Every other pixel format is rejected with [`Error::UnsupportedFormat`].

use std::time::Duration;

use crate::{
    lifecycle::Session,
    sdk::{RawFrame, Sdk},
    sensor::{Layout, SensorType},
    Error,
};

/// Which outputs a caller wants from one acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameRequest {
    pub data: bool,
    pub index: bool,
    pub timestamp: bool,
}

impl FrameRequest {
    /// Most outputs an acquisition can produce: data, index, timestamp.
    pub const MAX_OUTPUTS: usize = 3;

    pub fn all() -> Self {
        FrameRequest {
            data: true,
            index: true,
            timestamp: true,
        }
    }

    /// Positional request for `count` caller outputs: the first is the frame
    /// data, the second the frame index, the third the timestamp.
    pub fn from_output_count(count: usize) -> Result<Self, Error> {
        if count > Self::MAX_OUTPUTS {
            return Err(Error::InvalidArgument(format!(
                "getFrame returns at most {} values: frame, frame_index, timestamp ({} requested)",
                Self::MAX_OUTPUTS,
                count
            )));
        }
        Ok(FrameRequest {
            data: count > 0,
            index: count > 1,
            timestamp: count > 2,
        })
    }
}

/// Column-major frame contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameArray {
    Mono16 {
        height: usize,
        width: usize,
        data: Vec<u16>,
    },
    Mono8 {
        height: usize,
        width: usize,
        data: Vec<u8>,
    },
    /// Three planes (R, G, B), each column-major.
    Rgb {
        height: usize,
        width: usize,
        data: Vec<u8>,
    },
}

impl FrameArray {
    pub fn height(&self) -> usize {
        match self {
            FrameArray::Mono16 { height, .. }
            | FrameArray::Mono8 { height, .. }
            | FrameArray::Rgb { height, .. } => *height,
        }
    }

    pub fn width(&self) -> usize {
        match self {
            FrameArray::Mono16 { width, .. }
            | FrameArray::Mono8 { width, .. }
            | FrameArray::Rgb { width, .. } => *width,
        }
    }

    pub fn layout(&self) -> Layout {
        match self {
            FrameArray::Mono16 { .. } => Layout::Mono16,
            FrameArray::Mono8 { .. } => Layout::Mono8,
            FrameArray::Rgb { .. } => Layout::Rgb888,
        }
    }

    /// `[height, width]`, or `[height, width, 3]` for color.
    pub fn dims(&self) -> Vec<usize> {
        match self.layout().channels() {
            1 => vec![self.height(), self.width()],
            channels => vec![self.height(), self.width(), channels],
        }
    }

    /// Payload in native byte order, for writing raw dumps.
    pub fn to_ne_bytes(&self) -> Vec<u8> {
        match self {
            FrameArray::Mono16 { data, .. } => data.iter().flat_map(|v| v.to_ne_bytes()).collect(),
            FrameArray::Mono8 { data, .. } | FrameArray::Rgb { data, .. } => data.clone(),
        }
    }
}

/// Outputs of one acquisition; each is present only when requested.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Acquired {
    pub data: Option<FrameArray>,
    pub frame_index: Option<u64>,
    pub timestamp: Option<u64>,
}

/// Transpose a row-major single-channel image into `dst`, column-major.
///
/// Row `r` of `src` starts at element `r * pitch`.
///
/// # Panics
///
/// Panics if `src` is shorter than the geometry or `dst` is shorter than
/// `width * height`.
pub fn transpose_into<T: Copy>(src: &[T], width: usize, height: usize, pitch: usize, dst: &mut [T]) {
    for row in 0..height {
        let line = &src[row * pitch..row * pitch + width];
        for (col, &sample) in line.iter().enumerate() {
            dst[col * height + row] = sample;
        }
    }
}

/// Transpose 16-bit samples stored as native-endian byte pairs.
///
/// Row `r` of `src` starts at byte `r * stride`.
///
/// # Panics
///
/// Same conditions as [`transpose_into`].
pub fn transpose_u16_into(src: &[u8], width: usize, height: usize, stride: usize, dst: &mut [u16]) {
    for row in 0..height {
        let line = &src[row * stride..row * stride + width * 2];
        for (col, pair) in line.chunks_exact(2).enumerate() {
            dst[col * height + row] = u16::from_ne_bytes([pair[0], pair[1]]);
        }
    }
}

/// Transpose and de-interleave packed RGB into three column-major planes.
///
/// # Panics
///
/// Panics if `src` is shorter than the geometry or `dst` is shorter than
/// `3 * width * height`.
pub fn planarize_rgb_into(src: &[u8], width: usize, height: usize, stride: usize, dst: &mut [u8]) {
    let plane = width * height;
    for row in 0..height {
        let line = &src[row * stride..row * stride + width * 3];
        for (col, pixel) in line.chunks_exact(3).enumerate() {
            let at = col * height + row;
            dst[at] = pixel[0];
            dst[plane + at] = pixel[1];
            dst[2 * plane + at] = pixel[2];
        }
    }
}

/// Copy a frame into a caller-facing column-major array.
pub fn marshal<F: RawFrame>(frame: &F) -> Result<FrameArray, Error> {
    let format = frame.pixel_format();
    let layout = format.layout().ok_or(Error::UnsupportedFormat(format))?;

    let width = frame.width();
    let height = frame.height();
    let row_bytes = width * layout.bytes_per_pixel();
    // Some drivers report a zero stride for packed rows.
    let stride = frame.stride().max(row_bytes);

    let src = frame.data();
    let expected = match height {
        0 => 0,
        h => (h - 1) * stride + row_bytes,
    };
    if src.len() < expected {
        return Err(Error::ShortFrame {
            expected,
            actual: src.len(),
        });
    }

    let samples = width * height * layout.channels();
    Ok(match layout {
        Layout::Mono16 => {
            let mut data = vec![0u16; samples];
            transpose_u16_into(src, width, height, stride, &mut data);
            FrameArray::Mono16 {
                height,
                width,
                data,
            }
        }
        Layout::Mono8 => {
            let mut data = vec![0u8; samples];
            transpose_into(src, width, height, stride, &mut data);
            FrameArray::Mono8 {
                height,
                width,
                data,
            }
        }
        Layout::Rgb888 => {
            let mut data = vec![0u8; samples];
            planarize_rgb_into(src, width, height, stride, &mut data);
            FrameArray::Rgb {
                height,
                width,
                data,
            }
        }
    })
}

/// Read one frame from a started stream and copy out the requested outputs.
///
/// Blocks until the stream produces a frame. With a `timeout`, waits at most
/// that long and fails with [`Error::Timeout`] without reading. The frame is
/// released before returning on every path.
pub fn acquire_frame<S: Sdk>(
    sdk: &mut S,
    stream: &S::Stream,
    sensor: SensorType,
    request: FrameRequest,
    timeout: Option<Duration>,
) -> Result<Acquired, Error> {
    if let Some(timeout) = timeout {
        let ready = sdk
            .wait_for_frame(stream, timeout)
            .map_err(|source| Error::Acquisition { sensor, source })?;
        if !ready {
            return Err(Error::Timeout { sensor, timeout });
        }
    }

    let frame = sdk
        .read_frame(stream)
        .map_err(|source| Error::Acquisition { sensor, source })?;

    let data = if request.data {
        Some(marshal(&frame)?)
    } else {
        None
    };
    let acquired = Acquired {
        data,
        frame_index: request.index.then(|| frame.frame_index()),
        timestamp: request.timestamp.then(|| frame.timestamp()),
    };
    drop(frame);

    log::trace!(
        "Acquired {} frame index={:?} ts={:?}",
        sensor,
        acquired.frame_index,
        acquired.timestamp
    );
    Ok(acquired)
}

/// Acquire from a session's stream, initializing the session first if
/// needed. Uses the session's configured acquisition timeout.
pub fn acquire<S: Sdk>(
    session: &mut Session<S>,
    sensor: SensorType,
    request: FrameRequest,
) -> Result<Acquired, Error> {
    session.initialize()?;
    let timeout = session.config().acquire_timeout();
    let (sdk, stream) = session.capture_stream(sensor)?;
    acquire_frame(sdk, stream, sensor, request, timeout)
}
