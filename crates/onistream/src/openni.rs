// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! OpenNI 2 backend
//!
//! [`OpenNi`] implements [`Sdk`] on top of the runtime-loaded `libOpenNI2.so`
//! from `openni2-sys`. The OpenNI 2 runtime is process-global, so only one
//! `OpenNi` may exist at a time; a second [`OpenNi::new`] fails with
//! [`Error::Busy`] until the first is dropped.

use std::{
    ffi::CStr,
    mem,
    os::raw::{c_char, c_int, c_void},
    ptr, slice,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use openni2_sys::{self as ffi, OpenNI2Library};

use crate::{
    sdk::{RawFrame, Sdk, SdkError, Status},
    sensor::{DeviceInfo, PixelFormat, RegistrationMode, SensorType, StreamInfo, VideoMode},
    Error,
};

static CLAIMED: AtomicBool = AtomicBool::new(false);

/// The OpenNI 2 runtime.
pub struct OpenNi {
    lib: &'static OpenNI2Library,
}

impl std::fmt::Debug for OpenNi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenNi").finish_non_exhaustive()
    }
}

impl OpenNi {
    /// Load the OpenNI 2 library and claim the process-wide runtime.
    ///
    /// The library is located through `OPENNI2_LIBRARY` or the loader path,
    /// see [`openni2_sys::init`].
    pub fn new() -> Result<Self, Error> {
        let lib = ffi::init()?;
        if CLAIMED
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::Busy);
        }
        log::debug!("OpenNI 2 library loaded");
        Ok(OpenNi { lib })
    }

    /// Extended error text of the most recent failed call on this thread.
    pub fn extended_error(&self) -> String {
        let text = unsafe { self.lib.oniGetExtendedError() };
        if text.is_null() {
            return String::new();
        }
        unsafe { CStr::from_ptr(text) }
            .to_string_lossy()
            .trim_end()
            .to_owned()
    }

    fn check(&self, status: ffi::OniStatus) -> Result<(), SdkError> {
        match Status::from_raw(status) {
            None => Ok(()),
            Some(status) => Err(SdkError::new(status, self.extended_error())),
        }
    }

    fn stream_property<T: Copy + Default>(
        &self,
        stream: &StreamHandle,
        property: c_int,
    ) -> Result<T, SdkError> {
        let mut value = T::default();
        let mut size = mem::size_of::<T>() as c_int;
        let status = unsafe {
            self.lib.oniStreamGetProperty(
                stream.raw,
                property,
                &mut value as *mut T as *mut c_void,
                &mut size,
            )
        };
        self.check(status)?;
        Ok(value)
    }

    fn set_stream_property<T: Copy>(
        &self,
        stream: &StreamHandle,
        property: c_int,
        value: &T,
    ) -> Result<(), SdkError> {
        let status = unsafe {
            self.lib.oniStreamSetProperty(
                stream.raw,
                property,
                value as *const T as *const c_void,
                mem::size_of::<T>() as c_int,
            )
        };
        self.check(status)
    }
}

impl Drop for OpenNi {
    fn drop(&mut self) {
        CLAIMED.store(false, Ordering::Release);
    }
}

/// An open OpenNI device.
#[derive(Debug)]
pub struct DeviceHandle(ffi::OniDeviceHandle);

/// A created OpenNI video stream.
#[derive(Debug)]
pub struct StreamHandle {
    raw: ffi::OniStreamHandle,
    sensor: SensorType,
}

impl StreamHandle {
    pub fn sensor(&self) -> SensorType {
        self.sensor
    }
}

/// A frame read from an OpenNI stream, released on drop.
pub struct FrameRef {
    lib: &'static OpenNI2Library,
    ptr: *mut ffi::OniFrame,
}

impl FrameRef {
    fn raw(&self) -> &ffi::OniFrame {
        // Non-null and valid until oniFrameRelease in Drop.
        unsafe { &*self.ptr }
    }
}

impl std::fmt::Debug for FrameRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameRef")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("pixel_format", &self.pixel_format())
            .field("frame_index", &self.frame_index())
            .finish()
    }
}

impl RawFrame for FrameRef {
    fn width(&self) -> usize {
        usize::try_from(self.raw().width).unwrap_or(0)
    }

    fn height(&self) -> usize {
        usize::try_from(self.raw().height).unwrap_or(0)
    }

    fn pixel_format(&self) -> PixelFormat {
        PixelFormat::from_raw(self.raw().videoMode.pixelFormat)
    }

    fn stride(&self) -> usize {
        usize::try_from(self.raw().stride).unwrap_or(0)
    }

    fn frame_index(&self) -> u64 {
        u64::try_from(self.raw().frameIndex).unwrap_or(0)
    }

    fn timestamp(&self) -> u64 {
        self.raw().timestamp
    }

    fn data(&self) -> &[u8] {
        let frame = self.raw();
        match usize::try_from(frame.dataSize) {
            Ok(size) if size > 0 && !frame.data.is_null() => unsafe {
                slice::from_raw_parts(frame.data as *const u8, size)
            },
            _ => &[],
        }
    }
}

impl Drop for FrameRef {
    fn drop(&mut self) {
        log::trace!("FrameRef::drop() - releasing frame ptr={:?}", self.ptr);
        unsafe { self.lib.oniFrameRelease(self.ptr) };
    }
}

/// Decode a NUL-padded fixed-size C string field.
fn fixed_str(field: &[c_char]) -> String {
    let bytes: Vec<u8> = field
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

impl Sdk for OpenNi {
    type Device = DeviceHandle;
    type Stream = StreamHandle;
    type Frame = FrameRef;

    fn initialize(&mut self) -> Result<(), SdkError> {
        self.check(unsafe { self.lib.oniInitialize(ffi::ONI_API_VERSION) })
    }

    fn shutdown(&mut self) {
        unsafe { self.lib.oniShutdown() };
    }

    fn open_device(&mut self) -> Result<DeviceHandle, SdkError> {
        let mut device: ffi::OniDeviceHandle = ptr::null_mut();
        // A null URI opens any available device.
        self.check(unsafe { self.lib.oniDeviceOpen(ptr::null(), &mut device) })?;
        if device.is_null() {
            return Err(SdkError::new(Status::NoDevice, self.extended_error()));
        }
        Ok(DeviceHandle(device))
    }

    fn close_device(&mut self, device: DeviceHandle) {
        let status = unsafe { self.lib.oniDeviceClose(device.0) };
        if let Err(err) = self.check(status) {
            log::warn!("Device close reported {}", err);
        }
    }

    fn device_info(&self, device: &DeviceHandle) -> Result<DeviceInfo, SdkError> {
        let mut info = ffi::OniDeviceInfo::default();
        self.check(unsafe { self.lib.oniDeviceGetInfo(device.0, &mut info) })?;
        Ok(DeviceInfo {
            uri: fixed_str(&info.uri),
            vendor: fixed_str(&info.vendor),
            name: fixed_str(&info.name),
            usb_vendor_id: info.usbVendorId,
            usb_product_id: info.usbProductId,
        })
    }

    fn has_sensor(&self, device: &DeviceHandle, sensor: SensorType) -> bool {
        !unsafe { self.lib.oniDeviceGetSensorInfo(device.0, sensor.to_raw()) }.is_null()
    }

    fn registration_mode(&self, device: &DeviceHandle) -> Result<RegistrationMode, SdkError> {
        let mut raw: ffi::OniImageRegistrationMode = 0;
        let mut size = mem::size_of::<ffi::OniImageRegistrationMode>() as c_int;
        let status = unsafe {
            self.lib.oniDeviceGetProperty(
                device.0,
                ffi::ONI_DEVICE_PROPERTY_IMAGE_REGISTRATION,
                &mut raw as *mut _ as *mut c_void,
                &mut size,
            )
        };
        self.check(status)?;
        Ok(RegistrationMode::from_raw(raw))
    }

    fn set_registration_mode(
        &mut self,
        device: &DeviceHandle,
        mode: RegistrationMode,
    ) -> Result<(), SdkError> {
        let raw = mode.to_raw();
        let status = unsafe {
            self.lib.oniDeviceSetProperty(
                device.0,
                ffi::ONI_DEVICE_PROPERTY_IMAGE_REGISTRATION,
                &raw as *const _ as *const c_void,
                mem::size_of::<ffi::OniImageRegistrationMode>() as c_int,
            )
        };
        self.check(status)
    }

    fn is_registration_supported(&self, device: &DeviceHandle, mode: RegistrationMode) -> bool {
        (unsafe {
            self.lib
                .oniDeviceIsImageRegistrationModeSupported(device.0, mode.to_raw())
        }) != ffi::ONI_FALSE
    }

    fn create_stream(
        &mut self,
        device: &DeviceHandle,
        sensor: SensorType,
    ) -> Result<StreamHandle, SdkError> {
        let mut raw: ffi::OniStreamHandle = ptr::null_mut();
        self.check(unsafe {
            self.lib
                .oniDeviceCreateStream(device.0, sensor.to_raw(), &mut raw)
        })?;
        Ok(StreamHandle { raw, sensor })
    }

    fn destroy_stream(&mut self, stream: StreamHandle) {
        unsafe { self.lib.oniStreamDestroy(stream.raw) };
    }

    fn start_stream(&mut self, stream: &StreamHandle) -> Result<(), SdkError> {
        self.check(unsafe { self.lib.oniStreamStart(stream.raw) })
    }

    fn stop_stream(&mut self, stream: &StreamHandle) {
        unsafe { self.lib.oniStreamStop(stream.raw) };
    }

    fn supported_video_modes(&self, stream: &StreamHandle) -> Result<Vec<VideoMode>, SdkError> {
        let info = unsafe { self.lib.oniStreamGetSensorInfo(stream.raw) };
        if info.is_null() {
            return Err(SdkError::new(Status::Error, self.extended_error()));
        }
        let info = unsafe { &*info };
        let count = usize::try_from(info.numSupportedVideoModes).unwrap_or(0);
        if count == 0 || info.pSupportedVideoModes.is_null() {
            return Ok(Vec::new());
        }
        let modes = unsafe { slice::from_raw_parts(info.pSupportedVideoModes, count) };
        Ok(modes.iter().copied().map(VideoMode::from).collect())
    }

    fn video_mode(&self, stream: &StreamHandle) -> Result<VideoMode, SdkError> {
        self.stream_property::<ffi::OniVideoMode>(stream, ffi::ONI_STREAM_PROPERTY_VIDEO_MODE)
            .map(VideoMode::from)
    }

    fn set_video_mode(&mut self, stream: &StreamHandle, mode: &VideoMode) -> Result<(), SdkError> {
        let raw = ffi::OniVideoMode::from(*mode);
        self.set_stream_property(stream, ffi::ONI_STREAM_PROPERTY_VIDEO_MODE, &raw)
    }

    fn stream_info(&self, stream: &StreamHandle) -> Result<StreamInfo, SdkError> {
        Ok(StreamInfo {
            horizontal_fov: self
                .stream_property::<f32>(stream, ffi::ONI_STREAM_PROPERTY_HORIZONTAL_FOV)?,
            vertical_fov: self
                .stream_property::<f32>(stream, ffi::ONI_STREAM_PROPERTY_VERTICAL_FOV)?,
            max_pixel_value: self
                .stream_property::<c_int>(stream, ffi::ONI_STREAM_PROPERTY_MAX_VALUE)?,
            min_pixel_value: self
                .stream_property::<c_int>(stream, ffi::ONI_STREAM_PROPERTY_MIN_VALUE)?,
            video_mode: self.video_mode(stream)?,
        })
    }

    fn wait_for_frame(&mut self, stream: &StreamHandle, timeout: Duration) -> Result<bool, SdkError> {
        let mut streams = [stream.raw];
        let mut ready: c_int = -1;
        let millis = c_int::try_from(timeout.as_millis()).unwrap_or(c_int::MAX);
        let status = unsafe {
            self.lib
                .oniWaitForAnyStream(streams.as_mut_ptr(), 1, &mut ready, millis)
        };
        match Status::from_raw(status) {
            Some(Status::TimeOut) => Ok(false),
            _ => self.check(status).map(|()| true),
        }
    }

    fn read_frame(&mut self, stream: &StreamHandle) -> Result<FrameRef, SdkError> {
        let mut frame: *mut ffi::OniFrame = ptr::null_mut();
        self.check(unsafe { self.lib.oniStreamReadFrame(stream.raw, &mut frame) })?;
        if frame.is_null() {
            return Err(SdkError::new(Status::Error, self.extended_error()));
        }
        Ok(FrameRef {
            lib: self.lib,
            ptr: frame,
        })
    }
}
