// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies
//
// Runtime-loaded bindings for OniCAPI.h (OpenNI 2.2), in the layout produced
// by `bindgen --dynamic-loading OpenNI2Library`.

pub const ONI_VERSION_MAJOR: u32 = 2;
pub const ONI_VERSION_MINOR: u32 = 2;
pub const ONI_API_VERSION: ::std::os::raw::c_int = 2002;
pub const ONI_MAX_STR: usize = 256;
pub const ONI_MAX_SENSORS: u32 = 10;
pub const ONI_TIMEOUT_NONE: ::std::os::raw::c_int = 0;
pub const ONI_TIMEOUT_FOREVER: ::std::os::raw::c_int = -1;
pub const ONI_TRUE: OniBool = 1;
pub const ONI_FALSE: OniBool = 0;

pub type OniBool = ::std::os::raw::c_int;

pub type OniStatus = ::std::os::raw::c_int;
pub const OniStatus_ONI_STATUS_OK: OniStatus = 0;
pub const OniStatus_ONI_STATUS_ERROR: OniStatus = 1;
pub const OniStatus_ONI_STATUS_NOT_IMPLEMENTED: OniStatus = 2;
pub const OniStatus_ONI_STATUS_NOT_SUPPORTED: OniStatus = 3;
pub const OniStatus_ONI_STATUS_BAD_PARAMETER: OniStatus = 4;
pub const OniStatus_ONI_STATUS_OUT_OF_FLOW: OniStatus = 5;
pub const OniStatus_ONI_STATUS_NO_DEVICE: OniStatus = 6;
pub const OniStatus_ONI_STATUS_TIME_OUT: OniStatus = 102;

pub type OniSensorType = ::std::os::raw::c_int;
pub const OniSensorType_ONI_SENSOR_IR: OniSensorType = 1;
pub const OniSensorType_ONI_SENSOR_COLOR: OniSensorType = 2;
pub const OniSensorType_ONI_SENSOR_DEPTH: OniSensorType = 3;

pub type OniPixelFormat = ::std::os::raw::c_int;
pub const OniPixelFormat_ONI_PIXEL_FORMAT_DEPTH_1_MM: OniPixelFormat = 100;
pub const OniPixelFormat_ONI_PIXEL_FORMAT_DEPTH_100_UM: OniPixelFormat = 101;
pub const OniPixelFormat_ONI_PIXEL_FORMAT_SHIFT_9_2: OniPixelFormat = 102;
pub const OniPixelFormat_ONI_PIXEL_FORMAT_SHIFT_9_3: OniPixelFormat = 103;
pub const OniPixelFormat_ONI_PIXEL_FORMAT_RGB888: OniPixelFormat = 200;
pub const OniPixelFormat_ONI_PIXEL_FORMAT_YUV422: OniPixelFormat = 201;
pub const OniPixelFormat_ONI_PIXEL_FORMAT_GRAY8: OniPixelFormat = 202;
pub const OniPixelFormat_ONI_PIXEL_FORMAT_GRAY16: OniPixelFormat = 203;
pub const OniPixelFormat_ONI_PIXEL_FORMAT_JPEG: OniPixelFormat = 204;
pub const OniPixelFormat_ONI_PIXEL_FORMAT_YUYV: OniPixelFormat = 205;

pub type OniImageRegistrationMode = ::std::os::raw::c_int;
pub const OniImageRegistrationMode_ONI_IMAGE_REGISTRATION_OFF: OniImageRegistrationMode = 0;
pub const OniImageRegistrationMode_ONI_IMAGE_REGISTRATION_DEPTH_TO_COLOR: OniImageRegistrationMode = 1;

pub const ONI_DEVICE_PROPERTY_FIRMWARE_VERSION: ::std::os::raw::c_int = 0;
pub const ONI_DEVICE_PROPERTY_DRIVER_VERSION: ::std::os::raw::c_int = 1;
pub const ONI_DEVICE_PROPERTY_HARDWARE_VERSION: ::std::os::raw::c_int = 2;
pub const ONI_DEVICE_PROPERTY_SERIAL_NUMBER: ::std::os::raw::c_int = 3;
pub const ONI_DEVICE_PROPERTY_ERROR_STATE: ::std::os::raw::c_int = 4;
pub const ONI_DEVICE_PROPERTY_IMAGE_REGISTRATION: ::std::os::raw::c_int = 5;
pub const ONI_DEVICE_PROPERTY_FRAME_SYNC: ::std::os::raw::c_int = 6;

pub const ONI_STREAM_PROPERTY_CROPPING: ::std::os::raw::c_int = 0;
pub const ONI_STREAM_PROPERTY_HORIZONTAL_FOV: ::std::os::raw::c_int = 1;
pub const ONI_STREAM_PROPERTY_VERTICAL_FOV: ::std::os::raw::c_int = 2;
pub const ONI_STREAM_PROPERTY_VIDEO_MODE: ::std::os::raw::c_int = 3;
pub const ONI_STREAM_PROPERTY_MAX_VALUE: ::std::os::raw::c_int = 4;
pub const ONI_STREAM_PROPERTY_MIN_VALUE: ::std::os::raw::c_int = 5;
pub const ONI_STREAM_PROPERTY_STRIDE: ::std::os::raw::c_int = 6;
pub const ONI_STREAM_PROPERTY_MIRRORING: ::std::os::raw::c_int = 7;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct _OniDevice {
    _unused: [u8; 0],
}
pub type OniDeviceHandle = *mut _OniDevice;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct _OniStream {
    _unused: [u8; 0],
}
pub type OniStreamHandle = *mut _OniStream;

#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct OniVideoMode {
    pub pixelFormat: OniPixelFormat,
    pub resolutionX: ::std::os::raw::c_int,
    pub resolutionY: ::std::os::raw::c_int,
    pub fps: ::std::os::raw::c_int,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct OniSensorInfo {
    pub sensorType: OniSensorType,
    pub numSupportedVideoModes: ::std::os::raw::c_int,
    pub pSupportedVideoModes: *mut OniVideoMode,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct OniDeviceInfo {
    pub uri: [::std::os::raw::c_char; 256usize],
    pub vendor: [::std::os::raw::c_char; 256usize],
    pub name: [::std::os::raw::c_char; 256usize],
    pub usbVendorId: u16,
    pub usbProductId: u16,
}
impl Default for OniDeviceInfo {
    fn default() -> Self {
        let mut s = ::std::mem::MaybeUninit::<Self>::uninit();
        unsafe {
            ::std::ptr::write_bytes(s.as_mut_ptr(), 0, 1);
            s.assume_init()
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct OniFrame {
    pub dataSize: ::std::os::raw::c_int,
    pub data: *mut ::std::os::raw::c_void,
    pub sensorType: OniSensorType,
    pub timestamp: u64,
    pub frameIndex: ::std::os::raw::c_int,
    pub width: ::std::os::raw::c_int,
    pub height: ::std::os::raw::c_int,
    pub videoMode: OniVideoMode,
    pub croppingEnabled: OniBool,
    pub cropOriginX: ::std::os::raw::c_int,
    pub cropOriginY: ::std::os::raw::c_int,
    pub stride: ::std::os::raw::c_int,
}

pub struct OpenNI2Library {
    __library: ::libloading::Library,
    pub oniInitialize: Result<unsafe extern "C" fn(apiVersion: ::std::os::raw::c_int) -> OniStatus, ::libloading::Error>,
    pub oniShutdown: Result<unsafe extern "C" fn(), ::libloading::Error>,
    pub oniGetExtendedError: Result<unsafe extern "C" fn() -> *const ::std::os::raw::c_char, ::libloading::Error>,
    pub oniGetDeviceList: Result<unsafe extern "C" fn(pDevices: *mut *mut OniDeviceInfo, pNumDevices: *mut ::std::os::raw::c_int) -> OniStatus, ::libloading::Error>,
    pub oniReleaseDeviceList: Result<unsafe extern "C" fn(pDevices: *mut OniDeviceInfo) -> OniStatus, ::libloading::Error>,
    pub oniWaitForAnyStream: Result<unsafe extern "C" fn(pStreams: *mut OniStreamHandle, numStreams: ::std::os::raw::c_int, pStreamIndex: *mut ::std::os::raw::c_int, timeout: ::std::os::raw::c_int) -> OniStatus, ::libloading::Error>,
    pub oniDeviceOpen: Result<unsafe extern "C" fn(uri: *const ::std::os::raw::c_char, pDevice: *mut OniDeviceHandle) -> OniStatus, ::libloading::Error>,
    pub oniDeviceClose: Result<unsafe extern "C" fn(device: OniDeviceHandle) -> OniStatus, ::libloading::Error>,
    pub oniDeviceGetSensorInfo: Result<unsafe extern "C" fn(device: OniDeviceHandle, sensorType: OniSensorType) -> *const OniSensorInfo, ::libloading::Error>,
    pub oniDeviceGetInfo: Result<unsafe extern "C" fn(device: OniDeviceHandle, pInfo: *mut OniDeviceInfo) -> OniStatus, ::libloading::Error>,
    pub oniDeviceCreateStream: Result<unsafe extern "C" fn(device: OniDeviceHandle, sensorType: OniSensorType, pStreamHandle: *mut OniStreamHandle) -> OniStatus, ::libloading::Error>,
    pub oniDeviceSetProperty: Result<unsafe extern "C" fn(device: OniDeviceHandle, propertyId: ::std::os::raw::c_int, data: *const ::std::os::raw::c_void, dataSize: ::std::os::raw::c_int) -> OniStatus, ::libloading::Error>,
    pub oniDeviceGetProperty: Result<unsafe extern "C" fn(device: OniDeviceHandle, propertyId: ::std::os::raw::c_int, data: *mut ::std::os::raw::c_void, pDataSize: *mut ::std::os::raw::c_int) -> OniStatus, ::libloading::Error>,
    pub oniDeviceIsPropertySupported: Result<unsafe extern "C" fn(device: OniDeviceHandle, propertyId: ::std::os::raw::c_int) -> OniBool, ::libloading::Error>,
    pub oniDeviceIsImageRegistrationModeSupported: Result<unsafe extern "C" fn(device: OniDeviceHandle, mode: OniImageRegistrationMode) -> OniBool, ::libloading::Error>,
    pub oniStreamDestroy: Result<unsafe extern "C" fn(stream: OniStreamHandle), ::libloading::Error>,
    pub oniStreamGetSensorInfo: Result<unsafe extern "C" fn(stream: OniStreamHandle) -> *const OniSensorInfo, ::libloading::Error>,
    pub oniStreamStart: Result<unsafe extern "C" fn(stream: OniStreamHandle) -> OniStatus, ::libloading::Error>,
    pub oniStreamStop: Result<unsafe extern "C" fn(stream: OniStreamHandle), ::libloading::Error>,
    pub oniStreamReadFrame: Result<unsafe extern "C" fn(stream: OniStreamHandle, pFrame: *mut *mut OniFrame) -> OniStatus, ::libloading::Error>,
    pub oniStreamSetProperty: Result<unsafe extern "C" fn(stream: OniStreamHandle, propertyId: ::std::os::raw::c_int, data: *const ::std::os::raw::c_void, dataSize: ::std::os::raw::c_int) -> OniStatus, ::libloading::Error>,
    pub oniStreamGetProperty: Result<unsafe extern "C" fn(stream: OniStreamHandle, propertyId: ::std::os::raw::c_int, data: *mut ::std::os::raw::c_void, pDataSize: *mut ::std::os::raw::c_int) -> OniStatus, ::libloading::Error>,
    pub oniStreamIsPropertySupported: Result<unsafe extern "C" fn(stream: OniStreamHandle, propertyId: ::std::os::raw::c_int) -> OniBool, ::libloading::Error>,
    pub oniFrameRelease: Result<unsafe extern "C" fn(pFrame: *mut OniFrame), ::libloading::Error>,
    pub oniFrameAddRef: Result<unsafe extern "C" fn(pFrame: *mut OniFrame), ::libloading::Error>,
}
impl OpenNI2Library {
    pub unsafe fn new<P>(path: P) -> Result<Self, ::libloading::Error>
    where
        P: AsRef<::std::ffi::OsStr>,
    {
        let library = ::libloading::Library::new(path)?;
        Self::from_library(library)
    }
    pub unsafe fn from_library<L>(library: L) -> Result<Self, ::libloading::Error>
    where
        L: Into<::libloading::Library>,
    {
        let __library = library.into();
        let oniInitialize = __library.get(b"oniInitialize\0").map(|sym| *sym);
        let oniShutdown = __library.get(b"oniShutdown\0").map(|sym| *sym);
        let oniGetExtendedError = __library.get(b"oniGetExtendedError\0").map(|sym| *sym);
        let oniGetDeviceList = __library.get(b"oniGetDeviceList\0").map(|sym| *sym);
        let oniReleaseDeviceList = __library.get(b"oniReleaseDeviceList\0").map(|sym| *sym);
        let oniWaitForAnyStream = __library.get(b"oniWaitForAnyStream\0").map(|sym| *sym);
        let oniDeviceOpen = __library.get(b"oniDeviceOpen\0").map(|sym| *sym);
        let oniDeviceClose = __library.get(b"oniDeviceClose\0").map(|sym| *sym);
        let oniDeviceGetSensorInfo = __library.get(b"oniDeviceGetSensorInfo\0").map(|sym| *sym);
        let oniDeviceGetInfo = __library.get(b"oniDeviceGetInfo\0").map(|sym| *sym);
        let oniDeviceCreateStream = __library.get(b"oniDeviceCreateStream\0").map(|sym| *sym);
        let oniDeviceSetProperty = __library.get(b"oniDeviceSetProperty\0").map(|sym| *sym);
        let oniDeviceGetProperty = __library.get(b"oniDeviceGetProperty\0").map(|sym| *sym);
        let oniDeviceIsPropertySupported = __library.get(b"oniDeviceIsPropertySupported\0").map(|sym| *sym);
        let oniDeviceIsImageRegistrationModeSupported = __library.get(b"oniDeviceIsImageRegistrationModeSupported\0").map(|sym| *sym);
        let oniStreamDestroy = __library.get(b"oniStreamDestroy\0").map(|sym| *sym);
        let oniStreamGetSensorInfo = __library.get(b"oniStreamGetSensorInfo\0").map(|sym| *sym);
        let oniStreamStart = __library.get(b"oniStreamStart\0").map(|sym| *sym);
        let oniStreamStop = __library.get(b"oniStreamStop\0").map(|sym| *sym);
        let oniStreamReadFrame = __library.get(b"oniStreamReadFrame\0").map(|sym| *sym);
        let oniStreamSetProperty = __library.get(b"oniStreamSetProperty\0").map(|sym| *sym);
        let oniStreamGetProperty = __library.get(b"oniStreamGetProperty\0").map(|sym| *sym);
        let oniStreamIsPropertySupported = __library.get(b"oniStreamIsPropertySupported\0").map(|sym| *sym);
        let oniFrameRelease = __library.get(b"oniFrameRelease\0").map(|sym| *sym);
        let oniFrameAddRef = __library.get(b"oniFrameAddRef\0").map(|sym| *sym);
        Ok(OpenNI2Library {
            __library,
            oniInitialize,
            oniShutdown,
            oniGetExtendedError,
            oniGetDeviceList,
            oniReleaseDeviceList,
            oniWaitForAnyStream,
            oniDeviceOpen,
            oniDeviceClose,
            oniDeviceGetSensorInfo,
            oniDeviceGetInfo,
            oniDeviceCreateStream,
            oniDeviceSetProperty,
            oniDeviceGetProperty,
            oniDeviceIsPropertySupported,
            oniDeviceIsImageRegistrationModeSupported,
            oniStreamDestroy,
            oniStreamGetSensorInfo,
            oniStreamStart,
            oniStreamStop,
            oniStreamReadFrame,
            oniStreamSetProperty,
            oniStreamGetProperty,
            oniStreamIsPropertySupported,
            oniFrameRelease,
            oniFrameAddRef,
        })
    }
    pub unsafe fn oniInitialize(&self, apiVersion: ::std::os::raw::c_int) -> OniStatus {
        (self
            .oniInitialize
            .as_ref()
            .expect("Expected function, got error."))(apiVersion)
    }
    pub unsafe fn oniShutdown(&self) {
        (self
            .oniShutdown
            .as_ref()
            .expect("Expected function, got error."))()
    }
    pub unsafe fn oniGetExtendedError(&self) -> *const ::std::os::raw::c_char {
        (self
            .oniGetExtendedError
            .as_ref()
            .expect("Expected function, got error."))()
    }
    pub unsafe fn oniGetDeviceList(&self, pDevices: *mut *mut OniDeviceInfo, pNumDevices: *mut ::std::os::raw::c_int) -> OniStatus {
        (self
            .oniGetDeviceList
            .as_ref()
            .expect("Expected function, got error."))(pDevices, pNumDevices)
    }
    pub unsafe fn oniReleaseDeviceList(&self, pDevices: *mut OniDeviceInfo) -> OniStatus {
        (self
            .oniReleaseDeviceList
            .as_ref()
            .expect("Expected function, got error."))(pDevices)
    }
    pub unsafe fn oniWaitForAnyStream(&self, pStreams: *mut OniStreamHandle, numStreams: ::std::os::raw::c_int, pStreamIndex: *mut ::std::os::raw::c_int, timeout: ::std::os::raw::c_int) -> OniStatus {
        (self
            .oniWaitForAnyStream
            .as_ref()
            .expect("Expected function, got error."))(pStreams, numStreams, pStreamIndex, timeout)
    }
    pub unsafe fn oniDeviceOpen(&self, uri: *const ::std::os::raw::c_char, pDevice: *mut OniDeviceHandle) -> OniStatus {
        (self
            .oniDeviceOpen
            .as_ref()
            .expect("Expected function, got error."))(uri, pDevice)
    }
    pub unsafe fn oniDeviceClose(&self, device: OniDeviceHandle) -> OniStatus {
        (self
            .oniDeviceClose
            .as_ref()
            .expect("Expected function, got error."))(device)
    }
    pub unsafe fn oniDeviceGetSensorInfo(&self, device: OniDeviceHandle, sensorType: OniSensorType) -> *const OniSensorInfo {
        (self
            .oniDeviceGetSensorInfo
            .as_ref()
            .expect("Expected function, got error."))(device, sensorType)
    }
    pub unsafe fn oniDeviceGetInfo(&self, device: OniDeviceHandle, pInfo: *mut OniDeviceInfo) -> OniStatus {
        (self
            .oniDeviceGetInfo
            .as_ref()
            .expect("Expected function, got error."))(device, pInfo)
    }
    pub unsafe fn oniDeviceCreateStream(&self, device: OniDeviceHandle, sensorType: OniSensorType, pStreamHandle: *mut OniStreamHandle) -> OniStatus {
        (self
            .oniDeviceCreateStream
            .as_ref()
            .expect("Expected function, got error."))(device, sensorType, pStreamHandle)
    }
    pub unsafe fn oniDeviceSetProperty(&self, device: OniDeviceHandle, propertyId: ::std::os::raw::c_int, data: *const ::std::os::raw::c_void, dataSize: ::std::os::raw::c_int) -> OniStatus {
        (self
            .oniDeviceSetProperty
            .as_ref()
            .expect("Expected function, got error."))(device, propertyId, data, dataSize)
    }
    pub unsafe fn oniDeviceGetProperty(&self, device: OniDeviceHandle, propertyId: ::std::os::raw::c_int, data: *mut ::std::os::raw::c_void, pDataSize: *mut ::std::os::raw::c_int) -> OniStatus {
        (self
            .oniDeviceGetProperty
            .as_ref()
            .expect("Expected function, got error."))(device, propertyId, data, pDataSize)
    }
    pub unsafe fn oniDeviceIsPropertySupported(&self, device: OniDeviceHandle, propertyId: ::std::os::raw::c_int) -> OniBool {
        (self
            .oniDeviceIsPropertySupported
            .as_ref()
            .expect("Expected function, got error."))(device, propertyId)
    }
    pub unsafe fn oniDeviceIsImageRegistrationModeSupported(&self, device: OniDeviceHandle, mode: OniImageRegistrationMode) -> OniBool {
        (self
            .oniDeviceIsImageRegistrationModeSupported
            .as_ref()
            .expect("Expected function, got error."))(device, mode)
    }
    pub unsafe fn oniStreamDestroy(&self, stream: OniStreamHandle) {
        (self
            .oniStreamDestroy
            .as_ref()
            .expect("Expected function, got error."))(stream)
    }
    pub unsafe fn oniStreamGetSensorInfo(&self, stream: OniStreamHandle) -> *const OniSensorInfo {
        (self
            .oniStreamGetSensorInfo
            .as_ref()
            .expect("Expected function, got error."))(stream)
    }
    pub unsafe fn oniStreamStart(&self, stream: OniStreamHandle) -> OniStatus {
        (self
            .oniStreamStart
            .as_ref()
            .expect("Expected function, got error."))(stream)
    }
    pub unsafe fn oniStreamStop(&self, stream: OniStreamHandle) {
        (self
            .oniStreamStop
            .as_ref()
            .expect("Expected function, got error."))(stream)
    }
    pub unsafe fn oniStreamReadFrame(&self, stream: OniStreamHandle, pFrame: *mut *mut OniFrame) -> OniStatus {
        (self
            .oniStreamReadFrame
            .as_ref()
            .expect("Expected function, got error."))(stream, pFrame)
    }
    pub unsafe fn oniStreamSetProperty(&self, stream: OniStreamHandle, propertyId: ::std::os::raw::c_int, data: *const ::std::os::raw::c_void, dataSize: ::std::os::raw::c_int) -> OniStatus {
        (self
            .oniStreamSetProperty
            .as_ref()
            .expect("Expected function, got error."))(stream, propertyId, data, dataSize)
    }
    pub unsafe fn oniStreamGetProperty(&self, stream: OniStreamHandle, propertyId: ::std::os::raw::c_int, data: *mut ::std::os::raw::c_void, pDataSize: *mut ::std::os::raw::c_int) -> OniStatus {
        (self
            .oniStreamGetProperty
            .as_ref()
            .expect("Expected function, got error."))(stream, propertyId, data, pDataSize)
    }
    pub unsafe fn oniStreamIsPropertySupported(&self, stream: OniStreamHandle, propertyId: ::std::os::raw::c_int) -> OniBool {
        (self
            .oniStreamIsPropertySupported
            .as_ref()
            .expect("Expected function, got error."))(stream, propertyId)
    }
    pub unsafe fn oniFrameRelease(&self, pFrame: *mut OniFrame) {
        (self
            .oniFrameRelease
            .as_ref()
            .expect("Expected function, got error."))(pFrame)
    }
    pub unsafe fn oniFrameAddRef(&self, pFrame: *mut OniFrame) {
        (self
            .oniFrameAddRef
            .as_ref()
            .expect("Expected function, got error."))(pFrame)
    }
}
