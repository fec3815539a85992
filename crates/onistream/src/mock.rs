// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! In-memory sensor backend
//!
//! [`MockSdk`] behaves like a three-sensor structured-light camera: it keeps
//! per-stream video modes, hands out numbered handles, produces frames either
//! from a queue filled by the caller or synthesized from the current video
//! mode, and can be told to fail any step through [`Fault`]. Every call is
//! recorded so tests can check sequencing, and frames count their own
//! releases.
//!
//! # Example
//!
//! ```
//! use onistream::lifecycle::Session;
//! use onistream::mock::{Fault, MockSdk};
//! use onistream::{Config, SensorType};
//!
//! let sdk = MockSdk::new().with_fault(Fault::StartStream(SensorType::Color));
//! let mut session = Session::new(sdk, Config::default());
//!
//! assert!(session.initialize().is_err());
//! assert!(!session.is_initialized());
//! assert_eq!(session.sdk().started_streams(), 0);
//! ```

use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, HashSet, VecDeque},
    rc::Rc,
    time::Duration,
};

use crate::{
    sdk::{RawFrame, Sdk, SdkError, Status},
    sensor::{DeviceInfo, PixelFormat, RegistrationMode, SensorType, StreamInfo, VideoMode},
};

/// A step that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    Initialize,
    OpenDevice,
    CreateStream(SensorType),
    StartStream(SensorType),
    SetVideoMode(SensorType),
    ReadFrame(SensorType),
    SetRegistration,
    /// `wait_for_frame` never sees a frame.
    Stall(SensorType),
}

/// SDK call recorded by the mock, in order of arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Initialize,
    Shutdown,
    OpenDevice,
    CloseDevice,
    CreateStream(SensorType),
    DestroyStream(SensorType),
    StartStream(SensorType),
    StopStream(SensorType),
    SetVideoMode(SensorType),
    SetRegistration(RegistrationMode),
    WaitForFrame(SensorType),
    ReadFrame(SensorType),
}

/// Shared handle on the calls recorded by a [`MockSdk`], still readable after
/// the mock has been moved into a session or dropped with it.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<Call>>>);

impl CallLog {
    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MockDevice(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MockStream {
    id: u32,
    sensor: SensorType,
}

impl MockStream {
    pub fn sensor(&self) -> SensorType {
        self.sensor
    }
}

/// Frame handed out by [`MockSdk::read_frame`].
#[derive(Debug)]
pub struct MockFrame {
    width: usize,
    height: usize,
    pixel_format: PixelFormat,
    stride: usize,
    frame_index: u64,
    timestamp: u64,
    data: Vec<u8>,
    live: Rc<Cell<usize>>,
    released: Rc<Cell<usize>>,
}

impl RawFrame for MockFrame {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    fn stride(&self) -> usize {
        self.stride
    }

    fn frame_index(&self) -> u64 {
        self.frame_index
    }

    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Drop for MockFrame {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
        self.released.set(self.released.get() + 1);
    }
}

/// Frame contents queued with [`MockSdk::push_frame`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedFrame {
    pub width: usize,
    pub height: usize,
    pub pixel_format: PixelFormat,
    /// Row pitch in bytes, `None` for tightly packed rows
    pub stride: Option<usize>,
    pub data: Vec<u8>,
}

impl QueuedFrame {
    pub fn new(width: usize, height: usize, pixel_format: PixelFormat, data: Vec<u8>) -> Self {
        QueuedFrame {
            width,
            height,
            pixel_format,
            stride: None,
            data,
        }
    }

    pub fn with_stride(self, stride: usize) -> Self {
        QueuedFrame {
            stride: Some(stride),
            ..self
        }
    }
}

#[derive(Debug, Clone)]
struct MockSensor {
    modes: Vec<VideoMode>,
    current: VideoMode,
    horizontal_fov: f32,
    vertical_fov: f32,
    min_value: i32,
    max_value: i32,
    next_index: u64,
    queue: VecDeque<QueuedFrame>,
}

impl MockSensor {
    fn new(modes: Vec<VideoMode>, fov: (f32, f32), range: (i32, i32)) -> Self {
        let current = modes
            .first()
            .copied()
            .unwrap_or_else(|| VideoMode::new(0, 0, 0, PixelFormat::Gray8));
        MockSensor {
            modes,
            current,
            horizontal_fov: fov.0,
            vertical_fov: fov.1,
            min_value: range.0,
            max_value: range.1,
            next_index: 1,
            queue: VecDeque::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct StreamState {
    sensor: SensorType,
    started: bool,
}

/// In-memory implementation of [`Sdk`].
#[derive(Debug)]
pub struct MockSdk {
    sensors: [Option<MockSensor>; 3],
    faults: HashSet<Fault>,
    runtime_started: bool,
    device: Option<MockDevice>,
    device_info: DeviceInfo,
    registration: RegistrationMode,
    registration_supported: bool,
    streams: HashMap<u32, StreamState>,
    next_handle: u32,
    reads: usize,
    calls: CallLog,
    live: Rc<Cell<usize>>,
    released: Rc<Cell<usize>>,
}

impl Default for MockSdk {
    fn default() -> Self {
        MockSdk::new()
    }
}

impl MockSdk {
    /// Device with depth, color and infrared sensors and a few modes each.
    /// The first mode of every sensor is its initial mode.
    pub fn new() -> Self {
        let depth = MockSensor::new(
            vec![
                VideoMode::new(320, 240, 30, PixelFormat::Depth1Mm),
                VideoMode::new(640, 480, 30, PixelFormat::Depth1Mm),
                VideoMode::new(640, 480, 30, PixelFormat::Depth100Um),
                VideoMode::new(320, 240, 60, PixelFormat::Shift92),
            ],
            (1.0144686, 0.7898141),
            (0, 10000),
        );
        let color = MockSensor::new(
            vec![
                VideoMode::new(320, 240, 30, PixelFormat::Rgb888),
                VideoMode::new(640, 480, 30, PixelFormat::Rgb888),
                VideoMode::new(640, 480, 30, PixelFormat::Yuv422),
                VideoMode::new(640, 480, 30, PixelFormat::Jpeg),
            ],
            (1.0225999, 0.7966146),
            (0, 255),
        );
        let ir = MockSensor::new(
            vec![
                VideoMode::new(320, 240, 30, PixelFormat::Gray16),
                VideoMode::new(640, 480, 30, PixelFormat::Gray16),
                VideoMode::new(640, 480, 30, PixelFormat::Gray8),
            ],
            (1.0144686, 0.7898141),
            (0, 1023),
        );

        MockSdk {
            sensors: [Some(depth), Some(color), Some(ir)],
            faults: HashSet::new(),
            runtime_started: false,
            device: None,
            device_info: DeviceInfo {
                uri: "mock://0".to_owned(),
                vendor: "PrimeSense".to_owned(),
                name: "PS1080".to_owned(),
                usb_vendor_id: 0x1d27,
                usb_product_id: 0x0601,
            },
            registration: RegistrationMode::Off,
            registration_supported: true,
            streams: HashMap::new(),
            next_handle: 1,
            reads: 0,
            calls: CallLog::default(),
            live: Rc::new(Cell::new(0)),
            released: Rc::new(Cell::new(0)),
        }
    }

    /// Remove a sensor from the device.
    pub fn without_sensor(mut self, sensor: SensorType) -> Self {
        self.sensors[sensor.index()] = None;
        self
    }

    /// Replace the supported modes of a sensor; the first becomes current.
    pub fn with_modes(mut self, sensor: SensorType, modes: Vec<VideoMode>) -> Self {
        let slot = &mut self.sensors[sensor.index()];
        let (fov, range) = match slot {
            Some(s) => ((s.horizontal_fov, s.vertical_fov), (s.min_value, s.max_value)),
            None => ((1.0, 0.75), (0, 255)),
        };
        *slot = Some(MockSensor::new(modes, fov, range));
        self
    }

    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.faults.insert(fault);
        self
    }

    pub fn with_registration_supported(mut self, supported: bool) -> Self {
        self.registration_supported = supported;
        self
    }

    /// Make a step fail from now on.
    pub fn inject(&mut self, fault: Fault) {
        self.faults.insert(fault);
    }

    /// Let a previously injected step succeed again.
    pub fn heal(&mut self, fault: Fault) {
        self.faults.remove(&fault);
    }

    /// Queue a frame to be returned by the next read of `sensor`.
    pub fn push_frame(&mut self, sensor: SensorType, frame: QueuedFrame) {
        if let Some(s) = self.sensors[sensor.index()].as_mut() {
            s.queue.push_back(frame);
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.calls()
    }

    pub fn call_log(&self) -> CallLog {
        self.calls.clone()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn is_runtime_started(&self) -> bool {
        self.runtime_started
    }

    pub fn is_device_open(&self) -> bool {
        self.device.is_some()
    }

    /// Streams created and not yet destroyed.
    pub fn open_streams(&self) -> usize {
        self.streams.len()
    }

    pub fn started_streams(&self) -> usize {
        self.streams.values().filter(|s| s.started).count()
    }

    pub fn is_started(&self, sensor: SensorType) -> bool {
        self.streams
            .values()
            .any(|s| s.sensor == sensor && s.started)
    }

    /// Successful frame reads so far.
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Frames handed out and not yet dropped.
    pub fn frames_live(&self) -> usize {
        self.live.get()
    }

    pub fn frames_released(&self) -> usize {
        self.released.get()
    }

    pub fn current_mode(&self, sensor: SensorType) -> Option<VideoMode> {
        self.sensors[sensor.index()].as_ref().map(|s| s.current)
    }

    pub fn registration(&self) -> RegistrationMode {
        self.registration
    }

    fn fail(&self, fault: Fault, status: Status, detail: &str) -> Result<(), SdkError> {
        if self.faults.contains(&fault) {
            return Err(SdkError::new(status, detail));
        }
        Ok(())
    }

    fn check_device(&self, device: &MockDevice) -> Result<(), SdkError> {
        match self.device {
            Some(open) if open == *device => Ok(()),
            _ => Err(SdkError::new(Status::BadParameter, "device is not open")),
        }
    }

    fn stream_state(&self, stream: &MockStream) -> Result<StreamState, SdkError> {
        self.streams
            .get(&stream.id)
            .copied()
            .ok_or_else(|| SdkError::new(Status::Error, "stream is not valid"))
    }

    fn sensor(&self, sensor: SensorType) -> Result<&MockSensor, SdkError> {
        self.sensors[sensor.index()]
            .as_ref()
            .ok_or_else(|| SdkError::new(Status::NotSupported, "sensor not present"))
    }

    fn sensor_mut(&mut self, sensor: SensorType) -> Result<&mut MockSensor, SdkError> {
        self.sensors[sensor.index()]
            .as_mut()
            .ok_or_else(|| SdkError::new(Status::NotSupported, "sensor not present"))
    }
}

/// Deterministic frame for `mode`: sample `i` holds `i` truncated to the
/// sample width.
fn synthesize(mode: &VideoMode) -> QueuedFrame {
    let width = usize::try_from(mode.resolution_x).unwrap_or(0);
    let height = usize::try_from(mode.resolution_y).unwrap_or(0);
    let pixels = width * height;
    let data = match mode.pixel_format.layout() {
        Some(layout) if layout.bytes_per_pixel() == 2 => (0..pixels)
            .flat_map(|i| (i as u16).to_ne_bytes())
            .collect(),
        Some(layout) => (0..pixels * layout.bytes_per_pixel())
            .map(|i| i as u8)
            .collect(),
        None => (0..pixels).map(|i| i as u8).collect(),
    };
    QueuedFrame::new(width, height, mode.pixel_format, data)
}

impl Sdk for MockSdk {
    type Device = MockDevice;
    type Stream = MockStream;
    type Frame = MockFrame;

    fn initialize(&mut self) -> Result<(), SdkError> {
        self.calls.push(Call::Initialize);
        self.fail(Fault::Initialize, Status::Error, "Found no valid drivers")?;
        self.runtime_started = true;
        Ok(())
    }

    fn shutdown(&mut self) {
        self.calls.push(Call::Shutdown);
        self.runtime_started = false;
    }

    fn open_device(&mut self) -> Result<MockDevice, SdkError> {
        self.calls.push(Call::OpenDevice);
        if !self.runtime_started {
            return Err(SdkError::new(Status::Error, "OpenNI is not initialized"));
        }
        self.fail(
            Fault::OpenDevice,
            Status::NoDevice,
            "DeviceOpen using default: no devices found",
        )?;
        let device = MockDevice(self.next_handle);
        self.next_handle += 1;
        self.device = Some(device);
        Ok(device)
    }

    fn close_device(&mut self, device: MockDevice) {
        self.calls.push(Call::CloseDevice);
        if self.device == Some(device) {
            self.device = None;
        }
    }

    fn device_info(&self, device: &MockDevice) -> Result<DeviceInfo, SdkError> {
        self.check_device(device)?;
        Ok(self.device_info.clone())
    }

    fn has_sensor(&self, device: &MockDevice, sensor: SensorType) -> bool {
        self.check_device(device).is_ok() && self.sensors[sensor.index()].is_some()
    }

    fn registration_mode(&self, device: &MockDevice) -> Result<RegistrationMode, SdkError> {
        self.check_device(device)?;
        Ok(self.registration)
    }

    fn set_registration_mode(
        &mut self,
        device: &MockDevice,
        mode: RegistrationMode,
    ) -> Result<(), SdkError> {
        self.calls.push(Call::SetRegistration(mode));
        self.check_device(device)?;
        self.fail(Fault::SetRegistration, Status::NotSupported, "registration failed")?;
        if !self.registration_supported && mode == RegistrationMode::DepthToColor {
            return Err(SdkError::new(
                Status::NotSupported,
                "image registration is not supported",
            ));
        }
        self.registration = mode;
        Ok(())
    }

    fn is_registration_supported(&self, device: &MockDevice, mode: RegistrationMode) -> bool {
        self.check_device(device).is_ok()
            && (mode == RegistrationMode::Off || self.registration_supported)
    }

    fn create_stream(
        &mut self,
        device: &MockDevice,
        sensor: SensorType,
    ) -> Result<MockStream, SdkError> {
        self.calls.push(Call::CreateStream(sensor));
        self.check_device(device)?;
        self.fail(
            Fault::CreateStream(sensor),
            Status::Error,
            "Couldn't create stream",
        )?;
        self.sensor(sensor)?;
        let stream = MockStream {
            id: self.next_handle,
            sensor,
        };
        self.next_handle += 1;
        self.streams.insert(
            stream.id,
            StreamState {
                sensor,
                started: false,
            },
        );
        Ok(stream)
    }

    fn destroy_stream(&mut self, stream: MockStream) {
        self.calls.push(Call::DestroyStream(stream.sensor));
        self.streams.remove(&stream.id);
    }

    fn start_stream(&mut self, stream: &MockStream) -> Result<(), SdkError> {
        self.calls.push(Call::StartStream(stream.sensor));
        self.stream_state(stream)?;
        self.fail(
            Fault::StartStream(stream.sensor),
            Status::Error,
            "Failed to start stream",
        )?;
        if let Some(state) = self.streams.get_mut(&stream.id) {
            state.started = true;
        }
        Ok(())
    }

    fn stop_stream(&mut self, stream: &MockStream) {
        self.calls.push(Call::StopStream(stream.sensor));
        if let Some(state) = self.streams.get_mut(&stream.id) {
            state.started = false;
        }
    }

    fn supported_video_modes(&self, stream: &MockStream) -> Result<Vec<VideoMode>, SdkError> {
        self.stream_state(stream)?;
        Ok(self.sensor(stream.sensor)?.modes.clone())
    }

    fn video_mode(&self, stream: &MockStream) -> Result<VideoMode, SdkError> {
        self.stream_state(stream)?;
        Ok(self.sensor(stream.sensor)?.current)
    }

    fn set_video_mode(&mut self, stream: &MockStream, mode: &VideoMode) -> Result<(), SdkError> {
        self.calls.push(Call::SetVideoMode(stream.sensor));
        let state = self.stream_state(stream)?;
        if state.started {
            return Err(SdkError::new(
                Status::OutOfFlow,
                "video mode cannot change while streaming",
            ));
        }
        self.fail(
            Fault::SetVideoMode(stream.sensor),
            Status::NotSupported,
            "Requested video mode is not supported",
        )?;
        let sensor = self.sensor_mut(stream.sensor)?;
        if !sensor.modes.contains(mode) {
            return Err(SdkError::new(Status::BadParameter, "unknown video mode"));
        }
        sensor.current = *mode;
        Ok(())
    }

    fn stream_info(&self, stream: &MockStream) -> Result<StreamInfo, SdkError> {
        self.stream_state(stream)?;
        let sensor = self.sensor(stream.sensor)?;
        Ok(StreamInfo {
            horizontal_fov: sensor.horizontal_fov,
            vertical_fov: sensor.vertical_fov,
            max_pixel_value: sensor.max_value,
            min_pixel_value: sensor.min_value,
            video_mode: sensor.current,
        })
    }

    fn wait_for_frame(&mut self, stream: &MockStream, _timeout: Duration) -> Result<bool, SdkError> {
        self.calls.push(Call::WaitForFrame(stream.sensor));
        let state = self.stream_state(stream)?;
        if !state.started {
            return Err(SdkError::new(Status::OutOfFlow, "stream is not started"));
        }
        Ok(!self.faults.contains(&Fault::Stall(stream.sensor)))
    }

    fn read_frame(&mut self, stream: &MockStream) -> Result<MockFrame, SdkError> {
        self.calls.push(Call::ReadFrame(stream.sensor));
        let state = self.stream_state(stream)?;
        if !state.started {
            return Err(SdkError::new(Status::OutOfFlow, "stream is not started"));
        }
        self.fail(
            Fault::ReadFrame(stream.sensor),
            Status::Error,
            "Frame read failed",
        )?;

        let sensor = self.sensor_mut(stream.sensor)?;
        let queued = match sensor.queue.pop_front() {
            Some(queued) => queued,
            None => synthesize(&sensor.current),
        };
        let frame_index = sensor.next_index;
        sensor.next_index += 1;

        let bytes_per_pixel = queued
            .pixel_format
            .layout()
            .map(|l| l.bytes_per_pixel())
            .unwrap_or(1);
        let stride = queued.stride.unwrap_or(queued.width * bytes_per_pixel);

        self.reads += 1;
        self.live.set(self.live.get() + 1);

        Ok(MockFrame {
            width: queued.width,
            height: queued.height,
            pixel_format: queued.pixel_format,
            stride,
            frame_index,
            timestamp: frame_index * 33_333,
            data: queued.data,
            live: Rc::clone(&self.live),
            released: Rc::clone(&self.released),
        })
    }
}
