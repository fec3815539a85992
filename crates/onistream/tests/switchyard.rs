// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies
//
// Operation dispatcher tests against the in-memory backend.
//
// RUN:
//   cargo test --test switchyard

use std::time::Duration;

use onistream::host::{Array, Data};
use onistream::lifecycle::Session;
use onistream::mock::{Call, Fault, MockSdk, QueuedFrame};
use onistream::switchyard::{Switchyard, USAGE};
use onistream::{Config, Error, ErrorKind, PixelFormat, RegistrationMode, SensorType, VideoMode};

type Yard = Switchyard<MockSdk, Vec<u8>>;

fn yard(sdk: MockSdk) -> Yard {
    yard_with(sdk, Config::default())
}

fn yard_with(sdk: MockSdk, config: Config) -> Yard {
    let _ = env_logger::builder().is_test(true).try_init();
    Switchyard::new(Session::new(sdk, config), Vec::new())
}

fn op(code: f64) -> Array {
    Array::scalar(code)
}

fn console(y: &Yard) -> String {
    String::from_utf8_lossy(y.console()).into_owned()
}

fn take_console(y: &mut Yard) -> String {
    let text = console(y);
    y.console_mut().clear();
    text
}

// -----------------------------------------------------------------------------
// argument handling
// -----------------------------------------------------------------------------

#[test]
fn test_no_inputs_prints_usage() {
    let mut y = yard(MockSdk::new());
    let err = y.call(0, &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Argument);
    assert_eq!(err.to_string(), "At least one input required opid");
    assert!(console(&y).contains(USAGE));
    assert!(y.session().sdk().calls().is_empty());
}

#[test]
fn test_bad_opid_shapes_rejected() {
    let mut y = yard(MockSdk::new());
    let bad = [
        op(2.5),
        op(f64::NAN),
        op(0.0).into_complex(),
        Array::uint64(0),
        Array::new(vec![1, 2], Data::Double(vec![0.0, 0.0])).unwrap(),
    ];
    for arg in bad {
        let err = y.call(0, &[arg]).unwrap_err();
        assert_eq!(err.to_string(), "First argument, opid, should be a scalar index");
    }
    assert!(y.session().sdk().calls().is_empty());
}

#[test]
fn test_unknown_opid_prints_usage() {
    let mut y = yard(MockSdk::new());
    for code in [8.0, 9.0, 16.0, -3.0] {
        let outputs = y.call(0, &[op(code)]).unwrap();
        assert!(outputs.is_empty());
        let text = take_console(&mut y);
        assert!(text.starts_with(&format!("Invalid opid {}\n", code as i64)));
        assert!(text.contains(USAGE));
    }
    assert!(!y.session().is_initialized());
    assert!(y.session().sdk().calls().is_empty());
}

#[test]
fn test_video_mode_argument_checked_before_init() {
    let mut y = yard(MockSdk::new());

    let err = y.call(0, &[op(13.0)]).unwrap_err();
    assert_eq!(err.to_string(), "At least two inputs required opid and videoModeId");

    let err = y.call(0, &[op(14.0), op(0.5)]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Second argument, videoModeId, should be a scalar index"
    );

    assert!(!y.session().is_initialized());
    assert!(y.session().sdk().calls().is_empty());
}

#[test]
fn test_too_many_outputs_rejected_before_read() {
    let mut y = yard(MockSdk::new());
    y.call(0, &[op(0.0)]).unwrap();

    let err = y.call(4, &[op(2.0)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Argument);
    assert_eq!(y.session().sdk().reads(), 0);

    // the next read still gets the first frame index
    let outputs = y.call(2, &[op(2.0)]).unwrap();
    assert_eq!(outputs[1], Array::uint64(1));
}

// -----------------------------------------------------------------------------
// lifecycle operations
// -----------------------------------------------------------------------------

#[test]
fn test_initialize_messages() {
    let mut y = yard(MockSdk::new());
    y.call(0, &[op(0.0)]).unwrap();
    assert_eq!(take_console(&mut y), "Initialized\n");
    y.call(0, &[op(0.0)]).unwrap();
    assert_eq!(take_console(&mut y), "Already Initialized\n");
}

#[test]
fn test_initialize_failure_is_lifecycle_error() {
    let mut y = yard(MockSdk::new().with_fault(Fault::OpenDevice));
    let err = y.call(0, &[op(0.0)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lifecycle);
    assert_eq!(err.id(), "onistream:init");
    assert!(!y.session().is_initialized());
    assert!(!y.session().sdk().is_runtime_started());
    assert!(!console(&y).contains("Initialized"));
}

#[test]
fn test_shutdown_message_and_safety() {
    let mut y = yard(MockSdk::new());
    y.call(0, &[op(1.0)]).unwrap();
    y.call(0, &[op(1.0)]).unwrap();
    assert_eq!(
        take_console(&mut y),
        "Closing the NI device\nClosing the NI device\n"
    );

    y.call(0, &[op(0.0)]).unwrap();
    y.call(0, &[op(1.0)]).unwrap();
    assert!(!y.session().is_initialized());
    assert!(!y.session().sdk().is_device_open());
}

#[test]
fn test_drop_shuts_down() {
    let sdk = MockSdk::new();
    let log = sdk.call_log();
    {
        let mut y = yard(sdk);
        y.call(1, &[op(6.0)]).unwrap();
    }
    assert_eq!(log.calls().last(), Some(&Call::Shutdown));
}

// -----------------------------------------------------------------------------
// acquisition
// -----------------------------------------------------------------------------

#[test]
fn test_acquire_auto_initializes() {
    let mut y = yard(MockSdk::new());
    let outputs = y.call(3, &[op(2.0)]).unwrap();

    assert!(y.session().is_initialized());
    assert_eq!(outputs.len(), 3);
    assert_eq!(outputs[0].dims(), &[240, 320]);
    assert_eq!(outputs[0].class_name(), "uint16");
    assert_eq!(outputs[1], Array::uint64(1));
    assert_eq!(outputs[2], Array::uint64(33_333));
    assert_eq!(y.session().sdk().frames_live(), 0);
}

#[test]
fn test_output_count_selects_results() {
    let mut y = yard(MockSdk::new());
    for count in 0..=3 {
        let outputs = y.call(count, &[op(6.0)]).unwrap();
        assert_eq!(outputs.len(), count);
    }
    // four reads, one per call, including the zero-output call
    assert_eq!(y.session().sdk().reads(), 4);
}

#[test]
fn test_color_frame_is_planar() {
    let mut y = yard(MockSdk::new());
    y.call(0, &[op(0.0)]).unwrap();
    #[rustfmt::skip]
    let pixels = vec![
        10, 20, 30,   40, 50, 60,
        70, 80, 90,   100, 110, 120,
    ];
    y.session_mut()
        .sdk_mut()
        .push_frame(SensorType::Color, QueuedFrame::new(2, 2, PixelFormat::Rgb888, pixels));

    let outputs = y.call(1, &[op(3.0)]).unwrap();
    assert_eq!(outputs[0].dims(), &[2, 2, 3]);
    assert_eq!(
        outputs[0].data(),
        &Data::UInt8(vec![10, 70, 40, 100, 20, 80, 50, 110, 30, 90, 60, 120])
    );
}

#[test]
fn test_depth_frame_is_transposed() {
    let mut y = yard(MockSdk::new());
    y.call(0, &[op(0.0)]).unwrap();
    let samples: Vec<u8> = [1u16, 2, 3, 4, 5, 6]
        .iter()
        .flat_map(|v| v.to_ne_bytes())
        .collect();
    y.session_mut()
        .sdk_mut()
        .push_frame(SensorType::Depth, QueuedFrame::new(3, 2, PixelFormat::Depth1Mm, samples));

    let outputs = y.call(1, &[op(2.0)]).unwrap();
    assert_eq!(outputs[0].dims(), &[2, 3]);
    assert_eq!(outputs[0].data(), &Data::UInt16(vec![1, 4, 2, 5, 3, 6]));
}

#[test]
fn test_padded_rows() {
    let mut y = yard(MockSdk::new());
    y.call(0, &[op(0.0)]).unwrap();
    let frame = QueuedFrame::new(2, 2, PixelFormat::Gray8, vec![1, 2, 0, 0, 3, 4, 0, 0]).with_stride(4);
    y.session_mut().sdk_mut().push_frame(SensorType::Infrared, frame);

    let outputs = y.call(1, &[op(6.0)]).unwrap();
    assert_eq!(outputs[0].data(), &Data::UInt8(vec![1, 3, 2, 4]));
}

#[test]
fn test_unsupported_format_releases_frame() {
    let mut y = yard(MockSdk::new());
    y.call(0, &[op(0.0)]).unwrap();
    y.session_mut().sdk_mut().push_frame(
        SensorType::Color,
        QueuedFrame::new(4, 4, PixelFormat::Jpeg, vec![0xff; 32]),
    );

    let err = y.call(3, &[op(3.0)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    assert!(err.to_string().contains("PIXEL_FORMAT_JPEG"));
    assert_eq!(y.session().sdk().frames_live(), 0);
    assert_eq!(y.session().sdk().frames_released(), 1);
    assert!(y.session().is_started(SensorType::Color));
}

#[test]
fn test_read_failure_leaves_session_up() {
    let mut y = yard(MockSdk::new());
    y.call(0, &[op(0.0)]).unwrap();
    y.session_mut().sdk_mut().inject(Fault::ReadFrame(SensorType::Infrared));

    let err = y.call(1, &[op(6.0)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Acquisition);
    assert!(err.to_string().contains("Frame read failed"));
    assert!(y.session().is_initialized());
    assert_eq!(y.session().sdk().started_streams(), 3);
}

#[test]
fn test_stalled_stream_times_out() {
    let config = Config::default().with_acquire_timeout(Some(Duration::from_millis(20)));
    let mut y = yard_with(MockSdk::new().with_fault(Fault::Stall(SensorType::Depth)), config);

    let err = y.call(1, &[op(2.0)]).unwrap_err();
    assert!(matches!(
        err,
        Error::Timeout {
            sensor: SensorType::Depth,
            ..
        }
    ));
    assert_eq!(y.session().sdk().reads(), 0);
    assert!(y.session().is_initialized());
}

// -----------------------------------------------------------------------------
// configuration
// -----------------------------------------------------------------------------

#[test]
fn test_registration_operations() {
    let mut y = yard(MockSdk::new());
    y.call(0, &[op(5.0)]).unwrap();
    assert!(y.session().is_initialized());
    assert_eq!(y.session().sdk().registration(), RegistrationMode::DepthToColor);

    y.call(0, &[op(4.0)]).unwrap();
    assert_eq!(y.session().sdk().registration(), RegistrationMode::Off);
}

#[test]
fn test_set_video_mode_operations() {
    let mut y = yard(MockSdk::new());
    y.call(0, &[op(14.0), op(1.0)]).unwrap();
    assert!(y.session().is_initialized());
    assert_eq!(
        y.session().sdk().current_mode(SensorType::Color),
        Some(VideoMode::new(640, 480, 30, PixelFormat::Rgb888))
    );

    let outputs = y.call(1, &[op(3.0)]).unwrap();
    assert_eq!(outputs[0].dims(), &[480, 640, 3]);
}

#[test]
fn test_set_video_mode_out_of_range() {
    let mut y = yard(MockSdk::new());
    y.call(0, &[op(0.0)]).unwrap();
    let before = y.session().sdk().current_mode(SensorType::Depth);

    for index in [4.0, -1.0] {
        let err = y.call(0, &[op(13.0), op(index)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Argument);
        assert_eq!(err.id(), "onistream:arg");
    }
    assert_eq!(y.session().sdk().current_mode(SensorType::Depth), before);
}

#[test]
fn test_mode_with_unsupported_format_then_acquire() {
    let mut y = yard(MockSdk::new());
    // color mode 3 is JPEG
    y.call(0, &[op(14.0), op(3.0)]).unwrap();
    let err = y.call(1, &[op(3.0)]).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(PixelFormat::Jpeg)));

    // YUV422 goes through the 8-bit family
    y.call(0, &[op(14.0), op(2.0)]).unwrap();
    let outputs = y.call(1, &[op(3.0)]).unwrap();
    assert_eq!(outputs[0].dims(), &[480, 640]);
    assert_eq!(outputs[0].class_name(), "uint8");
}

// -----------------------------------------------------------------------------
// diagnostics
// -----------------------------------------------------------------------------

#[test]
fn test_list_modes() {
    let mut y = yard(MockSdk::new());
    y.call(0, &[op(0.0)]).unwrap();
    take_console(&mut y);

    y.call(0, &[op(11.0)]).unwrap();
    let text = take_console(&mut y);
    assert!(text.starts_with("\nDepth Video Modes ... \n"));
    assert!(text.contains("\n\n Mode  0\n\nFps = 30\npixelFormat = PIXEL_FORMAT_DEPTH_1_MM\nresX = 320\nresY = 240\n"));
    assert!(text.contains("\n\n Mode  3\n\nFps = 60\npixelFormat = PIXEL_FORMAT_SHIFT_9_2\n"));

    y.call(0, &[op(7.0)]).unwrap();
    assert!(take_console(&mut y).starts_with("\nIR Video Modes ... \n"));

    y.call(0, &[op(12.0)]).unwrap();
    assert!(take_console(&mut y).contains("PIXEL_FORMAT_YUV422"));
}

#[test]
fn test_diagnostics_do_not_initialize() {
    let mut y = yard(MockSdk::new());
    for code in [7.0, 10.0, 11.0, 12.0] {
        y.call(0, &[op(code)]).unwrap();
    }
    assert!(!y.session().is_initialized());
    assert!(y.session().sdk().calls().is_empty());

    let text = console(&y);
    assert!(text.contains("ir stream is not available"));
    assert!(text.contains("device is not initialized"));
}

#[test]
fn test_print_settings() {
    let mut y = yard(MockSdk::new());
    y.call(0, &[op(5.0)]).unwrap();
    take_console(&mut y);

    y.call(0, &[op(10.0)]).unwrap();
    let text = take_console(&mut y);
    assert!(text.starts_with(
        "Device Name = PS1080 \nDevice Vendor = PrimeSense \nImage Registration Mode : DEPTH TO COLOR\n"
    ));
    let depth = text.find("\nDepth Sensor ...\nHFOV = ").unwrap();
    let color = text.find("\nColor Sensor ...\nHFOV = ").unwrap();
    let ir = text.find("\nIR Sensor ...\nHFOV = ").unwrap();
    assert!(depth < color && color < ir);
    assert!(text.contains("MaxPixelValue = 1023\n"));
    assert!(text.contains("\nVideo Mode ...\nFps = 30\npixelFormat = PIXEL_FORMAT_RGB888\n"));
}
