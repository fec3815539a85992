// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies
//
// Session lifecycle tests against the in-memory backend.
//
// RUN:
//   cargo test --test lifecycle

use onistream::lifecycle::{InitOutcome, Session, Step};
use onistream::marshal::{self, FrameRequest};
use onistream::mock::{Call, Fault, MockSdk};
use onistream::sdk::Status;
use onistream::{Config, Error, ErrorKind, PixelFormat, SensorType, VideoMode};

fn session(sdk: MockSdk) -> Session<MockSdk> {
    let _ = env_logger::builder().is_test(true).try_init();
    Session::new(sdk, Config::default())
}

// -----------------------------------------------------------------------------
// initialize / shutdown
// -----------------------------------------------------------------------------

#[test]
fn test_initialize_twice_is_a_no_op() {
    let mut s = session(MockSdk::new());
    assert_eq!(s.initialize().unwrap(), InitOutcome::Initialized);

    let device = *s.device().unwrap();
    let streams: Vec<_> = SensorType::ALL.iter().map(|&t| *s.stream(t).unwrap()).collect();
    let calls = s.sdk().calls().len();

    assert_eq!(s.initialize().unwrap(), InitOutcome::AlreadyInitialized);
    assert_eq!(*s.device().unwrap(), device);
    for (sensor, before) in SensorType::ALL.iter().zip(&streams) {
        assert_eq!(s.stream(*sensor).unwrap(), before);
    }
    assert_eq!(s.sdk().calls().len(), calls, "second initialize touched the SDK");
}

#[test]
fn test_start_failure_rolls_back_each_stream() {
    for failing in SensorType::ALL {
        let mut s = session(MockSdk::new().with_fault(Fault::StartStream(failing)));
        let err = s.initialize().unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Lifecycle);
        assert!(matches!(
            err,
            Error::Lifecycle { step: Step::StartStream(sensor), .. } if sensor == failing
        ));
        assert!(!s.is_initialized());
        assert_eq!(s.sdk().started_streams(), 0, "{} left streams started", failing);
        assert_eq!(s.sdk().open_streams(), 0);
        assert!(!s.sdk().is_device_open());
        assert!(!s.sdk().is_runtime_started());
        for sensor in SensorType::ALL {
            assert!(!s.is_created(sensor));
            assert!(!s.is_started(sensor));
        }
    }
}

#[test]
fn test_device_open_failure_stops_runtime() {
    let mut s = session(MockSdk::new().with_fault(Fault::OpenDevice));
    let err = s.initialize().unwrap_err();
    let Error::Lifecycle { step, source } = err else {
        panic!("expected lifecycle error");
    };
    assert_eq!(step, Step::DeviceOpen);
    assert_eq!(source.status, Status::NoDevice);
    assert!(source.detail.contains("no devices found"));
    assert_eq!(
        s.sdk().calls(),
        &[Call::Initialize, Call::OpenDevice, Call::Shutdown]
    );
}

#[test]
fn test_retry_after_failed_initialize() {
    let mut s = session(MockSdk::new().with_fault(Fault::StartStream(SensorType::Color)));
    assert!(s.initialize().is_err());

    s.sdk_mut().heal(Fault::StartStream(SensorType::Color));
    assert_eq!(s.initialize().unwrap(), InitOutcome::Initialized);
    assert_eq!(s.sdk().started_streams(), 3);
}

#[test]
fn test_shutdown_without_initialize() {
    let mut s = session(MockSdk::new());
    s.shutdown();
    s.shutdown();
    assert!(!s.is_initialized());
    assert!(s.sdk().calls().is_empty());
}

#[test]
fn test_shutdown_twice() {
    let mut s = session(MockSdk::new());
    s.initialize().unwrap();
    s.shutdown();
    let calls = s.sdk().calls().len();
    s.shutdown();

    assert!(!s.is_initialized());
    assert_eq!(s.sdk().calls().len(), calls);
    assert_eq!(s.sdk().open_streams(), 0);
    assert!(!s.sdk().is_runtime_started());
}

#[test]
fn test_reinitialize_after_shutdown() {
    let mut s = session(MockSdk::new());
    s.initialize().unwrap();
    s.shutdown();
    assert_eq!(s.initialize().unwrap(), InitOutcome::Initialized);
    assert_eq!(s.sdk().started_streams(), 3);
}

#[test]
fn test_drop_shuts_down() {
    let sdk = MockSdk::new();
    let log = sdk.call_log();
    let live = {
        let mut s = session(sdk);
        s.initialize().unwrap();
        marshal::acquire(&mut s, SensorType::Depth, FrameRequest::all()).unwrap();
        s.sdk().frames_live()
    };
    assert_eq!(live, 0);

    let calls = log.calls();
    assert_eq!(
        &calls[calls.len() - 2..],
        &[Call::CloseDevice, Call::Shutdown]
    );
    for sensor in SensorType::ALL {
        assert!(calls.contains(&Call::DestroyStream(sensor)));
    }
}

#[test]
fn test_drop_without_initialize_touches_nothing() {
    let sdk = MockSdk::new();
    let log = sdk.call_log();
    drop(session(sdk));
    assert!(log.calls().is_empty());
}

// -----------------------------------------------------------------------------
// missing sensors
// -----------------------------------------------------------------------------

#[test]
fn test_missing_sensor_fails_by_default() {
    let mut s = session(MockSdk::new().without_sensor(SensorType::Infrared));
    let err = s.initialize().unwrap_err();
    assert!(matches!(
        err,
        Error::Lifecycle {
            step: Step::StartStream(SensorType::Infrared),
            ..
        }
    ));
    assert_eq!(s.sdk().open_streams(), 0);
    assert!(!s.sdk().is_device_open());
}

#[test]
fn test_missing_sensor_tolerated() {
    let config = Config::default().with_missing_sensors_tolerated(true);
    let mut s = Session::new(MockSdk::new().without_sensor(SensorType::Color), config);
    s.initialize().unwrap();

    assert!(s.is_started(SensorType::Depth));
    assert!(!s.is_created(SensorType::Color));
    assert!(s.is_started(SensorType::Infrared));
    assert!(!s.sdk().calls().contains(&Call::CreateStream(SensorType::Color)));

    let err = marshal::acquire(&mut s, SensorType::Color, FrameRequest::all()).unwrap_err();
    assert!(matches!(err, Error::StreamUnavailable(SensorType::Color)));
    assert!(matches!(
        s.set_video_mode(SensorType::Color, 0),
        Err(Error::StreamUnavailable(SensorType::Color))
    ));
}

// -----------------------------------------------------------------------------
// video modes
// -----------------------------------------------------------------------------

#[test]
fn test_video_mode_bounds() {
    let mut s = session(MockSdk::new());
    s.initialize().unwrap();

    for sensor in SensorType::ALL {
        let modes = s.video_modes(sensor).unwrap();
        let before = s.video_mode(sensor).unwrap();
        s.sdk_mut().clear_calls();

        for index in [modes.len() as i64, -1, i64::MAX, i64::MIN] {
            let err = s.set_video_mode(sensor, index).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Argument, "{} index {}", sensor, index);
        }
        assert_eq!(s.video_mode(sensor).unwrap(), before);
        assert!(s.is_started(sensor));
        assert!(s.sdk().calls().is_empty(), "rejected index touched the stream");
    }
}

#[test]
fn test_set_video_mode_sequence() {
    let mut s = session(MockSdk::new());
    s.initialize().unwrap();
    s.sdk_mut().clear_calls();

    let mode = s.set_video_mode(SensorType::Depth, 2).unwrap();
    assert_eq!(mode, VideoMode::new(640, 480, 30, PixelFormat::Depth100Um));
    assert_eq!(
        s.sdk().calls(),
        &[
            Call::StopStream(SensorType::Depth),
            Call::SetVideoMode(SensorType::Depth),
            Call::StartStream(SensorType::Depth),
        ]
    );
    assert_eq!(s.video_mode(SensorType::Depth).unwrap(), mode);
    assert!(s.is_started(SensorType::Depth));

    let frame = marshal::acquire(&mut s, SensorType::Depth, FrameRequest::all()).unwrap();
    assert_eq!(frame.data.unwrap().dims(), vec![480, 640]);
}

#[test]
fn test_failed_apply_restarts_previous_mode() {
    let mut s = session(MockSdk::new());
    s.initialize().unwrap();
    let before = s.video_mode(SensorType::Color).unwrap();
    s.sdk_mut().inject(Fault::SetVideoMode(SensorType::Color));

    let err = s.set_video_mode(SensorType::Color, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Reconfiguration);
    assert!(matches!(
        err,
        Error::Reconfiguration {
            sensor: Some(SensorType::Color),
            ..
        }
    ));
    assert!(s.is_initialized());
    assert!(s.is_started(SensorType::Color));
    assert!(s.sdk().is_started(SensorType::Color));
    assert_eq!(s.video_mode(SensorType::Color).unwrap(), before);
}

#[test]
fn test_failed_restart_leaves_stream_stopped() {
    let mut s = session(MockSdk::new());
    s.initialize().unwrap();
    s.sdk_mut().inject(Fault::StartStream(SensorType::Infrared));

    let err = s.set_video_mode(SensorType::Infrared, 1).unwrap_err();
    assert!(matches!(
        err,
        Error::Lifecycle {
            step: Step::StartStream(SensorType::Infrared),
            ..
        }
    ));
    assert!(!s.is_started(SensorType::Infrared));
    assert!(matches!(
        marshal::acquire(&mut s, SensorType::Infrared, FrameRequest::all()),
        Err(Error::StreamUnavailable(SensorType::Infrared))
    ));
}

#[test]
fn test_video_modes_follow_sdk_order() {
    let modes = vec![
        VideoMode::new(160, 120, 30, PixelFormat::Gray8),
        VideoMode::new(80, 60, 60, PixelFormat::Gray16),
    ];
    let mut s = session(MockSdk::new().with_modes(SensorType::Infrared, modes.clone()));
    assert!(matches!(
        s.video_modes(SensorType::Infrared),
        Err(Error::StreamUnavailable(_))
    ));
    s.initialize().unwrap();
    assert_eq!(s.video_modes(SensorType::Infrared).unwrap(), modes);
}

// -----------------------------------------------------------------------------
// registration and queries
// -----------------------------------------------------------------------------

#[test]
fn test_registration_round_trip() {
    let mut s = session(MockSdk::new());
    s.initialize().unwrap();
    assert!(s.registration_supported());

    s.set_registration(true).unwrap();
    assert_eq!(
        s.registration_mode().unwrap(),
        onistream::RegistrationMode::DepthToColor
    );
    s.set_registration(false).unwrap();
    assert_eq!(
        s.registration_mode().unwrap(),
        onistream::RegistrationMode::Off
    );
}

#[test]
fn test_registration_unsupported() {
    let mut s = session(MockSdk::new().with_registration_supported(false));
    s.initialize().unwrap();
    assert!(!s.registration_supported());

    let err = s.set_registration(true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Reconfiguration);
    assert!(s.set_registration(false).is_ok());
}

#[test]
fn test_queries_need_an_open_device() {
    let s = session(MockSdk::new());
    assert!(matches!(s.device_info(), Err(Error::NotInitialized)));
    assert!(matches!(s.registration_mode(), Err(Error::NotInitialized)));
    assert!(!s.registration_supported());
    assert!(matches!(
        s.stream_info(SensorType::Depth),
        Err(Error::StreamUnavailable(SensorType::Depth))
    ));
}

#[test]
fn test_device_info() {
    let mut s = session(MockSdk::new());
    s.initialize().unwrap();
    let info = s.device_info().unwrap();
    assert_eq!(info.name, "PS1080");
    assert_eq!(info.vendor, "PrimeSense");

    let stream = s.stream_info(SensorType::Depth).unwrap();
    assert_eq!(stream.max_pixel_value, 10000);
    assert_eq!(stream.video_mode, s.video_mode(SensorType::Depth).unwrap());
}
