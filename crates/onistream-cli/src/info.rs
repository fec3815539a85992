// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::error::CliError;
use crate::modes::ModeReport;
use crate::utils::{open_session, Options, StreamArg};
use clap::Args as ClapArgs;
use onistream::lifecycle::Session;
use onistream::openni::OpenNi;
use onistream::sensor::{DeviceInfo, StreamInfo};
use onistream::{report, SensorType};
use serde::Serialize;
use std::io::{self, Write};

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Only report this stream
    #[arg(short, long, value_enum)]
    stream: Option<StreamArg>,

    /// Skip the per-stream settings
    #[arg(long, conflicts_with = "stream")]
    device_only: bool,
}

#[derive(Debug, Serialize)]
struct SensorReport {
    api_version: String,
    device: DeviceReport,
    registration: RegistrationReport,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    streams: Vec<StreamReport>,
}

#[derive(Debug, Serialize)]
struct DeviceReport {
    name: String,
    vendor: String,
    uri: String,
    usb_vendor_id: String,
    usb_product_id: String,
}

impl From<&DeviceInfo> for DeviceReport {
    fn from(info: &DeviceInfo) -> Self {
        DeviceReport {
            name: info.name.clone(),
            vendor: info.vendor.clone(),
            uri: info.uri.clone(),
            usb_vendor_id: format!("{:04x}", info.usb_vendor_id),
            usb_product_id: format!("{:04x}", info.usb_product_id),
        }
    }
}

#[derive(Debug, Serialize)]
struct RegistrationReport {
    mode: String,
    depth_to_color_supported: bool,
}

#[derive(Debug, Serialize)]
struct StreamReport {
    sensor: String,
    available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    horizontal_fov: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vertical_fov: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_pixel_value: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_pixel_value: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    video_mode: Option<ModeReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl StreamReport {
    fn new(sensor: SensorType, info: Result<StreamInfo, onistream::Error>) -> Self {
        match info {
            Ok(info) => StreamReport {
                sensor: sensor.to_string(),
                available: true,
                horizontal_fov: Some(info.horizontal_fov),
                vertical_fov: Some(info.vertical_fov),
                min_pixel_value: Some(info.min_pixel_value),
                max_pixel_value: Some(info.max_pixel_value),
                video_mode: Some(ModeReport::new(None, &info.video_mode)),
                error: None,
            },
            Err(err) => StreamReport {
                sensor: sensor.to_string(),
                available: false,
                horizontal_fov: None,
                vertical_fov: None,
                min_pixel_value: None,
                max_pixel_value: None,
                video_mode: None,
                error: Some(err.to_string()),
            },
        }
    }
}

fn selected_sensors(args: &Args) -> Vec<SensorType> {
    if args.device_only {
        Vec::new()
    } else if let Some(stream) = args.stream {
        vec![SensorType::from(stream)]
    } else {
        SensorType::ALL.to_vec()
    }
}

pub fn execute(args: Args, options: &Options) -> Result<(), CliError> {
    let mut session = open_session(options)?;
    session.initialize()?;

    let sensors = selected_sensors(&args);
    if options.json {
        let report = collect(&session, &sensors)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text(&session, &sensors)?;
    }

    Ok(())
}

fn collect(session: &Session<OpenNi>, sensors: &[SensorType]) -> Result<SensorReport, CliError> {
    let device = session.device_info()?;
    let registration = session.registration_mode()?;

    Ok(SensorReport {
        api_version: onistream::api_version(),
        device: DeviceReport::from(&device),
        registration: RegistrationReport {
            mode: registration.to_string(),
            depth_to_color_supported: session.registration_supported(),
        },
        streams: sensors
            .iter()
            .map(|&sensor| StreamReport::new(sensor, session.stream_info(sensor)))
            .collect(),
    })
}

fn print_text(session: &Session<OpenNi>, sensors: &[SensorType]) -> Result<(), CliError> {
    let mut out = io::stdout().lock();

    writeln!(out, "OpenNI API {}", onistream::api_version())?;
    let device = session.device_info()?;
    report::write_device(&mut out, &device, session.registration_mode()?)?;
    writeln!(out, "Device URI = {}", device.uri)?;
    writeln!(
        out,
        "USB ID = {:04x}:{:04x}",
        device.usb_vendor_id, device.usb_product_id
    )?;
    writeln!(
        out,
        "Depth to color registration supported: {}",
        if session.registration_supported() {
            "yes"
        } else {
            "no"
        }
    )?;

    for &sensor in sensors {
        report::write_sensor_heading(&mut out, sensor)?;
        match session.stream_info(sensor) {
            Ok(info) => report::write_stream_info(&mut out, &info)?,
            Err(err) => writeln!(out, "{}", err)?,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use onistream::{PixelFormat, VideoMode};

    #[test]
    fn test_selected_sensors() {
        let args = Args {
            stream: None,
            device_only: false,
        };
        assert_eq!(selected_sensors(&args), SensorType::ALL.to_vec());

        let args = Args {
            stream: Some(StreamArg::Ir),
            device_only: false,
        };
        assert_eq!(selected_sensors(&args), vec![SensorType::Infrared]);

        let args = Args {
            stream: None,
            device_only: true,
        };
        assert!(selected_sensors(&args).is_empty());
    }

    #[test]
    fn test_stream_report() {
        let info = StreamInfo {
            horizontal_fov: 1.0,
            vertical_fov: 0.75,
            max_pixel_value: 10000,
            min_pixel_value: 0,
            video_mode: VideoMode::new(640, 480, 30, PixelFormat::Depth1Mm),
        };
        let json = serde_json::to_value(StreamReport::new(SensorType::Depth, Ok(info))).unwrap();
        assert_eq!(json["available"], true);
        assert_eq!(json["max_pixel_value"], 10000);
        assert_eq!(json["video_mode"]["pixel_format"], "PIXEL_FORMAT_DEPTH_1_MM");
        assert!(json.get("error").is_none());

        let err = onistream::Error::StreamUnavailable(SensorType::Color);
        let json = serde_json::to_value(StreamReport::new(SensorType::Color, Err(err))).unwrap();
        assert_eq!(json["available"], false);
        assert_eq!(json["error"], "color stream is not available");
        assert!(json.get("video_mode").is_none());
    }

    #[test]
    fn test_device_report_usb_ids() {
        let info = DeviceInfo {
            name: "PS1080".into(),
            vendor: "PrimeSense".into(),
            uri: "1d27/0601@1/2".into(),
            usb_vendor_id: 0x1d27,
            usb_product_id: 0x0601,
        };
        let report = DeviceReport::from(&info);
        assert_eq!(report.usb_vendor_id, "1d27");
        assert_eq!(report.usb_product_id, "0601");
    }
}
