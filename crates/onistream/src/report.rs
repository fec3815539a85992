// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Diagnostic text listings printed by the switchyard.

use std::io::{self, Write};

use crate::sensor::{DeviceInfo, RegistrationMode, SensorType, StreamInfo, VideoMode};

fn sensor_label(sensor: SensorType) -> &'static str {
    match sensor {
        SensorType::Depth => "Depth",
        SensorType::Color => "Color",
        SensorType::Infrared => "IR",
    }
}

pub fn write_modes_heading<W: Write>(out: &mut W, sensor: SensorType) -> io::Result<()> {
    write!(out, "\n{} Video Modes ... \n", sensor_label(sensor))
}

pub fn write_sensor_heading<W: Write>(out: &mut W, sensor: SensorType) -> io::Result<()> {
    write!(out, "\n{} Sensor ...\n", sensor_label(sensor))
}

pub fn write_video_mode<W: Write>(out: &mut W, mode: &VideoMode) -> io::Result<()> {
    writeln!(out, "Fps = {}", mode.fps)?;
    writeln!(out, "pixelFormat = {}", mode.pixel_format)?;
    writeln!(out, "resX = {}", mode.resolution_x)?;
    writeln!(out, "resY = {}", mode.resolution_y)
}

/// Numbered listing of a supported-mode sequence.
pub fn write_video_modes<W: Write>(out: &mut W, modes: &[VideoMode]) -> io::Result<()> {
    for (index, mode) in modes.iter().enumerate() {
        write!(out, "\n\n Mode  {}\n\n", index)?;
        write_video_mode(out, mode)?;
    }
    Ok(())
}

pub fn write_stream_info<W: Write>(out: &mut W, info: &StreamInfo) -> io::Result<()> {
    writeln!(out, "HFOV = {:8.5}", info.horizontal_fov)?;
    writeln!(out, "VFOV = {:8.5}", info.vertical_fov)?;
    writeln!(out, "MaxPixelValue = {}", info.max_pixel_value)?;
    writeln!(out, "MinPixelValue = {}", info.min_pixel_value)?;
    write!(out, "\nVideo Mode ...\n")?;
    write_video_mode(out, &info.video_mode)
}

pub fn write_device<W: Write>(
    out: &mut W,
    info: &DeviceInfo,
    registration: RegistrationMode,
) -> io::Result<()> {
    writeln!(out, "Device Name = {} ", info.name)?;
    writeln!(out, "Device Vendor = {} ", info.vendor)?;
    writeln!(out, "Image Registration Mode : {}", registration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::PixelFormat;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_video_mode_block() {
        let mode = VideoMode::new(640, 480, 30, PixelFormat::Depth1Mm);
        assert_eq!(
            render(|out| write_video_mode(out, &mode)),
            "Fps = 30\npixelFormat = PIXEL_FORMAT_DEPTH_1_MM\nresX = 640\nresY = 480\n"
        );
    }

    #[test]
    fn test_numbered_modes() {
        let modes = [
            VideoMode::new(320, 240, 30, PixelFormat::Gray16),
            VideoMode::new(640, 480, 30, PixelFormat::Gray8),
        ];
        let text = render(|out| {
            write_modes_heading(out, SensorType::Infrared)?;
            write_video_modes(out, &modes)
        });
        assert!(text.starts_with("\nIR Video Modes ... \n\n\n Mode  0\n\nFps = 30\n"));
        assert!(text.contains("\n\n Mode  1\n\nFps = 30\npixelFormat = PIXEL_FORMAT_GRAY8\n"));
    }

    #[test]
    fn test_stream_info_block() {
        let info = StreamInfo {
            horizontal_fov: 1.0144686,
            vertical_fov: 0.7898141,
            max_pixel_value: 10000,
            min_pixel_value: 0,
            video_mode: VideoMode::new(320, 240, 30, PixelFormat::Depth1Mm),
        };
        let text = render(|out| write_stream_info(out, &info));
        assert!(text.starts_with("HFOV =  1.01447\nVFOV =  0.78981\n"));
        assert!(text.contains("MaxPixelValue = 10000\nMinPixelValue = 0\n"));
        assert!(text.contains("\nVideo Mode ...\nFps = 30\n"));
    }

    #[test]
    fn test_device_block() {
        let info = DeviceInfo {
            name: "PS1080".into(),
            vendor: "PrimeSense".into(),
            ..Default::default()
        };
        assert_eq!(
            render(|out| write_device(out, &info, RegistrationMode::DepthToColor)),
            "Device Name = PS1080 \nDevice Vendor = PrimeSense \nImage Registration Mode : DEPTH TO COLOR\n"
        );
    }
}
