// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::error::CliError;
use crate::utils::{open_session, Options, StreamArg};
use clap::Args as ClapArgs;
use onistream::{report, SensorType, VideoMode};
use serde::Serialize;
use std::io::{self, Write};

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Stream to list
    #[arg(value_enum)]
    stream: StreamArg,
}

/// Serializable view of a video mode
#[derive(Debug, Serialize)]
pub struct ModeReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub resolution_x: i32,
    pub resolution_y: i32,
    pub fps: i32,
    pub pixel_format: String,
    /// Whether acquired frames of this format can be converted
    pub convertible: bool,
}

impl ModeReport {
    pub fn new(index: Option<usize>, mode: &VideoMode) -> Self {
        ModeReport {
            index,
            resolution_x: mode.resolution_x,
            resolution_y: mode.resolution_y,
            fps: mode.fps,
            pixel_format: mode.pixel_format.to_string(),
            convertible: mode.pixel_format.layout().is_some(),
        }
    }
}

pub fn execute(args: Args, options: &Options) -> Result<(), CliError> {
    let sensor = SensorType::from(args.stream);
    let mut session = open_session(options)?;
    session.initialize()?;

    let modes = session.video_modes(sensor)?;
    log::debug!("{} stream reports {} video modes", sensor, modes.len());

    let mut out = io::stdout().lock();
    if options.json {
        let reports: Vec<ModeReport> = modes
            .iter()
            .enumerate()
            .map(|(i, mode)| ModeReport::new(Some(i), mode))
            .collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&reports)?)?;
    } else {
        report::write_modes_heading(&mut out, sensor)?;
        report::write_video_modes(&mut out, &modes)?;
    }

    Ok(())
}
