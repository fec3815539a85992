// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::error::CliError;
use crate::stats::{print_metrics, CaptureStats};
use crate::utils::{install_signal_handler, open_session, Options, StreamArg};
use clap::Args as ClapArgs;
use onistream::marshal::{self, FrameArray, FrameRequest};
use onistream::SensorType;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::atomic::Ordering;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Stream to capture
    #[arg(value_enum)]
    stream: StreamArg,

    /// Number of frames to capture (0 = until Ctrl+C)
    #[arg(short = 'n', long, default_value = "30")]
    count: u64,

    /// Switch the stream to this video mode index before capturing
    #[arg(short, long, allow_negative_numbers = true)]
    mode: Option<i64>,

    /// Turn depth to color registration on before capturing
    #[arg(short, long)]
    registration: bool,

    /// Append each converted frame's raw column-major bytes to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn execute(args: Args, options: &Options) -> Result<(), CliError> {
    let term = install_signal_handler()?;
    let sensor = SensorType::from(args.stream);

    let mut session = open_session(options)?;
    session.initialize()?;

    if args.registration {
        session.set_registration(true)?;
        log::info!("Depth to color registration enabled");
    }
    if let Some(index) = args.mode {
        let mode = session.set_video_mode(sensor, index)?;
        log::info!("{} video mode {}: {}", sensor, index, mode);
    }

    let mut writer = match &args.output {
        Some(path) => Some(BufWriter::new(File::create(path)?)),
        None => None,
    };

    log::info!(
        "Capturing {} {} frames (Ctrl+C to stop)",
        if args.count == 0 {
            "unbounded".to_string()
        } else {
            args.count.to_string()
        },
        sensor
    );

    let mut stats = CaptureStats::new(sensor);
    while (args.count == 0 || stats.frames() < args.count) && !term.load(Ordering::Relaxed) {
        let acquired = marshal::acquire(&mut session, sensor, FrameRequest::all())?;
        let bytes = acquired
            .data
            .as_ref()
            .map(FrameArray::to_ne_bytes)
            .unwrap_or_default();

        if stats.frames() == 0 {
            if let Some(data) = &acquired.data {
                log::debug!("First frame: {:?} {:?}", data.layout(), data.dims());
            }
        }

        let index = acquired.frame_index.unwrap_or_default();
        let drops = stats.record(index, acquired.timestamp.unwrap_or_default(), bytes.len());
        if drops > 0 {
            log::debug!("{} frames skipped before frame {}", drops, index);
        }

        if let Some(w) = writer.as_mut() {
            w.write_all(&bytes)?;
        }
    }

    if term.load(Ordering::Relaxed) {
        log::info!("Interrupted after {} frames", stats.frames());
    }
    if let Some(mut w) = writer {
        w.flush()?;
    }

    let metrics = stats.finalize();
    if options.json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        print_metrics(&metrics);
    }

    Ok(())
}
