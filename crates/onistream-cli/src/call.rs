// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::error::CliError;
use crate::utils::{array_bytes, open_session, Options};
use clap::Args as ClapArgs;
use onistream::host::{Array, Data};
use onistream::switchyard::{Operation, Switchyard};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Operation code (an unknown code prints the operation list)
    #[arg(allow_negative_numbers = true)]
    opid: f64,

    /// Video mode index, required by opids 13, 14 and 15
    #[arg(allow_negative_numbers = true)]
    video_mode: Option<f64>,

    /// Number of results to request from a frame acquisition (frame, frame index, timestamp)
    #[arg(short = 'n', long, default_value_t = 0)]
    outputs: usize,

    /// Write the returned frame's raw column-major bytes to this file
    #[arg(long)]
    save: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct OutputInfo {
    class: &'static str,
    dims: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<u64>,
}

impl From<&Array> for OutputInfo {
    fn from(array: &Array) -> Self {
        let value = match array.data() {
            Data::UInt64(v) if v.len() == 1 => Some(v[0]),
            _ => None,
        };
        OutputInfo {
            class: array.class_name(),
            dims: array.dims().to_vec(),
            value,
        }
    }
}

/// Acquisitions return the frame first, ahead of the index and timestamp.
fn frame_output(opid: f64, outputs: Vec<Array>) -> Option<Array> {
    match Operation::from_code(opid as i64)? {
        Operation::AcquireFrame(_) => outputs.into_iter().next(),
        _ => None,
    }
}

pub fn execute(args: Args, options: &Options) -> Result<(), CliError> {
    if args.save.is_some() && args.outputs == 0 {
        return Err(CliError::InvalidArgs(
            "--save needs a frame result, request it with --outputs 1 or more".to_string(),
        ));
    }

    let mut inputs = vec![Array::scalar(args.opid)];
    if let Some(mode) = args.video_mode {
        inputs.push(Array::scalar(mode));
    }

    let session = open_session(options)?;
    let stdout = io::stdout();
    let mut yard = Switchyard::new(session, stdout.lock());

    let outputs = yard.call(args.outputs, &inputs)?;
    log::debug!("opid {} returned {} results", args.opid, outputs.len());

    let out = yard.console_mut();
    if options.json {
        let infos: Vec<OutputInfo> = outputs.iter().map(OutputInfo::from).collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&infos)?)?;
    } else {
        for (i, array) in outputs.iter().enumerate() {
            writeln!(out, "out{} = {}", i + 1, array)?;
        }
    }
    out.flush()?;

    if let Some(path) = &args.save {
        match frame_output(args.opid, outputs) {
            Some(frame) => {
                let bytes = array_bytes(frame);
                fs::write(path, &bytes)?;
                log::info!("Saved {} bytes to {}", bytes.len(), path.display());
            }
            None => log::warn!("opid {} returned no frame, nothing saved", args.opid),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_info() {
        let info = OutputInfo::from(&Array::uint64(1234));
        assert_eq!(info.class, "uint64");
        assert_eq!(info.value, Some(1234));

        let frame = Array::new(vec![2, 3], Data::UInt16(vec![0; 6])).unwrap();
        let info = OutputInfo::from(&frame);
        assert_eq!(info.dims, vec![2, 3]);
        assert_eq!(info.value, None);

        let json = serde_json::to_string(&info).unwrap();
        assert_eq!(json, r#"{"class":"uint16","dims":[2,3]}"#);
    }

    #[test]
    fn test_frame_output_is_first_acquisition_result() {
        let frame = Array::new(vec![2, 1, 3], Data::UInt8(vec![0; 6])).unwrap();
        let outputs = vec![frame.clone(), Array::uint64(1), Array::uint64(33_333)];
        assert_eq!(frame_output(3.0, outputs), Some(frame));
    }

    #[test]
    fn test_frame_output_single_pixel_mode() {
        // a 1x1 depth frame has the same shape as the index scalar
        let frame = Array::new(vec![1, 1], Data::UInt16(vec![1234])).unwrap();
        let outputs = vec![frame.clone(), Array::uint64(7)];
        let saved = frame_output(2.0, outputs).unwrap();
        assert_eq!(saved, frame);
        assert_eq!(array_bytes(saved), 1234u16.to_ne_bytes().to_vec());
    }

    #[test]
    fn test_frame_output_other_operations() {
        assert_eq!(frame_output(10.0, Vec::new()), None);
        assert_eq!(frame_output(13.0, vec![Array::uint64(1)]), None);
        assert_eq!(frame_output(99.0, vec![Array::uint64(1)]), None);
    }
}
