// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Integer-coded operation dispatcher
//!
//! [`Switchyard::call`] takes the host calling convention (requested output
//! count and a list of argument arrays, the first being the operation code)
//! and routes it to the [`Session`] and the frame marshaler. Console text
//! goes to the writer supplied at construction.
//!
//! ```
//! use onistream::host::Array;
//! use onistream::lifecycle::Session;
//! use onistream::mock::MockSdk;
//! use onistream::switchyard::Switchyard;
//! use onistream::Config;
//!
//! let session = Session::new(MockSdk::new(), Config::default());
//! let mut yard = Switchyard::new(session, Vec::new());
//!
//! let outputs = yard.call(3, &[Array::scalar(2.0)])?;
//! assert_eq!(outputs.len(), 3);
//! assert_eq!(outputs[0].dims(), &[240, 320]);
//! # Ok::<(), onistream::Error>(())
//! ```

use std::{fmt, io::Write};

use crate::{
    host::{self, Array},
    lifecycle::{InitOutcome, Session},
    marshal::{self, FrameRequest},
    report,
    sdk::Sdk,
    sensor::SensorType,
    Error,
};

pub const USAGE: &str = "\
The switchyard takes an integer opid as its first input, selecting the
operation to perform.

Operations:

  call(0)                                    Initialize the device, nothing returned
  call(1)                                    Close the device, nothing returned
  [frame, frame_index, timestamp] = call(2)  Acquire a depth frame
  [frame, frame_index, timestamp] = call(3)  Acquire a color frame
  call(4)                                    Turn depth to color registration off
  call(5)                                    Turn depth to color registration on
  [frame, frame_index, timestamp] = call(6)  Acquire an IR frame
  call(7)                                    List the supported IR video modes

  call(10)                                   Print the current device settings
  call(11)                                   List the supported depth video modes
  call(12)                                   List the supported color video modes
  call(13, <videoModeId>)                    Set the depth video mode
  call(14, <videoModeId>)                    Set the color video mode
  call(15, <videoModeId>)                    Set the IR video mode
";

/// Operation codes accepted by [`Switchyard::call`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Initialize,
    Shutdown,
    AcquireFrame(SensorType),
    Registration(bool),
    ListModes(SensorType),
    PrintSettings,
    SetVideoMode(SensorType),
}

impl Operation {
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => Operation::Initialize,
            1 => Operation::Shutdown,
            2 => Operation::AcquireFrame(SensorType::Depth),
            3 => Operation::AcquireFrame(SensorType::Color),
            4 => Operation::Registration(false),
            5 => Operation::Registration(true),
            6 => Operation::AcquireFrame(SensorType::Infrared),
            7 => Operation::ListModes(SensorType::Infrared),
            10 => Operation::PrintSettings,
            11 => Operation::ListModes(SensorType::Depth),
            12 => Operation::ListModes(SensorType::Color),
            13 => Operation::SetVideoMode(SensorType::Depth),
            14 => Operation::SetVideoMode(SensorType::Color),
            15 => Operation::SetVideoMode(SensorType::Infrared),
            _ => return None,
        })
    }

    pub fn code(self) -> i64 {
        match self {
            Operation::Initialize => 0,
            Operation::Shutdown => 1,
            Operation::AcquireFrame(SensorType::Depth) => 2,
            Operation::AcquireFrame(SensorType::Color) => 3,
            Operation::Registration(false) => 4,
            Operation::Registration(true) => 5,
            Operation::AcquireFrame(SensorType::Infrared) => 6,
            Operation::ListModes(SensorType::Infrared) => 7,
            Operation::PrintSettings => 10,
            Operation::ListModes(SensorType::Depth) => 11,
            Operation::ListModes(SensorType::Color) => 12,
            Operation::SetVideoMode(SensorType::Depth) => 13,
            Operation::SetVideoMode(SensorType::Color) => 14,
            Operation::SetVideoMode(SensorType::Infrared) => 15,
        }
    }

    /// Whether the operation brings the session up before running.
    /// Registration changes count as configuration, like video mode changes.
    /// Diagnostic listings only report on what is already open.
    pub fn auto_initializes(self) -> bool {
        matches!(
            self,
            Operation::AcquireFrame(_) | Operation::Registration(_) | Operation::SetVideoMode(_)
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operation::Initialize => write!(f, "initialize"),
            Operation::Shutdown => write!(f, "shutdown"),
            Operation::AcquireFrame(sensor) => write!(f, "acquire {} frame", sensor),
            Operation::Registration(true) => write!(f, "registration on"),
            Operation::Registration(false) => write!(f, "registration off"),
            Operation::ListModes(sensor) => write!(f, "list {} video modes", sensor),
            Operation::PrintSettings => write!(f, "print device settings"),
            Operation::SetVideoMode(sensor) => write!(f, "set {} video mode", sensor),
        }
    }
}

/// Dispatcher owning the session and the console writer.
pub struct Switchyard<S: Sdk, W: Write> {
    session: Session<S>,
    console: W,
}

impl<S: Sdk, W: Write> Switchyard<S, W> {
    pub fn new(session: Session<S>, console: W) -> Self {
        Switchyard { session, console }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<S> {
        &mut self.session
    }

    pub fn console(&self) -> &W {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut W {
        &mut self.console
    }

    /// Run one operation.
    ///
    /// `outputs` is the number of results the caller asked for; only frame
    /// acquisitions return any. `args[0]` must be a scalar operation code,
    /// and the video mode operations take a scalar index in `args[1]`.
    pub fn call(&mut self, outputs: usize, args: &[Array]) -> Result<Vec<Array>, Error> {
        let Some(first) = args.first() else {
            write!(self.console, "\n{}\n", USAGE)?;
            return Err(Error::InvalidArgument(
                "At least one input required opid".to_owned(),
            ));
        };

        let code = host::scalar_index(first, "First argument, opid, should be a scalar index")?;
        let Some(op) = Operation::from_code(code) else {
            writeln!(self.console, "Invalid opid {}", code)?;
            write!(self.console, "\n{}\n", USAGE)?;
            return Ok(Vec::new());
        };
        log::debug!("opid {}: {}", code, op);

        // Arguments are checked before the device is touched.
        let request = match op {
            Operation::AcquireFrame(_) => FrameRequest::from_output_count(outputs)?,
            _ => FrameRequest::default(),
        };
        let mode_index = match op {
            Operation::SetVideoMode(_) => {
                let Some(arg) = args.get(1) else {
                    return Err(Error::InvalidArgument(
                        "At least two inputs required opid and videoModeId".to_owned(),
                    ));
                };
                host::scalar_index(arg, "Second argument, videoModeId, should be a scalar index")?
            }
            _ => 0,
        };

        if op.auto_initializes() {
            self.session.initialize()?;
        }

        match op {
            Operation::Initialize => {
                let message = match self.session.initialize()? {
                    InitOutcome::Initialized => "Initialized",
                    InitOutcome::AlreadyInitialized => "Already Initialized",
                };
                writeln!(self.console, "{}", message)?;
            }
            Operation::Shutdown => {
                writeln!(self.console, "Closing the NI device")?;
                self.session.shutdown();
            }
            Operation::AcquireFrame(sensor) => {
                let acquired = marshal::acquire(&mut self.session, sensor, request)?;

                let mut results = Vec::with_capacity(outputs);
                if let Some(data) = acquired.data {
                    results.push(Array::from(data));
                }
                if let Some(index) = acquired.frame_index {
                    results.push(Array::uint64(index));
                }
                if let Some(timestamp) = acquired.timestamp {
                    results.push(Array::uint64(timestamp));
                }
                return Ok(results);
            }
            Operation::Registration(enabled) => self.session.set_registration(enabled)?,
            Operation::ListModes(sensor) => self.print_modes(sensor)?,
            Operation::PrintSettings => self.print_settings()?,
            Operation::SetVideoMode(sensor) => {
                self.session.set_video_mode(sensor, mode_index)?;
            }
        }

        Ok(Vec::new())
    }

    fn print_modes(&mut self, sensor: SensorType) -> Result<(), Error> {
        report::write_modes_heading(&mut self.console, sensor)?;
        match self.session.video_modes(sensor) {
            Ok(modes) => report::write_video_modes(&mut self.console, &modes)?,
            Err(err) => self.print_failure(&err)?,
        }
        Ok(())
    }

    fn print_settings(&mut self) -> Result<(), Error> {
        let device = self
            .session
            .device_info()
            .and_then(|info| Ok((info, self.session.registration_mode()?)));
        match device {
            Ok((info, registration)) => {
                report::write_device(&mut self.console, &info, registration)?
            }
            Err(err) => self.print_failure(&err)?,
        }

        for sensor in SensorType::ALL {
            report::write_sensor_heading(&mut self.console, sensor)?;
            match self.session.stream_info(sensor) {
                Ok(info) => report::write_stream_info(&mut self.console, &info)?,
                Err(err) => self.print_failure(&err)?,
            }
        }
        Ok(())
    }

    fn print_failure(&mut self, err: &Error) -> Result<(), Error> {
        log::warn!("{}", err);
        writeln!(self.console, "{}", err)?;
        Ok(())
    }
}

impl<S: Sdk, W: Write> fmt::Debug for Switchyard<S, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Switchyard")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
