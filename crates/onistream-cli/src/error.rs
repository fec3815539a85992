// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use std::fmt;
use std::io;
use std::process::ExitCode;

/// CLI-specific error type with exit code mapping
#[derive(Debug)]
pub enum CliError {
    /// Invalid command-line arguments
    InvalidArgs(String),
    /// Device missing, busy, or a stream failed to start
    DeviceUnavailable(String),
    /// OpenNI 2 runtime could not be loaded or is already in use
    LibraryUnavailable(String),
    /// Frame pixel format cannot be converted
    UnsupportedFormat(String),
    /// No frame within the acquisition timeout
    Timeout(String),
    /// General error from OniStream library
    General(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InvalidArgs(msg) => write!(f, "Invalid arguments: {}", msg),
            CliError::DeviceUnavailable(msg) => write!(f, "Device unavailable: {}", msg),
            CliError::LibraryUnavailable(msg) => write!(f, "Library unavailable: {}", msg),
            CliError::UnsupportedFormat(msg) => write!(f, "Unsupported format: {}", msg),
            CliError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            CliError::General(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }

    fn code(&self) -> u8 {
        match self {
            CliError::InvalidArgs(_) => 2,
            CliError::DeviceUnavailable(_) => 3,
            CliError::LibraryUnavailable(_) => 4,
            CliError::UnsupportedFormat(_) => 5,
            CliError::Timeout(_) => 6,
            CliError::General(_) => 1,
        }
    }
}

/// Map onistream::Error to CliError with appropriate exit codes
impl From<onistream::Error> for CliError {
    fn from(err: onistream::Error) -> Self {
        use onistream::{Error, ErrorKind};

        let msg = err.to_string();
        if let Error::Timeout { .. } = err {
            return CliError::Timeout(msg);
        }

        match err.kind() {
            ErrorKind::Argument => CliError::InvalidArgs(msg),
            ErrorKind::Lifecycle => CliError::DeviceUnavailable(msg),
            ErrorKind::Library => CliError::LibraryUnavailable(msg),
            ErrorKind::UnsupportedFormat => CliError::UnsupportedFormat(msg),
            ErrorKind::Acquisition
            | ErrorKind::Reconfiguration
            | ErrorKind::Query
            | ErrorKind::Io => CliError::General(msg),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::General(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::General(format!("JSON error: {}", err))
    }
}

/// Helper function to convert result to exit code
pub fn result_to_exit_code<T>(result: Result<T, CliError>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            e.exit_code()
        }
    }
}
