// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(clippy::type_complexity)]
#![allow(clippy::missing_safety_doc)]
#![allow(clippy::too_many_arguments)]

include!("ffi.rs");

// Re-export libloading for error handling
pub use libloading;

use std::sync::{Mutex, OnceLock};

static LIBRARY: OnceLock<OpenNI2Library> = OnceLock::new();
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// Default shared object name searched on the loader path.
pub const DEFAULT_LIBRARY: &str = "libOpenNI2.so";

/// Load the OpenNI 2 runtime library.
///
/// This must be called before using any other OpenNI 2 function. Returns an
/// error if the library or one of its required symbols cannot be loaded.
///
/// The environment variable `OPENNI2_LIBRARY` can be used to specify a custom
/// path to the library (for example the `Redist/libOpenNI2.so` shipped with
/// the vendor SDK). If not set, searches standard system paths.
pub fn init() -> Result<&'static OpenNI2Library, libloading::Error> {
    if let Some(lib) = LIBRARY.get() {
        return Ok(lib);
    }

    let _guard = INIT_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    // Double-check after acquiring lock
    if let Some(lib) = LIBRARY.get() {
        return Ok(lib);
    }

    let lib_path = std::env::var("OPENNI2_LIBRARY")
        .ok()
        .unwrap_or_else(|| DEFAULT_LIBRARY.to_string());

    let lib = unsafe { OpenNI2Library::new(lib_path.as_str())? };

    Ok(LIBRARY.get_or_init(|| lib))
}
