// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

// libOpenNI2 is loaded at runtime through libloading, so there is nothing to
// link here. Rebuild only when the library override changes so that
// downstream build scripts observing it stay consistent.

fn main() {
    println!("cargo:rerun-if-env-changed=OPENNI2_LIBRARY");
    println!("cargo:rerun-if-changed=src/ffi.rs");
}
