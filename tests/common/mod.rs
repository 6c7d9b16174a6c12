//! Shared test utilities for swfrust integration tests.
//!
//! Builders for synthetic SWF byte streams live in [`builders`]; structural
//! assertions over loaded documents live in [`comparison`]. Test crates
//! import this module via `mod common;`.

#![allow(dead_code)]

pub mod builders;
pub mod comparison;

use swfrust::{SwfDocument, SwfReader, SwfReaderConfiguration};

/// Configuration with layer building enabled.
pub fn with_layers() -> SwfReaderConfiguration {
    SwfReaderConfiguration {
        build_layers: true,
        ..Default::default()
    }
}

/// Configuration with the raw-tag fallback enabled.
pub fn failsafe() -> SwfReaderConfiguration {
    SwfReaderConfiguration {
        failsafe: true,
        ..Default::default()
    }
}

/// Load `bytes` with `config`, panicking with the error on failure.
pub fn load_with(bytes: &[u8], config: SwfReaderConfiguration) -> SwfDocument {
    match SwfReader::from_bytes(bytes).with_config(config).read() {
        Ok(doc) => doc,
        Err(e) => panic!("failed to load synthetic SWF: {e}"),
    }
}

/// Load with the default configuration.
pub fn load(bytes: &[u8]) -> SwfDocument {
    load_with(bytes, SwfReaderConfiguration::default())
}
