//! Utility functions and supporting infrastructure.
//!
//! Provides bitstream I/O and the error types raised while parsing.

pub mod bitstream_io;
pub mod errors;
