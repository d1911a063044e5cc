//! Parser for the container structure of FLAC streams.
//!
//! ## Technical Overview
//!
//! A FLAC stream is a 4-byte `fLaC` signature, a sequence of metadata blocks,
//! and the compressed audio frames. This crate decodes the signature and the
//! metadata blocks, then validates the fixed prefix of the first frame header
//! and stops. Audio samples are never decoded and checksums are never verified.
//!
//! ### Byte Order
//!
//! Block headers, STREAMINFO, SEEKTABLE and frame headers are big-endian and
//! bit-packed. VORBIS_COMMENT lengths are little-endian 32-bit integers.
//!
//! ### Block Types
//!
//! | Code | Block | Decoded as |
//! |-----:|-------|------------|
//! | 0 | STREAMINFO | [`structs::stream_info::StreamInfo`] |
//! | 1 | PADDING | [`structs::block::Padding`] (length only) |
//! | 3 | SEEKTABLE | [`structs::seek_table::SeekTable`] |
//! | 4 | VORBIS_COMMENT | [`structs::vorbis_comment::VorbisComment`] |
//! | other | APPLICATION, CUESHEET, PICTURE, reserved | see [`process::ParsePolicy`] |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! use flaccid::process::{ParsePolicy, parse::Parser};
//!
//! let file = BufReader::new(File::open("track.flac")?);
//! let container = Parser::with_policy(ParsePolicy::SkipUnknownRetainRaw).parse(file)?;
//!
//! if let Some(stream_info) = container.stream_info() {
//!     println!("{} Hz, {} channels", stream_info.sample_rate, stream_info.channels());
//! }
//!
//! for block in container.blocks() {
//!     println!("{} ({} bytes)", block.header.block_type, block.header.length);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

#[cfg(test)]
mod byteorder;

/// Container parsing.
///
/// - **Parser** ([`process::parse::Parser`]): signature check, block loop,
///   frame header validation
/// - **Policy** ([`process::ParsePolicy`]): reaction to unsupported or
///   malformed blocks
pub mod process;

/// Data structures representing container components.
///
/// - **Blocks** ([`structs::block`]): headers, type codes, payload dispatch
/// - **Stream parameters** ([`structs::stream_info`])
/// - **Seek index** ([`structs::seek_table`])
/// - **Tags** ([`structs::vorbis_comment`])
/// - **Frame header** ([`structs::frame`])
/// - **Container** ([`structs::container`])
pub mod structs;

/// Utility functions and supporting infrastructure.
///
/// - **Bitstream I/O** ([`utils::bitstream_io`]): declared-order field reads
/// - **Error Handling** ([`utils::errors`]): error types
pub mod utils;
