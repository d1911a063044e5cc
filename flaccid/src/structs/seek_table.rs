//! SEEKTABLE block: a list of 18-byte seek points.

use std::io::{Read, Seek};

use anyhow::{Result, bail};
use log::{trace, warn};

use crate::process::parse::ParserState;
use crate::utils::bitstream_io::BitstreamIoReader;
use crate::utils::errors::StructuralError;

/// Size of one seek point record in bytes.
pub const SEEK_POINT_SIZE: u32 = 18;

/// Sample number marking a placeholder seek point.
pub const PLACEHOLDER_SAMPLE_NUMBER: u64 = u64::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekPoint {
    /// Sample number of the first sample in the target frame.
    pub sample_number: u64,
    /// Byte offset of the target frame from the first frame header.
    pub byte_offset: u64,
    /// Number of samples in the target frame.
    pub frame_samples: u16,
}

impl SeekPoint {
    pub fn read<R: Read + Seek>(reader: &mut BitstreamIoReader<R>) -> Result<Self> {
        Ok(Self {
            sample_number: reader.get_n(64)?,
            byte_offset: reader.get_n(64)?,
            frame_samples: reader.get_n(16)?,
        })
    }

    pub fn is_placeholder(&self) -> bool {
        self.sample_number == PLACEHOLDER_SAMPLE_NUMBER
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeekTable {
    pub points: Vec<SeekPoint>,
}

impl SeekTable {
    pub fn read<R: Read + Seek>(
        state: &ParserState,
        length: u32,
        reader: &mut BitstreamIoReader<R>,
    ) -> Result<Self> {
        if length % SEEK_POINT_SIZE != 0 {
            if !state.policy.tolerates_malformed_length() {
                bail!(StructuralError::SeekTableLength(length));
            }
            warn!(
                "SEEKTABLE length {length} is not a multiple of {SEEK_POINT_SIZE}, ignoring {} trailing bytes",
                length % SEEK_POINT_SIZE
            );
        }

        let count = length / SEEK_POINT_SIZE;
        let points = (0..count)
            .map(|_| SeekPoint::read(reader))
            .collect::<Result<Vec<_>>>()?;

        trace!("SEEKTABLE: {} seek points", points.len());

        Ok(Self { points })
    }
}
