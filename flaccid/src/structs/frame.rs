//! Audio frame header prefix.
//!
//! Only the fixed 4-byte prefix of the first frame is read, as a structural
//! check that the metadata section ended where the block headers said it did.
//! The coded fields are kept raw; mapping them to sample rates, block sizes or
//! channel layouts is left to a decoder.
//!
//! | Bits | Field |
//! |-----:|-------|
//! | 14   | sync code `0b11111111111110` |
//! | 1    | reserved, 0 |
//! | 1    | blocking strategy (0 fixed, 1 variable) |
//! | 4    | block size code |
//! | 4    | sample rate code |
//! | 4    | channel assignment code |
//! | 3    | sample size code |
//! | 1    | reserved, 0 |

use std::io::{Read, Seek};

use anyhow::{Result, bail};
use log::trace;

use crate::utils::bitstream_io::BitstreamIoReader;
use crate::utils::errors::StructuralError;

/// 14-bit frame sync code.
pub const FRAME_SYNC_CODE: u16 = 0b11_1111_1111_1110;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeaderRaw {
    pub sync_code: u16,
    pub reserved1: bool,
    pub blocking_strategy: bool,
    pub block_size: u8,
    pub sample_rate: u8,
    pub channel: u8,
    pub sample_size: u8,
    pub reserved2: bool,
}

impl FrameHeaderRaw {
    /// Reads and validates the 4-byte prefix.
    pub fn read<R: Read + Seek>(reader: &mut BitstreamIoReader<R>) -> Result<Self> {
        let fh = Self {
            sync_code: reader.get_n(14)?,
            reserved1: reader.get()?,
            blocking_strategy: reader.get()?,
            block_size: reader.get_n(4)?,
            sample_rate: reader.get_n(4)?,
            channel: reader.get_n(4)?,
            sample_size: reader.get_n(3)?,
            reserved2: reader.get()?,
        };

        fh.validate()?;

        trace!(
            "Frame header: blocking strategy {}, block size {}, sample rate {}, channel {}, sample size {}",
            fh.blocking_strategy as u8, fh.block_size, fh.sample_rate, fh.channel, fh.sample_size
        );

        Ok(fh)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sync_code != FRAME_SYNC_CODE {
            bail!(StructuralError::InvalidFrameSync(self.sync_code));
        }

        if self.reserved1 {
            bail!(StructuralError::ReservedBitSet { index: 1 });
        }

        if self.reserved2 {
            bail!(StructuralError::ReservedBitSet { index: 2 });
        }

        Ok(())
    }

    /// Whether frames carry a sample number instead of a frame number.
    pub fn is_variable_blocksize(&self) -> bool {
        self.blocking_strategy
    }
}
