//! STREAMINFO block.
//!
//! Global stream parameters, 34 bytes, big-endian bit-packed:
//!
//! | Bits | Field |
//! |-----:|-------|
//! | 16   | minimum block size (samples) |
//! | 16   | maximum block size (samples) |
//! | 24   | minimum frame size (bytes) |
//! | 24   | maximum frame size (bytes) |
//! | 20   | sample rate (Hz) |
//! | 3    | channel count code |
//! | 5    | bits per sample code |
//! | 36   | total samples |
//! | 128  | MD5 fingerprint of the decoded audio |

use std::io::{Read, Seek};

use anyhow::Result;
use log::trace;

use crate::utils::bitstream_io::BitstreamIoReader;

/// STREAMINFO payload size in bytes.
pub const STREAM_INFO_SIZE: u32 = 34;

/// Stream parameters as stored.
///
/// `channels_code` and `bits_per_sample_code` hold the raw stored codes,
/// which are one less than the real values. Use [`StreamInfo::channels`] and
/// [`StreamInfo::bits_per_sample`] for the actual counts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamInfo {
    pub min_block_size: u16,
    pub max_block_size: u16,
    /// 0 when unknown.
    pub min_frame_size: u32,
    /// 0 when unknown.
    pub max_frame_size: u32,
    pub sample_rate: u32,
    pub channels_code: u8,
    pub bits_per_sample_code: u8,
    /// 0 when unknown.
    pub total_samples: u64,
    pub md5: [u8; 16],
}

impl StreamInfo {
    pub fn read<R: Read + Seek>(reader: &mut BitstreamIoReader<R>) -> Result<Self> {
        let si = Self {
            min_block_size: reader.get_n(16)?,
            max_block_size: reader.get_n(16)?,
            min_frame_size: reader.get_n(24)?,
            max_frame_size: reader.get_n(24)?,
            sample_rate: reader.get_n(20)?,
            channels_code: reader.get_n(3)?,
            bits_per_sample_code: reader.get_n(5)?,
            total_samples: reader.get_n(36)?,
            md5: reader.get_array()?,
        };

        trace!(
            "STREAMINFO: block size {}..{}, frame size {}..{}, {} Hz, {} ch, {} bits, {} samples",
            si.min_block_size,
            si.max_block_size,
            si.min_frame_size,
            si.max_frame_size,
            si.sample_rate,
            si.channels(),
            si.bits_per_sample(),
            si.total_samples
        );

        Ok(si)
    }

    /// Channel count (1-8).
    pub fn channels(&self) -> u8 {
        self.channels_code + 1
    }

    /// Bits per sample (1-32).
    pub fn bits_per_sample(&self) -> u8 {
        self.bits_per_sample_code + 1
    }

    /// Stream duration in seconds, if both the sample count and the sample
    /// rate are known.
    pub fn duration_secs(&self) -> Option<f64> {
        if self.total_samples == 0 || self.sample_rate == 0 {
            return None;
        }

        Some(self.total_samples as f64 / self.sample_rate as f64)
    }

    /// The MD5 fingerprint as lowercase hex; all zeros means "not computed".
    pub fn md5_hex(&self) -> String {
        self.md5.iter().map(|b| format!("{b:02x}")).collect()
    }
}
