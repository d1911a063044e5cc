//! Metadata block headers and payload dispatch.
//!
//! Every block starts with a 4-byte header:
//!
//! | Bits | Field |
//! |-----:|-------|
//! | 1    | last block before audio frames |
//! | 7    | block type code |
//! | 24   | payload length in bytes |
//!
//! The payload decoder is chosen from the type code. Only STREAMINFO,
//! PADDING, SEEKTABLE and VORBIS_COMMENT have decoders; other types are
//! reported as [`UnsupportedBlockError`] before any payload byte is read.

use std::fmt::{Display, Formatter};
use std::io::{Read, Seek};

use anyhow::{Result, anyhow, bail};
use log::Level::Warn;
use log::{debug, trace};

use crate::log_or_err;
use crate::process::parse::ParserState;
use crate::structs::seek_table::SeekTable;
use crate::structs::stream_info::StreamInfo;
use crate::structs::vorbis_comment::VorbisComment;
use crate::utils::bitstream_io::BitstreamIoReader;
use crate::utils::errors::{StructuralError, UnsupportedBlockError};

/// Size of a metadata block header in bytes.
pub const BLOCK_HEADER_SIZE: u64 = 4;

/// Largest payload length a block header can declare.
pub const MAX_BLOCK_LENGTH: u32 = (1 << 24) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    StreamInfo,
    Padding,
    Application,
    SeekTable,
    VorbisComment,
    CueSheet,
    Picture,
    /// Codes 7 through 126.
    Reserved(u8),
    /// Code 127, and anything that does not fit in 7 bits.
    Invalid,
}

impl BlockType {
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => Self::StreamInfo,
            1 => Self::Padding,
            2 => Self::Application,
            3 => Self::SeekTable,
            4 => Self::VorbisComment,
            5 => Self::CueSheet,
            6 => Self::Picture,
            7..=126 => Self::Reserved(code),
            _ => Self::Invalid,
        }
    }

    pub const fn code(self) -> u8 {
        match self {
            Self::StreamInfo => 0,
            Self::Padding => 1,
            Self::Application => 2,
            Self::SeekTable => 3,
            Self::VorbisComment => 4,
            Self::CueSheet => 5,
            Self::Picture => 6,
            Self::Reserved(code) => code,
            Self::Invalid => 127,
        }
    }

    /// Whether a payload decoder exists for this type.
    pub const fn is_supported(self) -> bool {
        matches!(
            self,
            Self::StreamInfo | Self::Padding | Self::SeekTable | Self::VorbisComment
        )
    }
}

impl Display for BlockType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StreamInfo => write!(f, "STREAMINFO"),
            Self::Padding => write!(f, "PADDING"),
            Self::Application => write!(f, "APPLICATION"),
            Self::SeekTable => write!(f, "SEEKTABLE"),
            Self::VorbisComment => write!(f, "VORBIS_COMMENT"),
            Self::CueSheet => write!(f, "CUESHEET"),
            Self::Picture => write!(f, "PICTURE"),
            Self::Reserved(code) => write!(f, "RESERVED({code})"),
            Self::Invalid => write!(f, "INVALID"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub is_last: bool,
    pub block_type: BlockType,
    /// Exact payload byte count following the header.
    pub length: u32,
}

impl BlockHeader {
    pub fn read<R: Read + Seek>(reader: &mut BitstreamIoReader<R>) -> Result<Self> {
        let header = Self {
            is_last: reader.get()?,
            block_type: BlockType::from_code(reader.get_n(7)?),
            length: reader.get_n(24)?,
        };

        trace!(
            "Block header: type = {}, length = {}, last = {}",
            header.block_type, header.length, header.is_last
        );

        Ok(header)
    }
}

/// PADDING keeps only its length; the payload bytes are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding {
    pub length: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockPayload {
    StreamInfo(StreamInfo),
    Padding(Padding),
    SeekTable(SeekTable),
    VorbisComment(VorbisComment),
    /// Undecoded payload of a type without a decoder.
    Unknown(Vec<u8>),
}

impl BlockPayload {
    /// Decodes the payload described by `header`.
    ///
    /// Fails with [`UnsupportedBlockError`] without consuming any input when
    /// the block type has no decoder.
    pub fn read<R: Read + Seek>(
        state: &ParserState,
        header: &BlockHeader,
        reader: &mut BitstreamIoReader<R>,
    ) -> Result<Self> {
        let payload = match header.block_type {
            BlockType::StreamInfo => Self::StreamInfo(StreamInfo::read(reader)?),
            BlockType::SeekTable => Self::SeekTable(SeekTable::read(state, header.length, reader)?),
            BlockType::VorbisComment => Self::VorbisComment(VorbisComment::read(reader)?),
            BlockType::Padding => {
                reader.skip_bytes(header.length as u64)?;
                Self::Padding(Padding {
                    length: header.length,
                })
            }
            block_type => bail!(UnsupportedBlockError::NoPayloadDecoder {
                block_type,
                length: header.length,
                is_last: header.is_last,
            }),
        };

        Ok(payload)
    }

    pub fn block_type(&self) -> Option<BlockType> {
        match self {
            Self::StreamInfo(_) => Some(BlockType::StreamInfo),
            Self::Padding(_) => Some(BlockType::Padding),
            Self::SeekTable(_) => Some(BlockType::SeekTable),
            Self::VorbisComment(_) => Some(BlockType::VorbisComment),
            Self::Unknown(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetadataBlock {
    pub header: BlockHeader,
    pub payload: BlockPayload,
}

impl MetadataBlock {
    /// Reads one header and its payload, leaving the cursor exactly
    /// `header.length` bytes after the header whatever the decoder consumed.
    ///
    /// An unsupported block type is skipped over before its
    /// [`UnsupportedBlockError`] is returned, unless the policy retains
    /// unknown payloads as raw bytes.
    pub fn read<R: Read + Seek>(
        state: &ParserState,
        reader: &mut BitstreamIoReader<R>,
    ) -> Result<Self> {
        let header_start = reader.byte_position()?;
        let header = BlockHeader::read(reader)?;
        let payload_start = header_start + BLOCK_HEADER_SIZE;
        let block_end = payload_start + header.length as u64;

        debug!(
            "Parsing {} metadata block ({} bytes)",
            header.block_type, header.length
        );
        if header.is_last {
            debug!("This is the last metadata block before audio frames");
        }

        let payload = match BlockPayload::read(state, &header, reader) {
            Ok(payload) => payload,
            Err(e) if e.is::<UnsupportedBlockError>() => {
                if !state.policy.retains_unknown() {
                    reader.resync_to(block_end)?;
                    return Err(e);
                }
                debug!("Retaining {} undecoded bytes of {}", header.length, header.block_type);
                BlockPayload::Unknown(reader.get_bytes(header.length as usize)?)
            }
            Err(e) => return Err(e),
        };

        let consumed = reader.byte_position()?.saturating_sub(payload_start);
        if consumed != header.length as u64 {
            log_or_err!(
                state,
                Warn,
                anyhow!(StructuralError::PayloadLengthMismatch {
                    block_type: header.block_type,
                    declared: header.length,
                    consumed,
                })
            );
        }

        reader.resync_to(block_end)?;

        Ok(Self { header, payload })
    }
}
