use crate::structs::block::BlockType;

#[macro_export]
macro_rules! log_or_err {
    ($state:expr, $level:expr, $err:expr $(,)?) => {{
        if $level <= $state.fail_level {
            return Err($err);
        } else {
            match $level {
                ::log::Level::Error => ::log::error!("{}", $err),
                ::log::Level::Warn => ::log::warn!("{}", $err),
                ::log::Level::Info => ::log::info!("{}", $err),
                ::log::Level::Debug => ::log::debug!("{}", $err),
                ::log::Level::Trace => ::log::trace!("{}", $err),
            }
        }
    }};
}

/// The byte layout does not match the container format.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("Invalid stream signature. Read {0:02X?}, expected \"fLaC\"")]
    InvalidSignature([u8; 4]),

    #[error("Invalid frame sync code. Read {0:#06X}, expected 0x3FFE")]
    InvalidFrameSync(u16),

    #[error("Reserved bit {index} in frame header should be 0")]
    ReservedBitSet { index: u8 },

    #[error("SEEKTABLE length must be a multiple of 18. Read {0}")]
    SeekTableLength(u32),

    /// `position` is the bit offset at which the source ran out.
    #[error("Truncated stream: {bits} bits needed, source ended at bit {position}")]
    Truncated { bits: u64, position: u64 },

    #[error(
        "{block_type} payload length mismatch: header declares {declared} bytes, decoder consumed {consumed}"
    )]
    PayloadLengthMismatch {
        block_type: BlockType,
        declared: u32,
        consumed: u64,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum EncodingError {
    #[error("Invalid UTF-8 in VORBIS_COMMENT {field}: {source}")]
    InvalidUtf8 {
        field: &'static str,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UnsupportedBlockError {
    #[error("No payload decoder for {block_type} block ({length} bytes)")]
    NoPayloadDecoder {
        block_type: BlockType,
        length: u32,
        is_last: bool,
    },
}
