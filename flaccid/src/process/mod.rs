/// Container parsing.
///
/// Provides the [`Parser`](parse::Parser) that validates the stream signature,
/// decodes the metadata block sequence, and checks the first frame header.
pub mod parse;

/// A small complete stream: signature, STREAMINFO, SEEKTABLE with two points,
/// VORBIS_COMMENT with two comments, 8 bytes of PADDING (last block), and the
/// start of the first frame.
pub const EXAMPLE_DATA: &[u8] = b"fLaC\
    \x00\x00\x00\x22\
    \x10\x00\x10\x00\x00\x00\x0E\x00\x30\x39\
    \x0A\xC4\x42\xF0\x00\x06\xBA\xA8\
    \x00\x01\x02\x03\x04\x05\x06\x07\x08\x09\x0A\x0B\x0C\x0D\x0E\x0F\
    \x03\x00\x00\x24\
    \x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x10\x00\
    \x00\x00\x00\x00\x00\x06\x40\x00\x00\x00\x00\x00\x00\x00\x1F\x40\x10\x00\
    \x04\x00\x00\x5E\
    \x20\x00\x00\x00reference libFLAC 1.4.3 20230623\
    \x02\x00\x00\x00\
    \x0F\x00\x00\x00TITLE=Bombtrack\
    \x1F\x00\x00\x00ARTIST=Rage Against the Machine\
    \x81\x00\x00\x08\
    \x00\x00\x00\x00\x00\x00\x00\x00\
    \xFF\xF8\x69\x18\x00\xC2";

/// Reaction of the parser to block types without a decoder and to payloads
/// whose decoded size disagrees with their header.
///
/// Whatever the policy, the cursor is always moved to the end of the block
/// declared by its header before the next block is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParsePolicy {
    /// Any anomaly aborts the parse, including an unsupported block type and
    /// a payload that does not fill its declared length exactly.
    Strict,

    /// An unsupported block type ends the decoded block sequence. The rest of
    /// the metadata section is skipped without decoding, then the frame
    /// header is checked. Length mismatches are logged and resynchronized.
    #[default]
    StopAtUnsupported,

    /// Unsupported block types are kept as [`BlockPayload::Unknown`] raw
    /// bytes and parsing continues.
    ///
    /// [`BlockPayload::Unknown`]: crate::structs::block::BlockPayload::Unknown
    SkipUnknownRetainRaw,

    /// Like [`ParsePolicy::SkipUnknownRetainRaw`], and a SEEKTABLE whose length
    /// is not a multiple of 18 yields its whole records instead of an error.
    SkipMalformedLength,
}

impl ParsePolicy {
    /// Log level at or below which anomalies become errors.
    pub fn fail_level(self) -> log::Level {
        match self {
            Self::Strict => log::Level::Warn,
            _ => log::Level::Error,
        }
    }

    pub fn retains_unknown(self) -> bool {
        matches!(self, Self::SkipUnknownRetainRaw | Self::SkipMalformedLength)
    }

    pub fn tolerates_malformed_length(self) -> bool {
        matches!(self, Self::SkipMalformedLength)
    }
}
