use std::io::{self, Read, Seek};

use anyhow::{Result, bail};
use log::{debug, info};

use crate::process::ParsePolicy;
use crate::structs::block::{BlockHeader, MetadataBlock};
use crate::structs::container::Container;
use crate::structs::frame::FrameHeaderRaw;
use crate::utils::bitstream_io::BitstreamIoReader;
use crate::utils::errors::{StructuralError, UnsupportedBlockError};

/// Stream signature.
pub const FLAC_SIGNATURE: [u8; 4] = *b"fLaC";

/// Parses a byte source into a [`Container`].
///
/// A parser holds only its configuration, so one instance can parse any
/// number of independent sources.
///
/// # Example
///
/// ```rust
/// use flaccid::process::{EXAMPLE_DATA, parse::Parser};
///
/// let container = Parser::default().parse_slice(EXAMPLE_DATA)?;
///
/// let stream_info = container.stream_info().unwrap();
/// assert_eq!(stream_info.sample_rate, 44100);
/// assert_eq!(stream_info.channels(), 2);
///
/// let tags = container.vorbis_comment().unwrap();
/// assert_eq!(tags.get("title"), Some("Bombtrack"));
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parser {
    state: ParserState,
}

impl Parser {
    pub fn with_policy(policy: ParsePolicy) -> Self {
        Self {
            state: ParserState::with_policy(policy),
        }
    }

    pub fn policy(&self) -> ParsePolicy {
        self.state.policy
    }

    pub fn set_policy(&mut self, policy: ParsePolicy) {
        self.state = ParserState::with_policy(policy);
    }

    /// Parses `source` from its current position in one forward pass.
    ///
    /// Reads the signature, the metadata blocks, and the first 4 bytes of
    /// the frame stream. Audio data after that is left unread.
    pub fn parse<R: Read + Seek>(&self, source: R) -> Result<Container> {
        let reader = &mut BitstreamIoReader::new(source);
        self.parse_reader(reader)
    }

    pub fn parse_slice(&self, data: &[u8]) -> Result<Container> {
        self.parse(io::Cursor::new(data))
    }

    pub fn parse_reader<R: Read + Seek>(
        &self,
        reader: &mut BitstreamIoReader<R>,
    ) -> Result<Container> {
        validate_magic(reader)?;

        let blocks = self.read_blocks(reader)?;
        debug!("Finished parsing {} metadata blocks", blocks.len());

        let frame_header = FrameHeaderRaw::read(reader)?;

        Ok(Container::new(blocks, frame_header))
    }

    fn read_blocks<R: Read + Seek>(
        &self,
        reader: &mut BitstreamIoReader<R>,
    ) -> Result<Vec<MetadataBlock>> {
        let mut blocks = Vec::new();

        loop {
            let block = match MetadataBlock::read(&self.state, reader) {
                Ok(block) => block,
                Err(e) => {
                    let unsupported = e.downcast_ref::<UnsupportedBlockError>().cloned();
                    let Some(UnsupportedBlockError::NoPayloadDecoder { is_last, .. }) = unsupported
                    else {
                        return Err(e);
                    };

                    if self.state.policy == ParsePolicy::Strict {
                        return Err(e);
                    }

                    info!("{e}; stopping at this block");
                    if !is_last {
                        skip_remaining_blocks(reader)?;
                    }
                    break;
                }
            };

            let is_last = block.header.is_last;
            blocks.push(block);

            if is_last {
                break;
            }
        }

        Ok(blocks)
    }
}

/// Reads the 4-byte signature and fails unless it is exactly `fLaC`.
pub fn validate_magic<R: Read + Seek>(reader: &mut BitstreamIoReader<R>) -> Result<()> {
    let magic: [u8; 4] = reader.get_array()?;

    if magic != FLAC_SIGNATURE {
        bail!(StructuralError::InvalidSignature(magic));
    }

    debug!("FLAC signature verified");

    Ok(())
}

/// Walks block headers up to the last one without decoding any payload.
fn skip_remaining_blocks<R: Read + Seek>(reader: &mut BitstreamIoReader<R>) -> Result<()> {
    loop {
        let header = BlockHeader::read(reader)?;
        debug!(
            "Skipping {} metadata block ({} bytes)",
            header.block_type, header.length
        );
        reader.skip_bytes(header.length as u64)?;

        if header.is_last {
            return Ok(());
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParserState {
    pub policy: ParsePolicy,
    pub fail_level: log::Level,
}

impl ParserState {
    pub fn with_policy(policy: ParsePolicy) -> Self {
        Self {
            policy,
            fail_level: policy.fail_level(),
        }
    }
}

impl Default for ParserState {
    fn default() -> Self {
        Self::with_policy(ParsePolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::byteorder::{
        U24, WriteBytesBe, WriteBytesLe, block_bytes, join_bytes_be, join_bytes_le,
    };
    use crate::process::EXAMPLE_DATA;
    use crate::structs::block::{BlockPayload, BlockType, Padding};
    use crate::structs::seek_table::SeekPoint;
    use crate::utils::errors::EncodingError;

    const FRAME: [u8; 4] = [0xFF, 0xF8, 0x69, 0x18];

    fn stream_info_payload() -> Vec<u8> {
        EXAMPLE_DATA[8..42].to_vec()
    }

    fn stream(blocks: &[Vec<u8>]) -> Vec<u8> {
        let mut data = FLAC_SIGNATURE.to_vec();
        blocks.iter().for_each(|b| data.extend_from_slice(b));
        data.extend_from_slice(&FRAME);
        data
    }

    #[test]
    fn example_stream() -> Result<()> {
        let container = Parser::default().parse_slice(EXAMPLE_DATA)?;

        let types: Vec<_> = container
            .blocks()
            .iter()
            .map(|b| b.header.block_type)
            .collect();
        assert_eq!(
            types,
            [
                BlockType::StreamInfo,
                BlockType::SeekTable,
                BlockType::VorbisComment,
                BlockType::Padding,
            ]
        );

        let si = container.stream_info().unwrap();
        assert_eq!(si.min_block_size, 4096);
        assert_eq!(si.max_block_size, 4096);
        assert_eq!(si.min_frame_size, 14);
        assert_eq!(si.max_frame_size, 12345);
        assert_eq!(si.sample_rate, 44100);
        assert_eq!(si.channels_code, 1);
        assert_eq!(si.bits_per_sample_code, 15);
        assert_eq!(si.bits_per_sample(), 16);
        assert_eq!(si.total_samples, 441_000);
        assert_eq!(si.md5_hex(), "000102030405060708090a0b0c0d0e0f");
        assert_eq!(si.duration_secs(), Some(10.0));

        let st = container.seek_table().unwrap();
        assert_eq!(
            st.points,
            [
                SeekPoint {
                    sample_number: 0,
                    byte_offset: 0,
                    frame_samples: 4096,
                },
                SeekPoint {
                    sample_number: 409_600,
                    byte_offset: 8000,
                    frame_samples: 4096,
                },
            ]
        );

        let vc = container.vorbis_comment().unwrap();
        assert_eq!(vc.vendor, "reference libFLAC 1.4.3 20230623");
        assert_eq!(
            vc.comments,
            ["TITLE=Bombtrack", "ARTIST=Rage Against the Machine"]
        );

        assert_eq!(
            container.blocks()[3].payload,
            BlockPayload::Padding(Padding { length: 8 })
        );

        let fh = container.frame_header();
        assert_eq!(fh.sample_rate, 9);
        assert_eq!(fh.sample_size, 4);

        Ok(())
    }

    #[test]
    fn minimal_stream() -> Result<()> {
        let data = stream(&[block_bytes(true, 0, &stream_info_payload())]);
        let container = Parser::default().parse_slice(&data)?;

        assert_eq!(container.blocks().len(), 1);
        assert!(container.blocks()[0].header.is_last);
        assert_eq!(container.stream_info().map(|si| si.sample_rate), Some(44100));
        assert!(container.seek_table().is_none());
        assert!(container.vorbis_comment().is_none());

        Ok(())
    }

    #[test]
    fn parse_leaves_audio_unread() -> Result<()> {
        let mut cursor = io::Cursor::new(EXAMPLE_DATA);
        Parser::default().parse(&mut cursor)?;

        assert_eq!(cursor.position(), EXAMPLE_DATA.len() as u64 - 2);

        Ok(())
    }

    #[test]
    fn wrong_case_signature() {
        let mut data = EXAMPLE_DATA.to_vec();
        data[..4].copy_from_slice(b"flac");

        let err = Parser::default().parse_slice(&data).unwrap_err();
        assert_eq!(
            err.downcast_ref::<StructuralError>(),
            Some(&StructuralError::InvalidSignature(*b"flac"))
        );
    }

    #[test]
    fn empty_source() {
        let err = Parser::default().parse_slice(&[]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StructuralError>(),
            Some(StructuralError::Truncated { .. })
        ));
    }

    #[test]
    fn unsupported_type_stops_block_loop() -> Result<()> {
        let data = stream(&[
            block_bytes(false, 0, &stream_info_payload()),
            block_bytes(false, 10, &[0xAB; 7]),
            block_bytes(false, 4, &join_bytes_le!("vendor", 0u32)),
            block_bytes(true, 1, &[0; 4]),
        ]);

        let container = Parser::default().parse_slice(&data)?;

        assert_eq!(container.blocks().len(), 1);
        assert_eq!(container.blocks()[0].header.block_type, BlockType::StreamInfo);
        assert!(container.vorbis_comment().is_none());

        Ok(())
    }

    #[test]
    fn unsupported_last_block() -> Result<()> {
        let data = stream(&[
            block_bytes(false, 0, &stream_info_payload()),
            block_bytes(true, 6, &[0x11; 32]),
        ]);

        let container = Parser::default().parse_slice(&data)?;
        assert_eq!(container.blocks().len(), 1);

        Ok(())
    }

    #[test]
    fn strict_policy_rejects_unsupported_type() {
        let data = stream(&[
            block_bytes(false, 0, &stream_info_payload()),
            block_bytes(true, 2, b"APPLdata"),
        ]);

        let err = Parser::with_policy(ParsePolicy::Strict)
            .parse_slice(&data)
            .unwrap_err();
        assert!(err.is::<UnsupportedBlockError>());
    }

    #[test]
    fn retain_raw_policy_continues() -> Result<()> {
        let data = stream(&[
            block_bytes(false, 0, &stream_info_payload()),
            block_bytes(false, 2, b"APPLdata"),
            block_bytes(true, 4, &join_bytes_le!("vendor", 1u32, "A=1")),
        ]);

        let container = Parser::with_policy(ParsePolicy::SkipUnknownRetainRaw).parse_slice(&data)?;

        assert_eq!(container.blocks().len(), 3);
        assert_eq!(
            container.blocks()[1].payload,
            BlockPayload::Unknown(b"APPLdata".to_vec())
        );
        assert_eq!(container.vorbis_comment().and_then(|vc| vc.get("a")), Some("1"));

        Ok(())
    }

    #[test]
    fn policy_can_be_changed_between_parses() -> Result<()> {
        let data = stream(&[
            block_bytes(false, 0, &stream_info_payload()),
            block_bytes(true, 2, b"APPLdata"),
        ]);

        let mut parser = Parser::default();
        assert_eq!(parser.policy(), ParsePolicy::StopAtUnsupported);
        assert_eq!(parser.parse_slice(&data)?.blocks().len(), 1);

        parser.set_policy(ParsePolicy::Strict);
        assert_eq!(parser.policy(), ParsePolicy::Strict);
        assert!(parser.parse_slice(&data).is_err());

        parser.set_policy(ParsePolicy::SkipUnknownRetainRaw);
        assert_eq!(parser.parse_slice(&data)?.blocks().len(), 2);

        Ok(())
    }

    #[test]
    fn seek_table_length_aborts_parse() {
        let data = stream(&[
            block_bytes(false, 0, &stream_info_payload()),
            block_bytes(true, 3, &[0; 20]),
        ]);

        let err = Parser::default().parse_slice(&data).unwrap_err();
        assert_eq!(
            err.downcast_ref::<StructuralError>(),
            Some(&StructuralError::SeekTableLength(20))
        );
    }

    #[test]
    fn lenient_seek_table_is_resynchronized() -> Result<()> {
        let data = stream(&[
            block_bytes(false, 0, &stream_info_payload()),
            block_bytes(true, 3, &[0; 20]),
        ]);

        let container = Parser::with_policy(ParsePolicy::SkipMalformedLength).parse_slice(&data)?;
        assert_eq!(container.seek_table().map(|st| st.points.len()), Some(1));

        Ok(())
    }

    #[test]
    fn invalid_utf8_aborts_parse() {
        let mut payload = join_bytes_le!("vendor", 1u32, 1u32);
        payload.push(0xFF);
        let data = stream(&[
            block_bytes(false, 0, &stream_info_payload()),
            block_bytes(true, 4, &payload),
        ]);

        let err = Parser::default().parse_slice(&data).unwrap_err();
        assert!(err.is::<EncodingError>());
    }

    #[test]
    fn truncated_payload() {
        let mut data = FLAC_SIGNATURE.to_vec();
        data.extend(join_bytes_be!(0x81u8, U24(100)));
        data.extend_from_slice(&[0; 10]);

        let err = Parser::default().parse_slice(&data).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StructuralError>(),
            Some(StructuralError::Truncated { .. })
        ));
    }

    #[test]
    fn missing_frame_sync() {
        let mut data = FLAC_SIGNATURE.to_vec();
        data.extend(block_bytes(true, 0, &stream_info_payload()));
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        let err = Parser::default().parse_slice(&data).unwrap_err();
        assert_eq!(
            err.downcast_ref::<StructuralError>(),
            Some(&StructuralError::InvalidFrameSync(0))
        );
    }

    #[test]
    fn source_not_at_start() -> Result<()> {
        let mut data = vec![0xEE; 5];
        data.extend_from_slice(EXAMPLE_DATA);

        let mut cursor = io::Cursor::new(data);
        cursor.set_position(5);

        let container = Parser::default().parse(cursor)?;
        assert_eq!(container.blocks().len(), 4);

        Ok(())
    }

    /// Source that counts the seeks issued against it.
    struct SeekCounter<'a> {
        inner: io::Cursor<&'a [u8]>,
        seeks: usize,
    }

    impl Read for SeekCounter<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.inner.read(buf)
        }
    }

    impl Seek for SeekCounter<'_> {
        fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
            self.seeks += 1;
            self.inner.seek(pos)
        }
    }

    #[test]
    fn field_reads_do_not_seek() -> Result<()> {
        let points: Vec<u8> = (0..200u64)
            .flat_map(|i| join_bytes_be!(i * 4096, i * 1000, 4096u16))
            .collect();
        let data = stream(&[
            block_bytes(false, 0, &stream_info_payload()),
            block_bytes(true, 3, &points),
        ]);

        let mut source = SeekCounter {
            inner: io::Cursor::new(data.as_slice()),
            seeks: 0,
        };
        let container = Parser::default().parse(&mut source)?;

        assert_eq!(container.seek_table().map(|st| st.points.len()), Some(200));
        // a fixed number of position lookups per block, none per field
        assert!(source.seeks < 20, "{} seeks", source.seeks);

        Ok(())
    }

    #[test]
    fn independent_parses_on_threads() -> Result<()> {
        let parser = Parser::default();

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| parser.parse_slice(EXAMPLE_DATA)))
                .collect();

            for handle in handles {
                let container = handle.join().expect("parse thread panicked")?;
                assert_eq!(container.blocks().len(), 4);
            }

            Ok(())
        })
    }
}
