//! Parsed container: metadata blocks plus the first frame header.

use crate::structs::block::{BlockPayload, MetadataBlock};
use crate::structs::frame::FrameHeaderRaw;
use crate::structs::seek_table::SeekTable;
use crate::structs::stream_info::StreamInfo;
use crate::structs::vorbis_comment::VorbisComment;

/// Result of one parse: every decoded metadata block in stream order and the
/// validated first frame header.
///
/// The accessors for STREAMINFO, SEEKTABLE and VORBIS_COMMENT return the first
/// block of that type; later duplicates are still present in [`blocks`].
///
/// [`blocks`]: Container::blocks
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    blocks: Vec<MetadataBlock>,
    stream_info: Option<usize>,
    seek_table: Option<usize>,
    vorbis_comment: Option<usize>,
    frame_header: FrameHeaderRaw,
}

impl Container {
    pub fn new(blocks: Vec<MetadataBlock>, frame_header: FrameHeaderRaw) -> Self {
        let first = |pred: fn(&BlockPayload) -> bool| blocks.iter().position(|b| pred(&b.payload));

        let stream_info = first(|p| matches!(p, BlockPayload::StreamInfo(_)));
        let seek_table = first(|p| matches!(p, BlockPayload::SeekTable(_)));
        let vorbis_comment = first(|p| matches!(p, BlockPayload::VorbisComment(_)));

        Self {
            blocks,
            stream_info,
            seek_table,
            vorbis_comment,
            frame_header,
        }
    }

    pub fn blocks(&self) -> &[MetadataBlock] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<MetadataBlock> {
        self.blocks
    }

    pub fn frame_header(&self) -> &FrameHeaderRaw {
        &self.frame_header
    }

    pub fn stream_info(&self) -> Option<&StreamInfo> {
        match self.payload_at(self.stream_info)? {
            BlockPayload::StreamInfo(si) => Some(si),
            _ => None,
        }
    }

    pub fn seek_table(&self) -> Option<&SeekTable> {
        match self.payload_at(self.seek_table)? {
            BlockPayload::SeekTable(st) => Some(st),
            _ => None,
        }
    }

    pub fn vorbis_comment(&self) -> Option<&VorbisComment> {
        match self.payload_at(self.vorbis_comment)? {
            BlockPayload::VorbisComment(vc) => Some(vc),
            _ => None,
        }
    }

    fn payload_at(&self, index: Option<usize>) -> Option<&BlockPayload> {
        self.blocks.get(index?).map(|b| &b.payload)
    }
}
