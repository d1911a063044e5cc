use anyhow::Result;
use serde::Serialize;

use flaccid::structs::block::MetadataBlock;
use flaccid::structs::container::Container;
use flaccid::structs::frame::FrameHeaderRaw;
use flaccid::structs::seek_table::SeekTable;
use flaccid::structs::stream_info::StreamInfo;
use flaccid::structs::vorbis_comment::VorbisComment;

use crate::timestamp::duration_str;

/// One `info --report yaml` document: an entry per input, in argument order.
#[derive(Debug, Default, Serialize)]
pub struct Report {
    pub inputs: Vec<InputReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputReport {
    pub path: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    Container(ContainerReport),
    Error(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerReport {
    blocks: Vec<BlockEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream_info: Option<StreamInfoEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    seek_points: Vec<SeekPointEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vorbis_comment: Option<VorbisCommentEntry>,
    frame_header: FrameHeaderEntry,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BlockEntry {
    #[serde(rename = "type")]
    block_type: String,
    length: u32,
    is_last: bool,
    decoded: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StreamInfoEntry {
    min_block_size: u16,
    max_block_size: u16,
    min_frame_size: u32,
    max_frame_size: u32,
    sample_rate: u32,
    channels: u8,
    bits_per_sample: u8,
    total_samples: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<String>,
    md5: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SeekPointEntry {
    sample_number: u64,
    byte_offset: u64,
    frame_samples: u16,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    placeholder: bool,
}

#[derive(Debug, Serialize)]
struct VorbisCommentEntry {
    vendor: String,
    comments: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FrameHeaderEntry {
    variable_blocksize: bool,
    block_size_code: u8,
    sample_rate_code: u8,
    channel_code: u8,
    sample_size_code: u8,
}

impl Report {
    pub fn push(&mut self, path: String, result: &Result<Container>) {
        let outcome = match result {
            Ok(container) => Outcome::Container(ContainerReport::from_container(container)),
            Err(e) => Outcome::Error(format!("{e:#}")),
        };
        self.inputs.push(InputReport { path, outcome });
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

impl ContainerReport {
    pub fn from_container(container: &Container) -> Self {
        Self {
            blocks: container.blocks().iter().map(BlockEntry::from).collect(),
            stream_info: container.stream_info().map(StreamInfoEntry::from),
            seek_points: container
                .seek_table()
                .map(seek_point_entries)
                .unwrap_or_default(),
            vorbis_comment: container.vorbis_comment().map(VorbisCommentEntry::from),
            frame_header: FrameHeaderEntry::from(container.frame_header()),
        }
    }
}

impl From<&MetadataBlock> for BlockEntry {
    fn from(block: &MetadataBlock) -> Self {
        Self {
            block_type: block.header.block_type.to_string(),
            length: block.header.length,
            is_last: block.header.is_last,
            decoded: block.payload.block_type().is_some(),
        }
    }
}

impl From<&StreamInfo> for StreamInfoEntry {
    fn from(info: &StreamInfo) -> Self {
        Self {
            min_block_size: info.min_block_size,
            max_block_size: info.max_block_size,
            min_frame_size: info.min_frame_size,
            max_frame_size: info.max_frame_size,
            sample_rate: info.sample_rate,
            channels: info.channels(),
            bits_per_sample: info.bits_per_sample(),
            total_samples: info.total_samples,
            duration: info.duration_secs().map(duration_str),
            md5: info.md5_hex(),
        }
    }
}

fn seek_point_entries(table: &SeekTable) -> Vec<SeekPointEntry> {
    table
        .points
        .iter()
        .map(|point| SeekPointEntry {
            sample_number: point.sample_number,
            byte_offset: point.byte_offset,
            frame_samples: point.frame_samples,
            placeholder: point.is_placeholder(),
        })
        .collect()
}

impl From<&VorbisComment> for VorbisCommentEntry {
    fn from(comment: &VorbisComment) -> Self {
        Self {
            vendor: comment.vendor.clone(),
            comments: comment.comments.clone(),
        }
    }
}

impl From<&FrameHeaderRaw> for FrameHeaderEntry {
    fn from(header: &FrameHeaderRaw) -> Self {
        Self {
            variable_blocksize: header.is_variable_blocksize(),
            block_size_code: header.block_size,
            sample_rate_code: header.sample_rate,
            channel_code: header.channel,
            sample_size_code: header.sample_size,
        }
    }
}
