//! VORBIS_COMMENT block.
//!
//! Unlike the rest of the container, lengths in this block are little-endian
//! 32-bit integers:
//!
//! ```text
//! u32le vendor_length | vendor | u32le count | count × (u32le length | comment)
//! ```

use std::io::{Read, Seek};

use anyhow::Result;
use log::trace;

use crate::utils::bitstream_io::BitstreamIoReader;
use crate::utils::errors::EncodingError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VorbisComment {
    pub vendor: String,
    /// Comments in stored order, conventionally `NAME=value`.
    pub comments: Vec<String>,
}

impl VorbisComment {
    pub fn read<R: Read + Seek>(reader: &mut BitstreamIoReader<R>) -> Result<Self> {
        let vendor = read_string(reader, "vendor string")?;
        let count = reader.get_u32_le()?;

        // count comes from the stream, so it does not size the allocation
        let mut comments = Vec::new();
        for _ in 0..count {
            comments.push(read_string(reader, "comment")?);
        }

        trace!("VORBIS_COMMENT: vendor {vendor:?}, {} comments", comments.len());

        Ok(Self { vendor, comments })
    }

    /// Splits each comment at its first `=`. Comments without one are skipped.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.comments.iter().filter_map(|c| c.split_once('='))
    }

    /// Fields whose name matches `name`, ignoring ASCII case, in stored order.
    pub fn matching<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.fields()
            .filter(move |(field, _)| field.eq_ignore_ascii_case(name))
    }

    /// First value whose field name matches `name`, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.matching(name).next().map(|(_, value)| value)
    }
}

fn read_string<R: Read + Seek>(
    reader: &mut BitstreamIoReader<R>,
    field: &'static str,
) -> Result<String> {
    let len = reader.get_u32_le()?;
    let bytes = reader.get_bytes(len as usize)?;

    Ok(String::from_utf8(bytes).map_err(|source| EncodingError::InvalidUtf8 { field, source })?)
}
