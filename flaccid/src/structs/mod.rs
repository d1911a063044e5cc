//! Data structures representing container components.
//!
//! Contains the metadata block header and payload types, the first audio
//! frame header, and the [`container::Container`] that ties them together.

pub mod block;
pub mod container;
pub mod frame;
pub mod seek_table;
pub mod stream_info;
pub mod vorbis_comment;
