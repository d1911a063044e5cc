use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use anyhow::{Context, Result};

/// Seekable input over a file or over stdin buffered in memory.
///
/// Use "-" as the path to read from stdin. The parser seeks backwards after
/// an overlong block payload, so pipe input is read to the end up front.
pub enum InputSource {
    File(BufReader<File>),
    Memory(Cursor<Vec<u8>>),
}

impl InputSource {
    pub fn open<P: AsRef<Path>>(input_path: P) -> Result<Self> {
        let path = input_path.as_ref();

        if is_pipe(path) {
            let mut data = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut data)
                .context("Failed to read stdin")?;
            log::debug!("Buffered {} bytes from stdin", data.len());
            return Ok(Self::from_bytes(data));
        }

        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        Ok(Self::File(BufReader::new(file)))
    }

    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self::Memory(Cursor::new(data))
    }

    /// Total size in bytes, when known without reading.
    pub fn byte_len(&self) -> Option<u64> {
        match self {
            Self::File(reader) => reader.get_ref().metadata().ok().map(|m| m.len()),
            Self::Memory(cursor) => Some(cursor.get_ref().len() as u64),
        }
    }
}

/// Check whether `path` names stdin.
pub fn is_pipe(path: &Path) -> bool {
    path.as_os_str() == "-"
}

impl Read for InputSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::File(reader) => reader.read(buf),
            Self::Memory(cursor) => cursor.read(buf),
        }
    }
}

impl Seek for InputSource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Self::File(reader) => reader.seek(pos),
            Self::Memory(cursor) => cursor.seek(pos),
        }
    }
}
