//! Bitstream I/O utilities for container parsing.
//!
//! Every field group is read under an explicitly chosen byte order: fields
//! are big-endian and bit-packed unless a method says otherwise. Nothing here
//! depends on the host's native layout.

use std::io;
use std::io::SeekFrom;

use anyhow::{Result, anyhow};
use bitstream_io::{BigEndian, BitRead, BitReader, LittleEndian, UnsignedInteger};

use crate::utils::errors::StructuralError;

/// Largest skip handed to the underlying reader in one call, in bytes.
const SKIP_CHUNK_BYTES: u64 = 1 << 24;

#[derive(Debug)]
pub struct BitstreamIoReader<R: io::Read + io::Seek> {
    bs: BitReader<R, BigEndian>,
}

pub type BsIoSliceReader<'a> = BitstreamIoReader<io::Cursor<&'a [u8]>>;

impl<R> BitstreamIoReader<R>
where
    R: io::Read + io::Seek,
{
    pub fn new(read: R) -> Self {
        Self {
            bs: BitReader::new(read),
        }
    }

    #[inline(always)]
    pub fn get(&mut self) -> Result<bool> {
        let result = self.bs.read_bit();
        self.checked(result, 1)
    }

    /// Reads an `n`-bit big-endian unsigned field.
    #[inline(always)]
    pub fn get_n<I: UnsignedInteger>(&mut self, n: u32) -> Result<I> {
        let result = self.bs.read_unsigned_var(n);
        self.checked(result, n as u64)
    }

    /// Reads a byte-aligned little-endian 32-bit unsigned integer.
    #[inline(always)]
    pub fn get_u32_le(&mut self) -> Result<u32> {
        let result = self.bs.read_as_to::<LittleEndian, u32>();
        self.checked(result, 32)
    }

    pub fn get_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        let result = self.bs.read_bytes(&mut buf);
        self.checked(result, (N as u64) << 3)?;
        Ok(buf)
    }

    pub fn get_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let result = self.bs.read_to_vec(len);
        self.checked(result, (len as u64) << 3)
    }

    /// Discards `len` bytes by reading them, so a short source is reported
    /// as truncation rather than silently seeking past its end.
    pub fn skip_bytes(&mut self, len: u64) -> Result<()> {
        let mut remaining = len;

        while remaining > 0 {
            let chunk = remaining.min(SKIP_CHUNK_BYTES);
            let result = self.bs.skip((chunk << 3) as u32);
            self.checked(result, chunk << 3)?;
            remaining -= chunk;
        }

        Ok(())
    }

    /// Moves the cursor to the absolute byte offset `target`.
    ///
    /// Forward moves read through the gap; moving back is only used to undo
    /// a payload decoder that read past its declared end.
    pub fn resync_to(&mut self, target: u64) -> Result<()> {
        if !self.bs.byte_aligned() {
            self.bs.byte_align();
        }

        let current = self.byte_position()?;
        if current < target {
            self.skip_bytes(target - current)
        } else if current > target {
            self.bs.seek_bits(SeekFrom::Start(target << 3))?;
            Ok(())
        } else {
            Ok(())
        }
    }

    #[inline(always)]
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.bs.position_in_bits()?)
    }

    #[inline(always)]
    pub fn byte_position(&mut self) -> Result<u64> {
        self.position().map(|bits| bits >> 3)
    }

    /// Maps a failed read to [`StructuralError::Truncated`] on end of input.
    ///
    /// The stream position is only queried on that error path, since it may
    /// cost a seek on the underlying source.
    fn checked<T>(&mut self, result: io::Result<T>, bits: u64) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                let position = self.bs.position_in_bits().unwrap_or(0);
                Err(anyhow!(StructuralError::Truncated { bits, position }))
            }
            Err(e) => Err(anyhow!(e)),
        }
    }
}

impl<'a> BsIoSliceReader<'a> {
    pub fn from_slice(buf: &'a [u8]) -> Self {
        Self::new(io::Cursor::new(buf))
    }
}
