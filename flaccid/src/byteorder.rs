//! Byte writers used to assemble container fixtures in tests.

pub(crate) trait WriteBytesLe {
    fn write_le(&self, dst: &mut Vec<u8>);
}

pub(crate) trait WriteBytesBe {
    fn write_be(&self, dst: &mut Vec<u8>);
}

macro_rules! impl_num_le_be {
    ($($t:ty),+) => { $(
        impl WriteBytesLe for $t { #[inline] fn write_le(&self, dst: &mut Vec<u8>) { dst.extend_from_slice(&self.to_le_bytes()); }}
        impl WriteBytesBe for $t { #[inline] fn write_be(&self, dst: &mut Vec<u8>) { dst.extend_from_slice(&self.to_be_bytes()); }}
    )+ }
}

impl_num_le_be!(u8, u16, u32, u64);

macro_rules! impl_collection {
    ($trait:ident, $method:ident) => {
        impl<T: $trait> $trait for Vec<T> {
            #[inline]
            fn $method(&self, dst: &mut Vec<u8>) {
                self.iter().for_each(|item| item.$method(dst));
            }
        }
        impl<T: $trait, const N: usize> $trait for [T; N] {
            #[inline]
            fn $method(&self, dst: &mut Vec<u8>) {
                self.iter().for_each(|item| item.$method(dst));
            }
        }
    };
}

impl_collection!(WriteBytesLe, write_le);
impl_collection!(WriteBytesBe, write_be);

/// 24-bit unsigned field, as used for block lengths and frame sizes.
#[derive(Clone, Copy)]
pub(crate) struct U24(pub u32);

impl WriteBytesBe for U24 {
    fn write_be(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&self.0.to_be_bytes()[1..]);
    }
}

impl WriteBytesLe for U24 {
    fn write_le(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&self.0.to_le_bytes()[..3]);
    }
}

/// UTF-8 text with a little-endian 32-bit length prefix.
impl WriteBytesLe for &str {
    fn write_le(&self, dst: &mut Vec<u8>) {
        (self.len() as u32).write_le(dst);
        dst.extend_from_slice(self.as_bytes());
    }
}

macro_rules! join_bytes_le {
    ( $($value:expr),+ $(,)? ) => {{
        let mut vec = Vec::<u8>::new();
        $( $value.write_le(&mut vec); )+
        vec
    }};
}

macro_rules! join_bytes_be {
    ( $($value:expr),+ $(,)? ) => {{
        let mut vec = Vec::<u8>::new();
        $( $value.write_be(&mut vec); )+
        vec
    }};
}

pub(crate) use {join_bytes_be, join_bytes_le};

/// Header plus payload of one metadata block.
pub(crate) fn block_bytes(is_last: bool, block_type: u8, payload: &[u8]) -> Vec<u8> {
    let first = ((is_last as u8) << 7) | (block_type & 0x7F);
    let mut vec = join_bytes_be!(first, U24(payload.len() as u32));
    vec.extend_from_slice(payload);
    vec
}

#[cfg(test)]
mod tests {
    use super::*;
    use flaccid_macros::ToBytes;

    #[derive(ToBytes)]
    struct Record {
        sample: u64,
        samples: u16,
        #[bytes(u24)]
        frame_size: u32,
        tag: [u8; 2],
    }

    #[test]
    fn record_byte_orders() {
        let r = Record {
            sample: 0x0102_0304_0506_0708,
            samples: 0x1234,
            frame_size: 0xA1B2C3,
            tag: *b"OK",
        };

        let vec_le = &mut Vec::new();
        let vec_be = &mut Vec::new();

        r.write_le(vec_le);
        r.write_be(vec_be);

        let expected_le = [8, 7, 6, 5, 4, 3, 2, 1, 0x34, 0x12, 0xC3, 0xB2, 0xA1, b'O', b'K'];
        let expected_be = [1, 2, 3, 4, 5, 6, 7, 8, 0x12, 0x34, 0xA1, 0xB2, 0xC3, b'O', b'K'];

        assert_eq!(&vec_le[..], &expected_le);
        assert_eq!(&vec_be[..], &expected_be);
    }

    #[test]
    fn block_header_layout() {
        let bytes = block_bytes(true, 4, &[0xAA; 3]);
        assert_eq!(bytes, [0x84, 0x00, 0x00, 0x03, 0xAA, 0xAA, 0xAA]);

        let text = join_bytes_le!("abc");
        assert_eq!(text, [3, 0, 0, 0, b'a', b'b', b'c']);
    }
}
