//! Little-endian serialization helpers.
//!
//! `#[derive(ToBytes)]` from `pcmwav-macros` builds on these traits: every
//! field is appended to the destination buffer in declaration order, with no
//! padding between fields.

pub trait WriteBytesLe {
    fn write_le(&self, dst: &mut Vec<u8>);
}

/// Number of bytes a value occupies once serialized.
pub trait FixedWidth {
    const WIDTH: usize;
}

macro_rules! impl_num_le {
    ($($t:ty),+) => { $(
        impl WriteBytesLe for $t { #[inline] fn write_le(&self, dst: &mut Vec<u8>) { dst.extend_from_slice(&self.to_le_bytes()); }}
        impl FixedWidth for $t { const WIDTH: usize = std::mem::size_of::<$t>(); }
    )+ }
}

impl_num_le!(u8, i8, u16, i16, u32, i32, u64, i64);

impl<T: WriteBytesLe, const N: usize> WriteBytesLe for [T; N] {
    #[inline]
    fn write_le(&self, dst: &mut Vec<u8>) {
        self.iter().for_each(|item| item.write_le(dst));
    }
}

impl<T: FixedWidth, const N: usize> FixedWidth for [T; N] {
    const WIDTH: usize = T::WIDTH * N;
}

#[cfg(test)]
mod tests {
    use super::{FixedWidth, WriteBytesLe};
    use pcmwav_macros::ToBytes;

    #[derive(ToBytes)]
    struct Mini {
        a: u16,
        b: u32,
        tag: [u8; 4],
    }

    #[test]
    fn derive_writes_fields_in_order() {
        let s = Mini {
            a: 0x1234,
            b: 0xABCDEF01,
            tag: *b"TEST",
        };

        let mut out = Vec::new();
        s.write_le(&mut out);

        let expected = [0x34, 0x12, 0x01, 0xEF, 0xCD, 0xAB, b'T', b'E', b'S', b'T'];
        assert_eq!(out, expected);
    }

    #[test]
    fn derive_sums_field_widths() {
        assert_eq!(Mini::WIDTH, 10);
        assert_eq!(<[u16; 3]>::WIDTH, 6);
    }
}
