//! Canonical 44-byte WAVE header
//!
//! Layout (all multi-byte fields little-endian):
//!
//! | offset | size | field             |
//! |-------:|-----:|-------------------|
//! |      0 |    4 | `"RIFF"`          |
//! |      4 |    4 | riff size         |
//! |      8 |    4 | `"WAVE"`          |
//! |     12 |    4 | `"fmt "`          |
//! |     16 |    4 | fmt chunk size    |
//! |     20 |    2 | audio format      |
//! |     22 |    2 | channels          |
//! |     24 |    4 | sample rate       |
//! |     28 |    4 | byte rate         |
//! |     32 |    2 | block align       |
//! |     34 |    2 | bits per sample   |
//! |     36 |    4 | `"data"`          |
//! |     40 |    4 | data chunk size   |
//!
//! Decoding performs no semantic checks; see [`crate::process::validate`].

use std::fmt::{Display, Formatter};
use std::io::{self, Cursor, Read, Write};

use bitstream_io::{ByteRead, ByteReader, LittleEndian};
use log::{trace, warn};
use pcmwav_macros::ToBytes;

use crate::utils::byteorder::{FixedWidth, WriteBytesLe};
use crate::utils::errors::DecodeError;
use crate::utils::reader::read_full;

/// Size of the encoded header, and the offset of the first payload byte.
pub const HEADER_LEN: usize = 44;

/// `riff_size` minus `data_size` for a canonical header.
pub const RIFF_SIZE_BASE: u32 = 36;

pub const RIFF: FourCC = FourCC(*b"RIFF");
pub const WAVE: FourCC = FourCC(*b"WAVE");
pub const FMT: FourCC = FourCC(*b"fmt ");
pub const DATA: FourCC = FourCC(*b"data");

pub const PCM_FMT_SIZE: u32 = 16;
pub const PCM_FORMAT: u16 = 1;

pub const MONO: u16 = 1;
pub const STEREO: u16 = 2;

/// Four-character chunk identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ToBytes)]
pub struct FourCC(pub [u8; 4]);

impl Display for FourCC {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.0.escape_ascii())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, ToBytes)]
pub struct Header {
    pub riff_tag: FourCC,
    /// Byte count of everything after this field.
    pub riff_size: u32,
    pub wave_tag: FourCC,
    pub fmt_tag: FourCC,
    pub fmt_size: u32,
    pub audio_format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    /// Bytes per frame, all channels included.
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_tag: FourCC,
    /// Byte count of the sample payload following the header.
    pub data_size: u32,
}

const _: () = assert!(Header::WIDTH == HEADER_LEN);

impl Header {
    /// Builds a canonical PCM header with every derived field computed from
    /// the arguments.
    pub fn pcm(channels: u16, sample_rate: u32, bits_per_sample: u16, data_size: u32) -> Self {
        let block_align = channels.wrapping_mul(bits_per_sample / 8);
        Self {
            riff_tag: RIFF,
            riff_size: riff_size_for(data_size),
            wave_tag: WAVE,
            fmt_tag: FMT,
            fmt_size: PCM_FMT_SIZE,
            audio_format: PCM_FORMAT,
            channels,
            sample_rate,
            byte_rate: sample_rate.wrapping_mul(block_align as u32),
            block_align,
            bits_per_sample,
            data_tag: DATA,
            data_size,
        }
    }

    /// Reads exactly [`HEADER_LEN`] bytes from `source` and decodes them.
    pub fn decode<R: Read + ?Sized>(source: &mut R) -> Result<Self, DecodeError> {
        let mut buffer = [0u8; HEADER_LEN];
        let read = read_full(source, &mut buffer)?;
        if read < HEADER_LEN {
            return Err(DecodeError::Truncated { read });
        }

        let header = Self::from_bytes(&buffer)?;
        trace!(
            "WAVE header: {} size={} {} {} fmt_size={} format={} ch={} rate={} byte_rate={} align={} bits={} {} data_size={}",
            header.riff_tag,
            header.riff_size,
            header.wave_tag,
            header.fmt_tag,
            header.fmt_size,
            header.audio_format,
            header.channels,
            header.sample_rate,
            header.byte_rate,
            header.block_align,
            header.bits_per_sample,
            header.data_tag,
            header.data_size,
        );
        Ok(header)
    }

    pub fn from_bytes(buffer: &[u8; HEADER_LEN]) -> io::Result<Self> {
        let mut reader = ByteReader::endian(Cursor::new(&buffer[..]), LittleEndian);

        Ok(Self {
            riff_tag: read_tag(&mut reader)?,
            riff_size: reader.read()?,
            wave_tag: read_tag(&mut reader)?,
            fmt_tag: read_tag(&mut reader)?,
            fmt_size: reader.read()?,
            audio_format: reader.read()?,
            channels: reader.read()?,
            sample_rate: reader.read()?,
            byte_rate: reader.read()?,
            block_align: reader.read()?,
            bits_per_sample: reader.read()?,
            data_tag: read_tag(&mut reader)?,
            data_size: reader.read()?,
        })
    }

    /// Serializes the header into its 44-byte little-endian form.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LEN);
        self.write_le(&mut bytes);
        bytes
    }

    pub fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> io::Result<()> {
        sink.write_all(&self.encode())
    }

    /// Bytes per sample per channel.
    pub fn sample_width(&self) -> u16 {
        self.bits_per_sample / 8
    }

    pub fn expected_block_align(&self) -> u16 {
        self.channels.wrapping_mul(self.sample_width())
    }

    pub fn expected_byte_rate(&self) -> u32 {
        self.sample_rate.wrapping_mul(self.block_align as u32)
    }

    pub fn expected_riff_size(&self) -> u32 {
        RIFF_SIZE_BASE.wrapping_add(self.data_size)
    }

    /// Number of whole frames declared by `data_size`.
    pub fn frame_count(&self) -> u64 {
        match self.block_align {
            0 => 0,
            align => (self.data_size / align as u32) as u64,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        match self.byte_rate {
            0 => 0.0,
            rate => self.data_size as f64 / rate as f64,
        }
    }
}

fn read_tag<R: ByteRead>(reader: &mut R) -> io::Result<FourCC> {
    let mut tag = [0u8; 4];
    reader.read_bytes(&mut tag)?;
    Ok(FourCC(tag))
}

/// `RIFF_SIZE_BASE + data_size`, wrapping on overflow like the on-disk field.
pub(crate) fn riff_size_for(data_size: u32) -> u32 {
    RIFF_SIZE_BASE.checked_add(data_size).unwrap_or_else(|| {
        warn!("RIFF size overflows 32 bits for data_size = {data_size}");
        RIFF_SIZE_BASE.wrapping_add(data_size)
    })
}
