use std::io;

use crate::structs::header::FourCC;

/// Returns `$err` when `$level` is at or above the configured fail level,
/// otherwise logs it at `$level` and carries on.
#[macro_export]
macro_rules! log_or_err {
    ($state:expr, $level:expr, $err:expr $(,)?) => {{
        if $level <= $state.fail_level {
            return Err($err);
        } else {
            match $level {
                ::log::Level::Error => ::log::error!("{}", $err),
                ::log::Level::Warn => ::log::warn!("{}", $err),
                ::log::Level::Info => ::log::info!("{}", $err),
                ::log::Level::Debug => ::log::debug!("{}", $err),
                ::log::Level::Trace => ::log::trace!("{}", $err),
            }
        }
    }};
}

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("Header truncated: read {read} of 44 bytes")]
    Truncated { read: usize },

    #[error("I/O error while reading header: {0}")]
    Io(#[from] io::Error),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("RIFF header doesn't match. Read {0}")]
    ContainerTag(FourCC),

    #[error("Audio format doesn't match, expected WAVE. Read {0}")]
    FormatTag(FourCC),

    #[error("Subchunk fmt doesn't match. Read {0}")]
    FmtChunkTag(FourCC),

    #[error("Provided data is not PCM audio: fmt chunk size {fmt_size}, audio format {audio_format}")]
    NotPcm { fmt_size: u32, audio_format: u16 },

    #[error("Data header doesn't match. Read {0}")]
    DataChunkTag(FourCC),

    #[error("{field} is inconsistent with the other fields. Read {found}, expected {expected}")]
    DerivedField {
        field: &'static str,
        expected: u32,
        found: u32,
    },

    #[error("Unsupported channel count {0}, expected mono or stereo")]
    ChannelCount(u16),
}

/// Which input of a two-stream operation an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CompatibilityError {
    #[error("Sample rate of both audio files must match ({left} != {right})")]
    SampleRateMismatch { left: u32, right: u32 },

    #[error("Bits per sample of both audio files must match ({left} != {right})")]
    BitDepthMismatch { left: u16, right: u16 },

    #[error("Number of channels of both audio files must match ({left} != {right})")]
    ChannelCountMismatch { left: u16, right: u16 },

    #[error("Interleaving requires mono input, {side} has {channels} channels")]
    NotMono { side: Side, channels: u16 },
}

#[derive(thiserror::Error, Debug)]
pub enum CombineError {
    #[error(transparent)]
    Compatibility(#[from] CompatibilityError),

    #[error("Cannot address samples of {0} bits, at least 8 bits per sample are required")]
    UnsupportedSampleWidth(u16),

    #[error("Operation cancelled after {written} payload bytes")]
    Cancelled { written: u64 },

    #[error("I/O error while combining streams: {0}")]
    Io(#[from] io::Error),
}
