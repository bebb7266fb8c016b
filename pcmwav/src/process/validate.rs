//! Header validation and cross-stream compatibility checks.

use log::Level;

use crate::log_or_err;
use crate::structs::header::{DATA, FMT, Header, MONO, PCM_FMT_SIZE, PCM_FORMAT, RIFF, STEREO, WAVE};
use crate::utils::errors::{CompatibilityError, Side, ValidationError};

/// The combination a pair of headers is checked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combination {
    /// Two mono streams interleaved into one stereo stream.
    Interleave,
    /// One stream appended to another with the same layout.
    Append,
}

/// Structural validator for canonical PCM headers.
///
/// The tag and PCM checks always fail hard. Inconsistent derived fields
/// (`block_align`, `byte_rate`, `riff_size`) and unusual channel counts are
/// reported at [`Level::Warn`]; they become errors once the fail level is
/// raised to `Warn`.
#[derive(Debug, Clone)]
pub struct Validator {
    fail_level: Level,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            fail_level: Level::Error,
        }
    }
}

impl Validator {
    /// Validator that rejects inconsistent derived fields.
    pub fn strict() -> Self {
        Self {
            fail_level: Level::Warn,
        }
    }

    pub fn set_fail_level(&mut self, level: Level) {
        self.fail_level = level;
    }

    pub fn fail_level(&self) -> Level {
        self.fail_level
    }

    /// Checks the fixed fields in order; the first mismatch is returned.
    pub fn validate(&self, header: &Header) -> Result<(), ValidationError> {
        if header.riff_tag != RIFF {
            return Err(ValidationError::ContainerTag(header.riff_tag));
        }
        if header.wave_tag != WAVE {
            return Err(ValidationError::FormatTag(header.wave_tag));
        }
        if header.fmt_tag != FMT {
            return Err(ValidationError::FmtChunkTag(header.fmt_tag));
        }
        if header.fmt_size != PCM_FMT_SIZE || header.audio_format != PCM_FORMAT {
            return Err(ValidationError::NotPcm {
                fmt_size: header.fmt_size,
                audio_format: header.audio_format,
            });
        }
        if header.data_tag != DATA {
            return Err(ValidationError::DataChunkTag(header.data_tag));
        }

        self.check_derived_fields(header)
    }

    fn check_derived_fields(&self, header: &Header) -> Result<(), ValidationError> {
        if header.channels != MONO && header.channels != STEREO {
            log_or_err!(self, Level::Warn, ValidationError::ChannelCount(header.channels));
        }

        let block_align = header.expected_block_align();
        if header.block_align != block_align {
            log_or_err!(
                self,
                Level::Warn,
                ValidationError::DerivedField {
                    field: "block_align",
                    expected: block_align as u32,
                    found: header.block_align as u32,
                }
            );
        }

        let byte_rate = header.expected_byte_rate();
        if header.byte_rate != byte_rate {
            log_or_err!(
                self,
                Level::Warn,
                ValidationError::DerivedField {
                    field: "byte_rate",
                    expected: byte_rate,
                    found: header.byte_rate,
                }
            );
        }

        let riff_size = header.expected_riff_size();
        if header.riff_size != riff_size {
            log_or_err!(
                self,
                Level::Warn,
                ValidationError::DerivedField {
                    field: "riff_size",
                    expected: riff_size,
                    found: header.riff_size,
                }
            );
        }

        Ok(())
    }
}

/// Validates `header` with the default validator.
pub fn validate(header: &Header) -> Result<(), ValidationError> {
    Validator::default().validate(header)
}

/// Checks that two individually valid headers can be combined.
///
/// Both combinations need matching sample rate and bit depth. Interleaving
/// additionally requires mono on both sides, appending requires equal channel
/// counts.
///
/// Only these cross-stream rules are checked. Each header must already have
/// passed [`Validator::validate`]; passing the headers of two
/// [`ValidatedAudio`](crate::ValidatedAudio) handles guarantees that.
///
/// ```rust
/// use std::io::Cursor;
/// use pcmwav::{AudioHandle, Combination, CompatibilityError, Header, MONO, check_compatible};
///
/// let mut a = Cursor::new(Header::pcm(MONO, 8000, 16, 0).encode());
/// let mut b = Cursor::new(Header::pcm(MONO, 16000, 16, 0).encode());
/// let a = AudioHandle::new(&mut a)?.validate()?;
/// let b = AudioHandle::new(&mut b)?.validate()?;
///
/// assert_eq!(
///     check_compatible(a.header(), b.header(), Combination::Interleave),
///     Err(CompatibilityError::SampleRateMismatch { left: 8000, right: 16000 })
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn check_compatible(
    left: &Header,
    right: &Header,
    combination: Combination,
) -> Result<(), CompatibilityError> {
    if left.sample_rate != right.sample_rate {
        return Err(CompatibilityError::SampleRateMismatch {
            left: left.sample_rate,
            right: right.sample_rate,
        });
    }
    if left.bits_per_sample != right.bits_per_sample {
        return Err(CompatibilityError::BitDepthMismatch {
            left: left.bits_per_sample,
            right: right.bits_per_sample,
        });
    }

    match combination {
        Combination::Interleave => {
            for (side, header) in [(Side::Left, left), (Side::Right, right)] {
                if header.channels != MONO {
                    return Err(CompatibilityError::NotMono {
                        side,
                        channels: header.channels,
                    });
                }
            }
        }
        Combination::Append => {
            if left.channels != right.channels {
                return Err(CompatibilityError::ChannelCountMismatch {
                    left: left.channels,
                    right: right.channels,
                });
            }
        }
    }

    Ok(())
}
