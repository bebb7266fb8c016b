//! Parser, validator and combiner for PCM WAVE streams with the canonical
//! 44-byte header.
//!
//! ## Technical Overview
//!
//! A supported file is a RIFF container holding exactly one `fmt ` chunk of 16
//! bytes describing linear PCM, followed directly by the `data` chunk. The
//! sample payload is never loaded in full: combination operations stream it
//! from a seekable source into any [`std::io::Write`] sink.
//!
//! ### Operations
//!
//! - **Merge**: two mono streams are interleaved sample by sample into one
//!   stereo stream. The shorter input is padded with silence.
//! - **Concat**: two streams with identical format are written back to back.
//!
//! ## Quick Start
//!
//! 1. Decode a header with [`AudioHandle::new`]
//! 2. Validate it with [`AudioHandle::validate`], yielding a [`ValidatedAudio`]
//! 3. Combine two validated handles with [`ValidatedAudio::merge`] or [`ValidatedAudio::concat`]
//!
//! ```rust
//! use std::io::Cursor;
//! use pcmwav::{AudioHandle, Header, MONO};
//!
//! let mut left = Cursor::new(Header::pcm(MONO, 8000, 16, 4).encode());
//! left.get_mut().extend_from_slice(&[1, 0, 2, 0]);
//! let mut right = Cursor::new(Header::pcm(MONO, 8000, 16, 2).encode());
//! right.get_mut().extend_from_slice(&[3, 0]);
//!
//! let mut left = AudioHandle::new(&mut left)?.validate()?;
//! let mut right = AudioHandle::new(&mut right)?.validate()?;
//!
//! let mut stereo = Vec::new();
//! let stats = left.merge(&mut right, &mut stereo)?;
//!
//! assert_eq!(stats.frames, 2);
//! assert_eq!(&stereo[44..], &[1, 0, 3, 0, 2, 0, 0, 0]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Validation and stream combination.
///
/// 1. **Validation** ([`process::validate`]): structural header checks and
///    cross-stream compatibility rules.
///
/// 2. **Merge** ([`process::merge`]): mono + mono interleaving.
///
/// 3. **Concat** ([`process::concat`]): sequential append.
pub mod process;

/// Data structures representing the file format.
///
/// - **Header** ([`structs::header`]): the fixed 44-byte header and its codec
/// - **Handles** ([`structs::handle`]): header plus borrowed sample source
pub mod structs;

/// Utility functions and supporting infrastructure.
///
/// - **Byte order** ([`utils::byteorder`]): little/big-endian writers
/// - **Error Handling** ([`utils::errors`]): Error types
/// - **Reading** ([`utils::reader`]): short-read tolerant buffer filling
pub mod utils;

#[cfg(test)]
mod testutil;

pub use process::CombineStats;
pub use process::validate::{Combination, Validator, check_compatible, validate};
pub use structs::handle::{AudioHandle, SampleSource, ValidatedAudio};
pub use structs::header::{FourCC, HEADER_LEN, Header, MONO, STEREO};
pub use utils::errors::{CombineError, CompatibilityError, DecodeError, Side, ValidationError};
