use std::io::{self, Read, Write};
use std::ops::ControlFlow;

use log::warn;

use crate::utils::errors::CombineError;

/// Header and cross-stream checks.
///
/// Provides the [`Validator`](validate::Validator) and
/// [`check_compatible`](validate::check_compatible), which must pass before
/// two handles are combined.
pub mod validate;

/// Interleaving two mono streams into one stereo stream.
pub mod merge;

/// Appending one stream to another of the same format.
pub mod concat;

/// Buffer size used for reading inputs and writing the output.
pub const COPY_BUFFER_LEN: usize = 64 * 1024;

/// Number of output frames between two progress callbacks while interleaving.
pub const PROGRESS_INTERVAL_FRAMES: u64 = 16 * 1024;

/// Outcome of a merge or concat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombineStats {
    /// Frames written to the output.
    pub frames: u64,
    pub payload_bytes: u64,
    /// Zero frames written in place of an exhausted left (or first) input.
    pub padded_left: u64,
    /// Zero frames written in place of an exhausted right (or second) input.
    pub padded_right: u64,
}

/// Progress callback that never cancels.
pub fn no_progress(_written: u64) -> ControlFlow<()> {
    ControlFlow::Continue(())
}

/// Forwards `written` to the callback and turns a `Break` into
/// [`CombineError::Cancelled`].
pub(crate) fn report<F>(progress: &mut F, written: u64) -> Result<(), CombineError>
where
    F: FnMut(u64) -> ControlFlow<()>,
{
    match progress(written) {
        ControlFlow::Continue(()) => Ok(()),
        ControlFlow::Break(()) => Err(CombineError::Cancelled { written }),
    }
}

/// Sum of two payload sizes as stored in a 32-bit header field.
pub(crate) fn combined_data_size(left: u32, right: u32) -> u32 {
    left.checked_add(right).unwrap_or_else(|| {
        warn!("Combined data size {left} + {right} overflows 32 bits, header size will wrap");
        left.wrapping_add(right)
    })
}

/// Copies `reader` into `writer` in [`COPY_BUFFER_LEN`] chunks, reporting the
/// running total (offset by `written`) after every chunk.
pub(crate) fn copy_with_progress<R, W, F>(
    reader: &mut R,
    writer: &mut W,
    written: &mut u64,
    progress: &mut F,
) -> Result<u64, CombineError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
    F: FnMut(u64) -> ControlFlow<()>,
{
    let mut buffer = vec![0u8; COPY_BUFFER_LEN];
    let mut copied = 0u64;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        writer.write_all(&buffer[..n])?;
        copied += n as u64;
        *written += n as u64;
        report(progress, *written)?;
    }

    Ok(copied)
}

/// Writes `count` zero bytes to `writer`, reporting like [`copy_with_progress`].
pub(crate) fn pad_with_zeros<W, F>(
    writer: &mut W,
    count: u64,
    written: &mut u64,
    progress: &mut F,
) -> Result<(), CombineError>
where
    W: Write + ?Sized,
    F: FnMut(u64) -> ControlFlow<()>,
{
    let zeros = [0u8; 4096];
    let mut remaining = count;

    while remaining > 0 {
        let n = remaining.min(zeros.len() as u64) as usize;
        writer.write_all(&zeros[..n])?;
        remaining -= n as u64;
        *written += n as u64;
        report(progress, *written)?;
    }

    Ok(())
}
