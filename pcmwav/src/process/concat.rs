use std::io::{BufWriter, Write};
use std::ops::ControlFlow;

use log::{debug, warn};

use super::validate::{Combination, check_compatible};
use super::{
    COPY_BUFFER_LEN, CombineStats, combined_data_size, copy_with_progress, no_progress,
    pad_with_zeros, report,
};
use crate::structs::handle::{SampleSource, ValidatedAudio};
use crate::structs::header::{DATA, FMT, Header, RIFF, WAVE, riff_size_for};
use crate::utils::errors::CombineError;

/// Header of `first` followed by `second`.
///
/// The format fields, `block_align` and `byte_rate` included, are taken from
/// `first` unchanged; only the size fields are recomputed.
pub fn appended_header(first: &Header, second: &Header) -> Header {
    let data_size = combined_data_size(first.data_size, second.data_size);
    Header {
        riff_tag: RIFF,
        riff_size: riff_size_for(data_size),
        wave_tag: WAVE,
        fmt_tag: FMT,
        data_tag: DATA,
        data_size,
        ..first.clone()
    }
}

/// Writes the payload of `first` and then the payload of `second` to `output`,
/// behind a header describing both.
pub fn concat<L, R, W>(
    first: &mut ValidatedAudio<'_, L>,
    second: &mut ValidatedAudio<'_, R>,
    output: &mut W,
) -> Result<CombineStats, CombineError>
where
    L: SampleSource + ?Sized,
    R: SampleSource + ?Sized,
    W: Write + ?Sized,
{
    concat_with_progress(first, second, output, no_progress)
}

/// [`concat`] with a callback receiving the number of payload bytes written
/// after every copied chunk and once more after the output is flushed.
/// `ControlFlow::Break` aborts with [`CombineError::Cancelled`].
///
/// A payload shorter than its declared `data_size` is padded with zeros up to
/// that size.
pub fn concat_with_progress<L, R, W, F>(
    first: &mut ValidatedAudio<'_, L>,
    second: &mut ValidatedAudio<'_, R>,
    output: &mut W,
    mut progress: F,
) -> Result<CombineStats, CombineError>
where
    L: SampleSource + ?Sized,
    R: SampleSource + ?Sized,
    W: Write + ?Sized,
    F: FnMut(u64) -> ControlFlow<()>,
{
    check_compatible(first.header(), second.header(), Combination::Append)?;

    let header = appended_header(first.header(), second.header());
    debug!(
        "Appending {} payload bytes to {} ({} ch, {} Hz, {} bits)",
        second.header().data_size,
        first.header().data_size,
        header.channels,
        header.sample_rate,
        header.bits_per_sample
    );

    let mut sink = BufWriter::with_capacity(COPY_BUFFER_LEN, output);
    header.write_to(&mut sink)?;

    first.rewind_payload()?;
    second.rewind_payload()?;

    let mut written = 0u64;
    let copied = copy_with_progress(&mut first.payload(), &mut sink, &mut written, &mut progress)?;
    let padded_left = fill_short(&mut sink, "first", copied, first.header(), &mut written, &mut progress)?;
    let copied = copy_with_progress(&mut second.payload(), &mut sink, &mut written, &mut progress)?;
    let padded_right = fill_short(&mut sink, "second", copied, second.header(), &mut written, &mut progress)?;

    sink.flush()?;
    report(&mut progress, written)?;

    let frames = frames_in(written, header.block_align);
    debug!("Appended streams into {frames} frames ({written} payload bytes)");

    Ok(CombineStats {
        frames,
        payload_bytes: written,
        padded_left,
        padded_right,
    })
}

fn frames_in(bytes: u64, block_align: u16) -> u64 {
    match block_align {
        0 => 0,
        align => bytes / align as u64,
    }
}

/// Pads a payload that ended before its declared size with zeros, so the
/// stream written after it starts at the offset the header implies.
///
/// Returns the number of frames that were not fully copied.
fn fill_short<W, F>(
    sink: &mut W,
    name: &str,
    copied: u64,
    header: &Header,
    written: &mut u64,
    progress: &mut F,
) -> Result<u64, CombineError>
where
    W: Write + ?Sized,
    F: FnMut(u64) -> ControlFlow<()>,
{
    let declared = header.data_size as u64;
    if copied >= declared {
        return Ok(0);
    }

    warn!("{name} payload ended after {copied} of {declared} declared bytes, padding with silence");
    pad_with_zeros(sink, declared - copied, written, progress)?;
    Ok(frames_in(declared, header.block_align) - frames_in(copied, header.block_align))
}
