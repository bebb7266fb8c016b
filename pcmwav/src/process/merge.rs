use std::io::{BufReader, BufWriter, Write};
use std::ops::ControlFlow;

use log::debug;

use super::validate::{Combination, check_compatible};
use super::{
    COPY_BUFFER_LEN, CombineStats, PROGRESS_INTERVAL_FRAMES, combined_data_size, no_progress,
    report,
};
use crate::structs::handle::{SampleSource, ValidatedAudio};
use crate::structs::header::{Header, STEREO};
use crate::utils::errors::CombineError;
use crate::utils::reader::read_full;

/// Header of the stereo stream produced by interleaving `left` and `right`.
///
/// `data_size` is the sum of both input payloads.
pub fn interleaved_header(left: &Header, right: &Header) -> Header {
    Header::pcm(
        STEREO,
        left.sample_rate,
        left.bits_per_sample,
        combined_data_size(left.data_size, right.data_size),
    )
}

/// Interleaves two mono streams into `output`: left sample, then right sample.
///
/// The shorter input is padded with zero samples until both are exhausted.
pub fn merge<L, R, W>(
    left: &mut ValidatedAudio<'_, L>,
    right: &mut ValidatedAudio<'_, R>,
    output: &mut W,
) -> Result<CombineStats, CombineError>
where
    L: SampleSource + ?Sized,
    R: SampleSource + ?Sized,
    W: Write + ?Sized,
{
    merge_with_progress(left, right, output, no_progress)
}

/// [`merge`] with a callback receiving the number of payload bytes written,
/// every [`PROGRESS_INTERVAL_FRAMES`] frames and once more after the output is
/// flushed.
///
/// Returning `ControlFlow::Break` from the callback stops the merge on a frame
/// boundary with [`CombineError::Cancelled`].
pub fn merge_with_progress<L, R, W, F>(
    left: &mut ValidatedAudio<'_, L>,
    right: &mut ValidatedAudio<'_, R>,
    output: &mut W,
    mut progress: F,
) -> Result<CombineStats, CombineError>
where
    L: SampleSource + ?Sized,
    R: SampleSource + ?Sized,
    W: Write + ?Sized,
    F: FnMut(u64) -> ControlFlow<()>,
{
    check_compatible(left.header(), right.header(), Combination::Interleave)?;

    let sample_width = left.header().sample_width() as usize;
    if sample_width == 0 {
        return Err(CombineError::UnsupportedSampleWidth(
            left.header().bits_per_sample,
        ));
    }

    let header = interleaved_header(left.header(), right.header());
    debug!(
        "Interleaving {} + {} payload bytes at {} Hz, {} bits",
        left.header().data_size,
        right.header().data_size,
        header.sample_rate,
        header.bits_per_sample
    );

    let mut sink = BufWriter::with_capacity(COPY_BUFFER_LEN, output);
    header.write_to(&mut sink)?;

    left.rewind_payload()?;
    right.rewind_payload()?;
    let mut left_reader = BufReader::with_capacity(COPY_BUFFER_LEN, left.payload());
    let mut right_reader = BufReader::with_capacity(COPY_BUFFER_LEN, right.payload());

    let silence = vec![0u8; sample_width];
    let mut left_sample = vec![0u8; sample_width];
    let mut right_sample = vec![0u8; sample_width];
    let mut left_done = false;
    let mut right_done = false;
    let mut stats = CombineStats::default();

    loop {
        if !left_done {
            left_done = read_full(&mut left_reader, &mut left_sample)? < sample_width;
        }
        if !right_done {
            right_done = read_full(&mut right_reader, &mut right_sample)? < sample_width;
        }
        if left_done && right_done {
            break;
        }

        if left_done {
            sink.write_all(&silence)?;
            stats.padded_left += 1;
        } else {
            sink.write_all(&left_sample)?;
        }

        if right_done {
            sink.write_all(&silence)?;
            stats.padded_right += 1;
        } else {
            sink.write_all(&right_sample)?;
        }

        stats.frames += 1;
        stats.payload_bytes += 2 * sample_width as u64;
        if stats.frames % PROGRESS_INTERVAL_FRAMES == 0 {
            report(&mut progress, stats.payload_bytes)?;
        }
    }

    sink.flush()?;
    report(&mut progress, stats.payload_bytes)?;

    debug!(
        "Interleaved {} frames ({} left padded, {} right padded)",
        stats.frames, stats.padded_left, stats.padded_right
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::validate::Validator;
    use crate::structs::handle::AudioHandle;
    use crate::structs::header::{HEADER_LEN, MONO};
    use crate::testutil::{FailingSource, FailingWriter, mono16, samples16, wav};
    use crate::utils::errors::CompatibilityError;
    use std::io::Cursor;

    type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

    fn merged(left: &[i16], right: &[i16]) -> TestResult<(Vec<u8>, CombineStats)> {
        let mut l = mono16(8000, left);
        let mut r = mono16(8000, right);
        let mut l = AudioHandle::new(&mut l)?.validate()?;
        let mut r = AudioHandle::new(&mut r)?.validate()?;

        let mut out = Vec::new();
        let stats = l.merge(&mut r, &mut out)?;
        Ok((out, stats))
    }

    #[test]
    fn test_merge_equal_lengths_alternates_frames() -> TestResult {
        let left = [1i16, 2, 3, 4];
        let right = [-1i16, -2, -3, -4];
        let (out, stats) = merged(&left, &right)?;

        let payload = samples16(&out[HEADER_LEN..]);
        assert_eq!(payload.len(), 8);
        for (i, frame) in payload.chunks(2).enumerate() {
            assert_eq!(frame, [left[i], right[i]]);
        }
        assert_eq!(stats.frames, 4);
        assert_eq!(stats.padded_left + stats.padded_right, 0);
        Ok(())
    }

    #[test]
    fn test_merge_pads_shorter_left() -> TestResult {
        let (out, stats) = merged(&[10, 20], &[1, 2, 3, 4, 5])?;

        let payload = samples16(&out[HEADER_LEN..]);
        assert_eq!(payload, [10, 1, 20, 2, 0, 3, 0, 4, 0, 5]);
        assert_eq!(stats.frames, 5);
        assert_eq!(stats.padded_left, 3);
        assert_eq!(stats.padded_right, 0);
        Ok(())
    }

    #[test]
    fn test_merge_pads_shorter_right() -> TestResult {
        let (out, stats) = merged(&[7, 8, 9], &[])?;
        assert_eq!(samples16(&out[HEADER_LEN..]), [7, 0, 8, 0, 9, 0]);
        assert_eq!(stats.padded_right, 3);
        Ok(())
    }

    #[test]
    fn test_merge_header_fields() -> TestResult {
        let left: Vec<i16> = (0..100).collect();
        let right: Vec<i16> = (0..150).map(|v| v + 1000).collect();
        let (out, stats) = merged(&left, &right)?;

        let header = Header::decode(&mut Cursor::new(&out))?;
        assert_eq!(Validator::strict().validate(&header), Ok(()));
        assert_eq!(header.channels, STEREO);
        assert_eq!(header.sample_rate, 8000);
        assert_eq!(header.bits_per_sample, 16);
        assert_eq!(header.data_size, (100 + 150) * 2);
        assert_eq!(header.riff_size, 36 + header.data_size);
        assert_eq!(header.block_align, 4);
        assert_eq!(header.byte_rate, 32000);

        assert_eq!(stats.frames, 150);
        assert_eq!(stats.padded_left, 50);
        assert_eq!(out.len(), HEADER_LEN + 150 * 4);

        let payload = samples16(&out[HEADER_LEN..]);
        assert_eq!(&payload[198..202], [99, 1099, 0, 1100]);
        assert!(payload[200..].chunks(2).all(|f| f[0] == 0));
        Ok(())
    }

    #[test]
    fn test_merge_24bit_frames() -> TestResult {
        let mut l = wav(MONO, 48000, 24, &[1, 2, 3, 4, 5, 6]);
        let mut r = wav(MONO, 48000, 24, &[9, 9, 9]);
        let mut left = AudioHandle::new(&mut l)?.validate()?;
        let mut right = AudioHandle::new(&mut r)?.validate()?;

        let mut out = Vec::new();
        merge(&mut left, &mut right, &mut out)?;
        assert_eq!(
            &out[HEADER_LEN..],
            [1, 2, 3, 9, 9, 9, 4, 5, 6, 0, 0, 0]
        );
        Ok(())
    }

    #[test]
    fn test_merge_pads_partial_trailing_sample() -> TestResult {
        let mut l = wav(MONO, 8000, 16, &[1, 0, 2, 0, 3]);
        let mut r = wav(MONO, 8000, 16, &[5, 0, 6, 0, 7, 0]);
        let mut left = AudioHandle::new(&mut l)?.validate()?;
        let mut right = AudioHandle::new(&mut r)?.validate()?;

        let mut out = Vec::new();
        let stats = merge(&mut left, &mut right, &mut out)?;
        assert_eq!(samples16(&out[HEADER_LEN..]), [1, 5, 2, 6, 0, 7]);
        assert_eq!(stats.padded_left, 1);
        Ok(())
    }

    #[test]
    fn test_merge_rewinds_inputs() -> TestResult {
        let mut l = mono16(8000, &[1, 2]);
        let mut r = mono16(8000, &[3, 4]);
        let mut left = AudioHandle::new(&mut l)?.validate()?;
        let mut right = AudioHandle::new(&mut r)?.validate()?;

        let mut first = Vec::new();
        let mut second = Vec::new();
        left.merge(&mut right, &mut first)?;
        left.merge(&mut right, &mut second)?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_merge_rejects_mismatched_inputs() -> TestResult {
        let mut l = mono16(8000, &[1, 2]);
        let mut r = mono16(16000, &[3, 4]);
        let mut left = AudioHandle::new(&mut l)?.validate()?;
        let mut right = AudioHandle::new(&mut r)?.validate()?;

        let mut out = Vec::new();
        let err = left.merge(&mut right, &mut out).unwrap_err();
        assert!(matches!(
            err,
            CombineError::Compatibility(CompatibilityError::SampleRateMismatch { .. })
        ));
        assert!(out.is_empty());
        Ok(())
    }

    #[test]
    fn test_merge_rejects_sub_byte_samples() -> TestResult {
        let mut l = wav(MONO, 8000, 4, &[0x12]);
        let mut r = wav(MONO, 8000, 4, &[0x34]);
        let mut left = AudioHandle::new(&mut l)?.validate()?;
        let mut right = AudioHandle::new(&mut r)?.validate()?;

        let err = left.merge(&mut right, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CombineError::UnsupportedSampleWidth(4)));
        Ok(())
    }

    #[test]
    fn test_merge_cancellation() -> TestResult {
        let samples = vec![1i16; 3 * PROGRESS_INTERVAL_FRAMES as usize];
        let mut l = mono16(8000, &samples);
        let mut r = mono16(8000, &samples);
        let mut left = AudioHandle::new(&mut l)?.validate()?;
        let mut right = AudioHandle::new(&mut r)?.validate()?;

        let mut calls = 0;
        let err = merge_with_progress(&mut left, &mut right, &mut Vec::new(), |_| {
            calls += 1;
            if calls == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap_err();

        let expected = 2 * PROGRESS_INTERVAL_FRAMES * 4;
        assert!(matches!(err, CombineError::Cancelled { written } if written == expected));
        Ok(())
    }

    #[test]
    fn test_merge_reports_final_total() -> TestResult {
        let mut l = mono16(8000, &[1, 2, 3]);
        let mut r = mono16(8000, &[4]);
        let mut left = AudioHandle::new(&mut l)?.validate()?;
        let mut right = AudioHandle::new(&mut r)?.validate()?;

        let mut seen = Vec::new();
        merge_with_progress(&mut left, &mut right, &mut Vec::new(), |n| {
            seen.push(n);
            ControlFlow::Continue(())
        })?;
        assert_eq!(seen, [12]);
        Ok(())
    }

    #[test]
    fn test_merge_break_on_final_report_cancels() -> TestResult {
        let mut l = mono16(8000, &[1]);
        let mut r = mono16(8000, &[2]);
        let mut left = AudioHandle::new(&mut l)?.validate()?;
        let mut right = AudioHandle::new(&mut r)?.validate()?;

        let err = merge_with_progress(&mut left, &mut right, &mut Vec::new(), |_| {
            ControlFlow::Break(())
        })
        .unwrap_err();
        assert!(matches!(err, CombineError::Cancelled { written: 4 }));
        Ok(())
    }

    #[test]
    fn test_merge_propagates_write_error() -> TestResult {
        let mut l = mono16(8000, &[1, 2, 3]);
        let mut r = mono16(8000, &[4, 5, 6]);
        let mut left = AudioHandle::new(&mut l)?.validate()?;
        let mut right = AudioHandle::new(&mut r)?.validate()?;

        let mut calls = 0;
        let mut sink = FailingWriter::after(HEADER_LEN + 6);
        let err = merge_with_progress(&mut left, &mut right, &mut sink, |_| {
            calls += 1;
            ControlFlow::Continue(())
        })
        .unwrap_err();
        assert!(matches!(err, CombineError::Io(_)));
        assert_eq!(calls, 0);
        Ok(())
    }

    #[test]
    fn test_merge_propagates_read_error() -> TestResult {
        let mut l = mono16(8000, &[1, 2, 3]);
        let mut r = FailingSource::after(mono16(8000, &[4, 5, 6]), HEADER_LEN as u64 + 2);
        let mut left = AudioHandle::new(&mut l)?.validate()?;
        let mut right = AudioHandle::new(&mut r)?.validate()?;

        let mut out = Vec::new();
        let err = left.merge(&mut right, &mut out).unwrap_err();
        assert!(matches!(err, CombineError::Io(_)));
        assert!(out.len() < HEADER_LEN + 12);
        Ok(())
    }
}
