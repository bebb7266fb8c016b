use anyhow::{Context, Result};
use serde::Serialize;

use super::command::{Cli, InfoArgs, ReportFormat};
use crate::input::InputFile;
use pcmwav::{AudioHandle, Header, Validator};

pub fn cmd_info(args: &InfoArgs, cli: &Cli) -> Result<()> {
    let mut input = InputFile::open(&args.input)?;
    log::info!("Inspecting WAVE file: {}", input.path().display());

    let header = AudioHandle::new(input.reader())
        .with_context(|| format!("Cannot read header of {}", args.input.display()))?
        .header()
        .clone();

    let report = HeaderReport::new(&header, input.file_size(), &cli.validator());

    match args.format {
        ReportFormat::Plain => print_plain(&report),
        ReportFormat::Yaml => print!("{}", serde_yaml_ng::to_string(&report)?),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct HeaderReport {
    riff_tag: String,
    riff_size: u32,
    wave_tag: String,
    fmt_tag: String,
    fmt_size: u32,
    audio_format: u16,
    channels: u16,
    sample_rate: u32,
    byte_rate: u32,
    block_align: u16,
    bits_per_sample: u16,
    data_tag: String,
    data_size: u32,
    frames: u64,
    duration: String,
    file_size: u64,
    trailing_bytes: i64,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl HeaderReport {
    fn new(header: &Header, file_size: u64, validator: &Validator) -> Self {
        let error = validator.validate(header).err().map(|e| e.to_string());
        let expected_len = header.riff_size as u64 + 8;

        Self {
            riff_tag: header.riff_tag.0.escape_ascii().to_string(),
            riff_size: header.riff_size,
            wave_tag: header.wave_tag.0.escape_ascii().to_string(),
            fmt_tag: header.fmt_tag.0.escape_ascii().to_string(),
            fmt_size: header.fmt_size,
            audio_format: header.audio_format,
            channels: header.channels,
            sample_rate: header.sample_rate,
            byte_rate: header.byte_rate,
            block_align: header.block_align,
            bits_per_sample: header.bits_per_sample,
            data_tag: header.data_tag.0.escape_ascii().to_string(),
            data_size: header.data_size,
            frames: header.frame_count(),
            duration: duration_str(header.duration_secs()),
            file_size,
            trailing_bytes: file_size as i64 - expected_len as i64,
            valid: error.is_none(),
            error,
        }
    }
}

fn print_plain(r: &HeaderReport) {
    println!();
    println!("WAVE Header");
    println!("  Container                 \"{}\" ({} bytes)", r.riff_tag, r.riff_size);
    println!("  Format                    \"{}\"", r.wave_tag);
    println!("  Format chunk              \"{}\" ({} bytes)", r.fmt_tag, r.fmt_size);
    println!("  Audio format              {}", r.audio_format);
    println!("  Channels                  {}", r.channels);
    println!("  Sampling rate             {} Hz", r.sample_rate);
    println!("  Byte rate                 {} B/s", r.byte_rate);
    println!("  Block align               {} bytes", r.block_align);
    println!("  Bits per sample           {}", r.bits_per_sample);
    println!("  Data chunk                \"{}\" ({} bytes)", r.data_tag, r.data_size);
    println!();
    println!("Stream Information");
    println!("  Frames                    {}", r.frames);
    println!("  Duration                  {}", r.duration);
    println!("  File size                 {} bytes", r.file_size);
    if r.trailing_bytes != 0 {
        println!(
            "  Size mismatch             {:+} bytes relative to the RIFF size",
            r.trailing_bytes
        );
    }
    match &r.error {
        None => println!("  Valid                     yes"),
        Some(e) => println!("  Valid                     no ({e})"),
    }
    println!();
}

/// Formats seconds as `HH:MM:SS.mmm`.
fn duration_str(secs: f64) -> String {
    let total_ms = (secs * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = total_ms / 60_000 % 60;
    let seconds = total_ms / 1000 % 60;
    let millis = total_ms % 1000;

    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcmwav::{MONO, STEREO, ValidationError};

    #[test]
    fn test_duration_str() {
        assert_eq!(duration_str(0.0), "00:00:00.000");
        assert_eq!(duration_str(1.5), "00:00:01.500");
        assert_eq!(duration_str(3_723.25), "01:02:03.250");
        assert_eq!(duration_str(360_000.0), "100:00:00.000");
    }

    #[test]
    fn test_report_for_valid_header() {
        let header = Header::pcm(STEREO, 48000, 16, 192_000);
        let report = HeaderReport::new(&header, 192_044, &Validator::default());

        assert!(report.valid);
        assert_eq!(report.frames, 48000);
        assert_eq!(report.duration, "00:00:01.000");
        assert_eq!(report.trailing_bytes, 0);
        assert_eq!(report.riff_tag, "RIFF");
    }

    #[test]
    fn test_report_carries_validation_error() {
        let mut header = Header::pcm(MONO, 8000, 16, 100);
        header.audio_format = 3;
        let report = HeaderReport::new(&header, 100, &Validator::default());

        assert!(!report.valid);
        let expected = ValidationError::NotPcm {
            fmt_size: 16,
            audio_format: 3,
        };
        assert_eq!(report.error, Some(expected.to_string()));
        assert_eq!(report.trailing_bytes, -44);
    }

    #[test]
    fn test_report_serializes_to_yaml() {
        let header = Header::pcm(MONO, 8000, 8, 8000);
        let report = HeaderReport::new(&header, 8044, &Validator::default());
        let yaml = serde_yaml_ng::to_string(&report).unwrap();

        assert!(yaml.contains("sample_rate: 8000"));
        assert!(yaml.contains("valid: true"));
        assert!(!yaml.contains("error"));
    }
}
