use std::path::Path;

use anyhow::{Context, Result, bail};

use super::command::{Cli, ValidateArgs};
use crate::input::InputFile;
use pcmwav::{AudioHandle, Validator};

pub fn cmd_validate(args: &ValidateArgs, cli: &Cli) -> Result<()> {
    let validator = cli.validator();
    let mut failed = 0usize;

    for path in &args.inputs {
        match validate_file(path, &validator) {
            Ok(()) => log::info!("{}: valid PCM WAVE", path.display()),
            Err(e) => {
                log::error!("{}: {e:#}", path.display());
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} files failed validation", args.inputs.len());
    }

    Ok(())
}

fn validate_file(path: &Path, validator: &Validator) -> Result<()> {
    let mut input = InputFile::open(path)?;
    let handle = AudioHandle::new(input.reader()).context("Cannot read header")?;
    let validated = handle.validate_with(validator)?;

    let header = validated.header();
    log::debug!(
        "{}: {} ch, {} Hz, {} bits, {} frames",
        path.display(),
        header.channels,
        header.sample_rate,
        header.bits_per_sample,
        header.frame_count()
    );

    Ok(())
}
