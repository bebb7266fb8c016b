use std::ops::ControlFlow;

use anyhow::{Context, Result};
use indicatif::MultiProgress;

use super::command::{Cli, CombineArgs};
use super::output::{PartialOutput, default_output_path, ensure_distinct};
use super::progress::create_progress_bar;
use crate::input::InputFile;
use pcmwav::process::concat::concat_with_progress;
use pcmwav::process::merge::merge_with_progress;
use pcmwav::{AudioHandle, CombineStats, Header};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Operation {
    Merge,
    Concat,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Operation::Merge => "merge",
            Operation::Concat => "concat",
        }
    }

    fn output_suffix(self) -> &'static str {
        match self {
            Operation::Merge => "merged",
            Operation::Concat => "concat",
        }
    }

    /// Payload bytes the operation is going to write.
    fn payload_estimate(self, first: &Header, second: &Header) -> u64 {
        match self {
            Operation::Merge => 2 * first.data_size.max(second.data_size) as u64,
            Operation::Concat => first.data_size as u64 + second.data_size as u64,
        }
    }
}

pub fn cmd_merge(args: &CombineArgs, cli: &Cli, multi: Option<&MultiProgress>) -> Result<()> {
    run(Operation::Merge, args, cli, multi)
}

pub fn cmd_concat(args: &CombineArgs, cli: &Cli, multi: Option<&MultiProgress>) -> Result<()> {
    run(Operation::Concat, args, cli, multi)
}

fn run(op: Operation, args: &CombineArgs, cli: &Cli, multi: Option<&MultiProgress>) -> Result<()> {
    let validator = cli.validator();
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.first, op.output_suffix()));
    ensure_distinct(&output_path, &[args.first.as_path(), args.second.as_path()])?;

    log::info!(
        "Running {} of {} and {} (strict mode: {})",
        op.name(),
        args.first.display(),
        args.second.display(),
        cli.strict
    );

    let mut first_input = InputFile::open(&args.first)?;
    let mut second_input = InputFile::open(&args.second)?;

    let mut first = AudioHandle::new(first_input.reader())
        .with_context(|| format!("Cannot read header of {}", args.first.display()))?
        .validate_with(&validator)
        .with_context(|| format!("{} is not a usable PCM WAVE file", args.first.display()))?;
    let mut second = AudioHandle::new(second_input.reader())
        .with_context(|| format!("Cannot read header of {}", args.second.display()))?
        .validate_with(&validator)
        .with_context(|| format!("{} is not a usable PCM WAVE file", args.second.display()))?;

    let total = op.payload_estimate(first.header(), second.header());
    let pb = multi
        .map(|m| create_progress_bar(m, total, op.name()))
        .transpose()?;

    let mut output = PartialOutput::create(&output_path, args.overwrite)?;
    log::info!("Output path: {}", output.path().display());

    let progress = |written: u64| {
        if let Some(pb) = &pb {
            pb.set_position(written);
        }
        ControlFlow::Continue(())
    };

    let result = match op {
        Operation::Merge => merge_with_progress(&mut first, &mut second, output.file(), progress),
        Operation::Concat => concat_with_progress(&mut first, &mut second, output.file(), progress),
    };
    let stats = result.with_context(|| format!("Failed to {} inputs", op.name()))?;
    output.commit()?;

    if let Some(pb) = pb {
        pb.finish_with_message(format!("{} done", op.name()));
    }

    report(&stats, &output_path);
    Ok(())
}

fn report(stats: &CombineStats, output_path: &std::path::Path) {
    log::info!(
        "Wrote {} ({} frames, {} payload bytes)",
        output_path.display(),
        stats.frames,
        stats.payload_bytes
    );
    if stats.padded_left > 0 {
        log::info!("Left channel padded with {} silent samples", stats.padded_left);
    }
    if stats.padded_right > 0 {
        log::info!("Right channel padded with {} silent samples", stats.padded_right);
    }
}
