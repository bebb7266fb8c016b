use std::path::PathBuf;

use clap::{Args, Parser as ClapParser, Subcommand, ValueEnum};

#[derive(Debug, ClapParser)]
#[command(
    name         = env!("CARGO_PKG_NAME"),
    version      = env!("CARGO_PKG_VERSION"),
    long_version = concat!(
        env!("CARGO_PKG_VERSION"),
        " (pcmwav ", env!("PCMWAV_VERSION"),
        ", built ", env!("BUILD_TIMESTAMP"), ")"
    ),
    author       = env!("CARGO_PKG_AUTHORS"),
    about        = "Tools for inspecting, interleaving and concatenating PCM WAVE files",
    long_about   = None,
)]
pub struct Cli {
    /// Set the log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub loglevel: LogLevel,

    /// Treat inconsistent derived header fields as validation errors.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Show progress bars during operations.
    #[arg(long, global = true)]
    pub progress: bool,

    /// Choose an operation to perform.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print header fields and derived stream information.
    Info(InfoArgs),

    /// Check that files are canonical PCM WAVE files.
    Validate(ValidateArgs),

    /// Interleave two mono files into one stereo file (first input is the left channel).
    Merge(CombineArgs),

    /// Append the second file to the first.
    Concat(CombineArgs),
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Input WAVE file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Plain)]
    pub format: ReportFormat,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Input WAVE files.
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CombineArgs {
    /// First input (left channel for merge).
    #[arg(value_name = "FIRST")]
    pub first: PathBuf,

    /// Second input (right channel for merge).
    #[arg(value_name = "SECOND")]
    pub second: PathBuf,

    /// Output file. Defaults to a name derived from the first input.
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Replace the output file if it already exists.
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    /// Disable logging output.
    Off,
    /// No output except errors.
    Error,
    /// Show warnings and errors.
    Warn,
    /// Show info, warnings and errors (default).
    Info,
    /// Show debug, info, warnings and errors.
    Debug,
    /// Show all log messages including trace.
    Trace,
}

impl LogLevel {
    /// Convert LogLevel to log::LevelFilter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Colorized human-readable text.
    Plain,
    /// Structured JSON per log record.
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum ReportFormat {
    /// Aligned text table.
    Plain,
    /// YAML document.
    Yaml,
    /// JSON object.
    Json,
}

impl Cli {
    /// Validator honouring `--strict`.
    pub fn validator(&self) -> pcmwav::Validator {
        if self.strict {
            pcmwav::Validator::strict()
        } else {
            pcmwav::Validator::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_merge_with_output() {
        let cli = Cli::try_parse_from([
            "pcmwavd", "--strict", "merge", "left.wav", "right.wav", "-o", "call.wav",
        ])
        .unwrap();

        assert!(cli.strict);
        match cli.command {
            Commands::Merge(args) => {
                assert_eq!(args.first, PathBuf::from("left.wav"));
                assert_eq!(args.second, PathBuf::from("right.wav"));
                assert_eq!(args.output, Some(PathBuf::from("call.wav")));
                assert!(!args.overwrite);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_validate_requires_input() {
        assert!(Cli::try_parse_from(["pcmwavd", "validate"]).is_err());
    }

    #[test]
    fn test_strict_validator_fail_level() {
        let cli = Cli::try_parse_from(["pcmwavd", "info", "a.wav", "--strict"]).unwrap();
        assert_eq!(cli.validator().fail_level(), log::Level::Warn);
    }
}
