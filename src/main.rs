use anyhow::Result;
use clap::Parser as ClapParser;
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;

use cli::command::{Cli, Commands, LogFormat};
use cli::combine::{cmd_concat, cmd_merge};
use cli::info::cmd_info;
use cli::validate::cmd_validate;

mod cli;
mod input;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let base_level = cli.loglevel.to_level_filter();

    let multi = MultiProgress::new();

    let mut env_builder = env_logger::Builder::from_default_env();
    env_builder.filter_level(base_level);
    match cli.log_format {
        LogFormat::Plain => {
            env_builder.format_timestamp_secs();
        }
        LogFormat::Json => {
            env_builder.format(|buf, record| {
                use std::io::Write;
                writeln!(
                    buf,
                    "{{\"ts\":\"{}\",\"lvl\":\"{}\",\"target\":{},\"msg\":{}}}",
                    buf.timestamp(),
                    record.level(),
                    serde_json::Value::from(record.target()),
                    serde_json::Value::from(record.args().to_string())
                )
            });
        }
    }

    let pb = if cli.progress {
        let logger = env_builder.build();
        let level = logger.filter();
        LogWrapper::new(multi.clone(), logger).try_init()?;
        log::set_max_level(level);
        Some(&multi)
    } else {
        env_builder.try_init()?;
        None
    };

    match cli.command {
        Commands::Info(ref args) => cmd_info(args, &cli)?,
        Commands::Validate(ref args) => cmd_validate(args, &cli)?,
        Commands::Merge(ref args) => cmd_merge(args, &cli, pb)?,
        Commands::Concat(ref args) => cmd_concat(args, &cli, pb)?,
    }

    Ok(())
}
