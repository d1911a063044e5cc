use anyhow::Result;
use clap::Parser as ClapParser;
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;

use cli::command::{Cli, Commands, LogFormat};
use cli::info::cmd_info;
use cli::tags::cmd_tags;

mod cli;
mod input;
mod report;
pub(crate) mod timestamp;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let multi = MultiProgress::new();

    let pb = init_logging(&cli, &multi)?.then_some(&multi);
    log::debug!("Parse policy: {:?}", cli.parse_policy());

    match cli.command {
        Commands::Info(ref args) => cmd_info(args, &cli, pb),
        Commands::Tags(ref args) => cmd_tags(args, &cli),
    }
}

/// Installs the global logger. Returns whether log output is routed through
/// the progress bars.
fn init_logging(cli: &Cli, multi: &MultiProgress) -> Result<bool> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(cli.loglevel.to_level_filter());

    match cli.log_format {
        LogFormat::Plain => {
            builder.format_timestamp_secs();
        }
        LogFormat::Json => {
            builder.format(|buf, record| {
                use std::io::Write;
                writeln!(
                    buf,
                    "{{\"ts\":\"{}\",\"lvl\":\"{}\",\"target\":\"{}\",\"msg\":{:?}}}",
                    buf.timestamp(),
                    record.level(),
                    record.target(),
                    record.args().to_string()
                )
            });
        }
    }

    if cli.progress {
        LogWrapper::new(multi.clone(), builder.build()).try_init()?;
    } else {
        builder.try_init()?;
    }

    Ok(cli.progress)
}
