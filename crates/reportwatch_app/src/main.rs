mod shell;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser};
use log::LevelFilter;
use reportwatch_core::Phase;
use reportwatch_logging::{watch_info, LogDestination};

use shell::config::AppConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// Submit a website to the SEO report service and follow the job until the report is ready.
struct Args {
    /// Base URL of the report service.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Seconds between status checks.
    #[arg(long = "interval-secs", value_name = "SECS")]
    interval_secs: Option<u64>,

    /// Path to a RON config file (defaults to ./reportwatch.ron when present).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Submit this URL, wait for the result and exit instead of prompting.
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Where to write logs: file, terminal or both.
    #[arg(long = "log", value_name = "DEST", default_value = "file")]
    log: LogDestination,

    /// Log debug output.
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    reportwatch_logging::initialize(args.log, level, None);

    let mut config = AppConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(secs) = args.interval_secs {
        config.poll_interval_secs = secs;
    }
    config.validate()?;
    watch_info!(
        "Starting with base_url={} interval={}s",
        config.base_url,
        config.poll_interval_secs
    );

    let one_shot = args.url.is_some();
    let phase = shell::run(&config, args.url)?;
    if one_shot && phase != Phase::Complete {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
