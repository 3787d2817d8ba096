use clap::Parser;
use log::{error, warn, LevelFilter};

use subnet_stats::Cli;

fn main() {
    let cli = Cli::parse();
    let log_level = match cli.log_level.as_str() {
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    };
    env_logger::Builder::new()
        .filter_level(log_level.unwrap_or(LevelFilter::Info))
        .filter_module("reqwest", LevelFilter::Warn)
        .filter_module("hyper", LevelFilter::Warn)
        .format_timestamp(None)
        .init();

    if log_level.is_none() {
        warn!("invalid log level: {}, using info", cli.log_level);
    }

    // a failed report is logged, never turned into a failing exit code
    if let Err(e) = cli.run() {
        error!("Failed to generate subnet report: {e:#}");
        error!("{e:?}");
    }
}
