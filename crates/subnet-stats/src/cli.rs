use anyhow::{bail, Result};
use clap::Parser;
use log::{debug, warn};
use shared::chain::{ChainSnapshotSource, FileSnapshotSource, HttpSnapshotSource};
use shared::wallet::{default_wallet_path, list_local_coldkeys};
use std::collections::HashSet;
use std::io;
use std::path::PathBuf;

use crate::config::ReportConfig;
use crate::report::render::SortKey;
use crate::report::{write_subnet_report, ReportOptions};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The chain subnet uid
    #[arg(long, default_value = "0")]
    pub netuid: u16,

    /// Show the validator weights
    #[arg(long, default_value = "false")]
    pub weights: bool,

    /// Show the full hot and cold keys
    #[arg(long = "long_key", alias = "long-key", default_value = "false")]
    pub long_key: bool,

    /// Sort order of both tables
    #[arg(long, value_enum, default_value_t = SortKey::Emission)]
    pub sort: SortKey,

    /// Decimal places of stake, emission and trust
    #[arg(long, default_value = "5")]
    pub round: u32,

    /// JSON chain snapshot file
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Base URL of a JSON chain snapshot gateway
    /// Ignored when --snapshot is given
    #[arg(long = "snapshot_url", alias = "snapshot-url")]
    pub snapshot_url: Option<String>,

    /// Directory holding the local wallets
    /// Defaults to ~/.bittensor/wallets
    #[arg(long = "wallet_path", alias = "wallet-path")]
    pub wallet_path: Option<PathBuf>,

    /// In weight mode, only rank incoming weights of uids owned by a local wallet
    #[arg(long = "own_only", alias = "own-only", default_value = "false")]
    pub own_only: bool,

    /// Optional: TOML file overriding report thresholds
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(short = 'l', long = "log_level", alias = "log-level", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config = match &self.config {
            Some(path) => ReportConfig::load(path)?,
            None => ReportConfig::default(),
        };

        let source = self.snapshot_source()?;

        let local_coldkeys = match self.wallet_path.clone().or_else(default_wallet_path) {
            Some(path) => list_local_coldkeys(&path)?,
            None => {
                warn!("Could not resolve a wallet path, no uid will be marked as own");
                HashSet::new()
            }
        };
        debug!("Found {} local coldkeys", local_coldkeys.len());

        let options = ReportOptions {
            netuid: self.netuid,
            weights: self.weights,
            long_key: self.long_key,
            sort: self.sort,
            round: self.round,
            own_only: self.own_only,
            config,
        };

        let stdout = io::stdout();
        let mut out = stdout.lock();
        write_subnet_report(source.as_ref(), &options, &local_coldkeys, &mut out)?;
        Ok(())
    }

    fn snapshot_source(&self) -> Result<Box<dyn ChainSnapshotSource>> {
        if let Some(path) = &self.snapshot {
            return Ok(Box::new(FileSnapshotSource::load(path)?));
        }
        if let Some(url) = &self.snapshot_url {
            return Ok(Box::new(HttpSnapshotSource::new(url)?));
        }
        bail!("No chain source given, pass --snapshot or --snapshot_url")
    }
}
