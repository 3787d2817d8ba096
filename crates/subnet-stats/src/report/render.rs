use shared::utils::decimal::{format_decimal, round_decimal};
use std::io::{self, Write};
use tabled::settings::{Alignment, Padding, Style};
use tabled::{Table, Tabled};

use super::classify::RoleBucket;
use super::metrics::NodeStats;

const COLUMN_PADDING: usize = 2;
const SUMMARY_LABEL_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortKey {
    /// Emission first, trust breaks ties
    #[default]
    Emission,
    /// Trust first, emission breaks ties
    Trust,
}

impl SortKey {
    fn keys(self, stats: &NodeStats) -> (f64, f64) {
        match self {
            SortKey::Emission => (stats.emission, stats.trust),
            SortKey::Trust => (stats.trust, stats.emission),
        }
    }
}

pub fn round_stats(stats: &mut [NodeStats], places: u32) {
    for row in stats {
        row.stake = round_decimal(row.stake, places);
        row.emission = round_decimal(row.emission, places);
        row.trust = round_decimal(row.trust, places);
        row.validator_trust = round_decimal(row.validator_trust, places);
    }
}

/// Stable descending sort on `sort_key`, then dense 1-based ranks.
pub fn sort_and_rank(stats: &mut [NodeStats], sort_key: SortKey) {
    stats.sort_by(|a, b| {
        let (a_primary, a_secondary) = sort_key.keys(a);
        let (b_primary, b_secondary) = sort_key.keys(b);
        b_primary
            .total_cmp(&a_primary)
            .then_with(|| b_secondary.total_cmp(&a_secondary))
    });
    for (index, row) in stats.iter_mut().enumerate() {
        row.rank = index + 1;
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        "✅"
    } else {
        "❌"
    }
}

/// One table line; field names are the column headers.
#[derive(Tabled)]
struct StatsRow {
    rank: usize,
    full_address: String,
    uid: u16,
    axon: u32,
    last_update: u64,
    stake: String,
    emission: String,
    trust: String,
    vtrust: String,
    coldkey: String,
    hotkey: String,
    since_reg: String,
    mine: &'static str,
    immune: &'static str,
    duplicate_ip: &'static str,
}

impl From<&NodeStats> for StatsRow {
    fn from(stats: &NodeStats) -> Self {
        Self {
            rank: stats.rank,
            full_address: stats.full_address.clone(),
            uid: stats.uid,
            axon: stats.axon_version,
            last_update: stats.elapsed_blocks,
            stake: format_decimal(stats.stake),
            emission: format_decimal(stats.emission),
            trust: format_decimal(stats.trust),
            vtrust: format_decimal(stats.validator_trust),
            coldkey: stats.coldkey.clone(),
            hotkey: stats.hotkey.clone(),
            since_reg: stats.since_registration.clone(),
            mine: flag(stats.is_own),
            immune: flag(stats.is_immune),
            duplicate_ip: flag(stats.is_duplicate_ip),
        }
    }
}

/// Borderless, left-justified columns as wide as their longest cell (header
/// included) plus two spaces.
fn apply_layout(table: &mut Table) -> &mut Table {
    table
        .with(Style::empty())
        .with(Alignment::left())
        .with(Padding::new(0, COLUMN_PADDING, 0, 0))
}

/// Writes the header line and one line per row. An empty slice still gets
/// its header.
pub fn write_stats_table<W: Write>(out: &mut W, stats: &[NodeStats]) -> io::Result<()> {
    let mut table = Table::new(stats.iter().map(StatsRow::from));
    apply_layout(&mut table);
    writeln!(out, "{table}")
}

/// Sum of the displayed emissions, `None` for an empty bucket.
fn emission_total(stats: &[NodeStats]) -> Option<f64> {
    if stats.is_empty() {
        return None;
    }
    Some(stats.iter().map(|row| row.emission).sum())
}

fn format_total(total: Option<f64>, multiplier: f64) -> String {
    match total {
        Some(total) => format_decimal(total * multiplier),
        None => "0".to_string(),
    }
}

pub fn write_summary<W: Write>(
    out: &mut W,
    buckets: &RoleBucket,
    epochs_per_day: u32,
) -> io::Result<()> {
    let validator_total = emission_total(&buckets.validators);
    let miner_total = emission_total(&buckets.miners);
    let per_day = f64::from(epochs_per_day);

    let lines = [
        ("[Validators] Active", buckets.validators.len().to_string()),
        ("[Miners]     Active", buckets.miners.len().to_string()),
        (
            "[Validators] Emissions ~/epoch",
            format_total(validator_total, 1.0),
        ),
        ("[Miners]     Emissions ~/epoch", format_total(miner_total, 1.0)),
        (
            "[Validators] Emissions ~/day",
            format_total(validator_total, per_day),
        ),
        ("[Miners]     Emissions ~/day", format_total(miner_total, per_day)),
    ];

    for (label, value) in lines {
        writeln!(out, "{label:<SUMMARY_LABEL_WIDTH$}{value}")?;
    }
    Ok(())
}
