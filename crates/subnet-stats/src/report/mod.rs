pub mod classify;
pub mod metrics;
pub mod render;
pub mod weights;

use log::{debug, info};
use shared::chain::ChainSnapshotSource;
use shared::models::{NodeRecord, SubnetInfo};
use std::collections::HashSet;
use std::io::Write;

use crate::config::ReportConfig;
use crate::error::ReportError;
use classify::{classify_nodes, RoleBucket};
use metrics::{ChainContext, MetricDeriver, NodeStats};
use render::{round_stats, sort_and_rank, write_stats_table, write_summary, SortKey};
use weights::{analyze_weights, write_weight_dump};

#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub netuid: u16,
    /// Dump validator weights and rank incoming weights per tracked uid
    pub weights: bool,
    /// Show full hot and cold keys
    pub long_key: bool,
    pub sort: SortKey,
    /// Decimal places of stake, emission and trust columns
    pub round: u32,
    /// Only track uids owned by a local wallet in weight mode
    pub own_only: bool,
    pub config: ReportConfig,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            netuid: 0,
            weights: false,
            long_key: false,
            sort: SortKey::Emission,
            round: 5,
            own_only: false,
            config: ReportConfig::default(),
        }
    }
}

/// Everything fetched from the chain for one report.
#[derive(Debug, Clone, PartialEq)]
pub struct SubnetData {
    pub subnet: SubnetInfo,
    pub current_block: u64,
    pub nodes: Vec<NodeRecord>,
}

/// Fetches subnet parameters, the neuron list and every neuron's
/// registration block, one request per neuron.
pub fn collect_subnet_data<S>(source: &S, netuid: u16) -> Result<SubnetData, ReportError>
where
    S: ChainSnapshotSource + ?Sized,
{
    let subnet = source
        .get_subnet_info(netuid)
        .map_err(ReportError::Source)?;
    let neurons = source.get_node_list(netuid).map_err(ReportError::Source)?;
    let current_block = source.get_current_block().map_err(ReportError::Source)?;

    let mut nodes = Vec::with_capacity(neurons.len());
    for neuron in neurons {
        let registration_block = source
            .get_registration_block(netuid, neuron.uid)
            .map_err(ReportError::Source)?;
        nodes.push(NodeRecord::from_neuron(neuron, registration_block));
    }

    info!(
        "Collected {} neurons on subnet {netuid} at block {current_block}",
        nodes.len()
    );
    Ok(SubnetData {
        subnet,
        current_block,
        nodes,
    })
}

/// Derives, classifies, rounds, sorts and ranks every node of the subnet.
pub fn build_role_buckets(
    data: &SubnetData,
    options: &ReportOptions,
    local_coldkeys: &HashSet<String>,
) -> RoleBucket {
    let config = &options.config;
    let context = ChainContext {
        current_block: data.current_block,
        immunity_period: data.subnet.immunity_period,
        seconds_per_block: config.seconds_per_block,
    };
    let key_abbreviation = (!options.long_key).then_some(config.key_abbreviation);

    // duplicate addresses are detected in listing order, before classification
    let mut deriver = MetricDeriver::new(context, local_coldkeys, key_abbreviation);
    let stats: Vec<NodeStats> = data.nodes.iter().map(|node| deriver.derive(node)).collect();

    let mut buckets = classify_nodes(stats, config.validator_stake_threshold);
    debug!(
        "Classified {} validators and {} miners",
        buckets.validators.len(),
        buckets.miners.len()
    );

    for bucket in [&mut buckets.validators, &mut buckets.miners] {
        if config.round_before_sort {
            round_stats(bucket, options.round);
            sort_and_rank(bucket, options.sort);
        } else {
            sort_and_rank(bucket, options.sort);
            round_stats(bucket, options.round);
        }
    }
    buckets
}

/// Runs the whole report against `source` and writes it to `out`.
///
/// Output already written stays written when a later step fails.
pub fn write_subnet_report<S, W>(
    source: &S,
    options: &ReportOptions,
    local_coldkeys: &HashSet<String>,
    out: &mut W,
) -> Result<(), ReportError>
where
    S: ChainSnapshotSource + ?Sized,
    W: Write,
{
    writeln!(out, "Subnet: {}", options.netuid)?;

    let data = collect_subnet_data(source, options.netuid)?;

    if options.weights {
        let scores = analyze_weights(&data.nodes, |node| {
            if options.own_only {
                local_coldkeys.contains(&node.coldkey)
            } else {
                !node.coldkey.is_empty()
            }
        });
        write_weight_dump(
            out,
            &data.nodes,
            data.current_block,
            options.config.notable_stake_threshold,
            &scores,
        )?;
    }

    let buckets = build_role_buckets(&data, options, local_coldkeys);

    writeln!(out, "\nValidators:\n")?;
    write_stats_table(out, &buckets.validators)?;

    writeln!(out, "\nMiners:\n")?;
    write_stats_table(out, &buckets.miners)?;

    writeln!(out)?;
    write_summary(out, &buckets, options.config.epochs_per_day)?;
    out.flush()?;
    Ok(())
}
