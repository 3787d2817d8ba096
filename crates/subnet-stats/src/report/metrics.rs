use log::warn;
use shared::models::NodeRecord;
use std::collections::HashSet;

/// Per-node row of the report. `rank` stays 0 until the bucket is sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStats {
    pub rank: usize,
    pub full_address: String,
    pub uid: u16,
    pub axon_version: u32,
    pub elapsed_blocks: u64,
    pub stake: f64,
    pub emission: f64,
    pub trust: f64,
    pub validator_trust: f64,
    pub coldkey: String,
    pub hotkey: String,
    pub since_registration: String,
    pub is_own: bool,
    pub is_immune: bool,
    pub is_duplicate_ip: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainContext {
    pub current_block: u64,
    pub immunity_period: u64,
    pub seconds_per_block: u64,
}

/// Derives report rows for one run. Nodes must be fed in listing order, the
/// duplicate address check depends on it.
pub struct MetricDeriver<'a> {
    context: ChainContext,
    local_coldkeys: &'a HashSet<String>,
    key_abbreviation: Option<usize>,
    seen_addresses: HashSet<String>,
}

impl<'a> MetricDeriver<'a> {
    pub fn new(
        context: ChainContext,
        local_coldkeys: &'a HashSet<String>,
        key_abbreviation: Option<usize>,
    ) -> Self {
        Self {
            context,
            local_coldkeys,
            key_abbreviation,
            seen_addresses: HashSet::new(),
        }
    }

    pub fn derive(&mut self, node: &NodeRecord) -> NodeStats {
        let ChainContext {
            current_block,
            immunity_period,
            seconds_per_block,
        } = self.context;

        let since_registration_blocks =
            elapsed_blocks(node.uid, current_block, node.registration_block);
        let is_duplicate_ip = !self.seen_addresses.insert(node.ip_address.clone());

        NodeStats {
            rank: 0,
            full_address: node.full_address(),
            uid: node.uid,
            axon_version: node.axon_version,
            elapsed_blocks: elapsed_blocks(node.uid, current_block, node.last_update),
            stake: node.stake,
            emission: node.emission,
            trust: node.trust,
            validator_trust: node.validator_trust,
            coldkey: mask_key(&node.coldkey, self.key_abbreviation),
            hotkey: mask_key(&node.hotkey, self.key_abbreviation),
            since_registration: prettify_time(
                since_registration_blocks.saturating_mul(seconds_per_block),
            ),
            is_own: self.local_coldkeys.contains(&node.coldkey),
            is_immune: is_immune(node.registration_block, immunity_period, current_block),
            is_duplicate_ip,
        }
    }
}

/// Blocks between `since` and `current_block`, clamped to 0 for a snapshot
/// that is behind the node's own data.
pub fn elapsed_blocks(uid: u16, current_block: u64, since: u64) -> u64 {
    if since > current_block {
        warn!("uid {uid}: block {since} is ahead of current block {current_block}, clamping to 0");
        return 0;
    }
    current_block - since
}

/// Formats seconds as `DDd:HHh:MMm`, dropping leftover seconds.
pub fn prettify_time(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;
    format!("{days:02}d:{hours:02}h:{minutes:02}m")
}

pub fn is_immune(registration_block: u64, immunity_period: u64, current_block: u64) -> bool {
    registration_block.saturating_add(immunity_period) > current_block
}

/// First `abbreviation` characters of `key`, or the whole key.
pub fn mask_key(key: &str, abbreviation: Option<usize>) -> String {
    match abbreviation {
        Some(len) => key.chars().take(len).collect(),
        None => key.to_string(),
    }
}
