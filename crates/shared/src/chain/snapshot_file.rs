use super::ChainSnapshotSource;
use crate::models::{NeuronInfo, SubnetInfo};
use anyhow::{anyhow, Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct SubnetSnapshot {
    pub netuid: u16,
    pub immunity_period: u64,
    #[serde(default)]
    pub neurons: Vec<NeuronInfo>,
    /// uid -> block at registration
    #[serde(default)]
    pub registration_blocks: HashMap<u16, u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct ChainSnapshot {
    pub current_block: u64,
    #[serde(default)]
    pub subnets: Vec<SubnetSnapshot>,
}

/// Chain state captured ahead of time in a single JSON document.
#[derive(Debug, Clone)]
pub struct FileSnapshotSource {
    snapshot: ChainSnapshot,
}

impl FileSnapshotSource {
    pub fn from_snapshot(snapshot: ChainSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading chain snapshot from {path:?}");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot file {}", path.display()))?;
        let snapshot: ChainSnapshot = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse snapshot file {}", path.display()))?;
        debug!(
            "Loaded snapshot at block {} with {} subnets",
            snapshot.current_block,
            snapshot.subnets.len()
        );
        Ok(Self::from_snapshot(snapshot))
    }

    fn subnet(&self, netuid: u16) -> Result<&SubnetSnapshot> {
        self.snapshot
            .subnets
            .iter()
            .find(|subnet| subnet.netuid == netuid)
            .ok_or_else(|| anyhow!("Subnet {netuid} not found in snapshot"))
    }
}

impl ChainSnapshotSource for FileSnapshotSource {
    fn get_subnet_info(&self, netuid: u16) -> Result<SubnetInfo> {
        let subnet = self.subnet(netuid)?;
        Ok(SubnetInfo {
            netuid,
            immunity_period: subnet.immunity_period,
        })
    }

    fn get_node_list(&self, netuid: u16) -> Result<Vec<NeuronInfo>> {
        Ok(self.subnet(netuid)?.neurons.clone())
    }

    fn get_current_block(&self) -> Result<u64> {
        Ok(self.snapshot.current_block)
    }

    fn get_registration_block(&self, netuid: u16, uid: u16) -> Result<u64> {
        self.subnet(netuid)?
            .registration_blocks
            .get(&uid)
            .copied()
            .ok_or_else(|| anyhow!("No registration block for uid {uid} on subnet {netuid}"))
    }
}
