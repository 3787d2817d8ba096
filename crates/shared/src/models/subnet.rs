use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct SubnetInfo {
    pub netuid: u16,
    /// Blocks after registration during which a neuron cannot be deregistered
    pub immunity_period: u64,
}
