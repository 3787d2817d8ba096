pub mod http;
pub mod snapshot_file;

use crate::models::{NeuronInfo, SubnetInfo};
use anyhow::Result;

pub use http::HttpSnapshotSource;
pub use snapshot_file::{ChainSnapshot, FileSnapshotSource, SubnetSnapshot};

/// Read-only view of the chain state needed to build a subnet report.
pub trait ChainSnapshotSource {
    /// Subnet parameters such as the immunity period
    fn get_subnet_info(&self, netuid: u16) -> Result<SubnetInfo>;

    /// All neurons of the subnet, in uid order
    fn get_node_list(&self, netuid: u16) -> Result<Vec<NeuronInfo>>;

    fn get_current_block(&self) -> Result<u64>;

    /// Block at which `uid` was registered on `netuid`
    fn get_registration_block(&self, netuid: u16, uid: u16) -> Result<u64>;
}
