pub mod node;
pub mod subnet;

pub use node::NeuronInfo;
pub use node::NodeRecord;
pub use node::WeightEntry;
pub use subnet::SubnetInfo;
