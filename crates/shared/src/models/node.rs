use serde::{Deserialize, Serialize};
use std::fmt;

/// A single entry of a neuron's weight vector. `weight` is the raw on-chain
/// value, normalized so the largest entry of a vector is `u16::MAX`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct WeightEntry {
    pub uid: u16,
    pub weight: u16,
}

impl fmt::Display for WeightEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.uid, self.weight)
    }
}

/// Neuron as reported by the chain snapshot source. The registration block is
/// queried separately, see [`NodeRecord::from_neuron`].
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct NeuronInfo {
    pub uid: u16,
    pub ip_address: String,
    pub port: u16,
    #[serde(default)]
    pub axon_version: u32,
    /// Total stake in whole tokens
    pub stake: f64,
    pub last_update: u64,
    pub emission: f64,
    pub trust: f64,
    pub validator_trust: f64,
    pub coldkey: String,
    pub hotkey: String,
    #[serde(default)]
    pub weights: Vec<WeightEntry>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeRecord {
    pub uid: u16,
    pub ip_address: String,
    pub port: u16,
    pub axon_version: u32,
    pub stake: f64,
    pub last_update: u64,
    pub emission: f64,
    pub trust: f64,
    pub validator_trust: f64,
    pub coldkey: String,
    pub hotkey: String,
    pub registration_block: u64,
    pub weights: Vec<WeightEntry>,
}

impl NodeRecord {
    pub fn from_neuron(neuron: NeuronInfo, registration_block: u64) -> Self {
        let NeuronInfo {
            uid,
            ip_address,
            port,
            axon_version,
            stake,
            last_update,
            emission,
            trust,
            validator_trust,
            coldkey,
            hotkey,
            weights,
        } = neuron;

        Self {
            uid,
            ip_address,
            port,
            axon_version,
            stake,
            last_update,
            emission,
            trust,
            validator_trust,
            coldkey,
            hotkey,
            registration_block,
            weights,
        }
    }

    pub fn full_address(&self) -> String {
        format!("{}:{}", self.ip_address, self.port)
    }

    /// Index of the first weight entry targeting `uid`.
    pub fn weight_index(&self, uid: u16) -> Option<usize> {
        self.weights.iter().position(|entry| entry.uid == uid)
    }
}

/// Renders a weight vector as `[(uid, weight), ...]`.
pub fn format_weights(weights: &[WeightEntry]) -> String {
    let entries: Vec<String> = weights.iter().map(ToString::to_string).collect();
    format!("[{}]", entries.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neuron_json() -> &'static str {
        r#"{
            "uid": 7,
            "ip_address": "10.0.0.1",
            "port": 8091,
            "stake": 1500.25,
            "last_update": 990,
            "emission": 0.5,
            "trust": 0.9,
            "validator_trust": 0.8,
            "coldkey": "5Cold",
            "hotkey": "5Hot",
            "weights": [{"uid": 1, "weight": 21845}, {"uid": 3, "weight": 65535}]
        }"#
    }

    #[test]
    fn test_neuron_deserialize_defaults() {
        let neuron: NeuronInfo = serde_json::from_str(neuron_json()).unwrap();
        assert_eq!(neuron.uid, 7);
        assert_eq!(neuron.axon_version, 0);
        assert_eq!(neuron.weights.len(), 2);
        assert_eq!(neuron.weights[1].weight, u16::MAX);
    }

    #[test]
    fn test_fractional_weight_rejected() {
        let json = neuron_json().replace("21845", "0.25");
        assert!(serde_json::from_str::<NeuronInfo>(&json).is_err());
    }

    #[test]
    fn test_node_record_from_neuron() {
        let neuron: NeuronInfo = serde_json::from_str(neuron_json()).unwrap();
        let record = NodeRecord::from_neuron(neuron, 120);
        assert_eq!(record.registration_block, 120);
        assert_eq!(record.full_address(), "10.0.0.1:8091");
        assert_eq!(record.weight_index(3), Some(1));
        assert_eq!(record.weight_index(2), None);
    }

    #[test]
    fn test_weight_index_returns_first_match() {
        let record = NodeRecord {
            weights: vec![
                WeightEntry { uid: 4, weight: 100 },
                WeightEntry { uid: 4, weight: 200 },
            ],
            ..Default::default()
        };
        assert_eq!(record.weight_index(4), Some(0));
    }

    #[test]
    fn test_format_weights() {
        let weights = vec![
            WeightEntry { uid: 1, weight: 16384 },
            WeightEntry {
                uid: 2,
                weight: u16::MAX,
            },
        ];
        assert_eq!(format_weights(&weights), "[(1, 16384), (2, 65535)]");
        assert_eq!(format_weights(&[]), "[]");
    }
}
