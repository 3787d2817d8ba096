use super::metrics::NodeStats;

#[derive(Debug, Clone, PartialEq)]
pub struct RoleBucket {
    pub validators: Vec<NodeStats>,
    pub miners: Vec<NodeStats>,
}

/// Splits nodes into validators (stake strictly above `threshold`) and
/// miners, keeping the input order within each bucket.
pub fn classify_nodes(nodes: Vec<NodeStats>, threshold: f64) -> RoleBucket {
    let (validators, miners): (Vec<NodeStats>, Vec<NodeStats>) = nodes
        .into_iter()
        .partition(|node| node.stake > threshold);
    RoleBucket { validators, miners }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(uid: u16, stake: f64) -> NodeStats {
        NodeStats {
            rank: 0,
            full_address: format!("10.0.0.{uid}:8091"),
            uid,
            axon_version: 0,
            elapsed_blocks: 0,
            stake,
            emission: 0.0,
            trust: 0.0,
            validator_trust: 0.0,
            coldkey: String::new(),
            hotkey: String::new(),
            since_registration: "00d:00h:00m".to_string(),
            is_own: false,
            is_immune: false,
            is_duplicate_ip: false,
        }
    }

    fn uids(nodes: &[NodeStats]) -> Vec<u16> {
        nodes.iter().map(|n| n.uid).collect()
    }

    #[test]
    fn test_partition_covers_every_node_once() {
        let nodes: Vec<NodeStats> = (0..20).map(|uid| node(uid, uid as f64 * 100.0)).collect();
        let bucket = classify_nodes(nodes, 1024.0);

        assert_eq!(bucket.validators.len() + bucket.miners.len(), 20);
        for validator in &bucket.validators {
            assert!(!bucket.miners.iter().any(|m| m.uid == validator.uid));
        }
    }

    #[test]
    fn test_threshold_tie_goes_to_miner() {
        let bucket = classify_nodes(vec![node(0, 1024.0), node(1, 1024.000001)], 1024.0);
        assert_eq!(uids(&bucket.miners), vec![0]);
        assert_eq!(uids(&bucket.validators), vec![1]);
    }

    #[test]
    fn test_order_preserved() {
        let bucket = classify_nodes(
            vec![node(0, 5000.0), node(1, 1.0), node(2, 3000.0), node(3, 2.0)],
            1024.0,
        );
        assert_eq!(uids(&bucket.validators), vec![0, 2]);
        assert_eq!(uids(&bucket.miners), vec![1, 3]);
    }

    #[test]
    fn test_empty_input() {
        let bucket = classify_nodes(Vec::new(), 1024.0);
        assert!(bucket.validators.is_empty());
        assert!(bucket.miners.is_empty());
    }
}
