use shared::models::node::format_weights;
use shared::models::NodeRecord;
use std::collections::HashMap;
use std::io::{self, Write};

use super::metrics::elapsed_blocks;

/// A weight set on a tracked uid by `source_uid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreEntry {
    pub weight: u16,
    pub source_uid: u16,
}

/// Incoming weights per tracked uid.
///
/// Iteration yields uids in the order they received their first weight,
/// then the tracked uids nobody weighted, in tracking order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightScores {
    tracked: Vec<u16>,
    first_scored: Vec<u16>,
    scores: HashMap<u16, Vec<ScoreEntry>>,
}

impl WeightScores {
    fn track(&mut self, uid: u16) {
        if !self.scores.contains_key(&uid) {
            self.tracked.push(uid);
            self.scores.insert(uid, Vec::new());
        }
    }

    fn record(&mut self, target_uid: u16, entry: ScoreEntry) {
        if let Some(entries) = self.scores.get_mut(&target_uid) {
            if entries.is_empty() {
                self.first_scored.push(target_uid);
            }
            entries.push(entry);
        }
    }

    fn sort_descending(&mut self) {
        for entries in self.scores.values_mut() {
            entries.sort_by(|a, b| b.weight.cmp(&a.weight));
        }
    }

    pub fn get(&self, uid: u16) -> Option<&[ScoreEntry]> {
        self.scores.get(&uid).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &[ScoreEntry])> + '_ {
        let never_scored = self
            .tracked
            .iter()
            .filter(|uid| !self.first_scored.contains(uid));
        self.first_scored
            .iter()
            .chain(never_scored)
            .map(|uid| (*uid, self.get(*uid).unwrap_or_default()))
    }
}

/// Builds the inbound weight ranking for every node matching `is_tracked`.
///
/// Nodes are scanned in listing order. A node is tracked from the moment it is
/// reached, so weights set by earlier nodes on it are not counted.
pub fn analyze_weights<F>(nodes: &[NodeRecord], is_tracked: F) -> WeightScores
where
    F: Fn(&NodeRecord) -> bool,
{
    let mut scores = WeightScores::default();

    for node in nodes {
        if is_tracked(node) {
            scores.track(node.uid);
        }

        for index in 0..scores.tracked.len() {
            let tracked_uid = scores.tracked[index];
            if let Some(position) = node.weight_index(tracked_uid) {
                scores.record(
                    tracked_uid,
                    ScoreEntry {
                        weight: node.weights[position].weight,
                        source_uid: node.uid,
                    },
                );
            }
        }
    }

    scores.sort_descending();
    scores
}

/// Writes the raw weight vectors of notable nodes followed by the per-uid
/// score lists.
pub fn write_weight_dump<W: Write>(
    out: &mut W,
    nodes: &[NodeRecord],
    current_block: u64,
    notable_stake_threshold: f64,
    scores: &WeightScores,
) -> io::Result<()> {
    writeln!(out, "{:<10}{:<15}", "uid", "weights")?;
    for node in nodes.iter().filter(|n| n.stake > notable_stake_threshold) {
        let elapsed = elapsed_blocks(node.uid, current_block, node.last_update);
        writeln!(
            out,
            "{:<10}{:<15}{}",
            node.uid,
            elapsed,
            format_weights(&node.weights)
        )?;
    }

    for (uid, entries) in scores.iter() {
        writeln!(out, "Scores for uid: {uid}")?;
        for entry in entries {
            writeln!(out, "({}, {})", entry.weight, entry.source_uid)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::WeightEntry;

    fn node(uid: u16, coldkey: &str, weights: &[(u16, u16)]) -> NodeRecord {
        NodeRecord {
            uid,
            coldkey: coldkey.to_string(),
            weights: weights
                .iter()
                .map(|(uid, weight)| WeightEntry {
                    uid: *uid,
                    weight: *weight,
                })
                .collect(),
            ..Default::default()
        }
    }

    fn has_coldkey(node: &NodeRecord) -> bool {
        !node.coldkey.is_empty()
    }

    #[test]
    fn test_scores_sorted_descending() {
        let nodes = vec![
            node(5, "mine", &[]),
            node(2, "", &[(5, 45875)]),
            node(3, "", &[(5, 58982)]),
            node(4, "", &[]),
        ];
        let scores = analyze_weights(&nodes, has_coldkey);
        assert_eq!(
            scores.get(5).unwrap(),
            &[
                ScoreEntry {
                    weight: 58982,
                    source_uid: 3
                },
                ScoreEntry {
                    weight: 45875,
                    source_uid: 2
                },
            ]
        );
    }

    #[test]
    fn test_weights_before_tracking_are_ignored() {
        let nodes = vec![
            node(0, "", &[(2, 400)]),
            node(1, "", &[(2, 600)]),
            node(2, "mine", &[(2, 100)]),
            node(3, "", &[(2, 300)]),
        ];
        let scores = analyze_weights(&nodes, has_coldkey);
        let sources: Vec<u16> = scores.get(2).unwrap().iter().map(|e| e.source_uid).collect();
        assert_eq!(sources, vec![3, 2]);
    }

    #[test]
    fn test_tracked_uid_without_weights_is_empty() {
        let nodes = vec![node(0, "mine", &[]), node(1, "", &[(4, u16::MAX)])];
        let scores = analyze_weights(&nodes, has_coldkey);
        let order: Vec<u16> = scores.iter().map(|(uid, _)| uid).collect();
        assert_eq!(order, vec![0]);
        assert!(scores.get(0).unwrap().is_empty());
        assert!(scores.get(1).is_none());
    }

    #[test]
    fn test_ties_keep_append_order() {
        let nodes = vec![
            node(9, "mine", &[]),
            node(1, "", &[(9, 500)]),
            node(2, "", &[(9, 500)]),
            node(3, "", &[(9, 800)]),
        ];
        let scores = analyze_weights(&nodes, has_coldkey);
        let sources: Vec<u16> = scores.get(9).unwrap().iter().map(|e| e.source_uid).collect();
        assert_eq!(sources, vec![3, 1, 2]);
    }

    #[test]
    fn test_only_first_matching_entry_counts() {
        let nodes = vec![node(0, "mine", &[]), node(1, "", &[(0, 200), (0, 900)])];
        let scores = analyze_weights(&nodes, has_coldkey);
        assert_eq!(scores.get(0).unwrap().len(), 1);
        assert_eq!(scores.get(0).unwrap()[0].weight, 200);
    }

    #[test]
    fn test_iteration_puts_scored_uids_first() {
        let nodes = vec![
            node(4, "a", &[]),
            node(1, "b", &[]),
            node(7, "c", &[]),
            node(8, "", &[(7, 300), (1, 200)]),
        ];
        let scores = analyze_weights(&nodes, has_coldkey);
        let order: Vec<u16> = scores.iter().map(|(uid, _)| uid).collect();
        assert_eq!(order, vec![1, 7, 4]);
    }

    #[test]
    fn test_first_scored_order_follows_listing() {
        let nodes = vec![
            node(3, "a", &[]),
            node(5, "b", &[(5, 10)]),
            node(6, "", &[(3, 20)]),
        ];
        let scores = analyze_weights(&nodes, has_coldkey);
        let order: Vec<u16> = scores.iter().map(|(uid, _)| uid).collect();
        assert_eq!(order, vec![5, 3]);
    }

    #[test]
    fn test_unscored_uid_printed_after_scored_ones() {
        let nodes = vec![node(4, "mine", &[]), node(7, "mine", &[]), node(8, "", &[(7, 32768)])];
        let scores = analyze_weights(&nodes, has_coldkey);
        let mut out = Vec::new();
        write_weight_dump(&mut out, &nodes, 100, 1000.0, &scores).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().skip(1).collect();
        assert_eq!(
            lines,
            vec!["Scores for uid: 7", "(32768, 8)", "Scores for uid: 4"]
        );
    }

    #[test]
    fn test_write_weight_dump() {
        let mut nodes = vec![
            node(0, "mine", &[(1, 21845)]),
            node(1, "", &[(0, 65535), (1, 21845)]),
        ];
        nodes[0].stake = 10.0;
        nodes[1].stake = 2000.0;
        nodes[1].last_update = 90;

        let scores = analyze_weights(&nodes, has_coldkey);
        let mut out = Vec::new();
        write_weight_dump(&mut out, &nodes, 100, 1000.0, &scores).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "uid       weights        ",
                "1         10             [(0, 65535), (1, 21845)]",
                "Scores for uid: 0",
                "(65535, 1)",
            ]
        );
    }
}
