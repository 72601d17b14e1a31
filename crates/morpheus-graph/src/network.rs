// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Morpheus Self-Organizing Network
// ─────────────────────────────────────────────────────────────────────
//! Three-phase tick:
//!   1. Refresh: fresh distinct non-self edges, fresh local state
//!   2. Rewire: per node, evict the least stable neighbour for a random
//!      candidate, judged by the ensemble engine
//!   3. Walk: reinforced random walk from node 0 that mutates the local
//!      edge weights
//!
//! Nodes live in a flat arena and refer to each other by index. The
//! network owns its random source; every draw of a tick comes from it.

use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use morpheus_ensemble::rank;
use morpheus_types::{EnsembleSample, MorpheusError, MorpheusResult, NetworkConfig};

use crate::node::Node;

/// Log entry for one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    /// Nodes whose least stable edge was replaced by the candidate.
    pub rewired: usize,
    /// Nodes with no eligible candidate (out-degree already saturated).
    pub skipped: usize,
    /// Halve-and-round events during the walk.
    pub renormalizations: usize,
    /// Edge weights incremented during the walk.
    pub reinforcements: usize,
    /// Node the walk ended on.
    pub final_node: usize,
    /// Walk visits per node.
    pub visits: Vec<u32>,
}

/// Self-organizing, index-addressed graph.
pub struct Network {
    pub(crate) cfg: NetworkConfig,
    pub(crate) nodes: Vec<Node>,
    rng: ChaCha8Rng,
    tick_count: u64,
}

impl Network {
    /// Build a network with default walk and rewiring parameters.
    ///
    /// Rejects `node_count < 2` and `width >= node_count`.
    pub fn new(width: usize, embedding: usize, node_count: usize) -> MorpheusResult<Self> {
        Self::with_config(NetworkConfig::new(width, embedding, node_count))
    }

    pub fn with_config(config: NetworkConfig) -> MorpheusResult<Self> {
        config.validate()?;
        let nodes = (0..config.node_count)
            .map(|_| Node::new(config.width, config.embedding))
            .collect();
        let mut network = Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            nodes,
            tick_count: 0,
            cfg: config,
        };
        // Establish the edge invariants before the first tick.
        network.refresh();
        Ok(network)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &NetworkConfig {
        &self.cfg
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn width(&self) -> usize {
        self.cfg.width
    }

    pub fn embedding_width(&self) -> usize {
        self.cfg.embedding
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// First `width` values of a node.
    pub fn local_state(&self, index: usize) -> Option<&[f64]> {
        self.nodes.get(index).map(|n| &n.values[..self.cfg.width])
    }

    /// Embedding payload of a node.
    pub fn embedding_of(&self, index: usize) -> Option<&[f64]> {
        self.nodes.get(index).map(|n| &n.values[self.cfg.width..])
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Every node has exactly `width` distinct, in-range, non-self edges
    /// and `width + embedding` values.
    pub fn verify(&self) -> bool {
        let n = self.nodes.len();
        self.nodes.iter().enumerate().all(|(i, node)| {
            node.edges.len() == self.cfg.width
                && node.values.len() == self.cfg.width + self.cfg.embedding
                && node.edges_valid(i, n)
        })
    }

    // ------------------------------------------------------------------
    // Embedding payload
    // ------------------------------------------------------------------

    /// Store an externally observed feature vector in a node's embedding
    /// slot, L1-normalized. An all-zero vector is stored as zeros.
    pub fn write_embedding(&mut self, index: usize, features: &[f64]) -> MorpheusResult<()> {
        let width = self.cfg.width;
        let embedding = self.cfg.embedding;
        if features.len() != embedding {
            return Err(MorpheusError::Validation(format!(
                "embedding payload has {} values, expected {embedding}",
                features.len()
            )));
        }
        if features.iter().any(|v| !v.is_finite()) {
            return Err(MorpheusError::Numerical(
                "embedding payload contains NaN or Inf".to_string(),
            ));
        }
        let node_count = self.nodes.len();
        let node = self.nodes.get_mut(index).ok_or_else(|| {
            MorpheusError::Validation(format!(
                "node index {index} out of range for {node_count} nodes"
            ))
        })?;

        let sum: f64 = features.iter().map(|v| v.abs()).sum();
        let slot = &mut node.values[width..];
        if sum > 0.0 {
            for (dst, &src) in slot.iter_mut().zip(features) {
                *dst = src / sum;
            }
        } else {
            slot.copy_from_slice(features);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// Run refresh, rewire and walk to completion.
    pub fn tick(&mut self) -> MorpheusResult<TickReport> {
        let mut report = TickReport {
            tick: self.tick_count,
            visits: vec![0; self.nodes.len()],
            ..Default::default()
        };

        // 1. Refresh
        self.refresh();

        // 2. Stability-driven rewiring
        let (rewired, skipped) = self.rewire()?;
        report.rewired = rewired;
        report.skipped = skipped;

        // 3. Reinforced random walk
        self.walk(&mut report);

        log::debug!(
            "tick {}: rewired {}, skipped {}, renormalized {}, reinforced {}, ended at {}",
            report.tick,
            report.rewired,
            report.skipped,
            report.renormalizations,
            report.reinforcements,
            report.final_node,
        );
        self.tick_count += 1;
        Ok(report)
    }

    /// Run multiple ticks.
    pub fn run(&mut self, ticks: usize) -> MorpheusResult<Vec<TickReport>> {
        let mut reports = Vec::with_capacity(ticks);
        for _ in 0..ticks {
            reports.push(self.tick()?);
        }
        Ok(reports)
    }

    fn refresh(&mut self) {
        let n = self.nodes.len();
        let width = self.cfg.width;
        let range = self.cfg.state_range;
        for (i, node) in self.nodes.iter_mut().enumerate() {
            // Sample among the n-1 other nodes, skipping over i.
            let picks = index::sample(&mut self.rng, n - 1, width);
            for (edge, k) in node.edges.iter_mut().zip(picks.iter()) {
                *edge = if k >= i { k + 1 } else { k };
            }
            for v in node.values[..width].iter_mut() {
                *v = self.rng.gen_range(0..range) as f64;
            }
        }
    }

    /// Random node that is neither `index` nor already an edge target.
    fn draw_candidate(&mut self, index: usize) -> Option<usize> {
        let n = self.nodes.len();
        if self.cfg.width + 1 >= n {
            return None;
        }
        loop {
            let c = self.rng.gen_range(0..n);
            if c != index && !self.nodes[index].edges.contains(&c) {
                return Some(c);
            }
        }
    }

    fn rewire(&mut self) -> MorpheusResult<(usize, usize)> {
        let width = self.cfg.width;
        let config = self.cfg.rewire_ensemble();
        let policy = self.cfg.rewire_policy;
        let mut rewired = 0;
        let mut skipped = 0;

        for i in 0..self.nodes.len() {
            let Some(candidate) = self.draw_candidate(i) else {
                skipped += 1;
                continue;
            };

            // Neighbours, then the candidate, then the node itself.
            let mut samples: Vec<EnsembleSample<usize>> = Vec::with_capacity(width + 2);
            for &target in &self.nodes[i].edges {
                samples.push(EnsembleSample::new(
                    target,
                    self.nodes[target].values.clone(),
                ));
            }
            samples.push(EnsembleSample::new(
                candidate,
                self.nodes[candidate].values.clone(),
            ));
            samples.push(EnsembleSample::new(i, self.nodes[i].values.clone()));

            let seed: u64 = self.rng.gen();
            rank(seed, &config, &policy, &mut samples)?;

            if let Some(slot) =
                replace_unstable_edge(&mut self.nodes[i].edges, &samples, candidate)
            {
                log::trace!(
                    "node {i}: edge {slot} -> {candidate}, stddev {:.6}",
                    samples[slot].stddev
                );
                rewired += 1;
            }
        }
        Ok((rewired, skipped))
    }

    fn walk(&mut self, report: &mut TickReport) {
        let width = self.cfg.width;
        let limit = self.cfg.saturation_limit;
        let mut previous: Option<usize> = None;
        let mut current = 0;

        for _ in 0..self.cfg.walk_steps {
            report.visits[current] += 1;
            let node = &mut self.nodes[current];

            // a. Saturating renormalization
            let local = &mut node.values[..width];
            if local.iter().any(|&v| v > limit) {
                for v in local.iter_mut() {
                    *v = (*v / 2.0).round();
                }
                report.renormalizations += 1;
            }

            // b. Weighted slot draw; zero total falls back to uniform
            let sum: f64 = local.iter().sum();
            let slot = if sum > 0.0 {
                let threshold = self.rng.gen_range(0.0..sum);
                let mut total = 0.0;
                local
                    .iter()
                    .position(|&w| {
                        total += w;
                        threshold < total
                    })
                    .unwrap_or(width - 1)
            } else {
                self.rng.gen_range(0..width)
            };

            // c. Reinforce the edge back to where we came from
            if let Some(k) = previous.and_then(|p| node.slot_of(p)) {
                node.values[k] += 1.0;
                report.reinforcements += 1;
            }

            // d. Advance
            previous = Some(current);
            current = node.edges[slot];
        }
        report.final_node = current;
    }
}

/// Swap the least stable edge for `candidate`.
///
/// `samples` holds the edge targets, then the candidate, then the node
/// itself, with stddev already ranked. Only the edge slots and the
/// candidate's slot compete; the candidate winning leaves `edges` as is.
/// Returns the replaced slot.
fn replace_unstable_edge(
    edges: &mut [usize],
    samples: &[EnsembleSample<usize>],
    candidate: usize,
) -> Option<usize> {
    let width = edges.len();
    let slot = EnsembleSample::most_unstable(&samples[..=width]);
    if slot == width {
        return None;
    }
    edges[slot] = candidate;
    Some(slot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Network {
        Network::with_config(NetworkConfig {
            walk_steps: 256,
            rewire_iterations: 4,
            ..NetworkConfig::new(3, 6, 6)
        })
        .unwrap()
    }

    #[test]
    fn test_rejects_single_node() {
        assert!(matches!(
            Network::new(1, 4, 1),
            Err(MorpheusError::Config(_))
        ));
        assert!(Network::new(1, 4, 0).is_err());
    }

    #[test]
    fn test_rejects_width_at_node_count() {
        assert!(Network::new(4, 4, 4).is_err());
    }

    #[test]
    fn test_invariants_after_construction() {
        let net = Network::new(4, 32, 8).unwrap();
        assert!(net.verify());
        assert_eq!(net.node_count(), 8);
        assert_eq!(net.tick_count(), 0);
    }

    #[test]
    fn test_refresh_state_range() {
        let mut net = small();
        net.refresh();
        for i in 0..net.node_count() {
            for &v in net.local_state(i).unwrap() {
                assert!((0.0..256.0).contains(&v));
                assert_eq!(v, v.trunc());
            }
        }
        assert!(net.verify());
    }

    #[test]
    fn test_invariants_after_ticks() {
        let mut net = Network::new(4, 32, 8).unwrap();
        for _ in 0..3 {
            let report = net.tick().unwrap();
            assert!(net.verify());
            assert_eq!(report.rewired + report.skipped, 8);
        }
        assert_eq!(net.tick_count(), 3);
    }

    #[test]
    fn test_invariants_two_nodes() {
        let mut net = Network::new(1, 2, 2).unwrap();
        let report = net.tick().unwrap();
        assert!(net.verify());
        assert_eq!(net.node(0).unwrap().edges(), &[1]);
        assert_eq!(net.node(1).unwrap().edges(), &[0]);
        assert_eq!(report.skipped, 2);
    }

    #[test]
    fn test_saturated_out_degree_skips_rewire() {
        let mut net = Network::new(3, 4, 4).unwrap();
        let report = net.tick().unwrap();
        assert_eq!(report.skipped, 4);
        assert_eq!(report.rewired, 0);
        assert!(net.verify());
    }

    #[test]
    fn test_deterministic_ticks() {
        let mut a = small();
        let mut b = small();
        let ra = a.run(2).unwrap();
        let rb = b.run(2).unwrap();
        assert_eq!(ra, rb);
        assert_eq!(a.nodes(), b.nodes());
    }

    #[test]
    fn test_seed_changes_graph() {
        let mut a = small();
        let mut b = Network::with_config(NetworkConfig {
            seed: 2,
            ..a.config().clone()
        })
        .unwrap();
        a.tick().unwrap();
        b.tick().unwrap();
        assert_ne!(a.nodes(), b.nodes());
    }

    #[test]
    fn test_walk_visits_total() {
        let mut net = small();
        let report = net.tick().unwrap();
        let total: u32 = report.visits.iter().sum();
        assert_eq!(total as usize, net.config().walk_steps);
        assert!(report.visits[0] >= 1);
        assert!(report.final_node < net.node_count());
    }

    #[test]
    fn test_walk_saturation_halves() {
        let mut net = small();
        for v in net.nodes[0].values[..3].iter_mut() {
            *v = 250.0;
        }
        let mut report = TickReport {
            visits: vec![0; net.node_count()],
            ..Default::default()
        };
        net.walk(&mut report);
        assert!(report.renormalizations >= 1);
        assert!(net.nodes[0].values[..3].iter().all(|&v| v <= 250.0));
    }

    #[test]
    fn test_walk_zero_weights_uniform_fallback() {
        let mut net = small();
        for node in net.nodes.iter_mut() {
            for v in node.values[..3].iter_mut() {
                *v = 0.0;
            }
        }
        let mut report = TickReport {
            visits: vec![0; net.node_count()],
            ..Default::default()
        };
        net.walk(&mut report);
        let total: u32 = report.visits.iter().sum();
        assert_eq!(total, 256);
        for node in net.nodes() {
            assert!(node.values().iter().all(|v| v.is_finite()));
        }
    }

    fn ranked(stddevs: &[f64]) -> Vec<EnsembleSample<usize>> {
        stddevs
            .iter()
            .enumerate()
            .map(|(i, &stddev)| EnsembleSample {
                stddev,
                ..EnsembleSample::new(i, Vec::new())
            })
            .collect()
    }

    #[test]
    fn test_replace_least_stable_edge() {
        let mut edges = vec![1, 2, 3];
        let samples = ranked(&[0.1, 0.4, 0.2, 0.3, 0.0]);
        assert_eq!(replace_unstable_edge(&mut edges, &samples, 7), Some(1));
        assert_eq!(edges, vec![1, 7, 3]);
    }

    #[test]
    fn test_unstable_candidate_keeps_edges() {
        let mut edges = vec![1, 2, 3];
        let samples = ranked(&[0.1, 0.2, 0.1, 0.9, 0.0]);
        assert_eq!(replace_unstable_edge(&mut edges, &samples, 7), None);
        assert_eq!(edges, vec![1, 2, 3]);
    }

    #[test]
    fn test_own_sample_never_selected() {
        // The node's own sample is the most unstable overall, but it sits
        // outside the competing slots.
        let mut edges = vec![1, 2, 3];
        let samples = ranked(&[0.1, 0.2, 0.3, 0.05, 5.0]);
        assert_eq!(replace_unstable_edge(&mut edges, &samples, 7), Some(2));
        assert_eq!(edges, vec![1, 2, 7]);
    }

    #[test]
    fn test_replace_ties_go_to_first_slot() {
        let mut edges = vec![1, 2, 3];
        let samples = ranked(&[0.5, 0.5, 0.5, 0.5, 0.5]);
        assert_eq!(replace_unstable_edge(&mut edges, &samples, 7), Some(0));
        assert_eq!(edges, vec![7, 2, 3]);
    }

    #[test]
    fn test_rewire_swaps_at_most_one_slot_for_candidate() {
        let mut net = Network::with_config(NetworkConfig {
            rewire_iterations: 4,
            ..NetworkConfig::new(3, 4, 9)
        })
        .unwrap();
        let mut total_rewired = 0;
        let mut total_changed = 0;
        for _ in 0..20 {
            net.refresh();
            let before: Vec<Vec<usize>> =
                net.nodes().iter().map(|n| n.edges().to_vec()).collect();
            let (rewired, skipped) = net.rewire().unwrap();
            assert_eq!(skipped, 0);
            assert!(net.verify());

            for (i, old) in before.iter().enumerate() {
                let new = net.node(i).unwrap().edges();
                let changed: Vec<usize> = (0..3).filter(|&k| old[k] != new[k]).collect();
                assert!(changed.len() <= 1, "node {i}: {old:?} -> {new:?}");
                for &k in &changed {
                    assert!(!old.contains(&new[k]));
                    assert_ne!(new[k], i);
                }
                total_changed += changed.len();
            }
            total_rewired += rewired;
        }
        assert_eq!(total_changed, total_rewired);
        assert!(total_rewired > 0);
    }

    #[test]
    fn test_walk_never_takes_zero_weight_slot() {
        // Slot 1 forms the cycle 0 -> 1 -> 2 -> 0. No node links back to
        // its predecessor, so the weights stay as set.
        let mut net = Network::with_config(NetworkConfig {
            walk_steps: 2000,
            saturation_limit: 1e12,
            ..NetworkConfig::new(3, 0, 6)
        })
        .unwrap();
        net.nodes[0].edges = vec![3, 1, 4];
        net.nodes[1].edges = vec![3, 2, 5];
        net.nodes[2].edges = vec![4, 0, 5];
        for node in net.nodes.iter_mut() {
            node.values.copy_from_slice(&[0.0, 2.0, 0.0]);
        }
        assert!(net.verify());

        let mut report = TickReport {
            visits: vec![0; 6],
            ..Default::default()
        };
        net.walk(&mut report);
        assert_eq!(&report.visits[3..], &[0, 0, 0]);
        assert!(report.visits[..3].iter().all(|&v| v > 600));
        assert_eq!(report.reinforcements, 0);
        for node in &net.nodes[..3] {
            assert_eq!(node.values(), &[0.0, 2.0, 0.0]);
        }
    }

    #[test]
    fn test_walk_reinforces_return_edge() {
        // Two nodes pointing at each other: every step after the first
        // arrives from the only neighbour and reinforces that edge.
        let mut net = Network::with_config(NetworkConfig {
            walk_steps: 10,
            saturation_limit: 1e9,
            ..NetworkConfig::new(1, 0, 2)
        })
        .unwrap();
        net.nodes[0].values[0] = 1.0;
        net.nodes[1].values[0] = 1.0;
        let mut report = TickReport {
            visits: vec![0; 2],
            ..Default::default()
        };
        net.walk(&mut report);
        assert_eq!(report.reinforcements, 9);
        assert_eq!(report.visits, vec![5, 5]);
        assert_eq!(net.nodes[0].values[0] + net.nodes[1].values[0], 11.0);
    }

    #[test]
    fn test_embedding_untouched_by_tick() {
        let mut net = small();
        let features = [1.0, -2.0, 3.0, 0.0, 0.5, -0.5];
        net.write_embedding(2, &features).unwrap();
        let before: Vec<f64> = net.embedding_of(2).unwrap().to_vec();
        net.run(2).unwrap();
        assert_eq!(net.embedding_of(2).unwrap(), before.as_slice());
    }

    #[test]
    fn test_write_embedding_normalizes() {
        let mut net = small();
        net.write_embedding(0, &[2.0, -2.0, 4.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(
            net.embedding_of(0).unwrap(),
            &[0.25, -0.25, 0.5, 0.0, 0.0, 0.0]
        );
        net.write_embedding(1, &[0.0; 6]).unwrap();
        assert_eq!(net.embedding_of(1).unwrap(), &[0.0; 6]);
    }

    #[test]
    fn test_write_embedding_rejects_bad_input() {
        let mut net = small();
        assert!(matches!(
            net.write_embedding(0, &[1.0; 5]),
            Err(MorpheusError::Validation(_))
        ));
        assert!(matches!(
            net.write_embedding(99, &[1.0; 6]),
            Err(MorpheusError::Validation(_))
        ));
        assert!(matches!(
            net.write_embedding(0, &[f64::NAN, 0.0, 0.0, 0.0, 0.0, 0.0]),
            Err(MorpheusError::Numerical(_))
        ));
    }
}
