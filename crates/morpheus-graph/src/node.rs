// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Morpheus Graph Node
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

/// One graph unit: outgoing edges by node index plus a value vector.
///
/// `values[..width]` is local state rewritten every tick and used as the
/// walk weights of the edge slots; `values[width..]` is the embedding
/// payload owned by the external collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub(crate) edges: Vec<usize>,
    pub(crate) values: Vec<f64>,
}

impl Node {
    pub(crate) fn new(width: usize, embedding: usize) -> Self {
        Self {
            edges: vec![0; width],
            values: vec![0.0; width + embedding],
        }
    }

    /// Target node index of every edge slot.
    pub fn edges(&self) -> &[usize] {
        &self.edges
    }

    /// Local state followed by the embedding payload.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Slot of the first edge pointing at `target`.
    pub fn slot_of(&self, target: usize) -> Option<usize> {
        self.edges.iter().position(|&e| e == target)
    }

    /// Edge list is `width` long, in range, self-free and duplicate-free.
    pub(crate) fn edges_valid(&self, index: usize, node_count: usize) -> bool {
        self.edges.iter().enumerate().all(|(k, &e)| {
            e < node_count && e != index && !self.edges[..k].contains(&e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_dimensions() {
        let node = Node::new(4, 32);
        assert_eq!(node.edges().len(), 4);
        assert_eq!(node.values().len(), 36);
    }

    #[test]
    fn test_slot_of() {
        let node = Node {
            edges: vec![3, 1, 2],
            values: vec![0.0; 3],
        };
        assert_eq!(node.slot_of(1), Some(1));
        assert_eq!(node.slot_of(0), None);
    }

    #[test]
    fn test_edges_valid() {
        let node = Node {
            edges: vec![1, 2],
            values: vec![0.0; 2],
        };
        assert!(node.edges_valid(0, 3));
        assert!(!node.edges_valid(1, 3)); // self edge
        assert!(!node.edges_valid(0, 2)); // out of range
        let dup = Node {
            edges: vec![2, 2],
            values: vec![0.0; 2],
        };
        assert!(!dup.edges_valid(0, 3));
    }
}
