// Angular placement within a ring.
//
// General rings: every node at the depth (not grouped by parent) gets a slot
// weight from a cosine-power bump over its position t = i / (n - 1). Slots are
// laid end to end around the full circle and each node sits at the middle of
// its slot, so gaps open up near t = 0, 0.5, 1 and tighten near 0.25, 0.75.
//
// Leaf-cluster ring: siblings are fanned around their own parent's angle with
// a fixed step, ignoring cousins entirely.

use std::f64::consts::PI;

use indexmap::IndexMap;

use crate::hierarchy::{NodeId, OrgTree};

/// Slot weight at position `t` in [0, 1].
pub fn angle_weight(t: f64, amplitude: f64, exponent: f64) -> f64 {
    1.0 + amplitude * (t * 2.0 * PI).cos().abs().powf(exponent)
}

/// Weights for `n` slots. A lone slot is treated as position 0.
pub fn angle_weights(n: usize, amplitude: f64, exponent: f64) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
            angle_weight(t, amplitude, exponent)
        })
        .collect()
}

/// Slot centers for the given weights, scaled onto [0, 2π].
pub fn ring_angles(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return vec![0.0; weights.len()];
    }
    let scale = 2.0 * PI / total;
    let mut acc = 0.0;
    weights
        .iter()
        .map(|w| {
            acc += w / 2.0;
            let angle = acc * scale;
            acc += w / 2.0;
            angle
        })
        .collect()
}

pub(super) fn place_ring(tree: &mut OrgTree, nodes: &[NodeId], radius: f64, amplitude: f64, exponent: f64) {
    let weights = angle_weights(nodes.len(), amplitude, exponent);
    for (&nid, angle) in nodes.iter().zip(ring_angles(&weights)) {
        let n = tree.node_mut(nid);
        n.angle = angle;
        n.radius = radius;
    }
}

pub(super) fn place_clusters(tree: &mut OrgTree, nodes: &[NodeId], radius: f64, offset: f64) {
    // Sibling groups in order of first appearance on the ring.
    let mut groups: IndexMap<NodeId, Vec<NodeId>> = IndexMap::new();
    for &nid in nodes {
        if let Some(parent) = tree.node(nid).parent {
            groups.entry(parent).or_default().push(nid);
        }
    }

    for (parent, siblings) in groups {
        let center = tree.node(parent).angle;
        let mid = (siblings.len() as f64 - 1.0) / 2.0;
        for (i, nid) in siblings.into_iter().enumerate() {
            let n = tree.node_mut(nid);
            n.angle = center + (i as f64 - mid) * offset;
            n.radius = radius;
        }
    }
}
