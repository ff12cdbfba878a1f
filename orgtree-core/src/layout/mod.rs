// Radial layout for the organization tree.
//
// Every node gets a polar coordinate (angle, radius):
// - radius is fixed per depth (ring table, default ring beyond the table)
// - the root sits at a fixed angle
// - each other ring spreads its whole population around the circle using a
//   cosine-power weight per slot (radial_placement)
// - the leaf-cluster ring instead fans each sibling group tightly around its
//   parent's angle
//
// Submodules:
// - radial_placement: ring weighting and cluster fans
// - labels: wrapped label lines and their bounding boxes
// - links: radial link geometry
//
// Angles are in radians with 0 pointing up once projected (see PointF::from_polar).

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::hierarchy::OrgTree;

mod labels;
mod links;
mod radial_placement;

pub use labels::{label_geometry, LabelConfig, LabelGeometry};
pub use links::radial_link_path;
pub use radial_placement::{angle_weight, angle_weights, ring_angles};

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    /// Project a polar coordinate, rotated so angle 0 points up.
    pub fn from_polar(angle: f64, radius: f64) -> Self {
        let a = angle - PI / 2.0;
        PointF { x: a.cos() * radius, y: a.sin() * radius }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct RectF {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Ring radius per depth, root first.
    pub radii: Vec<f64>,
    /// Radius for depths past the end of `radii`.
    pub default_radius: f64,
    /// Height of the cosine bump in the ring weighting.
    pub amplitude: f64,
    /// Sharpness of the cosine bump.
    pub exponent: f64,
    pub root_angle: f64,
    /// Depth at which siblings fan around their parent instead of the ring.
    pub leaf_cluster_depth: usize,
    /// Angular step between siblings in a fan.
    pub cluster_offset: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            radii: vec![1.0, 120.0, 300.0, 420.0],
            default_radius: 480.0,
            amplitude: 0.6,
            exponent: 3.0,
            root_angle: PI / 2.0,
            leaf_cluster_depth: 3,
            cluster_offset: 0.165,
        }
    }
}

impl LayoutConfig {
    pub fn radius_for(&self, depth: usize) -> f64 {
        self.radii.get(depth).copied().unwrap_or(self.default_radius)
    }
}

/// Assign angle and radius to every node of the tree.
pub fn layout_tree(tree: &mut OrgTree, cfg: &LayoutConfig) {
    let levels = tree.levels();

    for (depth, nodes) in levels.iter().enumerate() {
        let radius = cfg.radius_for(depth);
        if depth == 0 {
            for &nid in nodes {
                let n = tree.node_mut(nid);
                n.angle = cfg.root_angle;
                n.radius = radius;
            }
        } else if depth == cfg.leaf_cluster_depth {
            radial_placement::place_clusters(tree, nodes, radius, cfg.cluster_offset);
        } else {
            radial_placement::place_ring(tree, nodes, radius, cfg.amplitude, cfg.exponent);
        }
    }

    log::debug!("laid out {} nodes on {} rings", tree.len(), levels.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::build;
    use crate::records::RawRecord;

    const EPS: f64 = 1e-9;

    fn rec(id: &str, parent: &str) -> RawRecord {
        RawRecord { id: id.to_string(), name: id.to_string(), parent: parent.to_string(), ..Default::default() }
    }

    fn sample_tree() -> OrgTree {
        // r -> a, b ; a -> a1, a2 ; b -> b1 ; a1 -> x, y, z ; b1 -> w ; x -> deep
        build(&[
            rec("r", ""),
            rec("a", "r"),
            rec("b", "r"),
            rec("a1", "a"),
            rec("a2", "a"),
            rec("b1", "b"),
            rec("x", "a1"),
            rec("y", "a1"),
            rec("z", "a1"),
            rec("w", "b1"),
            rec("deep", "x"),
        ])
        .unwrap()
    }

    #[test]
    fn test_projection_rotates_zero_up() {
        let p = PointF::from_polar(0.0, 10.0);
        assert!(p.x.abs() < EPS);
        assert!((p.y + 10.0).abs() < EPS);
        let p = PointF::from_polar(PI / 2.0, 10.0);
        assert!((p.x - 10.0).abs() < EPS);
        assert!(p.y.abs() < EPS);
    }

    #[test]
    fn test_root_placement() {
        let mut tree = sample_tree();
        layout_tree(&mut tree, &LayoutConfig::default());
        let root = tree.node(tree.root);
        assert!((root.angle - PI / 2.0).abs() < EPS);
        assert_eq!(root.radius, 1.0);
    }

    #[test]
    fn test_radius_per_depth_with_default() {
        let mut tree = sample_tree();
        let cfg = LayoutConfig::default();
        layout_tree(&mut tree, &cfg);
        for n in &tree.nodes {
            let expected = match n.depth {
                0 => 1.0,
                1 => 120.0,
                2 => 300.0,
                3 => 420.0,
                _ => 480.0,
            };
            assert_eq!(n.radius, expected, "depth {}", n.depth);
        }
    }

    #[test]
    fn test_leaf_cluster_fans_around_parent() {
        let mut tree = sample_tree();
        layout_tree(&mut tree, &LayoutConfig::default());
        let a1 = tree.node(tree.lookup("a1").unwrap()).angle;
        let angle = |id: &str| tree.node(tree.lookup(id).unwrap()).angle;
        assert!((angle("x") - (a1 - 0.165)).abs() < EPS);
        assert!((angle("y") - a1).abs() < EPS);
        assert!((angle("z") - (a1 + 0.165)).abs() < EPS);

        let b1 = angle("b1");
        assert!((angle("w") - b1).abs() < EPS);
    }

    #[test]
    fn test_rings_sweep_full_circle() {
        let mut tree = sample_tree();
        let cfg = LayoutConfig::default();
        layout_tree(&mut tree, &cfg);
        let levels = tree.levels();
        for depth in [1usize, 2] {
            let n = levels[depth].len();
            let weights = angle_weights(n, cfg.amplitude, cfg.exponent);
            let total: f64 = weights.iter().sum();
            let last = tree.node(levels[depth][n - 1]).angle;
            let swept = last + weights[n - 1] / 2.0 / total * 2.0 * PI;
            assert!((swept - 2.0 * PI).abs() < 1e-9, "depth {}", depth);
        }
    }

    #[test]
    fn test_depth_past_cluster_uses_ring() {
        let mut tree = sample_tree();
        layout_tree(&mut tree, &LayoutConfig::default());
        // A single node on its ring lands half way round.
        let deep = tree.node(tree.lookup("deep").unwrap());
        assert!((deep.angle - PI).abs() < EPS);
    }

    #[test]
    fn test_layout_is_idempotent() {
        let mut tree = sample_tree();
        let cfg = LayoutConfig::default();
        layout_tree(&mut tree, &cfg);
        let first: Vec<(f64, f64)> = tree.nodes.iter().map(|n| (n.angle, n.radius)).collect();
        layout_tree(&mut tree, &cfg);
        let second: Vec<(f64, f64)> = tree.nodes.iter().map(|n| (n.angle, n.radius)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_config_from_partial_json() {
        let cfg: LayoutConfig = serde_json::from_str(r#"{"radii": [0, 100], "amplitude": 0}"#).unwrap();
        assert_eq!(cfg.radius_for(1), 100.0);
        assert_eq!(cfg.radius_for(2), 480.0);
        assert_eq!(cfg.amplitude, 0.0);
        assert_eq!(cfg.leaf_cluster_depth, 3);
    }
}
