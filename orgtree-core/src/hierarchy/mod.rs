// Organization tree IR.
//
// Nodes live in an arena in breadth-first order (root first). Ownership flows
// parent -> children through `children`; `parent` is a plain index used for
// ascendant walks. Ids are resolved through a separate insertion-ordered map.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Diagnostic;

mod build;

pub use build::build;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Serialize)]
pub struct OrgNode {
    pub nid: NodeId,
    pub id: String,
    pub name: String,
    pub responsible: String,
    pub initials: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Edge count from the root.
    pub depth: usize,
    /// Radians, 0 pointing up once projected.
    pub angle: f64,
    pub radius: f64,
    /// Synthesized for a parent id that had no record.
    pub stub: bool,
}

/// A parent -> child connection. There is one per non-root node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub source: NodeId,
    pub target: NodeId,
}

/// A node that was built but could not be reached from the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetachedNode {
    pub id: String,
    pub name: String,
    /// Id of the node it was linked under, if any.
    pub parent: Option<String>,
    pub stub: bool,
}

#[derive(Debug, Clone)]
pub struct OrgTree {
    pub root: NodeId,
    pub nodes: Vec<OrgNode>,
    index: IndexMap<String, NodeId>,
    /// Disconnected groups, in insertion order.
    pub detached: Vec<DetachedNode>,
    pub diagnostics: Vec<Diagnostic>,
}

impl OrgTree {
    pub fn node(&self, nid: NodeId) -> &OrgNode {
        &self.nodes[nid.0]
    }

    pub fn node_mut(&mut self, nid: NodeId) -> &mut OrgNode {
        &mut self.nodes[nid.0]
    }

    pub fn lookup(&self, id: &str) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Links in breadth-first order of their target.
    pub fn links(&self) -> Vec<Link> {
        self.nodes
            .iter()
            .filter_map(|n| n.parent.map(|p| Link { source: p, target: n.nid }))
            .collect()
    }

    /// The node itself followed by each parent up to the root.
    pub fn ascendants(&self, nid: NodeId) -> Vec<NodeId> {
        let mut out = vec![nid];
        let mut cur = self.node(nid).parent;
        while let Some(p) = cur {
            out.push(p);
            cur = self.node(p).parent;
        }
        out
    }

    /// Nodes grouped by depth, each level in breadth-first order.
    pub fn levels(&self) -> Vec<Vec<NodeId>> {
        let mut levels: Vec<Vec<NodeId>> = Vec::new();
        for n in &self.nodes {
            if levels.len() <= n.depth {
                levels.resize_with(n.depth + 1, Vec::new);
            }
            levels[n.depth].push(n.nid);
        }
        levels
    }
}
