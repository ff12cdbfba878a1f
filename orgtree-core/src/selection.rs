// Selection / highlight state machine.
//
// States:
// - Neutral: nothing classified
// - Focused(node): the path node -> root is highlighted, everything else is
//   dimmed; a link is highlighted only when both its ends are on the path
//
// Every click rebuilds the classification from scratch, so repeating a click
// (or going through Neutral and back) always lands on the same result.
//
// Node clicks and background clicks are separate targets: a click is
// dispatched to exactly one of them, never both.

use std::collections::HashSet;

use serde::Serialize;

use crate::hierarchy::{NodeId, OrgTree};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    Neutral,
    Dimmed,
    Highlighted,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Selection {
    Neutral,
    Focused(NodeId),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    Node(NodeId),
    Background,
}

/// Highlight per node (by NodeId) and per link (by index into `OrgTree::links`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub nodes: Vec<Highlight>,
    pub links: Vec<Highlight>,
}

impl Classification {
    fn neutral(tree: &OrgTree) -> Self {
        Self {
            nodes: vec![Highlight::Neutral; tree.len()],
            links: vec![Highlight::Neutral; tree.len().saturating_sub(1)],
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectionState {
    selection: Selection,
    classification: Classification,
}

impl SelectionState {
    pub fn new(tree: &OrgTree) -> Self {
        Self {
            selection: Selection::Neutral,
            classification: Classification::neutral(tree),
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn node_highlight(&self, nid: NodeId) -> Highlight {
        self.classification.nodes.get(nid.0).copied().unwrap_or(Highlight::Neutral)
    }

    pub fn link_highlight(&self, index: usize) -> Highlight {
        self.classification.links.get(index).copied().unwrap_or(Highlight::Neutral)
    }

    pub fn click(&mut self, tree: &OrgTree, target: ClickTarget) {
        match target {
            ClickTarget::Node(nid) => self.focus(tree, nid),
            ClickTarget::Background => self.reset(tree),
        }
    }

    fn focus(&mut self, tree: &OrgTree, nid: NodeId) {
        let path: HashSet<NodeId> = tree.ascendants(nid).into_iter().collect();

        let nodes = tree
            .nodes
            .iter()
            .map(|n| if path.contains(&n.nid) { Highlight::Highlighted } else { Highlight::Dimmed })
            .collect();
        let links = tree
            .links()
            .iter()
            .map(|l| {
                if path.contains(&l.source) && path.contains(&l.target) {
                    Highlight::Highlighted
                } else {
                    Highlight::Dimmed
                }
            })
            .collect();

        self.selection = Selection::Focused(nid);
        self.classification = Classification { nodes, links };
        log::debug!("focused '{}' ({} on path)", tree.node(nid).id, path.len());
    }

    fn reset(&mut self, tree: &OrgTree) {
        self.selection = Selection::Neutral;
        self.classification = Classification::neutral(tree);
    }
}
