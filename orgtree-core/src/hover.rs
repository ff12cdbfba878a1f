//! Hover overlay: node details shown next to the pointer while it is over a node.

use serde::Serialize;

use crate::hierarchy::{NodeId, OrgTree};

/// Shown in place of missing metadata.
pub const NOT_AVAILABLE: &str = "N/D";
/// Horizontal distance between the pointer and the overlay.
pub const POINTER_OFFSET_X: f64 = 15.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TooltipContent {
    pub name: String,
    pub id: String,
    pub responsible: String,
    pub initials: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tooltip {
    pub visible: bool,
    pub x: f64,
    pub y: f64,
    pub content: Option<TooltipContent>,
}

fn or_not_available(v: &str) -> String {
    if v.is_empty() { NOT_AVAILABLE.to_string() } else { v.to_string() }
}

impl Tooltip {
    pub fn pointer_enter(&mut self, tree: &OrgTree, nid: NodeId, x: f64, y: f64) {
        let n = tree.node(nid);
        self.content = Some(TooltipContent {
            name: n.name.clone(),
            id: n.id.clone(),
            responsible: or_not_available(&n.responsible),
            initials: or_not_available(&n.initials),
        });
        self.visible = true;
        self.move_to(x, y);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if self.visible {
            self.move_to(x, y);
        }
    }

    pub fn pointer_leave(&mut self) {
        self.visible = false;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.x = x + POINTER_OFFSET_X;
        self.y = y;
    }
}
