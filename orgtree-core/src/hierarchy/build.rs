//
// Build step: flat records -> OrgTree
//
// What this does:
// - Normalizes records and drops the ones without an id
// - Creates one node per distinct id (first occurrence wins)
// - Links children to parents, creating a stub for every parent id that has
//   no record of its own
// - Picks the root: explicit (empty parent), inferred (id never used as a
//   parent), or the first inserted node as a last resort
// - Walks breadth-first from the root to assign depths; whatever is not
//   reached is left out
//
// Everything that is repaired or dropped along the way is recorded as a
// Diagnostic on the tree and logged as a warning.

use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;

use crate::error::{Diagnostic, Error, Result};
use crate::records::{normalize_records, RawRecord};
use super::{DetachedNode, NodeId, OrgNode, OrgTree};

struct PendingNode {
    id: String,
    name: String,
    responsible: String,
    initials: String,
    stub: bool,
    children: Vec<usize>,
}

struct BuildCtx {
    nodes: Vec<PendingNode>,
    index: IndexMap<String, usize>,
    diagnostics: Vec<Diagnostic>,
}

impl BuildCtx {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: IndexMap::new(),
            diagnostics: Vec::new(),
        }
    }

    fn diag(&mut self, d: Diagnostic) {
        log::warn!("{}", d);
        self.diagnostics.push(d);
    }

    fn insert(&mut self, node: PendingNode) -> usize {
        let idx = self.nodes.len();
        self.index.insert(node.id.clone(), idx);
        self.nodes.push(node);
        idx
    }

    fn insert_record(&mut self, r: &RawRecord) -> usize {
        self.insert(PendingNode {
            id: r.id.clone(),
            name: r.name.clone(),
            responsible: r.responsible.clone(),
            initials: r.initials.clone(),
            stub: false,
            children: Vec::new(),
        })
    }

    fn insert_stub(&mut self, id: &str) -> usize {
        self.insert(PendingNode {
            id: id.to_string(),
            name: id.to_string(),
            responsible: String::new(),
            initials: String::new(),
            stub: true,
            children: Vec::new(),
        })
    }

    fn link(&mut self, r: &RawRecord) {
        if r.parent == r.id {
            self.diag(Diagnostic::SelfParent { id: r.id.clone() });
            return;
        }
        let Some(&child) = self.index.get(&r.id) else {
            return;
        };
        let parent = match self.index.get(&r.parent) {
            Some(&p) => p,
            None => {
                self.diag(Diagnostic::MissingParent {
                    parent: r.parent.clone(),
                    child: r.id.clone(),
                });
                self.insert_stub(&r.parent)
            }
        };
        self.nodes[parent].children.push(child);
    }

    fn find_root(&mut self, accepted: &[RawRecord]) -> Option<usize> {
        // (a) explicit: a record with no parent
        let explicit: Vec<&str> = accepted
            .iter()
            .filter(|r| !r.has_parent())
            .map(|r| r.id.as_str())
            .collect();
        if let Some(&first) = explicit.first() {
            let root = self.index.get(first).copied();
            self.note_ambiguity(first, &explicit);
            return root;
        }

        // (b) inferred: an id nobody names as parent
        let parents: HashSet<&str> = accepted.iter().map(|r| r.parent.as_str()).collect();
        let inferred: Vec<String> = self
            .index
            .keys()
            .filter(|id| !parents.contains(id.as_str()))
            .cloned()
            .collect();
        if let Some(first) = inferred.first() {
            let root = self.index.get(first).copied();
            let candidates: Vec<&str> = inferred.iter().map(String::as_str).collect();
            self.note_ambiguity(first, &candidates);
            return root;
        }

        // (c) last resort: first inserted node
        self.index.first().map(|(_, &idx)| idx)
    }

    fn note_ambiguity(&mut self, chosen: &str, candidates: &[&str]) {
        if candidates.len() > 1 {
            self.diag(Diagnostic::AmbiguousRoot {
                chosen: chosen.to_string(),
                candidates: candidates.iter().map(|c| c.to_string()).collect(),
            });
        }
    }

    /// Breadth-first walk from `root`, producing the final arena.
    fn finish(mut self, root: usize) -> OrgTree {
        let mut new_id: Vec<Option<NodeId>> = vec![None; self.nodes.len()];
        let mut order: Vec<usize> = Vec::with_capacity(self.nodes.len());
        let mut parent_of: Vec<Option<NodeId>> = Vec::with_capacity(self.nodes.len());
        let mut depth_of: Vec<usize> = Vec::with_capacity(self.nodes.len());
        let mut children_of: Vec<Vec<NodeId>> = Vec::with_capacity(self.nodes.len());

        new_id[root] = Some(NodeId(0));
        order.push(root);
        parent_of.push(None);
        depth_of.push(0);
        children_of.push(Vec::new());

        let mut queue: VecDeque<usize> = VecDeque::from([root]);
        let mut broken: Vec<(usize, usize)> = Vec::new();
        while let Some(old) = queue.pop_front() {
            let Some(nid) = new_id[old] else { continue };
            for &child in &self.nodes[old].children {
                if new_id[child].is_some() {
                    broken.push((old, child));
                    continue;
                }
                let cid = NodeId(order.len());
                new_id[child] = Some(cid);
                order.push(child);
                parent_of.push(Some(nid));
                depth_of.push(depth_of[nid.0] + 1);
                children_of.push(Vec::new());
                children_of[nid.0].push(cid);
                queue.push_back(child);
            }
        }

        for (parent, child) in broken {
            let d = Diagnostic::CycleBroken {
                parent: self.nodes[parent].id.clone(),
                child: self.nodes[child].id.clone(),
            };
            self.diag(d);
        }
        let mut linked_under: Vec<Option<usize>> = vec![None; self.nodes.len()];
        for (i, n) in self.nodes.iter().enumerate() {
            for &c in &n.children {
                linked_under[c] = Some(i);
            }
        }
        let detached: Vec<DetachedNode> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(i, _)| new_id[*i].is_none())
            .map(|(i, n)| DetachedNode {
                id: n.id.clone(),
                name: n.name.clone(),
                parent: linked_under[i].map(|p| self.nodes[p].id.clone()),
                stub: n.stub,
            })
            .collect();
        for d in &detached {
            self.diag(Diagnostic::Unreachable { id: d.id.clone() });
        }

        let mut nodes = Vec::with_capacity(order.len());
        let mut index = IndexMap::with_capacity(order.len());
        for (i, (old, children)) in order.into_iter().zip(children_of).enumerate() {
            let p = &mut self.nodes[old];
            index.insert(p.id.clone(), NodeId(i));
            nodes.push(OrgNode {
                nid: NodeId(i),
                id: std::mem::take(&mut p.id),
                name: std::mem::take(&mut p.name),
                responsible: std::mem::take(&mut p.responsible),
                initials: std::mem::take(&mut p.initials),
                parent: parent_of[i],
                children,
                depth: depth_of[i],
                angle: 0.0,
                radius: 0.0,
                stub: p.stub,
            });
        }

        OrgTree {
            root: NodeId(0),
            nodes,
            index,
            detached,
            diagnostics: self.diagnostics,
        }
    }
}

/// Reconstruct a single-rooted tree from flat records.
pub fn build(records: &[RawRecord]) -> Result<OrgTree> {
    let records = normalize_records(records);
    if records.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut ctx = BuildCtx::new();

    let mut accepted: Vec<RawRecord> = Vec::with_capacity(records.len());
    for r in records {
        if ctx.index.contains_key(&r.id) {
            ctx.diag(Diagnostic::DuplicateId { id: r.id.clone() });
            continue;
        }
        ctx.insert_record(&r);
        accepted.push(r);
    }

    for r in accepted.iter().filter(|r| r.has_parent()) {
        ctx.link(r);
    }

    let root = ctx.find_root(&accepted).ok_or(Error::NoRootFound)?;
    let tree = ctx.finish(root);
    log::debug!(
        "built tree: {} nodes, root '{}', {} diagnostics",
        tree.len(),
        tree.node(tree.root).id,
        tree.diagnostics.len()
    );
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, name: &str, parent: &str) -> RawRecord {
        RawRecord { id: id.to_string(), name: name.to_string(), parent: parent.to_string(), ..Default::default() }
    }

    fn ids(tree: &OrgTree, nids: &[NodeId]) -> Vec<String> {
        nids.iter().map(|&n| tree.node(n).id.clone()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(build(&[]), Err(Error::EmptyInput)));
        let blanks = vec![rec("  ", "x", ""), rec("\u{FEFF}", "y", "")];
        assert!(matches!(build(&blanks), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_tree_validity() {
        let records = vec![
            rec("1", "Root", ""),
            rec("2", "A", "1"),
            rec("3", "B", "1"),
            rec("4", "A1", "2"),
            rec("5", "A2", "2"),
            rec("6", "A1x", "4"),
        ];
        let tree = build(&records).unwrap();
        assert_eq!(tree.len(), 6);
        let roots: Vec<_> = tree.nodes.iter().filter(|n| n.parent.is_none()).collect();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].nid, tree.root);
        assert_eq!(tree.node(tree.root).depth, 0);

        let mut seen = HashSet::new();
        for n in &tree.nodes {
            for &c in &n.children {
                assert!(seen.insert(c), "node has more than one parent");
                assert_eq!(tree.node(c).parent, Some(n.nid));
                assert_eq!(tree.node(c).depth, n.depth + 1);
            }
        }
        assert_eq!(seen.len(), tree.len() - 1);
        assert!(tree.diagnostics.is_empty());
    }

    #[test]
    fn test_children_keep_record_order() {
        let records = vec![rec("c", "C", "r"), rec("r", "R", ""), rec("a", "A", "r"), rec("b", "B", "r")];
        let tree = build(&records).unwrap();
        assert_eq!(ids(&tree, &tree.node(tree.root).children), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_stub_repair_leaves_stub_disconnected() {
        let records = vec![rec("A", "A", ""), rec("B", "B", "X")];
        let tree = build(&records).unwrap();

        assert_eq!(tree.node(tree.root).id, "A");
        assert!(tree.lookup("X").is_none());
        assert!(tree.lookup("B").is_none());
        assert!(tree.node(tree.root).children.is_empty());
        assert!(tree.diagnostics.contains(&Diagnostic::MissingParent {
            parent: "X".to_string(),
            child: "B".to_string()
        }));
        assert!(tree.diagnostics.contains(&Diagnostic::Unreachable { id: "B".to_string() }));
        assert!(tree.diagnostics.contains(&Diagnostic::Unreachable { id: "X".to_string() }));
    }

    #[test]
    fn test_stub_keeps_child_while_detached() {
        let records = vec![rec("A", "A", ""), rec("B", "B", "X")];
        let tree = build(&records).unwrap();
        let x = tree.detached.iter().find(|d| d.id == "X").unwrap();
        assert!(x.stub);
        assert_eq!(x.name, "X");
        assert_eq!(x.parent, None);
        let b = tree.detached.iter().find(|d| d.id == "B").unwrap();
        assert!(!b.stub);
        assert_eq!(b.parent.as_deref(), Some("X"));
    }

    #[test]
    fn test_stub_is_never_inferred_as_root() {
        // "X" only exists as a parent value, so it can never qualify.
        let records = vec![rec("X1", "Leaf", "X"), rec("B", "B", "X1")];
        let tree = build(&records).unwrap();
        assert_eq!(tree.node(tree.root).id, "B");
        assert_eq!(tree.len(), 1);
        let stubs: Vec<&str> = tree.detached.iter().filter(|d| d.stub).map(|d| d.id.as_str()).collect();
        assert_eq!(stubs, vec!["X"]);
    }

    #[test]
    fn test_root_inference_from_unused_parent_value() {
        let records = vec![rec("m", "M", "n"), rec("n", "N", "m"), rec("z", "Z", "m")];
        let tree = build(&records).unwrap();
        assert_eq!(tree.node(tree.root).id, "z");
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.detached.len(), 2);
    }

    #[test]
    fn test_root_fallback_first_inserted_breaks_cycle() {
        let records = vec![rec("a", "A", "b"), rec("b", "B", "c"), rec("c", "C", "a")];
        let tree = build(&records).unwrap();
        assert_eq!(tree.node(tree.root).id, "a");
        assert!(tree.node(tree.root).parent.is_none());
        assert_eq!(tree.len(), 3);
        assert_eq!(ids(&tree, &tree.ascendants(tree.lookup("b").unwrap())), vec!["b", "c", "a"]);
        assert!(tree.diagnostics.contains(&Diagnostic::CycleBroken {
            parent: "b".to_string(),
            child: "a".to_string()
        }));
    }

    #[test]
    fn test_explicit_root_ambiguity_picks_first() {
        let records = vec![rec("r1", "R1", ""), rec("r2", "R2", ""), rec("a", "A", "r2")];
        let tree = build(&records).unwrap();
        assert_eq!(tree.node(tree.root).id, "r1");
        assert!(tree.diagnostics.contains(&Diagnostic::AmbiguousRoot {
            chosen: "r1".to_string(),
            candidates: vec!["r1".to_string(), "r2".to_string()],
        }));
        assert!(tree.diagnostics.contains(&Diagnostic::Unreachable { id: "r2".to_string() }));
    }

    #[test]
    fn test_duplicate_ids_first_wins() {
        let records = vec![rec("1", "Root", ""), rec("2", "First", "1"), rec("2", "Second", "1")];
        let tree = build(&records).unwrap();
        assert_eq!(tree.len(), 2);
        let two = tree.lookup("2").unwrap();
        assert_eq!(tree.node(two).name, "First");
        assert_eq!(tree.node(tree.root).children.len(), 1);
        assert!(tree.diagnostics.contains(&Diagnostic::DuplicateId { id: "2".to_string() }));
    }

    #[test]
    fn test_self_parent_is_not_linked() {
        let records = vec![rec("1", "Root", ""), rec("2", "Loop", "2")];
        let tree = build(&records).unwrap();
        assert!(tree.diagnostics.contains(&Diagnostic::SelfParent { id: "2".to_string() }));
        assert!(tree.lookup("2").is_none());
    }

    #[test]
    fn test_fields_are_normalized() {
        let records = vec![
            RawRecord {
                id: "\u{FEFF}1 ".to_string(),
                name: " Root ".to_string(),
                parent: " ".to_string(),
                responsible: " Ana".to_string(),
                initials: "AR ".to_string(),
            },
            rec(" 2", "Child", "1 "),
        ];
        let tree = build(&records).unwrap();
        let root = tree.node(tree.root);
        assert_eq!(root.id, "1");
        assert_eq!(root.name, "Root");
        assert_eq!(root.responsible, "Ana");
        assert_eq!(root.initials, "AR");
        assert_eq!(ids(&tree, &root.children), vec!["2"]);
    }
}
