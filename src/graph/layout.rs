//! Level-based placement of agent nodes.
//!
//! Not a balanced tree layout: every level is centered independently and
//! siblings are kept adjacent by sorting on parent id. Good enough for the
//! tens of agents a swarm runs.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use super::{AgentNode, MANAGER_ID};

/// Horizontal distance between neighbours on a level.
pub const NODE_SPACING_X: f64 = 250.0;
/// Vertical distance between levels.
pub const ROW_HEIGHT: f64 = 150.0;
/// y of level 0.
pub const TOP_OFFSET: f64 = 50.0;
/// x every level is centered on.
pub const CENTER_X: f64 = 0.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    pub node: AgentNode,
    /// Id of the root this node was reached from.
    pub root: String,
    pub level: usize,
    pub x: f64,
    pub y: f64,
}

/// Root ordering: Manager first, then by id.
pub fn root_order(a: &str, b: &str) -> Ordering {
    match (a == MANAGER_ID, b == MANAGER_ID) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.cmp(b),
    }
}

/// Assign every node a level and an (x, y) position.
///
/// Nodes whose parent does not resolve are roots. Nodes stuck in a parent
/// cycle that no root reaches are promoted to roots, so each distinct id is
/// placed exactly once. Output is ordered by level, then left to right.
pub fn layout_tree(nodes: &[AgentNode]) -> Vec<PositionedNode> {
    // First occurrence of an id wins.
    let mut seen = HashSet::new();
    let unique: Vec<&AgentNode> = nodes.iter().filter(|n| seen.insert(n.id.as_str())).collect();
    let by_id: HashMap<&str, &AgentNode> = unique.iter().map(|n| (n.id.as_str(), *n)).collect();

    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut roots: Vec<&str> = Vec::new();
    for node in &unique {
        match resolved_parent(node, &by_id) {
            Some(parent) => children.entry(parent).or_default().push(node.id.as_str()),
            None => roots.push(node.id.as_str()),
        }
    }
    roots.sort_by(|a, b| root_order(a, b));

    let mut levels: HashMap<&str, (usize, &str)> = HashMap::new();
    for &root in &roots {
        assign_levels(root, root, 0, &children, &mut levels);
    }

    // Whatever is left sits in a cycle.
    let mut stranded: Vec<&str> = unique
        .iter()
        .map(|n| n.id.as_str())
        .filter(|id| !levels.contains_key(id))
        .collect();
    stranded.sort();
    for id in stranded {
        if levels.contains_key(id) {
            continue;
        }
        tracing::debug!(agent = id, "parent cycle, promoting to root");
        roots.push(id);
        assign_levels(id, id, 0, &children, &mut levels);
    }
    roots.sort_by(|a, b| root_order(a, b));
    let root_rank: HashMap<&str, usize> = roots.iter().enumerate().map(|(i, r)| (*r, i)).collect();

    let max_level = levels.values().map(|(l, _)| *l).max().unwrap_or(0);
    let mut by_level: Vec<Vec<&str>> = vec![Vec::new(); max_level + 1];
    for node in &unique {
        if let Some((level, _)) = levels.get(node.id.as_str()) {
            by_level[*level].push(node.id.as_str());
        }
    }

    let mut out = Vec::with_capacity(unique.len());
    for (level, ids) in by_level.iter_mut().enumerate() {
        if level == 0 {
            ids.sort_by_key(|id| root_rank.get(id).copied().unwrap_or(usize::MAX));
        } else {
            ids.sort_by(|a, b| {
                let pa = by_id[a].parent.as_deref().unwrap_or("");
                let pb = by_id[b].parent.as_deref().unwrap_or("");
                pa.cmp(pb).then_with(|| a.cmp(b))
            });
        }

        let count = ids.len();
        for (index, id) in ids.iter().enumerate() {
            let (_, root) = levels[id];
            out.push(PositionedNode {
                node: by_id[id].clone(),
                root: root.to_string(),
                level,
                x: centered_x(index, count),
                y: TOP_OFFSET + level as f64 * ROW_HEIGHT,
            });
        }
    }
    out
}

/// x of the `index`-th of `count` evenly spaced nodes centered on `CENTER_X`.
pub fn centered_x(index: usize, count: usize) -> f64 {
    let mid = (count.saturating_sub(1)) as f64 / 2.0;
    CENTER_X + (index as f64 - mid) * NODE_SPACING_X
}

fn resolved_parent<'a>(node: &'a AgentNode, by_id: &HashMap<&str, &AgentNode>) -> Option<&'a str> {
    node.parent
        .as_deref()
        .filter(|p| *p != node.id && by_id.contains_key(*p))
}

fn assign_levels<'a>(
    id: &'a str,
    root: &'a str,
    level: usize,
    children: &HashMap<&'a str, Vec<&'a str>>,
    levels: &mut HashMap<&'a str, (usize, &'a str)>,
) {
    let mut stack = vec![(id, level)];
    while let Some((current, depth)) = stack.pop() {
        if levels.contains_key(current) {
            continue;
        }
        levels.insert(current, (depth, root));
        if let Some(kids) = children.get(current) {
            for kid in kids {
                stack.push((*kid, depth + 1));
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/helpers/mod.rs"]
#[allow(dead_code)]
mod helpers;

#[cfg(test)]
mod tests {
    use super::*;
    use super::helpers::*;

    fn find<'a>(placed: &'a [PositionedNode], id: &str) -> &'a PositionedNode {
        placed.iter().find(|p| p.node.id == id).unwrap()
    }

    #[test]
    fn empty_input_gives_empty_layout() {
        assert!(layout_tree(&[]).is_empty());
    }

    #[test]
    fn manager_is_first_root_regardless_of_name() {
        let nodes = vec![
            agent("Alpha", None),
            agent("Manager", None),
            agent("Zeta", None),
            agent("Beta", Some("missing")),
        ];
        let placed = layout_tree(&nodes);
        let roots: Vec<&str> = placed
            .iter()
            .filter(|p| p.level == 0)
            .map(|p| p.node.id.as_str())
            .collect();
        assert_eq!(roots, vec!["Manager", "Alpha", "Beta", "Zeta"]);
        assert!(find(&placed, "Manager").x < find(&placed, "Alpha").x);
    }

    #[test]
    fn unresolved_parent_is_its_own_root() {
        let nodes = vec![agent("orphan", Some("ghost")), agent("kid", Some("orphan"))];
        let placed = layout_tree(&nodes);
        assert_eq!(find(&placed, "orphan").level, 0);
        assert_eq!(find(&placed, "kid").level, 1);
        assert_eq!(find(&placed, "kid").root, "orphan");
    }

    #[test]
    fn y_is_root_y_plus_depth_rows() {
        let nodes = vec![
            agent("Manager", None),
            agent("lead_a", Some("Manager")),
            agent("lead_b", Some("Manager")),
            agent("worker", Some("lead_a")),
            agent("deep", Some("worker")),
        ];
        let placed = layout_tree(&nodes);
        for p in &placed {
            let root = find(&placed, &p.root);
            assert_eq!(p.y, root.y + p.level as f64 * ROW_HEIGHT);
        }
        assert_eq!(find(&placed, "deep").level, 3);
        assert_eq!(find(&placed, "Manager").y, TOP_OFFSET);
    }

    #[test]
    fn siblings_are_evenly_spaced_and_centered() {
        let nodes = vec![
            agent("Manager", None),
            agent("c", Some("Manager")),
            agent("a", Some("Manager")),
            agent("b", Some("Manager")),
        ];
        let placed = layout_tree(&nodes);
        let level1: Vec<&PositionedNode> = placed.iter().filter(|p| p.level == 1).collect();
        let ids: Vec<&str> = level1.iter().map(|p| p.node.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(level1[1].x - level1[0].x, NODE_SPACING_X);
        assert_eq!(level1[2].x - level1[1].x, NODE_SPACING_X);
        let sum: f64 = level1.iter().map(|p| p.x).sum();
        assert_eq!(sum / 3.0, CENTER_X);
        assert_eq!(find(&placed, "Manager").x, CENTER_X);
    }

    #[test]
    fn siblings_cluster_by_parent() {
        let nodes = vec![
            agent("Manager", None),
            agent("lead_b", Some("Manager")),
            agent("lead_a", Some("Manager")),
            agent("z_of_a", Some("lead_a")),
            agent("a_of_b", Some("lead_b")),
            agent("y_of_a", Some("lead_a")),
        ];
        let placed = layout_tree(&nodes);
        let level2: Vec<&str> = placed
            .iter()
            .filter(|p| p.level == 2)
            .map(|p| p.node.id.as_str())
            .collect();
        assert_eq!(level2, vec!["y_of_a", "z_of_a", "a_of_b"]);
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let mut second = agent("dup", None);
        second.name = "second".into();
        let nodes = vec![agent("dup", None), second];
        let placed = layout_tree(&nodes);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].node.name, "dup");
    }

    #[test]
    fn cycles_are_promoted_to_roots() {
        let nodes = vec![
            agent("a", Some("b")),
            agent("b", Some("a")),
            agent("self", Some("self")),
        ];
        let placed = layout_tree(&nodes);
        assert_eq!(placed.len(), 3);
        assert_eq!(find(&placed, "self").level, 0);
        assert_eq!(find(&placed, "a").level, 0);
        assert_eq!(find(&placed, "b").level, 1);
    }

    #[test]
    fn layout_is_deterministic() {
        let nodes = vec![
            agent("w2", Some("Manager")),
            agent("Manager", None),
            agent("w1", Some("Manager")),
        ];
        let mut reversed = nodes.clone();
        reversed.reverse();
        let a: Vec<(String, f64, f64)> = layout_tree(&nodes).into_iter().map(|p| (p.node.id, p.x, p.y)).collect();
        let b: Vec<(String, f64, f64)> = layout_tree(&reversed).into_iter().map(|p| (p.node.id, p.x, p.y)).collect();
        assert_eq!(a, b);
    }
}
