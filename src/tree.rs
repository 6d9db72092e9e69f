//! # Search Tree Sampler
//!
//! Extracts a small, readable subgraph from a potentially huge search
//! tree. Depth is capped, wide nodes keep their best children by mean
//! value plus a random sample of the rest, and each node is colored by
//! a value tier so hot lines stand out in the exported picture.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::info;

use crate::action::Action;
use crate::surface::{Canvas, SurfaceError, CHAR_H, MAX_DIM};

/// Read-only view of one search tree node.
pub trait SearchNode {
    fn visits(&self) -> u64;
    /// Accumulated value over all visits (not the mean).
    fn value(&self) -> f64;
    fn children(&self) -> Vec<&Self>;
    /// Action on the edge leading into this node; `None` at the root.
    fn action(&self) -> Option<&Action>;
}

/// Sampling bounds.
#[derive(Debug, Clone, Copy)]
pub struct SampleConfig {
    /// Levels below the root to expand.
    pub max_depth: usize,
    /// Children kept per node.
    pub max_children: usize,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_children: 4,
        }
    }
}

/// Children guaranteed kept by mean value before random fill.
const TOP_KEEP: usize = 3;

/// Node coloring bucket by mean value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTier {
    Hot,
    Warm,
    Mild,
    Faint,
    Neutral,
}

impl ValueTier {
    /// Buckets a mean value clamped into `[0, 1]`. Unvisited nodes are
    /// always neutral regardless of their stored value.
    pub fn from_mean(mean: f64, visits: u64) -> Self {
        if visits == 0 {
            return ValueTier::Neutral;
        }
        let mean = mean.clamp(0.0, 1.0);
        if mean > 0.8 {
            ValueTier::Hot
        } else if mean > 0.6 {
            ValueTier::Warm
        } else if mean > 0.4 {
            ValueTier::Mild
        } else if mean > 0.2 {
            ValueTier::Faint
        } else {
            ValueTier::Neutral
        }
    }

    fn rgb(self) -> [u8; 3] {
        match self {
            ValueTier::Hot => [255, 0, 0],
            ValueTier::Warm => [250, 128, 114],
            ValueTier::Mild => [240, 128, 128],
            ValueTier::Faint => [255, 228, 225],
            ValueTier::Neutral => [255, 255, 255],
        }
    }
}

/// One sampled node, ready for layout.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub label: String,
    pub tier: ValueTier,
    pub depth: usize,
    /// The root gets a fixed color instead of a tier color.
    pub is_root: bool,
}

/// Directed edge between sampled nodes, by index into the node list.
#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub from: usize,
    pub to: usize,
    pub label: String,
}

/// Flattened sample of the search tree.
#[derive(Debug, Clone, Default)]
pub struct TreeGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

fn mean_value<N: SearchNode + ?Sized>(node: &N) -> f64 {
    if node.visits() == 0 {
        0.0
    } else {
        node.value() / node.visits() as f64
    }
}

fn node_label<N: SearchNode + ?Sized>(node: &N, is_root: bool) -> String {
    let prefix = if is_root { "Root\n" } else { "" };
    format!(
        "{prefix}Visits: {}\nValue: {:.2}",
        node.visits(),
        mean_value(node)
    )
}

/// Picks which of `children` survive: the `TOP_KEEP` best by mean value,
/// then a uniform sample without replacement from the remainder.
fn select_children<'a, N, R>(children: Vec<&'a N>, cap: usize, rng: &mut R) -> Vec<&'a N>
where
    N: SearchNode + ?Sized,
    R: Rng,
{
    let mut sorted = children;
    sorted.sort_by(|a, b| mean_value(*b).total_cmp(&mean_value(*a)));
    if sorted.len() <= cap {
        return sorted;
    }
    let keep = TOP_KEEP.min(cap);
    let mut out: Vec<&N> = sorted[..keep].to_vec();
    let rest = &sorted[keep..];
    let extra = cap - keep;
    for i in index::sample(rng, rest.len(), extra.min(rest.len())) {
        out.push(rest[i]);
    }
    out
}

/// Samples `root` breadth-first under the bounds in `cfg`.
pub fn sample_tree<N, R>(root: &N, cfg: SampleConfig, rng: &mut R) -> TreeGraph
where
    N: SearchNode + ?Sized,
    R: Rng,
{
    let mut graph = TreeGraph::default();
    graph.nodes.push(GraphNode {
        label: node_label(root, true),
        tier: ValueTier::from_mean(mean_value(root), root.visits()),
        depth: 0,
        is_root: true,
    });

    let mut queue: VecDeque<(&N, usize, usize)> = VecDeque::new();
    queue.push_back((root, 0, 0));

    while let Some((node, idx, depth)) = queue.pop_front() {
        if depth >= cfg.max_depth {
            continue;
        }
        for child in select_children(node.children(), cfg.max_children, rng) {
            let child_idx = graph.nodes.len();
            graph.nodes.push(GraphNode {
                label: node_label(child, false),
                tier: ValueTier::from_mean(mean_value(child), child.visits()),
                depth: depth + 1,
                is_root: false,
            });
            let label = child
                .action()
                .map(Action::edge_label)
                .unwrap_or_else(|| "No action".to_owned());
            graph.edges.push(GraphEdge {
                from: idx,
                to: child_idx,
                label,
            });
            queue.push_back((child, child_idx, depth + 1));
        }
    }
    graph
}

const NODE_W: u32 = 110;
const NODE_H: u32 = 44;
const ROW_GAP: u32 = 90;
const ROOT_COLOR: [u8; 3] = [173, 216, 230];

/// Renders a sampled tree as a PNG. When `path` is `None` the picture is
/// written to `mcts_tree.png` in the working directory.
pub fn render_tree_png<N: SearchNode + ?Sized>(
    root: &N,
    cfg: SampleConfig,
    path: Option<&Path>,
) -> Result<PathBuf, SurfaceError> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(rand::random());
    let graph = sample_tree(root, cfg, &mut rng);
    let out = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("mcts_tree.png"));

    // Layered layout: one row per depth, nodes evenly spread.
    let depth_max = graph.nodes.iter().map(|n| n.depth).max().unwrap_or(0);
    let mut per_row = vec![0usize; depth_max + 1];
    for node in &graph.nodes {
        per_row[node.depth] += 1;
    }
    // Wide bottom rows are squeezed rather than growing the canvas past
    // what the surface accepts; the per-row step shrinks with it.
    let widest = per_row.iter().copied().max().unwrap_or(1).max(1);
    let width = (widest as u32 * (NODE_W + 30) + 60).clamp(400, MAX_DIM);
    let height = ((depth_max as u32 + 1) * (NODE_H + ROW_GAP) + 60).clamp(300, MAX_DIM);

    let mut canvas = Canvas::new(width, height)?;
    canvas.clear([245, 245, 245]);

    // Assign centers row by row in node order.
    let mut placed = vec![0usize; depth_max + 1];
    let mut centers = Vec::with_capacity(graph.nodes.len());
    for node in &graph.nodes {
        let row = node.depth;
        let slot = placed[row];
        placed[row] += 1;
        let step = width as i32 / per_row[row] as i32;
        let cx = step * slot as i32 + step / 2;
        let cy = 40 + row as i32 * (NODE_H + ROW_GAP) as i32;
        centers.push((cx, cy));
    }

    for edge in &graph.edges {
        let (x0, y0) = centers[edge.from];
        let (x1, y1) = centers[edge.to];
        canvas.draw_line(x0, y0 + NODE_H as i32 / 2, x1, y1 - NODE_H as i32 / 2, [90, 90, 90]);
        let (mx, my) = ((x0 + x1) / 2, (y0 + y1) / 2);
        canvas.draw_text(
            mx - Canvas::text_width(&edge.label) as i32 / 2,
            my,
            &edge.label,
            [40, 40, 40],
        );
    }

    for (i, node) in graph.nodes.iter().enumerate() {
        let (cx, cy) = centers[i];
        let x = cx - NODE_W as i32 / 2;
        let y = cy - NODE_H as i32 / 2;
        let fill = if node.is_root { ROOT_COLOR } else { node.tier.rgb() };
        canvas.fill_rect(x, y, NODE_W, NODE_H, fill);
        for (li, line) in node.label.lines().enumerate() {
            canvas.draw_text(
                x + 4,
                y + 4 + li as i32 * (CHAR_H as i32 + 1),
                line,
                [0, 0, 0],
            );
        }
    }

    canvas.save_png(&out)?;
    info!(path = %out.display(), nodes = graph.nodes.len(), "search tree exported");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Node {
        visits: u64,
        value: f64,
        action: Option<Action>,
        children: Vec<Node>,
    }

    impl Node {
        fn leaf(visits: u64, value: f64) -> Self {
            Self {
                visits,
                value,
                action: None,
                children: Vec::new(),
            }
        }
    }

    impl SearchNode for Node {
        fn visits(&self) -> u64 {
            self.visits
        }
        fn value(&self) -> f64 {
            self.value
        }
        fn children(&self) -> Vec<&Self> {
            self.children.iter().collect()
        }
        fn action(&self) -> Option<&Action> {
            self.action.as_ref()
        }
    }

    fn rng() -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::seed_from_u64(7)
    }

    #[test]
    fn small_tree_sampled_in_full() {
        let root = Node {
            visits: 10,
            value: 6.0,
            action: None,
            children: vec![
                Node::leaf(5, 4.0),
                Node::leaf(3, 1.0),
                Node::leaf(0, 0.0),
            ],
        };
        let graph = sample_tree(&root, SampleConfig::default(), &mut rng());
        assert_eq!(graph.nodes.len(), 4);
        assert_eq!(graph.edges.len(), 3);
        assert!(graph.nodes[0].label.starts_with("Root\nVisits: 10"));
        assert!(graph.nodes[0].label.contains("Value: 0.60"));
        // Child means: 0.80, 0.33, unvisited.
        assert_eq!(graph.nodes[1].tier, ValueTier::Warm);
        assert_eq!(graph.nodes[2].tier, ValueTier::Faint);
        assert_eq!(graph.nodes[3].tier, ValueTier::Neutral);
    }

    #[test]
    fn unvisited_node_is_neutral_even_with_high_value() {
        assert_eq!(ValueTier::from_mean(0.95, 0), ValueTier::Neutral);
        assert_eq!(ValueTier::from_mean(0.95, 1), ValueTier::Hot);
        assert_eq!(ValueTier::from_mean(-3.0, 5), ValueTier::Neutral);
        assert_eq!(ValueTier::from_mean(7.0, 5), ValueTier::Hot);
    }

    #[test]
    fn wide_node_keeps_best_three() {
        let root = Node {
            visits: 100,
            value: 50.0,
            action: None,
            children: (0..10)
                .map(|i| Node::leaf(10, i as f64))
                .collect(),
        };
        let cfg = SampleConfig::default();
        let graph = sample_tree(&root, cfg, &mut rng());
        assert_eq!(graph.nodes.len(), 1 + cfg.max_children);
        // The three highest means (0.9, 0.8, 0.7) must survive the cut.
        for want in ["Value: 0.90", "Value: 0.80", "Value: 0.70"] {
            assert!(
                graph.nodes.iter().any(|n| n.label.contains(want)),
                "missing child {want}"
            );
        }
    }

    #[test]
    fn depth_cap_bounds_node_count() {
        fn deep(levels: usize) -> Node {
            let children = if levels == 0 {
                Vec::new()
            } else {
                (0..2).map(|_| deep(levels - 1)).collect()
            };
            Node {
                visits: 1,
                value: 0.5,
                action: None,
                children,
            }
        }
        let root = deep(6);
        let cfg = SampleConfig::default();
        let graph = sample_tree(&root, cfg, &mut rng());
        let deepest = graph.nodes.iter().map(|n| n.depth).max().unwrap();
        assert_eq!(deepest, cfg.max_depth);
        // Binary tree to depth 3: 1 + 2 + 4 + 8.
        assert_eq!(graph.nodes.len(), 15);
    }

    #[test]
    fn full_default_size_tree_exports() {
        // 4-ary tree filled to the depth cap: 64 nodes on the bottom row.
        fn full(levels: usize) -> Node {
            let children = if levels == 0 {
                Vec::new()
            } else {
                (0..4).map(|_| full(levels - 1)).collect()
            };
            Node {
                visits: 8,
                value: 4.0,
                action: None,
                children,
            }
        }
        let root = full(3);
        let path = std::env::temp_dir().join("railvis_full_tree.png");
        let out = render_tree_png(&root, SampleConfig::default(), Some(&path)).unwrap();
        assert_eq!(out, path);
        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn edges_carry_action_labels() {
        let root = Node {
            visits: 4,
            value: 2.0,
            action: None,
            children: vec![Node {
                visits: 2,
                value: 1.0,
                action: Some(Action::ClaimRoute {
                    player: "Alice".into(),
                    from: "Denver".into(),
                    to: "Omaha".into(),
                    color: crate::snapshot::TrainColor::Red,
                }),
                children: Vec::new(),
            }],
        };
        let graph = sample_tree(&root, SampleConfig::default(), &mut rng());
        assert_eq!(graph.edges[0].label, "Claim Denver-Omaha");
    }
}
