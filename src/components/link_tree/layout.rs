//! Tidy tree layout for the input hierarchy.
//!
//! Linear-time Buchheim-Jünger-Leipert variant of Walker's algorithm with
//! fixed node spacing. Siblings sit one spacing unit apart, cousins two.
//! The root lands at `x = 0`; depth `d` lands at `y = d * level_spacing`.
//!
//! 1. Flatten the hierarchy breadth-first into an arena (ids = arena slots).
//! 2. First walk (post-order): preliminary x and subtree modifiers,
//!    merging contours through threads.
//! 3. Second walk (pre-order): sum modifiers into final x.

use std::collections::VecDeque;

use super::config::TreeConfig;
use super::editor::{Node, NodeId};
use super::types::Hierarchy;

/// Positioned nodes plus the parent-child edges between them.
#[derive(Clone, Debug, Default)]
pub struct TreeLayout {
	/// Breadth-first, root first.
	pub nodes: Vec<Node>,
	/// `(parent, child)` in the same order as `nodes`, root excluded.
	pub edges: Vec<(NodeId, NodeId)>,
	/// Levels below the root.
	pub height: u32,
	/// Vertical distance between depths.
	pub level_spacing: f64,
}

#[derive(Debug)]
struct Slot<'a> {
	source: &'a Hierarchy,
	path: String,
	depth: u32,
	parent: Option<usize>,
	children: Vec<usize>,
	/// Index among siblings.
	number: usize,
	prelim: f64,
	modifier: f64,
	shift: f64,
	change: f64,
	thread: Option<usize>,
	ancestor: usize,
	x: f64,
}

/// Lays out `root` using the spacing from `config`.
pub fn tidy_tree(root: &Hierarchy, config: &TreeConfig) -> TreeLayout {
	let height = root.height();
	let node_spacing = config.node_spacing;
	let level_spacing = config.level_spacing(height);

	let mut arena = Arena::flatten(root);
	arena.first_walk(0);
	let root_prelim = arena.slots[0].prelim;
	arena.second_walk(0, -root_prelim);

	let nodes = arena
		.slots
		.iter()
		.enumerate()
		.map(|(i, slot)| Node {
			id: NodeId(i as u32),
			label: slot.source.name.clone(),
			path: slot.path.clone(),
			value: slot.source.value,
			has_children: !slot.children.is_empty(),
			depth: slot.depth,
			x: slot.x * node_spacing,
			y: slot.depth as f64 * level_spacing,
		})
		.collect();

	let edges = arena
		.slots
		.iter()
		.enumerate()
		.filter_map(|(i, slot)| slot.parent.map(|p| (NodeId(p as u32), NodeId(i as u32))))
		.collect();

	TreeLayout {
		nodes,
		edges,
		height,
		level_spacing,
	}
}

struct Arena<'a> {
	slots: Vec<Slot<'a>>,
}

impl<'a> Arena<'a> {
	fn flatten(root: &'a Hierarchy) -> Self {
		let mut slots = vec![Slot::new(root, root.name.clone(), 0, None, 0, 0)];
		let mut queue = VecDeque::from([0usize]);

		while let Some(idx) = queue.pop_front() {
			let source = slots[idx].source;
			let depth = slots[idx].depth + 1;
			for (number, child) in source.children.iter().enumerate() {
				let child_idx = slots.len();
				let path = format!("{}/{}", slots[idx].path, child.name);
				slots.push(Slot::new(child, path, depth, Some(idx), number, child_idx));
				slots[idx].children.push(child_idx);
				queue.push_back(child_idx);
			}
		}

		Self { slots }
	}

	fn separation(&self, a: usize, b: usize) -> f64 {
		if self.slots[a].parent == self.slots[b].parent {
			1.0
		} else {
			2.0
		}
	}

	fn left_sibling(&self, v: usize) -> Option<usize> {
		let slot = &self.slots[v];
		let parent = slot.parent?;
		slot.number
			.checked_sub(1)
			.map(|n| self.slots[parent].children[n])
	}

	fn leftmost_sibling(&self, v: usize) -> usize {
		match self.slots[v].parent {
			Some(parent) => self.slots[parent].children[0],
			None => v,
		}
	}

	fn next_left(&self, v: usize) -> Option<usize> {
		self.slots[v].children.first().copied().or(self.slots[v].thread)
	}

	fn next_right(&self, v: usize) -> Option<usize> {
		self.slots[v].children.last().copied().or(self.slots[v].thread)
	}

	fn first_walk(&mut self, v: usize) {
		let children = self.slots[v].children.clone();
		let left = self.left_sibling(v);

		if children.is_empty() {
			self.slots[v].prelim = match left {
				Some(w) => self.slots[w].prelim + self.separation(v, w),
				None => 0.0,
			};
			return;
		}

		let mut default_ancestor = children[0];
		for &w in &children {
			self.first_walk(w);
			default_ancestor = self.apportion(w, default_ancestor);
		}
		self.execute_shifts(v);

		let first = children[0];
		let last = children[children.len() - 1];
		let midpoint = (self.slots[first].prelim + self.slots[last].prelim) / 2.0;

		match left {
			Some(w) => {
				let prelim = self.slots[w].prelim + self.separation(v, w);
				self.slots[v].prelim = prelim;
				self.slots[v].modifier = prelim - midpoint;
			}
			None => self.slots[v].prelim = midpoint,
		}
	}

	/// Pushes the subtree at `v` right until it clears every subtree to its left.
	fn apportion(&mut self, v: usize, mut default_ancestor: usize) -> usize {
		let Some(w) = self.left_sibling(v) else {
			return default_ancestor;
		};

		// i = inner, o = outer; p = right contour (v side), m = left contour.
		let (mut vip, mut vop) = (v, v);
		let mut vim = w;
		let mut vom = self.leftmost_sibling(v);
		let mut sip = self.slots[vip].modifier;
		let mut sop = self.slots[vop].modifier;
		let mut sim = self.slots[vim].modifier;
		let mut som = self.slots[vom].modifier;

		loop {
			let (Some(next_im), Some(next_ip)) = (self.next_right(vim), self.next_left(vip)) else {
				break;
			};
			vim = next_im;
			vip = next_ip;
			// Outer contours are at least as deep as the inner ones here.
			vom = self.next_left(vom).unwrap_or(vom);
			vop = self.next_right(vop).unwrap_or(vop);
			self.slots[vop].ancestor = v;

			let shift = (self.slots[vim].prelim + sim) - (self.slots[vip].prelim + sip)
				+ self.separation(vim, vip);
			if shift > 0.0 {
				let ancestor = self.ancestor(vim, v, default_ancestor);
				self.move_subtree(ancestor, v, shift);
				sip += shift;
				sop += shift;
			}

			sim += self.slots[vim].modifier;
			sip += self.slots[vip].modifier;
			som += self.slots[vom].modifier;
			sop += self.slots[vop].modifier;
		}

		if let Some(next) = self.next_right(vim) {
			if self.next_right(vop).is_none() {
				self.slots[vop].thread = Some(next);
				self.slots[vop].modifier += sim - sop;
			}
		}
		if let Some(next) = self.next_left(vip) {
			if self.next_left(vom).is_none() {
				self.slots[vom].thread = Some(next);
				self.slots[vom].modifier += sip - som;
				default_ancestor = v;
			}
		}

		default_ancestor
	}

	fn ancestor(&self, vim: usize, v: usize, default_ancestor: usize) -> usize {
		let candidate = self.slots[vim].ancestor;
		if self.slots[candidate].parent == self.slots[v].parent {
			candidate
		} else {
			default_ancestor
		}
	}

	fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
		let subtrees = self.slots[wp]
			.number
			.saturating_sub(self.slots[wm].number)
			.max(1) as f64;
		let per_subtree = shift / subtrees;
		self.slots[wp].change -= per_subtree;
		self.slots[wp].shift += shift;
		self.slots[wm].change += per_subtree;
		self.slots[wp].prelim += shift;
		self.slots[wp].modifier += shift;
	}

	fn execute_shifts(&mut self, v: usize) {
		let (mut shift, mut change) = (0.0, 0.0);
		let children = self.slots[v].children.clone();
		for &w in children.iter().rev() {
			let slot = &mut self.slots[w];
			slot.prelim += shift;
			slot.modifier += shift;
			change += slot.change;
			shift += slot.shift + change;
		}
	}

	fn second_walk(&mut self, v: usize, m: f64) {
		let slot = &mut self.slots[v];
		slot.x = slot.prelim + m;
		let next_m = m + slot.modifier;
		let children = slot.children.clone();
		for w in children {
			self.second_walk(w, next_m);
		}
	}
}

impl<'a> Slot<'a> {
	fn new(
		source: &'a Hierarchy,
		path: String,
		depth: u32,
		parent: Option<usize>,
		number: usize,
		idx: usize,
	) -> Self {
		Self {
			source,
			path,
			depth,
			parent,
			children: Vec::new(),
			number,
			prelim: 0.0,
			modifier: 0.0,
			shift: 0.0,
			change: 0.0,
			thread: None,
			ancestor: idx,
			x: 0.0,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn leaf(name: &str) -> Hierarchy {
		Hierarchy::leaf(name)
	}

	fn branch(name: &str, children: Vec<Hierarchy>) -> Hierarchy {
		Hierarchy::branch(name, children)
	}

	fn x_of(layout: &TreeLayout, path: &str) -> f64 {
		layout.nodes.iter().find(|n| n.path == path).unwrap().x
	}

	#[test]
	fn single_node_sits_at_origin() {
		let layout = tidy_tree(&leaf("root"), &TreeConfig::default());
		assert_eq!(layout.nodes.len(), 1);
		assert!(layout.edges.is_empty());
		assert_eq!((layout.nodes[0].x, layout.nodes[0].y), (0.0, 0.0));
		assert!(!layout.nodes[0].has_children);
	}

	#[test]
	fn two_children_straddle_the_root() {
		let tree = branch("r", vec![leaf("a"), leaf("b")]);
		let layout = tidy_tree(&tree, &TreeConfig::default());

		assert_eq!(layout.height, 1);
		assert_eq!(layout.level_spacing, 250.0);
		assert_eq!(x_of(&layout, "r"), 0.0);
		assert_eq!(x_of(&layout, "r/a"), -5.0);
		assert_eq!(x_of(&layout, "r/b"), 5.0);
		assert_eq!(layout.nodes[1].y, 250.0);
	}

	#[test]
	fn cousins_get_double_separation() {
		let tree = branch(
			"r",
			vec![branch("a", vec![leaf("a1")]), branch("b", vec![leaf("b1")])],
		);
		let layout = tidy_tree(&tree, &TreeConfig::default());

		let gap = x_of(&layout, "r/b/b1") - x_of(&layout, "r/a/a1");
		assert_eq!(gap, 20.0);
		assert_eq!(x_of(&layout, "r"), 0.0);
		assert_eq!(x_of(&layout, "r/a"), x_of(&layout, "r/a/a1"));
	}

	#[test]
	fn order_is_breadth_first_with_matching_edges() {
		let tree = branch(
			"r",
			vec![branch("a", vec![leaf("a1"), leaf("a2")]), leaf("b")],
		);
		let layout = tidy_tree(&tree, &TreeConfig::default());

		let paths: Vec<&str> = layout.nodes.iter().map(|n| n.path.as_str()).collect();
		assert_eq!(paths, vec!["r", "r/a", "r/b", "r/a/a1", "r/a/a2"]);
		assert_eq!(
			layout.edges,
			vec![
				(NodeId(0), NodeId(1)),
				(NodeId(0), NodeId(2)),
				(NodeId(1), NodeId(3)),
				(NodeId(1), NodeId(4)),
			]
		);
		let depths: Vec<u32> = layout.nodes.iter().map(|n| n.depth).collect();
		assert_eq!(depths, vec![0, 1, 1, 2, 2]);
		assert!(layout.nodes[1].has_children);
		assert!(!layout.nodes[2].has_children);
	}

	#[test]
	fn no_two_nodes_on_a_level_overlap() {
		let tree = branch(
			"flare",
			vec![
				branch(
					"analytics",
					vec![
						branch("cluster", vec![leaf("A"), leaf("B"), leaf("C"), leaf("D")]),
						branch("graph", vec![leaf("E"), leaf("F"), leaf("G")]),
						branch("optimization", vec![leaf("H")]),
					],
				),
				leaf("animate"),
				branch(
					"data",
					vec![branch("converters", vec![leaf("I"), leaf("J")]), leaf("K"), leaf("L")],
				),
				branch("flex", vec![leaf("M")]),
			],
		);
		let layout = tidy_tree(&tree, &TreeConfig::default());
		assert_eq!(layout.nodes.len(), 22);

		for depth in 0..=layout.height {
			let mut xs: Vec<f64> = layout
				.nodes
				.iter()
				.filter(|n| n.depth == depth)
				.map(|n| n.x)
				.collect();
			xs.sort_by(|a, b| a.total_cmp(b));
			for pair in xs.windows(2) {
				assert!(pair[1] - pair[0] >= 10.0 - 1e-9, "depth {depth}: {pair:?}");
			}
		}
	}

	#[test]
	fn parents_are_centered_over_children() {
		let tree = branch("r", vec![leaf("a"), leaf("b"), leaf("c")]);
		let layout = tidy_tree(&tree, &TreeConfig::default());
		let mid = (x_of(&layout, "r/a") + x_of(&layout, "r/c")) / 2.0;
		assert_eq!(x_of(&layout, "r"), mid);
	}
}
