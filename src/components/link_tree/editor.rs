//! Graph-editing model layered over a laid-out tree.
//!
//! Holds the fixed node set, the mutable link set (tree-derived plus
//! user-added), and a single [`Selection`]. Every observable change bumps
//! [`GraphEditor::revision`], which the renderer polls to decide when to redraw.
//!
//! Nodes and links carry stable ids assigned at creation. Equality, selection
//! and duplicate detection all go through those ids, so moving a node never
//! breaks a lookup.

use log::{debug, warn};

use super::layout::TreeLayout;
use super::theme::{TREE_LINK_COLOR, USER_LINK_COLOR};

/// Stable node identifier. Breadth-first index from the layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Stable link identifier. Never reused after deletion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub u32);

/// A positioned node of the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Stable id.
	pub id: NodeId,
	/// Name from the hierarchy.
	pub label: String,
	/// `/`-joined names from the root, e.g. `flare/analytics/cluster`.
	pub path: String,
	/// Weight carried over from the hierarchy, if any.
	pub value: Option<f64>,
	/// Branch nodes and leaves are filled differently.
	pub has_children: bool,
	/// Root is 0.
	pub depth: u32,
	/// Horizontal layout position.
	pub x: f64,
	/// Vertical layout position, `depth * level_spacing`.
	pub y: f64,
}

/// Link endpoint: the part of a node a link keeps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeRef {
	/// Node this end is attached to.
	pub id: NodeId,
	/// Layout x of the node.
	pub x: f64,
	/// Layout y of the node.
	pub y: f64,
	/// Depth of the node.
	pub depth: u32,
}

impl From<&Node> for NodeRef {
	fn from(node: &Node) -> Self {
		Self {
			id: node.id,
			x: node.x,
			y: node.y,
			depth: node.depth,
		}
	}
}

/// Where a link came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkKind {
	/// Parent to child edge implied by the hierarchy.
	Tree,
	/// Edge drawn by the user or seeded from the input.
	User,
}

/// An edge between two nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
	/// Stable id, never reused.
	pub id: LinkId,
	/// First endpoint. Links are undirected for dedupe and adjacency.
	pub source: NodeRef,
	/// Second endpoint.
	pub target: NodeRef,
	/// CSS color.
	pub color: String,
	/// Tree edge or user link.
	pub kind: LinkKind,
}

impl Link {
	/// Undirected endpoint match.
	pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
		(self.source.id == a && self.target.id == b) || (self.source.id == b && self.target.id == a)
	}

	/// True when either endpoint is `node`.
	pub fn touches(&self, node: NodeId) -> bool {
		self.source.id == node || self.target.id == node
	}
}

/// What is currently selected. Node and link selection are mutually exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
	/// Nothing selected.
	#[default]
	None,
	/// First end of a link being drawn.
	Node(NodeId),
	/// Link picked for deletion.
	Link(LinkId),
}

/// Result of [`GraphEditor::add_link`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddLinkOutcome {
	/// A new link was appended.
	Added(LinkId),
	/// A link between the same pair already exists (either direction).
	Duplicate(LinkId),
	/// An endpoint is not in the node set.
	UnknownNode(NodeId),
}

/// The editing model.
#[derive(Clone, Debug, Default)]
pub struct GraphEditor {
	nodes: Vec<Node>,
	links: Vec<Link>,
	selection: Selection,
	revision: u64,
	next_link_id: u32,
}

impl GraphEditor {
	/// Editor over a fixed node set with no links.
	pub fn new(nodes: Vec<Node>) -> Self {
		Self {
			nodes,
			..Self::default()
		}
	}

	/// Editor over a computed layout, with one tree link per parent-child edge.
	pub fn from_layout(layout: TreeLayout) -> Self {
		let mut editor = Self::new(layout.nodes);
		for (parent, child) in layout.edges {
			editor.push_link(parent, child, TREE_LINK_COLOR.to_string(), LinkKind::Tree);
		}
		editor
	}

	/// All nodes in layout order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// All links in insertion order, tree links first.
	pub fn links(&self) -> &[Link] {
		&self.links
	}

	/// Node lookup by id.
	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Link lookup by id. `None` once deleted.
	pub fn link(&self, id: LinkId) -> Option<&Link> {
		self.links.iter().find(|l| l.id == id)
	}

	/// Finds a node by its `/`-joined name path.
	pub fn node_by_path(&self, path: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.path == path)
	}

	/// Current selection.
	pub fn selection(&self) -> Selection {
		self.selection
	}

	/// The pending node, if a node is selected.
	pub fn selected_node(&self) -> Option<&Node> {
		match self.selection {
			Selection::Node(id) => self.node(id),
			_ => None,
		}
	}

	/// The selected link, if any.
	pub fn selected_link(&self) -> Option<&Link> {
		match self.selection {
			Selection::Link(id) => self.link(id),
			_ => None,
		}
	}

	/// Monotonic change counter. Any difference since the last read means redraw.
	pub fn revision(&self) -> u64 {
		self.revision
	}

	/// First click selects a node; the second click links the two and clears
	/// the node selection whatever the link outcome.
	///
	/// Returns the link outcome when a link was attempted.
	pub fn handle_node_click(&mut self, node: NodeId) -> Option<AddLinkOutcome> {
		if self.node(node).is_none() {
			warn!("link-tree: click on unknown node {:?}", node);
			return None;
		}

		let outcome = match self.selection {
			Selection::Node(previous) => {
				let outcome = self.add_link(previous, node, USER_LINK_COLOR);
				self.selection = Selection::None;
				Some(outcome)
			}
			_ => {
				debug!("link-tree: selected node {:?}", node);
				self.selection = Selection::Node(node);
				None
			}
		};
		self.touch();
		outcome
	}

	/// Adds an undirected-unique link from `a` to `b`.
	///
	/// Duplicates and unknown nodes leave the link set unchanged and are only
	/// logged. `a == b` is an ordinary pair: the first self-link is added and
	/// a repeat is a duplicate.
	pub fn add_link(&mut self, a: NodeId, b: NodeId, color: &str) -> AddLinkOutcome {
		for id in [a, b] {
			if self.node(id).is_none() {
				warn!("link-tree: cannot link unknown node {:?}", id);
				return AddLinkOutcome::UnknownNode(id);
			}
		}
		let duplicates: Vec<LinkId> = self
			.links
			.iter()
			.filter(|l| l.connects(a, b))
			.map(|l| l.id)
			.collect();
		if let Some(&first) = duplicates.first() {
			warn!(
				"link-tree: duplicate link found, not adding {:?}",
				duplicates
			);
			return AddLinkOutcome::Duplicate(first);
		}

		let id = self.push_link(a, b, color.to_string(), LinkKind::User);
		debug!("link-tree: added link {:?} {:?} -> {:?}", id, a, b);
		self.touch();
		AddLinkOutcome::Added(id)
	}

	/// Clears any node selection and toggles `link`.
	pub fn handle_link_click(&mut self, link: LinkId) {
		if self.link(link).is_none() {
			warn!("link-tree: click on unknown link {:?}", link);
			return;
		}

		self.selection = match self.selection {
			Selection::Link(current) if current == link => Selection::None,
			_ => Selection::Link(link),
		};
		debug!("link-tree: link selection now {:?}", self.selection);
		self.touch();
	}

	/// Removes the selected link and clears the selection.
	pub fn delete_selected_link(&mut self) -> Option<Link> {
		let Selection::Link(id) = self.selection else {
			return None;
		};
		self.selection = Selection::None;
		self.touch();

		let index = self.links.iter().position(|l| l.id == id)?;
		let removed = self.links.remove(index);
		debug!(
			"link-tree: deleted link {:?} {:?} -> {:?}",
			removed.id, removed.source.id, removed.target.id
		);
		Some(removed)
	}

	/// Drops a pending node selection. A link selection is left alone.
	pub fn cancel_selected_node(&mut self) {
		if let Selection::Node(_) = self.selection {
			self.selection = Selection::None;
			self.touch();
		}
	}

	/// Background click: nothing selected afterwards.
	pub fn clear_selection(&mut self) {
		if self.selection != Selection::None {
			self.selection = Selection::None;
			self.touch();
		}
	}

	/// All links with `node` at either end, in link order.
	pub fn links_touching(&self, node: NodeId) -> Vec<&Link> {
		self.links.iter().filter(|l| l.touches(node)).collect()
	}

	/// The nodes at either end of `link`, in node order.
	pub fn nodes_touching(&self, link: LinkId) -> Vec<&Node> {
		let Some(link) = self.link(link) else {
			return Vec::new();
		};
		self.nodes.iter().filter(|n| link.touches(n.id)).collect()
	}

	fn push_link(&mut self, a: NodeId, b: NodeId, color: String, kind: LinkKind) -> LinkId {
		let id = LinkId(self.next_link_id);
		self.next_link_id += 1;

		// Callers have already checked both ids.
		let (Some(source), Some(target)) = (self.node(a), self.node(b)) else {
			return id;
		};
		let link = Link {
			id,
			source: source.into(),
			target: target.into(),
			color,
			kind,
		};
		self.links.push(link);
		id
	}

	fn touch(&mut self) {
		self.revision += 1;
	}
}
