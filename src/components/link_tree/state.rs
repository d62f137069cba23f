//! Canvas-side state around the editing model.
//!
//! Owns the [`GraphEditor`], the world-to-screen viewport, and the hover
//! target. Translates pointer positions into editor operations and tracks
//! whether the canvas needs repainting.

use log::{info, warn};

use super::config::TreeConfig;
use super::editor::{GraphEditor, LinkId, LinkKind, NodeId, Selection};
use super::geometry::{Extent, LinkCurve, Point, Viewport, node_point, view_rect};
use super::layout::tidy_tree;
use super::theme::{Color, Theme, USER_LINK_COLOR};
use super::types::{ExtraLink, TreeData};

/// Smallest pick radius in screen pixels, so tiny zoom levels stay clickable.
const MIN_HIT_PX: f64 = 6.0;

/// Something under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
	Node(NodeId),
	Link(LinkId),
}

/// Plain snapshot of the selection for the side panel.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SelectionSummary {
	#[default]
	Empty,
	/// A node waiting for a second click.
	Node {
		label: String,
		path: String,
		depth: u32,
		value: Option<f64>,
		links: usize,
	},
	Link {
		source: String,
		target: String,
		color: String,
		user_added: bool,
	},
}

pub struct TreeGraphState {
	pub editor: GraphEditor,
	pub config: TreeConfig,
	pub theme: Theme,
	pub extent: Extent,
	pub level_spacing: f64,
	pub viewport: Viewport,
	pub hover: Option<Target>,
	pub width: f64,
	pub height: f64,
	dirty: bool,
	drawn_revision: Option<u64>,
}

impl TreeGraphState {
	pub fn new(data: &TreeData, width: f64, height: f64) -> Self {
		let config = data.config.clone();
		let layout = tidy_tree(&data.tree, &config);
		let extent = Extent::of_nodes(&layout.nodes);
		let level_spacing = layout.level_spacing;
		info!(
			"link-tree: laid out {} nodes over {} levels",
			layout.nodes.len(),
			layout.height + 1
		);

		let mut editor = GraphEditor::from_layout(layout);
		seed_links(&mut editor, &data.links);

		let theme = Theme::with_levels(config.levels);
		let viewport = Viewport::fit(view_rect(extent, &config, level_spacing), width, height);

		Self {
			editor,
			config,
			theme,
			extent,
			level_spacing,
			viewport,
			hover: None,
			width,
			height,
			dirty: true,
			drawn_revision: None,
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.viewport = Viewport::fit(
			view_rect(self.extent, &self.config, self.level_spacing),
			width,
			height,
		);
		self.dirty = true;
	}

	fn pick_radius(&self, base: f64) -> f64 {
		base.max(MIN_HIT_PX / self.viewport.k)
	}

	/// Closest node within the hit radius of screen point `(sx, sy)`.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeId> {
		let p = self.viewport.to_world(Point::new(sx, sy));
		let radius = self.pick_radius(self.config.node.hit_radius);
		self.editor
			.nodes()
			.iter()
			.map(|n| (n.id, node_point(n).distance(p)))
			.filter(|&(_, d)| d <= radius)
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(id, _)| id)
	}

	/// Closest link within the hit tolerance of screen point `(sx, sy)`.
	pub fn link_at_position(&self, sx: f64, sy: f64) -> Option<LinkId> {
		let p = self.viewport.to_world(Point::new(sx, sy));
		let tolerance = self.pick_radius(self.config.link.hit_tolerance);
		self.editor
			.links()
			.iter()
			.map(|l| (l.id, LinkCurve::for_link(l).distance_to(p)))
			.filter(|&(_, d)| d <= tolerance)
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(id, _)| id)
	}

	/// Nodes win over links so endpoints stay clickable.
	pub fn pick(&self, sx: f64, sy: f64) -> Option<Target> {
		self.node_at_position(sx, sy)
			.map(Target::Node)
			.or_else(|| self.link_at_position(sx, sy).map(Target::Link))
	}

	/// Routes a click to the editor: node, link, or background.
	pub fn click(&mut self, sx: f64, sy: f64) {
		match self.pick(sx, sy) {
			Some(Target::Node(id)) => {
				self.editor.handle_node_click(id);
			}
			Some(Target::Link(id)) => self.editor.handle_link_click(id),
			None => self.editor.clear_selection(),
		}
		// A deleted or re-created link may have been under the pointer.
		let hover = self.pick(sx, sy);
		self.set_hover(hover);
	}

	/// Returns true when the hover target changed.
	pub fn set_hover(&mut self, target: Option<Target>) -> bool {
		if self.hover == target {
			return false;
		}
		self.hover = target;
		self.dirty = true;
		true
	}

	pub fn delete_selected_link(&mut self) -> bool {
		let removed = self.editor.delete_selected_link();
		if let Some(link) = &removed {
			if self.hover == Some(Target::Link(link.id)) {
				self.hover = None;
			}
		}
		removed.is_some()
	}

	pub fn needs_redraw(&self) -> bool {
		self.dirty || self.drawn_revision != Some(self.editor.revision())
	}

	pub fn mark_drawn(&mut self) {
		self.dirty = false;
		self.drawn_revision = Some(self.editor.revision());
	}

	pub fn summary(&self) -> SelectionSummary {
		match self.editor.selection() {
			Selection::None => SelectionSummary::Empty,
			Selection::Node(id) => self
				.editor
				.node(id)
				.map(|n| SelectionSummary::Node {
					label: n.label.clone(),
					path: n.path.clone(),
					depth: n.depth,
					value: n.value,
					links: self.editor.links_touching(id).len(),
				})
				.unwrap_or_default(),
			Selection::Link(id) => {
				let Some(link) = self.editor.link(id) else {
					return SelectionSummary::Empty;
				};
				let ends = self.editor.nodes_touching(id);
				let label = |node: NodeId| {
					ends.iter()
						.find(|n| n.id == node)
						.map(|n| n.label.clone())
						.unwrap_or_default()
				};
				SelectionSummary::Link {
					source: label(link.source.id),
					target: label(link.target.id),
					color: link.color.clone(),
					user_added: link.kind == LinkKind::User,
				}
			}
		}
	}
}

/// Adds the input's extra links, skipping any whose paths do not resolve.
fn seed_links(editor: &mut GraphEditor, extras: &[ExtraLink]) {
	for extra in extras {
		let ends = (
			editor.node_by_path(&extra.source).map(|n| n.id),
			editor.node_by_path(&extra.target).map(|n| n.id),
		);
		let (Some(source), Some(target)) = ends else {
			warn!(
				"link-tree: skipping extra link {} -> {}: unknown path",
				extra.source, extra.target
			);
			continue;
		};
		let color = match extra.color.as_deref() {
			Some(c) if Color::parse_css(c).is_some() => c,
			Some(c) => {
				warn!("link-tree: unreadable color {:?} on extra link, using default", c);
				USER_LINK_COLOR
			}
			None => USER_LINK_COLOR,
		};
		editor.add_link(source, target, color);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::link_tree::types::Hierarchy;

	fn sample() -> TreeData {
		TreeData {
			tree: Hierarchy::branch(
				"root",
				vec![
					Hierarchy::branch(
						"a",
						vec![
							Hierarchy {
								value: Some(42.0),
								..Hierarchy::leaf("a1")
							},
							Hierarchy::leaf("a2"),
						],
					),
					Hierarchy::branch("b", vec![Hierarchy::leaf("b1")]),
				],
			),
			links: vec![
				ExtraLink {
					source: "root/a/a1".into(),
					target: "root/b/b1".into(),
					color: Some("#fcc101".into()),
				},
				ExtraLink {
					source: "root/a".into(),
					target: "root/missing".into(),
					color: None,
				},
				ExtraLink {
					source: "root/a/a2".into(),
					target: "root".into(),
					color: Some("not a color".into()),
				},
			],
			config: TreeConfig::default(),
		}
	}

	fn screen_of(state: &TreeGraphState, path: &str) -> Point {
		let node = state.editor.node_by_path(path).unwrap();
		state.viewport.to_screen(node_point(node))
	}

	#[test]
	fn builds_tree_links_and_resolvable_extras() {
		let state = TreeGraphState::new(&sample(), 500.0, 300.0);
		assert_eq!(state.editor.nodes().len(), 6);

		let tree = state
			.editor
			.links()
			.iter()
			.filter(|l| l.kind == LinkKind::Tree)
			.count();
		assert_eq!(tree, 5);

		let extra = &state.editor.links()[5];
		assert_eq!(extra.color, "#fcc101");
		assert_eq!(extra.kind, LinkKind::User);
		assert_eq!(state.editor.links()[6].color, USER_LINK_COLOR);
		assert_eq!(state.editor.links().len(), 7);
	}

	#[test]
	fn clicks_on_two_nodes_draw_a_link() {
		let mut state = TreeGraphState::new(&sample(), 500.0, 300.0);
		let before = state.editor.links().len();

		let a = screen_of(&state, "root/a");
		let b = screen_of(&state, "root/b/b1");
		state.click(a.x, a.y);
		assert!(matches!(state.editor.selection(), Selection::Node(_)));
		assert!(matches!(state.summary(), SelectionSummary::Node { ref label, .. } if label == "a"));

		state.click(b.x, b.y);
		assert_eq!(state.editor.selection(), Selection::None);
		assert_eq!(state.editor.links().len(), before + 1);
		assert_eq!(state.summary(), SelectionSummary::Empty);
	}

	#[test]
	fn clicking_a_link_selects_and_background_clears() {
		let mut state = TreeGraphState::new(&sample(), 500.0, 300.0);
		let link = state.editor.links()[0].clone();
		let mid = state
			.viewport
			.to_screen(LinkCurve::for_link(&link).point_at(0.5));

		state.click(mid.x, mid.y);
		assert_eq!(state.editor.selection(), Selection::Link(link.id));
		assert!(matches!(state.summary(), SelectionSummary::Link { user_added: false, .. }));

		state.click(-1000.0, -1000.0);
		assert_eq!(state.editor.selection(), Selection::None);
	}

	#[test]
	fn summaries_name_link_ends_and_node_value() {
		let mut state = TreeGraphState::new(&sample(), 500.0, 300.0);
		let extra = state.editor.links()[5].id;
		state.editor.handle_link_click(extra);
		assert_eq!(
			state.summary(),
			SelectionSummary::Link {
				source: "a1".into(),
				target: "b1".into(),
				color: "#fcc101".into(),
				user_added: true,
			}
		);

		let a1 = state.editor.node_by_path("root/a/a1").unwrap().id;
		state.editor.handle_node_click(a1);
		assert!(matches!(
			state.summary(),
			SelectionSummary::Node { value: Some(v), links: 2, .. } if v == 42.0
		));
	}

	#[test]
	fn delete_clears_hover_on_removed_link() {
		let mut state = TreeGraphState::new(&sample(), 500.0, 300.0);
		let link = state.editor.links()[1].clone();
		let mid = state
			.viewport
			.to_screen(LinkCurve::for_link(&link).point_at(0.5));

		state.click(mid.x, mid.y);
		assert_eq!(state.hover, Some(Target::Link(link.id)));
		assert!(state.delete_selected_link());
		assert_eq!(state.hover, None);
		assert!(!state.delete_selected_link());
	}

	#[test]
	fn redraw_tracking_follows_revision_and_hover() {
		let mut state = TreeGraphState::new(&sample(), 500.0, 300.0);
		assert!(state.needs_redraw());
		state.mark_drawn();
		assert!(!state.needs_redraw());

		let id = state.editor.nodes()[1].id;
		assert!(state.set_hover(Some(Target::Node(id))));
		assert!(!state.set_hover(Some(Target::Node(id))));
		assert!(state.needs_redraw());
		state.mark_drawn();

		state.editor.handle_node_click(id);
		assert!(state.needs_redraw());
	}

	#[test]
	fn resize_refits_viewport() {
		let mut state = TreeGraphState::new(&sample(), 500.0, 300.0);
		let k = state.viewport.k;
		state.resize(1000.0, 600.0);
		assert!((state.viewport.k - 2.0 * k).abs() < 1e-9);
	}
}
