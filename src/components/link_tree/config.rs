//! Sizing and visual configuration for the tree diagram.
//!
//! `width`, `height` and `levels` size the layout and the background bands.
//! The editing model never reads them. Every field has a default, so a
//! partial `config` block in the input JSON is enough.

use serde::Deserialize;

/// Space reserved around the diagram, in world units.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
#[allow(missing_docs)]
pub struct Margin {
	pub top: f64,
	pub right: f64,
	pub bottom: f64,
	pub left: f64,
}

impl Default for Margin {
	fn default() -> Self {
		Self {
			top: 10.0,
			right: 40.0,
			bottom: 10.0,
			left: 40.0,
		}
	}
}

/// Node visual sizes in world units.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct NodeSizeConfig {
	/// Resting circle radius.
	pub radius: f64,
	/// Radius while hovered or selected.
	pub hover_radius: f64,
	/// Pick radius for clicks. Larger than the drawn radius so small nodes stay clickable.
	pub hit_radius: f64,
	/// Label font size.
	pub label_size: f64,
	/// Label rotation in degrees (negative = counter-clockwise).
	pub label_angle: f64,
}

impl Default for NodeSizeConfig {
	fn default() -> Self {
		Self {
			radius: 2.5,
			hover_radius: 3.5,
			hit_radius: 4.0,
			label_size: 5.0,
			label_angle: -35.0,
		}
	}
}

/// Link visual sizes in world units.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LinkSizeConfig {
	/// Resting stroke width.
	pub width: f64,
	/// Width while hovered or selected.
	pub hover_width: f64,
	/// Max distance from the curve that still counts as a hit.
	pub hit_tolerance: f64,
}

impl Default for LinkSizeConfig {
	fn default() -> Self {
		Self {
			width: 1.0,
			hover_width: 2.0,
			hit_tolerance: 2.0,
		}
	}
}

/// Complete configuration for the link tree.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct TreeConfig {
	/// Layout width. Depth spacing is `width / (tree_height + 1)`.
	pub width: f64,
	/// Nominal diagram height. Used for the initial canvas size when no container size is known.
	pub height: f64,
	/// Number of background level bands.
	pub levels: usize,
	/// Horizontal spacing between neighbouring nodes.
	pub node_spacing: f64,
	/// Space around the bands.
	pub margin: Margin,
	/// Node circle and label sizes.
	pub node: NodeSizeConfig,
	/// Link stroke sizes.
	pub link: LinkSizeConfig,
}

impl Default for TreeConfig {
	fn default() -> Self {
		Self {
			width: 500.0,
			height: 300.0,
			levels: 7,
			node_spacing: 10.0,
			margin: Margin::default(),
			node: NodeSizeConfig::default(),
			link: LinkSizeConfig::default(),
		}
	}
}

impl TreeConfig {
	/// Vertical distance between depths for a tree of the given height.
	pub fn level_spacing(&self, tree_height: u32) -> f64 {
		self.width / (tree_height as f64 + 1.0)
	}
}
