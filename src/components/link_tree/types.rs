//! Input data structures for the link tree component.

use serde::Deserialize;

use super::config::TreeConfig;

/// One level of the nested input hierarchy.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Hierarchy {
	/// Display name. Also the path segment used to address this node.
	pub name: String,
	/// Optional numeric weight. Carried through to the node, not used for layout.
	#[serde(default)]
	pub value: Option<f64>,
	/// Child levels, in display order.
	#[serde(default)]
	pub children: Vec<Hierarchy>,
}

impl Hierarchy {
	/// Leaf constructor, handy for building hierarchies in code.
	pub fn leaf(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value: None,
			children: Vec::new(),
		}
	}

	/// Branch constructor.
	pub fn branch(name: impl Into<String>, children: Vec<Hierarchy>) -> Self {
		Self {
			name: name.into(),
			value: None,
			children,
		}
	}

	/// Number of levels below this node (0 for a leaf).
	pub fn height(&self) -> u32 {
		self.children
			.iter()
			.map(|c| c.height() + 1)
			.max()
			.unwrap_or(0)
	}
}

/// An extra link seeded from the input, addressed by `/`-joined name paths.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ExtraLink {
	/// Path of the source node, e.g. `"flare/analytics/cluster"`.
	pub source: String,
	/// Path of the target node.
	pub target: String,
	/// CSS color. Falls back to the user link color.
	#[serde(default)]
	pub color: Option<String>,
}

/// Complete input: hierarchy, seeded extra links, and view configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TreeData {
	/// Root of the hierarchy.
	pub tree: Hierarchy,
	/// Links added on top of the tree edges when the diagram loads.
	#[serde(default)]
	pub links: Vec<ExtraLink>,
	/// Sizing and spacing overrides.
	#[serde(default)]
	pub config: TreeConfig,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_nested_hierarchy_with_optional_fields() {
		let json = r#"{
			"tree": {
				"name": "flare",
				"children": [
					{ "name": "analytics", "children": [{ "name": "MergeEdge", "value": 743 }] },
					{ "name": "animate" }
				]
			}
		}"#;

		let data: TreeData = serde_json::from_str(json).unwrap();
		assert_eq!(data.tree.name, "flare");
		assert_eq!(data.tree.children.len(), 2);
		assert_eq!(data.tree.children[0].children[0].value, Some(743.0));
		assert!(data.tree.children[1].children.is_empty());
		assert!(data.links.is_empty());
		assert_eq!(data.config.levels, TreeConfig::default().levels);
	}

	#[test]
	fn parses_extra_links_and_partial_config() {
		let json = r##"{
			"tree": { "name": "root" },
			"links": [{ "source": "root/a", "target": "root/b", "color": "#fcc101" }],
			"config": { "width": 800 }
		}"##;

		let data: TreeData = serde_json::from_str(json).unwrap();
		assert_eq!(data.links.len(), 1);
		assert_eq!(data.links[0].color.as_deref(), Some("#fcc101"));
		assert_eq!(data.config.width, 800.0);
		assert_eq!(data.config.height, TreeConfig::default().height);
	}

	#[test]
	fn height_counts_deepest_branch() {
		let tree = Hierarchy::branch(
			"r",
			vec![
				Hierarchy::leaf("a"),
				Hierarchy::branch("b", vec![Hierarchy::branch("c", vec![Hierarchy::leaf("d")])]),
			],
		);
		assert_eq!(tree.height(), 3);
		assert_eq!(Hierarchy::leaf("x").height(), 0);
	}
}
