//! link-tree: interactive node-link tree diagram with user-drawn links.
//!
//! This crate provides a WASM-based component that lays out a hierarchy as a
//! tidy tree, renders it on a canvas, and lets the user add, select and
//! delete extra links between nodes.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::link_tree::{
	AddLinkOutcome, ExtraLink, GraphEditor, Hierarchy, LinkTreeCanvas, Selection, TreeConfig,
	TreeData,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("link-tree: logging initialized");
}

/// Parses the dataset JSON, logging why it was rejected.
pub fn parse_tree_data(json_text: &str) -> Option<TreeData> {
	match serde_json::from_str::<TreeData>(json_text) {
		Ok(data) => {
			info!(
				"link-tree: loaded hierarchy rooted at {:?} with {} extra links",
				data.tree.name,
				data.links.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("link-tree: failed to parse tree data: {}", e);
			None
		}
	}
}

/// Load the dataset from a script element with id="tree-data".
/// Expected format: JSON with { tree: {...}, links?: [...], config?: {...} }
fn load_tree_data() -> Option<TreeData> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("tree-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;
	parse_tree_data(&json_text)
}

/// Main application component.
/// Loads the dataset from the DOM and renders the editable tree.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let tree_data = load_tree_data().unwrap_or_default();
	let tree_signal = Signal::derive(move || tree_data.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />
		<Title text="Link Tree" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-tree">
			<LinkTreeCanvas data=tree_signal fullscreen=true />
			<div class="tree-overlay">
				<h1>"Link Tree"</h1>
				<p class="subtitle">"Click two nodes to link them. Click a link to select it, Delete to remove it."</p>
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_accepts_minimal_document() {
		let data = parse_tree_data(r#"{ "tree": { "name": "solo" } }"#).unwrap();
		assert_eq!(data.tree.name, "solo");
		assert!(data.links.is_empty());
	}

	#[test]
	fn parse_rejects_missing_tree() {
		assert!(parse_tree_data(r#"{ "links": [] }"#).is_none());
		assert!(parse_tree_data("not json").is_none());
	}
}
