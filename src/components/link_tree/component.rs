//! Leptos component wrapping the link tree canvas.
//!
//! The component creates a canvas, lays out the tree once the canvas is
//! mounted, and wires pointer and keyboard handlers into the editing model.
//! An animation loop repaints through `requestAnimationFrame` whenever the
//! state reports a change. A side panel mirrors the current selection and
//! offers the delete and cancel actions.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};

use super::render;
use super::state::{SelectionSummary, TreeGraphState};
use super::types::TreeData;

/// Actions triggered from the panel buttons or keyboard shortcuts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PanelCommand {
	DeleteLink,
	CancelNode,
}

impl PanelCommand {
	fn from_key(key: &str) -> Option<Self> {
		match key {
			"Delete" | "Backspace" => Some(Self::DeleteLink),
			"Escape" => Some(Self::CancelNode),
			_ => None,
		}
	}

	fn apply(self, state: &mut TreeGraphState) {
		match self {
			Self::DeleteLink => {
				state.delete_selected_link();
			}
			Self::CancelNode => state.editor.cancel_selected_node(),
		}
	}
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Calls `HtmlElement::style` explicitly; the Leptos prelude shadows it.
fn set_cursor(canvas: &HtmlCanvasElement, cursor: &str) -> Result<(), JsValue> {
	web_sys::HtmlElement::style(canvas).set_property("cursor", cursor)
}

fn cursor_for(over_target: bool) -> &'static str {
	if over_target { "pointer" } else { "default" }
}

fn canvas_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Renders an editable node-link tree on a canvas element.
///
/// The tree is laid out from `data` when the canvas mounts. Clicking two
/// nodes in turn draws a link between them; clicking a link selects it and
/// `Delete` removes it. `fullscreen = true` fills the viewport and tracks
/// window resizes. Explicit `width`/`height` override automatic sizing.
#[component]
pub fn LinkTreeCanvas(
	/// Hierarchy, seeded links and configuration.
	#[prop(into)]
	data: Signal<TreeData>,
	/// Fill the window and follow resizes.
	#[prop(default = false)]
	fullscreen: bool,
	/// Canvas width in pixels.
	#[prop(default = None)]
	width: Option<f64>,
	/// Canvas height in pixels.
	#[prop(default = None)]
	height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<TreeGraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let keydown_cb: Rc<RefCell<Option<Closure<dyn FnMut(KeyboardEvent)>>>> =
		Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init, keydown_cb_init) = (
		state.clone(),
		animate.clone(),
		resize_cb.clone(),
		keydown_cb.clone(),
	);

	let summary = RwSignal::new(SelectionSummary::Empty);
	let command = RwSignal::new(None::<PanelCommand>);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("link-tree: no window available");
			return;
		};
		let tree_data = data.get();

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((tree_data.config.width, tree_data.config.height))
		} else {
			let parent = canvas.parent_element();
			(
				width.unwrap_or_else(|| {
					parent
						.as_ref()
						.map(|p| p.client_width() as f64)
						.filter(|w| *w > 0.0)
						.unwrap_or(tree_data.config.width)
				}),
				height.unwrap_or_else(|| {
					parent
						.as_ref()
						.map(|p| p.client_height() as f64)
						.filter(|h| *h > 0.0)
						.unwrap_or(tree_data.config.height)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		{
			Some(ctx) => ctx,
			None => {
				error!("link-tree: canvas 2d context unavailable");
				return;
			}
		};

		*state_init.borrow_mut() = Some(TreeGraphState::new(&tree_data, w, h));
		summary.set(SelectionSummary::Empty);

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		*keydown_cb_init.borrow_mut() = Some(Closure::new(move |ev: KeyboardEvent| {
			if let Some(cmd) = PanelCommand::from_key(&ev.key()) {
				ev.prevent_default();
				command.set(Some(cmd));
			}
		}));
		if let Some(ref cb) = *keydown_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.needs_redraw() {
					render::render(s, &ctx);
					s.mark_drawn();
				}
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_cmd = state.clone();
	Effect::new(move |_| {
		let Some(cmd) = command.get() else {
			return;
		};
		if let Some(ref mut s) = *state_cmd.borrow_mut() {
			cmd.apply(s);
			summary.set(s.summary());
		}
		command.set(None);
	});

	let state_click = state.clone();
	let on_click = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = canvas_position(&canvas, &ev);

		if let Some(ref mut s) = *state_click.borrow_mut() {
			s.click(x, y);
			summary.set(s.summary());
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = canvas_position(&canvas, &ev);

		if let Some(ref mut s) = *state_mm.borrow_mut() {
			let target = s.pick(x, y);
			if s.set_hover(target) {
				let _ = set_cursor(&canvas, cursor_for(target.is_some()));
			}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.set_hover(None);
		}
	};

	view! {
		<div class="link-tree">
			<canvas
				node_ref=canvas_ref
				class="link-tree-canvas"
				on:click=on_click
				on:mousemove=on_mousemove
				on:mouseleave=on_mouseleave
				style="display: block;"
			/>
			<SelectionPanel summary=summary.read_only() command=command.write_only() />
		</div>
	}
}

/// Describes the current selection and exposes its actions.
#[component]
fn SelectionPanel(
	summary: ReadSignal<SelectionSummary>,
	command: WriteSignal<Option<PanelCommand>>,
) -> impl IntoView {
	view! {
		<aside class="link-tree-panel">
			{move || match summary.get() {
				SelectionSummary::Empty => {
					view! {
						<p class="hint">
							"Click a node, then another node, to draw a link. Click a link to select it."
						</p>
					}
						.into_any()
				}
				SelectionSummary::Node { label, path, depth, value, links } => {
					let detail = match value {
						Some(v) => format!("depth {depth}, value {v}, {links} links"),
						None => format!("depth {depth}, {links} links"),
					};
					view! {
						<div class="selection">
							<h2>{label}</h2>
							<p class="detail">{path}</p>
							<p class="detail">{detail}</p>
							<p class="hint">"Click another node to link it. Esc cancels."</p>
							<button on:click=move |_| command.set(Some(PanelCommand::CancelNode))>
								"Cancel"
							</button>
						</div>
					}
						.into_any()
				}
				SelectionSummary::Link { source, target, color, user_added } => {
					let kind = if user_added { "user link" } else { "tree link" };
					view! {
						<div class="selection">
							<h2>{format!("{source} to {target}")}</h2>
							<p class="detail" style=format!("color: {color}")>{kind}</p>
							<button on:click=move |_| command.set(Some(PanelCommand::DeleteLink))>
								"Delete link"
							</button>
						</div>
					}
						.into_any()
				}
			}}
		</aside>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keys_map_to_commands() {
		assert_eq!(PanelCommand::from_key("Delete"), Some(PanelCommand::DeleteLink));
		assert_eq!(PanelCommand::from_key("Backspace"), Some(PanelCommand::DeleteLink));
		assert_eq!(PanelCommand::from_key("Escape"), Some(PanelCommand::CancelNode));
		assert_eq!(PanelCommand::from_key("a"), None);
	}

	#[test]
	fn cursor_tracks_hover_target() {
		assert_eq!(cursor_for(true), "pointer");
		assert_eq!(cursor_for(false), "default");
	}
}
