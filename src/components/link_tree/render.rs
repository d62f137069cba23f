//! Canvas rendering for the link tree.
//!
//! Draw order:
//! 1. Background (screen space)
//! 2. Level bands (world space)
//! 3. Selection underlay, then all links
//! 4. Nodes, then labels on top

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::editor::{Link, Node, Selection};
use super::geometry::{LinkCurve, band_rect, node_point};
use super::state::{Target, TreeGraphState};
use super::theme::Color;

/// Renders the complete diagram to the canvas.
pub fn render(state: &TreeGraphState, ctx: &CanvasRenderingContext2d) {
	draw_background(state, ctx);

	ctx.save();
	let _ = ctx.translate(state.viewport.x, state.viewport.y);
	let _ = ctx.scale(state.viewport.k, state.viewport.k);

	draw_bands(state, ctx);
	draw_links(state, ctx);
	draw_nodes(state, ctx);
	draw_labels(state, ctx);

	ctx.restore();
}

fn draw_background(state: &TreeGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(&state.theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_bands(state: &TreeGraphState, ctx: &CanvasRenderingContext2d) {
	for depth in 0..state.config.levels {
		let rect = band_rect(depth, state.extent, &state.config, state.level_spacing);
		ctx.set_fill_style_str(&state.theme.band(depth).to_css());
		ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
	}
}

fn draw_links(state: &TreeGraphState, ctx: &CanvasRenderingContext2d) {
	let selected = match state.editor.selection() {
		Selection::Link(id) => state.editor.link(id),
		_ => None,
	};

	if let Some(link) = selected {
		let glow = state.theme.selection.with_alpha(0.5);
		stroke_link(ctx, link, &glow.to_css(), state.config.link.hover_width * 2.5);
	}

	for link in state.editor.links() {
		let emphasised = selected.is_some_and(|s| s.id == link.id)
			|| state.hover == Some(Target::Link(link.id));
		let width = if emphasised {
			state.config.link.hover_width
		} else {
			state.config.link.width
		};
		stroke_link(ctx, link, &link.color, width);
	}
}

fn stroke_link(ctx: &CanvasRenderingContext2d, link: &Link, color: &str, width: f64) {
	let curve = LinkCurve::for_link(link);
	ctx.set_stroke_style_str(color);
	ctx.set_line_width(width);
	ctx.begin_path();
	ctx.move_to(curve.start.x, curve.start.y);
	ctx.bezier_curve_to(
		curve.control1.x,
		curve.control1.y,
		curve.control2.x,
		curve.control2.y,
		curve.end.x,
		curve.end.y,
	);
	ctx.stroke();
}

fn draw_nodes(state: &TreeGraphState, ctx: &CanvasRenderingContext2d) {
	let pending = match state.editor.selection() {
		Selection::Node(id) => Some(id),
		_ => None,
	};

	for node in state.editor.nodes() {
		let hovered = state.hover == Some(Target::Node(node.id));
		let is_pending = pending == Some(node.id);
		let radius = if hovered || is_pending {
			state.config.node.hover_radius
		} else {
			state.config.node.radius
		};
		let fill = if node.has_children {
			state.theme.branch_node
		} else {
			state.theme.leaf_node
		};
		draw_node(ctx, node, radius, fill);

		if is_pending {
			draw_pending_ring(ctx, node, radius, state.theme.pending);
		}
	}
}

fn draw_node(ctx: &CanvasRenderingContext2d, node: &Node, radius: f64, fill: Color) {
	let p = node_point(node);
	ctx.begin_path();
	let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&fill.to_css());
	ctx.fill();
}

/// Dashed ring marking the first end of a link being drawn.
fn draw_pending_ring(ctx: &CanvasRenderingContext2d, node: &Node, radius: f64, color: Color) {
	let p = node_point(node);
	let ring = radius + 1.5;
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(1.5),
		&JsValue::from_f64(1.0),
	));
	ctx.set_stroke_style_str(&color.to_css());
	ctx.set_line_width(0.8);
	ctx.begin_path();
	let _ = ctx.arc(p.x, p.y, ring, 0.0, 2.0 * PI);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_labels(state: &TreeGraphState, ctx: &CanvasRenderingContext2d) {
	let node_cfg = &state.config.node;
	let angle = node_cfg.label_angle.to_radians();
	let offset = node_cfg.radius + 1.5;

	ctx.set_font(&format!("{}px sans-serif", node_cfg.label_size));
	ctx.set_text_align("end");
	ctx.set_text_baseline("middle");
	ctx.set_line_join("round");

	for node in state.editor.nodes() {
		let p = node_point(node);
		let halo = state
			.theme
			.band(node.depth as usize)
			.with_alpha(state.theme.label_halo_alpha);

		ctx.save();
		let _ = ctx.translate(p.x, p.y);
		let _ = ctx.rotate(angle);

		ctx.set_stroke_style_str(&halo.to_css());
		ctx.set_line_width(3.0);
		let _ = ctx.stroke_text(&node.label, -offset, 0.0);

		ctx.set_fill_style_str(&state.theme.label.to_css());
		let _ = ctx.fill_text(&node.label, -offset, 0.0);

		ctx.restore();
	}
}
