//! Drawing-space geometry: link curves, hit distances, bands and view fitting.
//!
//! Layout coordinates are squashed vertically by [`VERTICAL_SQUASH`] when
//! drawn, so depth rows sit half a level spacing apart on screen. Everything
//! here works in that squashed drawing space unless noted.

use super::config::TreeConfig;
use super::editor::{Link, Node, NodeRef};

/// Factor applied to layout `y` before drawing.
pub const VERTICAL_SQUASH: f64 = 0.5;

/// Segments used to approximate a link curve for hit testing.
const CURVE_SAMPLES: usize = 24;

/// A position in drawing or screen space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[allow(missing_docs)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	/// Point at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance.
	pub fn distance(self, other: Point) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		(dx * dx + dy * dy).sqrt()
	}
}

/// Where a layout position is drawn.
pub fn draw_point(x: f64, y: f64) -> Point {
	Point::new(x, y * VERTICAL_SQUASH)
}

/// Where `node` is drawn.
pub fn node_point(node: &Node) -> Point {
	draw_point(node.x, node.y)
}

fn ref_point(node: &NodeRef) -> Point {
	draw_point(node.x, node.y)
}

/// Cubic Bézier leaving the source vertically and entering the target vertically.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkCurve {
	/// Source end.
	pub start: Point,
	/// Below the source, halfway down.
	pub control1: Point,
	/// Above the target, halfway down.
	pub control2: Point,
	/// Target end.
	pub end: Point,
}

impl LinkCurve {
	/// Curve from `start` to `end` with both tangents vertical.
	pub fn vertical(start: Point, end: Point) -> Self {
		let mid_y = (start.y + end.y) / 2.0;
		Self {
			start,
			control1: Point::new(start.x, mid_y),
			control2: Point::new(end.x, mid_y),
			end,
		}
	}

	/// Drawn curve of `link`.
	pub fn for_link(link: &Link) -> Self {
		Self::vertical(ref_point(&link.source), ref_point(&link.target))
	}

	/// Point at parameter `t` in [0, 1].
	pub fn point_at(&self, t: f64) -> Point {
		let u = 1.0 - t;
		let (b0, b1, b2, b3) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
		Point::new(
			b0 * self.start.x + b1 * self.control1.x + b2 * self.control2.x + b3 * self.end.x,
			b0 * self.start.y + b1 * self.control1.y + b2 * self.control2.y + b3 * self.end.y,
		)
	}

	/// Approximate shortest distance from `p` to the curve.
	pub fn distance_to(&self, p: Point) -> f64 {
		let mut best = f64::INFINITY;
		let mut prev = self.start;
		for i in 1..=CURVE_SAMPLES {
			let next = self.point_at(i as f64 / CURVE_SAMPLES as f64);
			best = best.min(distance_to_segment(p, prev, next));
			prev = next;
		}
		best
	}
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
	let (dx, dy) = (b.x - a.x, b.y - a.y);
	let len_sq = dx * dx + dy * dy;
	if len_sq < 1e-12 {
		return p.distance(a);
	}
	let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
	p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Axis-aligned rectangle, `(x, y)` being the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[allow(missing_docs)]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

/// Horizontal extent of the laid-out nodes, in layout units.
#[derive(Clone, Copy, Debug, PartialEq)]
#[allow(missing_docs)]
pub struct Extent {
	pub min_x: f64,
	pub max_x: f64,
}

impl Extent {
	/// Extent of `nodes`; zero-width at the origin when empty.
	pub fn of_nodes(nodes: &[Node]) -> Self {
		let (min_x, max_x) = nodes
			.iter()
			.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), n| {
				(lo.min(n.x), hi.max(n.x))
			});
		if min_x > max_x {
			Self { min_x: 0.0, max_x: 0.0 }
		} else {
			Self { min_x, max_x }
		}
	}

	/// Horizontal span.
	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}
}

/// Background stripe behind all nodes at `depth`.
pub fn band_rect(depth: usize, extent: Extent, config: &TreeConfig, level_spacing: f64) -> Rect {
	let row = level_spacing * VERTICAL_SQUASH;
	Rect {
		x: extent.min_x - config.node_spacing / 2.0 - config.margin.left,
		y: depth as f64 * row - row / 2.0,
		width: extent.width() + config.node_spacing + config.margin.left + config.margin.right,
		height: (row - 1.0).max(0.0),
	}
}

/// World rectangle that must stay visible: every band plus margins.
pub fn view_rect(extent: Extent, config: &TreeConfig, level_spacing: f64) -> Rect {
	let row = level_spacing * VERTICAL_SQUASH;
	let levels = config.levels.max(1) as f64;
	Rect {
		x: extent.min_x - config.node_spacing / 2.0 - config.margin.left,
		y: -row / 2.0 - config.margin.top,
		width: extent.width() + config.node_spacing + config.margin.left + config.margin.right,
		height: levels * row + config.margin.top + config.margin.bottom,
	}
}

/// World-to-screen transform: `screen = world * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Horizontal screen offset.
	pub x: f64,
	/// Vertical screen offset.
	pub y: f64,
	/// Uniform scale.
	pub k: f64,
}

impl Default for Viewport {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

impl Viewport {
	/// Largest uniform scale showing all of `world`, centered in the canvas.
	pub fn fit(world: Rect, width: f64, height: f64) -> Self {
		if world.width <= 0.0 || world.height <= 0.0 || width <= 0.0 || height <= 0.0 {
			return Self::default();
		}
		let k = (width / world.width).min(height / world.height);
		Self {
			x: (width - world.width * k) / 2.0 - world.x * k,
			y: (height - world.height * k) / 2.0 - world.y * k,
			k,
		}
	}

	/// World point to canvas pixels.
	pub fn to_screen(&self, p: Point) -> Point {
		Point::new(p.x * self.k + self.x, p.y * self.k + self.y)
	}

	/// Canvas pixels to world point.
	pub fn to_world(&self, p: Point) -> Point {
		Point::new((p.x - self.x) / self.k, (p.y - self.y) / self.k)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: Point, b: Point) -> bool {
		a.distance(b) < 1e-9
	}

	#[test]
	fn vertical_curve_passes_through_midpoint() {
		let curve = LinkCurve::vertical(Point::new(0.0, 0.0), Point::new(10.0, 100.0));
		assert!(close(curve.point_at(0.0), Point::new(0.0, 0.0)));
		assert!(close(curve.point_at(1.0), Point::new(10.0, 100.0)));
		assert!(close(curve.point_at(0.5), Point::new(5.0, 50.0)));
		assert_eq!(curve.control1, Point::new(0.0, 50.0));
		assert_eq!(curve.control2, Point::new(10.0, 50.0));
	}

	#[test]
	fn curve_distance_is_small_on_and_large_off_the_curve() {
		let curve = LinkCurve::vertical(Point::new(0.0, 0.0), Point::new(10.0, 100.0));
		assert!(curve.distance_to(Point::new(5.0, 50.0)) < 0.5);
		assert!(curve.distance_to(Point::new(0.0, 5.0)) < 0.5);
		assert!(curve.distance_to(Point::new(60.0, 50.0)) > 50.0);
	}

	#[test]
	fn degenerate_curve_measures_to_its_point() {
		let p = Point::new(3.0, 4.0);
		let curve = LinkCurve::vertical(p, p);
		assert!((curve.distance_to(Point::new(0.0, 0.0)) - 5.0).abs() < 1e-9);
	}

	#[test]
	fn draw_point_halves_y() {
		assert_eq!(draw_point(7.0, 100.0), Point::new(7.0, 50.0));
	}

	#[test]
	fn fit_centers_and_round_trips() {
		let world = Rect { x: 0.0, y: 0.0, width: 100.0, height: 50.0 };
		let view = Viewport::fit(world, 200.0, 200.0);
		assert_eq!(view.k, 2.0);
		assert!(close(view.to_screen(Point::new(0.0, 0.0)), Point::new(0.0, 50.0)));
		assert!(close(view.to_screen(Point::new(100.0, 50.0)), Point::new(200.0, 150.0)));

		let p = Point::new(37.0, 12.5);
		assert!(close(view.to_world(view.to_screen(p)), p));
	}

	#[test]
	fn fit_with_empty_world_is_identity() {
		assert_eq!(Viewport::fit(Rect::default(), 100.0, 100.0), Viewport::default());
	}

	#[test]
	fn bands_stack_inside_view() {
		let config = TreeConfig::default();
		let extent = Extent { min_x: -50.0, max_x: 50.0 };
		let view = view_rect(extent, &config, 100.0);
		let first = band_rect(0, extent, &config, 100.0);
		let last = band_rect(config.levels - 1, extent, &config, 100.0);

		assert_eq!(first.y, -25.0);
		assert_eq!(first.height, 49.0);
		assert_eq!(first.x, view.x);
		assert!(view.y <= first.y);
		assert!(last.y + last.height <= view.y + view.height);
	}
}
