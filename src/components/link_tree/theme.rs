//! Colors for the tree diagram.
//!
//! Provides the RGBA color type, the diverging level-band palette, and the
//! fixed node/link colors.

/// Color of tree-derived links.
pub const TREE_LINK_COLOR: &str = "#999999";
/// Color of links drawn by clicking two nodes.
pub const USER_LINK_COLOR: &str = "#000000";

/// RdYlGn diverging scheme, red to green (11 stops).
const RD_YL_GN: [Color; 11] = [
	Color::rgb(0xa5, 0x00, 0x26),
	Color::rgb(0xd7, 0x30, 0x27),
	Color::rgb(0xf4, 0x6d, 0x43),
	Color::rgb(0xfd, 0xae, 0x61),
	Color::rgb(0xfe, 0xe0, 0x8b),
	Color::rgb(0xff, 0xff, 0xbf),
	Color::rgb(0xd9, 0xef, 0x8b),
	Color::rgb(0xa6, 0xd9, 0x6a),
	Color::rgb(0x66, 0xbd, 0x63),
	Color::rgb(0x1a, 0x98, 0x50),
	Color::rgb(0x00, 0x68, 0x37),
];

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[allow(missing_docs)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with alpha in [0, 1].
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color, new alpha.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// `#rrggbb` when opaque, `rgba(..)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			self.to_css_rgb()
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// `#rrggbb`, alpha dropped.
	pub fn to_css_rgb(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}

	/// Parses `#rgb`, `#rrggbb`, `rgb(..)` and `rgba(..)`.
	pub fn parse_css(s: &str) -> Option<Self> {
		let s = s.trim();
		if let Some(hex) = s.strip_prefix('#') {
			return match hex.len() {
				6 => Some(Self::rgb(
					u8::from_str_radix(hex.get(0..2)?, 16).ok()?,
					u8::from_str_radix(hex.get(2..4)?, 16).ok()?,
					u8::from_str_radix(hex.get(4..6)?, 16).ok()?,
				)),
				3 => {
					let digit = |i: usize| -> Option<u8> {
						let v = u8::from_str_radix(hex.get(i..i + 1)?, 16).ok()?;
						Some(v * 17)
					};
					Some(Self::rgb(digit(0)?, digit(1)?, digit(2)?))
				}
				_ => None,
			};
		}

		let inner = s
			.strip_prefix("rgba(")
			.or_else(|| s.strip_prefix("rgb("))?
			.strip_suffix(')')?;
		let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
		if parts.len() < 3 {
			return None;
		}
		let channel = |p: &str| p.parse::<f64>().ok().map(|v| v.round().clamp(0.0, 255.0) as u8);
		let a = match parts.get(3) {
			Some(p) => p.parse().ok()?,
			None => 1.0,
		};
		Some(Self::rgba(
			channel(parts[0])?,
			channel(parts[1])?,
			channel(parts[2])?,
			a,
		))
	}
}

/// Uniform cubic B-spline through `stops`, sampled at `t` in [0, 1].
fn rgb_basis(stops: &[Color], t: f64) -> Color {
	let n = stops.len() - 1;
	let (t, i) = if t <= 0.0 {
		(0.0, 0)
	} else if t >= 1.0 {
		(1.0, n - 1)
	} else {
		(t, (t * n as f64).floor() as usize)
	};

	let channel = |f: fn(&Color) -> u8| -> u8 {
		let v1 = f(&stops[i]) as f64;
		let v2 = f(&stops[i + 1]) as f64;
		let v0 = if i > 0 { f(&stops[i - 1]) as f64 } else { 2.0 * v1 - v2 };
		let v3 = if i < n - 1 { f(&stops[i + 2]) as f64 } else { 2.0 * v2 - v1 };

		let t1 = (t - i as f64 / n as f64) * n as f64;
		let (t2, t3) = (t1 * t1, t1 * t1 * t1);
		let v = ((1.0 - 3.0 * t1 + 3.0 * t2 - t3) * v0
			+ (4.0 - 6.0 * t2 + 3.0 * t3) * v1
			+ (1.0 + 3.0 * t1 + 3.0 * t2 - 3.0 * t3) * v2
			+ t3 * v3)
			/ 6.0;
		v.round().clamp(0.0, 255.0) as u8
	};

	Color::rgb(channel(|c| c.r), channel(|c| c.g), channel(|c| c.b))
}

/// Red-yellow-green diverging color at `t` in [0, 1].
pub fn red_yellow_green(t: f64) -> Color {
	rgb_basis(&RD_YL_GN, t)
}

/// One color per depth band, green (shallow) to red (deep).
///
/// Samples the middle 60% of the red-yellow-green scheme so bands stay
/// readable under dark labels.
pub fn level_colors(levels: usize) -> Vec<Color> {
	let mut colors: Vec<Color> = (0..levels)
		.map(|i| {
			let t = if levels > 1 {
				i as f64 / (levels - 1) as f64
			} else {
				0.0
			};
			red_yellow_green(t * 0.6 + 0.2)
		})
		.collect();
	colors.reverse();
	colors
}

/// Visual style for nodes, links, labels and selection affordances.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas fill behind the bands.
	pub background: Color,
	/// Nodes with children.
	pub branch_node: Color,
	/// Nodes without children.
	pub leaf_node: Color,
	/// Glow drawn under the selected link.
	pub selection: Color,
	/// Outline drawn around the node waiting for a second click.
	pub pending: Color,
	/// Label text.
	pub label: Color,
	/// Opacity of the level-colored halo drawn behind labels.
	pub label_halo_alpha: f64,
	/// One color per depth, root first.
	pub bands: Vec<Color>,
}

impl Theme {
	/// Theme with `levels` background bands.
	pub fn with_levels(levels: usize) -> Self {
		Self {
			background: Color::rgb(255, 255, 255),
			branch_node: Color::rgb(0x00, 0x70, 0xbd),
			leaf_node: Color::rgb(0x3f, 0xa1, 0x42),
			selection: Color::rgb(0xe8, 0x50, 0x00),
			pending: Color::rgb(0xfc, 0xc1, 0x01),
			label: Color::rgb(0, 0, 0),
			label_halo_alpha: 0.3,
			bands: level_colors(levels),
		}
	}

	/// Band color for `depth`, repeating the last band below the deepest one.
	pub fn band(&self, depth: usize) -> Color {
		self.bands
			.get(depth)
			.or(self.bands.last())
			.copied()
			.unwrap_or(self.background)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn scheme_endpoints_and_midpoint() {
		assert_eq!(red_yellow_green(0.0), Color::rgb(0xa5, 0x00, 0x26));
		assert_eq!(red_yellow_green(1.0), Color::rgb(0x00, 0x68, 0x37));
		assert_eq!(red_yellow_green(0.5), Color::rgb(249, 247, 174));
	}

	#[test]
	fn level_colors_are_reversed_and_centered() {
		let colors = level_colors(7);
		assert_eq!(colors.len(), 7);
		assert_eq!(colors[0], red_yellow_green(0.8));
		assert_eq!(colors[6], red_yellow_green(0.2));
		assert_eq!(colors[3].to_css(), "#f9f7ae");
		assert_eq!(level_colors(1), vec![red_yellow_green(0.2)]);
		assert!(level_colors(0).is_empty());
	}

	#[test]
	fn parses_css_colors() {
		assert_eq!(Color::parse_css("#fcc101"), Some(Color::rgb(0xfc, 0xc1, 0x01)));
		assert_eq!(Color::parse_css("#f0a"), Some(Color::rgb(0xff, 0x00, 0xaa)));
		assert_eq!(Color::parse_css("rgb(1, 2, 3)"), Some(Color::rgb(1, 2, 3)));
		assert_eq!(
			Color::parse_css("rgba(10,20,30,0.5)"),
			Some(Color::rgba(10, 20, 30, 0.5))
		);
		assert_eq!(Color::parse_css("tomato"), None);
		assert_eq!(Color::parse_css("#12345"), None);
	}

	#[test]
	fn css_output_drops_opaque_alpha() {
		assert_eq!(Color::rgb(0, 112, 189).to_css(), "#0070bd");
		assert_eq!(Color::rgba(1, 2, 3, 0.5).to_css(), "rgba(1, 2, 3, 0.5)");
	}

	#[test]
	fn band_clamps_to_last_level() {
		let theme = Theme::with_levels(3);
		assert_eq!(theme.band(10), theme.bands[2]);
		assert_eq!(Theme::with_levels(0).band(0), theme.background);
	}
}
