//! Visual theming for the canvas surface.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity in `[0, 1]`.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color at opacity `a`.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// `#rrggbb` when opaque, `rgba(...)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Link line style.
#[derive(Clone, Debug)]
pub struct LinkStyle {
	/// Stroke color.
	pub color: Color,
	/// Stroke width in surface pixels.
	pub width: f64,
}

/// Node circle style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Fill for nodes without their own color.
	pub fill: Color,
	/// Fill for the selected node.
	pub highlight: Color,
	/// Ring drawn around every node.
	pub border_color: Color,
	/// Border width in surface pixels (0 = no border).
	pub border_width: f64,
}

/// Node caption drawn to the right of each circle.
#[derive(Clone, Debug)]
pub struct LabelStyle {
	/// Text color.
	pub color: Color,
	/// CSS font shorthand.
	pub font: String,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Identifier for logs and pickers.
	pub name: &'static str,
	/// `None` leaves the canvas transparent so the page shows through.
	pub background: Option<Color>,
	/// Link lines.
	pub link: LinkStyle,
	/// Node circles.
	pub node: NodeStyle,
	/// `None` hides node labels.
	pub label: Option<LabelStyle>,
}

impl Theme {
	/// Grey links, white-ringed blue nodes, orange selection.
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			background: None,
			link: LinkStyle {
				color: Color::rgb(0x99, 0x99, 0x99).with_alpha(0.6),
				width: 1.0,
			},
			node: NodeStyle {
				fill: Color::rgb(0x1f, 0x77, 0xb4),
				highlight: Color::rgb(0xff, 0x77, 0x00),
				border_color: Color::rgb(255, 255, 255),
				border_width: 1.5,
			},
			label: Some(LabelStyle {
				color: Color::rgb(0x33, 0x33, 0x33),
				font: "10px sans-serif".to_string(),
			}),
		}
	}

	/// Same palette on a dark backdrop.
	pub fn midnight() -> Self {
		Self {
			name: "midnight",
			background: Some(Color::rgb(22, 27, 34)),
			link: LinkStyle {
				color: Color::rgba(140, 160, 180, 0.5),
				width: 1.0,
			},
			node: NodeStyle {
				border_color: Color::rgb(22, 27, 34),
				..Self::default_theme().node
			},
			label: Some(LabelStyle {
				color: Color::rgba(255, 255, 255, 0.85),
				font: "10px sans-serif".to_string(),
			}),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}
