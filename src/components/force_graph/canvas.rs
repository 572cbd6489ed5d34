//! [`Surface`] implementation on a 2D canvas context.
//!
//! The canvas has no retained scene graph, so primitives live in slot
//! arenas here and [`Surface::present`] repaints the whole frame:
//! background, then links, then nodes on top, then node labels.

use std::collections::BTreeSet;
use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::theme::Theme;
use crate::engine::{CircleStyle, Fill, LineCoords, Surface};

/// Handle to a circle on a [`CanvasSurface`].
#[derive(Debug, PartialEq, Eq)]
pub struct CircleId(usize);

/// Handle to a line on a [`CanvasSurface`].
#[derive(Debug, PartialEq, Eq)]
pub struct LineId(usize);

#[derive(Clone, Debug, PartialEq)]
enum Paint {
	Default,
	Highlight,
	Css(String),
}

#[derive(Clone, Debug)]
struct Circle {
	cx: f64,
	cy: f64,
	r: f64,
	paint: Paint,
	label: String,
}

/// Slot arena. Freed slots are reused lowest first, so iteration order
/// always follows creation order after a full detach and reattach.
#[derive(Debug)]
struct Slots<T> {
	items: Vec<Option<T>>,
	free: BTreeSet<usize>,
}

impl<T> Default for Slots<T> {
	fn default() -> Self {
		Self {
			items: Vec::new(),
			free: BTreeSet::new(),
		}
	}
}

impl<T> Slots<T> {
	fn insert(&mut self, item: T) -> usize {
		match self.free.pop_first() {
			Some(slot) => {
				self.items[slot] = Some(item);
				slot
			}
			None => {
				self.items.push(Some(item));
				self.items.len() - 1
			}
		}
	}

	fn remove(&mut self, slot: usize) {
		if let Some(item) = self.items.get_mut(slot) {
			if item.take().is_some() {
				self.free.insert(slot);
			}
		}
	}

	fn get_mut(&mut self, slot: usize) -> Option<&mut T> {
		self.items.get_mut(slot).and_then(Option::as_mut)
	}

	fn iter(&self) -> impl Iterator<Item = &T> {
		self.items.iter().flatten()
	}
}

/// Draws circles and lines onto a canvas with a [`Theme`].
pub struct CanvasSurface {
	ctx: CanvasRenderingContext2d,
	width: f64,
	height: f64,
	theme: Theme,
	circles: Slots<Circle>,
	lines: Slots<LineCoords>,
}

impl CanvasSurface {
	/// Empty surface drawing into `ctx`.
	pub fn new(ctx: CanvasRenderingContext2d, width: f64, height: f64, theme: Theme) -> Self {
		Self {
			ctx,
			width,
			height,
			theme,
			circles: Slots::default(),
			lines: Slots::default(),
		}
	}

	/// Call after resizing the canvas element.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Palette in use.
	pub fn theme(&self) -> &Theme {
		&self.theme
	}

	fn draw_background(&self) {
		self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
		if let Some(color) = self.theme.background {
			self.ctx.set_fill_style_str(&color.to_css());
			self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
		}
	}

	fn draw_links(&self) {
		let ctx = &self.ctx;
		ctx.set_stroke_style_str(&self.theme.link.color.to_css());
		ctx.set_line_width(self.theme.link.width);

		ctx.begin_path();
		for line in self.lines.iter() {
			ctx.move_to(line.x1, line.y1);
			ctx.line_to(line.x2, line.y2);
		}
		ctx.stroke();
	}

	fn draw_nodes(&self) {
		let ctx = &self.ctx;
		let node = &self.theme.node;
		let (default_fill, highlight) = (node.fill.to_css(), node.highlight.to_css());
		let border = node.border_color.to_css();

		for circle in self.circles.iter() {
			ctx.begin_path();
			let _ = ctx.arc(circle.cx, circle.cy, circle.r, 0.0, 2.0 * PI);
			let fill = match &circle.paint {
				Paint::Default => default_fill.as_str(),
				Paint::Highlight => highlight.as_str(),
				Paint::Css(css) => css.as_str(),
			};
			ctx.set_fill_style_str(fill);
			ctx.fill();

			if node.border_width > 0.0 {
				ctx.set_stroke_style_str(&border);
				ctx.set_line_width(node.border_width);
				ctx.stroke();
			}
		}

		if let Some(style) = &self.theme.label {
			ctx.set_fill_style_str(&style.color.to_css());
			ctx.set_font(&style.font);
			for circle in self.circles.iter() {
				let _ = ctx.fill_text(&circle.label, circle.cx + circle.r + 4.0, circle.cy + 3.0);
			}
		}
	}
}

impl Surface for CanvasSurface {
	type Circle = CircleId;
	type Line = LineId;

	fn create_circle(&mut self) -> CircleId {
		CircleId(self.circles.insert(Circle {
			cx: 0.0,
			cy: 0.0,
			r: 0.0,
			paint: Paint::Default,
			label: String::new(),
		}))
	}

	fn create_line(&mut self) -> LineId {
		LineId(self.lines.insert(LineCoords {
			x1: 0.0,
			y1: 0.0,
			x2: 0.0,
			y2: 0.0,
		}))
	}

	fn remove_circle(&mut self, circle: CircleId) {
		self.circles.remove(circle.0);
	}

	fn remove_line(&mut self, line: LineId) {
		self.lines.remove(line.0);
	}

	fn update_circle(&mut self, circle: &CircleId, style: &CircleStyle<'_>) {
		let Some(slot) = self.circles.get_mut(circle.0) else {
			return;
		};
		slot.cx = style.cx;
		slot.cy = style.cy;
		slot.r = style.r;
		match (style.fill, &mut slot.paint) {
			(Fill::Color(css), Paint::Css(current)) if current == css => {}
			(Fill::Color(css), paint) => *paint = Paint::Css(css.to_string()),
			(Fill::Default, paint) => *paint = Paint::Default,
			(Fill::Highlight, paint) => *paint = Paint::Highlight,
		}
		if slot.label != style.label {
			slot.label.clear();
			slot.label.push_str(style.label);
		}
	}

	fn update_line(&mut self, line: &LineId, coords: LineCoords) {
		if let Some(slot) = self.lines.get_mut(line.0) {
			*slot = coords;
		}
	}

	fn present(&mut self) {
		self.draw_background();
		self.draw_links();
		self.draw_nodes();
	}
}
