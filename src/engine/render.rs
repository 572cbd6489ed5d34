//! Projection of the model onto a drawing surface.
//!
//! [`RenderSync`] owns one circle per node and one line per link on a
//! [`Surface`]. Each paint maps node positions through the view transform
//! and picks each circle's fill from the selection. The only state kept
//! between paints is the [`FrameStamp`] of the last frame drawn, used to skip
//! frames where nothing changed.

use super::graph::GraphModel;
use super::interaction::SelectionState;
use super::viewport::Transform;

/// How a circle should be filled. The surface resolves the named variants
/// to its own palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fill<'a> {
	/// The surface's default node color.
	Default,
	/// A node's own CSS color.
	Color(&'a str),
	/// The selection highlight.
	Highlight,
}

/// Geometry, fill and caption of one node circle, in surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleStyle<'a> {
	/// Centre x.
	pub cx: f64,
	/// Centre y.
	pub cy: f64,
	/// Radius after zoom.
	pub r: f64,
	/// Fill, resolved by the surface.
	pub fill: Fill<'a>,
	/// The node's name, or its id when unnamed.
	pub label: &'a str,
}

/// Endpoints of one link line, in surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineCoords {
	/// Source end x.
	pub x1: f64,
	/// Source end y.
	pub y1: f64,
	/// Target end x.
	pub x2: f64,
	/// Target end y.
	pub y2: f64,
}

/// A retained-mode 2D surface holding circle and line primitives.
///
/// Lines are created before circles, so surfaces drawing in creation order
/// put nodes above links.
pub trait Surface {
	/// Handle to a node primitive.
	type Circle;
	/// Handle to a link primitive.
	type Line;

	/// Adds a circle above everything created so far.
	fn create_circle(&mut self) -> Self::Circle;
	/// Adds a line above everything created so far.
	fn create_line(&mut self) -> Self::Line;
	/// Drops a circle. The handle is not used again.
	fn remove_circle(&mut self, circle: Self::Circle);
	/// Drops a line. The handle is not used again.
	fn remove_line(&mut self, line: Self::Line);
	/// Restyles an existing circle.
	fn update_circle(&mut self, circle: &Self::Circle, style: &CircleStyle<'_>);
	/// Moves an existing line.
	fn update_line(&mut self, line: &Self::Line, coords: LineCoords);
	/// Called once after every primitive of a frame has been updated.
	fn present(&mut self);
}

/// Revision counters identifying what a frame shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStamp {
	/// Simulation ticks run.
	pub ticks: u64,
	/// Viewport revision.
	pub view: u64,
	/// Selection revision.
	pub selection: u64,
	/// Bumped by the host when the surface itself changed, e.g. on resize.
	pub surface: u64,
}

/// Keeps a surface's primitives in step with a [`GraphModel`].
pub struct RenderSync<S: Surface> {
	circles: Vec<S::Circle>,
	lines: Vec<S::Line>,
	last: Option<FrameStamp>,
}

impl<S: Surface> Default for RenderSync<S> {
	fn default() -> Self {
		Self::new()
	}
}

impl<S: Surface> RenderSync<S> {
	/// Detached; the first paint creates the primitives.
	pub fn new() -> Self {
		Self {
			circles: Vec::new(),
			lines: Vec::new(),
			last: None,
		}
	}

	/// True once primitives exist for every node and link of `graph`.
	pub fn is_attached(&self, graph: &GraphModel) -> bool {
		self.circles.len() == graph.len() && self.lines.len() == graph.links().len()
	}

	/// Stamp of the last frame painted.
	pub fn last_frame(&self) -> Option<FrameStamp> {
		self.last
	}

	/// Forces the next [`paint`](Self::paint) to redraw.
	pub fn invalidate(&mut self) {
		self.last = None;
	}

	/// Removes every primitive this sync created.
	pub fn detach(&mut self, surface: &mut S) {
		for line in self.lines.drain(..) {
			surface.remove_line(line);
		}
		for circle in self.circles.drain(..) {
			surface.remove_circle(circle);
		}
		self.last = None;
	}

	fn attach(&mut self, surface: &mut S, graph: &GraphModel) {
		self.detach(surface);
		self.lines = graph.links().iter().map(|_| surface.create_line()).collect();
		self.circles = graph.nodes().iter().map(|_| surface.create_circle()).collect();
	}

	/// Paints `graph` unless `stamp` matches the last frame drawn. Returns
	/// whether the surface was updated.
	pub fn paint(
		&mut self,
		surface: &mut S,
		graph: &GraphModel,
		transform: Transform,
		selection: &SelectionState,
		stamp: FrameStamp,
	) -> bool {
		if !self.is_attached(graph) {
			self.attach(surface, graph);
		} else if self.last == Some(stamp) {
			return false;
		}

		let nodes = graph.nodes();
		for (line, link) in self.lines.iter().zip(graph.links()) {
			let (x1, y1) = transform.apply(nodes[link.source].position());
			let (x2, y2) = transform.apply(nodes[link.target].position());
			surface.update_line(line, LineCoords { x1, y1, x2, y2 });
		}

		for (circle, node) in self.circles.iter().zip(nodes) {
			let (cx, cy) = transform.apply(node.position());
			let fill = if selection.is_selected(&node.id) {
				Fill::Highlight
			} else {
				node.color.as_deref().map_or(Fill::Default, Fill::Color)
			};
			let style = CircleStyle {
				cx,
				cy,
				r: node.radius * transform.k,
				fill,
				label: node.label(),
			};
			surface.update_circle(circle, &style);
		}

		surface.present();
		self.last = Some(stamp);
		true
	}
}
