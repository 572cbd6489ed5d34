//! Pan/zoom transform and its animation.
//!
//! # Coordinate Spaces
//!
//! - **Graph space**: the coordinates the simulation writes into nodes.
//! - **Surface space**: pixels on the drawing surface.
//!
//! A [`Transform`] maps graph space to surface space as
//! `surface = graph * k + (x, y)`. Only [`ViewportController`] writes it;
//! every write bumps [`ViewportController::revision`] so the renderer can
//! tell a moved view from a still one.

use log::debug;

use super::config::ViewportConfig;
use super::error::{ConfigError, Result};
use super::graph::Node;

/// Scale-then-translate transform from graph space to surface space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
	/// Horizontal translation in surface pixels.
	pub x: f64,
	/// Vertical translation in surface pixels.
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl Default for Transform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl Transform {
	/// No pan, no zoom.
	pub const IDENTITY: Self = Self {
		x: 0.0,
		y: 0.0,
		k: 1.0,
	};

	/// Graph point to surface space.
	pub fn apply(&self, (gx, gy): (f64, f64)) -> (f64, f64) {
		(gx * self.k + self.x, gy * self.k + self.y)
	}

	/// Surface point back to graph space.
	pub fn invert(&self, (sx, sy): (f64, f64)) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	fn lerp(&self, to: &Transform, t: f64) -> Transform {
		Transform {
			x: self.x + (to.x - self.x) * t,
			y: self.y + (to.y - self.y) * t,
			k: self.k + (to.k - self.k) * t,
		}
	}
}

/// One pan/zoom gesture step: zoom by `factor` about `anchor` (surface
/// space), then pan by `(dx, dy)` surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanZoom {
	/// Horizontal pan.
	pub dx: f64,
	/// Vertical pan.
	pub dy: f64,
	/// Scale multiplier; 1 leaves the zoom alone.
	pub factor: f64,
	/// Surface point that stays fixed while zooming.
	pub anchor: (f64, f64),
}

impl PanZoom {
	/// Pure translation.
	pub fn pan(dx: f64, dy: f64) -> Self {
		Self {
			dx,
			dy,
			factor: 1.0,
			anchor: (0.0, 0.0),
		}
	}

	/// Pure zoom about `anchor`.
	pub fn zoom(factor: f64, anchor: (f64, f64)) -> Self {
		Self {
			dx: 0.0,
			dy: 0.0,
			factor,
			anchor,
		}
	}
}

/// How a wheel event's delta is measured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WheelMode {
	/// `DOM_DELTA_PIXEL`.
	#[default]
	Pixel,
	/// `DOM_DELTA_LINE`.
	Line,
	/// `DOM_DELTA_PAGE`.
	Page,
}

/// Zoom factor for a wheel step. Scrolling down zooms out; ctrl (pinch on
/// trackpads) zooms ten times faster.
pub fn wheel_factor(delta_y: f64, mode: WheelMode, ctrl: bool) -> f64 {
	let per_unit = match mode {
		WheelMode::Pixel => 0.002,
		WheelMode::Line => 0.05,
		WheelMode::Page => 1.0,
	};
	let boost = if ctrl { 10.0 } else { 1.0 };
	2f64.powf(-delta_y * per_unit * boost)
}

/// Cubic ease-in-out over `[0, 1]`.
fn ease_cubic_in_out(t: f64) -> f64 {
	let t = t * 2.0;
	if t <= 1.0 {
		t * t * t / 2.0
	} else {
		let t = t - 2.0;
		(t * t * t + 2.0) / 2.0
	}
}

#[derive(Clone, Debug)]
struct Animation {
	from: Transform,
	to: Transform,
	start_ms: f64,
	duration_ms: f64,
}

/// Owner of the view transform.
#[derive(Clone, Debug)]
pub struct ViewportController {
	config: ViewportConfig,
	width: f64,
	height: f64,
	transform: Transform,
	animation: Option<Animation>,
	revision: u64,
}

impl ViewportController {
	/// Identity view over a `width × height` surface.
	pub fn new(config: ViewportConfig, width: f64, height: f64) -> Result<Self> {
		config.validate()?;
		if !(width > 0.0 && height > 0.0) {
			return Err(ConfigError::InvalidCanvas { width, height });
		}
		let mut viewport = Self {
			config,
			width,
			height,
			transform: Transform::IDENTITY,
			animation: None,
			revision: 0,
		};
		viewport.transform = viewport.constrain(Transform::IDENTITY);
		Ok(viewport)
	}

	/// Current graph-to-surface transform.
	pub fn transform(&self) -> Transform {
		self.transform
	}

	/// Increments on every transform change.
	pub fn revision(&self) -> u64 {
		self.revision
	}

	/// A recentering animation is in flight.
	pub fn is_animating(&self) -> bool {
		self.animation.is_some()
	}

	/// Surface `(width, height)`.
	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	/// Limits in force.
	pub fn config(&self) -> &ViewportConfig {
		&self.config
	}

	/// Adopts a new surface size, re-applying the pan extent. Ignores a
	/// non-positive size.
	pub fn resize(&mut self, width: f64, height: f64) {
		if width > 0.0 && height > 0.0 {
			self.width = width;
			self.height = height;
			let constrained = self.constrain(self.transform);
			self.set(constrained);
		}
	}

	/// Applies one gesture step, cancelling any running animation. Scale
	/// always stays within the configured bounds; non-finite or
	/// non-positive input degrades to the nearest bound or is ignored.
	pub fn apply_pan_zoom(&mut self, delta: PanZoom) -> Transform {
		self.cancel_animation();
		let t = self.transform;

		let target_k = t.k * delta.factor;
		let k = if target_k.is_nan() {
			t.k
		} else {
			target_k.clamp(self.config.min_scale, self.config.max_scale)
		};
		let ratio = k / t.k;
		let (ax, ay) = delta.anchor;
		let finite = |v: f64| if v.is_finite() { v } else { 0.0 };

		let next = Transform {
			x: ax - (ax - t.x) * ratio + finite(delta.dx),
			y: ay - (ay - t.y) * ratio + finite(delta.dy),
			k,
		};
		let next = self.constrain(next);
		self.set(next);
		next
	}

	/// Starts an eased transition from the current transform to `target`.
	/// A non-positive duration jumps straight there.
	pub fn animate_to(&mut self, target: Transform, duration_ms: f64, now_ms: f64) {
		let to = self.constrain(target);
		if !(duration_ms > 0.0) {
			self.animation = None;
			self.set(to);
			return;
		}
		debug!("viewport animating to {:?} over {}ms", to, duration_ms);
		self.animation = Some(Animation {
			from: self.transform,
			to,
			start_ms: now_ms,
			duration_ms,
		});
	}

	/// Animates so graph point `(x, y)` lands on the surface centre, keeping
	/// the current scale.
	pub fn center_on_point(&mut self, (x, y): (f64, f64), now_ms: f64) {
		let k = self.transform.k;
		let target = Transform {
			x: self.width / 2.0 - x * k,
			y: self.height / 2.0 - y * k,
			k,
		};
		self.animate_to(target, self.config.center_duration_ms, now_ms);
	}

	/// [`center_on_point`](Self::center_on_point) at the node's position.
	pub fn center_on(&mut self, node: &Node, now_ms: f64) {
		self.center_on_point(node.position(), now_ms);
	}

	/// Drops a running animation, leaving the transform where it is.
	pub fn cancel_animation(&mut self) -> bool {
		let cancelled = self.animation.take().is_some();
		if cancelled {
			debug!("viewport animation cancelled");
		}
		cancelled
	}

	/// Advances the animation to `now_ms`. Returns true if the transform
	/// changed. The last frame lands exactly on the target.
	pub fn step(&mut self, now_ms: f64) -> bool {
		let Some(anim) = &self.animation else {
			return false;
		};
		let t = ((now_ms - anim.start_ms) / anim.duration_ms).clamp(0.0, 1.0);
		let next = if t >= 1.0 {
			anim.to
		} else {
			anim.from.lerp(&anim.to, ease_cubic_in_out(t))
		};
		if t >= 1.0 {
			self.animation = None;
			debug!("viewport animation finished");
		}
		if next == self.transform {
			return false;
		}
		self.set(next);
		true
	}

	fn set(&mut self, transform: Transform) {
		if transform != self.transform {
			self.transform = transform;
			self.revision += 1;
		}
	}

	/// Clamps scale and keeps the visible region from leaving the translate
	/// extent. When the extent is smaller than the view it is centred.
	fn constrain(&self, t: Transform) -> Transform {
		let k = t.k.clamp(self.config.min_scale, self.config.max_scale);
		let t = Transform { k, ..t };
		let Some(extent) = self.config.translate_extent else {
			return t;
		};

		let dx0 = -t.x / k - extent.x0;
		let dx1 = (self.width - t.x) / k - extent.x1;
		let dy0 = -t.y / k - extent.y0;
		let dy1 = (self.height - t.y) / k - extent.y1;
		let shift = |d0: f64, d1: f64| {
			if d1 > d0 {
				(d0 + d1) / 2.0
			} else if d0 < 0.0 {
				d0
			} else {
				d1.max(0.0)
			}
		};

		Transform {
			x: t.x + k * shift(dx0, dx1),
			y: t.y + k * shift(dy0, dy1),
			k,
		}
	}
}
