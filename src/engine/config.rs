//! Tunable constants for every engine component.
//!
//! Each struct has a `Default` carrying the standard values and deserializes
//! with `#[serde(default)]`, so a partial JSON object overrides only the
//! fields it names.

use serde::Deserialize;

use super::error::{ConfigError, Result};

/// Model-level defaults applied to nodes and links that do not set their own.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	/// Radius of nodes without an explicit radius.
	pub node_radius: f64,
	/// Spring rest length of links without an explicit distance.
	pub link_distance: f64,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			node_radius: 5.0,
			link_distance: 50.0,
		}
	}
}

impl GraphConfig {
	/// Rejects defaults that are zero, negative or not finite. Checked even
	/// when every node and link brings its own value, since node mass is
	/// measured against `node_radius`.
	pub fn validate(&self) -> Result<()> {
		for (field, value) in [
			("node_radius", self.node_radius),
			("link_distance", self.link_distance),
		] {
			if !(value.is_finite() && value > 0.0) {
				return Err(ConfigError::InvalidDefault { field, value });
			}
		}
		Ok(())
	}
}

/// Strengths and parameters of the four forces.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
	/// Many-body strength. Negative values repel.
	pub charge_strength: f64,
	/// Barnes–Hut opening criterion. `0.0` computes every pair exactly.
	pub theta: f64,
	/// Pairs closer than this are treated as this far apart.
	pub distance_min: f64,
	/// Pairs farther apart than this do not interact.
	pub distance_max: f64,
	/// Multiplier on the degree-normalised spring strength.
	pub link_strength: f64,
	/// Spring relaxation passes per tick.
	pub link_iterations: usize,
	/// Fraction of the centroid offset removed each tick.
	pub center_strength: f64,
	/// Collision radius is `radius * collision_factor`.
	pub collision_factor: f64,
	/// Share of each overlap resolved per pass, in `[0, 1]`.
	pub collision_strength: f64,
	/// Overlap resolution passes per tick.
	pub collision_iterations: usize,
	/// Seed for the jitter applied to coincident nodes.
	pub seed: u64,
}

impl Default for ForceConfig {
	fn default() -> Self {
		Self {
			charge_strength: -100.0,
			theta: 0.9,
			distance_min: 1.0,
			distance_max: f64::INFINITY,
			link_strength: 1.0,
			link_iterations: 1,
			center_strength: 1.0,
			collision_factor: 1.5,
			collision_strength: 1.0,
			collision_iterations: 1,
			seed: 0x5eed,
		}
	}
}

/// Energy schedule and integration parameters.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	/// The simulation stops once alpha falls below this.
	pub alpha_min: f64,
	/// Fraction of the gap to `alpha_target` closed each tick.
	pub alpha_decay: f64,
	/// Fraction of velocity retained each tick.
	pub velocity_decay: f64,
	/// Alpha target held while a node is being dragged.
	pub drag_alpha_target: f64,
	/// Ticks per second of wall-clock time.
	pub tick_rate: f64,
	/// Upper bound on catch-up ticks run in a single frame.
	pub max_ticks_per_frame: u32,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		let alpha_min: f64 = 0.001;
		Self {
			alpha_min,
			// Reaches alpha_min from 1 in about 300 ticks.
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.6,
			drag_alpha_target: 0.3,
			tick_rate: 60.0,
			max_ticks_per_frame: 4,
		}
	}
}

/// Graph-space rectangle `[x0, y0] .. [x1, y1]`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Bounds {
	/// Left edge.
	pub x0: f64,
	/// Top edge.
	pub y0: f64,
	/// Right edge.
	pub x1: f64,
	/// Bottom edge.
	pub y1: f64,
}

/// Zoom bounds, pan extent and animation timing.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
	/// Smallest zoom factor.
	pub min_scale: f64,
	/// Largest zoom factor.
	pub max_scale: f64,
	/// Region of graph space the viewport may not pan away from. `None` is
	/// unbounded.
	pub translate_extent: Option<Bounds>,
	/// Duration of the recentering animation after a node click.
	pub center_duration_ms: f64,
}

impl Default for ViewportConfig {
	fn default() -> Self {
		Self {
			min_scale: 0.25,
			max_scale: 5.0,
			translate_extent: None,
			center_duration_ms: 750.0,
		}
	}
}

impl ViewportConfig {
	/// Rejects scale bounds that are inverted, non-positive or non-finite.
	pub fn validate(&self) -> Result<()> {
		let (min, max) = (self.min_scale, self.max_scale);
		if !(min.is_finite() && max.is_finite()) || min <= 0.0 {
			return Err(ConfigError::InvalidScale { min, max });
		}
		if min > max {
			return Err(ConfigError::InvertedScaleBounds { min, max });
		}
		Ok(())
	}
}

/// Gesture thresholds.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
	/// A press that travels farther than this (in surface pixels) is a drag,
	/// not a click.
	pub click_distance: f64,
}

impl Default for InteractionConfig {
	fn default() -> Self {
		Self {
			click_distance: 3.0,
		}
	}
}

/// Full configuration of an [`Explorer`](super::Explorer).
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
	/// Surface width in pixels.
	pub width: f64,
	/// Surface height in pixels.
	pub height: f64,
	/// Model defaults.
	pub graph: GraphConfig,
	/// Force parameters.
	pub forces: ForceConfig,
	/// Energy schedule.
	pub simulation: SimulationConfig,
	/// Zoom and pan limits.
	pub viewport: ViewportConfig,
	/// Gesture thresholds.
	pub interaction: InteractionConfig,
}

impl Default for ExplorerConfig {
	fn default() -> Self {
		Self {
			width: 800.0,
			height: 600.0,
			graph: GraphConfig::default(),
			forces: ForceConfig::default(),
			simulation: SimulationConfig::default(),
			viewport: ViewportConfig::default(),
			interaction: InteractionConfig::default(),
		}
	}
}

impl ExplorerConfig {
	/// Rejects a non-positive canvas, bad graph defaults or invalid viewport
	/// bounds.
	pub fn validate(&self) -> Result<()> {
		if !(self.width > 0.0 && self.height > 0.0) {
			return Err(ConfigError::InvalidCanvas {
				width: self.width,
				height: self.height,
			});
		}
		self.graph.validate()?;
		self.viewport.validate()
	}
}
