//! Configuration errors raised while building the graph model or viewport.

/// Malformed input detected at construction time.
///
/// Construction fails atomically: when one of these is returned nothing was
/// built. The first offending item in input order is reported.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
	/// Two nodes share an id.
	#[error("duplicate node id: {id}")]
	DuplicateNode {
		/// The repeated id.
		id: String,
	},

	/// A link names a node that does not exist.
	#[error("link {link} ({source_id} -> {target_id}) references missing node: {missing}")]
	MissingEndpoint {
		/// Index of the link in the input.
		link: usize,
		/// Source id as written.
		source_id: String,
		/// Target id as written.
		target_id: String,
		/// Whichever of the two was not found.
		missing: String,
	},

	/// A node's own radius is zero, negative or not finite.
	#[error("node {id} has non-positive radius {radius}")]
	InvalidRadius {
		/// Offending node.
		id: String,
		/// The rejected radius.
		radius: f64,
	},

	/// A link's own rest distance is zero, negative or not finite.
	#[error("link {link} has non-positive rest distance {distance}")]
	InvalidDistance {
		/// Index of the link in the input.
		link: usize,
		/// The rejected distance.
		distance: f64,
	},

	/// A graph-wide default (`node_radius` or `link_distance`) is not a
	/// positive finite number.
	#[error("default {field} must be positive and finite, got {value}")]
	InvalidDefault {
		/// Name of the configuration field.
		field: &'static str,
		/// The rejected value.
		value: f64,
	},

	/// `min_scale` exceeds `max_scale`.
	#[error("scale bounds inverted: min {min} > max {max}")]
	InvertedScaleBounds {
		/// Configured lower bound.
		min: f64,
		/// Configured upper bound.
		max: f64,
	},

	/// A scale bound is non-positive or not finite.
	#[error("scale bounds must be positive and finite, got [{min}, {max}]")]
	InvalidScale {
		/// Configured lower bound.
		min: f64,
		/// Configured upper bound.
		max: f64,
	},

	/// The drawing surface has no area.
	#[error("canvas size must be positive, got {width}x{height}")]
	InvalidCanvas {
		/// Requested width.
		width: f64,
		/// Requested height.
		height: f64,
	},
}

/// Result alias for fallible construction.
pub type Result<T> = std::result::Result<T, ConfigError>;
