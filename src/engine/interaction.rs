//! Pointer gesture state machine and node selection.
//!
//! A press on a node pins it and starts a drag; a press on empty canvas
//! starts a pan. Releasing within `click_distance` of the press point is
//! also a click: on a node it selects and recenters, on the canvas it
//! clears the selection. A press that travels farther is consumed by the
//! drag or pan and never clicks.
//!
//! Pressing a node reheats the simulation, restarting it if it was stopped.

use log::{debug, warn};

use super::config::InteractionConfig;
use super::graph::{GraphModel, Node};
use super::simulation::Simulation;
use super::viewport::{PanZoom, ViewportController, WheelMode, wheel_factor};

/// Keyboard modifiers held during a pointer event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
	/// Control. Trackpad pinches arrive with it set and zoom faster.
	pub ctrl: bool,
	/// Shift.
	pub shift: bool,
	/// Alt or Option.
	pub alt: bool,
	/// Meta or Command.
	pub meta: bool,
}

/// What happened to the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerKind {
	/// Primary button pressed.
	Down,
	/// Pointer moved, pressed or not.
	Move,
	/// Primary button released.
	Up,
	/// The pointer left the surface; ends any gesture without a click.
	Leave,
	/// Wheel turned; zooms about the pointer.
	Wheel {
		/// Vertical delta in `mode` units. Positive zooms out.
		delta_y: f64,
		/// Unit of `delta_y`.
		mode: WheelMode,
	},
}

/// A pointer event in surface-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
	/// What happened.
	pub kind: PointerKind,
	/// Surface x in pixels.
	pub x: f64,
	/// Surface y in pixels.
	pub y: f64,
	/// Keys held at the time.
	pub modifiers: Modifiers,
}

impl PointerEvent {
	/// Event with no modifiers held.
	pub fn new(kind: PointerKind, x: f64, y: f64) -> Self {
		Self {
			kind,
			x,
			y,
			modifiers: Modifiers::default(),
		}
	}

	/// Shorthand for a [`PointerKind::Down`].
	pub fn down(x: f64, y: f64) -> Self {
		Self::new(PointerKind::Down, x, y)
	}

	/// Shorthand for a [`PointerKind::Move`].
	pub fn moved(x: f64, y: f64) -> Self {
		Self::new(PointerKind::Move, x, y)
	}

	/// Shorthand for a [`PointerKind::Up`].
	pub fn up(x: f64, y: f64) -> Self {
		Self::new(PointerKind::Up, x, y)
	}

	/// Surface `(x, y)`.
	pub fn position(&self) -> (f64, f64) {
		(self.x, self.y)
	}
}

/// The currently selected node, if any.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
	selected: Option<String>,
	revision: u64,
}

impl SelectionState {
	/// Id of the selected node.
	pub fn selected_id(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	/// Whether `id` is the selected node.
	pub fn is_selected(&self, id: &str) -> bool {
		self.selected.as_deref() == Some(id)
	}

	/// Increments on every selection change.
	pub fn revision(&self) -> u64 {
		self.revision
	}

	#[cfg(test)]
	pub(crate) fn of(id: &str) -> Self {
		Self {
			selected: Some(id.to_string()),
			revision: 1,
		}
	}
}

/// Called synchronously with the new selection whenever it changes.
pub type SelectCallback = Box<dyn FnMut(Option<&Node>)>;

#[derive(Clone, Debug, PartialEq)]
enum Gesture {
	Idle,
	Dragging {
		node_id: String,
		origin: (f64, f64),
		moved: bool,
	},
	Panning {
		origin: (f64, f64),
		last: (f64, f64),
		moved: bool,
	},
}

/// Everything a gesture may touch.
pub struct Scene<'a> {
	/// Nodes to hit-test, pin and select.
	pub graph: &'a mut GraphModel,
	/// Reheated while a node is dragged.
	pub simulation: &'a mut Simulation,
	/// Panned, zoomed and recentered.
	pub viewport: &'a mut ViewportController,
}

/// Topmost node whose circle contains graph point `(x, y)`.
pub fn hit_test(graph: &GraphModel, (x, y): (f64, f64)) -> Option<usize> {
	graph
		.nodes()
		.iter()
		.enumerate()
		.rev()
		.find(|(_, n)| {
			let (dx, dy) = (n.x - x, n.y - y);
			dx * dx + dy * dy <= n.radius * n.radius
		})
		.map(|(idx, _)| idx)
}

fn travelled(origin: (f64, f64), to: (f64, f64)) -> f64 {
	((to.0 - origin.0).powi(2) + (to.1 - origin.1).powi(2)).sqrt()
}

/// Gesture state plus the selection it drives.
pub struct InteractionController {
	config: InteractionConfig,
	drag_alpha_target: f64,
	gesture: Gesture,
	selection: SelectionState,
	on_select: Option<SelectCallback>,
}

impl InteractionController {
	/// `drag_alpha_target` is the energy the simulation is held at while a
	/// node is dragged.
	pub fn new(config: InteractionConfig, drag_alpha_target: f64) -> Self {
		Self {
			config,
			drag_alpha_target,
			gesture: Gesture::Idle,
			selection: SelectionState::default(),
			on_select: None,
		}
	}

	/// Current selection.
	pub fn selection(&self) -> &SelectionState {
		&self.selection
	}

	/// Replaces the selection-change callback.
	pub fn set_on_select(&mut self, callback: SelectCallback) {
		self.on_select = Some(callback);
	}

	/// No press in progress.
	pub fn is_idle(&self) -> bool {
		self.gesture == Gesture::Idle
	}

	/// Id of the node being dragged.
	pub fn dragged_node(&self) -> Option<&str> {
		match &self.gesture {
			Gesture::Dragging { node_id, .. } => Some(node_id),
			_ => None,
		}
	}

	/// A press on empty canvas is in progress.
	pub fn is_panning(&self) -> bool {
		matches!(self.gesture, Gesture::Panning { .. })
	}

	/// Advances the gesture state machine by one event.
	pub fn handle(&mut self, event: &PointerEvent, scene: Scene<'_>, now_ms: f64) {
		let point = event.position();
		match event.kind {
			PointerKind::Down => self.pointer_down(point, scene),
			PointerKind::Move => self.pointer_move(point, scene),
			PointerKind::Up => self.pointer_up(point, scene, now_ms),
			PointerKind::Leave => self.pointer_leave(scene),
			PointerKind::Wheel { delta_y, mode } => {
				let factor = wheel_factor(delta_y, mode, event.modifiers.ctrl);
				scene.viewport.apply_pan_zoom(PanZoom::zoom(factor, point));
			}
		}
	}

	fn pointer_down(&mut self, point: (f64, f64), scene: Scene<'_>) {
		if self.gesture != Gesture::Idle {
			return;
		}
		scene.viewport.cancel_animation();

		let graph_point = scene.viewport.transform().invert(point);
		match hit_test(scene.graph, graph_point) {
			Some(idx) => {
				let node = &scene.graph.nodes()[idx];
				let (node_id, (x, y)) = (node.id.clone(), node.position());
				scene.graph.pin(idx, x, y);
				scene.simulation.reheat(self.drag_alpha_target);
				debug!("drag start on {}", node_id);
				self.gesture = Gesture::Dragging {
					node_id,
					origin: point,
					moved: false,
				};
			}
			None => {
				self.gesture = Gesture::Panning {
					origin: point,
					last: point,
					moved: false,
				};
			}
		}
	}

	fn pointer_move(&mut self, point: (f64, f64), scene: Scene<'_>) {
		let threshold = self.config.click_distance;
		match &mut self.gesture {
			Gesture::Idle => {}
			Gesture::Dragging {
				node_id,
				origin,
				moved,
			} => {
				*moved |= travelled(*origin, point) > threshold;
				let Some(idx) = scene.graph.index_of(node_id) else {
					warn!("drag target {} no longer exists, dropping gesture", node_id);
					self.gesture = Gesture::Idle;
					return;
				};
				let (gx, gy) = scene.viewport.transform().invert(point);
				scene.graph.pin(idx, gx, gy);
			}
			Gesture::Panning {
				origin,
				last,
				moved,
			} => {
				*moved |= travelled(*origin, point) > threshold;
				let (dx, dy) = (point.0 - last.0, point.1 - last.1);
				*last = point;
				scene.viewport.apply_pan_zoom(PanZoom::pan(dx, dy));
			}
		}
	}

	fn pointer_up(&mut self, point: (f64, f64), scene: Scene<'_>, now_ms: f64) {
		let threshold = self.config.click_distance;
		match std::mem::replace(&mut self.gesture, Gesture::Idle) {
			Gesture::Idle => {}
			Gesture::Dragging {
				node_id,
				origin,
				moved,
			} => {
				let Some(idx) = scene.graph.index_of(&node_id) else {
					warn!("drag target {} no longer exists, ignoring release", node_id);
					return;
				};
				scene.graph.unpin(idx);
				scene.simulation.cool();
				debug!("drag end on {}", node_id);

				if !moved && travelled(origin, point) <= threshold {
					self.select(scene.graph, Some(idx));
					scene.viewport.center_on(&scene.graph.nodes()[idx], now_ms);
				}
			}
			Gesture::Panning { origin, moved, .. } => {
				if !moved && travelled(origin, point) <= threshold {
					self.select(scene.graph, None);
				}
			}
		}
	}

	fn pointer_leave(&mut self, scene: Scene<'_>) {
		if let Gesture::Dragging { node_id, .. } = std::mem::replace(&mut self.gesture, Gesture::Idle) {
			if let Some(idx) = scene.graph.index_of(&node_id) {
				scene.graph.unpin(idx);
			}
			scene.simulation.cool();
			debug!("drag on {} ended by pointer leaving", node_id);
		}
	}

	fn select(&mut self, graph: &GraphModel, idx: Option<usize>) {
		let node = idx.and_then(|i| graph.node(i));
		let id = node.map(|n| n.id.clone());
		if id == self.selection.selected {
			return;
		}
		debug!("selection changed to {:?}", id);
		self.selection.selected = id;
		self.selection.revision += 1;
		if let Some(callback) = self.on_select.as_mut() {
			callback(node);
		}
	}
}
