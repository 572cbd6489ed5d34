//! Ordered work queue shared by input and the simulation clock.
//!
//! Pointer input and simulation ticks land on one FIFO and are drained on
//! the frame callback, so a gesture always sees the model as the previous
//! task left it.

use std::collections::VecDeque;

use super::interaction::PointerEvent;

/// One unit of work for the explorer.
#[derive(Clone, Debug, PartialEq)]
pub enum Task {
	/// Input for the gesture state machine.
	Pointer(PointerEvent),
	/// One simulation step.
	Tick,
	/// The surface changed size.
	Resize {
		/// New width in pixels.
		width: f64,
		/// New height in pixels.
		height: f64,
	},
}

/// FIFO of pending [`Task`]s.
#[derive(Clone, Debug, Default)]
pub struct TaskQueue {
	tasks: VecDeque<Task>,
}

impl TaskQueue {
	/// Empty queue.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends behind everything already queued.
	pub fn push(&mut self, task: Task) {
		self.tasks.push_back(task);
	}

	/// Appends `count` ticks.
	pub fn push_ticks(&mut self, count: u32) {
		self.tasks.extend((0..count).map(|_| Task::Tick));
	}

	/// Oldest task.
	pub fn pop(&mut self) -> Option<Task> {
		self.tasks.pop_front()
	}

	/// Number of tasks waiting.
	pub fn len(&self) -> usize {
		self.tasks.len()
	}

	/// Nothing waiting.
	pub fn is_empty(&self) -> bool {
		self.tasks.is_empty()
	}

	/// Drops everything pending.
	pub fn clear(&mut self) {
		self.tasks.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn drains_in_arrival_order() {
		let mut queue = TaskQueue::new();
		queue.push(Task::Pointer(PointerEvent::down(1.0, 2.0)));
		queue.push_ticks(2);
		queue.push(Task::Pointer(PointerEvent::up(1.0, 2.0)));
		assert_eq!(queue.len(), 4);

		assert_eq!(queue.pop(), Some(Task::Pointer(PointerEvent::down(1.0, 2.0))));
		assert_eq!(queue.pop(), Some(Task::Tick));
		assert_eq!(queue.pop(), Some(Task::Tick));
		assert_eq!(queue.pop(), Some(Task::Pointer(PointerEvent::up(1.0, 2.0))));
		assert_eq!(queue.pop(), None);
		assert!(queue.is_empty());
	}

	#[test]
	fn zero_ticks_pushes_nothing() {
		let mut queue = TaskQueue::new();
		queue.push_ticks(0);
		assert!(queue.is_empty());
		queue.push(Task::Resize {
			width: 10.0,
			height: 10.0,
		});
		queue.clear();
		assert!(queue.is_empty());
	}
}
