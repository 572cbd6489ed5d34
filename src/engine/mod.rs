//! Headless graph exploration engine.
//!
//! Nothing in here touches the browser. A host supplies a [`Surface`] and
//! drives an [`Explorer`] with pointer events and frame callbacks; the
//! canvas component in [`crate::components`] is one such host.

pub mod config;
pub mod error;
pub mod explorer;
pub mod forces;
pub mod graph;
pub mod interaction;
mod quadtree;
pub mod queue;
pub mod render;
pub mod simulation;
pub mod types;
pub mod viewport;

pub use config::ExplorerConfig;
pub use error::{ConfigError, Result};
pub use explorer::Explorer;
pub use graph::{GraphModel, Link, Node};
pub use interaction::{Modifiers, PointerEvent, PointerKind, SelectionState};
pub use queue::Task;
pub use render::{CircleStyle, Fill, LineCoords, Surface};
pub use simulation::{Simulation, Status};
pub use types::{GraphData, GraphLink, GraphNode};
pub use viewport::{Transform, ViewportController, WheelMode};
