//! Browser-facing leptos components.

pub mod force_graph;
