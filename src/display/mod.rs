//! Human-readable dumps of a graph.
pub mod trace;
