//! Structural analysis of the link graph.
pub mod topology;
