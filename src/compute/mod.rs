//! Resolves nodes to concrete values.
pub mod engine;

pub use engine::Evaluator;
