//! The value type system shared by every node variant.
//!
//! `Type` is the closed set of types a node can resolve to, `Value` the
//! concrete data an evaluation produces, and `checker` holds the rules that
//! decide whether a child fits a list's element type.

pub use self::types::Type;
pub use self::value::{Color, ListValue, Value, Vector};

pub mod checker;
mod types;
mod value;
