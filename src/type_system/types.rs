//! The closed set of value types a node can resolve to.
use super::value::{Color, ListValue, Vector, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// No type. Nothing is compatible with it.
    Nil,
    Bool,
    Integer,
    Real,
    /// An angle in radians.
    Angle,
    Time,
    Vector,
    Color,
    String,
    /// An ordered list of values. The element type lives with the producer, not the type.
    List,
}

impl Type {
    pub fn name(&self) -> &'static str {
        match self {
            Type::Nil => "nil",
            Type::Bool => "bool",
            Type::Integer => "integer",
            Type::Real => "real",
            Type::Angle => "angle",
            Type::Time => "time",
            Type::Vector => "vector",
            Type::Color => "color",
            Type::String => "string",
            Type::List => "list",
        }
    }

    /// Whether values of this type can be blended and scaled.
    pub fn is_interpolable(&self) -> bool {
        matches!(self, Type::Real | Type::Angle | Type::Time | Type::Vector | Type::Color)
    }

    /// The placeholder value a freshly synthesized node of this type holds.
    pub fn default_value(&self) -> Value {
        match self {
            Type::Nil => Value::Nil,
            Type::Bool => Value::Bool(false),
            Type::Integer => Value::Integer(0),
            Type::Real => Value::Real(0.0),
            Type::Angle => Value::Angle(0.0),
            Type::Time => Value::Time(0.0),
            Type::Vector => Value::Vector(Vector::default()),
            Type::Color => Value::Color(Color::default()),
            Type::String => Value::String(String::new()),
            Type::List => Value::List(ListValue::default()),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
