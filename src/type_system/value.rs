//! Concrete values produced by evaluating a node at a time.
use super::types::Type;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub fn new(x: f64, y: f64) -> Self { Self { x, y } }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self { Self { r, g, b, a } }
}

impl Default for Color {
    fn default() -> Self { Self::new(0.0, 0.0, 0.0, 1.0) }
}

/// The value of a list node: its items in slot order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListValue {
    pub items: Vec<Value>,
    /// Set when the producing list wraps around (a closed outline, for instance).
    pub looped: bool,
}

impl ListValue {
    pub fn new(items: Vec<Value>, looped: bool) -> Self { Self { items, looped } }
    pub fn len(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Nil,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Angle(f64),
    Time(f64),
    Vector(Vector),
    Color(Color),
    String(String),
    List(ListValue),
}

impl Value {
    pub fn value_type(&self) -> Type {
        match self {
            Value::Nil => Type::Nil,
            Value::Bool(_) => Type::Bool,
            Value::Integer(_) => Type::Integer,
            Value::Real(_) => Type::Real,
            Value::Angle(_) => Type::Angle,
            Value::Time(_) => Type::Time,
            Value::Vector(_) => Type::Vector,
            Value::Color(_) => Type::Color,
            Value::String(_) => Type::String,
            Value::List(_) => Type::List,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(v) | Value::Angle(v) | Value::Time(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListValue> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// `self + step * factor`, for interpolable values of the same type.
    pub fn scaled_add(&self, step: &Value, factor: f64) -> Option<Value> {
        match (self, step) {
            (Value::Real(a), Value::Real(b)) => Some(Value::Real(a + b * factor)),
            (Value::Angle(a), Value::Angle(b)) => Some(Value::Angle(a + b * factor)),
            (Value::Time(a), Value::Time(b)) => Some(Value::Time(a + b * factor)),
            (Value::Vector(a), Value::Vector(b)) => {
                Some(Value::Vector(Vector::new(a.x + b.x * factor, a.y + b.y * factor)))
            }
            (Value::Color(a), Value::Color(b)) => Some(Value::Color(Color::new(
                a.r + b.r * factor,
                a.g + b.g * factor,
                a.b + b.b * factor,
                a.a + b.a * factor,
            ))),
            _ => None,
        }
    }

    /// Blends towards `other`: 0 yields `self`, 1 yields `other`.
    pub fn lerp(&self, other: &Value, t: f64) -> Option<Value> {
        let delta = other.difference(self)?;
        self.scaled_add(&delta, t)
    }

    fn difference(&self, other: &Value) -> Option<Value> {
        match (self, other) {
            (Value::Real(a), Value::Real(b)) => Some(Value::Real(a - b)),
            (Value::Angle(a), Value::Angle(b)) => Some(Value::Angle(a - b)),
            (Value::Time(a), Value::Time(b)) => Some(Value::Time(a - b)),
            (Value::Vector(a), Value::Vector(b)) => Some(Value::Vector(Vector::new(a.x - b.x, a.y - b.y))),
            (Value::Color(a), Value::Color(b)) => {
                Some(Value::Color(Color::new(a.r - b.r, a.g - b.g, a.b - b.b, a.a - b.a)))
            }
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self { Value::Real(value) }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self { Value::Bool(value) }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self { Value::Integer(value) }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self { Value::String(value.to_string()) }
}

impl From<Vector> for Value {
    fn from(value: Vector) -> Self { Value::Vector(value) }
}

impl From<Color> for Value {
    fn from(value: Color) -> Self { Value::Color(value) }
}

impl From<ListValue> for Value {
    fn from(value: ListValue) -> Self { Value::List(value) }
}
