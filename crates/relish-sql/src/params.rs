use relish_core::Value;

use std::fmt;

/// Destination for statement parameters.
///
/// Pushing a value yields the [`Placeholder`] that refers to it. Statement
/// builders thread one `Params` through every clause they emit, so
/// placeholder indices stay dense across clause boundaries (an `UPDATE`'s
/// `WHERE` continues counting after its `SET` list).
pub trait Params {
    fn push(&mut self, value: Value) -> Placeholder;
}

/// A 1-based positional parameter reference.
pub struct Placeholder(pub usize);

impl Params for Vec<Value> {
    fn push(&mut self, value: Value) -> Placeholder {
        self.push(value);
        Placeholder(self.len())
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // PostgreSQL flavor
        write!(f, "${}", self.0)
    }
}
