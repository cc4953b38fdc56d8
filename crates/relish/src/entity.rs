use chrono::{DateTime, Utc};
use relish_core::Value;

/// A writable scan destination inside an entity.
///
/// Each variant borrows one field; the scanner fills it from the column of
/// the same name. Optional variants decode SQL `NULL` as `None`.
pub enum Slot<'a> {
    Bool(&'a mut bool),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    F64(&'a mut f64),
    Text(&'a mut String),
    Bytes(&'a mut Vec<u8>),
    Uuid(&'a mut uuid::Uuid),
    Timestamp(&'a mut DateTime<Utc>),
    OptBool(&'a mut Option<bool>),
    OptI16(&'a mut Option<i16>),
    OptI32(&'a mut Option<i32>),
    OptI64(&'a mut Option<i64>),
    OptF64(&'a mut Option<f64>),
    OptText(&'a mut Option<String>),
    OptBytes(&'a mut Option<Vec<u8>>),
    OptUuid(&'a mut Option<uuid::Uuid>),
    OptTimestamp(&'a mut Option<DateTime<Utc>>),
}

/// A domain record bound to one table.
///
/// `slots` enumerates `(column, destination)` pairs in the table's physical
/// column order; because each destination is named, the scanner accepts any
/// projection of those columns, in any order. `get` is the by-name field
/// access relation loaders use to read join keys.
pub trait Entity: Default + Clone + Send + Sync + 'static {
    fn slots(&mut self) -> Vec<(&'static str, Slot<'_>)>;

    fn get(&self, field: &str) -> Option<Value>;
}
