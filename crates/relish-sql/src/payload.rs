use crate::raw::RawSql;

use indexmap::IndexMap;
use relish_core::Value;

/// A column assignment carried by a write payload.
///
/// `Value` binds as a statement parameter; `Raw` interpolates literally
/// (only the `UPDATE` builder accepts it).
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    Value(Value),
    Raw(RawSql),
}

impl Assignment {
    pub fn value(value: impl Into<Value>) -> Assignment {
        Assignment::Value(value.into())
    }

    pub fn raw(fragment: impl Into<RawSql>) -> Assignment {
        Assignment::Raw(fragment.into())
    }
}

impl From<Value> for Assignment {
    fn from(value: Value) -> Assignment {
        Assignment::Value(value)
    }
}

impl From<RawSql> for Assignment {
    fn from(raw: RawSql) -> Assignment {
        Assignment::Raw(raw)
    }
}

/// Column name to assignment, in insertion order.
///
/// Insertion order is the column order in every statement the payload is
/// compiled into, so a given payload always produces the same SQL.
pub type Payload = IndexMap<String, Assignment>;
