use chrono::{DateTime, Utc};
use postgres_types::{accepts, private::BytesMut, to_sql_checked, IsNull, ToSql, Type};

/// A SQL-representable scalar.
///
/// Filter arguments, payload assignments, and relation keys are all carried
/// as `Value`s. The set of variants is closed: it covers what a
/// PostgreSQL-backed repository can bind as a statement parameter or read
/// back out of a key column.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Signed 16-bit integer
    I16(i16),

    /// Signed 32-bit integer
    I32(i32),

    /// Signed 64-bit integer
    I64(i64),

    /// String value
    String(String),

    /// An array of bytes
    Bytes(Vec<u8>),

    /// 128-bit universally unique identifier (UUID)
    Uuid(uuid::Uuid),

    /// A UTC instant with microsecond precision
    Timestamp(DateTime<Utc>),

    /// Null value
    #[default]
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I16(v) => Some(*v as i64),
            Value::I32(v) => Some(*v as i64),
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::I16(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
            Value::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            Value::Uuid(v) => write!(f, "{v}"),
            Value::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
            Value::Null => f.write_str("NULL"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::I16(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::I32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::I64(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<uuid::Uuid> for Value {
    fn from(value: uuid::Uuid) -> Self {
        Value::Uuid(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> std::result::Result<IsNull, Box<dyn std::error::Error + Sync + Send>>
    where
        Self: Sized,
    {
        // PostgreSQL reports the column type it expects; widen or narrow the
        // variant to match, the way the wire protocol allows.
        match (self, ty) {
            (Value::Bool(value), _) => value.to_sql(ty, out),
            (Value::I16(value), &Type::INT2) => value.to_sql(ty, out),
            (Value::I16(value), &Type::INT4) => (*value as i32).to_sql(ty, out),
            (Value::I16(value), &Type::INT8) => (*value as i64).to_sql(ty, out),
            (Value::I32(value), &Type::INT2) => (*value as i16).to_sql(ty, out),
            (Value::I32(value), &Type::INT4) => value.to_sql(ty, out),
            (Value::I32(value), &Type::INT8) => (*value as i64).to_sql(ty, out),
            (Value::I64(value), &Type::INT2) => (*value as i16).to_sql(ty, out),
            (Value::I64(value), &Type::INT4) => (*value as i32).to_sql(ty, out),
            (Value::I64(value), &Type::INT8) => value.to_sql(ty, out),
            (Value::String(value), &Type::UUID) => {
                uuid::Uuid::parse_str(value)?.to_sql(ty, out)
            }
            (Value::String(value), _) => value.to_sql(ty, out),
            (Value::Bytes(value), &Type::BYTEA) => value.to_sql(ty, out),
            (Value::Uuid(value), &Type::UUID) => value.to_sql(ty, out),
            (Value::Uuid(value), &Type::TEXT | &Type::VARCHAR) => {
                value.to_string().to_sql(ty, out)
            }
            (Value::Timestamp(value), &Type::TIMESTAMP) => value.naive_utc().to_sql(ty, out),
            (Value::Timestamp(value), _) => value.to_sql(ty, out),
            (Value::Null, _) => Ok(IsNull::Yes),
            (value, _) => Err(format!(
                "cannot bind {value:?} as a PostgreSQL `{ty}` parameter"
            )
            .into()),
        }
    }

    accepts!(BOOL, INT2, INT4, INT8, TEXT, VARCHAR, BYTEA, UUID, TIMESTAMP, TIMESTAMPTZ);
    to_sql_checked!();
}
