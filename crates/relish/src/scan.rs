use crate::entity::{Entity, Slot};

use chrono::{DateTime, NaiveDateTime, Utc};
use relish_core::{Error, Result, Value};
use tokio_postgres::types::Type;
use tokio_postgres::Row;

fn decode_err(column: &str, source: tokio_postgres::Error) -> Error {
    Error::scan_caused_by(format!("column {column}"), source)
}

/// Decodes one result row into a fresh entity.
///
/// Every column of the row must name a slot the entity exposes; the row may
/// cover any subset of the slots (an explicit projection scans fine).
pub(crate) fn scan_row<T: Entity>(row: &Row) -> Result<T> {
    let mut entity = T::default();

    {
        let mut slots = entity.slots();

        for (idx, column) in row.columns().iter().enumerate() {
            let pos = slots
                .iter()
                .position(|(name, _)| *name == column.name())
                .ok_or_else(|| Error::unknown_field(column.name()))?;
            let (name, slot) = slots.swap_remove(pos);

            // TIMESTAMP columns arrive without a zone; re-anchor them at UTC
            // so both flavors land in the same field type.
            let naive = column.type_() == &Type::TIMESTAMP;

            match slot {
                Slot::Bool(dst) => *dst = row.try_get(idx).map_err(|e| decode_err(name, e))?,
                Slot::I16(dst) => *dst = row.try_get(idx).map_err(|e| decode_err(name, e))?,
                Slot::I32(dst) => *dst = row.try_get(idx).map_err(|e| decode_err(name, e))?,
                Slot::I64(dst) => *dst = row.try_get(idx).map_err(|e| decode_err(name, e))?,
                Slot::F64(dst) => *dst = row.try_get(idx).map_err(|e| decode_err(name, e))?,
                Slot::Text(dst) => *dst = row.try_get(idx).map_err(|e| decode_err(name, e))?,
                Slot::Bytes(dst) => *dst = row.try_get(idx).map_err(|e| decode_err(name, e))?,
                Slot::Uuid(dst) => *dst = row.try_get(idx).map_err(|e| decode_err(name, e))?,
                Slot::Timestamp(dst) => {
                    *dst = if naive {
                        let value: NaiveDateTime =
                            row.try_get(idx).map_err(|e| decode_err(name, e))?;
                        DateTime::from_naive_utc_and_offset(value, Utc)
                    } else {
                        row.try_get(idx).map_err(|e| decode_err(name, e))?
                    };
                }
                Slot::OptBool(dst) => *dst = row.try_get(idx).map_err(|e| decode_err(name, e))?,
                Slot::OptI16(dst) => *dst = row.try_get(idx).map_err(|e| decode_err(name, e))?,
                Slot::OptI32(dst) => *dst = row.try_get(idx).map_err(|e| decode_err(name, e))?,
                Slot::OptI64(dst) => *dst = row.try_get(idx).map_err(|e| decode_err(name, e))?,
                Slot::OptF64(dst) => *dst = row.try_get(idx).map_err(|e| decode_err(name, e))?,
                Slot::OptText(dst) => *dst = row.try_get(idx).map_err(|e| decode_err(name, e))?,
                Slot::OptBytes(dst) => *dst = row.try_get(idx).map_err(|e| decode_err(name, e))?,
                Slot::OptUuid(dst) => *dst = row.try_get(idx).map_err(|e| decode_err(name, e))?,
                Slot::OptTimestamp(dst) => {
                    *dst = if naive {
                        let value: Option<NaiveDateTime> =
                            row.try_get(idx).map_err(|e| decode_err(name, e))?;
                        value.map(|v| DateTime::from_naive_utc_and_offset(v, Utc))
                    } else {
                        row.try_get(idx).map_err(|e| decode_err(name, e))?
                    };
                }
            }
        }
    }

    Ok(entity)
}

/// Reads one column of a row as a dynamically-typed [`Value`], keyed off the
/// column's declared type. Used for pivot-table rows, where the key types
/// are not known statically.
pub(crate) fn column_value(row: &Row, idx: usize) -> Result<Value> {
    let column = &row.columns()[idx];
    let ty = column.type_();
    let name = column.name();

    let value = if ty == &Type::TEXT || ty == &Type::VARCHAR {
        row.try_get::<_, Option<String>>(idx)
            .map_err(|e| decode_err(name, e))?
            .map(Value::String)
    } else if ty == &Type::BOOL {
        row.try_get::<_, Option<bool>>(idx)
            .map_err(|e| decode_err(name, e))?
            .map(Value::Bool)
    } else if ty == &Type::INT2 {
        row.try_get::<_, Option<i16>>(idx)
            .map_err(|e| decode_err(name, e))?
            .map(Value::I16)
    } else if ty == &Type::INT4 {
        row.try_get::<_, Option<i32>>(idx)
            .map_err(|e| decode_err(name, e))?
            .map(Value::I32)
    } else if ty == &Type::INT8 {
        row.try_get::<_, Option<i64>>(idx)
            .map_err(|e| decode_err(name, e))?
            .map(Value::I64)
    } else if ty == &Type::UUID {
        row.try_get::<_, Option<uuid::Uuid>>(idx)
            .map_err(|e| decode_err(name, e))?
            .map(Value::Uuid)
    } else if ty == &Type::TIMESTAMPTZ {
        row.try_get::<_, Option<DateTime<Utc>>>(idx)
            .map_err(|e| decode_err(name, e))?
            .map(Value::Timestamp)
    } else if ty == &Type::TIMESTAMP {
        row.try_get::<_, Option<NaiveDateTime>>(idx)
            .map_err(|e| decode_err(name, e))?
            .map(|v| Value::Timestamp(DateTime::from_naive_utc_and_offset(v, Utc)))
    } else {
        return Err(Error::scan(format!(
            "unsupported key column type `{ty}` for column {name}"
        )));
    };

    Ok(value.unwrap_or(Value::Null))
}
