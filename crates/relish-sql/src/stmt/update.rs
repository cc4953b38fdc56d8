use crate::{
    filter::Group,
    params::Params,
    payload::{Assignment, Payload},
};

use relish_core::{Error, Result};

/// An `UPDATE … SET … [WHERE …]`.
///
/// Raw assignments interpolate literally into the SET list and consume no
/// placeholder; everything else binds as a parameter. The filter compiles
/// against the same parameter list, so its placeholders continue the SET
/// list's numbering.
#[derive(Debug)]
pub struct Update<'a> {
    pub table: &'a str,
    pub payload: &'a Payload,
    pub filter: Option<&'a Group>,
}

impl Update<'_> {
    pub fn to_sql(&self, params: &mut impl Params) -> Result<String> {
        if self.payload.is_empty() {
            return Err(Error::invalid_statement("update payload is empty"));
        }

        let mut sql = format!("UPDATE {} SET ", self.table);

        for (i, (column, assignment)) in self.payload.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }

            sql.push_str(column);
            sql.push_str(" = ");

            match assignment {
                Assignment::Value(value) => {
                    sql.push_str(&params.push(value.clone()).to_string());
                }
                Assignment::Raw(raw) => sql.push_str(raw.as_str()),
            }
        }

        if let Some(filter) = self.filter {
            let fragment = filter.to_sql(params);
            if !fragment.is_empty() {
                sql.push_str(" WHERE ");
                sql.push_str(&fragment);
            }
        }

        Ok(sql)
    }
}
