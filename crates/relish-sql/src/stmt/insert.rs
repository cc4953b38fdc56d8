use crate::{
    params::Params,
    payload::{Assignment, Payload},
};

use relish_core::{Error, Result};

/// A single-row `INSERT … RETURNING *`.
///
/// `RETURNING *` hands the inserted row back without a second round-trip,
/// so server-side defaults land in the returned entity.
#[derive(Debug)]
pub struct Insert<'a> {
    pub table: &'a str,
    pub payload: &'a Payload,
}

impl Insert<'_> {
    pub fn to_sql(&self, params: &mut impl Params) -> Result<String> {
        if self.payload.is_empty() {
            return Err(Error::invalid_statement("insert payload is empty"));
        }

        let mut columns = String::new();
        let mut values = String::new();

        for (i, (column, assignment)) in self.payload.iter().enumerate() {
            let value = match assignment {
                Assignment::Value(value) => value.clone(),
                Assignment::Raw(_) => {
                    return Err(Error::invalid_statement(format!(
                        "raw SQL fragment is not allowed in an insert payload: {column}"
                    )));
                }
            };

            if i > 0 {
                columns.push_str(", ");
                values.push_str(", ");
            }

            columns.push_str(column);
            values.push_str(&params.push(value).to_string());
        }

        Ok(format!(
            "INSERT INTO {} ({columns}) VALUES ({values}) RETURNING *",
            self.table
        ))
    }
}

/// A multi-row `INSERT … VALUES (…), (…), … RETURNING *`.
///
/// The first payload's key order fixes the column list; every other payload
/// is projected onto it, and a payload missing one of those columns is
/// rejected before any SQL is issued.
#[derive(Debug)]
pub struct InsertMany<'a> {
    pub table: &'a str,
    pub payloads: &'a [Payload],
}

impl InsertMany<'_> {
    pub fn to_sql(&self, params: &mut impl Params) -> Result<String> {
        let Some(first) = self.payloads.first() else {
            return Err(Error::invalid_statement("insert has no rows"));
        };

        if first.is_empty() {
            return Err(Error::invalid_statement("insert payload is empty"));
        }

        let columns: Vec<&str> = first.keys().map(String::as_str).collect();

        let mut sql = format!("INSERT INTO {} ({}) VALUES ", self.table, columns.join(", "));

        for (row, payload) in self.payloads.iter().enumerate() {
            if row > 0 {
                sql.push_str(", ");
            }

            sql.push('(');
            for (i, column) in columns.iter().enumerate() {
                let value = match payload.get(*column) {
                    Some(Assignment::Value(value)) => value.clone(),
                    Some(Assignment::Raw(_)) => {
                        return Err(Error::invalid_statement(format!(
                            "raw SQL fragment is not allowed in an insert payload: {column}"
                        )));
                    }
                    None => {
                        return Err(Error::invalid_statement(format!(
                            "row {row} is missing column {column}"
                        )));
                    }
                };

                if i > 0 {
                    sql.push_str(", ");
                }
                sql.push_str(&params.push(value).to_string());
            }
            sql.push(')');
        }

        sql.push_str(" RETURNING *");
        Ok(sql)
    }
}
