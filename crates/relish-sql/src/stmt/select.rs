use crate::{filter::Group, params::Params};

use std::fmt;

/// Sort direction for an `ORDER BY` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        })
    }
}

/// A `SELECT` over one table.
///
/// The order column must be validated against the repository whitelist
/// before the statement is built; the builder trusts its inputs. `limit`
/// and `offset` of zero emit nothing.
#[derive(Debug)]
pub struct Select<'a> {
    pub table: &'a str,
    pub columns: Option<&'a [String]>,
    pub filter: Option<&'a Group>,
    pub order: Option<(&'a str, Direction)>,
    pub limit: u64,
    pub offset: u64,
}

impl Select<'_> {
    pub fn to_sql(&self, params: &mut impl Params) -> String {
        let mut sql = String::from("SELECT ");

        match self.columns {
            Some(columns) => sql.push_str(&columns.join(", ")),
            None => sql.push('*'),
        }

        sql.push_str(" FROM ");
        sql.push_str(self.table);

        if let Some(filter) = self.filter {
            let fragment = filter.to_sql(params);
            if !fragment.is_empty() {
                sql.push_str(" WHERE ");
                sql.push_str(&fragment);
            }
        }

        if let Some((column, direction)) = self.order {
            sql.push_str(" ORDER BY ");
            sql.push_str(column);
            sql.push(' ');
            sql.push_str(&direction.to_string());
        }

        if self.limit > 0 {
            sql.push_str(&format!(" LIMIT {}", self.limit));
        }

        if self.offset > 0 {
            sql.push_str(&format!(" OFFSET {}", self.offset));
        }

        sql
    }
}
