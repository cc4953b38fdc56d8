use crate::{filter::Group, params::Params};

/// A `SELECT COUNT(*)` over one table.
#[derive(Debug)]
pub struct Count<'a> {
    pub table: &'a str,
    pub filter: Option<&'a Group>,
}

impl Count<'_> {
    pub fn to_sql(&self, params: &mut impl Params) -> String {
        let mut sql = format!("SELECT COUNT(*) FROM {}", self.table);

        if let Some(filter) = self.filter {
            let fragment = filter.to_sql(params);
            if !fragment.is_empty() {
                sql.push_str(" WHERE ");
                sql.push_str(&fragment);
            }
        }

        sql
    }
}
