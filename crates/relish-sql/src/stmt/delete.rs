use crate::{filter::Group, params::Params};

/// A hard `DELETE` over one table. Soft deletes never reach this builder;
/// the facade rewrites them into an `UPDATE` on the tombstone column.
#[derive(Debug)]
pub struct Delete<'a> {
    pub table: &'a str,
    pub filter: Option<&'a Group>,
}

impl Delete<'_> {
    pub fn to_sql(&self, params: &mut impl Params) -> String {
        let mut sql = format!("DELETE FROM {}", self.table);

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
