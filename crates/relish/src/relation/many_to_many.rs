use crate::{
    entity::Entity,
    relation::{nested_options, RelationLoader},
    repository::{debug_sql, Repository},
    scan::column_value,
};

use relish_core::{async_trait, Error, Result, Value};
use relish_sql::{Filter, Group, Params};

use std::collections::HashSet;
use std::sync::Arc;

use tokio_postgres::types::ToSql;
use tokio_postgres::Client;

/// Many-to-many loader: resolves the pivot table once, fetches every
/// referenced child once, and appends children to their parents according
/// to the pivot pairs.
pub struct ManyToMany<P, C: Entity> {
    pub repository: Repository<C>,

    /// Handle the pivot query runs on.
    pub client: Arc<Client>,

    /// Parent entity field holding the join key.
    pub parent_field: &'static str,

    /// Child table column matched against the pivot's child keys.
    pub child_key_column: &'static str,

    /// Child entity field holding that key.
    pub child_key_field: &'static str,

    pub pivot_table: &'static str,
    pub pivot_parent_key: &'static str,
    pub pivot_child_key: &'static str,

    /// Appends one loaded child to the parent's container.
    pub append: fn(&mut P, C),
}

#[async_trait]
impl<P, C> RelationLoader<P> for ManyToMany<P, C>
where
    P: Entity,
    C: Entity,
{
    async fn load(&self, parents: &mut [P], nested: Option<&str>) -> Result<()> {
        if parents.is_empty() {
            return Ok(());
        }

        let mut parent_ids = Vec::with_capacity(parents.len());
        for parent in parents.iter() {
            let id = parent
                .get(self.parent_field)
                .ok_or_else(|| Error::unknown_field(self.parent_field))?;
            parent_ids.push(id);
        }

        let pairs = self.pivot_pairs(&parent_ids).await?;

        // Distinct child ids in first-seen order.
        let mut seen = HashSet::new();
        let mut child_ids = Vec::new();
        for (_, child_id) in &pairs {
            if seen.insert(child_id.clone()) {
                child_ids.push(child_id.clone());
            }
        }

        if child_ids.is_empty() {
            return Ok(());
        }

        let filter = Group::and([Filter::in_list(self.child_key_column, child_ids)]);
        let children = self.repository.get(filter, nested_options(nested)).await?;

        assign_by_pivot(
            parents,
            &children,
            &pairs,
            self.parent_field,
            self.child_key_field,
            self.append,
        )
    }
}

impl<P, C: Entity> ManyToMany<P, C> {
    /// `SELECT parent_key, child_key FROM pivot WHERE parent_key IN (…)`.
    async fn pivot_pairs(&self, parent_ids: &[Value]) -> Result<Vec<(Value, Value)>> {
        let mut params: Vec<Value> = Vec::with_capacity(parent_ids.len());
        let mut placeholders = String::new();
        for (i, id) in parent_ids.iter().enumerate() {
            if i > 0 {
                placeholders.push_str(", ");
            }
            placeholders.push_str(&Params::push(&mut params, id.clone()).to_string());
        }

        let sql = format!(
            "SELECT {}, {} FROM {} WHERE {} IN ({placeholders})",
            self.pivot_parent_key, self.pivot_child_key, self.pivot_table, self.pivot_parent_key,
        );

        debug_sql(&sql, &params);

        let args: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();
        let rows = self
            .client
            .query(&sql, &args)
            .await
            .map_err(Error::driver)?;

        let mut pairs = Vec::with_capacity(rows.len());
        for row in &rows {
            pairs.push((column_value(row, 0)?, column_value(row, 1)?));
        }

        Ok(pairs)
    }
}

/// Appends each child to every parent the pivot pairs it with. Parents keep
/// primary-query order; within a parent, children keep child-query order.
fn assign_by_pivot<P: Entity, C: Entity>(
    parents: &mut [P],
    children: &[C],
    pairs: &[(Value, Value)],
    parent_field: &str,
    child_key_field: &str,
    append: fn(&mut P, C),
) -> Result<()> {
    let linked: HashSet<&(Value, Value)> = pairs.iter().collect();

    for parent in parents.iter_mut() {
        let parent_id = parent
            .get(parent_field)
            .ok_or_else(|| Error::unknown_field(parent_field))?;

        for child in children {
            let child_id = child
                .get(child_key_field)
                .ok_or_else(|| Error::unknown_field(child_key_field))?;

            if linked.contains(&(parent_id.clone(), child_id)) {
                append(parent, child.clone());
            }
        }
    }

    Ok(())
}
