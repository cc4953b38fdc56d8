use crate::{
    entity::Entity,
    relation::{nested_options, RelationLoader},
    repository::Repository,
};

use relish_core::{async_trait, Error, Result};
use relish_sql::{Filter, Group};

/// One-to-many loader: fetches every child whose foreign key matches one of
/// the parents, then appends each child to the matching parents' container
/// field.
pub struct HasMany<P, C: Entity> {
    pub repository: Repository<C>,

    /// Parent entity field holding the join key.
    pub parent_field: &'static str,

    /// Child table column the keys are matched against.
    pub child_fk_column: &'static str,

    /// Child entity field holding the foreign key. Named explicitly rather
    /// than derived from the column name.
    pub child_fk_field: &'static str,

    /// Appends one loaded child to the parent's container.
    pub append: fn(&mut P, C),
}

#[async_trait]
impl<P, C> RelationLoader<P> for HasMany<P, C>
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

        let filter = Group::and([Filter::in_list(self.child_fk_column, parent_ids)]);
        let children = self.repository.get(filter, nested_options(nested)).await?;

        append_matching(
            parents,
            &children,
            self.parent_field,
            self.child_fk_field,
            self.append,
        )
    }
}

/// Appends each child to every parent whose `parent_field` equals the
/// child's `child_fk_field`. Children keep their query order within each
/// parent's container.
fn append_matching<P: Entity, C: Entity>(
    parents: &mut [P],
    children: &[C],
    parent_field: &str,
    child_fk_field: &str,
    append: fn(&mut P, C),
) -> Result<()> {
    for child in children {
        let fk = child
            .get(child_fk_field)
            .ok_or_else(|| Error::unknown_field(child_fk_field))?;

        for parent in parents.iter_mut() {
            let id = parent
                .get(parent_field)
                .ok_or_else(|| Error::unknown_field(parent_field))?;

            if id == fk {
                append(parent, child.clone());
            }
        }
    }

    Ok(())
}
