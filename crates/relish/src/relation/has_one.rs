use crate::{
    entity::Entity,
    relation::{nested_options, RelationLoader},
    repository::Repository,
};

use relish_core::{async_trait, Error, Result};
use relish_sql::{Filter, Group};

/// One-to-one loader: reads the first parent's key, fetches the single
/// matching child, and assigns it into the parent's container field.
pub struct HasOne<P, C: Entity> {
    pub repository: Repository<C>,

    /// Parent entity field holding the join key.
    pub parent_field: &'static str,

    /// Child table column the key is matched against.
    pub child_fk_column: &'static str,

    /// Writes the loaded child into the parent.
    pub assign: fn(&mut P, C),
}

#[async_trait]
impl<P, C> RelationLoader<P> for HasOne<P, C>
where
    P: Entity,
    C: Entity,
{
    async fn load(&self, parents: &mut [P], nested: Option<&str>) -> Result<()> {
        let Some(parent) = parents.first_mut() else {
            return Ok(());
        };

        let parent_id = parent
            .get(self.parent_field)
            .ok_or_else(|| Error::unknown_field(self.parent_field))?;

        let filter = Group::and([Filter::eq(self.child_fk_column, parent_id)]);
        let child = self.repository.get_one(filter, nested_options(nested)).await?;

        (self.assign)(parent, child);
        Ok(())
    }
}
