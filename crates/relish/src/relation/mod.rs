mod has_many;
pub use has_many::HasMany;

mod has_one;
pub use has_one::HasOne;

mod many_to_many;
pub use many_to_many::ManyToMany;

use relish_core::{async_trait, Result};

/// Hydrates one relation onto a set of parent entities.
///
/// A loader issues at most one primary query (plus one pivot query for the
/// many-to-many shape) and forwards `nested` — the rest of a dotted
/// relation path — to the child repository, which recurses.
#[async_trait]
pub trait RelationLoader<P>: Send + Sync {
    async fn load(&self, parents: &mut [P], nested: Option<&str>) -> Result<()>;
}

/// Splits a dotted relation path into the loader name and the remainder:
/// `"user.roles.permissions"` → `("user", Some("roles.permissions"))`.
pub(crate) fn split_path(path: &str) -> (&str, Option<&str>) {
    match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    }
}

pub(crate) fn nested_options(nested: Option<&str>) -> crate::Options {
    crate::Options {
        relations: nested.map(|rest| vec![rest.to_string()]).unwrap_or_default(),
        ..crate::Options::default()
    }
}
