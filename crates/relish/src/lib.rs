mod connection;
pub use connection::{connect, connect_with_config, Adapter};

mod entity;
pub use entity::{Entity, Slot};

mod options;
pub use options::Options;

pub mod relation;
pub use relation::{HasMany, HasOne, ManyToMany, RelationLoader};

mod repository;
pub use repository::{Builder, Repository};

mod scan;

pub use relish_core::{async_trait, Error, Result, Value};
pub use relish_sql::{
    Assignment, Comparator, Direction, Filter, Group, Operator, Payload, RawSql,
};
