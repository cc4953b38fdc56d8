mod filter;
pub use filter::{Comparator, Filter, Group, Operator};

mod params;
pub use params::{Params, Placeholder};

mod payload;
pub use payload::{Assignment, Payload};

mod raw;
pub use raw::RawSql;

pub mod stmt;
pub use stmt::{Count, Delete, Direction, Insert, InsertMany, Select, Update};
