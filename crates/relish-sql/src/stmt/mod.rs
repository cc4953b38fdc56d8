mod count;
pub use count::Count;

mod delete;
pub use delete::Delete;

mod insert;
pub use insert::{Insert, InsertMany};

mod select;
pub use select::{Direction, Select};

mod update;
pub use update::Update;
