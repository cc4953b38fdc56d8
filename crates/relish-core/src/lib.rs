mod error;
pub use error::Error;

mod value;
pub use value::Value;

/// A Result type alias that uses relish's [`Error`] type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

pub use async_trait::async_trait;
