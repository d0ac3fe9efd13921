pub mod backend;
pub mod memory;
pub mod redis;

mod error;

pub use backend::{BoxFuture, ParamBackend};
pub use error::{Error, Result};
