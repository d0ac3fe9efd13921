pub mod key;
pub mod order;
pub mod ttl;

pub use key::{ID_COUNTER_KEY, ID_FIELD};
pub use ttl::RECORD_TTL;
