//! Key/value backend seam.
//!
//! The service layer talks to storage exclusively through [`ParamBackend`];
//! [`crate::redis::RedisBackend`] serves deployments and
//! [`crate::memory::MemoryBackend`] serves tests.

use std::{collections::BTreeMap, future::Future, pin::Pin, time::Duration};

use crate::Result;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait ParamBackend
where
	Self: Send + Sync,
{
	/// Atomically increments the counter under `key` and returns the new
	/// value. Concurrent callers each observe a distinct value.
	fn increment<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<i64>>;

	/// Replaces the whole field set under `key` and arms its expiry, as a
	/// single atomic step. Fields from earlier writes never survive.
	fn put<'a>(
		&'a self,
		key: &'a str,
		fields: &'a BTreeMap<String, String>,
		ttl: Duration,
	) -> BoxFuture<'a, Result<()>>;

	/// Reads all fields under `key`. Absent and expired keys read as empty.
	fn fetch<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<BTreeMap<String, String>>>;

	/// Lists live keys matching a glob `pattern`, in no particular order.
	fn keys<'a>(&'a self, pattern: &'a str) -> BoxFuture<'a, Result<Vec<String>>>;
}
