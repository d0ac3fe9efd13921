//! Redis-backed implementation of [`ParamBackend`].

use std::{collections::BTreeMap, time::Duration};

use redis::{
	AsyncCommands,
	aio::{ConnectionManager, ConnectionManagerConfig},
};

use crate::{
	Result,
	backend::{BoxFuture, ParamBackend},
};

/// Keys requested per SCAN round trip.
const SCAN_COUNT: usize = 100;

pub struct RedisBackend {
	manager: ConnectionManager,
}
impl RedisBackend {
	/// Connects and spawns the reconnecting connection manager. The manager
	/// retries commands over fresh connections when the server drops them.
	pub async fn connect(cfg: &trellis_config::Backend) -> Result<Self> {
		let url = if cfg.addr.contains("://") {
			cfg.addr.clone()
		} else {
			format!("redis://{}", cfg.addr)
		};
		let client = redis::Client::open(url)?;
		let manager_cfg = ConnectionManagerConfig::new()
			.set_number_of_retries(cfg.max_retries)
			.set_connection_timeout(Duration::from_millis(cfg.connect_timeout_ms));
		let manager = ConnectionManager::new_with_config(client, manager_cfg).await?;

		Ok(Self { manager })
	}
}
impl ParamBackend for RedisBackend {
	fn increment<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<i64>> {
		let mut conn = self.manager.clone();

		Box::pin(async move {
			let value: i64 = conn.incr(key, 1).await?;

			Ok(value)
		})
	}

	fn put<'a>(
		&'a self,
		key: &'a str,
		fields: &'a BTreeMap<String, String>,
		ttl: Duration,
	) -> BoxFuture<'a, Result<()>> {
		let mut conn = self.manager.clone();

		Box::pin(async move {
			let pairs = fields
				.iter()
				.map(|(field, value)| (field.as_str(), value.as_str()))
				.collect::<Vec<_>>();

			// DEL + HSET + EXPIRE as one MULTI/EXEC block: replaced fields
			// never linger and no reader observes the key without a TTL.
			redis::pipe()
				.atomic()
				.del(key)
				.ignore()
				.hset_multiple(key, &pairs)
				.ignore()
				.expire(key, ttl.as_secs() as i64)
				.ignore()
				.query_async::<()>(&mut conn)
				.await?;

			Ok(())
		})
	}

	fn fetch<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<BTreeMap<String, String>>> {
		let mut conn = self.manager.clone();

		Box::pin(async move {
			let fields: BTreeMap<String, String> = conn.hgetall(key).await?;

			Ok(fields)
		})
	}

	fn keys<'a>(&'a self, pattern: &'a str) -> BoxFuture<'a, Result<Vec<String>>> {
		let mut conn = self.manager.clone();

		Box::pin(async move {
			let mut keys = Vec::new();
			let mut cursor = 0_u64;

			loop {
				let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
					.arg(cursor)
					.arg("MATCH")
					.arg(pattern)
					.arg("COUNT")
					.arg(SCAN_COUNT)
					.query_async(&mut conn)
					.await?;

				keys.extend(batch);

				cursor = next;

				if cursor == 0 {
					break;
				}
			}

			Ok(keys)
		})
	}
}
