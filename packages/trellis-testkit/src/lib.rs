//! Test support: disposable, marker-scoped Redis keyspaces.
//!
//! Every [`TestRedis`] gets a unique marker; tests derive their repository
//! and counter names from it, and cleanup deletes exactly the keys carrying
//! the marker. Concurrent test runs against one server stay disjoint.

mod error;

pub use error::{Error, Result};

use std::{env, thread};

use redis::{AsyncCommands, aio::MultiplexedConnection};
use tokio::runtime::Builder;
use uuid::Uuid;

pub struct TestRedis {
	url: String,
	marker: String,
	cleaned: bool,
}
impl TestRedis {
	pub async fn connect(url: &str) -> Result<Self> {
		let marker = format!("trellis_test_{}", Uuid::new_v4().simple());
		let this = Self { url: url.to_string(), marker, cleaned: false };
		// Surface an unreachable server here rather than mid-test.
		let mut conn = this.connection().await?;

		redis::cmd("PING")
			.query_async::<String>(&mut conn)
			.await
			.map_err(|err| Error::Message(format!("Failed to ping test Redis: {err}.")))?;

		Ok(this)
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	pub fn marker(&self) -> &str {
		&self.marker
	}

	/// A key or repository name scoped to this instance's marker. Contains no
	/// colon, so it is valid anywhere a repository name is.
	pub fn scoped(&self, name: &str) -> String {
		format!("{}-{name}", self.marker)
	}

	/// A fresh connection for raw assertions (TTL introspection and the like).
	pub async fn connection(&self) -> Result<MultiplexedConnection> {
		let client = redis::Client::open(normalize_url(&self.url))?;

		Ok(client.get_multiplexed_async_connection().await?)
	}

	pub async fn cleanup(mut self) -> Result<()> {
		self.cleanup_inner().await
	}

	async fn cleanup_inner(&mut self) -> Result<()> {
		if self.cleaned {
			return Ok(());
		}

		delete_marked_keys(&self.url, &self.marker).await?;

		self.cleaned = true;

		Ok(())
	}
}
impl Drop for TestRedis {
	fn drop(&mut self) {
		if self.cleaned {
			return;
		}

		let url = self.url.clone();
		let marker = self.marker.clone();
		let cleanup_thread = thread::spawn(move || {
			let runtime = match Builder::new_current_thread().enable_all().build() {
				Ok(runtime) => runtime,
				Err(err) => {
					eprintln!("Test Redis cleanup failed: {err}.");

					return;
				},
			};

			if let Err(err) = runtime.block_on(delete_marked_keys(&url, &marker)) {
				eprintln!("Test Redis cleanup failed: {err}.");
			}
		});
		let _ = cleanup_thread.join();
	}
}

pub fn env_redis_url() -> Option<String> {
	env::var("TRELLIS_REDIS_URL").ok()
}

fn normalize_url(addr: &str) -> String {
	if addr.contains("://") { addr.to_string() } else { format!("redis://{addr}") }
}

async fn delete_marked_keys(url: &str, marker: &str) -> Result<()> {
	let client = redis::Client::open(normalize_url(url))?;
	let mut conn = client.get_multiplexed_async_connection().await?;
	let pattern = format!("{marker}*");
	let mut keys = Vec::new();
	let mut cursor = 0_u64;

	loop {
		let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
			.arg(cursor)
			.arg("MATCH")
			.arg(&pattern)
			.arg("COUNT")
			.arg(100)
			.query_async(&mut conn)
			.await?;

		keys.extend(batch);

		cursor = next;

		if cursor == 0 {
			break;
		}
	}

	if !keys.is_empty() {
		let _: usize = conn.del(&keys).await?;
	}

	Ok(())
}
