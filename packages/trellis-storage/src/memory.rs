//! In-process stand-in for the Redis backend.
//!
//! Counters and field maps share one keyspace, expiry is lazy, and listing
//! uses the same glob semantics the service relies on, so tests observe the
//! behavior deployments get without a server.

use std::{
	collections::{BTreeMap, HashMap},
	sync::{Mutex, MutexGuard},
	time::{Duration, Instant},
};

use crate::{
	Error, Result,
	backend::{BoxFuture, ParamBackend},
};

#[derive(Default)]
pub struct MemoryBackend {
	state: Mutex<State>,
}

#[derive(Default)]
struct State {
	entries: HashMap<String, Entry>,
	skew: Duration,
}

enum Entry {
	Counter(i64),
	Fields { fields: BTreeMap<String, String>, expires_at: Instant },
}

impl MemoryBackend {
	pub fn new() -> Self {
		Self::default()
	}

	/// Moves this backend's clock forward so armed expiries elapse without
	/// waiting. Affects nothing outside this instance.
	pub fn advance(&self, by: Duration) {
		self.lock().skew += by;
	}

	fn lock(&self) -> MutexGuard<'_, State> {
		self.state.lock().unwrap_or_else(|err| err.into_inner())
	}
}

impl State {
	fn now(&self) -> Instant {
		Instant::now() + self.skew
	}
}

impl ParamBackend for MemoryBackend {
	fn increment<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<i64>> {
		Box::pin(async move {
			let mut state = self.lock();

			match state.entries.entry(key.to_string()).or_insert(Entry::Counter(0)) {
				Entry::Counter(value) => {
					*value += 1;

					Ok(*value)
				},
				Entry::Fields { .. } => Err(Error::WrongType { key: key.to_string() }),
			}
		})
	}

	fn put<'a>(
		&'a self,
		key: &'a str,
		fields: &'a BTreeMap<String, String>,
		ttl: Duration,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let mut state = self.lock();
			let expires_at = state.now() + ttl;

			state
				.entries
				.insert(key.to_string(), Entry::Fields { fields: fields.clone(), expires_at });

			Ok(())
		})
	}

	fn fetch<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<BTreeMap<String, String>>> {
		Box::pin(async move {
			let mut state = self.lock();
			let now = state.now();

			match state.entries.get(key) {
				None => return Ok(BTreeMap::new()),
				Some(Entry::Counter(_)) => return Err(Error::WrongType { key: key.to_string() }),
				Some(Entry::Fields { fields, expires_at }) =>
					if *expires_at > now {
						return Ok(fields.clone());
					},
			}

			// Expired: read as absent and drop the entry.
			state.entries.remove(key);

			Ok(BTreeMap::new())
		})
	}

	fn keys<'a>(&'a self, pattern: &'a str) -> BoxFuture<'a, Result<Vec<String>>> {
		Box::pin(async move {
			let mut state = self.lock();
			let now = state.now();

			state
				.entries
				.retain(|_, entry| !matches!(entry, Entry::Fields { expires_at, .. } if *expires_at <= now));

			Ok(state.entries.keys().filter(|key| glob_match(pattern, key)).cloned().collect())
		})
	}
}

/// Matches `pattern` against `text` with `*` as the only wildcard, the subset
/// of Redis glob syntax the service uses.
fn glob_match(pattern: &str, text: &str) -> bool {
	let segments = pattern.split('*').collect::<Vec<_>>();

	if segments.len() == 1 {
		return pattern == text;
	}

	let first = segments[0];
	let last = segments[segments.len() - 1];

	if !text.starts_with(first) || !text.ends_with(last) {
		return false;
	}

	let mut cursor = first.len();
	let end = text.len() - last.len();

	if cursor > end {
		return false;
	}

	for segment in &segments[1..segments.len() - 1] {
		if segment.is_empty() {
			continue;
		}

		match text[cursor..end].find(segment) {
			Some(position) => cursor += position + segment.len(),
			None => return false,
		}
	}

	true
}
