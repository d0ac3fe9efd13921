//! Naming contract for stored keys.
//!
//! Every record lives under `<repo>:<branch>`. Repository names must not
//! contain `:`; branch names may, so a key splits at its first colon only.

/// Record field carrying the write sequence number.
pub const ID_FIELD: &str = "id";
/// Counter key behind the write sequence. Lives in the same keyspace as the
/// records, so `data` is effectively a reserved repository name.
pub const ID_COUNTER_KEY: &str = "data:id";

/// Builds the storage key for a repository/branch pair.
pub fn compose(repo: &str, branch: &str) -> String {
	format!("{repo}:{branch}")
}

/// Splits a storage key back into repository and branch at the first colon.
///
/// Returns `None` for keys outside the naming contract: no separator, or an
/// empty half on either side.
pub fn split(key: &str) -> Option<(&str, &str)> {
	let (repo, branch) = key.split_once(':')?;

	if repo.is_empty() || branch.is_empty() {
		return None;
	}

	Some((repo, branch))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn compose_joins_with_a_single_colon() {
		assert_eq!(compose("shop", "main"), "shop:main");
	}

	#[test]
	fn split_stops_at_the_first_colon() {
		assert_eq!(split("shop:feature/x:y"), Some(("shop", "feature/x:y")));
	}

	#[test]
	fn split_round_trips_compose() {
		let key = compose("shop", "release/1.2");

		assert_eq!(split(&key), Some(("shop", "release/1.2")));
	}

	#[test]
	fn split_rejects_keys_outside_the_contract() {
		assert_eq!(split("no-separator"), None);
		assert_eq!(split(":main"), None);
		assert_eq!(split("shop:"), None);
		assert_eq!(split(":"), None);
	}
}
