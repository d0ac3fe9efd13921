//! Query path: resolve candidate keys, then assemble ordered parameter sets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, TrellisService};
use trellis_domain::{key, order};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GetParamsQuery {
	#[serde(default)]
	pub repo: String,
	#[serde(default)]
	pub branch: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSet {
	pub repo: String,
	pub branch: String,
	#[serde(rename = "serviceData")]
	pub service_data: BTreeMap<String, String>,
}

impl TrellisService {
	/// Returns the parameter sets matching the query, ordered by ascending
	/// write sequence number. No match is an empty list, not an error.
	pub async fn get_params(&self, query: GetParamsQuery) -> Result<Vec<ParamSet>> {
		let keys = self.resolve_keys(&query).await?;
		let records = self.assemble(&keys).await?;

		tracing::debug!(
			repo = query.repo.trim(),
			candidates = keys.len(),
			matched = records.len(),
			"Resolved parameter query."
		);

		Ok(records)
	}

	/// Resolves a query to candidate storage keys: the exact key when a
	/// branch is given, every live key of the repository otherwise.
	pub async fn resolve_keys(&self, query: &GetParamsQuery) -> Result<Vec<String>> {
		let repo = query.repo.trim();

		if repo.is_empty() {
			return Err(Error::InvalidRequest { message: "repo must be non-empty.".to_string() });
		}
		if repo.contains(':') {
			return Err(Error::InvalidRequest {
				message: "repo must not contain ':'.".to_string(),
			});
		}

		match query.branch.as_deref().map(str::trim).filter(|branch| !branch.is_empty()) {
			Some(branch) => Ok(vec![key::compose(repo, branch)]),
			None => Ok(self.backend.keys(&format!("{repo}:*")).await?),
		}
	}

	/// Fetches every candidate, drops the ones that read back empty, and
	/// sorts the rest by sequence number. The sort is stable, so ties keep
	/// backend order; duplicate candidates yield duplicate records.
	pub async fn assemble(&self, keys: &[String]) -> Result<Vec<ParamSet>> {
		let mut records = Vec::with_capacity(keys.len());

		for candidate in keys {
			let fields = self.backend.fetch(candidate).await?;

			if fields.is_empty() {
				continue;
			}

			let (repo, branch) = key::split(candidate)
				.ok_or_else(|| Error::CorruptKey { key: candidate.clone() })?;

			records.push(ParamSet {
				repo: repo.to_string(),
				branch: branch.to_string(),
				service_data: fields,
			});
		}

		records.sort_by_key(|record| order::id_sort_key(&record.service_data));

		Ok(records)
	}
}
