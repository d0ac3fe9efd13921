//! Write path: store one repository/branch parameter set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, TrellisService};
use trellis_domain::{ID_COUNTER_KEY, ID_FIELD, RECORD_TTL, key};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateRequest {
	#[serde(default)]
	pub repo: String,
	#[serde(default)]
	pub branch: String,
	#[serde(default, rename = "serviceData")]
	pub service_data: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateOutcome {
	pub key: String,
	pub id: i64,
}

impl TrellisService {
	/// Stores the request's fields under `<repo>:<branch>`, replacing whatever
	/// was there, with a fresh sequence number injected as `id` and the expiry
	/// re-armed.
	pub async fn update(&self, request: UpdateRequest) -> Result<UpdateOutcome> {
		let repo = request.repo.trim();
		let branch = request.branch.trim();

		if repo.is_empty() || branch.is_empty() || request.service_data.is_empty() {
			return Err(Error::InvalidRequest {
				message: "repo, branch, and serviceData must be non-empty.".to_string(),
			});
		}
		if repo.contains(':') {
			return Err(Error::InvalidRequest {
				message: "repo must not contain ':'.".to_string(),
			});
		}

		let key = key::compose(repo, branch);
		let id = self.backend.increment(ID_COUNTER_KEY).await?;
		let mut fields = request.service_data;

		// "id" is reserved; a caller-supplied value is overwritten.
		fields.insert(ID_FIELD.to_string(), id.to_string());

		self.backend.put(&key, &fields, RECORD_TTL).await?;

		tracing::debug!(%key, id, "Stored parameter set.");

		Ok(UpdateOutcome { key, id })
	}
}
