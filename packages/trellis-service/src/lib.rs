//! Parameter set storage and retrieval.
//!
//! One write replaces the whole parameter set of a repository/branch pair and
//! re-arms its expiry; one query returns the live sets of a branch or of all
//! branches of a repository, ordered by write sequence.

pub mod get_params;
pub mod update;

mod error;

pub use error::{Error, Result};
pub use get_params::{GetParamsQuery, ParamSet};
pub use update::{UpdateOutcome, UpdateRequest};

use std::sync::Arc;

use trellis_storage::ParamBackend;

pub struct TrellisService {
	pub backend: Arc<dyn ParamBackend>,
}
impl TrellisService {
	pub fn new(backend: Arc<dyn ParamBackend>) -> Self {
		Self { backend }
	}
}
