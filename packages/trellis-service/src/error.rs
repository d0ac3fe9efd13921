pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{message}")]
	InvalidRequest { message: String },
	#[error("Stored key {key:?} does not follow the repo:branch naming contract.")]
	CorruptKey { key: String },
	#[error(transparent)]
	Backend(#[from] trellis_storage::Error),
}
