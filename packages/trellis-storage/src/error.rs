pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Redis(#[from] redis::RedisError),
	#[error("Key {key:?} does not hold a field map.")]
	WrongType { key: String },
}
