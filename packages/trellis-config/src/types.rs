use serde::Deserialize;

/// Every field has a deployable default, so the service runs without a config
/// file at all.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
	pub service: Service,
	pub backend: Backend,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Backend {
	/// Host:port, or a full `redis://` URL.
	pub addr: String,
	pub connect_timeout_ms: u64,
	pub max_retries: usize,
}

impl Default for Service {
	fn default() -> Self {
		Self { http_bind: "0.0.0.0:8080".to_string(), log_level: "info".to_string() }
	}
}

impl Default for Backend {
	fn default() -> Self {
		Self { addr: "localhost:6379".to_string(), connect_timeout_ms: 5_000, max_retries: 3 }
	}
}
