mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Backend, Config, Service};

use std::{env, fs, path::Path};

/// Environment variable overriding `backend.addr`; container deployments pass
/// the backend address this way instead of shipping a config file.
pub const REDIS_ADDR_ENV: &str = "REDIS_ADDR";

pub fn load(path: Option<&Path>) -> Result<Config> {
	let mut cfg = match path {
		Some(path) => {
			let raw = fs::read_to_string(path)
				.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

			toml::from_str(&raw)
				.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?
		},
		None => Config::default(),
	};

	apply_env(&mut cfg, |name| env::var(name).ok());

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.backend.addr.trim().is_empty() {
		return Err(Error::Validation { message: "backend.addr must be non-empty.".to_string() });
	}
	if cfg.backend.connect_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "backend.connect_timeout_ms must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn apply_env<F>(cfg: &mut Config, lookup: F)
where
	F: Fn(&str) -> Option<String>,
{
	if let Some(addr) = lookup(REDIS_ADDR_ENV)
		&& !addr.trim().is_empty()
	{
		cfg.backend.addr = addr;
	}
}
