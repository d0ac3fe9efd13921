use std::sync::Arc;

use trellis_service::TrellisService;
use trellis_storage::redis::RedisBackend;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<TrellisService>,
}
impl AppState {
	pub async fn new(config: trellis_config::Config) -> color_eyre::Result<Self> {
		let backend = RedisBackend::connect(&config.backend).await?;
		let service = TrellisService::new(Arc::new(backend));

		Ok(Self { service: Arc::new(service) })
	}
}
