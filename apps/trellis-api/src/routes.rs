use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use crate::{
	plugin::{PluginRequest, PluginResponse},
	state::AppState,
};
use trellis_service::{Error as ServiceError, UpdateRequest};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/update", post(update))
		.route("/api/v1/getparams.execute", post(get_params))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn update(
	State(state): State<AppState>,
	Json(payload): Json<UpdateRequest>,
) -> Result<String, ApiError> {
	let outcome = state.service.update(payload).await?;

	Ok(format!("Successfully updated {}.", outcome.key))
}

async fn get_params(
	State(state): State<AppState>,
	Json(payload): Json<PluginRequest>,
) -> Result<Json<PluginResponse>, ApiError> {
	tracing::debug!(
		application_set = %payload.application_set_name,
		"Incoming generator request."
	);

	let parameters = state.service.get_params(payload.input_parameters).await?;

	Ok(Json(parameters.into()))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: &'static str,
	message: String,
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let (status, error_code) = match &err {
			ServiceError::InvalidRequest { .. } => (StatusCode::BAD_REQUEST, "invalid_request"),
			ServiceError::CorruptKey { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "corrupt_key"),
			ServiceError::Backend(_) => (StatusCode::INTERNAL_SERVER_ERROR, "backend_error"),
		};

		Self { status, error_code, message: err.to_string() }
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		if self.status.is_server_error() {
			tracing::error!(error_code = self.error_code, message = %self.message, "Request failed.");
		}

		let body = ErrorBody { error_code: self.error_code.to_string(), message: self.message };

		(self.status, Json(body)).into_response()
	}
}
