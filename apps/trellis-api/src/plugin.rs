//! Wire envelopes of the generator plugin protocol.
//!
//! The controller POSTs a [`PluginRequest`] and expects the parameter sets
//! nested under `output.parameters`. Field names here are the protocol; the
//! serde renames are not optional.

use serde::{Deserialize, Serialize};

use trellis_service::{GetParamsQuery, ParamSet};

#[derive(Debug, Deserialize)]
pub struct PluginRequest {
	#[serde(default, rename = "applicationSetName")]
	pub application_set_name: String,
	#[serde(default, rename = "inputParameters")]
	pub input_parameters: GetParamsQuery,
}

#[derive(Debug, Serialize)]
pub struct PluginResponse {
	pub output: PluginOutput,
}

#[derive(Debug, Serialize)]
pub struct PluginOutput {
	pub parameters: Vec<ParamSet>,
}

impl From<Vec<ParamSet>> for PluginResponse {
	fn from(parameters: Vec<ParamSet>) -> Self {
		Self { output: PluginOutput { parameters } }
	}
}
