use napi::Result as NapiResult;
use napi_derive::napi;

use sme_resilience_core::simulation::{self, PartialSimulationInputs, SimulationInputs};
use sme_resilience_core::SimulatorError;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_request(input_json: &str) -> NapiResult<PartialSimulationInputs> {
    if input_json.trim().is_empty() {
        return Ok(PartialSimulationInputs::default());
    }
    serde_json::from_str(input_json).map_err(|e| to_napi_error(SimulatorError::from(e)))
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Full simulation envelope for a partial JSON request.
#[napi]
pub fn run_simulation(input_json: String) -> NapiResult<String> {
    let request = parse_request(&input_json)?;
    let output = simulation::run_simulation(&request).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Key-driver map only.
#[napi]
pub fn key_drivers(input_json: String) -> NapiResult<String> {
    let request = parse_request(&input_json)?;
    let inputs = SimulationInputs::from_partial(&request);
    let outputs = simulation::simulate(&inputs).map_err(to_napi_error)?;
    serde_json::to_string(&outputs.key_drivers).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

#[napi]
pub fn default_inputs() -> NapiResult<String> {
    serde_json::to_string(&SimulationInputs::default()).map_err(to_napi_error)
}

#[napi]
pub fn methodology() -> NapiResult<String> {
    serde_json::to_string(&simulation::methodology()).map_err(to_napi_error)
}
