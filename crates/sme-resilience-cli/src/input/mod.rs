pub mod file;
pub mod stdin;

use sme_resilience_core::simulation::PartialSimulationInputs;

/// Load a simulation request: `--input` file first, then piped stdin,
/// otherwise an empty request that runs on the defaults.
pub fn load_request(
    path: Option<&str>,
) -> Result<PartialSimulationInputs, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_json(path);
    }
    match stdin::read_stdin()? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(PartialSimulationInputs::default()),
    }
}
