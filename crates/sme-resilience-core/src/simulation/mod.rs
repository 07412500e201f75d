//! Baseline vs. sustainability-investment simulation for a single SME.
//!
//! The pipeline runs projections, then scores, then deep indicators, then
//! heatmap and alerts, and finally the key-driver sensitivity pass, which
//! re-runs the first three stages once per candidate driver.

pub mod impact;
pub mod indicators;
pub mod inputs;
pub mod key_drivers;
pub mod methodology;
pub mod projections;
pub mod scores;

use std::time::Instant;

use serde::{Deserialize, Serialize};

pub use impact::{Alert, HeatColor, HeatmapCell, ImpactDimension, ImpactLens, Severity};
pub use indicators::{DeepIndicators, ExecutionRisk};
pub use inputs::{range_warnings, PartialSimulationInputs, SimulationInputs};
pub use key_drivers::{Driver, KeyDrivers, TargetMetric};
pub use methodology::{methodology, Methodology};
pub use projections::YearProjection;
pub use scores::Scores;

use crate::types::{with_metadata, ComputationOutput};
use crate::SimulatorResult;

/// Full result of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutputs {
    pub scores: Scores,
    pub heatmap: Vec<HeatmapCell>,
    pub alerts: Vec<Alert>,
    pub details: DeepIndicators,
    pub projections: Vec<YearProjection>,
    pub key_drivers: KeyDrivers,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Projections, scores and deep indicators for one input record.
pub fn evaluate_indicators(inputs: &SimulationInputs) -> SimulatorResult<DeepIndicators> {
    let projections = projections::project(inputs)?;
    let scores = scores::score(inputs, &projections)?;
    indicators::deep_indicators(inputs, &projections, &scores)
}

/// Run the full pipeline on a complete input record.
pub fn simulate(inputs: &SimulationInputs) -> SimulatorResult<SimulationOutputs> {
    let projections = projections::project(inputs)?;
    tracing::debug!(years = projections.len(), "projections built");

    let scores = scores::score(inputs, &projections)?;
    tracing::debug!(overall = %scores.overall, "scores computed");

    let details = indicators::deep_indicators(inputs, &projections, &scores)?;
    tracing::debug!(roi = %details.roi_percent, npv = %details.npv, "indicators computed");

    let heatmap =
        impact::heatmap(inputs, scores.economic, scores.environmental, scores.strategic)?;
    let alerts = impact::alerts(
        inputs,
        &projections,
        scores.economic,
        scores.environmental,
        scores.strategic,
    );
    tracing::debug!(alerts = alerts.len(), "heatmap and alerts built");

    let key_drivers = key_drivers::key_drivers(inputs, &details)?;
    tracing::debug!("key drivers ranked");

    Ok(SimulationOutputs {
        scores,
        heatmap,
        alerts,
        details,
        projections,
        key_drivers,
    })
}

/// Complete a partial request from the defaults, run it and wrap the
/// result in the standard output envelope.
pub fn run_simulation(
    request: &PartialSimulationInputs,
) -> SimulatorResult<ComputationOutput<SimulationOutputs>> {
    let start = Instant::now();

    let inputs = SimulationInputs::from_partial(request);
    let warnings = range_warnings(&inputs);
    for warning in &warnings {
        tracing::warn!("{warning}");
    }

    let outputs = simulate(&inputs)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Baseline vs. sustainability investment simulation (SME resilience)",
        &methodology(),
        warnings,
        elapsed,
        outputs,
    ))
}

/// JSON entry point: the body is any subset of the input fields.
pub fn run_simulation_json(body: &str) -> SimulatorResult<ComputationOutput<SimulationOutputs>> {
    let request: PartialSimulationInputs = serde_json::from_str(body)?;
    run_simulation(&request)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimulatorError;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_simulate_defaults_shape() {
        let outputs = simulate(&SimulationInputs::default()).unwrap();
        assert_eq!(outputs.projections.len(), 7);
        assert_eq!(outputs.heatmap.len(), 9);
        assert_eq!(outputs.scores.overall, dec!(50));
        assert_eq!(outputs.details.execution_risk_factor, ExecutionRisk::Low);
    }

    #[test]
    fn test_evaluate_indicators_matches_simulate() {
        let inputs = SimulationInputs::default();
        let outputs = simulate(&inputs).unwrap();
        assert_eq!(evaluate_indicators(&inputs).unwrap(), outputs.details);
    }

    #[test]
    fn test_run_simulation_envelope() {
        let output = run_simulation(&PartialSimulationInputs::default()).unwrap();
        assert!(output.warnings.is_empty());
        assert!(output.methodology.contains("sustainability"));
        assert_eq!(output.assumptions["nudge_factor"], "1.05");
        assert_eq!(output.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_run_simulation_collects_range_warnings() {
        let request = PartialSimulationInputs {
            reinvest_pct: Some(dec!(1.5)),
            ..PartialSimulationInputs::default()
        };
        let output = run_simulation(&request).unwrap();
        assert!(output.warnings.iter().any(|w| w.contains("reinvest_pct")));
    }

    #[test]
    fn test_run_simulation_json_partial_body() {
        let output = run_simulation_json(r#"{"forecast_horizon": 3}"#).unwrap();
        assert_eq!(output.result.projections.len(), 3);
    }

    #[test]
    fn test_run_simulation_json_rejects_wrong_types() {
        let err = run_simulation_json(r#"{"forecast_horizon": "seven"}"#).unwrap_err();
        assert!(matches!(err, SimulatorError::SerializationError(_)));
    }
}
