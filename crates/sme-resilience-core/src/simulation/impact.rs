use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::inputs::SimulationInputs;
use super::projections::YearProjection;
use crate::types::{round_to, OrOverflow};
use crate::SimulatorResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactDimension {
    Economic,
    Environmental,
    Strategic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactLens {
    Upside,
    Risk,
    Feasibility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatColor {
    Red,
    Yellow,
    Green,
}

impl HeatColor {
    /// Traffic-light band of a 0-100 value. `invert` flips red and green for
    /// values where higher means worse.
    pub fn classify(value: Decimal, invert: bool) -> Self {
        let band = if value < dec!(33) {
            HeatColor::Red
        } else if value < dec!(66) {
            HeatColor::Yellow
        } else {
            HeatColor::Green
        };
        match (band, invert) {
            (HeatColor::Red, true) => HeatColor::Green,
            (HeatColor::Green, true) => HeatColor::Red,
            (band, _) => band,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub row: ImpactDimension,
    pub col: ImpactLens,
    pub value: Decimal,
    pub color: HeatColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub message: String,
    pub severity: Severity,
}

// ---------------------------------------------------------------------------
// Heatmap
// ---------------------------------------------------------------------------

/// Build the 3x3 impact matrix, row-major over dimension then lens.
pub fn heatmap(
    inputs: &SimulationInputs,
    econ: Decimal,
    env: Decimal,
    strat: Decimal,
) -> SimulatorResult<Vec<HeatmapCell>> {
    use ImpactDimension::*;
    use ImpactLens::*;

    let capex_risk = inputs.sustainability_capex / dec!(10000);
    let carbon_gap = dec!(100)
        .checked_sub(inputs.carbon_reduction_potential)
        .or_overflow("environmental risk cell")?;
    let strategic_feasibility = (inputs.sustainability_capex
        / inputs.initial_revenue.max(Decimal::ONE))
    .checked_mul(dec!(50))
    .and_then(|drag| dec!(90).checked_sub(drag))
    .or_overflow("strategic feasibility cell")?;

    Ok(vec![
        cell(Economic, Upside, econ, false),
        cell(Economic, Risk, capex_risk, true),
        cell(Economic, Feasibility, dec!(75) - inputs.disruption_impact / dec!(4), false),
        cell(Environmental, Upside, env, false),
        cell(Environmental, Risk, carbon_gap, true),
        cell(Environmental, Feasibility, dec!(80) - inputs.scope_3_reduction / dec!(5), false),
        cell(Strategic, Upside, strat, false),
        cell(Strategic, Risk, inputs.disruption_impact, true),
        cell(Strategic, Feasibility, strategic_feasibility, false),
    ])
}

fn cell(row: ImpactDimension, col: ImpactLens, raw: Decimal, invert: bool) -> HeatmapCell {
    HeatmapCell {
        row,
        col,
        value: round_to(raw, 0),
        color: HeatColor::classify(raw, invert),
    }
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

/// Evaluate the independent alert rules in their fixed order.
///
/// The greenwashing and strategic-risk rules share one condition and fire
/// together. The profitability rule needs a final projected year.
pub fn alerts(
    inputs: &SimulationInputs,
    projections: &[YearProjection],
    econ: Decimal,
    env: Decimal,
    _strat: Decimal,
) -> Vec<Alert> {
    let mut alerts = Vec::new();
    let high_econ_low_env = econ > dec!(70) && env < dec!(40);

    if high_econ_low_env {
        alerts.push(alert(
            "Greenwashing Risk: High economic projection with low environmental impact scores.",
            Severity::High,
        ));
    }

    if env > dec!(70) && econ < dec!(40) {
        alerts.push(alert(
            "Financial Risk: Strong environmental results but weak economic sustainability.",
            Severity::High,
        ));
    }

    if high_econ_low_env {
        alerts.push(alert(
            "Strategic Risk: High economic growth without corresponding environmental transformation.",
            Severity::Medium,
        ));
    }

    if econ > dec!(70) && inputs.sustainability_capex > inputs.initial_revenue * dec!(0.5) {
        alerts.push(alert(
            "Execution Risk: High complexity and investment relative to current revenue.",
            Severity::Medium,
        ));
    }

    if let Some(last) = projections.last() {
        if last.profit_b < last.profit_a {
            alerts.push(alert(
                "Long-term Profitability Alert: Scenario B annual profit remains below Scenario A.",
                Severity::Medium,
            ));
        }
    }

    alerts
}

fn alert(message: &str, severity: Severity) -> Alert {
    Alert {
        message: message.to_string(),
        severity,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::projections::project;
    use rust_decimal_macros::dec;

    #[test]
    fn test_classify_bands() {
        assert_eq!(HeatColor::classify(dec!(32.9), false), HeatColor::Red);
        assert_eq!(HeatColor::classify(dec!(33), false), HeatColor::Yellow);
        assert_eq!(HeatColor::classify(dec!(65.9), false), HeatColor::Yellow);
        assert_eq!(HeatColor::classify(dec!(66), false), HeatColor::Green);
        assert_eq!(HeatColor::classify(dec!(10), true), HeatColor::Green);
        assert_eq!(HeatColor::classify(dec!(50), true), HeatColor::Yellow);
        assert_eq!(HeatColor::classify(dec!(80), true), HeatColor::Red);
    }

    #[test]
    fn test_default_heatmap() {
        let inputs = SimulationInputs::default();
        let cells = heatmap(&inputs, dec!(100), dec!(21), dec!(11)).unwrap();
        assert_eq!(cells.len(), 9);

        let summary: Vec<(Decimal, HeatColor)> = cells.iter().map(|c| (c.value, c.color)).collect();
        assert_eq!(
            summary,
            vec![
                (dec!(100), HeatColor::Green),
                (dec!(10), HeatColor::Green),
                (dec!(70), HeatColor::Green),
                (dec!(21), HeatColor::Red),
                (dec!(75), HeatColor::Red),
                (dec!(76), HeatColor::Green),
                (dec!(11), HeatColor::Red),
                (dec!(20), HeatColor::Green),
                (dec!(85), HeatColor::Green),
            ]
        );
    }

    #[test]
    fn test_heatmap_grid_is_fixed() {
        let cells =
            heatmap(&SimulationInputs::default(), dec!(0), dec!(0), dec!(0)).unwrap();
        let grid: Vec<(ImpactDimension, ImpactLens)> = cells.iter().map(|c| (c.row, c.col)).collect();
        let mut expected = Vec::new();
        for row in [ImpactDimension::Economic, ImpactDimension::Environmental, ImpactDimension::Strategic] {
            for col in [ImpactLens::Upside, ImpactLens::Risk, ImpactLens::Feasibility] {
                expected.push((row, col));
            }
        }
        assert_eq!(grid, expected);
    }

    #[test]
    fn test_color_uses_unrounded_value() {
        // 32.6 displays as 33 but sits in the lowest band, green once inverted
        let inputs = SimulationInputs {
            carbon_reduction_potential: dec!(67.4),
            ..SimulationInputs::default()
        };
        let cells = heatmap(&inputs, dec!(50), dec!(50), dec!(50)).unwrap();
        assert_eq!(cells[4].value, dec!(33));
        assert_eq!(cells[4].color, HeatColor::Green);
    }

    #[test]
    fn test_heatmap_overflow_is_an_error() {
        let inputs = SimulationInputs {
            carbon_reduction_potential: Decimal::MIN,
            ..SimulationInputs::default()
        };
        assert!(matches!(
            heatmap(&inputs, dec!(50), dec!(50), dec!(50)),
            Err(crate::SimulatorError::ArithmeticOverflow { .. })
        ));
    }

    #[test]
    fn test_heatmap_serializes_lowercase_colors() {
        let cells =
            heatmap(&SimulationInputs::default(), dec!(100), dec!(21), dec!(11)).unwrap();
        let json = serde_json::to_value(&cells[0]).unwrap();
        assert_eq!(json["row"], "Economic");
        assert_eq!(json["col"], "Upside");
        assert_eq!(json["color"], "green");
    }

    #[test]
    fn test_greenwashing_and_strategic_rules_fire_together() {
        let inputs = SimulationInputs::default();
        let projections = project(&inputs).unwrap();
        let alerts = alerts(&inputs, &projections, dec!(100), dec!(21), dec!(11));
        assert_eq!(alerts.len(), 2);
        assert!(alerts[0].message.starts_with("Greenwashing Risk"));
        assert_eq!(alerts[0].severity, Severity::High);
        assert!(alerts[1].message.starts_with("Strategic Risk"));
        assert_eq!(alerts[1].severity, Severity::Medium);
    }

    #[test]
    fn test_financial_risk_rule() {
        let inputs = SimulationInputs::default();
        let alerts = alerts(&inputs, &[], dec!(30), dec!(80), dec!(50));
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].message.starts_with("Financial Risk"));
    }

    #[test]
    fn test_execution_risk_rule() {
        let inputs = SimulationInputs {
            sustainability_capex: dec!(600000),
            ..SimulationInputs::default()
        };
        let alerts = alerts(&inputs, &[], dec!(80), dec!(60), dec!(50));
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].message.starts_with("Execution Risk"));
        assert_eq!(alerts[0].severity, Severity::Medium);
    }

    #[test]
    fn test_profitability_rule_uses_final_year() {
        let inputs = SimulationInputs {
            reputation_uplift_pct: dec!(-0.2),
            energy_efficiency_pct: dec!(0),
            ..SimulationInputs::default()
        };
        let projections = project(&inputs).unwrap();
        let last = projections.last().unwrap();
        assert!(last.profit_b < last.profit_a);
        let alerts = alerts(&inputs, &projections, dec!(50), dec!(50), dec!(50));
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].message.starts_with("Long-term Profitability Alert"));
    }

    #[test]
    fn test_nominal_run_has_no_alerts() {
        let inputs = SimulationInputs::default();
        let projections = project(&inputs).unwrap();
        assert!(alerts(&inputs, &projections, dec!(60), dec!(60), dec!(60)).is_empty());
    }
}
