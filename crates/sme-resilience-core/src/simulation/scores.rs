use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::inputs::SimulationInputs;
use super::projections::YearProjection;
use crate::types::{checked_sum, clamp_score, round_to, weighted_sum, Money, OrOverflow};
use crate::SimulatorResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Economic score when the incremental ROI ratio is zero.
const ECONOMIC_NEUTRAL: Decimal = dec!(50);
/// Score points per 1.0 of incremental ROI ratio.
const ECONOMIC_POINTS_PER_ROI: Decimal = dec!(20);

const OVERALL_WEIGHT_ECONOMIC: Decimal = dec!(0.4);
const OVERALL_WEIGHT_ENVIRONMENTAL: Decimal = dec!(0.3);
const OVERALL_WEIGHT_STRATEGIC: Decimal = dec!(0.3);

/// Composite 0-100 scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub economic: Decimal,
    pub environmental: Decimal,
    pub strategic: Decimal,
    pub overall: Decimal,
}

/// Reduce inputs and projections into the four composite scores.
pub fn score(inputs: &SimulationInputs, projections: &[YearProjection]) -> SimulatorResult<Scores> {
    let economic = economic_score(inputs, projections)?;
    let environmental = environmental_score(inputs)?;
    let strategic = strategic_score(inputs)?;

    // Weights sum to 1 over clamped sub-scores, so no second clamp.
    let overall = round_to(
        weighted_sum(
            &[
                (economic, OVERALL_WEIGHT_ECONOMIC),
                (environmental, OVERALL_WEIGHT_ENVIRONMENTAL),
                (strategic, OVERALL_WEIGHT_STRATEGIC),
            ],
            "overall score",
        )?,
        0,
    );

    Ok(Scores {
        economic,
        environmental,
        strategic,
        overall,
    })
}

/// Scenario-B investment beyond the initial capex, floored at zero.
///
/// With no projected years the sustainability capex stands in.
pub fn total_incremental_investment(
    inputs: &SimulationInputs,
    projections: &[YearProjection],
) -> SimulatorResult<Money> {
    match projections.last() {
        Some(last) => Ok(last
            .cumulative_investment
            .checked_sub(inputs.initial_capex)
            .or_overflow("incremental investment")?
            .max(Decimal::ZERO)),
        None => Ok(inputs.sustainability_capex),
    }
}

/// Sum of scenario-B minus baseline profit over all projected years.
pub fn cumulative_incremental_profit(projections: &[YearProjection]) -> SimulatorResult<Money> {
    projections.iter().try_fold(Decimal::ZERO, |acc, p| {
        acc.checked_add(p.incremental_profit()?)
            .or_overflow("cumulative incremental profit")
    })
}

fn economic_score(
    inputs: &SimulationInputs,
    projections: &[YearProjection],
) -> SimulatorResult<Decimal> {
    let investment = total_incremental_investment(inputs, projections)?;
    let roi_ratio = if investment > Decimal::ZERO {
        cumulative_incremental_profit(projections)?
            .checked_div(investment)
            .or_overflow("economic score")?
    } else {
        Decimal::ZERO
    };
    let raw = weighted_sum(
        &[
            (Decimal::ONE, ECONOMIC_NEUTRAL),
            (roi_ratio, ECONOMIC_POINTS_PER_ROI),
        ],
        "economic score",
    )?;
    Ok(clamp_score(round_to(raw, 0)))
}

fn environmental_score(inputs: &SimulationInputs) -> SimulatorResult<Decimal> {
    let efficiency = weighted_sum(
        &[
            (inputs.energy_efficiency_pct, dec!(25)),
            (inputs.resource_efficiency_pct, dec!(25)),
            (inputs.waste_reduction_pct, dec!(25)),
            (inputs.circular_economy_pct, dec!(25)),
        ],
        "environmental score",
    )?;
    let scope = checked_sum(
        [
            inputs.scope_1_reduction,
            inputs.scope_2_reduction,
            inputs.scope_3_reduction,
        ],
        "environmental score",
    )? / dec!(3);
    let raw = weighted_sum(
        &[
            (efficiency, dec!(0.2)),
            (scope, dec!(0.4)),
            (inputs.carbon_reduction_potential, dec!(0.4)),
        ],
        "environmental score",
    )?;
    Ok(clamp_score(round_to(raw, 0)))
}

fn strategic_score(inputs: &SimulationInputs) -> SimulatorResult<Decimal> {
    let raw = weighted_sum(
        &[
            (inputs.reputation_uplift_pct, dec!(30)),
            (inputs.productivity_gain_pct, dec!(30)),
            (inputs.turnover_reduction_pct, dec!(20)),
            (inputs.green_market_access_pct, dec!(20)),
            (inputs.disruption_impact, dec!(0.1)),
        ],
        "strategic score",
    )?;
    Ok(clamp_score(round_to(raw, 0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::projections::project;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_scores() {
        let inputs = SimulationInputs::default();
        let projections = project(&inputs).unwrap();
        let scores = score(&inputs, &projections).unwrap();
        assert_eq!(
            scores,
            Scores {
                economic: dec!(100),
                environmental: dec!(21),
                strategic: dec!(11),
                overall: dec!(50),
            }
        );
    }

    #[test]
    fn test_incremental_investment_from_last_year() {
        let inputs = SimulationInputs::default();
        let projections = project(&inputs).unwrap();
        // 267,573 cumulative less 50,000 initial capex
        assert_eq!(total_incremental_investment(&inputs, &projections).unwrap(), dec!(217573));
        assert_eq!(cumulative_incremental_profit(&projections).unwrap(), dec!(2618614));
    }

    #[test]
    fn test_empty_projections_fall_back_to_neutral() {
        let inputs = SimulationInputs {
            forecast_horizon: 0,
            ..SimulationInputs::default()
        };
        assert_eq!(total_incremental_investment(&inputs, &[]).unwrap(), dec!(100000));
        let scores = score(&inputs, &[]).unwrap();
        assert_eq!(scores.economic, dec!(50));
    }

    #[test]
    fn test_zero_investment_is_neutral_economic() {
        let inputs = SimulationInputs {
            sustainability_capex: dec!(0),
            reinvest_pct: dec!(0),
            ..SimulationInputs::default()
        };
        let projections = project(&inputs).unwrap();
        assert_eq!(total_incremental_investment(&inputs, &projections).unwrap(), dec!(0));
        assert_eq!(score(&inputs, &projections).unwrap().economic, dec!(50));
    }

    #[test]
    fn test_scores_clamp_extremes() {
        let inputs = SimulationInputs {
            scope_1_reduction: dec!(400),
            scope_2_reduction: dec!(400),
            scope_3_reduction: dec!(400),
            carbon_reduction_potential: dec!(400),
            reputation_uplift_pct: dec!(-5),
            fixed_costs: dec!(90000000),
            ..SimulationInputs::default()
        };
        let projections = project(&inputs).unwrap();
        let scores = score(&inputs, &projections).unwrap();
        assert_eq!(scores.environmental, dec!(100));
        assert_eq!(scores.strategic, dec!(0));
        assert!(scores.economic >= dec!(0) && scores.economic <= dec!(100));
        assert!(scores.overall >= dec!(0) && scores.overall <= dec!(100));
    }

    #[test]
    fn test_out_of_range_points_overflow_as_error() {
        let inputs = SimulationInputs {
            carbon_reduction_potential: Decimal::MAX,
            scope_1_reduction: Decimal::MAX,
            ..SimulationInputs::default()
        };
        let projections = project(&SimulationInputs::default()).unwrap();
        assert!(matches!(
            score(&inputs, &projections),
            Err(crate::SimulatorError::ArithmeticOverflow { .. })
        ));
    }
}
