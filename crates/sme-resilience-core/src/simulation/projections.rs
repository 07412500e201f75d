use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::inputs::{SimulationInputs, MAX_CALIBRATED_HORIZON, MAX_FORECAST_HORIZON};
use crate::error::SimulatorError;
use crate::types::{checked_sum, round_to, Money, OrOverflow, Rate};
use crate::SimulatorResult;

/// Fixed markup added to baseline growth on top of sales growth and inflation.
pub const BASELINE_GROWTH_MARKUP: Rate = dec!(0.01);

/// One forecast year for both scenarios.
///
/// `_a` fields are the baseline (no new investment) trajectory, `_b` fields
/// the sustainability-investment trajectory. Monetary values are rounded to
/// whole currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearProjection {
    pub year: u32,
    pub revenue_a: Money,
    pub revenue_b: Money,
    pub opex_a: Money,
    pub opex_b: Money,
    pub profit_a: Money,
    pub profit_b: Money,
    /// Scenario-B OPEX reduction from efficiency measures
    pub savings: Money,
    /// Scenario-B capex plus reinvestment accrued to date
    pub cumulative_investment: Money,
}

impl YearProjection {
    /// Scenario-B profit minus baseline profit for the year.
    pub fn incremental_profit(&self) -> SimulatorResult<Money> {
        self.profit_b
            .checked_sub(self.profit_a)
            .or_overflow("incremental profit")
    }
}

/// Project revenue, OPEX and profit year by year for both scenarios.
///
/// Revenue and cumulative investment compound at full precision; only the
/// emitted records are rounded. A horizon of zero yields no years. Any
/// intermediate value leaving the decimal range fails the whole run.
pub fn project(inputs: &SimulationInputs) -> SimulatorResult<Vec<YearProjection>> {
    let horizon = inputs.forecast_horizon;
    if horizon > MAX_FORECAST_HORIZON {
        return Err(SimulatorError::InvalidInput {
            field: "forecast_horizon".into(),
            reason: format!("{horizon} years exceeds the ceiling of {MAX_FORECAST_HORIZON}"),
        });
    }
    let mut projections = Vec::with_capacity(horizon.min(MAX_CALIBRATED_HORIZON) as usize);

    let mut revenue_a = inputs.initial_revenue;
    let mut revenue_b = inputs.initial_revenue;
    let mut cumulative_investment = inputs
        .initial_capex
        .checked_add(inputs.sustainability_capex)
        .or_overflow("initial investment")?;

    let depreciation = if inputs.depreciation_years > 0 {
        inputs.sustainability_capex / Decimal::from(inputs.depreciation_years)
    } else {
        Decimal::ZERO
    };

    let factor_a = checked_sum(
        [
            Decimal::ONE,
            inputs.revenue_growth_rate,
            inputs.inflation_rate,
            BASELINE_GROWTH_MARKUP,
        ],
        "baseline growth",
    )?;
    let factor_b = checked_sum(
        [
            Decimal::ONE,
            inputs.revenue_growth_rate,
            inputs.reputation_uplift_pct,
            inputs.green_market_access_pct,
        ],
        "sustainable growth",
    )?;
    let saving_pct = checked_sum(
        [
            inputs.energy_efficiency_pct,
            inputs.resource_efficiency_pct,
            inputs.waste_reduction_pct,
            inputs.circular_economy_pct,
        ],
        "efficiency savings",
    )?;

    for year in 1..=horizon {
        revenue_a = revenue_a.checked_mul(factor_a).or_overflow("baseline revenue")?;
        revenue_b = revenue_b.checked_mul(factor_b).or_overflow("sustainable revenue")?;

        let opex_a = opex(revenue_a, inputs)?;
        let opex_b = opex(revenue_b, inputs)?;

        let savings = saving_pct.checked_mul(opex_b).or_overflow("efficiency savings")?;

        let reinvested = revenue_b
            .checked_mul(inputs.reinvest_pct)
            .and_then(|r| cumulative_investment.checked_add(r))
            .or_overflow("cumulative investment")?;
        cumulative_investment = reinvested;

        let ebit_a = revenue_a.checked_sub(opex_a).or_overflow("baseline profit")?;
        let profit_a = after_tax(ebit_a, inputs.tax_rate)?;

        let year_depreciation = if year <= inputs.depreciation_years {
            depreciation
        } else {
            Decimal::ZERO
        };
        let ebit_b = checked_sum(
            [revenue_b, -opex_b, savings, -year_depreciation],
            "sustainable profit",
        )?;
        let profit_b = after_tax(ebit_b, inputs.tax_rate)?;

        projections.push(YearProjection {
            year,
            revenue_a: round_to(revenue_a, 0),
            revenue_b: round_to(revenue_b, 0),
            opex_a: round_to(opex_a, 0),
            opex_b: round_to(opex_b, 0),
            profit_a: round_to(profit_a, 0),
            profit_b: round_to(profit_b, 0),
            savings: round_to(savings, 0),
            cumulative_investment: round_to(cumulative_investment, 0),
        });
    }

    Ok(projections)
}

/// Variable share of revenue plus fixed costs.
fn opex(revenue: Money, inputs: &SimulationInputs) -> SimulatorResult<Money> {
    revenue
        .checked_mul(inputs.variable_costs_pct)
        .and_then(|variable| variable.checked_add(inputs.fixed_costs))
        .or_overflow("operating expenses")
}

/// Profit after tax with a zero tax floor: losses are not credited.
fn after_tax(ebit: Money, tax_rate: Rate) -> SimulatorResult<Money> {
    ebit.checked_mul(tax_rate)
        .and_then(|tax| ebit.checked_sub(tax.max(Decimal::ZERO)))
        .or_overflow("income tax")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_projection_first_year() {
        let projections = project(&SimulationInputs::default()).unwrap();
        assert_eq!(projections.len(), 7);

        let y1 = &projections[0];
        assert_eq!(y1.year, 1);
        // growth A = 0.05 + 0.02 + 0.01, growth B = 0.05 + 0.03 + 0.05
        assert_eq!(y1.revenue_a, dec!(1080000));
        assert_eq!(y1.revenue_b, dec!(1130000));
        assert_eq!(y1.opex_a, dec!(632000));
        assert_eq!(y1.opex_b, dec!(652000));
        // 0.38 * 652,000
        assert_eq!(y1.savings, dec!(247760));
        assert_eq!(y1.profit_a, dec!(336000));
        // (1,130,000 - 652,000 + 247,760 - 20,000) * 0.75
        assert_eq!(y1.profit_b, dec!(529320));
        // 50,000 + 100,000 + 11,300
        assert_eq!(y1.cumulative_investment, dec!(161300));
    }

    #[test]
    fn test_revenue_compounds_across_years() {
        let projections = project(&SimulationInputs::default()).unwrap();
        assert_eq!(projections[1].revenue_a, dec!(1166400));
        assert_eq!(projections[1].revenue_b, dec!(1276900));
        assert_eq!(projections[6].revenue_b, dec!(2352605));
        assert_eq!(projections[6].cumulative_investment, dec!(267573));
    }

    #[test]
    fn test_years_are_chronological() {
        let projections = project(&SimulationInputs::default()).unwrap();
        let years: Vec<u32> = projections.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_zero_horizon_is_empty() {
        let inputs = SimulationInputs {
            forecast_horizon: 0,
            ..SimulationInputs::default()
        };
        assert!(project(&inputs).unwrap().is_empty());
    }

    #[test]
    fn test_depreciation_stops_after_schedule() {
        let inputs = SimulationInputs {
            depreciation_years: 2,
            ..SimulationInputs::default()
        };
        let with_schedule = project(&inputs).unwrap();
        let without = project(&SimulationInputs {
            depreciation_years: 0,
            ..SimulationInputs::default()
        })
        .unwrap();
        // 50,000 a year of depreciation at a 25% tax rate
        assert_eq!(without[0].profit_b - with_schedule[0].profit_b, dec!(37500));
        assert_eq!(without[1].profit_b - with_schedule[1].profit_b, dec!(37500));
        assert_eq!(without[2].profit_b, with_schedule[2].profit_b);
    }

    #[test]
    fn test_losses_are_not_taxed() {
        let inputs = SimulationInputs {
            fixed_costs: dec!(5000000),
            ..SimulationInputs::default()
        };
        let projections = project(&inputs).unwrap();
        let y1 = &projections[0];
        assert_eq!(y1.profit_a, y1.revenue_a - y1.opex_a);
        assert!(y1.profit_a < Decimal::ZERO);
    }

    #[test]
    fn test_cost_overflow_is_an_error() {
        let inputs = SimulationInputs {
            variable_costs_pct: dec!(1000000000),
            initial_revenue: dec!(70000000000000000000000),
            ..SimulationInputs::default()
        };
        assert!(matches!(
            project(&inputs),
            Err(SimulatorError::ArithmeticOverflow { .. })
        ));
    }

    #[test]
    fn test_horizon_above_ceiling_is_rejected() {
        let inputs = SimulationInputs {
            forecast_horizon: 4_000_000_000,
            ..SimulationInputs::default()
        };
        assert!(matches!(
            project(&inputs),
            Err(SimulatorError::InvalidInput { ref field, .. }) if field == "forecast_horizon"
        ));

        let at_ceiling = SimulationInputs {
            forecast_horizon: MAX_FORECAST_HORIZON,
            revenue_growth_rate: dec!(-0.08),
            reputation_uplift_pct: dec!(0),
            green_market_access_pct: dec!(0),
            ..SimulationInputs::default()
        };
        assert_eq!(project(&at_ceiling).unwrap().len(), 1000);
    }

    #[test]
    fn test_explosive_growth_overflows_cleanly() {
        let inputs = SimulationInputs {
            revenue_growth_rate: dec!(1000000),
            forecast_horizon: 30,
            ..SimulationInputs::default()
        };
        assert!(matches!(
            project(&inputs),
            Err(SimulatorError::ArithmeticOverflow { .. })
        ));
    }
}
