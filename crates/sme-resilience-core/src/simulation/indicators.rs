use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::inputs::SimulationInputs;
use super::methodology::{
    CARBON_TONS_PER_EUR_SAVED, CARBON_TONS_PER_POTENTIAL_POINT, ELECTRICITY_PRICE_EUR_PER_KWH,
    ENERGY_COST_SHARE_OF_OPEX, WATER_INTENSITY_L_PER_EUR,
};
use super::projections::YearProjection;
use super::scores::{total_incremental_investment, Scores};
use crate::time_value::{
    discounted_flows, first_period_reaching, irr_bisection, npv_after_outlay, IRR_BRACKET,
    IRR_ITERATIONS,
};
use crate::types::{checked_sum, clamp_score, round_to, weighted_sum, Money, OrOverflow};
use crate::SimulatorResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Execution risk band derived from capex relative to revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionRisk {
    Low,
    Medium,
    High,
}

impl ExecutionRisk {
    fn from_pct(pct: Decimal) -> Self {
        if pct >= dec!(50) {
            ExecutionRisk::High
        } else if pct >= dec!(20) {
            ExecutionRisk::Medium
        } else {
            ExecutionRisk::Low
        }
    }
}

/// Derived financial, carbon, efficiency and ESG indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeepIndicators {
    // -- Finance --
    pub roi_percent: Decimal,
    pub irr_percent: Decimal,
    pub npv: Money,
    pub payback_years: Decimal,
    pub discounted_payback_years: Decimal,
    pub break_even_year: Decimal,
    /// NPV normalised to 0-100
    pub financial_viability: Decimal,
    /// Total cost of ownership, thousands
    pub tco_k: Decimal,
    // -- Carbon (proxies) --
    pub carbon_reduction_tons: Decimal,
    /// Whole currency units per ton
    pub cost_per_ton_co2: Decimal,
    /// kg CO2e per 1,000 of scenario-B revenue
    pub carbon_intensity_index: Decimal,
    pub net_zero_progress: Decimal,
    // -- Efficiency --
    pub energy_savings_mwh: Decimal,
    pub water_savings_kl: Decimal,
    /// %
    pub waste_diversion_index: Decimal,
    /// 0-100
    pub resource_efficiency_index: Decimal,
    // -- Risk & ESG --
    pub esg_score: Decimal,
    pub resilience_index: Decimal,
    pub employee_engagement: Decimal,
    pub execution_risk_factor: ExecutionRisk,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the deep indicator set from inputs, projections and scores.
///
/// Financial indicators use the incremental cash flow (scenario-B profit
/// minus baseline profit) against the total incremental investment.
pub fn deep_indicators(
    inputs: &SimulationInputs,
    projections: &[YearProjection],
    scores: &Scores,
) -> SimulatorResult<DeepIndicators> {
    let investment = total_incremental_investment(inputs, projections)?;
    let incremental = projections
        .iter()
        .map(YearProjection::incremental_profit)
        .collect::<SimulatorResult<Vec<Money>>>()?;
    let beyond_horizon = Decimal::from(inputs.forecast_horizon) + Decimal::ONE;

    // -- Returns ----------------------------------------------------------------
    let incremental_total = checked_sum(incremental.iter().copied(), "incremental profit")?;
    let roi_percent = if investment > Decimal::ZERO {
        incremental_total
            .checked_div(investment)
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
            .or_overflow("return on investment")?
    } else {
        Decimal::ZERO
    };
    let irr_percent =
        irr_bisection(investment, &incremental, IRR_BRACKET, IRR_ITERATIONS)? * dec!(100);
    let npv = npv_after_outlay(inputs.discount_rate, investment, &incremental)?;

    // -- Payback ----------------------------------------------------------------
    let payback_years = payback(investment, &incremental, projections, beyond_horizon);
    let discounted = discounted_flows(inputs.discount_rate, &incremental);
    let discounted_payback_years = payback(investment, &discounted, projections, beyond_horizon);
    let break_even_year = break_even(projections);

    // Dividing by a floor of 1 cannot overflow.
    let viability_ratio = npv / investment.max(Decimal::ONE);
    let financial_viability = clamp_score(round_to(
        weighted_sum(
            &[(Decimal::ONE, dec!(50)), (viability_ratio, dec!(50))],
            "financial viability",
        )?,
        0,
    ));

    // -- Totals -----------------------------------------------------------------
    let total_revenue_b = checked_sum(projections.iter().map(|p| p.revenue_b), "total revenue")?;
    let total_opex_b = checked_sum(projections.iter().map(|p| p.opex_b), "total opex")?;
    let total_savings = checked_sum(projections.iter().map(|p| p.savings), "total savings")?;

    let reinvested = total_revenue_b
        .checked_mul(inputs.reinvest_pct)
        .or_overflow("total cost of ownership")?;
    let tco = checked_sum(
        [
            inputs.initial_capex,
            inputs.sustainability_capex,
            total_opex_b,
            reinvested,
        ],
        "total cost of ownership",
    )?;

    // -- Carbon -----------------------------------------------------------------
    let carbon_reduction_tons = weighted_sum(
        &[
            (total_savings, CARBON_TONS_PER_EUR_SAVED),
            (inputs.carbon_reduction_potential, CARBON_TONS_PER_POTENTIAL_POINT),
        ],
        "carbon reduction",
    )?;
    let cost_per_ton_co2 = if carbon_reduction_tons > Decimal::ZERO {
        round_to(
            inputs
                .sustainability_capex
                .checked_div(carbon_reduction_tons)
                .or_overflow("cost per ton")?,
            0,
        )
    } else {
        Decimal::ZERO
    };
    let carbon_intensity_index = if total_revenue_b > Decimal::ZERO {
        carbon_reduction_tons
            .checked_mul(dec!(1000))
            .and_then(|kg| kg.checked_div(total_revenue_b / dec!(1000)))
            .or_overflow("carbon intensity")?
    } else {
        Decimal::ZERO
    };

    // -- Efficiency ---------------------------------------------------------------
    let energy_savings_kwh = checked_product(
        &[
            total_opex_b,
            inputs.energy_efficiency_pct,
            ENERGY_COST_SHARE_OF_OPEX,
        ],
        "energy savings",
    )?
    .checked_div(ELECTRICITY_PRICE_EUR_PER_KWH)
    .or_overflow("energy savings")?;
    let water_savings_l = checked_product(
        &[
            total_revenue_b,
            inputs.resource_efficiency_pct,
            WATER_INTENSITY_L_PER_EUR,
        ],
        "water savings",
    )?;
    let waste_diversion = weighted_sum(
        &[
            (inputs.waste_reduction_pct, dec!(100)),
            (inputs.circular_economy_pct, dec!(30)),
        ],
        "waste diversion",
    )?
    .min(dec!(100));
    let resource_efficiency = weighted_sum(
        &[
            (inputs.energy_efficiency_pct, dec!(30)),
            (inputs.resource_efficiency_pct, dec!(30)),
            (inputs.waste_reduction_pct, dec!(20)),
            (inputs.circular_economy_pct, dec!(20)),
        ],
        "resource efficiency",
    )?;

    // -- ESG ----------------------------------------------------------------------
    let execution_risk_pct = execution_risk_pct(inputs);
    let social = weighted_sum(
        &[
            (inputs.reputation_uplift_pct, dec!(50)),
            (inputs.productivity_gain_pct, dec!(30)),
            (inputs.turnover_reduction_pct, dec!(20)),
        ],
        "social pillar",
    )?;
    let governance = dec!(100) - execution_risk_pct;
    let esg = weighted_sum(
        &[
            (scores.environmental, dec!(0.4)),
            (social, dec!(0.3)),
            (governance, dec!(0.3)),
        ],
        "esg score",
    )?;
    let engagement = weighted_sum(
        &[
            (inputs.productivity_gain_pct, dec!(40)),
            (inputs.turnover_reduction_pct, dec!(30)),
            (inputs.reputation_uplift_pct, dec!(30)),
        ],
        "employee engagement",
    )?;

    Ok(DeepIndicators {
        roi_percent: round_to(roi_percent, 1),
        irr_percent: round_to(irr_percent, 1),
        npv: round_to(npv, 1),
        payback_years: round_to(payback_years, 1),
        discounted_payback_years: round_to(discounted_payback_years, 1),
        break_even_year: round_to(break_even_year, 1),
        financial_viability,
        tco_k: round_to(tco / dec!(1000), 1),
        carbon_reduction_tons: round_to(carbon_reduction_tons, 1),
        cost_per_ton_co2,
        carbon_intensity_index: round_to(carbon_intensity_index, 1),
        net_zero_progress: round_to(scores.environmental, 1),
        energy_savings_mwh: round_to(energy_savings_kwh / dec!(1000), 1),
        water_savings_kl: round_to(water_savings_l / dec!(1000), 1),
        waste_diversion_index: round_to(waste_diversion, 1),
        resource_efficiency_index: round_to(resource_efficiency, 1),
        esg_score: round_to(clamp_score(esg), 1),
        resilience_index: round_to(scores.strategic, 1),
        employee_engagement: round_to(clamp_score(engagement), 1),
        execution_risk_factor: ExecutionRisk::from_pct(execution_risk_pct),
    })
}

/// Sustainability capex as a clamped percentage of current revenue.
///
/// The scaling saturates; both decimal bounds clamp to the score range.
pub fn execution_risk_pct(inputs: &SimulationInputs) -> Decimal {
    let ratio = inputs.sustainability_capex / inputs.initial_revenue.max(Decimal::ONE);
    clamp_score(ratio.saturating_mul(dec!(100)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Year in which cumulative flows recover the investment.
///
/// Zero when there is nothing to recover; `beyond_horizon` when the horizon
/// ends first.
fn payback(
    investment: Money,
    flows: &[Money],
    projections: &[YearProjection],
    beyond_horizon: Decimal,
) -> Decimal {
    if investment <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    first_period_reaching(flows, investment)
        .map(|t| Decimal::from(projections[t].year))
        .unwrap_or(beyond_horizon)
}

fn checked_product(factors: &[Decimal], context: &str) -> SimulatorResult<Decimal> {
    factors
        .iter()
        .try_fold(Decimal::ONE, |acc, &f| acc.checked_mul(f).or_overflow(context))
}

/// First year scenario B out-earns the baseline.
fn break_even(projections: &[YearProjection]) -> Decimal {
    projections
        .iter()
        .find(|p| p.profit_b > p.profit_a)
        .map(|p| Decimal::from(p.year))
        .or_else(|| projections.last().map(|p| Decimal::from(p.year + 1)))
        .unwrap_or(Decimal::ZERO)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
