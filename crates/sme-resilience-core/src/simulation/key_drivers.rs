use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::indicators::DeepIndicators;
use super::inputs::SimulationInputs;
use crate::types::{round_to, OrOverflow};
use crate::SimulatorResult;

/// Multiplier applied to one driver per sensitivity run (+5%).
pub const NUDGE_FACTOR: Decimal = dec!(1.05);

/// Labels reported per metric.
const TOP_N: usize = 3;

// ---------------------------------------------------------------------------
// Drivers
// ---------------------------------------------------------------------------

/// Candidate input fields nudged by the sensitivity analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Driver {
    SustainabilityCapex,
    RevenueGrowthRate,
    EnergyEfficiencyPct,
    ReputationUpliftPct,
    GreenMarketAccessPct,
    ProductivityGainPct,
    DiscountRate,
    VariableCostsPct,
    ReinvestPct,
    CarbonReductionPotential,
}

/// How a nudged value is brought back into its domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Perturbation {
    /// Fractions and rates, capped at 1.0
    Rate,
    /// Amounts and point scales, rounded to a whole number
    Count,
}

impl Driver {
    pub const ALL: [Driver; 10] = [
        Driver::SustainabilityCapex,
        Driver::RevenueGrowthRate,
        Driver::EnergyEfficiencyPct,
        Driver::ReputationUpliftPct,
        Driver::GreenMarketAccessPct,
        Driver::ProductivityGainPct,
        Driver::DiscountRate,
        Driver::VariableCostsPct,
        Driver::ReinvestPct,
        Driver::CarbonReductionPotential,
    ];

    /// Human-readable name reported in the key-driver lists.
    pub fn label(self) -> &'static str {
        match self {
            Driver::SustainabilityCapex => "Sustainability CAPEX",
            Driver::RevenueGrowthRate => "Sales growth",
            Driver::EnergyEfficiencyPct => "Energy efficiency",
            Driver::ReputationUpliftPct => "Reputation uplift",
            Driver::GreenMarketAccessPct => "Green market access",
            Driver::ProductivityGainPct => "Productivity gain",
            Driver::DiscountRate => "Discount rate",
            Driver::VariableCostsPct => "Variable costs",
            Driver::ReinvestPct => "Reinvest %",
            Driver::CarbonReductionPotential => "Carbon reduction",
        }
    }

    fn perturbation(self) -> Perturbation {
        match self {
            Driver::SustainabilityCapex | Driver::CarbonReductionPotential => Perturbation::Count,
            _ => Perturbation::Rate,
        }
    }

    fn slot(self, inputs: &mut SimulationInputs) -> &mut Decimal {
        match self {
            Driver::SustainabilityCapex => &mut inputs.sustainability_capex,
            Driver::RevenueGrowthRate => &mut inputs.revenue_growth_rate,
            Driver::EnergyEfficiencyPct => &mut inputs.energy_efficiency_pct,
            Driver::ReputationUpliftPct => &mut inputs.reputation_uplift_pct,
            Driver::GreenMarketAccessPct => &mut inputs.green_market_access_pct,
            Driver::ProductivityGainPct => &mut inputs.productivity_gain_pct,
            Driver::DiscountRate => &mut inputs.discount_rate,
            Driver::VariableCostsPct => &mut inputs.variable_costs_pct,
            Driver::ReinvestPct => &mut inputs.reinvest_pct,
            Driver::CarbonReductionPotential => &mut inputs.carbon_reduction_potential,
        }
    }

    /// Copy of `inputs` with only this driver's field nudged by +5%.
    pub fn perturb(self, inputs: &SimulationInputs) -> SimulatorResult<SimulationInputs> {
        let mut nudged = inputs.clone();
        let kind = self.perturbation();
        let slot = self.slot(&mut nudged);
        let raised = slot.checked_mul(NUDGE_FACTOR).or_overflow(self.label())?;
        *slot = match kind {
            Perturbation::Rate => raised.min(Decimal::ONE),
            Perturbation::Count => round_to(raised, 0),
        };
        Ok(nudged)
    }
}

// ---------------------------------------------------------------------------
// Target metrics
// ---------------------------------------------------------------------------

/// Outcome metrics whose sensitivity is ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMetric {
    Roi,
    Irr,
    Npv,
    PaybackYears,
    BreakEvenYear,
    EsgScore,
}

impl TargetMetric {
    pub const ALL: [TargetMetric; 6] = [
        TargetMetric::Roi,
        TargetMetric::Irr,
        TargetMetric::Npv,
        TargetMetric::PaybackYears,
        TargetMetric::BreakEvenYear,
        TargetMetric::EsgScore,
    ];

    fn read(self, details: &DeepIndicators) -> Decimal {
        match self {
            TargetMetric::Roi => details.roi_percent,
            TargetMetric::Irr => details.irr_percent,
            TargetMetric::Npv => details.npv,
            TargetMetric::PaybackYears => details.payback_years,
            TargetMetric::BreakEvenYear => details.break_even_year,
            TargetMetric::EsgScore => details.esg_score,
        }
    }
}

/// Up to three driver labels per metric, most impactful first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyDrivers {
    pub roi: Vec<String>,
    pub irr: Vec<String>,
    pub npv: Vec<String>,
    pub payback_years: Vec<String>,
    pub break_even_year: Vec<String>,
    pub esg_score: Vec<String>,
}

impl KeyDrivers {
    pub fn get(&self, metric: TargetMetric) -> &[String] {
        match metric {
            TargetMetric::Roi => &self.roi,
            TargetMetric::Irr => &self.irr,
            TargetMetric::Npv => &self.npv,
            TargetMetric::PaybackYears => &self.payback_years,
            TargetMetric::BreakEvenYear => &self.break_even_year,
            TargetMetric::EsgScore => &self.esg_score,
        }
    }

    fn get_mut(&mut self, metric: TargetMetric) -> &mut Vec<String> {
        match metric {
            TargetMetric::Roi => &mut self.roi,
            TargetMetric::Irr => &mut self.irr,
            TargetMetric::Npv => &mut self.npv,
            TargetMetric::PaybackYears => &mut self.payback_years,
            TargetMetric::BreakEvenYear => &mut self.break_even_year,
            TargetMetric::EsgScore => &mut self.esg_score,
        }
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Rank drivers by the absolute change each one causes in every target metric.
///
/// `evaluate` re-runs the indicator pipeline on a perturbed record; each call
/// is independent. Drivers with zero impact on a metric are left out of its
/// list, and ties keep candidate order.
pub fn rank_drivers<F>(
    inputs: &SimulationInputs,
    baseline: &DeepIndicators,
    evaluate: F,
) -> SimulatorResult<KeyDrivers>
where
    F: Fn(&SimulationInputs) -> SimulatorResult<DeepIndicators>,
{
    let mut impacts: Vec<Vec<(Decimal, Driver)>> = vec![Vec::new(); TargetMetric::ALL.len()];

    for driver in Driver::ALL {
        let details = evaluate(&driver.perturb(inputs)?)?;
        for (slot, metric) in TargetMetric::ALL.iter().enumerate() {
            let delta = metric
                .read(&details)
                .checked_sub(metric.read(baseline))
                .or_overflow(driver.label())?
                .abs();
            if delta > Decimal::ZERO {
                impacts[slot].push((delta, driver));
            }
        }
        tracing::trace!(driver = driver.label(), "sensitivity run complete");
    }

    let mut key_drivers = KeyDrivers::default();
    for (metric, mut ranked) in TargetMetric::ALL.into_iter().zip(impacts) {
        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        *key_drivers.get_mut(metric) = ranked
            .into_iter()
            .take(TOP_N)
            .map(|(_, driver)| driver.label().to_string())
            .collect();
    }

    Ok(key_drivers)
}

/// Key drivers for `inputs` against its already computed baseline details.
pub fn key_drivers(
    inputs: &SimulationInputs,
    baseline: &DeepIndicators,
) -> SimulatorResult<KeyDrivers> {
    rank_drivers(inputs, baseline, super::evaluate_indicators)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::evaluate_indicators;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rate_drivers_are_capped_at_one() {
        let inputs = SimulationInputs {
            variable_costs_pct: dec!(0.98),
            ..SimulationInputs::default()
        };
        let nudged = Driver::VariableCostsPct.perturb(&inputs).unwrap();
        assert_eq!(nudged.variable_costs_pct, dec!(1));

        let growth = Driver::RevenueGrowthRate
            .perturb(&SimulationInputs::default())
            .unwrap();
        assert_eq!(growth.revenue_growth_rate, dec!(0.0525));
    }

    #[test]
    fn test_count_drivers_are_rounded() {
        let inputs = SimulationInputs::default();
        assert_eq!(
            Driver::CarbonReductionPotential
                .perturb(&inputs)
                .unwrap()
                .carbon_reduction_potential,
            dec!(26)
        );
        assert_eq!(
            Driver::SustainabilityCapex
                .perturb(&inputs)
                .unwrap()
                .sustainability_capex,
            dec!(105000)
        );
    }

    #[test]
    fn test_perturb_touches_only_its_field() {
        let inputs = SimulationInputs::default();
        let original = serde_json::to_string(&inputs).unwrap();

        for driver in Driver::ALL {
            let mut nudged = driver.perturb(&inputs).unwrap();
            let mut untouched = inputs.clone();
            assert_ne!(*driver.slot(&mut nudged), *driver.slot(&mut untouched), "{driver:?}");

            *driver.slot(&mut nudged) = *driver.slot(&mut untouched);
            assert_eq!(serde_json::to_string(&nudged).unwrap(), original, "{driver:?}");
        }
    }

    #[test]
    fn test_perturb_overflow_is_an_error() {
        let inputs = SimulationInputs {
            sustainability_capex: Decimal::MAX,
            ..SimulationInputs::default()
        };
        assert!(matches!(
            Driver::SustainabilityCapex.perturb(&inputs),
            Err(crate::SimulatorError::ArithmeticOverflow { .. })
        ));
    }

    #[test]
    fn test_default_key_drivers() {
        let inputs = SimulationInputs::default();
        let baseline = evaluate_indicators(&inputs).unwrap();
        let drivers = key_drivers(&inputs, &baseline).unwrap();

        assert_eq!(drivers.esg_score, vec!["Carbon reduction", "Sustainability CAPEX"]);
        assert_eq!(drivers.roi, vec!["Reinvest %", "Sustainability CAPEX", "Green market access"]);
        assert_eq!(drivers.npv[0], "Green market access");
        assert!(drivers.payback_years.is_empty());
        assert!(drivers.break_even_year.is_empty());
        for metric in TargetMetric::ALL {
            assert!(drivers.get(metric).len() <= 3);
        }
    }

    #[test]
    fn test_zero_impact_drivers_are_excluded() {
        let inputs = SimulationInputs::default();
        let baseline = evaluate_indicators(&inputs).unwrap();
        // Only a carbon nudge moves anything in this stub.
        let drivers = rank_drivers(&inputs, &baseline, |nudged| {
            let mut details = baseline.clone();
            if nudged.carbon_reduction_potential != inputs.carbon_reduction_potential {
                details.esg_score += dec!(1);
            }
            Ok(details)
        })
        .unwrap();
        assert_eq!(
            drivers,
            KeyDrivers {
                esg_score: vec!["Carbon reduction".to_string()],
                ..KeyDrivers::default()
            }
        );
    }

    #[test]
    fn test_ties_keep_candidate_order() {
        let inputs = SimulationInputs::default();
        let baseline = evaluate_indicators(&inputs).unwrap();
        let drivers = rank_drivers(&inputs, &baseline, |_| {
            let mut details = baseline.clone();
            details.npv -= dec!(10);
            Ok(details)
        })
        .unwrap();
        assert_eq!(
            drivers.npv,
            vec!["Sustainability CAPEX", "Sales growth", "Energy efficiency"]
        );
    }

    #[test]
    fn test_evaluation_errors_propagate() {
        let inputs = SimulationInputs::default();
        let baseline = evaluate_indicators(&inputs).unwrap();
        let result = rank_drivers(&inputs, &baseline, |_| {
            Err(crate::SimulatorError::ArithmeticOverflow {
                context: "stub".into(),
            })
        });
        assert!(result.is_err());
    }
}
