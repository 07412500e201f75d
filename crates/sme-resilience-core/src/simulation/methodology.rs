use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::key_drivers::NUDGE_FACTOR;
use super::projections::BASELINE_GROWTH_MARKUP;
use crate::time_value::{IRR_BRACKET, IRR_ITERATIONS};
use crate::types::Rate;

/// Share of OPEX assumed to be energy spend.
pub const ENERGY_COST_SHARE_OF_OPEX: Rate = dec!(0.20);
/// Baseline electricity price, EUR per kWh.
pub const ELECTRICITY_PRICE_EUR_PER_KWH: Decimal = dec!(0.15);
/// Litres of water per EUR of revenue (manufacturing baseline).
pub const WATER_INTENSITY_L_PER_EUR: Decimal = dec!(1);
/// Tons of CO2 attributed to each EUR of efficiency savings.
pub const CARBON_TONS_PER_EUR_SAVED: Decimal = dec!(0.05);
/// Tons of CO2 attributed to each point of carbon reduction potential.
pub const CARBON_TONS_PER_POTENTIAL_POINT: Decimal = dec!(10);

const STATEMENTS: [&str; 6] = [
    "Environmental outputs are proxies intended for directional comparison, not certified reporting.",
    "Energy cost share default: 20% of OPEX",
    "Electricity price default: €0.15/kWh",
    "Water intensity default: 1 L per €1 revenue (manufacturing baseline) unless otherwise specified",
    "Waste proxy and resource efficiency are indicative indices, not measured quantities",
    "Score outputs are normalized and clamped to a 0–100 range.",
];

/// Published constant set and assumption statements behind every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Methodology {
    pub energy_cost_share_of_opex: Rate,
    pub electricity_price_eur_per_kwh: Decimal,
    pub water_intensity_l_per_eur: Decimal,
    pub carbon_tons_per_eur_saved: Decimal,
    pub carbon_tons_per_potential_point: Decimal,
    pub baseline_growth_markup: Rate,
    pub nudge_factor: Decimal,
    pub irr_bracket: (Rate, Rate),
    pub irr_iterations: u32,
    pub statements: Vec<String>,
}

impl Default for Methodology {
    fn default() -> Self {
        Self {
            energy_cost_share_of_opex: ENERGY_COST_SHARE_OF_OPEX,
            electricity_price_eur_per_kwh: ELECTRICITY_PRICE_EUR_PER_KWH,
            water_intensity_l_per_eur: WATER_INTENSITY_L_PER_EUR,
            carbon_tons_per_eur_saved: CARBON_TONS_PER_EUR_SAVED,
            carbon_tons_per_potential_point: CARBON_TONS_PER_POTENTIAL_POINT,
            baseline_growth_markup: BASELINE_GROWTH_MARKUP,
            nudge_factor: NUDGE_FACTOR,
            irr_bracket: IRR_BRACKET,
            irr_iterations: IRR_ITERATIONS,
            statements: STATEMENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The methodology appendix shown to end users.
pub fn methodology() -> Methodology {
    Methodology::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_are_surfaced_verbatim() {
        let m = methodology();
        assert_eq!(m.electricity_price_eur_per_kwh, dec!(0.15));
        assert_eq!(m.energy_cost_share_of_opex, dec!(0.20));
        assert_eq!(m.water_intensity_l_per_eur, dec!(1));
        assert_eq!(m.irr_bracket, (dec!(0), dec!(2)));
        assert!(m
            .statements
            .iter()
            .any(|s| s == "Electricity price default: €0.15/kWh"));
    }

    #[test]
    fn test_methodology_serializes_constants_as_strings() {
        let json = serde_json::to_value(methodology()).unwrap();
        assert_eq!(json["electricity_price_eur_per_kwh"], "0.15");
        assert_eq!(json["irr_iterations"], 50);
        assert_eq!(json["statements"].as_array().unwrap().len(), 6);
    }
}
