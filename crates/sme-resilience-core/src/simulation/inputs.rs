use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::SimulatorError;
use crate::types::{checked_sum, Money, Points, Rate};
use crate::SimulatorResult;

/// Longest horizon the engine is calibrated for; longer runs still compute.
pub const MAX_CALIBRATED_HORIZON: u32 = 30;

/// Hard ceiling on the horizon. Longer requests are rejected with
/// `InvalidInput` instead of allocating one record per year.
pub const MAX_FORECAST_HORIZON: u32 = 1_000;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Complete input record for one simulation run.
///
/// Deserializing from a JSON body that omits fields fills them from
/// [`SimulationInputs::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationInputs {
    // -- Company profile --
    pub industry: String,
    pub company_size: String,
    pub region: String,
    /// Forecast years (typically 5, 7 or 10)
    pub forecast_horizon: u32,

    // -- Baseline financials --
    pub initial_revenue: Money,
    pub num_employees: u32,
    pub fixed_costs: Money,
    /// 0-1
    pub variable_costs_pct: Rate,
    pub initial_capex: Money,
    /// 0-1
    pub operating_margin_pct: Rate,
    pub revenue_growth_rate: Rate,
    pub employee_growth_rate: Rate,

    // -- Sustainability strategy (scenario B) --
    pub sustainability_capex: Money,
    /// Share of scenario-B revenue reinvested every year, 0-1
    pub reinvest_pct: Rate,
    pub energy_efficiency_pct: Rate,
    pub resource_efficiency_pct: Rate,
    pub waste_reduction_pct: Rate,
    pub circular_economy_pct: Rate,
    pub reputation_uplift_pct: Rate,
    pub green_market_access_pct: Rate,
    pub turnover_reduction_pct: Rate,
    pub productivity_gain_pct: Rate,
    pub gov_subsidies: Money,

    // -- Impact potentials (0-100) --
    pub disruption_impact: Points,
    pub carbon_reduction_potential: Points,
    pub scope_1_reduction: Points,
    pub scope_2_reduction: Points,
    pub scope_3_reduction: Points,

    // -- Economic settings --
    pub tax_rate: Rate,
    pub discount_rate: Rate,
    pub inflation_rate: Rate,
    pub depreciation_years: u32,
    pub wacc: Rate,
}

impl Default for SimulationInputs {
    fn default() -> Self {
        Self {
            industry: "Manufacturing".to_string(),
            company_size: "SME".to_string(),
            region: "EU".to_string(),
            forecast_horizon: 7,

            initial_revenue: dec!(1000000),
            num_employees: 50,
            fixed_costs: dec!(200000),
            variable_costs_pct: dec!(0.4),
            initial_capex: dec!(50000),
            operating_margin_pct: dec!(0.15),
            revenue_growth_rate: dec!(0.05),
            employee_growth_rate: dec!(0.02),

            sustainability_capex: dec!(100000),
            reinvest_pct: dec!(0.01),
            energy_efficiency_pct: dec!(0.15),
            resource_efficiency_pct: dec!(0.08),
            waste_reduction_pct: dec!(0.1),
            circular_economy_pct: dec!(0.05),
            reputation_uplift_pct: dec!(0.03),
            green_market_access_pct: dec!(0.05),
            turnover_reduction_pct: dec!(0.2),
            productivity_gain_pct: dec!(0.1),
            gov_subsidies: dec!(15000),

            disruption_impact: dec!(20),
            carbon_reduction_potential: dec!(25),
            scope_1_reduction: dec!(25),
            scope_2_reduction: dec!(25),
            scope_3_reduction: dec!(20),

            tax_rate: dec!(0.25),
            discount_rate: dec!(0.08),
            inflation_rate: dec!(0.02),
            depreciation_years: 5,
            wacc: dec!(0.07),
        }
    }
}

/// Input record as supplied by a caller: any subset of the fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialSimulationInputs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_horizon: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_revenue: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_employees: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_costs: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_costs_pct: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_capex: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_margin_pct: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_growth_rate: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_growth_rate: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sustainability_capex: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reinvest_pct: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_efficiency_pct: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_efficiency_pct: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waste_reduction_pct: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circular_economy_pct: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reputation_uplift_pct: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub green_market_access_pct: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turnover_reduction_pct: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub productivity_gain_pct: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gov_subsidies: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disruption_impact: Option<Points>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbon_reduction_potential: Option<Points>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_1_reduction: Option<Points>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_2_reduction: Option<Points>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_3_reduction: Option<Points>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_rate: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inflation_rate: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depreciation_years: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wacc: Option<Rate>,
}

// ---------------------------------------------------------------------------
// Default merge
// ---------------------------------------------------------------------------

impl SimulationInputs {
    /// Complete a partial record over the documented default set.
    pub fn from_partial(partial: &PartialSimulationInputs) -> Self {
        partial.complete_with(&SimulationInputs::default())
    }
}

impl PartialSimulationInputs {
    /// Field-by-field merge: supplied values win, `defaults` fills the rest.
    pub fn complete_with(&self, defaults: &SimulationInputs) -> SimulationInputs {
        let d = defaults;
        SimulationInputs {
            industry: self.industry.clone().unwrap_or_else(|| d.industry.clone()),
            company_size: self
                .company_size
                .clone()
                .unwrap_or_else(|| d.company_size.clone()),
            region: self.region.clone().unwrap_or_else(|| d.region.clone()),
            forecast_horizon: self.forecast_horizon.unwrap_or(d.forecast_horizon),
            initial_revenue: self.initial_revenue.unwrap_or(d.initial_revenue),
            num_employees: self.num_employees.unwrap_or(d.num_employees),
            fixed_costs: self.fixed_costs.unwrap_or(d.fixed_costs),
            variable_costs_pct: self.variable_costs_pct.unwrap_or(d.variable_costs_pct),
            initial_capex: self.initial_capex.unwrap_or(d.initial_capex),
            operating_margin_pct: self.operating_margin_pct.unwrap_or(d.operating_margin_pct),
            revenue_growth_rate: self.revenue_growth_rate.unwrap_or(d.revenue_growth_rate),
            employee_growth_rate: self.employee_growth_rate.unwrap_or(d.employee_growth_rate),
            sustainability_capex: self.sustainability_capex.unwrap_or(d.sustainability_capex),
            reinvest_pct: self.reinvest_pct.unwrap_or(d.reinvest_pct),
            energy_efficiency_pct: self.energy_efficiency_pct.unwrap_or(d.energy_efficiency_pct),
            resource_efficiency_pct: self
                .resource_efficiency_pct
                .unwrap_or(d.resource_efficiency_pct),
            waste_reduction_pct: self.waste_reduction_pct.unwrap_or(d.waste_reduction_pct),
            circular_economy_pct: self.circular_economy_pct.unwrap_or(d.circular_economy_pct),
            reputation_uplift_pct: self.reputation_uplift_pct.unwrap_or(d.reputation_uplift_pct),
            green_market_access_pct: self
                .green_market_access_pct
                .unwrap_or(d.green_market_access_pct),
            turnover_reduction_pct: self
                .turnover_reduction_pct
                .unwrap_or(d.turnover_reduction_pct),
            productivity_gain_pct: self.productivity_gain_pct.unwrap_or(d.productivity_gain_pct),
            gov_subsidies: self.gov_subsidies.unwrap_or(d.gov_subsidies),
            disruption_impact: self.disruption_impact.unwrap_or(d.disruption_impact),
            carbon_reduction_potential: self
                .carbon_reduction_potential
                .unwrap_or(d.carbon_reduction_potential),
            scope_1_reduction: self.scope_1_reduction.unwrap_or(d.scope_1_reduction),
            scope_2_reduction: self.scope_2_reduction.unwrap_or(d.scope_2_reduction),
            scope_3_reduction: self.scope_3_reduction.unwrap_or(d.scope_3_reduction),
            tax_rate: self.tax_rate.unwrap_or(d.tax_rate),
            discount_rate: self.discount_rate.unwrap_or(d.discount_rate),
            inflation_rate: self.inflation_rate.unwrap_or(d.inflation_rate),
            depreciation_years: self.depreciation_years.unwrap_or(d.depreciation_years),
            wacc: self.wacc.unwrap_or(d.wacc),
        }
    }

    /// Set a single field from its wire name and a textual value.
    pub fn set(&mut self, field: &str, value: &str) -> SimulatorResult<()> {
        let value = value.trim();
        match field {
            "industry" => self.industry = Some(value.to_string()),
            "company_size" => self.company_size = Some(value.to_string()),
            "region" => self.region = Some(value.to_string()),
            "forecast_horizon" => self.forecast_horizon = Some(parse_count(field, value)?),
            "initial_revenue" => self.initial_revenue = Some(parse_decimal(field, value)?),
            "num_employees" => self.num_employees = Some(parse_count(field, value)?),
            "fixed_costs" => self.fixed_costs = Some(parse_decimal(field, value)?),
            "variable_costs_pct" => self.variable_costs_pct = Some(parse_decimal(field, value)?),
            "initial_capex" => self.initial_capex = Some(parse_decimal(field, value)?),
            "operating_margin_pct" => {
                self.operating_margin_pct = Some(parse_decimal(field, value)?)
            }
            "revenue_growth_rate" => self.revenue_growth_rate = Some(parse_decimal(field, value)?),
            "employee_growth_rate" => {
                self.employee_growth_rate = Some(parse_decimal(field, value)?)
            }
            "sustainability_capex" => {
                self.sustainability_capex = Some(parse_decimal(field, value)?)
            }
            "reinvest_pct" => self.reinvest_pct = Some(parse_decimal(field, value)?),
            "energy_efficiency_pct" => {
                self.energy_efficiency_pct = Some(parse_decimal(field, value)?)
            }
            "resource_efficiency_pct" => {
                self.resource_efficiency_pct = Some(parse_decimal(field, value)?)
            }
            "waste_reduction_pct" => self.waste_reduction_pct = Some(parse_decimal(field, value)?),
            "circular_economy_pct" => {
                self.circular_economy_pct = Some(parse_decimal(field, value)?)
            }
            "reputation_uplift_pct" => {
                self.reputation_uplift_pct = Some(parse_decimal(field, value)?)
            }
            "green_market_access_pct" => {
                self.green_market_access_pct = Some(parse_decimal(field, value)?)
            }
            "turnover_reduction_pct" => {
                self.turnover_reduction_pct = Some(parse_decimal(field, value)?)
            }
            "productivity_gain_pct" => {
                self.productivity_gain_pct = Some(parse_decimal(field, value)?)
            }
            "gov_subsidies" => self.gov_subsidies = Some(parse_decimal(field, value)?),
            "disruption_impact" => self.disruption_impact = Some(parse_decimal(field, value)?),
            "carbon_reduction_potential" => {
                self.carbon_reduction_potential = Some(parse_decimal(field, value)?)
            }
            "scope_1_reduction" => self.scope_1_reduction = Some(parse_decimal(field, value)?),
            "scope_2_reduction" => self.scope_2_reduction = Some(parse_decimal(field, value)?),
            "scope_3_reduction" => self.scope_3_reduction = Some(parse_decimal(field, value)?),
            "tax_rate" => self.tax_rate = Some(parse_decimal(field, value)?),
            "discount_rate" => self.discount_rate = Some(parse_decimal(field, value)?),
            "inflation_rate" => self.inflation_rate = Some(parse_decimal(field, value)?),
            "depreciation_years" => self.depreciation_years = Some(parse_count(field, value)?),
            "wacc" => self.wacc = Some(parse_decimal(field, value)?),
            other => {
                return Err(SimulatorError::InvalidInput {
                    field: other.to_string(),
                    reason: "Unknown input field".into(),
                })
            }
        }
        Ok(())
    }
}

fn parse_decimal(field: &str, value: &str) -> SimulatorResult<Decimal> {
    value.parse::<Decimal>().map_err(|e| SimulatorError::InvalidInput {
        field: field.to_string(),
        reason: format!("'{value}' is not a decimal number ({e})"),
    })
}

fn parse_count(field: &str, value: &str) -> SimulatorResult<u32> {
    value.parse::<u32>().map_err(|e| SimulatorError::InvalidInput {
        field: field.to_string(),
        reason: format!("'{value}' is not a non-negative integer ({e})"),
    })
}

// ---------------------------------------------------------------------------
// Range warnings
// ---------------------------------------------------------------------------

/// Non-fatal notes on values outside their documented domain.
///
/// The engine still computes with such values; the notes travel in the
/// output envelope so a caller can surface them.
pub fn range_warnings(inputs: &SimulationInputs) -> Vec<String> {
    let mut warnings = Vec::new();

    if inputs.forecast_horizon == 0 {
        warnings.push("forecast_horizon is 0: projections will be empty.".to_string());
    } else if inputs.forecast_horizon > MAX_CALIBRATED_HORIZON {
        warnings.push(format!(
            "forecast_horizon {} exceeds the calibrated maximum of {MAX_CALIBRATED_HORIZON} years.",
            inputs.forecast_horizon
        ));
    }

    let fractions = [
        ("variable_costs_pct", inputs.variable_costs_pct),
        ("operating_margin_pct", inputs.operating_margin_pct),
        ("reinvest_pct", inputs.reinvest_pct),
        ("energy_efficiency_pct", inputs.energy_efficiency_pct),
        ("resource_efficiency_pct", inputs.resource_efficiency_pct),
        ("waste_reduction_pct", inputs.waste_reduction_pct),
        ("circular_economy_pct", inputs.circular_economy_pct),
        ("reputation_uplift_pct", inputs.reputation_uplift_pct),
        ("green_market_access_pct", inputs.green_market_access_pct),
        ("turnover_reduction_pct", inputs.turnover_reduction_pct),
        ("productivity_gain_pct", inputs.productivity_gain_pct),
        ("tax_rate", inputs.tax_rate),
    ];
    for (name, value) in fractions {
        if value < Decimal::ZERO || value > Decimal::ONE {
            warnings.push(format!("{name} = {value} is outside the fractional range 0-1."));
        }
    }

    let points = [
        ("disruption_impact", inputs.disruption_impact),
        ("carbon_reduction_potential", inputs.carbon_reduction_potential),
        ("scope_1_reduction", inputs.scope_1_reduction),
        ("scope_2_reduction", inputs.scope_2_reduction),
        ("scope_3_reduction", inputs.scope_3_reduction),
    ];
    for (name, value) in points {
        if value < Decimal::ZERO || value > dec!(100) {
            warnings.push(format!("{name} = {value} is outside the 0-100 point scale."));
        }
    }

    let amounts = [
        ("initial_revenue", inputs.initial_revenue),
        ("fixed_costs", inputs.fixed_costs),
        ("initial_capex", inputs.initial_capex),
        ("sustainability_capex", inputs.sustainability_capex),
        ("gov_subsidies", inputs.gov_subsidies),
    ];
    for (name, value) in amounts {
        if value < Decimal::ZERO {
            warnings.push(format!("{name} = {value} is negative."));
        }
    }

    let saving_pct = checked_sum(
        [
            inputs.energy_efficiency_pct,
            inputs.resource_efficiency_pct,
            inputs.waste_reduction_pct,
            inputs.circular_economy_pct,
        ],
        "efficiency savings",
    );
    match saving_pct {
        Ok(total) if total <= Decimal::ONE => {}
        Ok(total) => warnings.push(format!(
            "Combined efficiency savings of {total} exceed 100% of scenario-B OPEX."
        )),
        Err(_) => warnings.push(
            "Combined efficiency savings exceed the decimal range.".to_string(),
        ),
    }

    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
