use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use sme_resilience_core::simulation::{
    self, methodology, PartialSimulationInputs, SimulationInputs,
};

use crate::input;

/// Input selection shared by every command that runs the simulator
#[derive(Args)]
pub struct RequestArgs {
    /// Path to a JSON file holding any subset of the input fields
    #[arg(long)]
    pub input: Option<String>,

    /// Override a single input field (repeatable), e.g. --set tax_rate=0.3
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub overrides: Vec<String>,

    /// Forecast horizon in years
    #[arg(long)]
    pub horizon: Option<u32>,

    /// Current annual revenue (EUR)
    #[arg(long)]
    pub revenue: Option<Decimal>,

    /// Sustainability capital expenditure (EUR)
    #[arg(long)]
    pub sustainability_capex: Option<Decimal>,

    /// Share of revenue reinvested in sustainability each year (0-1)
    #[arg(long)]
    pub reinvest_pct: Option<Decimal>,

    /// Discount rate for NPV and discounted payback (0-1)
    #[arg(long)]
    pub discount_rate: Option<Decimal>,
}

/// Arguments for a full simulation run
#[derive(Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub request: RequestArgs,
}

/// Arguments for the key-driver ranking
#[derive(Args)]
pub struct KeyDriversArgs {
    #[command(flatten)]
    pub request: RequestArgs,
}

impl RequestArgs {
    /// Build the partial request: file or stdin first, then `--set`, then
    /// the typed flags.
    fn resolve(&self) -> Result<PartialSimulationInputs, Box<dyn std::error::Error>> {
        let mut request = input::load_request(self.input.as_deref())?;

        for assignment in &self.overrides {
            let (field, value) = assignment
                .split_once('=')
                .ok_or_else(|| format!("--set expects FIELD=VALUE, got '{assignment}'"))?;
            request.set(field.trim(), value)?;
        }

        if let Some(h) = self.horizon {
            request.forecast_horizon = Some(h);
        }
        if let Some(r) = self.revenue {
            request.initial_revenue = Some(r);
        }
        if let Some(c) = self.sustainability_capex {
            request.sustainability_capex = Some(c);
        }
        if let Some(p) = self.reinvest_pct {
            request.reinvest_pct = Some(p);
        }
        if let Some(d) = self.discount_rate {
            request.discount_rate = Some(d);
        }

        Ok(request)
    }
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = args.request.resolve()?;
    let result = simulation::run_simulation(&request)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_key_drivers(args: KeyDriversArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = args.request.resolve()?;
    let result = simulation::run_simulation(&request)?;
    Ok(serde_json::to_value(result.result.key_drivers)?)
}

pub fn run_defaults() -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(SimulationInputs::default())?)
}

pub fn run_methodology() -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(methodology())?)
}
