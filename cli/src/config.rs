//! Scenario configuration for the break-even calculator
//!
//! Supports TOML and JSON scenario files and environment variables.
//! Precedence: defaults < file < environment < command-line flags.

use anyhow::{Context, Result};
use breakeven_core::{HashrateUnit, SimulationParameters};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variables layered over the scenario file.
pub const ENV_PRICE: &str = "BREAKEVEN_PRICE";
pub const ENV_NETWORK_HASHRATE: &str = "BREAKEVEN_NETWORK_HASHRATE";
pub const ENV_HASHRATE_GROWTH: &str = "BREAKEVEN_HASHRATE_GROWTH";
pub const ENV_ENERGY_COST: &str = "BREAKEVEN_ENERGY_COST";

/// One break-even scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ScenarioConfig {
    /// Mining hardware
    #[serde(default)]
    pub fleet: FleetConfig,

    /// Network hashrate assumptions
    #[serde(default)]
    pub network: NetworkConfig,

    /// Coin price assumptions
    #[serde(default)]
    pub market: MarketConfig,

    /// Report rendering
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// Price of one unit, in fiat
    pub unit_cost: f64,

    /// Number of identical units
    pub units_count: u32,

    /// Hashrate of one unit
    pub unit_hashrate: f64,

    pub unit_hashrate_unit: HashrateUnit,

    /// Power draw of one unit at the wall (watts)
    pub unit_power_watts: f64,

    /// Electricity price, in fiat per kWh
    pub energy_cost_per_kwh: f64,

    /// Years until the hardware is retired
    pub lifespan_years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Network hashrate on the starting date
    pub starting_hashrate: f64,

    pub hashrate_unit: HashrateUnit,

    /// Hashrate added to the network every day (may be negative)
    pub growth_per_day: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Coin price on the starting date, in fiat
    pub starting_price: f64,

    /// Daily change to the coin price (may be negative)
    pub price_growth_per_day: f64,

    /// First mining day (today when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Emit the result as JSON instead of the terminal report
    pub json: bool,

    /// Omit the per-day table
    pub summary_only: bool,

    /// Print every n-th ledger row
    pub every: usize,

    /// Disable colored output
    pub no_color: bool,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            unit_cost: 750.0,
            units_count: 1,
            unit_hashrate: 100.0,
            unit_hashrate_unit: HashrateUnit::GigaHash,
            unit_power_watts: 65.0,
            energy_cost_per_kwh: 0.1,
            lifespan_years: 5,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            starting_hashrate: 4250.0,
            hashrate_unit: HashrateUnit::TeraHash,
            growth_per_day: 147.0,
        }
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            starting_price: 0.05,
            price_growth_per_day: 0.0,
            starting_date: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json: false,
            summary_only: false,
            every: default_every(),
            no_color: false,
        }
    }
}

impl ScenarioConfig {
    /// Load a scenario from file. `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;

        let config = if is_json(path) {
            serde_json::from_str(&content).context("Failed to parse scenario JSON")?
        } else {
            toml::from_str(&content).context("Failed to parse scenario TOML")?
        };

        Ok(config)
    }

    /// Save scenario to file, in the format implied by its extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self).context("Failed to serialize scenario")?
        } else {
            toml::to_string_pretty(self).context("Failed to serialize scenario")?
        };

        fs::write(path, content)
            .with_context(|| format!("Failed to write scenario file {}", path.display()))?;

        Ok(())
    }

    /// Apply `BREAKEVEN_*` overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any variable source. Unset variables are ignored,
    /// unparsable ones are an error.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let targets: [(&str, &mut f64); 4] = [
            (ENV_PRICE, &mut self.market.starting_price),
            (ENV_NETWORK_HASHRATE, &mut self.network.starting_hashrate),
            (ENV_HASHRATE_GROWTH, &mut self.network.growth_per_day),
            (ENV_ENERGY_COST, &mut self.fleet.energy_cost_per_kwh),
        ];

        for (key, slot) in targets {
            if let Some(raw) = lookup(key) {
                *slot = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{} must be a number, got '{}'", key, raw))?;
                log::debug!("{} override: {}", key, slot);
            }
        }

        Ok(())
    }

    /// Simulation input for this scenario; `today` fills a missing start date
    pub fn to_params(&self, today: NaiveDate) -> SimulationParameters {
        SimulationParameters {
            unit_cost: self.fleet.unit_cost,
            units_count: self.fleet.units_count,
            unit_hashrate: self.fleet.unit_hashrate,
            unit_hashrate_unit: self.fleet.unit_hashrate_unit,
            unit_power_watts: self.fleet.unit_power_watts,
            energy_cost_per_kwh: self.fleet.energy_cost_per_kwh,
            hashrate_growth_per_day: self.network.growth_per_day,
            starting_network_hashrate: self.network.starting_hashrate,
            network_hashrate_unit: self.network.hashrate_unit,
            starting_date: self.market.starting_date.unwrap_or(today),
            starting_price: self.market.starting_price,
            price_growth_per_day: self.market.price_growth_per_day,
            lifespan_years: self.fleet.lifespan_years,
        }
    }

    /// Validate configuration
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        if self.output.every == 0 {
            anyhow::bail!("Row interval must be at least 1");
        }

        self.to_params(today)
            .validate()
            .context("Invalid scenario")?;

        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn default_every() -> usize {
    1
}
