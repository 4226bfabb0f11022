//! Simulation input: fleet, network and market assumptions for one run.

use std::fmt;
use std::str::FromStr;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ParameterError;

/// Longest hardware lifespan accepted, in years.
pub const MAX_LIFESPAN_YEARS: u32 = 100;

/// Hashrate magnitude. Adjacent units are a factor of 1000 apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HashrateUnit {
    #[serde(rename = "H/s", alias = "H", alias = "h")]
    Hash,
    #[serde(rename = "kH/s", alias = "KH", alias = "kH", alias = "kh")]
    KiloHash,
    #[serde(rename = "MH/s", alias = "MH", alias = "mh")]
    MegaHash,
    #[serde(rename = "GH/s", alias = "GH", alias = "gh")]
    GigaHash,
    #[serde(rename = "TH/s", alias = "TH", alias = "th")]
    TeraHash,
    #[serde(rename = "PH/s", alias = "PH", alias = "ph")]
    PetaHash,
    #[serde(rename = "EH/s", alias = "EH", alias = "eh")]
    ExaHash,
}

impl HashrateUnit {
    pub const ALL: [HashrateUnit; 7] = [
        HashrateUnit::Hash,
        HashrateUnit::KiloHash,
        HashrateUnit::MegaHash,
        HashrateUnit::GigaHash,
        HashrateUnit::TeraHash,
        HashrateUnit::PetaHash,
        HashrateUnit::ExaHash,
    ];

    fn exponent(self) -> i32 {
        match self {
            HashrateUnit::Hash => 0,
            HashrateUnit::KiloHash => 1,
            HashrateUnit::MegaHash => 2,
            HashrateUnit::GigaHash => 3,
            HashrateUnit::TeraHash => 4,
            HashrateUnit::PetaHash => 5,
            HashrateUnit::ExaHash => 6,
        }
    }

    /// Multiplier that converts a value in `self` into `target`.
    pub fn factor_to(self, target: HashrateUnit) -> f64 {
        1000f64.powi(self.exponent() - target.exponent())
    }

    /// The unit one step (×1000) larger, if any.
    pub fn larger(self) -> Option<HashrateUnit> {
        Self::ALL.get(self.exponent() as usize + 1).copied()
    }

    pub fn symbol(self) -> &'static str {
        match self {
            HashrateUnit::Hash => "H/s",
            HashrateUnit::KiloHash => "kH/s",
            HashrateUnit::MegaHash => "MH/s",
            HashrateUnit::GigaHash => "GH/s",
            HashrateUnit::TeraHash => "TH/s",
            HashrateUnit::PetaHash => "PH/s",
            HashrateUnit::ExaHash => "EH/s",
        }
    }
}

impl fmt::Display for HashrateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for HashrateUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let prefix = normalized.strip_suffix("/s").unwrap_or(&normalized);
        match prefix {
            "h" => Ok(HashrateUnit::Hash),
            "kh" => Ok(HashrateUnit::KiloHash),
            "mh" => Ok(HashrateUnit::MegaHash),
            "gh" => Ok(HashrateUnit::GigaHash),
            "th" => Ok(HashrateUnit::TeraHash),
            "ph" => Ok(HashrateUnit::PetaHash),
            "eh" => Ok(HashrateUnit::ExaHash),
            _ => Err(format!(
                "unknown hashrate unit '{}' (expected one of H, kH, MH, GH, TH, PH, EH)",
                s
            )),
        }
    }
}

fn default_unit_hashrate_unit() -> HashrateUnit {
    HashrateUnit::GigaHash
}

fn default_network_hashrate_unit() -> HashrateUnit {
    HashrateUnit::TeraHash
}

/// Everything one simulation run needs. Immutable for the duration of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Purchase price of one mining unit, in fiat
    pub unit_cost: f64,
    /// Number of identical units in the fleet
    pub units_count: u32,
    /// Hashrate of one unit, in `unit_hashrate_unit`
    pub unit_hashrate: f64,
    #[serde(default = "default_unit_hashrate_unit")]
    pub unit_hashrate_unit: HashrateUnit,
    /// Power draw of one unit at the wall
    pub unit_power_watts: f64,
    pub energy_cost_per_kwh: f64,
    /// Absolute daily increment to network hashrate, in `network_hashrate_unit`
    pub hashrate_growth_per_day: f64,
    /// Network hashrate on the starting date, in `network_hashrate_unit`
    pub starting_network_hashrate: f64,
    #[serde(default = "default_network_hashrate_unit")]
    pub network_hashrate_unit: HashrateUnit,
    pub starting_date: NaiveDate,
    /// Coin price on the starting date, in fiat
    pub starting_price: f64,
    /// Absolute daily increment to the coin price (may be negative)
    pub price_growth_per_day: f64,
    pub lifespan_years: u32,
}

impl SimulationParameters {
    /// The calculator's reference rig: one 100 GH/s, 65 W unit costing 750,
    /// mined against a 4250 TH/s network growing 147 TH/s per day, at a
    /// coin price of 0.05 and 0.10 per kWh, retired after five years.
    pub fn new(starting_date: NaiveDate) -> Self {
        Self {
            unit_cost: 750.0,
            units_count: 1,
            unit_hashrate: 100.0,
            unit_hashrate_unit: HashrateUnit::GigaHash,
            unit_power_watts: 65.0,
            energy_cost_per_kwh: 0.1,
            hashrate_growth_per_day: 147.0,
            starting_network_hashrate: 4250.0,
            network_hashrate_unit: HashrateUnit::TeraHash,
            starting_date,
            starting_price: 0.05,
            price_growth_per_day: 0.0,
            lifespan_years: 5,
        }
    }

    /// Reject anything the simulation cannot run on.
    pub fn validate(&self) -> Result<(), ParameterError> {
        let numbers = [
            ("unit_cost", self.unit_cost),
            ("unit_hashrate", self.unit_hashrate),
            ("unit_power_watts", self.unit_power_watts),
            ("energy_cost_per_kwh", self.energy_cost_per_kwh),
            ("hashrate_growth_per_day", self.hashrate_growth_per_day),
            ("starting_network_hashrate", self.starting_network_hashrate),
            ("starting_price", self.starting_price),
            ("price_growth_per_day", self.price_growth_per_day),
        ];
        for (field, value) in numbers {
            if !value.is_finite() {
                return Err(ParameterError::NotFinite { field, value });
            }
        }

        let positive = [
            ("unit_cost", self.unit_cost),
            ("unit_hashrate", self.unit_hashrate),
            ("starting_network_hashrate", self.starting_network_hashrate),
            ("starting_price", self.starting_price),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ParameterError::NotPositive { field, value });
            }
        }

        let non_negative = [
            ("unit_power_watts", self.unit_power_watts),
            ("energy_cost_per_kwh", self.energy_cost_per_kwh),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(ParameterError::Negative { field, value });
            }
        }

        if self.units_count < 1 {
            return Err(ParameterError::BelowOne {
                field: "units_count",
                value: self.units_count,
            });
        }
        if self.lifespan_years < 1 {
            return Err(ParameterError::BelowOne {
                field: "lifespan_years",
                value: self.lifespan_years,
            });
        }
        if self.lifespan_years > MAX_LIFESPAN_YEARS {
            return Err(ParameterError::LifespanTooLong {
                years: self.lifespan_years,
                max: MAX_LIFESPAN_YEARS,
            });
        }
        if self.lifespan_end_date().is_none() {
            return Err(ParameterError::LifespanOutOfRange {
                start: self.starting_date,
                years: self.lifespan_years,
            });
        }

        Ok(())
    }

    /// Total capital outlay for the fleet.
    pub fn fleet_cost(&self) -> f64 {
        self.unit_cost * f64::from(self.units_count)
    }

    /// Combined fleet hashrate, expressed in the network's unit.
    pub fn fleet_hashrate(&self) -> f64 {
        f64::from(self.units_count)
            * self.unit_hashrate
            * self.unit_hashrate_unit.factor_to(self.network_hashrate_unit)
    }

    /// Fleet energy bill for one 24-hour day.
    pub fn daily_energy_cost(&self) -> f64 {
        f64::from(self.units_count) * self.unit_power_watts * 24.0 / 1000.0
            * self.energy_cost_per_kwh
    }

    /// `starting_date` plus `lifespan_years` calendar years (29 Feb clamps to 28 Feb).
    pub fn lifespan_end_date(&self) -> Option<NaiveDate> {
        let months = self.lifespan_years.checked_mul(12)?;
        self.starting_date.checked_add_months(Months::new(months))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 8, 15).unwrap()
    }

    #[test]
    fn test_reference_parameters_are_valid() {
        assert!(SimulationParameters::new(start()).validate().is_ok());
    }

    #[test]
    fn test_unit_conversion_factors() {
        assert!((HashrateUnit::GigaHash.factor_to(HashrateUnit::TeraHash) - 0.001).abs() < 1e-15);
        assert!((HashrateUnit::MegaHash.factor_to(HashrateUnit::PetaHash) - 1e-9).abs() < 1e-21);
        assert_eq!(HashrateUnit::TeraHash.factor_to(HashrateUnit::GigaHash), 1000.0);
        assert_eq!(HashrateUnit::PetaHash.factor_to(HashrateUnit::PetaHash), 1.0);
        assert_eq!(HashrateUnit::TeraHash.larger(), Some(HashrateUnit::PetaHash));
        assert_eq!(HashrateUnit::ExaHash.larger(), None);
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!("GH/s".parse::<HashrateUnit>().unwrap(), HashrateUnit::GigaHash);
        assert_eq!("th".parse::<HashrateUnit>().unwrap(), HashrateUnit::TeraHash);
        assert_eq!(" kH/s ".parse::<HashrateUnit>().unwrap(), HashrateUnit::KiloHash);
        assert!("ZH".parse::<HashrateUnit>().is_err());
    }

    #[test]
    fn test_fleet_figures() {
        let mut params = SimulationParameters::new(start());
        params.units_count = 4;
        params.unit_hashrate = 200.0;
        params.unit_power_watts = 100.0;

        assert_eq!(params.fleet_cost(), 3000.0);
        assert!((params.fleet_hashrate() - 0.8).abs() < 1e-12);
        // 4 × 100 W × 24 h = 9.6 kWh at 0.10
        assert!((params.daily_energy_cost() - 0.96).abs() < 1e-12);
    }

    #[test]
    fn test_lifespan_end_date_is_calendar_years() {
        let mut params = SimulationParameters::new(start());
        params.lifespan_years = 5;
        assert_eq!(
            params.lifespan_end_date(),
            NaiveDate::from_ymd_opt(2028, 8, 15)
        );

        params.starting_date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        params.lifespan_years = 1;
        assert_eq!(
            params.lifespan_end_date(),
            NaiveDate::from_ymd_opt(2025, 2, 28)
        );
    }

    #[test]
    fn test_rejects_non_positive_price() {
        let mut params = SimulationParameters::new(start());
        params.starting_price = 0.0;
        assert_eq!(
            params.validate(),
            Err(ParameterError::NotPositive { field: "starting_price", value: 0.0 })
        );
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let mut params = SimulationParameters::new(start());
        params.price_growth_per_day = f64::NAN;
        assert!(matches!(
            params.validate(),
            Err(ParameterError::NotFinite { field: "price_growth_per_day", .. })
        ));

        let mut params = SimulationParameters::new(start());
        params.unit_hashrate = f64::INFINITY;
        assert!(matches!(
            params.validate(),
            Err(ParameterError::NotFinite { field: "unit_hashrate", .. })
        ));
    }

    #[test]
    fn test_rejects_zero_counts() {
        let mut params = SimulationParameters::new(start());
        params.units_count = 0;
        assert!(matches!(
            params.validate(),
            Err(ParameterError::BelowOne { field: "units_count", .. })
        ));

        let mut params = SimulationParameters::new(start());
        params.lifespan_years = 0;
        assert!(matches!(
            params.validate(),
            Err(ParameterError::BelowOne { field: "lifespan_years", .. })
        ));
    }

    #[test]
    fn test_rejects_negative_costs() {
        let mut params = SimulationParameters::new(start());
        params.energy_cost_per_kwh = -0.01;
        assert!(matches!(
            params.validate(),
            Err(ParameterError::Negative { field: "energy_cost_per_kwh", .. })
        ));
    }

    #[test]
    fn test_zero_power_and_negative_growth_are_allowed() {
        let mut params = SimulationParameters::new(start());
        params.unit_power_watts = 0.0;
        params.energy_cost_per_kwh = 0.0;
        params.hashrate_growth_per_day = -10.0;
        params.price_growth_per_day = -0.001;
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_rejects_excessive_lifespan() {
        let mut params = SimulationParameters::new(start());
        params.lifespan_years = MAX_LIFESPAN_YEARS + 1;
        assert!(matches!(
            params.validate(),
            Err(ParameterError::LifespanTooLong { .. })
        ));
    }

    #[test]
    fn test_units_default_when_missing_from_json() {
        let json = r#"{
            "unit_cost": 750.0,
            "units_count": 1,
            "unit_hashrate": 200.0,
            "unit_power_watts": 100.0,
            "energy_cost_per_kwh": 0.1,
            "hashrate_growth_per_day": 100.0,
            "starting_network_hashrate": 5000.0,
            "starting_date": "2023-08-15",
            "starting_price": 0.05,
            "price_growth_per_day": 0.0,
            "lifespan_years": 5
        }"#;
        let params: SimulationParameters = serde_json::from_str(json).unwrap();
        assert_eq!(params.unit_hashrate_unit, HashrateUnit::GigaHash);
        assert_eq!(params.network_hashrate_unit, HashrateUnit::TeraHash);
        assert!(params.validate().is_ok());
    }
}
