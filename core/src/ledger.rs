//! Per-day ledger rows and the final result of a run.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One completed, profitable day of mining.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    /// Block reward in force on `date`
    pub block_reward: Decimal,
    /// Gross fiat value of the coins mined that day
    pub daily_fiat_earning: f64,
    pub daily_coin_earning: f64,
    pub daily_energy_cost: f64,
    /// `daily_fiat_earning - daily_energy_cost`
    pub daily_net_earning: f64,
    /// Running sum of `daily_net_earning`
    pub cumulative_fiat_earnings: f64,
    /// Running sum of `daily_coin_earning`
    pub cumulative_coin_earnings: f64,
    pub network_hashrate: f64,
    pub price: f64,
}

/// Why the run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// A day's net result was zero or negative
    Loss,
    /// The hardware reached the end of its lifespan
    LifespanReached,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub daily_ledger: Vec<DailyRecord>,
    pub break_even_date: Option<NaiveDate>,
    /// First loss day, or the lifespan end date
    pub terminal_date: NaiveDate,
    pub total_fiat_earnings: f64,
    pub total_coin_earnings: f64,
    pub can_break_even: bool,
    pub is_lifespan_reached: bool,
    pub stop_reason: StopReason,
    pub fleet_cost: f64,
    pub lifespan_end_date: NaiveDate,
}

impl SimulationResult {
    /// Number of ledger rows.
    pub fn days_simulated(&self) -> usize {
        self.daily_ledger.len()
    }

    /// Days from the first simulated day to the break-even date, inclusive of both.
    pub fn days_to_break_even(&self) -> Option<i64> {
        let first = self.daily_ledger.first()?;
        let break_even = self.break_even_date?;
        Some((break_even - first.date).num_days() + 1)
    }

    /// Net fiat earnings minus the fleet's capital cost.
    pub fn net_profit(&self) -> f64 {
        self.total_fiat_earnings - self.fleet_cost
    }

    pub fn total_energy_cost(&self) -> f64 {
        self.daily_ledger.iter().map(|r| r.daily_energy_cost).sum()
    }

    /// Ledger row for `date`, if that day was recorded.
    pub fn record_on(&self, date: NaiveDate) -> Option<&DailyRecord> {
        let first = self.daily_ledger.first()?;
        let offset = usize::try_from((date - first.date).num_days()).ok()?;
        self.daily_ledger.get(offset).filter(|r| r.date == date)
    }
}
