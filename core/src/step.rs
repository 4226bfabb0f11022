//! One simulated day: reward lookup, coin and fiat earnings, energy bill.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::engine::SimulationState;
use crate::error::ScheduleError;
use crate::params::SimulationParameters;
use crate::schedule::{RewardScheduleTracker, SECONDS_PER_DAY};

/// Earnings and costs for a single day, before anything is accrued.
#[derive(Debug, Clone, PartialEq)]
pub struct DayEarnings {
    pub date: NaiveDate,
    pub block_reward: Decimal,
    pub coin_earning: f64,
    pub fiat_earning: f64,
    pub energy_cost: f64,
    pub net: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Net result was positive; the day can be credited.
    Profit(DayEarnings),
    /// Net result was zero, negative or not a number; mining stops here.
    Loss(DayEarnings),
}

impl StepOutcome {
    pub fn into_earnings(self) -> DayEarnings {
        match self {
            StepOutcome::Profit(day) | StepOutcome::Loss(day) => day,
        }
    }
}

/// Per-run constants plus the daily earnings formula.
#[derive(Debug, Clone)]
pub struct DailySimulationStep {
    fleet_hashrate: f64,
    daily_energy_cost: f64,
}

impl DailySimulationStep {
    pub fn new(params: &SimulationParameters) -> Self {
        Self {
            fleet_hashrate: params.fleet_hashrate(),
            daily_energy_cost: params.daily_energy_cost(),
        }
    }

    /// Evaluate `state.current_date`. Only the tracker is mutated.
    pub fn evaluate(
        &self,
        tracker: &mut RewardScheduleTracker,
        state: &SimulationState,
    ) -> Result<StepOutcome, ScheduleError> {
        let date = state.current_date;
        tracker.advance_to(date)?;
        let block_reward = tracker.current_reward_at(date)?;
        let reward = block_reward.to_f64().unwrap_or(0.0);

        // A network driven to zero by negative growth pays nothing.
        let coin_earning = if state.network_hashrate > 0.0 {
            reward * f64::from(SECONDS_PER_DAY) * self.fleet_hashrate / state.network_hashrate
        } else {
            0.0
        };
        let fiat_earning = state.price * coin_earning;
        let net = fiat_earning - self.daily_energy_cost;

        let earnings = DayEarnings {
            date,
            block_reward,
            coin_earning,
            fiat_earning,
            energy_cost: self.daily_energy_cost,
            net,
        };

        if net > 0.0 {
            Ok(StepOutcome::Profit(earnings))
        } else {
            Ok(StepOutcome::Loss(earnings))
        }
    }

    pub fn fleet_hashrate(&self) -> f64 {
        self.fleet_hashrate
    }

    pub fn daily_energy_cost(&self) -> f64 {
        self.daily_energy_cost
    }
}
