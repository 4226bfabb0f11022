//! Simulation engine: drives the daily loop from the starting date until
//! a loss day or the end of the hardware's life.
//!
//! ```text
//!   Running ──net ≤ 0──────────────▶ LossStopped
//!      │
//!      └──date > lifespan end──────▶ LifespanStopped
//! ```
//!
//! The loop is bounded by the lifespan check: at most
//! `lifespan_years × 366 + 1` iterations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ParameterError, Result, SimulationError};
use crate::ledger::{DailyRecord, SimulationResult, StopReason};
use crate::params::SimulationParameters;
use crate::schedule::RewardScheduleTracker;
use crate::step::{DailySimulationStep, DayEarnings};
use crate::termination::{DayVerdict, TerminationPolicy};

/// Mutable state of one run. Created at start, dropped when the result is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub current_date: NaiveDate,
    pub network_hashrate: f64,
    pub price: f64,
    pub cumulative_fiat_earnings: f64,
    pub cumulative_coin_earnings: f64,
    pub break_even_date: Option<NaiveDate>,
    pub lifespan_end_date: NaiveDate,
}

impl SimulationState {
    pub fn initial(params: &SimulationParameters, lifespan_end_date: NaiveDate) -> Self {
        Self {
            current_date: params.starting_date,
            network_hashrate: params.starting_network_hashrate,
            price: params.starting_price,
            cumulative_fiat_earnings: 0.0,
            cumulative_coin_earnings: 0.0,
            break_even_date: None,
            lifespan_end_date,
        }
    }

    /// Accrue a profitable day and build its ledger row.
    fn credit(&mut self, day: &DayEarnings) -> DailyRecord {
        self.cumulative_fiat_earnings += day.net;
        self.cumulative_coin_earnings += day.coin_earning;

        DailyRecord {
            date: day.date,
            block_reward: day.block_reward,
            daily_fiat_earning: day.fiat_earning,
            daily_coin_earning: day.coin_earning,
            daily_energy_cost: day.energy_cost,
            daily_net_earning: day.net,
            cumulative_fiat_earnings: self.cumulative_fiat_earnings,
            cumulative_coin_earnings: self.cumulative_coin_earnings,
            network_hashrate: self.network_hashrate,
            price: self.price,
        }
    }

    /// Apply the daily growth deltas and move to the next date.
    fn advance_day(&mut self, params: &SimulationParameters) -> Result<()> {
        self.network_hashrate += params.hashrate_growth_per_day;
        self.price += params.price_growth_per_day;
        self.current_date = self
            .current_date
            .succ_opt()
            .ok_or(SimulationError::DateOverflow {
                date: self.current_date,
            })?;
        Ok(())
    }
}

/// One parameterized engine for single units, fleets and any lifespan.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    params: SimulationParameters,
    step: DailySimulationStep,
    policy: TerminationPolicy,
}

impl SimulationEngine {
    /// Validate `params` and prepare a run. Malformed input fails here,
    /// never inside the loop.
    pub fn new(params: SimulationParameters) -> Result<Self> {
        params.validate()?;
        let lifespan_end_date =
            params
                .lifespan_end_date()
                .ok_or(ParameterError::LifespanOutOfRange {
                    start: params.starting_date,
                    years: params.lifespan_years,
                })?;

        Ok(Self {
            step: DailySimulationStep::new(&params),
            policy: TerminationPolicy::new(params.fleet_cost(), lifespan_end_date),
            params,
        })
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    /// Run the simulation to completion. Pure: the same engine always
    /// produces the same result.
    pub fn run(&self) -> Result<SimulationResult> {
        let params = &self.params;
        let lifespan_end_date = self.policy.lifespan_end_date();

        // Catch up on every epoch elapsed before mining starts.
        let mut tracker = RewardScheduleTracker::new();
        tracker.advance_to(params.starting_date)?;

        log::info!(
            "simulating {} unit(s) from {} to {} (fleet cost {:.2}, reward {})",
            params.units_count,
            params.starting_date,
            lifespan_end_date,
            self.policy.fleet_cost(),
            tracker.current_reward_at(params.starting_date)?
        );

        let mut state = SimulationState::initial(params, lifespan_end_date);
        let expected_days = (lifespan_end_date - params.starting_date).num_days() + 1;
        let mut ledger = Vec::with_capacity(usize::try_from(expected_days).unwrap_or(0));

        loop {
            if self.policy.lifespan_exceeded(&state) {
                return Ok(self.finish(StopReason::LifespanReached, state, ledger));
            }

            let outcome = self.step.evaluate(&mut tracker, &state)?;
            let verdict = self.policy.judge_day(&state, &outcome);

            let day = outcome.into_earnings();

            if let DayVerdict::Stop(reason) = verdict {
                log::debug!(
                    "{}: net {:.4} (fiat {:.4}, energy {:.4}), stopping",
                    day.date,
                    day.net,
                    day.fiat_earning,
                    day.energy_cost
                );
                return Ok(self.finish(reason, state, ledger));
            }

            let record = state.credit(&day);
            if verdict == DayVerdict::BreakEven {
                log::debug!(
                    "break-even on {} after {} day(s), cumulative {:.2}",
                    day.date,
                    ledger.len() + 1,
                    state.cumulative_fiat_earnings
                );
                state.break_even_date = Some(day.date);
            }

            log::trace!(
                "{} reward={} coins={:.4} net={:.4} total={:.2} network={:.2} price={}",
                record.date,
                record.block_reward,
                record.daily_coin_earning,
                record.daily_net_earning,
                record.cumulative_fiat_earnings,
                record.network_hashrate,
                record.price
            );
            ledger.push(record);
            state.advance_day(params)?;
        }
    }

    fn finish(
        &self,
        reason: StopReason,
        state: SimulationState,
        daily_ledger: Vec<DailyRecord>,
    ) -> SimulationResult {
        let conclusion =
            self.policy
                .conclude(reason, &state, daily_ledger.last().map(|r| r.date));

        match reason {
            StopReason::Loss => log::info!(
                "mining turns unprofitable on {} after {} day(s); cumulative {:.2} of {:.2}",
                conclusion.terminal_date,
                daily_ledger.len(),
                state.cumulative_fiat_earnings,
                self.policy.fleet_cost()
            ),
            StopReason::LifespanReached => log::info!(
                "hardware retired on {} after {} day(s); cumulative {:.2} of {:.2}",
                conclusion.terminal_date,
                daily_ledger.len(),
                state.cumulative_fiat_earnings,
                self.policy.fleet_cost()
            ),
        }

        SimulationResult {
            daily_ledger,
            break_even_date: conclusion.break_even_date,
            terminal_date: conclusion.terminal_date,
            total_fiat_earnings: state.cumulative_fiat_earnings,
            total_coin_earnings: state.cumulative_coin_earnings,
            can_break_even: conclusion.can_break_even,
            is_lifespan_reached: conclusion.is_lifespan_reached,
            stop_reason: conclusion.reason,
            fleet_cost: self.policy.fleet_cost(),
            lifespan_end_date: state.lifespan_end_date,
        }
    }
}
