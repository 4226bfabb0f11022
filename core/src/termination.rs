//! Stop conditions, evaluated once per simulated day.
//!
//! Priority:
//!   1. Loss            net result ≤ 0 → stop, the day is not credited
//!   2. Lifespan        current date past the end of life → stop (checked
//!                      before the day is processed)
//!   3. Break-even      first day cumulative fiat ≥ fleet cost → record, keep going
//!   4. Continue        credit the day and move on
//!
//! Rule 2 can only fire at the top of an iteration, so the engine asks
//! [`TerminationPolicy::lifespan_exceeded`] first and
//! [`TerminationPolicy::judge_day`] after the step.

use chrono::NaiveDate;

use crate::engine::SimulationState;
use crate::ledger::StopReason;
use crate::step::StepOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayVerdict {
    Stop(StopReason),
    /// Credit the day; cumulative earnings cross the fleet cost for the first time.
    BreakEven,
    Continue,
}

/// Final flags for a stopped run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conclusion {
    pub reason: StopReason,
    pub terminal_date: NaiveDate,
    pub break_even_date: Option<NaiveDate>,
    pub can_break_even: bool,
    pub is_lifespan_reached: bool,
}

#[derive(Debug, Clone)]
pub struct TerminationPolicy {
    fleet_cost: f64,
    lifespan_end_date: NaiveDate,
}

impl TerminationPolicy {
    pub fn new(fleet_cost: f64, lifespan_end_date: NaiveDate) -> Self {
        Self {
            fleet_cost,
            lifespan_end_date,
        }
    }

    pub fn lifespan_exceeded(&self, state: &SimulationState) -> bool {
        state.current_date > self.lifespan_end_date
    }

    /// Judge today's step against the state accrued before today.
    pub fn judge_day(&self, state: &SimulationState, outcome: &StepOutcome) -> DayVerdict {
        match outcome {
            StepOutcome::Loss(_) => DayVerdict::Stop(StopReason::Loss),
            StepOutcome::Profit(day) => {
                let cumulative = state.cumulative_fiat_earnings + day.net;
                if state.break_even_date.is_none() && cumulative >= self.fleet_cost {
                    DayVerdict::BreakEven
                } else {
                    DayVerdict::Continue
                }
            }
        }
    }

    /// Resolve the result flags once the run has stopped.
    ///
    /// `last_processed` is the date of the final ledger row, if any.
    pub fn conclude(
        &self,
        reason: StopReason,
        state: &SimulationState,
        last_processed: Option<NaiveDate>,
    ) -> Conclusion {
        match reason {
            StopReason::Loss => Conclusion {
                reason,
                terminal_date: state.current_date,
                break_even_date: state.break_even_date,
                can_break_even: state.cumulative_fiat_earnings >= self.fleet_cost,
                is_lifespan_reached: false,
            },
            // A full life without a losing day counts as breaking even, on the
            // last day at the latest.
            StopReason::LifespanReached => Conclusion {
                reason,
                terminal_date: self.lifespan_end_date,
                break_even_date: state
                    .break_even_date
                    .or(last_processed)
                    .or(Some(self.lifespan_end_date)),
                can_break_even: true,
                is_lifespan_reached: true,
            },
        }
    }

    pub fn fleet_cost(&self) -> f64 {
        self.fleet_cost
    }

    pub fn lifespan_end_date(&self) -> NaiveDate {
        self.lifespan_end_date
    }
}
