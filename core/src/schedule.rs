//! Chromatic reward schedule, smooth monthly decay
//!
//! Anchor:        220 coins per second of network work on 2023-05-09
//! Epoch length:  30 days
//! Decay factor:  0.5^(1/12) per epoch (twelve epochs ≈ one halving)
//! Rounding:      8 decimal places after every step
//!
//!   reward(n) = round8(reward(n - 1) × 0.5^(1/12)),  reward(0) = 220
//!
//! Verification against published chromatic values:
//!   2023-07-08  195.99771799   (published 195.997718)
//!   2023-08-07  184.99721135   (published 184.9972114)
//!   2023-09-06  174.61411571   (published 174.6141157)
//!
//! Rounding after each step means the value after twelve epochs is
//! 109.99999999, not exactly 110.

use chrono::{Days, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Reward in force on the anchor date.
pub const ANCHOR_REWARD: Decimal = dec!(220);

/// First day of the anchor epoch.
pub const ANCHOR_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2023, 5, 9) {
    Some(date) => date,
    None => panic!("invalid anchor date"),
};

/// Length of one reward epoch.
pub const EPOCH_LENGTH_DAYS: u64 = 30;

/// 0.5^(1/12), truncated to 28 decimal places.
pub const DECAY_FACTOR: Decimal = dec!(0.9438743126816934966419131566);

/// Decimal places kept after each decay step.
pub const REWARD_DECIMALS: u32 = 8;

/// Seconds of network work credited per simulated day.
pub const SECONDS_PER_DAY: u32 = 86_400;

// ---------------------------------------------------------------------------
// Decay rule
// ---------------------------------------------------------------------------

/// Apply one epoch of decay to `reward`.
pub fn decay_step(reward: Decimal) -> Decimal {
    (reward * DECAY_FACTOR)
        .round_dp_with_strategy(REWARD_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardEpochState {
    /// Reward active for every day of the current epoch
    pub current_reward: Decimal,
    /// First day of the current epoch
    pub epoch_anchor_date: NaiveDate,
    /// First day of the next epoch (`epoch_anchor_date + 30 days`)
    pub next_epoch_boundary: NaiveDate,
}

/// Walks the reward schedule forward one epoch at a time.
///
/// The catch-up from the historical anchor to a simulation's starting date
/// and the per-day advancement inside the simulation loop both go through
/// [`advance_to`](Self::advance_to), so there is a single stepping rule.
#[derive(Debug, Clone)]
pub struct RewardScheduleTracker {
    state: RewardEpochState,
    epochs_elapsed: u32,
    advanced_to: Option<NaiveDate>,
}

impl RewardScheduleTracker {
    /// Tracker positioned at the chromatic anchor (220 on 2023-05-09).
    pub fn new() -> Self {
        Self::with_anchor(ANCHOR_REWARD, ANCHOR_DATE)
    }

    /// Tracker with a custom anchor. The first boundary is `anchor_date + 30 days`.
    ///
    /// An anchor within 30 days of `NaiveDate::MAX` has no representable
    /// boundary; such a tracker never decays.
    pub fn with_anchor(anchor_reward: Decimal, anchor_date: NaiveDate) -> Self {
        let next_epoch_boundary = anchor_date
            .checked_add_days(Days::new(EPOCH_LENGTH_DAYS))
            .unwrap_or(NaiveDate::MAX);

        Self {
            state: RewardEpochState {
                current_reward: anchor_reward,
                epoch_anchor_date: anchor_date,
                next_epoch_boundary,
            },
            epochs_elapsed: 0,
            advanced_to: None,
        }
    }

    /// Reward in force on `date`, from a fresh tracker.
    pub fn reward_on(date: NaiveDate) -> Result<Decimal, ScheduleError> {
        let mut tracker = Self::new();
        tracker.advance_to(date)?;
        tracker.current_reward_at(date)
    }

    /// Move forward until `next_epoch_boundary` is strictly after `target`,
    /// decaying once per boundary crossed.
    ///
    /// Targets earlier than a date already advanced to leave the state alone.
    pub fn advance_to(&mut self, target: NaiveDate) -> Result<(), ScheduleError> {
        while self.state.next_epoch_boundary <= target {
            let epoch_start = self.state.next_epoch_boundary;
            let next_boundary = epoch_start
                .checked_add_days(Days::new(EPOCH_LENGTH_DAYS))
                .ok_or(ScheduleError::CalendarOverflow { date: epoch_start })?;

            self.state.current_reward = decay_step(self.state.current_reward);
            self.state.epoch_anchor_date = epoch_start;
            self.state.next_epoch_boundary = next_boundary;
            self.epochs_elapsed += 1;

            log::trace!(
                "reward epoch {} starts {}: reward={}",
                self.epochs_elapsed,
                epoch_start,
                self.state.current_reward
            );
        }

        self.advanced_to = Some(match self.advanced_to {
            Some(previous) => previous.max(target),
            None => target,
        });
        Ok(())
    }

    /// Reward active on `date`.
    ///
    /// `date` must not be later than the last `advance_to` target and must
    /// fall inside the current epoch. Dates before the anchor are allowed
    /// while no decay step has been applied; the schedule is flat before it
    /// starts.
    pub fn current_reward_at(&self, date: NaiveDate) -> Result<Decimal, ScheduleError> {
        match self.advanced_to {
            Some(advanced) if date <= advanced => {}
            _ => return Err(ScheduleError::NotAdvanced { date }),
        }

        if self.epochs_elapsed > 0 && date < self.state.epoch_anchor_date {
            return Err(ScheduleError::OutsideEpoch {
                date,
                epoch_start: self.state.epoch_anchor_date,
                epoch_end: self.state.next_epoch_boundary,
            });
        }

        Ok(self.state.current_reward)
    }

    /// Number of decay steps applied since the anchor.
    pub fn epochs_elapsed(&self) -> u32 {
        self.epochs_elapsed
    }

    pub fn state(&self) -> &RewardEpochState {
        &self.state
    }
}

impl Default for RewardScheduleTracker {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
