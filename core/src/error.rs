//! Error taxonomy for the break-even core.
//!
//! A loss day is not an error: it is a normal outcome reported through
//! `SimulationResult::can_break_even`. Only malformed input and broken
//! schedule preconditions surface here.

use chrono::NaiveDate;
use thiserror::Error;

/// Rejected input, detected before the simulation loop starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("{field} must be a finite number (got {value})")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be at least 1 (got {value})")]
    BelowOne { field: &'static str, value: u32 },

    #[error("lifespan of {years} years exceeds the supported maximum of {max}")]
    LifespanTooLong { years: u32, max: u32 },

    #[error("lifespan end date overflows the calendar (start {start}, {years} years)")]
    LifespanOutOfRange { start: NaiveDate, years: u32 },
}

/// Reward schedule queried outside its contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("reward schedule queried for {date} before it was advanced")]
    NotAdvanced { date: NaiveDate },

    #[error("reward schedule queried for {date} outside the current epoch [{epoch_start}, {epoch_end})")]
    OutsideEpoch {
        date: NaiveDate,
        epoch_start: NaiveDate,
        epoch_end: NaiveDate,
    },

    #[error("reward schedule cannot advance past {date}: calendar overflow")]
    CalendarOverflow { date: NaiveDate },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("invalid simulation parameter: {0}")]
    InvalidParameter(#[from] ParameterError),

    #[error("reward schedule precondition violated: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("simulation date overflowed the calendar after {date}")]
    DateOverflow { date: NaiveDate },
}

pub type Result<T, E = SimulationError> = std::result::Result<T, E>;
