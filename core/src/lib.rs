//! Mining break-even projection.
//!
//! Simulates a mining fleet day by day against a network whose block reward
//! decays every 30 days, and reports when (and whether) the fleet pays for
//! itself before it turns unprofitable or reaches the end of its life.
//!
//! ```no_run
//! use breakeven_core::{simulate, SimulationParameters};
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2023, 8, 15).unwrap();
//! let result = simulate(SimulationParameters::new(start))?;
//! if let Some(date) = result.break_even_date {
//!     println!("break-even on {date}");
//! }
//! # Ok::<(), breakeven_core::SimulationError>(())
//! ```

pub mod engine;
pub mod error;
pub mod ledger;
pub mod params;
pub mod schedule;
pub mod step;
pub mod termination;

pub use engine::{SimulationEngine, SimulationState};
pub use error::{ParameterError, ScheduleError, SimulationError};
pub use ledger::{DailyRecord, SimulationResult, StopReason};
pub use params::{HashrateUnit, SimulationParameters};
pub use schedule::{RewardEpochState, RewardScheduleTracker};

/// Validate `params` and run one simulation.
pub fn simulate(params: SimulationParameters) -> Result<SimulationResult, SimulationError> {
    SimulationEngine::new(params)?.run()
}
