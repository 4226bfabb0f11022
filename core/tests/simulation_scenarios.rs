/// Simulation scenario tests
///
/// Validates:
/// 1. Reference scenarios (profitable rig, immediate loss, rising price)
/// 2. Ledger invariants: consecutive dates, cumulative sums, break-even monotonicity
/// 3. Determinism and bounded termination
/// 4. Fleet and lifespan parameterization of the single engine

use breakeven_core::{
    simulate, HashrateUnit, SimulationEngine, SimulationError, SimulationParameters,
    SimulationResult, StopReason,
};
use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 200 GH/s, 100 W unit costing 750 against a 5000 TH/s network growing
/// 100 TH/s per day, coin at 0.05, five-year lifespan from 2023-08-15.
fn rig() -> SimulationParameters {
    SimulationParameters {
        unit_cost: 750.0,
        units_count: 1,
        unit_hashrate: 200.0,
        unit_hashrate_unit: HashrateUnit::GigaHash,
        unit_power_watts: 100.0,
        energy_cost_per_kwh: 0.1,
        hashrate_growth_per_day: 100.0,
        starting_network_hashrate: 5000.0,
        network_hashrate_unit: HashrateUnit::TeraHash,
        starting_date: date(2023, 8, 15),
        starting_price: 0.05,
        price_growth_per_day: 0.0,
        lifespan_years: 5,
    }
}

fn assert_ledger_invariants(result: &SimulationResult) {
    for pair in result.daily_ledger.windows(2) {
        assert_eq!(pair[0].date.succ_opt().unwrap(), pair[1].date);
    }

    let mut fiat = 0.0;
    let mut coin = 0.0;
    for record in &result.daily_ledger {
        fiat += record.daily_fiat_earning - record.daily_energy_cost;
        coin += record.daily_coin_earning;
        assert_eq!(record.cumulative_fiat_earnings, fiat);
        assert_eq!(record.cumulative_coin_earnings, coin);
        assert!(record.daily_net_earning > 0.0);
    }

    if let Some(last) = result.daily_ledger.last() {
        assert_eq!(result.total_fiat_earnings, last.cumulative_fiat_earnings);
        assert_eq!(result.total_coin_earnings, last.cumulative_coin_earnings);
    }
}

// =========================================================================
// 1. Reference scenarios
// =========================================================================

#[test]
fn test_profitable_rig_breaks_even_in_first_year() {
    let result = simulate(rig()).unwrap();

    assert!(result.can_break_even);
    assert!(!result.daily_ledger.is_empty());

    let break_even = result.break_even_date.expect("break-even date");
    assert!(break_even >= date(2023, 8, 15));
    assert!(break_even < date(2024, 8, 15));

    for pair in result.daily_ledger.windows(2) {
        assert!(pair[1].cumulative_coin_earnings > pair[0].cumulative_coin_earnings);
    }
    assert_ledger_invariants(&result);
}

#[test]
fn test_profitable_rig_eventually_turns_unprofitable() {
    // network growth outpaces the reward long before five years are up
    let result = simulate(rig()).unwrap();

    assert_eq!(result.stop_reason, StopReason::Loss);
    assert!(!result.is_lifespan_reached);
    assert!(result.terminal_date < result.lifespan_end_date);
    assert_eq!(
        result.daily_ledger.last().unwrap().date.succ_opt().unwrap(),
        result.terminal_date
    );
    assert!(result.net_profit() > 0.0);
}

#[test]
fn test_worthless_coin_loses_on_first_day() {
    let mut params = rig();
    params.starting_price = 0.0001;

    let result = simulate(params).unwrap();
    assert!(!result.can_break_even);
    assert_eq!(result.terminal_date, date(2023, 8, 15));
    assert_eq!(result.break_even_date, None);
    assert!(result.daily_ledger.is_empty());
    assert_eq!(result.days_to_break_even(), None);
}

#[test]
fn test_rising_price_breaks_even_sooner() {
    let flat = simulate(rig()).unwrap();

    let mut params = rig();
    params.price_growth_per_day = 0.01;
    let rising = simulate(params).unwrap();

    assert!(rising.break_even_date.unwrap() < flat.break_even_date.unwrap());
    assert!(rising.days_to_break_even().unwrap() < flat.days_to_break_even().unwrap());
    assert_ledger_invariants(&rising);
}

// =========================================================================
// 2. Ledger invariants
// =========================================================================

#[test]
fn test_break_even_is_monotonic() {
    let result = simulate(rig()).unwrap();
    let break_even = result.break_even_date.unwrap();

    for record in result.daily_ledger.iter().filter(|r| r.date >= break_even) {
        assert!(record.cumulative_fiat_earnings >= result.fleet_cost);
    }
    for record in result.daily_ledger.iter().filter(|r| r.date < break_even) {
        assert!(record.cumulative_fiat_earnings < result.fleet_cost);
    }
}

#[test]
fn test_record_lookup_by_date() {
    let result = simulate(rig()).unwrap();
    let record = result.record_on(date(2023, 9, 1)).unwrap();
    assert_eq!(record.date, date(2023, 9, 1));
    assert!(result.record_on(date(2023, 8, 1)).is_none());
}

#[test]
fn test_reward_in_ledger_follows_schedule() {
    let result = simulate(rig()).unwrap();
    let before = result.record_on(date(2023, 9, 5)).unwrap();
    let after = result.record_on(date(2023, 9, 6)).unwrap();
    assert!(after.block_reward < before.block_reward);
    assert_eq!(before.block_reward.to_string(), "184.99721135");
    assert_eq!(after.block_reward.to_string(), "174.61411571");
}

// =========================================================================
// 3. Determinism and termination
// =========================================================================

#[test]
fn test_identical_parameters_give_identical_results() {
    let mut params = rig();
    params.price_growth_per_day = -0.0001;
    assert_eq!(simulate(params.clone()).unwrap(), simulate(params).unwrap());
}

#[test]
fn test_runs_are_bounded_by_lifespan() {
    let mut params = rig();
    params.unit_power_watts = 0.0;
    params.hashrate_growth_per_day = 0.0;

    for years in [1, 2, 4, 10] {
        params.lifespan_years = years;
        let result = simulate(params.clone()).unwrap();
        assert_eq!(result.stop_reason, StopReason::LifespanReached);
        assert!(result.days_simulated() <= years as usize * 366 + 1);
        assert_eq!(
            result.daily_ledger.last().unwrap().date,
            result.lifespan_end_date
        );
    }
}

#[test]
fn test_collapsing_network_ends_in_loss() {
    let mut params = rig();
    params.unit_power_watts = 0.0;
    params.hashrate_growth_per_day = -500.0;

    let result = simulate(params).unwrap();
    assert_eq!(result.stop_reason, StopReason::Loss);
    // 5000 TH/s shrinking by 500 a day reaches zero on day 11
    assert_eq!(result.terminal_date, date(2023, 8, 25));
    assert_ledger_invariants(&result);
}

// =========================================================================
// 4. Parameterization
// =========================================================================

#[test]
fn test_fleet_of_identical_units_breaks_even_on_same_day() {
    let single = simulate(rig()).unwrap();

    let mut params = rig();
    params.units_count = 10;
    let fleet = simulate(params).unwrap();

    assert_eq!(fleet.fleet_cost, 7500.0);
    let single_day = single.break_even_date.unwrap();
    let fleet_day = fleet.break_even_date.unwrap();
    assert!((fleet_day - single_day).num_days().abs() <= 1);
}

#[test]
fn test_lifespan_without_payback_reports_break_even() {
    let mut params = rig();
    params.unit_cost = 1_000_000.0;
    params.unit_power_watts = 0.0;
    params.lifespan_years = 1;

    let result = simulate(params).unwrap();
    assert!(result.is_lifespan_reached);
    assert!(result.can_break_even);
    assert_eq!(result.break_even_date, Some(date(2024, 8, 15)));
    assert_eq!(result.terminal_date, date(2024, 8, 15));
    assert!(result.total_fiat_earnings < result.fleet_cost);
}

#[test]
fn test_units_are_converted_to_network_unit() {
    let ghs = simulate(rig()).unwrap();

    let mut params = rig();
    params.unit_hashrate = 0.2;
    params.unit_hashrate_unit = HashrateUnit::TeraHash;
    let ths = simulate(params).unwrap();

    assert_eq!(ghs.break_even_date, ths.break_even_date);
    assert_eq!(ghs.terminal_date, ths.terminal_date);
}

#[test]
fn test_invalid_parameters_are_rejected() {
    let mut params = rig();
    params.starting_network_hashrate = 0.0;
    assert!(matches!(
        SimulationEngine::new(params),
        Err(SimulationError::InvalidParameter(_))
    ));

    let mut params = rig();
    params.starting_price = f64::NAN;
    assert!(matches!(
        simulate(params),
        Err(SimulationError::InvalidParameter(_))
    ));
}

#[test]
fn test_result_serializes_to_json() {
    let result = simulate(rig()).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["can_break_even"], serde_json::json!(true));
    assert_eq!(json["stop_reason"], serde_json::json!("loss"));
    assert_eq!(json["break_even_date"], serde_json::json!("2023-09-14"));
}
