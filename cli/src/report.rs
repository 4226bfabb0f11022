//! Terminal report for a finished simulation: headline, key figures and the
//! per-day ledger table.

use breakeven_core::{DailyRecord, HashrateUnit, SimulationResult, StopReason};
use colored::*;

// ──── Formatting helpers ────

/// Express `value` (in `unit`) one unit larger, as the ledger table shows it.
/// The largest unit is kept as is.
pub fn fmt_hashrate(value: f64, unit: HashrateUnit) -> String {
    match unit.larger() {
        Some(larger) => format!("{:.2} {}", value * unit.factor_to(larger), larger),
        None => format!("{:.2} {}", value, unit),
    }
}

pub fn fmt_fiat(value: f64) -> String {
    format!("${:.2}", value)
}

pub fn fmt_coin(value: f64) -> String {
    format!("{:.2} coin", value)
}

fn fmt_days(days: Option<i64>) -> String {
    match days {
        Some(1) => "1 day".to_string(),
        Some(n) => format!("{} days", n),
        None => "—".to_string(),
    }
}

// ──── Summary ────

/// One-line verdict, as shown above the table.
pub fn headline(result: &SimulationResult) -> String {
    match (result.can_break_even, result.break_even_date) {
        (true, Some(date)) => format!("You will break even on {}", date),
        _ => format!(
            "You cannot break even and will be in the negative starting {}",
            result.terminal_date
        ),
    }
}

/// Extra line when the run ended at end of life rather than on a losing day.
pub fn lifespan_note(result: &SimulationResult) -> Option<String> {
    if !result.is_lifespan_reached {
        return None;
    }

    let mut note = format!(
        "Hardware reaches the end of its life on {}",
        result.terminal_date
    );
    if result.total_fiat_earnings < result.fleet_cost {
        note.push_str(&format!(
            " having recovered {} of {}",
            fmt_fiat(result.total_fiat_earnings),
            fmt_fiat(result.fleet_cost)
        ));
    }
    Some(note)
}

pub fn print_summary(result: &SimulationResult) {
    println!();
    let line = headline(result);
    if result.can_break_even {
        println!(" {}", line.bright_green().bold());
    } else {
        println!(" {}", line.bright_red().bold());
    }
    if let Some(note) = lifespan_note(result) {
        println!(" {}", note.bright_yellow());
    }
    println!();

    let stop = match result.stop_reason {
        StopReason::Loss => "unprofitable",
        StopReason::LifespanReached => "end of life",
    };
    let profit = fmt_fiat(result.net_profit());
    let profit = if result.net_profit() >= 0.0 {
        profit.bright_green()
    } else {
        profit.bright_red()
    };

    let bar = "─".repeat(64);
    println!("{}", format!("┌{}┐", bar).bright_black());
    println!("{}  {}    fleet cost: {}  net: {}",
        "│".bright_black(),
        "COST".bright_white().bold(),
        fmt_fiat(result.fleet_cost).bright_white(),
        profit,
    );
    println!("{}  {}  fiat: {}  coin: {}  energy: {}",
        "│".bright_black(),
        "EARNED".bright_white().bold(),
        fmt_fiat(result.total_fiat_earnings).bright_cyan().bold(),
        fmt_coin(result.total_coin_earnings).bright_cyan(),
        fmt_fiat(result.total_energy_cost()).bright_yellow(),
    );
    println!("{}  {}    payback: {}  mined: {}  stop: {} ({})",
        "│".bright_black(),
        "DAYS".bright_white().bold(),
        fmt_days(result.days_to_break_even()).bright_magenta().bold(),
        fmt_days(Some(result.days_simulated() as i64)).bright_white(),
        result.terminal_date.to_string().bright_white(),
        stop.bright_black(),
    );
    println!("{}", format!("└{}┘", bar).bright_black());
}

// ──── Ledger table ────

/// Indices of the rows to print: every `every`-th day, plus the break-even
/// day and the final day.
pub fn selected_rows(result: &SimulationResult, every: usize) -> Vec<usize> {
    let every = every.max(1);
    let last = result.daily_ledger.len().saturating_sub(1);

    result
        .daily_ledger
        .iter()
        .enumerate()
        .filter(|(i, record)| {
            i % every == 0 || *i == last || Some(record.date) == result.break_even_date
        })
        .map(|(i, _)| i)
        .collect()
}

const HEADER: [&str; 6] = [
    "Date",
    "Daily Yield (fiat)",
    "Daily Yield (coin)",
    "Total Yield (fiat)",
    "Total Yield (coin)",
    "Network Hashrate",
];

pub fn table_row(record: &DailyRecord, network_unit: HashrateUnit) -> String {
    format!(
        "{:<12}{:>20}{:>20}{:>20}{:>20}{:>20}",
        record.date.to_string(),
        fmt_fiat(record.daily_net_earning),
        fmt_coin(record.daily_coin_earning),
        fmt_fiat(record.cumulative_fiat_earnings),
        fmt_coin(record.cumulative_coin_earnings),
        fmt_hashrate(record.network_hashrate, network_unit),
    )
}

pub fn print_table(result: &SimulationResult, every: usize, network_unit: HashrateUnit) {
    if result.daily_ledger.is_empty() {
        println!(" {}", "No profitable days to show.".bright_black());
        return;
    }

    let header = format!(
        "{:<12}{:>20}{:>20}{:>20}{:>20}{:>20}",
        HEADER[0], HEADER[1], HEADER[2], HEADER[3], HEADER[4], HEADER[5]
    );
    println!("{}", header.bright_white().bold());
    println!("{}", "─".repeat(header.chars().count()).bright_black());

    for i in selected_rows(result, every) {
        let record = &result.daily_ledger[i];
        let line = table_row(record, network_unit);
        if Some(record.date) == result.break_even_date {
            println!("{}", line.bright_green().bold());
        } else {
            println!("{}", line);
        }
    }
}

/// JSON export: the full result, ledger included.
pub fn to_json(result: &SimulationResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}
