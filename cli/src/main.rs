mod config;
mod report;

use anyhow::Context;
use breakeven_core::{simulate, HashrateUnit};
use chrono::NaiveDate;
use clap::Parser;
use colored::*;
use log::info;
use std::path::PathBuf;

use config::ScenarioConfig;

#[derive(Parser, Debug)]
#[command(
    name = "mining-breakeven",
    version,
    about = "Mining break-even calculator - when does the hardware pay for itself?",
    long_about = None
)]
struct Cli {
    /// Scenario file (.toml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the default scenario to this path and exit
    #[arg(long, value_name = "PATH")]
    init: Option<PathBuf>,

    /// Price of one mining unit (fiat)
    #[arg(long)]
    unit_cost: Option<f64>,

    /// Number of identical units
    #[arg(short, long)]
    units: Option<u32>,

    /// Hashrate of one unit
    #[arg(long)]
    unit_hashrate: Option<f64>,

    /// Unit of --unit-hashrate (H, kH, MH, GH, TH, PH, EH)
    #[arg(long)]
    unit_hashrate_unit: Option<HashrateUnit>,

    /// Power draw of one unit at the wall (watts)
    #[arg(long)]
    watts: Option<f64>,

    /// Electricity price per kWh
    #[arg(long)]
    energy_cost: Option<f64>,

    /// Network hashrate on the starting date
    #[arg(long)]
    network_hashrate: Option<f64>,

    /// Unit of the network hashrate figures
    #[arg(long)]
    network_hashrate_unit: Option<HashrateUnit>,

    /// Hashrate added to the network per day (may be negative)
    #[arg(long, allow_hyphen_values = true)]
    hashrate_growth: Option<f64>,

    /// Coin price on the starting date
    #[arg(short, long)]
    price: Option<f64>,

    /// Daily change to the coin price (may be negative)
    #[arg(long, allow_hyphen_values = true)]
    price_growth: Option<f64>,

    /// First mining day, YYYY-MM-DD (default: today)
    #[arg(short, long)]
    start: Option<NaiveDate>,

    /// Hardware lifespan in years
    #[arg(short, long)]
    lifespan: Option<u32>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Skip the per-day table
    #[arg(long)]
    summary_only: bool,

    /// Print every n-th day of the table
    #[arg(long, value_name = "N")]
    every: Option<usize>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Quiet mode (minimal output)
    #[arg(short, long)]
    quiet: bool,

    /// Debug logging
    #[arg(long)]
    debug: bool,
}

impl Cli {
    /// Flags take precedence over the scenario file and the environment
    fn apply_to(&self, config: &mut ScenarioConfig) {
        let fleet = &mut config.fleet;
        if let Some(v) = self.unit_cost { fleet.unit_cost = v; }
        if let Some(v) = self.units { fleet.units_count = v; }
        if let Some(v) = self.unit_hashrate { fleet.unit_hashrate = v; }
        if let Some(v) = self.unit_hashrate_unit { fleet.unit_hashrate_unit = v; }
        if let Some(v) = self.watts { fleet.unit_power_watts = v; }
        if let Some(v) = self.energy_cost { fleet.energy_cost_per_kwh = v; }
        if let Some(v) = self.lifespan { fleet.lifespan_years = v; }

        let network = &mut config.network;
        if let Some(v) = self.network_hashrate { network.starting_hashrate = v; }
        if let Some(v) = self.network_hashrate_unit { network.hashrate_unit = v; }
        if let Some(v) = self.hashrate_growth { network.growth_per_day = v; }

        let market = &mut config.market;
        if let Some(v) = self.price { market.starting_price = v; }
        if let Some(v) = self.price_growth { market.price_growth_per_day = v; }
        if self.start.is_some() { market.starting_date = self.start; }

        let output = &mut config.output;
        if let Some(v) = self.every { output.every = v; }
        output.json |= self.json;
        output.summary_only |= self.summary_only;
        output.no_color |= self.no_color;
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.debug {
        log::LevelFilter::Debug
    } else if cli.quiet {
        log::LevelFilter::Warn
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    if let Some(path) = &cli.init {
        ScenarioConfig::default().save(path)?;
        println!("{} {}", "Wrote default scenario to".bright_green(), path.display());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading scenario from {}", path.display());
            ScenarioConfig::from_file(path)?
        }
        None => ScenarioConfig::default(),
    };
    config.apply_env()?;
    cli.apply_to(&mut config);

    // Disable colors if requested
    if config.output.no_color {
        colored::control::set_override(false);
    }

    let today = chrono::Local::now().date_naive();
    config.validate(today)?;
    let params = config.to_params(today);

    let result = simulate(params.clone()).context("Simulation failed")?;

    if config.output.json {
        println!("{}", report::to_json(&result).context("Failed to serialize result")?);
        return Ok(());
    }

    if !cli.quiet {
        print_banner(&config);
    }
    report::print_summary(&result);

    if !config.output.summary_only && !cli.quiet {
        println!();
        report::print_table(&result, config.output.every, params.network_hashrate_unit);
    }

    Ok(())
}

fn print_banner(config: &ScenarioConfig) {
    let fleet = &config.fleet;
    let network = &config.network;
    let market = &config.market;

    println!();
    println!("{} {}", " * ".bright_green().bold(), "SCENARIO".bright_white().bold());
    println!("{}  {:<12} {} × {} {} @ {} W, {}",
        "   ".bright_black(),
        "fleet".bright_black(),
        fleet.units_count.to_string().bright_magenta().bold(),
        fleet.unit_hashrate.to_string().bright_cyan(),
        fleet.unit_hashrate_unit,
        fleet.unit_power_watts,
        report::fmt_fiat(fleet.unit_cost).bright_white(),
    );
    println!("{}  {:<12} {} {} {:+} per day",
        "   ".bright_black(),
        "network".bright_black(),
        network.starting_hashrate.to_string().bright_cyan(),
        network.hashrate_unit,
        network.growth_per_day,
    );
    println!("{}  {:<12} ${} {:+} per day, energy {}/kWh",
        "   ".bright_black(),
        "market".bright_black(),
        market.starting_price.to_string().bright_white(),
        market.price_growth_per_day,
        report::fmt_fiat(fleet.energy_cost_per_kwh),
    );
    println!("{}  {:<12} {} years",
        "   ".bright_black(),
        "lifespan".bright_black(),
        fleet.lifespan_years.to_string().bright_white(),
    );
}
