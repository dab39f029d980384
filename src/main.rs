//! IRR Calculator CLI
//!
//! Computes the IRR of an initial investment plus periodic cash flows and
//! prints the cash-flow timeline and, optionally, the NPV curve.

use anyhow::{Context, Result};
use clap::Parser;
use irr_calculator::cashflow::{load_series, DEFAULT_CASH_FLOWS, DEFAULT_INITIAL_INVESTMENT};
use irr_calculator::{CalculatorConfig, CashFlowSeries, IrrCalculator, IrrReport};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(
    name = "irr-calc",
    version,
    about = "Internal Rate of Return calculator",
    long_about = "Computes the Internal Rate of Return of an initial investment followed by \
                  yearly cash flows using Newton-Raphson, and samples NPV across a range of \
                  discount rates."
)]
struct Cli {
    /// Initial investment at period 0 (enter as a negative number)
    #[arg(long, allow_hyphen_values = true)]
    initial: Option<f64>,

    /// Cash flows for periods 1..N (comma-separated, e.g. "25000,30000,-5000")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    flows: Option<Vec<f64>>,

    /// Read cash flows from a CSV (Period,CashFlow) or JSON file instead
    #[arg(long, conflicts_with_all = ["initial", "flows"])]
    input: Option<PathBuf>,

    /// JSON configuration file for solver and curve settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Starting rate for Newton-Raphson
    #[arg(long, allow_hyphen_values = true)]
    guess: Option<f64>,

    /// Iteration cap
    #[arg(long)]
    max_iterations: Option<u32>,

    /// Convergence tolerance on successive rates
    #[arg(long)]
    tolerance: Option<f64>,

    /// Lowest discount rate on the NPV curve
    #[arg(long, allow_hyphen_values = true)]
    rate_min: Option<f64>,

    /// Highest discount rate on the NPV curve
    #[arg(long, allow_hyphen_values = true)]
    rate_max: Option<f64>,

    /// Spacing between NPV curve samples
    #[arg(long)]
    rate_step: Option<f64>,

    /// Print the NPV curve table
    #[arg(long)]
    curve: bool,

    /// Emit the full report as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn build_config(&self) -> Result<CalculatorConfig> {
        let base = match &self.config {
            Some(path) => CalculatorConfig::from_json_path(path)
                .with_context(|| format!("failed to read config {}", path.display()))?,
            None => CalculatorConfig::default(),
        };

        let mut config = base.with_env_overrides();
        if let Some(guess) = self.guess {
            config.solver.initial_guess = guess;
        }
        if let Some(max_iterations) = self.max_iterations {
            config.solver.max_iterations = max_iterations;
        }
        if let Some(tolerance) = self.tolerance {
            config.solver.tolerance = tolerance;
        }
        if let Some(min) = self.rate_min {
            config.curve.min = min;
        }
        if let Some(max) = self.rate_max {
            config.curve.max = max;
        }
        if let Some(step) = self.rate_step {
            config.curve.step = step;
        }
        Ok(config)
    }

    fn build_series(&self) -> Result<CashFlowSeries> {
        if let Some(path) = &self.input {
            return load_series(path)
                .with_context(|| format!("failed to load cash flows from {}", path.display()));
        }

        let initial = self.initial.unwrap_or(DEFAULT_INITIAL_INVESTMENT);
        let flows = self.flows.clone().unwrap_or_else(|| DEFAULT_CASH_FLOWS.to_vec());
        CashFlowSeries::with_initial(initial, &flows).context("invalid cash flows")
    }
}

fn print_report(report: &IrrReport, show_curve: bool) {
    println!("IRR Calculator v{}", env!("CARGO_PKG_VERSION"));
    println!("======================\n");

    println!("Cash Flow Timeline:");
    println!("{:>6} {:>16}  {}", "Year", "Amount", "Type");
    println!("{}", "-".repeat(44));
    for entry in &report.timeline {
        println!("{:>6} {:>16.2}  {}", entry.period, entry.amount, entry.kind.label());
    }

    if show_curve {
        println!("\nNPV vs Discount Rate:");
        println!("{:>8} {:>16}", "Rate %", "NPV");
        println!("{}", "-".repeat(25));
        for point in &report.curve {
            println!("{:>8} {:>16}", point.rate_label(), point.npv_label());
        }
    }

    println!();
    match (&report.irr, &report.error) {
        (Some(solution), _) => {
            println!("========================================");
            println!("  INTERNAL RATE OF RETURN: {}", solution);
            println!("  Iterations: {}", solution.iterations);
            println!("  NPV at IRR: {:.6}", solution.npv);
            println!("========================================");
        }
        (None, Some(message)) => println!("  Could not calculate IRR: {}", message),
        (None, None) => println!("  Could not calculate IRR"),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.build_config()?;
    let calculator = IrrCalculator::with_config(config).context("invalid calculator configuration")?;
    let series = cli.build_series()?;

    log::info!("analyzing {} cash flows", series.len());
    let report = calculator.analyze(&series)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report, cli.curve);
    if report.irr.is_none() {
        process::exit(1);
    }
    Ok(())
}
