//! Write the NPV-vs-discount-rate curve for a set of cash flows as CSV
//!
//! Reads cash flows from --input (CSV or JSON) or uses the calculator's
//! default example. Curve settings come from IRR_RATE_MIN / IRR_RATE_MAX /
//! IRR_RATE_STEP when set. Output goes to npv_curve.csv unless --output is
//! given; pass `-` to write to stdout.

use anyhow::{Context, Result};
use clap::Parser;
use irr_calculator::cashflow::{load_series, CashFlowInput};
use irr_calculator::valuation::{npv_curve, zero_crossings};
use irr_calculator::IrrCalculator;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "npv_curve", about = "Write NPV across a range of discount rates as CSV")]
struct Args {
    /// Cash-flow file (CSV with Period,CashFlow or JSON)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output path, or `-` for stdout
    #[arg(long, default_value = "npv_curve.csv")]
    output: String,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let calculator = IrrCalculator::from_env().context("invalid IRR_* environment settings")?;

    let series = match &args.input {
        Some(path) => load_series(path)
            .with_context(|| format!("failed to load cash flows from {}", path.display()))?,
        None => CashFlowInput::default().into_series()?,
    };

    let points = npv_curve(series.as_slice(), calculator.rate_range())?;

    let sink: Box<dyn Write> = if args.output == "-" {
        Box::new(io::stdout().lock())
    } else {
        Box::new(File::create(&args.output).with_context(|| format!("failed to create {}", args.output))?)
    };

    let mut wtr = csv::Writer::from_writer(sink);
    for point in &points {
        wtr.serialize(point)?;
    }
    wtr.flush()?;

    if args.output != "-" {
        println!("Written {} curve points to {}", points.len(), args.output);
        for rate in zero_crossings(&points) {
            println!("  NPV reaches zero at or just above {:.1}%", rate * 100.0);
        }
    }

    Ok(())
}
