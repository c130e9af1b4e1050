//! Mustard Plant Calculator
//!
//! Financial and operational calculator for a mustard oil processing
//! business: pungency compliance, margin waterfall, working capital and
//! ROCE, with named scenarios stored in SQLite.

mod calculator;
mod db;
mod models;
mod report;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rusqlite::Connection;

use crate::models::PlantConfig;
use crate::report::Period;

#[derive(Parser)]
#[command(name = "mustard-calculator")]
#[command(about = "Financial calculator for a mustard oil processing plant")]
struct Cli {
    /// Path to the SQLite scenario database
    #[arg(short, long, default_value = "mustard_scenarios.db")]
    database: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute and print the financial report
    Report {
        /// Saved scenario to use as the base configuration
        #[arg(short, long)]
        scenario: Option<String>,

        /// Override a parameter, e.g. --set seed_input_mt=250
        #[arg(long = "set", value_name = "PARAM=VALUE")]
        overrides: Vec<String>,

        /// Reporting horizon
        #[arg(short, long, value_enum, default_value = "daily")]
        view: View,

        /// Also print the input parameters used
        #[arg(long)]
        verbose: bool,
    },

    /// Save a scenario to the database
    Save {
        /// Scenario name
        name: String,

        /// Existing scenario to copy as the base (defaults otherwise)
        #[arg(short, long)]
        from: Option<String>,

        /// Override a parameter, e.g. --set capex=190000000
        #[arg(long = "set", value_name = "PARAM=VALUE")]
        overrides: Vec<String>,
    },

    /// List all saved scenarios
    List,

    /// Show a saved scenario's parameters
    Show {
        /// Scenario name
        name: String,
    },

    /// Delete a saved scenario
    Delete {
        /// Scenario name
        name: String,
    },

    /// List all parameters with their defaults and descriptions
    Params,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum View {
    Daily,
    Monthly,
    Annual,
    All,
}

impl View {
    fn periods(self) -> &'static [Period] {
        match self {
            View::Daily => &[Period::Daily],
            View::Monthly => &[Period::Monthly],
            View::Annual => &[Period::Annual],
            View::All => &[Period::Daily, Period::Monthly, Period::Annual],
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let conn = Connection::open(&cli.database)?;
    db::init_schema(&conn)?;

    match cli.command {
        Commands::Report {
            scenario,
            overrides,
            view,
            verbose,
        } => {
            let config = build_config(&conn, scenario.as_deref(), &overrides)?;
            let metrics = calculator::compute_metrics(&config);

            if verbose {
                print_params(&config);
                println!();
            }

            println!("{}\n", metrics.pungency.message);
            for &period in view.periods() {
                println!("{}", report::period_statement(&config, &metrics, period));
            }
            println!("{}", report::CapitalSummary::new(&metrics));
        }

        Commands::Save {
            name,
            from,
            overrides,
        } => {
            let config = build_config(&conn, from.as_deref(), &overrides)?;
            db::save_scenario(&conn, &name, &config)?;
            println!("Saved scenario '{}'", name);
        }

        Commands::List => {
            let scenarios = db::list_scenarios(&conn)?;
            if scenarios.is_empty() {
                println!("No saved scenarios. Use 'save' to create one.");
            } else {
                println!("{:<30} {:<20}", "Scenario", "Created");
                println!("{}", "-".repeat(50));
                for (name, created_at) in scenarios {
                    println!("{:<30} {:<20}", name, created_at);
                }
            }
        }

        Commands::Show { name } => {
            let config = db::load_scenario(&conn, &name)?;
            println!("Scenario: {}", name);
            print_params(&config);
        }

        Commands::Delete { name } => {
            if db::delete_scenario(&conn, &name)? {
                println!("Deleted scenario '{}'", name);
            } else {
                println!("Scenario '{}' not found", name);
            }
        }

        Commands::Params => {
            println!("{:<30} {:>15}  {}", "Parameter", "Default", "Description");
            println!("{}", "-".repeat(90));
            for spec in PlantConfig::param_specs() {
                println!(
                    "{:<30} {:>15}  {}",
                    spec.name, spec.default, spec.description
                );
            }
        }
    }

    Ok(())
}

/// Assemble a configuration: saved scenario (or defaults), then overrides
fn build_config(
    conn: &Connection,
    scenario: Option<&str>,
    overrides: &[String],
) -> Result<PlantConfig> {
    let mut config = match scenario {
        Some(name) => db::load_scenario(conn, name)?,
        None => PlantConfig::default(),
    };

    for entry in overrides {
        let (param, value) = parse_override(entry)?;
        config
            .set(param, value)
            .with_context(|| "use 'params' to list valid parameter names")?;
    }
    Ok(config)
}

/// Split a PARAM=VALUE override into its parts
fn parse_override(entry: &str) -> Result<(&str, f64)> {
    let (param, raw_value) = entry
        .split_once('=')
        .ok_or_else(|| anyhow!("expected PARAM=VALUE, got '{}'", entry))?;
    let value: f64 = raw_value
        .parse()
        .with_context(|| format!("'{}' is not a number in '{}'", raw_value, entry))?;
    Ok((param.trim(), value))
}

fn print_params(config: &PlantConfig) {
    println!("{:<30} {:>15}", "Parameter", "Value");
    println!("{}", "-".repeat(46));
    for (name, value) in config.params() {
        println!("{:<30} {:>15}", name, value);
    }
}
