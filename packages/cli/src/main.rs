#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the `OpenTrails` toolkit.
//!
//! Transforms uploaded trail data into canonical `OpenTrails` files,
//! packages them into a bundle archive, and validates bundles.
//!
//! Log output is controlled with `RUST_LOG`; uploaded archives are
//! extracted under `OPEN_TRAILS_WORK_DIR` (default: the system temp
//! directory).

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{FeatureKind, PackageArgs};

#[derive(Parser)]
#[command(name = "open_trails", about = "OpenTrails transform and validation tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map uploaded trail segments onto the `OpenTrails` schema
    Segments {
        /// Uploaded segments `GeoJSON`
        input: PathBuf,
        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Dataset identifier used in log output
        #[arg(long, default_value = "dataset")]
        dataset: String,
    },
    /// Map uploaded trailheads onto the `OpenTrails` schema
    Trailheads {
        /// Uploaded trailheads `GeoJSON`
        input: PathBuf,
        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Dataset identifier used in log output
        #[arg(long, default_value = "dataset")]
        dataset: String,
    },
    /// Derive `named_trails.csv` from canonical trail segments
    NamedTrails {
        /// Canonical `trail_segments.geojson`
        segments: PathBuf,
        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Transform uploaded data and write an `OpenTrails` bundle archive
    Package(PackageArgs),
    /// Validate a bundle directory or zip archive
    Validate {
        /// Bundle directory or `.zip` archive
        bundle: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Segments {
            input,
            output,
            dataset,
        } => {
            let messages =
                commands::transform(FeatureKind::Segments, &input, output.as_deref(), &dataset)?;
            commands::print_messages(&messages);
        }
        Commands::Trailheads {
            input,
            output,
            dataset,
        } => {
            let messages =
                commands::transform(FeatureKind::Trailheads, &input, output.as_deref(), &dataset)?;
            commands::print_messages(&messages);
        }
        Commands::NamedTrails { segments, output } => {
            let count = commands::named_trails(&segments, output.as_deref())?;
            log::info!("Derived {count} named trail(s)");
        }
        Commands::Package(args) => {
            let messages = commands::package(&args)?;
            commands::print_messages(&messages);
            log::info!("Bundle written to {}", args.output.display());
        }
        Commands::Validate { bundle, json } => {
            let report = commands::validate(&bundle, &commands::work_dir())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for message in &report.messages {
                    println!("{message}");
                }
                println!();
                println!("{}", if report.passed { "PASSED" } else { "FAILED" });
            }

            if !report.passed {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
