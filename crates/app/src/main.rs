use std::{error::Error, fs, path::PathBuf};

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use returns_engine::{CycleOptions, Frequency, ReturnStatus, validators::parse_iso_date};

mod commands;
mod error;
mod settings;

#[derive(Parser, Debug)]
#[command(name = "water_returns")]
#[command(about = "Inspect and finalize water abstraction returns")]
struct Cli {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the log level.
    #[arg(long)]
    level: Option<String>,
    /// Print compact JSON.
    #[arg(long)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the required lines of a return cycle.
    Lines(LinesArgs),
    /// Print a return's lines with meter readings and its total.
    Summary(SummaryArgs),
    /// Finalize a return and write the submitted object.
    Finalize(FinalizeArgs),
}

#[derive(Args, Debug)]
struct LinesArgs {
    #[arg(long, value_parser = parse_date)]
    start_date: NaiveDate,
    #[arg(long, value_parser = parse_date)]
    end_date: NaiveDate,
    #[arg(long, default_value = "month", value_parser = parse_frequency)]
    frequency: Frequency,
    /// The return is the last of its licence.
    #[arg(long = "final")]
    is_final: bool,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    /// Return object (JSON).
    file: PathBuf,
}

#[derive(Args, Debug)]
struct FinalizeArgs {
    /// Return object (JSON).
    file: PathBuf,
    #[arg(long, default_value = "received", value_parser = parse_status)]
    status: ReturnStatus,
    /// Defaults to today.
    #[arg(long, value_parser = parse_date)]
    received_date: Option<NaiveDate>,
    /// Write here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    parse_iso_date(raw).map_err(|err| err.to_string())
}

fn parse_frequency(raw: &str) -> Result<Frequency, String> {
    Frequency::try_from(raw).map_err(|err| err.to_string())
}

fn parse_status(raw: &str) -> Result<ReturnStatus, String> {
    ReturnStatus::try_from(raw).map_err(|err| err.to_string())
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = settings::load(settings::Overrides {
        config: cli.config,
        level: cli.level,
        compact: cli.compact,
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "water_returns={level},returns_engine={level}",
            level = settings.level
        ))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Lines(args) => {
            let options = CycleOptions {
                start_date: args.start_date,
                end_date: args.end_date,
                frequency: args.frequency,
                is_final: args.is_final,
            };
            println!("{}", commands::lines(&options, settings.pretty)?);
        }
        Command::Summary(args) => {
            let json = fs::read_to_string(&args.file)?;
            tracing::info!(file = %args.file.display(), "loaded return");
            println!("{}", commands::summary(&json, settings.pretty)?);
        }
        Command::Finalize(args) => {
            let json = fs::read_to_string(&args.file)?;
            tracing::info!(file = %args.file.display(), "loaded return");
            let received_date = args
                .received_date
                .unwrap_or_else(|| Local::now().date_naive());
            let output = commands::finalize(&json, args.status, received_date, settings.pretty)?;
            match args.output {
                Some(path) => {
                    fs::write(&path, output)?;
                    tracing::info!(file = %path.display(), "wrote return");
                }
                None => println!("{output}"),
            }
        }
    }

    Ok(())
}
