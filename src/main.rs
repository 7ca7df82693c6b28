//! Volatility ranker - main entry point
//!
//! This binary plays the host framework locally:
//! - rank: Allocation as of a date from CSV bars
//! - schedule: Replay every rebalance day over the loaded bars
//! - check-date: Evaluate the rebalance predicate for a timestamp
//! - strategies: List registered strategies

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "volatility-ranker")]
#[command(about = "Volatility-ranked equal-weight equity allocation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the target allocation as of a date
    Rank {
        /// Path to configuration file
        #[arg(short, long, default_value = "configs/volatility_ranker_1d.json")]
        config: String,

        /// As-of date (YYYY-MM-DD). Defaults to the latest loaded bar
        #[arg(short, long)]
        date: Option<String>,

        /// Top N override
        #[arg(long)]
        top_n: Option<usize>,
    },

    /// Replay every rebalance day over the loaded data
    Schedule {
        /// Path to configuration file
        #[arg(short, long, default_value = "configs/volatility_ranker_1d.json")]
        config: String,

        /// Write the schedule to this CSV file
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Check whether a timestamp is a rebalance day
    CheckDate {
        /// Timestamp (YYYY-MM-DD, YYYY-MM-DD HH:MM:SS or RFC 3339)
        timestamp: String,

        /// Path to configuration file
        #[arg(short, long, default_value = "configs/volatility_ranker_1d.json")]
        config: String,
    },

    /// List registered strategies
    Strategies,
}

fn setup_logging(verbose: bool, command_name: &str) -> Result<()> {
    std::fs::create_dir_all("logs")?;

    // Log file naming pattern: {command}_{date}.log
    let log_filename = format!(
        "{}_{}.log",
        command_name,
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    let log_path = PathBuf::from("logs").join(&log_filename);

    let level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_appender = tracing_appender::rolling::never("logs", &log_filename);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_appender)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    info!("Logging initialized");
    info!("Log file: {}", log_path.display());

    Ok(())
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let command_name = match &cli.command {
        Commands::Rank { .. } => "rank",
        Commands::Schedule { .. } => "schedule",
        Commands::CheckDate { .. } => "check_date",
        Commands::Strategies => "strategies",
    };

    setup_logging(cli.verbose, command_name)?;

    match cli.command {
        Commands::Rank { config, date, top_n } => commands::rank::run(config, date, top_n),
        Commands::Schedule { config, output } => commands::schedule::run(config, output),
        Commands::CheckDate { timestamp, config } => commands::check_date::run(config, timestamp),
        Commands::Strategies => {
            for name in volatility_ranker::strategies::available_strategies() {
                println!("{}", name);
            }
            Ok(())
        }
    }
}
