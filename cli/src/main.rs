mod add;
mod config;
mod dashboard;
mod summary;

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use fleetrent_core::{FileRentalRepository, RentalRepository, ReportPeriod, ReportUseCase, format_amount};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "fleetrent")]
#[command(about = "Income reports for a vehicle rental fleet", long_about = None)]
struct Cli {
    /// Directory holding rentals.json (defaults to ~/.fleetrent)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Print income totals, the 6 month trend and the category breakdown
    Summary {
        /// month, quarter, year or all
        #[arg(short, long)]
        period: Option<ReportPeriod>,
    },
    /// List the most recent rentals in a period
    Recent {
        #[arg(short, long)]
        period: Option<ReportPeriod>,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Open the accounting dashboard
    Dashboard {
        #[arg(short, long)]
        period: Option<ReportPeriod>,
    },
    /// Record a rental (usage: add Budi Santoso amount:1500000 vehicle:<uuid> start:today end:+2d status:paid type:bus)
    Add {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let repo = FileRentalRepository::new(cli.data_dir.or(config.data_dir))?;
    info!(path = %repo.path().display(), "using rental store");

    match cli.command {
        Some(Commands::Summary { period }) => {
            let period = period.unwrap_or(config.period);
            let report = ReportUseCase::new(&repo).generate(period, config.recent_limit, &Local::now())?;
            summary::show_summary(&report);
        },
        Some(Commands::Recent { period, limit }) => {
            let period = period.unwrap_or(config.period);
            let limit = limit.unwrap_or(config.recent_limit);
            let report = ReportUseCase::new(&repo).generate(period, limit, &Local::now())?;
            summary::show_recent(&report);
        },
        Some(Commands::Add { args }) => {
            let rental = add::build_rental(&args, Local::now().date_naive())?;
            let created = repo.create(rental)?;
            println!("Rental added: {} (ID: {})", created.renter_name, created.id);
            println!("  Period: {} to {}", created.start_date, created.end_date);
            println!("  Amount: {} ({})", format_amount(created.payment_amount), created.payment_status);
        },
        Some(Commands::Dashboard { period }) => {
            dashboard::run(&repo, period.unwrap_or(config.period), config.recent_limit)?;
        },
        None => {
            dashboard::run(&repo, config.period, config.recent_limit)?;
        }
    }
    Ok(())
}
