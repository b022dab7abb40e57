use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use tally_chart::cli::{handle_chart_command, ChartCommands};
use tally_chart::config::{Settings, TallyPaths};
use tally_chart::models::{Category, Transaction, UserId};
use tally_chart::storage::{
    write_json_atomic, CsvSnapshotSource, JsonSnapshotSource, TransactionSource,
};

#[derive(Parser)]
#[command(
    name = "tally",
    author = "Kaylee Beyene",
    version,
    about = "Income and expense charts for personal finance data",
    long_about = "tally reads a snapshot of your transactions and prints paged \
                  income/expense charts by day, week, month, year or category."
)]
struct Cli {
    /// Base directory holding config.json and the data files
    #[arg(long, global = true, env = "TALLY_CHART_DIR")]
    data_dir: Option<PathBuf>,

    /// Transactions file to chart (.json or .csv) instead of the data directory
    #[arg(long, global = true)]
    transactions: Option<PathBuf>,

    /// Categories file to use instead of the data directory
    #[arg(long, global = true)]
    categories: Option<PathBuf>,

    /// Chart another user's transactions
    #[arg(long, global = true)]
    user: Option<u32>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a chart page
    #[command(subcommand)]
    Chart(ChartCommands),

    /// Create the data directory and default settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger(match cli.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    });

    let paths = match &cli.data_dir {
        Some(dir) => TallyPaths::with_base_dir(dir.clone()),
        None => TallyPaths::new()?,
    };
    debug!(base_dir = %paths.base_dir().display(), "resolved paths");

    let mut settings = Settings::load_or_create(&paths)?;
    if let Some(user) = cli.user {
        settings.user_id = UserId::new(user);
    }

    match cli.command {
        Some(Commands::Chart(cmd)) => {
            let source = snapshot_source(&paths, cli.transactions, cli.categories);
            handle_chart_command(source.as_ref(), &settings, cmd)?;
        }
        Some(Commands::Init) => {
            println!("Initializing tally-chart at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;
            write_if_missing(&paths.transactions_file(), &Vec::<Transaction>::new())?;
            write_if_missing(&paths.categories_file(), &Vec::<Category>::new())?;
            println!("Initialization complete!");
            println!();
            println!(
                "Add transactions to {} and run 'tally chart time'.",
                paths.transactions_file().display()
            );
        }
        Some(Commands::Config) => {
            println!("tally-chart Configuration");
            println!("=========================");
            println!("Base directory:    {}", paths.base_dir().display());
            println!("Settings file:     {}", paths.settings_file().display());
            println!("Transactions file: {}", paths.transactions_file().display());
            println!("Categories file:   {}", paths.categories_file().display());
            println!();
            println!("Settings:");
            println!("  User:            {}", settings.user_id);
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Axis levels:     {}", settings.chart.axis_levels);
            println!("  Day page size:   {}", settings.chart.day_page_size);
            println!(
                "  Category pages:  {}..={}",
                settings.chart.min_category_page_size, settings.chart.max_category_page_size
            );
            println!("  Year page size:  {}", settings.chart.max_year_page_size);
            println!("  First year:      {}", settings.chart.first_year);
        }
        None => {
            println!("tally-chart - income and expense charts");
            println!();
            println!("Run 'tally --help' for usage information.");
            println!("Run 'tally chart time' for this month's chart.");
        }
    }

    Ok(())
}

/// Pick the snapshot reader from the transactions file extension
fn snapshot_source(
    paths: &TallyPaths,
    transactions: Option<PathBuf>,
    categories: Option<PathBuf>,
) -> Box<dyn TransactionSource> {
    let categories = categories.unwrap_or_else(|| paths.categories_file());
    match transactions {
        Some(file) if has_extension(&file, "csv") => {
            Box::new(CsvSnapshotSource::new(file, categories))
        }
        Some(file) => Box::new(JsonSnapshotSource::new(file, categories)),
        None => Box::new(JsonSnapshotSource::new(paths.transactions_file(), categories)),
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

fn write_if_missing<T: serde::Serialize>(path: &Path, data: &T) -> Result<()> {
    if !path.exists() {
        write_json_atomic(path, data)
            .with_context(|| format!("Failed to create {}", path.display()))?;
    }
    Ok(())
}

/// Route tracing output to stderr, honouring RUST_LOG when set
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!(
            "{}={},{}={}",
            "tally_chart",
            level,
            env!("CARGO_BIN_NAME"),
            level
        )),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
