//! rusty-fx CLI - manage stored FX price series
//!
//! ## Example Usage
//!
//! ```bash
//! # Import a direct quote
//! rusty-fx add EURUSD --csv eurusd.csv
//!
//! # Append new prices
//! rusty-fx update EURUSD --csv latest.csv
//!
//! # Show a derived cross rate
//! rusty-fx get EURGBP --tail 10
//!
//! # Remove a series
//! rusty-fx delete EURUSD --yes
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rusty_fx::fx::{
    read_series_csv, AddOutcome, CsvSeriesStore, DeleteOutcome, FxConfig, FxPriceRepository,
    SeriesStore, UpdateOutcome,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

/// rusty-fx: spot FX price repository
#[derive(Parser)]
#[command(name = "rusty-fx")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Store, update and derive spot FX price series", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override the storage backend
    #[arg(long, global = true, value_enum)]
    backend: Option<Backend>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored codes
    List,

    /// Show the series for any pair
    Get {
        #[arg(value_name = "CODE")]
        code: String,

        /// Only show the last N rows
        #[arg(short = 'n', long)]
        tail: Option<usize>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Store a series from a DATETIME,PRICE CSV file
    Add {
        #[arg(value_name = "CODE")]
        code: String,

        #[arg(long, value_name = "FILE")]
        csv: PathBuf,

        /// Overwrite an existing series
        #[arg(short = 'f', long)]
        force: bool,
    },

    /// Append newer prices from a DATETIME,PRICE CSV file
    Update {
        #[arg(value_name = "CODE")]
        code: String,

        #[arg(long, value_name = "FILE")]
        csv: PathBuf,

        /// Skip the spike check
        #[arg(long)]
        no_spike_check: bool,
    },

    /// Delete a stored series
    Delete {
        #[arg(value_name = "CODE")]
        code: String,

        /// Confirm deletion
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
enum Backend {
    Csv,
    Sqlite,
}

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Config {
    #[serde(default = "default_data_dir")]
    data_dir: PathBuf,
    #[serde(default = "default_backend")]
    backend: Backend,
    #[serde(default)]
    fx: FxConfig,
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".rusty-fx")
        .join("data")
}

fn default_backend() -> Backend {
    Backend::Csv
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backend: default_backend(),
            fx: FxConfig::default(),
        }
    }
}

impl Config {
    fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match dirs::home_dir() {
                Some(home) => home.join(".rusty-fx").join("config.toml"),
                None => return Ok(Config::default()),
            },
        };

        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.fx.validate()?;
        Ok(config)
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }

    if cli.verbose {
        println!(
            "{} v{}",
            "rusty-fx".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        );
        println!(
            "Data dir: {} ({:?}, reference {})",
            config.data_dir.display().to_string().dimmed(),
            config.backend,
            config.fx.reference_currency
        );
    }

    fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("Failed to create {}", config.data_dir.display()))?;

    match config.backend {
        Backend::Csv => {
            let store = CsvSeriesStore::new(config.data_dir.join("fx"))?;
            execute(cli.command, FxPriceRepository::with_config(store, config.fx))
        }
        Backend::Sqlite => run_sqlite(cli.command, config),
    }
}

#[cfg(feature = "rusqlite-support")]
fn run_sqlite(command: Commands, config: Config) -> Result<()> {
    let store = rusty_fx::fx::SqliteSeriesStore::new(&config.data_dir.join("fx.db"))?;
    execute(command, FxPriceRepository::with_config(store, config.fx))
}

#[cfg(not(feature = "rusqlite-support"))]
fn run_sqlite(_command: Commands, _config: Config) -> Result<()> {
    bail!("SQLite backend not available: rebuild with the rusqlite-support feature")
}

fn execute<S: SeriesStore>(command: Commands, mut repo: FxPriceRepository<S>) -> Result<()> {
    match command {
        Commands::List => {
            let codes = repo.codes()?;
            if codes.is_empty() {
                println!("{}", "No FX series stored".yellow());
            }
            for code in codes {
                println!("{}", code);
            }
        }

        Commands::Get { code, tail, json } => {
            let mut series = repo.get(&code)?;
            if let Some(n) = tail {
                series = series.tail(n);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&series)?);
            } else if series.is_empty() {
                println!("{} No data for {}", "Warning:".yellow(), code);
            } else {
                println!("{:<25} {:>12}", "DATETIME".bold(), "PRICE".bold());
                for (dt, rate) in series.iter() {
                    println!("{:<25} {:>12.6}", dt.to_rfc3339(), rate);
                }
            }
        }

        Commands::Add { code, csv, force } => {
            let series = read_series_csv(&csv)?;
            match repo.add(&code, &series, force)? {
                AddOutcome::Added => {
                    println!("{} Stored {} rows for {}", "✓".green(), series.len(), code)
                }
                AddOutcome::Duplicate => bail!(
                    "{} already exists; use --force to overwrite or `update` to append",
                    code
                ),
                AddOutcome::NotReferenceQuoted => bail!(
                    "{} cannot be stored: only pairs quoted against {} are kept",
                    code,
                    repo.config().reference_currency
                ),
            }
        }

        Commands::Update {
            code,
            csv,
            no_spike_check,
        } => {
            let batch = read_series_csv(&csv)?;
            match repo.update(&code, &batch, !no_spike_check)? {
                UpdateOutcome::RowsAdded(0) => {
                    println!("{} No new prices for {}", "•".dimmed(), code)
                }
                UpdateOutcome::RowsAdded(n) => {
                    println!("{} Added {} rows to {}", "✓".green(), n, code)
                }
                UpdateOutcome::SpikeRejected => bail!(
                    "Spike detected in {} for {}; nothing written (rerun with --no-spike-check to force)",
                    csv.display(),
                    code
                ),
                UpdateOutcome::NotReferenceQuoted => bail!(
                    "{} cannot be updated: only pairs quoted against {} are kept",
                    code,
                    repo.config().reference_currency
                ),
            }
        }

        Commands::Delete { code, yes } => match repo.delete(&code, yes)? {
            DeleteOutcome::Deleted => println!("{} Deleted {}", "✓".green(), code),
            DeleteOutcome::NotConfirmed => {
                bail!("Refusing to delete {} without --yes", code)
            }
            DeleteOutcome::NotFound => {
                println!("{} {} is not stored", "Warning:".yellow(), code)
            }
        },
    }

    Ok(())
}
