use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use frc_core::FundRepository;
use frc_core::calculations::validate_table;
use frc_data::BracketLoader;
use frc_db_sqlite::SqliteRepository;

/// Load IRRF bracket tables from a CSV file into the database.
///
/// The CSV file should have the following columns:
/// - year: base calendar year of the table (e.g., 2025)
/// - min_value: inclusive lower bound of the bracket
/// - max_value: inclusive upper bound (empty for the open top bracket)
/// - rate: rate applied to the full gross value (e.g., 0.075)
/// - deduction: fixed amount subtracted after the rate multiplication
#[derive(Parser, Debug)]
#[command(name = "frc-data-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing bracket data
    #[arg(short, long)]
    file: PathBuf,

    /// SQLite database path or URL (the file is created if missing)
    #[arg(short, long, default_value = "frc.db")]
    database: String,

    /// Run database migrations before loading data
    #[arg(short, long, default_value_t = false)]
    migrate: bool,

    /// Run seed files from the specified directory after migrations
    #[arg(short, long)]
    seeds: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let repo = SqliteRepository::new(&args.database)
        .await
        .with_context(|| format!("Failed to connect to database: {}", args.database))?;

    if args.migrate {
        println!("Running migrations...");
        repo.run_migrations()
            .await
            .context("Failed to run migrations")?;
        println!("Migrations complete.");
    }

    if let Some(seeds_dir) = &args.seeds {
        println!("Running seeds from: {}", seeds_dir.display());
        repo.run_seeds(seeds_dir)
            .await
            .with_context(|| format!("Failed to run seeds from: {}", seeds_dir.display()))?;
        println!("Seeds complete.");
    }

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open CSV file: {}", args.file.display()))?;
    let records = BracketLoader::parse(file).context("Failed to parse CSV")?;
    println!("Parsed {} bracket records.", records.len());

    let inserted = BracketLoader::load(&repo, &records)
        .await
        .context("Failed to load brackets into database")?;
    println!("Inserted {inserted} brackets.");

    // Audit each loaded year so gaps or overlaps are caught at load time
    // instead of silently under-withholding later.
    for year in repo
        .list_bracket_years()
        .await
        .context("Failed to list bracket years")?
    {
        let brackets = repo
            .get_brackets(year)
            .await
            .with_context(|| format!("Failed to fetch brackets for {year}"))?;
        for defect in validate_table(&brackets) {
            warn!(year, ?defect, "bracket table defect");
        }
    }

    Ok(())
}
