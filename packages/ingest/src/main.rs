#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for building the camera database.

use std::path::PathBuf;
use std::time::Instant;

use camera_map_cli_utils::{IndicatifProgress, init_logger};
use camera_map_database::{CameraRepository, JsonFileRepository, paths};
use camera_map_ingest::audit::{DEFAULT_RADIUS_M, find_nearby_pairs};
use camera_map_ingest::{CollectionSummary, all_batches, find_batch, run_all, run_batch};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "camera_map_ingest", about = "Camera database batch tool")]
struct Cli {
    /// Path to the camera database JSON file
    #[arg(long, global = true, default_value = paths::DATABASE_FILE_NAME)]
    database: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all configured batches
    Batches,
    /// Regenerate the category owned by one batch
    Run {
        /// Batch identifier (e.g., "`wa_police_enforcement`")
        batch: String,
        /// CSV export to read for CSV batches
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Run every configured batch in order. CSV batches are skipped when
    /// their input file does not exist.
    RunAll {
        /// CSV export to read for CSV batches
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Convert the City of Perth CSV export and regenerate the public safety
    /// cameras
    Csv {
        /// CSV export to read (default: `perth_cameras_raw.csv`)
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Print record counts for the current database
    Summary,
    /// List cameras from different sources that sit close together
    Audit {
        /// Search radius in meters
        #[arg(long, default_value_t = DEFAULT_RADIUS_M)]
        radius: f64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = init_logger();
    let cli = Cli::parse();
    let mut repo = JsonFileRepository::new(&cli.database);

    match cli.command {
        Commands::Batches => {
            println!("{:<24} {:<14} {:<6} NAME", "ID", "CATEGORY", "KIND");
            println!("{}", "-".repeat(72));
            for batch in &all_batches() {
                let kind = if batch.is_csv() { "csv" } else { "table" };
                println!(
                    "{:<24} {:<14} {kind:<6} {}",
                    batch.id(),
                    batch.category.as_ref(),
                    batch.name()
                );
            }
        }
        Commands::Run { batch, input } => {
            let batch = find_batch(&batch)?;
            let progress = IndicatifProgress::rows_bar(&multi, batch.name());
            run_batch(&mut repo, &batch, input.as_deref(), &progress)?;
            println!("{}", CollectionSummary::from_records(&repo.load()?));
        }
        Commands::RunAll { input } => {
            let start = Instant::now();
            let outcomes = run_all(&mut repo, input.as_deref(), |batch| {
                IndicatifProgress::rows_bar(&multi, batch.name())
            })?;
            log::info!(
                "Ran {} batches in {:.2}s",
                outcomes.len(),
                start.elapsed().as_secs_f64()
            );
            println!("{}", CollectionSummary::from_records(&repo.load()?));
        }
        Commands::Csv { input } => {
            let batch = find_batch("city_of_perth")?;
            let progress = IndicatifProgress::rows_bar(&multi, batch.name());
            let outcome = run_batch(&mut repo, &batch, input.as_deref(), &progress)?;
            println!(
                "Added {} public safety cameras ({} rows skipped)",
                outcome.report.added, outcome.skipped_rows
            );
            println!("{}", CollectionSummary::from_records(&repo.load()?));
        }
        Commands::Summary => {
            println!("{}", CollectionSummary::from_records(&repo.load()?));
        }
        Commands::Audit { radius } => {
            let records = repo.load()?;
            let pairs = find_nearby_pairs(&records, radius);
            for pair in &pairs {
                println!(
                    "{:>7.1} m  {:<16} {:<20} {:<16} {}",
                    pair.distance_m,
                    pair.first.id,
                    pair.first.camera_type,
                    pair.second.id,
                    pair.second.camera_type
                );
            }
            println!("{} cross-source pairs within {radius} m", pairs.len());
        }
    }

    Ok(())
}
