#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Converts `perth_cameras_raw.csv` and regenerates the City of Perth
//! public safety cameras in `cameras_database.json`.

use camera_map_cli_utils::{IndicatifProgress, init_logger};
use camera_map_database::paths;
use camera_map_ingest::run_batch_on_file;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = init_logger();
    let progress = IndicatifProgress::rows_bar(&multi, "City of Perth CCTV");

    let (outcome, summary) =
        run_batch_on_file("city_of_perth", &paths::database_path(), None, &progress)?;

    println!(
        "Added {} public safety cameras (replaced {})",
        outcome.report.added, outcome.report.removed
    );
    println!("{summary}");
    Ok(())
}
