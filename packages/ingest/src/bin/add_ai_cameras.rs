#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Regenerates the WA Police AI detection cameras in `cameras_database.json`.

use camera_map_cli_utils::{IndicatifProgress, init_logger};
use camera_map_database::paths;
use camera_map_ingest::run_batch_on_file;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = init_logger();
    let progress = IndicatifProgress::rows_bar(&multi, "WA Police AI cameras");

    let (outcome, summary) =
        run_batch_on_file("wa_police_ai", &paths::database_path(), None, &progress)?;

    println!(
        "Added {} AI detection cameras (replaced {})",
        outcome.report.added, outcome.report.removed
    );
    println!("{summary}");
    Ok(())
}
