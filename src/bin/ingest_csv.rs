use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use atp_features::config::{FeatureConfig, flag_value};
use atp_features::{logging, match_store, raw_csv};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    logging::init_tracing();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let cfg = FeatureConfig::from_env();

    let csv_dir = flag_value(&args, "--csv-dir")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("pass --csv-dir <dir with atp_matches_YYYY.csv>"))?;
    let db_path = flag_value(&args, "--db")
        .map(PathBuf::from)
        .or_else(match_store::default_db_path)
        .context("unable to resolve sqlite path")?;

    let load = raw_csv::read_year_range(&csv_dir, cfg.start_year, cfg.end_year)?;
    if load.matches.is_empty() {
        return Err(anyhow!(
            "no matches found in {} for {}..={}",
            csv_dir.display(),
            cfg.start_year,
            cfg.end_year
        ));
    }

    let mut conn = match_store::open_db(&db_path)?;
    let written = match_store::replace_raw_matches(&mut conn, &load.matches, load.skipped)?;

    println!("Raw match ingest complete");
    println!("DB: {}", db_path.display());
    println!("Years: {}..={}", cfg.start_year, cfg.end_year);
    println!("Matches written: {written}");
    println!("Rows skipped: {}", load.skipped);
    Ok(())
}
