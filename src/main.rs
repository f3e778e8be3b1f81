use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing::{info, warn};

use atp_features::config::{FeatureConfig, flag_value};
use atp_features::{assemble, feature_export, logging, match_store, preprocess, raw_csv, snapshot};

const DEFAULT_OUT_DIR: &str = "outputs";

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    logging::init_tracing();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let cfg = FeatureConfig::from_env();
    cfg.validate()?;

    let raw = if let Some(dir) = flag_value(&args, "--csv-dir") {
        let load = raw_csv::read_year_range(&PathBuf::from(dir), cfg.start_year, cfg.end_year)?;
        if load.skipped > 0 {
            warn!(skipped = load.skipped, "dropped unusable csv rows");
        }
        load.matches
    } else {
        let db_path = flag_value(&args, "--db")
            .map(PathBuf::from)
            .or_else(match_store::default_db_path)
            .context("unable to resolve sqlite path")?;
        let conn = match_store::open_db(&db_path)?;
        match_store::load_raw_matches(&conn)?
    };
    if raw.is_empty() {
        return Err(anyhow!(
            "no raw matches loaded; run ingest_csv first or pass --csv-dir"
        ));
    }
    info!(rows = raw.len(), "loaded raw matches");

    let records = preprocess::preprocess(&raw, &cfg)?;
    let assembled = assemble(&records, &cfg)?;

    let out_dir = flag_value(&args, "--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("create output dir {}", out_dir.display()))?;

    let xlsx = out_dir.join("features.xlsx");
    feature_export::export_feature_table(&xlsx, &assembled.table)?;
    let json = out_dir.join("features.json");
    feature_export::export_feature_json(&json, &assembled.table)?;
    let snap = out_dir.join("history_snapshot.json");
    snapshot::save_snapshot(&snap, &assembled.snapshot)?;

    info!(
        rows = assembled.table.len(),
        fingerprint = %assembled.table.fingerprint()?,
        out = %out_dir.display(),
        "feature table written"
    );
    println!("Features: {}", xlsx.display());
    println!("Snapshot: {}", snap.display());
    Ok(())
}
