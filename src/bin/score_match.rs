use std::path::PathBuf;

use anyhow::{Result, anyhow};

use atp_features::assembler::model_columns;
use atp_features::config::{FeatureConfig, flag_value};
use atp_features::inference::{MatchQuery, build_match_features};
use atp_features::records::{PlayerId, Surface};
use atp_features::{logging, snapshot};

const DEFAULT_SNAPSHOT: &str = "outputs/history_snapshot.json";

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    logging::init_tracing();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let cfg = FeatureConfig::from_env();

    let path = flag_value(&args, "--snapshot")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT));
    let history = snapshot::load_snapshot(&path)?;

    let player1 = flag_value(&args, "--p1").ok_or_else(|| anyhow!("pass --p1 <player name>"))?;
    let player2 = flag_value(&args, "--p2").ok_or_else(|| anyhow!("pass --p2 <player name>"))?;
    let query = MatchQuery {
        player1: PlayerId::new(player1),
        player2: PlayerId::new(player2),
        surface: Surface::parse(flag_value(&args, "--surface").as_deref()),
        p1_rank: num_flag(&args, "--p1-rank"),
        p2_rank: num_flag(&args, "--p2-rank"),
        p1_age: num_flag(&args, "--p1-age"),
        p2_age: num_flag(&args, "--p2-age"),
    };

    let features = build_match_features(&history, &query, &cfg)?;
    if features.p1_history == 0 {
        println!("note: no history for {}", query.player1);
    }
    if features.p2_history == 0 {
        println!("note: no history for {}", query.player2);
    }

    let columns = model_columns(&history.form.windows);
    for (name, value) in columns.iter().zip(features.model_vector()) {
        println!("{name:<32} {value:>10.4}");
    }
    Ok(())
}

fn num_flag(args: &[String], name: &str) -> Option<f64> {
    flag_value(args, name)?.parse::<f64>().ok()
}
