use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::preprocess::RawMatch;

// Column names follow the public ATP results files (atp_matches_YYYY.csv).
#[derive(Debug, Deserialize)]
struct CsvRow {
    tourney_date: Option<String>,
    surface: Option<String>,
    tourney_level: Option<String>,
    winner_name: Option<String>,
    loser_name: Option<String>,
    winner_rank: Option<String>,
    loser_rank: Option<String>,
    winner_age: Option<String>,
    loser_age: Option<String>,
    score: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CsvLoad {
    pub matches: Vec<RawMatch>,
    pub skipped: usize,
}

pub fn year_file(dir: &Path, year: i32) -> PathBuf {
    dir.join(format!("atp_matches_{year}.csv"))
}

pub fn read_raw_matches(path: &Path) -> Result<CsvLoad> {
    let file = std::fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
    parse_raw_matches(file).with_context(|| format!("read {}", path.display()))
}

/// Rows with no usable date or player names are counted and dropped.
pub fn parse_raw_matches(reader: impl Read) -> Result<CsvLoad> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut out = CsvLoad::default();
    for row in rdr.deserialize::<CsvRow>() {
        let row = row.context("decode csv row")?;
        match row_to_raw(row) {
            Some(m) => out.matches.push(m),
            None => out.skipped += 1,
        }
    }
    Ok(out)
}

/// Reads `atp_matches_{year}.csv` for every year in `start..=end`, in year
/// order. Missing years are logged and skipped.
pub fn read_year_range(dir: &Path, start: i32, end: i32) -> Result<CsvLoad> {
    let mut out = CsvLoad::default();
    for year in start..=end {
        let path = year_file(dir, year);
        if !path.exists() {
            warn!(year, path = %path.display(), "missing year file");
            continue;
        }
        let load = read_raw_matches(&path)?;
        debug!(year, rows = load.matches.len(), skipped = load.skipped, "loaded year");
        out.matches.extend(load.matches);
        out.skipped += load.skipped;
    }
    Ok(out)
}

fn row_to_raw(row: CsvRow) -> Option<RawMatch> {
    let tourney_date = parse_date(row.tourney_date.as_deref()?)?;
    let winner_name = non_empty(row.winner_name)?;
    let loser_name = non_empty(row.loser_name)?;
    Some(RawMatch {
        tourney_date,
        surface: non_empty(row.surface),
        tourney_level: non_empty(row.tourney_level),
        winner_name,
        loser_name,
        winner_rank: parse_num(row.winner_rank.as_deref()),
        loser_rank: parse_num(row.loser_rank.as_deref()),
        winner_age: parse_num(row.winner_age.as_deref()),
        loser_age: parse_num(row.loser_age.as_deref()),
        score: non_empty(row.score),
    })
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}

fn parse_num(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}
