use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, params};

use crate::preprocess::RawMatch;

const CACHE_DIR: &str = "atp_features";
const DB_FILE: &str = "raw_matches.sqlite";

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CACHE_DIR));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

pub fn default_db_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(DB_FILE))
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS raw_matches (
            row_id INTEGER PRIMARY KEY,
            tourney_date TEXT NOT NULL,
            surface TEXT NULL,
            tourney_level TEXT NULL,
            winner_name TEXT NOT NULL,
            loser_name TEXT NOT NULL,
            winner_rank REAL NULL,
            loser_rank REAL NULL,
            winner_age REAL NULL,
            loser_age REAL NULL,
            score TEXT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_raw_matches_date ON raw_matches(tourney_date);

        CREATE TABLE IF NOT EXISTS ingest_runs (
            run_id INTEGER PRIMARY KEY AUTOINCREMENT,
            finished_at TEXT NOT NULL,
            rows_written INTEGER NOT NULL,
            rows_skipped INTEGER NOT NULL
        );
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

/// Replaces the cached dataset. `row_id` is the ingestion position, which
/// later serves as the same-date tie-break.
pub fn replace_raw_matches(conn: &mut Connection, rows: &[RawMatch], skipped: usize) -> Result<usize> {
    let tx = conn.transaction().context("begin ingest transaction")?;
    tx.execute("DELETE FROM raw_matches", [])
        .context("clear raw matches")?;
    for (idx, m) in rows.iter().enumerate() {
        tx.execute(
            r#"
            INSERT INTO raw_matches (
                row_id, tourney_date, surface, tourney_level, winner_name, loser_name,
                winner_rank, loser_rank, winner_age, loser_age, score
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                idx as i64,
                m.tourney_date.format("%Y-%m-%d").to_string(),
                m.surface,
                m.tourney_level,
                m.winner_name,
                m.loser_name,
                m.winner_rank,
                m.loser_rank,
                m.winner_age,
                m.loser_age,
                m.score,
            ],
        )
        .context("insert raw match")?;
    }
    tx.execute(
        "INSERT INTO ingest_runs(finished_at, rows_written, rows_skipped) VALUES (?1, ?2, ?3)",
        params![Utc::now().to_rfc3339(), rows.len() as i64, skipped as i64],
    )
    .context("insert ingest run")?;
    tx.commit().context("commit ingest transaction")?;
    Ok(rows.len())
}

pub fn load_raw_matches(conn: &Connection) -> Result<Vec<RawMatch>> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT
                tourney_date, surface, tourney_level, winner_name, loser_name,
                winner_rank, loser_rank, winner_age, loser_age, score
            FROM raw_matches
            ORDER BY row_id ASC
            "#,
        )
        .context("prepare load raw matches query")?;

    let rows = stmt
        .query_map([], |row| {
            let date: String = row.get(0)?;
            Ok((
                date,
                RawMatch {
                    tourney_date: NaiveDate::MIN,
                    surface: row.get(1)?,
                    tourney_level: row.get(2)?,
                    winner_name: row.get(3)?,
                    loser_name: row.get(4)?,
                    winner_rank: row.get(5)?,
                    loser_rank: row.get(6)?,
                    winner_age: row.get(7)?,
                    loser_age: row.get(8)?,
                    score: row.get(9)?,
                },
            ))
        })
        .context("query raw matches")?;

    let mut out = Vec::new();
    for row in rows {
        let (date, mut m) = row.context("decode raw match row")?;
        m.tourney_date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .with_context(|| format!("bad stored date {date}"))?;
        out.push(m);
    }
    Ok(out)
}
