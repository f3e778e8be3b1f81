use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::config::FeatureConfig;
use crate::error::FeatureError;
use crate::head_to_head::HeadToHead;
use crate::records::{MatchRecord, PlayerId, Role, Surface};
use crate::rolling_form::{FORM_METRICS, FormSnapshot, MatchForm, RollingForm};
use crate::surface_history::SurfaceHistory;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Position in the chronological ordering; also the rolling tie-break.
    pub match_index: usize,
    pub date: NaiveDate,
    pub surface: Surface,
    pub tourney_level: Option<String>,
    pub player1: PlayerId,
    pub player2: PlayerId,
    pub p1_rank: f64,
    pub p2_rank: f64,
    pub p1_age: f64,
    pub p2_age: f64,
    pub target: u8,
    pub p1_surface_win_pct: f64,
    pub p2_surface_win_pct: f64,
    pub h2h_diff: i64,
    pub form: MatchForm,
}

impl FeatureRow {
    /// Feature values in `FeatureTable::model_columns` order.
    pub fn model_vector(&self) -> Vec<f64> {
        compose_model_vector(
            [self.p1_rank, self.p2_rank, self.p1_age, self.p2_age],
            [self.p1_surface_win_pct, self.p2_surface_win_pct],
            self.h2h_diff,
            &self.form,
        )
    }
}

pub(crate) fn compose_model_vector(
    rank_age: [f64; 4],
    surface_pct: [f64; 2],
    h2h_diff: i64,
    form: &MatchForm,
) -> Vec<f64> {
    let mut out = Vec::with_capacity(7 + FORM_METRICS.len() * form.p1.len() * 2);
    out.extend(rank_age);
    out.extend(surface_pct);
    out.push(h2h_diff as f64);
    for metric in FORM_METRICS {
        for (p1, p2) in form.p1.iter().zip(&form.p2) {
            out.push(p1.metric(metric));
            out.push(p2.metric(metric));
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    pub windows: Vec<usize>,
    pub rows: Vec<FeatureRow>,
}

impl FeatureTable {
    pub fn model_columns(&self) -> Vec<String> {
        model_columns(&self.windows)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Base64 SHA-256 of the JSON form; equal tables give equal strings.
    pub fn fingerprint(&self) -> anyhow::Result<String> {
        let json = serde_json::to_vec(self)?;
        Ok(BASE64.encode(Sha256::digest(&json)))
    }
}

pub fn model_columns(windows: &[usize]) -> Vec<String> {
    let mut out = [
        "p1_rank",
        "p2_rank",
        "p1_age",
        "p2_age",
        "p1_surface_win_pct",
        "p2_surface_win_pct",
        "h2h_diff",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect::<Vec<_>>();
    for metric in FORM_METRICS {
        for w in windows {
            out.push(format!("p1_{}_{w}", metric.column_stem()));
            out.push(format!("p2_{}_{w}", metric.column_stem()));
        }
    }
    out
}

/// Everything an inference-time caller needs to featurize a new match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub surface: SurfaceHistory,
    pub head_to_head: HeadToHead,
    pub form: FormSnapshot,
}

#[derive(Debug, Clone)]
pub struct Assembled {
    pub table: FeatureTable,
    pub snapshot: HistorySnapshot,
}

/// Sorts by date (stable, so ingestion order breaks ties), then runs the
/// streaming surface/H2H pass followed by the batch rolling-form pass.
pub fn assemble(matches: &[MatchRecord], cfg: &FeatureConfig) -> Result<Assembled, FeatureError> {
    cfg.validate()?;
    let rolling = RollingForm::new(&cfg.windows, cfg.default_win_pct)?;

    let mut ordered = matches.iter().collect::<Vec<_>>();
    ordered.sort_by_key(|m| m.date);
    let ordered = ordered.into_iter().cloned().collect::<Vec<_>>();

    for (match_index, m) in ordered.iter().enumerate() {
        if m.player1 == m.player2 {
            return Err(FeatureError::SamePlayerBothRoles {
                match_index,
                player: m.player1.clone(),
            });
        }
    }

    let mut surface = SurfaceHistory::new(cfg.default_win_pct);
    let mut head_to_head = HeadToHead::new();
    let mut rows = Vec::with_capacity(ordered.len());

    for (match_index, m) in ordered.iter().enumerate() {
        // Read both sides before any update so a match never sees itself.
        let p1_surface_win_pct = surface.win_pct(&m.player1, &m.surface);
        let p2_surface_win_pct = surface.win_pct(&m.player2, &m.surface);
        let h2h_diff = head_to_head.diff(&m.player1, &m.player2);

        surface.record(&m.player1, &m.surface, m.won(Role::Player1));
        surface.record(&m.player2, &m.surface, m.won(Role::Player2));
        head_to_head.record(m.winner(), m.loser());

        rows.push(FeatureRow {
            match_index,
            date: m.date,
            surface: m.surface.clone(),
            tourney_level: m.tourney_level.clone(),
            player1: m.player1.clone(),
            player2: m.player2.clone(),
            p1_rank: m.p1_rank,
            p2_rank: m.p2_rank,
            p1_age: m.p1_age,
            p2_age: m.p2_age,
            target: u8::from(m.p1_won),
            p1_surface_win_pct,
            p2_surface_win_pct,
            h2h_diff,
            form: MatchForm::default(),
        });
    }

    let rolling_out = rolling.compute(&ordered);
    for (row, form) in rows.iter_mut().zip(rolling_out.per_match) {
        row.form = form;
    }

    info!(
        matches = rows.len(),
        players = surface.player_count(),
        pairs = head_to_head.pair_count(),
        "assembled feature table"
    );

    Ok(Assembled {
        table: FeatureTable {
            windows: cfg.windows.clone(),
            rows,
        },
        snapshot: HistorySnapshot {
            surface,
            head_to_head,
            form: rolling_out.snapshot,
        },
    })
}
