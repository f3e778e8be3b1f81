use serde::{Deserialize, Serialize};

use crate::assembler::{HistorySnapshot, compose_model_vector};
use crate::config::FeatureConfig;
use crate::error::FeatureError;
use crate::records::{PlayerId, Surface};
use crate::rolling_form::MatchForm;

/// A match that has not been played yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchQuery {
    pub player1: PlayerId,
    pub player2: PlayerId,
    pub surface: Surface,
    pub p1_rank: Option<f64>,
    pub p2_rank: Option<f64>,
    pub p1_age: Option<f64>,
    pub p2_age: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceFeatures {
    pub p1_rank: f64,
    pub p2_rank: f64,
    pub p1_age: f64,
    pub p2_age: f64,
    pub p1_surface_win_pct: f64,
    pub p2_surface_win_pct: f64,
    pub h2h_diff: i64,
    pub form: MatchForm,
    pub p1_history: usize,
    pub p2_history: usize,
}

impl InferenceFeatures {
    pub fn model_vector(&self) -> Vec<f64> {
        compose_model_vector(
            [self.p1_rank, self.p2_rank, self.p1_age, self.p2_age],
            [self.p1_surface_win_pct, self.p2_surface_win_pct],
            self.h2h_diff,
            &self.form,
        )
    }
}

/// Featurizes `query` against the end-of-dataset state without touching it.
/// Missing ranks use the configured default; missing ages fall back to 0.
pub fn build_match_features(
    snapshot: &HistorySnapshot,
    query: &MatchQuery,
    cfg: &FeatureConfig,
) -> Result<InferenceFeatures, FeatureError> {
    if query.player1 == query.player2 {
        return Err(FeatureError::SamePlayerBothRoles {
            match_index: 0,
            player: query.player1.clone(),
        });
    }
    Ok(InferenceFeatures {
        p1_rank: query.p1_rank.unwrap_or(cfg.default_rank),
        p2_rank: query.p2_rank.unwrap_or(cfg.default_rank),
        p1_age: query.p1_age.unwrap_or_default(),
        p2_age: query.p2_age.unwrap_or_default(),
        p1_surface_win_pct: snapshot.surface.win_pct(&query.player1, &query.surface),
        p2_surface_win_pct: snapshot.surface.win_pct(&query.player2, &query.surface),
        h2h_diff: snapshot.head_to_head.diff(&query.player1, &query.player2),
        form: MatchForm {
            p1: snapshot.form.form_for(&query.player1),
            p2: snapshot.form.form_for(&query.player2),
        },
        p1_history: snapshot.form.history_len(&query.player1),
        p2_history: snapshot.form.history_len(&query.player2),
    })
}
