use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::FeatureConfig;
use crate::error::FeatureError;
use crate::records::{MatchRecord, PlayerId, Surface};
use crate::score::parse_match_score;

// A draw above this puts the official winner in the player2 role.
const ROLE_SWAP_THRESHOLD: f64 = 0.5;

/// A historical result as published: winner/loser oriented, nullable fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMatch {
    pub tourney_date: NaiveDate,
    pub surface: Option<String>,
    pub tourney_level: Option<String>,
    pub winner_name: String,
    pub loser_name: String,
    pub winner_rank: Option<f64>,
    pub loser_rank: Option<f64>,
    pub winner_age: Option<f64>,
    pub loser_age: Option<f64>,
    pub score: Option<String>,
}

/// Imputes missing ranks and ages, assigns player1/player2 with a seeded
/// draw per row (in input order) and orients the parsed score to player1.
pub fn preprocess(raw: &[RawMatch], cfg: &FeatureConfig) -> Result<Vec<MatchRecord>, FeatureError> {
    let winner_age_median = median(raw.iter().filter_map(|m| m.winner_age));
    let loser_age_median = median(raw.iter().filter_map(|m| m.loser_age));

    let mut rng = StdRng::seed_from_u64(cfg.role_seed);
    let mut out = Vec::with_capacity(raw.len());
    let mut swapped = 0usize;

    for (idx, m) in raw.iter().enumerate() {
        let swap = rng.r#gen::<f64>() > ROLE_SWAP_THRESHOLD;
        if m.winner_name == m.loser_name {
            return Err(FeatureError::SamePlayerBothRoles {
                match_index: idx,
                player: PlayerId::new(m.winner_name.clone()),
            });
        }

        let w_rank = m.winner_rank.unwrap_or(cfg.default_rank);
        let l_rank = m.loser_rank.unwrap_or(cfg.default_rank);
        let w_age = m.winner_age.unwrap_or(winner_age_median);
        let l_age = m.loser_age.unwrap_or(loser_age_median);
        let winner_tally = parse_match_score(m.score.as_deref().unwrap_or("")).for_winner();
        let winner = PlayerId::new(m.winner_name.clone());
        let loser = PlayerId::new(m.loser_name.clone());

        let record = if swap {
            swapped += 1;
            MatchRecord {
                date: m.tourney_date,
                surface: Surface::parse(m.surface.as_deref()),
                tourney_level: m.tourney_level.clone(),
                player1: loser,
                player2: winner,
                p1_rank: l_rank,
                p2_rank: w_rank,
                p1_age: l_age,
                p2_age: w_age,
                p1_won: false,
                p1_tally: winner_tally.mirrored(),
            }
        } else {
            MatchRecord {
                date: m.tourney_date,
                surface: Surface::parse(m.surface.as_deref()),
                tourney_level: m.tourney_level.clone(),
                player1: winner,
                player2: loser,
                p1_rank: w_rank,
                p2_rank: l_rank,
                p1_age: w_age,
                p2_age: l_age,
                p1_won: true,
                p1_tally: winner_tally,
            }
        };
        out.push(record);
    }

    debug!(rows = out.len(), swapped, "preprocessed raw matches");
    Ok(out)
}

fn median(values: impl Iterator<Item = f64>) -> f64 {
    let mut v = values.filter(|x| !x.is_nan()).collect::<Vec<_>>();
    if v.is_empty() {
        return 0.0;
    }
    v.sort_by(|a, b| a.total_cmp(b));
    let mid = v.len() / 2;
    if v.len() % 2 == 0 {
        (v[mid - 1] + v[mid]) / 2.0
    } else {
        v[mid]
    }
}
