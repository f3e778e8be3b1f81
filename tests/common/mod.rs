#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use atp_features::records::{GameTally, MatchRecord, Surface};

pub const PLAYERS: &[&str] = &[
    "Alcaraz", "Djokovic", "Medvedev", "Rublev", "Ruud", "Sinner", "Tsitsipas", "Zverev",
];

/// A chronologically ordered season with several same-day matches.
pub fn synthetic_season(n: usize, seed: u64) -> Vec<MatchRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    let surfaces = [Surface::Hard, Surface::Clay, Surface::Grass, Surface::Unknown];
    let mut day = 0i64;

    (0..n)
        .map(|_| {
            if rng.gen_bool(0.4) {
                day += rng.gen_range(1..4);
            }
            let a = rng.gen_range(0..PLAYERS.len());
            let mut b = rng.gen_range(0..PLAYERS.len() - 1);
            if b >= a {
                b += 1;
            }
            let sets_won = 2;
            let sets_lost = rng.gen_range(0..2);
            let games_won = 12 + rng.gen_range(0..4);
            let games_lost = rng.gen_range(0..10) + 4 * sets_lost;
            let p1_won = rng.gen_bool(0.5);
            let winner_tally = GameTally {
                games_won,
                games_lost,
                sets_won,
                sets_lost,
            };
            MatchRecord {
                date: start + Duration::days(day),
                surface: surfaces[rng.gen_range(0..surfaces.len())].clone(),
                tourney_level: Some("A".to_string()),
                player1: PLAYERS[a].into(),
                player2: PLAYERS[b].into(),
                p1_rank: rng.gen_range(1..200) as f64,
                p2_rank: rng.gen_range(1..200) as f64,
                p1_age: 20.0 + rng.gen_range(0..15) as f64,
                p2_age: 20.0 + rng.gen_range(0..15) as f64,
                p1_won,
                p1_tally: if p1_won {
                    winner_tally
                } else {
                    winner_tally.mirrored()
                },
            }
        })
        .collect()
}
