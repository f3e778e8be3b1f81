use chrono::NaiveDate;

use atp_features::records::{GameTally, MatchRecord, PlayerId, Role, Surface};
use atp_features::rolling_form::RollingForm;
use atp_features::{FeatureConfig, assemble};

// Player A plays six days in a row, alternating roles:
// W, L, L, W, W, L with games won 12, 0, 6, 15, 12, 8.
fn player_a_matches() -> Vec<MatchRecord> {
    let p1 = ["A", "B", "A", "C", "A", "D"];
    let p2 = ["X", "A", "Y", "A", "Z", "A"];
    let p1_won = [true, true, false, false, true, true];
    let games_won = [12, 12, 6, 10, 12, 12];
    let games_lost = [8, 0, 12, 15, 8, 8];
    let sets_won = [2, 2, 0, 1, 2, 2];
    let sets_lost = [0, 0, 2, 2, 0, 0];

    (0..6)
        .map(|i| MatchRecord {
            date: NaiveDate::from_ymd_opt(2023, 1, 1 + i as u32).unwrap(),
            surface: Surface::Hard,
            tourney_level: None,
            player1: p1[i].into(),
            player2: p2[i].into(),
            p1_rank: 10.0,
            p2_rank: 10.0,
            p1_age: 25.0,
            p2_age: 25.0,
            p1_won: p1_won[i],
            p1_tally: GameTally {
                games_won: games_won[i],
                games_lost: games_lost[i],
                sets_won: sets_won[i],
                sets_lost: sets_lost[i],
            },
        })
        .collect()
}

#[test]
fn five_match_window_for_match_six() {
    let out = RollingForm::new(&[5, 10], 0.5)
        .unwrap()
        .compute(&player_a_matches());
    let m6 = &out.per_match[5];
    let a = m6.window(Role::Player2, 5).expect("window 5");
    assert!((a.win_rate - 0.6).abs() < 1e-12);
    assert!((a.games_won_avg - 9.0).abs() < 1e-12);
    assert!((a.games_lost_avg - 10.0).abs() < 1e-12);
    assert!((a.sets_won_avg - 1.2).abs() < 1e-12);

    // Only five priors exist, so the 10-window shrinks to the same matches.
    let a10 = m6.window(Role::Player2, 10).expect("window 10");
    assert_eq!(a10.win_rate, a.win_rate);
    assert_eq!(a10.games_won_avg, a.games_won_avg);
}

#[test]
fn short_window_drops_oldest_matches() {
    let out = RollingForm::new(&[2], 0.5)
        .unwrap()
        .compute(&player_a_matches());
    // Priors for match 6 are matches 4 and 5: both wins, 15 and 12 games.
    let a = &out.per_match[5].p2[0];
    assert_eq!(a.window, 2);
    assert_eq!(a.win_rate, 1.0);
    assert_eq!(a.games_won_avg, 13.5);
    // Match 2 has a single prior in its window.
    let a2 = &out.per_match[1].p2[0];
    assert_eq!(a2.win_rate, 1.0);
    assert_eq!(a2.games_won_avg, 12.0);

    // The snapshot keeps only the last two samples: matches 5 and 6.
    let a_id = PlayerId::from("A");
    assert_eq!(out.snapshot.history_len(&a_id), 2);
    let kept = &out.snapshot.players[&a_id];
    assert!(kept[0].won && !kept[1].won);
    assert_eq!(kept[0].tally.games_won, 12);
    assert_eq!(kept[1].tally.games_won, 8);
}

#[test]
fn same_day_matches_see_earlier_ingested_ones() {
    let day = NaiveDate::from_ymd_opt(2023, 3, 4).unwrap();
    let mut first = player_a_matches()[0].clone();
    first.date = day;
    let mut second = player_a_matches()[2].clone();
    second.date = day;
    let mut later = player_a_matches()[1].clone();
    later.date = day.succ_opt().unwrap();

    // Input order is not chronological; the date sort is stable.
    let out = assemble(&[later, first, second], &FeatureConfig::default()).unwrap();
    let rows = &out.table.rows;
    assert_eq!(rows[0].player2.as_str(), "X");
    assert_eq!(rows[1].player2.as_str(), "Y");

    // A's second match that day sees the first (a 12-8 win) and only it.
    let a = rows[1].form.window(Role::Player1, 5).unwrap();
    assert_eq!(a.win_rate, 1.0);
    assert_eq!(a.games_won_avg, 12.0);
    assert_eq!(a.games_lost_avg, 8.0);

    // The next day A has both same-day results behind it.
    let a = rows[2].form.window(Role::Player2, 5).unwrap();
    assert_eq!(a.win_rate, 0.5);
    assert_eq!(a.games_won_avg, 9.0);
}

#[test]
fn first_match_uses_neutral_and_population_defaults() {
    let out = assemble(&player_a_matches(), &FeatureConfig::default()).unwrap();
    let m1 = &out.table.rows[0];
    let a = m1.form.window(Role::Player1, 5).unwrap();
    assert_eq!(a.win_rate, 0.5);
    assert_ne!(a.games_won_avg, 12.0);

    // Only A has rolling values; their games-won means are 12, 6, 6, 8.25, 9.
    assert_eq!(a.games_won_avg, 8.25);
    let x = m1.form.window(Role::Player2, 5).unwrap();
    assert_eq!(x.games_won_avg, 8.25);
    assert_eq!(x.win_rate, 0.5);

    assert_eq!(m1.p1_surface_win_pct, 0.5);
    assert_eq!(m1.p2_surface_win_pct, 0.5);
    assert_eq!(m1.h2h_diff, 0);
}

#[test]
fn rolling_columns_follow_identity_across_roles() {
    let out = assemble(&player_a_matches(), &FeatureConfig::default()).unwrap();
    // A is player1 in match 3 and player2 in match 4.
    let m3 = out.table.rows[2].form.window(Role::Player1, 5).unwrap();
    let m4 = out.table.rows[3].form.window(Role::Player2, 5).unwrap();
    assert_eq!(m3.win_rate, 0.5);
    assert!((m4.win_rate - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(m4.games_won_avg, 6.0);
}
