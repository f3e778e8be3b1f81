mod common;

use atp_features::{FeatureConfig, assemble};

use common::synthetic_season;

#[test]
fn swapping_roles_moves_features_with_the_player() {
    let season = synthetic_season(200, 17);
    let cfg = FeatureConfig::default();
    let base = assemble(&season, &cfg).unwrap();

    // Swap every third match.
    let swapped_input = season
        .iter()
        .enumerate()
        .map(|(i, m)| if i % 3 == 0 { m.swapped_roles() } else { m.clone() })
        .collect::<Vec<_>>();
    let swapped = assemble(&swapped_input, &cfg).unwrap();

    for (i, (a, b)) in base.table.rows.iter().zip(&swapped.table.rows).enumerate() {
        if i % 3 == 0 {
            assert_eq!(a.player1, b.player2);
            assert_eq!(a.h2h_diff, -b.h2h_diff, "row {i}");
            assert_eq!(a.p1_surface_win_pct, b.p2_surface_win_pct);
            assert_eq!(a.p2_surface_win_pct, b.p1_surface_win_pct);
            assert_eq!(a.form.p1, b.form.p2);
            assert_eq!(a.form.p2, b.form.p1);
            assert_eq!(a.target, 1 - b.target);
        } else {
            assert_eq!(a, b, "row {i}");
        }
    }
    assert_eq!(base.snapshot, swapped.snapshot);
}
