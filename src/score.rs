use crate::records::GameTally;

const SKIP_MARKERS: &[&str] = &["RET", "W/O", "def."];

/// Games and sets from the official winner's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreTally {
    pub winner_games: u32,
    pub loser_games: u32,
    pub winner_sets: u32,
    pub loser_sets: u32,
}

impl ScoreTally {
    pub fn for_winner(self) -> GameTally {
        GameTally {
            games_won: self.winner_games,
            games_lost: self.loser_games,
            sets_won: self.winner_sets,
            sets_lost: self.loser_sets,
        }
    }

    fn with_set(self, w: u32, l: u32) -> Option<Self> {
        Some(Self {
            winner_games: self.winner_games.checked_add(w)?,
            loser_games: self.loser_games.checked_add(l)?,
            winner_sets: self.winner_sets + u32::from(w > l),
            loser_sets: self.loser_sets + u32::from(l > w),
        })
    }
}

/// Parses scores like `6-4 3-6 7-6(5)`. Bad tokens contribute nothing,
/// including a set whose games would overflow the running totals.
pub fn parse_match_score(score: &str) -> ScoreTally {
    let mut out = ScoreTally::default();
    for token in score.split_whitespace() {
        if SKIP_MARKERS.iter().any(|m| token.contains(m)) {
            continue;
        }
        let Some((w, l)) = parse_set(token) else {
            continue;
        };
        if let Some(next) = out.with_set(w, l) {
            out = next;
        }
    }
    out
}

fn parse_set(token: &str) -> Option<(u32, u32)> {
    let games = token.split('(').next().unwrap_or(token);
    let mut parts = games.split('-');
    let w = parts.next()?.trim().parse::<u32>().ok()?;
    let l = parts.next()?.trim().parse::<u32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((w, l))
}
