use std::collections::BTreeMap;
use std::ops::Range;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FeatureError;
use crate::records::{GameTally, MatchRecord, PlayerId, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormMetric {
    WinRate,
    GamesWon,
    GamesLost,
    SetsWon,
    SetsLost,
}

pub const FORM_METRICS: [FormMetric; 5] = [
    FormMetric::WinRate,
    FormMetric::GamesWon,
    FormMetric::GamesLost,
    FormMetric::SetsWon,
    FormMetric::SetsLost,
];

impl FormMetric {
    pub fn column_stem(self) -> &'static str {
        match self {
            FormMetric::WinRate => "recent_win_rate",
            FormMetric::GamesWon => "recent_games_won_avg",
            FormMetric::GamesLost => "recent_games_lost_avg",
            FormMetric::SetsWon => "recent_sets_won_avg",
            FormMetric::SetsLost => "recent_sets_lost_avg",
        }
    }

    fn slot(self) -> usize {
        match self {
            FormMetric::WinRate => 0,
            FormMetric::GamesWon => 1,
            FormMetric::GamesLost => 2,
            FormMetric::SetsWon => 3,
            FormMetric::SetsLost => 4,
        }
    }
}

/// One player's outcome in one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSample {
    pub won: bool,
    pub tally: GameTally,
}

impl FormSample {
    fn metrics(&self) -> [u64; 5] {
        [
            u64::from(self.won),
            self.tally.games_won as u64,
            self.tally.games_lost as u64,
            self.tally.sets_won as u64,
            self.tally.sets_lost as u64,
        ]
    }
}

/// Trailing means for one window size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowForm {
    pub window: usize,
    pub win_rate: f64,
    pub games_won_avg: f64,
    pub games_lost_avg: f64,
    pub sets_won_avg: f64,
    pub sets_lost_avg: f64,
}

impl WindowForm {
    fn from_means(window: usize, means: [f64; 5]) -> Self {
        Self {
            window,
            win_rate: means[0],
            games_won_avg: means[1],
            games_lost_avg: means[2],
            sets_won_avg: means[3],
            sets_lost_avg: means[4],
        }
    }

    pub fn metric(&self, metric: FormMetric) -> f64 {
        match metric {
            FormMetric::WinRate => self.win_rate,
            FormMetric::GamesWon => self.games_won_avg,
            FormMetric::GamesLost => self.games_lost_avg,
            FormMetric::SetsWon => self.sets_won_avg,
            FormMetric::SetsLost => self.sets_lost_avg,
        }
    }
}

/// Rolling form for both sides of one match, one entry per configured window.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchForm {
    pub p1: Vec<WindowForm>,
    pub p2: Vec<WindowForm>,
}

impl MatchForm {
    pub fn side(&self, role: Role) -> &[WindowForm] {
        match role {
            Role::Player1 => &self.p1,
            Role::Player2 => &self.p2,
        }
    }

    pub fn window(&self, role: Role, window: usize) -> Option<&WindowForm> {
        self.side(role).iter().find(|f| f.window == window)
    }
}

#[derive(Debug, Clone)]
struct PlayerEvent {
    player: PlayerId,
    date: NaiveDate,
    match_index: usize,
    role: Role,
    sample: FormSample,
}

#[derive(Debug, Clone)]
pub struct RollingOutput {
    pub per_match: Vec<MatchForm>,
    pub snapshot: FormSnapshot,
}

/// Multi-window recent-form calculator.
///
/// Works in two phases over a chronologically ordered match slice: every
/// match is exploded into one event per player, events are grouped per
/// player, and each group is windowed independently (in parallel). A
/// player's own match never contributes to its own features.
///
/// Cold-start rows (no prior match) get `default_win_pct` for the win rate
/// and, for the magnitude metrics, the mean of every defined rolling value
/// of that metric and window across the whole dataset. That fallback is
/// computed from the full pass, so early rows see a dataset-wide constant
/// that later matches contributed to.
#[derive(Debug, Clone)]
pub struct RollingForm {
    windows: Vec<usize>,
    default_win_pct: f64,
}

impl RollingForm {
    pub fn new(windows: &[usize], default_win_pct: f64) -> Result<Self, FeatureError> {
        if windows.is_empty() {
            return Err(FeatureError::EmptyWindowSet);
        }
        if windows.contains(&0) {
            return Err(FeatureError::ZeroWindow);
        }
        Ok(Self {
            windows: windows.to_vec(),
            default_win_pct,
        })
    }

    pub fn windows(&self) -> &[usize] {
        &self.windows
    }

    /// `matches` must already be in `(date, ingestion)` order; the slice
    /// position is the tie-break index.
    pub fn compute(&self, matches: &[MatchRecord]) -> RollingOutput {
        let mut events = explode(matches);
        events.sort_by(|a, b| {
            a.player
                .cmp(&b.player)
                .then(a.date.cmp(&b.date))
                .then(a.match_index.cmp(&b.match_index))
        });
        let groups = player_groups(&events);

        let raw: Vec<Vec<Vec<Option<[f64; 5]>>>> = groups
            .par_iter()
            .map(|range| self.window_group(&events[range.clone()]))
            .collect();
        let raw: Vec<Vec<Option<[f64; 5]>>> = raw.into_iter().flatten().collect();

        let fallback = self.fallback_means(&raw);

        let mut per_match = vec![MatchForm::default(); matches.len()];
        for (event, values) in events.iter().zip(&raw) {
            let forms = self
                .windows
                .iter()
                .zip(values)
                .zip(&fallback)
                .map(|((window, value), fb)| WindowForm::from_means(*window, value.unwrap_or(*fb)))
                .collect::<Vec<_>>();
            let slot = &mut per_match[event.match_index];
            match event.role {
                Role::Player1 => slot.p1 = forms,
                Role::Player2 => slot.p2 = forms,
            }
        }

        let snapshot = self.trailing_snapshot(&events, &groups, fallback);
        debug!(
            events = events.len(),
            players = groups.len(),
            "computed rolling form"
        );
        RollingOutput {
            per_match,
            snapshot,
        }
    }

    fn window_group(&self, group: &[PlayerEvent]) -> Vec<Vec<Option<[f64; 5]>>> {
        let prefix = prefix_sums(group.iter().map(|e| &e.sample));
        (0..group.len())
            .map(|i| {
                self.windows
                    .iter()
                    .map(|w| trailing_mean(&prefix, i, *w))
                    .collect()
            })
            .collect()
    }

    // Sequential sum in sorted event order keeps the result independent of
    // how the groups were scheduled.
    fn fallback_means(&self, raw: &[Vec<Option<[f64; 5]>>]) -> Vec<[f64; 5]> {
        (0..self.windows.len())
            .map(|w_idx| {
                let mut sums = [0.0_f64; 5];
                let mut count = 0usize;
                for means in raw.iter().filter_map(|per_window| per_window[w_idx]) {
                    for (sum, v) in sums.iter_mut().zip(means) {
                        *sum += v;
                    }
                    count += 1;
                }
                let mut out = [0.0_f64; 5];
                if count > 0 {
                    for (o, sum) in out.iter_mut().zip(sums) {
                        *o = sum / count as f64;
                    }
                }
                out[FormMetric::WinRate.slot()] = self.default_win_pct;
                out
            })
            .collect()
    }

    fn trailing_snapshot(
        &self,
        events: &[PlayerEvent],
        groups: &[Range<usize>],
        fallback: Vec<[f64; 5]>,
    ) -> FormSnapshot {
        let keep = self.windows.iter().copied().max().unwrap_or(0);
        let mut players = BTreeMap::new();
        for range in groups {
            let group = &events[range.clone()];
            let start = group.len().saturating_sub(keep);
            let Some(first) = group.first() else {
                continue;
            };
            players.insert(
                first.player.clone(),
                group[start..].iter().map(|e| e.sample).collect(),
            );
        }
        FormSnapshot {
            windows: self.windows.clone(),
            fallback: self
                .windows
                .iter()
                .zip(fallback)
                .map(|(w, means)| WindowForm::from_means(*w, means))
                .collect(),
            players,
        }
    }
}

/// The last `max(windows)` samples of every player plus the cold-start
/// fallback, enough to compute form for a match after the dataset ends.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormSnapshot {
    pub windows: Vec<usize>,
    pub fallback: Vec<WindowForm>,
    pub players: BTreeMap<PlayerId, Vec<FormSample>>,
}

impl FormSnapshot {
    pub fn form_for(&self, player: &PlayerId) -> Vec<WindowForm> {
        let history = self.players.get(player).map(Vec::as_slice).unwrap_or(&[]);
        let prefix = prefix_sums(history.iter());
        self.windows
            .iter()
            .zip(&self.fallback)
            .map(|(w, fb)| match trailing_mean(&prefix, history.len(), *w) {
                Some(means) => WindowForm::from_means(*w, means),
                None => *fb,
            })
            .collect()
    }

    pub fn history_len(&self, player: &PlayerId) -> usize {
        self.players.get(player).map_or(0, Vec::len)
    }
}

fn explode(matches: &[MatchRecord]) -> Vec<PlayerEvent> {
    let mut events = Vec::with_capacity(matches.len() * 2);
    for (match_index, m) in matches.iter().enumerate() {
        for role in [Role::Player1, Role::Player2] {
            events.push(PlayerEvent {
                player: m.player(role).clone(),
                date: m.date,
                match_index,
                role,
                sample: FormSample {
                    won: m.won(role),
                    tally: m.tally(role),
                },
            });
        }
    }
    events
}

fn player_groups(events: &[PlayerEvent]) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    let mut start = 0usize;
    for i in 1..=events.len() {
        if i == events.len() || events[i].player != events[start].player {
            if i > start {
                out.push(start..i);
            }
            start = i;
        }
    }
    out
}

// prefix[i] = element-wise sum of the first i samples; integer sums stay exact.
fn prefix_sums<'a>(samples: impl Iterator<Item = &'a FormSample>) -> Vec<[u64; 5]> {
    let mut out = vec![[0u64; 5]];
    let mut acc = [0u64; 5];
    for s in samples {
        for (a, v) in acc.iter_mut().zip(s.metrics()) {
            *a += v;
        }
        out.push(acc);
    }
    out
}

/// Mean over samples `[max(0, i - window), i)`; `None` when that range is empty.
fn trailing_mean(prefix: &[[u64; 5]], i: usize, window: usize) -> Option<[f64; 5]> {
    let lo = i.saturating_sub(window);
    let n = i - lo;
    if n == 0 {
        return None;
    }
    let mut out = [0.0_f64; 5];
    for (k, o) in out.iter_mut().enumerate() {
        *o = (prefix[i][k] - prefix[lo][k]) as f64 / n as f64;
    }
    Some(out)
}
