use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::records::PlayerId;

/// Wins stored against the canonical (lexicographic) order of the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PairRecord {
    pub wins_first: u32,
    pub wins_second: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HeadToHead {
    // first -> second -> record, with first < second
    pairs: BTreeMap<PlayerId, BTreeMap<PlayerId, PairRecord>>,
}

fn canonical<'a>(a: &'a PlayerId, b: &'a PlayerId) -> (&'a PlayerId, &'a PlayerId, bool) {
    if a <= b { (a, b, true) } else { (b, a, false) }
}

impl HeadToHead {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prior wins of `a` over `b` minus wins of `b` over `a`.
    pub fn diff(&self, a: &PlayerId, b: &PlayerId) -> i64 {
        let (first, second, a_is_first) = canonical(a, b);
        let Some(rec) = self.get_canonical(first, second) else {
            return 0;
        };
        let d = rec.wins_first as i64 - rec.wins_second as i64;
        if a_is_first { d } else { -d }
    }

    pub fn record(&mut self, winner: &PlayerId, loser: &PlayerId) {
        let (first, second, winner_is_first) = canonical(winner, loser);
        let rec = self
            .pairs
            .entry(first.clone())
            .or_default()
            .entry(second.clone())
            .or_default();
        if winner_is_first {
            rec.wins_first += 1;
        } else {
            rec.wins_second += 1;
        }
    }

    pub fn get(&self, a: &PlayerId, b: &PlayerId) -> Option<PairRecord> {
        let (first, second, _) = canonical(a, b);
        self.get_canonical(first, second)
    }

    fn get_canonical(&self, first: &PlayerId, second: &PlayerId) -> Option<PairRecord> {
        self.pairs.get(first)?.get(second).copied()
    }

    pub fn total_matches(&self) -> u64 {
        self.pairs
            .values()
            .flat_map(|inner| inner.values())
            .map(|rec| rec.wins_first as u64 + rec.wins_second as u64)
            .sum()
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.values().map(|inner| inner.len()).sum()
    }
}
