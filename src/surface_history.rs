use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_WIN_PCT;
use crate::records::{PlayerId, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WinRecord {
    pub wins: u32,
    pub total: u32,
}

/// Per-player, per-surface win counters built up in match order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceHistory {
    default_pct: f64,
    players: BTreeMap<PlayerId, BTreeMap<Surface, WinRecord>>,
}

impl Default for SurfaceHistory {
    fn default() -> Self {
        Self::new(DEFAULT_WIN_PCT)
    }
}

impl SurfaceHistory {
    pub fn new(default_pct: f64) -> Self {
        Self {
            default_pct,
            players: BTreeMap::new(),
        }
    }

    /// Historical win share on `surface`. Unknown surfaces and players with
    /// no matches there get the neutral default.
    pub fn win_pct(&self, player: &PlayerId, surface: &Surface) -> f64 {
        if *surface == Surface::Unknown {
            return self.default_pct;
        }
        match self.get(player, surface) {
            Some(rec) if rec.total > 0 => rec.wins as f64 / rec.total as f64,
            _ => self.default_pct,
        }
    }

    pub fn record(&mut self, player: &PlayerId, surface: &Surface, won: bool) {
        let rec = self
            .players
            .entry(player.clone())
            .or_default()
            .entry(surface.clone())
            .or_default();
        rec.total += 1;
        if won {
            rec.wins += 1;
        }
    }

    pub fn get(&self, player: &PlayerId, surface: &Surface) -> Option<WinRecord> {
        self.players.get(player)?.get(surface).copied()
    }

    pub fn total_matches(&self) -> u64 {
        self.players
            .values()
            .flat_map(|by_surface| by_surface.values())
            .map(|rec| rec.total as u64)
            .sum()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}
