use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Court surface. Any label outside the main three keeps its own bucket;
/// only a missing or blank label is `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Surface {
    Hard,
    Clay,
    Grass,
    Other(String),
    Unknown,
}

impl Surface {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Surface::Unknown;
        };
        match raw.to_ascii_lowercase().as_str() {
            "hard" => Surface::Hard,
            "clay" => Surface::Clay,
            "grass" => Surface::Grass,
            "unknown" => Surface::Unknown,
            _ => Surface::Other(raw.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Surface::Hard => "Hard",
            Surface::Clay => "Clay",
            Surface::Grass => "Grass",
            Surface::Other(label) => label,
            Surface::Unknown => "Unknown",
        }
    }
}

impl From<String> for Surface {
    fn from(value: String) -> Self {
        Surface::parse(Some(&value))
    }
}

impl From<Surface> for String {
    fn from(value: Surface) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameTally {
    pub games_won: u32,
    pub games_lost: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
}

impl GameTally {
    pub fn mirrored(self) -> Self {
        Self {
            games_won: self.games_lost,
            games_lost: self.games_won,
            sets_won: self.sets_lost,
            sets_lost: self.sets_won,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Player1,
    Player2,
}

/// One match oriented as player1 vs player2, after role randomisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub date: NaiveDate,
    pub surface: Surface,
    pub tourney_level: Option<String>,
    pub player1: PlayerId,
    pub player2: PlayerId,
    pub p1_rank: f64,
    pub p2_rank: f64,
    pub p1_age: f64,
    pub p2_age: f64,
    pub p1_won: bool,
    pub p1_tally: GameTally,
}

impl MatchRecord {
    pub fn p2_tally(&self) -> GameTally {
        self.p1_tally.mirrored()
    }

    pub fn winner(&self) -> &PlayerId {
        if self.p1_won {
            &self.player1
        } else {
            &self.player2
        }
    }

    pub fn loser(&self) -> &PlayerId {
        if self.p1_won {
            &self.player2
        } else {
            &self.player1
        }
    }

    pub fn player(&self, role: Role) -> &PlayerId {
        match role {
            Role::Player1 => &self.player1,
            Role::Player2 => &self.player2,
        }
    }

    pub fn won(&self, role: Role) -> bool {
        match role {
            Role::Player1 => self.p1_won,
            Role::Player2 => !self.p1_won,
        }
    }

    pub fn tally(&self, role: Role) -> GameTally {
        match role {
            Role::Player1 => self.p1_tally,
            Role::Player2 => self.p2_tally(),
        }
    }

    /// The same match with the two roles exchanged and the target negated.
    pub fn swapped_roles(&self) -> Self {
        Self {
            date: self.date,
            surface: self.surface.clone(),
            tourney_level: self.tourney_level.clone(),
            player1: self.player2.clone(),
            player2: self.player1.clone(),
            p1_rank: self.p2_rank,
            p2_rank: self.p1_rank,
            p1_age: self.p2_age,
            p2_age: self.p1_age,
            p1_won: !self.p1_won,
            p1_tally: self.p2_tally(),
        }
    }
}
