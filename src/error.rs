use thiserror::Error;

use crate::records::PlayerId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeatureError {
    #[error("match {match_index}: {player} appears in both roles")]
    SamePlayerBothRoles { match_index: usize, player: PlayerId },

    #[error("no form windows configured")]
    EmptyWindowSet,

    #[error("form window must be at least 1 match")]
    ZeroWindow,
}
