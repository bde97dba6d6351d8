//! Tournament champion records.

use serde::{Deserialize, Serialize};

use super::{MatchType, Person, SetScores, Tour};

/// One match played by the champion entry of an edition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChampionMatch {
    /// Edition id.
    pub edition: i64,
    pub year: i32,
    pub match_type: MatchType,
    pub tour: Option<Tour>,
    /// Players of the champion entry, one for singles.
    pub team: Vec<Person>,
    pub score: SetScores,
    pub opponent: SetScores,
}

/// Set and game totals of one champion's run through an edition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChampionScores {
    #[serde(rename = "type")]
    pub match_type: MatchType,
    pub tour: Option<Tour>,
    pub year: i32,
    /// Edition id.
    pub id: i64,
    pub team: Vec<Person>,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub games_won: u32,
    pub games_lost: u32,
}
