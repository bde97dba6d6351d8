//! One player's participation in one scored match.

use serde::{Deserialize, Serialize};

use super::{Draw, Environment, Handedness, MatchType, Round, Surface, Tour};

/// Maximum number of sets in a match.
pub const MAX_SETS: usize = 5;

/// Games won in each set, `None` for a set that was not played.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetScores(pub [Option<u8>; MAX_SETS]);

impl SetScores {
    pub fn new(sets: [Option<u8>; MAX_SETS]) -> Self {
        Self(sets)
    }

    /// Build from a slice of played sets, in order. Extra sets are ignored.
    pub fn from_games(games: &[u8]) -> Self {
        let mut sets = [None; MAX_SETS];
        for (slot, g) in sets.iter_mut().zip(games) {
            *slot = Some(*g);
        }
        Self(sets)
    }

    /// Games won in set `n` (1-based).
    pub fn set(&self, n: usize) -> Option<u8> {
        n.checked_sub(1).and_then(|i| self.0.get(i).copied().flatten())
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<u8>> + '_ {
        self.0.iter().copied()
    }
}

/// Reduced projection of the player on the other side of the net.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Opponent {
    pub score: SetScores,
    pub handedness: Option<Handedness>,
    /// Entry ranking at the time of the match.
    pub rank: Option<u32>,
}

/// Serve and return point counters of one player in one match.
///
/// Absent counters are stored as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointStats {
    pub aces: u32,
    pub double_faults: u32,
    /// First serves in.
    pub serve1: u32,
    /// Second serves played.
    pub serve2: u32,
    pub serve1_won: u32,
    pub serve2_won: u32,
    pub break_points_faced: u32,
    pub break_points_saved: u32,
    pub service_games: u32,
    /// Points returned against a first serve.
    pub return1: u32,
    /// Points returned against a second serve.
    pub return2: u32,
    pub return1_won: u32,
    pub return2_won: u32,
    pub break_point_chances: u32,
    pub break_points_converted: u32,
    pub return_games: u32,
}

impl PointStats {
    /// Service games held, never below 0.
    pub fn service_games_held(&self) -> u32 {
        let broken = self
            .break_points_faced
            .saturating_sub(self.break_points_saved);
        self.service_games.saturating_sub(broken)
    }
}

/// A normalized match record. Built fresh per request, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_type: MatchType,
    pub draw: Draw,
    pub round: Option<Round>,
    pub won: bool,
    pub tour: Option<Tour>,
    /// Labels carried by the event node; ITF circuit markers live here.
    pub labels: Vec<String>,
    /// Free-text tournament category, e.g. "Grand Slam" or "ATP 500".
    pub category: Option<String>,
    pub surface: Option<Surface>,
    pub environment: Option<Environment>,
    pub year: Option<i32>,
    /// 3 or 5.
    pub best_of: u8,
    pub score: SetScores,
    pub opponent: Opponent,
    /// The player's own serve and return counters.
    pub points: PointStats,
}

impl MatchRecord {
    /// A singles main-draw match with no optional data attached.
    pub fn new(won: bool) -> Self {
        Self {
            match_type: MatchType::Singles,
            draw: Draw::Main,
            round: None,
            won,
            tour: None,
            labels: Vec::new(),
            category: None,
            surface: None,
            environment: None,
            year: None,
            best_of: 3,
            score: SetScores::default(),
            opponent: Opponent::default(),
            points: PointStats::default(),
        }
    }

    /// Won the final.
    pub fn is_title(&self) -> bool {
        self.won && self.round == Some(Round::Final)
    }

    /// Per-set (self, opponent) games, `None` where either side is missing.
    pub fn sets(&self) -> impl Iterator<Item = Option<(u8, u8)>> + '_ {
        self.score
            .iter()
            .zip(self.opponent.score.iter())
            .map(|(own, opp)| own.zip(opp))
    }

    pub fn with_match_type(mut self, match_type: MatchType) -> Self {
        self.match_type = match_type;
        self
    }

    pub fn with_draw(mut self, draw: Draw) -> Self {
        self.draw = draw;
        self
    }

    pub fn with_round(mut self, round: Round) -> Self {
        self.round = Some(round);
        self
    }

    pub fn with_tour(mut self, tour: Tour) -> Self {
        self.tour = Some(tour);
        self
    }

    pub fn with_labels(mut self, labels: &[&str]) -> Self {
        self.labels = labels.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_surface(mut self, surface: Surface, environment: Environment) -> Self {
        self.surface = Some(surface);
        self.environment = Some(environment);
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_best_of(mut self, best_of: u8) -> Self {
        self.best_of = best_of;
        self
    }

    /// Set scores as (self, opponent) pairs in play order.
    pub fn with_sets(mut self, sets: &[(u8, u8)]) -> Self {
        let own: Vec<u8> = sets.iter().map(|(a, _)| *a).collect();
        let opp: Vec<u8> = sets.iter().map(|(_, b)| *b).collect();
        self.score = SetScores::from_games(&own);
        self.opponent.score = SetScores::from_games(&opp);
        self
    }

    pub fn with_opponent(mut self, handedness: Option<Handedness>, rank: Option<u32>) -> Self {
        self.opponent.handedness = handedness;
        self.opponent.rank = rank;
        self
    }

    pub fn with_points(mut self, points: PointStats) -> Self {
        self.points = points;
        self
    }
}
