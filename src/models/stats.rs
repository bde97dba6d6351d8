//! Derived statistics models.
//!
//! These are pure views over a player's match records; they are recomputed
//! from scratch on every request.

use serde::{Deserialize, Serialize};

/// One line of the win-loss index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRow {
    /// Grouping heading, e.g. "Pressure points".
    pub category: String,

    /// Named metric, e.g. "Tie breaks".
    pub stat: String,

    pub wins: u32,
    pub losses: u32,

    /// Only present for rows that track titles.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub titles: Option<u32>,

    /// wins / (wins + losses), 0 when nothing qualifies.
    pub value: f64,
}

/// One line of the serve/return stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointStatRow {
    pub stat: String,

    /// `value` is a rounded percentage rather than a count.
    pub percent: bool,

    pub value: u64,
}

/// Win-loss string plus title count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WlCell {
    pub wl: String,
    pub titles: u32,
}

/// Singles/doubles pair of cells for the total and main-draw tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WlTier {
    pub singles: WlCell,
    pub doubles: WlCell,
}

/// Qualifying keeps only the win-loss strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WlQualifying {
    pub singles: String,
    pub doubles: String,
}

/// Win-loss breakdown for one level ("Total", "Tour", "Challenger", "ITF").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WlSummary {
    pub label: String,
    pub total: WlTier,
    pub main: WlTier,
    pub qualifying: WlQualifying,
}

/// Country as stored on a REPRESENTS relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub alpha2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub continent: Option<String>,
}

/// Basic identity of a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub country: Option<Country>,
}

/// Head-to-head record against one opponent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct H2hSummary {
    pub opponent: Person,
    pub matches: u32,
    pub wins: u32,
}

/// Row of the paginated player listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerListing {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub country: Option<Country>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tour: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub min_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_year: Option<i32>,
}
