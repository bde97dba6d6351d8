//! Row decoding: normalized graph rows into domain models.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::graph::{GraphValue, Row};
use crate::models::{
    ChampionMatch, Draw, Environment, H2hSummary, Handedness, MatchRecord, MatchType, Opponent,
    Person, PlayerListing, PointStats, Round, SetScores, Surface, Tour,
};
use crate::normalize::{normalize_field, normalize_value};

/// A row did not fit the model it was decoded into.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("row {row}: missing field '{field}'")]
    MissingField { row: usize, field: &'static str },

    #[error("row {row}: {source}")]
    Shape {
        row: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Label used for former coaches whose tenure is unknown.
pub const FORMER_COACH_YEARS: &str = "Former";

#[derive(Debug, Default, Deserialize)]
struct RawSets {
    s1: Option<i64>,
    s2: Option<i64>,
    s3: Option<i64>,
    s4: Option<i64>,
    s5: Option<i64>,
}

impl From<RawSets> for SetScores {
    fn from(raw: RawSets) -> Self {
        SetScores::new([
            lenient_int("s1", raw.s1),
            lenient_int("s2", raw.s2),
            lenient_int("s3", raw.s3),
            lenient_int("s4", raw.s4),
            lenient_int("s5", raw.s5),
        ])
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawOpponent {
    #[serde(flatten)]
    score: RawSets,
    rh: Option<String>,
    rank: Option<i64>,
}

/// Counters as stored on a score node.
#[derive(Debug, Default, Deserialize)]
struct RawPointStats {
    aces: Option<i64>,
    dfs: Option<i64>,
    serve1: Option<i64>,
    serve2: Option<i64>,
    serve1_w: Option<i64>,
    serve2_w: Option<i64>,
    bps_faced: Option<i64>,
    bps_saved: Option<i64>,
    serve_games: Option<i64>,
    ret1: Option<i64>,
    ret2: Option<i64>,
    ret1_w: Option<i64>,
    ret2_w: Option<i64>,
    bp_opps: Option<i64>,
    bps_converted: Option<i64>,
    return_games: Option<i64>,
}

impl From<RawPointStats> for PointStats {
    fn from(raw: RawPointStats) -> Self {
        let count =
            |field: &str, value: Option<i64>| lenient_int::<u32>(field, value).unwrap_or(0);
        PointStats {
            aces: count("aces", raw.aces),
            double_faults: count("dfs", raw.dfs),
            serve1: count("serve1", raw.serve1),
            serve2: count("serve2", raw.serve2),
            serve1_won: count("serve1_w", raw.serve1_w),
            serve2_won: count("serve2_w", raw.serve2_w),
            break_points_faced: count("bps_faced", raw.bps_faced),
            break_points_saved: count("bps_saved", raw.bps_saved),
            service_games: count("serve_games", raw.serve_games),
            return1: count("ret1", raw.ret1),
            return2: count("ret2", raw.ret2),
            return1_won: count("ret1_w", raw.ret1_w),
            return2_won: count("ret2_w", raw.ret2_w),
            break_point_chances: count("bp_opps", raw.bp_opps),
            break_points_converted: count("bps_converted", raw.bps_converted),
            return_games: count("return_games", raw.return_games),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawMatch {
    #[serde(rename = "type")]
    match_type: MatchType,
    draw: Draw,
    round: Option<String>,
    won: bool,
    tour: Option<String>,
    #[serde(default)]
    labels: Vec<String>,
    category: Option<String>,
    surface: Option<String>,
    environment: Option<String>,
    year: Option<i32>,
    #[serde(default = "default_best_of")]
    best_of: u8,
    #[serde(default)]
    score: RawSets,
    #[serde(default)]
    opponent: RawOpponent,
    #[serde(default)]
    points: RawPointStats,
}

fn default_best_of() -> u8 {
    3
}

/// Parse an open-vocabulary graph label, dropping values outside the enum.
fn lenient<T: std::str::FromStr>(field: &str, value: Option<String>) -> Option<T> {
    let value = value?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            debug!(field, value = %value, "Ignoring unrecognized label");
            None
        }
    }
}

/// Narrow a graph integer, dropping values the model cannot hold.
fn lenient_int<T: TryFrom<i64>>(field: &str, value: Option<i64>) -> Option<T> {
    let value = value?;
    match T::try_from(value) {
        Ok(narrowed) => Some(narrowed),
        Err(_) => {
            debug!(field, value, "Ignoring out-of-range integer");
            None
        }
    }
}

impl From<RawMatch> for MatchRecord {
    fn from(raw: RawMatch) -> Self {
        MatchRecord {
            match_type: raw.match_type,
            draw: raw.draw,
            round: lenient::<Round>("round", raw.round),
            won: raw.won,
            tour: lenient::<Tour>("tour", raw.tour),
            labels: raw.labels,
            category: raw.category,
            surface: lenient::<Surface>("surface", raw.surface),
            environment: lenient::<Environment>("environment", raw.environment),
            year: raw.year,
            best_of: raw.best_of,
            score: raw.score.into(),
            opponent: Opponent {
                score: raw.opponent.score.into(),
                handedness: lenient::<Handedness>("rh", raw.opponent.rh),
                rank: lenient_int("rank", raw.opponent.rank),
            },
            points: raw.points.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawChampionMatch {
    edition: i64,
    year: i32,
    #[serde(rename = "type")]
    match_type: MatchType,
    tour: Option<String>,
    #[serde(default)]
    team: Vec<Person>,
    #[serde(default)]
    score: RawSets,
    #[serde(default)]
    opponent: RawSets,
}

impl From<RawChampionMatch> for ChampionMatch {
    fn from(raw: RawChampionMatch) -> Self {
        ChampionMatch {
            edition: raw.edition,
            year: raw.year,
            match_type: raw.match_type,
            tour: lenient::<Tour>("tour", raw.tour),
            team: raw.team,
            score: raw.score.into(),
            opponent: raw.opponent.into(),
        }
    }
}

fn from_json<T: DeserializeOwned>(row: usize, value: Value) -> Result<T, DecodeError> {
    serde_json::from_value(value).map_err(|source| DecodeError::Shape { row, source })
}

/// Decode the `match` column of every row, skipping rows where it is null.
pub fn decode_match_records(rows: &[Row]) -> Result<Vec<MatchRecord>, DecodeError> {
    rows.iter()
        .enumerate()
        .filter_map(|(i, row)| match row.get("match") {
            None => Some(Err(DecodeError::MissingField {
                row: i,
                field: "match",
            })),
            Some(GraphValue::Null) => None,
            Some(value) => Some(from_json::<RawMatch>(i, normalize_value(value)).map(Into::into)),
        })
        .collect()
}

/// Decode the `champion_match` column of every row.
pub fn decode_champion_matches(rows: &[Row]) -> Result<Vec<ChampionMatch>, DecodeError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| match normalize_field(row, "champion_match") {
            Value::Null => Err(DecodeError::MissingField {
                row: i,
                field: "champion_match",
            }),
            value => from_json::<RawChampionMatch>(i, value).map(Into::into),
        })
        .collect()
}

/// Decode `opponent`, `matches`, `wins` rows.
pub fn decode_h2h(rows: &[Row]) -> Result<Vec<H2hSummary>, DecodeError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let opponent: Person = from_json(i, normalize_field(row, "opponent"))?;
            let matches: u32 = from_json(i, normalize_field(row, "matches"))?;
            let wins: u32 = from_json(i, normalize_field(row, "wins"))?;
            Ok(H2hSummary {
                opponent,
                matches,
                wins,
            })
        })
        .collect()
}

/// Decode the `player` column of a listing page.
pub fn decode_player_listing(rows: &[Row]) -> Result<Vec<PlayerListing>, DecodeError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| from_json(i, normalize_field(row, "player")))
        .collect()
}

/// Read an integer `count` column from a single-row result. No rows is 0.
pub fn decode_count(rows: &[Row]) -> Result<u64, DecodeError> {
    match rows.first() {
        None => Ok(0),
        Some(row) => match normalize_field(row, "count") {
            Value::Null => Err(DecodeError::MissingField {
                row: 0,
                field: "count",
            }),
            value => from_json(0, value),
        },
    }
}

/// Decode the `player` column of the details query.
///
/// Former coaches are appended to `coaches`, with `years` set to "Former"
/// where the tenure is unknown, and `former_coaches` is removed.
pub fn decode_player_details(row: &Row) -> Result<Map<String, Value>, DecodeError> {
    let mut player = match normalize_field(row, "player") {
        Value::Object(map) => map,
        Value::Null => {
            return Err(DecodeError::MissingField {
                row: 0,
                field: "player",
            })
        }
        other => from_json(0, other)?,
    };

    let mut coaches = match player.remove("coaches") {
        Some(Value::Array(coaches)) => coaches,
        _ => Vec::new(),
    };
    if let Some(Value::Array(former)) = player.remove("former_coaches") {
        coaches.extend(former.into_iter().map(|mut coach| {
            if let Value::Object(ref mut fields) = coach {
                let has_years = fields
                    .get("years")
                    .is_some_and(|y| !y.is_null() && y.as_str() != Some(""));
                if !has_years {
                    fields.insert(
                        "years".to_string(),
                        Value::String(FORMER_COACH_YEARS.to_string()),
                    );
                }
            }
            coach
        }));
    }
    player.insert("coaches".to_string(), Value::Array(coaches));

    Ok(player)
}
