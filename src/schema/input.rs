//! Typed request filters parsed from JSON bodies and query strings.
//!
//! Bodies and query strings deserialize through serde into request structs.
//! Body fields are wrapped in [`Loose`] so a value of the wrong type is kept
//! for reporting instead of failing the whole body; a validation pass then
//! turns the request struct into a typed filter, collecting every issue.

use std::str::FromStr;

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::classify::ClassifiedMatch;
use crate::models::{Draw, Level, Surface, Tour};

use super::{Issues, ValidationErrors};

/// Largest page the player listing serves.
pub const MAX_PAGE_SIZE: u32 = 100;
const DEFAULT_PAGE_SIZE: u32 = 30;

/// First edition year the graph can hold.
pub const EARLIEST_YEAR: i32 = 1877;

const INVALID_YEAR: &str = "Please enter a valid year";
const INVALID_LEVEL: &str = "Please select a valid level";
const INVALID_DRAW: &str = "Please select a valid draw type";
const INVALID_TOUR: &str = "Please select a valid tour";
const INVALID_SURFACE: &str = "Please select a valid surface";
const REQUIRED: &str = "Required";

/// Latest accepted edition year: the season after the current one.
pub fn latest_year() -> i32 {
    Utc::now().year() + 1
}

fn valid_year(year: i64) -> Option<i32> {
    i32::try_from(year)
        .ok()
        .filter(|y| (EARLIEST_YEAR..=latest_year()).contains(y))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expected(what: &str, value: &Value) -> String {
    format!("Expected {}, received {}", what, kind(value))
}

/// A body field holding either its declared type or whatever was sent.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Loose<T> {
    Valid(T),
    Invalid(Value),
}

/// Deserialize a JSON object body into a request struct.
fn decode_body<'de, T: Deserialize<'de>>(body: &'de Value) -> Result<T, ValidationErrors> {
    if !body.is_object() {
        return Err(ValidationErrors(vec![expected("object", body)]));
    }
    T::deserialize(body).map_err(|e| ValidationErrors(vec![e.to_string()]))
}

fn required_id(id: Option<Loose<String>>, issues: &mut Issues) -> String {
    match id {
        Some(Loose::Valid(id)) if !id.trim().is_empty() => id.trim().to_string(),
        Some(Loose::Invalid(other)) => {
            issues.push("id", expected("string", &other));
            String::new()
        }
        _ => {
            issues.push("id", REQUIRED);
            String::new()
        }
    }
}

/// Optional scalar; a value of the wrong type reports `message`.
fn checked<T>(field: Option<Loose<T>>, key: &str, message: &str, issues: &mut Issues) -> Option<T> {
    match field? {
        Loose::Valid(value) => Some(value),
        Loose::Invalid(_) => {
            issues.push(key, message);
            None
        }
    }
}

fn year_field(field: Option<Loose<i64>>, key: &str, issues: &mut Issues) -> Option<i32> {
    let year = match field? {
        Loose::Valid(year) => valid_year(year),
        Loose::Invalid(_) => None,
    };
    if year.is_none() {
        issues.push(key, INVALID_YEAR);
    }
    year
}

/// Optional array; each item must deserialize and pass `check`.
fn checked_items<T, U>(
    field: Option<Loose<Vec<Loose<T>>>>,
    key: &str,
    message: &str,
    issues: &mut Issues,
    check: impl Fn(T) -> Option<U>,
) -> Vec<U> {
    match field {
        None => Vec::new(),
        Some(Loose::Invalid(other)) => {
            issues.push(key, expected("array", &other));
            Vec::new()
        }
        Some(Loose::Valid(items)) => items
            .into_iter()
            .enumerate()
            .filter_map(|(i, item)| {
                let parsed = match item {
                    Loose::Valid(value) => check(value),
                    Loose::Invalid(_) => None,
                };
                if parsed.is_none() {
                    issues.push(format!("{}.{}", key, i), message);
                }
                parsed
            })
            .collect(),
    }
}

/// Query-string value with blank strings treated as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn label_param<T: FromStr>(
    value: &Option<String>,
    key: &str,
    message: &str,
    issues: &mut Issues,
) -> Option<T> {
    let parsed = present(value)?.parse().ok();
    if parsed.is_none() {
        issues.push(key, message);
    }
    parsed
}

/// Comma-separated labels, e.g. `Tour,ITF`.
fn label_list<T: FromStr>(
    value: &Option<String>,
    key: &str,
    message: &str,
    issues: &mut Issues,
) -> Vec<T> {
    let Some(raw) = present(value) else {
        return Vec::new();
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .enumerate()
        .filter_map(|(i, s)| {
            let parsed = s.parse().ok();
            if parsed.is_none() {
                issues.push(format!("{}.{}", key, i), message);
            }
            parsed
        })
        .collect()
}

/// Edition years a query covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum YearFilter {
    #[default]
    Any,
    /// Exactly these years.
    Only(Vec<i32>),
    /// Inclusive range, sent to the store as bounds.
    Between { from: i32, to: i32 },
}

impl YearFilter {
    /// `Any` for an empty list; duplicates are dropped.
    pub fn from_years(mut years: Vec<i32>) -> Self {
        if years.is_empty() {
            return YearFilter::Any;
        }
        years.sort_unstable();
        years.dedup();
        YearFilter::Only(years)
    }
}

/// Filters over a player's match records.
///
/// Years are applied by the store. Levels, draw, tour and surfaces are
/// applied after classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchFilter {
    pub years: YearFilter,
    /// Empty means every level.
    pub levels: Vec<Level>,
    pub draw_type: Option<Draw>,
    pub tour: Option<Tour>,
    /// Empty means every surface.
    pub surfaces: Vec<Surface>,
}

impl MatchFilter {
    pub fn accepts(&self, m: &ClassifiedMatch) -> bool {
        (self.levels.is_empty() || self.levels.contains(&m.level))
            && self.draw_type.map_or(true, |d| m.record.draw == d)
            && self.tour.map_or(true, |t| m.record.tour == Some(t))
            && (self.surfaces.is_empty()
                || m.record.surface.is_some_and(|s| self.surfaces.contains(&s)))
    }
}

/// A player id plus match filters, shared by the win-loss index and the
/// serve/return stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerMatchQuery {
    pub id: String,
    pub filter: MatchFilter,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerMatchBody {
    id: Option<Loose<String>>,
    years: Option<Loose<Vec<Loose<i64>>>>,
    levels: Option<Loose<Vec<Loose<Level>>>>,
    draw_type: Option<Loose<Draw>>,
    tour: Option<Loose<Tour>>,
    surfaces: Option<Loose<Vec<Loose<Surface>>>>,
}

impl PlayerMatchQuery {
    /// Every year, level, draw, tour and surface.
    pub fn for_player(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            filter: MatchFilter::default(),
        }
    }

    /// Parse a `{id, years?, levels?, drawType?, tour?, surfaces?}` body.
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let body: PlayerMatchBody = decode_body(body)?;
        let mut issues = Issues::default();

        let id = required_id(body.id, &mut issues);
        let years = checked_items(body.years, "years", INVALID_YEAR, &mut issues, valid_year);
        let filter = MatchFilter {
            years: YearFilter::from_years(years),
            levels: checked_items(body.levels, "levels", INVALID_LEVEL, &mut issues, Some),
            draw_type: checked(body.draw_type, "drawType", INVALID_DRAW, &mut issues),
            tour: checked(body.tour, "tour", INVALID_TOUR, &mut issues),
            surfaces: checked_items(body.surfaces, "surfaces", INVALID_SURFACE, &mut issues, Some),
        };
        issues.finish(Self { id, filter })
    }
}

/// `?id=&from=&to=&levels=a,b&drawType=&tour=&surfaces=a,b`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMatchParams {
    pub id: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub levels: Option<String>,
    pub draw_type: Option<String>,
    pub tour: Option<String>,
    pub surfaces: Option<String>,
}

impl PlayerMatchParams {
    /// `from` and `to` bound an inclusive year range; either one alone
    /// selects that single year.
    pub fn validate(&self) -> Result<PlayerMatchQuery, ValidationErrors> {
        let mut issues = Issues::default();

        let id = present(&self.id).unwrap_or_default().to_string();
        if id.is_empty() {
            issues.push("id", REQUIRED);
        }

        let mut year = |key: &str, value: &Option<String>| {
            let raw = present(value)?;
            let parsed = raw.parse::<i64>().ok().and_then(valid_year);
            if parsed.is_none() {
                issues.push(key, INVALID_YEAR);
            }
            parsed
        };
        let (from, to) = (year("from", &self.from), year("to", &self.to));

        let years = match (from, to) {
            (Some(from), Some(to)) if to < from => {
                issues.push("to", "Must not be before from");
                YearFilter::Any
            }
            (Some(from), Some(to)) => YearFilter::Between { from, to },
            (Some(single), None) | (None, Some(single)) => YearFilter::Between {
                from: single,
                to: single,
            },
            (None, None) => YearFilter::Any,
        };

        let filter = MatchFilter {
            years,
            levels: label_list(&self.levels, "levels", INVALID_LEVEL, &mut issues),
            draw_type: label_param(&self.draw_type, "drawType", INVALID_DRAW, &mut issues),
            tour: label_param(&self.tour, "tour", INVALID_TOUR, &mut issues),
            surfaces: label_list(&self.surfaces, "surfaces", INVALID_SURFACE, &mut issues),
        };
        issues.finish(PlayerMatchQuery { id, filter })
    }
}

/// `?id=` of the player endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PlayerIdParams {
    pub id: Option<String>,
}

impl PlayerIdParams {
    pub fn validate(&self) -> Result<String, ValidationErrors> {
        let mut issues = Issues::default();
        let id = present(&self.id).map(str::to_string);
        if id.is_none() {
            issues.push("id", REQUIRED);
        }
        issues.finish(id.unwrap_or_default())
    }
}

/// `?id=` of the tournament endpoints; tournament ids are integers.
#[derive(Debug, Default, Deserialize)]
pub struct TournamentIdParams {
    pub id: Option<String>,
}

impl TournamentIdParams {
    pub fn validate(&self) -> Result<i64, ValidationErrors> {
        let mut issues = Issues::default();
        let id = match present(&self.id) {
            None => {
                issues.push("id", REQUIRED);
                None
            }
            Some(raw) => {
                let parsed = raw.parse::<i64>().ok();
                if parsed.is_none() {
                    issues.push("id", "Expected number, received string");
                }
                parsed
            }
        };
        issues.finish(id.unwrap_or_default())
    }
}

/// Filters and paging of the player listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerListQuery {
    pub tours: Vec<Tour>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    /// Rows to skip.
    pub skip: u32,
    /// Page size.
    pub offset: u32,
}

impl Default for PlayerListQuery {
    fn default() -> Self {
        Self {
            tours: Vec::new(),
            min_year: None,
            max_year: None,
            skip: 0,
            offset: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlayerListBody {
    tours: Option<Loose<Vec<Loose<Tour>>>>,
    min_year: Option<Loose<i64>>,
    max_year: Option<Loose<i64>>,
    skip: Option<Loose<u32>>,
    offset: Option<Loose<u32>>,
}

impl PlayerListQuery {
    /// Parse a `{tours?, min_year?, max_year?, skip?, offset?}` body.
    /// A missing body means all defaults.
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        if body.is_null() {
            return Ok(Self::default());
        }

        let body: PlayerListBody = decode_body(body)?;
        let mut issues = Issues::default();

        let tours = checked_items(body.tours, "tours", INVALID_TOUR, &mut issues, Some);

        let min_year = year_field(body.min_year, "min_year", &mut issues);
        let max_year = year_field(body.max_year, "max_year", &mut issues);
        if let (Some(min), Some(max)) = (min_year, max_year) {
            if max < min {
                issues.push("max_year", "Must not be before min_year");
            }
        }

        let skip = checked(body.skip, "skip", "Must be a non-negative integer", &mut issues)
            .unwrap_or(0);

        let page_size = format!("Must be an integer between 1 and {}", MAX_PAGE_SIZE);
        let offset = match checked(body.offset, "offset", &page_size, &mut issues) {
            None => DEFAULT_PAGE_SIZE,
            Some(n) if (1..=MAX_PAGE_SIZE).contains(&n) => n,
            Some(_) => {
                issues.push("offset", &page_size);
                DEFAULT_PAGE_SIZE
            }
        };

        issues.finish(Self {
            tours,
            min_year,
            max_year,
            skip,
            offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::models::MatchRecord;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn params(pairs: &[(&str, &str)]) -> PlayerMatchParams {
        let mut params = PlayerMatchParams::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "id" => params.id = value,
                "from" => params.from = value,
                "to" => params.to = value,
                "levels" => params.levels = value,
                "drawType" => params.draw_type = value,
                "tour" => params.tour = value,
                "surfaces" => params.surfaces = value,
                other => panic!("unknown param {}", other),
            }
        }
        params
    }

    #[test]
    fn test_match_body_minimal() {
        let query = PlayerMatchQuery::from_json(&json!({"id": "F324"})).unwrap();
        assert_eq!(query, PlayerMatchQuery::for_player("F324"));
    }

    #[test]
    fn test_match_body_full() {
        let query = PlayerMatchQuery::from_json(&json!({
            "id": "F324",
            "years": [2020, 2019, 2020],
            "levels": ["Tour", "ITF"],
            "drawType": "Main",
            "tour": "ATP",
            "surfaces": ["Clay"],
        }))
        .unwrap();

        assert_eq!(query.filter.years, YearFilter::Only(vec![2019, 2020]));
        assert_eq!(query.filter.levels, vec![Level::Tour, Level::Itf]);
        assert_eq!(query.filter.draw_type, Some(Draw::Main));
        assert_eq!(query.filter.tour, Some(Tour::Atp));
        assert_eq!(query.filter.surfaces, vec![Surface::Clay]);
    }

    #[test]
    fn test_match_body_nulls_are_absent() {
        let query =
            PlayerMatchQuery::from_json(&json!({"id": "F324", "years": null, "drawType": null}))
                .unwrap();
        assert_eq!(query.filter.years, YearFilter::Any);
        assert_eq!(query.filter.draw_type, None);
    }

    #[test]
    fn test_match_body_reports_every_issue() {
        let err = PlayerMatchQuery::from_json(&json!({
            "years": [2019, "x", -4, 2020.5],
            "levels": ["Tour", "Futures"],
            "drawType": "Main draw",
            "tour": 3,
            "surfaces": ["Ice"],
        }))
        .unwrap_err();

        assert_eq!(
            err.messages(),
            [
                "id: Required",
                "years.1: Please enter a valid year",
                "years.2: Please enter a valid year",
                "years.3: Please enter a valid year",
                "levels.1: Please select a valid level",
                "drawType: Please select a valid draw type",
                "tour: Please select a valid tour",
                "surfaces.0: Please select a valid surface",
            ]
        );
    }

    #[test]
    fn test_match_body_years_outside_window() {
        let err = PlayerMatchQuery::from_json(&json!({
            "id": "F324",
            "years": [1876, 2147483647, 99999999999i64, latest_year() + 1],
        }))
        .unwrap_err();

        assert_eq!(
            err.messages(),
            [
                "years.0: Please enter a valid year",
                "years.1: Please enter a valid year",
                "years.2: Please enter a valid year",
                "years.3: Please enter a valid year",
            ]
        );

        let query = PlayerMatchQuery::from_json(&json!({
            "id": "F324",
            "years": [EARLIEST_YEAR, latest_year()],
        }))
        .unwrap();
        assert_eq!(
            query.filter.years,
            YearFilter::Only(vec![EARLIEST_YEAR, latest_year()])
        );
    }

    #[test]
    fn test_match_body_wrong_types() {
        let err = PlayerMatchQuery::from_json(&json!({"id": 5, "years": 2020})).unwrap_err();
        assert_eq!(
            err.messages(),
            ["id: Expected string, received number", "years: Expected array, received number"]
        );

        let err = PlayerMatchQuery::from_json(&json!([1, 2])).unwrap_err();
        assert_eq!(err.messages(), ["Expected object, received array"]);
    }

    #[test]
    fn test_match_params_range_is_bounds() {
        let query = params(&[
            ("id", "F324"),
            ("from", "2017"),
            ("to", "2019"),
            ("levels", "Tour, Challenger"),
            ("drawType", "Qualifying"),
            ("surfaces", "Hard,Carpet"),
        ])
        .validate()
        .unwrap();

        assert_eq!(query.filter.years, YearFilter::Between { from: 2017, to: 2019 });
        assert_eq!(query.filter.levels, vec![Level::Tour, Level::Challenger]);
        assert_eq!(query.filter.draw_type, Some(Draw::Qualifying));
        assert_eq!(query.filter.surfaces, vec![Surface::Hard, Surface::Carpet]);
        assert_eq!(query.filter.tour, None);
    }

    #[test]
    fn test_match_params_single_bound() {
        let query = params(&[("id", "F324"), ("to", "2008")]).validate().unwrap();
        assert_eq!(query.filter.years, YearFilter::Between { from: 2008, to: 2008 });
    }

    #[test]
    fn test_match_params_huge_range_is_rejected() {
        let err = params(&[("id", "F324"), ("from", "1"), ("to", "2147483647")])
            .validate()
            .unwrap_err();
        assert_eq!(
            err.messages(),
            ["from: Please enter a valid year", "to: Please enter a valid year"]
        );

        let err = params(&[("id", "F324"), ("to", "20000000")]).validate().unwrap_err();
        assert_eq!(err.messages(), ["to: Please enter a valid year"]);
    }

    #[test]
    fn test_match_params_errors() {
        let err = params(&[
            ("from", "2020"),
            ("to", "2010"),
            ("levels", "Tour,Satellite"),
            ("tour", "ITF"),
            ("drawType", ""),
        ])
        .validate()
        .unwrap_err();

        assert_eq!(
            err.messages(),
            [
                "id: Required",
                "to: Must not be before from",
                "levels.1: Please select a valid level",
                "tour: Please select a valid tour",
            ]
        );
    }

    #[test]
    fn test_match_params_bad_year() {
        let err = params(&[("id", "F324"), ("from", "nineteen")]).validate().unwrap_err();
        assert_eq!(err.messages(), ["from: Please enter a valid year"]);
    }

    #[test]
    fn test_match_filter_accepts() {
        let clay = classify(
            MatchRecord::new(true)
                .with_tour(Tour::Wta)
                .with_surface(Surface::Clay, crate::models::Environment::Outdoor),
        );
        let unknown_surface = classify(MatchRecord::new(true).with_tour(Tour::Wta));

        let filter = MatchFilter {
            surfaces: vec![Surface::Clay],
            tour: Some(Tour::Wta),
            ..MatchFilter::default()
        };
        assert!(filter.accepts(&clay));
        assert!(!filter.accepts(&unknown_surface));

        let itf_only = MatchFilter {
            levels: vec![Level::Itf],
            ..MatchFilter::default()
        };
        assert!(!itf_only.accepts(&clay));
        assert!(MatchFilter::default().accepts(&unknown_surface));
    }

    #[test]
    fn test_player_id_params() {
        let id = PlayerIdParams {
            id: Some(" N409 ".to_string()),
        };
        assert_eq!(id.validate().unwrap(), "N409");

        let err = PlayerIdParams {
            id: Some(String::new()),
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.messages(), ["id: Required"]);
    }

    #[test]
    fn test_tournament_id_params() {
        let id = TournamentIdParams {
            id: Some("540".to_string()),
        };
        assert_eq!(id.validate().unwrap(), 540);

        let err = TournamentIdParams {
            id: Some("wimbledon".to_string()),
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.messages(), ["id: Expected number, received string"]);

        let err = TournamentIdParams::default().validate().unwrap_err();
        assert_eq!(err.messages(), ["id: Required"]);
    }

    #[test]
    fn test_player_list_defaults() {
        assert_eq!(PlayerListQuery::from_json(&Value::Null).unwrap(), PlayerListQuery::default());
        let query = PlayerListQuery::from_json(&json!({})).unwrap();
        assert_eq!(query.skip, 0);
        assert_eq!(query.offset, 30);
    }

    #[test]
    fn test_player_list_full() {
        let query = PlayerListQuery::from_json(&json!({
            "tours": ["WTA", "Women"],
            "min_year": 1990,
            "max_year": 2000,
            "skip": 60,
            "offset": 20,
        }))
        .unwrap();

        assert_eq!(query.tours, vec![Tour::Wta, Tour::Women]);
        assert_eq!((query.min_year, query.max_year), (Some(1990), Some(2000)));
        assert_eq!((query.skip, query.offset), (60, 20));
    }

    #[test]
    fn test_player_list_errors() {
        let err = PlayerListQuery::from_json(&json!({
            "tours": ["PTT"],
            "min_year": 2000,
            "max_year": 1990,
            "skip": -1,
            "offset": 500,
        }))
        .unwrap_err();

        assert_eq!(
            err.messages(),
            [
                "tours.0: Please select a valid tour",
                "max_year: Must not be before min_year",
                "skip: Must be a non-negative integer",
                "offset: Must be an integer between 1 and 100",
            ]
        );
    }

    #[test]
    fn test_player_list_year_window() {
        let err = PlayerListQuery::from_json(&json!({"min_year": 12, "max_year": "1990"}))
            .unwrap_err();
        assert_eq!(
            err.messages(),
            ["min_year: Please enter a valid year", "max_year: Please enter a valid year"]
        );
    }
}
