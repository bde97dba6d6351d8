//! Shape checks run on aggregator output before it is returned.

use std::sync::OnceLock;

use regex::Regex;

use crate::calculate::{H2H_LIMIT, POINT_STATS_CATALOGUE, SUMMARY_LEVELS};
use crate::models::{ChampionScores, H2hSummary, PointStatRow, StatRow, WlSummary};

use super::SchemaError;

fn wl_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+-\d+$").expect("static pattern compiles"))
}

fn check_wl(path: String, wl: &str) -> Result<(), SchemaError> {
    if wl_pattern().is_match(wl) {
        Ok(())
    } else {
        Err(SchemaError::MalformedWl {
            path,
            value: wl.to_string(),
        })
    }
}

/// Every value is finite, within [0, 1] and equal to its ratio.
pub fn validate_stat_rows(rows: &[StatRow]) -> Result<(), SchemaError> {
    for (i, row) in rows.iter().enumerate() {
        let path = format!("{}.value", i);
        if !row.value.is_finite() || !(0.0..=1.0).contains(&row.value) {
            return Err(SchemaError::ValueOutOfRange {
                path,
                value: row.value,
            });
        }

        let total = row.wins + row.losses;
        let expected = if total == 0 {
            0.0
        } else {
            row.wins as f64 / total as f64
        };
        if row.value != expected {
            return Err(SchemaError::ValueMismatch {
                path,
                value: row.value,
            });
        }

        if row.stat.is_empty() || row.category.is_empty() {
            return Err(SchemaError::Shape {
                path: i.to_string(),
                message: "category and stat must be named".to_string(),
            });
        }
    }
    Ok(())
}

/// One summary per level in order, every leaf a `W-L` string.
pub fn validate_wl_summaries(summaries: &[WlSummary]) -> Result<(), SchemaError> {
    let labels: Vec<&str> = summaries.iter().map(|s| s.label.as_str()).collect();
    let expected: Vec<&str> = SUMMARY_LEVELS.iter().map(|(label, _)| *label).collect();
    if labels != expected {
        return Err(SchemaError::Shape {
            path: "wl".to_string(),
            message: format!("expected levels {:?}, got {:?}", expected, labels),
        });
    }

    for (i, s) in summaries.iter().enumerate() {
        for (tier, cells) in [("total", &s.total), ("main", &s.main)] {
            check_wl(format!("{}.{}.singles.wl", i, tier), &cells.singles.wl)?;
            check_wl(format!("{}.{}.doubles.wl", i, tier), &cells.doubles.wl)?;
        }
        check_wl(format!("{}.qualifying.singles", i), &s.qualifying.singles)?;
        check_wl(format!("{}.qualifying.doubles", i), &s.qualifying.doubles)?;
    }
    Ok(())
}

/// At most ten played opponents, none won more often than met.
pub fn validate_h2h(h2h: &[H2hSummary]) -> Result<(), SchemaError> {
    if h2h.len() > H2H_LIMIT {
        return Err(SchemaError::Shape {
            path: "h2h".to_string(),
            message: format!("{} opponents exceeds the limit of {}", h2h.len(), H2H_LIMIT),
        });
    }

    for (i, h) in h2h.iter().enumerate() {
        if h.matches == 0 {
            return Err(SchemaError::Shape {
                path: format!("h2h.{}.matches", i),
                message: "opponent was never played".to_string(),
            });
        }
        if h.wins > h.matches {
            return Err(SchemaError::Shape {
                path: format!("h2h.{}.wins", i),
                message: format!("{} wins in {} matches", h.wins, h.matches),
            });
        }
        if h.opponent.id.is_empty() {
            return Err(SchemaError::Shape {
                path: format!("h2h.{}.opponent.id", i),
                message: "missing opponent id".to_string(),
            });
        }
    }
    Ok(())
}

/// Rows follow the catalogue, percentages within [0, 100].
pub fn validate_point_stats(rows: &[PointStatRow]) -> Result<(), SchemaError> {
    let names: Vec<&str> = rows.iter().map(|r| r.stat.as_str()).collect();
    let expected: Vec<&str> = POINT_STATS_CATALOGUE.iter().map(|s| s.stat).collect();
    if names != expected {
        return Err(SchemaError::Shape {
            path: "stats".to_string(),
            message: format!("expected stats {:?}, got {:?}", expected, names),
        });
    }

    for (i, row) in rows.iter().enumerate() {
        if row.percent && row.value > 100 {
            return Err(SchemaError::Shape {
                path: format!("{}.value", i),
                message: format!("{} is not a percentage", row.value),
            });
        }
    }
    Ok(())
}

/// Every run names its champions and is ordered by sets lost.
pub fn validate_champion_scores(scores: &[ChampionScores]) -> Result<(), SchemaError> {
    for (i, s) in scores.iter().enumerate() {
        if s.team.is_empty() {
            return Err(SchemaError::Shape {
                path: format!("{}.team", i),
                message: "champion entry has no players".to_string(),
            });
        }
    }
    if let Some(i) = scores
        .windows(2)
        .position(|pair| pair[0].sets_lost > pair[1].sets_lost)
    {
        return Err(SchemaError::Shape {
            path: format!("{}.sets_lost", i + 1),
            message: "runs are not ordered by sets lost".to_string(),
        });
    }
    Ok(())
}
