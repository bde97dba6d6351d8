//! Serve and return point statistics.

use crate::classify::ClassifiedMatch;
use crate::models::{PointStatRow, PointStats};

use super::percentage;

/// How a row folds the per-match counters.
#[derive(Clone, Copy)]
pub enum Tally {
    /// Plain sum.
    Count(fn(&PointStats) -> u32),
    /// Rounded share of `part` in `whole`.
    Percentage {
        part: fn(&PointStats) -> u32,
        whole: fn(&PointStats) -> u32,
    },
}

/// One entry of the point stats catalogue.
#[derive(Clone, Copy)]
pub struct PointStat {
    pub stat: &'static str,
    pub tally: Tally,
}

const fn count(stat: &'static str, counter: fn(&PointStats) -> u32) -> PointStat {
    PointStat {
        stat,
        tally: Tally::Count(counter),
    }
}

const fn share(
    stat: &'static str,
    part: fn(&PointStats) -> u32,
    whole: fn(&PointStats) -> u32,
) -> PointStat {
    PointStat {
        stat,
        tally: Tally::Percentage { part, whole },
    }
}

fn serves(p: &PointStats) -> u32 {
    p.serve1 + p.serve2
}

fn serves_won(p: &PointStats) -> u32 {
    p.serve1_won + p.serve2_won
}

fn returns(p: &PointStats) -> u32 {
    p.return1 + p.return2
}

fn returns_won(p: &PointStats) -> u32 {
    p.return1_won + p.return2_won
}

/// The catalogue in output order.
pub const POINT_STATS_CATALOGUE: [PointStat; 18] = [
    count("Aces", |p| p.aces),
    count("Double Faults", |p| p.double_faults),
    share("First Serve %", |p| p.serve1, serves),
    share("First Serve Points Won", |p| p.serve1_won, |p| p.serve1),
    share("Second Serve Points Won", |p| p.serve2_won, |p| p.serve2),
    count("Break Points Faced", |p| p.break_points_faced),
    share("Break Points Saved", |p| p.break_points_saved, |p| p.break_points_faced),
    count("Service Games Played", |p| p.service_games),
    share("Service Games Won", PointStats::service_games_held, |p| p.service_games),
    share("Total Service Points Won", serves_won, serves),
    share("First Serve Return Points Won", |p| p.return1_won, |p| p.return1),
    share("Second Serve Return Points Won", |p| p.return2_won, |p| p.return2),
    count("Break Points Opportunities", |p| p.break_point_chances),
    share("Break Points Converted", |p| p.break_points_converted, |p| p.break_point_chances),
    count("Return Games Played", |p| p.return_games),
    share("Return Games Won", |p| p.break_points_converted, |p| p.return_games),
    share("Return Points Won", returns_won, returns),
    share("Total Points Won", |p| serves_won(p) + returns_won(p), |p| serves(p) + returns(p)),
];

fn sum(records: &[ClassifiedMatch], counter: fn(&PointStats) -> u32) -> u64 {
    records
        .iter()
        .map(|m| u64::from(counter(&m.record.points)))
        .sum()
}

impl PointStat {
    /// Evaluate this stat over a record list.
    pub fn evaluate(&self, records: &[ClassifiedMatch]) -> PointStatRow {
        let (percent, value) = match self.tally {
            Tally::Count(counter) => (false, sum(records, counter)),
            Tally::Percentage { part, whole } => {
                (true, percentage(sum(records, part), sum(records, whole)))
            }
        };

        PointStatRow {
            stat: self.stat.to_string(),
            percent,
            value,
        }
    }
}

/// Every catalogue row over the given singles matches.
pub fn build_point_stats(records: &[ClassifiedMatch]) -> Vec<PointStatRow> {
    POINT_STATS_CATALOGUE
        .iter()
        .map(|s| s.evaluate(records))
        .collect()
}
