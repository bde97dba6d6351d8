//! The win-loss index: a fixed catalogue of situational splits.

use std::cmp::Ordering;

use crate::classify::{first_set, is_deciding_set, is_fifth_set, ClassifiedMatch, SetTally};
use crate::models::{CategoryClass, Environment, Handedness, Round, StatRow, Surface};

use super::{win_loss_value, WinLoss};

/// How a stat counts towards wins and losses.
#[derive(Clone, Copy)]
pub enum Measure {
    /// Qualifying matches, split by match outcome.
    Matches(fn(&ClassifiedMatch) -> bool),
    /// Qualifying sets, split by who won the set.
    Sets(fn(&ClassifiedMatch) -> SetTally),
}

/// One entry of the index catalogue.
#[derive(Clone, Copy)]
pub struct IndexStat {
    pub category: &'static str,
    pub stat: &'static str,
    pub measure: Measure,
    /// Titles are reported for this row.
    pub titles: bool,
}

const fn by_match(
    category: &'static str,
    stat: &'static str,
    predicate: fn(&ClassifiedMatch) -> bool,
    titles: bool,
) -> IndexStat {
    IndexStat {
        category,
        stat,
        measure: Measure::Matches(predicate),
        titles,
    }
}

const fn by_set(
    category: &'static str,
    stat: &'static str,
    tally: fn(&ClassifiedMatch) -> SetTally,
) -> IndexStat {
    IndexStat {
        category,
        stat,
        measure: Measure::Sets(tally),
        titles: false,
    }
}

const MATCH_RECORD: &str = "Match record";
const PRESSURE_POINTS: &str = "Pressure points";
const ENVIRONMENT: &str = "Environment";
const OTHER: &str = "Other";

/// The catalogue in output order.
pub const INDEX_CATALOGUE: [IndexStat; 20] = [
    by_match(MATCH_RECORD, "Overall", |_| true, true),
    by_match(MATCH_RECORD, "Grand Slams", |m| m.category == CategoryClass::GrandSlam, true),
    by_match(MATCH_RECORD, "Masters", |m| m.category == CategoryClass::Masters, true),
    by_set(PRESSURE_POINTS, "Tie breaks", |m| m.tiebreaks),
    by_match(PRESSURE_POINTS, "Versus Top 10", |m| matches!(m.record.opponent.rank, Some(1..=10)), false),
    by_match(PRESSURE_POINTS, "Finals", |m| m.record.round == Some(Round::Final), false),
    by_match(PRESSURE_POINTS, "Deciding set", |m| is_deciding_set(&m.record), false),
    by_match(PRESSURE_POINTS, "5th set record", |m| is_fifth_set(&m.record), false),
    by_match(ENVIRONMENT, "Clay", |m| m.record.surface == Some(Surface::Clay), true),
    by_match(ENVIRONMENT, "Grass", |m| m.record.surface == Some(Surface::Grass), true),
    by_match(ENVIRONMENT, "Hard", |m| m.record.surface == Some(Surface::Hard), true),
    by_match(ENVIRONMENT, "Carpet", |m| m.record.surface == Some(Surface::Carpet), true),
    by_match(ENVIRONMENT, "Indoor", |m| m.record.environment == Some(Environment::Indoor), true),
    by_match(ENVIRONMENT, "Outdoor", |m| m.record.environment == Some(Environment::Outdoor), true),
    by_match(OTHER, "After winning 1st set", |m| first_set(&m.record) == Some(Ordering::Greater), false),
    by_match(OTHER, "After losing 1st set", |m| first_set(&m.record) == Some(Ordering::Less), false),
    by_match(OTHER, "Versus right-handers", |m| m.record.opponent.handedness == Some(Handedness::Right), false),
    by_match(OTHER, "Versus left-handers", |m| m.record.opponent.handedness == Some(Handedness::Left), false),
    by_set(OTHER, "Bagels", |m| m.bagels),
    by_set(OTHER, "Breadsticks", |m| m.breadsticks),
];

impl IndexStat {
    /// Evaluate this stat over a record list.
    pub fn evaluate(&self, records: &[ClassifiedMatch]) -> StatRow {
        let counts = match self.measure {
            Measure::Matches(predicate) => {
                records
                    .iter()
                    .filter(|m| predicate(m))
                    .fold(WinLoss::default(), |mut acc, m| {
                        acc.record(m.won(), m.is_title());
                        acc
                    })
            }
            Measure::Sets(tally) => {
                records
                    .iter()
                    .map(tally)
                    .fold(WinLoss::default(), |mut acc, t| {
                        acc.wins += t.won;
                        acc.losses += t.lost;
                        acc
                    })
            }
        };

        StatRow {
            category: self.category.to_string(),
            stat: self.stat.to_string(),
            wins: counts.wins,
            losses: counts.losses,
            titles: self.titles.then_some(counts.titles),
            value: win_loss_value(counts.wins, counts.losses),
        }
    }
}

/// Build the full index, one row per catalogue entry in catalogue order.
pub fn build_index(records: &[ClassifiedMatch]) -> Vec<StatRow> {
    INDEX_CATALOGUE
        .iter()
        .map(|stat| stat.evaluate(records))
        .collect()
}
