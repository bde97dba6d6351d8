//! Statistical classification of match records.
//!
//! The graph spreads "what kind of event was this" across several fields
//! whose vocabulary differs by tour. Everything here is a closed decision
//! table over static category lists; no thresholds are computed.

use std::cmp::Ordering;

use crate::models::{CategoryClass, Level, MatchRecord, Tour};

/// Category string of the four majors.
pub const GRAND_SLAM_CATEGORY: &str = "Grand Slam";

/// Event labels marking the ITF men's and women's circuits.
pub const ITF_MARKERS: &[&str] = &["Men", "Women"];

/// Second-tier ATP events across eras.
pub const ATP_MASTERS_CATEGORIES: &[&str] = &[
    "ATP Masters 1000",
    "ATP Masters Series",
    "ATP Championship Series",
    "ATP Championship Series, Single Week",
];

/// Second-tier WTA events across eras.
pub const WTA_MASTERS_CATEGORIES: &[&str] = &["WTA 1000", "WTA Premier Mandatory"];

pub const ATP_CHALLENGER_CATEGORIES: &[&str] = &[
    "ATP Challenger 175",
    "ATP Challenger 125",
    "ATP Challenger 100",
    "ATP Challenger 75",
    "ATP Challenger 50",
];

pub const WTA_CHALLENGER_CATEGORIES: &[&str] = &["WTA 125"];

/// Challenger-tier categories for a tour. ITF circuits have none.
pub fn challenger_categories(tour: Tour) -> &'static [&'static str] {
    match tour {
        Tour::Atp => ATP_CHALLENGER_CATEGORIES,
        Tour::Wta => WTA_CHALLENGER_CATEGORIES,
        Tour::Men | Tour::Women => &[],
    }
}

/// Tournament level of a record.
///
/// ITF when an ITF circuit marker is present, whatever the category says.
/// Otherwise Challenger when the category is in the record's tour-specific
/// challenger list, and Tour for everything else.
pub fn classify_level(record: &MatchRecord) -> Level {
    let itf_label = record
        .labels
        .iter()
        .any(|l| ITF_MARKERS.contains(&l.as_str()));
    if itf_label || record.tour.is_some_and(|t| t.is_itf()) {
        return Level::Itf;
    }

    match (record.tour, record.category.as_deref()) {
        (Some(tour), Some(category)) if challenger_categories(tour).contains(&category) => {
            Level::Challenger
        }
        _ => Level::Tour,
    }
}

/// Event importance: Grand Slam, Masters-equivalent or everything else.
pub fn classify_category(record: &MatchRecord) -> CategoryClass {
    match record.category.as_deref() {
        Some(GRAND_SLAM_CATEGORY) => CategoryClass::GrandSlam,
        Some(c) if ATP_MASTERS_CATEGORIES.contains(&c) || WTA_MASTERS_CATEGORIES.contains(&c) => {
            CategoryClass::Masters
        }
        _ => CategoryClass::Overall,
    }
}

/// Set decided by a tie-break: 7-6 either way.
pub fn is_tiebreak(own: u8, opp: u8) -> bool {
    (own == 7 && opp == 6) || (own == 6 && opp == 7)
}

/// 6-0 either way.
pub fn is_bagel(own: u8, opp: u8) -> bool {
    (own == 6 && opp == 0) || (own == 0 && opp == 6)
}

/// 6-1 either way.
pub fn is_breadstick(own: u8, opp: u8) -> bool {
    (own == 6 && opp == 1) || (own == 1 && opp == 6)
}

/// Per-set occurrences split by who took the set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetTally {
    pub won: u32,
    pub lost: u32,
}

/// Count the played sets matching `predicate`, by winner of the set.
/// Sets missing a score on either side count as not played.
pub fn tally_sets(record: &MatchRecord, predicate: fn(u8, u8) -> bool) -> SetTally {
    record
        .sets()
        .flatten()
        .filter(|(own, opp)| predicate(*own, *opp))
        .fold(SetTally::default(), |mut tally, (own, opp)| {
            if own > opp {
                tally.won += 1;
            } else {
                tally.lost += 1;
            }
            tally
        })
}

/// The last possible set of the match's format was played.
pub fn is_deciding_set(record: &MatchRecord) -> bool {
    match record.best_of {
        3 => record.score.set(3).is_some(),
        5 => record.score.set(5).is_some(),
        _ => false,
    }
}

/// A best-of-5 match that went the distance.
pub fn is_fifth_set(record: &MatchRecord) -> bool {
    record.best_of == 5 && record.score.set(5).is_some()
}

/// Outcome of the first set from the player's side, when both scores exist.
pub fn first_set(record: &MatchRecord) -> Option<Ordering> {
    record.sets().next().flatten().map(|(own, opp)| own.cmp(&opp))
}

/// A record together with everything the classifier derives from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedMatch {
    pub record: MatchRecord,
    pub level: Level,
    pub category: CategoryClass,
    pub tiebreaks: SetTally,
    pub bagels: SetTally,
    pub breadsticks: SetTally,
}

impl ClassifiedMatch {
    pub fn won(&self) -> bool {
        self.record.won
    }

    pub fn is_title(&self) -> bool {
        self.record.is_title()
    }
}

/// Classify one record.
pub fn classify(record: MatchRecord) -> ClassifiedMatch {
    ClassifiedMatch {
        level: classify_level(&record),
        category: classify_category(&record),
        tiebreaks: tally_sets(&record, is_tiebreak),
        bagels: tally_sets(&record, is_bagel),
        breadsticks: tally_sets(&record, is_breadstick),
        record,
    }
}

/// Classify a whole result set, preserving order.
pub fn classify_all(records: Vec<MatchRecord>) -> Vec<ClassifiedMatch> {
    records.into_iter().map(classify).collect()
}
