//! Win-loss summary per tournament level.

use crate::classify::ClassifiedMatch;
use crate::models::{Draw, Level, MatchType, WlCell, WlQualifying, WlSummary, WlTier};

use super::WinLoss;

/// Partitions of the summary in output order. `None` is the total.
pub const SUMMARY_LEVELS: [(&str, Option<Level>); 4] = [
    ("Total", None),
    ("Tour", Some(Level::Tour)),
    ("Challenger", Some(Level::Challenger)),
    ("ITF", Some(Level::Itf)),
];

/// Counters for one level partition.
#[derive(Debug, Default)]
struct LevelCounts {
    total: [WinLoss; 2],
    main: [WinLoss; 2],
    qualifying: [WinLoss; 2],
}

fn slot(match_type: MatchType) -> usize {
    match match_type {
        MatchType::Singles => 0,
        MatchType::Doubles => 1,
    }
}

impl LevelCounts {
    fn add(&mut self, m: &ClassifiedMatch) {
        let i = slot(m.record.match_type);
        let (won, title) = (m.won(), m.is_title());
        self.total[i].record(won, title);
        match m.record.draw {
            Draw::Main => self.main[i].record(won, title),
            Draw::Qualifying => self.qualifying[i].record(won, title),
        }
    }

    fn into_summary(self, label: &str) -> WlSummary {
        let cell = |wl: &WinLoss| WlCell {
            wl: wl.wl(),
            titles: wl.titles,
        };
        WlSummary {
            label: label.to_string(),
            total: WlTier {
                singles: cell(&self.total[0]),
                doubles: cell(&self.total[1]),
            },
            main: WlTier {
                singles: cell(&self.main[0]),
                doubles: cell(&self.main[1]),
            },
            qualifying: WlQualifying {
                singles: self.qualifying[0].wl(),
                doubles: self.qualifying[1].wl(),
            },
        }
    }
}

/// Build the four level summaries: Total, Tour, Challenger, ITF.
///
/// Every record lands in Total and in exactly one level partition, so the
/// level partitions always add up to the total.
pub fn build_wl_summary(matches: &[ClassifiedMatch]) -> Vec<WlSummary> {
    let mut counts: Vec<LevelCounts> = SUMMARY_LEVELS
        .iter()
        .map(|_| LevelCounts::default())
        .collect();

    for m in matches {
        for ((_, level), bucket) in SUMMARY_LEVELS.iter().zip(counts.iter_mut()) {
            if level.map_or(true, |l| l == m.level) {
                bucket.add(m);
            }
        }
    }

    SUMMARY_LEVELS
        .iter()
        .zip(counts)
        .map(|((label, _), c)| c.into_summary(label))
        .collect()
}
