//! Statistics calculation engine.
//!
//! Folds classified match records into report structures:
//! - Win-loss summaries per tournament level
//! - The win-loss index of situational splits
//! - Head-to-head rankings
//! - Serve and return point statistics
//! - Set and game totals of tournament champions
//!
//! Every function here is a pure fold over a fully materialized slice.

mod champions;
mod h2h;
mod index;
mod stats;
mod summary;

pub use champions::build_champion_scores;
pub use h2h::{rank_h2h, H2H_LIMIT};
pub use index::{build_index, IndexStat, Measure, INDEX_CATALOGUE};
pub use stats::{build_point_stats, PointStat, Tally, POINT_STATS_CATALOGUE};
pub use summary::{build_wl_summary, SUMMARY_LEVELS};

/// Win ratio, 0 when nothing was played.
pub fn win_loss_value(wins: u32, losses: u32) -> f64 {
    let total = wins + losses;
    if total == 0 {
        0.0
    } else {
        wins as f64 / total as f64
    }
}

/// `part` as a percentage of `whole`, rounded half up. 0 when `whole` is 0;
/// `part` is capped at `whole`.
pub fn percentage(part: u64, whole: u64) -> u64 {
    if whole == 0 {
        return 0;
    }
    (part.min(whole) * 200 + whole) / (whole * 2)
}

/// `"{wins}-{losses}"`.
pub fn format_wl(wins: u32, losses: u32) -> String {
    format!("{}-{}", wins, losses)
}

/// Running win/loss/title counts for one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WinLoss {
    pub wins: u32,
    pub losses: u32,
    pub titles: u32,
}

impl WinLoss {
    /// Count one match.
    pub fn record(&mut self, won: bool, title: bool) {
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        if title {
            self.titles += 1;
        }
    }

    pub fn matches(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn value(&self) -> f64 {
        win_loss_value(self.wins, self.losses)
    }

    pub fn wl(&self) -> String {
        format_wl(self.wins, self.losses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_loss_value() {
        assert_eq!(win_loss_value(3, 1), 0.75);
        assert_eq!(win_loss_value(0, 4), 0.0);
        assert_eq!(win_loss_value(5, 0), 1.0);
    }

    #[test]
    fn test_win_loss_value_zero_is_not_nan() {
        let value = win_loss_value(0, 0);
        assert!(!value.is_nan());
        assert_eq!(value, 0.0);
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(5, 5), 100);
        assert_eq!(percentage(0, 7), 0);
    }

    #[test]
    fn test_percentage_guards() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(12, 0), 0);
        assert_eq!(percentage(9, 4), 100);
    }

    #[test]
    fn test_format_wl() {
        assert_eq!(format_wl(0, 0), "0-0");
        assert_eq!(format_wl(1012, 212), "1012-212");
    }

    #[test]
    fn test_win_loss_record() {
        let mut wl = WinLoss::default();
        wl.record(true, true);
        wl.record(true, false);
        wl.record(false, false);

        assert_eq!(wl, WinLoss { wins: 2, losses: 1, titles: 1 });
        assert_eq!(wl.matches(), 3);
        assert_eq!(wl.wl(), "2-1");
        assert!((wl.value() - 2.0 / 3.0).abs() < 1e-12);
    }
}
