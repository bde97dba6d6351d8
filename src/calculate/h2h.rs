//! Head-to-head ranking.

use std::cmp::Reverse;

use crate::models::H2hSummary;

/// Most opponents reported.
pub const H2H_LIMIT: usize = 10;

/// Keep opponents actually played, most matches first, then most wins.
/// Remaining ties fall back to opponent id so the output is stable.
pub fn rank_h2h(mut opponents: Vec<H2hSummary>) -> Vec<H2hSummary> {
    opponents.retain(|h| h.matches > 0);
    opponents.sort_by_key(|h| (Reverse(h.matches), Reverse(h.wins), h.opponent.id.clone()));
    opponents.truncate(H2H_LIMIT);
    opponents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Person;

    fn h2h(id: &str, matches: u32, wins: u32) -> H2hSummary {
        H2hSummary {
            opponent: Person {
                id: id.to_string(),
                first_name: None,
                last_name: None,
                country: None,
            },
            matches,
            wins,
        }
    }

    fn ids(ranked: &[H2hSummary]) -> Vec<&str> {
        ranked.iter().map(|h| h.opponent.id.as_str()).collect()
    }

    #[test]
    fn test_matches_then_wins() {
        let ranked = rank_h2h(vec![h2h("A", 5, 3), h2h("B", 5, 4), h2h("C", 3, 3)]);
        assert_eq!(ids(&ranked), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_zero_match_opponents_excluded() {
        let ranked = rank_h2h(vec![h2h("A", 0, 0), h2h("B", 1, 0)]);
        assert_eq!(ids(&ranked), vec!["B"]);
    }

    #[test]
    fn test_truncated_to_limit() {
        let opponents = (0..15).map(|i| h2h(&format!("P{:02}", i), 20 - i, 0)).collect();
        let ranked = rank_h2h(opponents);
        assert_eq!(ranked.len(), H2H_LIMIT);
        assert_eq!(ranked[0].opponent.id, "P00");
        assert_eq!(ranked[9].opponent.id, "P09");
    }

    #[test]
    fn test_full_ties_ordered_by_id() {
        let ranked = rank_h2h(vec![h2h("Z", 2, 1), h2h("M", 2, 1)]);
        assert_eq!(ids(&ranked), vec!["M", "Z"]);
    }
}
