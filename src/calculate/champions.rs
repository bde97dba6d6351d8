//! Set and game totals of each champion's run through a tournament.

use std::collections::BTreeMap;

use crate::models::{ChampionMatch, ChampionScores, MatchType, Tour};

/// Fold champion matches into one total per edition, event type and tour,
/// fewest sets dropped first.
///
/// A set counts only when both scores are present; games missing a score
/// count as 0.
pub fn build_champion_scores(matches: &[ChampionMatch]) -> Vec<ChampionScores> {
    let mut runs: BTreeMap<(i64, MatchType, Option<Tour>), ChampionScores> = BTreeMap::new();

    for m in matches {
        let run = runs
            .entry((m.edition, m.match_type, m.tour))
            .or_insert_with(|| ChampionScores {
                match_type: m.match_type,
                tour: m.tour,
                year: m.year,
                id: m.edition,
                team: Vec::new(),
                sets_won: 0,
                sets_lost: 0,
                games_won: 0,
                games_lost: 0,
            });

        for person in &m.team {
            if !run.team.iter().any(|p| p.id == person.id) {
                run.team.push(person.clone());
            }
        }

        for (own, opp) in m.score.iter().zip(m.opponent.iter()) {
            run.games_won += u32::from(own.unwrap_or(0));
            run.games_lost += u32::from(opp.unwrap_or(0));
            match own.zip(opp) {
                Some((own, opp)) if own > opp => run.sets_won += 1,
                Some((own, opp)) if own < opp => run.sets_lost += 1,
                _ => {}
            }
        }
    }

    let mut scores: Vec<ChampionScores> = runs.into_values().collect();
    scores.sort_by_key(|s| (s.sets_lost, s.year, s.id, s.match_type));
    scores
}
