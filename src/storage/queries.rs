//! Parameterized Cypher statements against the tennis graph.
//!
//! Each statement has a stable name; fixtures and logs refer to queries by
//! that name only, never by text.

use crate::graph::Query;
use crate::schema::{PlayerListQuery, YearFilter};

pub const PLAYER_EXISTS: &str = "player_exists";
pub const PLAYER_DETAILS: &str = "player_details";
pub const MATCH_RECORDS: &str = "match_records";
pub const H2H_OPPONENTS: &str = "h2h_opponents";
pub const PLAYER_COUNT: &str = "player_count";
pub const PLAYER_LIST: &str = "player_list";
pub const TOURNAMENT_EXISTS: &str = "tournament_exists";
pub const CHAMPION_MATCHES: &str = "champion_matches";

const PLAYER_EXISTS_CYPHER: &str = "
MATCH (p:Player {id: $id})
RETURN p.id AS id
LIMIT 1
";

const PLAYER_DETAILS_CYPHER: &str = "
MATCH (p:Player {id: $id})
OPTIONAL MATCH (p)-[:TURNED_PRO]->(t:Year)
OPTIONAL MATCH (p)-[:RETIRED]->(r:Year)
OPTIONAL MATCH (p)-[:HOF]->(hof:Year)
OPTIONAL MATCH (p)-[:REPRESENTS]->(c:Country)
CALL (p) {
  OPTIONAL MATCH (p)-[z:REPRESENTED]->(fc:Country)
  WITH CASE WHEN fc IS NULL THEN null ELSE apoc.map.merge(properties(fc), properties(z)) END AS country
  RETURN COLLECT(DISTINCT country) AS countries
}
CALL (p) {
  OPTIONAL MATCH (p)<-[x:COACHES]-(z:Coach)
  WITH CASE WHEN z IS NULL THEN null ELSE apoc.map.mergeList([
    apoc.map.submap(z, ['id', 'first_name', 'last_name'], null, false),
    properties(x),
    {labels: labels(z)}
  ]) END AS coach
  RETURN COLLECT(DISTINCT coach) AS coaches
}
CALL (p) {
  OPTIONAL MATCH (p)<-[x:COACHED]-(z:Coach)
  WITH CASE WHEN z IS NULL THEN null ELSE apoc.map.mergeList([
    apoc.map.submap(z, ['id', 'first_name', 'last_name'], null, false),
    properties(x),
    {labels: labels(z)}
  ]) END AS coach
  RETURN COLLECT(DISTINCT coach) AS former_coaches
}
RETURN apoc.map.clean(
  apoc.map.merge(properties(p), {
    country: properties(c),
    countries: countries,
    coaches: coaches,
    former_coaches: former_coaches,
    turned_pro: t.id,
    retired: r.id,
    hof: hof.id,
    age: CASE
      WHEN p.dod IS NOT NULL AND p.dob IS NOT NULL THEN duration.between(p.dob, p.dod).years
      WHEN p.dob IS NOT NULL THEN duration.between(p.dob, date()).years
      ELSE null
    END
  }),
  [],
  [null, {}]
) AS player
";

const MATCH_RECORDS_CYPHER: &str = "
MATCH (p:Player {id: $id})
OPTIONAL MATCH
  (p)-[:ENTERED]->
  (:Entry)-[:SCORED]->
  (s:Score)-[:SCORED]->
  (m:Match)-[:PLAYED]->
  (r:Round)-[:ROUND_OF]->
  (e:Event)-[:EVENT_OF]->
  (ed:Edition)-[:IN_YEAR]->
  (y:Year)
WHERE
  ($years IS NULL OR y.id IN $years) AND
  ($from IS NULL OR y.id >= $from) AND
  ($to IS NULL OR y.id <= $to) AND
  (NOT $singlesOnly OR s:Singles)
OPTIONAL MATCH (e)-[:ON_SURFACE]->(z:Surface)
OPTIONAL MATCH (ed)-[:ON_SURFACE]->(edz:Surface)
CALL (p, s, m) {
  OPTIONAL MATCH (o:Player)-[t:ENTERED]->(:Entry)-[:SCORED]->(os:Score)-[:SCORED]->(m)
  WHERE o.id <> p.id AND os <> s
  RETURN o, t, os
  LIMIT 1
}
WITH p, s, m, r, e, ed, y, o, t, os, coalesce(z, edz) AS surface
RETURN CASE WHEN m IS NULL THEN null ELSE {
  type: CASE WHEN s:Singles THEN 'Singles' ELSE 'Doubles' END,
  draw: CASE WHEN s:Main THEN 'Main' ELSE 'Qualifying' END,
  round: r.round,
  won: s:Winner,
  tour: coalesce(
    [x IN labels(e) WHERE x IN ['ATP', 'WTA', 'Men', 'Women']][0],
    [x IN labels(p) WHERE x IN ['ATP', 'WTA', 'Men', 'Women']][0]
  ),
  labels: labels(e),
  category: coalesce(e.category, ed.category),
  surface: surface.surface,
  environment: surface.environment,
  year: y.id,
  best_of: CASE WHEN m:BestOf3 THEN 3 ELSE 5 END,
  score: apoc.map.submap(s, ['s1', 's2', 's3', 's4', 's5'], null, false),
  opponent: apoc.map.merge(
    apoc.map.submap(os, ['s1', 's2', 's3', 's4', 's5'], null, false),
    {rh: o.rh, rank: t.rank}
  ),
  points: apoc.map.submap(s, [
    'aces', 'dfs', 'serve1', 'serve2', 'serve1_w', 'serve2_w',
    'bps_faced', 'bps_saved', 'serve_games',
    'ret1', 'ret2', 'ret1_w', 'ret2_w', 'bp_opps', 'bps_converted', 'return_games'
  ], null, false)
} END AS match
";

const H2H_OPPONENTS_CYPHER: &str = "
MATCH (p:Player {id: $id})-[:ENTERED]->
  (:Entry)-[:SCORED]->
  (s:Score)-[:SCORED]->
  (m:Singles)<-[:SCORED]-
  (:Score)<-[:SCORED]-
  (:Entry)<-[:ENTERED]-
  (opponent:Player)
WHERE opponent.id <> p.id
OPTIONAL MATCH (opponent)-[:REPRESENTS]->(c:Country)
WITH
  apoc.map.clean(
    apoc.map.merge(
      apoc.map.submap(opponent, ['id', 'first_name', 'last_name'], null, false),
      {country: properties(c)}
    ),
    [],
    [null]
  ) AS opponent,
  COUNT(m) AS matches,
  COUNT(CASE WHEN s:Winner THEN s END) AS wins
WHERE matches > 0
RETURN opponent, matches, wins
ORDER BY matches DESC, wins DESC, opponent.id
LIMIT $limit
";

const TOURNAMENT_EXISTS_CYPHER: &str = "
MATCH (t:Tournament {id: $id})
RETURN t.id AS id
LIMIT 1
";

const CHAMPION_MATCHES_CYPHER: &str = "
MATCH
  (:Tournament {id: $id})<-[:EDITION_OF]-
  (ed:Edition)<-[:EVENT_OF]-
  (e:Event)<-[:ROUND_OF]-
  (:Round {round: 'Final'})<-[:PLAYED]-
  (:Match)<-[:SCORED]-
  (:Winner)<-[:SCORED]-
  (f:Entry)
MATCH (ed)-[:IN_YEAR]->(y:Year)
CALL (f, e, ed) {
  MATCH (f)<-[:ENTERED]-(p:Player)
  OPTIONAL MATCH (p)-[:REPRESENTS]->(c:Country)
  OPTIONAL MATCH
    (p)-[z:REPRESENTED WHERE
      z.start_date <= coalesce(e.start_date, ed.start_date) AND
      z.end_date > coalesce(e.start_date, ed.start_date)
    ]->(c1:Country)
  WITH p, coalesce(properties(c1), properties(c)) AS country
  ORDER BY p.id
  RETURN COLLECT(DISTINCT apoc.map.clean(
    apoc.map.merge(
      apoc.map.submap(p, ['id', 'first_name', 'last_name'], null, false),
      {country: country}
    ),
    [],
    [null]
  )) AS team
}
MATCH (f)-[:SCORED]->(s:Score)-[:SCORED]->(:Match)<-[:SCORED]-(os:Score)
WHERE os <> s
RETURN {
  edition: ed.id,
  year: y.id,
  type: CASE WHEN f:Singles THEN 'Singles' ELSE 'Doubles' END,
  tour: [x IN labels(e) WHERE x IN ['ATP', 'WTA', 'Men', 'Women']][0],
  team: team,
  score: apoc.map.submap(s, ['s1', 's2', 's3', 's4', 's5'], null, false),
  opponent: apoc.map.submap(os, ['s1', 's2', 's3', 's4', 's5'], null, false)
} AS champion_match
ORDER BY y.id, ed.id
";

/// Shared `MATCH ... WHERE` head of the player listing statements.
macro_rules! player_filter {
    () => {
        "
MATCH (p:Player)
WHERE SIZE($tours) = 0 OR ANY(x IN $tours WHERE x IN labels(p))
CALL (p) {
  OPTIONAL MATCH
    (p)-[:ENTERED]->
    (:Entry)-[:SCORED]->
    (:Score)-[:SCORED]->
    (:Match)-[:PLAYED]->
    (:Round)-[:ROUND_OF]->
    (:Event)-[:EVENT_OF]->
    (:Edition)-[:IN_YEAR]->
    (y:Year)
  RETURN min(y.id) AS min_year, max(y.id) AS max_year
}
WITH p, min_year, max_year
WHERE
  ($min_year IS NULL OR min_year >= $min_year) AND
  ($max_year IS NULL OR max_year <= $max_year)
"
    };
}

const PLAYER_COUNT_CYPHER: &str = concat!(player_filter!(), "RETURN COUNT(p) AS count\n");

const PLAYER_LIST_CYPHER: &str = concat!(
    player_filter!(),
    "OPTIONAL MATCH (p)-[:REPRESENTS]->(c:Country)
RETURN apoc.map.clean({
  id: p.id,
  first_name: p.first_name,
  last_name: p.last_name,
  country: properties(c),
  tour: [x IN labels(p) WHERE NOT x IN ['Player', 'Coach']][0],
  min_year: min_year,
  max_year: max_year
}, [], [null]) AS player
ORDER BY p.last_name, p.first_name, p.id
SKIP $skip
LIMIT $limit
"
);

pub fn player_exists(id: &str) -> Query {
    Query::new(PLAYER_EXISTS, PLAYER_EXISTS_CYPHER).param("id", id)
}

pub fn player_details(id: &str) -> Query {
    Query::new(PLAYER_DETAILS, PLAYER_DETAILS_CYPHER).param("id", id)
}

/// `$years` for an explicit list, `$from`/`$to` for a range; unused ones are null.
fn with_years(query: Query, years: &YearFilter) -> Query {
    let (only, from, to) = match years {
        YearFilter::Any => (None, None, None),
        YearFilter::Only(years) => (Some(years.clone()), None, None),
        YearFilter::Between { from, to } => (None, Some(*from), Some(*to)),
    };
    query.param("years", only).param("from", from).param("to", to)
}

/// One row per scored match of the player, `match` null when there are none.
pub fn match_records(id: &str, years: &YearFilter, singles_only: bool) -> Query {
    with_years(Query::new(MATCH_RECORDS, MATCH_RECORDS_CYPHER), years)
        .param("id", id)
        .param("singlesOnly", singles_only)
}

pub fn h2h_opponents(id: &str, limit: usize) -> Query {
    Query::new(H2H_OPPONENTS, H2H_OPPONENTS_CYPHER)
        .param("id", id)
        .param("limit", limit as u64)
}

pub fn tournament_exists(id: i64) -> Query {
    Query::new(TOURNAMENT_EXISTS, TOURNAMENT_EXISTS_CYPHER).param("id", id)
}

/// One row per match played by a champion entry of the tournament.
pub fn champion_matches(id: i64) -> Query {
    Query::new(CHAMPION_MATCHES, CHAMPION_MATCHES_CYPHER).param("id", id)
}

fn with_player_filter(query: Query, filter: &PlayerListQuery) -> Query {
    let tours: Vec<&str> = filter.tours.iter().map(|t| t.as_str()).collect();
    query
        .param("tours", tours)
        .param("min_year", filter.min_year)
        .param("max_year", filter.max_year)
}

pub fn player_count(filter: &PlayerListQuery) -> Query {
    with_player_filter(Query::new(PLAYER_COUNT, PLAYER_COUNT_CYPHER), filter)
}

pub fn player_list(filter: &PlayerListQuery) -> Query {
    with_player_filter(Query::new(PLAYER_LIST, PLAYER_LIST_CYPHER), filter)
        .param("skip", filter.skip)
        .param("limit", filter.offset)
}
