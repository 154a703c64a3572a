//! C5: composes C2-C4 per division, assigns referees, and assigns the
//! public, contiguous `matchId` sequence.

use crate::bracket::build_bracket;
use crate::domain::{Event, EventGraph, EventKind, Match, Team, TeamRef};
use crate::errors::{ScheduleError, ScheduleResult};
use crate::lock::EventLock;
use crate::placement::{default_horizon, expand_weekly_intervals, place_matches, PlacementState};
use crate::round_robin::generate_round_robin;
use crate::validate::validate_event_for_scheduling;
use uuid::Uuid;

/// The result of `schedule_event`: the (possibly window-extended) event,
/// its full match set with public `matchId`s assigned, and whether the
/// event's effective end was extended past the originally requested end.
#[derive(Debug)]
pub struct ScheduleOutcome {
    pub event: Event,
    pub matches: Vec<Match>,
    pub preview: bool,
}

/// `scheduleEvent(event, context) -> { event, matches, preview }`.
///
/// Never mutates the collaborator store; the caller persists the result
/// inside the same lock scope that produced it.
#[tracing::instrument(skip(lock, graph), fields(event_id = %graph.event.id()))]
pub fn schedule_event(lock: &EventLock, mut graph: EventGraph) -> ScheduleResult<ScheduleOutcome> {
    if !lock.guards(graph.event.id()) {
        tracing::warn!("schedule_event called without a matching event lock");
        return Err(ScheduleError::Concurrency);
    }

    let errors = validate_event_for_scheduling(&graph);
    if !errors.is_empty() {
        tracing::debug!(error_count = errors.len(), "event failed pre-flight validation");
        return Err(ScheduleError::config(errors.join("; ")));
    }

    let requested_end = graph.event.end();
    let mut all_matches: Vec<Match> = Vec::new();
    let mut generation_order: u64 = 0;

    for division_id in graph.division_ids_in_order() {
        let division_tag = if graph.event.single_division() {
            None
        } else {
            Some(division_id)
        };

        let mut teams: Vec<&Team> = if graph.event.single_division() {
            graph.teams.iter().collect()
        } else {
            graph.teams_in_division(division_id)
        };
        teams.sort_by_key(|t| (t.seed().max(1), t.id()));
        let team_ids: Vec<Uuid> = teams.iter().map(|t| t.id()).collect();

        match graph.event.kind() {
            EventKind::League | EventKind::Casual | EventKind::Template => {
                let rounds = generate_round_robin(&team_ids, graph.event.games_per_opponent());
                for (round_idx, round) in rounds.iter().enumerate() {
                    for (a, b) in round {
                        let mut m = Match::new_abstract(Uuid::new_v4(), division_tag, generation_order);
                        generation_order += 1;
                        m.team1 = TeamRef::Concrete(*a);
                        m.team2 = TeamRef::Concrete(*b);
                        m.round_robin_round = Some(round_idx as u32);
                        all_matches.push(m);
                    }
                }

                if graph.event.include_playoffs() {
                    let playoff_count = graph.event.playoff_team_count().unwrap_or(0) as usize;
                    if playoff_count > team_ids.len() {
                        return Err(ScheduleError::config(format!(
                            "playoffTeamCount {playoff_count} exceeds participating teams ({})",
                            team_ids.len()
                        )));
                    }
                    // Distinct synthetic ids, one per season-rank slot: `rank_of`
                    // recovers 1..K by position, which collapses to the same
                    // rank for every slot if these aren't pairwise distinct.
                    let top_k: Vec<Uuid> = (0..playoff_count).map(|_| Uuid::new_v4()).collect();
                    let build = build_bracket(
                        &top_k,
                        division_tag,
                        graph.event.double_elimination(),
                        generation_order,
                    )?;
                    let round_offset = rounds.len() as u32;
                    let mut bracket_matches = build.matches;
                    // Round-1 placeholders reference "top-K of regular season"
                    // by rank rather than a concrete team id, since standings
                    // don't exist until the regular season concludes.
                    for m in bracket_matches.iter_mut() {
                        if m.previous_left.is_none() {
                            if let TeamRef::Concrete(_) = m.team1 {
                                m.team1 = TeamRef::SeasonRank(rank_of(&m.team1, &top_k));
                            }
                        }
                        if m.previous_right.is_none() {
                            if let TeamRef::Concrete(_) = m.team2 {
                                m.team2 = TeamRef::SeasonRank(rank_of(&m.team2, &top_k));
                            }
                        }
                        m.bracket_round = m.bracket_round.map(|r| r + round_offset);
                    }
                    generation_order += bracket_matches.len() as u64;
                    all_matches.extend(bracket_matches);
                }
            }
            EventKind::Tournament => {
                let build = build_bracket(
                    &team_ids,
                    division_tag,
                    graph.event.double_elimination(),
                    generation_order,
                )?;
                generation_order += build.matches.len() as u64;
                all_matches.extend(build.matches);
            }
        }
    }

    tracing::debug!(match_count = all_matches.len(), "abstract matches generated, entering placement");
    let horizon = default_horizon(&graph.event);
    let intervals = expand_weekly_intervals(&graph.event, &graph.time_slots, horizon);
    let mut state = PlacementState::new(intervals);
    let rest_time = chrono::Duration::minutes(graph.event.rest_time_minutes() as i64);
    place_matches(&graph.event, &mut all_matches, &graph.fields, &mut state, rest_time)?;

    if graph.event.do_teams_ref() {
        assign_referees(&graph, &mut all_matches, &mut state);
    }

    all_matches.sort_by_key(|m| m.generation_order);
    for (idx, m) in all_matches.iter_mut().enumerate() {
        m.match_number = idx as i64 + 1;
    }

    let mut effective_end = requested_end;
    for m in &all_matches {
        if let Some(end) = m.end {
            if end > effective_end {
                effective_end = end;
            }
        }
    }
    let preview = effective_end > requested_end;
    if preview {
        tracing::info!(%effective_end, "event window extended past requested end to fit all matches");
    }
    graph.event.set_end(effective_end);

    Ok(ScheduleOutcome {
        event: graph.event,
        matches: all_matches,
        preview,
    })
}

fn rank_of(team_ref: &TeamRef, top_k: &[Uuid]) -> u32 {
    match team_ref {
        TeamRef::Concrete(id) => top_k.iter().position(|x| x == id).map(|p| p as u32 + 1).unwrap_or(1),
        _ => 1,
    }
}

fn assign_referees(graph: &EventGraph, matches: &mut [Match], state: &mut PlacementState) {
    for i in 0..matches.len() {
        let Some(division_id) = matches[i].division() else {
            continue;
        };
        let (Some(start), Some(end)) = (matches[i].start(), matches[i].end()) else {
            continue;
        };
        let busy: Vec<Uuid> = matches
            .iter()
            .filter(|other| other.overlaps(start, end))
            .flat_map(|other| [other.team1().concrete(), other.team2().concrete()])
            .flatten()
            .collect();
        let candidates: Vec<(Uuid, u32)> = graph
            .teams_in_division(division_id)
            .iter()
            .filter(|t| !busy.contains(&t.id()))
            .map(|t| (t.id(), t.seed()))
            .collect();
        crate::placement::assign_team_referee(state, &mut matches[i], &candidates);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Division, PlayingField, Team, TimeSlot};
    use chrono::{Duration, TimeZone, Utc};

    fn base_graph(n_teams: usize, kind: EventKind) -> EventGraph {
        let start = Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap();
        let end = start + Duration::weeks(8);
        let host = Uuid::new_v4();
        let org = Uuid::new_v4();
        let division_id = Uuid::new_v4();
        let event = Event::new(Uuid::new_v4(), "Event", start, end, kind, host, org)
            .set_match_duration_minutes(Some(60))
            .with_division_ids(vec![division_id]);
        let mut graph = EventGraph::new(event);
        graph.divisions.push(Division::new(division_id, "OPEN"));
        let field = PlayingField::new(Uuid::new_v4(), 1, "Court 1");
        graph.fields.push(field);
        graph
            .time_slots
            .push(TimeSlot::new(Uuid::new_v4(), 5, 9 * 60, 13 * 60).with_days_of_week(vec![5, 6]));
        for i in 0..n_teams {
            graph.teams.push(
                Team::new(Uuid::new_v4(), division_id, Uuid::new_v4(), format!("Team {i}"))
                    .with_seed(i as u32 + 1),
            );
        }
        graph
    }

    #[test]
    fn round_robin_weekend_league_produces_28_matches() {
        let graph = base_graph(8, EventKind::League);
        let lock = EventLock::new(graph.event.id());
        let outcome = schedule_event(&lock, graph).unwrap();
        assert_eq!(outcome.matches.len(), 28);
        let mut ids: Vec<i64> = outcome.matches.iter().map(|m| m.match_number()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=28).collect::<Vec<_>>());
    }

    #[test]
    fn tournament_bracket_match_count_matches_property() {
        for n in 3..12 {
            let graph = base_graph(n, EventKind::Tournament);
            let lock = EventLock::new(graph.event.id());
            let outcome = schedule_event(&lock, graph).unwrap();
            assert_eq!(outcome.matches.len(), n - 1, "n={n}");
        }
    }

    #[test]
    fn refuses_to_run_without_a_matching_lock() {
        let graph = base_graph(4, EventKind::League);
        let other_event = Uuid::new_v4();
        let lock = EventLock::new(other_event);
        let result = schedule_event(&lock, graph);
        assert!(matches!(result, Err(ScheduleError::Concurrency)));
    }

    #[test]
    fn determinism_same_input_same_output() {
        let graph1 = base_graph(6, EventKind::League);
        let graph2 = graph1.clone();
        let lock1 = EventLock::new(graph1.event.id());
        let lock2 = EventLock::new(graph2.event.id());
        let out1 = schedule_event(&lock1, graph1).unwrap();
        let out2 = schedule_event(&lock2, graph2).unwrap();
        let starts1: Vec<_> = out1.matches.iter().map(|m| (m.match_number(), m.start())).collect();
        let starts2: Vec<_> = out2.matches.iter().map(|m| (m.match_number(), m.start())).collect();
        assert_eq!(starts1, starts2);
    }
}
