//! C6: applies in-flight score edits, finalizes matches, advances bracket
//! links, updates team records, and auto-reschedules incomplete matches
//! whose time has passed.

use crate::context::SchedulerContext;
use crate::domain::{EventGraph, Match, TeamRef};
use crate::errors::{AutoRescheduleFailure, ScheduleError, ScheduleResult};
use crate::lock::EventLock;
use crate::placement::{default_horizon, expand_weekly_intervals, PlacementState};
use crate::utils::validation::{FieldError, ValidationErrors};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The subset of a match's fields a caller may request to change.
/// `Some(None)` clears an optional field; `None` leaves it untouched.
#[derive(Debug, Default, Clone)]
pub struct MatchUpdates {
    pub team1_points: Option<Vec<i32>>,
    pub team2_points: Option<Vec<i32>>,
    pub set_results: Option<Vec<u8>>,
    pub team1: Option<TeamRef>,
    pub team2: Option<TeamRef>,
    pub referee: Option<Option<Uuid>>,
    pub team_referee: Option<Option<Uuid>>,
    pub field: Option<Option<Uuid>>,
    pub locked: Option<bool>,
    pub referee_checked_in: Option<bool>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

fn require_lock(lock: &EventLock, graph: &EventGraph) -> ScheduleResult<()> {
    if lock.guards(graph.event.id()) {
        Ok(())
    } else {
        Err(ScheduleError::Concurrency)
    }
}

/// `applyMatchUpdates(event, match, updates)`.
pub fn apply_match_updates(
    lock: &EventLock,
    graph: &mut EventGraph,
    match_id: Uuid,
    updates: MatchUpdates,
    caller_is_host_or_admin: bool,
) -> ScheduleResult<()> {
    require_lock(lock, graph)?;

    let m = graph
        .match_by_id(match_id)
        .ok_or_else(|| ScheduleError::config("match not found"))?;
    if m.is_locked() && !caller_is_host_or_admin {
        return Err(ScheduleError::config("match is locked"));
    }

    let team1_points = updates.team1_points.clone().unwrap_or_else(|| m.team1_points.clone());
    let team2_points = updates.team2_points.clone().unwrap_or_else(|| m.team2_points.clone());
    let set_results = updates.set_results.clone().unwrap_or_else(|| m.set_results.clone());
    if team1_points.len() != team2_points.len() || team1_points.len() != set_results.len() {
        let err = FieldError::builder()
            .set_field("setResults")
            .add_invalid_format()
            .add_message("team1Points, team2Points, and setResults must have equal lengths")
            .build();
        return Err(ValidationErrors::from(err).into());
    }
    if set_results.iter().any(|r| *r > 2) {
        let err = FieldError::builder()
            .set_field("setResults")
            .add_invalid_format()
            .add_message("setResults entries must be 0, 1, or 2")
            .build();
        return Err(ValidationErrors::from(err).into());
    }

    let m = graph.match_by_id_mut(match_id).expect("checked above");
    m.team1_points = team1_points;
    m.team2_points = team2_points;
    m.set_results = set_results;
    if let Some(team1) = updates.team1 {
        m.team1 = team1;
    }
    if let Some(team2) = updates.team2 {
        m.team2 = team2;
    }
    if let Some(referee) = updates.referee {
        m.referee = referee;
    }
    if let Some(team_referee) = updates.team_referee {
        m.team_referee = team_referee;
    }
    if let Some(field) = updates.field {
        m.field = field;
    }
    if let Some(locked) = updates.locked {
        m.locked = locked;
    }
    if let Some(checked_in) = updates.referee_checked_in {
        m.referee_checked_in = checked_in;
    }
    if let Some(start) = updates.start {
        m.start = Some(start);
    }
    if let Some(end) = updates.end {
        m.end = Some(end);
    }
    Ok(())
}

fn points_to_victory_for<'a>(graph: &'a EventGraph, m: &Match) -> &'a [u32] {
    let event = &graph.event;
    if m.is_losers_bracket() {
        event.loser_bracket_points_to_victory()
    } else if m.winner_next().is_some() || m.previous_left().is_some() || m.previous_right().is_some() {
        event.winner_bracket_points_to_victory()
    } else {
        event.points_to_victory()
    }
}

fn determine_winner(graph: &EventGraph, m: &Match) -> ScheduleResult<bool> {
    if m.set_results.is_empty() || m.set_results.iter().any(|r| *r == 0) {
        return Err(ScheduleError::config("match is not fully scored"));
    }
    let team1_sets = m.set_results.iter().filter(|r| **r == 1).count();
    let team2_sets = m.set_results.iter().filter(|r| **r == 2).count();
    if team1_sets != team2_sets {
        return Ok(team1_sets > team2_sets);
    }

    let team1_points: i64 = m.team1_points.iter().map(|p| *p as i64).sum();
    let team2_points: i64 = m.team2_points.iter().map(|p| *p as i64).sum();
    let thresholds = points_to_victory_for(graph, m);
    let required = thresholds.iter().max().copied().unwrap_or(0) as i64;
    if required > 0 && team1_points != team2_points {
        if team1_points >= required && team1_points > team2_points {
            return Ok(true);
        }
        if team2_points >= required && team2_points > team1_points {
            return Ok(false);
        }
    }
    Err(ScheduleError::config("Set cannot end in a tie"))
}

fn advance_winner_or_loser(matches: &mut [Match], source_id: Uuid, target_id: Uuid, advancing_team: Uuid) {
    let Some(target_pos) = matches.iter().position(|m| m.id() == target_id) else {
        return;
    };
    let is_left = matches[target_pos].previous_left() == Some(source_id);
    let target = &mut matches[target_pos];
    if is_left {
        target.team1 = TeamRef::Concrete(advancing_team);
    } else {
        target.team2 = TeamRef::Concrete(advancing_team);
    }
}

/// `finalizeMatch(event, match, currentTime)`.
#[tracing::instrument(skip(lock, ctx, graph), fields(event_id = %graph.event.id()))]
pub async fn finalize_match(
    lock: &EventLock,
    ctx: &SchedulerContext,
    graph: &mut EventGraph,
    match_id: Uuid,
    current_time: DateTime<Utc>,
) -> ScheduleResult<()> {
    require_lock(lock, graph)?;

    let m = graph
        .match_by_id(match_id)
        .ok_or_else(|| ScheduleError::config("match not found"))?;
    if m.is_locked() {
        // Idempotent: finalizing an already-finalized match is a no-op.
        if ctx.debug {
            tracing::debug!(%match_id, "finalize_match called on an already-locked match, no-op");
        }
        return Ok(());
    }

    let team1_won = determine_winner(graph, m)?;
    let team1 = m.team1().concrete();
    let team2 = m.team2().concrete();
    let winner_next = m.winner_next();
    let loser_next = m.loser_next();
    let gf_teams = (m.team1().clone(), m.team2().clone());
    let is_grand_final = graph
        .matches
        .iter()
        .any(|other| other.previous_left() == Some(match_id) && other.is_losers_bracket() && other.is_locked());

    if let Some(team1_id) = team1 {
        let team = graph.team_by_id_mut(team1_id);
        if let Some(team) = team {
            if team1_won {
                team.record_win();
            } else {
                team.record_loss();
            }
            team.record_match(match_id);
        }
    }
    if let Some(team2_id) = team2 {
        let team = graph.team_by_id_mut(team2_id);
        if let Some(team) = team {
            if team1_won {
                team.record_loss();
            } else {
                team.record_win();
            }
            team.record_match(match_id);
        }
    }

    let winner_id = if team1_won { team1 } else { team2 };
    let loser_id = if team1_won { team2 } else { team1 };

    if let (Some(next), Some(winner)) = (winner_next, winner_id) {
        advance_winner_or_loser(&mut graph.matches, match_id, next, winner);
    }
    if let (Some(next), Some(loser)) = (loser_next, loser_id) {
        advance_winner_or_loser(&mut graph.matches, match_id, next, loser);
    }

    if is_grand_final {
        // team2 is always the loser-bracket finalist per the bracket
        // builder's construction (team1 = winner-bracket champion).
        let loser_bracket_finalist_won = !team1_won;
        if loser_bracket_finalist_won {
            if let Some(reset_pos) = graph
                .matches
                .iter()
                .position(|other| other.previous_left() == Some(match_id))
            {
                let (t1, t2) = gf_teams;
                let reset = &mut graph.matches[reset_pos];
                reset.locked = false;
                reset.team1 = t1;
                reset.team2 = t2;
            }
        }
    }

    let m = graph.match_by_id_mut(match_id).expect("checked above");
    m.locked = true;

    auto_reschedule(lock, ctx, graph, current_time).await
}

/// Step 5 of finalize: re-places every unfinalized match whose scheduled
/// end has already passed. Matches with partial scores are "in progress"
/// and are never auto-moved.
async fn auto_reschedule(
    lock: &EventLock,
    ctx: &SchedulerContext,
    graph: &mut EventGraph,
    current_time: DateTime<Utc>,
) -> ScheduleResult<()> {
    require_lock(lock, graph)?;

    let mut eligible: Vec<Uuid> = graph
        .matches
        .iter()
        .filter(|m| m.is_eligible_for_auto_reschedule(current_time))
        .map(|m| m.id())
        .collect();
    if eligible.is_empty() {
        return Ok(());
    }
    if ctx.debug {
        tracing::debug!(eligible_count = eligible.len(), "auto-reschedule found stale matches to re-place");
    }
    eligible.sort_by_key(|id| graph.match_by_id(*id).map(|m| m.match_number()).unwrap_or(i64::MAX));

    let horizon = default_horizon(&graph.event);
    let intervals = expand_weekly_intervals(&graph.event, &graph.time_slots, horizon);
    let mut state = PlacementState::new(intervals);
    let settled: Vec<Match> = graph
        .matches
        .iter()
        .filter(|m| !eligible.contains(&m.id()))
        .cloned()
        .collect();
    state.observe_existing(&settled);

    let rest_time = chrono::Duration::minutes(graph.event.rest_time_minutes() as i64);
    let fields = graph.fields.clone();
    let no_fixed_end = graph.event.no_fixed_end_date_time();

    for match_id in eligible {
        let duration = graph
            .event
            .match_duration()
            .ok_or_else(|| ScheduleError::config("event has no usable match duration"))?;
        let (teams, division) = {
            let m = graph.match_by_id(match_id).expect("id collected above");
            (
                [m.team1().concrete(), m.team2().concrete()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>(),
                m.division(),
            )
        };
        let ready_at = state.earliest_ready(rest_time, &teams);
        match crate::placement::find_candidate(&state, duration, division, &fields, ready_at) {
            Some(candidate) => {
                let m = graph.match_by_id_mut(match_id).expect("id collected above");
                crate::placement::apply_candidate(&mut state, m, candidate, duration);
            }
            None if no_fixed_end => {
                // Open-ended events always have room; synthesize one more
                // weekly occurrence the same way the initial placement does.
                let m = graph
                    .matches
                    .iter_mut()
                    .find(|m| m.id() == match_id)
                    .expect("id collected above");
                crate::placement::extend_horizon_and_retry(&graph.event, m, &mut state, &fields, duration, ready_at)?;
            }
            None => {
                let m = graph.match_by_id(match_id).expect("id collected above");
                let failure = AutoRescheduleFailure {
                    event_id: graph.event.id(),
                    event_name: graph.event.name().to_string(),
                    event_end_iso: graph.event.end().to_rfc3339(),
                    host_id: graph.event.host_id(),
                    match_id: m.match_number(),
                };
                tracing::warn!(match_id = failure.match_id, "auto-reschedule could not fit match within event window");
                ctx.notifier.notify_host_of_auto_reschedule_failure(failure.clone()).await;
                return Err(ScheduleError::WindowExceeded(failure));
            }
        }
    }
    Ok(())
}
