//! C4: expands weekly templates into concrete intervals and greedily places
//! abstract matches onto `(field, start, end)` triples honoring field
//! compatibility, field non-overlap, and per-team rest constraints.

use crate::domain::{Event, FieldBinding, Match, PlayingField, TimeSlot, WeeklyInterval};
use crate::errors::{ScheduleError, ScheduleResult};
use chrono::{DateTime, Datelike, Duration, Utc, Weekday};
use std::collections::HashMap;
use uuid::Uuid;

/// Caps how many weekly occurrences are materialized past `event.start`
/// when `noFixedEndDateTime` is true, bounding memory while still covering
/// any realistic match count (52 weeks plus a week of slack).
const MAX_HORIZON_WEEKS: i64 = 53;

fn weekday_index(day: Weekday) -> u8 {
    // Monday-based 0..6, matching the template's `dayOfWeek` encoding.
    day.num_days_from_monday() as u8
}

/// Expands every template into its concrete weekly occurrences within
/// `[max(event.start, template.start_date), min(horizon_end, template.end_date)]`.
pub fn expand_weekly_intervals(
    event: &Event,
    templates: &[TimeSlot],
    horizon_end: DateTime<Utc>,
) -> Vec<WeeklyInterval> {
    let mut intervals = Vec::new();
    for template in templates {
        let window_start = template
            .start_date()
            .map_or(event.start(), |d| d.max(event.start()));
        let window_end = template
            .end_date()
            .map_or(horizon_end, |d| d.min(horizon_end));
        if window_start >= window_end {
            continue;
        }

        let days = template.days();
        let fields: Vec<Option<Uuid>> = match template.field_binding() {
            FieldBinding::Any => vec![None],
            FieldBinding::Single(id) => vec![Some(*id)],
            FieldBinding::Multiple(ids) => ids.iter().map(|id| Some(*id)).collect(),
        };

        let mut cursor = window_start.date_naive();
        let end_date = window_end.date_naive();
        while cursor <= end_date {
            if days.contains(&weekday_index(cursor.weekday())) {
                let day_start = cursor.and_hms_opt(0, 0, 0).expect("midnight is valid");
                let start = DateTime::<Utc>::from_naive_utc_and_offset(
                    day_start + Duration::minutes(template.start_time_minutes() as i64),
                    Utc,
                );
                let end = DateTime::<Utc>::from_naive_utc_and_offset(
                    day_start + Duration::minutes(template.end_time_minutes() as i64),
                    Utc,
                );
                if start >= window_start && end <= window_end && start < end {
                    for field in &fields {
                        intervals.push(WeeklyInterval {
                            field: *field,
                            start,
                            end,
                            template_id: template.id(),
                            division: template.division_id(),
                        });
                    }
                }
            }
            cursor += Duration::days(1);
        }
    }
    intervals.sort_by_key(|iv| (iv.start, iv.field));
    intervals
}

/// Abstract matches carry a deterministic placement order as computed by
/// `[SUPPLEMENT]` §4 of the expanded design: bracket rounds (using the
/// bracket-round cursor) ascending, offset round-robin rounds following,
/// `matchId`-equivalent generation order breaking ties.
fn placement_rank(m: &Match) -> (u32, u64) {
    let primary = m.bracket_round.or(m.round_robin_round).unwrap_or(u32::MAX);
    (primary, m.generation_order)
}

struct FreeInterval {
    field: Option<Uuid>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    template_id: Uuid,
    /// The originating template's division restriction, `None` = any
    /// division may use this interval. See `TimeSlot::applies_to_division`.
    division: Option<Uuid>,
}

/// Mutable placement state: free intervals and each team's latest booked
/// end-instant, reconstructed fresh for a full schedule build and
/// reconstructible from a persisted schedule for auto-reschedule (C6).
pub struct PlacementState {
    free: Vec<FreeInterval>,
    latest_end: HashMap<Uuid, DateTime<Utc>>,
    referee_counts: HashMap<Uuid, u32>,
}

impl PlacementState {
    pub fn new(intervals: Vec<WeeklyInterval>) -> Self {
        let free = intervals
            .into_iter()
            .map(|iv| FreeInterval {
                field: iv.field,
                start: iv.start,
                end: iv.end,
                template_id: iv.template_id,
                division: iv.division,
            })
            .collect();
        Self {
            free,
            latest_end: HashMap::new(),
            referee_counts: HashMap::new(),
        }
    }

    /// Rebuilds latest-end bookkeeping from matches already on the
    /// schedule, used when auto-reschedule re-enters the greedy algorithm
    /// mid-event.
    pub fn observe_existing(&mut self, matches: &[Match]) {
        for m in matches {
            let (Some(start), Some(end)) = (m.start, m.end) else {
                continue;
            };
            for team in [m.team1.concrete(), m.team2.concrete()].into_iter().flatten() {
                let entry = self.latest_end.entry(team).or_insert(end);
                if end > *entry {
                    *entry = end;
                }
            }
            if let Some(referee) = m.team_referee {
                *self.referee_counts.entry(referee).or_insert(0) += 1;
            }
            // Remove the already-occupied window from whichever free
            // interval it carves out of, so re-placement never double-books.
            self.occupy(m.field, start, end);
        }
    }

    fn occupy(&mut self, field: Option<Uuid>, start: DateTime<Utc>, end: DateTime<Utc>) {
        let mut next = Vec::with_capacity(self.free.len());
        for iv in self.free.drain(..) {
            if iv.field != field || iv.end <= start || iv.start >= end {
                next.push(iv);
                continue;
            }
            if iv.start < start {
                next.push(FreeInterval {
                    field: iv.field,
                    start: iv.start,
                    end: start,
                    template_id: iv.template_id,
                    division: iv.division,
                });
            }
            if iv.end > end {
                next.push(FreeInterval {
                    field: iv.field,
                    start: end,
                    end: iv.end,
                    template_id: iv.template_id,
                    division: iv.division,
                });
            }
        }
        self.free = next;
    }

    pub(crate) fn earliest_ready(&self, rest_time: Duration, teams: &[Uuid]) -> Option<DateTime<Utc>> {
        teams
            .iter()
            .filter_map(|t| self.latest_end.get(t).map(|end| *end + rest_time))
            .max()
    }
}

pub(crate) struct Candidate {
    index: usize,
    field: Option<Uuid>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

pub(crate) fn find_candidate(
    state: &PlacementState,
    duration: Duration,
    division: Option<Uuid>,
    fields: &[PlayingField],
    ready_at: Option<DateTime<Utc>>,
) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for (idx, iv) in state.free.iter().enumerate() {
        if iv.end - iv.start < duration {
            continue;
        }
        if iv.division.is_some_and(|d| Some(d) != division) {
            continue;
        }
        let field_ok = match iv.field {
            Some(field_id) => fields
                .iter()
                .find(|f| f.id() == field_id)
                .map(|f| division.is_none_or(|d| f.supports(d)))
                .unwrap_or(false),
            None => division.is_none_or(|d| fields.iter().any(|f| f.supports(d))),
        };
        if !field_ok {
            continue;
        }
        let start = match ready_at {
            Some(ready) => ready.max(iv.start),
            None => iv.start,
        };
        if start + duration > iv.end {
            continue;
        }
        let field_number = iv
            .field
            .and_then(|id| fields.iter().find(|f| f.id() == id))
            .map(|f| f.field_number());
        let better = match &best {
            None => true,
            Some(b) => {
                (start, field_number, idx)
                    < (
                        b.start,
                        b.field.and_then(|id| fields.iter().find(|f| f.id() == id)).map(|f| f.field_number()),
                        b.index,
                    )
            }
        };
        if better {
            best = Some(Candidate {
                index: idx,
                field: iv.field.or_else(|| {
                    // Floating interval: bind to the lowest-numbered
                    // qualifying field.
                    division.and_then(|d| {
                        fields
                            .iter()
                            .filter(|f| f.supports(d))
                            .min_by_key(|f| f.field_number())
                            .map(|f| f.id())
                    })
                }),
                start,
                end: start + duration,
            });
        }
    }
    best
}

/// Places every abstract match in `matches` in deterministic order. Mutates
/// each match's `field`/`start`/`end` in place. Fails with
/// `ScheduleInfeasibleError` when `no_fixed_end_date_time` is false and a
/// match cannot be placed within `event.end`.
pub fn place_matches(
    event: &Event,
    matches: &mut [Match],
    fields: &[PlayingField],
    state: &mut PlacementState,
    rest_time: Duration,
) -> ScheduleResult<()> {
    let mut order: Vec<usize> = (0..matches.len()).collect();
    order.sort_by_key(|&i| placement_rank(&matches[i]));

    let mut unplaced = 0usize;
    for i in order {
        let duration = event
            .match_duration()
            .ok_or_else(|| ScheduleError::config("event has no usable match duration"))?;
        let teams: Vec<Uuid> = [matches[i].team1.concrete(), matches[i].team2.concrete()]
            .into_iter()
            .flatten()
            .collect();
        let ready_at = state.earliest_ready(rest_time, &teams);
        let division = matches[i].division();

        match find_candidate(state, duration, division, fields, ready_at) {
            Some(candidate) => {
                apply_candidate(state, &mut matches[i], candidate, duration);
            }
            None if event.no_fixed_end_date_time() => {
                extend_horizon_and_retry(event, &mut matches[i], state, fields, duration, ready_at)?;
            }
            None => {
                unplaced += 1;
            }
        }
    }

    if unplaced > 0 {
        return Err(ScheduleError::Infeasible {
            approximate_matches_needed: unplaced,
        });
    }
    Ok(())
}

pub(crate) fn apply_candidate(state: &mut PlacementState, m: &mut Match, candidate: Candidate, duration: Duration) {
    let iv = &state.free[candidate.index];
    let field = candidate.field;
    let template_id = iv.template_id;
    let division = iv.division;
    let interval_start = iv.start;
    let interval_end = iv.end;
    state.free.remove(candidate.index);

    let leading = candidate.start - interval_start;
    if leading >= duration {
        state.free.push(FreeInterval {
            field,
            start: interval_start,
            end: candidate.start,
            template_id,
            division,
        });
    }
    let remainder_start = candidate.start + duration;
    let trailing = interval_end - remainder_start;
    if trailing >= duration {
        state.free.push(FreeInterval {
            field,
            start: remainder_start,
            end: interval_end,
            template_id,
            division,
        });
    }

    m.field = field;
    m.start = Some(candidate.start);
    m.end = Some(candidate.end);

    for team in [m.team1.concrete(), m.team2.concrete()].into_iter().flatten() {
        state.latest_end.insert(team, candidate.end);
    }
}

/// Synthesizes one more weekly occurrence past the current horizon for a
/// `noFixedEndDateTime` event when no existing free interval fits, then
/// retries placement once.
pub(crate) fn extend_horizon_and_retry(
    event: &Event,
    m: &mut Match,
    state: &mut PlacementState,
    fields: &[PlayingField],
    duration: Duration,
    ready_at: Option<DateTime<Utc>>,
) -> ScheduleResult<()> {
    let base = state
        .free
        .iter()
        .map(|iv| iv.start)
        .chain(state.latest_end.values().copied())
        .max()
        .unwrap_or(event.start());
    let next_week_start = base + Duration::weeks(1);
    tracing::trace!(%next_week_start, "no free interval fits, synthesizing one more weekly occurrence");
    state.free.push(FreeInterval {
        field: None,
        start: next_week_start,
        end: next_week_start + duration,
        template_id: Uuid::nil(),
        division: None,
    });
    let division = m.division();
    match find_candidate(state, duration, division, fields, ready_at) {
        Some(candidate) => {
            apply_candidate(state, m, candidate, duration);
            Ok(())
        }
        None => Err(ScheduleError::config(
            "unable to synthesize a continuation interval for an open-ended event",
        )),
    }
}

/// Bounds the expansion horizon for `noFixedEndDateTime` events.
pub fn default_horizon(event: &Event) -> DateTime<Utc> {
    if event.no_fixed_end_date_time() {
        event.start() + Duration::weeks(MAX_HORIZON_WEEKS)
    } else {
        event.end()
    }
}

/// C4 step 4: when `doTeamsRef` is set and a match has no explicit referee,
/// picks the team in the same division not playing during `[start, end)`
/// with the fewest prior referee assignments, tie-broken by seed ascending.
pub fn assign_team_referee(
    state: &mut PlacementState,
    m: &mut Match,
    candidates: &[(Uuid, u32)], // (team_id, seed), already filtered to the match's division minus its own two teams
) {
    if m.team_referee.is_some() || m.referee.is_some() {
        return;
    }
    let (Some(start), Some(end)) = (m.start, m.end) else {
        return;
    };
    let busy: Vec<Uuid> = [m.team1.concrete(), m.team2.concrete()].into_iter().flatten().collect();
    let pick = candidates
        .iter()
        .filter(|(id, _)| !busy.contains(id))
        .min_by_key(|(id, seed)| (*state.referee_counts.get(id).unwrap_or(&0), *seed))
        .map(|(id, _)| *id);
    // Availability during [start, end) is enforced by the caller passing
    // only teams with no overlapping match; this function just ranks them.
    let _ = (start, end);
    if let Some(referee_team) = pick {
        m.team_referee = Some(referee_team);
        *state.referee_counts.entry(referee_team).or_insert(0) += 1;
    }
}
