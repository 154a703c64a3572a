//! C1: pure projections and input validation over the domain model.

use crate::domain::EventGraph;

/// Validates that an event's inputs are usable for scheduling. Returns a
/// list of human-readable errors; an empty list means the event is
/// schedulable. Never mutates `graph`.
pub fn validate_event_for_scheduling(graph: &EventGraph) -> Vec<String> {
    let mut errors = Vec::new();
    let event = &graph.event;

    if graph.divisions.is_empty() {
        errors.push("event has no divisions".to_string());
    }

    for division in &graph.divisions {
        let qualifying = graph.fields_supporting(division.id());
        if qualifying.is_empty() {
            errors.push(format!(
                "no fields are available for division {}",
                division.name()
            ));
        }
    }

    if !event.no_fixed_end_date_time() && event.start() >= event.end() {
        errors.push("event start must be before end".to_string());
    }

    let duration_minutes = if event.uses_sets() {
        match (event.set_duration_minutes(), event.sets_per_match()) {
            (Some(set_minutes), Some(sets)) => Some(set_minutes as i64 * sets as i64),
            _ => None,
        }
    } else {
        event.match_duration_minutes().map(|m| m as i64)
    };
    match duration_minutes {
        Some(minutes) if minutes > 0 => {}
        _ => errors.push("match duration must be positive".to_string()),
    }

    if event.uses_sets() && event.sets_per_match().unwrap_or(0) < 1 {
        errors.push("setsPerMatch must be at least 1 when usesSets is true".to_string());
    }

    if event.include_playoffs() {
        if let Some(playoff_team_count) = event.playoff_team_count() {
            let participating: usize = if event.single_division() {
                graph.teams.len()
            } else {
                graph
                    .divisions
                    .iter()
                    .map(|d| graph.teams_in_division(d.id()).len())
                    .max()
                    .unwrap_or(0)
            };
            if playoff_team_count as usize > participating {
                errors.push(format!(
                    "playoffTeamCount {playoff_team_count} exceeds participating teams ({participating})"
                ));
            }
        }
    }

    errors
}
