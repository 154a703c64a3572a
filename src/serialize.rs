//! C8: projects the internal domain model to the wire shape in the public
//! interface contract. Hydration of nested objects is a caller concern —
//! this module only ever emits ids.

use crate::domain::{Event, Match, TeamRef};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
#[cfg(test)]
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchWire {
    #[serde(rename = "matchId")]
    pub match_id: i64,
    #[serde(rename = "team1Id")]
    pub team1_id: Option<String>,
    #[serde(rename = "team2Id")]
    pub team2_id: Option<String>,
    #[serde(rename = "refereeId")]
    pub referee_id: Option<String>,
    #[serde(rename = "teamRefereeId")]
    pub team_referee_id: Option<String>,
    #[serde(rename = "fieldId")]
    pub field_id: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    #[serde(rename = "team1Points")]
    pub team1_points: Vec<i32>,
    #[serde(rename = "team2Points")]
    pub team2_points: Vec<i32>,
    #[serde(rename = "setResults")]
    pub set_results: Vec<u8>,
    #[serde(rename = "losersBracket")]
    pub losers_bracket: bool,
    #[serde(rename = "winnerNextMatchId")]
    pub winner_next_match_id: Option<String>,
    #[serde(rename = "loserNextMatchId")]
    pub loser_next_match_id: Option<String>,
    #[serde(rename = "previousLeftId")]
    pub previous_left_id: Option<String>,
    #[serde(rename = "previousRightId")]
    pub previous_right_id: Option<String>,
    pub division: Option<String>,
    pub locked: bool,
    #[serde(rename = "refereeCheckedIn")]
    pub referee_checked_in: bool,
}

fn team_ref_to_wire(team_ref: &TeamRef) -> Option<String> {
    match team_ref {
        TeamRef::Concrete(id) => Some(id.to_string()),
        // Unresolved placeholders serialize as null; a hydrating caller is
        // expected to resolve `Feeder`/`SeasonRank` itself if it needs to
        // display "TBD vs winner of match 4".
        TeamRef::Feeder(_, _) | TeamRef::SeasonRank(_) | TeamRef::Unset => None,
    }
}

fn iso(instant: chrono::DateTime<chrono::Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl From<&Match> for MatchWire {
    fn from(m: &Match) -> Self {
        MatchWire {
            match_id: m.match_number(),
            team1_id: team_ref_to_wire(m.team1()),
            team2_id: team_ref_to_wire(m.team2()),
            referee_id: m.referee.map(|id| id.to_string()),
            team_referee_id: m.team_referee.map(|id| id.to_string()),
            field_id: m.field().map(|id| id.to_string()),
            start: m.start().map(iso),
            end: m.end().map(iso),
            team1_points: m.team1_points.clone(),
            team2_points: m.team2_points.clone(),
            set_results: m.set_results().to_vec(),
            losers_bracket: m.is_losers_bracket(),
            winner_next_match_id: m.winner_next().map(|id| id.to_string()),
            loser_next_match_id: m.loser_next().map(|id| id.to_string()),
            previous_left_id: m.previous_left().map(|id| id.to_string()),
            previous_right_id: m.previous_right().map(|id| id.to_string()),
            division: m.division().map(|id| id.to_string()),
            locked: m.is_locked(),
            referee_checked_in: m.referee_checked_in,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventWire {
    pub id: String,
    pub name: String,
    pub start: String,
    pub end: String,
    #[serde(rename = "noFixedEndDateTime")]
    pub no_fixed_end_date_time: bool,
    #[serde(rename = "scheduledMatchCount")]
    pub scheduled_match_count: i64,
    #[serde(rename = "effectiveEnd")]
    pub effective_end: String,
}

impl EventWire {
    pub fn project(event: &Event, matches: &[Match]) -> Self {
        EventWire {
            id: event.id().to_string(),
            name: event.name().to_string(),
            start: iso(event.start()),
            end: iso(event.end()),
            no_fixed_end_date_time: event.no_fixed_end_date_time(),
            scheduled_match_count: matches.len() as i64,
            effective_end: iso(event.end()),
        }
    }
}

/// Projects a full schedule outcome to its wire representation.
pub fn serialize_matches(matches: &[Match]) -> Vec<MatchWire> {
    matches.iter().map(MatchWire::from).collect()
}
