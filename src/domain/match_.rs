use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which side of a feeder match a placeholder slot resolves from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FeederRole {
    Winner,
    Loser,
}

/// A match participant that may not be known yet. Placeholder variants are
/// resolved into `Concrete` by C6 finalize (bracket feeders) or by the
/// orchestrator at playoff build time (season-rank placeholders are
/// resolved once regular-season standings exist).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TeamRef {
    Concrete(Uuid),
    /// Will become the winner or loser of the named match.
    Feeder(Uuid, FeederRole),
    /// Top-K of regular season standings, 1-based rank within the division.
    SeasonRank(u32),
    Unset,
}

impl TeamRef {
    pub fn concrete(&self) -> Option<Uuid> {
        match self {
            TeamRef::Concrete(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, TeamRef::Unset)
    }
}

/// A match, abstract or scheduled. `id` is the stable internal identity used
/// for cross-references; `match_number` is the public, 1-based, contiguous
/// `matchId` assigned by the orchestrator once the full match set for an
/// event is known.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Match {
    pub(crate) id: Uuid,
    pub(crate) match_number: i64,
    pub(crate) division: Option<Uuid>,
    pub(crate) team1: TeamRef,
    pub(crate) team2: TeamRef,
    pub(crate) referee: Option<Uuid>,
    pub(crate) team_referee: Option<Uuid>,
    pub(crate) field: Option<Uuid>,
    pub(crate) start: Option<DateTime<Utc>>,
    pub(crate) end: Option<DateTime<Utc>>,
    pub(crate) team1_points: Vec<i32>,
    pub(crate) team2_points: Vec<i32>,
    pub(crate) set_results: Vec<u8>,
    pub(crate) losers_bracket: bool,
    pub(crate) winner_next: Option<Uuid>,
    pub(crate) loser_next: Option<Uuid>,
    pub(crate) previous_left: Option<Uuid>,
    pub(crate) previous_right: Option<Uuid>,
    pub(crate) locked: bool,
    pub(crate) referee_checked_in: bool,

    // Internal bookkeeping, never serialized to the wire shape (§6): the
    // order abstract matches were generated in (drives matchId assignment)
    // and the rank used to order placement within C4.
    pub(crate) generation_order: u64,
    pub(crate) bracket_round: Option<u32>,
    pub(crate) round_robin_round: Option<u32>,
}

impl Match {
    pub fn new_abstract(id: Uuid, division: Option<Uuid>, generation_order: u64) -> Self {
        Self {
            id,
            match_number: 0,
            division,
            team1: TeamRef::Unset,
            team2: TeamRef::Unset,
            referee: None,
            team_referee: None,
            field: None,
            start: None,
            end: None,
            team1_points: Vec::new(),
            team2_points: Vec::new(),
            set_results: Vec::new(),
            losers_bracket: false,
            winner_next: None,
            loser_next: None,
            previous_left: None,
            previous_right: None,
            locked: false,
            referee_checked_in: false,
            generation_order,
            bracket_round: None,
            round_robin_round: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn match_number(&self) -> i64 {
        self.match_number
    }

    pub fn division(&self) -> Option<Uuid> {
        self.division
    }

    pub fn team1(&self) -> &TeamRef {
        &self.team1
    }

    pub fn team2(&self) -> &TeamRef {
        &self.team2
    }

    pub fn field(&self) -> Option<Uuid> {
        self.field
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    pub fn set_results(&self) -> &[u8] {
        &self.set_results
    }

    pub fn is_losers_bracket(&self) -> bool {
        self.losers_bracket
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn winner_next(&self) -> Option<Uuid> {
        self.winner_next
    }

    pub fn loser_next(&self) -> Option<Uuid> {
        self.loser_next
    }

    pub fn previous_left(&self) -> Option<Uuid> {
        self.previous_left
    }

    pub fn previous_right(&self) -> Option<Uuid> {
        self.previous_right
    }

    pub fn involves_team(&self, team_id: Uuid) -> bool {
        self.team1.concrete() == Some(team_id) || self.team2.concrete() == Some(team_id)
    }

    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        match (self.start, self.end) {
            (Some(s), Some(e)) => s < end && start < e,
            _ => false,
        }
    }

    /// True once every set result is non-zero and at least one was recorded.
    pub fn is_fully_scored(&self) -> bool {
        !self.set_results.is_empty() && self.set_results.iter().all(|r| *r != 0)
    }

    /// True if this match's scheduled end has passed and no set has been
    /// scored yet — the narrow "in the past, untouched" eligibility for
    /// auto-reschedule. Matches with partial scores are "in progress" and
    /// are never auto-moved.
    pub fn is_eligible_for_auto_reschedule(&self, now: DateTime<Utc>) -> bool {
        match self.end {
            Some(end) => end <= now && self.set_results.iter().all(|r| *r == 0),
            None => false,
        }
    }
}
