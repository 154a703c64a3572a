use chrono::{DateTime, Utc};
use displaydoc::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of competition an event runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
pub enum EventKind {
    /// league
    League,
    /// tournament
    Tournament,
    /// casual
    Casual,
    /// template
    Template,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    id: Uuid,
    name: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    no_fixed_end_date_time: bool,
    kind: EventKind,
    single_division: bool,
    team_signup: bool,
    max_participants: Option<u32>,
    team_size_limit: Option<u32>,

    match_duration_minutes: Option<u32>,
    set_duration_minutes: Option<u32>,
    sets_per_match: Option<u32>,
    uses_sets: bool,
    rest_time_minutes: u32,

    include_playoffs: bool,
    playoff_team_count: Option<u32>,
    double_elimination: bool,
    winner_set_count: Option<u32>,
    loser_set_count: Option<u32>,
    winner_bracket_points_to_victory: Vec<u32>,
    loser_bracket_points_to_victory: Vec<u32>,
    points_to_victory: Vec<u32>,

    games_per_opponent: u32,
    do_teams_ref: bool,

    division_ids: Vec<Uuid>,
    field_ids: Vec<Uuid>,
    time_slot_ids: Vec<Uuid>,
    team_ids: Vec<Uuid>,
    participant_user_ids: Vec<Uuid>,
    free_agent_ids: Vec<Uuid>,
    wait_list_ids: Vec<Uuid>,
    referee_ids: Vec<Uuid>,
    host_id: Uuid,
    organization_id: Uuid,
}

impl Event {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Uuid,
        name: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        kind: EventKind,
        host_id: Uuid,
        organization_id: Uuid,
    ) -> Self {
        Self {
            id,
            name: crate::utils::normalize_ws(&name.into()),
            start,
            end,
            no_fixed_end_date_time: false,
            kind,
            single_division: false,
            team_signup: false,
            max_participants: None,
            team_size_limit: None,
            match_duration_minutes: Some(60),
            set_duration_minutes: None,
            sets_per_match: None,
            uses_sets: false,
            rest_time_minutes: 0,
            include_playoffs: false,
            playoff_team_count: None,
            double_elimination: false,
            winner_set_count: None,
            loser_set_count: None,
            winner_bracket_points_to_victory: Vec::new(),
            loser_bracket_points_to_victory: Vec::new(),
            points_to_victory: Vec::new(),
            games_per_opponent: 1,
            do_teams_ref: false,
            division_ids: Vec::new(),
            field_ids: Vec::new(),
            time_slot_ids: Vec::new(),
            team_ids: Vec::new(),
            participant_user_ids: Vec::new(),
            free_agent_ids: Vec::new(),
            wait_list_ids: Vec::new(),
            referee_ids: Vec::new(),
            host_id,
            organization_id,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
    pub fn set_end(&mut self, end: DateTime<Utc>) {
        self.end = end;
    }
    pub fn no_fixed_end_date_time(&self) -> bool {
        self.no_fixed_end_date_time
    }
    pub fn set_no_fixed_end_date_time(mut self, value: bool) -> Self {
        self.no_fixed_end_date_time = value;
        self
    }
    pub fn kind(&self) -> EventKind {
        self.kind
    }
    pub fn single_division(&self) -> bool {
        self.single_division
    }
    pub fn set_single_division(mut self, value: bool) -> Self {
        self.single_division = value;
        self
    }
    pub fn match_duration_minutes(&self) -> Option<u32> {
        self.match_duration_minutes
    }
    pub fn set_match_duration_minutes(mut self, value: Option<u32>) -> Self {
        self.match_duration_minutes = value;
        self
    }
    pub fn set_duration_minutes(&self) -> Option<u32> {
        self.set_duration_minutes
    }
    pub fn sets_per_match(&self) -> Option<u32> {
        self.sets_per_match
    }
    pub fn uses_sets(&self) -> bool {
        self.uses_sets
    }
    pub fn with_sets(mut self, set_duration_minutes: u32, sets_per_match: u32) -> Self {
        self.uses_sets = true;
        self.set_duration_minutes = Some(set_duration_minutes);
        self.sets_per_match = Some(sets_per_match);
        self
    }
    pub fn rest_time_minutes(&self) -> u32 {
        self.rest_time_minutes
    }
    pub fn with_rest_time_minutes(mut self, value: u32) -> Self {
        self.rest_time_minutes = value;
        self
    }
    pub fn include_playoffs(&self) -> bool {
        self.include_playoffs
    }
    pub fn playoff_team_count(&self) -> Option<u32> {
        self.playoff_team_count
    }
    pub fn with_playoffs(mut self, playoff_team_count: u32, double_elimination: bool) -> Self {
        self.include_playoffs = true;
        self.playoff_team_count = Some(playoff_team_count);
        self.double_elimination = double_elimination;
        self
    }
    pub fn double_elimination(&self) -> bool {
        self.double_elimination
    }
    pub fn with_double_elimination(mut self, value: bool) -> Self {
        self.double_elimination = value;
        self
    }
    pub fn winner_bracket_points_to_victory(&self) -> &[u32] {
        &self.winner_bracket_points_to_victory
    }
    pub fn loser_bracket_points_to_victory(&self) -> &[u32] {
        &self.loser_bracket_points_to_victory
    }
    pub fn points_to_victory(&self) -> &[u32] {
        &self.points_to_victory
    }
    pub fn with_points_to_victory(mut self, points: Vec<u32>) -> Self {
        self.points_to_victory = points;
        self
    }
    pub fn games_per_opponent(&self) -> u32 {
        self.games_per_opponent
    }
    pub fn with_games_per_opponent(mut self, value: u32) -> Self {
        self.games_per_opponent = value.max(1);
        self
    }
    pub fn do_teams_ref(&self) -> bool {
        self.do_teams_ref
    }
    pub fn with_do_teams_ref(mut self, value: bool) -> Self {
        self.do_teams_ref = value;
        self
    }
    pub fn division_ids(&self) -> &[Uuid] {
        &self.division_ids
    }
    pub fn with_division_ids(mut self, ids: Vec<Uuid>) -> Self {
        self.division_ids = ids;
        self
    }
    pub fn field_ids(&self) -> &[Uuid] {
        &self.field_ids
    }
    pub fn with_field_ids(mut self, ids: Vec<Uuid>) -> Self {
        self.field_ids = ids;
        self
    }
    pub fn time_slot_ids(&self) -> &[Uuid] {
        &self.time_slot_ids
    }
    pub fn with_time_slot_ids(mut self, ids: Vec<Uuid>) -> Self {
        self.time_slot_ids = ids;
        self
    }
    pub fn team_ids(&self) -> &[Uuid] {
        &self.team_ids
    }
    pub fn with_team_ids(mut self, ids: Vec<Uuid>) -> Self {
        self.team_ids = ids;
        self
    }
    pub fn host_id(&self) -> Uuid {
        self.host_id
    }
    pub fn match_duration(&self) -> Option<chrono::Duration> {
        if self.uses_sets {
            let minutes = self.set_duration_minutes? as i64 * self.sets_per_match? as i64;
            Some(chrono::Duration::minutes(minutes))
        } else {
            Some(chrono::Duration::minutes(self.match_duration_minutes? as i64))
        }
    }
}
