use super::{Division, Event, Match, PlayingField, Team, TimeSlot};
use std::collections::HashMap;
use uuid::Uuid;

/// An event together with every relation the scheduler needs: divisions,
/// fields, weekly templates, teams and (possibly empty) matches. This is
/// what `StorePort::load_event_with_relations` returns.
#[derive(Debug, Clone)]
pub struct EventGraph {
    pub event: Event,
    pub divisions: Vec<Division>,
    pub fields: Vec<PlayingField>,
    pub time_slots: Vec<TimeSlot>,
    pub teams: Vec<Team>,
    pub matches: Vec<Match>,
    pub referee_ids: Vec<Uuid>,
}

impl EventGraph {
    pub fn new(event: Event) -> Self {
        Self {
            event,
            divisions: Vec::new(),
            fields: Vec::new(),
            time_slots: Vec::new(),
            teams: Vec::new(),
            matches: Vec::new(),
            referee_ids: Vec::new(),
        }
    }

    pub fn teams_in_division(&self, division_id: Uuid) -> Vec<&Team> {
        self.teams
            .iter()
            .filter(|t| t.division_id() == division_id)
            .collect()
    }

    pub fn fields_supporting(&self, division_id: Uuid) -> Vec<&PlayingField> {
        self.fields
            .iter()
            .filter(|f| f.supports(division_id))
            .collect()
    }

    pub fn team_by_id(&self, id: Uuid) -> Option<&Team> {
        self.teams.iter().find(|t| t.id() == id)
    }

    pub fn team_by_id_mut(&mut self, id: Uuid) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.id() == id)
    }

    pub fn match_by_id(&self, id: Uuid) -> Option<&Match> {
        self.matches.iter().find(|m| m.id() == id)
    }

    pub fn match_by_id_mut(&mut self, id: Uuid) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id() == id)
    }

    pub fn division_ids_in_order(&self) -> Vec<Uuid> {
        if self.event.single_division() {
            return vec![Uuid::nil()];
        }
        self.event.division_ids().to_vec()
    }

    /// Teams keyed by division, preserving the event's declared division
    /// order (or all teams under a synthetic nil division when
    /// `singleDivision` is set).
    pub fn teams_by_division(&self) -> HashMap<Uuid, Vec<&Team>> {
        let mut map: HashMap<Uuid, Vec<&Team>> = HashMap::new();
        if self.event.single_division() {
            map.insert(Uuid::nil(), self.teams.iter().collect());
            return map;
        }
        for team in &self.teams {
            map.entry(team.division_id()).or_default().push(team);
        }
        map
    }
}
