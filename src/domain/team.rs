use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A team competing in exactly one division. `wins`/`losses` are mutated
/// only by C6 finalize; everything else is external input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Team {
    id: Uuid,
    /// 0 means unseeded.
    seed: u32,
    captain_id: Uuid,
    division_id: Uuid,
    name: String,
    wins: u32,
    losses: u32,
    match_ids: Vec<Uuid>,
}

impl Team {
    pub fn new(id: Uuid, division_id: Uuid, captain_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            seed: 0,
            captain_id,
            division_id,
            name: crate::utils::normalize_ws(&name.into()),
            wins: 0,
            losses: 0,
            match_ids: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn division_id(&self) -> Uuid {
        self.division_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    pub fn match_ids(&self) -> &[Uuid] {
        &self.match_ids
    }

    pub fn record_match(&mut self, match_id: Uuid) {
        if !self.match_ids.contains(&match_id) {
            self.match_ids.push(match_id);
        }
    }

    pub fn record_win(&mut self) {
        self.wins += 1;
    }

    pub fn record_loss(&mut self) {
        self.losses += 1;
    }

    /// Undoes a previously recorded result; used by idempotent re-finalize.
    pub fn revert_win(&mut self) {
        self.wins = self.wins.saturating_sub(1);
    }

    pub fn revert_loss(&mut self) {
        self.losses = self.losses.saturating_sub(1);
    }
}
