//! C3: single/double elimination bracket construction.
//!
//! Seeding follows the literal rule in the component design: slot `k` (0
//! based) pairs seed `k+1` against seed `size-k`, where `size` is the next
//! power of two at or above the team count. Seeds whose opponent index
//! exceeds the team count advance unopposed (a bye) with no match object
//! created for that slot.
//!
//! Double elimination routes every winner-bracket loser into a merge-based
//! loser bracket: at each stage the surviving loser-bracket entrants are
//! combined with the newest batch of winner-bracket losers and paired down
//! by half (an odd leftover byes through). This always consumes exactly
//! `n-2` loser-bracket matches regardless of where byes land, since every
//! winner-bracket match contributes exactly one loser-bracket entrant and a
//! single champion must remain.

use crate::domain::{FeederRole, Match, TeamRef};
use crate::errors::{ScheduleError, ScheduleResult};
use std::collections::HashMap;
use uuid::Uuid;

pub struct BracketBuild {
    pub matches: Vec<Match>,
    /// `Some` only for single elimination and for double elimination's
    /// grand final loser slot; tracks the overall champion placeholder so
    /// callers (the orchestrator) can wire it into a parent structure if
    /// ever needed. Unused by finalize, which instead walks `winner_next`.
    pub champion: TeamRef,
}

struct Cursor {
    generation: u64,
    bracket_round: u32,
}

fn next_power_of_two(n: usize) -> usize {
    let mut size = 1;
    while size < n {
        size *= 2;
    }
    size
}

fn pair_round(
    entrants: Vec<TeamRef>,
    matches: &mut Vec<Match>,
    index: &mut HashMap<Uuid, usize>,
    division: Option<Uuid>,
    losers_bracket: bool,
    cursor: &mut Cursor,
) -> Vec<TeamRef> {
    let mut winners = Vec::with_capacity(entrants.len().div_ceil(2));
    let mut it = entrants.into_iter();
    loop {
        let a = match it.next() {
            Some(a) => a,
            None => break,
        };
        let b = match it.next() {
            None => {
                // Odd leftover byes through untouched.
                winners.push(a);
                break;
            }
            Some(b) => b,
        };
        let id = Uuid::new_v4();
        let mut m = Match::new_abstract(id, division, cursor.generation);
        cursor.generation += 1;
        m.losers_bracket = losers_bracket;
        m.bracket_round = Some(cursor.bracket_round);
        if let TeamRef::Feeder(prev_id, role) = &a {
            m.previous_left = Some(*prev_id);
            backfill_next(matches, index, *prev_id, *role, id);
        }
        if let TeamRef::Feeder(prev_id, role) = &b {
            m.previous_right = Some(*prev_id);
            backfill_next(matches, index, *prev_id, *role, id);
        }
        m.team1 = a;
        m.team2 = b;
        index.insert(id, matches.len());
        matches.push(m);
        winners.push(TeamRef::Feeder(id, FeederRole::Winner));
    }
    cursor.bracket_round += 1;
    winners
}

fn backfill_next(
    matches: &mut [Match],
    index: &HashMap<Uuid, usize>,
    match_id: Uuid,
    role: FeederRole,
    next_id: Uuid,
) {
    if let Some(&pos) = index.get(&match_id) {
        match role {
            FeederRole::Winner => matches[pos].winner_next = Some(next_id),
            FeederRole::Loser => matches[pos].loser_next = Some(next_id),
        }
    }
}

fn losers_of(matches: &[Match], round_start: usize) -> Vec<TeamRef> {
    matches[round_start..]
        .iter()
        .map(|m| TeamRef::Feeder(m.id, FeederRole::Loser))
        .collect()
}

/// Builds round 1 of the winner bracket from the literal seeding rule,
/// applying byes for slots whose opponent seed does not exist.
fn build_round1(
    seeds: &[Uuid],
    size: usize,
    matches: &mut Vec<Match>,
    index: &mut HashMap<Uuid, usize>,
    division: Option<Uuid>,
    cursor: &mut Cursor,
) -> Vec<TeamRef> {
    let n = seeds.len();
    let slots = size / 2;
    let mut winners = Vec::with_capacity(slots);
    for k in 0..slots {
        let high_seed_idx = k; // seed k+1
        let low_seed_idx = size - k - 1; // seed (size-k), 0-based
        if low_seed_idx >= n {
            // Bye: seed k+1 advances unopposed, no match object created.
            winners.push(TeamRef::Concrete(seeds[high_seed_idx]));
            continue;
        }
        let id = Uuid::new_v4();
        let mut m = Match::new_abstract(id, division, cursor.generation);
        cursor.generation += 1;
        m.bracket_round = Some(cursor.bracket_round);
        m.team1 = TeamRef::Concrete(seeds[high_seed_idx]);
        m.team2 = TeamRef::Concrete(seeds[low_seed_idx]);
        index.insert(id, matches.len());
        matches.push(m);
        winners.push(TeamRef::Feeder(id, FeederRole::Winner));
    }
    cursor.bracket_round += 1;
    winners
}

/// Builds the bracket for a division's seeded team list. Returns an empty
/// match set when `seeds.len() < 3`, per the component's byes-at-round-1
/// contract.
pub fn build_bracket(
    seeds: &[Uuid],
    division: Option<Uuid>,
    double_elimination: bool,
    generation_start: u64,
) -> ScheduleResult<BracketBuild> {
    let n = seeds.len();
    if n < 3 {
        return Ok(BracketBuild {
            matches: Vec::new(),
            champion: TeamRef::Unset,
        });
    }

    let size = next_power_of_two(n);
    let rounds_wb = size.trailing_zeros();

    let mut matches = Vec::new();
    let mut index = HashMap::new();
    let mut cursor = Cursor {
        generation: generation_start,
        bracket_round: 0,
    };

    let wb_round1_start = matches.len();
    let mut wb_winners = build_round1(seeds, size, &mut matches, &mut index, division, &mut cursor);
    let mut losers1 = losers_of(&matches, wb_round1_start);

    let mut survivors: Vec<TeamRef> = Vec::new();
    if double_elimination {
        cursor.bracket_round = 1;
        let merged = std::mem::take(&mut survivors)
            .into_iter()
            .chain(losers1.drain(..))
            .collect();
        survivors = pair_round(merged, &mut matches, &mut index, division, true, &mut cursor);
    }

    for round in 2..=rounds_wb {
        cursor.bracket_round = round * 2 - 2;
        let wb_round_start = matches.len();
        wb_winners = pair_round(wb_winners, &mut matches, &mut index, division, false, &mut cursor);

        if double_elimination {
            let losers_r = losers_of(&matches, wb_round_start);
            cursor.bracket_round = round * 2 - 1;
            let merged = std::mem::take(&mut survivors)
                .into_iter()
                .chain(losers_r)
                .collect();
            survivors = pair_round(merged, &mut matches, &mut index, division, true, &mut cursor);
        }
    }

    let wb_champion = wb_winners
        .into_iter()
        .next()
        .ok_or_else(|| ScheduleError::config("bracket construction produced no winner-bracket champion"))?;

    if !double_elimination {
        return Ok(BracketBuild {
            matches,
            champion: wb_champion,
        });
    }

    while survivors.len() > 1 {
        cursor.bracket_round += 1;
        survivors = pair_round(survivors, &mut matches, &mut index, division, true, &mut cursor);
    }
    let lb_champion = survivors
        .into_iter()
        .next()
        .ok_or_else(|| ScheduleError::config("bracket construction produced no loser-bracket champion"))?;

    // Grand final: winner-bracket champion vs loser-bracket champion.
    cursor.bracket_round += 1;
    let final_id = Uuid::new_v4();
    let mut grand_final = Match::new_abstract(final_id, division, cursor.generation);
    cursor.generation += 1;
    grand_final.bracket_round = Some(cursor.bracket_round);
    if let TeamRef::Feeder(prev_id, role) = &wb_champion {
        grand_final.previous_left = Some(*prev_id);
        backfill_next(&mut matches, &index, *prev_id, *role, final_id);
    }
    if let TeamRef::Feeder(prev_id, role) = &lb_champion {
        grand_final.previous_right = Some(*prev_id);
        backfill_next(&mut matches, &index, *prev_id, *role, final_id);
    }
    grand_final.team1 = wb_champion;
    grand_final.team2 = lb_champion;
    index.insert(final_id, matches.len());
    matches.push(grand_final);

    // Bracket reset: always created, locked until the finalize step decides
    // it is needed (the loser-bracket finalist won the grand final).
    cursor.bracket_round += 1;
    let reset_id = Uuid::new_v4();
    let mut reset = Match::new_abstract(reset_id, division, cursor.generation);
    reset.bracket_round = Some(cursor.bracket_round);
    reset.losers_bracket = true;
    reset.locked = true;
    reset.previous_left = Some(final_id);
    matches[index[&final_id]].winner_next = Some(reset_id);
    matches.push(reset);

    Ok(BracketBuild {
        matches,
        champion: TeamRef::Feeder(final_id, FeederRole::Winner),
    })
}
