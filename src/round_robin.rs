//! C2: round-robin pairing via the circle method.

use uuid::Uuid;

/// One round of disjoint pairings; no team appears twice in a round.
pub type RoundRobinRound = Vec<(Uuid, Uuid)>;

/// Produces `gamesPerOpponent` full round-robin blocks over `teams` using
/// the circle method. A bye sentinel is used internally when `teams` is
/// odd and dropped from the output. Total abstract matches across all
/// returned rounds is exactly `games_per_opponent * n*(n-1)/2`.
pub fn generate_round_robin(teams: &[Uuid], games_per_opponent: u32) -> Vec<RoundRobinRound> {
    let n = teams.len();
    if n < 2 || games_per_opponent == 0 {
        return Vec::new();
    }

    let mut positions: Vec<Option<Uuid>> = teams.iter().copied().map(Some).collect();
    if positions.len() % 2 == 1 {
        positions.push(None);
    }
    let m = positions.len();
    let rounds_per_block = m - 1;

    let mut block = Vec::with_capacity(rounds_per_block);
    let mut arr = positions;
    for _ in 0..rounds_per_block {
        let mut round = Vec::with_capacity(m / 2);
        for i in 0..m / 2 {
            if let (Some(a), Some(b)) = (arr[i], arr[m - 1 - i]) {
                round.push((a, b));
            }
        }
        block.push(round);

        let last = arr.pop().expect("arr has at least one element");
        arr.insert(1, last);
    }

    let mut all_rounds = Vec::with_capacity(block.len() * games_per_opponent as usize);
    for iteration in 0..games_per_opponent {
        for round in &block {
            if iteration % 2 == 1 {
                all_rounds.push(round.iter().map(|(a, b)| (*b, *a)).collect());
            } else {
                all_rounds.push(round.clone());
            }
        }
    }
    all_rounds
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teams(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    fn total_matches(rounds: &[RoundRobinRound]) -> usize {
        rounds.iter().map(|r| r.len()).sum()
    }

    #[test]
    fn even_team_count_has_no_byes() {
        let t = teams(8);
        let rounds = generate_round_robin(&t, 1);
        assert_eq!(rounds.len(), 7);
        for round in &rounds {
            assert_eq!(round.len(), 4);
        }
        assert_eq!(total_matches(&rounds), 8 * 7 / 2);
    }

    #[test]
    fn odd_team_count_drops_the_bye() {
        let t = teams(7);
        let rounds = generate_round_robin(&t, 1);
        assert_eq!(rounds.len(), 7);
        assert_eq!(total_matches(&rounds), 7 * 6 / 2);
    }

    #[test]
    fn every_pair_meets_exactly_games_per_opponent_times() {
        let t = teams(6);
        let g = 2;
        let rounds = generate_round_robin(&t, g);
        assert_eq!(total_matches(&rounds), g as usize * 6 * 5 / 2);

        let mut counts = std::collections::HashMap::new();
        for round in &rounds {
            for (a, b) in round {
                let key = if a < b { (*a, *b) } else { (*b, *a) };
                *counts.entry(key).or_insert(0) += 1;
            }
        }
        assert_eq!(counts.len(), 6 * 5 / 2);
        assert!(counts.values().all(|&c| c == g));
    }

    #[test]
    fn no_team_plays_twice_in_a_round() {
        let t = teams(8);
        let rounds = generate_round_robin(&t, 1);
        for round in &rounds {
            let mut seen = std::collections::HashSet::new();
            for (a, b) in round {
                assert!(seen.insert(*a));
                assert!(seen.insert(*b));
            }
        }
    }
}
