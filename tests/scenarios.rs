//! End-to-end scenarios exercising `schedule_event`/`finalize_match` the
//! way a `StorePort`/`NotificationPort` adapter would drive them.

use async_trait::async_trait;
use chrono::{Datelike, Duration, TimeZone, Utc, Weekday};
use scheduler_core::domain::{
    Division, Event, EventGraph, EventKind, FieldBinding, FieldDivisions, Match, PlayingField, Team, TimeSlot,
};
use scheduler_core::ports::{NotificationPort, StoreError, StorePort, StoreResult};
use scheduler_core::{
    apply_match_updates, finalize_match, schedule_event, AutoRescheduleFailure, EventLock, MatchUpdates,
    ScheduleError, SchedulerContext,
};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

struct NoopStore;
#[async_trait]
impl StorePort for NoopStore {
    async fn load_event_with_relations(&self, _event_id: Uuid) -> StoreResult<EventGraph> {
        Err(StoreError::NotFound)
    }
    async fn save_matches(&self, _event_id: Uuid, _matches: &[Match]) -> StoreResult<()> {
        Ok(())
    }
    async fn save_team_records(&self, _teams: &[Team]) -> StoreResult<()> {
        Ok(())
    }
    async fn save_event_schedule(&self, _event: &Event) -> StoreResult<()> {
        Ok(())
    }
    async fn delete_matches_by_event(&self, _event_id: Uuid) -> StoreResult<()> {
        Ok(())
    }
    async fn acquire_event_lock(&self, _tx: &dyn scheduler_core::ports::Transaction, event_id: Uuid) -> StoreResult<EventLock> {
        Ok(EventLock::new(event_id))
    }
}

struct NoopNotifier;
#[async_trait]
impl NotificationPort for NoopNotifier {
    async fn notify_host_of_auto_reschedule_failure(&self, _failure: AutoRescheduleFailure) {}
}

fn test_context() -> SchedulerContext {
    SchedulerContext {
        store: Arc::new(NoopStore),
        notifier: Arc::new(NoopNotifier),
        debug: false,
    }
}

fn weekend_start() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap() // a Monday
}

fn league_graph(n_teams: usize, duration_minutes: u32) -> EventGraph {
    let start = weekend_start();
    let end = start + Duration::weeks(6);
    let division_id = Uuid::new_v4();
    let event = Event::new(Uuid::new_v4(), "Weekend League", start, end, EventKind::League, Uuid::new_v4(), Uuid::new_v4())
        .set_match_duration_minutes(Some(duration_minutes))
        .with_division_ids(vec![division_id]);
    let mut graph = EventGraph::new(event);
    graph.divisions.push(Division::new(division_id, "OPEN"));
    graph.fields.push(PlayingField::new(Uuid::new_v4(), 1, "Court 1"));
    graph
        .time_slots
        .push(TimeSlot::new(Uuid::new_v4(), 5, 9 * 60, 13 * 60).with_days_of_week(vec![5, 6]));
    for i in 0..n_teams {
        graph.teams.push(
            Team::new(Uuid::new_v4(), division_id, Uuid::new_v4(), format!("Team {i}")).with_seed(i as u32 + 1),
        );
    }
    graph
}

/// S1 — round-robin weekend league: 8 teams, one field, Saturday/Sunday
/// windows, 60-minute matches. Expect 28 matches, every start on a
/// weekend day, schedule spanning at least 3 calendar weeks.
#[test]
fn s1_round_robin_weekend_league() {
    let graph = league_graph(8, 60);
    let start = graph.event.start();
    let lock = EventLock::new(graph.event.id());
    let outcome = schedule_event(&lock, graph).unwrap();

    assert_eq!(outcome.matches.len(), 28);
    for m in &outcome.matches {
        let wd = m.start().unwrap().weekday();
        assert!(wd == Weekday::Sat || wd == Weekday::Sun, "match started on {wd:?}");
    }
    let last_end = outcome.matches.iter().map(|m| m.end().unwrap()).max().unwrap();
    assert!(last_end - start >= Duration::weeks(3));
}

/// S2 — a single template spanning both Saturday and Sunday: 4 teams, one
/// field. Expect 6 matches, with occurrences on both weekend days.
#[test]
fn s2_multi_day_template() {
    let graph = league_graph(4, 60);
    let lock = EventLock::new(graph.event.id());
    let outcome = schedule_event(&lock, graph).unwrap();

    assert_eq!(outcome.matches.len(), 6);
    let weekdays: HashSet<Weekday> = outcome.matches.iter().map(|m| m.start().unwrap().weekday()).collect();
    assert!(weekdays.contains(&Weekday::Sat));
    assert!(weekdays.contains(&Weekday::Sun));
}

/// S3 — one template bound to two fields: 4 teams. Expect 6 matches, both
/// fields used.
#[test]
fn s3_multi_field_template() {
    let start = weekend_start();
    let end = start + Duration::weeks(6);
    let division_id = Uuid::new_v4();
    let field1 = Uuid::new_v4();
    let field2 = Uuid::new_v4();
    let event = Event::new(Uuid::new_v4(), "Two Courts", start, end, EventKind::League, Uuid::new_v4(), Uuid::new_v4())
        .set_match_duration_minutes(Some(60))
        .with_division_ids(vec![division_id]);
    let mut graph = EventGraph::new(event);
    graph.divisions.push(Division::new(division_id, "OPEN"));
    graph.fields.push(PlayingField::new(field1, 1, "Court 1"));
    graph.fields.push(PlayingField::new(field2, 2, "Court 2"));
    graph.time_slots.push(
        TimeSlot::new(Uuid::new_v4(), 5, 9 * 60, 13 * 60)
            .with_days_of_week(vec![5, 6])
            .with_field_binding(FieldBinding::Multiple(vec![field1, field2])),
    );
    for i in 0..4 {
        graph.teams.push(Team::new(Uuid::new_v4(), division_id, Uuid::new_v4(), format!("Team {i}")));
    }

    let lock = EventLock::new(graph.event.id());
    let outcome = schedule_event(&lock, graph).unwrap();

    assert_eq!(outcome.matches.len(), 6);
    let used_fields: HashSet<Uuid> = outcome.matches.iter().filter_map(|m| m.field()).collect();
    assert!(used_fields.contains(&field1));
    assert!(used_fields.contains(&field2));
}

/// S4 — a division with no supporting field is rejected before any
/// placement work happens.
#[test]
fn s4_missing_field_rejection() {
    let start = weekend_start();
    let end = start + Duration::weeks(6);
    let open = Uuid::new_v4();
    let event = Event::new(Uuid::new_v4(), "Bad Field Setup", start, end, EventKind::League, Uuid::new_v4(), Uuid::new_v4())
        .with_division_ids(vec![open]);
    let mut graph = EventGraph::new(event);
    graph.divisions.push(Division::new(open, "OPEN"));
    let mut advanced_only = HashSet::new();
    advanced_only.insert(Uuid::new_v4());
    graph
        .fields
        .push(PlayingField::new(Uuid::new_v4(), 1, "Court 1").with_divisions(FieldDivisions::Only(advanced_only)));
    for i in 0..4 {
        graph.teams.push(Team::new(Uuid::new_v4(), open, Uuid::new_v4(), format!("Team {i}")));
    }

    let lock = EventLock::new(graph.event.id());
    let err = schedule_event(&lock, graph).unwrap_err();
    match err {
        ScheduleError::Config(message) => {
            assert!(message.contains("no fields are available"));
            assert!(message.contains("OPEN"));
        }
        other => panic!("expected ScheduleError::Config, got {other:?}"),
    }
}

/// S5 — two divisions, each bound to its own field, never cross-pair.
#[test]
fn s5_split_division_league() {
    let start = weekend_start();
    let end = start + Duration::weeks(4);
    let beginner = Uuid::new_v4();
    let advanced = Uuid::new_v4();
    let event = Event::new(Uuid::new_v4(), "Split Divisions", start, end, EventKind::League, Uuid::new_v4(), Uuid::new_v4())
        .set_match_duration_minutes(Some(60))
        .with_division_ids(vec![beginner, advanced]);
    let mut graph = EventGraph::new(event);
    graph.divisions.push(Division::new(beginner, "beginner"));
    graph.divisions.push(Division::new(advanced, "advanced"));

    let mut beginner_only = HashSet::new();
    beginner_only.insert(beginner);
    let mut advanced_only = HashSet::new();
    advanced_only.insert(advanced);
    graph.fields.push(PlayingField::new(Uuid::new_v4(), 1, "Court 1").with_divisions(FieldDivisions::Only(beginner_only)));
    graph.fields.push(PlayingField::new(Uuid::new_v4(), 2, "Court 2").with_divisions(FieldDivisions::Only(advanced_only)));
    graph
        .time_slots
        .push(TimeSlot::new(Uuid::new_v4(), 5, 9 * 60, 13 * 60).with_days_of_week(vec![5, 6]));

    let mut beginner_teams = Vec::new();
    for i in 0..2 {
        let id = Uuid::new_v4();
        graph.teams.push(Team::new(id, beginner, Uuid::new_v4(), format!("Beginner {i}")));
        beginner_teams.push(id);
    }
    let mut advanced_teams = Vec::new();
    for i in 0..2 {
        let id = Uuid::new_v4();
        graph.teams.push(Team::new(id, advanced, Uuid::new_v4(), format!("Advanced {i}")));
        advanced_teams.push(id);
    }

    let lock = EventLock::new(graph.event.id());
    let outcome = schedule_event(&lock, graph).unwrap();

    assert_eq!(outcome.matches.len(), 2);
    for m in &outcome.matches {
        let t1 = m.team1().concrete().unwrap();
        let t2 = m.team2().concrete().unwrap();
        let both_beginner = beginner_teams.contains(&t1) && beginner_teams.contains(&t2);
        let both_advanced = advanced_teams.contains(&t1) && advanced_teams.contains(&t2);
        assert!(both_beginner || both_advanced, "cross-division pairing detected");
    }
}

/// S6 — single/double elimination bracket matrix across team counts 3..32.
#[test]
fn s6_bracket_matrix() {
    for n in 3..32 {
        for double_elimination in [false, true] {
            let start = weekend_start();
            let end = start + Duration::weeks(20);
            let division_id = Uuid::new_v4();
            let event = Event::new(Uuid::new_v4(), "Cup", start, end, EventKind::Tournament, Uuid::new_v4(), Uuid::new_v4())
                .set_match_duration_minutes(Some(30))
                .with_division_ids(vec![division_id])
                .with_double_elimination(double_elimination);
            let mut graph = EventGraph::new(event);
            graph.divisions.push(Division::new(division_id, "OPEN"));
            graph.fields.push(PlayingField::new(Uuid::new_v4(), 1, "Court 1"));
            graph
                .time_slots
                .push(TimeSlot::new(Uuid::new_v4(), 5, 8 * 60, 22 * 60).with_days_of_week(vec![0, 1, 2, 3, 4, 5, 6]));
            for i in 0..n {
                graph.teams.push(Team::new(Uuid::new_v4(), division_id, Uuid::new_v4(), format!("Team {i}")).with_seed(i as u32 + 1));
            }

            let lock = EventLock::new(graph.event.id());
            let outcome = schedule_event(&lock, graph).unwrap();

            if double_elimination {
                assert!(outcome.matches.len() >= n - 1, "n={n}");
                assert!(outcome.matches.len() <= 2 * n - 1, "n={n}");
            } else {
                assert_eq!(outcome.matches.len(), n - 1, "n={n}");
            }
            let mut ids: Vec<i64> = outcome.matches.iter().map(|m| m.match_number()).collect();
            ids.sort_unstable();
            let expected: Vec<i64> = (1..=outcome.matches.len() as i64).collect();
            assert_eq!(ids, expected, "n={n} double_elimination={double_elimination}");
        }
    }
}

/// S7 — a league with playoffs that has no usable time slots at all is
/// infeasible for every generated match, and reports so deterministically.
#[test]
fn s7_fixed_end_too_short() {
    let start = weekend_start();
    let end = start + Duration::weeks(1);
    let division_id = Uuid::new_v4();
    let event = Event::new(Uuid::new_v4(), "Too Short", start, end, EventKind::League, Uuid::new_v4(), Uuid::new_v4())
        .set_match_duration_minutes(Some(60))
        .with_division_ids(vec![division_id])
        .with_playoffs(10, false);
    let mut graph = EventGraph::new(event);
    graph.divisions.push(Division::new(division_id, "OPEN"));
    graph.fields.push(PlayingField::new(Uuid::new_v4(), 1, "Court 1"));
    // A template whose window collapses to nothing: no occurrence can ever
    // be expanded, so every generated match is unplaceable.
    graph.time_slots.push(
        TimeSlot::new(Uuid::new_v4(), 6, 9 * 60, 21 * 60).with_window(Some(start), Some(start)),
    );
    for i in 0..10 {
        graph.teams.push(Team::new(Uuid::new_v4(), division_id, Uuid::new_v4(), format!("Team {i}")).with_seed(i as u32 + 1));
    }

    let lock1 = EventLock::new(graph.event.id());
    let graph2 = graph.clone();
    let err1 = schedule_event(&lock1, graph).unwrap_err();
    let lock2 = EventLock::new(graph2.event.id());
    let err2 = schedule_event(&lock2, graph2).unwrap_err();

    // 10 teams round robin (45) + a 10-slot playoff bracket (9) = 54.
    match (err1, err2) {
        (ScheduleError::Infeasible { approximate_matches_needed: a }, ScheduleError::Infeasible { approximate_matches_needed: b }) => {
            assert_eq!(a, 54);
            assert_eq!(a, b, "retry must report the same count, no placeholder-team inflation");
        }
        other => panic!("expected ScheduleError::Infeasible twice, got {other:?}"),
    }
}

/// S8 — finalizing both round-1 matches of a 4-team single-elimination
/// bracket advances the winners into the final and records one win each.
#[tokio::test]
async fn s8_finalize_advances_bracket() {
    let start = weekend_start();
    let end = start + Duration::weeks(4);
    let division_id = Uuid::new_v4();
    let event = Event::new(Uuid::new_v4(), "Cup", start, end, EventKind::Tournament, Uuid::new_v4(), Uuid::new_v4())
        .set_match_duration_minutes(Some(60))
        .with_division_ids(vec![division_id]);
    let mut graph = EventGraph::new(event);
    graph.divisions.push(Division::new(division_id, "OPEN"));
    graph.fields.push(PlayingField::new(Uuid::new_v4(), 1, "Court 1"));
    graph
        .time_slots
        .push(TimeSlot::new(Uuid::new_v4(), 5, 9 * 60, 20 * 60).with_days_of_week(vec![5, 6]));
    let mut team_ids = Vec::new();
    for i in 0..4 {
        let id = Uuid::new_v4();
        graph.teams.push(Team::new(id, division_id, Uuid::new_v4(), format!("Team {i}")).with_seed(i as u32 + 1));
        team_ids.push(id);
    }

    let lock = EventLock::new(graph.event.id());
    let outcome = schedule_event(&lock, graph).unwrap();
    let mut graph = EventGraph {
        event: outcome.event,
        divisions: Vec::new(),
        fields: Vec::new(),
        time_slots: Vec::new(),
        teams: team_ids
            .iter()
            .enumerate()
            .map(|(i, id)| Team::new(*id, Uuid::new_v4(), Uuid::new_v4(), format!("Team {i}")))
            .collect(),
        matches: outcome.matches,
        referee_ids: Vec::new(),
    };

    let mut round1: Vec<Uuid> = graph
        .matches
        .iter()
        .filter(|m| m.previous_left().is_none() && m.previous_right().is_none())
        .map(|m| m.id())
        .collect();
    round1.sort_by_key(|id| graph.match_by_id(*id).unwrap().match_number());
    assert_eq!(round1.len(), 2);

    let ctx = test_context();
    let mut round1_winners = Vec::new();
    for match_id in &round1 {
        let left_id = graph.match_by_id(*match_id).unwrap().team1().concrete().unwrap();
        round1_winners.push(left_id);
        let updates = MatchUpdates {
            set_results: Some(vec![1, 1]),
            team1_points: Some(vec![11, 11]),
            team2_points: Some(vec![5, 5]),
            ..Default::default()
        };
        apply_match_updates(&lock, &mut graph, *match_id, updates, false).unwrap();
        finalize_match(&lock, &ctx, &mut graph, *match_id, Utc::now()).await.unwrap();
    }

    let final_match = graph
        .matches
        .iter()
        .find(|m| m.previous_left().is_some() && m.previous_right().is_some())
        .unwrap();
    assert_eq!(final_match.team1().concrete(), Some(round1_winners[0]));
    assert_eq!(final_match.team2().concrete(), Some(round1_winners[1]));

    for winner in &round1_winners {
        assert_eq!(graph.team_by_id(*winner).unwrap().wins(), 1);
    }
}
