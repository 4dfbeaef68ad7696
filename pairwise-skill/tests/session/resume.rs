use crate::helpers::{init_tracing, open, play_favourites, roster, scratch_dir};
use claims::{assert_ok, assert_some};
use pairwise_skill::scheduler::SchedulerConfig;
use pairwise_skill::store::{
    COMPETITORS_KEY, CURRENT_PAIR_KEY, HISTORY_KEY, QUEUE_KEY, TIER_CONFIG_KEY,
};
use pairwise_skill::{
    FileStore, MemoryStore, Pair, Rating, ScheduleMode, SessionConfig, Store, VotingSession,
};

fn queue_of<S: Store>(session: &VotingSession<S>) -> Vec<Pair> {
    session.scheduler().queue().copied().collect()
}

#[test]
fn reopening_a_memory_store_resumes_exactly() {
    let mut session = open(MemoryStore::default(), 6);
    play_favourites(&mut session, 4);
    let competitors = session.competitors().to_vec();
    let slots = session.scheduler().slots();
    let queue = queue_of(&session);

    let session = open(session.into_store(), 6);

    assert_eq!(session.competitors(), &competitors[..]);
    assert_eq!(session.history().len(), 4);
    assert_eq!(session.scheduler().slots(), slots);
    assert_eq!(queue_of(&session), queue);
    assert_eq!(session.progress().completed, 4);
}

#[test]
fn reopening_a_file_store_resumes_exactly() {
    let dir = scratch_dir();
    init_tracing();
    let store = assert_ok!(FileStore::open(&dir));
    let mut session = open(store, 5);
    play_favourites(&mut session, 3);
    let competitors = session.competitors().to_vec();
    let slots = session.scheduler().slots();
    let queue = queue_of(&session);
    drop(session);

    let store = assert_ok!(FileStore::open(&dir));
    let mut session = open(store, 5);
    assert_eq!(session.competitors(), &competitors[..]);
    assert_eq!(session.history().len(), 3);
    assert_eq!(session.scheduler().slots(), slots);
    assert_eq!(queue_of(&session), queue);

    assert_eq!(play_favourites(&mut session, usize::MAX), 7);
    assert!(session.is_finished());
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn a_different_seed_does_not_reshuffle_a_stored_session() {
    init_tracing();
    let mut session = open(MemoryStore::default(), 5);
    play_favourites(&mut session, 1);
    let queue = queue_of(&session);

    let config = SessionConfig {
        scheduler: SchedulerConfig {
            mode: ScheduleMode::Terminal,
            seed: Some(42),
        },
        ..SessionConfig::default()
    };
    let session = VotingSession::open(session.into_store(), roster(5), config);
    assert_eq!(queue_of(&session), queue);
}

#[test]
fn finished_session_stays_finished() {
    let mut session = open(MemoryStore::default(), 3);
    play_favourites(&mut session, usize::MAX);

    let session = open(session.into_store(), 3);
    assert!(session.is_finished());
    assert_eq!(session.progress().completed, 3);
    assert!(session.current_matchup().is_none());
}

#[test]
fn malformed_entries_fall_back_to_defaults() {
    let mut store = MemoryStore::default();
    store.set(COMPETITORS_KEY, "{not json".into()).unwrap();
    store.set(HISTORY_KEY, "42".into()).unwrap();
    store.set(QUEUE_KEY, "[[1, 1]]".into()).unwrap();
    store.set(CURRENT_PAIR_KEY, "\"nope\"".into()).unwrap();

    let mut session = open(store, 4);

    assert!(session.competitors().iter().all(|c| c.rating == Rating::default()));
    assert!(session.history().is_empty());
    assert_eq!(session.progress().completed, 0);
    assert_eq!(play_favourites(&mut session, usize::MAX), 6);
}

#[test]
fn competitors_removed_from_the_roster_are_never_scheduled() {
    let mut session = open(MemoryStore::default(), 5);
    play_favourites(&mut session, 2);

    let mut session = open(session.into_store(), 4);
    assert_eq!(session.competitors().len(), 4);
    let (a, b) = assert_some!(session.current_matchup());
    assert!(a.id <= 4 && b.id <= 4);

    play_favourites(&mut session, usize::MAX);
    assert!(session.is_finished());
    assert!(
        session
            .history()
            .iter()
            .skip(2)
            .all(|r| r.winner_id <= 4 && r.loser_id <= 4)
    );
}

#[test]
fn ratings_of_remaining_competitors_carry_over() {
    let mut session = open(MemoryStore::default(), 4);
    play_favourites(&mut session, 3);
    let rating_of_1 = assert_some!(session.competitor(1)).rating;

    let mut shuffled = roster(4);
    shuffled.reverse();
    init_tracing();
    let session = VotingSession::open(
        session.into_store(),
        shuffled,
        crate::helpers::config(ScheduleMode::Terminal),
    );
    assert_eq!(session.competitors()[3].id, 1);
    assert_eq!(session.competitors()[3].rating, rating_of_1);
}

#[test]
fn oversized_stored_tiers_are_clamped_to_the_roster() {
    let mut store = MemoryStore::default();
    let tiers = r##"[
        {"label":"S","count":18446744073709551615,"color":"#FF7F7F"},
        {"label":"A","count":1,"color":"#FFBF7F"}
    ]"##;
    store.set(TIER_CONFIG_KEY, tiers.into()).unwrap();

    let mut session = open(store, 4);
    play_favourites(&mut session, 2);

    let assigned = session.tier_assignments();
    assert_eq!(assigned[0].config.size, 4);
    assert_eq!(assigned[0].competitors.len(), 4);
    assert!(assigned[1].competitors.is_empty());
    assert_eq!(assigned[1].start_rank, 5);
}
