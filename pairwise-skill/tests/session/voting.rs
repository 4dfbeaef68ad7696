use crate::helpers::{config, init_tracing, open, play_favourites, roster};
use claims::{assert_err_eq, assert_ok, assert_some};
use pairwise_skill::{MemoryStore, Rating, ScheduleMode, SessionConfig, SessionError, VotingSession};
use std::collections::HashSet;

#[test]
fn round_robin_runs_to_completion() {
    let mut session = open(MemoryStore::default(), 6);
    assert_eq!(session.progress().total, 15);

    let votes = play_favourites(&mut session, usize::MAX);

    assert_eq!(votes, 15);
    assert!(session.is_finished());
    assert_eq!(session.progress().completed, 15);
    assert_eq!(session.history().len(), 15);
    assert!(session.competitors().iter().all(|c| c.votes == 5));
    assert_err_eq!(session.vote(1), SessionError::NoActiveMatch);

    // every pair was played exactly once
    let pairs: HashSet<(u32, u32)> = session
        .history()
        .iter()
        .map(|r| (r.winner_id.min(r.loser_id), r.winner_id.max(r.loser_id)))
        .collect();
    assert_eq!(pairs.len(), 15);
}

#[test]
fn undefeated_competitor_leads_the_leaderboard() {
    let mut session = open(MemoryStore::default(), 6);
    play_favourites(&mut session, usize::MAX);

    let board = session.leaderboard();
    assert_eq!(board.first().map(|c| c.id), Some(1));
    assert_eq!(board.last().map(|c| c.id), Some(6));

    let (won, lost) = assert_ok!(session.opponents(1));
    assert_eq!(won.len(), 5);
    assert!(lost.is_empty());
}

#[test]
fn lookahead_becomes_the_next_match() {
    let mut session = open(MemoryStore::default(), 5);
    let (a, b) = assert_some!(session.lookahead_matchup());
    let expected = (a.id, b.id);

    let (winner, _) = assert_some!(session.current_matchup());
    assert_ok!(session.vote(winner.id));

    let (a, b) = assert_some!(session.current_matchup());
    assert_eq!((a.id, b.id), expected);
}

#[test]
fn matchups_show_updated_ratings() {
    let mut session = open(MemoryStore::default(), 3);
    play_favourites(&mut session, 2);

    let (a, b) = assert_some!(session.current_matchup());
    let rated = session
        .competitors()
        .iter()
        .filter(|c| c.rating != Rating::default())
        .count();
    assert_eq!(rated, 3);
    assert_eq!(Some(a), session.competitor(a.id));
    assert_eq!(Some(b), session.competitor(b.id));
}

#[test]
fn reset_starts_over_but_keeps_tiers() {
    let mut session = open(MemoryStore::default(), 4);
    session.edit_tiers(|tiers| tiers.set_label(0, "Mains"));
    play_favourites(&mut session, usize::MAX);
    assert!(session.is_finished());

    session.reset();

    assert!(!session.is_finished());
    assert_eq!(session.progress().completed, 0);
    assert!(session.history().is_empty());
    assert!(session.competitors().iter().all(|c| c.rating == Rating::default()));
    assert!(session.competitors().iter().all(|c| c.votes == 0));
    assert!(!session.can_undo());
    assert_eq!(session.tiers().tiers()[0].label, "Mains");
    assert_eq!(play_favourites(&mut session, usize::MAX), 6);
}

#[test]
fn auto_cycle_never_finishes() {
    init_tracing();
    let mut session = VotingSession::open(
        MemoryStore::default(),
        roster(3),
        config(ScheduleMode::AutoCycle),
    );
    assert_eq!(play_favourites(&mut session, 10), 10);
    assert!(!session.is_finished());
    assert_eq!(session.history().len(), 10);
    assert!(session.current_matchup().is_some());
}

#[test]
fn tier_assignments_follow_the_leaderboard() {
    let mut session = open(MemoryStore::default(), 8);
    play_favourites(&mut session, usize::MAX);

    let tiers = session.tier_assignments();
    assert_eq!(tiers[0].config.label, "S");
    let top: Vec<u32> = tiers[0].competitors.iter().map(|c| c.id).collect();
    let board: Vec<u32> = session.leaderboard().iter().take(5).map(|c| c.id).collect();
    assert_eq!(top, board);
    assert_eq!(tiers[1].competitors.len(), 3);
    assert!(tiers[2..].iter().all(|tier| tier.competitors.is_empty()));
}

#[test]
fn session_config_from_json5() {
    init_tracing();
    let config = assert_ok!(SessionConfig::from_json5(
        r#"{
            // keep voting forever
            scheduler: { mode: "auto_cycle", seed: 7 },
            glicko: { tau: 0.3 },
        }"#
    ));
    assert_eq!(config.scheduler.mode, ScheduleMode::AutoCycle);

    let mut session = VotingSession::open(MemoryStore::default(), roster(2), config);
    assert_eq!(play_favourites(&mut session, 4), 4);
}
