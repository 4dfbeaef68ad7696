use once_cell::sync::Lazy;
use pairwise_skill::scheduler::SchedulerConfig;
use pairwise_skill::telemetry::{get_subscriber, init_subscriber};
use pairwise_skill::{Competitor, ScheduleMode, SessionConfig, Store, VotingSession};
use std::path::PathBuf;
use uuid::Uuid;

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let name = "session-test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    };
});

pub fn init_tracing() {
    // `TRACING` is only executed the first time `init_tracing` is invoked.
    Lazy::force(&TRACING);
}

pub fn roster(n: u32) -> Vec<Competitor> {
    (1..=n)
        .map(|id| Competitor::new(id, format!("Fighter {}", id)))
        .collect()
}

pub fn config(mode: ScheduleMode) -> SessionConfig {
    SessionConfig {
        scheduler: SchedulerConfig {
            mode,
            seed: Some(0xC0FFEE),
        },
        ..SessionConfig::default()
    }
}

pub fn open<S: Store>(store: S, n: u32) -> VotingSession<S> {
    init_tracing();
    VotingSession::open(store, roster(n), config(ScheduleMode::Terminal))
}

/// Votes for the lower id in every match until the schedule runs out or `limit` votes
/// have been cast. Returns the number of votes cast.
pub fn play_favourites<S: Store>(session: &mut VotingSession<S>, limit: usize) -> usize {
    let mut votes = 0;
    while votes < limit {
        let Some((a, b)) = session.current_matchup() else {
            break;
        };
        let winner = a.id.min(b.id);
        session.vote(winner).expect("Failed to record vote");
        votes += 1;
    }
    votes
}

/// A fresh directory under the system temp dir, unique per test.
pub fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("pairwise-skill-{}", Uuid::new_v4()))
}
