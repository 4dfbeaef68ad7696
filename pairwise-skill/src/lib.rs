pub mod config;
pub mod history;
pub mod numerical;
pub mod roster;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod systems;
pub mod telemetry;
pub mod tiers;

pub use config::SessionConfig;
pub use scheduler::{MatchScheduler, Pair, Progress, ScheduleMode};
pub use session::{SessionError, VoteOutcome, VotingSession};
pub use store::{FileStore, MemoryStore, Store};
pub use systems::{Competitor, CompetitorId, Glicko2, Rating, RatingSystem};
