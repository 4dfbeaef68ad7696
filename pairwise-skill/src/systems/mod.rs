mod common;
mod glicko2;

pub use common::{
    Competitor, CompetitorId, DEFAULT_DEVIATION, DEFAULT_RATING, DEFAULT_VOLATILITY, Rating,
    RatingSystem,
};
pub use glicko2::{GLICKO2_SCALE, Glicko2};
