mod competitor;

pub use competitor::{Competitor, CompetitorId};
use serde::{Deserialize, Serialize};

/// Public-scale rating a newcomer starts at.
pub const DEFAULT_RATING: f64 = 1500.;
/// Rating deviation ("RD") a newcomer starts at.
pub const DEFAULT_DEVIATION: f64 = 350.;
pub const DEFAULT_VOLATILITY: f64 = 0.06;

/// A competitor's skill estimate on the public (Glicko) scale.
/// Invariant: `deviation > 0` and `volatility > 0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rating: f64,
    #[serde(alias = "rd")]
    pub deviation: f64,
    #[serde(alias = "vol")]
    pub volatility: f64,
}

impl Default for Rating {
    fn default() -> Self {
        Self {
            rating: DEFAULT_RATING,
            deviation: DEFAULT_DEVIATION,
            volatility: DEFAULT_VOLATILITY,
        }
    }
}

impl Rating {
    /// 95% confidence interval for the true rating
    pub fn interval(&self) -> (f64, f64) {
        (
            self.rating - 1.96 * self.deviation,
            self.rating + 1.96 * self.deviation,
        )
    }

    pub fn is_valid(&self) -> bool {
        self.rating.is_finite()
            && self.deviation.is_finite()
            && self.volatility.is_finite()
            && self.deviation > 0.
            && self.volatility > 0.
    }
}

/// A rating system for one-on-one matches with a binary outcome.
pub trait RatingSystem: std::fmt::Debug {
    /// Returns the updated `(winner, loser)`. Both inputs must hold valid ratings.
    fn update(&self, winner: &Competitor, loser: &Competitor) -> (Competitor, Competitor);

    /// Probability that `player` beats `foe`.
    fn expected_score(&self, player: &Rating, foe: &Rating) -> f64;
}
