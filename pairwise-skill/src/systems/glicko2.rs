//! Glicko-2 system details: http://www.glicko.net/glicko/glicko2.pdf
//!
//! Each vote is treated as its own rating period containing a single game, so both
//! sides are updated immediately from their pre-match estimates.

use super::{Competitor, DEFAULT_RATING, Rating, RatingSystem};
use crate::numerical::{logistic, search_downward, solve_illinois};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Conversion factor between the public scale and the internal Glicko-2 scale.
pub const GLICKO2_SCALE: f64 = 173.7178;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Glicko2 {
    /// Constrains how quickly volatility may change between matches.
    pub tau: f64,
    /// Convergence tolerance for the volatility root-finder.
    pub epsilon: f64,
}

impl Default for Glicko2 {
    fn default() -> Self {
        Self {
            tau: 0.5,
            epsilon: 1e-6,
        }
    }
}

/// A rating on the internal scale, centered at 0.
#[derive(Clone, Copy, Debug)]
struct Scaled {
    mu: f64,
    phi: f64,
}

impl From<&Rating> for Scaled {
    fn from(rating: &Rating) -> Self {
        Self {
            mu: (rating.rating - DEFAULT_RATING) / GLICKO2_SCALE,
            phi: rating.deviation / GLICKO2_SCALE,
        }
    }
}

fn g(phi: f64) -> f64 {
    (1. + 3. * phi * phi / (PI * PI)).sqrt().recip()
}

fn expected(mu: f64, mu_foe: f64, phi_foe: f64) -> f64 {
    logistic(g(phi_foe) * (mu - mu_foe))
}

impl Glicko2 {
    /// Iteratively solves for the volatility that follows a game with
    /// improvement `delta` and estimated variance `v`.
    fn new_volatility(&self, phi: f64, volatility: f64, delta: f64, v: f64) -> f64 {
        let a = (volatility * volatility).ln();
        let tau_sq = self.tau * self.tau;
        let phi_sq = phi * phi;
        let delta_sq = delta * delta;
        let f = |x: f64| {
            let ex = x.exp();
            let denom = phi_sq + v + ex;
            ex * (delta_sq - phi_sq - v - ex) / (2. * denom * denom) - (x - a) / tau_sq
        };

        let b = if delta_sq > phi_sq + v {
            (delta_sq - phi_sq - v).ln()
        } else {
            search_downward(a, self.tau, f)
        };
        (solve_illinois((a, b), self.epsilon, f) / 2.).exp()
    }

    /// Updates one side of a match against `foe`, given the observed `score` (1 or 0).
    fn update_side(&self, player: &Rating, foe: &Rating, score: f64) -> Rating {
        let me = Scaled::from(player);
        let them = Scaled::from(foe);

        let g_foe = g(them.phi);
        let e = expected(me.mu, them.mu, them.phi);
        let v = (g_foe * g_foe * e * (1. - e)).recip();
        let delta = v * g_foe * (score - e);

        let volatility = self.new_volatility(me.phi, player.volatility, delta, v);
        let phi_star_sq = me.phi * me.phi + volatility * volatility;
        let phi = (phi_star_sq.recip() + v.recip()).recip().sqrt();
        let mu = me.mu + phi * phi * g_foe * (score - e);

        // The algorithm keeps both strictly positive in exact arithmetic; guard against drift
        Rating {
            rating: GLICKO2_SCALE * mu + DEFAULT_RATING,
            deviation: (GLICKO2_SCALE * phi).max(f64::MIN_POSITIVE),
            volatility: volatility.max(f64::MIN_POSITIVE),
        }
    }
}

impl RatingSystem for Glicko2 {
    fn update(&self, winner: &Competitor, loser: &Competitor) -> (Competitor, Competitor) {
        let mut new_winner = winner.clone();
        let mut new_loser = loser.clone();
        new_winner.rating = self.update_side(&winner.rating, &loser.rating, 1.);
        new_loser.rating = self.update_side(&loser.rating, &winner.rating, 0.);
        (new_winner, new_loser)
    }

    fn expected_score(&self, player: &Rating, foe: &Rating) -> f64 {
        let me = Scaled::from(player);
        let them = Scaled::from(foe);
        expected(me.mu, them.mu, them.phi)
    }
}
