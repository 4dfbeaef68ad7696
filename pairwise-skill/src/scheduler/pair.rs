use crate::systems::CompetitorId;
use serde::{Deserialize, Serialize};

/// An unordered match-up of two distinct competitors, stored with the smaller id first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(CompetitorId, CompetitorId)", into = "(CompetitorId, CompetitorId)")]
pub struct Pair(CompetitorId, CompetitorId);

impl Pair {
    /// Returns `None` if `a == b`.
    pub fn new(a: CompetitorId, b: CompetitorId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self(a, b)),
            std::cmp::Ordering::Greater => Some(Self(b, a)),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn first(&self) -> CompetitorId {
        self.0
    }

    pub fn second(&self) -> CompetitorId {
        self.1
    }

    pub fn contains(&self, id: CompetitorId) -> bool {
        self.0 == id || self.1 == id
    }

    /// The other side of the match-up, if `id` takes part in it.
    pub fn opponent(&self, id: CompetitorId) -> Option<CompetitorId> {
        if id == self.0 {
            Some(self.1)
        } else if id == self.1 {
            Some(self.0)
        } else {
            None
        }
    }
}

impl TryFrom<(CompetitorId, CompetitorId)> for Pair {
    type Error = String;

    fn try_from((a, b): (CompetitorId, CompetitorId)) -> Result<Self, Self::Error> {
        Self::new(a, b).ok_or_else(|| format!("Pair ({}, {}) has no opponent", a, b))
    }
}

impl From<Pair> for (CompetitorId, CompetitorId) {
    fn from(pair: Pair) -> Self {
        (pair.0, pair.1)
    }
}
