use super::Rating;
use serde::{Deserialize, Serialize};

pub type CompetitorId = u32;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub rating: Rating,
    /// Number of matches this competitor has taken part in
    #[serde(default)]
    pub votes: u32,
}

impl Competitor {
    pub fn new(id: CompetitorId, name: impl Into<String>) -> Self {
        Self::with_rating(id, name, Rating::default())
    }

    pub fn with_rating(id: CompetitorId, name: impl Into<String>, rating: Rating) -> Self {
        Self {
            id,
            name: name.into(),
            rating,
            votes: 0,
        }
    }

    /// Copies the fields that change over a session (rating and vote count) from `other`,
    /// keeping this competitor's identity and static fields.
    pub fn absorb_progress(&mut self, other: &Competitor) {
        self.rating = other.rating;
        self.votes = other.votes;
    }
}
