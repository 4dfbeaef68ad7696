use crate::systems::CompetitorId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The outcome of one vote.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub winner_id: CompetitorId,
    pub loser_id: CompetitorId,
    pub timestamp: DateTime<Utc>,
}

impl MatchRecord {
    pub fn now(winner_id: CompetitorId, loser_id: CompetitorId) -> Self {
        Self {
            winner_id,
            loser_id,
            timestamp: Utc::now(),
        }
    }
}

/// Append-only log of votes; undo removes the tail.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchHistory {
    records: Vec<MatchRecord>,
}

impl MatchHistory {
    pub fn push(&mut self, record: MatchRecord) {
        self.records.push(record);
    }

    pub fn pop(&mut self) -> Option<MatchRecord> {
        self.records.pop()
    }

    pub fn last(&self) -> Option<&MatchRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchRecord> {
        self.records.iter()
    }

    /// Everyone `id` has beaten at least once.
    pub fn won_against(&self, id: CompetitorId) -> BTreeSet<CompetitorId> {
        self.records
            .iter()
            .filter(|r| r.winner_id == id)
            .map(|r| r.loser_id)
            .collect()
    }

    /// Everyone `id` has lost to at least once.
    pub fn lost_to(&self, id: CompetitorId) -> BTreeSet<CompetitorId> {
        self.records
            .iter()
            .filter(|r| r.loser_id == id)
            .map(|r| r.winner_id)
            .collect()
    }
}
