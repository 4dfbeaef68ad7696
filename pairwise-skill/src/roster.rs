use crate::systems::{Competitor, CompetitorId};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to read roster file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse roster file")]
    Parse(#[from] serde_json::Error),
    #[error("competitor id {0} appears more than once")]
    DuplicateId(CompetitorId),
}

#[derive(Deserialize)]
struct RosterEntry {
    id: CompetitorId,
    name: String,
}

/// Reads a JSON list of `{id, name}` records; every competitor starts at the default rating.
pub fn roster_from_file(path: impl AsRef<Path>) -> Result<Vec<Competitor>, RosterError> {
    let json = std::fs::read_to_string(path)?;
    let entries: Vec<RosterEntry> = serde_json::from_str(&json)?;
    let mut roster: Vec<Competitor> = Vec::with_capacity(entries.len());
    for entry in entries {
        if roster.iter().any(|c| c.id == entry.id) {
            return Err(RosterError::DuplicateId(entry.id));
        }
        roster.push(Competitor::new(entry.id, entry.name));
    }
    Ok(roster)
}

/// Reconciles persisted competitor data against the static roster.
///
/// The result has exactly the roster's entries, in roster order. Where `persisted` holds
/// a record with the same id, its rating and vote count carry over; everything else comes
/// from the roster. Persisted records for ids outside the roster are dropped.
pub fn merge(roster: &[Competitor], persisted: &[Competitor]) -> Vec<Competitor> {
    roster
        .iter()
        .map(|initial| {
            let mut competitor = initial.clone();
            if let Some(found) = persisted.iter().find(|p| p.id == initial.id) {
                if found.rating.is_valid() {
                    competitor.absorb_progress(found);
                } else {
                    tracing::warn!(
                        "Ignoring stored rating {:?} for competitor {}",
                        found.rating,
                        found.id
                    );
                }
            }
            competitor
        })
        .collect()
}

/// Competitors sorted by rating, best first. Ties keep roster order.
pub fn leaderboard(competitors: &[Competitor]) -> Vec<&Competitor> {
    let mut sorted: Vec<&Competitor> = competitors.iter().collect();
    sorted.sort_by(|a, b| b.rating.rating.total_cmp(&a.rating.rating));
    sorted
}

/// 1-based leaderboard position of `id`.
pub fn rank_of(competitors: &[Competitor], id: CompetitorId) -> Option<usize> {
    leaderboard(competitors)
        .iter()
        .position(|c| c.id == id)
        .map(|idx| idx + 1)
}
