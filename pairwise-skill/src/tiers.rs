//! Tier-list layout: consecutive slices of the leaderboard, each with a label and color.

use crate::systems::Competitor;
use serde::{Deserialize, Serialize};

const DEFAULT_TIERS: [(&str, usize, &str); 6] = [
    ("S", 5, "#FF7F7F"),
    ("A", 6, "#FFBF7F"),
    ("B", 6, "#FFDF7F"),
    ("C", 6, "#FFFF7F"),
    ("D", 5, "#BFFF7F"),
    ("E", 5, "#7FFF7F"),
];
const NEW_TIER_SIZE: usize = 3;
const NEW_TIER_COLOR: &str = "#7FFF7F";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfig {
    pub label: String,
    /// How many leaderboard places this tier holds
    #[serde(alias = "count")]
    pub size: usize,
    pub color: String,
}

impl TierConfig {
    pub fn new(label: impl Into<String>, size: usize, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            size,
            color: color.into(),
        }
    }
}

/// One tier filled with its slice of the leaderboard.
#[derive(Debug)]
pub struct Tier<'a> {
    pub config: &'a TierConfig,
    /// 1-based rank of the first place in this tier
    pub start_rank: usize,
    pub competitors: Vec<&'a Competitor>,
}

/// An ordered list of tiers; never empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierList {
    tiers: Vec<TierConfig>,
}

impl Default for TierList {
    fn default() -> Self {
        Self {
            tiers: DEFAULT_TIERS
                .iter()
                .map(|&(label, size, color)| TierConfig::new(label, size, color))
                .collect(),
        }
    }
}

impl TierList {
    /// Falls back to the default layout if `tiers` is empty.
    pub fn new(tiers: Vec<TierConfig>) -> Self {
        if tiers.is_empty() {
            Self::default()
        } else {
            Self { tiers }
        }
    }

    pub fn tiers(&self) -> &[TierConfig] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Total number of leaderboard places covered by all tiers
    pub fn capacity(&self) -> usize {
        self.tiers
            .iter()
            .fold(0, |total, t| total.saturating_add(t.size))
    }

    pub fn add_tier(&mut self) {
        let label = (self.tiers.len() + 1).to_string();
        self.tiers
            .push(TierConfig::new(label, NEW_TIER_SIZE, NEW_TIER_COLOR));
    }

    /// Removes the tier at `index`. The last remaining tier cannot be removed.
    pub fn remove_tier(&mut self, index: usize) -> Option<TierConfig> {
        if self.tiers.len() <= 1 || index >= self.tiers.len() {
            return None;
        }
        Some(self.tiers.remove(index))
    }

    pub fn set_label(&mut self, index: usize, label: impl Into<String>) -> bool {
        self.tiers
            .get_mut(index)
            .map(|tier| tier.label = label.into())
            .is_some()
    }

    /// Every tier holds at least one place.
    pub fn set_size(&mut self, index: usize, size: usize) -> bool {
        self.tiers
            .get_mut(index)
            .map(|tier| tier.size = size.max(1))
            .is_some()
    }

    /// Brings every tier size into `1..=max_size`.
    pub fn clamp_sizes(&mut self, max_size: usize) {
        let max_size = max_size.max(1);
        for tier in &mut self.tiers {
            let clamped = tier.size.clamp(1, max_size);
            if clamped != tier.size {
                tracing::warn!(
                    "Clamping size of tier {:?} from {} to {}",
                    tier.label,
                    tier.size,
                    clamped
                );
                tier.size = clamped;
            }
        }
    }

    pub fn set_color(&mut self, index: usize, color: impl Into<String>) -> bool {
        self.tiers
            .get_mut(index)
            .map(|tier| tier.color = color.into())
            .is_some()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Slices a best-first leaderboard into tiers. Places past `capacity()` are left out;
    /// tiers past the end of the leaderboard come back empty.
    pub fn assign<'a>(&'a self, leaderboard: &[&'a Competitor]) -> Vec<Tier<'a>> {
        let mut start: usize = 0;
        self.tiers
            .iter()
            .map(|config| {
                let end = start.saturating_add(config.size);
                let lo = start.min(leaderboard.len());
                let hi = end.min(leaderboard.len());
                let tier = Tier {
                    config,
                    start_rank: start.saturating_add(1),
                    competitors: leaderboard[lo..hi].to_vec(),
                };
                start = end;
                tier
            })
            .collect()
    }
}
