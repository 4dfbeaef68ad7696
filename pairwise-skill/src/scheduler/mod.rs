//! Non-repeating scheduler of head-to-head matches.
//!
//! A cycle visits every unordered pair of competitors exactly once, in a uniformly
//! shuffled order. Besides the queue of unvisited pairs, the scheduler keeps two slots:
//! the `current` pair being voted on, and a `lookahead` pair that the host can prepare
//! in advance. Every mutation is written through to the store, so a reload resumes
//! exactly where the session left off.

mod pair;

use crate::store::{CURRENT_PAIR_KEY, NEXT_PAIR_KEY, QUEUE_KEY, Store, read_json, write_json};
use crate::systems::{Competitor, CompetitorId};
use itertools::Itertools;
pub use pair::Pair;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// What happens once every pair of a cycle has been visited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleMode {
    /// The session ends; only an explicit `reset()` starts a new cycle.
    #[default]
    Terminal,
    /// A freshly shuffled cycle starts as soon as the queue runs dry.
    AutoCycle,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub mode: ScheduleMode,
    /// Seed for the shuffle; drawn from the OS when absent.
    pub seed: Option<u64>,
}

/// The pair slots, as captured before an advance so it can be undone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Slots {
    pub current: Option<Pair>,
    pub lookahead: Option<Pair>,
}

/// What one `advance` changed, so that `rewind` can take it back exactly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Advance {
    pub previous: Slots,
    /// Pairs moved from the queue into a slot, in the order they were taken
    pub taken: Vec<Pair>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

fn resolves(pair: Pair, roster: &[Competitor]) -> bool {
    let known = |id: CompetitorId| roster.iter().any(|c| c.id == id);
    known(pair.first()) && known(pair.second())
}

#[derive(Debug)]
pub struct MatchScheduler {
    ids: Vec<CompetitorId>,
    queue: VecDeque<Pair>,
    current: Option<Pair>,
    lookahead: Option<Pair>,
    mode: ScheduleMode,
    rng: StdRng,
}

impl MatchScheduler {
    /// Resumes the session persisted in `store`, or starts a fresh cycle over `roster`
    /// if none was found.
    pub fn initialize_or_resume<S: Store + ?Sized>(
        roster: &[Competitor],
        config: SchedulerConfig,
        store: &mut S,
    ) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        let mut scheduler = Self {
            ids: roster.iter().map(|c| c.id).unique().collect(),
            queue: VecDeque::new(),
            current: None,
            lookahead: None,
            mode: config.mode,
            rng,
        };

        let queue: Option<VecDeque<Pair>> = read_json(store, QUEUE_KEY);
        let current: Option<Option<Pair>> = read_json(store, CURRENT_PAIR_KEY);
        let lookahead: Option<Option<Pair>> = read_json(store, NEXT_PAIR_KEY);
        if queue.is_none() && current.is_none() && lookahead.is_none() {
            tracing::info!(
                "No stored session; scheduling {} competitors",
                scheduler.ids.len()
            );
            scheduler.start_cycle();
        } else {
            scheduler.queue = queue.unwrap_or_default();
            scheduler.current = current.flatten();
            scheduler.lookahead = lookahead.flatten();
            tracing::info!(
                "Resumed stored session with {} queued pairs",
                scheduler.queue.len()
            );
            scheduler.repair(roster);
        }
        scheduler.persist(store);
        scheduler
    }

    pub fn current_pair(&self) -> Option<Pair> {
        self.current
    }

    pub fn lookahead_pair(&self) -> Option<Pair> {
        self.lookahead
    }

    pub fn slots(&self) -> Slots {
        Slots {
            current: self.current,
            lookahead: self.lookahead,
        }
    }

    /// Unvisited pairs, in the order they will be scheduled.
    pub fn queue(&self) -> impl ExactSizeIterator<Item = &Pair> {
        self.queue.iter()
    }

    /// Promotes the lookahead pair to current and pops the next lookahead.
    /// `roster` is the up-to-date competitor view; pairs naming anyone outside it are skipped.
    pub fn advance<S: Store + ?Sized>(&mut self, roster: &[Competitor], store: &mut S) -> Advance {
        let mut advance = Advance {
            previous: self.slots(),
            taken: vec![],
        };
        if self.is_exhausted() {
            tracing::debug!("Advance requested on an exhausted schedule");
            return advance;
        }
        let promoted = self.lookahead.take().filter(|&pair| {
            let known = resolves(pair, roster);
            if !known {
                tracing::warn!("Skipping lookahead {:?} with unknown competitor", pair);
            }
            known
        });
        self.current = match promoted {
            Some(pair) => Some(pair),
            None => self.take_next(roster, advance.previous.current, &mut advance.taken),
        };
        if let Some(current) = self.current {
            self.lookahead = self.take_next(roster, Some(current), &mut advance.taken);
        }
        tracing::debug!(
            "Advanced to {:?}, next {:?}, {} queued",
            self.current,
            self.lookahead,
            self.queue.len()
        );
        self.persist(store);
        advance
    }

    /// Re-inserts `pair` at the front of the queue, so it is the next one popped.
    pub fn push_back<S: Store + ?Sized>(&mut self, pair: Pair, store: &mut S) {
        self.queue.push_front(pair);
        self.persist(store);
    }

    /// Undoes `advance`, which must be the most recent one: the pairs it took return to
    /// the front of the queue in their original order, then the slots are restored.
    /// Stale pairs it skipped stay dropped.
    pub fn rewind<S: Store + ?Sized>(&mut self, advance: Advance, store: &mut S) {
        for &pair in advance.taken.iter().rev() {
            self.queue.push_front(pair);
        }
        self.current = advance.previous.current;
        self.lookahead = advance.previous.lookahead;
        self.persist(store);
    }

    /// Discards the current cycle and starts a freshly shuffled one.
    pub fn reset<S: Store + ?Sized>(&mut self, store: &mut S) {
        tracing::info!("Resetting match schedule");
        self.start_cycle();
        self.persist(store);
    }

    /// Both slots count as not yet completed.
    pub fn progress(&self) -> Progress {
        let n = self.ids.len();
        let total = n * n.saturating_sub(1) / 2;
        let in_flight = self.queue.len()
            + usize::from(self.current.is_some())
            + usize::from(self.lookahead.is_some());
        Progress {
            completed: total.saturating_sub(in_flight),
            total,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.current.is_none() && self.lookahead.is_none() && self.queue.is_empty()
    }

    // Fisher-Yates shuffle of every unordered pair
    fn shuffled_universe(&mut self) -> VecDeque<Pair> {
        let mut pairs: Vec<Pair> = self
            .ids
            .iter()
            .tuple_combinations()
            .filter_map(|(&a, &b)| Pair::new(a, b))
            .collect();
        pairs.shuffle(&mut self.rng);
        pairs.into()
    }

    fn start_cycle(&mut self) {
        self.queue = self.shuffled_universe();
        self.current = self.queue.pop_front();
        self.lookahead = self.queue.pop_front();
    }

    // Pops until a pair resolves against `roster`, trying at most the whole queue once.
    fn pop_known(&mut self, roster: &[Competitor]) -> Option<Pair> {
        for _ in 0..self.queue.len() {
            let pair = self.queue.pop_front()?;
            if resolves(pair, roster) {
                return Some(pair);
            }
            tracing::warn!("Skipping queued {:?} with unknown competitor", pair);
        }
        None
    }

    // `avoid` is the pair last put in a slot; a fresh cycle never starts with it.
    fn pop_next(&mut self, roster: &[Competitor], avoid: Option<Pair>) -> Option<Pair> {
        if let Some(pair) = self.pop_known(roster) {
            return Some(pair);
        }
        if self.mode == ScheduleMode::AutoCycle && self.queue.is_empty() {
            tracing::info!("Cycle complete; reshuffling all pairs");
            self.queue = self.shuffled_universe();
            if self.queue.len() > 1 && self.queue.front().copied() == avoid {
                self.queue.rotate_left(1);
            }
            return self.pop_known(roster);
        }
        None
    }

    fn take_next(
        &mut self,
        roster: &[Competitor],
        avoid: Option<Pair>,
        taken: &mut Vec<Pair>,
    ) -> Option<Pair> {
        let pair = self.pop_next(roster, avoid)?;
        taken.push(pair);
        Some(pair)
    }

    // Drops slots naming unknown competitors and refills them from the queue.
    fn repair(&mut self, roster: &[Competitor]) {
        let mut dropped = false;
        for slot in [&mut self.current, &mut self.lookahead] {
            if let Some(pair) = *slot {
                if !resolves(pair, roster) {
                    tracing::warn!("Dropping stored {:?} with unknown competitor", pair);
                    *slot = None;
                    dropped = true;
                }
            }
        }
        if dropped {
            if self.current.is_none() {
                self.current = self.lookahead.take().or_else(|| self.pop_next(roster, None));
            }
            if self.current.is_some() && self.lookahead.is_none() {
                self.lookahead = self.pop_next(roster, self.current);
            }
        }
    }

    fn persist<S: Store + ?Sized>(&self, store: &mut S) {
        write_json(store, QUEUE_KEY, &self.queue);
        write_json(store, CURRENT_PAIR_KEY, &self.current);
        write_json(store, NEXT_PAIR_KEY, &self.lookahead);
    }
}
