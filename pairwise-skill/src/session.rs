//! The host-facing voting session.
//!
//! A `VotingSession` is built once per application run from a store and a roster; it
//! hydrates everything from the store on construction, and every operation writes its
//! effects back. Whoever owns the session owns the store: it is not meant to be shared
//! between concurrent flows.

use crate::config::SessionConfig;
use crate::history::{MatchHistory, MatchRecord};
use crate::roster::{leaderboard, merge, rank_of};
use crate::scheduler::{Advance, MatchScheduler, Pair, Progress};
use crate::store::{
    COMPETITORS_KEY, CURRENT_PAIR_KEY, HISTORY_KEY, NEXT_PAIR_KEY, QUEUE_KEY, Store,
    TIER_CONFIG_KEY, clear, read_json, write_json,
};
use crate::systems::{Competitor, CompetitorId, Glicko2, RatingSystem};
use crate::tiers::{Tier, TierConfig, TierList};
use std::collections::BTreeSet;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("there is no match to vote on")]
    NoActiveMatch,
    #[error("competitor {0} is not part of the current match")]
    NotInCurrentMatch(CompetitorId),
    #[error("competitor {0} is not on the roster")]
    UnknownCompetitor(CompetitorId),
    #[error("there is no vote to undo")]
    NothingToUndo,
}

/// Result of a vote, with enough context to show how the leaderboard moved.
#[derive(Clone, Debug)]
pub struct VoteOutcome {
    pub winner: Competitor,
    pub loser: Competitor,
    /// 1-based (before, after) ranks
    pub winner_rank: (usize, usize),
    pub loser_rank: (usize, usize),
}

impl VoteOutcome {
    /// Places gained by the winner; negative if it somehow dropped.
    pub fn winner_rank_change(&self) -> isize {
        self.winner_rank.0 as isize - self.winner_rank.1 as isize
    }

    pub fn loser_rank_change(&self) -> isize {
        self.loser_rank.0 as isize - self.loser_rank.1 as isize
    }
}

/// Everything needed to take back the most recent vote.
#[derive(Clone, Debug)]
struct UndoSnapshot {
    competitors: Vec<Competitor>,
    advance: Advance,
}

pub struct VotingSession<S: Store> {
    store: S,
    system: Glicko2,
    roster: Vec<Competitor>,
    competitors: Vec<Competitor>,
    history: MatchHistory,
    scheduler: MatchScheduler,
    tiers: TierList,
    undo: Option<UndoSnapshot>,
}

impl<S: Store> VotingSession<S> {
    /// Hydrates a session from `store`, falling back to `roster` defaults for anything
    /// missing or unreadable.
    #[tracing::instrument(name = "Opening voting session", skip_all, fields(competitors = roster.len()))]
    pub fn open(mut store: S, roster: Vec<Competitor>, config: SessionConfig) -> Self {
        let persisted: Vec<Competitor> = read_json(&store, COMPETITORS_KEY).unwrap_or_default();
        let competitors = merge(&roster, &persisted);
        let history: MatchHistory = read_json(&store, HISTORY_KEY).unwrap_or_default();
        let mut tiers = TierList::new(
            read_json::<Vec<TierConfig>, _>(&store, TIER_CONFIG_KEY).unwrap_or_default(),
        );
        tiers.clamp_sizes(roster.len());
        let scheduler =
            MatchScheduler::initialize_or_resume(&competitors, config.scheduler, &mut store);
        tracing::info!(
            "Session ready: {} votes so far, {:?}",
            history.len(),
            scheduler.progress()
        );

        Self {
            store,
            system: config.glicko,
            roster,
            competitors,
            history,
            scheduler,
            tiers,
            undo: None,
        }
    }

    pub fn competitors(&self) -> &[Competitor] {
        &self.competitors
    }

    pub fn competitor(&self, id: CompetitorId) -> Option<&Competitor> {
        self.competitors.iter().find(|c| c.id == id)
    }

    pub fn history(&self) -> &MatchHistory {
        &self.history
    }

    pub fn scheduler(&self) -> &MatchScheduler {
        &self.scheduler
    }

    /// Gives the store back, e.g. to reopen the session later.
    pub fn into_store(self) -> S {
        self.store
    }

    fn resolve(&self, pair: Pair) -> Option<(&Competitor, &Competitor)> {
        Some((self.competitor(pair.first())?, self.competitor(pair.second())?))
    }

    /// The match currently up for a vote, with up-to-date ratings.
    pub fn current_matchup(&self) -> Option<(&Competitor, &Competitor)> {
        self.resolve(self.scheduler.current_pair()?)
    }

    /// The match after the current one, so the host can prepare it ahead of time.
    pub fn lookahead_matchup(&self) -> Option<(&Competitor, &Competitor)> {
        self.resolve(self.scheduler.lookahead_pair()?)
    }

    /// Records a vote for `winner_id` in the current match and moves on to the next one.
    #[tracing::instrument(name = "Recording vote", skip(self))]
    pub fn vote(&mut self, winner_id: CompetitorId) -> Result<VoteOutcome, SessionError> {
        let pair = self
            .scheduler
            .current_pair()
            .ok_or(SessionError::NoActiveMatch)?;
        let loser_id = pair
            .opponent(winner_id)
            .ok_or(SessionError::NotInCurrentMatch(winner_id))?;
        let winner_idx = self.index_of(winner_id)?;
        let loser_idx = self.index_of(loser_id)?;

        let before = self.competitors.clone();
        let (mut winner, mut loser) = self
            .system
            .update(&self.competitors[winner_idx], &self.competitors[loser_idx]);
        winner.votes += 1;
        loser.votes += 1;
        self.competitors[winner_idx] = winner.clone();
        self.competitors[loser_idx] = loser.clone();

        self.history.push(MatchRecord::now(winner_id, loser_id));
        write_json(&mut self.store, COMPETITORS_KEY, &self.competitors);
        write_json(&mut self.store, HISTORY_KEY, &self.history);

        let advance = self.scheduler.advance(&self.competitors, &mut self.store);

        let rank = |competitors: &[Competitor], id| rank_of(competitors, id).unwrap_or(0);
        let outcome = VoteOutcome {
            winner_rank: (rank(&before, winner_id), rank(&self.competitors, winner_id)),
            loser_rank: (rank(&before, loser_id), rank(&self.competitors, loser_id)),
            winner,
            loser,
        };
        self.undo = Some(UndoSnapshot {
            competitors: before,
            advance,
        });
        tracing::debug!(
            "{} beat {}: {:.1} -> {:.1}",
            winner_id,
            loser_id,
            outcome.winner.rating.rating,
            outcome.loser.rating.rating
        );
        Ok(outcome)
    }

    pub fn can_undo(&self) -> bool {
        self.undo.is_some()
    }

    /// Takes back the most recent vote. Only one level of undo is kept.
    #[tracing::instrument(name = "Undoing last vote", skip(self))]
    pub fn undo(&mut self) -> Result<(), SessionError> {
        let snapshot = self.undo.take().ok_or(SessionError::NothingToUndo)?;
        self.competitors = snapshot.competitors;
        write_json(&mut self.store, COMPETITORS_KEY, &self.competitors);
        if self.history.pop().is_none() {
            tracing::warn!("Undo found an empty match history");
        }
        write_json(&mut self.store, HISTORY_KEY, &self.history);
        self.scheduler.rewind(snapshot.advance, &mut self.store);
        Ok(())
    }

    /// Discards all ratings and history and starts a fresh schedule.
    /// The tier layout is kept.
    #[tracing::instrument(name = "Resetting session", skip(self))]
    pub fn reset(&mut self) {
        for key in [
            COMPETITORS_KEY,
            HISTORY_KEY,
            QUEUE_KEY,
            CURRENT_PAIR_KEY,
            NEXT_PAIR_KEY,
        ] {
            clear(&mut self.store, key);
        }
        self.competitors = self.roster.clone();
        self.history = MatchHistory::default();
        self.undo = None;
        self.scheduler.reset(&mut self.store);
    }

    pub fn progress(&self) -> Progress {
        self.scheduler.progress()
    }

    /// True once every scheduled match has been voted on.
    pub fn is_finished(&self) -> bool {
        self.scheduler.is_exhausted()
    }

    pub fn leaderboard(&self) -> Vec<&Competitor> {
        leaderboard(&self.competitors)
    }

    /// Competitors `id` has beaten, and those it has lost to, in roster order.
    pub fn opponents(
        &self,
        id: CompetitorId,
    ) -> Result<(Vec<&Competitor>, Vec<&Competitor>), SessionError> {
        self.index_of(id)?;
        let won = self.history.won_against(id);
        let lost = self.history.lost_to(id);
        let pick = move |ids: &BTreeSet<CompetitorId>| {
            self.competitors
                .iter()
                .filter(|c| ids.contains(&c.id))
                .collect::<Vec<_>>()
        };
        Ok((pick(&won), pick(&lost)))
    }

    pub fn tiers(&self) -> &TierList {
        &self.tiers
    }

    /// Applies `edit` to the tier layout and persists the result. Tier sizes are kept
    /// between one and the roster size.
    pub fn edit_tiers<T>(&mut self, edit: impl FnOnce(&mut TierList) -> T) -> T {
        let result = edit(&mut self.tiers);
        self.tiers.clamp_sizes(self.roster.len());
        write_json(&mut self.store, TIER_CONFIG_KEY, &self.tiers);
        result
    }

    /// The tier layout filled with the current leaderboard.
    pub fn tier_assignments(&self) -> Vec<Tier<'_>> {
        self.tiers.assign(&self.leaderboard())
    }

    fn index_of(&self, id: CompetitorId) -> Result<usize, SessionError> {
        self.competitors
            .iter()
            .position(|c| c.id == id)
            .ok_or(SessionError::UnknownCompetitor(id))
    }
}
