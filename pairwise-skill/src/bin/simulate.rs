use anyhow::Context;
use itertools::Itertools;
use pairwise_skill::roster::roster_from_file;
use pairwise_skill::telemetry::{get_subscriber, init_subscriber};
use pairwise_skill::{
    Competitor, MemoryStore, Rating, RatingSystem, SessionConfig, VotingSession,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

const DEFAULT_NUM_COMPETITORS: u32 = 28;

fn get_roster_from_args(args: &[String]) -> anyhow::Result<Vec<Competitor>> {
    match args.get(2) {
        Some(arg) => match arg.parse::<u32>() {
            Ok(n) => Ok(synthetic_roster(n)),
            Err(_) => roster_from_file(arg)
                .with_context(|| format!("Failed to load roster {}", arg)),
        },
        None => Ok(synthetic_roster(DEFAULT_NUM_COMPETITORS)),
    }
}

fn synthetic_roster(n: u32) -> Vec<Competitor> {
    (1..=n)
        .map(|id| Competitor::new(id, format!("Competitor {}", id)))
        .collect()
}

/// Votes through an entire schedule, with hidden strengths deciding each match
/// through the logistic model, and reports how well the ranking was recovered.
fn main() -> anyhow::Result<()> {
    init_subscriber(get_subscriber(
        "simulate".into(),
        "info".into(),
        std::io::stdout,
    ));

    // Parse arguments: simulate [config.json5|-] [roster.json|num_competitors]
    let args: Vec<String> = std::env::args().collect();
    let config = match args.get(1).map(String::as_str) {
        Some("-") | None => SessionConfig::default(),
        Some(path) => SessionConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration {}", path))?,
    };
    let roster = get_roster_from_args(&args)?;

    // Hidden strengths on the public rating scale
    let mut rng = config
        .scheduler
        .seed
        .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
    let strength: HashMap<_, f64> = roster
        .iter()
        .map(|c| (c.id, rng.random_range(1000.0..2000.0)))
        .collect();
    let truth = |id| Rating {
        rating: strength[&id],
        ..Rating::default()
    };

    let mut session = VotingSession::open(MemoryStore::default(), roster, config);
    // An auto-cycling schedule never finishes, so stop after one cycle's worth of votes
    let max_votes = session.progress().total;
    let mut votes = 0;
    while let Some((a, b)) = session.current_matchup() {
        if votes >= max_votes {
            break;
        }
        let p_a = config.glicko.expected_score(&truth(a.id), &truth(b.id));
        let winner = if rng.random_bool(p_a) { a.id } else { b.id };
        let outcome = session.vote(winner)?;
        votes += 1;
        tracing::debug!(
            "{} moved {:+} places, {} moved {:+}",
            outcome.winner.name,
            outcome.winner_rank_change(),
            outcome.loser.name,
            outcome.loser_rank_change()
        );

        let progress = session.progress();
        if progress.completed % 50 == 0 {
            tracing::info!("{}/{} matches completed", progress.completed, progress.total);
        }
    }

    let leaderboard = session.leaderboard();
    for tier in session.tier_assignments() {
        if tier.competitors.is_empty() {
            continue;
        }
        let names = tier.competitors.iter().map(|c| c.name.as_str()).join(", ");
        tracing::info!("[{}] from #{}: {}", tier.config.label, tier.start_rank, names);
    }
    if let Some(best) = leaderboard.first() {
        let (lo, hi) = best.rating.interval();
        tracing::info!(
            "Top rated {} at {:.0}, 95% interval [{:.0}, {:.0}]",
            best.name,
            best.rating.rating,
            lo,
            hi
        );
    }

    // Fraction of pairs whose estimated order matches the hidden one
    let (mut agree, mut pairs) = (0usize, 0usize);
    for (hi, lo) in leaderboard.iter().tuple_combinations() {
        pairs += 1;
        if strength[&hi.id] >= strength[&lo.id] {
            agree += 1;
        }
    }
    tracing::info!(
        "Finished after {} votes; ordering accuracy {:.3}",
        votes,
        agree as f64 / pairs.max(1) as f64
    );
    Ok(())
}
