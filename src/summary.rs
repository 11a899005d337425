use crate::aggregate::ComparisonCounts;
use crate::data_processing::try_write_slice_to_file;
use crate::estimator::Estimate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StrengthSummary {
    pub rank: usize,
    pub item: usize,
    pub strength: f64,
    pub wins: u64,
    pub comparisons: u64,
}

/// One row per item, strongest first; equal strengths are ordered by item index.
pub fn make_leaderboard(counts: &ComparisonCounts, estimate: &Estimate) -> Vec<StrengthSummary> {
    let mut order: Vec<usize> = (0..estimate.strengths.len()).collect();
    order.sort_by(|&a, &b| {
        let (p_a, p_b) = (estimate.strengths[a], estimate.strengths[b]);
        p_b.total_cmp(&p_a).then(a.cmp(&b))
    });

    order
        .into_iter()
        .enumerate()
        .map(|(rank, item)| StrengthSummary {
            rank: rank + 1,
            item,
            strength: estimate.strengths[item],
            wins: counts.won_by[item],
            comparisons: counts.appearances(item),
        })
        .collect()
}

pub fn print_strengths(counts: &ComparisonCounts, estimate: &Estimate, output: Option<&Path>) {
    let leaderboard = make_leaderboard(counts, estimate);

    tracing::info!(
        "{:?} after {} iterations, log-likelihood = {}",
        estimate.termination,
        estimate.iterations,
        estimate.log_likelihood
    );
    if estimate.zero_strength_items > 0 {
        tracing::info!("{} items at strength zero", estimate.zero_strength_items);
    }
    for row in &leaderboard {
        tracing::info!(
            "#{:<3} item {:3}: {:.6}  ({} wins / {} comparisons)",
            row.rank,
            row.item,
            row.strength,
            row.wins,
            row.comparisons
        );
    }

    if let Some(path) = output {
        try_write_slice_to_file(&leaderboard, path);
    }
}
