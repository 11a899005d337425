//! Maximum-likelihood Bradley-Terry strengths by the MM (Zermelo) fixed point.
//!
//! Each iteration sets an item's new strength to its total wins divided by the
//! "pressure" from every opponent it was compared against,
//! `sum_j n_ij / (p_i + p_j)`, then renormalizes. Convergence is judged on the
//! change in log-likelihood between consecutive iterations.
use crate::aggregate::ComparisonCounts;
use crate::error::{Error, Result};
use crate::numerical::{checked_ln, normalize, uniform};
use crate::pairs::PairIndex;
use serde::{Deserialize, Serialize};

pub const DEFAULT_THRESHOLD_PRECISION: f64 = 1e-6;
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

fn default_threshold_precision() -> f64 {
    DEFAULT_THRESHOLD_PRECISION
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Number of items N; fixes the pair mapping.
    pub num_items: usize,
    /// Stop once the log-likelihood moves by less than this between iterations.
    #[serde(default = "default_threshold_precision")]
    pub threshold_precision: f64,
    /// Stop after this many iterations, converged or not.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl EstimatorConfig {
    pub fn new(num_items: usize) -> Self {
        Self {
            num_items,
            threshold_precision: DEFAULT_THRESHOLD_PRECISION,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_threshold_precision(mut self, threshold_precision: f64) -> Self {
        self.threshold_precision = threshold_precision;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn pairs(&self) -> PairIndex {
        PairIndex::new(self.num_items)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_items < 2 {
            Err(Error::InvalidConfig(format!(
                "need at least 2 items, got {}",
                self.num_items
            )))
        } else if !(self.threshold_precision > 0. && self.threshold_precision.is_finite()) {
            Err(Error::InvalidConfig(format!(
                "threshold_precision must be positive and finite, got {}",
                self.threshold_precision
            )))
        } else if self.max_iterations == 0 {
            Err(Error::InvalidConfig("max_iterations must be at least 1".into()))
        } else {
            Ok(())
        }
    }
}

/// How an estimation run stopped. Both outcomes carry a usable strength vector,
/// but `IterationCapReached` means the precision threshold was never met.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Termination {
    Converged,
    IterationCapReached,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EstimatorState {
    Initialized,
    Iterating,
    Converged,
    IterationCapReached,
}

impl EstimatorState {
    pub fn termination(self) -> Option<Termination> {
        match self {
            Self::Converged => Some(Termination::Converged),
            Self::IterationCapReached => Some(Termination::IterationCapReached),
            Self::Initialized | Self::Iterating => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogLikelihood {
    pub value: f64,
    /// Items at strength zero, whose terms were left out of `value`.
    pub zero_strength_items: usize,
    /// Left-out terms that carried wins; nonzero means `value` is missing mass.
    pub dropped_terms: usize,
}

fn check_strengths_len(num_items: usize, proba: &[f64]) -> Result<()> {
    if proba.len() == num_items {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{} strengths given for {} items",
            proba.len(),
            num_items
        )))
    }
}

/// `sum_ij duel_won_by[i][j] * (ln p_i - ln(p_i + p_j))`, excluding every term
/// with `p_i == 0`, where the log is undefined.
pub fn log_likelihood(duel_won_by: &[Vec<u64>], proba: &[f64]) -> Result<LogLikelihood> {
    check_strengths_len(duel_won_by.len(), proba)?;
    if let Some(row) = duel_won_by.iter().find(|row| row.len() != proba.len()) {
        return Err(Error::InvalidConfig(format!(
            "win table row of {} entries for {} items",
            row.len(),
            proba.len()
        )));
    }
    let mut ll = LogLikelihood {
        value: 0.,
        zero_strength_items: 0,
        dropped_terms: 0,
    };
    for (i, row) in duel_won_by.iter().enumerate() {
        let Some(ln_p_i) = checked_ln(proba[i]) else {
            ll.zero_strength_items += 1;
            ll.dropped_terms += row.iter().filter(|&&wins| wins > 0).count();
            continue;
        };
        for (j, &wins) in row.iter().enumerate() {
            if i != j && wins > 0 {
                ll.value += wins as f64 * (ln_p_i - (proba[i] + proba[j]).ln());
            }
        }
    }
    Ok(ll)
}

/// One MM step: `p_i <- wins_i / sum_j n_ij / (p_i + p_j)`, then normalize.
/// Items facing no opponents get strength zero.
pub fn mm_update(counts: &ComparisonCounts, proba: &[f64]) -> Result<Vec<f64>> {
    check_strengths_len(counts.num_items(), proba)?;
    let mut new_proba: Vec<f64> = (0..counts.num_items())
        .map(|i| {
            let sum_p: f64 = counts.comparisons[i]
                .iter()
                .enumerate()
                .filter(|&(j, &n)| j != i && n > 0)
                .map(|(j, &n)| n as f64 / (proba[i] + proba[j]))
                .sum();
            if sum_p > 0. && sum_p.is_finite() {
                counts.won_by[i] as f64 / sum_p
            } else {
                0.
            }
        })
        .collect();
    normalize(&mut new_proba).ok_or(Error::DegenerateRun)?;
    Ok(new_proba)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Estimate {
    /// Normalized strengths, one per item.
    pub strengths: Vec<f64>,
    pub iterations: usize,
    pub termination: Termination,
    /// Log-likelihood of `strengths`.
    pub log_likelihood: f64,
    /// Items that ended at strength zero.
    pub zero_strength_items: usize,
}

impl Estimate {
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}

/// Drives the MM iteration over one run's counts. The strength vector is the
/// only state carried from one iteration to the next.
#[derive(Debug)]
pub struct MmEstimator<'a> {
    counts: &'a ComparisonCounts,
    config: EstimatorConfig,
    proba: Vec<f64>,
    likelihood: LogLikelihood,
    iterations: usize,
    state: EstimatorState,
}

impl<'a> MmEstimator<'a> {
    /// Starts from uniform strengths `1 / N`.
    pub fn new(counts: &'a ComparisonCounts, config: EstimatorConfig) -> Result<Self> {
        let initial = uniform(config.num_items);
        Self::with_initial(counts, config, initial)
    }

    /// Starts from `initial`, which is normalized first; it must be non-negative
    /// with a positive sum, and positive for every item that appears in a
    /// comparison. A compared item starting at zero would stay at zero.
    pub fn with_initial(
        counts: &'a ComparisonCounts,
        config: EstimatorConfig,
        mut initial: Vec<f64>,
    ) -> Result<Self> {
        config.validate()?;
        if counts.num_items() != config.num_items {
            return Err(Error::InvalidConfig(format!(
                "counts cover {} items, but num_items is {}",
                counts.num_items(),
                config.num_items
            )));
        }
        if initial.len() != config.num_items || initial.iter().any(|&p| p < 0. || p.is_nan()) {
            return Err(Error::InvalidConfig(
                "initial strengths must be N non-negative values".into(),
            ));
        }
        if counts.total_judgments() == 0 {
            return Err(Error::DegenerateRun);
        }
        let stuck_at_zero =
            (0..config.num_items).find(|&i| initial[i] == 0. && counts.appearances(i) > 0);
        if let Some(i) = stuck_at_zero {
            return Err(Error::InvalidConfig(format!(
                "initial strength of item {} is zero, but it was compared {} times",
                i,
                counts.appearances(i)
            )));
        }
        normalize(&mut initial).ok_or_else(|| {
            Error::InvalidConfig("initial strengths must have a positive, finite sum".into())
        })?;

        let likelihood = log_likelihood(&counts.duel_won_by, &initial)?;
        Ok(Self {
            counts,
            config,
            proba: initial,
            likelihood,
            iterations: 0,
            state: EstimatorState::Initialized,
        })
    }

    pub fn state(&self) -> EstimatorState {
        self.state
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn strengths(&self) -> &[f64] {
        &self.proba
    }

    pub fn log_likelihood(&self) -> LogLikelihood {
        self.likelihood
    }

    /// Performs one update unless the run has already terminated.
    pub fn step(&mut self) -> Result<EstimatorState> {
        if self.state.termination().is_some() {
            return Ok(self.state);
        }

        self.proba = mm_update(self.counts, &self.proba)?;
        self.iterations += 1;

        let likelihood = log_likelihood(&self.counts.duel_won_by, &self.proba)?;
        let delta = (likelihood.value - self.likelihood.value).abs();
        self.likelihood = likelihood;
        tracing::debug!(
            "Iteration {:5}: log-likelihood = {}, delta = {:e}",
            self.iterations,
            likelihood.value,
            delta
        );

        self.state = if delta < self.config.threshold_precision {
            EstimatorState::Converged
        } else if self.iterations >= self.config.max_iterations {
            EstimatorState::IterationCapReached
        } else {
            EstimatorState::Iterating
        };
        Ok(self.state)
    }

    /// Iterates until convergence or the iteration cap.
    pub fn run(mut self) -> Result<Estimate> {
        let termination = loop {
            if let Some(termination) = self.step()?.termination() {
                break termination;
            }
        };

        match termination {
            Termination::Converged => tracing::info!(
                "Converged after {} iterations, log-likelihood = {}",
                self.iterations,
                self.likelihood.value
            ),
            Termination::IterationCapReached => tracing::warn!(
                "Stopped at the cap of {} iterations without reaching precision {:e}",
                self.iterations,
                self.config.threshold_precision
            ),
        }
        if self.likelihood.dropped_terms > 0 {
            tracing::warn!(
                "{} log-likelihood terms with wins were dropped for zero-strength items",
                self.likelihood.dropped_terms
            );
        }

        Ok(Estimate {
            strengths: self.proba,
            iterations: self.iterations,
            termination,
            log_likelihood: self.likelihood.value,
            zero_strength_items: self.likelihood.zero_strength_items,
        })
    }
}

/// Convenience wrapper: estimate strengths from `counts` starting at uniform.
pub fn estimate(counts: &ComparisonCounts, config: &EstimatorConfig) -> Result<Estimate> {
    MmEstimator::new(counts, config.clone())?.run()
}
