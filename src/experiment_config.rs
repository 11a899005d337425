use crate::aggregate::{ComparisonCounts, RecordPolicy, aggregate};
use crate::data_processing::{
    Respondent, bradley_terry_respondents, read_respondents_csv, uniform_respondents,
};
use crate::error::{Error, Result};
use crate::estimator::{Estimate, EstimatorConfig, MmEstimator};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Where an experiment's respondent records come from.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RespondentSource {
    /// A `;`-separated file of `id;code;code;...` rows.
    Csv { path: PathBuf },
    /// Every judgment uniformly abstained, first-won or second-won.
    Uniform { num_respondents: usize, seed: u64 },
    /// Judgments drawn from the Bradley-Terry model with the given strengths.
    BradleyTerry {
        strengths: Vec<f64>,
        num_respondents: usize,
        abstain_prob: f64,
        seed: u64,
    },
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub estimator: EstimatorConfig,
    pub source: RespondentSource,
    #[serde(default)]
    pub record_policy: RecordPolicy,
    /// Where to write the strength table, as `.csv` or `.json`.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl ExperimentConfig {
    pub fn from_file(source: impl AsRef<Path>) -> Result<Self> {
        // json5 rather than serde_json, for comments and trailing commas
        let params_json = std::fs::read_to_string(source)?;
        Ok(json5::from_str(&params_json)?)
    }
}

#[derive(Debug)]
pub struct Experiment {
    pub name: String,
    pub config: EstimatorConfig,
    pub record_policy: RecordPolicy,
    pub respondents: Vec<Respondent>,
    pub output: Option<PathBuf>,
}

impl Experiment {
    pub fn from_file(source: impl AsRef<Path>) -> Result<Self> {
        Self::from_config(ExperimentConfig::from_file(source)?)
    }

    pub fn from_config(config: ExperimentConfig) -> Result<Self> {
        tracing::info!("Loading experiment:\n{:?}", config);
        config.estimator.validate()?;
        let pairs = config.estimator.pairs();

        let respondents = match &config.source {
            RespondentSource::Csv { path } => read_respondents_csv(path, config.record_policy)?,
            &RespondentSource::Uniform {
                num_respondents,
                seed,
            } => uniform_respondents(&pairs, num_respondents, &mut StdRng::seed_from_u64(seed)),
            RespondentSource::BradleyTerry {
                strengths,
                num_respondents,
                abstain_prob,
                seed,
            } => {
                if strengths.len() != config.estimator.num_items {
                    return Err(Error::InvalidConfig(format!(
                        "{} latent strengths given for {} items",
                        strengths.len(),
                        config.estimator.num_items
                    )));
                }
                if !(0. ..=1.).contains(abstain_prob)
                    || strengths.iter().any(|&s| !(s > 0. && s.is_finite()))
                {
                    return Err(Error::InvalidConfig(
                        "abstain_prob must lie in [0, 1] and strengths must be positive".into(),
                    ));
                }
                let mut rng = StdRng::seed_from_u64(*seed);
                bradley_terry_respondents(strengths, *num_respondents, *abstain_prob, &mut rng)
            }
        };

        Ok(Self {
            name: config.name.unwrap_or_else(|| "experiment".to_owned()),
            config: config.estimator,
            record_policy: config.record_policy,
            respondents,
            output: config.output,
        })
    }

    pub fn eval(&self) -> Result<ExperimentResults> {
        let now = std::time::Instant::now();
        let counts = aggregate(&self.config.pairs(), &self.respondents, self.record_policy)?;
        let estimate = MmEstimator::new(&counts, self.config.clone())?.run()?;
        let secs_elapsed = now.elapsed().as_nanos() as f64 * 1e-9;

        tracing::debug!(
            "{}: {} respondents in {} seconds",
            self.name,
            counts.respondents,
            secs_elapsed
        );
        Ok(ExperimentResults {
            counts,
            estimate,
            secs_elapsed,
        })
    }
}

/// Evaluates independent experiments in parallel; each owns all of its state.
pub fn eval_batch(experiments: &[Experiment]) -> Vec<Result<ExperimentResults>> {
    experiments.par_iter().map(Experiment::eval).collect()
}

#[derive(Debug)]
pub struct ExperimentResults {
    pub counts: ComparisonCounts,
    pub estimate: Estimate,
    pub secs_elapsed: f64,
}
