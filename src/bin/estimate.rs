use pairwise_strength::RecordPolicy;
use pairwise_strength::error::{Error, Result};
use pairwise_strength::estimator::EstimatorConfig;
use pairwise_strength::experiment_config::{Experiment, ExperimentConfig, RespondentSource};
use pairwise_strength::summary::print_strengths;
use pairwise_strength::telemetry::init_cli_logging;

fn parse_arg<T: std::str::FromStr>(args: &[String], index: usize, what: &str) -> Result<Option<T>> {
    args.get(index)
        .map(|s| {
            s.parse()
                .map_err(|_| Error::InvalidConfig(format!("{} is not a valid {}", s, what)))
        })
        .transpose()
}

fn get_experiment_from_args(args: &[String]) -> Result<Experiment> {
    if args[1] == "file:" {
        return Experiment::from_file(&args[2]);
    }

    let num_items = parse_arg(args, 2, "item count")?.unwrap_or_default();
    let mut estimator = EstimatorConfig::new(num_items);
    if let Some(max_iterations) = parse_arg(args, 3, "iteration cap")? {
        estimator = estimator.with_max_iterations(max_iterations);
    }
    if let Some(threshold) = parse_arg(args, 4, "precision threshold")? {
        estimator = estimator.with_threshold_precision(threshold);
    }

    Experiment::from_config(ExperimentConfig {
        name: Some(args[1].clone()),
        estimator,
        source: RespondentSource::Csv {
            path: args[1].clone().into(),
        },
        record_policy: RecordPolicy::RejectRun,
        output: None,
    })
}

/// Estimates item strengths from a file of pairwise judgments
fn main() {
    init_cli_logging("estimate");

    let args: Vec<String> = std::env::args().collect();
    if !(3..=5).contains(&args.len()) {
        tracing::error!(
            "Usage: {0} file: experiment.json5\n       {0} respondents.csv num_items [max_iterations] [threshold]",
            args[0]
        );
        std::process::exit(2);
    }

    let outcome = get_experiment_from_args(&args).and_then(|ex| {
        let results = ex.eval()?;
        tracing::info!("{} finished in {} seconds.", ex.name, results.secs_elapsed);
        print_strengths(&results.counts, &results.estimate, ex.output.as_deref());
        Ok(())
    });
    if let Err(err) = outcome {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}
